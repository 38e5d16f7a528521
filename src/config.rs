//! Search configuration.

use crate::error::{Result, SearchError};

/// Options for a merged search.
///
/// Use [`Default::default()`] for an unfiltered, unlimited search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Records must score strictly above this to be returned.
    pub excl_min_score: f64,
    /// Keep only this many of the highest-scoring results.
    pub limit: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            excl_min_score: 0.0,
            limit: None,
        }
    }
}

impl SearchOptions {
    /// Checks:
    /// - `excl_min_score` must be a finite number
    /// - `limit`, when set, must be greater than 0
    pub fn validate(&self) -> Result<()> {
        if !self.excl_min_score.is_finite() {
            return Err(SearchError::Config(format!(
                "excl_min_score must be finite, got {}",
                self.excl_min_score
            )));
        }
        if self.limit == Some(0) {
            return Err(SearchError::Config("limit must be greater than 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[test]
    fn test_default_is_valid() {
        let options = SearchOptions::default();
        check!(options.excl_min_score == 0.0);
        check!(options.limit.is_none());
        check!(options.validate().is_ok());
    }

    #[rstest]
    #[case(f64::NAN)]
    #[case(f64::INFINITY)]
    #[case(f64::NEG_INFINITY)]
    fn test_non_finite_min_score_rejected(#[case] excl_min_score: f64) {
        let options = SearchOptions {
            excl_min_score,
            ..Default::default()
        };
        check!(matches!(options.validate(), Err(SearchError::Config(_))));
    }

    #[test]
    fn test_zero_limit_rejected() {
        let options = SearchOptions {
            limit: Some(0),
            ..Default::default()
        };
        let err = options.validate().unwrap_err();
        check!(err.to_string() == "config error: limit must be greater than 0");
    }

    #[test]
    fn test_negative_min_score_allowed() {
        let options = SearchOptions {
            excl_min_score: -1.0,
            limit: Some(3),
        };
        check!(options.validate().is_ok());
    }
}
