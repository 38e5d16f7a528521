//! Tracing initialization.

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan, util::SubscriberInitExt};

static INIT: Once = Once::new();

/// Maps a `-v` count to the default log level.
///
/// `RUST_LOG` directives still apply on top of this level.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialize tracing. Safe to call multiple times; only the first call has any effect.
///
/// Logs go to stderr so result output on stdout stays machine readable.
pub fn init(verbosity: u8, json: bool) {
    INIT.call_once(|| {
        let is_test =
            std::env::var("NEXTEST").is_ok() || std::env::var("CARGO_TARGET_TMPDIR").is_ok();
        let level = if is_test {
            Level::DEBUG
        } else {
            level_for(verbosity)
        };
        let filter = EnvFilter::from_default_env().add_directive(level.into());

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .with_span_events(FmtSpan::NONE);

        let installed = if is_test {
            builder.with_test_writer().finish().try_init()
        } else if json {
            builder.json().with_writer(std::io::stderr).finish().try_init()
        } else {
            builder
                .compact()
                .with_writer(std::io::stderr)
                .finish()
                .try_init()
        };

        if let Err(e) = installed {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}
