use clap::Parser;
use relevance_search::cli::{Cli, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    relevance_search::tracing::init(cli.verbose, cli.log_json);

    tracing::debug!(query = ?cli.query, live = cli.live, "Starting relevance-search");

    let stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();
    run(&cli, stdin, &mut stdout).inspect_err(|e| {
        tracing::error!("Search failed: {:#}", e);
    })
}
