use std::process;

use reddit_fetcher::cli::{handle_crawl, Cli};
use reddit_fetcher::errors::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse_args();
    init_logging(&cli);

    info!("reddit_fetcher v{}", env!("CARGO_PKG_VERSION"));
    handle_crawl(cli).await
}

fn init_logging(cli: &Cli) {
    let directive = format!("reddit_fetcher={}", cli.log_level());
    let filter = EnvFilter::from_default_env().add_directive(
        directive
            .parse()
            .unwrap_or_else(|_| tracing_subscriber::filter::LevelFilter::INFO.into()),
    );

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
