//! Command handlers wiring CLI arguments to the application

use tracing::info;

use crate::app::{AuthSession, ClientConfig, CrawlStatistics, FetchQueue, ListingWalker, WalkerConfig};
use crate::cli::args::Cli;
use crate::constants::{env, reddit};
use crate::errors::{AuthError, Result};

/// Runs a crawl with the given arguments, printing the report at the end
///
/// The report is printed even when the crawl aborts partway through, so a
/// fatal error still shows what was retrieved before it.
///
/// # Errors
///
/// Returns an error on missing credentials, terminal authentication failure,
/// an unretrievable or unparseable listing page, or a filesystem write
/// failure.
pub async fn handle_crawl(cli: Cli) -> Result<()> {
    let secret = match cli.secret {
        Some(secret) => secret,
        None => std::env::var(env::CLIENT_SECRET).map_err(|_| AuthError::MissingSecret)?,
    };

    let client = ClientConfig::default().build_http_client()?;
    let mut session = AuthSession::new(client.clone(), secret);
    session.acquire().await?;

    let queue = FetchQueue::new(client.clone(), cli.outdir);
    let config = WalkerConfig {
        listing_url: format!("{}/r/{}/.json", reddit::OAUTH_BASE_URL, cli.subreddit),
        user_agent: reddit::api_user_agent(),
        batch_size: cli.batch_size,
        limit: cli.limit,
        max_attempts: cli.max_retries,
    };

    info!("Crawling r/{}", cli.subreddit);
    let mut walker = ListingWalker::new(client, config, session, queue);
    let outcome = walker.crawl().await;

    print_report(walker.stats());
    outcome
}

/// Prints the end-of-run summary to standard output
fn print_report(stats: &CrawlStatistics) {
    println!(
        "Retrieved {} out of {} unique pages.",
        stats.success_count(),
        stats.attempted_count()
    );

    if let Some((oldest, newest)) = stats.time_range() {
        println!(
            "Oldest listed link date: {}",
            CrawlStatistics::format_timestamp(oldest)
        );
        println!(
            "Newest listed link date: {}",
            CrawlStatistics::format_timestamp(newest)
        );
    }

    if stats.failed_count() > 0 {
        println!("Failed URLs:");
        for url in stats.failed_urls() {
            println!("{}", url);
        }
    }
}
