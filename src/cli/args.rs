//! Command-line argument parsing

use std::path::PathBuf;

use clap::Parser;

use crate::constants::{limits, reddit};

/// Crawls a subreddit's listing feed and saves every linked page to disk
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory under which downloaded pages are saved
    pub outdir: PathBuf,

    /// OAuth2 client secret; read from the environment when omitted
    #[arg(long)]
    pub secret: Option<String>,

    /// Subreddit whose listing feed is crawled
    #[arg(short = 's', long, default_value = reddit::DEFAULT_SUBREDDIT)]
    pub subreddit: String,

    /// Stop after this many URLs; crawl the whole feed when omitted
    #[arg(short = 'l', long)]
    pub limit: Option<u64>,

    /// Maximum listing items requested per page
    #[arg(short = 'b', long, default_value_t = limits::DEFAULT_BATCH_SIZE)]
    pub batch_size: u32,

    /// Retries per page after an unsuccessful HTTP response
    #[arg(short = 'r', long, default_value_t = limits::DEFAULT_MAX_ATTEMPTS)]
    pub max_retries: u32,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress everything but errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Log level implied by the verbosity flags
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
