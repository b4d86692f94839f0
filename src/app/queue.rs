//! Bounded-retry download queue for one batch of URLs
//!
//! A FIFO of (url, attempt count) pairs, seeded at zero for every URL in the
//! batch. Connection-level failures are permanent immediately; unsuccessful
//! HTTP statuses re-queue the URL at the tail until the attempt bound is
//! exceeded. A URL whose storage path already exists is skipped before any
//! request is made, which is what makes re-runs idempotent.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use reqwest::header::{ACCEPT, ACCEPT_CHARSET, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use tracing::{info, warn};
use url::Url;

use crate::app::paths;
use crate::constants::http;
use crate::errors::Result;

/// One queued download and how many times it has been attempted
#[derive(Debug)]
struct FetchAttempt {
    url: String,
    attempts: u32,
}

/// Downloads batches of URLs sequentially with bounded retry
#[derive(Debug)]
pub struct FetchQueue {
    client: Client,
    outdir: PathBuf,
}

impl FetchQueue {
    /// Creates a queue persisting under the given output directory
    pub fn new(client: Client, outdir: PathBuf) -> Self {
        Self { client, outdir }
    }

    /// Downloads every URL in the batch, returning the subset that failed
    /// permanently
    ///
    /// Transport and HTTP-status failures are absorbed here and reported only
    /// through the returned set.
    ///
    /// # Errors
    ///
    /// Returns an error only when the filesystem refuses a write, which is
    /// fatal for the run.
    pub async fn run(&self, urls: Vec<String>, max_attempts: u32) -> Result<HashSet<String>> {
        let mut failed = HashSet::new();
        let mut queue: VecDeque<FetchAttempt> = urls
            .into_iter()
            .map(|url| FetchAttempt { url, attempts: 0 })
            .collect();

        while let Some(mut entry) = queue.pop_front() {
            let parsed = match Url::parse(&entry.url) {
                Ok(parsed) => parsed,
                Err(e) => {
                    warn!("Discarding unparseable URL \"{}\": {}", entry.url, e);
                    failed.insert(entry.url);
                    continue;
                }
            };

            // Guess the content type from the URL alone to decide whether this
            // URL was already downloaded on an earlier run
            let guessed_type = paths::guess_content_type(&parsed);
            let guessed_path = self.outdir.join(paths::url_to_filename(&parsed, &guessed_type));
            if guessed_path.exists() {
                info!(
                    "File path \"{}\" already exists; skipping",
                    guessed_path.display()
                );
                continue;
            }

            let response = match self
                .client
                .get(parsed.clone())
                .header(ACCEPT, http::CRAWL_ACCEPT)
                .header(ACCEPT_CHARSET, http::REQUEST_CHARSET)
                .header(USER_AGENT, http::CRAWL_USER_AGENT)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    // Connection-level failure: permanent, no retry
                    warn!(
                        "Irrecoverable error requesting \"{}\" (attempt {}); giving up: {}",
                        entry.url, entry.attempts, e
                    );
                    failed.insert(entry.url);
                    continue;
                }
            };

            entry.attempts += 1;
            let status = response.status();
            if !status.is_success() {
                if entry.attempts > max_attempts {
                    warn!(
                        "Received HTTP {} for \"{}\" (attempt {}); giving up",
                        status, entry.url, entry.attempts
                    );
                    failed.insert(entry.url);
                } else {
                    warn!(
                        "Received HTTP {} for \"{}\" (attempt {}); will try again later",
                        status, entry.url, entry.attempts
                    );
                    queue.push_back(entry);
                }
                continue;
            }

            // The server's content type is authoritative; if it disagrees with
            // the guess, the storage path must be re-derived and re-checked
            let actual_type = response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok())
                .map(|value| paths::strip_content_type_params(value).to_string());

            let outpath = match actual_type {
                Some(actual) if actual != guessed_type => {
                    let recomputed = self.outdir.join(paths::url_to_filename(&parsed, &actual));
                    if recomputed.exists() {
                        info!(
                            "File path \"{}\" already exists; skipping",
                            recomputed.display()
                        );
                        continue;
                    }
                    recomputed
                }
                _ => guessed_path,
            };

            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    warn!(
                        "Irrecoverable error reading \"{}\" (attempt {}); giving up: {}",
                        entry.url, entry.attempts, e
                    );
                    failed.insert(entry.url);
                    continue;
                }
            };

            write_page(&outpath, &body).await?;
            info!("{} > {}", entry.url, outpath.display());
        }

        Ok(failed)
    }
}

/// Writes page content, creating parent directories as needed
async fn write_page(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await
}
