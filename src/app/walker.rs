//! Listing feed walker
//!
//! Drives the whole crawl: pages through the cursor-based listing feed,
//! extracts outbound links, hands each page's batch of first-seen URLs to the
//! download queue, and accumulates statistics. Pages are requested strictly
//! one at a time; a batch is fully drained before the next page is fetched.

use reqwest::header::{ACCEPT, ACCEPT_CHARSET, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use tracing::{debug, info, warn};

use crate::app::auth::AuthSession;
use crate::app::models::ListingPage;
use crate::app::queue::FetchQueue;
use crate::app::stats::CrawlStatistics;
use crate::constants::http;
use crate::errors::{ListingError, Result};

/// Configuration for one crawl run
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Fully qualified listing endpoint, e.g. `https://oauth.reddit.com/r/nottheonion/.json`
    pub listing_url: String,
    /// User-Agent for listing requests (API identity, not the page-fetch one)
    pub user_agent: String,
    /// Maximum items requested per listing page
    pub batch_size: u32,
    /// Stop after this many URLs have been processed, unlimited when absent
    pub limit: Option<u64>,
    /// Retry bound per downloaded URL
    pub max_attempts: u32,
}

/// Walks the listing feed page by page, downloading linked pages as it goes
#[derive(Debug)]
pub struct ListingWalker {
    client: Client,
    config: WalkerConfig,
    session: AuthSession,
    queue: FetchQueue,
    stats: CrawlStatistics,
    after: Option<String>,
    /// Items parsed from the feed so far, duplicates included; reported to the
    /// server as the `count` pagination hint
    parsed_count: u64,
    /// Unique URLs downloaded or skipped as already present so far; compared
    /// against the configured limit. Failed URLs do not count toward it.
    processed_count: u64,
}

impl ListingWalker {
    pub fn new(
        client: Client,
        config: WalkerConfig,
        session: AuthSession,
        queue: FetchQueue,
    ) -> Self {
        Self {
            client,
            config,
            session,
            queue,
            stats: CrawlStatistics::new(),
            after: None,
            parsed_count: 0,
            processed_count: 0,
        }
    }

    /// Statistics accumulated so far; valid even after a failed crawl
    pub fn stats(&self) -> &CrawlStatistics {
        &self.stats
    }

    /// Runs the crawl to the end of the feed or the configured limit
    ///
    /// # Errors
    ///
    /// Returns an error when authentication fails terminally, a listing page
    /// cannot be retrieved or parsed, or a downloaded page cannot be written.
    /// Per-URL download failures are not errors; they are recorded in the
    /// statistics instead.
    pub async fn crawl(&mut self) -> Result<()> {
        loop {
            if let Some(limit) = self.config.limit {
                if self.processed_count >= limit {
                    info!("Reached the limit of {} URLs; stopping", limit);
                    return Ok(());
                }
            }

            self.session.ensure_valid().await?;
            let page = self.next_page().await?;

            let mut batch = Vec::new();
            for item in &page.items {
                self.parsed_count += 1;
                match &item.url {
                    Some(url) => {
                        if self.stats.record_attempt(url, item.created_utc) {
                            batch.push(url.clone());
                        } else {
                            warn!("URL \"{}\" was already processed; skipping", url);
                        }
                    }
                    None => {
                        warn!("Listed item \"{}\" has no URL attribute; skipping", item.name);
                    }
                }
            }

            let batch_len = batch.len() as u64;
            let failed = self.queue.run(batch, self.config.max_attempts).await?;
            self.processed_count += batch_len - failed.len() as u64;
            self.stats.record_failures(failed);

            match page.after {
                Some(after) => {
                    debug!("Next listing page cursor: {}", after);
                    self.after = Some(after);
                }
                None => {
                    match self.config.limit {
                        Some(limit) => info!(
                            "Reached the end of the feed after {} of an intended {} URLs",
                            self.processed_count, limit
                        ),
                        None => info!(
                            "Reached the end of the feed after {} URLs",
                            self.processed_count
                        ),
                    }
                    return Ok(());
                }
            }
        }
    }

    /// Fetches and parses the next listing page, refreshing the token and
    /// retrying exactly once on an authorization rejection
    async fn next_page(&mut self) -> Result<ListingPage> {
        let response = self.request_listing().await?;

        let rejected = response.status() == StatusCode::UNAUTHORIZED
            || response.status() == StatusCode::FORBIDDEN;
        let response = if rejected {
            info!(
                "Listing request was rejected with HTTP {}; refreshing token",
                response.status()
            );
            self.session.refresh().await?;
            self.request_listing().await?
        } else {
            response
        };

        let status = response.status();
        if !status.is_success() {
            return Err(ListingError::BadStatus {
                status: status.as_u16(),
            }
            .into());
        }

        let body = response.text().await.map_err(ListingError::Http)?;
        let page = ListingPage::parse(&body).map_err(ListingError::Parse)?;
        Ok(page)
    }

    async fn request_listing(&self) -> Result<reqwest::Response> {
        let mut query: Vec<(&str, String)> = vec![
            ("limit", self.page_size().to_string()),
            ("count", self.parsed_count.to_string()),
        ];
        if let Some(after) = &self.after {
            query.push(("after", after.clone()));
        }

        let response = self
            .client
            .get(&self.config.listing_url)
            .header(ACCEPT, "application/json")
            .header(ACCEPT_CHARSET, http::REQUEST_CHARSET)
            .header(AUTHORIZATION, self.session.authorization()?)
            .header(USER_AGENT, &self.config.user_agent)
            .query(&query)
            .send()
            .await
            .map_err(ListingError::Http)?;
        Ok(response)
    }

    /// Items to request for the next page: the batch size, clamped so that a
    /// configured limit is never overshot
    fn page_size(&self) -> u32 {
        match self.config.limit {
            Some(limit) => limit
                .saturating_sub(self.processed_count)
                .min(u64::from(self.config.batch_size)) as u32,
            None => self.config.batch_size,
        }
    }
}
