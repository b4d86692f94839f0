//! Crawl statistics accumulation and reporting
//!
//! Tracks every URL the crawl has seen, every URL that failed permanently,
//! and the creation-time range of the listed items. All three grow
//! monotonically over the run; nothing is ever removed.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

/// Cumulative record of one crawl run
#[derive(Debug, Default)]
pub struct CrawlStatistics {
    attempted: HashSet<String>,
    failed: HashSet<String>,
    time_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl CrawlStatistics {
    /// Create empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one observed listing item
    ///
    /// The time range widens even when the URL turns out to be a duplicate.
    /// Returns whether the URL was seen for the first time, which decides
    /// whether the caller enqueues it.
    pub fn record_attempt(&mut self, url: &str, created_at: DateTime<Utc>) -> bool {
        self.time_range = Some(match self.time_range {
            None => (created_at, created_at),
            Some((min, max)) => (min.min(created_at), max.max(created_at)),
        });
        self.attempted.insert(url.to_string())
    }

    /// Folds a batch's permanently failed URLs into the failed set
    pub fn record_failures(&mut self, urls: impl IntoIterator<Item = String>) {
        self.failed.extend(urls);
    }

    /// Number of unique URLs observed across all pages
    pub fn attempted_count(&self) -> usize {
        self.attempted.len()
    }

    /// Number of URLs that failed permanently
    pub fn failed_count(&self) -> usize {
        self.failed.len()
    }

    /// Number of URLs that did not fail permanently
    pub fn success_count(&self) -> usize {
        self.attempted.len() - self.failed.len()
    }

    /// Creation-time range over every observed item, absent until the first
    /// item is recorded
    pub fn time_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.time_range
    }

    /// The permanently failed URLs
    pub fn failed_urls(&self) -> impl Iterator<Item = &str> {
        self.failed.iter().map(String::as_str)
    }

    /// Formats a timestamp the way the final report prints it
    pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
        timestamp.format("%Y-%m-%dT%H:%M:%SZ").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_first_seen_and_duplicate() {
        let mut stats = CrawlStatistics::new();

        assert!(stats.record_attempt("http://example.com/a", ts(100)));
        assert!(!stats.record_attempt("http://example.com/a", ts(200)));
        assert_eq!(stats.attempted_count(), 1);
    }

    #[test]
    fn test_time_range_widens_for_duplicates() {
        let mut stats = CrawlStatistics::new();

        stats.record_attempt("http://example.com/a", ts(500));
        assert_eq!(stats.time_range(), Some((ts(500), ts(500))));

        // A duplicate URL still widens the range in both directions
        stats.record_attempt("http://example.com/a", ts(100));
        stats.record_attempt("http://example.com/a", ts(900));
        assert_eq!(stats.time_range(), Some((ts(100), ts(900))));
    }

    #[test]
    fn test_success_count() {
        let mut stats = CrawlStatistics::new();

        stats.record_attempt("http://example.com/a", ts(1));
        stats.record_attempt("http://example.com/b", ts(2));
        stats.record_attempt("http://example.com/c", ts(3));
        stats.record_failures(vec!["http://example.com/b".to_string()]);

        assert_eq!(stats.attempted_count(), 3);
        assert_eq!(stats.failed_count(), 1);
        assert_eq!(stats.success_count(), 2);
    }

    #[test]
    fn test_empty_statistics() {
        let stats = CrawlStatistics::new();
        assert_eq!(stats.attempted_count(), 0);
        assert_eq!(stats.failed_count(), 0);
        assert_eq!(stats.success_count(), 0);
        assert!(stats.time_range().is_none());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(
            CrawlStatistics::format_timestamp(ts(1_456_000_000)),
            "2016-02-20T20:26:40Z"
        );
    }
}
