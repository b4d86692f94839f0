//! Application constants for reddit_fetcher
//!
//! This module centralizes all constants used throughout the application,
//! organized by functional domain for maintainability and clarity.

/// Reddit service endpoints and application identity
pub mod reddit {
    /// OAuth2 token endpoint for the client-credentials and refresh grants
    pub const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

    /// Base URL for authenticated API requests
    pub const OAUTH_BASE_URL: &str = "https://oauth.reddit.com";

    /// Registered application client id (the secret is supplied at run time)
    pub const CLIENT_ID: &str = "_JNFnqor9ZT4mQ";

    /// Registered application name, used in the API User-Agent string
    pub const APP_NAME: &str = "reddit_fetcher";

    /// Reddit username of the application author, used in the API User-Agent
    pub const AUTHOR_USERNAME: &str = "errantlinguist";

    /// Subreddit crawled when none is given on the command line
    pub const DEFAULT_SUBREDDIT: &str = "nottheonion";

    /// User-Agent for token and listing requests, in the
    /// `platform:app:version (by /u/username)` format the reddit API rules
    /// require
    pub fn api_user_agent() -> String {
        format!(
            "{}:{}:{} (by /u/{})",
            std::env::consts::OS,
            APP_NAME,
            env!("CARGO_PKG_VERSION"),
            AUTHOR_USERNAME
        )
    }
}

/// Environment variable names for credentials
pub mod env {
    /// Environment variable holding the reddit application secret
    pub const CLIENT_SECRET: &str = "REDDIT_CLIENT_SECRET";
}

/// HTTP client configuration and crawl request headers
pub mod http {
    use std::time::Duration;

    /// Content type assumed when nothing better can be guessed from a URL
    pub const DEFAULT_EXPECTED_CONTENT_TYPE: &str = "text/html";

    /// Accept header sent when fetching linked pages
    pub const CRAWL_ACCEPT: &str = "text/html;application/xhtml+xml";

    /// Accept-Charset header for all requests
    pub const REQUEST_CHARSET: &str = "UTF-8";

    /// Browser-like User-Agent for fetching linked pages (many sites reject
    /// obvious bots)
    pub const CRAWL_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/32.0.1700.102 Safari/537.36";

    /// Default HTTP request timeout
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection establishment timeout
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
}

/// Retry and pagination defaults
pub mod limits {
    /// Default number of listing items requested per page
    pub const DEFAULT_BATCH_SIZE: u32 = 100;

    /// Default number of retries for a URL returning an unsuccessful status
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
}

/// File naming constants
pub mod files {
    /// Extension appended when neither the URL nor the content type yields one
    /// (the default expected content type is HTML)
    pub const FALLBACK_EXTENSION: &str = "html";
}

// Re-export commonly used constants for convenience
pub use http::{CRAWL_USER_AGENT, DEFAULT_EXPECTED_CONTENT_TYPE, REQUEST_CHARSET};
pub use limits::{DEFAULT_BATCH_SIZE, DEFAULT_MAX_ATTEMPTS};
pub use reddit::{CLIENT_ID, OAUTH_BASE_URL, TOKEN_URL};
