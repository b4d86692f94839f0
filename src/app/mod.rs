//! Core application modules

pub mod auth;
pub mod client;
pub mod models;
pub mod paths;
pub mod queue;
pub mod stats;
pub mod walker;

pub use auth::AuthSession;
pub use client::ClientConfig;
pub use models::{AuthToken, ListingItem, ListingPage, TokenResponse};
pub use paths::{guess_content_type, strip_content_type_params, url_to_filename};
pub use queue::FetchQueue;
pub use stats::CrawlStatistics;
pub use walker::{ListingWalker, WalkerConfig};
