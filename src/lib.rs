//! Reddit Link Fetcher Library
//!
//! A Rust library for crawling every link listed in a subreddit and saving the
//! linked pages to a directory. Pagination, OAuth2 token renewal, bounded
//! retry, and deterministic URL-to-path mapping are handled here; the binary
//! in `main.rs` is a thin CLI wrapper.

pub mod app;
pub mod cli;
pub mod constants;
pub mod errors;

// Re-export commonly used types for convenience
pub use errors::{AppError, Result};
