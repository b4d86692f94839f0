//! Error types for reddit_fetcher
//!
//! Errors are split by the layer that can recover from them: authentication
//! and listing errors are fatal for the whole run, while fetch errors are
//! absorbed inside the fetch queue and never propagate past a batch.

use thiserror::Error;

/// Authentication-related errors (fatal for the run)
#[derive(Error, Debug)]
pub enum AuthError {
    /// No secret on the command line and none in the environment
    #[error("Missing reddit application secret. Pass --secret or set REDDIT_CLIENT_SECRET")]
    MissingSecret,

    /// HTTP request failed during a token exchange
    #[error("HTTP request failed during token exchange")]
    Http(#[from] reqwest::Error),

    /// Token endpoint returned a non-success status
    #[error("Token endpoint rejected the request: HTTP {status}")]
    TokenRejected { status: u16 },

    /// An authenticated operation was attempted before any token was acquired
    #[error("No authentication token has been acquired")]
    NotAuthenticated,
}

/// Listing pagination errors (fatal for the run)
#[derive(Error, Debug)]
pub enum ListingError {
    /// HTTP request failed while fetching a listing page
    #[error("HTTP request failed while fetching a listing page")]
    Http(#[from] reqwest::Error),

    /// Listing endpoint returned a non-success status other than the single
    /// handled 401/403
    #[error("Listing endpoint returned HTTP {status}")]
    BadStatus { status: u16 },

    /// Listing response body did not match the expected envelope
    #[error("Malformed listing response")]
    Parse(#[from] serde_json::Error),
}

/// Top-level application error that can represent any fatal error
#[derive(Error, Debug)]
pub enum AppError {
    /// Authentication error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Listing pagination error
    #[error(transparent)]
    Listing(#[from] ListingError),

    /// File I/O error while persisting a page
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Get error category for logging
    pub fn category(&self) -> &'static str {
        match self {
            AppError::Auth(_) => "authentication",
            AppError::Listing(_) => "listing",
            AppError::Io(_) => "io",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;

/// Authentication result type alias
pub type AuthResult<T> = std::result::Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let auth = AppError::Auth(AuthError::MissingSecret);
        assert_eq!(auth.category(), "authentication");

        let listing = AppError::Listing(ListingError::BadStatus { status: 500 });
        assert_eq!(listing.category(), "listing");
    }

    #[test]
    fn test_error_messages() {
        let err = AuthError::TokenRejected { status: 401 };
        assert!(err.to_string().contains("401"));

        let err = ListingError::BadStatus { status: 503 };
        assert!(err.to_string().contains("503"));
    }
}
