//! Data models for tokens and listing pages
//!
//! This module defines the typed forms of the two wire formats the crawler
//! consumes: the OAuth2 token response and the listing envelope
//! `{"data": {"children": [...], "after": ...}}`.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

/// OAuth2 bearer token and its absolute expiry time
///
/// Replaced wholesale on every refresh, never mutated in place. Any
/// authenticated request must use a token whose expiry is strictly in the
/// future at send time.
#[derive(Debug, Clone)]
pub struct AuthToken {
    pub token_type: String,
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    /// Builds a token from a token endpoint response, anchoring the relative
    /// `expires_in` lifetime to the given instant
    pub fn from_response(response: TokenResponse, now: DateTime<Utc>) -> Self {
        Self {
            token_type: response.token_type,
            access_token: response.access_token,
            expires_at: now + Duration::seconds(response.expires_in),
        }
    }

    /// Whether the token must be refreshed before use
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Authorization header value, e.g. `bearer abc123`
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

/// Wire format of the token endpoint response
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token_type: String,
    pub access_token: String,
    /// Token lifetime in seconds, relative to the response
    pub expires_in: i64,
}

/// One submission parsed from a listing page
#[derive(Debug, Clone)]
pub struct ListingItem {
    /// Opaque reddit "thing" id, e.g. `t3_abc123`
    pub name: String,
    /// Submission creation time
    pub created_utc: DateTime<Utc>,
    /// Outbound link, absent for self posts and malformed items
    pub url: Option<String>,
}

/// One parsed page of the listing feed
#[derive(Debug)]
pub struct ListingPage {
    pub items: Vec<ListingItem>,
    /// Cursor for the next page; absent signals end-of-feed
    pub after: Option<String>,
}

impl ListingPage {
    /// Parses a raw listing response body
    pub fn parse(body: &str) -> serde_json::Result<Self> {
        let envelope: ListingEnvelope = serde_json::from_str(body)?;
        let items = envelope
            .data
            .children
            .into_iter()
            .map(|child| ListingItem {
                name: child.data.name,
                created_utc: timestamp_from_secs(child.data.created_utc),
                url: child.data.url,
            })
            .collect();
        Ok(Self {
            items,
            after: envelope.data.after,
        })
    }
}

/// Converts a fractional Unix timestamp to a UTC datetime, clamping values
/// outside the representable range to the epoch
fn timestamp_from_secs(secs: f64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs as i64, 0).unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

// Wire structs for the listing envelope. Reddit nests every object under a
// `data` key.

#[derive(Debug, Deserialize)]
struct ListingEnvelope {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    children: Vec<ListingChild>,
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListingChild {
    data: ListingChildData,
}

#[derive(Debug, Deserialize)]
struct ListingChildData {
    name: String,
    created_utc: f64,
    #[serde(default)]
    url: Option<String>,
}
