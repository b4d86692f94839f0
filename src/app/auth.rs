//! OAuth2 session management for the reddit API
//!
//! Owns the current bearer token and its expiry. The initial token comes from
//! a client-credentials grant; renewals use the refresh grant with the
//! previous access token as the refresh credential. Callers run
//! `ensure_valid` before every authenticated request and `refresh` once when
//! a request comes back 401/403.

use chrono::Utc;
use reqwest::Client;

use crate::app::models::{AuthToken, TokenResponse};
use crate::constants::reddit;
use crate::errors::{AuthError, AuthResult};

/// OAuth2 session holding the current bearer token
#[derive(Debug)]
pub struct AuthSession {
    client: Client,
    token_url: String,
    client_id: String,
    secret: String,
    user_agent: String,
    token: Option<AuthToken>,
}

impl AuthSession {
    /// Creates a session against the production reddit token endpoint
    pub fn new(client: Client, secret: String) -> Self {
        Self::with_endpoint(
            client,
            reddit::TOKEN_URL.to_string(),
            reddit::CLIENT_ID.to_string(),
            secret,
            reddit::api_user_agent(),
        )
    }

    /// Creates a session against an arbitrary token endpoint (used by tests)
    pub fn with_endpoint(
        client: Client,
        token_url: String,
        client_id: String,
        secret: String,
        user_agent: String,
    ) -> Self {
        Self {
            client,
            token_url,
            client_id,
            secret,
            user_agent,
            token: None,
        }
    }

    /// Performs the initial client-credentials token request
    ///
    /// # Errors
    ///
    /// Returns `AuthError` on transport failure or a non-success status from
    /// the token endpoint; both are fatal for the run.
    pub async fn acquire(&mut self) -> AuthResult<()> {
        tracing::info!("Requesting authentication token");
        let token = self
            .request_token(&[("grant_type", "client_credentials")])
            .await?;
        self.token = Some(token);
        Ok(())
    }

    /// Refreshes the token, using the previous access token as the refresh
    /// credential
    ///
    /// Also the forced-refresh path when a request using this session comes
    /// back 401/403: the caller retries its request exactly once afterwards.
    pub async fn refresh(&mut self) -> AuthResult<()> {
        tracing::info!("Refreshing authentication token");
        let refresh_token = self
            .token
            .as_ref()
            .map(|token| token.access_token.clone())
            .ok_or(AuthError::NotAuthenticated)?;
        let token = self
            .request_token(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", &refresh_token),
            ])
            .await?;
        self.token = Some(token);
        Ok(())
    }

    /// Acquires or refreshes so that the current token is valid at send time
    ///
    /// A no-op while the token is unexpired, so calling this before every
    /// request performs at most one refresh per expiry.
    pub async fn ensure_valid(&mut self) -> AuthResult<()> {
        match &self.token {
            None => self.acquire().await,
            Some(token) if token.is_expired(Utc::now()) => self.refresh().await,
            Some(_) => Ok(()),
        }
    }

    /// Authorization header value for the current token
    pub fn authorization(&self) -> AuthResult<String> {
        self.token
            .as_ref()
            .map(AuthToken::authorization_header)
            .ok_or(AuthError::NotAuthenticated)
    }

    async fn request_token(&self, params: &[(&str, &str)]) -> AuthResult<AuthToken> {
        let response = self
            .client
            .post(&self.token_url)
            .basic_auth(&self.client_id, Some(&self.secret))
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .form(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::TokenRejected {
                status: status.as_u16(),
            });
        }

        let parsed: TokenResponse = response.json().await?;
        Ok(AuthToken::from_response(parsed, Utc::now()))
    }
}
