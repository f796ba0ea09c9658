use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;
use url::Url;

/// Lifetime assumed when the token endpoint omits `expires_in`.
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(300);

/// Upper bound on the honoured `expires_in`.
const MAX_TOKEN_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Longest error body echoed into a [`TokenError`].
const ERROR_PREVIEW_LEN: usize = 256;

/// Errors returned by the `OAuth2` client credentials flow.
///
/// No variant ever formats the client secret or an access token.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TokenError {
    /// Transport failure while talking to the token endpoint.
    #[error("OAuth2 token request failed: {0}")]
    Http(String),

    /// The token endpoint answered with a non-2xx status.
    #[error("OAuth2 token HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The token endpoint returned an unparseable or incomplete response.
    #[error("invalid token response: {0}")]
    InvalidResponse(String),

    /// The token endpoint returned a `token_type` that is not `Bearer`.
    #[error("unsupported token type: {0}")]
    UnsupportedTokenType(String),

    #[error("OAuth2 config error: {0}")]
    ConfigError(String),
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    token_type: Option<String>,
}

struct CachedToken {
    access_token: SecretString,
    refresh_at: Instant,
}

/// Client-credentials token source with an in-memory cache.
///
/// One token is shared by all requests. Refresh is serialized behind an async
/// mutex; callers that find a stale token wait for a single exchange.
pub struct TokenProvider {
    http: reqwest::Client,
    token_endpoint: Url,
    client_id: String,
    client_secret: SecretString,
    refresh_offset: Duration,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    /// # Errors
    /// Returns [`TokenError::ConfigError`] if the base URL cannot carry a path.
    pub fn new(
        http: reqwest::Client,
        api_base: &Url,
        client_id: impl Into<String>,
        client_secret: SecretString,
        refresh_offset: Duration,
    ) -> Result<Self, TokenError> {
        let mut token_endpoint = api_base.clone();
        token_endpoint
            .path_segments_mut()
            .map_err(|()| TokenError::ConfigError(format!("{api_base} cannot be a base URL")))?
            .pop_if_empty()
            .extend(["v1", "oauth2", "token"]);

        Ok(Self {
            http,
            token_endpoint,
            client_id: client_id.into(),
            client_secret,
            refresh_offset,
            cached: Mutex::new(None),
        })
    }

    /// Current access token, exchanging credentials when the cached one is
    /// missing or due for refresh.
    ///
    /// # Errors
    /// Returns [`TokenError`] if the exchange fails.
    pub async fn access_token(&self) -> Result<SecretString, TokenError> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref()
            && Instant::now() < token.refresh_at
        {
            return Ok(token.access_token.clone());
        }

        let fresh = self.request_token().await?;
        let access_token = fresh.access_token.clone();
        *cached = Some(fresh);
        Ok(access_token)
    }

    /// Drop the cached token so the next call exchanges credentials again.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }

    async fn request_token(&self) -> Result<CachedToken, TokenError> {
        tracing::debug!(endpoint = %self.token_endpoint, "requesting PayPal access token");

        let response = self
            .http
            .post(self.token_endpoint.clone())
            .basic_auth(&self.client_id, Some(self.client_secret.expose_secret()))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| TokenError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TokenError::Rejected {
                status: status.as_u16(),
                body: preview(&body),
            });
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| TokenError::InvalidResponse(e.to_string()))?;

        if let Some(ref tt) = token.token_type
            && !tt.eq_ignore_ascii_case("bearer")
        {
            return Err(TokenError::UnsupportedTokenType(tt.clone()));
        }
        if token.access_token.is_empty() {
            return Err(TokenError::InvalidResponse("empty access_token".to_owned()));
        }

        let lifetime = token
            .expires_in
            .map_or(DEFAULT_TOKEN_TTL, Duration::from_secs)
            .min(MAX_TOKEN_TTL);
        let refresh_in = refresh_delay(lifetime, self.refresh_offset);
        tracing::info!(
            expires_in_secs = lifetime.as_secs(),
            refresh_in_secs = refresh_in.as_secs(),
            "obtained PayPal access token"
        );

        Ok(CachedToken {
            access_token: SecretString::from(token.access_token),
            refresh_at: Instant::now() + refresh_in,
        })
    }
}

/// Refresh `offset` before expiry; short-lived tokens refresh at half-life.
fn refresh_delay(lifetime: Duration, offset: Duration) -> Duration {
    if offset < lifetime {
        lifetime - offset
    } else {
        lifetime / 2
    }
}

fn preview(body: &str) -> String {
    match body.char_indices().nth(ERROR_PREVIEW_LEN) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_owned(),
    }
}
