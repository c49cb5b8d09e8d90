//! OAuth access tokens for the Google APIs.
//!
//! The service runs unattended, so it never performs the interactive consent flow. It reads an
//! "authorized user" token file produced out of band and exchanges its refresh token for
//! short-lived access tokens, caching each one until shortly before it expires.

use crate::{DocsError, DocsResult};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tokio::sync::Mutex;

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Seconds shaved off each token lifetime so a token is never used at the edge of expiry.
const EXPIRY_MARGIN_SECS: i64 = 60;

/// Contents of an authorized-user token file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorizedUser {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_secret: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub token_uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClientSecrets {
    #[serde(alias = "web")]
    installed: ClientSecretsSection,
}

#[derive(Debug, Deserialize)]
struct ClientSecretsSection {
    client_id: String,
    client_secret: String,
}

impl AuthorizedUser {
    /// Reads the token file, filling a missing client id/secret from the client secrets file
    /// when one exists.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `DocsError::CredentialsRead` / `DocsError::CredentialsFormat` if a file cannot be read
    ///   or parsed,
    /// - `DocsError::CredentialsIncomplete` if no refresh token or client id/secret is available.
    pub fn load(token_file: &Path, credentials_file: &Path) -> DocsResult<Self> {
        let contents = fs::read_to_string(token_file).map_err(DocsError::CredentialsRead)?;
        let mut user: AuthorizedUser =
            serde_json::from_str(&contents).map_err(DocsError::CredentialsFormat)?;

        if (user.client_id.is_none() || user.client_secret.is_none()) && credentials_file.exists()
        {
            let contents =
                fs::read_to_string(credentials_file).map_err(DocsError::CredentialsRead)?;
            let secrets: ClientSecrets =
                serde_json::from_str(&contents).map_err(DocsError::CredentialsFormat)?;
            user.client_id.get_or_insert(secrets.installed.client_id);
            user.client_secret
                .get_or_insert(secrets.installed.client_secret);
        }

        user.validate()?;
        Ok(user)
    }

    fn validate(&self) -> DocsResult<()> {
        fn present(value: &Option<String>) -> bool {
            value.as_deref().is_some_and(|v| !v.trim().is_empty())
        }

        if !present(&self.refresh_token) {
            return Err(DocsError::CredentialsIncomplete("refresh_token"));
        }
        if !present(&self.client_id) {
            return Err(DocsError::CredentialsIncomplete("client_id"));
        }
        if !present(&self.client_secret) {
            return Err(DocsError::CredentialsIncomplete("client_secret"));
        }
        Ok(())
    }

    fn token_uri(&self) -> &str {
        self.token_uri.as_deref().unwrap_or(DEFAULT_TOKEN_URI)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Hands out access tokens, refreshing when the cached one is about to expire.
#[derive(Debug)]
pub struct TokenSource {
    user: AuthorizedUser,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(user: AuthorizedUser) -> Self {
        Self {
            user,
            cached: Mutex::new(None),
        }
    }

    /// Returns a valid access token.
    ///
    /// # Errors
    ///
    /// Returns a `DocsError` if the refresh request fails or the response lacks a token.
    pub async fn access_token(&self, http: &Client) -> DocsResult<String> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref() {
            if token.expires_at > Utc::now() {
                return Ok(token.value.clone());
            }
        }

        let token = self.refresh(http).await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn refresh(&self, http: &Client) -> DocsResult<CachedToken> {
        tracing::debug!("refreshing Google access token");

        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", self.user.client_id.as_deref().unwrap_or_default()),
            (
                "client_secret",
                self.user.client_secret.as_deref().unwrap_or_default(),
            ),
            (
                "refresh_token",
                self.user.refresh_token.as_deref().unwrap_or_default(),
            ),
        ];

        let response = http
            .post(self.user.token_uri())
            .form(&params)
            .send()
            .await
            .map_err(DocsError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocsError::Status {
                operation: "token refresh",
                status,
                body,
            });
        }

        let parsed: TokenResponse = response.json().await.map_err(DocsError::Decode)?;
        let lifetime = parsed.expires_in.unwrap_or(3600) - EXPIRY_MARGIN_SECS;
        Ok(CachedToken {
            value: parsed.access_token,
            expires_at: Utc::now() + Duration::seconds(lifetime.max(0)),
        })
    }
}
