//! Document export settings.

use std::path::PathBuf;

pub const DEFAULT_CREDENTIALS_FILE: &str = "credentials.json";
pub const DEFAULT_TOKEN_FILE: &str = "token.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocsConfig {
    /// OAuth client secrets (`installed` or `web` section) used to complete a token file
    /// that lacks `client_id` / `client_secret`.
    pub credentials_file: PathBuf,
    /// Authorized-user token file holding the refresh token.
    pub token_file: PathBuf,
    pub template_doc_id: Option<String>,
    /// Default recipients when a request names none.
    pub share_emails: Vec<String>,
}

impl DocsConfig {
    /// Resolves settings from already-read environment values.
    pub fn from_env_values(
        credentials_file: Option<String>,
        token_file: Option<String>,
        template_doc_id: Option<String>,
        share_emails: Option<String>,
    ) -> Self {
        let path_or = |value: Option<String>, default: &str| {
            PathBuf::from(
                value
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
                    .unwrap_or_else(|| default.to_string()),
            )
        };

        Self {
            credentials_file: path_or(credentials_file, DEFAULT_CREDENTIALS_FILE),
            token_file: path_or(token_file, DEFAULT_TOKEN_FILE),
            template_doc_id: template_doc_id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
            share_emails: parse_email_list(share_emails.as_deref().unwrap_or_default()),
        }
    }
}

/// Splits a comma-separated recipient list, dropping blanks.
pub fn parse_email_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .map(str::to_string)
        .collect()
}
