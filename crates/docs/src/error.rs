#[derive(Debug, thiserror::Error)]
pub enum DocsError {
    #[error("failed to read Google credentials file: {0}")]
    CredentialsRead(std::io::Error),
    #[error("invalid Google credentials file: {0}")]
    CredentialsFormat(serde_json::Error),
    #[error("Google credentials are incomplete: missing {0}")]
    CredentialsIncomplete(&'static str),
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("request to Google failed: {0}")]
    Request(reqwest::Error),
    #[error("{operation} failed with {status}: {body}")]
    Status {
        operation: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to decode Google response: {0}")]
    Decode(reqwest::Error),
    #[error("Google response is missing '{0}'")]
    MissingField(&'static str),
}

pub type DocsResult<T> = std::result::Result<T, DocsError>;
