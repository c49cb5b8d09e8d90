#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(reqwest::Error),
    #[error("request to completion API failed: {0}")]
    Request(reqwest::Error),
    #[error("completion API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("failed to decode completion response: {0}")]
    Decode(reqwest::Error),
    #[error("completion response contained no choices")]
    EmptyResponse,
}

pub type LlmResult<T> = std::result::Result<T, LlmError>;

impl From<LlmError> for jasper_core::CoreError {
    fn from(err: LlmError) -> Self {
        jasper_core::CoreError::Completion(Box::new(err))
    }
}
