#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to create profile directory: {0}")]
    ProfileDirCreation(std::io::Error),
    #[error("failed to read profile directory: {0}")]
    ProfileDirRead(std::io::Error),
    #[error("failed to read profile file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write profile file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize profile: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize profile: {0}")]
    Deserialization(serde_json::Error),
    #[error("profile is not a JSON object")]
    ProfileNotObject,
    #[error("profile is missing a non-empty 'client_id'")]
    MissingClientId,
    #[error("profile validation failed: {}", .0.join("; "))]
    ProfileValidation(Vec<String>),
    #[error("client profile '{0}' already exists")]
    DuplicateClient(String),
    #[error("failed to parse generated brief: {0}")]
    BriefParse(serde_json::Error),
    #[error("completion request failed: {0}")]
    Completion(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
