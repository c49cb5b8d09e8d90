//! # Jasper LLM
//!
//! Chat-completion client for OpenAI-compatible APIs, implementing
//! [`jasper_core::CompletionClient`].

pub mod config;
pub mod error;
pub mod openai;

pub use config::OpenAiConfig;
pub use error::{LlmError, LlmResult};
pub use openai::OpenAiClient;
