//! # Jasper Core
//!
//! Core business logic for the Jasper content-brief service.
//!
//! This crate contains pure data operations and flat-file profile management:
//! - Client profile parsing with lenient handling of optional fields
//! - The profile store: a directory of JSON files loaded into an immutable snapshot
//! - Client-context synthesis for LLM prompts
//! - Prompt construction and content-brief parsing
//! - Brief generation against an abstract completion client
//!
//! **No API concerns**: authentication, HTTP servers and vendor SDK calls belong in `api-rest`,
//! `api-shared`, `jasper-llm` or `jasper-docs`.

pub mod brief;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod generator;
pub mod profile;
pub mod prompt;
pub mod store;
pub mod validation;

pub use brief::{parse_brief_reply, ContentBrief, H2Section};
pub use config::CoreConfig;
pub use constants::DEFAULT_PROFILES_DIR;
pub use context::synthesize;
pub use error::{CoreError, CoreResult};
pub use generator::{
    BriefGenerator, CompletionClient, CompletionRequest, ContentRequest, GenerationOutcome,
};
pub use profile::{
    BrandDifferentiators, ClientProfile, ContentPreferences, MessagingRules, TargetAudience,
};
pub use prompt::{BasicClientInfo, PromptContext};
pub use store::{
    ClientSummary, LoadReport, ProfileSnapshot, ProfileStats, ProfileStore, SkippedProfile,
};
