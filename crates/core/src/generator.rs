//! Brief generation.
//!
//! [`BriefGenerator`] ties the profile store, context synthesis and prompt builders to a
//! [`CompletionClient`]. The client is a trait so the HTTP implementation lives in
//! `jasper-llm` and tests can substitute a canned reply.

use crate::brief::{parse_brief_reply, ContentBrief};
use crate::constants::{GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE};
use crate::context::synthesize;
use crate::prompt::{build_system_prompt, build_user_prompt, BasicClientInfo, PromptContext};
use crate::store::ProfileStore;
use crate::{CoreError, CoreResult};
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

/// A single chat-completion call: system instruction plus user prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Something that can turn a [`CompletionRequest`] into reply text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Returns the text of the first completion choice.
    ///
    /// # Errors
    ///
    /// Implementations report transport and upstream failures as `CoreError::Completion`.
    async fn complete(&self, request: &CompletionRequest) -> CoreResult<String>;
}

/// A request for one content brief.
#[derive(Debug, Clone, Default)]
pub struct ContentRequest {
    pub blog_topic: String,
    pub client_id: Option<String>,
    pub client_name: String,
    pub specialty: String,
    pub location: String,
}

/// Result of a generation attempt. Failures are data, not errors.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub success: bool,
    pub content: Option<ContentBrief>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub used_client_profile: bool,
}

impl GenerationOutcome {
    fn succeeded(content: ContentBrief, message: String, used_client_profile: bool) -> Self {
        Self {
            success: true,
            content: Some(content),
            message: Some(message),
            error: None,
            used_client_profile,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            content: None,
            message: None,
            error: Some(error),
            used_client_profile: false,
        }
    }
}

pub struct BriefGenerator {
    store: Arc<ProfileStore>,
    client: Option<Arc<dyn CompletionClient>>,
}

impl BriefGenerator {
    /// Creates a generator. `client` is `None` when no API key is configured; every
    /// generation then fails with a clear message instead of attempting a call.
    pub fn new(store: Arc<ProfileStore>, client: Option<Arc<dyn CompletionClient>>) -> Self {
        Self { store, client }
    }

    pub fn has_completion_client(&self) -> bool {
        self.client.is_some()
    }

    pub fn store(&self) -> &Arc<ProfileStore> {
        &self.store
    }

    /// Builds the prompts for `request` against the current profile snapshot.
    ///
    /// # Returns
    ///
    /// The completion request, the client info used and whether a stored profile
    /// contributed context.
    pub fn prepare(&self, request: &ContentRequest) -> (CompletionRequest, BasicClientInfo, bool) {
        let snapshot = self.store.snapshot();
        let profile = request
            .client_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .and_then(|id| snapshot.get(id));

        let mut client =
            BasicClientInfo::from_request(&request.client_name, &request.specialty, &request.location);
        if let Some(profile) = profile {
            client = client.overlay(profile);
        }

        let client_context = synthesize(profile);
        let ctx = PromptContext {
            topic: &request.blog_topic,
            client: &client,
            client_context: &client_context,
        };
        let has_context = ctx.has_client_context();

        let completion = CompletionRequest {
            system: build_system_prompt(has_context),
            user: build_user_prompt(&ctx),
            temperature: GENERATION_TEMPERATURE,
            max_tokens: GENERATION_MAX_TOKENS,
        };
        (completion, client, has_context)
    }

    /// Generates a brief. Never fails: upstream and parse problems are reported in the
    /// returned outcome.
    pub async fn generate(&self, request: &ContentRequest) -> GenerationOutcome {
        let Some(completion_client) = self.client.as_ref() else {
            return GenerationOutcome::failed("OpenAI API key is not configured".to_string());
        };

        let (completion, client, used_profile) = self.prepare(request);
        tracing::info!(
            "generating brief for '{}' (client: {}, profile context: {})",
            request.blog_topic.trim(),
            client.name,
            used_profile
        );

        let reply = match completion_client.complete(&completion).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("completion request failed: {}", e);
                return GenerationOutcome::failed(format!("Jasper encountered an issue: {e}"));
            }
        };
        tracing::debug!("raw completion reply: {}", reply);

        match parse_brief_reply(&reply) {
            Ok(brief) => {
                let message = if used_profile {
                    format!(
                        "Jasper created a deeply personalized blog assignment for {} using comprehensive client intelligence!",
                        client.name
                    )
                } else {
                    "Jasper created your enhanced blog assignment with detailed content guidance!"
                        .to_string()
                };
                GenerationOutcome::succeeded(brief, message, used_profile)
            }
            Err(CoreError::BriefParse(e)) => {
                tracing::warn!("could not parse completion reply as a brief: {}", e);
                GenerationOutcome::failed(format!(
                    "Jasper got confused parsing the response. JSON Error: {e}"
                ))
            }
            Err(e) => GenerationOutcome::failed(format!("Jasper encountered an issue: {e}")),
        }
    }
}
