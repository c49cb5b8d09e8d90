//! Request and response bodies for the REST API.
//!
//! Core types (briefs, profiles, statistics) are carried as-is and documented as free-form
//! objects in the OpenAPI schema.

use jasper_core::{ClientSummary, ContentBrief, ContentRequest, GenerationOutcome, ProfileStats};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Generic failure body: `{success: false, error}`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub success: bool,
    pub error: String,
}

impl ErrorRes {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct GenerateContentReq {
    pub blog_topic: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub specialty: String,
    #[serde(default)]
    pub location: String,
}

impl From<GenerateContentReq> for ContentRequest {
    fn from(req: GenerateContentReq) -> Self {
        ContentRequest {
            blog_topic: req.blog_topic,
            client_id: req.client_id,
            client_name: req.client_name,
            specialty: req.specialty,
            location: req.location,
        }
    }
}

/// Outcome of `POST /generate-content`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GenerateContentRes {
    pub success: bool,
    #[schema(value_type = Option<Object>)]
    pub content: Option<ContentBrief>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub used_client_profile: bool,
}

impl From<GenerationOutcome> for GenerateContentRes {
    fn from(outcome: GenerationOutcome) -> Self {
        Self {
            success: outcome.success,
            content: outcome.content,
            message: outcome.message,
            error: outcome.error,
            used_client_profile: outcome.used_client_profile,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CreateGoogleDocReq {
    pub blog_topic: String,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub specialty: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub share_emails: Option<Vec<String>>,
    /// A previously generated brief; generated on demand when absent.
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub content: Option<ContentBrief>,
}

impl CreateGoogleDocReq {
    pub fn content_request(&self) -> ContentRequest {
        ContentRequest {
            blog_topic: self.blog_topic.clone(),
            client_id: self.client_id.clone(),
            client_name: self.client_name.clone(),
            specialty: self.specialty.clone(),
            location: self.location.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateGoogleDocRes {
    pub success: bool,
    pub message: String,
    pub doc_url: String,
    pub doc_title: String,
    pub doc_id: String,
    pub shared_with: Vec<String>,
    pub used_template: bool,
    pub replacements_made: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateTemplateRes {
    pub success: bool,
    pub message: String,
    pub template_doc_id: String,
    pub template_url: String,
    pub instructions: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GoogleDriveStatusRes {
    pub enabled: bool,
    pub message: String,
    pub template_configured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub connection_test: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JasperStatusRes {
    /// `ready` or `needs_api_key`.
    pub status: String,
    pub message: String,
    pub personality: String,
    pub expertise: String,
    pub client_profiles_loaded: usize,
    /// `ENHANCED` when at least one profile is loaded, otherwise `BASIC`.
    pub intelligence_level: String,
    pub google_drive_enabled: bool,
    pub template_configured: bool,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ListClientsRes {
    pub success: bool,
    #[schema(value_type = Vec<Object>)]
    pub clients: Vec<ClientSummary>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClientRes {
    pub success: bool,
    /// The stored profile exactly as saved.
    #[schema(value_type = Object)]
    pub client: Value,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AddClientRes {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReloadClientsRes {
    pub success: bool,
    pub loaded: usize,
    /// Files that could not be loaded, with the reason.
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClientStatsRes {
    pub success: bool,
    #[schema(value_type = Object)]
    pub stats: ProfileStats,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ClientContextRes {
    pub client_id: String,
    pub found: bool,
    pub context: String,
}
