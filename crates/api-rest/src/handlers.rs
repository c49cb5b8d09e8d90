//! Request handlers for the REST API.

use crate::state::AppState;
use api_shared::dto::{
    AddClientRes, ClientContextRes, ClientRes, ClientStatsRes, CreateGoogleDocReq,
    CreateGoogleDocRes, CreateTemplateRes, ErrorRes, GenerateContentReq, GenerateContentRes,
    GoogleDriveStatusRes, HealthRes, JasperStatusRes, ListClientsRes, ReloadClientsRes,
};
use api_shared::HealthService;
use axum::{
    extract::{Path as AxumPath, State},
    http::StatusCode,
    response::Json,
};
use jasper_core::{ContentRequest, CoreError};
use jasper_docs::ExportRequest;
use serde_json::{json, Value};

/// Failure response carrying a `{success: false, error}` body.
pub type ApiError = (StatusCode, Json<ErrorRes>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorRes::new(message)))
}

const EMPTY_TOPIC: &str = "Jasper needs a blog topic to work with!";
const DRIVE_NOT_CONFIGURED: &str = "Google Drive not configured on this server.";

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Unauthenticated; used by monitoring and load balancer health checks.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/clients",
    responses(
        (status = 200, description = "Loaded client profiles", body = ListClientsRes),
        (status = 401, description = "Missing or invalid team credentials", body = ErrorRes)
    )
)]
/// List every loaded client profile
///
/// # Returns
/// * `Json<ListClientsRes>` - One summary per profile, ordered by name
#[axum::debug_handler]
pub async fn list_clients(State(state): State<AppState>) -> Json<ListClientsRes> {
    let clients = state.store.snapshot().summaries();
    Json(ListClientsRes {
        success: true,
        total: clients.len(),
        clients,
    })
}

#[utoipa::path(
    get,
    path = "/clients/{id}",
    params(("id" = String, Path, description = "Client id")),
    responses(
        (status = 200, description = "The stored profile", body = ClientRes),
        (status = 404, description = "Unknown client", body = ErrorRes)
    )
)]
/// Fetch one client profile as stored on disk
///
/// # Errors
/// Returns `404 Not Found` if no profile with that id is loaded.
#[axum::debug_handler]
pub async fn get_client(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<ClientRes>, ApiError> {
    let snapshot = state.store.snapshot();
    let profile = snapshot
        .get(&id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Client '{id}' not found")))?;
    Ok(Json(ClientRes {
        success: true,
        client: Value::Object(profile.raw().clone()),
    }))
}

#[utoipa::path(
    get,
    path = "/clients/{id}/context",
    params(("id" = String, Path, description = "Client id")),
    responses(
        (status = 200, description = "Synthesised context block; empty for unknown clients", body = ClientContextRes)
    )
)]
/// Show the context block that would be injected into a prompt for this client
#[axum::debug_handler]
pub async fn client_context(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Json<ClientContextRes> {
    let snapshot = state.store.snapshot();
    Json(ClientContextRes {
        found: snapshot.contains(&id),
        context: snapshot.client_context(&id),
        client_id: id,
    })
}

#[utoipa::path(
    post,
    path = "/clients",
    request_body(content = Object, description = "Client profile JSON object with a `client_id`", content_type = "application/json"),
    responses(
        (status = 201, description = "Profile saved", body = AddClientRes),
        (status = 400, description = "Profile failed validation", body = AddClientRes),
        (status = 409, description = "Client id already exists", body = AddClientRes),
        (status = 500, description = "Profile could not be saved", body = AddClientRes)
    )
)]
/// Validate, save and index a new client profile
///
/// # Arguments
/// * `value` - The profile object; it is stored verbatim as `<client_id>.json`
///
/// # Errors
/// Returns:
/// - `400 Bad Request` with every validation issue,
/// - `409 Conflict` if the client id is already loaded,
/// - `500 Internal Server Error` if the file cannot be written.
#[axum::debug_handler]
pub async fn add_client(
    State(state): State<AppState>,
    Json(value): Json<Value>,
) -> (StatusCode, Json<AddClientRes>) {
    let failure = |status: StatusCode, issues: Vec<String>, error: String| {
        (
            status,
            Json(AddClientRes {
                success: false,
                client_id: None,
                issues,
                error: Some(error),
            }),
        )
    };

    match state.store.add(value) {
        Ok(profile) => (
            StatusCode::CREATED,
            Json(AddClientRes {
                success: true,
                client_id: Some(profile.id),
                issues: Vec::new(),
                error: None,
            }),
        ),
        Err(CoreError::ProfileValidation(issues)) => failure(
            StatusCode::BAD_REQUEST,
            issues,
            "Client profile failed validation".into(),
        ),
        Err(e @ (CoreError::ProfileNotObject | CoreError::MissingClientId)) => {
            failure(StatusCode::BAD_REQUEST, Vec::new(), e.to_string())
        }
        Err(e @ CoreError::DuplicateClient(_)) => {
            failure(StatusCode::CONFLICT, Vec::new(), e.to_string())
        }
        Err(e) => {
            tracing::error!("Add client error: {:?}", e);
            failure(
                StatusCode::INTERNAL_SERVER_ERROR,
                Vec::new(),
                "Internal error".into(),
            )
        }
    }
}

#[utoipa::path(
    post,
    path = "/clients/reload",
    responses(
        (status = 200, description = "Profiles reloaded", body = ReloadClientsRes),
        (status = 500, description = "Profile directory could not be read", body = ErrorRes)
    )
)]
/// Rebuild the profile index from disk
///
/// # Errors
/// Returns `500 Internal Server Error` if the profile directory cannot be read; the previous
/// index stays in effect.
#[axum::debug_handler]
pub async fn reload_clients(
    State(state): State<AppState>,
) -> Result<Json<ReloadClientsRes>, ApiError> {
    match state.store.reload() {
        Ok((loaded, skipped)) => {
            tracing::info!("reloaded {} client profiles", loaded);
            Ok(Json(ReloadClientsRes {
                success: true,
                loaded,
                skipped: skipped
                    .into_iter()
                    .map(|s| format!("{}: {}", s.path.display(), s.reason))
                    .collect(),
            }))
        }
        Err(e) => {
            tracing::error!("Reload clients error: {:?}", e);
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal error"))
        }
    }
}

#[utoipa::path(
    get,
    path = "/clients/stats",
    responses(
        (status = 200, description = "Profile statistics", body = ClientStatsRes)
    )
)]
#[axum::debug_handler]
pub async fn client_stats(State(state): State<AppState>) -> Json<ClientStatsRes> {
    Json(ClientStatsRes {
        success: true,
        stats: state.store.snapshot().stats(),
    })
}

#[utoipa::path(
    post,
    path = "/generate-content",
    request_body = GenerateContentReq,
    responses(
        (status = 200, description = "Generation outcome; upstream failures have success=false", body = GenerateContentRes),
        (status = 400, description = "Empty blog topic", body = ErrorRes)
    )
)]
/// Generate a content brief for a blog topic
///
/// When `client_id` names a loaded profile, its synthesised context is included in the prompt
/// and its identity fields override the request's.
///
/// # Errors
/// Returns `400 Bad Request` if the blog topic is empty. Completion and parse failures are
/// reported in the body with `200 OK`.
#[axum::debug_handler]
pub async fn generate_content(
    State(state): State<AppState>,
    Json(req): Json<GenerateContentReq>,
) -> Result<Json<GenerateContentRes>, ApiError> {
    if req.blog_topic.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, EMPTY_TOPIC));
    }

    let request = ContentRequest::from(req);
    let outcome = state.generator.generate(&request).await;
    Ok(Json(outcome.into()))
}

#[utoipa::path(
    post,
    path = "/create-google-doc",
    request_body = CreateGoogleDocReq,
    responses(
        (status = 200, description = "Document created, or a failure with success=false", body = CreateGoogleDocRes),
        (status = 400, description = "Empty blog topic", body = ErrorRes)
    )
)]
/// Generate (unless supplied) a brief and export it as a shared Google Doc
///
/// Recipients default to `CONTENT_TEAM_EMAILS` when the request names none.
///
/// # Errors
/// Missing export configuration is checked first and reported in an `ErrorRes` body with
/// `200 OK`, as are generation and export failures. An empty blog topic on a configured server
/// returns `400 Bad Request`.
#[axum::debug_handler]
pub async fn create_google_doc(
    State(state): State<AppState>,
    Json(req): Json<CreateGoogleDocReq>,
) -> Result<Json<CreateGoogleDocRes>, ApiError> {
    let Some(exporter) = state.exporter.clone() else {
        return Err(api_error(StatusCode::OK, DRIVE_NOT_CONFIGURED));
    };
    if req.blog_topic.trim().is_empty() {
        return Err(api_error(StatusCode::BAD_REQUEST, EMPTY_TOPIC));
    }

    let request = req.content_request();
    let brief = match req.content {
        Some(brief) => brief,
        None => {
            let outcome = state.generator.generate(&request).await;
            match outcome.content {
                Some(brief) if outcome.success => brief,
                _ => {
                    let reason = outcome.error.unwrap_or_else(|| "unknown error".into());
                    return Err(api_error(
                        StatusCode::OK,
                        format!("Content generation failed: {reason}"),
                    ));
                }
            }
        }
    };

    let client = request
        .client_id
        .as_deref()
        .and_then(|id| state.store.snapshot().get(id).cloned());
    let share_emails = match req.share_emails {
        Some(emails) if !emails.is_empty() => emails,
        _ => state.default_share_emails.as_ref().clone(),
    };

    let export = ExportRequest {
        brief,
        blog_topic: request.blog_topic.clone(),
        client,
        share_emails,
    };
    match exporter.export(&export).await {
        Ok(doc) => Ok(Json(CreateGoogleDocRes {
            success: true,
            message: format!("Jasper created Google Doc: {}", doc.doc_title),
            doc_url: doc.doc_url,
            doc_title: doc.doc_title,
            doc_id: doc.doc_id,
            shared_with: export.share_emails,
            used_template: doc.used_template,
            replacements_made: doc.replacements_made,
        })),
        Err(e) => {
            tracing::error!("Create Google Doc error: {:?}", e);
            Err(api_error(
                StatusCode::OK,
                format!("Failed to create Google Doc: {e}"),
            ))
        }
    }
}

#[utoipa::path(
    post,
    path = "/create-template",
    responses(
        (status = 200, description = "Template document created", body = CreateTemplateRes),
        (status = 500, description = "Template could not be created", body = ErrorRes),
        (status = 503, description = "Google export not configured", body = ErrorRes)
    )
)]
/// Create the master template document used by template-based exports
///
/// # Errors
/// Returns:
/// - `503 Service Unavailable` if Google export is not configured,
/// - `500 Internal Server Error` if the document cannot be created.
#[axum::debug_handler]
pub async fn create_template(
    State(state): State<AppState>,
) -> Result<Json<CreateTemplateRes>, ApiError> {
    let exporter = state
        .exporter
        .clone()
        .ok_or_else(|| api_error(StatusCode::SERVICE_UNAVAILABLE, DRIVE_NOT_CONFIGURED))?;

    match exporter.create_template().await {
        Ok(template) => Ok(Json(CreateTemplateRes {
            success: true,
            message: "Jasper created a master template document".into(),
            instructions: format!(
                "Set JASPER_TEMPLATE_DOC_ID={} to use this template for new assignments",
                template.template_doc_id
            ),
            template_doc_id: template.template_doc_id,
            template_url: template.template_url,
        })),
        Err(e) => {
            tracing::error!("Create template error: {:?}", e);
            Err(api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to create template: {e}"),
            ))
        }
    }
}

#[utoipa::path(
    get,
    path = "/google-drive-status",
    responses(
        (status = 200, description = "Export availability and connection test", body = GoogleDriveStatusRes)
    )
)]
#[axum::debug_handler]
pub async fn google_drive_status(State(state): State<AppState>) -> Json<GoogleDriveStatusRes> {
    let Some(exporter) = state.exporter.clone() else {
        return Json(GoogleDriveStatusRes {
            enabled: false,
            message: DRIVE_NOT_CONFIGURED.into(),
            template_configured: false,
            connection_test: None,
        });
    };

    let connection_test = match exporter.test_connection().await {
        Ok(status) => json!({
            "success": true,
            "can_create_docs": status.can_create_docs,
            "sample_file": status.sample_file,
        }),
        Err(e) => {
            tracing::warn!("Google Drive connection test failed: {}", e);
            json!({ "success": false, "error": e.to_string() })
        }
    };

    Json(GoogleDriveStatusRes {
        enabled: true,
        message: "Google Drive integration is configured".into(),
        template_configured: exporter.template_configured(),
        connection_test: Some(connection_test),
    })
}

#[utoipa::path(
    get,
    path = "/jasper-status",
    responses(
        (status = 200, description = "Readiness summary", body = JasperStatusRes)
    )
)]
#[axum::debug_handler]
pub async fn jasper_status(State(state): State<AppState>) -> Json<JasperStatusRes> {
    let ready = state.generator.has_completion_client();
    let profiles = state.store.snapshot().len();

    Json(JasperStatusRes {
        status: if ready { "ready" } else { "needs_api_key" }.into(),
        message: if ready {
            "Jasper is ready to create SEO content briefs!"
        } else {
            "Jasper needs an OpenAI API key to generate content."
        }
        .into(),
        personality: "helpful, smart, and slightly witty".into(),
        expertise: "SEO content strategy for healthcare".into(),
        client_profiles_loaded: profiles,
        intelligence_level: if profiles > 0 { "ENHANCED" } else { "BASIC" }.into(),
        google_drive_enabled: state.exporter.is_some(),
        template_configured: state
            .exporter
            .as_ref()
            .is_some_and(|e| e.template_configured()),
    })
}
