//! # API REST
//!
//! REST API implementation for Jasper.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - HTTP Basic authentication of the content team
//! - OpenAPI/Swagger documentation
//! - The team web UI, served from a static directory
//! - REST-specific concerns (JSON serialization, CORS)
//!
//! Uses `api-shared` for common types and utilities.

#![warn(rust_2018_idioms)]

pub mod config;
pub mod handlers;
pub mod state;

pub use config::ServerConfig;
pub use state::AppState;

use api_shared::dto;
use api_shared::AuthError;
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::list_clients,
        handlers::get_client,
        handlers::client_context,
        handlers::add_client,
        handlers::reload_clients,
        handlers::client_stats,
        handlers::generate_content,
        handlers::create_google_doc,
        handlers::create_template,
        handlers::google_drive_status,
        handlers::jasper_status,
    ),
    components(schemas(
        dto::HealthRes,
        dto::ErrorRes,
        dto::GenerateContentReq,
        dto::GenerateContentRes,
        dto::CreateGoogleDocReq,
        dto::CreateGoogleDocRes,
        dto::CreateTemplateRes,
        dto::GoogleDriveStatusRes,
        dto::JasperStatusRes,
        dto::ListClientsRes,
        dto::ClientRes,
        dto::AddClientRes,
        dto::ReloadClientsRes,
        dto::ClientStatsRes,
        dto::ClientContextRes,
    ))
)]
pub struct ApiDoc;

/// Rejects requests without the team's Basic credentials.
async fn require_team(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    match state.credentials.verify_header(header_value) {
        Ok(username) => {
            tracing::debug!("authenticated {} for {}", username, request.uri().path());
            next.run(request).await
        }
        Err(e) => {
            tracing::warn!("rejected request to {}: {}", request.uri().path(), e);
            unauthorized()
        }
    }
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Basic realm=\"Jasper\"")],
        Json(dto::ErrorRes::new(AuthError::InvalidCredentials.to_string())),
    )
        .into_response()
}

/// Builds the application router.
///
/// Every route except `/health` sits behind [`require_team`], including the Swagger UI and the
/// web UI at `/`.
pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route_service("/", ServeFile::new(state.static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(&state.static_dir))
        .route(
            "/clients",
            get(handlers::list_clients).post(handlers::add_client),
        )
        .route("/clients/reload", post(handlers::reload_clients))
        .route("/clients/stats", get(handlers::client_stats))
        .route("/clients/:id", get(handlers::get_client))
        .route("/clients/:id/context", get(handlers::client_context))
        .route("/generate-content", post(handlers::generate_content))
        .route("/create-google-doc", post(handlers::create_google_doc))
        .route("/create-template", post(handlers::create_template))
        .route("/google-drive-status", get(handlers::google_drive_status))
        .route("/jasper-status", get(handlers::jasper_status))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_team));

    Router::new()
        .route("/health", get(handlers::health))
        .merge(protected)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Runs the REST API server until it fails.
///
/// # Arguments
/// * `cfg` - Fully resolved server configuration
///
/// # Errors
/// Returns an error if:
/// - the profile store or upstream clients cannot be initialised,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
pub async fn serve(cfg: ServerConfig) -> anyhow::Result<()> {
    let state = AppState::from_config(&cfg)?;
    let app = router(state);

    tracing::info!("-- Starting Jasper REST API on {}", cfg.rest_addr);
    let listener = tokio::net::TcpListener::bind(&cfg.rest_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_shared::TeamCredentials;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request as HttpRequest};
    use base64::{engine::general_purpose, Engine as _};
    use jasper_core::{
        CompletionClient, CompletionRequest, CoreConfig, CoreResult, ProfileStore,
    };
    use jasper_docs::{
        ConnectionStatus, DocsError, DocsResult, DocumentExporter, ExportRequest,
        ExportedDocument, TemplateDocument,
    };
    use serde_json::{json, Value};
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BRIEF_REPLY: &str = r#"```json
{
  "title": "Knee Pain Relief in Austin | Acme Ortho",
  "meta": "Find lasting knee pain relief.",
  "primaryKeywords": "knee pain austin",
  "keywords": ["knee pain", "orthopedic surgeon"],
  "cta": "Book a consultation today.",
  "h1": "Knee Pain Relief That Works",
  "h2Sections": [{"heading": "Common causes", "h3Content": "Explain causes."}]
}
```"#;

    struct FakeCompletion {
        seen: Mutex<Vec<CompletionRequest>>,
    }

    #[async_trait]
    impl CompletionClient for FakeCompletion {
        async fn complete(&self, request: &CompletionRequest) -> CoreResult<String> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(BRIEF_REPLY.to_string())
        }
    }

    #[derive(Default)]
    struct FakeExporter {
        exported: Mutex<Vec<ExportRequest>>,
        fail: bool,
    }

    #[async_trait]
    impl DocumentExporter for FakeExporter {
        fn template_configured(&self) -> bool {
            false
        }

        async fn export(&self, request: &ExportRequest) -> DocsResult<ExportedDocument> {
            if self.fail {
                return Err(DocsError::MissingField("documentId"));
            }
            self.exported.lock().unwrap().push(request.clone());
            Ok(ExportedDocument {
                doc_id: "doc-1".into(),
                doc_title: format!("Blog Assignment - {}", request.blog_topic),
                doc_url: "https://docs.google.com/document/d/doc-1/edit".into(),
                used_template: false,
                replacements_made: 0,
            })
        }

        async fn create_template(&self) -> DocsResult<TemplateDocument> {
            Ok(TemplateDocument {
                template_doc_id: "tpl-1".into(),
                template_url: "https://docs.google.com/document/d/tpl-1/edit".into(),
            })
        }

        async fn test_connection(&self) -> DocsResult<ConnectionStatus> {
            Ok(ConnectionStatus {
                can_create_docs: true,
                sample_file: Some("Notes".into()),
            })
        }
    }

    struct Harness {
        _dir: TempDir,
        state: AppState,
        completion: Arc<FakeCompletion>,
        exporter: Arc<FakeExporter>,
    }

    impl Harness {
        fn store_dir(&self) -> std::path::PathBuf {
            self.state.store.dir().to_path_buf()
        }
    }

    fn harness(with_completion: bool, with_exporter: bool) -> Harness {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("acme.json"),
            json!({
                "client_id": "acme",
                "name": "Acme Ortho",
                "specialty": "Orthopedics",
                "location": "Austin",
                "services": ["spine care", "joint replacement"]
            })
            .to_string(),
        )
        .unwrap();

        let cfg = CoreConfig::new(dir.path().to_path_buf()).unwrap();
        let store = Arc::new(ProfileStore::open(&cfg).unwrap());
        let completion = Arc::new(FakeCompletion {
            seen: Mutex::new(Vec::new()),
        });
        let exporter = Arc::new(FakeExporter::default());

        let state = AppState::new(
            store,
            with_completion.then(|| completion.clone() as Arc<dyn CompletionClient>),
            with_exporter.then(|| exporter.clone() as Arc<dyn DocumentExporter>),
            TeamCredentials::new("team", "secret"),
            vec!["writer@example.com".into()],
        );
        Harness {
            _dir: dir,
            state,
            completion,
            exporter,
        }
    }

    fn basic(user: &str, pass: &str) -> String {
        format!(
            "Basic {}",
            general_purpose::STANDARD.encode(format!("{user}:{pass}"))
        )
    }

    async fn send(
        state: &AppState,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = HttpRequest::builder()
            .method(method)
            .uri(uri)
            .header(header::AUTHORIZATION, basic("team", "secret"));
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = router(state.clone())
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health_needs_no_credentials() {
        let h = harness(true, false);
        let response = router(h.state.clone())
            .oneshot(HttpRequest::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn test_protected_routes_reject_bad_credentials() {
        let h = harness(true, false);

        let missing = router(h.state.clone())
            .oneshot(HttpRequest::builder().uri("/clients").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);
        assert!(missing.headers().contains_key(header::WWW_AUTHENTICATE));

        let wrong = router(h.state.clone())
            .oneshot(
                HttpRequest::builder()
                    .uri("/jasper-status")
                    .header(header::AUTHORIZATION, basic("team", "guess"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
        let bytes = to_bytes(wrong.into_body(), usize::MAX).await.unwrap();
        let value: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value["success"], false);
        assert_eq!(
            value["error"],
            "Access denied - Contact team lead for credentials"
        );
    }

    #[tokio::test]
    async fn test_list_and_get_clients() {
        let h = harness(true, false);

        let (status, body) = send(&h.state, Method::GET, "/clients", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], 1);
        assert_eq!(body["clients"][0]["id"], "acme");
        assert_eq!(body["clients"][0]["name"], "Acme Ortho");

        let (status, body) = send(&h.state, Method::GET, "/clients/acme", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["client"]["specialty"], "Orthopedics");

        let (status, body) = send(&h.state, Method::GET, "/clients/nobody", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Client 'nobody' not found");
    }

    #[tokio::test]
    async fn test_client_context_endpoint() {
        let h = harness(true, false);

        let (status, body) = send(&h.state, Method::GET, "/clients/acme/context", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["found"], true);
        let context = body["context"].as_str().unwrap();
        assert!(context.contains("CLIENT: Acme Ortho"));
        assert!(context.contains("SERVICES: spine care, joint replacement"));

        let (_, body) = send(&h.state, Method::GET, "/clients/nobody/context", None).await;
        assert_eq!(body["found"], false);
        assert_eq!(body["context"], "");
    }

    #[tokio::test]
    async fn test_add_client_then_stats() {
        let h = harness(true, false);

        let (status, body) = send(
            &h.state,
            Method::POST,
            "/clients",
            Some(json!({
                "client_id": "bright",
                "name": "Bright Smiles",
                "specialty": "Dentistry",
                "location": "Austin"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["client_id"], "bright");

        let (status, _) = send(
            &h.state,
            Method::POST,
            "/clients",
            Some(json!({
                "client_id": "bright",
                "name": "Again",
                "specialty": "Dentistry",
                "location": "Dallas"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, body) = send(&h.state, Method::POST, "/clients", Some(json!({"name": "x"}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);

        let (status, body) = send(&h.state, Method::GET, "/clients/stats", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stats"]["total_clients"], 2);
        assert_eq!(body["stats"]["most_common_location"], "Austin");
    }

    #[tokio::test]
    async fn test_reload_picks_up_new_files() {
        let h = harness(true, false);
        std::fs::write(
            h.store_dir().join("zen.json"),
            json!({"client_id": "zen", "name": "Zen Clinic"}).to_string(),
        )
        .unwrap();
        std::fs::write(h.store_dir().join("broken.json"), "{ not json").unwrap();

        let (status, body) = send(&h.state, Method::POST, "/clients/reload", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["loaded"], 2);
        assert_eq!(body["skipped"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_generate_content_uses_profile() {
        let h = harness(true, false);

        let (status, body) = send(
            &h.state,
            Method::POST,
            "/generate-content",
            Some(json!({"blog_topic": "knee pain", "client_id": "acme"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["used_client_profile"], true);
        assert_eq!(body["content"]["h1"], "Knee Pain Relief That Works");

        let seen = h.completion.seen.lock().unwrap();
        assert!(seen[0].user.contains("COMPREHENSIVE CLIENT INTELLIGENCE"));
        assert!(seen[0].user.contains("CLIENT: Acme Ortho"));
    }

    #[tokio::test]
    async fn test_generate_content_rejects_empty_topic() {
        let h = harness(true, false);
        let (status, body) = send(
            &h.state,
            Method::POST,
            "/generate-content",
            Some(json!({"blog_topic": "   "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Jasper needs a blog topic to work with!");
        assert!(h.completion.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_without_api_key_fails_gracefully() {
        let h = harness(false, false);
        let (status, body) = send(
            &h.state,
            Method::POST,
            "/generate-content",
            Some(json!({"blog_topic": "knee pain"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "OpenAI API key is not configured");

        let (_, status_body) = send(&h.state, Method::GET, "/jasper-status", None).await;
        assert_eq!(status_body["status"], "needs_api_key");
        assert_eq!(status_body["intelligence_level"], "ENHANCED");
        assert_eq!(status_body["google_drive_enabled"], false);
    }

    #[tokio::test]
    async fn test_create_google_doc_uses_default_recipients() {
        let h = harness(true, true);
        let (status, body) = send(
            &h.state,
            Method::POST,
            "/create-google-doc",
            Some(json!({"blog_topic": "knee pain", "client_id": "acme"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["doc_id"], "doc-1");
        assert_eq!(body["shared_with"], json!(["writer@example.com"]));

        let exported = h.exporter.exported.lock().unwrap();
        assert_eq!(exported[0].blog_topic, "knee pain");
        assert_eq!(
            exported[0].client.as_ref().and_then(|c| c.name.as_deref()),
            Some("Acme Ortho")
        );
    }

    #[tokio::test]
    async fn test_create_google_doc_without_exporter() {
        let h = harness(true, false);
        let (status, body) = send(
            &h.state,
            Method::POST,
            "/create-google-doc",
            Some(json!({"blog_topic": "knee pain"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Google Drive not configured on this server.");

        let (status, _) = send(&h.state, Method::POST, "/create-template", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_create_google_doc_reports_missing_export_before_empty_topic() {
        let unconfigured = harness(true, false);
        let (status, body) = send(
            &unconfigured.state,
            Method::POST,
            "/create-google-doc",
            Some(json!({"blog_topic": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Google Drive not configured on this server.");

        let configured = harness(true, true);
        let (status, body) = send(
            &configured.state,
            Method::POST,
            "/create-google-doc",
            Some(json!({"blog_topic": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Jasper needs a blog topic to work with!");
        assert!(configured.exporter.exported.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_web_ui_is_served_behind_credentials() {
        let ui = TempDir::new().unwrap();
        std::fs::write(ui.path().join("index.html"), "<h1>Jasper team UI</h1>").unwrap();
        std::fs::write(ui.path().join("script.js"), "loadStatus();").unwrap();
        let h = harness(true, false);
        let state = h.state.clone().with_static_dir(ui.path());

        let anonymous = router(state.clone())
            .oneshot(HttpRequest::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

        for (uri, expected) in [
            ("/", "<h1>Jasper team UI</h1>"),
            ("/static/script.js", "loadStatus();"),
        ] {
            let response = router(state.clone())
                .oneshot(
                    HttpRequest::builder()
                        .uri(uri)
                        .header(header::AUTHORIZATION, basic("team", "secret"))
                        .body(Body::empty())
                        .unwrap(),
                )
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&bytes[..], expected.as_bytes());
        }
    }

    #[tokio::test]
    async fn test_create_google_doc_reports_export_failure() {
        let dir = TempDir::new().unwrap();
        let cfg = CoreConfig::new(dir.path().to_path_buf()).unwrap();
        let state = AppState::new(
            Arc::new(ProfileStore::open(&cfg).unwrap()),
            None,
            Some(Arc::new(FakeExporter {
                fail: true,
                ..FakeExporter::default()
            }) as Arc<dyn DocumentExporter>),
            TeamCredentials::new("team", "secret"),
            Vec::new(),
        );

        let (status, body) = send(
            &state,
            Method::POST,
            "/create-google-doc",
            Some(json!({
                "blog_topic": "knee pain",
                "content": {"title": "T", "h1": "H"}
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], false);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to create Google Doc:"));
    }

    #[tokio::test]
    async fn test_drive_status_and_template() {
        let h = harness(true, true);

        let (status, body) = send(&h.state, Method::GET, "/google-drive-status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["enabled"], true);
        assert_eq!(body["connection_test"]["success"], true);

        let (status, body) = send(&h.state, Method::POST, "/create-template", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["template_doc_id"], "tpl-1");
        assert!(body["instructions"]
            .as_str()
            .unwrap()
            .contains("JASPER_TEMPLATE_DOC_ID=tpl-1"));
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let h = harness(true, false);
        let (status, body) = send(&h.state, Method::GET, "/api-docs/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/generate-content"].is_object());
    }
}
