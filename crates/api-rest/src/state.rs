use crate::config::{ServerConfig, DEFAULT_STATIC_DIR};
use api_shared::TeamCredentials;
use jasper_core::{BriefGenerator, CompletionClient, ProfileStore};
use jasper_docs::{DocumentExporter, GoogleDocsExporter};
use jasper_llm::OpenAiClient;
use std::path::PathBuf;
use std::sync::Arc;

/// Application state for the REST API server
///
/// Shared by every request handler. The profile store hands out immutable snapshots, so the
/// state itself needs no locking.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ProfileStore>,
    pub generator: Arc<BriefGenerator>,
    /// `None` when Google credentials are not available.
    pub exporter: Option<Arc<dyn DocumentExporter>>,
    pub credentials: Arc<TeamCredentials>,
    /// Recipients used when a document request names none.
    pub default_share_emails: Arc<Vec<String>>,
    /// Directory the team web UI is served from.
    pub static_dir: PathBuf,
}

impl AppState {
    pub fn new(
        store: Arc<ProfileStore>,
        completion: Option<Arc<dyn CompletionClient>>,
        exporter: Option<Arc<dyn DocumentExporter>>,
        credentials: TeamCredentials,
        default_share_emails: Vec<String>,
    ) -> Self {
        Self {
            generator: Arc::new(BriefGenerator::new(store.clone(), completion)),
            store,
            exporter,
            credentials: Arc::new(credentials),
            default_share_emails: Arc::new(default_share_emails),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }

    /// Serves the web UI from `dir` instead of `static`.
    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = dir.into();
        self
    }

    /// Opens the profile store and wires the configured collaborators.
    ///
    /// Missing OpenAI or Google settings disable the corresponding feature rather than failing
    /// startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the profile directory cannot be read or created, or if the HTTP
    /// client for the completion API cannot be built.
    pub fn from_config(cfg: &ServerConfig) -> anyhow::Result<Self> {
        let store = Arc::new(ProfileStore::open(&cfg.core)?);
        tracing::info!(
            "loaded {} client profiles from {}",
            store.snapshot().len(),
            cfg.core.profiles_dir().display()
        );

        let completion: Option<Arc<dyn CompletionClient>> = match &cfg.openai {
            Some(openai) => {
                let client = OpenAiClient::new(openai.clone())?;
                tracing::info!("content generation enabled (model {})", client.model());
                Some(Arc::new(client))
            }
            None => {
                tracing::warn!("OPENAI_API_KEY not set; content generation disabled");
                None
            }
        };

        let exporter: Option<Arc<dyn DocumentExporter>> =
            match GoogleDocsExporter::from_config(&cfg.docs) {
                Ok(exporter) => {
                    tracing::info!("Google Docs export enabled");
                    Some(Arc::new(exporter))
                }
                Err(e) => {
                    tracing::warn!("Google Docs export disabled: {}", e);
                    None
                }
            };

        Ok(Self::new(
            store,
            completion,
            exporter,
            cfg.credentials.clone(),
            cfg.docs.share_emails.clone(),
        )
        .with_static_dir(cfg.static_dir.clone()))
    }
}
