//! Blog assignment export.
//!
//! [`DocumentExporter`] is the seam the REST layer depends on; [`GoogleDocsExporter`] is the
//! production implementation.

use crate::auth::{AuthorizedUser, TokenSource};
use crate::client::GoogleDocsClient;
use crate::config::DocsConfig;
use crate::render::{
    apply_template, document_title, document_url, extract_text, render_assignment,
    template_replacements, MASTER_TEMPLATE, TEMPLATE_TITLE,
};
use crate::DocsResult;
use async_trait::async_trait;
use chrono::Local;
use jasper_core::{ClientProfile, ContentBrief};
use serde::Serialize;

const SHARE_ROLE: &str = "writer";

/// Everything needed to produce one assignment document.
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub brief: ContentBrief,
    pub blog_topic: String,
    pub client: Option<ClientProfile>,
    pub share_emails: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedDocument {
    pub doc_id: String,
    pub doc_title: String,
    pub doc_url: String,
    pub used_template: bool,
    pub replacements_made: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateDocument {
    pub template_doc_id: String,
    pub template_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionStatus {
    pub can_create_docs: bool,
    /// Name of the most recently modified file visible to the account, if any.
    pub sample_file: Option<String>,
}

#[async_trait]
pub trait DocumentExporter: Send + Sync {
    /// Whether a template document id is configured.
    fn template_configured(&self) -> bool;

    /// Creates and shares an assignment document.
    ///
    /// # Errors
    ///
    /// Returns a `DocsError` if no document could be created. Sharing failures are logged and
    /// do not fail the export.
    async fn export(&self, request: &ExportRequest) -> DocsResult<ExportedDocument>;

    /// Creates a new master template document.
    async fn create_template(&self) -> DocsResult<TemplateDocument>;

    /// Checks that the account can reach Drive.
    async fn test_connection(&self) -> DocsResult<ConnectionStatus>;
}

pub struct GoogleDocsExporter {
    client: GoogleDocsClient,
    template_doc_id: Option<String>,
}

impl GoogleDocsExporter {
    pub fn new(client: GoogleDocsClient, template_doc_id: Option<String>) -> Self {
        Self {
            client,
            template_doc_id,
        }
    }

    /// Builds an exporter from the configured token and credentials files.
    ///
    /// # Errors
    ///
    /// Returns a `DocsError` if the token file is missing or incomplete.
    pub fn from_config(cfg: &DocsConfig) -> DocsResult<Self> {
        let user = AuthorizedUser::load(&cfg.token_file, &cfg.credentials_file)?;
        let client = GoogleDocsClient::new(TokenSource::new(user))?;
        Ok(Self::new(client, cfg.template_doc_id.clone()))
    }

    async fn export_from_template(
        &self,
        template_doc_id: &str,
        request: &ExportRequest,
        title: &str,
    ) -> DocsResult<ExportedDocument> {
        let template = self.client.get_document(template_doc_id).await?;
        let template_text = extract_text(&template);
        tracing::debug!(
            "read template {} ({} characters)",
            template_doc_id,
            template_text.chars().count()
        );

        let replacements = template_replacements(&request.brief, request.client.as_ref());
        let (text, replacements_made) = apply_template(&template_text, &replacements);
        tracing::info!("made {} template replacements", replacements_made);

        let doc_id = self.client.create_document(title).await?;
        self.client.insert_text(&doc_id, &text).await?;

        Ok(ExportedDocument {
            doc_url: document_url(&doc_id),
            doc_id,
            doc_title: title.to_string(),
            used_template: true,
            replacements_made,
        })
    }

    async fn export_full(&self, request: &ExportRequest, title: &str) -> DocsResult<ExportedDocument> {
        let text = render_assignment(
            &request.brief,
            &request.blog_topic,
            request.client.as_ref(),
            Local::now().naive_local(),
        );

        let doc_id = self.client.create_document(title).await?;
        self.client.insert_text(&doc_id, &text).await?;

        Ok(ExportedDocument {
            doc_url: document_url(&doc_id),
            doc_id,
            doc_title: title.to_string(),
            used_template: false,
            replacements_made: 0,
        })
    }

    async fn share_all(&self, doc_id: &str, emails: &[String]) {
        for email in emails.iter().map(|e| e.trim()).filter(|e| !e.is_empty()) {
            match self.client.share(doc_id, email, SHARE_ROLE).await {
                Ok(()) => tracing::info!("shared document {} with {}", doc_id, email),
                Err(e) => tracing::warn!("failed to share document {} with {}: {}", doc_id, email, e),
            }
        }
    }
}

#[async_trait]
impl DocumentExporter for GoogleDocsExporter {
    fn template_configured(&self) -> bool {
        self.template_doc_id.is_some()
    }

    async fn export(&self, request: &ExportRequest) -> DocsResult<ExportedDocument> {
        let client_name = request.client.as_ref().and_then(|c| c.name.as_deref());
        let title = document_title(&request.blog_topic, client_name, Local::now().date_naive());

        let mut exported = None;
        if let Some(template_doc_id) = self.template_doc_id.as_deref() {
            match self.export_from_template(template_doc_id, request, &title).await {
                Ok(doc) => exported = Some(doc),
                Err(e) => tracing::warn!(
                    "template export failed, falling back to full rendering: {}",
                    e
                ),
            }
        }

        let doc = match exported {
            Some(doc) => doc,
            None => self.export_full(request, &title).await?,
        };
        tracing::info!("created document '{}' ({})", doc.doc_title, doc.doc_id);

        self.share_all(&doc.doc_id, &request.share_emails).await;
        Ok(doc)
    }

    async fn create_template(&self) -> DocsResult<TemplateDocument> {
        let doc_id = self.client.create_document(TEMPLATE_TITLE).await?;
        self.client.insert_text(&doc_id, MASTER_TEMPLATE).await?;
        tracing::info!("created template document {}", doc_id);
        Ok(TemplateDocument {
            template_url: document_url(&doc_id),
            template_doc_id: doc_id,
        })
    }

    async fn test_connection(&self) -> DocsResult<ConnectionStatus> {
        let files = self.client.list_files(1).await?;
        Ok(ConnectionStatus {
            can_create_docs: true,
            sample_file: files.into_iter().next().and_then(|f| f.name),
        })
    }
}
