//! Minimal Google Docs v1 and Drive v3 REST client.

use crate::auth::TokenSource;
use crate::{DocsError, DocsResult};
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

pub const DOCS_BASE_URL: &str = "https://docs.googleapis.com";
pub const DRIVE_BASE_URL: &str = "https://www.googleapis.com";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// A file entry returned by Drive listings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub web_view_link: Option<String>,
    #[serde(default)]
    pub modified_time: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

pub struct GoogleDocsClient {
    http: Client,
    tokens: TokenSource,
    docs_base: String,
    drive_base: String,
}

impl GoogleDocsClient {
    /// # Errors
    ///
    /// Returns `DocsError::ClientBuild` if the HTTP client cannot be initialised.
    pub fn new(tokens: TokenSource) -> DocsResult<Self> {
        Self::with_base_urls(tokens, DOCS_BASE_URL, DRIVE_BASE_URL)
    }

    /// Points the client at alternative API hosts.
    ///
    /// # Errors
    ///
    /// Returns `DocsError::ClientBuild` if the HTTP client cannot be initialised.
    pub fn with_base_urls(
        tokens: TokenSource,
        docs_base: impl Into<String>,
        drive_base: impl Into<String>,
    ) -> DocsResult<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(DocsError::ClientBuild)?;
        Ok(Self {
            http,
            tokens,
            docs_base: docs_base.into(),
            drive_base: drive_base.into(),
        })
    }

    async fn send(&self, operation: &'static str, request: RequestBuilder) -> DocsResult<Response> {
        let token = self.tokens.access_token(&self.http).await?;
        let response = request
            .bearer_auth(token)
            .send()
            .await
            .map_err(DocsError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DocsError::Status {
                operation,
                status,
                body,
            });
        }
        Ok(response)
    }

    async fn send_json(&self, operation: &'static str, request: RequestBuilder) -> DocsResult<Value> {
        self.send(operation, request)
            .await?
            .json()
            .await
            .map_err(DocsError::Decode)
    }

    /// Fetches a document resource.
    pub async fn get_document(&self, doc_id: &str) -> DocsResult<Value> {
        let url = format!("{}/v1/documents/{}", self.docs_base, doc_id);
        self.send_json("get document", self.http.get(url)).await
    }

    /// Creates an empty document and returns its id.
    pub async fn create_document(&self, title: &str) -> DocsResult<String> {
        let url = format!("{}/v1/documents", self.docs_base);
        let doc = self
            .send_json("create document", self.http.post(url).json(&json!({ "title": title })))
            .await?;
        doc.get("documentId")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or(DocsError::MissingField("documentId"))
    }

    /// Inserts `text` at the start of the document body.
    pub async fn insert_text(&self, doc_id: &str, text: &str) -> DocsResult<()> {
        let url = format!("{}/v1/documents/{}:batchUpdate", self.docs_base, doc_id);
        let body = json!({
            "requests": [
                { "insertText": { "location": { "index": 1 }, "text": text } }
            ]
        });
        self.send("insert text", self.http.post(url).json(&body))
            .await
            .map(|_| ())
    }

    /// Grants `role` on a file to a user and sends them a notification e-mail.
    pub async fn share(&self, file_id: &str, email: &str, role: &str) -> DocsResult<()> {
        let url = format!("{}/drive/v3/files/{}/permissions", self.drive_base, file_id);
        let body = json!({ "type": "user", "role": role, "emailAddress": email.trim() });
        let request = self
            .http
            .post(url)
            .query(&[("sendNotificationEmail", "true")])
            .json(&body);
        self.send("share document", request).await.map(|_| ())
    }

    /// Lists Drive files, most recently modified first.
    pub async fn list_files(&self, page_size: u32) -> DocsResult<Vec<DriveFile>> {
        let url = format!("{}/drive/v3/files", self.drive_base);
        let page_size = page_size.to_string();
        let params = [
            ("pageSize", page_size.as_str()),
            ("orderBy", "modifiedTime desc"),
            ("fields", "files(id, name, webViewLink, modifiedTime)"),
        ];

        let list: FileList = self
            .send("list files", self.http.get(url).query(&params))
            .await?
            .json()
            .await
            .map_err(DocsError::Decode)?;
        Ok(list.files)
    }
}
