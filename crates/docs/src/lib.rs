//! # Jasper Docs
//!
//! Exports content briefs to Google Docs and shares them with the content team.
//!
//! - [`render`]: pure text rendering (titles, full assignment, template placeholders)
//! - [`auth`]: OAuth access tokens from an authorized-user token file
//! - [`client`]: thin Docs v1 / Drive v3 REST client
//! - [`export`]: the [`DocumentExporter`] seam and its Google implementation

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod render;

pub use auth::{AuthorizedUser, TokenSource};
pub use client::GoogleDocsClient;
pub use config::DocsConfig;
pub use error::{DocsError, DocsResult};
pub use export::{
    ConnectionStatus, DocumentExporter, ExportRequest, ExportedDocument, GoogleDocsExporter,
    TemplateDocument,
};
