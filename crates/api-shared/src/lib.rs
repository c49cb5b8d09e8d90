//! # API Shared
//!
//! Shared utilities and definitions for the Jasper APIs.
//!
//! Contains:
//! - Request and response types (`dto` module) with OpenAPI schemas
//! - Shared services like `HealthService`
//! - HTTP Basic authentication for the content team
//!
//! Used by `api-rest`.

pub mod auth;
pub mod dto;
pub mod health;

pub use auth::{AuthError, TeamCredentials};
pub use health::HealthService;
