//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own.
//!
//! ## Intended use
//! Useful during development when the environment is already exported. The workspace's main
//! `jasper-run` binary also loads a `.env` file before starting the same server.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the Jasper REST API server
///
/// Starts the REST API server on the configured address (default: 0.0.0.0:8000). See
/// [`api_rest::config`] for the environment variables read at startup.
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration is incomplete (for example missing team credentials), or
/// - the server fails to start or while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = api_rest::ServerConfig::from_env()?;
    api_rest::serve(cfg).await
}
