use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the Jasper application
///
/// Loads a `.env` file when present, then runs the REST server (default 0.0.0.0:8000).
///
/// # Environment Variables
/// - `JASPER_REST_ADDR`: REST server address (default: "0.0.0.0:8000")
/// - `CLIENT_PROFILES_DIR`: Directory of client profile JSON files (default: "client_profiles")
/// - `JASPER_TEAM_USERNAME` / `JASPER_TEAM_PASSWORD`: Team Basic-auth credentials (required)
/// - `OPENAI_API_KEY`: Key for brief generation; generation is disabled without it
/// - `GOOGLE_TOKEN_FILE` / `GOOGLE_CREDENTIALS_FILE`: Google Docs export credentials
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, startup or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("jasper=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = api_rest::ServerConfig::from_env()?;
    tracing::info!("++ Starting Jasper REST on {}", cfg.rest_addr);
    api_rest::serve(cfg).await
}
