//! Server configuration resolved from the process environment.
//!
//! Environment variables are read once here; nothing below the binaries reads the environment.
//!
//! | variable | default |
//! |---|---|
//! | `JASPER_REST_ADDR` | `0.0.0.0:8000` |
//! | `CLIENT_PROFILES_DIR` | `client_profiles` |
//! | `JASPER_TEAM_USERNAME`, `JASPER_TEAM_PASSWORD` | required |
//! | `OPENAI_API_KEY` | unset disables generation |
//! | `OPENAI_BASE_URL`, `OPENAI_MODEL` | `https://api.openai.com`, `gpt-4` |
//! | `GOOGLE_CREDENTIALS_FILE`, `GOOGLE_TOKEN_FILE` | `credentials.json`, `token.json` |
//! | `JASPER_TEMPLATE_DOC_ID` | unset |
//! | `CONTENT_TEAM_EMAILS` | empty |
//! | `JASPER_STATIC_DIR` | `static` |

use api_shared::TeamCredentials;
use jasper_core::config::profiles_dir_from_env_value;
use jasper_core::CoreConfig;
use jasper_docs::DocsConfig;
use jasper_llm::OpenAiConfig;
use std::path::PathBuf;

pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:8000";
pub const DEFAULT_STATIC_DIR: &str = "static";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub rest_addr: String,
    pub core: CoreConfig,
    pub credentials: TeamCredentials,
    pub openai: Option<OpenAiConfig>,
    pub docs: DocsConfig,
    /// Directory holding the team web UI (`index.html` and its assets).
    pub static_dir: PathBuf,
}

impl ServerConfig {
    /// Reads and validates every server setting.
    ///
    /// # Errors
    ///
    /// Returns an error if the team credentials are missing or the profile directory setting
    /// is invalid.
    pub fn from_env() -> anyhow::Result<Self> {
        let var = |name: &str| std::env::var(name).ok();

        let rest_addr = var("JASPER_REST_ADDR")
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_REST_ADDR.into());
        let core = CoreConfig::new(profiles_dir_from_env_value(var("CLIENT_PROFILES_DIR")))?;
        let credentials = TeamCredentials::from_env_values(
            var("JASPER_TEAM_USERNAME"),
            var("JASPER_TEAM_PASSWORD"),
        )?;
        let openai = OpenAiConfig::from_env_values(
            var("OPENAI_API_KEY"),
            var("OPENAI_BASE_URL"),
            var("OPENAI_MODEL"),
        );
        let docs = DocsConfig::from_env_values(
            var("GOOGLE_CREDENTIALS_FILE"),
            var("GOOGLE_TOKEN_FILE"),
            var("JASPER_TEMPLATE_DOC_ID"),
            var("CONTENT_TEAM_EMAILS"),
        );
        let static_dir = PathBuf::from(
            var("JASPER_STATIC_DIR")
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.into()),
        );

        Ok(Self {
            rest_addr,
            core,
            credentials,
            openai,
            docs,
            static_dir,
        })
    }
}
