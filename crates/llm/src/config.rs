//! Completion API settings.

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_MODEL: &str = "gpt-4";
pub const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Settings for [`crate::OpenAiClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Resolves settings from already-read environment values.
    ///
    /// Returns `None` when no usable API key is present, which leaves generation disabled.
    /// Blank base URL or model values fall back to the defaults.
    pub fn from_env_values(
        api_key: Option<String>,
        base_url: Option<String>,
        model: Option<String>,
    ) -> Option<Self> {
        let api_key = api_key.filter(|k| !k.trim().is_empty())?;
        let mut cfg = Self::new(api_key.trim());
        if let Some(url) = base_url.filter(|u| !u.trim().is_empty()) {
            cfg.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            cfg.model = model.trim().to_string();
        }
        Some(cfg)
    }
}
