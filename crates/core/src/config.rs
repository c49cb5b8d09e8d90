//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process startup and then
//! passed into core services. Request handlers never read process-wide environment variables;
//! binaries resolve them here and hand the result to the profile store.

use crate::constants::DEFAULT_PROFILES_DIR;
use crate::{CoreError, CoreResult};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    profiles_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidInput` if `profiles_dir` is empty or points at an existing
    /// file rather than a directory.
    pub fn new(profiles_dir: PathBuf) -> CoreResult<Self> {
        if profiles_dir.as_os_str().is_empty() {
            return Err(CoreError::InvalidInput(
                "profiles directory cannot be empty".into(),
            ));
        }
        if profiles_dir.is_file() {
            return Err(CoreError::InvalidInput(format!(
                "profiles directory is a file: {}",
                profiles_dir.display()
            )));
        }

        Ok(Self { profiles_dir })
    }

    pub fn profiles_dir(&self) -> &Path {
        &self.profiles_dir
    }
}

/// Resolve the profiles directory from an optional environment value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_PROFILES_DIR`].
pub fn profiles_dir_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PROFILES_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_profiles_dir_defaults_when_unset_or_blank() {
        assert_eq!(
            profiles_dir_from_env_value(None),
            PathBuf::from(DEFAULT_PROFILES_DIR)
        );
        assert_eq!(
            profiles_dir_from_env_value(Some("   ".into())),
            PathBuf::from(DEFAULT_PROFILES_DIR)
        );
        assert_eq!(
            profiles_dir_from_env_value(Some(" /srv/profiles ".into())),
            PathBuf::from("/srv/profiles")
        );
    }

    #[test]
    fn test_new_rejects_file_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let file = temp_dir.path().join("not-a-dir.json");
        std::fs::write(&file, "{}").expect("write file");

        let err = CoreConfig::new(file).expect_err("file path should be rejected");
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_new_accepts_missing_directory() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = CoreConfig::new(temp_dir.path().join("later")).expect("config should build");
        assert_eq!(cfg.profiles_dir(), temp_dir.path().join("later"));
    }
}
