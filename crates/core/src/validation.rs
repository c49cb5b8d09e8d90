//! Input validation utilities.
//!
//! This module contains functions for validating profile records before they are written to
//! the profile directory.

use crate::constants::CLIENT_ID_KEY;
use crate::{CoreError, CoreResult};
use serde_json::Value;

/// Fields every newly added profile must carry with a non-empty value.
const REQUIRED_FIELDS: &[&str] = &[CLIENT_ID_KEY, "name", "specialty", "location"];

/// Fields that must be JSON arrays when present.
const LIST_FIELDS: &[&str] = &["services", "competitors", "seo_focus"];

/// Checks a candidate profile and returns every issue found.
///
/// An empty result means the profile is acceptable for [`crate::ProfileStore::add`]. Loading
/// existing files is more forgiving and only requires `client_id`.
pub fn validate_profile(value: &Value) -> Vec<String> {
    let Some(map) = value.as_object() else {
        return vec!["profile must be a JSON object".to_string()];
    };

    let mut issues = Vec::new();

    for field in REQUIRED_FIELDS {
        if !is_truthy(map.get(*field)) {
            issues.push(format!("Missing required field: {field}"));
        }
    }

    for field in LIST_FIELDS {
        if is_truthy(map.get(*field)) && !map.get(*field).is_some_and(Value::is_array) {
            issues.push(format!("'{field}' should be a list"));
        }
    }

    if let Some(Value::String(id)) = map.get(CLIENT_ID_KEY) {
        if let Err(e) = validate_client_id_safe_for_filename(id) {
            issues.push(e.to_string());
        }
    }

    issues
}

/// Validates that a client id can be used as a profile file stem.
///
/// The id becomes `<profiles_dir>/<client_id>.json`, so it must not be able to escape the
/// profile directory:
/// - Rejects empty or whitespace-only strings
/// - Bounds the length
/// - Restricts characters to ASCII alphanumerics, '-', '_' and '.' (no leading '.')
///
/// # Errors
///
/// Returns `CoreError::InvalidInput` if the id is unsafe.
pub fn validate_client_id_safe_for_filename(client_id: &str) -> CoreResult<()> {
    const MAX_CLIENT_ID_LEN: usize = 128;

    if client_id.trim().is_empty() {
        return Err(CoreError::InvalidInput("client_id cannot be empty".into()));
    }

    if client_id.len() > MAX_CLIENT_ID_LEN {
        return Err(CoreError::InvalidInput(format!(
            "client_id exceeds maximum length of {} characters",
            MAX_CLIENT_ID_LEN
        )));
    }

    if client_id.starts_with('.') {
        return Err(CoreError::InvalidInput(
            "client_id cannot start with '.'".into(),
        ));
    }

    let ok = client_id
        .bytes()
        .all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z' | b'A'..=b'Z' | b'.' | b'-' | b'_'));

    if !ok {
        return Err(CoreError::InvalidInput(
            "client_id contains invalid characters (only alphanumeric, '.', '-', '_' allowed)"
                .into(),
        ));
    }

    Ok(())
}

/// JSON truthiness: present, non-null, non-false, non-zero and non-empty.
fn is_truthy(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(map)) => !map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_complete_profile_has_no_issues() {
        let issues = validate_profile(&json!({
            "client_id": "acme",
            "name": "Acme Ortho",
            "specialty": "Orthopedics",
            "location": "Austin",
            "services": ["spine care"]
        }));
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn test_missing_required_fields_are_reported() {
        let issues = validate_profile(&json!({"client_id": "acme", "name": ""}));
        assert_eq!(
            issues,
            vec![
                "Missing required field: name",
                "Missing required field: specialty",
                "Missing required field: location",
            ]
        );
    }

    #[test]
    fn test_list_fields_must_be_arrays() {
        let issues = validate_profile(&json!({
            "client_id": "acme",
            "name": "Acme",
            "specialty": "Ortho",
            "location": "Austin",
            "services": "spine care",
            "competitors": {"a": 1},
            "seo_focus": []
        }));
        assert_eq!(
            issues,
            vec!["'services' should be a list", "'competitors' should be a list"]
        );
    }

    #[test]
    fn test_non_object_is_reported() {
        assert_eq!(
            validate_profile(&json!("acme")),
            vec!["profile must be a JSON object"]
        );
    }

    #[test]
    fn test_client_id_rejects_path_traversal() {
        assert!(validate_client_id_safe_for_filename("../etc/passwd").is_err());
        assert!(validate_client_id_safe_for_filename("a/b").is_err());
        assert!(validate_client_id_safe_for_filename(".hidden").is_err());
        assert!(validate_client_id_safe_for_filename("  ").is_err());
        assert!(validate_client_id_safe_for_filename(&"x".repeat(129)).is_err());
        assert!(validate_client_id_safe_for_filename("summit-spine_2.v1").is_ok());
    }

    #[test]
    fn test_unsafe_client_id_is_reported_as_issue() {
        let issues = validate_profile(&json!({
            "client_id": "../escape",
            "name": "Acme",
            "specialty": "Ortho",
            "location": "Austin"
        }));
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("client_id"));
    }
}
