//! HTTP Basic authentication for the content team.
//!
//! Every endpoint except `/health` requires the single shared team credential. Both the username
//! and the password are compared in constant time, and both comparisons always run.

use base64::{engine::general_purpose, Engine as _};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("{0} is not set in environment")]
    NotConfigured(&'static str),
    #[error("missing Basic credentials")]
    MissingCredentials,
    #[error("malformed Basic credentials")]
    MalformedCredentials,
    #[error("Access denied - Contact team lead for credentials")]
    InvalidCredentials,
}

/// The configured team username and password.
#[derive(Clone)]
pub struct TeamCredentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for TeamCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl TeamCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Resolves credentials from already-read `JASPER_TEAM_USERNAME` / `JASPER_TEAM_PASSWORD`
    /// values.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotConfigured` if either value is missing or empty.
    pub fn from_env_values(
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Self, AuthError> {
        let username = username
            .filter(|u| !u.is_empty())
            .ok_or(AuthError::NotConfigured("JASPER_TEAM_USERNAME"))?;
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or(AuthError::NotConfigured("JASPER_TEAM_PASSWORD"))?;
        Ok(Self::new(username, password))
    }

    /// Checks an `Authorization` header value.
    ///
    /// # Returns
    ///
    /// The authenticated username.
    ///
    /// # Errors
    ///
    /// Returns an `AuthError` describing why the header was rejected.
    pub fn verify_header(&self, header: Option<&str>) -> Result<String, AuthError> {
        let header = header.ok_or(AuthError::MissingCredentials)?;
        let (username, password) = parse_basic_header(header)?;

        let username_ok = constant_time_eq(username.as_bytes(), self.username.as_bytes());
        let password_ok = constant_time_eq(password.as_bytes(), self.password.as_bytes());
        if username_ok & password_ok {
            Ok(username)
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

/// Decodes `Basic <base64(username:password)>`.
///
/// # Errors
///
/// Returns `AuthError::MalformedCredentials` for other schemes, bad base64, non-UTF-8 text or a
/// missing `:` separator.
pub fn parse_basic_header(header: &str) -> Result<(String, String), AuthError> {
    let (scheme, encoded) = header
        .trim()
        .split_once(' ')
        .ok_or(AuthError::MalformedCredentials)?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return Err(AuthError::MalformedCredentials);
    }

    let decoded = general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|_| AuthError::MalformedCredentials)?;
    let decoded = String::from_utf8(decoded).map_err(|_| AuthError::MalformedCredentials)?;
    let (username, password) = decoded
        .split_once(':')
        .ok_or(AuthError::MalformedCredentials)?;
    Ok((username.to_string(), password.to_string()))
}

/// Compares two byte strings without short-circuiting on the first difference.
///
/// Length differences are still observable; contents are not.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(user: &str, pass: &str) -> String {
        format!(
            "Basic {}",
            general_purpose::STANDARD.encode(format!("{user}:{pass}"))
        )
    }

    fn creds() -> TeamCredentials {
        TeamCredentials::new("jasper-team", "s3cret")
    }

    #[test]
    fn test_valid_credentials_return_username() {
        let h = header("jasper-team", "s3cret");
        assert_eq!(creds().verify_header(Some(&h)).unwrap(), "jasper-team");
    }

    #[test]
    fn test_wrong_password_is_rejected() {
        let h = header("jasper-team", "guess");
        assert_eq!(
            creds().verify_header(Some(&h)),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn test_missing_and_malformed_headers() {
        assert_eq!(creds().verify_header(None), Err(AuthError::MissingCredentials));
        assert_eq!(
            creds().verify_header(Some("Bearer abc")),
            Err(AuthError::MalformedCredentials)
        );
        assert_eq!(
            creds().verify_header(Some("Basic !!!not-base64")),
            Err(AuthError::MalformedCredentials)
        );
        let no_colon = format!("Basic {}", general_purpose::STANDARD.encode("nocolon"));
        assert_eq!(
            creds().verify_header(Some(&no_colon)),
            Err(AuthError::MalformedCredentials)
        );
    }

    #[test]
    fn test_password_may_contain_colon() {
        let team = TeamCredentials::new("team", "a:b");
        assert!(team.verify_header(Some(&header("team", "a:b"))).is_ok());
    }

    #[test]
    fn test_from_env_values_requires_both() {
        assert_eq!(
            TeamCredentials::from_env_values(None, Some("p".into())).unwrap_err(),
            AuthError::NotConfigured("JASPER_TEAM_USERNAME")
        );
        assert_eq!(
            TeamCredentials::from_env_values(Some("u".into()), Some(String::new())).unwrap_err(),
            AuthError::NotConfigured("JASPER_TEAM_PASSWORD")
        );
    }

    #[test]
    fn test_debug_redacts_password() {
        assert!(!format!("{:?}", creds()).contains("s3cret"));
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
