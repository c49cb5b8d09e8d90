//! Constants used throughout the Jasper core crate.
//!
//! This module contains path, default-value and truncation constants to ensure
//! consistency across the codebase and make maintenance easier.

/// Default directory for client profile storage when no explicit directory is configured.
pub const DEFAULT_PROFILES_DIR: &str = "client_profiles";

/// File extension of stored client profiles.
pub const PROFILE_FILE_EXTENSION: &str = "json";

/// Key under which a stored profile carries its identifier.
pub const CLIENT_ID_KEY: &str = "client_id";

/// Number of clinical strengths surfaced in the context block.
pub const MAX_CLINICAL_STRENGTHS: usize = 3;

/// Number of philosophical strengths surfaced in the context block.
pub const MAX_PHILOSOPHICAL_STRENGTHS: usize = 2;

/// Number of brand keywords surfaced in the context block.
pub const MAX_BRAND_KEYWORDS: usize = 8;

/// Practice name used when neither the request nor a stored profile supplies one.
pub const DEFAULT_PRACTICE_NAME: &str = "Healthcare Practice";

/// Specialty used when neither the request nor a stored profile supplies one.
pub const DEFAULT_SPECIALTY: &str = "General Healthcare";

/// Location used when neither the request nor a stored profile supplies one.
pub const DEFAULT_LOCATION: &str = "Local Area";

/// Name shown in client listings for profiles without a `name`.
pub const UNKNOWN_PRACTICE_NAME: &str = "Unknown Practice";

/// Sampling temperature for brief generation.
pub const GENERATION_TEMPERATURE: f32 = 0.7;

/// Token ceiling for brief generation replies.
pub const GENERATION_MAX_TOKENS: u32 = 3000;
