//! Client profile model.
//!
//! Profiles are free-form JSON objects written by account managers. Only `client_id` is
//! required; every other field is read when it has the expected shape and ignored otherwise.
//! The original JSON object is kept and is what gets served back or re-saved, unknown keys
//! included.

use crate::constants::CLIENT_ID_KEY;
use crate::{CoreError, CoreResult};
use serde_json::{Map, Value};

/// Who a client's content is written for.
///
/// Older profiles store a single free-text description; newer ones split the audience into
/// primary and secondary segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetAudience {
    /// Legacy single-string description.
    Legacy(String),
    /// Structured audience segments.
    Segmented {
        primary: Vec<String>,
        secondary: Vec<String>,
    },
}

impl TargetAudience {
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(text) if !text.trim().is_empty() => Some(Self::Legacy(text.clone())),
            Value::Object(map) => Some(Self::Segmented {
                primary: text_list(map.get("primary")),
                secondary: text_list(map.get("secondary")),
            }),
            _ => None,
        }
    }

    /// A one-line description suitable for document placeholders.
    ///
    /// Structured audiences list primary segments before secondary ones.
    pub fn summary(&self) -> String {
        match self {
            Self::Legacy(text) => text.clone(),
            Self::Segmented { primary, secondary } => primary
                .iter()
                .chain(secondary.iter())
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

/// Messaging do's and don'ts, in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessagingRules {
    pub dos: Vec<String>,
    pub donts: Vec<String>,
}

/// What sets a client apart, in priority order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrandDifferentiators {
    pub clinical_strengths: Vec<String>,
    pub philosophical_strengths: Vec<String>,
}

/// Content preference flags.
///
/// `include_patient_stories` is tri-state: only an explicit `false` asks writers to avoid
/// patient stories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentPreferences {
    pub tone: Option<String>,
    pub include_statistics: bool,
    pub include_patient_stories: Option<bool>,
    pub focus_on_function: bool,
    pub avoid_surgery_references: bool,
}

/// A stored client profile keyed by `client_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientProfile {
    pub id: String,
    pub name: Option<String>,
    pub specialty: Option<String>,
    pub location: Option<String>,
    /// `voice_tone`, falling back to the older `brand_voice` key.
    pub voice_tone: Option<String>,
    pub target_audience: Option<TargetAudience>,
    pub messaging_rules: MessagingRules,
    pub brand_differentiators: BrandDifferentiators,
    pub topic_targeting: Option<String>,
    pub procedure_language: Vec<String>,
    pub brand_mission: Option<String>,
    pub slogan: Option<String>,
    pub tagline: Option<String>,
    pub services: Vec<String>,
    pub brand_keywords: Vec<String>,
    pub seo_focus: Vec<String>,
    pub content_preferences: ContentPreferences,
    /// Number of entries under `location_references`.
    pub location_count: usize,
    pub competitors: Vec<String>,
    raw: Map<String, Value>,
}

impl ClientProfile {
    /// Builds a profile from a parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `CoreError::ProfileNotObject` if `value` is not a JSON object,
    /// - `CoreError::MissingClientId` if `client_id` is absent, not a string, or blank.
    pub fn from_value(value: Value) -> CoreResult<Self> {
        let Value::Object(raw) = value else {
            return Err(CoreError::ProfileNotObject);
        };

        let id = text(&raw, CLIENT_ID_KEY).ok_or(CoreError::MissingClientId)?;

        let messaging_rules = match raw.get("messaging_rules") {
            Some(Value::Object(rules)) => MessagingRules {
                dos: text_list(rules.get("do")),
                donts: text_list(rules.get("donot")),
            },
            _ => MessagingRules::default(),
        };

        let brand_differentiators = match raw.get("brand_differentiators") {
            Some(Value::Object(diff)) => BrandDifferentiators {
                clinical_strengths: text_list(diff.get("clinical_strengths")),
                philosophical_strengths: text_list(diff.get("philosophical_strengths")),
            },
            _ => BrandDifferentiators::default(),
        };

        let content_preferences = match raw.get("content_preferences") {
            Some(Value::Object(prefs)) => ContentPreferences {
                tone: text(prefs, "tone"),
                include_statistics: flag(prefs, "include_statistics"),
                include_patient_stories: prefs
                    .get("include_patient_stories")
                    .and_then(Value::as_bool),
                focus_on_function: flag(prefs, "focus_on_function"),
                avoid_surgery_references: flag(prefs, "avoid_surgery_references"),
            },
            _ => ContentPreferences::default(),
        };

        // A single requirement string is treated as a one-item list.
        let procedure_language = match raw.get("procedure_language") {
            Some(Value::String(text)) if !text.trim().is_empty() => vec![text.clone()],
            other => text_list(other),
        };

        let location_count = match raw.get("location_references") {
            Some(Value::Object(map)) => map.len(),
            Some(Value::Array(items)) => items.len(),
            _ => 0,
        };

        Ok(Self {
            id,
            name: text(&raw, "name"),
            specialty: text(&raw, "specialty"),
            location: text(&raw, "location"),
            voice_tone: text(&raw, "voice_tone").or_else(|| text(&raw, "brand_voice")),
            target_audience: raw.get("target_audience").and_then(TargetAudience::from_value),
            messaging_rules,
            brand_differentiators,
            topic_targeting: text(&raw, "topic_targeting"),
            procedure_language,
            brand_mission: text(&raw, "brand_mission"),
            slogan: text(&raw, "slogan"),
            tagline: text(&raw, "tagline"),
            services: text_list(raw.get("services")),
            brand_keywords: text_list(raw.get("brand_keywords")),
            seo_focus: text_list(raw.get("seo_focus")),
            content_preferences,
            location_count,
            competitors: text_list(raw.get("competitors")),
            raw,
        })
    }

    /// Parses a profile from JSON text.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Deserialization` for malformed JSON, otherwise the errors of
    /// [`ClientProfile::from_value`].
    pub fn from_json_str(contents: &str) -> CoreResult<Self> {
        let value: Value = serde_json::from_str(contents).map_err(CoreError::Deserialization)?;
        Self::from_value(value)
    }

    /// The stored JSON object this profile was parsed from.
    pub fn raw(&self) -> &Map<String, Value> {
        &self.raw
    }

    /// Converts the profile back into its stored JSON form.
    pub fn into_value(self) -> Value {
        Value::Object(self.raw)
    }

    /// Name for display, falling back to the client id.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

impl serde::Serialize for ClientProfile {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.raw.serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for ClientProfile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        ClientProfile::from_value(value).map_err(serde::de::Error::custom)
    }
}

fn text(map: &Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(Value::String(text)) if !text.trim().is_empty() => Some(text.clone()),
        _ => None,
    }
}

fn text_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Truthiness of a preference value: `true`, a non-zero number, or a non-empty string, list or
/// object.
fn flag(map: &Map<String, Value>, key: &str) -> bool {
    match map.get(key) {
        Some(Value::Bool(on)) => *on,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(text)) => !text.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::Object(fields)) => !fields.is_empty(),
        Some(Value::Null) | None => false,
    }
}
