//! Content brief returned by the language model.
//!
//! The brief is an external contract: the prompt asks for a JSON object of this shape, and the
//! model's reply is parsed leniently. Every field is optional so a partially conforming reply
//! still produces a usable brief; consumers render missing text as "N/A".

use crate::{CoreError, CoreResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One H2 section of the outline with its writer guidance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct H2Section {
    #[serde(default, deserialize_with = "lenient_text")]
    pub heading: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub h3_content: Option<String>,
}

/// The structured SEO content outline.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBrief {
    #[serde(default, deserialize_with = "lenient_text")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub meta: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub primary_keywords: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub cta: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub resources: Vec<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub h1: Option<String>,
    #[serde(default, deserialize_with = "lenient_sections")]
    pub h2_sections: Vec<H2Section>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub jasper_notes: Option<String>,
}

/// Parses a model reply into a [`ContentBrief`].
///
/// Surrounding whitespace and a Markdown code fence (with or without a `json` tag) are
/// stripped first.
///
/// # Errors
///
/// Returns `CoreError::BriefParse` if the remaining text is not a JSON object of the expected
/// shape.
pub fn parse_brief_reply(reply: &str) -> CoreResult<ContentBrief> {
    serde_json::from_str(strip_code_fence(reply)).map_err(CoreError::BriefParse)
}

/// Removes a surrounding ```` ``` ```` / ```` ```json ```` fence, if any.
pub fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest
        .strip_prefix("json")
        .or_else(|| rest.strip_prefix("JSON"))
        .unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Accepts a string, a list of strings (joined with newlines), or null.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => Some(text),
        Value::Array(items) => {
            let parts: Vec<String> = items.into_iter().filter_map(scalar_text).collect();
            (!parts.is_empty()).then(|| parts.join("\n"))
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts a list of scalars, a single comma-separated string, or null.
fn lenient_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(scalar_text).collect(),
        Value::String(text) => text
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect(),
        _ => Vec::new(),
    })
}

/// Accepts a list of section objects or bare heading strings; anything else yields no sections.
fn lenient_sections<'de, D>(deserializer: D) -> Result<Vec<H2Section>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Array(items) = Value::deserialize(deserializer)? else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| match item {
            Value::String(heading) => Some(H2Section {
                heading: Some(heading),
                h3_content: None,
            }),
            Value::Object(_) => serde_json::from_value(item).ok(),
            _ => None,
        })
        .collect())
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"{
        "title": "Knee Pain Relief in Austin",
        "meta": "Explore non-surgical knee pain options.",
        "primaryKeywords": "knee pain austin",
        "keywords": ["knee pain", "orthopedics"],
        "cta": "Book a consultation",
        "resources": ["AAOS knee guide"],
        "h1": "Knee Pain Relief Without Surgery",
        "h2Sections": [
            {"heading": "What Causes Knee Pain", "h3Content": "Mention arthritis prevalence."}
        ],
        "url": "/knee-pain-relief-austin",
        "jasperNotes": "Targets local intent."
    }"#;

    #[test]
    fn test_parses_plain_json_reply() {
        let brief = parse_brief_reply(REPLY).expect("reply should parse");
        assert_eq!(brief.title.as_deref(), Some("Knee Pain Relief in Austin"));
        assert_eq!(brief.primary_keywords.as_deref(), Some("knee pain austin"));
        assert_eq!(brief.keywords, vec!["knee pain", "orthopedics"]);
        assert_eq!(brief.h2_sections.len(), 1);
        assert_eq!(
            brief.h2_sections[0].h3_content.as_deref(),
            Some("Mention arthritis prevalence.")
        );
        assert_eq!(brief.jasper_notes.as_deref(), Some("Targets local intent."));
    }

    #[test]
    fn test_strips_code_fences() {
        let fenced = format!("```json\n{REPLY}\n```");
        assert_eq!(parse_brief_reply(&fenced).unwrap(), parse_brief_reply(REPLY).unwrap());

        let bare = format!("  ```\n{REPLY}```  ");
        assert_eq!(parse_brief_reply(&bare).unwrap(), parse_brief_reply(REPLY).unwrap());
    }

    #[test]
    fn test_strip_code_fence_leaves_unfenced_text() {
        assert_eq!(strip_code_fence("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn test_lenient_shapes() {
        let brief = parse_brief_reply(
            r#"{
                "primaryKeywords": ["knee pain", "knee doctor"],
                "keywords": "one, two ,three",
                "h2Sections": [{"heading": "H", "h3Content": ["Point one.", "Point two."]}],
                "cta": null
            }"#,
        )
        .expect("lenient reply should parse");

        assert_eq!(
            brief.primary_keywords.as_deref(),
            Some("knee pain\nknee doctor")
        );
        assert_eq!(brief.keywords, vec!["one", "two", "three"]);
        assert_eq!(
            brief.h2_sections[0].h3_content.as_deref(),
            Some("Point one.\nPoint two.")
        );
        assert!(brief.cta.is_none());
        assert!(brief.resources.is_empty());
    }

    #[test]
    fn test_null_sections_yield_empty_outline() {
        let brief = parse_brief_reply(r#"{"title": "T", "h2Sections": null}"#)
            .expect("null sections should parse");
        assert_eq!(brief.title.as_deref(), Some("T"));
        assert!(brief.h2_sections.is_empty());

        let brief = parse_brief_reply(r#"{"title": "T", "h2Sections": "Intro"}"#).unwrap();
        assert!(brief.h2_sections.is_empty());
    }

    #[test]
    fn test_heading_strings_become_sections() {
        let brief = parse_brief_reply(
            r#"{"title": "T", "h2Sections": ["Intro", 7, {"heading": "Causes"}, "Treatment"]}"#,
        )
        .expect("heading list should parse");

        let headings: Vec<_> = brief
            .h2_sections
            .iter()
            .map(|s| s.heading.as_deref())
            .collect();
        assert_eq!(headings, vec![Some("Intro"), Some("Causes"), Some("Treatment")]);
        assert!(brief.h2_sections[0].h3_content.is_none());
    }

    #[test]
    fn test_malformed_reply_is_an_error() {
        let err = parse_brief_reply("Sure! Here is your brief: {").expect_err("should fail");
        assert!(matches!(err, CoreError::BriefParse(_)));
    }

    #[test]
    fn test_serializes_with_camel_case_keys() {
        let brief = parse_brief_reply(REPLY).unwrap();
        let value = serde_json::to_value(&brief).unwrap();
        assert_eq!(value["primaryKeywords"], "knee pain austin");
        assert_eq!(value["h2Sections"][0]["h3Content"], "Mention arthritis prevalence.");
    }
}
