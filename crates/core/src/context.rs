//! Client-context synthesis.
//!
//! Turns a [`ClientProfile`] into the newline-joined context block that is appended to the
//! brief-generation prompt. Line order is fixed: the constraints writers must honour
//! (messaging rules, differentiators, procedure language) come ahead of softer signals.
//!
//! Every field is independently optional. A field that is missing or empty contributes no lines;
//! placeholder text such as "N/A" is the prompt template's business, not this module's.
//!
//! ## Line order
//!
//! 1. identity: client, specialty, location, brand voice
//! 2. audience: structured primary/secondary segments, or the legacy free-text line
//! 3. messaging do's, then don'ts
//! 4. clinical differentiators (first 3), then philosophical approach (first 2)
//! 5. topic targeting, then procedure-language requirements
//! 6. brand mission, then positioning (slogan | tagline)
//! 7. services
//! 8. brand keywords (first 8)
//! 9. SEO focus keywords
//! 10. content preferences
//! 11. practice location count
//! 12. competitors

use crate::constants::{
    MAX_BRAND_KEYWORDS, MAX_CLINICAL_STRENGTHS, MAX_PHILOSOPHICAL_STRENGTHS,
};
use crate::profile::{ClientProfile, ContentPreferences, TargetAudience};

/// Synthesises the context block for a profile.
///
/// Returns an empty string when `profile` is `None`; callers treat that as "use generic
/// defaults", not as an error. The output is a pure function of the profile.
pub fn synthesize(profile: Option<&ClientProfile>) -> String {
    profile.map(context_lines).unwrap_or_default().join("\n")
}

/// The individual context lines for a profile, in priority order.
pub fn context_lines(profile: &ClientProfile) -> Vec<String> {
    let mut lines = Vec::new();

    push_identity(&mut lines, profile);
    push_audience(&mut lines, profile.target_audience.as_ref());

    let rules = &profile.messaging_rules;
    push_section(&mut lines, "MESSAGING DO's:", "✅", &rules.dos, usize::MAX);
    push_section(&mut lines, "MESSAGING DON'Ts:", "❌", &rules.donts, usize::MAX);

    let diff = &profile.brand_differentiators;
    push_section(
        &mut lines,
        "CLINICAL DIFFERENTIATORS:",
        "🏥",
        &diff.clinical_strengths,
        MAX_CLINICAL_STRENGTHS,
    );
    push_section(
        &mut lines,
        "PHILOSOPHICAL APPROACH:",
        "💭",
        &diff.philosophical_strengths,
        MAX_PHILOSOPHICAL_STRENGTHS,
    );

    if let Some(topic) = &profile.topic_targeting {
        lines.push(format!("TOPIC TARGETING: {topic}"));
    }
    push_section(
        &mut lines,
        "PROCEDURE LANGUAGE REQUIREMENTS:",
        "📋",
        &profile.procedure_language,
        usize::MAX,
    );

    if let Some(mission) = &profile.brand_mission {
        lines.push(format!("BRAND MISSION: {mission}"));
    }
    if profile.slogan.is_some() || profile.tagline.is_some() {
        lines.push(format!(
            "BRAND POSITIONING: {} | {}",
            profile.slogan.as_deref().unwrap_or(""),
            profile.tagline.as_deref().unwrap_or("")
        ));
    }

    push_joined(&mut lines, "SERVICES", &profile.services, usize::MAX);
    push_joined(
        &mut lines,
        "BRAND KEYWORDS",
        &profile.brand_keywords,
        MAX_BRAND_KEYWORDS,
    );
    push_joined(&mut lines, "SEO FOCUS KEYWORDS", &profile.seo_focus, usize::MAX);

    let preferences = preference_fragments(&profile.content_preferences);
    if !preferences.is_empty() {
        lines.push(format!("CONTENT PREFERENCES: {}", preferences.join(", ")));
    }

    if profile.location_count > 0 {
        lines.push(format!(
            "PRACTICE LOCATIONS: {} locations across {}",
            profile.location_count,
            profile.location.as_deref().unwrap_or("the area")
        ));
    }

    push_joined(&mut lines, "MAIN COMPETITORS", &profile.competitors, usize::MAX);

    lines
}

fn push_identity(lines: &mut Vec<String>, profile: &ClientProfile) {
    let identity = [
        ("CLIENT", &profile.name),
        ("SPECIALTY", &profile.specialty),
        ("LOCATION", &profile.location),
        ("BRAND VOICE", &profile.voice_tone),
    ];
    for (label, value) in identity {
        if let Some(value) = value {
            lines.push(format!("{label}: {value}"));
        }
    }
}

fn push_audience(lines: &mut Vec<String>, audience: Option<&TargetAudience>) {
    match audience {
        Some(TargetAudience::Segmented { primary, secondary }) => {
            push_joined(lines, "PRIMARY AUDIENCE", primary, usize::MAX);
            push_joined(lines, "SECONDARY AUDIENCE", secondary, usize::MAX);
        }
        Some(TargetAudience::Legacy(text)) => lines.push(format!("TARGET AUDIENCE: {text}")),
        None => {}
    }
}

/// A header line followed by one marked line per item, or nothing when `items` is empty.
fn push_section(lines: &mut Vec<String>, header: &str, marker: &str, items: &[String], cap: usize) {
    if items.is_empty() {
        return;
    }
    lines.push(header.to_string());
    lines.extend(items.iter().take(cap).map(|item| format!("{marker} {item}")));
}

fn push_joined(lines: &mut Vec<String>, label: &str, items: &[String], cap: usize) {
    if items.is_empty() {
        return;
    }
    let joined = items
        .iter()
        .take(cap)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    lines.push(format!("{label}: {joined}"));
}

fn preference_fragments(prefs: &ContentPreferences) -> Vec<String> {
    let mut fragments = Vec::new();
    if let Some(tone) = &prefs.tone {
        fragments.push(format!("tone: {tone}"));
    }
    if prefs.include_statistics {
        fragments.push("include relevant statistics".to_string());
    }
    if prefs.include_patient_stories == Some(false) {
        fragments.push("avoid patient stories".to_string());
    }
    if prefs.focus_on_function {
        fragments.push("focus on restoring function over just pain relief".to_string());
    }
    if prefs.avoid_surgery_references {
        fragments.push("avoid surgery references completely".to_string());
    }
    fragments
}
