//! Plain-text rendering of blog assignments.
//!
//! Everything here is pure: callers pass the clock reading in, so output is reproducible.

use chrono::{NaiveDate, NaiveDateTime};
use jasper_core::constants::DEFAULT_PRACTICE_NAME;
use jasper_core::{ClientProfile, ContentBrief};
use serde_json::Value;

pub const TEMPLATE_TITLE: &str = "Jasper Blog Assignment Template - MASTER";

/// Text written into a freshly created master template document.
pub const MASTER_TEMPLATE: &str = "\
**Title:** <title-tag>
**Meta:** <meta-description>
**Primary Keywords:** <primary-keywords>
**Keywords:** <keywords>
**CTA:** <cta>
**Resources:**
<resources>

**Client Information:**
Practice: <client-name>
Specialty: <client-specialty>
Location: <client-location>
Brand Voice: <client-brand-voice>
Target Audience: <target-audience>

**Content Structure:**
[Content writers fill this section based on generated outline]

H1:

H2:

H2:

H2:

H2:

**Notes:**
Generated by Jasper - Your AI SEO Assistant
";

const NOT_AVAILABLE: &str = "N/A";

/// `Blog Assignment - <topic> - <client> - MM/DD/YYYY`.
pub fn document_title(blog_topic: &str, client_name: Option<&str>, date: NaiveDate) -> String {
    format!(
        "Blog Assignment - {} - {} - {}",
        blog_topic.trim(),
        client_name.unwrap_or(DEFAULT_PRACTICE_NAME),
        date.format("%m/%d/%Y")
    )
}

/// Shareable edit link for a document.
pub fn document_url(doc_id: &str) -> String {
    format!("https://docs.google.com/document/d/{doc_id}/edit")
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(NOT_AVAILABLE)
}

fn bulleted(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("• {item}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// The complete assignment used when no template is available.
pub fn render_assignment(
    brief: &ContentBrief,
    blog_topic: &str,
    client: Option<&ClientProfile>,
    generated_at: NaiveDateTime,
) -> String {
    let rule = |n: usize| "-".repeat(n);
    let mut lines: Vec<String> = Vec::new();

    lines.push("JASPER'S BLOG ASSIGNMENT".into());
    lines.push("=".repeat(50));
    lines.push(format!(
        "Generated on: {}",
        generated_at.format("%B %d, %Y at %I:%M %p")
    ));
    lines.push(String::new());

    lines.push("BLOG TOPIC".into());
    lines.push(rule(20));
    lines.push(blog_topic.trim().to_string());
    lines.push(String::new());

    if let Some(client) = client {
        lines.push("CLIENT INFORMATION".into());
        lines.push(rule(30));
        lines.push(format!("Practice: {}", or_na(&client.name)));
        lines.push(format!("Specialty: {}", or_na(&client.specialty)));
        lines.push(format!("Location: {}", or_na(&client.location)));
        lines.push(format!(
            "Brand Voice: {}",
            client.voice_tone.as_deref().unwrap_or("Standard")
        ));
        lines.push(format!(
            "Target Audience: {}",
            client
                .target_audience
                .as_ref()
                .map(|a| a.summary())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| "General patients".into())
        ));
        lines.push(String::new());
    }

    lines.push("SEO ASSIGNMENT".into());
    lines.push(rule(25));
    lines.push(format!("Title: {}", or_na(&brief.title)));
    lines.push(format!("Meta Description: {}", or_na(&brief.meta)));
    lines.push(format!("Primary Keywords: {}", or_na(&brief.primary_keywords)));
    lines.push(format!("Keywords: {}", brief.keywords.join(", ")));
    lines.push(format!("Call-to-Action: {}", or_na(&brief.cta)));
    lines.push(format!("URL Slug: {}", or_na(&brief.url)));
    lines.push(String::new());

    lines.push("Resources:".into());
    if !brief.resources.is_empty() {
        lines.push(bulleted(&brief.resources));
    }
    lines.push(String::new());

    lines.push("CONTENT STRUCTURE".into());
    lines.push(rule(30));
    lines.push(format!("H1: {}", or_na(&brief.h1)));
    lines.push(String::new());

    for section in &brief.h2_sections {
        lines.push(format!(
            "H2: {}",
            section.heading.as_deref().unwrap_or_default()
        ));
        lines.push("Content Guidelines:".into());
        lines.push(section.h3_content.clone().unwrap_or_default());
        lines.push(String::new());
    }

    if let Some(notes) = brief.jasper_notes.as_deref().filter(|n| !n.is_empty()) {
        lines.push("JASPER'S STRATEGIC INSIGHTS".into());
        lines.push(rule(40));
        lines.push(notes.to_string());
        lines.push(String::new());
    }

    lines.push(rule(50));
    lines.push("Generated by Jasper - Your AI SEO Assistant".into());
    lines.push("Ready to create amazing content!".into());

    lines.join("\n")
}

/// Placeholder values for the template path, in replacement order.
///
/// Client placeholders are only included when a client profile is available.
pub fn template_replacements(
    brief: &ContentBrief,
    client: Option<&ClientProfile>,
) -> Vec<(&'static str, String)> {
    let mut replacements = vec![
        ("<title-tag>", or_na(&brief.title).to_string()),
        ("<meta-description>", or_na(&brief.meta).to_string()),
        ("<primary-keywords>", or_na(&brief.primary_keywords).to_string()),
        ("<keywords>", brief.keywords.join(", ")),
        ("<cta>", or_na(&brief.cta).to_string()),
        ("<resources>", bulleted(&brief.resources)),
    ];

    if let Some(client) = client {
        let text = |value: &Option<String>| value.clone().unwrap_or_default();
        replacements.extend([
            ("<client-name>", text(&client.name)),
            ("<client-specialty>", text(&client.specialty)),
            ("<client-location>", text(&client.location)),
            ("<client-brand-voice>", text(&client.voice_tone)),
            (
                "<target-audience>",
                client
                    .target_audience
                    .as_ref()
                    .map(|a| a.summary())
                    .unwrap_or_default(),
            ),
        ]);
    }

    replacements
}

/// Replaces every occurrence of each placeholder.
///
/// # Returns
///
/// The filled text and the number of distinct placeholders that were found.
pub fn apply_template(template: &str, replacements: &[(&str, String)]) -> (String, usize) {
    let mut text = template.to_string();
    let mut replaced = 0;
    for (placeholder, value) in replacements {
        if text.contains(placeholder) {
            text = text.replace(placeholder, value);
            replaced += 1;
        }
    }
    (text, replaced)
}

/// Extracts the plain text of a Docs v1 document resource.
///
/// Paragraph text runs are concatenated. Table cells are followed by a tab and each table row
/// by a newline.
pub fn extract_text(document: &Value) -> String {
    let mut text = String::new();
    for element in array(document.pointer("/body/content")) {
        if let Some(paragraph) = element.get("paragraph") {
            push_paragraph(&mut text, paragraph);
        } else if let Some(table) = element.get("table") {
            for row in array(table.get("tableRows")) {
                for cell in array(row.get("tableCells")) {
                    for cell_element in array(cell.get("content")) {
                        if let Some(paragraph) = cell_element.get("paragraph") {
                            push_paragraph(&mut text, paragraph);
                        }
                    }
                    text.push('\t');
                }
                text.push('\n');
            }
        }
    }
    text
}

fn array(value: Option<&Value>) -> impl Iterator<Item = &Value> {
    value
        .and_then(Value::as_array)
        .map(|items| items.iter())
        .into_iter()
        .flatten()
}

fn push_paragraph(text: &mut String, paragraph: &Value) {
    for element in array(paragraph.get("elements")) {
        if let Some(content) = element.pointer("/textRun/content").and_then(Value::as_str) {
            text.push_str(content);
        }
    }
}
