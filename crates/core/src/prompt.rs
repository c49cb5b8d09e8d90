//! Prompt construction for brief generation.
//!
//! Both prompts are pure functions of a [`PromptContext`], so the wording can be tested
//! without touching the network.

use crate::constants::{DEFAULT_LOCATION, DEFAULT_PRACTICE_NAME, DEFAULT_SPECIALTY};
use crate::profile::ClientProfile;

/// Name, specialty and location that every prompt carries, with generic fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicClientInfo {
    pub name: String,
    pub specialty: String,
    pub location: String,
}

impl BasicClientInfo {
    /// Builds the basic block from request-supplied values.
    ///
    /// Blank values fall back to "Healthcare Practice", "General Healthcare" and "Local Area".
    pub fn from_request(name: &str, specialty: &str, location: &str) -> Self {
        fn or_default(value: &str, default: &str) -> String {
            let value = value.trim();
            if value.is_empty() {
                default.to_string()
            } else {
                value.to_string()
            }
        }

        Self {
            name: or_default(name, DEFAULT_PRACTICE_NAME),
            specialty: or_default(specialty, DEFAULT_SPECIALTY),
            location: or_default(location, DEFAULT_LOCATION),
        }
    }

    /// Replaces each value the stored profile provides; request values fill the gaps.
    pub fn overlay(self, profile: &ClientProfile) -> Self {
        Self {
            name: profile.name.clone().unwrap_or(self.name),
            specialty: profile.specialty.clone().unwrap_or(self.specialty),
            location: profile.location.clone().unwrap_or(self.location),
        }
    }
}

/// Everything the prompt builders need.
#[derive(Debug, Clone, Copy)]
pub struct PromptContext<'a> {
    pub topic: &'a str,
    pub client: &'a BasicClientInfo,
    /// Synthesised context block; empty when no profile was found.
    pub client_context: &'a str,
}

impl PromptContext<'_> {
    pub fn has_client_context(&self) -> bool {
        !self.client_context.trim().is_empty()
    }
}

/// The system instruction sent ahead of the user prompt.
pub fn build_system_prompt(has_client_context: bool) -> String {
    let mut prompt = String::from(
        "You are Jasper, an expert SEO content strategist specializing in healthcare marketing. \
         You create detailed content briefs that convert patients into appointments.",
    );
    if has_client_context {
        prompt.push_str(
            " You have comprehensive knowledge about this specific client including their \
             messaging rules, brand differentiators, and content preferences. Use this \
             intelligence to create highly personalized content.",
        );
    }
    prompt.push_str(
        " CRITICAL: Always respond with ONLY valid JSON format - no extra text before or after \
         the JSON.",
    );
    prompt
}

/// The user prompt requesting a brief for `ctx.topic`.
pub fn build_user_prompt(ctx: &PromptContext<'_>) -> String {
    let client = ctx.client;
    let mut prompt = String::new();

    prompt.push_str(
        "Create a blog assignment that matches our content workflow template and uses \
         everything we know about the client.\n\n",
    );
    prompt.push_str(&format!("BLOG TOPIC: {}\n\n", ctx.topic.trim()));
    prompt.push_str("BASIC CLIENT CONTEXT:\n");
    prompt.push_str(&format!("- Practice Name: {}\n", client.name));
    prompt.push_str(&format!("- Medical Specialty: {}\n", client.specialty));
    prompt.push_str(&format!("- Location: {}\n\n", client.location));

    if ctx.has_client_context() {
        prompt.push_str("COMPREHENSIVE CLIENT INTELLIGENCE:\n");
        prompt.push_str(ctx.client_context.trim_end());
        prompt.push_str("\n\n");
    }

    prompt.push_str("Please generate content in this EXACT JSON format:\n");
    prompt.push_str(BRIEF_JSON_SHAPE);
    prompt.push_str("\n\nCRITICAL REQUIREMENTS:\n");
    prompt.push_str("- Generate 4-5 H2 sections (not just 1-2)\n");
    prompt.push_str("- Give each section 4-5 detailed points of 15-20 words of actionable guidance\n");
    prompt.push_str(
        "- Follow SEO and GEO best practices for H2s, including locality and long-tail keywords\n",
    );
    prompt.push_str(
        "- Make the last H2 a strong CTA that references the on-page content and services offered\n",
    );
    prompt.push_str(&format!(
        "- Make it specific to {} in {}\n",
        client.specialty, client.location
    ));
    prompt.push_str("- Give writers clear direction on what to include\n");
    if ctx.has_client_context() {
        prompt.push_str(
            "- Follow ALL messaging rules, brand differentiators, and content preferences above\n",
        );
    }

    prompt.push_str("\nCONTENT GUIDANCE REQUIREMENTS:\n");
    prompt.push_str("- Write section guidance as flowing sentences, not bullet points\n");
    prompt.push_str("- Include specific statistics, facts, or details writers should mention\n");
    prompt.push_str(
        "- Highlight 10-15 keywords that matter most for organic and AI search ranking\n",
    );
    prompt.push_str("- Focus on what information to include, not how to write it\n");
    prompt.push_str(
        "- Avoid generic phrases like \"set the tone\" or \"use accessible language\"\n",
    );
    prompt.push_str("\nExample guidance:\n");
    prompt.push_str(GUIDANCE_EXAMPLE);
    prompt.push('\n');

    prompt
}

const BRIEF_JSON_SHAPE: &str = r#"{
  "title": "SEO optimized title tag under 60 characters",
  "meta": "Compelling meta description under 160 characters",
  "primaryKeywords": "Main target keyword phrase",
  "keywords": ["keyword1", "keyword2", "keyword3", "keyword4", "keyword5"],
  "cta": "Specific call-to-action recommendation for this content",
  "resources": ["Resource 1 suggestion", "Resource 2 suggestion", "Resource 3 suggestion"],
  "h1": "Main page heading",
  "h2Sections": [
    {
      "heading": "H2 section title",
      "h3Content": "Detailed content guidance: specific angles, key information, and points that align with brand messaging."
    }
  ],
  "url": "/url-slug-format",
  "jasperNotes": "Strategic insights explaining why this content matters for organic and AI search, which keywords it targets and why, written for a practice administrator or CEO."
}"#;

const GUIDANCE_EXAMPLE: &str = "\"Mention how the condition affects 40% of adults over 35. \
Explain how fluoroscopic guidance increases procedure accuracy compared to blind injections. \
Highlight fellowship-trained expertise as a differentiator. Address patient concerns about \
downtime and mention same-day return to activity for most patients.\"";
