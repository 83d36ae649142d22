//! Request text sent to the analysis service

use crate::utils::format::take_chars;

const MAX_CONTENT_CHARS: usize = 2000;

pub const ANALYSIS_PROMPT: &str = r#"Analyze this prompt and provide comprehensive metadata in JSON format:

{{CONTENT}}

Provide your analysis as a JSON object with these fields:
{
  "title": "3-5 word professional title capturing the main role",
  "category": "specific category, e.g. 'Business Strategy', 'Creative Writing', 'Personal Development'",
  "tags": ["2-3", "relevant", "tags"],
  "privacy_recommendation": "public or private",
  "privacy_reasoning": "brief explanation for the privacy recommendation",
  "complexity_level": "basic, intermediate, or advanced",
  "use_case": "brief description of the main use case",
  "recommended_model": "model best suited to run this prompt, or null",
  "temperature": 0.7,
  "max_tokens": "expected response length as a token range, e.g. '1000-2000'",
  "discovery": {
    "purpose": "One clear sentence: what does this prompt help accomplish?",
    "best_for": "Specific situations or problems this addresses",
    "session_length": "Estimated time for a typical session, e.g. '10-15 minutes'",
    "interaction_style": "Communication approach, e.g. 'Direct but supportive'",
    "outcome": "What the user gets from using this prompt",
    "try_if": "One compelling reason to try this prompt, in quotes"
  }
}

Judge privacy from the PROMPT CONTENT itself, not from how it might be used.

PRIVATE if the prompt contains:
- personal details, real names, company-specific or confidential information
- personality traits, individual challenges or other characteristics of a specific person
- context like "You're working with someone who is..." tailored to one individual

PUBLIC if the prompt contains:
- general-purpose tools, universal frameworks, widely applicable methods
- generic coaching or advisory content that reveals nothing about its user

If the prompt reveals personal information about its creator or user, it is PRIVATE.

Respond ONLY with the JSON object, no other text."#;

/// Fill the analysis template with (at most the first 2000 chars of) `content`
pub fn build_analysis_prompt(content: &str) -> String {
    let excerpt = take_chars(content, MAX_CONTENT_CHARS);
    let ellipsis = if excerpt.len() < content.len() { "..." } else { "" };
    ANALYSIS_PROMPT.replace("{{CONTENT}}", &format!("{}{}", excerpt, ellipsis))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_analysis_prompt() {
        let prompt = build_analysis_prompt("You are a helpful editor.");
        assert!(prompt.contains("You are a helpful editor.\n"));
        assert!(!prompt.contains("{{CONTENT}}"));

        let long = "a".repeat(2500);
        let prompt = build_analysis_prompt(&long);
        assert!(prompt.contains(&format!("{}...", "a".repeat(2000))));
        assert!(!prompt.contains(&"a".repeat(2001)));
    }
}
