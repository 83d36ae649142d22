//! Local metadata extraction that needs no network
//!
//! Used ahead of the analysis service (local values win) and as the whole
//! suggestion when the service is unavailable.

use crate::core::data::{TEMPERATURE_RANGE, TechnicalNotes};
use crate::utils::format::take_chars;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;

const TITLE_SCAN_LINES: usize = 5;
const TECH_SCAN_LINES: usize = 15;
const MAX_FALLBACK_TITLE_CHARS: usize = 60;
const MAX_SECTION_CHARS: usize = 1000;
const MAX_ROLE_WORDS: usize = 8;
const LONG_PROMPT_CHARS: usize = 2000;
const TITLE_FIELDS: [&str; 4] = ["title", "role", "role_definition", "purpose"];

pub const UNTITLED: &str = "Untitled Prompt";

static TEMPERATURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"temperature[:\s*]*([0-9.]+)").expect("valid regex"));
static MAX_TOKENS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"max[_\s]*tokens?[:\s*]*([0-9,-]+)").expect("valid regex"));
static PURPOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?im)^\s*purpose:\s*([^,\n}]+)").expect("valid regex"));
static SECTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)technical implementation|implementation notes").expect("valid regex")
});

fn json_object(content: &str) -> Option<Map<String, Value>> {
    match serde_json::from_str::<Value>(content.trim()) {
        Ok(Value::Object(map)) => Some(map),
        _ => None,
    }
}

/// A title the author put in the prompt itself
pub fn local_title(content: &str) -> Option<String> {
    let heading = content
        .lines()
        .take(TITLE_SCAN_LINES)
        .filter_map(|line| line.trim().strip_prefix("# "))
        .map(str::trim)
        .find(|title| !title.is_empty());
    if let Some(title) = heading {
        return Some(title.to_string());
    }

    let map = json_object(content)?;
    TITLE_FIELDS
        .iter()
        .filter_map(|field| map.get(*field).and_then(Value::as_str))
        .map(str::trim)
        .find(|title| !title.is_empty())
        .map(|title| take_chars(title, MAX_FALLBACK_TITLE_CHARS).trim_end().to_string())
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .take(MAX_ROLE_WORDS)
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// "You are a code reviewer. ..." gives "Code Reviewer"
fn role_title(content: &str) -> Option<String> {
    content.lines().take(TITLE_SCAN_LINES).find_map(|line| {
        let line = line.trim();
        let lower = line.to_lowercase();
        let skip = ["you are an ", "you are a "]
            .into_iter()
            .find(|prefix| lower.starts_with(*prefix))?
            .len();
        let role = line.get(skip..)?.split('.').next()?.trim();
        Some(title_case(role)).filter(|title| !title.is_empty())
    })
}

fn purpose_title(content: &str) -> Option<String> {
    let purpose = PURPOSE_RE.captures(content)?.get(1)?.as_str().trim();
    Some(title_case(purpose.trim_matches('"'))).filter(|title| !title.is_empty())
}

/// A role or purpose stated in the text, else the first non-empty line
/// without heading markers, cut to 60 characters
pub fn fallback_title(content: &str) -> String {
    if let Some(title) = role_title(content).or_else(|| purpose_title(content)) {
        return take_chars(&title, MAX_FALLBACK_TITLE_CHARS).trim_end().to_string();
    }
    content
        .lines()
        .map(|line| line.trim().trim_start_matches('#').trim())
        .find(|line| !line.is_empty())
        .map(|line| take_chars(line, MAX_FALLBACK_TITLE_CHARS).trim_end().to_string())
        .unwrap_or_else(|| UNTITLED.to_string())
}

fn in_range(temperature: f64) -> Option<f64> {
    TEMPERATURE_RANGE.contains(&temperature).then_some(temperature)
}

fn model_mentioned(line: &str) -> Option<&'static str> {
    if !line.contains("llm") {
        return None;
    }
    if line.contains("claude") {
        Some(if line.contains("sonnet") {
            "Claude 3.5 Sonnet"
        } else if line.contains("opus") {
            "Claude 3 Opus"
        } else {
            "Claude"
        })
    } else if line.contains("gpt") {
        Some(if line.contains('4') { "GPT-4" } else { "GPT-3.5" })
    } else {
        None
    }
}

fn notes_from_json(map: &Map<String, Value>) -> TechnicalNotes {
    let temperature = map.get("temperature").and_then(|value| match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    });
    let max_tokens = map.get("max_tokens").and_then(|value| match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    });

    TechnicalNotes {
        recommended_model: map
            .get("recommended_llm")
            .and_then(Value::as_str)
            .map(str::to_string),
        temperature: temperature.and_then(in_range),
        max_tokens,
        additional_notes: Vec::new(),
    }
}

/// Model settings written into the prompt, or a hint when there are none
pub fn technical_notes(content: &str) -> TechnicalNotes {
    if let Some(map) = json_object(content) {
        let notes = notes_from_json(&map);
        if !notes.is_empty() {
            return notes;
        }
    }

    let mut notes = TechnicalNotes::default();

    for line in content.lines().take(TECH_SCAN_LINES) {
        let line = line.trim().to_lowercase();

        if let Some(model) = model_mentioned(&line) {
            notes.recommended_model = Some(model.to_string());
        }

        if let Some(caps) = TEMPERATURE_RE.captures(&line)
            && let Ok(value) = caps[1].parse::<f64>()
            && let Some(value) = in_range(value)
        {
            notes.temperature = Some(value);
        }

        if let Some(caps) = MAX_TOKENS_RE.captures(&line) {
            let tokens = caps[1].replace(',', "");
            let tokens = tokens.trim_matches('-');
            if !tokens.is_empty() {
                notes.max_tokens = Some(tokens.to_string());
            }
        }
    }

    if let Some(found) = SECTION_RE.find(content) {
        let section = take_chars(&content[found.start()..], MAX_SECTION_CHARS);
        notes.additional_notes.push(section.trim_end().to_string());
    }

    if notes.recommended_model.is_none()
        && notes.temperature.is_none()
        && notes.max_tokens.is_none()
        && let Some(hint) = temperature_hint(content)
    {
        notes.additional_notes.push(hint.to_string());
    }

    notes
}

fn temperature_hint(content: &str) -> Option<&'static str> {
    let lower = content.to_lowercase();
    let has_any = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if content.chars().count() > LONG_PROMPT_CHARS || has_any(&["complex", "advanced"]) {
        Some("Complex prompt - consider Claude 3.5 Sonnet with temperature 0.3-0.7")
    } else if has_any(&["creative", "inspire", "generate"]) {
        Some("Creative prompt - consider higher temperature (0.7-0.9)")
    } else if has_any(&["analysis", "precise", "accurate"]) {
        Some("Analytical prompt - consider lower temperature (0.1-0.4)")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_title_from_heading() {
        assert_eq!(local_title("# Title\nBody text").as_deref(), Some("Title"));
        assert_eq!(
            local_title("intro\n\n  # Deal Reviewer  \nrest").as_deref(),
            Some("Deal Reviewer")
        );
        assert_eq!(local_title("## Sub heading\nbody"), None);
        assert_eq!(local_title("1\n2\n3\n4\n5\n# Too late"), None);
        assert_eq!(local_title("plain text"), None);
    }

    #[test]
    fn test_local_title_from_json() {
        let json = r#"{"role_definition": "Senior Editor", "purpose": "Edit"}"#;
        assert_eq!(local_title(json).as_deref(), Some("Senior Editor"));
        assert_eq!(local_title(r#"{"title": "  "}"#), None);
        assert_eq!(local_title("[1, 2]"), None);
    }

    #[test]
    fn test_fallback_title() {
        assert_eq!(fallback_title("\n\n## Weekly Review\nbody"), "Weekly Review");
        assert_eq!(fallback_title("   "), UNTITLED);
        let long = format!("{} tail", "é".repeat(70));
        assert_eq!(fallback_title(&long).chars().count(), 60);
    }

    #[test]
    fn test_fallback_title_from_role_and_purpose() {
        assert_eq!(
            fallback_title("You are an expert code reviewer. Be strict.\nReview diffs."),
            "Expert Code Reviewer"
        );
        assert_eq!(fallback_title("you are a CHEF"), "Chef");
        assert_eq!(
            fallback_title("Notes\npurpose: draft weekly status emails, briefly"),
            "Draft Weekly Status Emails"
        );
        assert_eq!(fallback_title("You are here"), "You are here");
    }

    #[test]
    fn test_technical_notes_from_text() {
        let content = "Recommended LLM: Claude Sonnet\nTemperature: 0.4\nMax tokens: 4,000-6,000\n\nYou are a reviewer.";
        let notes = technical_notes(content);
        assert_eq!(notes.recommended_model.as_deref(), Some("Claude 3.5 Sonnet"));
        assert_eq!(notes.temperature, Some(0.4));
        assert_eq!(notes.max_tokens.as_deref(), Some("4000-6000"));
        assert!(notes.additional_notes.is_empty());
    }

    #[test]
    fn test_technical_notes_from_json() {
        let content = r#"{"recommended_llm": "GPT-4", "temperature": "0.2", "max_tokens": 800}"#;
        let notes = technical_notes(content);
        assert_eq!(notes.recommended_model.as_deref(), Some("GPT-4"));
        assert_eq!(notes.temperature, Some(0.2));
        assert_eq!(notes.max_tokens.as_deref(), Some("800"));
    }

    #[test]
    fn test_out_of_range_temperature_is_ignored() {
        let notes = technical_notes("temperature: 7\nbody");
        assert_eq!(notes.temperature, None);
    }

    #[test]
    fn test_implementation_section_and_hints() {
        let content = "You are a helper.\n\nImplementation Notes:\nUse short answers.";
        let notes = technical_notes(content);
        assert_eq!(
            notes.additional_notes[0],
            "Implementation Notes:\nUse short answers."
        );

        let creative = technical_notes("Generate a short story about the sea");
        assert_eq!(
            creative.additional_notes,
            vec!["Creative prompt - consider higher temperature (0.7-0.9)"]
        );

        let plain = technical_notes("Say hello");
        assert!(plain.is_empty());
    }
}
