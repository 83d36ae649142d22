use chrono::{DateTime, Local, Utc};
use serde::{self, Deserialize};

const FORMAT: &str = "%Y-%m-%d %H:%M";

/// Serialize Option<String> as empty string when None
pub fn serialize_option_string<S>(option: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match option {
        Some(value) => serializer.serialize_str(value),
        None => serializer.serialize_str(""),
    }
}

/// Deserialize empty string as None
pub fn deserialize_option_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    if s.is_empty() { Ok(None) } else { Ok(Some(s)) }
}

/// Timestamp in the user's local time zone
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format(FORMAT).to_string()
}

pub fn format_optional_datetime(dt: Option<&DateTime<Utc>>) -> String {
    dt.map(format_datetime).unwrap_or_else(|| "never".to_string())
}

pub fn format_tags_comma(tags: &[String]) -> String {
    tags.join(", ")
}

pub fn format_tags_hash(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("#{}", t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split user input like `a, b,,c` into tags
pub fn parse_tag_list(input: &str) -> Vec<String> {
    crate::core::data::normalize_tags(input.split(','))
}

/// Truncate to at most `max_chars` characters, marking the cut with `...`
pub fn truncate_string(text: &str, max_chars: usize) -> String {
    let flat = text.replace('\n', " ");
    if flat.chars().count() <= max_chars {
        return flat;
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = flat.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Cut to at most `max_chars` characters without any marker
pub fn take_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Cut to at most `max_bytes` bytes, backing off to a char boundary
pub fn take_bytes(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    let end = (0..=max_bytes)
        .rev()
        .find(|&idx| text.is_char_boundary(idx))
        .unwrap_or(0);
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("short", 10), "short");
        assert_eq!(truncate_string("line one\nline two", 40), "line one line two");
        assert_eq!(truncate_string("abcdefghijkl", 8), "abcde...");
        assert_eq!(truncate_string("日本語のテキストです", 6), "日本語...");
    }

    #[test]
    fn test_take_chars_respects_char_boundaries() {
        assert_eq!(take_chars("héllo wörld", 7), "héllo w");
        assert_eq!(take_chars("abc", 10), "abc");
        assert_eq!(take_chars("", 3), "");
    }

    #[test]
    fn test_take_bytes_backs_off_to_char_boundary() {
        assert_eq!(take_bytes("abc", 10), "abc");
        assert_eq!(take_bytes("abcdef", 4), "abcd");
        // each of these is three bytes
        assert_eq!(take_bytes("提示词", 7), "提示");
        assert_eq!(take_bytes("提示词", 2), "");
    }

    #[test]
    fn test_parse_tag_list() {
        assert_eq!(
            parse_tag_list(" writing, AI ,,ai, coaching"),
            vec!["writing", "AI", "coaching"]
        );
        assert!(parse_tag_list("  ").is_empty());
    }

    #[test]
    fn test_format_tags() {
        let tags = vec!["a".to_string(), "b".to_string()];
        assert_eq!(format_tags_comma(&tags), "a, b");
        assert_eq!(format_tags_hash(&tags), "#a #b");
        assert_eq!(format_optional_datetime(None), "never");
    }
}
