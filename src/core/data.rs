//! Core data structures for prompt management
//!
//! This module contains the fundamental data structures used throughout
//! the promptvault application.

use crate::utils::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

pub const DEFAULT_CATEGORY: &str = "general";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const TEMPERATURE_RANGE: std::ops::RangeInclusive<f64> = 0.0..=2.0;

/// A single stored prompt with metadata
///
/// `id`, `content` and `created` are only set on construction. They are private
/// so that metadata edits cannot touch them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptRecord {
    id: String,
    pub title: String,
    content: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub private: bool,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technical_notes: TechnicalNotes,
    #[serde(default)]
    pub ai_analysis: AiAnalysis,
    #[serde(default)]
    pub discovery: Discovery,
    created: DateTime<Utc>,
    #[serde(default)]
    pub last_used: Option<DateTime<Utc>>,
    #[serde(default)]
    pub usage_count: u64,
}

/// Model settings recommended for running a prompt
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalNotes {
    #[serde(default)]
    pub recommended_model: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<String>,
    #[serde(default)]
    pub additional_notes: Vec<String>,
}

impl TechnicalNotes {
    pub fn is_empty(&self) -> bool {
        self.recommended_model.is_none()
            && self.temperature.is_none()
            && self.max_tokens.is_none()
            && self.additional_notes.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Basic,
    Intermediate,
    Advanced,
}

impl ComplexityLevel {
    /// Lenient parse used for untrusted analysis output
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "basic" => Some(Self::Basic),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for ComplexityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advisory output of the analysis service, kept for reference
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    #[serde(default)]
    pub complexity_level: Option<ComplexityLevel>,
    #[serde(default)]
    pub privacy_reasoning: Option<String>,
    #[serde(default)]
    pub suggested_category: Option<String>,
    #[serde(default)]
    pub suggested_tags: Vec<String>,
}

/// Short "when to use this" notes shown in the browser and searched
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Discovery {
    #[serde(default)]
    pub purpose: Option<String>,
    #[serde(default)]
    pub best_for: Option<String>,
    #[serde(default)]
    pub session_length: Option<String>,
    #[serde(default)]
    pub interaction_style: Option<String>,
    #[serde(default)]
    pub outcome: Option<String>,
    #[serde(default)]
    pub try_if: Option<String>,
}

impl Discovery {
    pub fn is_empty(&self) -> bool {
        self.fields().all(|(_, value)| value.is_none())
    }

    /// Labelled fields in display order
    pub fn fields(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> {
        [
            ("Purpose", self.purpose.as_deref()),
            ("Best for", self.best_for.as_deref()),
            ("Session", self.session_length.as_deref()),
            ("Style", self.interaction_style.as_deref()),
            ("Outcome", self.outcome.as_deref()),
            ("Try if", self.try_if.as_deref()),
        ]
        .into_iter()
    }
}

impl PromptRecord {
    /// Create a new prompt with a fresh ID and creation time
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            content: content.into(),
            category: DEFAULT_CATEGORY.to_string(),
            tags: Vec::new(),
            private: false,
            favorite: false,
            description: String::new(),
            technical_notes: TechnicalNotes::default(),
            ai_analysis: AiAnalysis::default(),
            discovery: Discovery::default(),
            created: Utc::now(),
            last_used: None,
            usage_count: 0,
        }
    }

    /// Override the creation time, used when importing existing prompts
    pub fn with_created(mut self, created: DateTime<Utc>) -> Self {
        self.created = created;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The 8 character prefix shown in listings and used in file names
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Replace the tag list, dropping blanks and case-insensitive duplicates
    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = normalize_tags(tags);
    }

    /// Add a tag if it doesn't already exist
    pub fn add_tag(&mut self, tag: &str) {
        let tag = tag.trim();
        if !tag.is_empty() && !self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            self.tags.push(tag.to_string());
        }
    }

    /// Check the invariants every persisted record must satisfy
    pub fn validate(&self) -> AppResult<()> {
        if self.content.trim().is_empty() {
            return Err(AppError::Validation("Prompt content cannot be empty".to_string()));
        }
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Title cannot be empty".to_string()));
        }
        if let Some(temperature) = self.technical_notes.temperature {
            validate_temperature(temperature)?;
        }
        Ok(())
    }

    /// Whether the write-once fields of `other` match this record
    pub(crate) fn same_identity(&self, other: &PromptRecord) -> bool {
        self.id == other.id && self.content == other.content && self.created == other.created
    }
}

pub fn validate_temperature(temperature: f64) -> AppResult<()> {
    if TEMPERATURE_RANGE.contains(&temperature) {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "Temperature must be between 0 and 2, got {}",
            temperature
        )))
    }
}

pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !result.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            result.push(tag.to_string());
        }
    }
    result
}

/// Collection of prompts loaded from both storage roots
#[derive(Debug, Clone, Default)]
pub struct PromptCollection {
    pub prompts: Vec<PromptRecord>,
}

/// Statistics about the prompt collection
#[derive(Debug, Default)]
pub struct PromptStats {
    pub total_prompts: usize,
    pub public_prompts: usize,
    pub private_prompts: usize,
    pub favorites: usize,
    pub total_usage: u64,
    pub tag_counts: HashMap<String, usize>,
    pub category_counts: HashMap<String, usize>,
}

impl PromptCollection {
    pub fn new(prompts: Vec<PromptRecord>) -> Self {
        Self { prompts }
    }

    /// Find a prompt by full ID, unique ID prefix, or exact title
    pub fn find(&self, identifier: &str) -> Option<&PromptRecord> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }

        if let Some(prompt) = self.prompts.iter().find(|p| p.id == identifier) {
            return Some(prompt);
        }

        if identifier.len() >= 4 {
            let mut by_prefix = self.prompts.iter().filter(|p| p.id.starts_with(identifier));
            if let (Some(prompt), None) = (by_prefix.next(), by_prefix.next()) {
                return Some(prompt);
            }
        }

        self.prompts
            .iter()
            .find(|p| p.title.eq_ignore_ascii_case(identifier))
    }

    /// All unique tags, sorted
    pub fn all_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .prompts
            .iter()
            .flat_map(|p| p.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// All unique non-empty categories, sorted
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .prompts
            .iter()
            .map(|p| p.category.clone())
            .filter(|cat| !cat.is_empty())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }

    pub fn stats(&self) -> PromptStats {
        let mut stats = PromptStats {
            total_prompts: self.prompts.len(),
            ..PromptStats::default()
        };

        for prompt in &self.prompts {
            if prompt.private {
                stats.private_prompts += 1;
            } else {
                stats.public_prompts += 1;
            }
            if prompt.favorite {
                stats.favorites += 1;
            }
            stats.total_usage += prompt.usage_count;

            for tag in &prompt.tags {
                *stats.tag_counts.entry(tag.clone()).or_insert(0) += 1;
            }
            *stats
                .category_counts
                .entry(prompt.category.clone())
                .or_insert(0) += 1;
        }

        stats
    }
}

impl std::fmt::Display for PromptRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]", self.title, self.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PromptRecord {
        let mut record = PromptRecord::new("Strategy Coach", "You are a strategy coach.");
        record.category = "Business Strategy".to_string();
        record.set_tags(["coaching", "strategy"]);
        record.private = true;
        record.description = "Quarterly planning".to_string();
        record.technical_notes = TechnicalNotes {
            recommended_model: Some("Claude 3.5 Sonnet".to_string()),
            temperature: Some(0.4),
            max_tokens: Some("4000-6000".to_string()),
            additional_notes: vec!["Keep answers short".to_string()],
        };
        record.ai_analysis = AiAnalysis {
            complexity_level: Some(ComplexityLevel::Advanced),
            privacy_reasoning: Some("Mentions the author's team".to_string()),
            suggested_category: Some("Business Strategy".to_string()),
            suggested_tags: vec!["strategy".to_string()],
        };
        record.discovery.purpose = Some("Plan the next quarter".to_string());
        record.last_used = Some(Utc::now());
        record.usage_count = 3;
        record
    }

    #[test]
    fn test_json_round_trip() {
        let record = sample();
        let json = serde_json::to_string_pretty(&record).unwrap();
        let restored: PromptRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, restored);
    }

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let json = r#"{
            "id": "0f8fad5b-d9cb-469f-a165-70867728950e",
            "title": "Minimal",
            "content": "Body",
            "category": "general",
            "created": "2024-05-01T10:00:00Z"
        }"#;
        let record: PromptRecord = serde_json::from_str(json).unwrap();
        assert!(record.tags.is_empty());
        assert!(!record.private);
        assert!(!record.favorite);
        assert_eq!(record.usage_count, 0);
        assert_eq!(record.short_id(), "0f8fad5b");
        assert!(record.ai_analysis.complexity_level.is_none());
    }

    #[test]
    fn test_tags_are_deduplicated() {
        let mut record = PromptRecord::new("t", "c");
        record.set_tags(["AI", " ai ", "", "writing"]);
        assert_eq!(record.tags, vec!["AI", "writing"]);
        record.add_tag("Writing");
        record.add_tag("coach");
        assert_eq!(record.tags, vec!["AI", "writing", "coach"]);
    }

    #[test]
    fn test_validate() {
        let mut record = PromptRecord::new("Title", "Body");
        assert!(record.validate().is_ok());

        record.technical_notes.temperature = Some(2.5);
        assert!(matches!(record.validate(), Err(AppError::Validation(_))));

        record.technical_notes.temperature = Some(2.0);
        assert!(record.validate().is_ok());

        record.title = "   ".to_string();
        assert!(matches!(record.validate(), Err(AppError::Validation(_))));

        let empty = PromptRecord::new("Title", "  \n ");
        assert!(matches!(empty.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_find_by_id_prefix_and_title() {
        let a = PromptRecord::new("Alpha", "a");
        let b = PromptRecord::new("Beta", "b");
        let a_id = a.id().to_string();
        let collection = PromptCollection::new(vec![a, b]);

        assert_eq!(collection.find(&a_id).unwrap().title, "Alpha");
        assert_eq!(collection.find(&a_id[..8]).unwrap().title, "Alpha");
        assert_eq!(collection.find("beta").unwrap().title, "Beta");
        assert!(collection.find("gamma").is_none());
        assert!(collection.find("").is_none());
    }

    #[test]
    fn test_stats() {
        let mut a = PromptRecord::new("A", "a");
        a.private = true;
        a.favorite = true;
        a.usage_count = 2;
        a.set_tags(["x", "y"]);
        let mut b = PromptRecord::new("B", "b");
        b.set_tags(["x"]);
        b.usage_count = 1;

        let stats = PromptCollection::new(vec![a, b]).stats();
        assert_eq!(stats.total_prompts, 2);
        assert_eq!(stats.private_prompts, 1);
        assert_eq!(stats.public_prompts, 1);
        assert_eq!(stats.favorites, 1);
        assert_eq!(stats.total_usage, 3);
        assert_eq!(stats.tag_counts["x"], 2);
        assert_eq!(stats.category_counts["general"], 2);
    }
}
