//! Metadata suggestions for new prompts
//!
//! [`Suggester::suggest`] never fails: when the analysis service cannot be
//! reached the suggestion is built from local heuristics and flagged as
//! degraded.

pub mod anthropic;
pub mod heuristics;
pub mod prompts;

use crate::config::AiConfig;
use crate::core::data::{
    AiAnalysis, ComplexityLevel, DEFAULT_CATEGORY, DEFAULT_TEMPERATURE, Discovery, PromptRecord,
    TEMPERATURE_RANGE, TechnicalNotes, normalize_tags,
};
use crate::utils::error::{AppError, AppResult};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

pub use anthropic::AnthropicClient;

pub const MAX_SUGGESTED_TAGS: usize = 6;

/// Anything that can answer an analysis request with the model's raw text
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, content: &str) -> AppResult<String>;
}

/// Shape of the analysis reply. Every field is optional because the service
/// output is not trusted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteAnalysis {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub privacy_recommendation: Option<String>,
    #[serde(default)]
    pub privacy_reasoning: Option<String>,
    #[serde(default)]
    pub complexity_level: Option<String>,
    #[serde(default)]
    pub use_case: Option<String>,
    #[serde(default)]
    pub recommended_model: Option<String>,
    #[serde(default)]
    pub temperature: Option<Value>,
    #[serde(default)]
    pub max_tokens: Option<Value>,
    #[serde(default)]
    pub discovery: Option<Discovery>,
}

impl RemoteAnalysis {
    fn temperature(&self) -> Option<f64> {
        let value = match self.temperature.as_ref()? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }?;
        TEMPERATURE_RANGE.contains(&value).then_some(value)
    }

    fn max_tokens(&self) -> Option<String> {
        match self.max_tokens.as_ref()? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        }
    }
}

/// Pull the first `{ ... }` block out of a reply that may carry prose or code fences
pub fn extract_json_object(response: &str) -> Option<&str> {
    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (end > start).then(|| &response[start..=end])
}

pub fn parse_analysis(response: &str) -> AppResult<RemoteAnalysis> {
    let json = extract_json_object(response).ok_or_else(|| {
        AppError::ServiceUnavailable("No JSON object in analysis response".to_string())
    })?;
    serde_json::from_str(json).map_err(|e| {
        AppError::ServiceUnavailable(format!("Malformed analysis response: {}", e))
    })
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Proposed metadata for a prompt, shown to the user before saving
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataSuggestion {
    pub title: String,
    pub category: String,
    pub tags: Vec<String>,
    pub private: bool,
    pub description: String,
    pub technical_notes: TechnicalNotes,
    pub ai_analysis: AiAnalysis,
    pub discovery: Discovery,
    /// Built without the analysis service
    pub degraded: bool,
    /// Why the suggestion is degraded
    pub notice: Option<String>,
}

impl MetadataSuggestion {
    /// Heuristics-only suggestion used when the service fails
    pub fn fallback(content: &str, reason: &AppError) -> Self {
        let mut technical_notes = heuristics::technical_notes(content);
        if technical_notes.temperature.is_none() {
            technical_notes.temperature = Some(DEFAULT_TEMPERATURE);
        }

        Self {
            title: heuristics::local_title(content)
                .unwrap_or_else(|| heuristics::fallback_title(content)),
            category: DEFAULT_CATEGORY.to_string(),
            tags: Vec::new(),
            private: false,
            description: String::new(),
            technical_notes,
            ai_analysis: AiAnalysis {
                complexity_level: Some(ComplexityLevel::Intermediate),
                ..AiAnalysis::default()
            },
            discovery: Discovery::default(),
            degraded: true,
            notice: Some(reason.to_string()),
        }
    }

    /// Merge a service reply with local findings. Local values win.
    pub fn from_analysis(content: &str, remote: RemoteAnalysis) -> Self {
        let local = heuristics::technical_notes(content);

        let mut tags = normalize_tags(remote.tags.clone().unwrap_or_default());
        tags.truncate(MAX_SUGGESTED_TAGS);

        let category = non_empty(remote.category.as_deref());
        let title = heuristics::local_title(content)
            .or_else(|| non_empty(remote.title.as_deref()))
            .unwrap_or_else(|| heuristics::fallback_title(content));
        let private = remote
            .privacy_recommendation
            .as_deref()
            .is_some_and(|p| p.trim().eq_ignore_ascii_case("private"));

        let technical_notes = TechnicalNotes {
            recommended_model: local
                .recommended_model
                .or_else(|| non_empty(remote.recommended_model.as_deref())),
            temperature: local.temperature.or_else(|| remote.temperature()),
            max_tokens: local.max_tokens.or_else(|| remote.max_tokens()),
            additional_notes: local.additional_notes,
        };

        let ai_analysis = AiAnalysis {
            complexity_level: remote
                .complexity_level
                .as_deref()
                .and_then(ComplexityLevel::parse),
            privacy_reasoning: non_empty(remote.privacy_reasoning.as_deref()),
            suggested_category: category.clone(),
            suggested_tags: tags.clone(),
        };

        Self {
            title,
            category: category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            tags,
            private,
            description: non_empty(remote.use_case.as_deref()).unwrap_or_default(),
            technical_notes,
            ai_analysis,
            discovery: remote.discovery.unwrap_or_default(),
            degraded: false,
            notice: None,
        }
    }

    /// A new record carrying this metadata
    pub fn into_record(self, content: &str) -> PromptRecord {
        let mut record = PromptRecord::new(self.title, content);
        record.category = self.category;
        record.set_tags(self.tags);
        record.private = self.private;
        record.description = self.description;
        record.technical_notes = self.technical_notes;
        record.ai_analysis = self.ai_analysis;
        record.discovery = self.discovery;
        record
    }
}

pub struct Suggester {
    client: Option<Box<dyn AnalysisClient>>,
    offline_reason: String,
    timeout: Duration,
}

impl Suggester {
    pub fn new(client: Box<dyn AnalysisClient>, timeout: Duration) -> Self {
        Self {
            client: Some(client),
            offline_reason: String::new(),
            timeout,
        }
    }

    /// A suggester that only uses local heuristics
    pub fn offline(reason: impl Into<String>) -> Self {
        Self {
            client: None,
            offline_reason: reason.into(),
            timeout: Duration::ZERO,
        }
    }

    pub fn from_config(config: &AiConfig) -> Self {
        if !config.enabled {
            return Self::offline("AI analysis is disabled in config");
        }
        let Some(api_key) = config.resolve_api_key() else {
            return Self::offline(format!(
                "No API key configured (set ai.api_key or {})",
                crate::config::API_KEY_ENV
            ));
        };
        match AnthropicClient::new(config, api_key) {
            Ok(client) => Self::new(
                Box::new(client),
                Duration::from_secs(config.timeout_secs),
            ),
            Err(err) => {
                warn!(error = %err, "Could not build analysis client");
                Self::offline(err.to_string())
            }
        }
    }

    pub fn is_online(&self) -> bool {
        self.client.is_some()
    }

    async fn request(&self, content: &str) -> AppResult<RemoteAnalysis> {
        let client = self
            .client
            .as_ref()
            .ok_or_else(|| AppError::ServiceUnavailable(self.offline_reason.clone()))?;

        let response = tokio::time::timeout(self.timeout, client.analyze(content))
            .await
            .map_err(|_| AppError::ServiceTimeout(self.timeout.as_secs()))??;

        parse_analysis(&response)
    }

    pub async fn suggest(&self, content: &str) -> MetadataSuggestion {
        match self.request(content).await {
            Ok(remote) => {
                debug!("Analysis service returned a suggestion");
                MetadataSuggestion::from_analysis(content, remote)
            }
            Err(err) => {
                if self.is_online() {
                    warn!(error = %err, "Falling back to local metadata");
                } else {
                    debug!(reason = %err, "Using local metadata");
                }
                MetadataSuggestion::fallback(content, &err)
            }
        }
    }
}
