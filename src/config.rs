use crate::utils::error::{AppError, AppResult};
use crate::utils::interactive::detect_editor;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, Item, Value};

pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
    #[serde(default)]
    pub ai: AiConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub prompts_dir: PathBuf,
    pub editor: String,
    #[serde(default = "default_true")]
    pub color: bool,
    #[serde(default = "default_true")]
    pub content_preview: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub enabled: bool,
    pub api_url: String,
    #[serde(
        serialize_with = "crate::utils::format::serialize_option_string",
        deserialize_with = "crate::utils::format::deserialize_option_string"
    )]
    pub api_key: Option<String>,
    pub model: String,
    pub anthropic_version: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub weights: SearchWeights,
    pub refine_threshold: usize,
}

/// Per-field score added when a query term matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchWeights {
    pub title: u32,
    pub category: u32,
    pub tag: u32,
    pub discovery: u32,
}

fn default_true() -> bool {
    true
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: "https://api.anthropic.com/v1/messages".to_string(),
            api_key: None,
            model: "claude-3-5-sonnet-20241022".to_string(),
            anthropic_version: "2023-06-01".to_string(),
            max_tokens: 1000,
            timeout_secs: 30,
        }
    }
}

impl Default for SearchWeights {
    fn default() -> Self {
        Self {
            title: 10,
            category: 5,
            tag: 3,
            discovery: 1,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            weights: SearchWeights::default(),
            refine_threshold: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("promptvault");

        Self {
            general: GeneralConfig {
                prompts_dir: data_dir.join("prompts"),
                editor: detect_editor(None),
                color: true,
                content_preview: true,
            },
            ai: AiConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl AiConfig {
    /// API key from the config file, falling back to the environment
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        Self::load_custom(&Self::config_file_path())
    }

    pub fn ensure_config_exists() -> AppResult<()> {
        let config_path = Self::config_file_path();
        if !config_path.exists() {
            Config::default().save_to(&config_path)?;
        }
        Ok(())
    }

    pub fn load_custom(config_path: &Path) -> AppResult<Self> {
        if !config_path.exists() {
            let default_config = Config::default();
            default_config.save_to(config_path)?;
            return Ok(default_config);
        }

        let content =
            std::fs::read_to_string(config_path).map_err(|e| AppError::Io(e.to_string()))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| AppError::System(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.general.editor.is_empty() {
            return Err(AppError::System("Editor cannot be empty".to_string()));
        }

        if self.general.prompts_dir.as_os_str().is_empty() {
            return Err(AppError::System(
                "Prompts directory cannot be empty".to_string(),
            ));
        }

        if self.ai.enabled {
            if self.ai.api_url.is_empty() {
                return Err(AppError::System("AI API URL cannot be empty".to_string()));
            }
            if self.ai.model.is_empty() {
                return Err(AppError::System("AI model cannot be empty".to_string()));
            }
        }

        if self.ai.timeout_secs == 0 {
            return Err(AppError::System(
                "AI timeout must be at least one second".to_string(),
            ));
        }

        let w = &self.search.weights;
        if !(w.title > w.category && w.category > w.tag && w.tag > w.discovery && w.discovery > 0)
        {
            return Err(AppError::System(format!(
                "Search weights must satisfy title > category > tag > discovery > 0, got {}/{}/{}/{}",
                w.title, w.category, w.tag, w.discovery
            )));
        }

        Ok(())
    }

    pub fn public_dir(&self) -> PathBuf {
        self.general.prompts_dir.join("public")
    }

    pub fn private_dir(&self) -> PathBuf {
        self.general.prompts_dir.join("private")
    }

    pub fn save_to(&self, config_path: &Path) -> AppResult<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Io(e.to_string()))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| AppError::System(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(config_path, content).map_err(|e| AppError::Io(e.to_string()))?;

        Ok(())
    }

    /// Set one dotted key (e.g. `search.refine_threshold`) in the file at
    /// `config_path`, keeping the rest of the document untouched.
    ///
    /// The edited document must still deserialize and validate; otherwise the
    /// file is left as it was.
    pub fn set_value(config_path: &Path, key: &str, raw: &str) -> AppResult<Config> {
        if !config_path.exists() {
            Config::default().save_to(config_path)?;
        }

        let content =
            std::fs::read_to_string(config_path).map_err(|e| AppError::Io(e.to_string()))?;
        let mut doc = content
            .parse::<DocumentMut>()
            .map_err(|e| AppError::System(format!("Failed to parse config file: {}", e)))?;

        let parts: Vec<&str> = key.split('.').map(str::trim).collect();
        if parts.len() < 2 || parts.iter().any(|p| p.is_empty()) {
            return Err(AppError::Validation(format!(
                "Config key '{}' must look like section.field",
                key
            )));
        }

        let (field, sections) = parts.split_last().ok_or_else(|| {
            AppError::Validation(format!("Config key '{}' is empty", key))
        })?;

        let mut table = doc.as_table_mut();
        for section in sections {
            let entry = table
                .entry(section)
                .or_insert_with(toml_edit::table);
            table = entry.as_table_mut().ok_or_else(|| {
                AppError::Validation(format!("'{}' is not a config section", section))
            })?;
        }
        table.insert(field, Item::Value(parse_value(raw)));

        let updated = doc.to_string();
        let config: Config = toml::from_str(&updated)
            .map_err(|e| AppError::Validation(format!("Invalid value for '{}': {}", key, e)))?;
        config.validate()?;

        std::fs::write(config_path, updated).map_err(|e| AppError::Io(e.to_string()))?;
        Ok(config)
    }

    pub fn config_file_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("promptvault")
            .join("config.toml")
    }
}

fn parse_value(raw: &str) -> Value {
    let raw = raw.trim();
    if let Ok(b) = raw.parse::<bool>() {
        return Value::from(b);
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Value::from(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return Value::from(f);
    }
    Value::from(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_config(dir: &Path) -> Config {
        let mut config = Config::default();
        config.general.prompts_dir = dir.join("prompts");
        config.general.editor = "vi".to_string();
        config
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.search.weights.title, 10);
        assert_eq!(config.search.refine_threshold, 10);
        assert_eq!(config.ai.timeout_secs, 30);
    }

    #[test]
    fn test_weight_ordering_is_enforced() {
        let mut config = Config::default();
        config.search.weights.tag = 6;
        assert!(config.validate().is_err());

        config.search.weights = SearchWeights {
            title: 20,
            category: 8,
            tag: 4,
            discovery: 0,
        };
        assert!(config.validate().is_err());

        config.search.weights.discovery = 2;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_custom_creates_missing_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let config = Config::load_custom(&path).unwrap();
        assert!(path.exists());
        assert_eq!(config, Config::load_custom(&path).unwrap());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "[general]\nprompts_dir = \"/tmp/prompts\"\neditor = \"nano\"\n",
        )
        .unwrap();

        let config = Config::load_custom(&path).unwrap();
        assert!(config.general.color);
        assert_eq!(config.ai, AiConfig::default());
        assert_eq!(config.search, SearchConfig::default());
    }

    #[test]
    fn test_set_value_preserves_comments() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        let config = test_config(temp.path());
        config.save_to(&path).unwrap();

        let original = std::fs::read_to_string(&path).unwrap();
        std::fs::write(&path, format!("# my settings\n{}", original)).unwrap();

        let updated = Config::set_value(&path, "search.refine_threshold", "25").unwrap();
        assert_eq!(updated.search.refine_threshold, 25);

        let updated = Config::set_value(&path, "ai.enabled", "false").unwrap();
        assert!(!updated.ai.enabled);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# my settings"));
    }

    #[test]
    fn test_set_value_rejects_invalid_result() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        test_config(temp.path()).save_to(&path).unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        assert!(Config::set_value(&path, "search.weights.tag", "50").is_err());
        assert!(Config::set_value(&path, "ai.timeout_secs", "soon").is_err());
        assert!(Config::set_value(&path, "refine_threshold", "5").is_err());

        assert_eq!(before, std::fs::read_to_string(&path).unwrap());
    }
}
