//! @ai:module:intent Configuration structs for the judge, batch runs and paths
//! @ai:module:layer infrastructure
//! @ai:module:public_api EvalConfig, JudgeConfig, JudgeProvider, RunConfig, PathConfig, FilterConfig
//! @ai:module:stateless true

use crate::answer::AnswerCategory;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// @ai:intent Main configuration for evaluation runs
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvalConfig {
    #[serde(default)]
    pub judge: JudgeConfig,
    #[serde(default)]
    pub run: RunConfig,
    #[serde(default)]
    pub paths: PathConfig,
}

/// @ai:intent Which chat API the semantic judge talks to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgeProvider {
    #[default]
    Anthropic,
    OpenAi,
}

impl JudgeProvider {
    /// @ai:intent Environment variable holding the API key by default
    /// @ai:effects pure
    pub fn default_api_key_env(&self) -> &'static str {
        match self {
            JudgeProvider::Anthropic => "ANTHROPIC_API_KEY",
            JudgeProvider::OpenAi => "OPENAI_API_KEY",
        }
    }

    /// @ai:effects pure
    pub fn default_base_url(&self) -> &'static str {
        match self {
            JudgeProvider::Anthropic => "https://api.anthropic.com",
            JudgeProvider::OpenAi => "https://api.openai.com",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JudgeProvider::Anthropic => "anthropic",
            JudgeProvider::OpenAi => "openai",
        }
    }
}

/// @ai:intent Semantic judge client settings
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgeConfig {
    #[serde(default)]
    pub provider: JudgeProvider,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default)]
    pub temperature: f32,
    #[serde(default = "default_rate_limit")]
    pub requests_per_minute: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Overrides the provider's public endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Overrides the provider's default key variable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,
}

/// @ai:intent Run configuration for batch evaluation
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Maximum comparisons in flight at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    #[serde(default)]
    pub dry_run: bool,
    #[serde(default)]
    pub filter: FilterConfig,
}

/// @ai:intent Path configuration for input/output directories
/// @ai:effects pure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default = "default_corpus_dir")]
    pub corpus_dir: PathBuf,
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

/// @ai:intent Filter configuration for selecting answer pairs
/// @ai:effects pure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    pub categories: Option<Vec<AnswerCategory>>,
    pub pair_ids: Option<Vec<String>>,
}

impl Default for JudgeConfig {
    fn default() -> Self {
        Self {
            provider: JudgeProvider::default(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            requests_per_minute: default_rate_limit(),
            timeout_secs: default_timeout_secs(),
            base_url: None,
            api_key_env: None,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            dry_run: false,
            filter: FilterConfig::default(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            corpus_dir: default_corpus_dir(),
            results_dir: default_results_dir(),
        }
    }
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_max_tokens() -> u32 {
    16
}

fn default_rate_limit() -> u32 {
    60
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_concurrency() -> usize {
    4
}

fn default_corpus_dir() -> PathBuf {
    PathBuf::from("corpus")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

impl JudgeConfig {
    /// @ai:intent Endpoint root, honouring the override
    /// @ai:effects pure
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
            .trim_end_matches('/')
    }

    /// @ai:intent Name of the environment variable holding the API key
    /// @ai:effects pure
    pub fn api_key_env(&self) -> &str {
        self.api_key_env
            .as_deref()
            .unwrap_or_else(|| self.provider.default_api_key_env())
    }
}

impl EvalConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl FilterConfig {
    /// @ai:intent Check if filter matches a pair
    /// @ai:effects pure
    pub fn matches(&self, category: Option<AnswerCategory>, id: &str) -> bool {
        let category_match = match (&self.categories, category) {
            (None, _) => true,
            (Some(wanted), Some(category)) => wanted.contains(&category),
            (Some(_), None) => false,
        };

        let id_match = self
            .pair_ids
            .as_ref()
            .map(|ids| ids.iter().any(|pair_id| pair_id == id))
            .unwrap_or(true);

        category_match && id_match
    }
}
