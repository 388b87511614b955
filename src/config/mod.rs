//! Configuration management for ragindex
//!
//! Every entry point receives a `Config` explicitly; nothing here is global.
//! Values come from a TOML file, then an optional named profile, then
//! `RAGINDEX_SECTION__KEY` environment variables.

use crate::error::{RagError, Result};
use crate::index::SearchStrategy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

mod validator;

pub use validator::ConfigValidator;

pub const SCHEMA_VERSION: &str = "1.0.0";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(rename = "_meta")]
    pub meta: MetaConfig,
    pub paths: PathsConfig,
    pub chunking: ChunkingConfig,
    pub embedding: EmbeddingConfig,
    pub index: IndexConfig,
    pub retrieval: RetrievalConfig,
    pub llm: LlmConfig,
    #[serde(default)]
    pub profiles: HashMap<String, ProfileOverrides>,
}

/// Metadata about the configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetaConfig {
    pub schema_version: String,
    #[serde(default = "current_timestamp")]
    pub created_at: String,
    #[serde(default = "current_timestamp")]
    pub last_modified: String,
}

fn current_timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Where source documents live and where the index is persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    pub data_dir: PathBuf,
    pub index_dir: PathBuf,
}

/// Chunk window sizes, measured in characters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChunkingConfig {
    pub max_length: usize,
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_length: 800,
            overlap: 80,
        }
    }
}

/// Embedding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    pub model: String,
    pub batch_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

/// Vector index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    pub search: SearchStrategy,
    pub hnsw_m: usize,
    pub hnsw_ef_construction: usize,
    pub hnsw_ef_search: usize,
}

/// Query-time configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub separator: String,
}

/// Generation model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    pub enabled: bool,
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
}

/// Profile-specific configuration overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedding_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SearchStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_k: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub llm_model: Option<String>,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RagError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| RagError::io(e, format!("Failed to read config file: {:?}", path)))?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        ConfigValidator::validate(&config)?;

        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)
            .map_err(|e| RagError::io(e, format!("Failed to write config file: {:?}", path)))?;
        Ok(())
    }

    /// Load configuration with a specific profile applied
    pub fn load_with_profile(path: &Path, profile: &str) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_profile(profile)?;
        ConfigValidator::validate(&config)?;
        Ok(config)
    }

    /// Apply a profile's overrides to the configuration
    pub fn apply_profile(&mut self, profile: &str) -> Result<()> {
        let overrides = self
            .profiles
            .get(profile)
            .cloned()
            .ok_or_else(|| RagError::Config(format!("Unknown profile: {}", profile)))?;

        if let Some(index_dir) = overrides.index_dir {
            self.paths.index_dir = index_dir;
        }
        if let Some(model) = overrides.embedding_model {
            self.embedding.model = model;
        }
        if let Some(search) = overrides.search {
            self.index.search = search;
        }
        if let Some(top_k) = overrides.top_k {
            self.retrieval.top_k = top_k;
        }
        if let Some(model) = overrides.llm_model {
            self.llm.model = model;
        }
        Ok(())
    }

    /// Apply environment variable overrides
    /// Environment variables in format: RAGINDEX_SECTION__KEY=value
    pub fn apply_env_overrides(&mut self) {
        for (key, value) in std::env::vars() {
            if let Some(config_key) = key.strip_prefix("RAGINDEX_") {
                if let Err(e) = self.set_value_from_env(config_key, &value) {
                    tracing::warn!("Failed to apply env override {}: {}", key, e);
                }
            }
        }
    }

    fn set_value_from_env(&mut self, path: &str, value: &str) -> Result<()> {
        match path {
            "PATHS__DATA_DIR" => self.paths.data_dir = PathBuf::from(value),
            "PATHS__INDEX_DIR" => self.paths.index_dir = PathBuf::from(value),
            "CHUNKING__MAX_LENGTH" => self.chunking.max_length = parse_env(path, value)?,
            "CHUNKING__OVERLAP" => self.chunking.overlap = parse_env(path, value)?,
            "EMBEDDING__MODEL" => self.embedding.model = value.to_string(),
            "EMBEDDING__BATCH_SIZE" => self.embedding.batch_size = parse_env(path, value)?,
            "INDEX__SEARCH" => self.index.search = parse_env(path, value)?,
            "RETRIEVAL__TOP_K" => self.retrieval.top_k = parse_env(path, value)?,
            "LLM__ENABLED" => self.llm.enabled = parse_env(path, value)?,
            "LLM__ENDPOINT" => self.llm.endpoint = value.to_string(),
            "LLM__MODEL" => self.llm.model = value.to_string(),
            _ => {
                tracing::debug!("Unknown env config key: {}", path);
            }
        }
        Ok(())
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| RagError::Config("Cannot determine config directory".to_string()))?;

        Ok(config_dir.join("ragindex").join("config.toml"))
    }
}

fn parse_env<T: std::str::FromStr>(path: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| RagError::InvalidConfigValue {
        path: path.to_string(),
        message: format!("Cannot parse '{}'", value),
    })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            meta: MetaConfig {
                schema_version: SCHEMA_VERSION.to_string(),
                created_at: current_timestamp(),
                last_modified: current_timestamp(),
            },
            paths: PathsConfig {
                data_dir: PathBuf::from("data"),
                index_dir: PathBuf::from("index"),
            },
            chunking: ChunkingConfig::default(),
            embedding: EmbeddingConfig {
                model: "all-MiniLM-L6-v2".to_string(),
                batch_size: 32,
                cache_dir: None,
            },
            index: IndexConfig {
                search: SearchStrategy::Exact,
                hnsw_m: 16,
                hnsw_ef_construction: 200,
                hnsw_ef_search: 64,
            },
            retrieval: RetrievalConfig {
                top_k: 5,
                separator: "\n\n---\n\n".to_string(),
            },
            llm: LlmConfig {
                enabled: true,
                provider: "ollama".to_string(),
                endpoint: "http://127.0.0.1:11434".to_string(),
                model: "llama3.2:latest".to_string(),
                temperature: 0.1,
                timeout_secs: 120,
            },
            profiles: HashMap::new(),
        }
    }
}
