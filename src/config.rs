use crate::error::{Result, ThinkingError};
use crate::generator::BranchIdStrategy;
use crate::query::DEFAULT_SEARCH_LIMIT;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_MAX_PROBLEM_LENGTH: usize = 10_000;
const DEFAULT_THOUGHTS_PATH: &str = "./unreasonable-thoughts.json";

/// Unreasonable thinking service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThinkingConfig {
    /// Where the thought table lives
    pub storage: StorageConfig,
    /// Thought generation settings
    pub generation: GenerationConfig,
    /// Search defaults
    pub search: SearchConfig,
    /// Server configuration
    pub server: ServerConfig,
}

/// Persistence backend for the thought table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Redis,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// JSON file used by the file backend
    pub path: PathBuf,
    /// Redis connection URL used by the redis backend
    pub redis_url: String,
    /// Key holding the serialized table in Redis
    pub redis_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Fixed seed for template and flag selection; random when unset
    pub seed: Option<u64>,
    pub branch_ids: BranchIdStrategy,
    pub max_problem_length: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub default_limit: usize,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server name/identifier
    pub name: String,
    /// Server version
    pub version: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            path: PathBuf::from(DEFAULT_THOUGHTS_PATH),
            redis_url: "redis://127.0.0.1:6379/0".to_string(),
            redis_key: "unreasonable:thoughts".to_string(),
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            branch_ids: BranchIdStrategy::Counter,
            max_problem_length: DEFAULT_MAX_PROBLEM_LENGTH,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_SEARCH_LIMIT,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            name: "unreasonable-thinking-server".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl ThinkingConfig {
    /// Load configuration from defaults, an optional TOML file and the environment
    pub fn load() -> Result<Self> {
        let default_path = if let Ok(path) = std::env::var("UNREASONABLE_THOUGHTS_PATH") {
            tracing::info!("Using UNREASONABLE_THOUGHTS_PATH: {}", path);
            path
        } else {
            tracing::warn!(
                "UNREASONABLE_THOUGHTS_PATH not set, using default: {}",
                DEFAULT_THOUGHTS_PATH
            );
            DEFAULT_THOUGHTS_PATH.to_string()
        };

        let defaults = StorageConfig::default();
        let mut config = Config::builder()
            .set_default("storage.backend", "file")?
            .set_default("storage.path", default_path)?
            .set_default("storage.redis_url", defaults.redis_url)?
            .set_default("storage.redis_key", defaults.redis_key)?
            .set_default("generation.branch_ids", "counter")?
            .set_default("generation.max_problem_length", DEFAULT_MAX_PROBLEM_LENGTH as u64)?
            .set_default("search.default_limit", DEFAULT_SEARCH_LIMIT as u64)?
            .set_default("server.name", "unreasonable-thinking-server")?
            .set_default("server.version", env!("CARGO_PKG_VERSION"))?;

        if let Ok(config_file) = std::env::var("UNREASONABLE_CONFIG") {
            config = config.add_source(File::with_name(&config_file).required(false));
        } else {
            config = config.add_source(File::with_name("unreasonable-thinking.toml").required(false));
        }

        // e.g. UNREASONABLE__STORAGE__BACKEND=redis
        config = config.add_source(
            Environment::with_prefix("UNREASONABLE")
                .prefix_separator("__")
                .separator("__"),
        );

        let config = config.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        match self.storage.backend {
            StorageBackend::File if self.storage.path.as_os_str().is_empty() => {
                return Err(ThinkingError::invalid_input("storage.path", "must not be empty"));
            }
            StorageBackend::Redis if self.storage.redis_key.trim().is_empty() => {
                return Err(ThinkingError::invalid_input("storage.redis_key", "must not be empty"));
            }
            StorageBackend::Redis if self.storage.redis_url.trim().is_empty() => {
                return Err(ThinkingError::invalid_input("storage.redis_url", "must not be empty"));
            }
            _ => {}
        }

        if self.generation.max_problem_length == 0 {
            return Err(ThinkingError::invalid_input(
                "generation.max_problem_length",
                "must be at least 1",
            ));
        }

        if self.search.default_limit == 0 {
            return Err(ThinkingError::invalid_input("search.default_limit", "must be at least 1"));
        }

        tracing::info!("Configuration validated: {:?} backend", self.storage.backend);
        Ok(())
    }
}
