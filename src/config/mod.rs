//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `ENSEMBLE_*` environment
//! variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::pipeline::DEFAULT_MAX_RETRIES;
use crate::similarity::{DEFAULT_SCORE_THRESHOLD, DEFAULT_TOP_K};
use crate::vision::{DEFAULT_API_BASE, DEFAULT_EMBED_MODEL, DEFAULT_VISION_MODEL};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `ENSEMBLE_*` overrides on top of
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Catalog file (JSON Lines). Default: `./data/catalog.jsonl`.
    pub catalog_path: PathBuf,

    /// Root directory for catalog and source images. Default: `./data/images`.
    pub image_root: PathBuf,

    /// Directory served as the static UI. Default: `./static`.
    pub static_dir: PathBuf,

    /// Recommendation history file (JSON Lines, appended).
    /// Default: `./data/recommendations.jsonl`.
    pub store_path: PathBuf,

    /// Base URL of the OpenAI-compatible API.
    pub api_base: String,

    /// API key. `ENSEMBLE_API_KEY` wins; `OPENAI_API_KEY` is the fallback.
    pub api_key: String,

    /// Embedding model name.
    pub embed_model: String,

    /// Vision model name.
    pub vision_model: String,

    /// Minimum cosine similarity for retrieval. Default: `0.5`.
    pub threshold: f32,

    /// Candidates kept per description. Default: `2`.
    pub top_k: usize,

    /// Verification retries after the first attempt. Default: `2`.
    pub max_retries: u32,

    /// Per-request timeout for upstream API calls, in seconds. Default: `60`.
    pub request_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            catalog_path: PathBuf::from("./data/catalog.jsonl"),
            image_root: PathBuf::from("./data/images"),
            static_dir: PathBuf::from("./static"),
            store_path: PathBuf::from("./data/recommendations.jsonl"),
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: String::new(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            threshold: DEFAULT_SCORE_THRESHOLD,
            top_k: DEFAULT_TOP_K,
            max_retries: DEFAULT_MAX_RETRIES,
            request_timeout_secs: 60,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "ENSEMBLE_PORT";
    const ENV_BIND_ADDR: &'static str = "ENSEMBLE_BIND_ADDR";
    const ENV_CATALOG_PATH: &'static str = "ENSEMBLE_CATALOG_PATH";
    const ENV_IMAGE_ROOT: &'static str = "ENSEMBLE_IMAGE_ROOT";
    const ENV_STATIC_DIR: &'static str = "ENSEMBLE_STATIC_DIR";
    const ENV_STORE_PATH: &'static str = "ENSEMBLE_STORE_PATH";
    const ENV_API_BASE: &'static str = "ENSEMBLE_API_BASE";
    const ENV_API_KEY: &'static str = "ENSEMBLE_API_KEY";
    const ENV_API_KEY_FALLBACK: &'static str = "OPENAI_API_KEY";
    const ENV_EMBED_MODEL: &'static str = "ENSEMBLE_EMBED_MODEL";
    const ENV_VISION_MODEL: &'static str = "ENSEMBLE_VISION_MODEL";
    const ENV_THRESHOLD: &'static str = "ENSEMBLE_THRESHOLD";
    const ENV_TOP_K: &'static str = "ENSEMBLE_TOP_K";
    const ENV_MAX_RETRIES: &'static str = "ENSEMBLE_MAX_RETRIES";
    const ENV_REQUEST_TIMEOUT_SECS: &'static str = "ENSEMBLE_REQUEST_TIMEOUT_SECS";

    /// Loads configuration from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let catalog_path = Self::parse_path_from_env(Self::ENV_CATALOG_PATH, defaults.catalog_path);
        let image_root = Self::parse_path_from_env(Self::ENV_IMAGE_ROOT, defaults.image_root);
        let static_dir = Self::parse_path_from_env(Self::ENV_STATIC_DIR, defaults.static_dir);
        let store_path = Self::parse_path_from_env(Self::ENV_STORE_PATH, defaults.store_path);
        let api_base = Self::parse_string_from_env(Self::ENV_API_BASE, defaults.api_base);
        let api_key = Self::parse_api_key_from_env();
        let embed_model = Self::parse_string_from_env(Self::ENV_EMBED_MODEL, defaults.embed_model);
        let vision_model =
            Self::parse_string_from_env(Self::ENV_VISION_MODEL, defaults.vision_model);
        let threshold = Self::parse_f32_from_env(Self::ENV_THRESHOLD, defaults.threshold);
        let top_k = Self::parse_usize_from_env(Self::ENV_TOP_K, defaults.top_k);
        let max_retries = Self::parse_u32_from_env(Self::ENV_MAX_RETRIES, defaults.max_retries);
        let request_timeout_secs = Self::parse_u64_from_env(
            Self::ENV_REQUEST_TIMEOUT_SECS,
            defaults.request_timeout_secs,
        );

        Ok(Self {
            port,
            bind_addr,
            catalog_path,
            image_root,
            static_dir,
            store_path,
            api_base,
            api_key,
            embed_model,
            vision_model,
            threshold,
            top_k,
            max_retries,
            request_timeout_secs,
        })
    }

    /// Validates paths and basic invariants (does not create files).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.catalog_path.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.catalog_path.clone(),
            });
        }
        if !self.catalog_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.catalog_path.clone(),
            });
        }

        if !self.image_root.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.image_root.clone(),
            });
        }
        if !self.image_root.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.image_root.clone(),
            });
        }

        // The static UI and the history file may not exist yet.
        if self.static_dir.exists() && !self.static_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.static_dir.clone(),
            });
        }
        if self.store_path.exists() && !self.store_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.store_path.clone(),
            });
        }

        // Cosine similarity ranges over [-1, 1]; only the upper bound makes a
        // threshold unsatisfiable.
        if self.threshold > 1.0 {
            return Err(ConfigError::InvalidThreshold {
                value: self.threshold,
            });
        }

        if self.top_k == 0 {
            return Err(ConfigError::InvalidTopK);
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_api_key_from_env() -> String {
        env::var(Self::ENV_API_KEY)
            .or_else(|_| env::var(Self::ENV_API_KEY_FALLBACK))
            .unwrap_or_default()
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_f32_from_env(var_name: &str, default: f32) -> f32 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_usize_from_env(var_name: &str, default: usize) -> usize {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_u32_from_env(var_name: &str, default: u32) -> u32 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
