//! Configuration loading
//!
//! Each setting resolves in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing or malformed TOML file never prevents startup; it is logged and
//! the remaining tiers apply.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{Error, Result};

pub const ENV_CONFIG: &str = "SGDT_CONFIG";
pub const ENV_BIND: &str = "SGDT_BIND";
pub const ENV_PORT: &str = "SGDT_PORT";
pub const ENV_MODEL_PATH: &str = "SGDT_MODEL_PATH";
pub const ENV_LOG_LEVEL: &str = "SGDT_LOG_LEVEL";
pub const ENV_MAX_UPLOAD_BYTES: &str = "SGDT_MAX_UPLOAD_BYTES";

/// `[logging]` table of the TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
}

/// Contents of `config.toml`; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub model_path: Option<PathBuf>,
    pub max_upload_bytes: Option<usize>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Compiled fallback values
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDefaults {
    pub bind: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub log_level: String,
    pub max_upload_bytes: usize,
}

impl Default for CompiledDefaults {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8501,
            model_path: PathBuf::from("models/smartguard_model.json"),
            log_level: "info".to_string(),
            max_upload_bytes: 25 * 1024 * 1024,
        }
    }
}

/// Values given on the command line
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config_path: Option<PathBuf>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub model_path: Option<PathBuf>,
    pub log_level: Option<String>,
    pub max_upload_bytes: Option<usize>,
}

/// Fully resolved dashboard configuration
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub bind: String,
    pub port: u16,
    pub model_path: PathBuf,
    pub log_level: String,
    pub max_upload_bytes: usize,
    /// TOML file that contributed settings, if any
    pub config_file: Option<PathBuf>,
}

impl DashboardConfig {
    /// Resolve configuration from CLI, environment, TOML file and defaults
    pub fn resolve(cli: &CliOverrides) -> Result<Self> {
        let config_path = cli
            .config_path
            .clone()
            .or_else(|| env_string(ENV_CONFIG).map(PathBuf::from))
            .or_else(default_config_path);

        let (toml, config_file) = match config_path {
            Some(path) => match load_toml_config(&path) {
                Some(cfg) => (cfg, Some(path)),
                None => (TomlConfig::default(), None),
            },
            None => (TomlConfig::default(), None),
        };

        Self::merge(cli, &toml, config_file)
    }

    /// Merge already-loaded tiers
    pub fn merge(
        cli: &CliOverrides,
        toml: &TomlConfig,
        config_file: Option<PathBuf>,
    ) -> Result<Self> {
        let defaults = CompiledDefaults::default();

        let bind = cli
            .bind
            .clone()
            .or_else(|| env_string(ENV_BIND))
            .or_else(|| toml.bind.clone())
            .unwrap_or(defaults.bind);

        let port = match cli.port {
            Some(port) => port,
            None => match env_parsed::<u16>(ENV_PORT)? {
                Some(port) => port,
                None => toml.port.unwrap_or(defaults.port),
            },
        };

        let model_path = cli
            .model_path
            .clone()
            .or_else(|| env_string(ENV_MODEL_PATH).map(PathBuf::from))
            .or_else(|| toml.model_path.clone())
            .unwrap_or(defaults.model_path);

        let log_level = cli
            .log_level
            .clone()
            .or_else(|| env_string(ENV_LOG_LEVEL))
            .or_else(|| toml.logging.level.clone())
            .unwrap_or(defaults.log_level);

        let max_upload_bytes = match cli.max_upload_bytes {
            Some(bytes) => bytes,
            None => match env_parsed::<usize>(ENV_MAX_UPLOAD_BYTES)? {
                Some(bytes) => bytes,
                None => toml.max_upload_bytes.unwrap_or(defaults.max_upload_bytes),
            },
        };
        if max_upload_bytes == 0 {
            return Err(Error::Config("max_upload_bytes must be positive".to_string()));
        }

        Ok(Self {
            bind,
            port,
            model_path,
            log_level,
            max_upload_bytes,
            config_file,
        })
    }

    /// Address the HTTP server binds to
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid bind address {}:{}: {}", self.bind, self.port, e)))
    }
}

/// Read and parse a TOML config file
///
/// Returns `None` (with a log line) when the file is absent or malformed.
pub fn load_toml_config(path: &Path) -> Option<TomlConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            if path.exists() {
                warn!("Cannot read config file {}: {}", path.display(), e);
            } else {
                info!("Config file not found at {}, using defaults", path.display());
            }
            return None;
        }
    };

    match toml::from_str::<TomlConfig>(&content) {
        Ok(config) => {
            info!("Loaded config file {}", path.display());
            Some(config)
        }
        Err(e) => {
            warn!("Ignoring malformed config file {}: {}", path.display(), e);
            None
        }
    }
}

/// `<config_dir>/sgdt/config.toml` when it exists
fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir()
        .map(|d| d.join("sgdt").join("config.toml"))
        .filter(|p| p.exists())
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_parsed<T: std::str::FromStr>(name: &str) -> Result<Option<T>>
where
    T::Err: std::fmt::Display,
{
    match env_string(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| Error::Config(format!("{}={:?}: {}", name, raw, e))),
        None => Ok(None),
    }
}
