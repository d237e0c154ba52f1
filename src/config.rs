use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::http::line::DEFAULT_LINE_SIZE;

/// Environment variable naming an optional YAML config file.
pub const CONFIG_ENV: &str = "SQLHTTPD_CONFIG";
/// Environment variable overriding `server.listen_addr`.
pub const LISTEN_ENV: &str = "LISTEN";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
    pub database: DatabaseConfig,
    pub limits: LimitsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind; port 0 lets the OS choose
    pub listen_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8000".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    pub root: PathBuf,
    /// Resource served for `/` and `/index.html`
    pub index: String,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            index: "index.html".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub pool_size: usize,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("sqlhttpd.db"),
            pool_size: 4,
        }
    }
}

/// Per-request size bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Line buffer size; a line holds at most one byte less
    pub max_line_bytes: usize,
    pub max_body_bytes: usize,
    pub max_response_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_line_bytes: DEFAULT_LINE_SIZE,
            max_body_bytes: 64 * 1024,
            max_response_bytes: 1024 * 1024,
        }
    }
}

impl Config {
    /// Loads the config file named by `SQLHTTPD_CONFIG` (defaults when unset),
    /// then applies the `LISTEN` override.
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(&path)?,
            Err(_) => Self::default(),
        };

        if let Ok(listen_addr) = std::env::var(LISTEN_ENV) {
            config.server.listen_addr = listen_addr;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&text)
            .with_context(|| format!("failed to load config file {}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> anyhow::Result<Self> {
        let config: Config = serde_yaml::from_str(text).context("invalid YAML config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.limits.max_line_bytes < 2 {
            anyhow::bail!("limits.max_line_bytes must be at least 2");
        }
        if self.database.pool_size == 0 {
            anyhow::bail!("database.pool_size must be at least 1");
        }
        Ok(())
    }
}
