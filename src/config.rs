//! Server configuration.
//!
//! Configuration is read once at startup, from a YAML file when one is given,
//! and then shared by reference with the server, its workers and the file
//! handler.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Environment variable naming the YAML config file.
pub const CONFIG_ENV: &str = "HARBOR_CONFIG";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the listening socket binds to
    pub listen_addr: String,
    /// Number of workers sharing the listening socket
    pub workers: usize,
    /// Value of the `Server` response header
    pub server_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Document root
    pub root: PathBuf,
    /// File served when a directory is requested
    pub index_file: String,
    /// Upper bound on the raw request head, in bytes
    pub max_header_size: usize,
    /// Extension to MIME type overrides. Replaces the built-in table when set.
    pub content_types: Option<HashMap<String, String>>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            workers: 4,
            server_name: "Harbor".to_string(),
        }
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            index_file: "index.html".to_string(),
            max_header_size: 8192,
            content_types: None,
        }
    }
}

impl Config {
    /// Loads the configuration for the process.
    ///
    /// Reads the file named by `HARBOR_CONFIG` if set, otherwise starts from
    /// the defaults. `LISTEN` and `WORKERS` override the matching fields.
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = addr;
        }
        if let Ok(workers) = std::env::var("WORKERS") {
            cfg.server.workers = workers
                .parse()
                .with_context(|| format!("invalid WORKERS value: {workers}"))?;
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> anyhow::Result<Self> {
        let cfg: Config = serde_yaml::from_str(raw).context("failed to parse config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.workers == 0 {
            anyhow::bail!("server.workers must be at least 1");
        }
        if self.static_files.max_header_size == 0 {
            anyhow::bail!("static_files.max_header_size must be at least 1");
        }
        if self.static_files.index_file.is_empty() {
            anyhow::bail!("static_files.index_file must not be empty");
        }
        Ok(())
    }
}
