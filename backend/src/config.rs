//! Runtime configuration.
//!
//! Defaults, then an optional YAML file named by `FAMILY_LEDGER_CONFIG`, then
//! `FAMILY_LEDGER_*` environment variables.

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::domain::ledger_service::DEFAULT_CLEANUP_ATTEMPTS;

pub const CONFIG_FILE_VAR: &str = "FAMILY_LEDGER_CONFIG";
const ENV_PREFIX: &str = "FAMILY_LEDGER_";

/// Which entity store backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Csv,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(StorageBackend::Csv),
            "memory" => Ok(StorageBackend::Memory),
            other => Err(anyhow!("Unknown storage backend {:?}, expected csv or memory", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub bind_address: String,
    pub data_directory: PathBuf,
    pub storage: StorageBackend,
    /// Passes over a deleted child's transactions before cleanup gives up
    pub cleanup_attempts: u32,
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Extra origin allowed by CORS, e.g. the web client's dev server
    pub allowed_origin: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            data_directory: default_data_directory(),
            storage: StorageBackend::Csv,
            cleanup_attempts: DEFAULT_CLEANUP_ATTEMPTS,
            log_filter: "info".to_string(),
            allowed_origin: None,
        }
    }
}

fn default_data_directory() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("family-ledger")
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load configuration using `lookup` in place of the environment
    pub fn load_with<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = match lookup(CONFIG_FILE_VAR) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        let config = config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&contents)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

        if let Some(value) = var("BIND_ADDRESS") {
            self.bind_address = value;
        }
        if let Some(value) = var("DATA_DIR") {
            self.data_directory = PathBuf::from(value);
        }
        if let Some(value) = var("STORAGE") {
            self.storage = value.parse()?;
        }
        if let Some(value) = var("CLEANUP_ATTEMPTS") {
            self.cleanup_attempts = value
                .trim()
                .parse()
                .with_context(|| format!("{}CLEANUP_ATTEMPTS must be a number, got {:?}", ENV_PREFIX, value))?;
        }
        if let Some(value) = var("LOG") {
            self.log_filter = value;
        }
        if let Some(value) = var("ALLOWED_ORIGIN") {
            self.allowed_origin = Some(value).filter(|origin| !origin.trim().is_empty());
        }
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;
        if self.cleanup_attempts == 0 {
            bail!("cleanup_attempts must be at least 1");
        }
        if self.storage == StorageBackend::Csv && self.data_directory.as_os_str().is_empty() {
            bail!("data_directory is required for the csv storage backend");
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_address
            .parse()
            .with_context(|| format!("Invalid bind address {:?}", self.bind_address))
    }
}
