// ⚙️ Configuration
// palmares.toml, then environment overrides; CLI flags win over both

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const CONFIG_ENV: &str = "PALMARES_CONFIG";
pub const DATA_ENV: &str = "PALMARES_DATA";
pub const BIND_ENV: &str = "PALMARES_BIND";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Snapshot file produced by `palmares convert`
    pub data_path: PathBuf,
    /// Listen address of the API server
    pub bind_addr: String,
    /// Directory served under /static
    pub web_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_path: PathBuf::from("data.json"),
            bind_addr: "0.0.0.0:3000".to_string(),
            web_dir: PathBuf::from("web"),
        }
    }
}

impl Config {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse config TOML")
    }

    /// Read a config file; a missing file means defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(file = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Config::from_toml_str(&text).with_context(|| format!("Invalid config file: {:?}", path))
    }

    /// Config file from `PALMARES_CONFIG` (default `palmares.toml`), then
    /// `PALMARES_DATA` / `PALMARES_BIND` overrides
    pub fn load() -> Result<Self> {
        let path = env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("palmares.toml"));

        let mut config = Config::from_file(&path)?;
        config.apply_overrides(env::var(DATA_ENV).ok(), env::var(BIND_ENV).ok());
        Ok(config)
    }

    pub fn apply_overrides(&mut self, data_path: Option<String>, bind_addr: Option<String>) {
        if let Some(data) = data_path.filter(|s| !s.is_empty()) {
            self.data_path = PathBuf::from(data);
        }
        if let Some(bind) = bind_addr.filter(|s| !s.is_empty()) {
            self.bind_addr = bind;
        }
    }
}
