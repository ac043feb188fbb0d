use anyhow::Context;
use pegasus_client::ClientConfig;
use pegasus_client::config::{DEFAULT_API_BASE, DEFAULT_REMEMBER_DAYS};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "pegasus";
const CONFIG_FILE: &str = "config.toml";

/// Persistent CLI settings, stored as TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base: String,
    pub timeout_secs: u64,
    /// Days a `--remember` sign-in stays recorded
    pub remember_days: u32,
    pub colored_output: bool,
    /// Credential storage file. Defaults to `<data_dir>/pegasus/storage.json`.
    pub storage_path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: 30,
            remember_days: DEFAULT_REMEMBER_DAYS,
            colored_output: true,
            storage_path: None,
        }
    }
}

impl AppConfig {
    /// Load from `path`, or from the default location. A missing file yields defaults.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path.map(Path::to_path_buf).or_else(Self::default_path) else {
            return Ok(Self::default());
        };
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn save(&self, path: Option<&Path>) -> anyhow::Result<PathBuf> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(Self::default_path)
            .context("no configuration directory available")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&path, self.show()?)
            .with_context(|| format!("failed to write config file {}", path.display()))?;
        Ok(path)
    }

    /// Overwrite the config file with defaults.
    pub fn reset(path: Option<&Path>) -> anyhow::Result<PathBuf> {
        Self::default().save(path)
    }

    pub fn show(&self) -> anyhow::Result<String> {
        toml::to_string_pretty(self).context("failed to serialize configuration")
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Apply command-line overrides.
    pub fn with_overrides(
        mut self,
        api_base: Option<String>,
        storage: Option<PathBuf>,
        timeout_secs: Option<u64>,
    ) -> Self {
        if let Some(api_base) = api_base {
            self.api_base = api_base;
        }
        if storage.is_some() {
            self.storage_path = storage;
        }
        if let Some(timeout) = timeout_secs {
            self.timeout_secs = timeout;
        }
        self
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            api_base: self.api_base.clone(),
            timeout_secs: self.timeout_secs,
            remember_days: self.remember_days,
            ..ClientConfig::default()
        }
    }

    pub fn storage_path(&self) -> Option<PathBuf> {
        self.storage_path
            .clone()
            .or_else(pegasus_client::FileStorage::default_path)
    }
}
