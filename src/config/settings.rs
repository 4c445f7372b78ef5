use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{Result, VaultError};
use crate::vault::MAX_FAILED_ATTEMPTS;

/// Application configuration, loaded from `.secure-vault.toml`.
///
/// Every field has a sensible default so the vault works out-of-the-box
/// without any config file at all.  Key derivation parameters live in
/// `crypto::kdf`, not here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Store file, relative to the working directory unless absolute.
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// Failed logins allowed per process before login is refused.
    #[serde(default = "default_max_failed_attempts")]
    pub max_failed_attempts: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_data_file() -> String {
    "data_store.json".to_string()
}

fn default_max_failed_attempts() -> u32 {
    MAX_FAILED_ATTEMPTS
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            max_failed_attempts: default_max_failed_attempts(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    pub const FILE_NAME: &'static str = ".secure-vault.toml";

    /// Load settings from `<dir>/.secure-vault.toml`.
    ///
    /// If the file does not exist, defaults are returned.
    /// If the file exists but cannot be parsed or holds invalid values,
    /// an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.data_file.trim().is_empty() {
            return Err(VaultError::ConfigError("data_file cannot be empty".into()));
        }
        if self.max_failed_attempts < 1 {
            return Err(VaultError::ConfigError(
                "max_failed_attempts must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Resolve the store file path against `dir`.
    ///
    /// Example: `dir/data_store.json`
    pub fn data_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.data_file)
    }
}

// ── Tests ────────────────────────────────────────────────────────────
