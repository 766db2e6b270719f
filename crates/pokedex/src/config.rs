//! Pokedex configuration.
//!
//! Stored as JSON at `<config dir>/pokedex/config.json`. Missing fields take
//! their defaults; an unreadable file is logged and replaced by defaults.

use std::path::{Path, PathBuf};

use pokedex_pokeapi::ClientConfig;
use serde::{Deserialize, Serialize};

/// Pokedex configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PokedexConfig {
    /// Catalog API settings.
    #[serde(default)]
    pub api: ClientConfig,

    /// Where the owned collection lives. Defaults to
    /// `<config dir>/pokedex/data`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl PokedexConfig {
    /// Loads the configuration from the default location.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&config_path()?)
    }

    /// Loads the configuration from `path`, defaulting when it is absent.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        match serde_json::from_str::<Self>(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config, using defaults"
                );
                Ok(Self::default())
            }
        }
    }

    /// Saves the configuration to the default location.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        tracing::debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Directory of the owned-collection storage.
    pub fn resolved_data_dir(&self) -> anyhow::Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(config_base_dir()?.join("pokedex").join("data")),
        }
    }
}

fn config_path() -> anyhow::Result<PathBuf> {
    Ok(config_base_dir()?.join("pokedex").join("config.json"))
}

/// Returns the platform-specific config directory.
fn config_base_dir() -> anyhow::Result<PathBuf> {
    #[cfg(target_os = "linux")]
    let dir = std::env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var("HOME")
                .ok()
                .map(|h| PathBuf::from(h).join(".config"))
        });

    #[cfg(target_os = "windows")]
    let dir = std::env::var("APPDATA").ok().map(PathBuf::from);

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    let dir = std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config"));

    dir.ok_or_else(|| anyhow::anyhow!("config directory not available"))
}
