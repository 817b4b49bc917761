//! Named settings files on disk.
//!
//! Each configuration is a TOML file `<name>.toml` in the config directory
//! (`$XDG_CONFIG_HOME/secws` or the platform equivalent).

use crate::error::{FirewallError, Result};
use crate::settings::FirewallSettings;
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// On-disk layout of a configuration file.
#[derive(Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    firewall: FirewallSettings,
}

/// Directory of named configurations.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Opens the store in the user config directory, creating it if needed.
    pub fn open_default() -> Result<Self> {
        let base = dirs::config_dir().ok_or_else(|| {
            FirewallError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        Self::at(base.join("secws"))
    }

    /// Opens the store rooted at `dir`, creating it if needed.
    pub fn at(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File for `name`. Names are plain file stems, so anything that could
    /// leave the store directory is rejected.
    fn path_for(&self, name: &str) -> Result<PathBuf> {
        let invalid = name.is_empty()
            || name.starts_with('.')
            || name.contains(['/', '\\']);
        if invalid {
            return Err(FirewallError::InvalidConfigName(name.to_string()));
        }
        Ok(self.dir.join(format!("{}.toml", name)))
    }

    /// Saves `settings` under `name`, replacing any previous file.
    pub fn save(&self, name: &str, settings: &FirewallSettings) -> Result<()> {
        let config = ConfigFile {
            firewall: settings.clone(),
        };
        let content = toml::to_string_pretty(&config)?;

        let mut file = fs::File::create(self.path_for(name)?)?;
        file.write_all(content.as_bytes())?;

        info!("Saved configuration to {}", name);
        Ok(())
    }

    /// Loads the settings stored under `name`.
    pub fn load(&self, name: &str) -> Result<FirewallSettings> {
        let content = fs::read_to_string(self.path_for(name)?)?;
        let config: ConfigFile = toml::from_str(&content)?;

        info!("Loaded configuration from {}", name);
        Ok(config.firewall)
    }

    /// Lists stored configuration names, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut configs = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "toml") {
                if let Some(name) = path.file_stem().and_then(|n| n.to_str()) {
                    configs.push(name.to_string());
                }
            }
        }
        configs.sort();
        Ok(configs)
    }

    /// Deletes the configuration stored under `name`.
    pub fn delete(&self, name: &str) -> Result<()> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Err(FirewallError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("Configuration {} does not exist", name),
            )));
        }
        fs::remove_file(&path)?;

        info!("Deleted configuration {}", name);
        Ok(())
    }
}
