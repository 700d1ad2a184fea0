// src/infrastructure/settings.rs
use crate::application::SettingsRepository;
use crate::constants::{SETTINGS_DIR, SETTINGS_FILE};
use crate::domain::{AppSettings, DomainError};
use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

/// Settings kept as pretty-printed JSON in a single file
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// `<config dir>/Notex/settings.json` for the current user
    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(default_settings_path()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub fn default_settings_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Could not find the user config directory")?;
    Ok(config_dir.join(SETTINGS_DIR).join(SETTINGS_FILE))
}

fn settings_error(path: &Path, action: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::Settings(format!("Failed to {action} {}: {err}", path.display()))
}

impl SettingsRepository for SettingsStore {
    #[instrument(level = "debug", skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<AppSettings, DomainError> {
        if !self.path.exists() {
            debug!("No settings file, using defaults");
            return Ok(AppSettings::default());
        }

        let content =
            fs::read_to_string(&self.path).map_err(|e| settings_error(&self.path, "read", e))?;
        if content.trim().is_empty() {
            return Ok(AppSettings::default());
        }
        serde_json::from_str(&content).map_err(|e| settings_error(&self.path, "parse", e))
    }

    #[instrument(level = "debug", skip(self, settings), fields(path = %self.path.display()))]
    fn save(&self, settings: &AppSettings) -> Result<(), DomainError> {
        let directory = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&directory).map_err(|e| settings_error(&directory, "create", e))?;

        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| settings_error(&self.path, "serialize", e))?;

        // Write next to the target and rename, so a crash never leaves half a file
        let mut file =
            NamedTempFile::new_in(&directory).map_err(|e| settings_error(&directory, "write to", e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| settings_error(&self.path, "write", e))?;
        file.persist(&self.path)
            .map_err(|e| settings_error(&self.path, "replace", e))?;

        debug!("Settings saved");
        Ok(())
    }
}
