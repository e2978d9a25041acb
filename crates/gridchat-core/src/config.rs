//! Configuration management for gridchat.
//!
//! Loads configuration from `${GRIDCHAT_HOME}/config.toml` with sensible
//! defaults. Conversational state is deliberately not persisted anywhere;
//! only process configuration lives on disk.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Filesystem locations for gridchat configuration.
pub mod paths {
    use std::path::PathBuf;

    /// Returns the gridchat home directory.
    ///
    /// Honors the `GRIDCHAT_HOME` environment variable, falling back to
    /// `~/.gridchat`.
    pub fn gridchat_home() -> PathBuf {
        if let Ok(home) = std::env::var("GRIDCHAT_HOME") {
            let trimmed = home.trim();
            if !trimmed.is_empty() {
                return PathBuf::from(trimmed);
            }
        }
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".gridchat")
    }

    /// Returns the path to the config file.
    pub fn config_path() -> PathBuf {
        gridchat_home().join("config.toml")
    }
}

/// Process configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Model assigned to newly added columns.
    pub default_model: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_model: "gpt-3.5-turbo".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from `${GRIDCHAT_HOME}/config.toml`.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from an explicit path.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_load_from_missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.default_model, "gpt-3.5-turbo");
    }

    #[test]
    fn test_load_from_reads_default_model() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "default_model = \"claude-3-opus\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.default_model, "claude-3-opus");
    }

    #[test]
    fn test_load_from_tolerates_unknown_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "default_model = \"gpt-4\"\nfuture_knob = true\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.default_model, "gpt-4");
    }

    #[test]
    fn test_load_from_rejects_malformed_toml() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "default_model = [not toml").unwrap();

        let error = Config::load_from(&path).unwrap_err();
        assert!(error.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_gridchat_home_honors_env_override() {
        // SAFETY: Tests run in one process; we restore the variable before
        // returning.
        unsafe {
            std::env::set_var("GRIDCHAT_HOME", "/tmp/gridchat-test-home");
        }
        assert_eq!(
            paths::gridchat_home(),
            std::path::PathBuf::from("/tmp/gridchat-test-home")
        );
        assert!(paths::config_path().ends_with("config.toml"));
        unsafe {
            std::env::remove_var("GRIDCHAT_HOME");
        }
    }
}
