//! Configuration for the command-line front end
//!
//! Read from a TOML file; every field has a default, and a missing file
//! means "all defaults".

use crate::drag::{DEFAULT_DRAG_THRESHOLD, DragCoordinator};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding the persisted state; the platform data directory
    /// when unset
    pub data_dir: Option<PathBuf>,
    /// Log filter used when `RUST_LOG` is not set
    pub log_level: String,
    /// Pointer distance before a press becomes a drag
    pub drag_threshold: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            log_level: "warn".to_string(),
            drag_threshold: DEFAULT_DRAG_THRESHOLD,
        }
    }
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &Path) -> PathBuf {
    if let Ok(rest) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    path.to_path_buf()
}

impl Config {
    /// Parse a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content).context("Invalid configuration")?;
        config.data_dir = config.data_dir.as_deref().map(expand_home);
        if !config.drag_threshold.is_finite() || config.drag_threshold < 0.0 {
            anyhow::bail!(
                "Invalid drag_threshold {}: must be a non-negative number",
                config.drag_threshold
            );
        }
        Ok(config)
    }

    /// Load configuration from `path`, falling back to defaults if it does not exist
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_toml_str(&content).with_context(|| format!("In {}", path.display()))
    }

    /// `toodo/config.toml` under the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("toodo").join("config.toml"))
    }

    /// Directory for the persisted state
    ///
    /// # Returns
    /// The configured `data_dir`, else `toodo` under the platform data
    /// directory. Fails when neither is available.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.data_dir {
            return Ok(dir.clone());
        }
        dirs::data_dir()
            .map(|d| d.join("toodo"))
            .context("Could not determine data directory; set data_dir or pass --data-dir")
    }

    /// A drag coordinator for `category_id` using the configured threshold
    pub fn drag_coordinator(&self, category_id: impl Into<String>) -> DragCoordinator {
        DragCoordinator::new(category_id).with_threshold(self.drag_threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml_str("log_level = \"debug\"\n").unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.drag_threshold, DEFAULT_DRAG_THRESHOLD);
    }

    #[test]
    fn test_full_file() {
        let config = Config::from_toml_str(
            "data_dir = \"/var/lib/toodo\"\nlog_level = \"info\"\ndrag_threshold = 4.5\n",
        )
        .unwrap();
        assert_eq!(config.data_dir, Some(PathBuf::from("/var/lib/toodo")));
        assert_eq!(config.resolve_data_dir().unwrap(), PathBuf::from("/var/lib/toodo"));
        assert_eq!(config.drag_threshold, 4.5);
        assert_eq!(config.drag_coordinator("c").category_id(), "c");
    }

    #[test]
    fn test_rejects_negative_threshold_and_bad_types() {
        assert!(Config::from_toml_str("drag_threshold = -1.0").is_err());
        assert!(Config::from_toml_str("drag_threshold = \"far\"").is_err());
    }

    #[test]
    fn test_tilde_expands_to_home() {
        let config = Config::from_toml_str("data_dir = \"~/tasks\"").unwrap();
        match dirs::home_dir() {
            Some(home) => assert_eq!(config.data_dir, Some(home.join("tasks"))),
            None => assert_eq!(config.data_dir, Some(PathBuf::from("~/tasks"))),
        }
    }

    #[test]
    fn test_default_data_dir_is_absolute() {
        if let Ok(dir) = Config::default().resolve_data_dir() {
            assert!(dir.is_absolute());
            assert!(dir.ends_with("toodo"));
        }
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = TempDir::new().unwrap();
        let config = Config::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.data_dir, None);
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "drag_threshold = 12.0\n").unwrap();
        assert_eq!(Config::load(&path).unwrap().drag_threshold, 12.0);
    }
}
