//! Browser configuration loaded from TOML.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, WayfarerError};

/// Home page used when nothing has been persisted yet.
pub const DEFAULT_HOME_URL: &str = "https://www.example.com";

/// Blob key under which the whole navigation snapshot is stored.
pub const DEFAULT_STORAGE_KEY: &str = "browser-storage";

/// How viewport navigation reports interact with the address bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AddressTracking {
    /// Every reported navigation overwrites the address text.
    #[default]
    Live,
    /// Reported navigations leave the address text alone while the user is
    /// editing it.
    PreserveWhileEditing,
}

/// Top-level browser configuration (`wayfarer.toml`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BrowserConfig {
    /// URL committed on first launch or when the stored snapshot is unusable.
    #[serde(default = "default_home_url")]
    pub home_url: String,
    /// Fixed key of the persisted snapshot.
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    /// Directory backing the blob store. `None` keeps state in memory only.
    #[serde(default)]
    pub storage_dir: Option<PathBuf>,
    #[serde(default)]
    pub address_tracking: AddressTracking,
}

fn default_home_url() -> String {
    DEFAULT_HOME_URL.to_string()
}
fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            home_url: default_home_url(),
            storage_key: default_storage_key(),
            storage_dir: None,
            address_tracking: AddressTracking::default(),
        }
    }
}

impl BrowserConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(WayfarerError::Config(
                "storage_key must not be empty".to_string(),
            ));
        }
        if self.home_url.trim().is_empty() {
            return Err(WayfarerError::Config(
                "home_url must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BrowserConfig::default();
        assert_eq!(config.home_url, "https://www.example.com");
        assert_eq!(config.storage_key, "browser-storage");
        assert!(config.storage_dir.is_none());
        assert_eq!(config.address_tracking, AddressTracking::Live);
    }

    #[test]
    fn empty_toml_is_default() {
        let config = BrowserConfig::from_toml_str("").unwrap();
        assert_eq!(config, BrowserConfig::default());
    }

    #[test]
    fn parses_all_fields() {
        let config = BrowserConfig::from_toml_str(
            r#"
            home_url = "https://start.test"
            storage_key = "nav"
            storage_dir = "/tmp/wayfarer"
            address_tracking = "preserve-while-editing"
            "#,
        )
        .unwrap();
        assert_eq!(config.home_url, "https://start.test");
        assert_eq!(config.storage_key, "nav");
        assert_eq!(config.storage_dir, Some(PathBuf::from("/tmp/wayfarer")));
        assert_eq!(
            config.address_tracking,
            AddressTracking::PreserveWhileEditing
        );
    }

    #[test]
    fn unknown_tracking_mode_is_error() {
        let err = BrowserConfig::from_toml_str("address_tracking = \"sometimes\"").unwrap_err();
        assert!(matches!(err, WayfarerError::TomlParse(_)));
    }

    #[test]
    fn empty_storage_key_rejected() {
        let err = BrowserConfig::from_toml_str("storage_key = \"  \"").unwrap_err();
        assert!(format!("{err}").contains("storage_key"));
    }

    #[test]
    fn load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = BrowserConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, BrowserConfig::default());
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wayfarer.toml");
        std::fs::write(&path, "home_url = \"https://home.test\"\n").unwrap();
        let config = BrowserConfig::load(&path).unwrap();
        assert_eq!(config.home_url, "https://home.test");
    }
}
