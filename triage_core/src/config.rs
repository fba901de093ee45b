//! Configuration file support.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/triage/config.toml`.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub capacity: CapacityConfig,
}

/// Data storage configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Seed capacity configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CapacityConfig {
    /// Beds each hospital starts with (and returns to on reset)
    #[serde(default = "default_beds")]
    pub default_beds: u32,
}

impl Default for CapacityConfig {
    fn default() -> Self {
        Self {
            default_beds: default_beds(),
        }
    }
}

// Default value functions
fn default_data_dir() -> PathBuf {
    let base = dirs::data_local_dir().unwrap_or_else(|| {
        let home = std::env::var("HOME").expect("HOME environment variable not set");
        PathBuf::from(home).join(".local/share")
    });
    base.join("triage")
}

fn default_beds() -> u32 {
    5
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        if config.capacity.default_beds == 0 {
            return Err(Error::Config(
                "capacity.default_beds must be at least 1".into(),
            ));
        }
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME").expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("triage").join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.capacity.default_beds, 5);
        assert!(config.data.data_dir.ends_with("triage"));
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[capacity]
default_beds = 8
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.capacity.default_beds, 8);
        assert!(config.data.data_dir.ends_with("triage")); // default
    }

    #[test]
    fn test_zero_beds_rejected() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[capacity]\ndefault_beds = 0\n").unwrap();

        let result = Config::load_from(&path);
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
