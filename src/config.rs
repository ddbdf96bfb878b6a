//! Configuration management for cmakescan

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::{CmakeScanError, Result};

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// General settings
    #[serde(default)]
    pub general: GeneralConfig,

    /// Extraction settings
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// General configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Number of archives processed in parallel
    pub jobs: usize,
    /// Abort the run on the first archive that fails
    pub strict: bool,
}

/// Extraction configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Directory under which the per-run extraction root is created
    pub temp_dir: Option<PathBuf>,
    /// Keep extracted trees after the run
    pub keep_temp: bool,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Enable colored output
    pub color: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            jobs: 1,
            strict: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            color: true,
        }
    }
}

impl Config {
    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CmakeScanError::Config("Could not find config directory".into()))?;
        Ok(config_dir.join("cmakescan").join("config.toml"))
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from a file, falling back to defaults when absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| CmakeScanError::Config(e.to_string()))?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Reset the configuration file to defaults
    pub fn reset(path: &Path) -> Result<()> {
        Self::default().save_to(path)
    }

    /// Initialize the configuration file
    pub fn init(path: &Path, force: bool) -> Result<()> {
        if path.exists() && !force {
            return Err(CmakeScanError::Config(
                "Configuration file already exists. Use --force to overwrite.".into(),
            ));
        }

        Self::default().save_to(path)
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "general.jobs" => Some(self.general.jobs.to_string()),
            "general.strict" => Some(self.general.strict.to_string()),

            "extraction.temp_dir" => self
                .extraction
                .temp_dir
                .as_ref()
                .map(|p| p.display().to_string()),
            "extraction.keep_temp" => Some(self.extraction.keep_temp.to_string()),

            "logging.level" => Some(self.logging.level.clone()),
            "logging.color" => Some(self.logging.color.to_string()),

            _ => None,
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "general.jobs" => {
                let jobs: usize = value
                    .parse()
                    .map_err(|_| CmakeScanError::Config("Invalid number for jobs".into()))?;
                if jobs == 0 {
                    return Err(CmakeScanError::Config("jobs must be at least 1".into()));
                }
                self.general.jobs = jobs;
            }
            "general.strict" => {
                self.general.strict = value
                    .parse()
                    .map_err(|_| CmakeScanError::Config("Invalid boolean for strict".into()))?;
            }

            "extraction.temp_dir" => {
                self.extraction.temp_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "extraction.keep_temp" => {
                self.extraction.keep_temp = value
                    .parse()
                    .map_err(|_| CmakeScanError::Config("Invalid boolean for keep_temp".into()))?;
            }

            "logging.level" => {
                self.logging.level = value.to_string();
            }
            "logging.color" => {
                self.logging.color = value
                    .parse()
                    .map_err(|_| CmakeScanError::Config("Invalid boolean for color".into()))?;
            }

            _ => {
                return Err(CmakeScanError::Config(format!(
                    "Unknown configuration key: {}",
                    key
                )));
            }
        }

        Ok(())
    }

    /// Directory under which extraction roots are created
    pub fn temp_root(&self) -> PathBuf {
        self.extraction
            .temp_dir
            .clone()
            .unwrap_or_else(std::env::temp_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.general.jobs, 1);
        assert!(!config.general.strict);
        assert!(!config.extraction.keep_temp);
        assert_eq!(config.temp_root(), std::env::temp_dir());
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();

        config.set("general.strict", "true").unwrap();
        assert_eq!(config.get("general.strict"), Some("true".to_string()));

        config.set("extraction.temp_dir", "/var/tmp").unwrap();
        assert_eq!(config.temp_root(), PathBuf::from("/var/tmp"));

        assert!(config.set("general.jobs", "0").is_err());
        assert!(config.set("general.jobs", "many").is_err());
        assert!(config.set("no.such.key", "1").is_err());
        assert_eq!(config.get("no.such.key"), None);
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("general.jobs", "4").unwrap();
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
        assert!(Config::init(&path, false).is_err());
        Config::init(&path, true).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().general.jobs, 1);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[extraction]\nkeep_temp = true\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(config.extraction.keep_temp);
        assert_eq!(config.general.jobs, 1);
        assert_eq!(config.logging.level, "info");
    }
}
