//! Comando Configuration
//!
//! Where the category files and stopwords live, and how discovery probes.
//! Config file: ~/.config/comando/config.toml or /etc/comando/config.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable pointing at an explicit config file
pub const CONFIG_ENV: &str = "COMANDO_CONFIG";

/// Data and configuration file locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding action/target/context category files
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// JSON file with `{"all": [...]}` stopwords
    #[serde(default = "default_stopwords_file")]
    pub stopwords_file: PathBuf,
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_stopwords_file() -> PathBuf {
    PathBuf::from("config/stopwords.json")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            stopwords_file: default_stopwords_file(),
        }
    }
}

/// Discovery probe settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Timeout of each website request, in milliseconds
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Try `https://<token>.com` / `.com.br` before anything else
    #[serde(default = "default_true")]
    pub website_probe: bool,

    /// Search `$PATH` for a matching program
    #[serde(default = "default_true")]
    pub local_app_probe: bool,
}

fn default_probe_timeout_ms() -> u64 {
    2000
}

fn default_true() -> bool {
    true
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            probe_timeout_ms: default_probe_timeout_ms(),
            website_probe: true,
            local_app_probe: true,
        }
    }
}

/// Main Comando configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComandoConfig {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

impl ComandoConfig {
    /// Get default user config path: ~/.config/comando/config.toml
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("comando").join("config.toml"))
    }

    /// Get system config path: /etc/comando/config.toml
    pub fn system_config_path() -> PathBuf {
        PathBuf::from("/etc/comando/config.toml")
    }

    /// Load configuration
    ///
    /// Priority:
    /// 1. Explicit path (CLI flag)
    /// 2. $COMANDO_CONFIG
    /// 3. User config (~/.config/comando/config.toml)
    /// 4. System config (/etc/comando/config.toml)
    /// 5. Defaults
    ///
    /// An explicit path must exist; the others are skipped when absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load_from(Path::new(&path));
        }

        if let Some(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::load_from(&user_path);
            }
        }

        let system_path = Self::system_config_path();
        if system_path.exists() {
            return Self::load_from(&system_path);
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: ComandoConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to the user config file
    pub fn save(&self) -> Result<()> {
        let path = Self::user_config_path().context("Cannot determine config directory")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, toml_string)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ComandoConfig::default();
        assert_eq!(config.paths.data_dir, PathBuf::from("data"));
        assert_eq!(config.paths.stopwords_file, PathBuf::from("config/stopwords.json"));
        assert_eq!(config.discovery.probe_timeout_ms, 2000);
        assert!(config.discovery.website_probe);
        assert!(config.discovery.local_app_probe);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[discovery]\nwebsite_probe = false\n").unwrap();

        let config = ComandoConfig::load(Some(path.as_path())).unwrap();
        assert!(!config.discovery.website_probe);
        assert_eq!(config.discovery.probe_timeout_ms, 2000);
        assert_eq!(config.paths, PathsConfig::default());
    }

    #[test]
    fn test_explicit_path_errors() {
        let dir = TempDir::new().unwrap();
        assert!(ComandoConfig::load(Some(dir.path().join("missing.toml").as_path())).is_err());

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "[paths\ndata_dir = ").unwrap();
        assert!(ComandoConfig::load(Some(bad.as_path())).is_err());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = ComandoConfig::default();
        config.paths.data_dir = PathBuf::from("/srv/comando/data");
        config.discovery.probe_timeout_ms = 500;

        config.save_to(&path).unwrap();
        assert_eq!(ComandoConfig::load_from(&path).unwrap(), config);
    }
}
