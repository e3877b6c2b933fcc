//! Configuration management for Porta.
//!
//! Loads configuration from ${PORTA_HOME}/config.toml with sensible defaults.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub mod paths {
    //! Path resolution for Porta configuration and data directories.
    //!
    //! PORTA_HOME resolution order:
    //! 1. PORTA_HOME environment variable (if set)
    //! 2. ~/.config/porta (default)
    //! 3. ./.porta when no home directory can be determined

    use std::path::PathBuf;

    /// Returns the Porta home directory.
    pub fn porta_home() -> PathBuf {
        if let Ok(home) = std::env::var("PORTA_HOME") {
            return PathBuf::from(home);
        }

        dirs::home_dir().map_or_else(
            || PathBuf::from(".porta"),
            |h| h.join(".config").join("porta"),
        )
    }

    /// Returns the path to the config.toml file.
    pub fn config_path() -> PathBuf {
        porta_home().join("config.toml")
    }

    /// Returns the directory log files are written to.
    pub fn logs_dir() -> PathBuf {
        porta_home().join("logs")
    }
}

/// Identity backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Firebase Authentication REST API.
    #[default]
    Firebase,
    /// In-process account table.
    Memory,
}

impl ProviderKind {
    pub fn display_name(self) -> &'static str {
        match self {
            ProviderKind::Firebase => "Firebase",
            ProviderKind::Memory => "in-memory",
        }
    }
}

/// Firebase project settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FirebaseConfig {
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_url: Option<String>,
}

impl FirebaseConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://identitytoolkit.googleapis.com/v1";
    pub const DEFAULT_TOKEN_URL: &'static str = "https://securetoken.googleapis.com/v1";

    /// API key from `PORTA_API_KEY`, falling back to the config value.
    /// Empty strings count as unset.
    pub fn effective_api_key(&self) -> Option<String> {
        env_non_empty("PORTA_API_KEY").or_else(|| non_empty(self.api_key.as_deref()))
    }

    /// Identity Toolkit base URL, without a trailing slash.
    pub fn effective_base_url(&self) -> String {
        env_non_empty("PORTA_AUTH_BASE_URL")
            .or_else(|| non_empty(self.base_url.as_deref()))
            .unwrap_or_else(|| Self::DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string()
    }

    /// Secure Token base URL, without a trailing slash.
    pub fn effective_token_url(&self) -> String {
        env_non_empty("PORTA_TOKEN_BASE_URL")
            .or_else(|| non_empty(self.token_url.as_deref()))
            .unwrap_or_else(|| Self::DEFAULT_TOKEN_URL.to_string())
            .trim_end_matches('/')
            .to_string()
    }
}

fn env_non_empty(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderKind,
    pub remember_session: bool,
    pub firebase: FirebaseConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            remember_session: true,
            firebase: FirebaseConfig::default(),
        }
    }
}

fn default_config_template() -> &'static str {
    include_str!("../default_config.toml")
}

impl Config {
    /// Loads configuration from the default path.
    /// Returns defaults if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&paths::config_path())
    }

    /// Loads configuration from a specific path.
    /// Returns defaults if file doesn't exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config from {}", path.display()))
        } else {
            Ok(Config::default())
        }
    }

    /// Creates a default config file at the given path.
    /// Returns an error if the file already exists.
    pub fn init(path: &Path) -> Result<()> {
        if path.exists() {
            anyhow::bail!("Config file already exists at {}", path.display());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let tmp_path = path.with_extension("toml.tmp");
        fs::write(&tmp_path, default_config_template())
            .with_context(|| format!("Failed to write config to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                path.display()
            )
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nonexistent.toml")).unwrap();
        assert_eq!(config.provider, ProviderKind::Firebase);
        assert!(config.remember_session);
        assert_eq!(config.firebase.api_key, None);
    }

    #[test]
    fn test_load_partial_config_merges_defaults() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "provider = \"memory\"\n").unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.provider, ProviderKind::Memory);
        assert!(config.remember_session);
    }

    #[test]
    fn test_load_firebase_section() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            "remember_session = false\n[firebase]\napi_key = \"abc\"\nbase_url = \"http://localhost:9099/v1/\"\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert!(!config.remember_session);
        assert_eq!(config.firebase.api_key.as_deref(), Some("abc"));
        assert_eq!(config.firebase.base_url.as_deref(), Some("http://localhost:9099/v1/"));
    }

    #[test]
    fn test_unused_firebase_web_keys_are_ignored() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            "[firebase]\napi_key = \"abc\"\nauth_domain = \"x.firebaseapp.com\"\nproject_id = \"x\"\n",
        )
        .unwrap();

        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.firebase.api_key.as_deref(), Some("abc"));
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "provider = [").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn test_unknown_provider_fails() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "provider = \"ldap\"\n").unwrap();

        assert!(Config::load_from(&config_path).is_err());
    }

    #[test]
    fn test_init_creates_template() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("subdir").join("config.toml");

        Config::init(&config_path).unwrap();

        let contents = fs::read_to_string(&config_path).unwrap();
        assert!(contents.contains("provider = \"firebase\""));
        assert!(contents.contains("[firebase]"));

        // The template must parse back into the defaults.
        let config = Config::load_from(&config_path).unwrap();
        assert_eq!(config.provider, ProviderKind::Firebase);
        assert_eq!(non_empty(config.firebase.api_key.as_deref()), None);
    }

    #[test]
    fn test_init_fails_if_exists() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.toml");
        fs::write(&config_path, "").unwrap();

        let err = Config::init(&config_path).unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn test_blank_config_values_are_unset() {
        let firebase = FirebaseConfig {
            base_url: Some("  ".to_string()),
            ..FirebaseConfig::default()
        };
        assert_eq!(non_empty(firebase.base_url.as_deref()), None);
        assert_eq!(non_empty(Some(" key ")), Some("key".to_string()));
    }
}
