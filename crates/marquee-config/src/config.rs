use crate::credentials::CredentialStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Environment variable consulted before any stored API key
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

const PLACEHOLDER_API_KEY: &str = "YOUR_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub watchlist: WatchlistConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Prefer `credentials.toml` or `TMDB_API_KEY`; kept here for single-file setups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WatchlistConfig {
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_storage_key() -> String {
    "moviedb-watchlist".to_string()
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            api_key: None,
        }
    }
}

impl Default for WatchlistConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &PathBuf) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Defaults when the file does not exist yet
    pub fn load_or_default(path: &PathBuf) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &PathBuf) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        validate_url("tmdb.base_url", &self.tmdb.base_url)?;
        validate_url("tmdb.image_base_url", &self.tmdb.image_base_url)?;

        if let Some(key) = &self.tmdb.api_key {
            if !is_usable_key(key) {
                return Err(anyhow::anyhow!("tmdb.api_key is set but not configured"));
            }
        }

        if self.watchlist.storage_key.trim().is_empty() {
            return Err(anyhow::anyhow!("watchlist.storage_key cannot be empty"));
        }

        Ok(())
    }

    /// API key from `TMDB_API_KEY`, then the credential store, then this file
    pub fn resolve_api_key(&self, credentials: &CredentialStore) -> Option<String> {
        resolve_api_key_from(std::env::var(API_KEY_ENV).ok(), credentials, self)
    }
}

fn resolve_api_key_from(
    env_value: Option<String>,
    credentials: &CredentialStore,
    config: &Config,
) -> Option<String> {
    env_value
        .into_iter()
        .chain(credentials.tmdb_api_key().cloned())
        .chain(config.tmdb.api_key.clone())
        .map(|key| key.trim().to_string())
        .find(|key| is_usable_key(key))
}

/// Non-empty and not the placeholder value
pub fn is_usable_key(key: &str) -> bool {
    let key = key.trim();
    !key.is_empty() && key != PLACEHOLDER_API_KEY
}

fn validate_url(name: &str, raw: &str) -> anyhow::Result<()> {
    let url = Url::parse(raw).map_err(|e| anyhow::anyhow!("{} is not a valid URL ({}): {}", name, e, raw))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow::anyhow!("{} must be an http(s) URL: {}", name, raw));
    }
    if url.host().is_none() {
        return Err(anyhow::anyhow!("{} has no host: {}", name, raw));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.tmdb.api_key = Some("test_key".to_string());
        config.watchlist.storage_key = "my-list".to_string();

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: Config = toml::from_str("[tmdb]\napi_key = \"k\"\n").unwrap();
        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.tmdb.image_base_url, "https://image.tmdb.org/t/p");
        assert_eq!(config.watchlist.storage_key, "moviedb-watchlist");
    }

    #[test]
    fn test_load_or_default_without_file() {
        let path = PathBuf::from("/nonexistent/marquee/config.toml");
        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_usable_key() {
        assert!(is_usable_key("0123456789abcdef"));
        assert!(is_usable_key("  padded  "));
        assert!(!is_usable_key("   "));
        assert!(!is_usable_key(PLACEHOLDER_API_KEY));
        assert!(!is_usable_key(" YOUR_API_KEY "));
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.tmdb.api_key = Some(PLACEHOLDER_API_KEY.to_string());
        assert!(config.validate().is_err());

        config.tmdb.api_key = Some("real_key".to_string());
        assert!(config.validate().is_ok());

        config.tmdb.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.tmdb.base_url = "https://".to_string();
        assert!(config.validate().is_err());

        config.tmdb.base_url = "https://exa mple.com/3".to_string();
        assert!(config.validate().is_err());

        config.tmdb.image_base_url = "image.tmdb.org/t/p".to_string();
        config.tmdb.base_url = "https://api.themoviedb.org/3".to_string();
        assert!(config.validate().is_err());
        config.tmdb.image_base_url = "https://image.tmdb.org/t/p".to_string();
        assert!(config.validate().is_ok());

        config.tmdb.base_url = "http://localhost:8080/3".to_string();
        config.watchlist.storage_key = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_api_key_resolution_order() {
        let mut credentials = CredentialStore::new(PathBuf::from("/tmp/unused"));
        let mut config = Config::default();
        config.tmdb.api_key = Some("from_config".to_string());

        assert_eq!(
            resolve_api_key_from(None, &credentials, &config).as_deref(),
            Some("from_config")
        );

        credentials.set_tmdb_api_key("from_credentials".to_string());
        assert_eq!(
            resolve_api_key_from(None, &credentials, &config).as_deref(),
            Some("from_credentials")
        );

        assert_eq!(
            resolve_api_key_from(Some("from_env".to_string()), &credentials, &config).as_deref(),
            Some("from_env")
        );

        // Blank or placeholder values fall through
        assert_eq!(
            resolve_api_key_from(Some("  ".to_string()), &credentials, &config).as_deref(),
            Some("from_credentials")
        );
        credentials.set_tmdb_api_key(PLACEHOLDER_API_KEY.to_string());
        config.tmdb.api_key = None;
        assert_eq!(resolve_api_key_from(None, &credentials, &config), None);
    }
}
