pub mod config;
pub mod movie;
pub mod progress;
pub mod prompts;
pub mod search;
pub mod watchlist;

use color_eyre::Result;
use marquee_api::{TmdbClient, TmdbSettings};
use marquee_config::{Config, CredentialStore, PathManager};
use marquee_core::{FileStorage, WatchlistStore};

/// Paths, configuration and credentials shared by every command
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub credentials: CredentialStore,
}

impl AppContext {
    pub fn load() -> Result<Self> {
        let paths = PathManager::default();

        let config_file = paths.config_file();
        let config = Config::load_or_default(&config_file).map_err(|e| {
            color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e)
        })?;

        let credentials_file = paths.credentials_file();
        let mut credentials = CredentialStore::new(credentials_file.clone());
        credentials.load().map_err(|e| {
            color_eyre::eyre::eyre!(
                "Failed to load credentials from {}: {}",
                credentials_file.display(),
                e
            )
        })?;

        Ok(Self {
            paths,
            config,
            credentials,
        })
    }

    pub fn client(&self) -> Result<TmdbClient> {
        self.config
            .validate()
            .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration: {}", e))?;

        let api_key = self.config.resolve_api_key(&self.credentials).ok_or_else(|| {
            color_eyre::eyre::eyre!(
                "No TMDB API key configured. Run 'marquee config api-key' or set {}",
                marquee_config::API_KEY_ENV
            )
        })?;

        Ok(TmdbClient::new(TmdbSettings {
            base_url: self.config.tmdb.base_url.clone(),
            image_base_url: self.config.tmdb.image_base_url.clone(),
            api_key,
        }))
    }

    pub async fn watchlist(&self) -> WatchlistStore<FileStorage> {
        let storage = FileStorage::new(self.paths.watchlist_dir());
        WatchlistStore::open(storage, self.config.watchlist.storage_key.clone()).await
    }
}

/// Shorten `text` to at most `max_chars` characters, ending with an ellipsis when cut
pub fn truncate(text: &str, max_chars: usize) -> String {
    let text = text.trim();
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", kept.trim_end())
}

pub fn year_or_dash(year: Option<i32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| "—".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("  padded  ", 10), "padded");
        assert_eq!(truncate("a long sentence here", 8), "a long…");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }

    #[test]
    fn test_year_or_dash() {
        assert_eq!(year_or_dash(Some(1999)), "1999");
        assert_eq!(year_or_dash(None), "—");
    }
}
