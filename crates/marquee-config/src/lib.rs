pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{is_usable_key, Config, TmdbConfig, WatchlistConfig, API_KEY_ENV};
pub use credentials::CredentialStore;
pub use paths::{container_base_path, PathManager};
