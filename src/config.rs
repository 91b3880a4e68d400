//! Configuration for vibelist.
//!
//! Values come from environment variables and a `.env` file in the local data
//! directory. Variables already present in the process environment take
//! precedence over the file, so a single run can override any key:
//!
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Built-in defaults for the pipeline tunables
//!
//! Accessors for required keys return [`ConfigError::Missing`] instead of
//! panicking; the CLI layer decides whether a missing key is fatal.

use std::{env, path::PathBuf, str::FromStr, time::Duration};

use thiserror::Error;

use crate::vibe::{AggregatorSettings, PipelineSettings};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set (see the .env file in the vibelist data directory)")]
    Missing(&'static str),
    #[error("failed to prepare configuration directory: {0}")]
    Io(#[from] std::io::Error),
}

/// Platform data directory for vibelist.
///
/// - Linux: `~/.local/share/vibelist`
/// - macOS: `~/Library/Application Support/vibelist`
/// - Windows: `%LOCALAPPDATA%/vibelist`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("vibelist");
    path
}

/// Loads environment variables from `<data dir>/.env`.
///
/// Creates the data directory when it does not exist. A missing `.env` file is
/// not an error: every key can also come from the process environment.
///
/// # Errors
///
/// Returns an error only when the data directory cannot be created.
pub async fn load_env() -> Result<(), ConfigError> {
    let dir = data_dir();
    async_fs::create_dir_all(&dir).await?;

    let path = dir.join(".env");
    if dotenv::from_path(&path).is_err() {
        crate::warning!(
            "No readable .env at {}, using the process environment only",
            path.display()
        );
    }
    Ok(())
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    env::var(key).map_err(|_| ConfigError::Missing(key))
}

/// Parses `key` as `T`, falling back to `default` when unset or malformed.
pub fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Address the callback and API server binds to, e.g. `127.0.0.1:8888`.
pub fn server_addr() -> Result<String, ConfigError> {
    required("SERVER_ADDRESS")
}

/// Spotify user that owns created playlists.
pub fn spotify_user() -> Result<String, ConfigError> {
    required("SPOTIFY_USER_ID")
}

/// Client id of the Spotify application. PKCE needs no client secret.
pub fn spotify_client_id() -> Result<String, ConfigError> {
    required("SPOTIFY_API_AUTH_CLIENT_ID")
}

/// Must match a redirect URI registered for the Spotify application.
pub fn spotify_redirect_uri() -> Result<String, ConfigError> {
    required("SPOTIFY_API_REDIRECT_URI")
}

/// Space-separated OAuth scopes. Playlist creation needs
/// `playlist-modify-public` or `playlist-modify-private`; cover upload needs
/// `ugc-image-upload`.
pub fn spotify_scope() -> Result<String, ConfigError> {
    required("SPOTIFY_API_AUTH_SCOPE")
}

pub fn spotify_apiauth_url() -> Result<String, ConfigError> {
    required("SPOTIFY_API_AUTH_URL")
}

pub fn spotify_apiurl() -> Result<String, ConfigError> {
    required("SPOTIFY_API_URL")
}

pub fn spotify_apitoken_url() -> Result<String, ConfigError> {
    required("SPOTIFY_API_TOKEN_URL")
}

/// Optional ISO 3166-1 market code passed to catalog queries.
pub fn spotify_market() -> Option<String> {
    env::var("SPOTIFY_MARKET")
        .ok()
        .map(|m| m.trim().to_uppercase())
        .filter(|m| !m.is_empty())
}

/// Pipeline tunables with their defaults:
///
/// | Key                             | Default |
/// |---------------------------------|---------|
/// | `VIBELIST_TARGET_COUNT`         | 20      |
/// | `VIBELIST_MAX_PER_ARTIST`       | 3       |
/// | `VIBELIST_CATALOG_TIMEOUT_SECS` | 5       |
/// | `VIBELIST_MAX_BACKFILL_ROUNDS`  | 5       |
///
/// A zero target, artist cap or timeout is raised to one.
pub fn pipeline_settings() -> PipelineSettings {
    let defaults = PipelineSettings::default();
    let aggregator = AggregatorSettings {
        call_timeout: Duration::from_secs(
            env_or(
                "VIBELIST_CATALOG_TIMEOUT_SECS",
                defaults.aggregator.call_timeout.as_secs(),
            )
            .max(1),
        ),
        max_backfill_rounds: env_or(
            "VIBELIST_MAX_BACKFILL_ROUNDS",
            defaults.aggregator.max_backfill_rounds,
        ),
        ..defaults.aggregator.clone()
    };

    PipelineSettings {
        target_count: env_or("VIBELIST_TARGET_COUNT", defaults.target_count).max(1),
        max_per_artist: env_or("VIBELIST_MAX_PER_ARTIST", defaults.max_per_artist).max(1),
        aggregator,
        ..defaults
    }
}
