//! Configuration management for the Spotify Library Exporter.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including Spotify API credentials, callback server settings,
//! token cache location and the output directories.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (everything but the client id has one)

use std::{env, path::PathBuf, time::Duration};

pub const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
pub const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
pub const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
pub const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_CSV_DIR: &str = "spotify csvs";
pub const DEFAULT_JSON_DIR: &str = "spotify jsons";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// Read-only scopes covering every exported dataset.
pub const DEFAULT_SCOPES: [&str; 6] = [
    "user-library-read",
    "playlist-read-private",
    "playlist-read-collaborative",
    "user-follow-read",
    "user-top-read",
    "user-read-recently-played",
];

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the necessary directory structure if it doesn't exist and loads
/// environment variables from a `.env` file located in the platform-specific
/// local data directory under `sporlexport/.env`. This allows users to store
/// credentials without passing them on every invocation.
///
/// # Directory Structure
///
/// The function looks for the `.env` file in:
/// - Linux: `~/.local/share/sporlexport/.env`
/// - macOS: `~/Library/Application Support/sporlexport/.env`
/// - Windows: `%LOCALAPPDATA%/sporlexport/.env`
///
/// A missing `.env` file is not an error; the process environment alone may
/// carry the configuration.
///
/// # Errors
///
/// This function will return an error if:
/// - The parent directory cannot be created
/// - The `.env` file exists but cannot be read or parsed
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    if !path.is_file() {
        return Ok(());
    }

    dotenv::from_path(&path).map_err(|e| format!("{}: {}", path.display(), e))
}

/// Directory holding the `.env` file and the token cache.
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("sporlexport");
    path
}

/// Runtime configuration of one export run.
///
/// Built once at start-up from the environment and passed down explicitly;
/// nothing else in the crate reads environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: Option<String>,
    pub redirect_uri: String,
    pub scope: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_url: String,
    pub server_addr: String,
    pub token_cache_path: PathBuf,
    pub csv_dir: PathBuf,
    pub json_dir: PathBuf,
    pub page_size: Option<u32>,
    pub http_timeout: Duration,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// See [`Config::from_lookup`] for the recognized variables.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// # Variables
    ///
    /// - `SPOTIFY_API_AUTH_CLIENT_ID` (required)
    /// - `SPOTIFY_API_AUTH_CLIENT_SECRET`
    /// - `SPOTIFY_API_REDIRECT_URI`
    /// - `SPOTIFY_API_AUTH_SCOPE`
    /// - `SPOTIFY_API_AUTH_URL`
    /// - `SPOTIFY_API_TOKEN_URL`
    /// - `SPOTIFY_API_URL`
    /// - `SERVER_ADDRESS`
    /// - `TOKEN_CACHE_PATH`
    /// - `EXPORT_CSV_DIR`
    /// - `EXPORT_JSON_DIR`
    /// - `EXPORT_PAGE_SIZE`
    /// - `HTTP_TIMEOUT_SECS`
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Returns an error message if the client id is missing or a numeric
    /// variable cannot be parsed.
    ///
    /// # Example
    ///
    /// ```
    /// let config = Config::from_lookup(|key| match key {
    ///     "SPOTIFY_API_AUTH_CLIENT_ID" => Some("abc123".to_string()),
    ///     _ => None,
    /// })?;
    /// assert_eq!(config.api_url, "https://api.spotify.com/v1");
    /// ```
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let client_id = get("SPOTIFY_API_AUTH_CLIENT_ID")
            .ok_or_else(|| "SPOTIFY_API_AUTH_CLIENT_ID must be set".to_string())?;

        let page_size = match get("EXPORT_PAGE_SIZE") {
            Some(raw) => {
                let size = raw
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| format!("EXPORT_PAGE_SIZE is not a number: {}", e))?;
                if size == 0 {
                    return Err("EXPORT_PAGE_SIZE must be greater than zero".to_string());
                }
                Some(size)
            }
            None => None,
        };

        let http_timeout = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map_err(|e| format!("HTTP_TIMEOUT_SECS is not a number: {}", e))?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            client_id,
            client_secret: get("SPOTIFY_API_AUTH_CLIENT_SECRET"),
            redirect_uri: get("SPOTIFY_API_REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            scope: get("SPOTIFY_API_AUTH_SCOPE").unwrap_or_else(|| DEFAULT_SCOPES.join(" ")),
            auth_url: get("SPOTIFY_API_AUTH_URL").unwrap_or_else(|| DEFAULT_AUTH_URL.to_string()),
            token_url: get("SPOTIFY_API_TOKEN_URL")
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            api_url: get("SPOTIFY_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            server_addr: get("SERVER_ADDRESS")
                .unwrap_or_else(|| DEFAULT_SERVER_ADDRESS.to_string()),
            token_cache_path: get("TOKEN_CACHE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| data_dir().join("cache/token.json")),
            csv_dir: PathBuf::from(
                get("EXPORT_CSV_DIR").unwrap_or_else(|| DEFAULT_CSV_DIR.to_string()),
            ),
            json_dir: PathBuf::from(
                get("EXPORT_JSON_DIR").unwrap_or_else(|| DEFAULT_JSON_DIR.to_string()),
            ),
            page_size,
            http_timeout: Duration::from_secs(http_timeout),
        })
    }
}
