use std::{collections::HashMap, path::PathBuf, time::Duration};

use sporlexport::config::{Config, DEFAULT_SCOPES};

fn config_from(vars: &[(&str, &str)]) -> Result<Config, String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn test_defaults() {
    let config = config_from(&[("SPOTIFY_API_AUTH_CLIENT_ID", "abc123")]).unwrap();

    assert_eq!(config.client_id, "abc123");
    assert_eq!(config.client_secret, None);
    assert_eq!(config.redirect_uri, "http://127.0.0.1:8888/callback");
    assert_eq!(config.server_addr, "127.0.0.1:8888");
    assert_eq!(config.api_url, "https://api.spotify.com/v1");
    assert_eq!(config.token_url, "https://accounts.spotify.com/api/token");
    assert_eq!(config.csv_dir, PathBuf::from("spotify csvs"));
    assert_eq!(config.json_dir, PathBuf::from("spotify jsons"));
    assert_eq!(config.page_size, None);
    assert_eq!(config.http_timeout, Duration::from_secs(30));
    assert!(config.token_cache_path.ends_with("sporlexport/cache/token.json"));
}

#[test]
fn test_default_scope_covers_every_dataset() {
    let config = config_from(&[("SPOTIFY_API_AUTH_CLIENT_ID", "abc123")]).unwrap();
    let scopes: Vec<&str> = config.scope.split(' ').collect();

    assert_eq!(scopes, DEFAULT_SCOPES);
    assert!(scopes.contains(&"user-top-read"));
    assert!(scopes.contains(&"user-read-recently-played"));
}

#[test]
fn test_missing_client_id() {
    let err = config_from(&[]).unwrap_err();
    assert!(err.contains("SPOTIFY_API_AUTH_CLIENT_ID"));

    // blank counts as unset
    let err = config_from(&[("SPOTIFY_API_AUTH_CLIENT_ID", "  ")]).unwrap_err();
    assert!(err.contains("SPOTIFY_API_AUTH_CLIENT_ID"));
}

#[test]
fn test_overrides() {
    let config = config_from(&[
        ("SPOTIFY_API_AUTH_CLIENT_ID", "abc123"),
        ("SPOTIFY_API_AUTH_CLIENT_SECRET", "s3cret"),
        ("SPOTIFY_API_URL", "http://localhost:9000/v1/"),
        ("EXPORT_CSV_DIR", "/tmp/out csv"),
        ("EXPORT_JSON_DIR", "/tmp/out json"),
        ("EXPORT_PAGE_SIZE", "20"),
        ("HTTP_TIMEOUT_SECS", "5"),
        ("TOKEN_CACHE_PATH", "/tmp/token.json"),
    ])
    .unwrap();

    assert_eq!(config.client_secret.as_deref(), Some("s3cret"));
    assert_eq!(config.api_url, "http://localhost:9000/v1");
    assert_eq!(config.csv_dir, PathBuf::from("/tmp/out csv"));
    assert_eq!(config.json_dir, PathBuf::from("/tmp/out json"));
    assert_eq!(config.page_size, Some(20));
    assert_eq!(config.http_timeout, Duration::from_secs(5));
    assert_eq!(config.token_cache_path, PathBuf::from("/tmp/token.json"));
}

#[test]
fn test_invalid_numbers() {
    let err = config_from(&[
        ("SPOTIFY_API_AUTH_CLIENT_ID", "abc123"),
        ("EXPORT_PAGE_SIZE", "fifty"),
    ])
    .unwrap_err();
    assert!(err.contains("EXPORT_PAGE_SIZE"));

    let err = config_from(&[
        ("SPOTIFY_API_AUTH_CLIENT_ID", "abc123"),
        ("EXPORT_PAGE_SIZE", "0"),
    ])
    .unwrap_err();
    assert!(err.contains("greater than zero"));

    let err = config_from(&[
        ("SPOTIFY_API_AUTH_CLIENT_ID", "abc123"),
        ("HTTP_TIMEOUT_SECS", "-1"),
    ])
    .unwrap_err();
    assert!(err.contains("HTTP_TIMEOUT_SECS"));
}
