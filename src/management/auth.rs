use std::path::{Path, PathBuf};

use chrono::Utc;
use reqwest::Client;

use crate::{config::Config, spotify, types::Token, warning};

pub struct TokenManager {
    token: Token,
    path: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token, path: impl Into<PathBuf>) -> Self {
        TokenManager {
            token,
            path: path.into(),
        }
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self, String> {
        let path = path.as_ref();
        let content = async_fs::read_to_string(path)
            .await
            .map_err(|e| format!("{}: {}", path.display(), e))?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self {
            token,
            path: path.to_path_buf(),
        })
    }

    pub async fn persist(&self) -> Result<(), String> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(&self.path, json)
            .await
            .map_err(|e| e.to_string())
    }

    /// Returns an access token, refreshing and re-persisting it first when it
    /// is about to expire. A failed refresh keeps the stale token; the API
    /// will reject it and the caller sees an authorization error.
    pub async fn get_valid_token(&mut self, http: &Client, config: &Config) -> String {
        if self.is_expired() {
            match spotify::auth::refresh_token(http, config, &self.token.refresh_token).await {
                Ok(new_token) => {
                    self.token = new_token;
                    if let Err(e) = self.persist().await {
                        warning!("Failed to save refreshed token: {}", e);
                    }
                }
                Err(e) => warning!("Failed to refresh access token: {}", e),
            }
        }

        self.token.access_token.clone()
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now >= (self.token.obtained_at + self.token.expires_in).saturating_sub(240)
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
