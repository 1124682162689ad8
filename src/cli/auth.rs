use crate::{config::Config, error, management::TokenManager, spotify, success};

pub async fn auth(config: &Config) {
    let token_mgr = authorize(config).await;
    if let Err(e) = token_mgr.persist().await {
        error!("Failed to save token to cache: {}", e);
    }

    success!(
        "Authentication successful! Token cached at {}",
        config.token_cache_path.display()
    );
}

/// Runs the browser authorization flow; exits the process if it fails.
pub(crate) async fn authorize(config: &Config) -> TokenManager {
    match spotify::auth::authorize(config).await {
        Ok(token) => TokenManager::new(token, &config.token_cache_path),
        Err(e) => error!("{}", e),
    }
}
