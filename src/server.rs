use axum::{Extension, Router, routing::get};
use reqwest::Client;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{api, config::Config, types::PkceToken, warning};

/// Binds the OAuth callback server and serves it on a background task.
///
/// The listener is bound before spawning; an occupied port is returned as an
/// error. `http` is the client the callback uses for the code exchange.
pub async fn start_api_server(
    state: Arc<Mutex<Option<PkceToken>>>,
    config: Arc<Config>,
    http: Client,
) -> Result<JoinHandle<()>, String> {
    let addr = SocketAddr::from_str(&config.server_addr)
        .map_err(|e| format!("Failed to parse server address {}: {}", config.server_addr, e))?;

    let app = Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state))
        .layer(Extension(config))
        .layer(Extension(http));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Failed to bind callback server on {}: {}", addr, e))?;

    Ok(tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            warning!("Callback server stopped: {}", e);
        }
    }))
}
