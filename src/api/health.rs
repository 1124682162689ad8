use std::sync::Arc;

use axum::{Extension, response::Json};
use serde_json::{Value, json};
use tokio::sync::Mutex;

use crate::types::PkceToken;

/// Reports whether the callback has already delivered a token.
pub async fn health(
    Extension(shared_state): Extension<Arc<Mutex<Option<PkceToken>>>>,
) -> Json<Value> {
    let authorized = shared_state
        .lock()
        .await
        .as_ref()
        .is_some_and(|pkce| pkce.token.is_some());

    Json(json!({
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "authorized": authorized,
    }))
}
