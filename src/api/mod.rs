//! # API Module
//!
//! HTTP endpoints served by the temporary local server that runs while the
//! user authorizes sporlexport in the browser.
//!
//! ## Endpoints
//!
//! - [`callback`] - Receives the redirect from Spotify's authorization server,
//!   exchanges the authorization code (plus the PKCE verifier) for a token and
//!   stores it in the shared state the auth flow is polling.
//! - [`health`] - Returns status and version, handy to check that the
//!   configured `SERVER_ADDRESS` is reachable.
//!
//! ## Usage Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get};
//! use sporlexport::api::{callback, health};
//!
//! let app = Router::new()
//!     .route("/callback", get(callback))
//!     .route("/health", get(health));
//! ```

mod callback;
mod health;

pub use callback::callback;
pub use health::health;
