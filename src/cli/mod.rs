//! # CLI Module
//!
//! User-facing command implementations. Each command takes the already
//! loaded [`Config`](crate::config::Config), drives the lower layers and
//! takes care of progress output and fatal error reporting.
//!
//! ## Commands
//!
//! - [`export`] - Exports the full library to CSV and JSON (default command)
//! - [`auth`] - Runs the OAuth 2.0 PKCE flow and caches the token
//!
//! ## Layering
//!
//! ```text
//! CLI Layer (User Interface)
//!     ↓
//! Export Layer (pagination, flattening, writers)
//!     ↓
//! Spotify Layer (auth, HTTP client)
//! ```
//!
//! ## Usage Patterns
//!
//! ```bash
//! sporlexport            # export everything, authorizing first if needed
//! sporlexport export --only liked_songs --only playlists
//! sporlexport auth       # (re-)authorize, e.g. to switch accounts
//! ```
//!
//! ## Output
//!
//! Progress is shown with a spinner; each dataset reports its row count and
//! the run ends with a summary table. Fatal problems print an error and exit
//! with status 1, dataset errors are only reported.

mod auth;
mod export;

pub use auth::auth;
pub use export::export;
pub use export::{selected_kinds, summary_rows};
