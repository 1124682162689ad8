//! # Spotify Integration Module
//!
//! This module is the integration layer between sporlexport and the Spotify
//! Web API. It handles authentication, token exchange and all HTTP
//! communication needed to read a user's library page by page.
//!
//! ## Architecture
//!
//! ```text
//! CLI (export, auth)
//!          ↓
//! Export core (pagination, flattening, writers)
//!          ↓  LibrarySource
//! Spotify Integration Layer
//!     ├── Authentication (OAuth 2.0 PKCE)
//!     └── SpotifyClient (paged reads, retries, error mapping)
//!          ↓
//! HTTP Layer (reqwest, JSON)
//!          ↓
//! Spotify Web API
//! ```
//!
//! ## Core Modules
//!
//! ### Authentication Module
//!
//! [`auth`] - Implements the OAuth 2.0 PKCE flow:
//! - **Browser Integration**: Opens the authorization URL (account chooser forced)
//! - **Local Callback Server**: Temporary HTTP server receiving the code
//! - **Token Exchange**: Code + verifier for an access/refresh token pair
//! - **Token Refresh**: Used by the token manager shortly before expiry
//!
//! When a client secret is configured it is sent along with every token
//! request, which lets the same flow serve confidential clients.
//!
//! ### Client Module
//!
//! [`SpotifyClient`] implements [`LibrarySource`](crate::export::LibrarySource)
//! over these endpoints:
//!
//! - `GET /me` - Profile of the authenticated user
//! - `GET /me/playlists` - Playlists (offset)
//! - `GET /playlists/{id}/tracks` - Playlist items (offset, 100 per page)
//! - `GET /me/tracks` - Liked songs (offset)
//! - `GET /me/albums`, `/me/shows`, `/me/episodes` - Saved items (offset)
//! - `GET /me/following?type=artist` - Followed artists (`after` cursor)
//! - `GET /me/top/{artists,tracks}?time_range=` - Top lists (offset)
//! - `GET /me/player/recently-played` - Recently played (`before` cursor)
//!
//! ## Error Handling
//!
//! ### Rate Limiting
//! - **Retry-After**: 429 responses are retried after the advised delay (≤ 120 s)
//! - **Bad Gateway**: 502 responses are retried after ten seconds
//! - Both are capped at three retries per request
//!
//! ### Authentication Errors
//! - **401**: [`ApiError::Unauthorized`], the token is invalid or expired
//! - **403**: [`ApiError::Forbidden`], typically a scope the user did not grant
//!
//! Every other non-success status becomes [`ApiError::Status`] carrying
//! Spotify's error message.
//!
//! ## Required Scopes
//!
//! `user-library-read`, `playlist-read-private`, `playlist-read-collaborative`,
//! `user-follow-read`, `user-top-read`, `user-read-recently-played`.
//!
//! ## Usage Patterns
//!
//! ```rust
//! let token = spotify::auth::authorize(&config).await?;
//! let tokens = TokenManager::new(token, &config.token_cache_path);
//! let client = SpotifyClient::new(config.clone(), tokens)?;
//!
//! let me = client.current_user().await?;
//! let liked = export::fetch_all(&client, Endpoint::SavedTracks, None, &ProgressBar::hidden()).await?;
//! ```

pub mod auth;
mod client;

pub use client::{ApiError, SpotifyClient, parse_page};
