//! Spotify Library Export CLI Library
//!
//! This library provides functionality for exporting a user's personal Spotify
//! library (playlists, saved items, followed artists, top lists and recently
//! played tracks) to CSV and JSON files. It includes modules for API
//! communication, authentication, pagination, flattening and output writing.
//!
//! # Modules
//!
//! - `api` - HTTP API endpoints for the local callback server
//! - `cli` - Command-line interface implementations
//! - `config` - Configuration management and environment variables
//! - `export` - Dataset kinds, pagination, flattening and the output writer
//! - `management` - Token cache management
//! - `server` - Local HTTP server for OAuth callbacks
//! - `spotify` - Spotify Web API client implementation
//! - `types` - Data structures and type definitions
//! - `utils` - Utility functions and helpers
//!
//! # Example
//!
//! ```
//! use sporlexport::{config, cli};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), String> {
//!     config::load_env().await?;
//!     let config = config::Config::from_env()?;
//!     cli::export(config, Vec::new()).await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod export;
pub mod management;
pub mod server;
pub mod spotify;
pub mod types;
pub mod utils;

/// Prints a status line prefixed with a blue `o`.
///
/// Takes the same arguments as `println!`.
///
/// ```
/// info!("Hi, {}! Exporting your library...", name);
/// ```
#[macro_export]
macro_rules! info {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "o".blue().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a line prefixed with a green check mark, e.g. once a dataset has
/// been written.
#[macro_export]
macro_rules! success {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    println!("[{}] {}", "✓".green().bold(), std::format_args!($($arg)*));
  })
}

/// Prints a red `!` line to stderr and exits with status 1.
///
/// Reserved for conditions that end the whole run: no usable credential,
/// invalid configuration, output directories that cannot be created.
/// Failures of a single dataset go through [`warning!`] instead.
///
/// The expansion diverges, so it can stand in for a value:
///
/// ```
/// let config = match Config::from_env() {
///     Ok(config) => config,
///     Err(e) => error!("Invalid configuration: {}", e),
/// };
/// ```
#[macro_export]
macro_rules! error {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".red().bold(), std::format_args!($($arg)*));
    std::process::exit(1);
  })
}

/// Prints a yellow `!` line to stderr. The run continues.
#[macro_export]
macro_rules! warning {
  ($($arg:tt)*) => ({
    use colored::Colorize;
    eprintln!("[{}] {}", "!".yellow().bold(), std::format_args!($($arg)*));
  })
}
