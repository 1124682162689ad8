//! Build script for the Spotify Library Exporter.
//!
//! Copies the `.env.example` configuration template to the user's local data
//! directory, next to where the application looks for its `.env` file, so a
//! fresh install has a ready-to-edit template in the expected location.

use std::{env, fs, path::PathBuf};

/// Copies `.env.example` from the crate root to the local data directory.
///
/// # Destination Location
///
/// - Linux: `~/.local/share/sporlexport/.env.example`
/// - macOS: `~/Library/Application Support/sporlexport/.env.example`
/// - Windows: `%LOCALAPPDATA%/sporlexport/.env.example`
///
/// A missing template only produces a cargo warning; directory or copy
/// failures fail the build.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("cargo:rerun-if-changed=.env.example");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let env_example_path = manifest_dir.join(".env.example");

    let mut out_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    out_dir.push("sporlexport");
    fs::create_dir_all(&out_dir)?;

    if env_example_path.is_file() {
        fs::copy(&env_example_path, out_dir.join(".env.example"))?;
    } else {
        println!(
            "cargo:warning=.env.example not found at {}",
            env_example_path.display()
        );
    }

    Ok(())
}
