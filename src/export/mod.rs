//! # Export Module
//!
//! The library exporter: turns the user's Spotify library into one CSV and
//! one JSON file per dataset kind.
//!
//! ## Pipeline
//!
//! ```text
//! DatasetKind ──> fetch_dataset (walk pages) ──> flatten (one row per record)
//!                                                     │
//!                              <csv_dir>/<kind>.csv <──┴──> <json_dir>/<kind>.json
//! ```
//!
//! Kinds are processed one after another in [`DatasetKind::ALL`] order. A
//! failing kind is recorded as an [`ErrorEntry`](crate::types::ErrorEntry)
//! and the run moves on; once every kind is done the collected entries are
//! written to `errors.csv` and `errors.json`.
//!
//! ## Seams
//!
//! - [`LibrarySource`] - the only upstream contract the exporter relies on;
//!   [`SpotifyClient`](crate::spotify::SpotifyClient) implements it over HTTP
//!   and tests implement it in memory.
//! - [`OutputDirs`] - where files land.
//!
//! ## Policies
//!
//! - A fetch failure on any page discards the kind entirely: no partial files,
//!   and files of that kind from an earlier run are removed.
//! - CSV and JSON writes are independent; each failing write is one entry.
//! - The JSON files hold the flattened rows, with `null` for missing values.

mod error;
mod flatten;
mod kind;
mod paginate;
mod runner;
mod source;
mod writer;

pub use error::ExportError;
pub use flatten::{Row, flatten, flatten_all};
pub use kind::{DatasetKind, TimeRange};
pub use paginate::{fetch_all, fetch_dataset};
pub use runner::{DatasetOutcome, ExportReport, Exporter};
pub use source::{Endpoint, LibrarySource, PageRequest};
pub use writer::{
    ERRORS_BASENAME, OutputDirs, remove_outputs, render_csv, render_json, write_csv, write_errors,
    write_json,
};
