use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use super::{error::ExportError, flatten::Row};
use crate::{types::ErrorEntry, utils};

pub const ERRORS_BASENAME: &str = "errors";
const ERROR_COLUMNS: &[&str] = &["dataset", "error"];

/// The two sibling output directories of a run.
#[derive(Debug, Clone)]
pub struct OutputDirs {
    pub csv_dir: PathBuf,
    pub json_dir: PathBuf,
}

impl OutputDirs {
    pub fn new(csv_dir: impl Into<PathBuf>, json_dir: impl Into<PathBuf>) -> Self {
        Self {
            csv_dir: csv_dir.into(),
            json_dir: json_dir.into(),
        }
    }

    /// Creates both directories. Existing directories and their files are
    /// left alone.
    pub async fn prepare(&self) -> Result<(), ExportError> {
        async_fs::create_dir_all(&self.csv_dir).await?;
        async_fs::create_dir_all(&self.json_dir).await?;
        Ok(())
    }

    pub fn csv_path(&self, basename: &str) -> PathBuf {
        self.csv_dir.join(format!("{}.csv", basename))
    }

    pub fn json_path(&self, basename: &str) -> PathBuf {
        self.json_dir.join(format!("{}.json", basename))
    }
}

/// Encodes rows as CSV with a header line, even when there are no rows.
///
/// Cells are taken in `columns` order; fields holding the delimiter, a quote
/// or a line break are quoted and embedded quotes doubled.
pub fn render_csv(columns: &[&str], rows: &[Row]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(columns)?;

    for row in rows {
        writer.write_record(
            columns
                .iter()
                .map(|column| utils::cell_text(row.get(*column).unwrap_or(&Value::Null))),
        )?;
    }

    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

pub fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, ExportError> {
    Ok(serde_json::to_vec_pretty(value)?)
}

/// Writes `<kind>.csv`, replacing any previous file.
pub async fn write_csv(path: &Path, columns: &[&str], rows: &[Row]) -> Result<(), ExportError> {
    let data = render_csv(columns, rows)?;
    async_fs::write(path, data).await?;
    Ok(())
}

/// Writes `<kind>.json` as an array of rows, replacing any previous file.
pub async fn write_json(path: &Path, rows: &[Row]) -> Result<(), ExportError> {
    let data = render_json(rows)?;
    async_fs::write(path, data).await?;
    Ok(())
}

/// Deletes `<basename>.csv` and `<basename>.json` left by an earlier run.
/// Files that do not exist are fine.
pub async fn remove_outputs(outputs: &OutputDirs, basename: &str) -> Result<(), ExportError> {
    for path in [outputs.csv_path(basename), outputs.json_path(basename)] {
        match async_fs::remove_file(&path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(ExportError::Io(e)),
        }
    }
    Ok(())
}

/// Writes `errors.csv` (header only when the run was clean) and
/// `errors.json`.
pub async fn write_errors(outputs: &OutputDirs, errors: &[ErrorEntry]) -> Result<(), ExportError> {
    let rows: Vec<Row> = errors
        .iter()
        .map(|entry| {
            let mut row = Row::new();
            row.insert("dataset".to_string(), Value::String(entry.dataset.clone()));
            row.insert("error".to_string(), Value::String(entry.error.clone()));
            row
        })
        .collect();

    write_csv(&outputs.csv_path(ERRORS_BASENAME), ERROR_COLUMNS, &rows).await?;
    async_fs::write(outputs.json_path(ERRORS_BASENAME), render_json(errors)?).await?;
    Ok(())
}
