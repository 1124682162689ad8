use indicatif::ProgressBar;

use super::{
    error::ExportError,
    flatten,
    kind::DatasetKind,
    paginate,
    source::LibrarySource,
    writer::{self, OutputDirs},
};
use crate::{success, types::ErrorEntry, warning};

/// What happened to one dataset kind.
#[derive(Debug, Clone)]
pub struct DatasetOutcome {
    pub kind: DatasetKind,
    /// Number of rows written; `None` when fetching failed and nothing was
    /// written.
    pub rows: Option<usize>,
    pub errors: Vec<ErrorEntry>,
}

impl DatasetOutcome {
    pub fn is_complete(&self) -> bool {
        self.rows.is_some() && self.errors.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExportReport {
    pub outcomes: Vec<DatasetOutcome>,
    /// Every error of the run in occurrence order, as written to `errors.csv`.
    pub errors: Vec<ErrorEntry>,
}

/// Runs Fetch → Flatten → Write for each dataset kind in turn.
pub struct Exporter<'a, S> {
    source: &'a S,
    outputs: &'a OutputDirs,
    page_size: Option<u32>,
    kinds: Vec<DatasetKind>,
    progress: ProgressBar,
}

impl<'a, S: LibrarySource> Exporter<'a, S> {
    pub fn new(source: &'a S, outputs: &'a OutputDirs) -> Self {
        Self {
            source,
            outputs,
            page_size: None,
            kinds: DatasetKind::ALL.to_vec(),
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_page_size(mut self, page_size: Option<u32>) -> Self {
        self.page_size = page_size;
        self
    }

    /// Restricts the run to `kinds`, exported in the given order.
    pub fn with_kinds(mut self, kinds: Vec<DatasetKind>) -> Self {
        self.kinds = kinds;
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Exports every configured kind and finally the error dataset.
    ///
    /// Per-kind failures never abort the run; they end up in the report and
    /// in `errors.csv`.
    ///
    /// # Errors
    ///
    /// Fails only if the output directories cannot be created or the error
    /// dataset cannot be written.
    pub async fn run(&self) -> Result<ExportReport, ExportError> {
        self.outputs.prepare().await?;

        let mut report = ExportReport::default();
        for kind in &self.kinds {
            let outcome = self.export_kind(*kind).await;
            report.errors.extend(outcome.errors.iter().cloned());
            report.outcomes.push(outcome);
        }

        writer::write_errors(self.outputs, &report.errors).await?;
        Ok(report)
    }

    /// Exports a single kind. A failed fetch discards whatever pages had
    /// arrived, writes nothing and removes the kind's files from an earlier
    /// run; the two output formats are written independently of each other.
    pub async fn export_kind(&self, kind: DatasetKind) -> DatasetOutcome {
        self.progress.set_message(format!("Exporting {}...", kind));

        let records =
            match paginate::fetch_dataset(self.source, kind, self.page_size, &self.progress).await
            {
                Ok(records) => records,
                Err(e) => {
                    self.progress
                        .suspend(|| warning!("Failed to fetch {}: {}", kind, e));
                    if let Err(stale) = writer::remove_outputs(self.outputs, kind.name()).await {
                        self.progress.suspend(|| {
                            warning!("Cannot remove previous {} files: {}", kind, stale)
                        });
                    }
                    return DatasetOutcome {
                        kind,
                        rows: None,
                        errors: vec![ErrorEntry::new(kind.name(), e)],
                    };
                }
            };

        let rows = flatten::flatten_all(kind, &records);
        let mut errors = Vec::new();

        let csv_path = self.outputs.csv_path(kind.name());
        if let Err(e) = writer::write_csv(&csv_path, kind.columns(), &rows).await {
            errors.push(ErrorEntry::new(
                kind.name(),
                format!("writing {}: {}", csv_path.display(), e),
            ));
        }

        let json_path = self.outputs.json_path(kind.name());
        if let Err(e) = writer::write_json(&json_path, &rows).await {
            errors.push(ErrorEntry::new(
                kind.name(),
                format!("writing {}: {}", json_path.display(), e),
            ));
        }

        self.progress.suspend(|| {
            if errors.is_empty() {
                success!("{}: {} rows", kind, rows.len());
            } else {
                warning!("{}: {} rows, {} write errors", kind, rows.len(), errors.len());
            }
        });

        DatasetOutcome {
            kind,
            rows: Some(rows.len()),
            errors,
        }
    }
}
