use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    config::Config,
    error,
    export::{DatasetKind, ERRORS_BASENAME, ExportReport, Exporter, OutputDirs},
    info,
    management::TokenManager,
    spotify::SpotifyClient,
    success,
    types::DatasetTableRow,
    warning,
};

use super::auth::authorize;

/// Exports the whole library of the authenticated user.
///
/// Uses the cached token when there is one and otherwise starts the
/// browser authorization first. Only an unusable credential or unwritable
/// output directories end the run early (exit code 1); failures of single
/// datasets are reported in `errors.csv` and the process still exits with 0.
///
/// A non-empty `only` restricts the run to those datasets, still exported
/// in the usual order.
pub async fn export(config: Config, only: Vec<DatasetKind>) {
    let token_mgr = match TokenManager::load(&config.token_cache_path).await {
        Ok(t) => t,
        Err(_) => {
            warning!("No cached token found. Starting authorization...");
            let token_mgr = authorize(&config).await;
            if let Err(e) = token_mgr.persist().await {
                warning!("Failed to save token to cache: {}", e);
            }
            token_mgr
        }
    };

    let client = match SpotifyClient::new(config.clone(), token_mgr) {
        Ok(client) => client,
        Err(e) => error!("Failed to create HTTP client: {}", e),
    };

    let me = match client.current_user().await {
        Ok(me) => me,
        Err(e) => error!(
            "Cannot read your profile, the token seems invalid. Please run sporlexport auth\n Error: {}",
            e
        ),
    };

    info!(
        "Hi, {}! Exporting your library...",
        me.display_name.as_deref().unwrap_or(&me.id)
    );

    let outputs = OutputDirs::new(&config.csv_dir, &config.json_dir);

    let pb = ProgressBar::new_spinner();
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }

    let mut exporter = Exporter::new(&client, &outputs)
        .with_page_size(config.page_size)
        .with_progress(pb.clone());
    if !only.is_empty() {
        exporter = exporter.with_kinds(selected_kinds(&only));
    }

    let report = match exporter.run().await {
        Ok(report) => report,
        Err(e) => {
            pb.finish_and_clear();
            error!("Export aborted: {}", e)
        }
    };
    pb.finish_and_clear();

    println!("{}", Table::new(summary_rows(&report)));

    if report.errors.is_empty() {
        success!(
            "Done. CSV files are in '{}', JSON files in '{}'.",
            outputs.csv_dir.display(),
            outputs.json_dir.display()
        );
    } else {
        warning!(
            "Done with {} errors, see {}.",
            report.errors.len(),
            outputs.csv_path(ERRORS_BASENAME).display()
        );
    }
}

/// The requested kinds in export order, each once.
pub fn selected_kinds(only: &[DatasetKind]) -> Vec<DatasetKind> {
    DatasetKind::ALL
        .into_iter()
        .filter(|kind| only.contains(kind))
        .collect()
}

pub fn summary_rows(report: &ExportReport) -> Vec<DatasetTableRow> {
    report
        .outcomes
        .iter()
        .map(|outcome| DatasetTableRow {
            dataset: outcome.kind.to_string(),
            rows: outcome
                .rows
                .map(|n| n.to_string())
                .unwrap_or_else(|| "-".to_string()),
            status: if outcome.is_complete() {
                "ok".to_string()
            } else if outcome.rows.is_none() {
                "failed".to_string()
            } else {
                format!("{} write errors", outcome.errors.len())
            },
        })
        .collect()
}
