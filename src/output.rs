//! Report rendering: human-readable lines and structured JSON.
//!
//! Every sized root produces a [`RootReport`]. When the `--json` flag is
//! passed the reports are serialized to stdout as a single [`JsonOutput`]
//! object, replacing all human-readable output.

use std::path::PathBuf;

use colored::Colorize;
use humansize::{BINARY, DECIMAL, FormatSizeOptions, format_size};
use serde::Serialize;

use crate::{error::SizeError, totals::Totals};

/// Outcome of sizing one root directory.
#[derive(Debug)]
pub struct RootReport {
    /// The root that was sized, as given by the user.
    pub path: PathBuf,

    /// Totals, or the error that stopped the run.
    pub outcome: Result<Totals, SizeError>,
}

impl RootReport {
    /// One human-readable line for this root.
    #[must_use]
    pub fn render(&self, binary: bool) -> String {
        let path = self.path.display().to_string();

        match &self.outcome {
            Ok(totals) => format!(
                "{:>12}  {:>10}  {}",
                format_size(totals.size_bytes(), units(binary)).bright_white(),
                format!("{} files", totals.count),
                path.bold()
            ),
            Err(err) => format!("{}  {}: {err}", "❌ failed".red(), path.bold()),
        }
    }
}

/// Select humansize's unit system.
const fn units(binary: bool) -> FormatSizeOptions {
    if binary { BINARY } else { DECIMAL }
}

/// Sum of the totals of every root that succeeded.
#[must_use]
pub fn succeeded_totals(reports: &[RootReport]) -> Totals {
    reports
        .iter()
        .filter_map(|r| r.outcome.as_ref().ok())
        .copied()
        .sum()
}

/// Number of roots that failed.
#[must_use]
pub fn failure_count(reports: &[RootReport]) -> usize {
    reports.iter().filter(|r| r.outcome.is_err()).count()
}

/// Human-readable grand total line, shown when more than one root was sized.
#[must_use]
pub fn render_summary(reports: &[RootReport], binary: bool) -> String {
    let totals = succeeded_totals(reports);
    let failed = failure_count(reports);

    let failed_note = if failed > 0 {
        format!(" ({failed} failed)").red().to_string()
    } else {
        String::new()
    };

    format!(
        "{} {} in {} files{failed_note}",
        "📊 Total:".bold(),
        format_size(totals.size_bytes(), units(binary)).bright_white(),
        totals.count
    )
}

/// Top-level JSON output emitted when `--json` is active.
#[derive(Serialize, Debug)]
pub struct JsonOutput {
    /// One entry per root, in the order given.
    pub roots: Vec<JsonRootEntry>,

    /// Aggregated summary over the roots that succeeded.
    pub summary: JsonSummary,
}

/// A single root entry in the JSON output.
#[derive(Serialize, Debug)]
pub struct JsonRootEntry {
    /// Path of the root directory.
    pub path: String,

    /// Total size in bytes, or `null` on failure.
    pub size: Option<i64>,

    /// Number of files, or `null` on failure.
    pub count: Option<i64>,

    /// Human-readable formatted size, or `null` on failure.
    pub size_formatted: Option<String>,

    /// Error message, or `null` on success.
    pub error: Option<String>,
}

/// Aggregated summary across all roots.
#[derive(Serialize, Debug)]
pub struct JsonSummary {
    /// Total size in bytes of the roots that succeeded.
    pub total_size: i64,

    /// Total file count of the roots that succeeded.
    pub total_count: i64,

    /// Human-readable formatted total size.
    pub total_size_formatted: String,

    /// Number of roots that failed.
    pub failed: usize,
}

impl JsonOutput {
    /// Build a `JsonOutput` from the reports of a run.
    #[must_use]
    pub fn from_reports(reports: &[RootReport], binary: bool) -> Self {
        let totals = succeeded_totals(reports);

        Self {
            roots: reports
                .iter()
                .map(|r| JsonRootEntry::from_report(r, binary))
                .collect(),
            summary: JsonSummary {
                total_size: totals.size,
                total_count: totals.count,
                total_size_formatted: format_size(totals.size_bytes(), units(binary)),
                failed: failure_count(reports),
            },
        }
    }
}

impl JsonRootEntry {
    /// Convert a `RootReport` into a `JsonRootEntry`.
    #[must_use]
    pub fn from_report(report: &RootReport, binary: bool) -> Self {
        let path = report.path.display().to_string();

        match &report.outcome {
            Ok(totals) => Self {
                path,
                size: Some(totals.size),
                count: Some(totals.count),
                size_formatted: Some(format_size(totals.size_bytes(), units(binary))),
                error: None,
            },
            Err(err) => Self {
                path,
                size: None,
                count: None,
                size_formatted: None,
                error: Some(err.to_string()),
            },
        }
    }
}
