//! Batch reporting.
//!
//! When `--json` is enabled, progress and per-item status are emitted as
//! JSON lines on stdout so a surrounding tool can follow along; otherwise
//! the run ends with a styled summary table.

use prettytable::{format, Cell, Row, Table};
use serde::{Deserialize, Serialize};

use crate::processing::{ItemReport, ItemStatus};
use crate::utils::format_duration;

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonMessage {
    /// Progress update
    Progress {
        current: usize,
        total: usize,
        message: String,
    },
    /// Item converted successfully
    FileCompleted {
        input_path: String,
        output_path: String,
        output_bytes: u64,
        description: Option<String>,
        tags: Vec<String>,
    },
    /// Item failed; the batch keeps going
    FileFailed { input_path: String, error: String },
    /// End-of-batch summary
    Summary {
        total_files: usize,
        converted: usize,
        failed: usize,
        duration_secs: f64,
    },
}

impl JsonMessage {
    /// Emit JSON message to stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    /// Build the per-item message for a finished report.
    pub fn for_report(report: &ItemReport) -> JsonMessage {
        match &report.status {
            ItemStatus::Converted {
                output_path,
                output_bytes,
                annotation,
            } => JsonMessage::FileCompleted {
                input_path: report.input_path.display().to_string(),
                output_path: output_path.display().to_string(),
                output_bytes: *output_bytes,
                description: annotation.as_ref().map(|a| a.description.clone()),
                tags: annotation
                    .as_ref()
                    .map(|a| a.tags.clone())
                    .unwrap_or_default(),
            },
            ItemStatus::Failed { error } => JsonMessage::FileFailed {
                input_path: report.input_path.display().to_string(),
                error: error.clone(),
            },
        }
    }
}

/// Print the end-of-batch summary table.
pub fn print_summary_table(reports: &[ItemReport]) {
    if reports.is_empty() {
        return;
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);

    table.add_row(Row::new(vec![
        Cell::new("Input"),
        Cell::new("Status"),
        Cell::new("Output"),
        Cell::new("Size"),
        Cell::new("Time"),
    ]));

    for report in reports {
        let input = report
            .input_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("?");

        match &report.status {
            ItemStatus::Converted {
                output_path,
                output_bytes,
                ..
            } => {
                let output = output_path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("?");
                table.add_row(Row::new(vec![
                    Cell::new(input),
                    Cell::new("ok"),
                    Cell::new(output),
                    Cell::new(&format_bytes(*output_bytes)),
                    Cell::new(&format_duration(report.elapsed)),
                ]));
            }
            ItemStatus::Failed { error } => {
                table.add_row(Row::new(vec![
                    Cell::new(input),
                    Cell::new("FAILED"),
                    Cell::new(error),
                    Cell::new("-"),
                    Cell::new(&format_duration(report.elapsed)),
                ]));
            }
        }
    }

    table.printstd();
}

/// Human-readable byte count.
fn format_bytes(bytes: u64) -> String {
    if bytes >= 1024 * 1024 {
        format!("{:.1} MiB", bytes as f64 / (1024.0 * 1024.0))
    } else if bytes >= 1024 {
        format!("{:.1} KiB", bytes as f64 / 1024.0)
    } else {
        format!("{} B", bytes)
    }
}
