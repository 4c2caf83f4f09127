//! CSV export of the ticket roster.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;

use crate::roster::ExportFilter;
use crate::types::Ticket;

pub const CSV_HEADER: &str = "ID,Key,Summary,Assignee,Status,Blocked,Age (Days),Points";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Quote a field, doubling embedded quotes.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn csv_row(ticket: &Ticket) -> String {
    [
        ticket.id.clone(),
        ticket.key.clone(),
        quote(&ticket.summary),
        ticket.assignee.clone(),
        ticket.status.to_string(),
        if ticket.is_blocked { "TRUE" } else { "FALSE" }.to_string(),
        ticket.age_days.to_string(),
        ticket.points.to_string(),
    ]
    .join(",")
}

/// Render the tickets matching `filter` as a CSV document.
///
/// Only the summary column is quoted; rows are separated by `\n` with no
/// trailing newline.
pub fn render_csv(tickets: &[Ticket], filter: ExportFilter) -> String {
    std::iter::once(CSV_HEADER.to_string())
        .chain(
            tickets
                .iter()
                .filter(|t| filter.matches(t))
                .map(csv_row),
        )
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("stratos_telemetry_{}.csv", date.format("%Y-%m-%d"))
}

/// Write the export into `dir` and return the file path.
pub fn write_export(
    dir: &Path,
    tickets: &[Ticket],
    filter: ExportFilter,
    date: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(export_file_name(date));
    std::fs::write(&path, render_csv(tickets, filter)).map_err(|source| ExportError::Write {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), filter = %filter, "telemetry exported");
    Ok(path)
}
