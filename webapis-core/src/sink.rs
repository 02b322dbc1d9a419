//! CSV and YAML output.
//!
//! An empty record list is reported as [`SinkOutcome::Skipped`] with a warning
//! and no file is created.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{CoreError, CoreResult};
use crate::transform::TransformedRecord;

/// What a write produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SinkOutcome {
    Written { path: PathBuf, records: usize },
    /// Nothing to write; no file was created.
    Skipped,
}

impl SinkOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written { .. })
    }
}

/// How data cells are quoted. The header row is always quoted minimally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quoting {
    /// Only cells holding a comma, quote or line break.
    #[default]
    Minimal,
    /// Every cell that does not parse as a number, empty cells included.
    NonNumeric,
}

impl Quoting {
    fn style(self) -> csv::QuoteStyle {
        match self {
            Self::Minimal => csv::QuoteStyle::Necessary,
            Self::NonNumeric => csv::QuoteStyle::NonNumeric,
        }
    }
}

fn trim_trailing_empty(mut row: Vec<String>) -> Vec<String> {
    while row.last().is_some_and(String::is_empty) {
        row.pop();
    }
    row
}

/// Write a header row and one row per record to `writer`.
///
/// Trailing empty cells are dropped.
pub fn write_csv_to<W: Write>(
    writer: W,
    columns: &[&str],
    records: &[TransformedRecord],
    quoting: Quoting,
) -> CoreResult<()> {
    let mut header = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Necessary)
        .from_writer(writer);
    header.write_record(columns)?;
    let writer = header
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;

    let mut csv = csv::WriterBuilder::new()
        .quote_style(quoting.style())
        .flexible(true)
        .from_writer(writer);
    for record in records {
        csv.write_record(trim_trailing_empty(record.csv_row(columns)))?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write `records` as CSV to `path`.
pub fn write_csv(
    path: &Path,
    columns: &[&str],
    records: &[TransformedRecord],
    quoting: Quoting,
) -> CoreResult<SinkOutcome> {
    if records.is_empty() {
        log::warn!("No records to write, {} not created", path.display());
        return Ok(SinkOutcome::Skipped);
    }

    let file = File::create(path).map_err(|e| CoreError::io(path, e))?;
    write_csv_to(file, columns, records, quoting)?;
    log::info!("Wrote {} record(s) to {}", records.len(), path.display());

    Ok(SinkOutcome::Written {
        path: path.to_path_buf(),
        records: records.len(),
    })
}

/// Render `document` as block-style YAML with an explicit `---` start.
pub fn to_yaml<T: Serialize>(document: &T) -> CoreResult<String> {
    Ok(format!("---\n{}", serde_yaml::to_string(document)?))
}

/// Write `document` as YAML to `path`, unless it holds no records.
pub fn write_yaml<T: Serialize>(path: &Path, document: &T, records: usize) -> CoreResult<SinkOutcome> {
    if records == 0 {
        log::warn!("No records to write, {} not created", path.display());
        return Ok(SinkOutcome::Skipped);
    }

    let text = to_yaml(document)?;
    std::fs::write(path, text).map_err(|e| CoreError::io(path, e))?;
    log::info!("Wrote {records} record(s) to {}", path.display());

    Ok(SinkOutcome::Written {
        path: path.to_path_buf(),
        records,
    })
}
