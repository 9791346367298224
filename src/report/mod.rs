//! Report writers and the console summary.
//!
//! - [`delimited`] — comma-separated text.
//! - [`xlsx`] — single-sheet workbook with urgency row fills and fitted columns.
//! - [`json`] — array of objects keyed by column, in column order.
//! - [`terminal`] — colored run summary; respects `--verbose` / `--quiet`.

pub mod delimited;
pub mod json;
pub mod terminal;
pub mod xlsx;

use std::path::Path;

use anyhow::Result;

use crate::config::OutputFormat;
use crate::models::Report;

/// Write `report` to `path` in the requested format.
pub fn write(report: &Report, path: &Path, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Csv => delimited::write(&report.table, path),
        OutputFormat::Xlsx => xlsx::write(report, path),
        OutputFormat::Json => json::write(&report.table, path),
    }
}
