use std::path::Path;

use anyhow::{Context, Result};
use csv::{QuoteStyle, WriterBuilder};

use crate::models::Table;

/// Write the table as comma-separated UTF-8 text with a header row.
pub fn write(table: &Table, path: &Path) -> Result<()> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Necessary)
        .from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;

    wtr.write_record(&table.columns)?;
    for row in &table.rows {
        wtr.write_record(table.row_cells(row))?;
    }
    wtr.flush()
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
