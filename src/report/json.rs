use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use crate::models::Table;

/// Write the rows as a pretty-printed JSON array; object keys keep column order.
pub fn write(table: &Table, path: &Path) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, &table.rows)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}
