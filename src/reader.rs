use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use csv::ReaderBuilder;
use tracing::debug;

use crate::error::ReportError;
use crate::models::{Row, Table};

/// Read a comma-separated file into a [`Table`] of verbatim string cells.
///
/// A leading byte-order mark is dropped and column names are trimmed. When
/// `skip_preamble` is set the first line is discarded before the header is
/// taken. Nothing is coerced: `NA`, `null` and empty cells stay text.
pub fn read_table(path: &Path, skip_preamble: bool) -> Result<Table> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let text = String::from_utf8(bytes)
        .with_context(|| format!("{} is not valid UTF-8", path.display()))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

    parse_table(text, skip_preamble).with_context(|| format!("Failed to parse {}", path.display()))
}

fn parse_table(text: &str, skip_preamble: bool) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut records = rdr.records();
    if skip_preamble {
        if let Some(preamble) = records.next() {
            preamble?;
        }
    }

    let columns = match records.next() {
        Some(header) => unique_columns(header?.iter().map(str::trim)),
        None => return Ok(Table::default()),
    };

    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        let mut row = Row::new();
        for (idx, name) in columns.iter().enumerate() {
            row.set(name, record.get(idx).unwrap_or(""));
        }
        rows.push(row);
    }

    Ok(Table { columns, rows })
}

/// Suffix repeated header names with `.1`, `.2`, ... so row keys stay unique.
fn unique_columns<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut columns = Vec::new();
    for name in names {
        let mut candidate = name.to_string();
        let mut n = 1;
        while seen.contains(&candidate) {
            candidate = format!("{}.{}", name, n);
            n += 1;
        }
        seen.insert(candidate.clone());
        columns.push(candidate);
    }
    columns
}

/// Read the license export, which may or may not carry a decorative line
/// above the real header.
///
/// The file is first read skipping one line; if that does not yield every
/// `required` column it is re-read from the top.
pub fn read_license_table(path: &Path, required: &[&str]) -> Result<Table> {
    let skipped = read_table(path, true)?;
    if missing_columns(&skipped, required).is_empty() {
        debug!("{}: skipped preamble line", path.display());
        return Ok(skipped);
    }

    debug!("{}: header found on first line", path.display());
    let table = read_table(path, false)?;
    require_columns(&table, required, &display_name(path))?;
    Ok(table)
}

/// Required columns absent from `table`, sorted by name.
pub fn missing_columns(table: &Table, required: &[&str]) -> Vec<String> {
    let mut missing: Vec<String> = required
        .iter()
        .filter(|c| !table.has_column(c))
        .map(|c| c.to_string())
        .collect();
    missing.sort();
    missing
}

/// Fail with [`ReportError::MissingColumns`] unless every column is present.
pub fn require_columns(table: &Table, required: &[&str], source_name: &str) -> Result<()> {
    let missing = missing_columns(table, required);
    if missing.is_empty() {
        return Ok(());
    }
    Err(ReportError::MissingColumns {
        source_name: source_name.to_string(),
        missing,
    }
    .into())
}

pub fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const LICENSE_REQUIRED: [&str; 4] = ["Contract ID", "Product", "Tier", "BU"];

    fn write_temp(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    #[test]
    fn test_bom_and_header_whitespace() {
        let f = write_temp("\u{feff} ID , Name\nc-1,NA\n");
        let table = read_table(f.path(), false).unwrap();
        assert_eq!(table.columns, vec!["ID", "Name"]);
        assert_eq!(table.rows[0].cell("Name"), "NA");
    }

    #[test]
    fn test_short_records_are_padded() {
        let f = write_temp("A,B,C\n1\n");
        let table = read_table(f.path(), false).unwrap();
        assert_eq!(table.rows[0].cell("C"), "");
        assert!(table.rows[0].contains("C"));
    }

    #[test]
    fn test_duplicate_headers_are_suffixed() {
        let f = write_temp("A,A,A\n1,2,3\n");
        let table = read_table(f.path(), false).unwrap();
        assert_eq!(table.columns, vec!["A", "A.1", "A.2"]);
        assert_eq!(table.rows[0].cell("A.2"), "3");
    }

    #[test]
    fn test_license_with_preamble() {
        let f = write_temp(
            "Contract,,,,License\nContract ID,Product,Tier,BU,Expiration\nc-1,Inspect,Enterprise,Asia,2026-01-01\n",
        );
        let table = read_license_table(f.path(), &LICENSE_REQUIRED).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].cell("Contract ID"), "c-1");
    }

    #[test]
    fn test_license_without_preamble() {
        let f = write_temp(
            "Contract ID,Product,Tier,BU,Expiration\nc-1,Inspect,Enterprise,Asia,2026-01-01\nc-2,Inspect,Enterprise,Asia,2026-01-02\n",
        );
        let table = read_license_table(f.path(), &LICENSE_REQUIRED).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].cell("Contract ID"), "c-1");
    }

    #[test]
    fn test_license_missing_columns() {
        let f = write_temp("Contract ID,Product\nc-1,Inspect\n");
        let err = read_license_table(f.path(), &LICENSE_REQUIRED).unwrap_err();
        match err.downcast_ref::<ReportError>() {
            Some(ReportError::MissingColumns { missing, .. }) => {
                assert_eq!(missing, &vec!["BU".to_string(), "Tier".to_string()]);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_empty_file() {
        let f = write_temp("");
        let table = read_table(f.path(), false).unwrap();
        assert!(table.columns.is_empty());
        assert!(table.is_empty());
    }
}
