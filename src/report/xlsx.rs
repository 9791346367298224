use std::path::Path;

use anyhow::{Context, Result};
use chrono::Datelike;
use rust_xlsxwriter::{DocProperties, ExcelDateTime, Format, FormatPattern, Workbook, Worksheet};

use crate::models::{Report, UrgencyBand};

const SHEET_NAME: &str = "Renewals";

/// Row fills for the two urgency bands (Excel's "bad" and "neutral" palette).
const SOON_FILL: u32 = 0xFFC7CE;
const UPCOMING_FILL: u32 = 0xFFEB9C;

/// Fitted columns never grow past this many characters.
const MAX_COLUMN_WIDTH: usize = 50;
const COLUMN_PADDING: usize = 2;

/// Write the report as a single-sheet workbook.
///
/// Every cell of a banded row gets the band's fill, the header row is bold
/// and frozen, and each column is sized to its longest value. The document
/// creation time is pinned to the report date so reruns are byte-identical.
pub fn write(report: &Report, path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let created = ExcelDateTime::from_ymd(
        report.as_of.year() as u16,
        report.as_of.month() as u8,
        report.as_of.day() as u8,
    )?;
    workbook.set_properties(&DocProperties::new().set_creation_datetime(&created));

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    fill_sheet(sheet, report)?;

    workbook
        .save(path)
        .with_context(|| format!("Failed to write workbook to {}", path.display()))?;
    Ok(())
}

fn fill_sheet(sheet: &mut Worksheet, report: &Report) -> Result<()> {
    let header = Format::new().set_bold();
    let soon = band_format(SOON_FILL);
    let upcoming = band_format(UPCOMING_FILL);

    let table = &report.table;
    for (col, name) in table.columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, name, &header)?;
    }
    sheet.set_freeze_panes(1, 0)?;

    for (idx, row) in table.rows.iter().enumerate() {
        let excel_row = idx as u32 + 1;
        let format = match band_fill(report.bands.get(idx).copied().flatten()) {
            Some(SOON_FILL) => Some(&soon),
            Some(_) => Some(&upcoming),
            None => None,
        };

        for (col, value) in table.row_cells(row).enumerate() {
            let col = col as u16;
            match (format, value.is_empty()) {
                (Some(fmt), true) => {
                    sheet.write_blank(excel_row, col, fmt)?;
                }
                (Some(fmt), false) => {
                    sheet.write_string_with_format(excel_row, col, value, fmt)?;
                }
                (None, true) => {}
                (None, false) => {
                    sheet.write_string(excel_row, col, value)?;
                }
            }
        }
    }

    for (col, width) in column_widths(report).into_iter().enumerate() {
        sheet.set_column_width(col as u16, width as f64)?;
    }

    Ok(())
}

/// Row fill color for a band; unbanded rows are left unstyled.
pub fn band_fill(band: Option<UrgencyBand>) -> Option<u32> {
    match band? {
        UrgencyBand::Soon => Some(SOON_FILL),
        UrgencyBand::Upcoming => Some(UPCOMING_FILL),
    }
}

fn band_format(color: u32) -> Format {
    Format::new()
        .set_background_color(color)
        .set_pattern(FormatPattern::Solid)
}

/// Width per column: the longest of the header and every cell, plus padding,
/// capped at [`MAX_COLUMN_WIDTH`].
pub fn column_widths(report: &Report) -> Vec<usize> {
    let table = &report.table;
    table
        .columns
        .iter()
        .map(|column| {
            let longest = table
                .rows
                .iter()
                .map(|row| row.cell(column).chars().count())
                .chain(std::iter::once(column.chars().count()))
                .max()
                .unwrap_or(0);
            (longest + COLUMN_PADDING).min(MAX_COLUMN_WIDTH)
        })
        .collect()
}
