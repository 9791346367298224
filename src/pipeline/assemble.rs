use chrono::NaiveDate;

use crate::config::UrgencyConfig;
use crate::models::{
    EnrichedRecord, Report, Row, Table, UrgencyBand, CONTRACT_ID, CUSTOMER_NAME, EXPIRATION,
    NA_SENTINEL,
};
use crate::pipeline::dates::parse_date;

/// Turn enriched records into the final report: sorted by expiration,
/// identifier and customer columns first, each row banded against `today`.
pub fn assemble(records: Vec<EnrichedRecord>, urgency: &UrgencyConfig, today: NaiveDate) -> Report {
    let rows = sort_by_expiration(records)
        .into_iter()
        .map(|record| {
            let mut row = record.row;
            row.set(CUSTOMER_NAME, record.customer.to_string());
            row
        })
        .collect();

    let table = reorder_columns(Table::from_rows(rows));
    let bands = table
        .rows
        .iter()
        .map(|row| classify(parse_date(row.cell(EXPIRATION)), urgency, today))
        .collect();

    Report {
        table,
        bands,
        as_of: today,
    }
}

/// Stable ascending sort on the parsed `Expiration` date; rows without a
/// usable date keep their relative order at the end.
pub fn sort_by_expiration(mut records: Vec<EnrichedRecord>) -> Vec<EnrichedRecord> {
    records.sort_by_cached_key(|record| match parse_date(record.row.cell(EXPIRATION)) {
        Some(date) => (false, Some(date)),
        None => (true, None),
    });
    records
}

/// Put the contract identifier first and `Customer name` second, keeping the
/// remaining columns in order. A missing `Customer name` column is added with
/// the `#NA` sentinel on every row.
pub fn reorder_columns(mut table: Table) -> Table {
    if !table.has_column(CUSTOMER_NAME) {
        for row in &mut table.rows {
            row.set(CUSTOMER_NAME, NA_SENTINEL);
        }
        table.columns.push(CUSTOMER_NAME.to_string());
    }

    let lead = if table.has_column(CONTRACT_ID) {
        Some(CONTRACT_ID.to_string())
    } else {
        table.columns.iter().find(|c| *c != CUSTOMER_NAME).cloned()
    };

    let mut columns: Vec<String> = lead.iter().cloned().collect();
    columns.push(CUSTOMER_NAME.to_string());
    columns.extend(
        table
            .columns
            .iter()
            .filter(|c| Some(*c) != lead.as_ref() && *c != CUSTOMER_NAME)
            .cloned(),
    );

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let mut ordered = Row::new();
            for column in &columns {
                ordered.set(column, row.cell(column));
            }
            ordered
        })
        .collect();

    Table { columns, rows }
}

/// Band for an expiration date, counted in whole calendar days from `today`.
pub fn classify(
    expiration: Option<NaiveDate>,
    urgency: &UrgencyConfig,
    today: NaiveDate,
) -> Option<UrgencyBand> {
    let days = (expiration? - today).num_days();
    if (0..=urgency.soon_days).contains(&days) {
        Some(UrgencyBand::Soon)
    } else if days > urgency.soon_days && days <= urgency.upcoming_days {
        Some(UrgencyBand::Upcoming)
    } else {
        None
    }
}
