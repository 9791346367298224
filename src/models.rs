use std::collections::HashMap;

use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Business key shared by the license, contract and finance sources.
pub const CONTRACT_ID: &str = "Contract ID";
pub const CUSTOMER_NAME: &str = "Customer name";
pub const EXPIRATION: &str = "Expiration";

/// Output projection of [`CustomerName::NotFound`].
pub const NA_SENTINEL: &str = "#NA";

/// Attribute columns copied from the contract source, in output order.
pub const CONTRACT_FIELDS: [&str; 7] = [
    "Country Sold To",
    "User Type",
    "Remarks",
    "BP",
    "First Expiration Date",
    "License Count",
    "Language",
];

/// One record: column name → cell text, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Cell text, or `""` when the column is absent.
    pub fn cell(&self, column: &str) -> &str {
        self.get(column).unwrap_or("")
    }

    pub fn contains(&self, column: &str) -> bool {
        self.fields.iter().any(|(name, _)| name == column)
    }

    /// Overwrite the column in place, or append it.
    pub fn set(&mut self, column: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(name, _)| name == column) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((column.to_string(), value)),
        }
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Rows sharing one ordered column list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Build a table whose columns are the union of the rows' columns in
    /// first-seen order.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for row in &rows {
            for name in row.columns() {
                if !columns.iter().any(|c| c == name) {
                    columns.push(name.to_string());
                }
            }
        }
        Table { columns, rows }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cells of one row in table column order.
    pub fn row_cells<'a>(&'a self, row: &'a Row) -> impl Iterator<Item = &'a str> {
        self.columns.iter().map(move |c| row.cell(c))
    }
}

/// Attributes carried over from the contract source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractAttributes {
    pub country_sold_to: String,
    pub user_type: String,
    pub remarks: String,
    pub bp: String,
    pub first_expiration_date: String,
    pub license_count: String,
    pub language: String,
}

impl ContractAttributes {
    /// Read the attributes from a contract row, trimming each value.
    pub fn from_row(row: &Row) -> Self {
        let take = |column: &str| row.cell(column).trim().to_string();
        ContractAttributes {
            country_sold_to: take(CONTRACT_FIELDS[0]),
            user_type: take(CONTRACT_FIELDS[1]),
            remarks: take(CONTRACT_FIELDS[2]),
            bp: take(CONTRACT_FIELDS[3]),
            first_expiration_date: take(CONTRACT_FIELDS[4]),
            license_count: take(CONTRACT_FIELDS[5]),
            language: take(CONTRACT_FIELDS[6]),
        }
    }

    /// `(column, value)` pairs in [`CONTRACT_FIELDS`] order.
    pub fn fields(&self) -> [(&'static str, &str); 7] {
        [
            (CONTRACT_FIELDS[0], self.country_sold_to.as_str()),
            (CONTRACT_FIELDS[1], self.user_type.as_str()),
            (CONTRACT_FIELDS[2], self.remarks.as_str()),
            (CONTRACT_FIELDS[3], self.bp.as_str()),
            (CONTRACT_FIELDS[4], self.first_expiration_date.as_str()),
            (CONTRACT_FIELDS[5], self.license_count.as_str()),
            (CONTRACT_FIELDS[6], self.language.as_str()),
        ]
    }
}

/// Contract identifier → attributes. First occurrence of an identifier wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContractLookup {
    pub(crate) entries: HashMap<String, ContractAttributes>,
}

impl ContractLookup {
    pub fn get(&self, contract_id: &str) -> Option<&ContractAttributes> {
        self.entries.get(contract_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Customer name resolved from the finance source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerName {
    Found(String),
    NotFound,
}

impl CustomerName {
    pub fn is_found(&self) -> bool {
        matches!(self, CustomerName::Found(_))
    }
}

impl std::fmt::Display for CustomerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CustomerName::Found(name) => write!(f, "{}", name),
            CustomerName::NotFound => write!(f, "{}", NA_SENTINEL),
        }
    }
}

/// Contract identifier → customer name. First non-empty name wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FinanceLookup {
    pub(crate) entries: HashMap<String, CustomerName>,
}

impl FinanceLookup {
    /// Resolved name for an identifier; [`CustomerName::NotFound`] on miss.
    pub fn customer_name(&self, contract_id: &str) -> CustomerName {
        self.entries
            .get(contract_id)
            .cloned()
            .unwrap_or(CustomerName::NotFound)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A filtered license row with contract attributes merged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedRecord {
    pub row: Row,
    pub customer: CustomerName,
}

/// How close a renewal is. Rows outside both bands carry no band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrgencyBand {
    Soon,
    Upcoming,
}

impl std::fmt::Display for UrgencyBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UrgencyBand::Soon => write!(f, "soon"),
            UrgencyBand::Upcoming => write!(f, "upcoming"),
        }
    }
}

/// The assembled output: table rows plus one band per row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    pub table: Table,
    pub bands: Vec<Option<UrgencyBand>>,
    /// Reference date the bands were computed against.
    pub as_of: NaiveDate,
}

impl Report {
    pub fn band_count(&self, band: UrgencyBand) -> usize {
        self.bands.iter().filter(|b| **b == Some(band)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_set_overwrites_in_place() {
        let mut row = Row::new();
        row.set("A", "1");
        row.set("B", "2");
        row.set("A", "3");
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(row.cell("A"), "3");
        assert_eq!(row.cell("missing"), "");
    }

    #[test]
    fn test_table_from_rows_unions_columns() {
        let mut a = Row::new();
        a.set("A", "1");
        let mut b = Row::new();
        b.set("B", "2");
        b.set("A", "3");
        let table = Table::from_rows(vec![a, b]);
        assert_eq!(table.columns, vec!["A", "B"]);
        assert_eq!(table.row_cells(&table.rows[0]).collect::<Vec<_>>(), vec!["1", ""]);
    }

    #[test]
    fn test_customer_name_projection() {
        assert_eq!(CustomerName::NotFound.to_string(), "#NA");
        assert_eq!(CustomerName::Found("Acme".into()).to_string(), "Acme");
    }
}
