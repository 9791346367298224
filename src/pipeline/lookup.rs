use anyhow::Result;
use tracing::debug;

use crate::models::{
    ContractAttributes, ContractLookup, CustomerName, FinanceLookup, Table, CONTRACT_FIELDS,
    CONTRACT_ID, CUSTOMER_NAME,
};
use crate::reader::require_columns;

/// Identifier column of the contract export.
const CONTRACT_KEY: &str = "ID";

/// Build the contract lookup. Rows with a blank `ID` are skipped; the first
/// row for an identifier wins and later duplicates are ignored wholesale.
pub fn build_contract_lookup(contracts: &Table) -> Result<ContractLookup> {
    let mut required = vec![CONTRACT_KEY];
    required.extend(CONTRACT_FIELDS);
    require_columns(contracts, &required, "contract table")?;

    let mut lookup = ContractLookup::default();
    let mut duplicates = 0usize;
    for row in &contracts.rows {
        let id = row.cell(CONTRACT_KEY).trim();
        if id.is_empty() {
            continue;
        }
        if lookup.entries.contains_key(id) {
            duplicates += 1;
            continue;
        }
        lookup
            .entries
            .insert(id.to_string(), ContractAttributes::from_row(row));
    }

    debug!(
        "contract lookup: {} ids, {} duplicate rows ignored",
        lookup.len(),
        duplicates
    );
    Ok(lookup)
}

/// Build the finance lookup. The first non-empty customer name recorded for
/// an identifier is final; identifiers seen only with blank names map to
/// [`CustomerName::NotFound`].
pub fn build_finance_lookup(finance: &Table) -> Result<FinanceLookup> {
    require_columns(finance, &[CONTRACT_ID, CUSTOMER_NAME], "finance table")?;

    let mut lookup = FinanceLookup::default();
    for row in &finance.rows {
        let id = row.cell(CONTRACT_ID).trim();
        if id.is_empty() {
            continue;
        }
        if lookup.entries.get(id).is_some_and(CustomerName::is_found) {
            continue;
        }

        let name = row.cell(CUSTOMER_NAME).trim();
        if name.is_empty() {
            lookup
                .entries
                .entry(id.to_string())
                .or_insert(CustomerName::NotFound);
        } else {
            lookup
                .entries
                .insert(id.to_string(), CustomerName::Found(name.to_string()));
        }
    }

    debug!("finance lookup: {} ids", lookup.len());
    Ok(lookup)
}
