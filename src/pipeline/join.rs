use tracing::debug;

use crate::models::{
    ContractLookup, EnrichedRecord, FinanceLookup, Row, CONTRACT_FIELDS, CONTRACT_ID,
};

/// Enriched records plus the number of lookups that came back empty.
#[derive(Debug, Clone, Default)]
pub struct Enrichment {
    pub records: Vec<EnrichedRecord>,
    pub missing_contract: usize,
    pub missing_finance: usize,
}

/// Merge each license row with its contract attributes and customer name.
///
/// A contract hit overwrites same-named license fields. A miss only fills the
/// attribute columns the row does not already carry, with `""`. Misses are
/// counted, never fatal.
pub fn enrich(
    licenses: Vec<Row>,
    contracts: &ContractLookup,
    finance: &FinanceLookup,
) -> Enrichment {
    let mut out = Enrichment {
        records: Vec::with_capacity(licenses.len()),
        ..Enrichment::default()
    };

    for mut row in licenses {
        let contract_id = row.cell(CONTRACT_ID).trim().to_string();

        match contracts.get(&contract_id) {
            Some(attrs) => {
                for (column, value) in attrs.fields() {
                    row.set(column, value);
                }
            }
            None => {
                out.missing_contract += 1;
                for column in CONTRACT_FIELDS {
                    if !row.contains(column) {
                        row.set(column, "");
                    }
                }
            }
        }

        let customer = finance.customer_name(&contract_id);
        if !customer.is_found() {
            out.missing_finance += 1;
        }

        out.records.push(EnrichedRecord { row, customer });
    }

    debug!(
        "enriched {} records ({} without contract, {} without customer)",
        out.records.len(),
        out.missing_contract,
        out.missing_finance
    );
    out
}
