use std::collections::HashSet;

use anyhow::Result;

use crate::config::FilterConfig;
use crate::models::{Row, Table, CONTRACT_ID};
use crate::reader::require_columns;

/// Business-unit values that mean "not recorded".
const MISSING_MARKERS: [&str; 6] = ["", "#n/a", "n/a", "na", "none", "null"];

/// Normalized eligibility rules for license rows.
#[derive(Debug, Clone)]
pub struct LicenseFilter {
    product: String,
    tiers: HashSet<String>,
    /// `None` when the business-unit rule is disabled.
    excluded_business_units: Option<HashSet<String>>,
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

impl LicenseFilter {
    pub fn new(config: &FilterConfig) -> Self {
        let excluded_business_units = config.business_unit.then(|| {
            config
                .excluded_business_units
                .iter()
                .map(|bu| normalize(bu))
                .chain(MISSING_MARKERS.iter().map(|m| m.to_string()))
                .collect()
        });

        LicenseFilter {
            product: normalize(&config.product),
            tiers: config.tiers.iter().map(|t| normalize(t)).collect(),
            excluded_business_units,
        }
    }

    /// Columns the license table must carry for this filter.
    pub fn required_columns(&self) -> Vec<&'static str> {
        let mut required = vec![CONTRACT_ID, "Product", "Tier"];
        if self.excluded_business_units.is_some() {
            required.push("BU");
        }
        required
    }

    pub fn matches(&self, row: &Row) -> bool {
        if normalize(row.cell("Product")) != self.product {
            return false;
        }
        if !self.tiers.contains(&normalize(row.cell("Tier"))) {
            return false;
        }
        match &self.excluded_business_units {
            Some(excluded) => !excluded.contains(&normalize(row.cell("BU"))),
            None => true,
        }
    }

    /// Eligible rows of `licenses`, in input order.
    pub fn apply(&self, licenses: &Table) -> Result<Vec<Row>> {
        require_columns(licenses, &self.required_columns(), "license table")?;
        Ok(licenses
            .rows
            .iter()
            .filter(|row| self.matches(row))
            .cloned()
            .collect())
    }
}
