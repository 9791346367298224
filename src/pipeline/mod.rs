//! The consolidation pipeline: read → filter → look up → join → assemble → write.
//!
//! - [`filter`] — license eligibility rules.
//! - [`lookup`] — contract and finance lookups with their conflict policies.
//! - [`join`] — merges licenses with both lookups and counts misses.
//! - [`assemble`] — expiration sort, column order and urgency bands.
//! - [`dates`] — lenient calendar-date parsing for the `Expiration` column.

pub mod assemble;
pub mod dates;
pub mod filter;
pub mod join;
pub mod lookup;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::Report;
use crate::reader::{read_license_table, read_table};
use crate::report;
use crate::resolver::{resolve_inputs, ResolvedInputs};

use filter::LicenseFilter;

/// What a run produced, for the console summary.
#[derive(Debug)]
pub struct Outcome {
    pub inputs: ResolvedInputs,
    pub filtered: usize,
    pub missing_contract: usize,
    pub missing_finance: usize,
    pub output_path: PathBuf,
    pub report: Report,
}

/// Run the whole pipeline over the exports in `data_dir` and write the
/// report next to them.
pub fn consolidate(data_dir: &Path, config: &Config, today: NaiveDate) -> Result<Outcome> {
    let output_name = format!(
        "{}.{}",
        config.output.stem,
        config.output.format.extension()
    );
    let inputs = resolve_inputs(data_dir, config.input.strategy, &output_name)?;

    let license_filter = LicenseFilter::new(&config.filter);
    let licenses = read_license_table(&inputs.licenses, &license_filter.required_columns())?;
    let contracts = read_table(&inputs.contracts, false)?;
    let finance = read_table(&inputs.finance, false)?;
    info!(
        "read {} license, {} contract, {} finance rows",
        licenses.len(),
        contracts.len(),
        finance.len()
    );

    if licenses.is_empty() {
        warn!("{} has no license rows", inputs.licenses.display());
    }

    let eligible = license_filter.apply(&licenses)?;
    let filtered = eligible.len();

    let contract_lookup = lookup::build_contract_lookup(&contracts)?;
    let finance_lookup = lookup::build_finance_lookup(&finance)?;

    let enrichment = join::enrich(eligible, &contract_lookup, &finance_lookup);
    let report = assemble::assemble(enrichment.records, &config.urgency, today);

    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create {}", data_dir.display()))?;
    let output_path = data_dir.join(&output_name);
    report::write(&report, &output_path, config.output.format)?;
    info!("wrote {}", output_path.display());

    Ok(Outcome {
        inputs,
        filtered,
        missing_contract: enrichment.missing_contract,
        missing_finance: enrichment.missing_finance,
        output_path,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OutputFormat, ResolutionStrategy};
    use crate::models::{UrgencyBand, CONTRACT_ID, CUSTOMER_NAME, EXPIRATION};
    use crate::pipeline::dates::parse_date;
    use crate::reader::read_table;
    use std::fs;

    const LICENSES: &str = "\
Contract,,,,,License,,
Contract ID,Product,Tier,BU,Seats,Expiration,Start,Notes
contract-001,Inspect,Enterprise,Asia,5,2026-12-01,2025-12-01,
contract-002,Inspect,Inspect Pro,Europe,2,2026-10-20,2025-10-20,NA
contract-003,Inspect,Starter+,Americas,1,not set,2025-01-01,
contract-004,inspect,enterprise ai,Japan,3,2026-11-10,2025-11-10,
contract-005,Inspect,Enterprise,Proceq HQ,1,2026-10-18,2025-10-18,
contract-006,GPR Live,Enterprise,Asia,1,2026-10-18,2025-10-18,
contract-007,Inspect,Enterprise,,1,2026-10-18,2025-10-18,
contract-008,Inspect,Inspect Free Trial,Asia,1,2026-10-18,2025-10-18,
";

    const CONTRACTS: &str = "\
\u{feff}ID,Country Sold To,User Type,Remarks,BP,First Expiration Date,License Count,Language
contract-001,Singapore,End User,,BP-1,2024-12-01,5,English
contract-002,Germany,Reseller,renewal pending,BP-2,2024-10-20,2,German
contract-001,Malaysia,Reseller,,BP-9,2020-01-01,9,Malay
contract-004,Japan,End User,,BP-4,2024-11-10,3,Japanese
";

    const FINANCE: &str = "\
Contract ID,Customer name,Amount
contract-001,,100
contract-001,Acme Pte Ltd,100
contract-002,,50
contract-004,Kaisha KK,75
contract-004,Other KK,75
";

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    fn data_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("licenses.csv"), LICENSES).unwrap();
        fs::write(dir.path().join("contracts.csv"), CONTRACTS).unwrap();
        fs::write(dir.path().join("finance.csv"), FINANCE).unwrap();
        dir
    }

    fn config(format: OutputFormat) -> Config {
        let mut config = Config::default();
        config.output.format = format;
        config
    }

    #[test]
    fn test_end_to_end_csv() {
        let dir = data_dir();
        let outcome = consolidate(dir.path(), &config(OutputFormat::Csv), today()).unwrap();

        assert_eq!(outcome.filtered, 4);
        assert_eq!(outcome.missing_contract, 1);
        assert_eq!(outcome.missing_finance, 2);
        assert_eq!(outcome.output_path, dir.path().join("consolidated.csv"));
        assert_eq!(outcome.inputs.licenses, dir.path().join("licenses.csv"));

        let table = read_table(&outcome.output_path, false).unwrap();
        assert_eq!(&table.columns[..3], &[CONTRACT_ID, CUSTOMER_NAME, "Product"]);
        let ids: Vec<&str> = table.rows.iter().map(|r| r.cell(CONTRACT_ID)).collect();
        assert_eq!(ids, vec!["contract-002", "contract-004", "contract-001", "contract-003"]);

        let first = &table.rows[2];
        assert_eq!(first.cell("Country Sold To"), "Singapore");
        assert_eq!(first.cell("User Type"), "End User");
        assert_eq!(first.cell(CUSTOMER_NAME), "Acme Pte Ltd");
        assert_eq!(table.rows[0].cell(CUSTOMER_NAME), "#NA");
        assert_eq!(table.rows[0].cell("Notes"), "NA");
        assert_eq!(table.rows[1].cell(CUSTOMER_NAME), "Kaisha KK");
        assert_eq!(table.rows[3].cell("Country Sold To"), "");

        let dates: Vec<NaiveDate> = table
            .rows
            .iter()
            .filter_map(|r| parse_date(r.cell(EXPIRATION)))
            .collect();
        assert!(dates.windows(2).all(|w| w[0] <= w[1]));

        assert_eq!(
            outcome.report.bands,
            vec![Some(UrgencyBand::Soon), Some(UrgencyBand::Soon), Some(UrgencyBand::Upcoming), None]
        );
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        for format in [OutputFormat::Csv, OutputFormat::Json, OutputFormat::Xlsx] {
            let dir = data_dir();
            let cfg = config(format);
            let first = consolidate(dir.path(), &cfg, today()).unwrap();
            let a = fs::read(&first.output_path).unwrap();
            let second = consolidate(dir.path(), &cfg, today()).unwrap();
            let b = fs::read(&second.output_path).unwrap();
            assert_eq!(first.report, second.report);
            assert_eq!(a, b, "{:?} output changed between runs", format);
        }
    }

    #[test]
    fn test_output_sharing_an_input_prefix() {
        let dir = data_dir();
        let mut cfg = config(OutputFormat::Csv);
        cfg.output.stem = "licenses_report".to_string();

        let first = consolidate(dir.path(), &cfg, today()).unwrap();
        let second = consolidate(dir.path(), &cfg, today()).unwrap();

        assert_eq!(second.inputs.licenses, dir.path().join("licenses.csv"));
        assert_eq!(first.report, second.report);
        assert_eq!(second.output_path, dir.path().join("licenses_report.csv"));
    }

    #[test]
    fn test_fixed_names() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("license.csv"), LICENSES).unwrap();
        fs::write(dir.path().join("contract.csv"), CONTRACTS).unwrap();
        fs::write(dir.path().join("finance.csv"), FINANCE).unwrap();

        let mut cfg = config(OutputFormat::Csv);
        cfg.input.strategy = ResolutionStrategy::Fixed;
        cfg.filter.business_unit = false;
        let outcome = consolidate(dir.path(), &cfg, today()).unwrap();

        // Proceq HQ and blank BU rows come back without the BU rule
        assert_eq!(outcome.filtered, 6);
    }

    #[test]
    fn test_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("licenses.csv"), LICENSES).unwrap();
        let err = consolidate(dir.path(), &config(OutputFormat::Csv), today()).unwrap_err();
        assert!(err.to_string().contains("contracts"));
    }
}
