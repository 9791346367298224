use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::config::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "renewal-report",
    about = "Consolidate contract, license and finance exports into a renewal report",
    version
)]
pub struct Cli {
    /// Folder holding the input exports; the report is written here too
    #[arg(long, value_name = "DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Config file [default: ./.renewal-report/config.toml, fallback ~/.config/renewal-report/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format (overrides the config file)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<FormatArg>,

    /// Read contract.csv, license.csv and finance.csv instead of the newest exports
    #[arg(long)]
    pub fixed_names: bool,

    /// Do not exclude licenses by business unit
    #[arg(long)]
    pub no_bu_filter: bool,

    /// Reference date for urgency highlighting [default: today]
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub today: Option<NaiveDate>,

    /// Also list every renewal due within the highlight window
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum FormatArg {
    Csv,
    Xlsx,
    Json,
}

impl From<&FormatArg> for OutputFormat {
    fn from(arg: &FormatArg) -> Self {
        match arg {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Xlsx => OutputFormat::Xlsx,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["renewal-report"]);
        assert_eq!(cli.data_dir, PathBuf::from("data"));
        assert!(cli.format.is_none());
        assert!(cli.today.is_none());
        assert!(!cli.fixed_names);
    }

    #[test]
    fn test_overrides() {
        let cli = Cli::parse_from([
            "renewal-report",
            "--data-dir",
            "/tmp/in",
            "--format",
            "csv",
            "--today",
            "2026-10-16",
            "--no-bu-filter",
        ]);
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/in"));
        assert_eq!(OutputFormat::from(cli.format.as_ref().unwrap()), OutputFormat::Csv);
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2026, 10, 16));
        assert!(cli.no_bu_filter);
    }
}
