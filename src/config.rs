use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Root configuration structure, deserialized from `.renewal-report/config.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub filter: FilterConfig,
    pub urgency: UrgencyConfig,
}

/// How the three input exports are located in the data folder.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub strategy: ResolutionStrategy,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionStrategy {
    /// Newest file by modification time matching a name prefix.
    #[default]
    Newest,
    /// Legacy fixed names: `contract.csv`, `license.csv`, `finance.csv`.
    Fixed,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// File name without extension, written inside the data folder.
    pub stem: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            format: OutputFormat::Xlsx,
            stem: "consolidated".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Csv,
    Xlsx,
    Json,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Xlsx => "xlsx",
            OutputFormat::Json => "json",
        }
    }
}

/// License eligibility rules. Values are compared trimmed and lower-cased.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Apply the business-unit rule.
    pub business_unit: bool,
    pub product: String,
    pub tiers: Vec<String>,
    pub excluded_business_units: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            business_unit: true,
            product: "inspect".to_string(),
            tiers: ["enterprise", "enterprise ai", "inspect pro", "starter+"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            excluded_business_units: vec!["proceq hq".to_string()],
        }
    }
}

/// Inclusive day thresholds for the two urgency bands.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct UrgencyConfig {
    pub soon_days: i64,
    pub upcoming_days: i64,
}

impl Default for UrgencyConfig {
    fn default() -> Self {
        UrgencyConfig {
            soon_days: 30,
            upcoming_days: 60,
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `./.renewal-report/config.toml`
/// 3. `~/.config/renewal-report/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = Path::new(".renewal-report").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("renewal-report")
            .join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid config {}", path.display()))
}
