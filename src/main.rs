//! `renewal-report` — consolidate contract, license and finance exports into
//! one renewal report.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load the run configuration ([`config::load_config`]) and apply CLI overrides.
//! 3. Locate the newest (or fixed-name) input exports ([`resolver`]).
//! 4. Read them as string tables ([`reader`]).
//! 5. Filter licenses, build both lookups, join and assemble ([`pipeline`]).
//! 6. Write the report and print the summary ([`report`]).

mod cli;
mod config;
mod error;
mod models;
mod pipeline;
mod reader;
mod report;
mod resolver;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use cli::Cli;
use config::{load_config, ResolutionStrategy};

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(format) = &cli.format {
        config.output.format = format.into();
    }
    if cli.fixed_names {
        config.input.strategy = ResolutionStrategy::Fixed;
    }
    if cli.no_bu_filter {
        config.filter.business_unit = false;
    }

    let today = cli
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let outcome = pipeline::consolidate(&cli.data_dir, &config, today)?;

    report::terminal::render(&outcome, config.input.strategy, cli.verbose, cli.quiet)?;

    Ok(())
}
