use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::config::ResolutionStrategy;
use crate::models::{Report, UrgencyBand, CONTRACT_ID, CUSTOMER_NAME, EXPIRATION};
use crate::pipeline::Outcome;

/// Print the run summary.
pub fn render(
    outcome: &Outcome,
    strategy: ResolutionStrategy,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    let report = &outcome.report;
    let soon = report.band_count(UrgencyBand::Soon);
    let upcoming = report.band_count(UrgencyBand::Upcoming);

    if quiet {
        println!(
            "Filtered: {}  No contract: {}  No customer: {}  Soon: {}  Upcoming: {}  → {}",
            outcome.filtered,
            outcome.missing_contract,
            outcome.missing_finance,
            soon.to_string().red(),
            upcoming.to_string().yellow(),
            outcome.output_path.display(),
        );
        return Ok(());
    }

    println!(
        "\n {} v{}\n",
        "renewal-report".bold(),
        env!("CARGO_PKG_VERSION")
    );

    if strategy == ResolutionStrategy::Newest {
        println!(" Input files:");
        println!("   {} contracts : {}", "→".cyan(), outcome.inputs.contracts.display());
        println!("   {} licenses  : {}", "→".cyan(), outcome.inputs.licenses.display());
        println!("   {} finance   : {}", "→".cyan(), outcome.inputs.finance.display());
        println!();
    }

    println!(" Filtered licenses: {} rows", outcome.filtered);
    println!(
        " Missing contract matches (ID not found in contracts): {}",
        count(outcome.missing_contract)
    );
    println!(
        " Missing finance matches (Customer name defaulted to #NA): {}",
        count(outcome.missing_finance)
    );
    println!(
        " Expiring within the highlight window: {} soon, {} upcoming",
        soon.to_string().red().bold(),
        upcoming.to_string().yellow().bold()
    );
    println!(" Output written to: {}\n", outcome.output_path.display());

    if verbose && soon + upcoming > 0 {
        println!(" {} Renewals due:\n", "[DUE]".red().bold());
        render_table(report);
        println!();
    }

    Ok(())
}

fn count(n: usize) -> ColoredString {
    if n == 0 {
        n.to_string().green()
    } else {
        n.to_string().yellow()
    }
}

fn render_table(report: &Report) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new(CONTRACT_ID).add_attribute(Attribute::Bold),
            Cell::new(CUSTOMER_NAME).add_attribute(Attribute::Bold),
            Cell::new(EXPIRATION).add_attribute(Attribute::Bold),
            Cell::new("Band").add_attribute(Attribute::Bold),
        ]);

    for (row, band) in report.table.rows.iter().zip(&report.bands) {
        let Some(band) = band else { continue };
        let color = match band {
            UrgencyBand::Soon => Color::Red,
            UrgencyBand::Upcoming => Color::Yellow,
        };
        table.add_row(vec![
            Cell::new(row.cell(CONTRACT_ID)),
            Cell::new(row.cell(CUSTOMER_NAME)),
            Cell::new(row.cell(EXPIRATION)),
            Cell::new(band.to_string()).fg(color),
        ]);
    }

    println!("{}", table);
}
