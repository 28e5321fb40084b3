//! Availability command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_engine, parse_date, GlobalOptions};
use berth::config::OutputFormat;
use berth::CategoryId;
use chrono::NaiveDate;
use clap::Args;

/// Check how many units of a category are free for a stay.
#[derive(Args)]
pub struct AvailabilityCommand {
    /// Room category
    #[arg(long, value_name = "CATEGORY")]
    pub category: CategoryId,

    /// Arrival day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub check_in: NaiveDate,

    /// Departure day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub check_out: NaiveDate,

    /// Number of guests
    #[arg(long, value_name = "COUNT", default_value_t = 1)]
    pub guests: u32,

    /// Output format (json prints the full report)
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,
}

impl AvailabilityCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let engine = open_engine(global, &config)?;

        let report =
            engine.check_availability(&self.category, self.check_in, self.check_out, self.guests)?;

        if self.format == Some(OutputFormat::Json) {
            let value = serde_json::json!({
                "category": report.category,
                "available": report.is_available(),
                "available_count": report.available_count,
                "total_count": report.total_count,
                "nightly_price": report.nightly_price,
            });
            println!("{value:#}");
            return Ok(());
        }

        println!(
            "{}: {} of {} unit(s) available at {} per night",
            report.category, report.available_count, report.total_count, report.nightly_price
        );
        Ok(())
    }
}
