//! List command implementation.
//!
//! This module implements the `list` command, which displays reservations
//! in various formats (table, JSON, CSV, TSV).

use crate::commands::show::unit_label;
use crate::error::CliError;
use crate::output::Listing;
use crate::utils::{format_timestamp, load_configuration, open_engine, parse_date, GlobalOptions};
use berth::config::OutputFormat;
use berth::{CategoryId, PaymentStatus, ReservationFilter, ReservationStatus};
use chrono::NaiveDate;
use clap::Args;

/// Column headers for every output format.
const COLUMN_HEADERS: [&str; 11] = [
    "id",
    "reference",
    "guest",
    "category",
    "check_in",
    "check_out",
    "guests",
    "total",
    "status",
    "payment",
    "unit",
];

/// List reservations.
#[derive(Args)]
pub struct ListCommand {
    /// Output format (default: `output_format` from configuration, else table)
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,

    /// Only reservations in this status
    #[arg(long, value_enum)]
    pub status: Option<ReservationStatus>,

    /// Only reservations with this payment status
    #[arg(long, value_enum)]
    pub payment: Option<PaymentStatus>,

    /// Only reservations of this category
    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<CategoryId>,

    /// Only stays checking in on or after this day
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// Only stays checking in on or before this day
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub to: Option<NaiveDate>,

    /// Show at most this many reservations
    #[arg(long, value_name = "COUNT")]
    pub limit: Option<u32>,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let engine = open_engine(global, &config)?;

        let filter = ReservationFilter {
            status: self.status,
            payment_status: self.payment,
            category: self.category,
            check_in_from: self.from,
            check_in_to: self.to,
            limit: self.limit,
        };
        let reservations = engine.list_reservations(&filter)?;

        let mut rows = Vec::with_capacity(reservations.len());
        for r in &reservations {
            rows.push(vec![
                r.id().to_string(),
                r.booking_ref().to_string(),
                r.guest().name().to_string(),
                r.category().to_string(),
                r.stay().check_in_date().to_string(),
                r.stay().check_out_date().to_string(),
                r.guest_count().to_string(),
                r.total_price().to_string(),
                r.status().to_string(),
                r.payment_status().to_string(),
                unit_label(&engine, r)?,
            ]);
        }

        let format = self.format.unwrap_or_else(|| config.output_format());
        Listing {
            records: &reservations,
            headers: &COLUMN_HEADERS,
            rows,
        }
        .print(format)?;

        if global.verbose {
            if let Some(newest) = reservations.first() {
                eprintln!("Newest booking made {}", format_timestamp(newest.created_at()));
            }
        }
        Ok(())
    }
}
