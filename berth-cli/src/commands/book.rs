//! Book command implementation.
//!
//! This module implements the `book` command, which creates a reservation
//! for a category and stay and prints its booking reference.

use crate::error::CliError;
use crate::utils::{load_configuration, open_engine, parse_date, report_execution, GlobalOptions};
use berth::{AddOn, BookingOptions, CategoryId, Money, PaymentStatus};
use chrono::NaiveDate;
use clap::Args;

/// Create a reservation.
#[derive(Args)]
pub struct BookCommand {
    /// Room category to book
    #[arg(long, value_name = "CATEGORY")]
    pub category: CategoryId,

    /// Arrival day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub check_in: NaiveDate,

    /// Departure day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE", value_parser = parse_date)]
    pub check_out: NaiveDate,

    /// Guest name
    #[arg(long, value_name = "NAME")]
    pub name: String,

    /// Guest e-mail address
    #[arg(long, value_name = "EMAIL")]
    pub email: String,

    /// Guest phone number
    #[arg(long, value_name = "PHONE")]
    pub phone: String,

    /// Number of guests
    #[arg(long, value_name = "COUNT", default_value_t = 1)]
    pub guests: u32,

    /// Total price agreed elsewhere (e.g. 199.00); default is nights times the nightly price
    #[arg(long, value_name = "AMOUNT")]
    pub price: Option<Money>,

    /// Payment status at booking time
    #[arg(long, value_enum, default_value_t = PaymentStatus::Pending)]
    pub payment: PaymentStatus,

    /// Free-text requests from the guest
    #[arg(long, value_name = "TEXT")]
    pub requests: Option<String>,

    /// Add-on as ID:NAME:PRICE (repeatable)
    #[arg(long = "add-on", value_name = "ID:NAME:PRICE", value_parser = parse_add_on)]
    pub add_ons: Vec<AddOn>,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl BookCommand {
    /// Execute the book command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut engine = open_engine(global, &config)?;
        if self.dry_run {
            engine = engine.dry_run();
        }

        let options = BookingOptions::new(
            self.name,
            self.email,
            self.phone,
            self.category,
            self.check_in,
            self.check_out,
        )
        .with_guests(self.guests)
        .with_total_price(self.price)
        .with_payment_status(self.payment)
        .with_special_requests(self.requests)
        .with_add_ons(self.add_ons);

        let result = engine.create_reservation(options)?;
        report_execution(&result, global);

        if let Some(reservation) = result.reservation {
            println!("{}", reservation.booking_ref());
            if global.verbose {
                eprintln!(
                    "{} night(s), total {}, status {}",
                    reservation.stay().nights(),
                    reservation.total_price(),
                    reservation.status()
                );
            }
        }

        Ok(())
    }
}

/// Parse an add-on given as `ID:NAME:PRICE`.
fn parse_add_on(value: &str) -> Result<AddOn, String> {
    let mut parts = value.splitn(3, ':');
    let (Some(id), Some(name), Some(price)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("'{value}' is not of the form ID:NAME:PRICE"));
    };
    if id.trim().is_empty() || name.trim().is_empty() {
        return Err(format!("'{value}' needs a non-empty id and name"));
    }
    let price: Money = price.parse().map_err(|e| format!("{e}"))?;

    Ok(AddOn {
        id: id.trim().to_string(),
        name: name.trim().to_string(),
        kind: None,
        price,
    })
}
