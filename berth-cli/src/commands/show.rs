//! Show command implementation.
//!
//! Displays one reservation in detail, plus the one-line summary the
//! mutating commands print after they commit.

use crate::error::CliError;
use crate::utils::{format_timestamp, load_configuration, open_engine, GlobalOptions};
use berth::config::OutputFormat;
use berth::{Reservation, ReservationEngine, ReservationSelector};
use clap::Args;

/// Show a reservation.
#[derive(Args)]
pub struct ShowCommand {
    /// Reservation id or booking reference
    #[arg(value_name = "RESERVATION")]
    pub reservation: ReservationSelector,

    /// Output format (json prints the stored record)
    #[arg(long, value_enum, ignore_case = true)]
    pub format: Option<OutputFormat>,
}

impl ShowCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let engine = open_engine(global, &config)?;
        let reservation = engine.get_reservation(&self.reservation)?;

        match self.format.unwrap_or(OutputFormat::Table) {
            OutputFormat::Json => {
                let text = serde_json::to_string_pretty(&reservation).map_err(|e| {
                    CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
                })?;
                println!("{text}");
            }
            _ => print_detail(&engine, &reservation)?,
        }

        Ok(())
    }
}

fn print_detail(engine: &ReservationEngine, r: &Reservation) -> Result<(), CliError> {
    println!("Reservation:  {} (id {})", r.booking_ref(), r.id());
    println!(
        "Guest:        {} <{}> {}",
        r.guest().name(),
        r.guest().email(),
        r.guest().phone()
    );
    println!("Category:     {}", r.category());
    println!(
        "Stay:         {} to {} ({} night(s))",
        r.stay().check_in().format("%Y-%m-%d %H:%M"),
        r.stay().check_out().format("%Y-%m-%d %H:%M"),
        r.stay().nights()
    );
    println!("Guests:       {}", r.guest_count());
    println!("Total:        {}", r.total_price());
    println!("Status:       {}", r.status());
    println!("Payment:      {}", r.payment_status());
    println!("Unit:         {}", unit_label(engine, r)?);
    if let Some(requests) = r.special_requests() {
        println!("Requests:     {requests}");
    }
    for add_on in r.add_ons() {
        println!("Add-on:       {} ({}) {}", add_on.name, add_on.id, add_on.price);
    }
    println!("Created:      {}", format_timestamp(r.created_at()));
    println!("Updated:      {}", format_timestamp(r.updated_at()));
    Ok(())
}

/// Unit code of the bound unit, or `-`.
pub(crate) fn unit_label(engine: &ReservationEngine, r: &Reservation) -> Result<String, CliError> {
    match r.unit() {
        Some(id) => Ok(engine.get_unit(id)?.code().to_string()),
        None => Ok("-".to_string()),
    }
}

/// Print the one-line state of a reservation after a change.
pub(crate) fn print_summary(
    engine: &ReservationEngine,
    reservation: &Reservation,
    global: &GlobalOptions,
) -> Result<(), CliError> {
    if global.quiet {
        return Ok(());
    }
    println!(
        "{}: status {}, payment {}, unit {}",
        reservation.booking_ref(),
        reservation.status(),
        reservation.payment_status(),
        unit_label(engine, reservation)?
    );
    Ok(())
}
