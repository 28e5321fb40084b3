//! Cancel command implementation.
//!
//! Cancelling releases the unit binding; the unit's operational status is
//! left alone.

use crate::commands::show::print_summary;
use crate::error::CliError;
use crate::utils::{load_configuration, open_engine, report_execution, GlobalOptions};
use berth::ReservationSelector;
use clap::Args;

/// Cancel a reservation.
#[derive(Args)]
pub struct CancelCommand {
    /// Reservation id or booking reference
    #[arg(value_name = "RESERVATION")]
    pub reservation: ReservationSelector,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl CancelCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut engine = open_engine(global, &config)?;
        if self.dry_run {
            engine = engine.dry_run();
        }

        let result = engine.cancel_reservation(&self.reservation)?;
        report_execution(&result, global);

        if let Some(ref reservation) = result.reservation {
            print_summary(&engine, reservation, global)?;
        }
        Ok(())
    }
}
