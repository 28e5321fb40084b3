//! Pay command implementation.
//!
//! Records a payment status change. Capturing payment on a pending
//! reservation confirms it.

use crate::commands::show::print_summary;
use crate::error::CliError;
use crate::utils::{load_configuration, open_engine, report_execution, GlobalOptions};
use berth::{PaymentStatus, ReservationSelector};
use clap::Args;

/// Update the payment status of a reservation.
#[derive(Args)]
pub struct PayCommand {
    /// Reservation id or booking reference
    #[arg(value_name = "RESERVATION")]
    pub reservation: ReservationSelector,

    /// New payment status
    #[arg(long, value_enum, default_value_t = PaymentStatus::Paid)]
    pub status: PaymentStatus,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl PayCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut engine = open_engine(global, &config)?;
        if self.dry_run {
            engine = engine.dry_run();
        }

        let result = engine.update_payment_status(&self.reservation, self.status)?;
        report_execution(&result, global);

        if let Some(ref reservation) = result.reservation {
            print_summary(&engine, reservation, global)?;
        }
        Ok(())
    }
}
