//! Status command implementation.

use crate::commands::show::print_summary;
use crate::error::CliError;
use crate::utils::{load_configuration, open_engine, report_execution, GlobalOptions};
use berth::{ReservationSelector, ReservationStatus};
use clap::Args;

/// Move a reservation to a new status.
#[derive(Args)]
pub struct StatusCommand {
    /// Reservation id or booking reference
    #[arg(value_name = "RESERVATION")]
    pub reservation: ReservationSelector,

    /// Target status
    #[arg(value_enum, value_name = "STATUS")]
    pub status: ReservationStatus,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl StatusCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut engine = open_engine(global, &config)?;
        if self.dry_run {
            engine = engine.dry_run();
        }

        let result = engine.update_status(&self.reservation, self.status)?;
        report_execution(&result, global);

        if let Some(ref reservation) = result.reservation {
            print_summary(&engine, reservation, global)?;
        }
        Ok(())
    }
}
