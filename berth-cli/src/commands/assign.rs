//! Assign and unbind command implementations.
//!
//! `assign` binds a unit to a reservation, either the one named with
//! `--unit` or the first free unit of the reserved category. `unbind`
//! drops the binding again.

use crate::commands::show::print_summary;
use crate::error::CliError;
use crate::utils::{load_configuration, open_engine, report_execution, GlobalOptions};
use berth::{ReservationSelector, UnitId};
use clap::Args;

/// Bind a unit to a reservation.
#[derive(Args)]
pub struct AssignCommand {
    /// Reservation id or booking reference
    #[arg(value_name = "RESERVATION")]
    pub reservation: ReservationSelector,

    /// Unit id to bind (default: first free unit of the category)
    #[arg(long, value_name = "UNIT_ID")]
    pub unit: Option<i64>,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl AssignCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut engine = open_engine(global, &config)?;
        if self.dry_run {
            engine = engine.dry_run();
        }

        let result = engine.assign_unit(&self.reservation, self.unit.map(UnitId::new))?;
        report_execution(&result, global);

        if result.actions_taken.is_empty() && !global.quiet {
            eprintln!("Unit already bound; nothing to do");
        }
        if let Some(ref reservation) = result.reservation {
            print_summary(&engine, reservation, global)?;
        }
        Ok(())
    }
}

/// Release the unit bound to a reservation.
#[derive(Args)]
pub struct UnbindCommand {
    /// Reservation id or booking reference
    #[arg(value_name = "RESERVATION")]
    pub reservation: ReservationSelector,

    /// Perform a dry run
    #[arg(long)]
    pub dry_run: bool,
}

impl UnbindCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut engine = open_engine(global, &config)?;
        if self.dry_run {
            engine = engine.dry_run();
        }

        let result = engine.unbind_unit(&self.reservation)?;
        report_execution(&result, global);

        if let Some(ref reservation) = result.reservation {
            print_summary(&engine, reservation, global)?;
        }
        Ok(())
    }
}
