//! Unit administration commands.

use crate::error::CliError;
use crate::output::{or_dash, Listing};
use crate::utils::{format_timestamp, load_configuration, open_engine, GlobalOptions};
use berth::config::OutputFormat;
use berth::{CategoryId, NewUnit, Unit, UnitId, UnitStatus};
use clap::{Args, Subcommand};

const COLUMN_HEADERS: [&str; 8] = [
    "id",
    "code",
    "category",
    "status",
    "active",
    "floor",
    "location",
    "last_cleaned_at",
];

/// Manage individual units.
#[derive(Args)]
pub struct UnitCommand {
    #[command(subcommand)]
    pub action: UnitAction,
}

/// Unit subcommands.
#[derive(Subcommand)]
pub enum UnitAction {
    /// List units
    List {
        /// Only units of this category
        #[arg(long, value_name = "CATEGORY")]
        category: Option<CategoryId>,

        /// Include deactivated units
        #[arg(long)]
        all: bool,

        /// Output format
        #[arg(long, value_enum, ignore_case = true)]
        format: Option<OutputFormat>,
    },

    /// Register a unit
    Add {
        /// Category the unit belongs to
        #[arg(long, value_name = "CATEGORY")]
        category: CategoryId,

        /// Unit code (room number, pitch name)
        #[arg(long, value_name = "CODE")]
        code: String,

        /// Initial operational status
        #[arg(long, value_enum, default_value_t = UnitStatus::Available)]
        status: UnitStatus,

        /// Floor
        #[arg(long, value_name = "FLOOR")]
        floor: Option<String>,

        /// Location description
        #[arg(long, value_name = "TEXT")]
        location: Option<String>,

        /// Register the unit out of service
        #[arg(long)]
        inactive: bool,
    },

    /// Change a unit's operational status
    SetStatus {
        /// Unit id
        #[arg(value_name = "UNIT_ID")]
        id: i64,

        /// New status
        #[arg(value_enum, value_name = "STATUS")]
        status: UnitStatus,
    },

    /// Take a unit out of service
    Deactivate {
        /// Unit id
        #[arg(value_name = "UNIT_ID")]
        id: i64,
    },

    /// Delete a unit with no active binding
    Delete {
        /// Unit id
        #[arg(value_name = "UNIT_ID")]
        id: i64,
    },

    /// Record a cleaning and make the unit available
    Clean {
        /// Unit id
        #[arg(value_name = "UNIT_ID")]
        id: i64,
    },
}

impl UnitCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut engine = open_engine(global, &config)?;

        let changed = match self.action {
            UnitAction::List {
                category,
                all,
                format,
            } => {
                let units = engine.list_units(category.as_ref(), !all)?;
                Listing {
                    records: &units,
                    headers: &COLUMN_HEADERS,
                    rows: units.iter().map(row).collect(),
                }
                .print(format.unwrap_or_else(|| config.output_format()))?;
                return Ok(());
            }
            UnitAction::Add {
                category,
                code,
                status,
                floor,
                location,
                inactive,
            } => {
                let unit = NewUnit::new(category, code)?
                    .status(status)
                    .active(!inactive)
                    .floor(floor)
                    .location(location);
                engine.add_unit(&unit)?
            }
            UnitAction::SetStatus { id, status } => {
                engine.set_unit_status(UnitId::new(id), status)?
            }
            UnitAction::Deactivate { id } => engine.deactivate_unit(UnitId::new(id))?,
            UnitAction::Clean { id } => engine.mark_unit_cleaned(UnitId::new(id))?,
            UnitAction::Delete { id } => {
                engine.delete_unit(UnitId::new(id))?;
                if !global.quiet {
                    println!("Deleted unit {id}");
                }
                return Ok(());
            }
        };

        if !global.quiet {
            println!(
                "Unit {} ({}): {}{}",
                changed.id(),
                changed.code(),
                changed.status(),
                if changed.is_active() { "" } else { ", inactive" }
            );
        }
        Ok(())
    }
}

fn row(unit: &Unit) -> Vec<String> {
    vec![
        unit.id().to_string(),
        unit.code().to_string(),
        unit.category().to_string(),
        unit.status().to_string(),
        unit.is_active().to_string(),
        or_dash(unit.floor()),
        or_dash(unit.location()),
        unit.last_cleaned_at().map_or_else(|| "-".to_string(), format_timestamp),
    ]
}
