//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    AssignCommand, AvailabilityCommand, BookCommand, CancelCommand, CategoryCommand,
    CompletionsCommand, InitCommand, ListCommand, PayCommand, ShowCommand, ShowDataDirCommand,
    StatusCommand, UnbindCommand, UnitCommand, ValidateCommand,
};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for lodging reservations and room inventory.
#[derive(Parser)]
#[command(name = "berth")]
#[command(version, about = "Manage lodging reservations and room inventory", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "BERTH_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "BERTH_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization
    #[arg(
        long,
        global = true,
        env = "BERTH_DISABLE_AUTOINIT",
        action = ArgAction::SetTrue,
        value_parser = BoolishValueParser::new()
    )]
    pub disable_autoinit: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize berth data directory and database
    Init(InitCommand),

    /// Check how many units of a category are free for a stay
    Availability(AvailabilityCommand),

    /// Create a reservation
    Book(BookCommand),

    /// Update the payment status of a reservation
    Pay(PayCommand),

    /// Move a reservation to a new status
    Status(StatusCommand),

    /// Cancel a reservation
    Cancel(CancelCommand),

    /// Bind a unit to a reservation
    Assign(AssignCommand),

    /// Release the unit bound to a reservation
    Unbind(UnbindCommand),

    /// Show a reservation
    Show(ShowCommand),

    /// List reservations
    List(ListCommand),

    /// Manage room categories
    Category(CategoryCommand),

    /// Manage individual units
    Unit(UnitCommand),

    /// Validate a configuration file
    Validate(ValidateCommand),

    /// Show the resolved data directory path
    ShowDataDir(ShowDataDirCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
