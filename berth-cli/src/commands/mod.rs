//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `init`: Create the data directory and database, optionally seeding the catalog
//! - `availability`: Count free units of a category for a stay
//! - `book`: Create a reservation
//! - `pay`: Record a payment status change
//! - `status`: Move a reservation to a new status
//! - `cancel`: Cancel a reservation
//! - `assign` / `unbind`: Bind or release a unit
//! - `show`: Display one reservation
//! - `list`: List reservations
//! - `category`: Catalog administration
//! - `unit`: Unit administration
//! - `validate`: Validate a configuration file
//! - `show_data_dir`: Show resolved data directory path
//! - `completions`: Generate shell completion scripts

pub mod assign;
pub mod availability;
pub mod book;
pub mod cancel;
pub mod category;
pub mod completions;
pub mod init;
pub mod list;
pub mod pay;
pub mod show;
pub mod show_data_dir;
pub mod status;
pub mod unit;
pub mod validate;

pub use assign::{AssignCommand, UnbindCommand};
pub use availability::AvailabilityCommand;
pub use book::BookCommand;
pub use cancel::CancelCommand;
pub use category::CategoryCommand;
pub use completions::CompletionsCommand;
pub use init::InitCommand;
pub use list::ListCommand;
pub use pay::PayCommand;
pub use show::ShowCommand;
pub use show_data_dir::ShowDataDirCommand;
pub use status::StatusCommand;
pub use unit::UnitCommand;
pub use validate::ValidateCommand;
