//! Reservation operations using the plan-execute pattern.
//!
//! Every write is split into two phases:
//! 1. **Planning**: loads the current state, validates the request and
//!    produces an [`OperationPlan`] describing what would change
//! 2. **Execution**: [`PlanExecutor`] applies the plan inside one
//!    `BEGIN IMMEDIATE` transaction, re-checking the rules that depend on
//!    state another writer could have changed in between
//!
//! Planning never writes, so a plan doubles as a dry run.
//!
//! # Examples
//!
//! ```no_run
//! use berth::config::ConfigBuilder;
//! use berth::database::{Database, DatabaseConfig};
//! use berth::operations::{BookingOptions, BookingPlan, PlanExecutor};
//! use chrono::NaiveDate;
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/berth.db")).unwrap();
//! let config = ConfigBuilder::new().build().unwrap();
//!
//! let options = BookingOptions::new(
//!     "Ada Lovelace",
//!     "ada@example.com",
//!     "+44 20 7946 0000",
//!     "standard".parse().unwrap(),
//!     NaiveDate::from_ymd_opt(2030, 12, 25).unwrap(),
//!     NaiveDate::from_ymd_opt(2030, 12, 27).unwrap(),
//! )
//! .with_guests(2);
//!
//! // Generate plan
//! let plan = BookingPlan::new(options, &config).build_plan(&db).unwrap();
//!
//! // Execute plan
//! let result = PlanExecutor::new(&mut db)
//!     .with_config(&config)
//!     .execute(&plan)
//!     .unwrap();
//! println!("{}", result.reservation.unwrap().booking_ref());
//! ```

pub mod assign;
pub mod cancel;
pub mod create;
pub mod executor;
pub mod init;
pub mod plan;
pub mod seed;
pub mod status;

#[cfg(test)]
mod proptests;

pub use assign::{AssignOptions, AssignPlan, UnbindPlan};
pub use cancel::CancelPlan;
pub use create::{BookingOptions, BookingPlan};
pub use executor::{ExecutionResult, PlanExecutor};
pub use init::{init_database, InitOptions, InitResult};
pub use plan::{OperationPlan, PlanAction};
pub use seed::{import_seed, resolve_seed, SeedCatalog, SeedReport};
pub use status::{PaymentOptions, PaymentPlan, StatusOptions, StatusPlan};
