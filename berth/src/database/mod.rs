//! SQLite-backed store for categories, units and reservations.
//!
//! This module provides connection management, schema versioning and the
//! queries the availability calculator and the operation executor build on.
//! Query functions take a `&Connection` so they can run inside an open
//! transaction.
//!
//! # Examples
//!
//! ```no_run
//! use berth::database::{Database, DatabaseConfig};
//!
//! let db = Database::open(DatabaseConfig::new("/tmp/berth.db")).unwrap();
//!
//! for category in Database::list_categories(db.connection()).unwrap() {
//!     println!("{} {}", category.id(), category.nightly_price());
//! }
//! ```

mod categories;
mod config;
mod connection;
pub mod migrations;
mod operations;
mod schema;
mod transaction;
mod units;

#[cfg(test)]
pub(crate) mod test_util;

// Re-export public API
pub use categories::CategoryUsage;
pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE,
    DATA_DIR_ENV,
};
pub use connection::Database;
pub use operations::ReservationFilter;
pub use transaction::ImportSummary;

// Re-export migration functions for advanced use cases
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
