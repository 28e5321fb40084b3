//! Common test utilities for integration tests.
//!
//! Helpers here build engines over a throwaway database with a small
//! two-category catalog, and booking requests with sensible defaults.

use std::path::{Path, PathBuf};

use berth::config::Config;
use berth::operations::BookingOptions;
use berth::{
    Category, CategoryId, Database, DatabaseConfig, Money, NewUnit, ReservationEngine,
};
use chrono::NaiveDate;

/// The day integration tests treat as today.
#[allow(dead_code)]
pub const TODAY: (i32, u32, u32) = (2024, 12, 1);

/// A December 2024 day.
#[allow(dead_code)]
pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, d).unwrap()
}

/// Creates a database file in a temporary directory that outlives the test.
#[allow(dead_code)]
pub fn temp_db_path() -> PathBuf {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("berth.db");
    // Keep the directory alive for the lifetime of the test process
    std::mem::forget(dir);
    path
}

/// Stores `standard` (120/night, 2 guests) and `suite` (280/night, 4 guests)
/// with `units` active units each.
#[allow(dead_code)]
pub fn seed_catalog(path: &Path, units: u32) {
    let mut db = Database::open(DatabaseConfig::new(path)).unwrap();
    let standard = Category::builder(category("standard"), "Desert Standard")
        .nightly_price(Money::from_major(120))
        .max_occupancy(2)
        .total_units(units)
        .build()
        .unwrap();
    let suite = Category::builder(category("suite"), "Desert Suite")
        .nightly_price(Money::from_major(280))
        .max_occupancy(4)
        .total_units(units)
        .build()
        .unwrap();

    let mut new_units = Vec::new();
    for n in 1..=units {
        new_units.push(NewUnit::new(category("standard"), format!("S{n:03}")).unwrap());
        new_units.push(NewUnit::new(category("suite"), format!("SU{n:02}")).unwrap());
    }
    db.import_catalog(&[standard, suite], &new_units).unwrap();
}

/// Opens an engine on `path` with the default configuration.
#[allow(dead_code)]
pub fn open_engine(path: &Path) -> ReservationEngine {
    open_engine_with(path, Config::default())
}

/// Opens an engine on `path` with the given configuration.
#[allow(dead_code)]
pub fn open_engine_with(path: &Path, config: Config) -> ReservationEngine {
    let (y, m, d) = TODAY;
    let db_config = DatabaseConfig::new(path).with_busy_timeout(config.lock_wait());
    ReservationEngine::open(db_config, config)
        .unwrap()
        .with_today(NaiveDate::from_ymd_opt(y, m, d).unwrap())
}

/// A fresh engine over a seeded catalog.
#[allow(dead_code)]
pub fn seeded_engine(units: u32) -> ReservationEngine {
    let path = temp_db_path();
    seed_catalog(&path, units);
    open_engine(&path)
}

/// Parses a category id.
#[allow(dead_code)]
pub fn category(id: &str) -> CategoryId {
    CategoryId::new(id).unwrap()
}

/// A single-guest request for `category` from day `from` to day `to`.
#[allow(dead_code)]
pub fn request(category_id: &str, from: u32, to: u32) -> BookingOptions {
    BookingOptions::new(
        "Test Guest",
        "guest@example.com",
        "555-0100",
        category(category_id),
        day(from),
        day(to),
    )
}
