//! Shared test utilities for database unit tests.

use chrono::{NaiveDate, Utc};
use rusqlite::Connection;
use tempfile::tempdir;

use crate::catalog::{Category, CategoryId};
use crate::database::{Database, DatabaseConfig};
use crate::money::Money;
use crate::reservation::{BookingRef, Guest, ReservationDraft, ReservationId};
use crate::stay::{StayDates, StayPolicy};
use crate::unit::{NewUnit, UnitId};

/// Creates a temporary test database that will be cleaned up automatically.
///
/// # Panics
///
/// Panics if the temporary directory or database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let db = Database::open(DatabaseConfig::new(path)).unwrap();

    // Keep the directory alive for the lifetime of the test process
    std::mem::forget(dir);

    db
}

/// Stores a category holding two guests with the given nightly price
/// (major units) and catalog total.
pub fn seed_category(conn: &Connection, id: &str, nightly: u64, total_units: u32) {
    let category = Category::builder(CategoryId::new(id).unwrap(), id.to_uppercase())
        .nightly_price(Money::from_major(nightly))
        .max_occupancy(2)
        .total_units(total_units)
        .build()
        .unwrap();
    Database::upsert_category(conn, &category).unwrap();
}

/// Registers an available unit.
pub fn seed_unit(conn: &Connection, category: &str, code: &str) -> UnitId {
    let unit = NewUnit::new(CategoryId::new(category).unwrap(), code).unwrap();
    Database::insert_unit(conn, &unit).unwrap()
}

/// A December 2024 stay from day `from` to day `to`.
#[must_use]
pub fn stay(from: u32, to: u32) -> StayDates {
    let day = |d| NaiveDate::from_ymd_opt(2024, 12, d).unwrap();
    StayPolicy::default().stay(day(from), day(to)).unwrap()
}

/// A pending, unpaid single-guest draft.
#[must_use]
pub fn draft(reference: &str, category: &str, stay: StayDates) -> ReservationDraft {
    ReservationDraft::builder(
        BookingRef::new(reference).unwrap(),
        Guest::new("Test Guest", "guest@example.com", "555-0100").unwrap(),
        stay,
        CategoryId::new(category).unwrap(),
    )
    .total_price(Money::from_major(240))
    .build()
    .unwrap()
}

/// Inserts a draft, panicking on a reference collision.
pub fn insert_draft(conn: &Connection, draft: &ReservationDraft) -> ReservationId {
    Database::insert_reservation(conn, draft, Utc::now())
        .unwrap()
        .unwrap()
}
