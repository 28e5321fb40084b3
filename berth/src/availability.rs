//! Availability calculation for a category over a stay.
//!
//! A category's free count is its unit total minus the pending and
//! confirmed reservations overlapping the stay. The answer is only an
//! estimate outside a write transaction; the booking executor repeats the
//! calculation after taking the database write lock.

use rusqlite::Connection;
use serde::Serialize;

use crate::catalog::{Category, CategoryId};
use crate::config::InventorySource;
use crate::database::Database;
use crate::error::{Error, Result};
use crate::money::Money;
use crate::stay::StayDates;

/// A request to check availability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuery {
    /// Requested category.
    pub category: CategoryId,
    /// Normalized stay.
    pub stay: StayDates,
    /// Number of guests.
    pub guests: u32,
}

impl AvailabilityQuery {
    /// Creates a query.
    #[must_use]
    pub const fn new(category: CategoryId, stay: StayDates, guests: u32) -> Self {
        Self {
            category,
            stay,
            guests,
        }
    }
}

/// Result of an availability check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Availability {
    /// Category checked.
    pub category: String,
    /// Units free for the stay.
    pub available_count: u32,
    /// Units the category has in total.
    pub total_count: u32,
    /// Pending and confirmed reservations overlapping the stay.
    pub overlapping: u32,
    /// Nightly price of the category.
    pub nightly_price: Money,
}

impl Availability {
    /// Whether at least one unit is free.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.available_count > 0
    }
}

/// Rejects a guest count above the category's maximum occupancy.
///
/// # Errors
///
/// Returns [`Error::CapacityExceeded`].
pub fn check_capacity(category: &Category, guests: u32) -> Result<()> {
    if guests > category.max_occupancy() {
        return Err(Error::CapacityExceeded {
            category: category.id().to_string(),
            requested: guests,
            maximum: category.max_occupancy(),
        });
    }
    Ok(())
}

/// Unit total for a category under the given inventory source.
///
/// # Errors
///
/// Returns an error if the unit count query fails.
pub fn total_units(conn: &Connection, category: &Category, source: InventorySource) -> Result<u32> {
    match source {
        InventorySource::Units => Database::count_active_units(conn, category.id()),
        InventorySource::Catalog => Ok(category.total_units()),
    }
}

/// Computes availability for an already resolved category.
///
/// # Errors
///
/// Returns [`Error::CapacityExceeded`] if the guests do not fit, or a
/// database error.
pub fn evaluate(
    conn: &Connection,
    category: &Category,
    stay: &StayDates,
    guests: u32,
    source: InventorySource,
) -> Result<Availability> {
    check_capacity(category, guests)?;

    let total_count = total_units(conn, category, source)?;
    let overlapping = Database::count_overlapping(conn, category.id(), stay, None)?;

    Ok(Availability {
        category: category.id().to_string(),
        available_count: total_count.saturating_sub(overlapping),
        total_count,
        overlapping,
        nightly_price: category.nightly_price(),
    })
}

/// Checks availability for a query.
///
/// # Errors
///
/// Returns [`Error::NotFound`] for an unknown category,
/// [`Error::CapacityExceeded`] if the guests do not fit, or a database
/// error.
///
/// # Examples
///
/// ```no_run
/// use berth::availability::{check, AvailabilityQuery};
/// use berth::config::InventorySource;
/// use berth::stay::StayPolicy;
/// use berth::{CategoryId, Database, DatabaseConfig};
/// use chrono::NaiveDate;
///
/// let db = Database::open(DatabaseConfig::new("/tmp/berth.db")).unwrap();
/// let stay = StayPolicy::default()
///     .stay(
///         NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
///         NaiveDate::from_ymd_opt(2024, 12, 27).unwrap(),
///     )
///     .unwrap();
/// let query = AvailabilityQuery::new(CategoryId::new("standard").unwrap(), stay, 2);
///
/// let report = check(db.connection(), &query, InventorySource::Units).unwrap();
/// println!("{} of {} free", report.available_count, report.total_count);
/// ```
pub fn check(
    conn: &Connection,
    query: &AvailabilityQuery,
    source: InventorySource,
) -> Result<Availability> {
    let category = Database::require_category(conn, &query.category)?;
    let report = evaluate(conn, &category, &query.stay, query.guests, source)?;

    log::debug!(
        "Availability for '{}' {} to {}: {}/{} free",
        report.category,
        query.stay.check_in_date(),
        query.stay.check_out_date(),
        report.available_count,
        report.total_count
    );

    Ok(report)
}
