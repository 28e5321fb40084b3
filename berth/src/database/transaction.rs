//! Batch operations that run in a single transaction.

use crate::catalog::Category;
use crate::error::Result;
use crate::unit::NewUnit;

use super::connection::Database;

/// What a catalog import changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Categories that did not exist before.
    pub categories_created: usize,
    /// Existing categories that were overwritten.
    pub categories_updated: usize,
    /// Units registered.
    pub units_created: usize,
    /// Units skipped because their code was already registered.
    pub units_skipped: usize,
}

impl Database {
    /// Imports categories and units atomically.
    ///
    /// Categories are upserted before units so a unit may reference a
    /// category from the same batch. Units whose code is already registered
    /// are left untouched. Either everything is written or nothing is.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The transaction cannot be started
    /// - A unit references an unknown category
    /// - Any write fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use berth::database::{Database, DatabaseConfig};
    /// use berth::{Category, Money, NewUnit};
    ///
    /// let mut db = Database::open(DatabaseConfig::new("/tmp/berth.db")).unwrap();
    ///
    /// let standard = Category::builder("standard".parse().unwrap(), "Standard Room")
    ///     .nightly_price(Money::from_major(120))
    ///     .max_occupancy(2)
    ///     .total_units(2)
    ///     .build()
    ///     .unwrap();
    /// let units = vec![
    ///     NewUnit::new("standard".parse().unwrap(), "101").unwrap(),
    ///     NewUnit::new("standard".parse().unwrap(), "102").unwrap(),
    /// ];
    ///
    /// let summary = db.import_catalog(&[standard], &units).unwrap();
    /// assert_eq!(summary.units_created, 2);
    /// ```
    pub fn import_catalog(
        &mut self,
        categories: &[Category],
        units: &[NewUnit],
    ) -> Result<ImportSummary> {
        let tx = self.begin_immediate()?;
        let mut summary = ImportSummary::default();

        for category in categories {
            if Self::upsert_category(&tx, category)? {
                summary.categories_created += 1;
            } else {
                summary.categories_updated += 1;
            }
        }

        for unit in units {
            if Self::get_unit_by_code(&tx, unit.code())?.is_some() {
                log::debug!("Unit '{}' already registered, skipping", unit.code());
                summary.units_skipped += 1;
                continue;
            }
            Self::insert_unit(&tx, unit)?;
            summary.units_created += 1;
        }

        tx.commit()?;
        Ok(summary)
    }
}
