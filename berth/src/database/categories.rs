//! Database operations for the category catalog.

use rusqlite::{params, Connection, OptionalExtension};

use crate::catalog::{Category, CategoryId};
use crate::error::{Error, Result};
use crate::money::Money;

use super::connection::Database;
use super::operations::decode_error;
use super::schema::CATEGORY_COLUMNS;

/// Deserializes a category from a row selected with [`CATEGORY_COLUMNS`].
fn row_to_category(row: &rusqlite::Row<'_>) -> rusqlite::Result<Category> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let nightly_price: u64 = row.get(2)?;
    let max_occupancy: u32 = row.get(3)?;
    let total_units: u32 = row.get(4)?;
    let amenities: String = row.get(5)?;
    let description: Option<String> = row.get(6)?;

    let id = CategoryId::new(id).map_err(|e| decode_error(0, e))?;
    let amenities: Vec<String> =
        serde_json::from_str(&amenities).map_err(|e| decode_error(5, e))?;

    Category::builder(id, name)
        .nightly_price(Money::from_minor(nightly_price))
        .max_occupancy(max_occupancy)
        .total_units(total_units)
        .amenities(amenities)
        .description(description)
        .build()
        .map_err(|e| decode_error(1, e))
}

const UPSERT_CATEGORY: &str = r"
    INSERT INTO categories
    (id, name, nightly_price, max_occupancy, total_units, amenities, description)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
    ON CONFLICT(id) DO UPDATE SET
        name = excluded.name,
        nightly_price = excluded.nightly_price,
        max_occupancy = excluded.max_occupancy,
        total_units = excluded.total_units,
        amenities = excluded.amenities,
        description = excluded.description
";

const COUNT_CATEGORY_USAGE: &str = r"
    SELECT
        (SELECT COUNT(*) FROM units WHERE category_id = ?1),
        (SELECT COUNT(*) FROM reservations WHERE category_id = ?1)
";

/// How many rows reference a category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryUsage {
    /// Registered units of the category.
    pub units: u32,
    /// Reservations of the category, in any status.
    pub reservations: u32,
}

impl CategoryUsage {
    /// Whether nothing references the category.
    #[must_use]
    pub const fn is_unused(&self) -> bool {
        self.units == 0 && self.reservations == 0
    }
}

impl Database {
    /// Creates or replaces a category.
    ///
    /// Returns `true` if the category was newly created.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn upsert_category(conn: &Connection, category: &Category) -> Result<bool> {
        let existed = Self::get_category(conn, category.id())?.is_some();
        let amenities = serde_json::to_string(category.amenities()).map_err(|e| {
            Error::Validation {
                field: "amenities".into(),
                message: format!("cannot encode amenities: {e}"),
            }
        })?;

        conn.execute(
            UPSERT_CATEGORY,
            params![
                category.id().as_str(),
                category.name(),
                category.nightly_price().minor_units(),
                category.max_occupancy(),
                category.total_units(),
                amenities,
                category.description(),
            ],
        )?;

        Ok(!existed)
    }

    /// Gets a category by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails (other than "not found").
    pub fn get_category(conn: &Connection, id: &CategoryId) -> Result<Option<Category>> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?");
        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt
            .query_row(params![id.as_str()], row_to_category)
            .optional()?)
    }

    /// Like [`Database::get_category`], but a missing category is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the category does not exist.
    pub fn require_category(conn: &Connection, id: &CategoryId) -> Result<Category> {
        Self::get_category(conn, id)?.ok_or_else(|| Error::not_found(format!("category '{id}'")))
    }

    /// Lists all categories ordered by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_categories(conn: &Connection) -> Result<Vec<Category>> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM categories ORDER BY id");
        let mut stmt = conn.prepare_cached(&sql)?;
        let categories = stmt
            .query_map([], row_to_category)?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(categories)
    }

    /// Counts what references a category.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn category_usage(conn: &Connection, id: &CategoryId) -> Result<CategoryUsage> {
        Ok(conn.query_row(COUNT_CATEGORY_USAGE, params![id.as_str()], |row| {
            Ok(CategoryUsage {
                units: row.get(0)?,
                reservations: row.get(1)?,
            })
        })?)
    }

    /// Deletes an unreferenced category.
    ///
    /// Returns `false` if the category did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] if units or reservations still reference it.
    pub fn delete_category(conn: &Connection, id: &CategoryId) -> Result<bool> {
        let usage = Self::category_usage(conn, id)?;
        if !usage.is_unused() {
            return Err(Error::conflict(format!(
                "category '{id}' is referenced by {} unit(s) and {} reservation(s)",
                usage.units, usage.reservations
            )));
        }

        let rows = conn.execute("DELETE FROM categories WHERE id = ?", params![id.as_str()])?;
        Ok(rows > 0)
    }
}
