//! Database operations for the unit registry.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use crate::catalog::CategoryId;
use crate::error::{Error, Result};
use crate::reservation::ReservationId;
use crate::stay::StayDates;
use crate::unit::{NewUnit, Unit, UnitId, UnitStatus};

use super::connection::Database;
use super::operations::{decode_error, from_millis, is_unique_violation, to_millis};
use super::schema::UNIT_COLUMNS;

/// Deserializes a unit from a row selected with [`UNIT_COLUMNS`].
fn row_to_unit(row: &rusqlite::Row<'_>) -> rusqlite::Result<Unit> {
    let id: i64 = row.get(0)?;
    let category: String = row.get(1)?;
    let code: String = row.get(2)?;
    let status: String = row.get(3)?;
    let active: bool = row.get(4)?;
    let floor: Option<String> = row.get(5)?;
    let location: Option<String> = row.get(6)?;
    let last_cleaned: Option<i64> = row.get(7)?;

    let category = CategoryId::new(category).map_err(|e| decode_error(1, e))?;
    let status: UnitStatus = status.parse().map_err(|e| decode_error(3, e))?;
    let unit = NewUnit::new(category, code)
        .map_err(|e| decode_error(2, e))?
        .status(status)
        .floor(floor)
        .location(location);
    let last_cleaned_at = last_cleaned.map(|ms| from_millis(7, ms)).transpose()?;

    Ok(Unit::from_parts(UnitId::new(id), unit, active, last_cleaned_at))
}

const INSERT_UNIT: &str = r"
    INSERT INTO units (category_id, code, status, active, floor, location)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
";

const COUNT_ASSIGNABLE: &str = r"
    SELECT COUNT(*) FROM units
    WHERE category_id = ? AND active = 1 AND status IN ('available', 'cleaning')
";

const COUNT_ACTIVE: &str = "SELECT COUNT(*) FROM units WHERE category_id = ? AND active = 1";

// Candidates for automatic assignment: assignable and not bound to an
// overlapping pending or confirmed reservation.
const SELECT_FREE_UNIT: &str = r"
    SELECT u.id FROM units u
    WHERE u.category_id = ?1
      AND u.active = 1
      AND u.status IN ('available', 'cleaning')
      AND NOT EXISTS (
          SELECT 1 FROM reservations r
          WHERE r.unit_id = u.id
            AND r.status IN ('pending', 'confirmed')
            AND r.check_in < ?3
            AND r.check_out > ?2
            AND r.id <> ?4
      )
    ORDER BY u.code
    LIMIT 1
";

impl Database {
    /// Registers a unit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] if the code is taken, [`Error::NotFound`]
    /// if the category does not exist, or an error if the insert fails.
    pub fn insert_unit(conn: &Connection, unit: &NewUnit) -> Result<UnitId> {
        Self::require_category(conn, unit.category())?;

        let result = conn.execute(
            INSERT_UNIT,
            params![
                unit.category().as_str(),
                unit.code(),
                unit.initial_status().as_str(),
                unit.active_value(),
                unit.floor_value(),
                unit.location_value(),
            ],
        );

        match result {
            Ok(_) => Ok(UnitId::new(conn.last_insert_rowid())),
            Err(e) if is_unique_violation(&e) => Err(Error::conflict(format!(
                "unit code '{}' is already registered",
                unit.code()
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Gets a unit by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails (other than "not found").
    pub fn get_unit(conn: &Connection, id: UnitId) -> Result<Option<Unit>> {
        let sql = format!("SELECT {UNIT_COLUMNS} FROM units WHERE id = ?");
        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt.query_row(params![id.value()], row_to_unit).optional()?)
    }

    /// Like [`Database::get_unit`], but a missing unit is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the unit does not exist.
    pub fn require_unit(conn: &Connection, id: UnitId) -> Result<Unit> {
        Self::get_unit(conn, id)?.ok_or_else(|| Error::not_found(format!("unit {id}")))
    }

    /// Gets a unit by its code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails (other than "not found").
    pub fn get_unit_by_code(conn: &Connection, code: &str) -> Result<Option<Unit>> {
        let sql = format!("SELECT {UNIT_COLUMNS} FROM units WHERE code = ?");
        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt.query_row(params![code.trim()], row_to_unit).optional()?)
    }

    /// Lists units ordered by code, optionally for one category and
    /// optionally only active ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_units(
        conn: &Connection,
        category: Option<&CategoryId>,
        active_only: bool,
    ) -> Result<Vec<Unit>> {
        let sql = format!(
            r"SELECT {UNIT_COLUMNS} FROM units
              WHERE (?1 IS NULL OR category_id = ?1)
                AND (?2 = 0 OR active = 1)
              ORDER BY code"
        );
        let mut stmt = conn.prepare_cached(&sql)?;
        let units = stmt
            .query_map(
                params![category.map(CategoryId::as_str), active_only],
                row_to_unit,
            )?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;
        Ok(units)
    }

    /// Counts active units of a category whose status allows assignment.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_assignable_units(conn: &Connection, category: &CategoryId) -> Result<u32> {
        let count: u32 =
            conn.query_row(COUNT_ASSIGNABLE, params![category.as_str()], |row| row.get(0))?;
        Ok(count)
    }

    /// Counts active units of a category regardless of status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_active_units(conn: &Connection, category: &CategoryId) -> Result<u32> {
        let count: u32 =
            conn.query_row(COUNT_ACTIVE, params![category.as_str()], |row| row.get(0))?;
        Ok(count)
    }

    /// Picks the first assignable unit (by code) with no binding that overlaps
    /// `stay`, ignoring the binding of reservation `exclude`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_free_unit(
        conn: &Connection,
        category: &CategoryId,
        stay: &StayDates,
        exclude: ReservationId,
    ) -> Result<Option<UnitId>> {
        let mut stmt = conn.prepare_cached(SELECT_FREE_UNIT)?;
        let id: Option<i64> = stmt
            .query_row(
                params![
                    category.as_str(),
                    stay.check_in_key(),
                    stay.check_out_key(),
                    exclude.value()
                ],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id.map(UnitId::new))
    }

    /// Sets a unit's operational status.
    ///
    /// Returns `false` if the unit does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_unit_status(conn: &Connection, id: UnitId, status: UnitStatus) -> Result<bool> {
        let rows = conn.execute(
            "UPDATE units SET status = ? WHERE id = ?",
            params![status.as_str(), id.value()],
        )?;
        Ok(rows > 0)
    }

    /// Sets the active flag.
    ///
    /// Returns `false` if the unit does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_unit_active(conn: &Connection, id: UnitId, active: bool) -> Result<bool> {
        let rows = conn.execute(
            "UPDATE units SET active = ? WHERE id = ?",
            params![active, id.value()],
        )?;
        Ok(rows > 0)
    }

    /// Stamps `last_cleaned_at` and returns the unit to `available`.
    ///
    /// Returns `false` if the unit does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn mark_unit_cleaned(conn: &Connection, id: UnitId, now: DateTime<Utc>) -> Result<bool> {
        let rows = conn.execute(
            "UPDATE units SET status = 'available', last_cleaned_at = ? WHERE id = ?",
            params![to_millis(now), id.value()],
        )?;
        Ok(rows > 0)
    }

    /// Deletes a unit that no pending or confirmed reservation is bound to.
    ///
    /// Bindings on cancelled or completed reservations are cleared first.
    /// Returns `false` if the unit did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] while an active reservation is bound to it.
    pub fn delete_unit(conn: &Connection, id: UnitId) -> Result<bool> {
        let active = Self::count_active_bindings(conn, id)?;
        if active > 0 {
            return Err(Error::conflict(format!(
                "unit {id} is bound to {active} active reservation(s); deactivate it instead"
            )));
        }

        let cleared = Self::clear_unit_history(conn, id)?;
        if cleared > 0 {
            log::debug!("Cleared unit {id} from {cleared} historical reservation(s)");
        }

        let rows = conn.execute("DELETE FROM units WHERE id = ?", params![id.value()])?;
        Ok(rows > 0)
    }
}
