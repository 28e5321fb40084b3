//! Database operations for reservations.
//!
//! Everything here is a static function over a [`Connection`] so it runs the
//! same on a plain connection and inside an open transaction. Callers that
//! mutate state open a `BEGIN IMMEDIATE` transaction first (see
//! [`Database::begin_immediate`]).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};

use crate::catalog::CategoryId;
use crate::error::{Error, Result};
use crate::money::Money;
use crate::reservation::{
    AddOn, BookingRef, Guest, PaymentStatus, Reservation, ReservationDraft, ReservationId,
    ReservationSelector, ReservationStatus,
};
use crate::stay::{StayDates, STORAGE_FORMAT};
use crate::unit::UnitId;

use super::connection::Database;
use super::schema::RESERVATION_COLUMNS;

/// Converts a UTC timestamp to Unix milliseconds for storage.
pub(super) fn to_millis(time: DateTime<Utc>) -> i64 {
    time.timestamp_millis()
}

/// Converts stored Unix milliseconds back to a UTC timestamp.
pub(super) fn from_millis(column: usize, millis: i64) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or(rusqlite::Error::IntegralValueOutOfRange(column, millis))
}

/// Wraps a domain parse failure raised while decoding column `column`.
pub(super) fn decode_error<E>(column: usize, err: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(err))
}

/// Whether an error is a UNIQUE constraint violation.
pub(super) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn parse_instant(column: usize, text: &str) -> rusqlite::Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(text, STORAGE_FORMAT).map_err(|e| decode_error(column, e))
}

/// Deserializes a reservation from a row selected with [`RESERVATION_COLUMNS`].
fn row_to_reservation(row: &rusqlite::Row<'_>) -> rusqlite::Result<Reservation> {
    let id: i64 = row.get(0)?;
    let booking_ref: String = row.get(1)?;
    let guest_name: String = row.get(2)?;
    let guest_email: String = row.get(3)?;
    let guest_phone: String = row.get(4)?;
    let check_in: String = row.get(5)?;
    let check_out: String = row.get(6)?;
    let guest_count: u32 = row.get(7)?;
    let category: String = row.get(8)?;
    let total_price: u64 = row.get(9)?;
    let status: String = row.get(10)?;
    let payment_status: String = row.get(11)?;
    let unit: Option<i64> = row.get(12)?;
    let special_requests: Option<String> = row.get(13)?;
    let add_ons: String = row.get(14)?;
    let created_at: i64 = row.get(15)?;
    let updated_at: i64 = row.get(16)?;

    let booking_ref = BookingRef::new(booking_ref).map_err(|e| decode_error(1, e))?;
    let guest =
        Guest::new(guest_name, guest_email, guest_phone).map_err(|e| decode_error(2, e))?;
    let stay = StayDates::from_instants(parse_instant(5, &check_in)?, parse_instant(6, &check_out)?)
        .map_err(|e| decode_error(5, e))?;
    let category = CategoryId::new(category).map_err(|e| decode_error(8, e))?;
    let status: ReservationStatus = status.parse().map_err(|e| decode_error(10, e))?;
    let payment_status: PaymentStatus =
        payment_status.parse().map_err(|e| decode_error(11, e))?;
    let add_ons: Vec<AddOn> = serde_json::from_str(&add_ons).map_err(|e| decode_error(14, e))?;

    let draft = ReservationDraft::builder(booking_ref, guest, stay, category)
        .guest_count(guest_count)
        .total_price(Money::from_minor(total_price))
        .payment_status(payment_status)
        .status(status)
        .special_requests(special_requests)
        .add_ons(add_ons)
        .build()
        .map_err(|e| decode_error(10, e))?;

    Ok(Reservation::from_parts(
        ReservationId::new(id),
        draft,
        unit.map(UnitId::new),
        from_millis(15, created_at)?,
        from_millis(16, updated_at)?,
    ))
}

const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations
    (booking_ref, guest_name, guest_email, guest_phone, check_in, check_out, guest_count,
     category_id, total_price, status, payment_status, unit_id, special_requests, add_ons,
     created_at, updated_at)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, NULL, ?12, ?13, ?14, ?14)
";

const COUNT_OVERLAPPING: &str = r"
    SELECT COUNT(*) FROM reservations
    WHERE category_id = ?1
      AND status IN ('pending', 'confirmed')
      AND check_in < ?3
      AND check_out > ?2
      AND (?4 IS NULL OR id <> ?4)
";

const SELECT_UNIT_CONFLICT: &str = r"
    SELECT booking_ref FROM reservations
    WHERE unit_id = ?1
      AND status IN ('pending', 'confirmed')
      AND check_in < ?3
      AND check_out > ?2
      AND id <> ?4
    LIMIT 1
";

const UPDATE_STATE: &str = r"
    UPDATE reservations
    SET status = ?2, payment_status = ?3, updated_at = ?4
    WHERE id = ?1
";

const UPDATE_UNIT: &str = r"
    UPDATE reservations
    SET unit_id = ?2, updated_at = ?3
    WHERE id = ?1
";

const COUNT_ACTIVE_FOR_UNIT: &str = r"
    SELECT COUNT(*) FROM reservations
    WHERE unit_id = ? AND status IN ('pending', 'confirmed')
";

const CLEAR_UNIT_HISTORY: &str = "UPDATE reservations SET unit_id = NULL WHERE unit_id = ?";

/// Filter for [`Database::list_reservations`]. Unset fields match everything.
///
/// The check-in window is inclusive on both ends and compares calendar days.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservationFilter {
    /// Only reservations in this status.
    pub status: Option<ReservationStatus>,
    /// Only reservations with this payment status.
    pub payment_status: Option<PaymentStatus>,
    /// Only reservations of this category.
    pub category: Option<CategoryId>,
    /// Only reservations checking in on or after this day.
    pub check_in_from: Option<NaiveDate>,
    /// Only reservations checking in on or before this day.
    pub check_in_to: Option<NaiveDate>,
    /// Return at most this many reservations.
    pub limit: Option<u32>,
}

impl Database {
    /// Inserts a new reservation and returns its storage key.
    ///
    /// Returns `Ok(None)` if the booking reference is already taken, so the
    /// caller can mint a new one.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails for any other reason, including
    /// a missing category.
    pub fn insert_reservation(
        conn: &Connection,
        draft: &ReservationDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<ReservationId>> {
        let add_ons = serde_json::to_string(draft.add_ons()).map_err(|e| Error::Validation {
            field: "add_ons".into(),
            message: format!("cannot encode add-ons: {e}"),
        })?;

        let result = conn.execute(
            INSERT_RESERVATION,
            params![
                draft.booking_ref().as_str(),
                draft.guest().name(),
                draft.guest().email(),
                draft.guest().phone(),
                draft.stay().check_in_key(),
                draft.stay().check_out_key(),
                draft.guest_count(),
                draft.category().as_str(),
                draft.total_price().minor_units(),
                draft.status().as_str(),
                draft.payment_status().as_str(),
                draft.special_requests(),
                add_ons,
                to_millis(now),
            ],
        );

        match result {
            Ok(_) => Ok(Some(ReservationId::new(conn.last_insert_rowid()))),
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Gets a reservation by storage key.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails (other than "not found").
    pub fn get_reservation(conn: &Connection, id: ReservationId) -> Result<Option<Reservation>> {
        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = ?");
        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt
            .query_row(params![id.value()], row_to_reservation)
            .optional()?)
    }

    /// Gets a reservation by booking reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails (other than "not found").
    pub fn get_reservation_by_ref(
        conn: &Connection,
        reference: &BookingRef,
    ) -> Result<Option<Reservation>> {
        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE booking_ref = ?");
        let mut stmt = conn.prepare_cached(&sql)?;
        Ok(stmt
            .query_row(params![reference.as_str()], row_to_reservation)
            .optional()?)
    }

    /// Gets a reservation by id or booking reference.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails (other than "not found").
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use berth::database::{Database, DatabaseConfig};
    ///
    /// let db = Database::open(DatabaseConfig::new("/tmp/berth.db")).unwrap();
    /// let selector = "BK12345678X7Q".parse().unwrap();
    /// let found = Database::find_reservation(db.connection(), &selector).unwrap();
    /// ```
    pub fn find_reservation(
        conn: &Connection,
        selector: &ReservationSelector,
    ) -> Result<Option<Reservation>> {
        match selector {
            ReservationSelector::Id(id) => Self::get_reservation(conn, *id),
            ReservationSelector::Reference(reference) => {
                Self::get_reservation_by_ref(conn, reference)
            }
        }
    }

    /// Like [`Database::find_reservation`], but a missing reservation is an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if nothing matches.
    pub fn require_reservation(
        conn: &Connection,
        selector: &ReservationSelector,
    ) -> Result<Reservation> {
        Self::find_reservation(conn, selector)?.ok_or_else(|| Error::not_found(selector.to_string()))
    }

    /// Lists reservations matching the filter, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_reservations(
        conn: &Connection,
        filter: &ReservationFilter,
    ) -> Result<Vec<Reservation>> {
        let sql = format!(
            r"SELECT {RESERVATION_COLUMNS} FROM reservations
              WHERE (?1 IS NULL OR status = ?1)
                AND (?2 IS NULL OR payment_status = ?2)
                AND (?3 IS NULL OR category_id = ?3)
                AND (?4 IS NULL OR substr(check_in, 1, 10) >= ?4)
                AND (?5 IS NULL OR substr(check_in, 1, 10) <= ?5)
              ORDER BY created_at DESC, id DESC
              LIMIT ?6"
        );
        let mut stmt = conn.prepare_cached(&sql)?;

        let day = |d: NaiveDate| d.format("%Y-%m-%d").to_string();
        let reservations = stmt
            .query_map(
                params![
                    filter.status.map(ReservationStatus::as_str),
                    filter.payment_status.map(PaymentStatus::as_str),
                    filter.category.as_ref().map(CategoryId::as_str),
                    filter.check_in_from.map(day),
                    filter.check_in_to.map(day),
                    filter.limit.map_or(-1, i64::from),
                ],
                row_to_reservation,
            )?
            .collect::<std::result::Result<Vec<_>, rusqlite::Error>>()?;

        Ok(reservations)
    }

    /// Counts inventory-holding reservations of a category that overlap the stay.
    ///
    /// Pass `exclude` to leave one reservation out of the count.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_overlapping(
        conn: &Connection,
        category: &CategoryId,
        stay: &StayDates,
        exclude: Option<ReservationId>,
    ) -> Result<u32> {
        let mut stmt = conn.prepare_cached(COUNT_OVERLAPPING)?;
        let count: u32 = stmt.query_row(
            params![
                category.as_str(),
                stay.check_in_key(),
                stay.check_out_key(),
                exclude.map(ReservationId::value),
            ],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Finds another inventory-holding reservation bound to `unit` whose stay
    /// overlaps `stay`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn unit_binding_conflict(
        conn: &Connection,
        unit: UnitId,
        stay: &StayDates,
        exclude: ReservationId,
    ) -> Result<Option<BookingRef>> {
        let mut stmt = conn.prepare_cached(SELECT_UNIT_CONFLICT)?;
        let reference: Option<String> = stmt
            .query_row(
                params![
                    unit.value(),
                    stay.check_in_key(),
                    stay.check_out_key(),
                    exclude.value()
                ],
                |row| row.get(0),
            )
            .optional()?;

        reference
            .map(|r| {
                BookingRef::new(r).map_err(|e| Error::DatabaseCorruption {
                    details: format!("stored booking reference is invalid: {e}"),
                })
            })
            .transpose()
    }

    /// Writes a new status and payment status.
    ///
    /// Returns `false` if the reservation does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails, including when the pair would
    /// break the "confirmed implies paid" constraint.
    pub fn update_reservation_state(
        conn: &Connection,
        id: ReservationId,
        status: ReservationStatus,
        payment_status: PaymentStatus,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let rows = conn.execute(
            UPDATE_STATE,
            params![
                id.value(),
                status.as_str(),
                payment_status.as_str(),
                to_millis(now)
            ],
        )?;
        Ok(rows > 0)
    }

    /// Binds a unit to a reservation, or clears the binding with `None`.
    ///
    /// Returns `false` if the reservation does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn set_unit_binding(
        conn: &Connection,
        id: ReservationId,
        unit: Option<UnitId>,
        now: DateTime<Utc>,
    ) -> Result<bool> {
        let rows = conn.execute(
            UPDATE_UNIT,
            params![id.value(), unit.map(UnitId::value), to_millis(now)],
        )?;
        Ok(rows > 0)
    }

    /// Counts pending or confirmed reservations bound to a unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_active_bindings(conn: &Connection, unit: UnitId) -> Result<u32> {
        let count: u32 =
            conn.query_row(COUNT_ACTIVE_FOR_UNIT, params![unit.value()], |row| row.get(0))?;
        Ok(count)
    }

    /// Clears the unit from every reservation that still references it.
    ///
    /// Returns the number of reservations changed.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn clear_unit_history(conn: &Connection, unit: UnitId) -> Result<usize> {
        Ok(conn.execute(CLEAR_UNIT_HISTORY, params![unit.value()])?)
    }

    /// Verifies database integrity using `PRAGMA integrity_check`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseCorruption`] if the check reports problems.
    pub fn verify_integrity(&self) -> Result<()> {
        let result: String = self
            .conn
            .query_row("PRAGMA integrity_check", [], |row| row.get(0))?;

        if result == "ok" {
            Ok(())
        } else {
            Err(Error::DatabaseCorruption {
                details: format!("Integrity check failed: {result}"),
            })
        }
    }
}
