//! Database schema definitions and SQL constants.
//!
//! Stay instants are stored as `YYYY-MM-DDTHH:MM:SS` text so range predicates
//! compare lexicographically. Money is stored in minor units and timestamps
//! as Unix milliseconds.

/// Current schema version for the database.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Key/value metadata, including the schema version.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// Room categories.
pub const CREATE_CATEGORIES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS categories (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        nightly_price INTEGER NOT NULL CHECK (nightly_price >= 0),
        max_occupancy INTEGER NOT NULL CHECK (max_occupancy > 0),
        total_units INTEGER NOT NULL CHECK (total_units >= 0),
        amenities TEXT NOT NULL DEFAULT '[]',
        description TEXT
    )";

/// Physical units. `code` is unique across the property.
pub const CREATE_UNITS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS units (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category_id TEXT NOT NULL REFERENCES categories(id),
        code TEXT NOT NULL UNIQUE,
        status TEXT NOT NULL,
        active INTEGER NOT NULL DEFAULT 1,
        floor TEXT,
        location TEXT,
        last_cleaned_at INTEGER
    )";

/// Reservations.
///
/// The CHECK constraints repeat the two state rules the engine enforces:
/// stays are non-empty, and a confirmed reservation is paid.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        booking_ref TEXT NOT NULL UNIQUE,
        guest_name TEXT NOT NULL,
        guest_email TEXT NOT NULL,
        guest_phone TEXT NOT NULL,
        check_in TEXT NOT NULL,
        check_out TEXT NOT NULL,
        guest_count INTEGER NOT NULL CHECK (guest_count > 0),
        category_id TEXT NOT NULL REFERENCES categories(id),
        total_price INTEGER NOT NULL CHECK (total_price >= 0),
        status TEXT NOT NULL,
        payment_status TEXT NOT NULL,
        unit_id INTEGER REFERENCES units(id),
        special_requests TEXT,
        add_ons TEXT NOT NULL DEFAULT '[]',
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL,
        CHECK (check_in < check_out),
        CHECK (status <> 'confirmed' OR payment_status = 'paid')
    )";

/// Speeds up the overlap count behind every availability check.
pub const CREATE_RESERVATION_STAY_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_reservations_category_stay
    ON reservations(category_id, check_in, check_out)";

/// Speeds up unit binding conflict checks.
pub const CREATE_RESERVATION_UNIT_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_unit ON reservations(unit_id)";

/// Speeds up status-filtered listings.
pub const CREATE_RESERVATION_STATUS_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_reservations_status ON reservations(status)";

/// Speeds up per-category unit counts.
pub const CREATE_UNIT_CATEGORY_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_units_category ON units(category_id, active, status)";

/// Reads the schema version.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// Writes the schema version.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// Column list shared by every reservation query, in `row_to_reservation` order.
pub const RESERVATION_COLUMNS: &str = r"
    id, booking_ref, guest_name, guest_email, guest_phone, check_in, check_out,
    guest_count, category_id, total_price, status, payment_status, unit_id,
    special_requests, add_ons, created_at, updated_at";

/// Column list shared by every unit query, in `row_to_unit` order.
pub const UNIT_COLUMNS: &str =
    "id, category_id, code, status, active, floor, location, last_cleaned_at";

/// Column list shared by every category query, in `row_to_category` order.
pub const CATEGORY_COLUMNS: &str =
    "id, name, nightly_price, max_occupancy, total_units, amenities, description";
