//! Configuration schema definitions.
//!
//! Every field is optional so partial files can be layered; the accessor
//! methods on [`Config`] apply the built-in defaults.

use std::time::Duration;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::reference::{ReferenceGenerator, DEFAULT_PREFIX};
use crate::stay::StayPolicy;

/// Default lower bound on guests per booking.
pub const DEFAULT_MIN_GUESTS: u32 = 1;

/// Default upper bound on guests per booking.
pub const DEFAULT_MAX_GUESTS: u32 = 10;

/// Default lock wait in seconds.
pub const DEFAULT_LOCK_WAIT_SECONDS: u64 = 5;

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use berth::config::{BookingConfig, Config};
///
/// let config = Config {
///     booking: Some(BookingConfig {
///         max_guests: Some(6),
///         ..Default::default()
///     }),
///     ..Default::default()
/// };
/// assert_eq!(config.guest_bounds(), (1, 6));
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Check-in and check-out clock times.
    pub stay: Option<StayConfig>,

    /// Booking request rules.
    pub booking: Option<BookingConfig>,

    /// Where the unit total for availability comes from.
    pub inventory_source: Option<InventorySource>,

    /// Maximum time to wait for the database write lock (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Disable automatic database initialization.
    pub disable_autoinit: Option<bool>,

    /// Output format for list commands.
    pub output_format: Option<OutputFormat>,
}

/// Stay clock times as `HH:MM`.
///
/// # Examples
///
/// ```
/// use berth::config::StayConfig;
///
/// let yaml = "check_in_time: \"14:00\"\ncheck_out_time: \"10:30\"";
/// let stay: StayConfig = serde_yaml::from_str(yaml).unwrap();
/// assert_eq!(stay.check_in_time.as_deref(), Some("14:00"));
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StayConfig {
    /// Check-in time, default `15:00`.
    pub check_in_time: Option<String>,

    /// Check-out time, default `11:00`.
    pub check_out_time: Option<String>,
}

/// Booking request rules.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BookingConfig {
    /// Fewest guests a booking may carry.
    pub min_guests: Option<u32>,

    /// Most guests a booking may carry.
    pub max_guests: Option<u32>,

    /// Booking reference prefix, default `BK`.
    pub reference_prefix: Option<String>,

    /// Bind a unit automatically when a reservation is confirmed.
    pub auto_assign_units: Option<bool>,
}

/// Source of the per-category unit total.
///
/// # Examples
///
/// ```
/// use berth::config::InventorySource;
///
/// let source: InventorySource = serde_yaml::from_str("catalog").unwrap();
/// assert_eq!(source, InventorySource::Catalog);
/// assert_eq!(InventorySource::default(), InventorySource::Units);
/// ```
#[derive(
    Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum InventorySource {
    /// Count active units registered for the category.
    #[default]
    Units,
    /// Use the category's static `total_units`.
    Catalog,
}

impl std::fmt::Display for InventorySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Units => write!(f, "units"),
            Self::Catalog => write!(f, "catalog"),
        }
    }
}

/// Output format for list commands.
///
/// # Examples
///
/// ```
/// use berth::config::OutputFormat;
///
/// let format = OutputFormat::Json;
/// assert_eq!(format.to_string(), "json");
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output format.
    Json,
    /// CSV output format.
    Csv,
    /// TSV output format.
    Tsv,
    /// Human-readable table format.
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Tsv => write!(f, "tsv"),
            Self::Table => write!(f, "table"),
        }
    }
}

/// Parses an `HH:MM` clock time.
#[must_use]
pub fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    // chrono accepts single-digit hours; require the padded form
    if value.len() != 5 {
        return None;
    }
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

impl Config {
    /// Resolves the stay policy, falling back to 15:00 / 11:00.
    ///
    /// # Errors
    ///
    /// Returns a validation error if a time is malformed or check-out is
    /// later than check-in.
    pub fn stay_policy(&self) -> Result<StayPolicy> {
        let defaults = StayPolicy::default();
        let stay = self.stay.clone().unwrap_or_default();

        let resolve = |field: &str, value: Option<&str>, default: NaiveTime| match value {
            None => Ok(default),
            Some(text) => parse_clock_time(text).ok_or_else(|| Error::Validation {
                field: format!("stay.{field}"),
                message: format!("'{text}' is not an HH:MM time"),
            }),
        };

        let check_in = resolve(
            "check_in_time",
            stay.check_in_time.as_deref(),
            defaults.check_in_time(),
        )?;
        let check_out = resolve(
            "check_out_time",
            stay.check_out_time.as_deref(),
            defaults.check_out_time(),
        )?;

        Ok(StayPolicy::new(check_in, check_out)?)
    }

    /// Inclusive bounds on the guest count, default `(1, 10)`.
    #[must_use]
    pub fn guest_bounds(&self) -> (u32, u32) {
        let booking = self.booking.as_ref();
        (
            booking
                .and_then(|b| b.min_guests)
                .unwrap_or(DEFAULT_MIN_GUESTS),
            booking
                .and_then(|b| b.max_guests)
                .unwrap_or(DEFAULT_MAX_GUESTS),
        )
    }

    /// Builds the booking reference generator.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the configured prefix is malformed.
    pub fn reference_generator(&self) -> Result<ReferenceGenerator> {
        let prefix = self
            .booking
            .as_ref()
            .and_then(|b| b.reference_prefix.clone())
            .unwrap_or_else(|| DEFAULT_PREFIX.to_string());
        Ok(ReferenceGenerator::new(prefix)?)
    }

    /// Whether confirmation binds a unit automatically, default `true`.
    #[must_use]
    pub fn auto_assign_units(&self) -> bool {
        self.booking
            .as_ref()
            .and_then(|b| b.auto_assign_units)
            .unwrap_or(true)
    }

    /// Where availability takes its unit total from.
    #[must_use]
    pub fn inventory_source(&self) -> InventorySource {
        self.inventory_source.unwrap_or_default()
    }

    /// How long to wait for the database write lock.
    #[must_use]
    pub fn lock_wait(&self) -> Duration {
        Duration::from_secs(
            self.maximum_lock_wait_seconds
                .unwrap_or(DEFAULT_LOCK_WAIT_SECONDS),
        )
    }

    /// Default output format for list commands.
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        self.output_format.unwrap_or(OutputFormat::Table)
    }
}
