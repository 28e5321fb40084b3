//! Environment variable handling for configuration overrides.
//!
//! `BERTH_*` variables override values from configuration files.

use crate::config::schema::{Config, InventorySource, OutputFormat};
use crate::error::{Error, Result};
use std::env;
use std::str::FromStr;

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use berth::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable holds a value of the wrong shape
    /// (non-numeric guest bound, invalid boolean, unknown enum value).
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        Self::apply_stay_overrides(config);
        Self::apply_booking_overrides(config)?;

        if let Ok(val) = env::var("BERTH_INVENTORY_SOURCE") {
            config.inventory_source = Some(Self::parse_inventory_source(&val)?);
        }

        if let Ok(seconds) = env::var("BERTH_MAXIMUM_LOCK_WAIT_SECONDS") {
            config.maximum_lock_wait_seconds =
                Some(Self::parse_number("BERTH_MAXIMUM_LOCK_WAIT_SECONDS", &seconds)?);
        }

        if let Ok(val) = env::var("BERTH_DISABLE_AUTOINIT") {
            config.disable_autoinit = Some(Self::parse_bool("BERTH_DISABLE_AUTOINIT", &val)?);
        }

        if let Ok(val) = env::var("BERTH_OUTPUT_FORMAT") {
            config.output_format = Some(Self::parse_output_format(&val)?);
        }

        Ok(())
    }

    fn apply_stay_overrides(config: &mut Config) {
        let mut stay = config.stay.clone().unwrap_or_default();
        let mut modified = false;

        // Shape is checked by the validator so the error names the config key
        if let Ok(time) = env::var("BERTH_CHECK_IN_TIME") {
            stay.check_in_time = Some(time.trim().to_string());
            modified = true;
        }

        if let Ok(time) = env::var("BERTH_CHECK_OUT_TIME") {
            stay.check_out_time = Some(time.trim().to_string());
            modified = true;
        }

        if modified {
            config.stay = Some(stay);
        }
    }

    fn apply_booking_overrides(config: &mut Config) -> Result<()> {
        let mut booking = config.booking.clone().unwrap_or_default();
        let mut modified = false;

        if let Ok(min) = env::var("BERTH_MIN_GUESTS") {
            booking.min_guests = Some(Self::parse_number("BERTH_MIN_GUESTS", &min)?);
            modified = true;
        }

        if let Ok(max) = env::var("BERTH_MAX_GUESTS") {
            booking.max_guests = Some(Self::parse_number("BERTH_MAX_GUESTS", &max)?);
            modified = true;
        }

        if let Ok(prefix) = env::var("BERTH_REFERENCE_PREFIX") {
            booking.reference_prefix = Some(prefix.trim().to_string());
            modified = true;
        }

        if let Ok(val) = env::var("BERTH_AUTO_ASSIGN_UNITS") {
            booking.auto_assign_units = Some(Self::parse_bool("BERTH_AUTO_ASSIGN_UNITS", &val)?);
            modified = true;
        }

        if modified {
            config.booking = Some(booking);
        }

        Ok(())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }

    fn parse_number<T: FromStr>(field: &str, s: &str) -> Result<T> {
        s.trim().parse().map_err(|_| Error::Validation {
            field: field.into(),
            message: format!("'{s}' must be a non-negative integer"),
        })
    }

    fn parse_inventory_source(s: &str) -> Result<InventorySource> {
        match s.trim().to_lowercase().as_str() {
            "units" => Ok(InventorySource::Units),
            "catalog" => Ok(InventorySource::Catalog),
            _ => Err(Error::Validation {
                field: "BERTH_INVENTORY_SOURCE".into(),
                message: format!("Invalid inventory source: '{s}' (expected units/catalog)"),
            }),
        }
    }

    fn parse_output_format(s: &str) -> Result<OutputFormat> {
        match s.trim().to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            _ => Err(Error::Validation {
                field: "BERTH_OUTPUT_FORMAT".into(),
                message: format!("Invalid output format: '{s}' (expected table/json/csv/tsv)"),
            }),
        }
    }
}
