//! Configuration validation.

use crate::config::schema::{parse_clock_time, BookingConfig, Config, StayConfig};
use crate::error::{Error, Result};

/// Largest `max_guests` a configuration may set.
pub const GUEST_LIMIT: u32 = 100;

/// Validates configuration values and their consistency.
///
/// # Examples
///
/// ```
/// use berth::config::{Config, ConfigValidator};
///
/// let config = Config::default();
/// ConfigValidator::validate(&config).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate a complete configuration.
    ///
    /// Partial configurations are checked against the built-in defaults, so
    /// `max_guests: 0` is rejected even when `min_guests` is unset.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming the first offending field.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref stay) = config.stay {
            Self::validate_stay(stay)?;
        }

        if let Some(ref booking) = config.booking {
            Self::validate_booking(booking)?;
        }

        if let Some(timeout) = config.maximum_lock_wait_seconds {
            if timeout == 0 {
                return Err(Error::Validation {
                    field: "maximum_lock_wait_seconds".into(),
                    message: "Timeout must be greater than 0".into(),
                });
            }
        }

        // Bounds are checked after merging defaults too
        let (min, max) = config.guest_bounds();
        Self::validate_guest_bounds(min, max)?;

        Ok(())
    }

    fn validate_stay(stay: &StayConfig) -> Result<()> {
        let check_in = stay
            .check_in_time
            .as_deref()
            .map(|t| Self::validate_time("stay.check_in_time", t))
            .transpose()?;
        let check_out = stay
            .check_out_time
            .as_deref()
            .map(|t| Self::validate_time("stay.check_out_time", t))
            .transpose()?;

        let defaults = crate::stay::StayPolicy::default();
        let check_in = check_in.unwrap_or_else(|| defaults.check_in_time());
        let check_out = check_out.unwrap_or_else(|| defaults.check_out_time());
        if check_out > check_in {
            return Err(Error::Validation {
                field: "stay".into(),
                message: format!(
                    "check-out time {} must not be later than check-in time {}",
                    check_out.format("%H:%M"),
                    check_in.format("%H:%M")
                ),
            });
        }

        Ok(())
    }

    fn validate_time(field: &str, value: &str) -> Result<chrono::NaiveTime> {
        parse_clock_time(value).ok_or_else(|| Error::Validation {
            field: field.into(),
            message: format!("'{value}' is not a valid HH:MM time"),
        })
    }

    fn validate_booking(booking: &BookingConfig) -> Result<()> {
        if let Some(ref prefix) = booking.reference_prefix {
            let valid = (1..=4).contains(&prefix.len())
                && prefix
                    .bytes()
                    .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
            if !valid {
                return Err(Error::Validation {
                    field: "booking.reference_prefix".into(),
                    message: format!("'{prefix}' must be 1-4 uppercase letters or digits"),
                });
            }
        }

        if booking.min_guests == Some(0) {
            return Err(Error::Validation {
                field: "booking.min_guests".into(),
                message: "At least one guest is required".into(),
            });
        }

        Ok(())
    }

    fn validate_guest_bounds(min: u32, max: u32) -> Result<()> {
        if min == 0 {
            return Err(Error::Validation {
                field: "booking.min_guests".into(),
                message: "At least one guest is required".into(),
            });
        }

        if max > GUEST_LIMIT {
            return Err(Error::Validation {
                field: "booking.max_guests".into(),
                message: format!("Cannot exceed {GUEST_LIMIT}"),
            });
        }

        if min > max {
            return Err(Error::Validation {
                field: "booking".into(),
                message: format!("min_guests ({min}) must be <= max_guests ({max})"),
            });
        }

        Ok(())
    }
}
