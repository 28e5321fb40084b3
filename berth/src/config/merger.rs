//! Configuration merging and precedence handling.
//!
//! Nested sections merge field by field, so a project file can change one
//! booking rule without restating the others.

use crate::config::loader::ConfigSource;
use crate::config::schema::{BookingConfig, Config, StayConfig};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use berth::config::{Config, ConfigMerger};
///
/// let low = Config { disable_autoinit: Some(false), ..Default::default() };
/// let high = Config { disable_autoinit: Some(true), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.disable_autoinit, Some(true));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merge multiple configuration sources into final config.
    ///
    /// Sources should be provided in order from lowest to highest precedence.
    #[must_use]
    pub fn merge(sources: Vec<ConfigSource>) -> Config {
        let mut result = Config::default();

        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }

        result
    }

    /// Merge source config into target (source overwrites target).
    ///
    /// # Merging Rules
    ///
    /// - Simple fields: source overwrites if Some
    /// - `stay` and `booking`: field-by-field merge
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.inventory_source.is_some() {
            target.inventory_source = source.inventory_source;
        }

        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }

        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }

        if source.output_format.is_some() {
            target.output_format = source.output_format;
        }

        if let Some(ref source_stay) = source.stay {
            target.stay = Some(match &target.stay {
                Some(target_stay) => Self::merge_stay(target_stay, source_stay),
                None => source_stay.clone(),
            });
        }

        if let Some(ref source_booking) = source.booking {
            target.booking = Some(match &target.booking {
                Some(target_booking) => Self::merge_booking(target_booking, source_booking),
                None => source_booking.clone(),
            });
        }
    }

    fn merge_stay(target: &StayConfig, source: &StayConfig) -> StayConfig {
        StayConfig {
            check_in_time: source
                .check_in_time
                .clone()
                .or_else(|| target.check_in_time.clone()),
            check_out_time: source
                .check_out_time
                .clone()
                .or_else(|| target.check_out_time.clone()),
        }
    }

    fn merge_booking(target: &BookingConfig, source: &BookingConfig) -> BookingConfig {
        BookingConfig {
            min_guests: source.min_guests.or(target.min_guests),
            max_guests: source.max_guests.or(target.max_guests),
            reference_prefix: source
                .reference_prefix
                .clone()
                .or_else(|| target.reference_prefix.clone()),
            auto_assign_units: source.auto_assign_units.or(target.auto_assign_units),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InventorySource, OutputFormat};
    use std::path::PathBuf;

    fn make_source(precedence: u8, config: Config) -> ConfigSource {
        ConfigSource {
            path: PathBuf::from(format!("/test/{precedence}.yaml")),
            precedence,
            config,
        }
    }

    #[test]
    fn test_merge_simple_fields() {
        let sources = vec![
            make_source(
                1,
                Config {
                    inventory_source: Some(InventorySource::Catalog),
                    output_format: Some(OutputFormat::Csv),
                    ..Default::default()
                },
            ),
            make_source(
                2,
                Config {
                    output_format: Some(OutputFormat::Json),
                    ..Default::default()
                },
            ),
        ];

        let merged = ConfigMerger::merge(sources);
        assert_eq!(merged.inventory_source, Some(InventorySource::Catalog));
        assert_eq!(merged.output_format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_merge_booking_field_by_field() {
        let mut target = Config {
            booking: Some(BookingConfig {
                min_guests: Some(1),
                max_guests: Some(8),
                reference_prefix: Some("RES".into()),
                auto_assign_units: None,
            }),
            ..Default::default()
        };
        let source = Config {
            booking: Some(BookingConfig {
                max_guests: Some(4),
                auto_assign_units: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };

        ConfigMerger::merge_into(&mut target, &source);
        assert_eq!(
            target.booking,
            Some(BookingConfig {
                min_guests: Some(1),
                max_guests: Some(4),
                reference_prefix: Some("RES".into()),
                auto_assign_units: Some(false),
            })
        );
    }

    #[test]
    fn test_merge_stay_field_by_field() {
        let mut target = Config {
            stay: Some(StayConfig {
                check_in_time: Some("14:00".into()),
                check_out_time: Some("10:00".into()),
            }),
            ..Default::default()
        };
        let source = Config {
            stay: Some(StayConfig {
                check_in_time: Some("16:00".into()),
                check_out_time: None,
            }),
            ..Default::default()
        };

        ConfigMerger::merge_into(&mut target, &source);
        let stay = target.stay.unwrap();
        assert_eq!(stay.check_in_time.as_deref(), Some("16:00"));
        assert_eq!(stay.check_out_time.as_deref(), Some("10:00"));
    }

    #[test]
    fn test_merge_none_values_dont_overwrite() {
        let mut target = Config {
            maximum_lock_wait_seconds: Some(9),
            disable_autoinit: Some(true),
            ..Default::default()
        };
        ConfigMerger::merge_into(&mut target, &Config::default());

        assert_eq!(target.maximum_lock_wait_seconds, Some(9));
        assert_eq!(target.disable_autoinit, Some(true));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn booking_strategy() -> impl Strategy<Value = Option<BookingConfig>> {
        proptest::option::of(
            (
                proptest::option::of(1u32..5),
                proptest::option::of(5u32..50),
                proptest::option::of("[A-Z]{1,4}"),
                proptest::option::of(any::<bool>()),
            )
                .prop_map(|(min_guests, max_guests, reference_prefix, auto_assign_units)| {
                    BookingConfig {
                        min_guests,
                        max_guests,
                        reference_prefix,
                        auto_assign_units,
                    }
                }),
        )
    }

    fn config_strategy() -> impl Strategy<Value = Config> {
        (
            booking_strategy(),
            proptest::option::of(1u64..60),
            proptest::option::of(any::<bool>()),
        )
            .prop_map(|(booking, maximum_lock_wait_seconds, disable_autoinit)| Config {
                booking,
                maximum_lock_wait_seconds,
                disable_autoinit,
                ..Default::default()
            })
    }

    proptest! {
        #[test]
        fn prop_merge_empty_is_right_identity(config in config_strategy()) {
            let mut merged = config.clone();
            ConfigMerger::merge_into(&mut merged, &Config::default());
            prop_assert_eq!(merged, config);
        }

        #[test]
        fn prop_merge_into_empty_copies_values(config in config_strategy()) {
            let mut merged = Config::default();
            ConfigMerger::merge_into(&mut merged, &config);
            prop_assert_eq!(merged, config);
        }

        #[test]
        fn prop_merge_is_idempotent(a in config_strategy(), b in config_strategy()) {
            let mut once = a.clone();
            ConfigMerger::merge_into(&mut once, &b);
            let mut twice = once.clone();
            ConfigMerger::merge_into(&mut twice, &b);
            prop_assert_eq!(once, twice);
        }
    }
}
