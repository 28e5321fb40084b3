//! Property-based tests for the configuration system.

use super::merger::ConfigMerger;
use super::schema::{BookingConfig, Config, StayConfig};
use super::validator::{ConfigValidator, GUEST_LIMIT};
use proptest::prelude::*;

// Guest bounds where min <= max <= limit
fn guest_bounds_strategy() -> impl Strategy<Value = (u32, u32)> {
    (1u32..=GUEST_LIMIT).prop_flat_map(|min| (Just(min), min..=GUEST_LIMIT))
}

fn valid_booking_strategy() -> impl Strategy<Value = BookingConfig> {
    (
        guest_bounds_strategy(),
        prop::option::of("[A-Z0-9]{1,4}"),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|((min, max), reference_prefix, auto_assign_units)| BookingConfig {
            min_guests: Some(min),
            max_guests: Some(max),
            reference_prefix,
            auto_assign_units,
        })
}

// Check-out no later than check-in
fn valid_stay_strategy() -> impl Strategy<Value = StayConfig> {
    (0u32..24, 0u32..60)
        .prop_flat_map(|(in_h, in_m)| (Just((in_h, in_m)), 0..=in_h, 0u32..60))
        .prop_map(|((in_h, in_m), out_h, out_m)| {
            let out_m = if out_h == in_h { out_m.min(in_m) } else { out_m };
            StayConfig {
                check_in_time: Some(format!("{in_h:02}:{in_m:02}")),
                check_out_time: Some(format!("{out_h:02}:{out_m:02}")),
            }
        })
}

fn valid_config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(valid_stay_strategy()),
        prop::option::of(valid_booking_strategy()),
        prop::option::of(1u64..=600),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(stay, booking, lock_wait, autoinit)| Config {
            stay,
            booking,
            maximum_lock_wait_seconds: lock_wait,
            disable_autoinit: autoinit,
            ..Default::default()
        })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        .. ProptestConfig::default()
    })]

    #[test]
    fn valid_configs_pass_validation(config in valid_config_strategy()) {
        prop_assert!(ConfigValidator::validate(&config).is_ok());
        prop_assert!(config.stay_policy().is_ok());
        prop_assert!(config.reference_generator().is_ok());
    }

    // Merging two complete valid configs yields the higher one for every set field
    #[test]
    fn merged_valid_configs_stay_valid(
        low in valid_config_strategy(),
        high in valid_config_strategy(),
    ) {
        let mut result = low.clone();
        ConfigMerger::merge_into(&mut result, &high);

        if high.booking.is_some() {
            prop_assert_eq!(result.guest_bounds(), high.guest_bounds());
        }
        if high.maximum_lock_wait_seconds.is_some() {
            prop_assert_eq!(result.maximum_lock_wait_seconds, high.maximum_lock_wait_seconds);
        }
        // Both sides have complete stay sections, so the higher one wins whole
        if high.stay.is_some() {
            prop_assert_eq!(&result.stay, &high.stay);
        }
        prop_assert!(ConfigValidator::validate(&result).is_ok());
    }

    #[test]
    fn inverted_guest_bounds_rejected(min in 2u32..=GUEST_LIMIT, gap in 1u32..50) {
        let max = min.saturating_sub(gap).max(1);
        prop_assume!(max < min);

        let config = Config {
            booking: Some(BookingConfig {
                min_guests: Some(min),
                max_guests: Some(max),
                ..Default::default()
            }),
            ..Default::default()
        };
        prop_assert!(ConfigValidator::validate(&config).is_err());
    }

    #[test]
    fn lowercase_prefixes_rejected(prefix in "[a-z]{1,4}") {
        let config = Config {
            booking: Some(BookingConfig {
                reference_prefix: Some(prefix),
                ..Default::default()
            }),
            ..Default::default()
        };
        prop_assert!(ConfigValidator::validate(&config).is_err());
    }
}
