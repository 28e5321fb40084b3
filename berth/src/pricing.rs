//! Stay pricing.

use crate::error::{Error, Result};
use crate::money::Money;
use crate::stay::StayDates;

/// Price of a stay at the given nightly rate.
///
/// # Errors
///
/// Returns a validation error if the total does not fit in [`Money`].
///
/// # Examples
///
/// ```
/// use berth::{pricing, Money, StayPolicy};
/// use chrono::NaiveDate;
///
/// let stay = StayPolicy::default()
///     .stay(
///         NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
///         NaiveDate::from_ymd_opt(2024, 12, 27).unwrap(),
///     )
///     .unwrap();
///
/// let total = pricing::stay_total(Money::from_major(120), &stay).unwrap();
/// assert_eq!(total, Money::from_major(240));
/// ```
pub fn stay_total(nightly: Money, stay: &StayDates) -> Result<Money> {
    nightly
        .checked_mul(u64::from(stay.nights()))
        .ok_or_else(|| Error::Validation {
            field: "total_price".into(),
            message: format!("{nightly} x {} nights overflows", stay.nights()),
        })
}

/// Final price: a caller-supplied total is trusted, otherwise the stay total.
///
/// # Errors
///
/// See [`stay_total`]. A supplied total beyond [`Money::MAX`] is a
/// validation error too.
pub fn quote(nightly: Money, stay: &StayDates, supplied: Option<Money>) -> Result<Money> {
    match supplied {
        Some(total) if !total.is_storable() => Err(Error::Validation {
            field: "total_price".into(),
            message: format!("{total} exceeds the largest storable amount {}", Money::MAX),
        }),
        Some(total) => Ok(total),
        None => stay_total(nightly, stay),
    }
}
