//! Stay date ranges.
//!
//! Guests book whole days; internally every stay is normalized to the
//! property's check-in and check-out clock times so that overlap tests work on
//! instants. Ranges are half-open: a stay ending at 11:00 never collides with
//! one starting at 15:00 the same day.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::reservation::ValidationError;

/// Text format used to persist normalized stay instants.
///
/// Lexicographic order of this format equals chronological order, which the
/// store relies on for range queries.
pub const STORAGE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const SECONDS_PER_DAY: i64 = 86_400;

/// Clock times applied to booked days.
///
/// # Examples
///
/// ```
/// use berth::StayPolicy;
/// use chrono::NaiveTime;
///
/// let policy = StayPolicy::default();
/// assert_eq!(policy.check_in_time(), NaiveTime::from_hms_opt(15, 0, 0).unwrap());
/// assert_eq!(policy.check_out_time(), NaiveTime::from_hms_opt(11, 0, 0).unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayPolicy {
    check_in_time: NaiveTime,
    check_out_time: NaiveTime,
}

impl StayPolicy {
    /// Creates a policy.
    ///
    /// # Errors
    ///
    /// Returns an error if check-out is later in the day than check-in; same-day
    /// turnover would otherwise overlap.
    pub fn new(check_in_time: NaiveTime, check_out_time: NaiveTime) -> Result<Self, ValidationError> {
        if check_out_time > check_in_time {
            return Err(ValidationError {
                field: "check_out_time".into(),
                message: format!(
                    "check-out time {check_out_time} must not be later than check-in time {check_in_time}"
                ),
            });
        }
        Ok(Self {
            check_in_time,
            check_out_time,
        })
    }

    /// Returns the check-in clock time.
    #[must_use]
    pub const fn check_in_time(&self) -> NaiveTime {
        self.check_in_time
    }

    /// Returns the check-out clock time.
    #[must_use]
    pub const fn check_out_time(&self) -> NaiveTime {
        self.check_out_time
    }

    /// Normalizes a pair of booked days into a stay.
    ///
    /// # Errors
    ///
    /// Returns an error unless `check_out` is strictly after `check_in`.
    ///
    /// # Examples
    ///
    /// ```
    /// use berth::StayPolicy;
    /// use chrono::NaiveDate;
    ///
    /// let policy = StayPolicy::default();
    /// let arrive = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
    /// let depart = NaiveDate::from_ymd_opt(2024, 12, 27).unwrap();
    ///
    /// let stay = policy.stay(arrive, depart).unwrap();
    /// assert_eq!(stay.nights(), 2);
    /// assert!(policy.stay(depart, arrive).is_err());
    /// ```
    pub fn stay(&self, check_in: NaiveDate, check_out: NaiveDate) -> Result<StayDates, ValidationError> {
        if check_out <= check_in {
            return Err(ValidationError {
                field: "check_out".into(),
                message: format!("check-out {check_out} must be after check-in {check_in}"),
            });
        }
        Ok(StayDates {
            check_in: check_in.and_time(self.check_in_time),
            check_out: check_out.and_time(self.check_out_time),
        })
    }
}

impl Default for StayPolicy {
    fn default() -> Self {
        Self {
            check_in_time: NaiveTime::from_hms_opt(15, 0, 0).unwrap_or(NaiveTime::MIN),
            check_out_time: NaiveTime::from_hms_opt(11, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

/// A normalized stay: check-in instant strictly before check-out instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayDates {
    check_in: NaiveDateTime,
    check_out: NaiveDateTime,
}

impl StayDates {
    /// Rebuilds a stay from already-normalized instants.
    ///
    /// # Errors
    ///
    /// Returns an error unless `check_in < check_out`.
    pub fn from_instants(check_in: NaiveDateTime, check_out: NaiveDateTime) -> Result<Self, ValidationError> {
        if check_out <= check_in {
            return Err(ValidationError {
                field: "check_out".into(),
                message: format!("check-out {check_out} must be after check-in {check_in}"),
            });
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// Returns the check-in instant.
    #[must_use]
    pub const fn check_in(&self) -> NaiveDateTime {
        self.check_in
    }

    /// Returns the check-out instant.
    #[must_use]
    pub const fn check_out(&self) -> NaiveDateTime {
        self.check_out
    }

    /// Returns the check-in day.
    #[must_use]
    pub fn check_in_date(&self) -> NaiveDate {
        self.check_in.date()
    }

    /// Returns the check-out day.
    #[must_use]
    pub fn check_out_date(&self) -> NaiveDate {
        self.check_out.date()
    }

    /// Number of billable nights: the stay length in days, rounded up.
    #[must_use]
    pub fn nights(&self) -> u32 {
        let seconds = (self.check_out - self.check_in).num_seconds();
        let nights = (seconds + SECONDS_PER_DAY - 1) / SECONDS_PER_DAY;
        u32::try_from(nights).unwrap_or(u32::MAX)
    }

    /// Half-open overlap test.
    ///
    /// # Examples
    ///
    /// ```
    /// use berth::StayPolicy;
    /// use chrono::NaiveDate;
    ///
    /// let policy = StayPolicy::default();
    /// let day = |d| NaiveDate::from_ymd_opt(2024, 12, d).unwrap();
    ///
    /// let first = policy.stay(day(25), day(27)).unwrap();
    /// let adjacent = policy.stay(day(27), day(29)).unwrap();
    /// let crossing = policy.stay(day(26), day(28)).unwrap();
    ///
    /// assert!(!first.overlaps(&adjacent));
    /// assert!(first.overlaps(&crossing));
    /// ```
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.check_in < other.check_out && self.check_out > other.check_in
    }

    /// Check-in instant in [`STORAGE_FORMAT`].
    #[must_use]
    pub fn check_in_key(&self) -> String {
        self.check_in.format(STORAGE_FORMAT).to_string()
    }

    /// Check-out instant in [`STORAGE_FORMAT`].
    #[must_use]
    pub fn check_out_key(&self) -> String {
        self.check_out.format(STORAGE_FORMAT).to_string()
    }
}

impl fmt::Display for StayDates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.check_in_date(), self.check_out_date())
    }
}
