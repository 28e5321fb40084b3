//! Monetary amounts.
//!
//! Prices are held as integer minor units (cents) so that nightly rates and
//! totals never pick up floating point error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A non-negative amount of money in minor units.
///
/// # Examples
///
/// ```
/// use berth::Money;
///
/// let nightly: Money = "120".parse().unwrap();
/// assert_eq!(nightly.minor_units(), 12_000);
/// assert_eq!(nightly.to_string(), "120.00");
///
/// let half: Money = "0.5".parse().unwrap();
/// assert_eq!(half.minor_units(), 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(u64);

impl Money {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Largest amount the store can hold (a signed 64-bit cent count).
    pub const MAX: Self = Self(i64::MAX.unsigned_abs());

    /// Creates an amount from minor units (cents).
    #[must_use]
    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Creates an amount from whole currency units.
    ///
    /// Saturates at [`Money::MAX`].
    #[must_use]
    pub const fn from_major(major: u64) -> Self {
        let minor = major.saturating_mul(100);
        if minor > Self::MAX.0 {
            Self::MAX
        } else {
            Self(minor)
        }
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn minor_units(self) -> u64 {
        self.0
    }

    /// Whether the amount fits in the store.
    #[must_use]
    pub const fn is_storable(self) -> bool {
        self.0 <= Self::MAX.0
    }

    /// Multiplies by a count, returning `None` past [`Money::MAX`].
    #[must_use]
    pub const fn checked_mul(self, count: u64) -> Option<Self> {
        match self.0.checked_mul(count) {
            Some(v) if v <= Self::MAX.0 => Some(Self(v)),
            _ => None,
        }
    }

    /// Adds two amounts, returning `None` past [`Money::MAX`].
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) if v <= Self::MAX.0 => Some(Self(v)),
            _ => None,
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

/// Error returned when an amount cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMoneyError {
    /// The rejected input.
    pub value: String,
    /// The reason it was rejected.
    pub reason: String,
}

impl fmt::Display for InvalidMoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid amount '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidMoneyError {}

impl FromStr for Money {
    type Err = InvalidMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| InvalidMoneyError {
            value: s.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        let (major, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));

        if major.is_empty() || !major.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected a non-negative decimal number"));
        }
        if fraction.len() > 2 || !fraction.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("at most two decimal places are allowed"));
        }

        let major: u64 = major
            .parse()
            .map_err(|_| invalid("amount is too large"))?;
        let cents: u64 = match fraction.len() {
            0 => 0,
            1 => u64::from(fraction.as_bytes()[0] - b'0') * 10,
            _ => fraction.parse().map_err(|_| invalid("invalid cents"))?,
        };

        major
            .checked_mul(100)
            .and_then(|m| m.checked_add(cents))
            .map(Self)
            .filter(|m| m.is_storable())
            .ok_or_else(|| invalid("amount is too large"))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Helper {
            Whole(u64),
            Decimal(f64),
            Text(String),
        }

        match Helper::deserialize(deserializer)? {
            Helper::Whole(major) => major
                .checked_mul(100)
                .map(Money)
                .filter(|m| m.is_storable())
                .ok_or_else(|| D::Error::custom(format!("amount {major} is too large"))),
            Helper::Decimal(value) => {
                if !value.is_finite() || value < 0.0 {
                    return Err(D::Error::custom(format!("invalid amount: {value}")));
                }
                format!("{value:.2}").parse().map_err(D::Error::custom)
            }
            Helper::Text(s) => s.parse().map_err(D::Error::custom),
        }
    }
}
