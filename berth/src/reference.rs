//! Booking reference generation.
//!
//! References look like `BK12345678X7Q`: a short prefix, the last eight digits
//! of the current Unix time in milliseconds, and three random base-36
//! characters. Uniqueness is finally enforced by the store; a collision is
//! retried with a fresh reference.

use chrono::Utc;
use rand::Rng;

use crate::reservation::{BookingRef, ValidationError};

/// Default reference prefix.
pub const DEFAULT_PREFIX: &str = "BK";

const SUFFIX_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SUFFIX_LEN: usize = 3;
const TIMESTAMP_DIGITS: i64 = 100_000_000;

/// Mints booking references.
///
/// # Examples
///
/// ```
/// use berth::ReferenceGenerator;
///
/// let generator = ReferenceGenerator::new("BK").unwrap();
/// let reference = generator.generate();
/// assert!(reference.as_str().starts_with("BK"));
/// assert_eq!(reference.as_str().len(), 13);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceGenerator {
    prefix: String,
}

impl ReferenceGenerator {
    /// Creates a generator with the given prefix.
    ///
    /// # Errors
    ///
    /// Returns an error unless the prefix is 1-4 uppercase ASCII letters or digits.
    pub fn new(prefix: impl Into<String>) -> Result<Self, ValidationError> {
        let prefix = prefix.into();
        let valid = (1..=4).contains(&prefix.len())
            && prefix
                .bytes()
                .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit());
        if !valid {
            return Err(ValidationError {
                field: "reference_prefix".into(),
                message: format!("'{prefix}' must be 1-4 uppercase letters or digits"),
            });
        }
        Ok(Self { prefix })
    }

    /// Returns the prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Mints a reference from the current time and the thread-local RNG.
    #[must_use]
    pub fn generate(&self) -> BookingRef {
        self.generate_with(Utc::now().timestamp_millis(), &mut rand::thread_rng())
    }

    /// Mints a reference from an explicit timestamp and random source.
    #[must_use]
    pub fn generate_with<R: Rng>(&self, epoch_millis: i64, rng: &mut R) -> BookingRef {
        let digits = epoch_millis.rem_euclid(TIMESTAMP_DIGITS);
        let suffix: String = (0..SUFFIX_LEN)
            .map(|_| char::from(SUFFIX_ALPHABET[rng.gen_range(0..SUFFIX_ALPHABET.len())]))
            .collect();
        BookingRef::from_trusted(format!("{}{digits:08}{suffix}", self.prefix))
    }
}

impl Default for ReferenceGenerator {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }
}
