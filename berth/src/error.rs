//! Error types for the berth library.
//!
//! Every fallible operation in the crate returns [`Result`], whose error type
//! separates business-rule rejections (capacity, inventory, payment, state
//! machine, conflicts) from infrastructure failures (store, configuration, I/O).

use std::path::PathBuf;

use chrono::NaiveDate;
use rusqlite::ErrorCode;
use thiserror::Error;

/// Result type alias for operations that may fail with a berth error.
///
/// # Examples
///
/// ```
/// use berth::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(2)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the berth library.
#[derive(Debug, Error)]
pub enum Error {
    /// A request field failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The guest count exceeds the category's maximum occupancy.
    #[error("category '{category}' holds at most {maximum} guest(s), {requested} requested")]
    CapacityExceeded {
        /// The requested category.
        category: String,
        /// The requested guest count.
        requested: u32,
        /// The category's maximum occupancy.
        maximum: u32,
    },

    /// No unit of the category is free for the requested stay.
    #[error("no '{category}' inventory left for {check_in} to {check_out}")]
    NoInventory {
        /// The requested category.
        category: String,
        /// Requested check-in date.
        check_in: NaiveDate,
        /// Requested check-out date.
        check_out: NaiveDate,
    },

    /// A reservation cannot be confirmed before payment is captured.
    #[error("reservation {reference} cannot be confirmed until payment is captured")]
    PaymentRequired {
        /// Booking reference of the reservation.
        reference: String,
    },

    /// A status or payment change is not permitted from the current state.
    #[error("cannot move from {from} to {to}: {reason}")]
    InvalidTransition {
        /// The current state.
        from: String,
        /// The requested state.
        to: String,
        /// Why the move is rejected.
        reason: String,
    },

    /// The write would break a uniqueness or binding rule.
    #[error("conflict: {details}")]
    Conflict {
        /// Details about the conflict.
        details: String,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// The store did not answer in time or is locked by another writer.
    #[error("store unavailable: {reason}")]
    StoreUnavailable {
        /// What the store reported.
        reason: String,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[source] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: u32,
        /// The schema version found in the database.
        found: u32,
    },
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        match err.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked) => Self::StoreUnavailable {
                reason: err.to_string(),
            },
            _ => Self::Database(err),
        }
    }
}

impl From<crate::reservation::ValidationError> for Error {
    fn from(err: crate::reservation::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl Error {
    /// Check if the operation may succeed when retried unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use berth::Error;
    ///
    /// let err = Error::StoreUnavailable { reason: "database is locked".into() };
    /// assert!(err.is_retryable());
    /// ```
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. })
    }

    /// Check if the error is a business-rule rejection rather than a failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use berth::Error;
    ///
    /// let err = Error::Conflict { details: "unit 101 is taken".into() };
    /// assert!(err.is_business_rule());
    /// ```
    #[must_use]
    pub fn is_business_rule(&self) -> bool {
        matches!(
            self,
            Self::CapacityExceeded { .. }
                | Self::NoInventory { .. }
                | Self::PaymentRequired { .. }
                | Self::InvalidTransition { .. }
                | Self::Conflict { .. }
        )
    }

    /// Check if the error reports a missing entity.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    pub(crate) fn conflict(details: impl Into<String>) -> Self {
        Self::Conflict {
            details: details.into(),
        }
    }
}
