//! CLI-specific error types with exit codes.
//!
//! This module wraps library errors and maps every failure onto the exit
//! codes documented for the `berth` binary.

use berth::Error as LibError;
use std::fmt;

/// CLI-specific error type with exit code mapping.
#[derive(Debug)]
pub enum CliError {
    /// Library error (wrapped).
    Library(LibError),

    /// Invalid command-line arguments.
    InvalidArguments(String),

    /// I/O error.
    Io(std::io::Error),

    /// Timeout waiting for the database lock.
    Timeout(String),

    /// Data directory not found (and auto-init disabled).
    NoDataDirectory,

    /// Configuration error.
    Config(String),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    ///
    /// Exit codes:
    /// - 0: Success (not an error)
    /// - 1: Business rule rejection (capacity, inventory, payment, conflict, transition)
    /// - 2: Store unavailable or lock timeout
    /// - 3: No data directory found
    /// - 4: Invalid arguments or validation failure
    /// - 5: I/O error
    /// - 6: Other library error
    /// - 7: Configuration error
    /// - 8: Reservation, category or unit not found
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Library(lib_err) => match lib_err {
                e if e.is_business_rule() => 1,
                LibError::StoreUnavailable { .. } => 2,
                LibError::DataDirectoryNotFound { .. } => 3,
                LibError::Validation { .. } | LibError::InvalidPath { .. } => 4,
                LibError::Io(_) => 5,
                LibError::Configuration(_) => 7,
                LibError::NotFound { .. } => 8,
                _ => 6,
            },
            Self::Timeout(_) => 2,
            Self::NoDataDirectory => 3,
            Self::InvalidArguments(_) => 4,
            Self::Io(_) => 5,
            Self::Config(_) => 7,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Library(e) => write!(f, "{e}"),
            Self::InvalidArguments(msg) => write!(f, "Invalid arguments: {msg}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Timeout(reason) => write!(f, "Timeout waiting for database lock: {reason}"),
            Self::NoDataDirectory => {
                write!(
                    f,
                    "Data directory not found (run `berth init` or enable auto-init)"
                )
            }
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Library(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LibError> for CliError {
    fn from(e: LibError) -> Self {
        match e {
            LibError::StoreUnavailable { reason } => Self::Timeout(reason),
            LibError::DataDirectoryNotFound { .. } => Self::NoDataDirectory,
            other => Self::Library(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<berth::ValidationError> for CliError {
    fn from(e: berth::ValidationError) -> Self {
        Self::InvalidArguments(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_business_rules_exit_one() {
        let err: CliError = LibError::NoInventory {
            category: "standard".into(),
            check_in: NaiveDate::from_ymd_opt(2024, 12, 25).unwrap(),
            check_out: NaiveDate::from_ymd_opt(2024, 12, 27).unwrap(),
        }
        .into();
        assert_eq!(err.exit_code(), 1);

        let err: CliError = LibError::PaymentRequired {
            reference: "BK1".into(),
        }
        .into();
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn test_infrastructure_exit_codes() {
        let busy: CliError = LibError::StoreUnavailable {
            reason: "database is locked".into(),
        }
        .into();
        assert!(matches!(busy, CliError::Timeout(_)));
        assert_eq!(busy.exit_code(), 2);

        let missing: CliError = LibError::NotFound {
            resource: "reservation 7".into(),
        }
        .into();
        assert_eq!(missing.exit_code(), 8);

        let invalid: CliError = LibError::Validation {
            field: "check_out".into(),
            message: "must be after check-in".into(),
        }
        .into();
        assert_eq!(invalid.exit_code(), 4);

        let corrupt: CliError = LibError::DatabaseCorruption {
            details: "bad page".into(),
        }
        .into();
        assert_eq!(corrupt.exit_code(), 6);
    }
}
