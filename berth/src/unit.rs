//! Physical units (rooms, tents, cabins).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::CategoryId;
use crate::reservation::ValidationError;

/// Storage key of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(i64);

impl UnitId {
    /// Wraps a raw storage key.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw storage key.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operational status of a unit.
///
/// # Examples
///
/// ```
/// use berth::UnitStatus;
///
/// assert!(UnitStatus::Cleaning.is_assignable());
/// assert!(!UnitStatus::Maintenance.is_assignable());
/// assert_eq!("occupied".parse::<UnitStatus>().unwrap(), UnitStatus::Occupied);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum UnitStatus {
    /// Ready for guests.
    #[default]
    Available,
    /// Guests are in the unit now.
    Occupied,
    /// Out of service.
    Maintenance,
    /// Being turned over; counts as available.
    Cleaning,
}

impl UnitStatus {
    /// Returns the lowercase name used in storage and output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Occupied => "occupied",
            Self::Maintenance => "maintenance",
            Self::Cleaning => "cleaning",
        }
    }

    /// Whether a unit in this status may receive a new binding.
    #[must_use]
    pub const fn is_assignable(self) -> bool {
        matches!(self, Self::Available | Self::Cleaning)
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "available" => Ok(Self::Available),
            "occupied" => Ok(Self::Occupied),
            "maintenance" => Ok(Self::Maintenance),
            "cleaning" => Ok(Self::Cleaning),
            _ => Err(ValidationError {
                field: "status".into(),
                message: format!("unknown unit status '{s}'"),
            }),
        }
    }
}

/// A registered unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    id: UnitId,
    category: CategoryId,
    code: String,
    status: UnitStatus,
    active: bool,
    floor: Option<String>,
    location: Option<String>,
    last_cleaned_at: Option<DateTime<Utc>>,
}

impl Unit {
    /// Assembles a unit read back from storage.
    pub(crate) fn from_parts(
        id: UnitId,
        unit: NewUnit,
        active: bool,
        last_cleaned_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            category: unit.category,
            code: unit.code,
            status: unit.status,
            active,
            floor: unit.floor,
            location: unit.location,
            last_cleaned_at,
        }
    }

    /// Returns the storage key.
    #[must_use]
    pub const fn id(&self) -> UnitId {
        self.id
    }

    /// Returns the category this unit belongs to.
    #[must_use]
    pub const fn category(&self) -> &CategoryId {
        &self.category
    }

    /// Returns the human-readable code, e.g. `204`.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the operational status.
    #[must_use]
    pub const fn status(&self) -> UnitStatus {
        self.status
    }

    /// Returns whether the unit is in service.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Returns the floor, if recorded.
    #[must_use]
    pub fn floor(&self) -> Option<&str> {
        self.floor.as_deref()
    }

    /// Returns the location, if recorded.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Returns when the unit was last cleaned.
    #[must_use]
    pub const fn last_cleaned_at(&self) -> Option<DateTime<Utc>> {
        self.last_cleaned_at
    }

    /// Whether this unit may receive a new reservation binding right now.
    #[must_use]
    pub const fn is_assignable(&self) -> bool {
        self.active && self.status.is_assignable()
    }
}

/// A unit about to be registered.
///
/// # Examples
///
/// ```
/// use berth::NewUnit;
///
/// let unit = NewUnit::new("standard".parse().unwrap(), " 101 ")
///     .unwrap()
///     .floor(Some("1".into()));
/// assert_eq!(unit.code(), "101");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUnit {
    category: CategoryId,
    code: String,
    status: UnitStatus,
    active: bool,
    floor: Option<String>,
    location: Option<String>,
}

impl NewUnit {
    /// Starts a unit description.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is blank after trimming.
    pub fn new(category: CategoryId, code: impl Into<String>) -> Result<Self, ValidationError> {
        let code = code.into().trim().to_string();
        if code.is_empty() {
            return Err(ValidationError {
                field: "code".into(),
                message: "unit code must be non-empty".into(),
            });
        }
        Ok(Self {
            category,
            code,
            status: UnitStatus::Available,
            active: true,
            floor: None,
            location: None,
        })
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn status(mut self, status: UnitStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets whether the unit starts in service.
    #[must_use]
    pub const fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Sets the floor.
    #[must_use]
    pub fn floor(mut self, floor: Option<String>) -> Self {
        self.floor = floor.map(|f| f.trim().to_string()).filter(|f| !f.is_empty());
        self
    }

    /// Sets the location.
    #[must_use]
    pub fn location(mut self, location: Option<String>) -> Self {
        self.location = location
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty());
        self
    }

    /// Returns the category.
    #[must_use]
    pub const fn category(&self) -> &CategoryId {
        &self.category
    }

    /// Returns the code.
    #[must_use]
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Returns the initial status.
    #[must_use]
    pub const fn initial_status(&self) -> UnitStatus {
        self.status
    }

    /// Returns whether the unit starts in service.
    #[must_use]
    pub const fn active_value(&self) -> bool {
        self.active
    }

    /// Returns the floor.
    #[must_use]
    pub fn floor_value(&self) -> Option<&str> {
        self.floor.as_deref()
    }

    /// Returns the location.
    #[must_use]
    pub fn location_value(&self) -> Option<&str> {
        self.location.as_deref()
    }
}
