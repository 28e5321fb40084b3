//! Room categories.
//!
//! A category is the unit of sale: guests book "a deluxe room", not room 204.
//! Categories carry the nightly price, the occupancy limit and the static unit
//! total used when the property does not track individual units.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::money::Money;
use crate::reservation::ValidationError;

const MAX_CATEGORY_ID_LEN: usize = 64;

/// Slug identifying a category, e.g. `standard` or `family-suite`.
///
/// # Examples
///
/// ```
/// use berth::CategoryId;
///
/// let id: CategoryId = "deluxe".parse().unwrap();
/// assert_eq!(id.as_str(), "deluxe");
///
/// assert!("Deluxe Room".parse::<CategoryId>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CategoryId(String);

impl CategoryId {
    /// Validates and wraps a slug.
    ///
    /// # Errors
    ///
    /// Returns an error unless the value is 1-64 characters of lowercase ASCII
    /// letters, digits, `-` or `_`, starting with a letter or digit.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let invalid = |message: &str| ValidationError {
            field: "category".into(),
            message: format!("'{value}' {message}"),
        };

        let Some(first) = value.chars().next() else {
            return Err(invalid("must not be empty"));
        };
        if value.len() > MAX_CATEGORY_ID_LEN {
            return Err(invalid("is longer than 64 characters"));
        }
        if !(first.is_ascii_lowercase() || first.is_ascii_digit()) {
            return Err(invalid("must start with a lowercase letter or digit"));
        }
        if !value
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(invalid("may only contain lowercase letters, digits, '-' and '_'"));
        }
        Ok(Self(value))
    }

    /// Returns the slug.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CategoryId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim())
    }
}

impl TryFrom<String> for CategoryId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CategoryId> for String {
    fn from(id: CategoryId) -> Self {
        id.0
    }
}

/// A room category in the catalog.
///
/// # Examples
///
/// ```
/// use berth::{Category, Money};
///
/// let standard = Category::builder("standard".parse().unwrap(), "Standard Room")
///     .nightly_price(Money::from_major(120))
///     .max_occupancy(2)
///     .total_units(10)
///     .build()
///     .unwrap();
///
/// assert_eq!(standard.max_occupancy(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    id: CategoryId,
    name: String,
    nightly_price: Money,
    max_occupancy: u32,
    total_units: u32,
    amenities: Vec<String>,
    description: Option<String>,
}

impl Category {
    /// Creates a new category builder.
    #[must_use]
    pub fn builder(id: CategoryId, name: impl Into<String>) -> CategoryBuilder {
        CategoryBuilder {
            id,
            name: name.into(),
            nightly_price: Money::ZERO,
            max_occupancy: 1,
            total_units: 0,
            amenities: Vec::new(),
            description: None,
        }
    }

    /// Returns the category slug.
    #[must_use]
    pub const fn id(&self) -> &CategoryId {
        &self.id
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the price of one night.
    #[must_use]
    pub const fn nightly_price(&self) -> Money {
        self.nightly_price
    }

    /// Returns the maximum number of guests per unit.
    #[must_use]
    pub const fn max_occupancy(&self) -> u32 {
        self.max_occupancy
    }

    /// Returns the static unit total from the catalog.
    #[must_use]
    pub const fn total_units(&self) -> u32 {
        self.total_units
    }

    /// Returns the amenity list.
    #[must_use]
    pub fn amenities(&self) -> &[String] {
        &self.amenities
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Builder for [`Category`].
#[derive(Debug)]
pub struct CategoryBuilder {
    id: CategoryId,
    name: String,
    nightly_price: Money,
    max_occupancy: u32,
    total_units: u32,
    amenities: Vec<String>,
    description: Option<String>,
}

impl CategoryBuilder {
    /// Sets the nightly price.
    #[must_use]
    pub const fn nightly_price(mut self, price: Money) -> Self {
        self.nightly_price = price;
        self
    }

    /// Sets the maximum occupancy.
    #[must_use]
    pub const fn max_occupancy(mut self, guests: u32) -> Self {
        self.max_occupancy = guests;
        self
    }

    /// Sets the static unit total.
    #[must_use]
    pub const fn total_units(mut self, units: u32) -> Self {
        self.total_units = units;
        self
    }

    /// Sets the amenity list. Blank entries are dropped.
    #[must_use]
    pub fn amenities(mut self, amenities: Vec<String>) -> Self {
        self.amenities = amenities
            .into_iter()
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty());
        self
    }

    /// Builds the category.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, the occupancy is zero or the
    /// price is too large to store.
    pub fn build(self) -> Result<Category, ValidationError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(ValidationError {
                field: "name".into(),
                message: "category name must be non-empty".into(),
            });
        }
        if self.max_occupancy == 0 {
            return Err(ValidationError {
                field: "max_occupancy".into(),
                message: "a category must hold at least one guest".into(),
            });
        }
        if !self.nightly_price.is_storable() {
            return Err(ValidationError {
                field: "nightly_price".into(),
                message: format!("{} is too large", self.nightly_price),
            });
        }

        Ok(Category {
            id: self.id,
            name,
            nightly_price: self.nightly_price,
            max_occupancy: self.max_occupancy,
            total_units: self.total_units,
            amenities: self.amenities,
            description: self.description,
        })
    }
}
