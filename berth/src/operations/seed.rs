//! Catalog seed import.
//!
//! A seed file is YAML with a `categories` list and a `units` list. Older
//! catalogs used different key names (`type`, `pricePerNight`, `roomNumber`,
//! `isActive` and friends); those are accepted as aliases and normalized here
//! so nothing past this module sees them.
//!
//! ```yaml
//! categories:
//!   - id: standard
//!     name: Desert Standard
//!     nightly_price: 120
//!     max_occupancy: 2
//!     total_units: 4
//! units:
//!   - code: DS-001
//!     category: standard
//!     location: North Desert View
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::catalog::{Category, CategoryId};
use crate::database::{Database, ImportSummary};
use crate::error::{Error, Result};
use crate::money::Money;
use crate::unit::{NewUnit, UnitStatus};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SeedFile {
    #[serde(default)]
    categories: Vec<CategoryRecord>,
    #[serde(default)]
    units: Vec<UnitRecord>,
}

#[derive(Debug, Deserialize)]
struct CategoryRecord {
    #[serde(alias = "type")]
    id: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(alias = "price", alias = "pricePerNight")]
    nightly_price: Money,
    #[serde(default, alias = "total", alias = "totalRooms")]
    total_units: u32,
    #[serde(alias = "maxOccupancy", alias = "maxGuests")]
    max_occupancy: u32,
    #[serde(default)]
    amenities: Vec<String>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UnitRecord {
    #[serde(alias = "roomNumber")]
    code: Scalar,
    #[serde(alias = "roomType", alias = "tentType")]
    category: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default = "active_by_default", alias = "isActive")]
    active: bool,
    #[serde(default)]
    floor: Option<Scalar>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default, alias = "price", alias = "pricePerNight")]
    nightly_price: Option<Money>,
    #[serde(default, alias = "maxGuests", alias = "maxOccupancy")]
    max_occupancy: Option<u32>,
}

const fn active_by_default() -> bool {
    true
}

/// Room numbers and floors show up both quoted and bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Scalar {
    Number(i64),
    Text(String),
}

impl Scalar {
    fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}

/// A seed file resolved against the current catalog, ready to import.
#[derive(Debug, Clone, Default)]
pub struct SeedCatalog {
    /// Categories to upsert.
    pub categories: Vec<Category>,
    /// Units to register.
    pub units: Vec<NewUnit>,
    /// Entries that were accepted with something dropped.
    pub warnings: Vec<String>,
}

/// What a seed import did.
#[derive(Debug, Clone, Default)]
pub struct SeedReport {
    /// Counts from the import transaction.
    pub summary: ImportSummary,
    /// Entries that were accepted with something dropped.
    pub warnings: Vec<String>,
}

fn invalid(field: String, message: impl Into<String>) -> Error {
    Error::Validation {
        field,
        message: message.into(),
    }
}

fn parse_category_id(value: &str, field: impl FnOnce() -> String) -> Result<CategoryId> {
    value
        .parse::<CategoryId>()
        .map_err(|e| invalid(field(), e.message))
}

/// Parses seed text and resolves it against the categories already stored.
///
/// `known` returns the stored category for an id, if any. A unit that
/// carries its own price or occupancy creates its category when neither the
/// file nor the store defines it; otherwise those per-unit values are
/// ignored and reported as warnings.
///
/// # Errors
///
/// Returns [`Error::Configuration`] for malformed YAML and
/// [`Error::Validation`] for an entry that cannot be normalized.
pub fn resolve_seed<F>(text: &str, mut known: F) -> Result<SeedCatalog>
where
    F: FnMut(&CategoryId) -> Result<Option<Category>>,
{
    let file: SeedFile = if text.trim().is_empty() {
        SeedFile::default()
    } else {
        serde_yaml::from_str(text)?
    };

    let mut catalog = SeedCatalog::default();
    let mut prices: HashMap<CategoryId, Money> = HashMap::new();

    for (i, record) in file.categories.into_iter().enumerate() {
        let id = parse_category_id(&record.id, || format!("categories[{i}].id"))?;
        let name = record.name.unwrap_or_else(|| id.to_string());
        let category = Category::builder(id.clone(), name)
            .nightly_price(record.nightly_price)
            .max_occupancy(record.max_occupancy)
            .total_units(record.total_units)
            .amenities(record.amenities)
            .description(record.description)
            .build()
            .map_err(|e| invalid(format!("categories[{i}].{}", e.field), e.message))?;
        prices.insert(id, category.nightly_price());
        catalog.categories.push(category);
    }

    // Categories implied by legacy unit rows, keyed for a stable order.
    let mut implied: BTreeMap<CategoryId, (Money, u32, u32)> = BTreeMap::new();

    for (i, record) in file.units.into_iter().enumerate() {
        let category = parse_category_id(&record.category, || format!("units[{i}].category"))?;
        let code = record.code.into_text();

        let mut unit = NewUnit::new(category.clone(), code.as_str())
            .map_err(|e| invalid(format!("units[{i}].{}", e.field), e.message))?
            .active(record.active)
            .location(record.location);
        if let Some(status) = record.status {
            let status = status
                .parse::<UnitStatus>()
                .map_err(|e| invalid(format!("units[{i}].status"), e.message))?;
            unit = unit.status(status);
        }
        if let Some(floor) = record.floor {
            unit = unit.floor(Some(floor.into_text()));
        }

        let carries_terms = record.nightly_price.is_some() || record.max_occupancy.is_some();
        if carries_terms {
            if let Some(listed) = prices.get(&category).copied() {
                if record.nightly_price.is_some_and(|p| p != listed) {
                    catalog.warnings.push(format!(
                        "unit {code}: per-unit price ignored, category '{category}' lists {listed}"
                    ));
                }
            } else if let Some(stored) = known(&category)? {
                prices.insert(category.clone(), stored.nightly_price());
                if record.nightly_price.is_some_and(|p| p != stored.nightly_price()) {
                    catalog.warnings.push(format!(
                        "unit {code}: per-unit price ignored, category '{category}' lists {}",
                        stored.nightly_price()
                    ));
                }
            } else {
                let entry = implied.entry(category.clone()).or_insert((
                    record.nightly_price.unwrap_or_default(),
                    record.max_occupancy.unwrap_or(1),
                    0,
                ));
                entry.2 += 1;
                if record.nightly_price.is_some_and(|p| p != entry.0) {
                    catalog.warnings.push(format!(
                        "unit {code}: price differs from the first '{category}' unit, using {}",
                        entry.0
                    ));
                }
                if let Some(guests) = record.max_occupancy {
                    entry.1 = entry.1.max(guests);
                }
            }
        }

        catalog.units.push(unit);
    }

    for (id, (price, max_occupancy, count)) in implied {
        log::debug!("Creating category '{id}' from {count} legacy unit row(s)");
        let category = Category::builder(id.clone(), id.as_str())
            .nightly_price(price)
            .max_occupancy(max_occupancy)
            .total_units(count)
            .build()
            .map_err(|e| invalid(format!("units.{}", e.field), e.message))?;
        catalog.categories.push(category);
    }

    Ok(catalog)
}

/// Reads a seed file and imports it in a single transaction.
///
/// # Errors
///
/// Returns an error if the file cannot be read, fails to parse, references
/// an unknown category, or the import transaction fails.
pub fn import_seed(db: &mut Database, path: &Path) -> Result<SeedReport> {
    let text = fs::read_to_string(path)?;
    let catalog = resolve_seed(&text, |id| Database::get_category(db.connection(), id))?;

    for warning in &catalog.warnings {
        log::warn!("{warning}");
    }

    let summary = db.import_catalog(&catalog.categories, &catalog.units)?;
    log::info!(
        "Imported {} categories and {} units from {}",
        summary.categories_created + summary.categories_updated,
        summary.units_created,
        path.display()
    );

    Ok(SeedReport {
        summary,
        warnings: catalog.warnings,
    })
}
