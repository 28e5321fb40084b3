//! Category administration commands.

use crate::error::CliError;
use crate::output::{or_dash, Listing};
use crate::utils::{load_configuration, open_engine, GlobalOptions};
use berth::config::OutputFormat;
use berth::{Category, CategoryId, Money, ReservationEngine};
use clap::{Args, Subcommand};

/// Manage room categories.
#[derive(Args)]
pub struct CategoryCommand {
    #[command(subcommand)]
    pub action: CategoryAction,
}

/// Category subcommands.
#[derive(Subcommand)]
pub enum CategoryAction {
    /// List categories
    List {
        /// Output format
        #[arg(long, value_enum, ignore_case = true)]
        format: Option<OutputFormat>,
    },

    /// Show one category with its unit counts
    Show {
        /// Category id
        #[arg(value_name = "CATEGORY")]
        id: CategoryId,
    },

    /// Create a category or change an existing one
    Upsert(UpsertArgs),

    /// Delete a category no unit or reservation refers to
    Delete {
        /// Category id
        #[arg(value_name = "CATEGORY")]
        id: CategoryId,
    },
}

/// Fields for `category upsert`; omitted fields keep their stored value.
#[derive(Args)]
pub struct UpsertArgs {
    /// Category id
    #[arg(value_name = "CATEGORY")]
    pub id: CategoryId,

    /// Display name
    #[arg(long, value_name = "NAME")]
    pub name: Option<String>,

    /// Nightly price (e.g. 120.00)
    #[arg(long, value_name = "AMOUNT")]
    pub price: Option<Money>,

    /// Maximum number of guests
    #[arg(long, value_name = "COUNT")]
    pub max_occupancy: Option<u32>,

    /// Static unit count used when `inventory_source` is `catalog`
    #[arg(long, value_name = "COUNT")]
    pub total_units: Option<u32>,

    /// Amenity (repeatable; replaces the stored list)
    #[arg(long = "amenity", value_name = "TEXT")]
    pub amenities: Vec<String>,

    /// Description
    #[arg(long, value_name = "TEXT")]
    pub description: Option<String>,
}

impl CategoryCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let mut engine = open_engine(global, &config)?;

        match self.action {
            CategoryAction::List { format } => {
                let categories = engine.list_categories()?;
                let mut rows = Vec::with_capacity(categories.len());
                for c in &categories {
                    rows.push(vec![
                        c.id().to_string(),
                        c.name().to_string(),
                        c.nightly_price().to_string(),
                        c.max_occupancy().to_string(),
                        c.total_units().to_string(),
                        engine.list_units(Some(c.id()), true)?.len().to_string(),
                    ]);
                }
                Listing {
                    records: &categories,
                    headers: &[
                        "id",
                        "name",
                        "nightly_price",
                        "max_occupancy",
                        "total_units",
                        "active_units",
                    ],
                    rows,
                }
                .print(format.unwrap_or_else(|| config.output_format()))?;
            }
            CategoryAction::Show { id } => show(&engine, &id)?,
            CategoryAction::Upsert(args) => {
                let created = upsert(&mut engine, args)?;
                if !global.quiet {
                    println!("{}", if created { "Created" } else { "Updated" });
                }
            }
            CategoryAction::Delete { id } => {
                engine.delete_category(&id)?;
                if !global.quiet {
                    println!("Deleted category '{id}'");
                }
            }
        }
        Ok(())
    }
}

fn show(engine: &ReservationEngine, id: &CategoryId) -> Result<(), CliError> {
    let category = engine.get_category(id)?;
    let active = engine.list_units(Some(id), true)?.len();

    println!("Category:       {} ({})", category.id(), category.name());
    println!("Nightly price:  {}", category.nightly_price());
    println!("Max occupancy:  {}", category.max_occupancy());
    println!("Catalog units:  {}", category.total_units());
    println!("Active units:   {active}");
    println!("Assignable now: {}", engine.count_available_units(id)?);
    if !category.amenities().is_empty() {
        println!("Amenities:      {}", category.amenities().join(", "));
    }
    println!("Description:    {}", or_dash(category.description()));
    Ok(())
}

fn upsert(engine: &mut ReservationEngine, args: UpsertArgs) -> Result<bool, CliError> {
    let existing = match engine.get_category(&args.id) {
        Ok(category) => Some(category),
        Err(e) if e.is_not_found() => None,
        Err(e) => return Err(e.into()),
    };

    let missing = |field: &str| {
        CliError::InvalidArguments(format!("--{field} is required for a new category"))
    };

    let name = match (args.name, &existing) {
        (Some(name), _) => name,
        (None, Some(c)) => c.name().to_string(),
        (None, None) => return Err(missing("name")),
    };
    let price = args
        .price
        .or_else(|| existing.as_ref().map(Category::nightly_price))
        .ok_or_else(|| missing("price"))?;
    let max_occupancy = args
        .max_occupancy
        .or_else(|| existing.as_ref().map(Category::max_occupancy))
        .ok_or_else(|| missing("max-occupancy"))?;
    let total_units = args
        .total_units
        .or_else(|| existing.as_ref().map(Category::total_units))
        .unwrap_or(0);
    let amenities = if args.amenities.is_empty() {
        existing
            .as_ref()
            .map(|c| c.amenities().to_vec())
            .unwrap_or_default()
    } else {
        args.amenities
    };
    let description = args.description.or_else(|| {
        existing
            .as_ref()
            .and_then(|c| c.description().map(str::to_string))
    });

    let category = Category::builder(args.id, name)
        .nightly_price(price)
        .max_occupancy(max_occupancy)
        .total_units(total_units)
        .amenities(amenities)
        .description(description)
        .build()?;

    Ok(engine.upsert_category(&category)?)
}
