//! Data directory initialization.
//!
//! Creates the data directory and database, optionally writes a commented
//! configuration template, and optionally imports a catalog seed file into
//! the fresh database.

use std::fs;
use std::path::PathBuf;

use crate::database::{Database, DatabaseConfig, ImportSummary, DATABASE_FILE};
use crate::error::{Error, Result};

use super::seed::import_seed;

/// Options for initialization.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Data directory to initialize.
    pub data_dir: PathBuf,
    /// Replace an existing database.
    pub overwrite: bool,
    /// Write a configuration template.
    pub create_config: bool,
    /// Catalog seed file to import.
    pub seed: Option<PathBuf>,
}

impl InitOptions {
    /// Creates initialization options for a data directory.
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            overwrite: false,
            create_config: false,
            seed: None,
        }
    }

    /// Sets whether to replace an existing database.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether to write the configuration template.
    #[must_use]
    pub fn with_create_config(mut self, create_config: bool) -> Self {
        self.create_config = create_config;
        self
    }

    /// Sets the seed file to import.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<PathBuf>) -> Self {
        self.seed = seed;
        self
    }
}

/// Result of initialization.
#[derive(Debug)]
pub struct InitResult {
    /// Whether the data directory was created.
    pub data_dir_created: bool,
    /// Whether the database was created or recreated.
    pub database_created: bool,
    /// Whether the configuration template was written.
    pub config_created: bool,
    /// Seed import counts, when a seed file was given.
    pub seeded: Option<ImportSummary>,
    /// Warnings raised while importing the seed file.
    pub warnings: Vec<String>,
    /// Path to the data directory.
    pub data_dir: PathBuf,
}

const DEFAULT_CONFIG_TEMPLATE: &str = r#"# Berth configuration file

# Stay boundaries applied to every date-only request (defaults: 15:00 / 11:00)
# stay:
#   check_in_time: "15:00"
#   check_out_time: "11:00"

# Booking rules
# booking:
#   min_guests: 1
#   max_guests: 10
#   reference_prefix: BK
#   auto_assign_units: true

# Where availability totals come from: units | catalog (default: units)
# inventory_source: units

# Maximum lock wait time in seconds (default: 5)
# maximum_lock_wait_seconds: 5

# Default output format for listings: table | json | csv | tsv
# output_format: table
"#;

/// Initializes the data directory and database.
///
/// # Errors
///
/// Returns an error if:
/// - The data directory cannot be created
/// - The database already exists and `overwrite` is false
/// - The database cannot be initialized
/// - The configuration template cannot be written
/// - The seed file cannot be read or imported
///
/// # Examples
///
/// ```no_run
/// use berth::operations::init::{init_database, InitOptions};
/// use std::path::PathBuf;
///
/// let options = InitOptions::new(PathBuf::from("/tmp/berth-test"))
///     .with_create_config(true)
///     .with_seed(Some(PathBuf::from("catalog.yaml")));
///
/// let result = init_database(&options).unwrap();
/// println!("Database created: {}", result.database_created);
/// ```
pub fn init_database(options: &InitOptions) -> Result<InitResult> {
    let mut result = InitResult {
        data_dir_created: false,
        database_created: false,
        config_created: false,
        seeded: None,
        warnings: Vec::new(),
        data_dir: options.data_dir.clone(),
    };

    if !options.data_dir.exists() {
        fs::create_dir_all(&options.data_dir)?;
        result.data_dir_created = true;
    }

    let db_path = options.data_dir.join(DATABASE_FILE);
    let db_exists = db_path.exists();

    if db_exists && !options.overwrite {
        return Err(Error::Validation {
            field: "database".into(),
            message: format!(
                "Database already exists at {}. Use --overwrite to replace it.",
                db_path.display()
            ),
        });
    }

    if db_exists {
        fs::remove_file(&db_path)?;
        for suffix in ["-wal", "-shm"] {
            let sidecar = options.data_dir.join(format!("{DATABASE_FILE}{suffix}"));
            if sidecar.exists() {
                fs::remove_file(sidecar)?;
            }
        }
    }

    let mut db = Database::open(DatabaseConfig::new(&db_path))?;
    result.database_created = true;
    log::info!("Initialized database at {}", db_path.display());

    if options.create_config {
        let config_path = options.data_dir.join("config.yaml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
            result.config_created = true;
        }
    }

    if let Some(seed) = &options.seed {
        let report = import_seed(&mut db, seed)?;
        result.seeded = Some(report.summary);
        result.warnings = report.warnings;
    }

    Ok(result)
}
