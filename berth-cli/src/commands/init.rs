//! Init command implementation.
//!
//! This module implements the `init` command for explicitly initializing
//! the berth data directory and database, optionally importing a catalog
//! seed file.

use crate::error::CliError;
use crate::utils::{resolve_data_dir, GlobalOptions};
use berth::database::DATABASE_FILE;
use berth::operations::init::{init_database, InitOptions};
use clap::Args;
use std::path::PathBuf;

/// Initialize berth data directory and database.
#[derive(Args)]
pub struct InitCommand {
    /// Catalog seed file (YAML with `categories` and `units`) to import
    #[arg(long, value_name = "FILE")]
    seed: Option<PathBuf>,

    /// Overwrite existing database
    #[arg(long)]
    overwrite: bool,

    /// Create default configuration file
    #[arg(long)]
    with_config: bool,

    /// Preview actions without executing
    #[arg(long)]
    dry_run: bool,
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// `--disable-autoinit` has no effect here; `--data-dir` names the
    /// directory to create.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let data_dir = resolve_data_dir(global)?;

        if let Some(ref seed) = self.seed {
            if !seed.is_file() {
                return Err(CliError::InvalidArguments(format!(
                    "Seed file not found: {}",
                    seed.display()
                )));
            }
        }

        if self.dry_run {
            self.describe(&data_dir);
            return Ok(());
        }

        let options = InitOptions::new(data_dir)
            .with_overwrite(self.overwrite)
            .with_create_config(self.with_config)
            .with_seed(self.seed.clone());

        // Seed warnings are logged by the importer
        let result = init_database(&options)?;

        if global.quiet {
            return Ok(());
        }

        println!("Initialized berth in: {}", result.data_dir.display());

        if result.data_dir_created {
            println!("  - Created data directory");
        }

        if result.database_created {
            if self.overwrite {
                println!("  - Recreated database");
            } else {
                println!("  - Created database");
            }
        }

        if result.config_created {
            println!("  - Created default configuration file");
        } else if self.with_config {
            println!("  - Configuration file already exists (not overwritten)");
        }

        if let Some(summary) = result.seeded {
            println!(
                "  - Imported {} new and {} updated categories, {} units ({} already registered)",
                summary.categories_created,
                summary.categories_updated,
                summary.units_created,
                summary.units_skipped
            );
        }

        Ok(())
    }

    fn describe(&self, data_dir: &std::path::Path) {
        println!("Dry-run mode: no changes will be made");
        println!();
        println!("Would initialize berth in: {}", data_dir.display());

        if data_dir.exists() {
            println!("  - Data directory already exists: {}", data_dir.display());
        } else {
            println!("  - Create data directory: {}", data_dir.display());
        }

        let db_path = data_dir.join(DATABASE_FILE);
        if !db_path.exists() {
            println!("  - Create database: {}", db_path.display());
        } else if self.overwrite {
            println!("  - Remove existing database: {}", db_path.display());
            println!("  - Create new database: {}", db_path.display());
        } else {
            println!(
                "  - ERROR: Database already exists (use --overwrite to replace): {}",
                db_path.display()
            );
        }

        if self.with_config {
            let config_path = data_dir.join(berth::config::USER_CONFIG_FILE);
            if config_path.exists() {
                println!(
                    "  - Configuration file already exists (will not overwrite): {}",
                    config_path.display()
                );
            } else {
                println!("  - Create configuration file: {}", config_path.display());
            }
        }

        if let Some(ref seed) = self.seed {
            println!("  - Import catalog from: {}", seed.display());
        }
    }
}
