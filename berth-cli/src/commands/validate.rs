//! Command to validate a berth configuration file.

use crate::error::CliError;
use crate::utils::{resolve_config_file, GlobalOptions};
use berth::config::{ConfigLoader, ConfigValidator};
use clap::Args;
use std::path::PathBuf;

/// Validate a berth configuration file.
#[derive(Args)]
pub struct ValidateCommand {
    /// Configuration file to validate (default: nearest berth.yaml, else the user config)
    #[arg(value_name = "CONFIG_PATH")]
    pub config_path: Option<PathBuf>,
}

impl ValidateCommand {
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let path = match self.config_path {
            Some(path) => path,
            None => resolve_config_file(global)?,
        };

        if !path.exists() {
            return Err(CliError::InvalidArguments(format!(
                "File not found: {}",
                path.display()
            )));
        }

        let config = ConfigLoader::load_file(&path)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
        ConfigValidator::validate(&config)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;

        if !global.quiet {
            println!("Configuration is valid: {}", path.display());
        }
        Ok(())
    }
}
