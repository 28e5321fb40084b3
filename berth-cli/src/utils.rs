//! Utility functions for CLI operations.
//!
//! This module provides helpers shared across commands: data directory and
//! configuration resolution, opening the engine, argument parsing and
//! common output formatting.

use crate::error::CliError;
use berth::config::{LOCAL_CONFIG_FILE, PROJECT_CONFIG_FILE, USER_CONFIG_FILE};
use berth::database::DATABASE_FILE;
use berth::{Config, ConfigBuilder, DatabaseConfig, ExecutionResult, ReservationEngine};
use chrono::{DateTime, NaiveDate, Utc};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,
}

/// Resolve the data directory path.
///
/// Priority: `--data-dir` (or `BERTH_DATA_DIR` through clap), then `~/.berth`.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match global.data_dir {
        Some(ref dir) => Ok(dir.clone()),
        None => berth::database::resolve_data_dir().map_err(CliError::from),
    }
}

/// Load hierarchical configuration.
///
/// The user `config.yaml` is read from the resolved data directory; project
/// files are discovered from the current directory upwards; `BERTH_*`
/// environment variables override both.
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;
    ConfigBuilder::new()
        .with_data_dir(&data_dir)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Open the reservation engine over the database in the data directory.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is
/// disabled by flag, environment or configuration.
pub fn open_engine(global: &GlobalOptions, config: &Config) -> Result<ReservationEngine, CliError> {
    let db_path = resolve_data_dir(global)?.join(DATABASE_FILE);
    let autoinit_disabled = global.disable_autoinit || config.disable_autoinit == Some(true);

    if !db_path.exists() && autoinit_disabled {
        return Err(CliError::NoDataDirectory);
    }

    let busy_timeout = match global.busy_timeout {
        Some(seconds) => Duration::from_secs(seconds.into()),
        None => config.lock_wait(),
    };
    let db_config = DatabaseConfig::new(db_path).with_busy_timeout(busy_timeout);

    log::debug!("Opening database at {}", db_config.path.display());
    ReservationEngine::open(db_config, config.clone()).map_err(CliError::from)
}

/// Parse a `YYYY-MM-DD` day from the command line.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("'{value}' is not a date in YYYY-MM-DD form"))
}

/// Format a timestamp for display.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Shorten a path for display.
///
/// If the path is within the home directory, show it as ~/...
/// Otherwise, show the full path.
pub fn shorten_path(path: &Path) -> String {
    if let Some(home) = home::home_dir() {
        if let Ok(relative) = path.strip_prefix(&home) {
            return format!("~/{}", relative.display());
        }
    }
    path.display().to_string()
}

/// Report what a plan did, or would do for dry runs.
///
/// Everything goes to stderr so stdout stays machine-readable. Committed
/// plans already log their warnings through the installed logger.
pub fn report_execution(result: &ExecutionResult, global: &GlobalOptions) {
    if global.quiet {
        return;
    }
    if result.dry_run {
        for warning in &result.warnings {
            eprintln!("Warning: {warning}");
        }
        eprintln!("Dry run - no changes made. Would perform:");
        for action in &result.actions_taken {
            eprintln!("  - {action}");
        }
    } else if global.verbose {
        for action in &result.actions_taken {
            eprintln!("{action}");
        }
    }
}

/// Find project configuration file (berth.yaml) starting from current directory.
///
/// Searches up the directory tree for `berth.local.yaml` or `berth.yaml`.
/// Returns the first match found, with `berth.local.yaml` taking precedence.
pub fn find_project_config() -> Result<Option<PathBuf>, CliError> {
    let mut current = env::current_dir()?;

    loop {
        let local_config = current.join(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Ok(Some(local_config));
        }

        let config = current.join(PROJECT_CONFIG_FILE);
        if config.exists() {
            return Ok(Some(config));
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    Ok(None)
}

/// Resolve the configuration file to use (project or user).
///
/// Returns the nearest project file if one exists, otherwise the user
/// `config.yaml` in the data directory (which may not exist yet).
pub fn resolve_config_file(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match find_project_config()? {
        Some(path) => Ok(path),
        None => Ok(resolve_data_dir(global)?.join(USER_CONFIG_FILE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_format_timestamp() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 45).unwrap();
        assert_eq!(format_timestamp(ts), "2024-01-15 10:30:45");
    }

    #[test]
    fn test_shorten_path_outside_home() {
        let path = PathBuf::from("/usr/local/bin");
        assert_eq!(shorten_path(&path), "/usr/local/bin");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-12-25").unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 25).unwrap()
        );
        assert!(parse_date("25/12/2024").is_err());
        assert!(parse_date("2024-02-30").is_err());
    }

    #[test]
    fn test_explicit_data_dir_wins() {
        let global = GlobalOptions {
            data_dir: Some(PathBuf::from("/tmp/berth-explicit")),
            ..GlobalOptions::default()
        };
        assert_eq!(
            resolve_data_dir(&global).unwrap(),
            PathBuf::from("/tmp/berth-explicit")
        );
    }
}
