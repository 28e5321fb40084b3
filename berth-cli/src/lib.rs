//! Library exports for berth-cli.
//!
//! The binary and the integration tests share these modules; the CLI
//! definition is also what shell completions are generated from.

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;
pub mod utils;

pub use cli::Cli;
