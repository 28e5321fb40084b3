//! Build script for berth-cli.
//!
//! This script generates man pages at build time using clap_mangen.
//! The generated man page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing from
//! the main crate, since build scripts cannot depend on the crate being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("berth")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Manage lodging reservations and room inventory")
        .long_about(
            "Command-line tool for booking, paying for and assigning rooms and pitches",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("BERTH_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the default busy timeout (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("BERTH_BUSY_TIMEOUT"),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic database initialization")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .env("BERTH_DISABLE_AUTOINIT"),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Initialize berth data directory and database")
                .long_about("Set up the berth database and configuration, optionally importing a catalog seed file"),
            Command::new("availability")
                .about("Check how many units of a category are free for a stay"),
            Command::new("book")
                .about("Create a reservation")
                .long_about("Create a reservation and print its booking reference"),
            Command::new("pay")
                .about("Update the payment status of a reservation")
                .long_about("Record a payment status change; capturing payment confirms a pending reservation"),
            Command::new("status").about("Move a reservation to a new status"),
            Command::new("cancel").about("Cancel a reservation"),
            Command::new("assign")
                .about("Bind a unit to a reservation")
                .long_about("Bind the given unit, or the first free unit of the reserved category"),
            Command::new("unbind").about("Release the unit bound to a reservation"),
            Command::new("show").about("Show a reservation"),
            Command::new("list")
                .about("List reservations")
                .long_about("Display reservations as a table, JSON, CSV or TSV"),
            Command::new("category").about("Manage room categories"),
            Command::new("unit").about("Manage individual units"),
            Command::new("validate")
                .about("Validate a configuration file")
                .long_about("Check a berth configuration file for errors"),
            Command::new("show-data-dir")
                .about("Show the resolved data directory path")
                .long_about("Display the path to the berth data directory"),
            Command::new("completions")
                .about("Generate shell completion scripts")
                .long_about("Generate shell completion scripts for bash, zsh, fish, or PowerShell"),
        ])
}

fn main() {
    // Generate man pages at build time
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    // Generate main berth.1 man page
    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("berth.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
