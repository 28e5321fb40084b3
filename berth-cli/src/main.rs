//! Main entry point for the berth CLI.
//!
//! This is the command-line interface for the berth reservation engine:
//! - `book`, `pay`, `status`, `cancel`: drive a reservation through its lifecycle
//! - `assign`, `unbind`: manage unit bindings
//! - `availability`, `show`, `list`: inspect inventory and bookings
//! - `category`, `unit`, `init`: administer the catalog

use berth_cli::cli::{Cli, Command};
use berth_cli::utils::GlobalOptions;
use clap::Parser;

fn main() {
    let cli = Cli::parse();

    berth::init_logger(cli.verbose, cli.quiet).install();

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        disable_autoinit: cli.disable_autoinit,
    };

    let result = match cli.command {
        Command::Init(cmd) => cmd.execute(&global),
        Command::Availability(cmd) => cmd.execute(&global),
        Command::Book(cmd) => cmd.execute(&global),
        Command::Pay(cmd) => cmd.execute(&global),
        Command::Status(cmd) => cmd.execute(&global),
        Command::Cancel(cmd) => cmd.execute(&global),
        Command::Assign(cmd) => cmd.execute(&global),
        Command::Unbind(cmd) => cmd.execute(&global),
        Command::Show(cmd) => cmd.execute(&global),
        Command::List(cmd) => cmd.execute(&global),
        Command::Category(cmd) => cmd.execute(&global),
        Command::Unit(cmd) => cmd.execute(&global),
        Command::Validate(cmd) => cmd.execute(&global),
        Command::ShowDataDir(cmd) => cmd.execute(&global),
        Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
