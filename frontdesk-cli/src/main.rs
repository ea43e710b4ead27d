//! Main entry point for the frontdesk CLI.
//!
//! This is the command-line interface for the hotel and restaurant front
//! desk. It provides commands for:
//! - `property`: Provisioning hotels and restaurants
//! - `register`: Registering guests and visits
//! - `guests`: Administering guest records
//! - `occupancy`: Checking room occupancy
//! - `watch`: Sending check-in, custom and checkout messages

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let logger = frontdesk::init_logger(cli.verbose, cli.quiet);
    let _ = logger.install();

    // Convert CLI args to GlobalOptions
    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        disable_autoinit: cli.disable_autoinit,
    };

    // Execute the command
    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::Property(cmd) => cmd.execute(&global),
        cli::Command::SuperAdmin(cmd) => cmd.execute(&global),
        cli::Command::Whoami(cmd) => cmd.execute(&global),
        cli::Command::Register(cmd) => cmd.execute(&global),
        cli::Command::Guests(cmd) => cmd.execute(&global),
        cli::Command::Occupancy(cmd) => cmd.execute(&global),
        cli::Command::Templates(cmd) => cmd.execute(&global),
        cli::Command::Link(cmd) => cmd.execute(&global),
        cli::Command::Watch(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
