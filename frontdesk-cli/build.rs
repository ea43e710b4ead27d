//! Build script for frontdesk-cli.
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
    Command::new("frontdesk")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Hotel and restaurant front desk")
        .long_about(
            "Command-line front desk for registering guests, tracking room occupancy and messaging guests",
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
                .env("FRONTDESK_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the default busy timeout (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("FRONTDESK_BUSY_TIMEOUT"),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic database initialization")
                .global(true)
                .action(clap::ArgAction::SetTrue)
                .env("FRONTDESK_DISABLE_AUTOINIT"),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Initialize the data directory and database")
                .long_about("Set up the frontdesk database and configuration"),
            Command::new("property")
                .about("Manage hotels and restaurants")
                .long_about("Add, list, show, update and remove properties and set hotel room capacity"),
            Command::new("super-admin")
                .about("Manage the super-admin account")
                .long_about("Register the single account that administers every property"),
            Command::new("whoami")
                .about("Show the role an account email resolves to")
                .long_about("Resolve an email to the super-admin or to the property it administers"),
            Command::new("register")
                .about("Register a hotel guest or restaurant visit")
                .long_about("Validate a registration form and store the guest, checking room occupancy for hotels"),
            Command::new("guests")
                .about("List, inspect, edit and delete guests")
                .long_about("Administer the guest records of one property"),
            Command::new("occupancy")
                .about("Show which rooms of a hotel are occupied")
                .long_about("Resolve room occupancy now or at a given instant"),
            Command::new("templates")
                .about("Manage message templates")
                .long_about("List, add, update and delete the check-in, checkout and custom templates"),
            Command::new("link")
                .about("Print or resolve a registration link")
                .long_about("Build the self-registration link of a property or resolve one back"),
            Command::new("watch")
                .about("Send guest messages as stays begin and end")
                .long_about("Run the messaging lifecycle for one or more properties until interrupted"),
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

    // Generate main frontdesk.1 man page
    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("frontdesk.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
