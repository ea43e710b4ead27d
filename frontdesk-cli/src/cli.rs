//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CompletionsCommand, GuestsCommand, InitCommand, LinkCommand, OccupancyCommand,
    PropertyCommand, RegisterCommand, SuperAdminCommand, TemplatesCommand, WatchCommand,
    WhoamiCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line front desk for hotels and restaurants.
#[derive(Parser)]
#[command(name = "frontdesk")]
#[command(version, about = "Hotel and restaurant front desk", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "FRONTDESK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds)
    #[arg(
        long,
        value_name = "SECONDS",
        global = true,
        env = "FRONTDESK_BUSY_TIMEOUT"
    )]
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization
    #[arg(long, global = true, env = "FRONTDESK_DISABLE_AUTOINIT")]
    pub disable_autoinit: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and database
    Init(InitCommand),

    /// Manage hotels and restaurants
    Property(PropertyCommand),

    /// Manage the super-admin account
    SuperAdmin(SuperAdminCommand),

    /// Show the role an account email resolves to
    Whoami(WhoamiCommand),

    /// Register a hotel guest or restaurant visit
    Register(RegisterCommand),

    /// List, inspect, edit and delete guests
    Guests(GuestsCommand),

    /// Show which rooms of a hotel are occupied
    Occupancy(OccupancyCommand),

    /// Manage message templates
    Templates(TemplatesCommand),

    /// Print or resolve a registration link
    Link(LinkCommand),

    /// Send guest messages as stays begin and end
    Watch(WatchCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
