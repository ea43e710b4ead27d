//! Init command implementation.
//!
//! This module implements the `init` command for explicitly initializing
//! the frontdesk data directory and database.

use crate::error::CliError;
use crate::utils::GlobalOptions;
use clap::Parser;
use frontdesk::database::{default_data_dir, DATABASE_FILE};
use frontdesk::operations::init::{init_database, InitOptions};
use std::path::PathBuf;

/// Initialize frontdesk data directory and database.
#[derive(Parser)]
#[command(about = "Initialize frontdesk data directory and database")]
pub struct InitCommand {
    /// Data directory to initialize
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Overwrite existing database
    #[arg(long)]
    overwrite: bool,

    /// Create default configuration file
    #[arg(long)]
    with_config: bool,

    /// Register the super-admin account with this email
    #[arg(long, value_name = "EMAIL")]
    super_admin: Option<String>,

    /// Preview actions without executing
    #[arg(long)]
    dry_run: bool,
}

impl InitCommand {
    /// Execute the init command.
    ///
    /// `--data-dir` names where to create, not where to find, so
    /// `--disable-autoinit` does not apply here.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        // Priority: command flag > global flag > default
        let data_dir = self
            .data_dir
            .or_else(|| global.data_dir.clone())
            .or_else(|| default_data_dir().ok())
            .ok_or_else(|| {
                CliError::Config(
                    "Could not determine data directory (home directory not found)".to_string(),
                )
            })?;

        if self.dry_run {
            println!("Dry-run mode: no changes will be made");
            println!();
            println!("Would initialize frontdesk in: {}", data_dir.display());

            if data_dir.exists() {
                println!("  - Data directory already exists: {}", data_dir.display());
            } else {
                println!("  - Create data directory: {}", data_dir.display());
            }

            let db_path = data_dir.join(DATABASE_FILE);
            if db_path.exists() {
                if self.overwrite {
                    println!("  - Remove existing database: {}", db_path.display());
                    println!("  - Create new database: {}", db_path.display());
                } else {
                    println!(
                        "  - ERROR: Database already exists (use --overwrite to replace): {}",
                        db_path.display()
                    );
                }
            } else {
                println!("  - Create database: {}", db_path.display());
            }

            if self.with_config {
                let config_path = data_dir.join("config.yaml");
                if config_path.exists() {
                    println!(
                        "  - Configuration file already exists (will not overwrite): {}",
                        config_path.display()
                    );
                } else {
                    println!("  - Create configuration file: {}", config_path.display());
                }
            }

            if let Some(ref email) = self.super_admin {
                println!("  - Register super-admin: {email}");
            }

            return Ok(());
        }

        let mut options = InitOptions::new(data_dir)
            .with_overwrite(self.overwrite)
            .with_create_config(self.with_config);
        if let Some(email) = self.super_admin {
            options = options.with_super_admin(email);
        }

        let result = init_database(&options).map_err(CliError::from)?;

        println!("Initialized frontdesk in: {}", result.data_dir.display());

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

        if result.super_admin_registered {
            println!("  - Registered super-admin");
        }

        Ok(())
    }
}
