//! Data directory initialization.
//!
//! Creates the data directory and the document store file, optionally
//! writes a commented configuration file and registers the super-admin
//! account in one step.

use std::fs;
use std::path::PathBuf;

use crate::database::{DatabaseConfig, DATABASE_FILE};
use crate::error::{Error, Result};
use crate::store::SqliteDocumentStore;

use super::executor::PlanExecutor;
use super::identity::plan_register_super_admin;

/// Options for data directory initialization.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Data directory to initialize.
    pub data_dir: PathBuf,
    /// Replace an existing store file.
    pub overwrite: bool,
    /// Write a default `config.yaml`.
    pub create_config: bool,
    /// Register this email as the super-admin.
    pub super_admin: Option<String>,
}

impl InitOptions {
    /// Options for initializing `data_dir`.
    #[must_use]
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            overwrite: false,
            create_config: false,
            super_admin: None,
        }
    }

    /// Sets whether to replace an existing store file.
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether to write the default configuration file.
    #[must_use]
    pub fn with_create_config(mut self, create_config: bool) -> Self {
        self.create_config = create_config;
        self
    }

    /// Registers `email` as the super-admin once the store exists.
    #[must_use]
    pub fn with_super_admin(mut self, email: impl Into<String>) -> Self {
        self.super_admin = Some(email.into());
        self
    }
}

/// Outcome of [`init_database`].
#[derive(Debug)]
pub struct InitResult {
    /// The data directory had to be created.
    pub data_dir_created: bool,
    /// The store file was created or recreated.
    pub database_created: bool,
    /// A configuration file was written.
    pub config_created: bool,
    /// The super-admin account was registered.
    pub super_admin_registered: bool,
    /// Path to the data directory.
    pub data_dir: PathBuf,
}

const DEFAULT_CONFIG_TEMPLATE: &str = r"# Front desk configuration

# Origin used to build guest self-registration links
# base_url: https://desk.example.com

# Seconds between checkout sweeps while watching (default: 60)
# recheck_interval_seconds: 60

# Seconds to wait for the store lock (default: 5)
# maximum_lock_wait_seconds: 5

# Default output format for listings: json, csv, tsv or table
# output_format: table

# Message timing, in seconds
# messaging:
#   custom_spacing_seconds: 60
#   checkout_lead_seconds: 60
#   resto_checkout_after_seconds: 180
";

/// Initializes the data directory and document store.
///
/// # Errors
///
/// Returns [`Error::Validation`] if the store file exists and `overwrite`
/// is not set, [`Error::SuperAdminExists`] if a super-admin is requested
/// on a store that has one, or an I/O or database error.
///
/// # Examples
///
/// ```no_run
/// use frontdesk::operations::{init_database, InitOptions};
/// use std::path::PathBuf;
///
/// let options = InitOptions::new(PathBuf::from("/tmp/frontdesk-test"))
///     .with_create_config(true)
///     .with_super_admin("root@desk.example.com");
///
/// let result = init_database(&options).unwrap();
/// assert!(result.database_created);
/// ```
pub fn init_database(options: &InitOptions) -> Result<InitResult> {
    let mut result = InitResult {
        data_dir_created: false,
        database_created: false,
        config_created: false,
        super_admin_registered: false,
        data_dir: options.data_dir.clone(),
    };

    if !options.data_dir.exists() {
        fs::create_dir_all(&options.data_dir)?;
        result.data_dir_created = true;
    }

    let db_path = options.data_dir.join(DATABASE_FILE);
    if db_path.exists() {
        if !options.overwrite {
            return Err(Error::Validation {
                field: "database".into(),
                message: format!(
                    "Database already exists at {}. Use --overwrite to replace it.",
                    db_path.display()
                ),
            });
        }
        fs::remove_file(&db_path)?;
    }

    let store = SqliteDocumentStore::open(DatabaseConfig::new(&db_path))?;
    result.database_created = true;
    log::info!("created document store at {}", db_path.display());

    if options.create_config {
        let config_path = options.data_dir.join("config.yaml");
        if !config_path.exists() {
            fs::write(&config_path, DEFAULT_CONFIG_TEMPLATE)?;
            result.config_created = true;
        }
    }

    if let Some(email) = &options.super_admin {
        let plan = plan_register_super_admin(&store, email, None)?;
        PlanExecutor::new(&store).execute(&plan)?;
        result.super_admin_registered = true;
    }

    Ok(result)
}
