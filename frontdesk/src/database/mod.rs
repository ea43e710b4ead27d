//! SQLite persistence of the document tree.
//!
//! The tree is stored as one row per leaf value, keyed by its full path.
//! [`Database`] knows nothing about hotels or guests; the typed layout on top
//! of it lives in [`crate::store`].
//!
//! # Examples
//!
//! ```no_run
//! use frontdesk::database::{Database, DatabaseConfig};
//! use frontdesk::store::StorePath;
//! use serde_json::json;
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/frontdesk.db")).unwrap();
//! let path: StorePath = "superAdmin".parse().unwrap();
//! db.write_subtree(&path, &json!({ "email": "owner@example.com", "uid": "u1" })).unwrap();
//! println!("{:?}", db.read_subtree(&path).unwrap());
//! ```

mod config;
mod connection;
pub mod migrations;
mod schema;
mod tree;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE,
    DATA_DIR_ENV,
};
pub use connection::Database;
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
