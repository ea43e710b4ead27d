//! Configuration system for frontdesk.
//!
//! Configuration is YAML, layered from several sources. From highest to
//! lowest precedence:
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`FRONTDESK_*`)
//! 3. Private project config (`frontdesk.local.yaml`)
//! 4. Project config (`frontdesk.yaml`)
//! 5. User config (`<data_dir>/config.yaml`)
//! 6. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use frontdesk::config::ConfigBuilder;
//! use std::path::Path;
//!
//! let config = ConfigBuilder::new()
//!     .with_working_dir(Path::new("/srv/frontdesk"))
//!     .build()
//!     .unwrap();
//! println!("rechecking every {:?}", config.recheck_interval());
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

#[cfg(test)]
mod proptests;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource};
pub use merger::ConfigMerger;
pub use schema::{Config, MessagingConfig, OutputFormat};
pub use validator::ConfigValidator;
