//! CLI command implementations.
//!
//! This module contains the implementations of all CLI commands:
//! - `init`: Create the data directory and database
//! - `property`: Manage hotels and restaurants
//! - `super-admin`, `whoami`: Manage and resolve accounts
//! - `register`: Register a hotel guest or restaurant visit
//! - `guests`: List, inspect, edit and delete guests
//! - `occupancy`: Show occupied rooms
//! - `templates`: Manage message templates
//! - `link`: Print or resolve registration links
//! - `watch`: Serve guest messaging
//! - `completions`: Generate shell completion scripts

pub mod completions;
pub mod guests;
pub mod identity;
pub mod init;
pub mod link;
pub mod occupancy;
pub mod property;
pub mod register;
pub mod templates;
pub mod watch;

pub use completions::CompletionsCommand;
pub use guests::GuestsCommand;
pub use identity::{SuperAdminCommand, WhoamiCommand};
pub use init::InitCommand;
pub use link::LinkCommand;
pub use occupancy::OccupancyCommand;
pub use property::PropertyCommand;
pub use register::RegisterCommand;
pub use templates::TemplatesCommand;
pub use watch::WatchCommand;
