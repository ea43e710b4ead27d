//! Front desk operations using the plan-execute pattern.
//!
//! Every write the desk performs is first planned, then executed. Planning
//! reads the store, validates the request and produces an
//! [`OperationPlan`]; [`PlanExecutor`] applies it, or only reports it in
//! dry-run mode.
//!
//! # Examples
//!
//! ```
//! use frontdesk::clock::ManualClock;
//! use frontdesk::operations::{provision, PlanExecutor, ProvisionOptions};
//! use frontdesk::store::{self, SqliteDocumentStore};
//! use frontdesk::PropertyKind;
//! use chrono::NaiveDate;
//!
//! let store = SqliteDocumentStore::open_in_memory().unwrap();
//! let clock = ManualClock::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap(),
//! );
//!
//! let options = ProvisionOptions::new(PropertyKind::Hotel, "Sea View", "sea@desk.example.com");
//! let (plan, hotel) = provision::plan_create(&store, &options, &clock).unwrap();
//! PlanExecutor::new(&store).execute(&plan).unwrap();
//!
//! let rooms = provision::plan_set_rooms(&store, &hotel, 12).unwrap();
//! PlanExecutor::new(&store).execute(&rooms).unwrap();
//! assert_eq!(store::load_room_range(&store, &hotel).unwrap().len(), 12);
//! ```

pub mod executor;
pub mod guests;
pub mod identity;
pub mod init;
pub mod plan;
pub mod provision;
pub mod register;
pub mod templates;

#[cfg(test)]
mod proptests;

pub use executor::{ExecutionResult, PlanExecutor};
pub use guests::{list_guests, resto_stats, GuestFilter, GuestUpdate, RestoStats};
pub use identity::{find_account, plan_register_super_admin, resolve_role, Role};
pub use init::{init_database, InitOptions, InitResult};
pub use plan::{OperationPlan, PlanAction};
pub use provision::{PropertyUpdate, ProvisionOptions};
pub use register::{RegisterOptions, RegisterPlan};
