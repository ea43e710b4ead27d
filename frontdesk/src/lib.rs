#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # frontdesk
//!
//! A library for running the front desk of hotels and restaurants.
//!
//! Properties keep their guests, room capacity and message templates in a
//! hierarchical document store. The library decides which rooms are
//! occupied at any instant, validates registrations against that picture,
//! and drives each guest's automated check-in, custom and checkout
//! messages.
//!
//! ## Core Types
//!
//! - [`RoomNumber`] and [`RoomRange`]: a hotel's rooms
//! - [`PropertyRef`] and [`Property`]: hotels and restaurants
//! - [`stay::StayInterval`]: when a stay holds its room
//! - [`occupancy::OccupancySnapshot`]: which rooms are taken at an instant
//! - [`lifecycle::LifecycleSession`]: message dispatch and checkout sweeps
//! - [`Error`] and [`Result`]: Error handling types
//! - [`Logger`] and [`LogLevel`]: Logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use frontdesk::guest::HotelStay;
//! use frontdesk::occupancy::resolve_occupied_rooms;
//! use frontdesk::{RoomNumber, RoomRange};
//!
//! let stay = HotelStay {
//!     room_no: Some("102".into()),
//!     check_in: Some("2024-01-01".into()),
//!     check_in_time: Some("12:00".into()),
//!     check_out: Some("2024-01-02".into()),
//!     check_out_time: Some("11:00".into()),
//!     ..HotelStay::default()
//! };
//! let evening = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(18, 0, 0).unwrap();
//!
//! let occupied = resolve_occupied_rooms([&stay], RoomRange::new(3), evening);
//! assert!(occupied.contains(&RoomNumber::new(102)));
//! assert_eq!(occupied.len(), 1);
//! ```

pub mod booking;
pub mod clock;
pub mod config;
pub mod database;
pub mod error;
pub mod guest;
pub mod lifecycle;
pub mod links;
pub mod logging;
pub mod messaging;
pub mod occupancy;
pub mod operations;
pub mod property;
pub mod room;
pub mod stay;
pub mod store;

// Re-export key types at crate root for convenience
pub use config::{Config, ConfigBuilder};
pub use database::{Database, DatabaseConfig};
pub use error::{Error, Result};
pub use guest::{Guest, GuestRecord, GuestStatus};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{ExecutionResult, OperationPlan, PlanAction, PlanExecutor};
pub use property::{NodeType, Property, PropertyKind, PropertyRef};
pub use room::{RoomNumber, RoomRange};
