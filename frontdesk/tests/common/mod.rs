//! Common test utilities for integration tests.
//!
//! Fixtures for provisioning properties into an in-memory store, a fixed
//! clock, and a sender that records what it was asked to deliver.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use parking_lot::Mutex;

use frontdesk::booking::RegistrationForm;
use frontdesk::clock::ManualClock;
use frontdesk::messaging::{MessageSender, OutgoingMessage, TemplateKey};
use frontdesk::operations::{provision, PlanExecutor, ProvisionOptions};
use frontdesk::store::SqliteDocumentStore;
use frontdesk::{PropertyKind, PropertyRef};

/// `2024-01-{day} {hour}:{minute}`.
#[allow(dead_code)]
pub fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, day)
        .unwrap()
        .and_hms_opt(hour, minute, 0)
        .unwrap()
}

/// A shared clock pinned at `now`.
#[allow(dead_code)]
pub fn clock_at(now: NaiveDateTime) -> Arc<ManualClock> {
    Arc::new(ManualClock::new(now))
}

/// An empty in-memory store.
#[allow(dead_code)]
pub fn store() -> SqliteDocumentStore {
    SqliteDocumentStore::open_in_memory().unwrap()
}

/// Provisions hotel `id` named "Sea View" with `rooms` rooms.
#[allow(dead_code)]
pub fn hotel(store: &SqliteDocumentStore, id: &str, rooms: u32) -> PropertyRef {
    let options =
        ProvisionOptions::new(PropertyKind::Hotel, "Sea View", format!("{id}@desk.test")).with_uid(id);
    let clock = ManualClock::new(at(1, 0, 0));
    let (plan, hotel) = provision::plan_create(store, &options, &clock).unwrap();
    PlanExecutor::new(store).execute(&plan).unwrap();
    let plan = provision::plan_set_rooms(store, &hotel, rooms).unwrap();
    PlanExecutor::new(store).execute(&plan).unwrap();
    hotel
}

/// Provisions restaurant `id` named "Spice".
#[allow(dead_code)]
pub fn resto(store: &SqliteDocumentStore, id: &str) -> PropertyRef {
    let options =
        ProvisionOptions::new(PropertyKind::Resto, "Spice", format!("{id}@desk.test")).with_uid(id);
    let clock = ManualClock::new(at(1, 0, 0));
    let (plan, resto) = provision::plan_create(store, &options, &clock).unwrap();
    PlanExecutor::new(store).execute(&plan).unwrap();
    resto
}

/// A complete desk form for `room`, checking in and out at the given
/// `(date, time)` pairs.
#[allow(dead_code)]
pub fn desk_form(room: &str, check_in: (&str, &str), check_out: (&str, &str)) -> RegistrationForm {
    RegistrationForm {
        name: "Asha".into(),
        mobile: "9876543210".into(),
        gender: "Female".into(),
        dob: "2000-06-15".into(),
        address: "Goa".into(),
        room_no: room.into(),
        check_in: check_in.0.into(),
        check_in_time: check_in.1.into(),
        check_out: check_out.0.into(),
        check_out_time: check_out.1.into(),
    }
}

/// A sender that keeps every message it is given.
#[derive(Debug, Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<OutgoingMessage>>,
}

#[allow(dead_code)]
impl RecordingSender {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Keys of everything sent so far, in order.
    pub fn keys(&self) -> Vec<TemplateKey> {
        self.sent.lock().iter().map(|m| m.key).collect()
    }

    /// Everything sent so far.
    pub fn messages(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().clone()
    }
}

impl MessageSender for RecordingSender {
    fn send(&self, message: &OutgoingMessage) -> frontdesk::Result<()> {
        self.sent.lock().push(message.clone());
        Ok(())
    }
}
