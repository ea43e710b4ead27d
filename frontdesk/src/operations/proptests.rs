//! Property-based tests for the operations.
//!
//! These exercise the plan-execute pattern against an in-memory store.

use std::collections::HashSet;

use chrono::NaiveDate;
use proptest::prelude::*;

use super::*;
use crate::booking::RegistrationForm;
use crate::clock::ManualClock;
use crate::property::{PropertyKind, PropertyRef};
use crate::store::{self, DocumentStore, SqliteDocumentStore};

fn clock() -> ManualClock {
    ManualClock::new(
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap(),
    )
}

fn hotel(store: &SqliteDocumentStore, rooms: u32) -> PropertyRef {
    let options =
        ProvisionOptions::new(PropertyKind::Hotel, "Sea View", "sea@desk.test").with_uid("h1");
    let (plan, hotel) = provision::plan_create(store, &options, &clock()).unwrap();
    PlanExecutor::new(store).execute(&plan).unwrap();
    let plan = provision::plan_set_rooms(store, &hotel, rooms).unwrap();
    PlanExecutor::new(store).execute(&plan).unwrap();
    hotel
}

fn desk_form(room: u32) -> RegistrationForm {
    RegistrationForm {
        name: "Guest".into(),
        mobile: "9876543210".into(),
        gender: "Other".into(),
        dob: "1990-01-01".into(),
        address: "Goa".into(),
        room_no: room.to_string(),
        check_in: "2024-01-01".into(),
        check_in_time: "11:00".into(),
        check_out: "2024-01-03".into(),
        check_out_time: "11:00".into(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    // A desk booking succeeds exactly when the room exists and nobody
    // registered earlier holds it.
    #[test]
    fn desk_bookings_never_share_a_room(
        capacity in 1u32..6,
        rooms in prop::collection::vec(99u32..110, 1..12),
    ) {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        let hotel = hotel(&store, capacity);
        let clock = clock();
        let mut taken = HashSet::new();

        for room in rooms {
            let options = RegisterOptions::new(hotel.clone(), desk_form(room));
            let outcome = RegisterPlan::new(options).build_plan(&store, &clock);
            let in_range = (101..101 + capacity).contains(&room);
            match outcome {
                Ok(plan) => {
                    prop_assert!(in_range && !taken.contains(&room));
                    PlanExecutor::new(&store).execute(&plan).unwrap();
                    taken.insert(room);
                }
                Err(e) => {
                    prop_assert!(!in_range || taken.contains(&room), "unexpected {e}");
                }
            }
        }
        prop_assert_eq!(store::load_guests(&store, &hotel).unwrap().len(), taken.len());
    }

    // Dry runs report the plan without touching the store.
    #[test]
    fn dry_run_leaves_store_unchanged(texts in prop::collection::vec("[a-zA-Z {}]{1,30}", 1..5)) {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        let hotel = hotel(&store, 2);
        let before = store.get(&store::property(&hotel).unwrap()).unwrap();

        for text in &texts {
            prop_assume!(!text.trim().is_empty());
            let (plan, _) = templates::plan_add_custom(&store, &hotel, Some(text), &clock()).unwrap();
            let result = PlanExecutor::new(&store).dry_run().execute(&plan).unwrap();
            prop_assert!(result.dry_run);
            prop_assert_eq!(result.actions_taken.len(), plan.len());
        }
        prop_assert_eq!(store.get(&store::property(&hotel).unwrap()).unwrap(), before);
    }

    // Every added custom template gets a key of its own, even within one
    // millisecond.
    #[test]
    fn custom_template_keys_are_distinct(count in 1usize..8) {
        let store = SqliteDocumentStore::open_in_memory().unwrap();
        let hotel = hotel(&store, 1);
        let clock = clock();
        let mut keys = HashSet::new();

        for _ in 0..count {
            let (plan, key) = templates::plan_add_custom(&store, &hotel, None, &clock).unwrap();
            PlanExecutor::new(&store).execute(&plan).unwrap();
            prop_assert!(keys.insert(key));
        }
        let stored = store::load_templates(&store, &hotel).unwrap();
        prop_assert_eq!(stored.customs().count(), count);
    }
}
