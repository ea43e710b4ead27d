//! Property-based tests for the occupancy resolver.

use super::resolve_occupied_rooms;
use crate::guest::HotelStay;
use crate::room::RoomRange;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;

fn base() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

fn date_field() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None),
        1 => Just(Some("not a date".to_string())),
        8 => (0i64..60).prop_map(|days| Some((base() + Duration::days(days)).format("%Y-%m-%d").to_string())),
    ]
}

fn time_field() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None),
        6 => (0u32..24, 0u32..60).prop_map(|(h, m)| Some(format!("{h:02}:{m:02}"))),
        1 => (0u32..24, 0u32..60, 0u32..60).prop_map(|(h, m, s)| Some(format!("{h:02}:{m:02}:{s:02}"))),
    ]
}

fn room_field() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        1 => Just(None),
        1 => "[A-Za-z ]{0,6}".prop_map(Some),
        8 => (0u32..400).prop_map(|n| Some(n.to_string())),
    ]
}

fn hotel_stay() -> impl Strategy<Value = HotelStay> {
    (room_field(), date_field(), time_field(), date_field(), time_field()).prop_map(
        |(room_no, check_in, check_in_time, check_out, check_out_time)| HotelStay {
            room_no,
            check_in,
            check_in_time,
            check_out,
            check_out_time,
            ..HotelStay::default()
        },
    )
}

fn now() -> impl Strategy<Value = NaiveDateTime> {
    (0i64..60 * 24 * 60).prop_map(|minutes| base() + Duration::minutes(minutes))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 500,
        .. ProptestConfig::default()
    })]

    #[test]
    fn occupied_rooms_stay_inside_the_range(
        stays in prop::collection::vec(hotel_stay(), 0..40),
        capacity in 0u32..300,
        now in now(),
    ) {
        let range = RoomRange::new(capacity);
        for room in resolve_occupied_rooms(&stays, range, now) {
            prop_assert!(range.contains(room));
        }
    }

    #[test]
    fn resolution_is_idempotent(
        stays in prop::collection::vec(hotel_stay(), 0..40),
        capacity in 0u32..300,
        now in now(),
    ) {
        let range = RoomRange::new(capacity);
        prop_assert_eq!(
            resolve_occupied_rooms(&stays, range, now),
            resolve_occupied_rooms(&stays, range, now)
        );
    }

    #[test]
    fn order_of_stays_does_not_matter(
        mut stays in prop::collection::vec(hotel_stay(), 0..40),
        now in now(),
    ) {
        let range = RoomRange::new(300);
        let forward = resolve_occupied_rooms(&stays, range, now);
        stays.reverse();
        prop_assert_eq!(forward, resolve_occupied_rooms(&stays, range, now));
    }

    #[test]
    fn every_occupied_room_has_a_covering_stay(
        stays in prop::collection::vec(hotel_stay(), 0..40),
        now in now(),
    ) {
        let range = RoomRange::new(300);
        for room in resolve_occupied_rooms(&stays, range, now) {
            prop_assert!(stays
                .iter()
                .any(|s| s.room() == Some(room) && s.interval().overlaps_now(now)));
        }
    }
}
