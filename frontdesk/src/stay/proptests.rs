//! Property-based tests for stay intervals.

use super::{to_instant, Bound, StayInterval};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use proptest::prelude::*;

fn instant() -> impl Strategy<Value = NaiveDateTime> {
    // Whole seconds across roughly two years
    (0i64..63_072_000).prop_map(|secs| {
        NaiveDate::from_ymd_opt(2023, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::seconds(secs)
    })
}

fn optional_instant() -> impl Strategy<Value = Option<NaiveDateTime>> {
    prop_oneof![Just(None), instant().prop_map(Some)]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn bounded_overlap_is_closed_interval(start in instant(), end in instant(), now in instant()) {
        let stay = StayInterval::new(Some(start), Some(end));
        prop_assert_eq!(stay.overlaps_now(now), start <= now && now <= end);
    }

    #[test]
    fn missing_start_only_checks_end(end in instant(), now in instant()) {
        let stay = StayInterval::new(None, Some(end));
        prop_assert_eq!(stay.overlaps_now(now), now <= end);
    }

    #[test]
    fn missing_end_only_checks_start(start in instant(), now in instant()) {
        let stay = StayInterval::new(Some(start), None);
        prop_assert_eq!(stay.overlaps_now(now), now >= start);
    }

    #[test]
    fn dropping_a_bound_never_frees_the_room(
        start in optional_instant(),
        end in optional_instant(),
        now in instant(),
    ) {
        let full = StayInterval::new(start, end);
        if full.overlaps_now(now) {
            prop_assert!(StayInterval::new(None, end).overlaps_now(now));
            prop_assert!(StayInterval::new(start, None).overlaps_now(now));
        }
    }

    #[test]
    fn minute_and_second_precision_agree(at in instant()) {
        let date = at.format("%Y-%m-%d").to_string();
        let minutes = at.format("%H:%M").to_string();
        let seconds = at.format("%H:%M:00").to_string();
        prop_assert_eq!(
            to_instant(Some(&date), Some(&minutes), Bound::Start),
            to_instant(Some(&date), Some(&seconds), Bound::End)
        );
    }

    #[test]
    fn default_bounds_cover_whole_day(at in instant()) {
        let date = at.format("%Y-%m-%d").to_string();
        let start = to_instant(Some(&date), None, Bound::Start).unwrap();
        let end = to_instant(Some(&date), None, Bound::End).unwrap();
        prop_assert!(StayInterval::new(Some(start), Some(end)).overlaps_now(at));
    }
}
