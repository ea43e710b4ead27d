//! Property-based tests for mobile number validation.

use super::is_valid_mobile;
use proptest::prelude::*;

proptest! {
    #[test]
    fn ten_digits_with_valid_lead_are_accepted(number in "[6-9][0-9]{9}") {
        prop_assert!(is_valid_mobile(&number));
    }

    #[test]
    fn low_leading_digit_is_rejected(number in "[0-5][0-9]{9}") {
        prop_assert!(!is_valid_mobile(&number));
    }

    #[test]
    fn wrong_length_is_rejected(number in "[6-9][0-9]{0,8}|[6-9][0-9]{10,14}") {
        prop_assert!(!is_valid_mobile(&number));
    }

    #[test]
    fn surrounding_text_is_rejected(number in "[6-9][0-9]{9}", junk in "[ a-z+]{1,3}") {
        let prefixed = format!("{junk}{number}");
        let suffixed = format!("{number}{junk}");
        prop_assert!(!is_valid_mobile(&prefixed));
        prop_assert!(!is_valid_mobile(&suffixed));
    }
}
