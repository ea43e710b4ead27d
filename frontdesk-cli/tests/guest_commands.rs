//! Integration tests for registration, guest administration and room
//! occupancy.

mod common;

use common::{register_args, TestEnv, AT};
use predicates::prelude::*;

fn guest_list(env: &TestEnv, property: &str) -> Vec<serde_json::Value> {
    let json = env.run(&["guests", "list", property, "--format", "json"]);
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
    value.as_array().expect("array").clone()
}

// ============================================================================
// register
// ============================================================================

#[test]
fn test_register_prints_guest_id() {
    let env = TestEnv::new();
    env.add_hotel("h1", 10);

    let id = env.register_guest("hotels/h1", "Asha", "101");
    assert!(!id.is_empty());

    let guests = guest_list(&env, "hotels/h1");
    assert_eq!(guests.len(), 1);
    assert_eq!(guests[0]["id"], id.as_str());
    assert_eq!(guests[0]["name"], "Asha");
    assert_eq!(guests[0]["roomNo"], "101");
}

#[test]
fn test_register_occupied_room_is_conflict() {
    let env = TestEnv::new();
    env.add_hotel("h1", 10);
    env.register_guest("hotels/h1", "Asha", "101");

    env.command()
        .args(register_args("hotels/h1", "Ravi", "101"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "room 101 is already booked for the selected period",
        ));

    // another room is still free
    env.register_guest("hotels/h1", "Ravi", "102");
    assert_eq!(guest_list(&env, "hotels/h1").len(), 2);
}

#[test]
fn test_register_room_outside_capacity_is_rejected() {
    let env = TestEnv::new();
    env.add_hotel("h1", 10);
    env.command()
        .args(register_args("hotels/h1", "Asha", "111"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid room"));
}

#[test]
fn test_register_lists_every_form_error() {
    let env = TestEnv::new();
    env.add_hotel("h1", 10);

    env.command()
        .args(["register", "hotels/h1", "--name", "Asha", "--mobile", "12345"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("registration rejected"))
        .stderr(predicate::str::contains("mobile: Enter a valid 10-digit mobile number."))
        .stderr(predicate::str::contains("gender: Select gender."))
        .stderr(predicate::str::contains("roomNo: Room number is required."));
    assert!(guest_list(&env, "hotels/h1").is_empty());
}

#[test]
fn test_register_dry_run_stores_nothing() {
    let env = TestEnv::new();
    env.add_hotel("h1", 10);

    let mut args = register_args("hotels/h1", "Asha", "101");
    args.push("--dry-run");
    env.command()
        .args(&args)
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry-run mode"));
    assert!(guest_list(&env, "hotels/h1").is_empty());
}

#[test]
fn test_self_service_registration_skips_room() {
    let env = TestEnv::new();
    env.add_hotel("h1", 10);

    env.run(&[
        "register",
        "hotels/h1",
        "--self-service",
        "--name",
        "Meera",
        "--mobile",
        "9123456780",
        "--gender",
        "Female",
        "--dob",
        "1995-03-12",
        "--at",
        AT,
    ]);
    let guests = guest_list(&env, "hotels/h1");
    assert_eq!(guests.len(), 1);
    assert!(guests[0].get("roomNo").is_none());
}

#[test]
fn test_self_service_is_hotel_only() {
    let env = TestEnv::new();
    env.add_resto("r1");
    env.command()
        .args([
            "register",
            "resto/r1",
            "--self-service",
            "--name",
            "Meera",
            "--mobile",
            "9123456780",
            "--gender",
            "Female",
            "--dob",
            "1995-03-12",
        ])
        .assert()
        .code(4);
}

#[test]
fn test_register_through_link() {
    let env = TestEnv::new();
    env.add_hotel("h1", 10);
    let link = env.run(&["link", "hotels/h1", "--base-url", "https://desk.example.com"]);

    let mut args = register_args("hotels/h1", "Asha", "101");
    // swap the positional address for --link
    args.remove(1);
    args.extend(["--link", link.as_str()]);
    env.run(&args);
    assert_eq!(guest_list(&env, "hotels/h1").len(), 1);
}

#[test]
fn test_restaurant_visit_and_stats() {
    let env = TestEnv::new();
    env.add_resto("r1");

    env.run(&[
        "register",
        "resto/r1",
        "--name",
        "Kabir",
        "--mobile",
        "8123456789",
        "--gender",
        "Male",
        "--dob",
        "1988-11-02",
        "--at",
        AT,
    ]);

    let table = env.run(&["guests", "list", "resto/r1"]);
    assert!(table.starts_with("ID\tNAME\tMOBILE"), "{table}");
    assert!(table.contains("Kabir"));
    assert!(table.contains("2030-01-01"));

    let stats = env.run(&["guests", "stats", "resto/r1", "--at", "2030-01-01 12:00"]);
    let value: serde_json::Value = serde_json::from_str(&stats).expect("valid JSON");
    assert_eq!(value["totalCustomers"], 1);
    assert_eq!(value["activeCustomers"], 1);

    let later = env.run(&["guests", "stats", "resto/r1", "--at", "2030-01-05 12:00"]);
    let value: serde_json::Value = serde_json::from_str(&later).expect("valid JSON");
    assert_eq!(value["totalCustomers"], 1);
    assert_eq!(value["activeCustomers"], 0);
}

// ============================================================================
// guests
// ============================================================================

#[test]
fn test_guest_search_filters() {
    let env = TestEnv::new();
    env.add_hotel("h1", 10);
    env.register_guest("hotels/h1", "Asha", "101");
    env.register_guest("hotels/h1", "Ravi", "102");

    let found = env.run(&[
        "guests", "list", "hotels/h1", "--search", "ASH", "--format", "json",
    ]);
    let value: serde_json::Value = serde_json::from_str(&found).expect("valid JSON");
    assert_eq!(value.as_array().map(Vec::len), Some(1));
    assert_eq!(value[0]["name"], "Asha");

    let by_date = env.run(&[
        "guests", "list", "hotels/h1", "--date", "2030-01-02", "--format", "json",
    ]);
    assert_eq!(by_date, "[]");
}

#[test]
fn test_guest_edit_show_and_delete() {
    let env = TestEnv::new();
    env.add_hotel("h1", 10);
    let id = env.register_guest("hotels/h1", "Asha", "101");

    env.run(&["guests", "edit", "hotels/h1", &id, "--name", "Asha Kapoor"]);
    let shown = env.run(&["guests", "show", "hotels/h1", &id]);
    let value: serde_json::Value = serde_json::from_str(&shown).expect("valid JSON");
    assert_eq!(value["name"], "Asha Kapoor");
    assert_eq!(value["id"], id.as_str());

    env.run(&["guests", "delete", "hotels/h1", &id]);
    env.command()
        .args(["guests", "show", "hotels/h1", &id])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

// ============================================================================
// occupancy
// ============================================================================

#[test]
fn test_occupancy_follows_stay_period() {
    let env = TestEnv::new();
    env.add_hotel("h1", 3);
    env.register_guest("hotels/h1", "Asha", "101");

    let during = env.run(&["occupancy", "hotels/h1", "--at", "2030-01-02 12:00"]);
    assert_eq!(during, "101");

    let after = env.run(&["occupancy", "hotels/h1", "--at", "2030-01-05 12:00"]);
    assert_eq!(after, "");
}

#[test]
fn test_occupancy_board() {
    let env = TestEnv::new();
    env.add_hotel("h1", 3);
    env.register_guest("hotels/h1", "Asha", "102");

    let board = env.run(&[
        "occupancy",
        "hotels/h1",
        "--at",
        "2030-01-02 12:00",
        "--board",
    ]);
    let lines: Vec<&str> = board.lines().collect();
    assert_eq!(
        lines,
        vec!["ROOM\tSTATE", "101\tfree", "102\toccupied", "103\tfree"]
    );
}

#[test]
fn test_occupancy_of_restaurant_is_rejected() {
    let env = TestEnv::new();
    env.add_resto("r1");
    env.command()
        .args(["occupancy", "resto/r1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("requires a hotel property"));
}
