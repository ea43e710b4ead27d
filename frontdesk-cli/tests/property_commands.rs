//! Integration tests for property provisioning, accounts, templates and
//! links.

mod common;

use common::TestEnv;
use predicates::prelude::*;

// ============================================================================
// property
// ============================================================================

#[test]
fn test_property_add_prints_address() {
    let env = TestEnv::new();
    assert_eq!(env.add_hotel("h1", 10), "hotels/h1");
    assert_eq!(env.add_resto("r1"), "resto/r1");
}

#[test]
fn test_property_add_without_rooms_warns() {
    let env = TestEnv::new();
    env.command()
        .args([
            "property",
            "add",
            "--kind",
            "hotel",
            "--name",
            "Lake View",
            "--email",
            "lake@example.com",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("hotels/"))
        .stderr(predicate::str::contains("Warning"));
}

#[test]
fn test_property_add_rooms_for_resto_is_rejected() {
    let env = TestEnv::new();
    env.command()
        .args([
            "property",
            "add",
            "--kind",
            "resto",
            "--name",
            "Spice",
            "--email",
            "spice@example.com",
            "--rooms",
            "5",
        ])
        .assert()
        .code(4);
}

#[test]
fn test_property_email_must_be_unique() {
    let env = TestEnv::new();
    env.add_hotel("h1", 10);
    env.command()
        .args([
            "property",
            "add",
            "--kind",
            "resto",
            "--name",
            "Copycat",
            "--email",
            "H1@hotels.example.com",
        ])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already used"));
}

#[test]
fn test_property_list_formats() {
    let env = TestEnv::new();
    env.add_hotel("h1", 10);
    env.add_resto("r1");

    let table = env.run(&["property", "list"]);
    assert!(table.starts_with("PROPERTY\tNAME"), "{table}");
    assert!(table.contains("hotels/h1"));
    assert!(table.contains("resto/r1"));

    let hotels = env.run(&["property", "list", "--kind", "hotel", "--format", "json"]);
    let value: serde_json::Value = serde_json::from_str(&hotels).expect("valid JSON");
    let entries = value.as_array().expect("array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["property"], "hotels/h1");
    assert_eq!(entries[0]["rooms"], 10);

    let csv = env.run(&["property", "list", "--format", "csv"]);
    assert!(csv.starts_with("property,name,email"), "{csv}");
}

#[test]
fn test_property_show_and_update() {
    let env = TestEnv::new();
    env.add_hotel("h1", 10);

    env.run(&[
        "property",
        "update",
        "hotels/h1",
        "--name",
        "Grand Palace",
        "--location",
        "Jaipur",
    ]);

    let shown = env.run(&["property", "show", "hotels/h1"]);
    assert!(shown.contains("Grand Palace"), "{shown}");
    assert!(shown.contains("Jaipur"));
    assert!(shown.contains("Rooms:      10"));
    assert!(shown.contains("Templates:  2"));

    let json = env.run(&["property", "show", "hotels/h1", "--json"]);
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
    assert_eq!(value["name"], "Grand Palace");
    assert_eq!(value["guests"], 0);
}

#[test]
fn test_property_rooms_and_remove() {
    let env = TestEnv::new();
    env.add_hotel("h1", 10);

    env.run(&["property", "rooms", "hotels/h1", "20"]);
    let json = env.run(&["property", "list", "--format", "json"]);
    let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
    assert_eq!(value[0]["rooms"], 20);

    env.run(&["property", "remove", "hotels/h1"]);
    env.command()
        .args(["property", "show", "hotels/h1"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_property_remove_dry_run_keeps_property() {
    let env = TestEnv::new();
    env.add_resto("r1");

    env.command()
        .args(["property", "remove", "resto/r1", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Dry-run mode"));
    env.run(&["property", "show", "resto/r1"]);
}

// ============================================================================
// accounts
// ============================================================================

#[test]
fn test_whoami_resolves_property_admins() {
    let env = TestEnv::new();
    env.add_hotel("h1", 10);
    env.add_resto("r1");

    assert_eq!(
        env.run(&["whoami", "--email", "h1@hotels.example.com"]),
        "hotel-admin\thotels/h1\tHotel h1"
    );
    assert_eq!(
        env.run(&["whoami", "--email", "r1@resto.example.com"]),
        "resto-admin\tresto/r1\tResto r1"
    );

    env.command()
        .args(["whoami", "--email", "nobody@example.com"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("access denied"));
}

#[test]
fn test_single_super_admin() {
    let env = TestEnv::new();
    env.run(&["super-admin", "register", "--email", "root@example.com"]);
    env.command()
        .args(["super-admin", "register", "--email", "other@example.com"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("already registered"));
}

// ============================================================================
// templates
// ============================================================================

#[test]
fn test_templates_lifecycle() {
    let env = TestEnv::new();
    env.add_hotel("h1", 10);

    let listed = env.run(&["templates", "list", "hotels/h1"]);
    assert!(listed.starts_with("KEY\tTEXT"), "{listed}");
    assert!(listed.contains("checkin"));
    assert!(listed.contains("checkout"));

    let key = env.run(&["templates", "add", "hotels/h1", "--text", "Enjoy the pool, {name}!"]);
    assert!(key.starts_with("custom_"), "{key}");

    env.run(&["templates", "update", "hotels/h1", &key, "Breakfast is at 8, {name}."]);
    let listed = env.run(&["templates", "list", "hotels/h1", "--format", "json"]);
    assert!(listed.contains("Breakfast is at 8"), "{listed}");

    env.run(&["templates", "delete", "hotels/h1", &key]);
    let listed = env.run(&["templates", "list", "hotels/h1"]);
    assert!(!listed.contains(&key));
}

#[test]
fn test_builtin_templates_cannot_be_deleted() {
    let env = TestEnv::new();
    env.add_hotel("h1", 10);
    env.command()
        .args(["templates", "delete", "hotels/h1", "checkin"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot be deleted"));
}

// ============================================================================
// links
// ============================================================================

#[test]
fn test_link_round_trip() {
    let env = TestEnv::new();
    env.add_hotel("h1", 10);

    let link = env.run(&[
        "link",
        "hotels/h1",
        "--base-url",
        "https://desk.example.com/",
    ]);
    assert_eq!(link, "https://desk.example.com/customer-registration/hotels/h1");

    assert_eq!(env.run(&["link", "--resolve", &link]), "hotels/h1");
}

#[test]
fn test_link_without_base_url_is_config_error() {
    let env = TestEnv::new();
    env.add_hotel("h1", 10);
    env.command()
        .env_remove("FRONTDESK_BASE_URL")
        .args(["link", "hotels/h1"])
        .assert()
        .code(7);
}

#[test]
fn test_resto_form_link() {
    let env = TestEnv::new();
    env.add_resto("r1");
    env.add_hotel("h1", 10);

    assert_eq!(
        env.run(&[
            "link",
            "resto/r1",
            "--resto-form",
            "--base-url",
            "https://desk.example.com"
        ]),
        "https://desk.example.com/resto-admin?qrMode=true&restoId=r1"
    );
    env.command()
        .args([
            "link",
            "hotels/h1",
            "--resto-form",
            "--base-url",
            "https://desk.example.com",
        ])
        .assert()
        .code(4);
}

#[test]
fn test_link_to_unknown_property() {
    let env = TestEnv::new();
    env.command()
        .args(["link", "--resolve", "/customer-registration/hotels/ghost"])
        .assert()
        .code(1);
}
