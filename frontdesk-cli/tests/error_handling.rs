//! Integration tests for exit codes, global options and the `watch`
//! command.
//!
//! Exit codes:
//! - 0: Success
//! - 1: Semantic failure (rejected form, occupied room, unknown record)
//! - 2: Usage error reported by the argument parser
//! - 3: No data directory found
//! - 4: Invalid arguments
//! - 7: Configuration error

mod common;

use common::TestEnv;
use predicates::prelude::*;
use std::fs;

// ============================================================================
// Data directory
// ============================================================================

#[test]
fn test_disable_autoinit_without_database() {
    let env = TestEnv::new();
    env.command()
        .args(["--disable-autoinit", "property", "list"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("frontdesk init"));
    assert!(!env.data_dir.exists());
}

#[test]
fn test_disable_autoinit_from_environment() {
    let env = TestEnv::new();
    env.command()
        .env("FRONTDESK_DISABLE_AUTOINIT", "true")
        .args(["property", "list"])
        .assert()
        .code(3);
}

#[test]
fn test_disable_autoinit_with_existing_database() {
    let env = TestEnv::new();
    env.run(&["init"]);
    env.command()
        .args(["--disable-autoinit", "property", "list"])
        .assert()
        .success();
}

#[test]
fn test_autoinit_creates_database() {
    let env = TestEnv::new();
    env.run(&["property", "list"]);
    assert!(env.data_dir.join("frontdesk.db").exists());
}

#[test]
fn test_data_dir_from_environment() {
    let env = TestEnv::new();
    env.command_bare()
        .env("FRONTDESK_DATA_DIR", &env.data_dir)
        .args(["property", "list"])
        .assert()
        .success();
    assert!(env.data_dir.join("frontdesk.db").exists());
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_file_output_format() {
    let env = TestEnv::new();
    env.run(&["init"]);
    env.add_hotel("h1", 5);
    fs::write(env.data_dir.join("config.yaml"), "output_format: json\n")
        .expect("Failed to write config");

    let listed = env.run(&["property", "list"]);
    let value: serde_json::Value = serde_json::from_str(&listed).expect("valid JSON");
    assert_eq!(value[0]["property"], "hotels/h1");

    // the flag still wins
    let table = env.run(&["property", "list", "--format", "table"]);
    assert!(table.starts_with("PROPERTY"));
}

#[test]
fn test_config_file_base_url() {
    let env = TestEnv::new();
    env.run(&["init"]);
    env.add_resto("r1");
    fs::write(
        env.data_dir.join("config.yaml"),
        "base_url: https://desk.example.com\n",
    )
    .expect("Failed to write config");

    assert_eq!(
        env.run(&["link", "resto/r1"]),
        "https://desk.example.com/customer-registration/resto/r1"
    );
}

#[test]
fn test_invalid_config_file() {
    let env = TestEnv::new();
    env.run(&["init"]);
    fs::write(env.data_dir.join("config.yaml"), "output_format: [unclosed\n")
        .expect("Failed to write config");

    env.command()
        .args(["property", "list"])
        .assert()
        .code(7)
        .stderr(predicate::str::contains("Configuration error"));
}

// ============================================================================
// Arguments
// ============================================================================

#[test]
fn test_malformed_property_address_is_usage_error() {
    let env = TestEnv::new();
    env.command()
        .args(["guests", "list", "h1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("expected <hotels|resto>/<id>"));
}

#[test]
fn test_kind_word_is_accepted_as_node() {
    let env = TestEnv::new();
    env.add_hotel("h1", 5);
    env.run(&["property", "show", "hotel/h1"]);
}

#[test]
fn test_unknown_property() {
    let env = TestEnv::new();
    env.command()
        .args(["guests", "list", "hotels/ghost"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("hotels property 'ghost' not found"));
}

#[test]
fn test_quiet_suppresses_warnings() {
    let env = TestEnv::new();
    env.command()
        .args([
            "--quiet",
            "property",
            "add",
            "--kind",
            "hotel",
            "--name",
            "Quiet Inn",
            "--email",
            "quiet@example.com",
        ])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_busy_timeout_flag_is_accepted() {
    let env = TestEnv::new();
    env.command()
        .args(["--busy-timeout", "1", "property", "list"])
        .assert()
        .success();
}

// ============================================================================
// watch
// ============================================================================

#[test]
fn test_watch_without_properties() {
    let env = TestEnv::new();
    env.command()
        .args(["watch", "--duration", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No properties to watch"));
}

#[test]
fn test_watch_rejects_zero_poll_interval() {
    let env = TestEnv::new();
    env.add_hotel("h1", 5);
    env.command()
        .args(["watch", "hotels/h1", "--poll-interval", "0"])
        .assert()
        .code(4);
}

#[test]
fn test_watch_runs_for_duration() {
    let env = TestEnv::new();
    env.add_hotel("h1", 5);
    env.register_guest("hotels/h1", "Asha", "101");

    let output = env
        .command()
        .args(["watch", "hotels/h1", "--json", "--duration", "1"])
        .output()
        .expect("Failed to run watch");
    assert!(
        output.status.success(),
        "watch failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Watching hotels/h1"), "{stderr}");

    let stdout = String::from_utf8(output.stdout).expect("Invalid UTF-8");
    for line in stdout.lines() {
        let message: serde_json::Value = serde_json::from_str(line).expect("JSON line");
        assert_eq!(message["property"]["id"], "h1");
    }
}

#[test]
fn test_watch_unknown_property() {
    let env = TestEnv::new();
    env.command()
        .args(["watch", "hotels/ghost", "--duration", "1"])
        .assert()
        .code(1);
}

#[test]
fn test_watch_log_only_reports_occupancy() {
    let env = TestEnv::new();
    env.add_hotel("h1", 5);

    let output = env
        .command()
        .args(["--verbose", "watch", "hotels/h1", "--log-only", "--duration", "1"])
        .output()
        .expect("Failed to run watch");
    assert!(output.status.success());
    assert!(output.stdout.is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("occupancy of hotels/h1: 0 of 5 rooms occupied"),
        "{stderr}"
    );
}

#[test]
fn test_watch_json_conflicts_with_log_only() {
    let env = TestEnv::new();
    env.command()
        .args(["watch", "--json", "--log-only", "--duration", "1"])
        .assert()
        .code(2);
}
