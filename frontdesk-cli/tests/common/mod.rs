//! Common test utilities for CLI integration tests.
//!
//! This module provides shared helpers for CLI testing, including:
//! - Test environment setup with temporary directories
//! - Command builder helpers for common patterns
//! - Fixtures for properties and registrations

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Desk registration instant used by the fixtures.
#[allow(dead_code)]
pub const AT: &str = "2030-01-01 10:00";

/// Test environment with isolated data directory.
///
/// The data directory is not created up front; the first command that
/// opens the store creates it unless auto-init is disabled.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the frontdesk data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let data_dir = temp_path.join("frontdesk-data");

        Self {
            temp_dir,
            temp_path,
            data_dir,
        }
    }

    /// Get a bare command builder without pre-configured flags.
    ///
    /// The command runs inside the temporary directory so project
    /// configuration files of the surrounding checkout are not picked up.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("frontdesk").expect("Failed to find frontdesk binary");
        cmd.current_dir(&self.temp_path);
        cmd.env_remove("FRONTDESK_DATA_DIR");
        cmd.env_remove("FRONTDESK_DISABLE_AUTOINIT");
        cmd.env_remove("FRONTDESK_OUTPUT_FORMAT");
        cmd.env_remove("FRONTDESK_BASE_URL");
        cmd
    }

    /// Get a command builder with the data directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Run a command that must succeed and return its trimmed stdout.
    pub fn run(&self, args: &[&str]) -> String {
        let output = self
            .command()
            .args(args)
            .output()
            .expect("Failed to run frontdesk");

        assert!(
            output.status.success(),
            "frontdesk {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        String::from_utf8(output.stdout)
            .expect("Invalid UTF-8 in output")
            .trim()
            .to_string()
    }

    /// Create a hotel with `rooms` rooms and return its address.
    pub fn add_hotel(&self, id: &str, rooms: u32) -> String {
        self.run(&[
            "property",
            "add",
            "--kind",
            "hotel",
            "--name",
            &format!("Hotel {id}"),
            "--email",
            &format!("{id}@hotels.example.com"),
            "--uid",
            id,
            "--rooms",
            &rooms.to_string(),
        ])
    }

    /// Create a restaurant and return its address.
    pub fn add_resto(&self, id: &str) -> String {
        self.run(&[
            "property",
            "add",
            "--kind",
            "resto",
            "--name",
            &format!("Resto {id}"),
            "--email",
            &format!("{id}@resto.example.com"),
            "--uid",
            id,
        ])
    }

    /// Register a desk guest in `room` checking in at [`AT`] and out on
    /// 2030-01-03 at 11:00. Returns the new guest id.
    pub fn register_guest(&self, property: &str, name: &str, room: &str) -> String {
        self.run(&register_args(property, name, room))
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Arguments of a complete desk registration.
#[allow(dead_code)]
pub fn register_args<'a>(property: &'a str, name: &'a str, room: &'a str) -> Vec<&'a str> {
    vec![
        "register",
        property,
        "--name",
        name,
        "--mobile",
        "9876543210",
        "--gender",
        "Female",
        "--dob",
        "1990-05-01",
        "--address",
        "12 MG Road",
        "--room",
        room,
        "--at",
        AT,
        "--check-out",
        "2030-01-03",
        "--check-out-time",
        "11:00",
    ]
}
