//! Environment variable handling for configuration overrides.
//!
//! `FRONTDESK_*` variables override file-based configuration.

use crate::config::schema::{Config, OutputFormat};
use crate::error::{Error, Result};
use std::env;

/// Handles environment variable overrides for configuration.
///
/// # Examples
///
/// ```no_run
/// use frontdesk::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Apply environment variable overrides to config.
    ///
    /// # Errors
    ///
    /// Returns an error if any variable holds a value of the wrong shape.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(url) = env::var("FRONTDESK_BASE_URL") {
            config.base_url = Some(url);
        }

        if let Ok(val) = env::var("FRONTDESK_DISABLE_AUTOINIT") {
            config.disable_autoinit = Some(Self::parse_bool("FRONTDESK_DISABLE_AUTOINIT", &val)?);
        }

        if let Ok(val) = env::var("FRONTDESK_RECHECK_INTERVAL_SECONDS") {
            config.recheck_interval_seconds =
                Some(Self::parse_seconds("FRONTDESK_RECHECK_INTERVAL_SECONDS", &val)?);
        }

        if let Ok(val) = env::var("FRONTDESK_MAXIMUM_LOCK_WAIT_SECONDS") {
            config.maximum_lock_wait_seconds =
                Some(Self::parse_seconds("FRONTDESK_MAXIMUM_LOCK_WAIT_SECONDS", &val)?);
        }

        if let Ok(val) = env::var("FRONTDESK_OUTPUT_FORMAT") {
            config.output_format = Some(Self::parse_format(&val)?);
        }

        Self::apply_messaging_overrides(config)
    }

    fn apply_messaging_overrides(config: &mut Config) -> Result<()> {
        let mut messaging = config.messaging();
        let mut modified = false;

        for (var, slot) in [
            ("FRONTDESK_CUSTOM_SPACING_SECONDS", &mut messaging.custom_spacing_seconds),
            ("FRONTDESK_CHECKOUT_LEAD_SECONDS", &mut messaging.checkout_lead_seconds),
            (
                "FRONTDESK_RESTO_CHECKOUT_AFTER_SECONDS",
                &mut messaging.resto_checkout_after_seconds,
            ),
        ] {
            if let Ok(val) = env::var(var) {
                *slot = Some(Self::parse_seconds(var, &val)?);
                modified = true;
            }
        }

        if modified {
            config.messaging = Some(messaging);
        }
        Ok(())
    }

    /// Parse a boolean value from a string.
    ///
    /// Accepts: true/1/yes/on for true, false/0/no/off for false (case-insensitive).
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "Invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }

    fn parse_seconds(field: &str, s: &str) -> Result<u64> {
        s.trim().parse().map_err(|_| Error::Validation {
            field: field.into(),
            message: format!("Must be a non-negative integer, got '{s}'"),
        })
    }

    fn parse_format(s: &str) -> Result<OutputFormat> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "table" => Ok(OutputFormat::Table),
            _ => Err(Error::Validation {
                field: "FRONTDESK_OUTPUT_FORMAT".into(),
                message: format!("Unknown output format '{s}' (expected table/json/csv/tsv)"),
            }),
        }
    }
}
