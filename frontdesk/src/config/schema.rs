//! Configuration schema definitions.
//!
//! Every field is optional so that partial files can be layered; the
//! accessor methods on [`Config`] supply the built-in defaults.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default interval between checkout sweeps and occupancy rechecks.
pub const DEFAULT_RECHECK_INTERVAL_SECONDS: u64 = 60;

/// Default busy timeout for the database, in seconds.
pub const DEFAULT_LOCK_WAIT_SECONDS: u64 = 5;

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use frontdesk::config::{Config, MessagingConfig};
///
/// let config = Config {
///     base_url: Some("https://desk.example.com".to_string()),
///     messaging: Some(MessagingConfig {
///         custom_spacing_seconds: Some(120),
///         ..Default::default()
///     }),
///     ..Default::default()
/// };
/// assert_eq!(config.recheck_interval().as_secs(), 60);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Origin that registration links are built on.
    pub base_url: Option<String>,

    /// Seconds between periodic occupancy rechecks and checkout sweeps.
    pub recheck_interval_seconds: Option<u64>,

    /// Message timing.
    pub messaging: Option<MessagingConfig>,

    /// Maximum time to wait for database lock acquisition (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Output format for list commands.
    pub output_format: Option<OutputFormat>,

    /// Disable automatic database initialization.
    pub disable_autoinit: Option<bool>,
}

impl Config {
    /// The recheck interval, defaulting to one minute.
    #[must_use]
    pub fn recheck_interval(&self) -> Duration {
        Duration::from_secs(
            self.recheck_interval_seconds
                .unwrap_or(DEFAULT_RECHECK_INTERVAL_SECONDS),
        )
    }

    /// The database busy timeout, defaulting to five seconds.
    #[must_use]
    pub fn lock_wait(&self) -> Duration {
        Duration::from_secs(
            self.maximum_lock_wait_seconds
                .unwrap_or(DEFAULT_LOCK_WAIT_SECONDS),
        )
    }

    /// The message timing section, or an empty one.
    #[must_use]
    pub fn messaging(&self) -> MessagingConfig {
        self.messaging.clone().unwrap_or_default()
    }
}

/// Message timing configuration.
///
/// Unset fields fall back to one minute between custom messages, a
/// checkout message one minute before checkout, and a restaurant checkout
/// message three minutes after check-in.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct MessagingConfig {
    /// Gap between consecutive custom messages.
    pub custom_spacing_seconds: Option<u64>,

    /// Lead time of the hotel checkout message.
    pub checkout_lead_seconds: Option<u64>,

    /// Delay of the restaurant checkout message after check-in.
    pub resto_checkout_after_seconds: Option<u64>,
}

/// Output format for list commands.
///
/// # Examples
///
/// ```
/// use frontdesk::config::OutputFormat;
///
/// let format = OutputFormat::Json;
/// assert_eq!(format.to_string(), "json");
/// ```
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// JSON output format.
    Json,
    /// CSV output format.
    Csv,
    /// TSV output format.
    Tsv,
    /// Human-readable table format.
    Table,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Csv => write!(f, "csv"),
            Self::Tsv => write!(f, "tsv"),
            Self::Table => write!(f, "table"),
        }
    }
}
