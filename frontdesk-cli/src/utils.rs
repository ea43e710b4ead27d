//! Utility functions for CLI operations.
//!
//! This module provides common utility functions used across CLI commands,
//! including configuration loading, store access, argument parsing and
//! tabular output.

use crate::error::CliError;
use chrono::{NaiveDate, NaiveDateTime};
use clap::ValueEnum;
use frontdesk::clock::{Clock, ManualClock, SystemClock};
use frontdesk::config::OutputFormat as ConfigFormat;
use frontdesk::database::{self, DatabaseConfig};
use frontdesk::store::SqliteDocumentStore;
use frontdesk::{
    Config, ConfigBuilder, ExecutionResult, NodeType, OperationPlan, PlanExecutor, PropertyKind,
    PropertyRef,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the default busy timeout (in seconds).
    pub busy_timeout: Option<u32>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,
}

/// Resolve the data directory: `--data-dir`, then `FRONTDESK_DATA_DIR`,
/// then `~/.frontdesk`.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match global.data_dir {
        Some(ref dir) => Ok(dir.clone()),
        None => database::resolve_data_dir().map_err(|e| CliError::Config(e.to_string())),
    }
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Environment variables (highest priority)
/// 2. Project files (`frontdesk.local.yaml`, `frontdesk.yaml`)
/// 3. `config.yaml` in the data directory
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;

    ConfigBuilder::new()
        .with_data_dir(&data_dir)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Open the document store with configuration.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is disabled.
pub fn open_store(global: &GlobalOptions, config: &Config) -> Result<SqliteDocumentStore, CliError> {
    let data_dir = resolve_data_dir(global)?;
    let mut db_config = DatabaseConfig::in_data_dir(&data_dir);

    let autoinit_disabled = global.disable_autoinit || config.disable_autoinit == Some(true);
    if autoinit_disabled {
        if !db_config.path.exists() {
            return Err(CliError::NoDataDirectory);
        }
        db_config = db_config.without_auto_create();
    }

    let timeout = global
        .busy_timeout
        .map_or_else(|| config.lock_wait(), |secs| Duration::from_secs(secs.into()));
    db_config = db_config.with_busy_timeout(timeout);

    SqliteDocumentStore::open(db_config).map_err(CliError::from)
}

/// Parse a property address such as `hotels/h1` or `resto/r1`.
///
/// The kind words `hotel` and `restaurant` are accepted for the node.
pub fn parse_property(s: &str) -> Result<PropertyRef, String> {
    let (node, id) = s
        .split_once('/')
        .ok_or_else(|| format!("expected <hotels|resto>/<id>, got '{s}'"))?;
    let id = id.trim();
    if id.is_empty() || id.contains('/') {
        return Err(format!("'{s}' does not name a single property"));
    }
    let node = node
        .parse::<NodeType>()
        .or_else(|_| node.parse::<PropertyKind>().map(PropertyKind::node))
        .map_err(|e| e.to_string())?;
    Ok(PropertyRef::new(node, id))
}

/// Parse a local instant for `--at`.
///
/// Accepts `YYYY-MM-DD HH:MM`, `YYYY-MM-DDTHH:MM` (seconds optional) and a
/// bare date, which means midnight.
pub fn parse_instant(s: &str) -> Result<NaiveDateTime, String> {
    const FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];
    let s = s.trim();
    for format in FORMATS {
        if let Ok(at) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(at);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| format!("expected YYYY-MM-DD [HH:MM], got '{s}'"))
}

/// The clock a command runs against: pinned at `--at`, else the system clock.
pub fn clock_for(at: Option<NaiveDateTime>) -> Arc<dyn Clock> {
    match at {
        Some(at) => Arc::new(ManualClock::new(at)),
        None => Arc::new(SystemClock),
    }
}

/// Execute `plan` (or only describe it with `dry_run`) and report the outcome.
pub fn execute_plan(
    store: &SqliteDocumentStore,
    plan: &OperationPlan,
    dry_run: bool,
    global: &GlobalOptions,
) -> Result<ExecutionResult, CliError> {
    let executor = PlanExecutor::new(store);
    let executor = if dry_run { executor.dry_run() } else { executor };
    let result = executor.execute(plan)?;
    report_execution(&result, global);
    Ok(result)
}

/// Print the outcome of a plan execution.
///
/// Warnings go to stderr unless `--quiet`; in dry-run mode the planned
/// actions are printed as well.
pub fn report_execution(result: &ExecutionResult, global: &GlobalOptions) {
    if !global.quiet {
        for warning in &result.warnings {
            eprintln!("Warning: {warning}");
        }
    }
    if result.dry_run {
        println!("Dry-run mode: no changes were made");
        for action in &result.actions_taken {
            println!("  - {action}");
        }
    } else if global.verbose {
        for action in &result.actions_taken {
            eprintln!("  - {action}");
        }
    }
}

/// Output format for listing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Tab-separated table format (human-readable)
    Table,
    /// JSON format
    Json,
    /// CSV format
    Csv,
    /// TSV format (tab-separated values)
    Tsv,
}

impl From<ConfigFormat> for OutputFormat {
    fn from(format: ConfigFormat) -> Self {
        match format {
            ConfigFormat::Table => Self::Table,
            ConfigFormat::Json => Self::Json,
            ConfigFormat::Csv => Self::Csv,
            ConfigFormat::Tsv => Self::Tsv,
        }
    }
}

impl OutputFormat {
    /// The `--format` flag, else the configured format, else a table.
    pub fn resolve(flag: Option<Self>, config: &Config) -> Self {
        flag.or_else(|| config.output_format.map(Self::from))
            .unwrap_or(Self::Table)
    }
}

/// Rows ready for printing, with a JSON rendition of each row.
pub struct Listing<'a> {
    /// Column headers, lowercase.
    pub headers: &'a [&'a str],
    /// One cell per header for each row; empty cells are allowed.
    pub rows: Vec<Vec<String>>,
    /// Structured form of the rows for `--format json`.
    pub json: serde_json::Value,
}

impl Listing<'_> {
    /// Print the listing to stdout in `format`.
    pub fn print(&self, format: OutputFormat) -> Result<(), CliError> {
        match format {
            OutputFormat::Table => self.print_table(),
            OutputFormat::Json => self.print_json(),
            OutputFormat::Csv => self.print_delimited(b','),
            OutputFormat::Tsv => self.print_delimited(b'\t'),
        }
    }

    fn print_table(&self) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();

        // uppercase for table display
        let header_line = self
            .headers
            .iter()
            .map(|s| s.to_uppercase())
            .collect::<Vec<_>>()
            .join("\t");
        writeln!(handle, "{header_line}")?;

        for row in &self.rows {
            let line = row
                .iter()
                .map(|cell| if cell.is_empty() { "-" } else { cell.as_str() })
                .collect::<Vec<_>>()
                .join("\t");
            writeln!(handle, "{line}")?;
        }
        Ok(())
    }

    fn print_json(&self) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        serde_json::to_writer_pretty(&mut handle, &self.json).map_err(io_error)?;
        writeln!(handle)?;
        Ok(())
    }

    fn print_delimited(&self, delimiter: u8) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let handle = stdout.lock();
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(handle);

        writer.write_record(self.headers).map_err(io_error)?;
        for row in &self.rows {
            writer.write_record(row).map_err(io_error)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Wrap a formatting error as an I/O failure.
pub fn io_error<E>(e: E) -> CliError
where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    CliError::Io(std::io::Error::new(std::io::ErrorKind::Other, e))
}

/// Format epoch milliseconds as a local timestamp.
pub fn format_millis(millis: i64) -> String {
    use chrono::{Local, TimeZone};
    match Local.timestamp_millis_opt(millis) {
        chrono::LocalResult::Single(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_property_accepts_nodes_and_kinds() {
        assert_eq!(parse_property("hotels/h1").unwrap(), PropertyRef::hotel("h1"));
        assert_eq!(parse_property("resto/r1").unwrap(), PropertyRef::resto("r1"));
        assert_eq!(parse_property("hotel/h1").unwrap(), PropertyRef::hotel("h1"));
        assert_eq!(parse_property("restaurant/r1").unwrap(), PropertyRef::resto("r1"));
    }

    #[test]
    fn test_parse_property_rejects_malformed() {
        assert!(parse_property("h1").is_err());
        assert!(parse_property("hotels/").is_err());
        assert!(parse_property("hotels/h1/customers").is_err());
        assert!(parse_property("spa/s1").is_err());
    }

    #[test]
    fn test_parse_instant_forms() {
        let noon = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(parse_instant("2024-01-15 12:00").unwrap(), noon);
        assert_eq!(parse_instant("2024-01-15T12:00:00").unwrap(), noon);
        assert_eq!(
            parse_instant("2024-01-15").unwrap(),
            noon.date().and_hms_opt(0, 0, 0).unwrap()
        );
        assert!(parse_instant("15/01/2024").is_err());
    }

    #[test]
    fn test_format_resolution_prefers_flag() {
        let config = Config {
            output_format: Some(ConfigFormat::Json),
            ..Config::default()
        };
        assert_eq!(OutputFormat::resolve(Some(OutputFormat::Csv), &config), OutputFormat::Csv);
        assert_eq!(OutputFormat::resolve(None, &config), OutputFormat::Json);
        assert_eq!(OutputFormat::resolve(None, &Config::default()), OutputFormat::Table);
    }
}
