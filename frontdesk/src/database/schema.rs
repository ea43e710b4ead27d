//! Database schema definitions and SQL constants.
//!
//! The document tree is stored flattened: one row per leaf value, keyed by
//! the full slash-separated path of the leaf.

/// Current schema version for the database.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the nodes table.
///
/// `value` holds the JSON encoding of a scalar (string, number, boolean)
/// or of an array. Objects are never stored as rows; they exist only as the
/// shared prefix of their leaves.
pub const CREATE_NODES_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS nodes (
        path TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version in the metadata table.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// Selects the leaf at `?1` and every leaf below it (`?2` is `?1` plus a slash).
///
/// `substr` is used instead of `LIKE` so that `%` and `_` in keys are literal.
pub const SELECT_SUBTREE: &str = r"
    SELECT path, value FROM nodes
    WHERE path = ?1 OR substr(path, 1, length(?2)) = ?2
    ORDER BY path
";

/// Selects every leaf.
pub const SELECT_ALL: &str = "SELECT path, value FROM nodes ORDER BY path";

/// Deletes the leaf at `?1` and every leaf below it.
pub const DELETE_SUBTREE: &str = r"
    DELETE FROM nodes
    WHERE path = ?1 OR substr(path, 1, length(?2)) = ?2
";

/// Deletes every leaf.
pub const DELETE_ALL: &str = "DELETE FROM nodes";

/// Deletes a single leaf.
pub const DELETE_LEAF: &str = "DELETE FROM nodes WHERE path = ?";

/// Inserts or replaces a single leaf.
pub const UPSERT_LEAF: &str = "INSERT OR REPLACE INTO nodes (path, value) VALUES (?, ?)";

/// Counts stored leaves.
pub const COUNT_LEAVES: &str = "SELECT COUNT(*) FROM nodes";
