//! The SQLite-backed [`DocumentStore`].

use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{Map, Value};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::database::{Database, DatabaseConfig};
use crate::error::Result;

use super::{DocumentStore, StorePath};

/// Buffered change notifications per receiver before it lags.
const CHANGE_CAPACITY: usize = 256;

/// A [`DocumentStore`] over a single [`Database`] connection.
///
/// Cloning is cheap; clones share the connection and the change channel.
#[derive(Debug, Clone)]
pub struct SqliteDocumentStore {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    db: Mutex<Database>,
    changes: broadcast::Sender<StorePath>,
    data_version: Mutex<Option<i64>>,
}

impl SqliteDocumentStore {
    /// Opens (creating if allowed) the database described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        Ok(Self::new(Database::open(config)?))
    }

    /// Opens a private in-memory store.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::new(Database::open_in_memory()?))
    }

    /// Wraps an open database.
    #[must_use]
    pub fn new(db: Database) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                db: Mutex::new(db),
                changes,
                data_version: Mutex::new(None),
            }),
        }
    }

    /// Checks whether another process has written to the database since the
    /// previous call, and if so notifies every subscriber with the root path.
    ///
    /// The first call only records the current version. Returns `true` when
    /// a notification was sent.
    ///
    /// # Errors
    ///
    /// Returns an error if the data version cannot be read.
    pub fn poll_external(&self) -> Result<bool> {
        let version = self.inner.db.lock().data_version()?;
        let mut last = self.inner.data_version.lock();
        let changed = last.is_some_and(|previous| previous != version);
        *last = Some(version);
        if changed {
            log::debug!("database changed by another connection");
            self.notify(&StorePath::root());
        }
        Ok(changed)
    }

    fn notify(&self, path: &StorePath) {
        // no receivers is not an error
        let _ = self.inner.changes.send(path.clone());
    }
}

impl DocumentStore for SqliteDocumentStore {
    fn get(&self, path: &StorePath) -> Result<Option<Value>> {
        self.inner.db.lock().read_subtree(path)
    }

    fn set(&self, path: &StorePath, value: &Value) -> Result<()> {
        self.inner.db.lock().write_subtree(path, value)?;
        log::debug!("set {path}");
        self.notify(path);
        Ok(())
    }

    fn update(&self, path: &StorePath, children: &Map<String, Value>) -> Result<()> {
        self.inner.db.lock().merge_children(path, children)?;
        log::debug!("updated {} children of {path}", children.len());
        self.notify(path);
        Ok(())
    }

    fn remove(&self, path: &StorePath) -> Result<()> {
        let removed = self.inner.db.lock().delete_subtree(path)?;
        log::debug!("removed {path} ({removed} leaves)");
        self.notify(path);
        Ok(())
    }

    fn push(&self, path: &StorePath, value: &Value) -> Result<String> {
        let key = push_key(chrono::Utc::now().timestamp_millis());
        let child = path.child(&key)?;
        self.set(&child, value)?;
        Ok(key)
    }

    fn changes(&self) -> broadcast::Receiver<StorePath> {
        self.inner.changes.subscribe()
    }
}

/// A child key that sorts by creation time and never collides.
fn push_key(millis: i64) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!("{millis:013}-{}", &random[..12])
}
