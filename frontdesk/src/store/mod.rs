//! The hierarchical document store.
//!
//! Everything the front desk persists lives in one JSON tree addressed by
//! [`StorePath`]s. Components talk to it through the [`DocumentStore`]
//! trait; [`SqliteDocumentStore`] is the bundled implementation.
//!
//! Writes are announced on a broadcast channel. A [`Subscription`] turns
//! those announcements into fresh [`Snapshot`]s of the path it watches.

mod path;
mod records;
mod sqlite;

use serde_json::{Map, Value};
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use crate::error::Result;

pub use path::{
    customer, customers, message, messages, node, property, rooms, super_admin, StorePath,
};
pub use records::{
    load_guest, load_guests, load_properties, load_property, load_room_range, load_templates,
};
pub use sqlite::SqliteDocumentStore;

/// Key-path access to the document tree.
///
/// Every method is synchronous; implementations keep them short enough to
/// call from async tasks directly.
pub trait DocumentStore: Send + Sync {
    /// Reads the value at `path`, or `None` if nothing is stored there.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage fails.
    fn get(&self, path: &StorePath) -> Result<Option<Value>>;

    /// Replaces the value at `path`. `null` deletes.
    ///
    /// # Errors
    ///
    /// Returns an error if the value has invalid keys or storage fails.
    fn set(&self, path: &StorePath, value: &Value) -> Result<()>;

    /// Replaces only the listed children of `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if a key is invalid or storage fails.
    fn update(&self, path: &StorePath, children: &Map<String, Value>) -> Result<()>;

    /// Deletes everything at or below `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if storage fails.
    fn remove(&self, path: &StorePath) -> Result<()>;

    /// Writes `value` under a new time-ordered child key of `path` and
    /// returns the key.
    ///
    /// # Errors
    ///
    /// Returns an error if the value has invalid keys or storage fails.
    fn push(&self, path: &StorePath, value: &Value) -> Result<String>;

    /// A receiver of the paths of all subsequent committed writes.
    fn changes(&self) -> broadcast::Receiver<StorePath>;
}

/// The value at a path at one point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// The watched path.
    pub path: StorePath,
    /// The value, or `None` if nothing is stored there.
    pub value: Option<Value>,
}

/// A stream of snapshots of one path.
///
/// The first call to [`Subscription::next`] yields the current value. Each
/// later call waits for a write that overlaps the path and yields the value
/// after it. Bursts of writes collapse into one snapshot.
///
/// # Examples
///
/// ```
/// use frontdesk::store::{DocumentStore, SqliteDocumentStore, StorePath, Subscription};
/// use serde_json::json;
///
/// let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
/// rt.block_on(async {
///     let store = SqliteDocumentStore::open_in_memory().unwrap();
///     let path: StorePath = "hotels/h1/rooms".parse().unwrap();
///     let mut rooms = Subscription::new(store.clone(), path.clone());
///
///     assert_eq!(rooms.next().await.unwrap().unwrap().value, None);
///     store.set(&path, &json!(4)).unwrap();
///     assert_eq!(rooms.next().await.unwrap().unwrap().value, Some(json!(4)));
/// });
/// ```
#[derive(Debug)]
pub struct Subscription<S> {
    store: S,
    path: StorePath,
    changes: broadcast::Receiver<StorePath>,
    primed: bool,
}

impl<S: DocumentStore> Subscription<S> {
    /// Subscribes to `path`. Writes made after this call are never missed.
    pub fn new(store: S, path: StorePath) -> Self {
        let changes = store.changes();
        Self {
            store,
            path,
            changes,
            primed: false,
        }
    }

    /// The watched path.
    #[must_use]
    pub const fn path(&self) -> &StorePath {
        &self.path
    }

    /// Waits for the next snapshot.
    ///
    /// Returns `Ok(None)` once the store has shut down.
    ///
    /// # Errors
    ///
    /// Returns an error if re-reading the path fails.
    pub async fn next(&mut self) -> Result<Option<Snapshot>> {
        if !self.primed {
            self.primed = true;
            return self.read().map(Some);
        }

        loop {
            match self.changes.recv().await {
                Ok(changed) if changed.overlaps(&self.path) => {
                    self.drain();
                    return self.read().map(Some);
                }
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => {
                    log::warn!(
                        "subscription on {} lagged by {skipped} writes, re-reading",
                        self.path
                    );
                    self.drain();
                    return self.read().map(Some);
                }
                Err(RecvError::Closed) => return Ok(None),
            }
        }
    }

    fn drain(&mut self) {
        loop {
            match self.changes.try_recv() {
                Ok(_) | Err(TryRecvError::Lagged(_)) => {}
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
    }

    fn read(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            path: self.path.clone(),
            value: self.store.get(&self.path)?,
        })
    }
}
