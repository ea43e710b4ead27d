//! Reading and writing the document tree.
//!
//! Objects are flattened on write into one row per leaf. Reads reassemble
//! the nested object from the rows sharing the requested prefix. A `null`
//! leaf or an empty object leaves nothing behind, so deleting the last child
//! of an object deletes the object too.

use rusqlite::{params, TransactionBehavior};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::store::StorePath;

use super::connection::Database;
use super::schema::{
    COUNT_LEAVES, DELETE_ALL, DELETE_LEAF, DELETE_SUBTREE, SELECT_ALL, SELECT_SUBTREE, UPSERT_LEAF,
};

impl Database {
    /// Reads the value at `path`.
    ///
    /// Returns `None` if nothing is stored at or below the path.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a stored leaf is not valid JSON.
    ///
    /// # Examples
    ///
    /// ```
    /// use frontdesk::database::Database;
    /// use frontdesk::store::StorePath;
    /// use serde_json::json;
    ///
    /// let mut db = Database::open_in_memory().unwrap();
    /// let path: StorePath = "hotels/h1".parse().unwrap();
    /// db.write_subtree(&path, &json!({ "name": "Sea View", "rooms": 3 })).unwrap();
    ///
    /// let rooms: StorePath = "hotels/h1/rooms".parse().unwrap();
    /// assert_eq!(db.read_subtree(&rooms).unwrap(), Some(json!(3)));
    /// ```
    pub fn read_subtree(&self, path: &StorePath) -> Result<Option<Value>> {
        let rows: Vec<(String, String)> = if path.is_root() {
            let mut stmt = self.conn.prepare(SELECT_ALL)?;
            let rows = stmt.query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?;
            rows.collect::<rusqlite::Result<_>>()?
        } else {
            let mut stmt = self.conn.prepare(SELECT_SUBTREE)?;
            let prefix = format!("{}/", path.as_str());
            let rows = stmt.query_map(params![path.as_str(), prefix], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?;
            rows.collect::<rusqlite::Result<_>>()?
        };

        assemble(path, rows)
    }

    /// Replaces the value at `path`.
    ///
    /// Everything previously stored at or below `path` is removed, as is any
    /// scalar stored at an ancestor. Writing `null` or `{}` is a delete.
    ///
    /// # Errors
    ///
    /// Returns an error if an object key is not a valid path segment, a
    /// scalar is written at the root, or the transaction fails.
    pub fn write_subtree(&mut self, path: &StorePath, value: &Value) -> Result<()> {
        let mut leaves = Vec::new();
        flatten(path, value, &mut leaves)?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        clear(&tx, path)?;
        {
            let mut upsert = tx.prepare(UPSERT_LEAF)?;
            for (leaf_path, encoded) in &leaves {
                upsert.execute(params![leaf_path, encoded])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Replaces each listed direct child of `path`, leaving the others alone.
    ///
    /// A `null` child is deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if a key is not a valid path segment or the
    /// transaction fails.
    pub fn merge_children(&mut self, path: &StorePath, children: &Map<String, Value>) -> Result<()> {
        let mut writes = Vec::with_capacity(children.len());
        for (key, value) in children {
            let child = path.child(key)?;
            let mut leaves = Vec::new();
            flatten(&child, value, &mut leaves)?;
            writes.push((child, leaves));
        }

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !path.is_root() {
            tx.execute(DELETE_LEAF, params![path.as_str()])?;
            for ancestor in path.ancestors() {
                tx.execute(DELETE_LEAF, params![ancestor.as_str()])?;
            }
        }
        {
            let mut delete = tx.prepare(DELETE_SUBTREE)?;
            let mut upsert = tx.prepare(UPSERT_LEAF)?;
            for (child, leaves) in &writes {
                delete.execute(params![child.as_str(), format!("{}/", child.as_str())])?;
                for (leaf_path, encoded) in leaves {
                    upsert.execute(params![leaf_path, encoded])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Deletes everything at or below `path`, returning the number of
    /// leaves removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_subtree(&mut self, path: &StorePath) -> Result<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let removed = if path.is_root() {
            tx.execute(DELETE_ALL, [])?
        } else {
            tx.execute(
                DELETE_SUBTREE,
                params![path.as_str(), format!("{}/", path.as_str())],
            )?
        };
        tx.commit()?;
        Ok(removed)
    }

    /// Counts the stored leaves.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_leaves(&self) -> Result<usize> {
        let count: i64 = self.conn.query_row(COUNT_LEAVES, [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}

/// Removes the subtree at `path` and any scalar shadowing it from above.
fn clear(tx: &rusqlite::Transaction<'_>, path: &StorePath) -> Result<()> {
    if path.is_root() {
        tx.execute(DELETE_ALL, [])?;
        return Ok(());
    }
    tx.execute(
        DELETE_SUBTREE,
        params![path.as_str(), format!("{}/", path.as_str())],
    )?;
    for ancestor in path.ancestors() {
        tx.execute(DELETE_LEAF, params![ancestor.as_str()])?;
    }
    Ok(())
}

fn flatten(path: &StorePath, value: &Value, out: &mut Vec<(String, String)>) -> Result<()> {
    match value {
        Value::Null => Ok(()),
        Value::Object(map) => {
            for (key, child) in map {
                flatten(&path.child(key)?, child, out)?;
            }
            Ok(())
        }
        scalar => {
            if path.is_root() {
                return Err(Error::InvalidStorePath {
                    path: path.to_string(),
                    reason: "the root can only hold an object".into(),
                });
            }
            out.push((path.as_str().to_string(), serde_json::to_string(scalar)?));
            Ok(())
        }
    }
}

fn assemble(path: &StorePath, rows: Vec<(String, String)>) -> Result<Option<Value>> {
    if rows.is_empty() {
        return Ok(None);
    }

    let prefix_len = if path.is_root() {
        0
    } else {
        path.as_str().len() + 1
    };
    let mut root = Map::new();
    for (leaf_path, encoded) in rows {
        let leaf: Value = serde_json::from_str(&encoded)?;
        if leaf_path == path.as_str() {
            // a scalar at the path itself; descendants cannot coexist with it
            return Ok(Some(leaf));
        }
        let relative: Vec<&str> = leaf_path[prefix_len..].split('/').collect();
        insert_at(&mut root, &relative, leaf);
    }
    Ok(Some(Value::Object(root)))
}

fn insert_at(map: &mut Map<String, Value>, segments: &[&str], leaf: Value) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };
    if rest.is_empty() {
        map.insert((*first).to_string(), leaf);
        return;
    }
    let entry = map
        .entry((*first).to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    if let Value::Object(child) = entry {
        insert_at(child, rest, leaf);
    }
}
