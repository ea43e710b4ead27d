//! Store paths and the document layout.
//!
//! A [`StorePath`] is a slash-separated sequence of validated segments. The
//! helper functions at the bottom of this module are the only place the
//! layout (`hotels/{id}/customers/{guestId}` and friends) is spelled out.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::messaging::TemplateKey;
use crate::property::{NodeType, PropertyRef};

/// Characters a path segment may not contain.
const FORBIDDEN: &[char] = &['/', '.', '#', '$', '[', ']'];

/// A validated document store path. The empty path is the root.
///
/// # Examples
///
/// ```
/// use frontdesk::store::StorePath;
///
/// let path: StorePath = "hotels/h1/customers".parse().unwrap();
/// assert_eq!(path.segments().count(), 3);
/// assert_eq!(path.parent().unwrap().as_str(), "hotels/h1");
/// assert!("hotels//h1".parse::<StorePath>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct StorePath(String);

impl StorePath {
    /// The root of the store.
    #[must_use]
    pub const fn root() -> Self {
        Self(String::new())
    }

    /// Returns `true` for the root path.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// The path as stored.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the segments.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// The last segment, or `None` for the root.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.segments().last()
    }

    /// Appends one segment.
    ///
    /// # Errors
    ///
    /// Returns an error if `segment` is not a valid single segment.
    pub fn child(&self, segment: &str) -> Result<Self> {
        validate_segment(&self.0, segment)?;
        if self.is_root() {
            Ok(Self(segment.to_string()))
        } else {
            Ok(Self(format!("{}/{segment}", self.0)))
        }
    }

    /// The parent path, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.is_root() {
            return None;
        }
        Some(match self.0.rfind('/') {
            Some(idx) => Self(self.0[..idx].to_string()),
            None => Self::root(),
        })
    }

    /// Every proper ancestor except the root, nearest first.
    #[must_use]
    pub fn ancestors(&self) -> Vec<Self> {
        let mut out = Vec::new();
        let mut current = self.parent();
        while let Some(path) = current {
            if path.is_root() {
                break;
            }
            current = path.parent();
            out.push(path);
        }
        out
    }

    /// Returns `true` if `self` equals `other` or contains it.
    #[must_use]
    pub fn is_ancestor_or_self(&self, other: &Self) -> bool {
        self.is_root()
            || other.0 == self.0
            || (other.0.len() > self.0.len()
                && other.0.starts_with(&self.0)
                && other.0.as_bytes()[self.0.len()] == b'/')
    }

    /// Returns `true` if a write at one path can change the other.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.is_ancestor_or_self(other) || other.is_ancestor_or_self(self)
    }
}

fn validate_segment(parent: &str, segment: &str) -> Result<()> {
    let reason = if segment.is_empty() {
        Some("empty segment".to_string())
    } else if let Some(c) = segment.chars().find(|c| FORBIDDEN.contains(c) || c.is_control()) {
        Some(format!("segment '{segment}' contains '{}'", c.escape_default()))
    } else {
        None
    };
    match reason {
        Some(reason) => Err(Error::InvalidStorePath {
            path: if parent.is_empty() {
                segment.to_string()
            } else {
                format!("{parent}/{segment}")
            },
            reason,
        }),
        None => Ok(()),
    }
}

impl FromStr for StorePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        trimmed
            .split('/')
            .try_fold(Self::root(), |path, segment| path.child(segment))
    }
}

impl fmt::Display for StorePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("/")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// `hotels` or `resto`.
#[must_use]
pub fn node(node: NodeType) -> StorePath {
    StorePath(node.as_str().to_string())
}

/// `superAdmin`
#[must_use]
pub fn super_admin() -> StorePath {
    StorePath("superAdmin".to_string())
}

/// `{node}/{propertyId}`
///
/// # Errors
///
/// Returns an error if the property id is not a valid segment.
pub fn property(property: &PropertyRef) -> Result<StorePath> {
    node(property.node).child(&property.id)
}

/// `hotels/{propertyId}/rooms`
///
/// # Errors
///
/// Returns an error if the property id is not a valid segment.
pub fn rooms(property: &PropertyRef) -> Result<StorePath> {
    self::property(property)?.child("rooms")
}

/// `{node}/{propertyId}/customers`
///
/// # Errors
///
/// Returns an error if the property id is not a valid segment.
pub fn customers(property: &PropertyRef) -> Result<StorePath> {
    self::property(property)?.child("customers")
}

/// `{node}/{propertyId}/customers/{guestId}`
///
/// # Errors
///
/// Returns an error if either id is not a valid segment.
pub fn customer(property: &PropertyRef, guest_id: &str) -> Result<StorePath> {
    customers(property)?.child(guest_id)
}

/// `{node}/{propertyId}/messages`
///
/// # Errors
///
/// Returns an error if the property id is not a valid segment.
pub fn messages(property: &PropertyRef) -> Result<StorePath> {
    self::property(property)?.child("messages")
}

/// `{node}/{propertyId}/messages/{key}`
///
/// # Errors
///
/// Returns an error if the property id is not a valid segment.
pub fn message(property: &PropertyRef, key: &TemplateKey) -> Result<StorePath> {
    messages(property)?.child(&key.to_string())
}
