//! Property (tenant) records.
//!
//! A property is either a hotel, stored under `hotels/{id}`, or a
//! restaurant, stored under `resto/{id}`. Each owns its guests and its
//! message templates; hotels additionally own a room capacity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Top-level node of the document store a property lives under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeType {
    /// `hotels/{id}`
    #[serde(rename = "hotels")]
    Hotels,
    /// `resto/{id}`
    #[serde(rename = "resto")]
    Resto,
}

impl NodeType {
    /// Both nodes, hotels first.
    pub const ALL: [Self; 2] = [Self::Hotels, Self::Resto];

    /// The path segment of this node.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hotels => "hotels",
            Self::Resto => "resto",
        }
    }

    /// The kind of property stored under this node.
    #[must_use]
    pub const fn kind(self) -> PropertyKind {
        match self {
            Self::Hotels => PropertyKind::Hotel,
            Self::Resto => PropertyKind::Resto,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hotels" => Ok(Self::Hotels),
            "resto" => Ok(Self::Resto),
            other => Err(Error::Validation {
                field: "node_type".into(),
                message: format!("expected 'hotels' or 'resto', got '{other}'"),
            }),
        }
    }
}

/// The `type` tag of a property record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyKind {
    /// A hotel with rooms.
    Hotel,
    /// A restaurant.
    Resto,
}

impl PropertyKind {
    /// The store node holding properties of this kind.
    #[must_use]
    pub const fn node(self) -> NodeType {
        match self {
            Self::Hotel => NodeType::Hotels,
            Self::Resto => NodeType::Resto,
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hotel => f.write_str("hotel"),
            Self::Resto => f.write_str("resto"),
        }
    }
}

impl FromStr for PropertyKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hotel" | "hotels" => Ok(Self::Hotel),
            "resto" | "restaurant" => Ok(Self::Resto),
            other => Err(Error::Validation {
                field: "type".into(),
                message: format!("expected 'hotel' or 'resto', got '{other}'"),
            }),
        }
    }
}

/// Address of a property: its node and identifier.
///
/// # Examples
///
/// ```
/// use frontdesk::{NodeType, PropertyRef};
///
/// let hotel = PropertyRef::hotel("h1");
/// assert_eq!(hotel.node, NodeType::Hotels);
/// assert_eq!(hotel.to_string(), "hotels/h1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PropertyRef {
    /// The node the property lives under.
    pub node: NodeType,
    /// The property identifier (the admin account uid).
    pub id: String,
}

impl PropertyRef {
    /// Creates a reference to any property.
    #[must_use]
    pub fn new(node: NodeType, id: impl Into<String>) -> Self {
        Self {
            node,
            id: id.into(),
        }
    }

    /// Creates a reference to a hotel.
    #[must_use]
    pub fn hotel(id: impl Into<String>) -> Self {
        Self::new(NodeType::Hotels, id)
    }

    /// Creates a reference to a restaurant.
    #[must_use]
    pub fn resto(id: impl Into<String>) -> Self {
        Self::new(NodeType::Resto, id)
    }

    /// The kind of the referenced property.
    #[must_use]
    pub const fn kind(&self) -> PropertyKind {
        self.node.kind()
    }
}

impl fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.node, self.id)
    }
}

/// The fields stored at `hotels/{id}` or `resto/{id}`.
///
/// Child collections (`rooms`, `customers`, `messages`) live under the same
/// path but are read separately and ignored when decoding this record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Free-text location.
    #[serde(default)]
    pub location: String,
    /// Admin login email, used for role resolution.
    #[serde(default)]
    pub email: String,
    /// Contact mobile number.
    #[serde(default)]
    pub mobile: String,
    /// Hotel or restaurant.
    #[serde(rename = "type")]
    pub kind: PropertyKind,
    /// Always `admin`.
    #[serde(default = "default_role")]
    pub role: String,
    /// Creation time in epoch milliseconds.
    #[serde(rename = "createdAt", default)]
    pub created_at: i64,
    /// The property identifier, duplicated inside the record.
    #[serde(default)]
    pub uid: String,
}

fn default_role() -> String {
    "admin".to_string()
}

impl Property {
    /// The address of this property.
    #[must_use]
    pub fn reference(&self) -> PropertyRef {
        PropertyRef::new(self.kind.node(), self.uid.clone())
    }
}
