//! Error types for the frontdesk library.
//!
//! Every fallible operation in the crate returns [`Result`], whose error side
//! is the [`Error`] enum below. The variants fall into four families:
//! validation failures, booking conflicts, identity/linkage failures, and
//! store or infrastructure failures wrapped from the underlying crates.

use std::path::PathBuf;

use thiserror::Error;

use crate::booking::ValidationErrors;
use crate::property::{NodeType, PropertyKind, PropertyRef};
use crate::room::RoomNumber;

/// Result type alias for operations that may fail with a frontdesk error.
///
/// # Examples
///
/// ```
/// use frontdesk::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(101)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the frontdesk library.
#[derive(Debug, Error)]
pub enum Error {
    /// A single value failed validation.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A registration form failed field validation.
    ///
    /// Carries every failing field so callers can show all messages at once.
    #[error("registration form is invalid: {0}")]
    InvalidForm(ValidationErrors),

    /// The requested room is occupied at the moment of the check.
    #[error("room {room} is already booked for the selected period")]
    RoomOccupied {
        /// The conflicting room.
        room: RoomNumber,
    },

    /// A room identifier could not be parsed or lies outside the property.
    #[error("invalid room '{value}': {reason}")]
    InvalidRoom {
        /// The offending value.
        value: String,
        /// The reason the room is invalid.
        reason: String,
    },

    /// A message template key is neither reserved nor a `custom_<n>` key.
    #[error("invalid template key '{key}'")]
    InvalidTemplateKey {
        /// The offending key.
        key: String,
    },

    /// A document store path is malformed.
    #[error("invalid store path '{path}': {reason}")]
    InvalidStorePath {
        /// The offending path.
        path: String,
        /// The reason the path is invalid.
        reason: String,
    },

    /// No property record exists under the given node and id.
    #[error("{node} property '{id}' not found")]
    PropertyNotFound {
        /// The node the property was looked up under.
        node: NodeType,
        /// The property identifier.
        id: String,
    },

    /// No guest record exists under the given property.
    #[error("guest '{id}' not found in {property}")]
    GuestNotFound {
        /// The owning property.
        property: PropertyRef,
        /// The guest identifier.
        id: String,
    },

    /// An account email matches neither the super-admin nor any property.
    #[error("access denied: no account record matches '{email}'")]
    UnknownAccount {
        /// The email that was looked up.
        email: String,
    },

    /// A super-admin record already exists.
    #[error("a super-admin is already registered ({email})")]
    SuperAdminExists {
        /// The email of the existing super-admin.
        email: String,
    },

    /// An operation was applied to the wrong kind of property.
    #[error("{operation} requires a {expected} property")]
    WrongPropertyKind {
        /// The attempted operation.
        operation: String,
        /// The property kind the operation requires.
        expected: PropertyKind,
    },

    /// A registration link could not be resolved to a property.
    #[error("invalid registration link '{link}': {reason}")]
    InvalidLink {
        /// The offending link.
        link: String,
        /// The reason the link is invalid.
        reason: String,
    },

    /// An invalid filesystem path was provided.
    #[error("invalid path {}: {reason}", path.display())]
    InvalidPath {
        /// The invalid path.
        path: PathBuf,
        /// The reason the path is invalid.
        reason: String,
    },

    /// The data directory was not found and auto-initialization is disabled.
    #[error("data directory not found: {}", path.display())]
    DataDirectoryNotFound {
        /// The expected path to the data directory.
        path: PathBuf,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: i32,
        /// The schema version found in the database.
        found: i32,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A stored document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Check if the error is a recoverable input problem.
    ///
    /// # Examples
    ///
    /// ```
    /// use frontdesk::Error;
    ///
    /// let err = Error::InvalidTemplateKey { key: "welcome".into() };
    /// assert!(err.is_validation());
    /// ```
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::InvalidForm(_)
                | Self::InvalidRoom { .. }
                | Self::InvalidTemplateKey { .. }
        )
    }

    /// Check if the error reports a conflict with existing records.
    ///
    /// # Examples
    ///
    /// ```
    /// use frontdesk::{Error, RoomNumber};
    ///
    /// let err = Error::RoomOccupied { room: RoomNumber::new(101) };
    /// assert!(err.is_conflict());
    /// ```
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::RoomOccupied { .. } | Self::SuperAdminExists { .. })
    }

    /// Check if the error is an identity or linkage failure.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        matches!(
            self,
            Self::PropertyNotFound { .. }
                | Self::GuestNotFound { .. }
                | Self::UnknownAccount { .. }
                | Self::WrongPropertyKind { .. }
                | Self::InvalidLink { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_occupied_matches_desk_alert() {
        let err = Error::RoomOccupied {
            room: RoomNumber::new(101),
        };
        assert_eq!(
            err.to_string(),
            "room 101 is already booked for the selected period"
        );
        assert!(err.is_conflict());
        assert!(!err.is_validation());
    }

    #[test]
    fn test_invalid_form_lists_fields() {
        let mut errors = ValidationErrors::default();
        errors.insert("name", "Name is required.");
        errors.insert("mobile", "Mobile number is required.");
        let err = Error::InvalidForm(errors);
        let display = err.to_string();
        assert!(display.contains("Name is required."));
        assert!(display.contains("Mobile number is required."));
        assert!(err.is_validation());
    }

    #[test]
    fn test_property_not_found_display() {
        let err = Error::PropertyNotFound {
            node: NodeType::Hotels,
            id: "h1".into(),
        };
        assert_eq!(err.to_string(), "hotels property 'h1' not found");
        assert!(err.is_identity());
    }

    #[test]
    fn test_guest_not_found_display() {
        let err = Error::GuestNotFound {
            property: PropertyRef::hotel("h1"),
            id: "g1".into(),
        };
        assert_eq!(err.to_string(), "guest 'g1' not found in hotels/h1");
    }

    #[test]
    fn test_unknown_account_is_access_denied() {
        let err = Error::UnknownAccount {
            email: "nobody@example.com".into(),
        };
        assert!(err.to_string().starts_with("access denied"));
        assert!(err.is_identity());
    }

    #[test]
    fn test_wrong_property_kind_display() {
        let err = Error::WrongPropertyKind {
            operation: "setting room capacity".into(),
            expected: PropertyKind::Hotel,
        };
        assert_eq!(err.to_string(), "setting room capacity requires a hotel property");
    }

    #[test]
    fn test_unsupported_schema_version_error() {
        let err = Error::UnsupportedSchemaVersion {
            expected: 1,
            found: 2,
        };
        let display = format!("{err}");
        assert!(display.contains("expected 1"));
        assert!(display.contains("found 2"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(format!("{err}").contains("I/O error"));
        assert!(!err.is_identity());
    }
}
