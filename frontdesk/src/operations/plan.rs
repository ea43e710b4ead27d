//! Plan types for front-desk operations.
//!
//! A plan lists the store writes an operation will make, so that they can
//! be shown (dry run), logged, or executed in one go.

use serde_json::{Map, Value};

use crate::guest::GuestRecord;
use crate::messaging::TemplateKey;
use crate::property::{Property, PropertyRef};

/// A single store write.
#[derive(Debug, Clone, PartialEq)]
pub enum PlanAction {
    /// Store a new guest record. Without an `id` the store assigns a
    /// time-ordered key.
    CreateGuest {
        /// Owning property.
        property: PropertyRef,
        /// Record key, if the flow chooses it.
        id: Option<String>,
        /// The record.
        record: GuestRecord,
    },

    /// Overwrite some fields of a guest record.
    UpdateGuest {
        /// Owning property.
        property: PropertyRef,
        /// Record key.
        id: String,
        /// Field values; `null` removes a field.
        patch: Map<String, Value>,
    },

    /// Delete a guest record.
    DeleteGuest {
        /// Owning property.
        property: PropertyRef,
        /// Record key.
        id: String,
    },

    /// Create or replace one message template.
    PutTemplate {
        /// Owning property.
        property: PropertyRef,
        /// Template key.
        key: TemplateKey,
        /// Template text.
        text: String,
    },

    /// Delete one message template.
    DeleteTemplate {
        /// Owning property.
        property: PropertyRef,
        /// Template key.
        key: TemplateKey,
    },

    /// Store the fields of a new property.
    CreateProperty(Property),

    /// Overwrite some fields of a property record.
    UpdateProperty {
        /// The property.
        property: PropertyRef,
        /// Field values.
        patch: Map<String, Value>,
    },

    /// Delete a property with all its guests, templates and rooms.
    DeleteProperty(PropertyRef),

    /// Set the room capacity of a hotel.
    SetRooms {
        /// The hotel.
        property: PropertyRef,
        /// Number of rooms.
        capacity: u32,
    },

    /// Store the super-admin account record.
    RegisterSuperAdmin {
        /// Login email.
        email: String,
        /// Account uid.
        uid: String,
    },
}

impl PlanAction {
    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::CreateGuest {
                property,
                id: Some(id),
                record,
            } => format!("Register {} at {property} as {id}", record.profile().name),
            Self::CreateGuest {
                property, record, ..
            } => format!("Register {} at {property}", record.profile().name),
            Self::UpdateGuest { property, id, patch } => {
                let fields: Vec<&str> = patch.keys().map(String::as_str).collect();
                format!("Update {} of guest {id} at {property}", fields.join(", "))
            }
            Self::DeleteGuest { property, id } => format!("Delete guest {id} at {property}"),
            Self::PutTemplate { property, key, .. } => {
                format!("Write template {key} of {property}")
            }
            Self::DeleteTemplate { property, key } => {
                format!("Delete template {key} of {property}")
            }
            Self::CreateProperty(record) => {
                format!("Create {} '{}' at {}", record.kind, record.name, record.reference())
            }
            Self::UpdateProperty { property, patch } => {
                let fields: Vec<&str> = patch.keys().map(String::as_str).collect();
                format!("Update {} of {property}", fields.join(", "))
            }
            Self::DeleteProperty(property) => format!("Delete {property} and everything under it"),
            Self::SetRooms { property, capacity } => {
                format!("Set room capacity of {property} to {capacity}")
            }
            Self::RegisterSuperAdmin { email, .. } => format!("Register super-admin {email}"),
        }
    }
}

/// A complete operation plan describing all actions to be taken.
#[derive(Debug, Clone)]
pub struct OperationPlan {
    /// A human-readable description of the operation.
    pub description: String,

    /// The sequence of actions to perform.
    pub actions: Vec<PlanAction>,

    /// Warnings to communicate to the user.
    pub warnings: Vec<String>,
}

impl OperationPlan {
    /// Creates an empty plan.
    ///
    /// # Examples
    ///
    /// ```
    /// use frontdesk::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Register guest");
    /// assert_eq!(plan.description, "Register guest");
    /// assert!(plan.is_empty());
    /// ```
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an action to the plan.
    ///
    /// # Examples
    ///
    /// ```
    /// use frontdesk::operations::{OperationPlan, PlanAction};
    /// use frontdesk::PropertyRef;
    ///
    /// let plan = OperationPlan::new("Resize")
    ///     .add_action(PlanAction::SetRooms { property: PropertyRef::hotel("h1"), capacity: 12 });
    /// assert_eq!(plan.len(), 1);
    /// ```
    #[must_use]
    pub fn add_action(mut self, action: PlanAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a warning to the plan.
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Checks if the plan has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }
}
