//! Property provisioning by the super-admin.

use serde_json::{json, Map};

use crate::booking::is_valid_mobile;
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::messaging::TemplateSet;
use crate::property::{NodeType, Property, PropertyKind, PropertyRef};
use crate::store::{self, DocumentStore};

use super::identity::find_account;
use super::plan::{OperationPlan, PlanAction};

/// Options for creating a property.
#[derive(Debug, Clone)]
pub struct ProvisionOptions {
    /// Hotel or restaurant.
    pub kind: PropertyKind,
    /// Display name.
    pub name: String,
    /// Free-text location.
    pub location: String,
    /// Admin login email.
    pub email: String,
    /// Contact mobile number.
    pub mobile: String,
    /// Account uid; generated when absent.
    pub uid: Option<String>,
}

impl ProvisionOptions {
    /// Options for a property of `kind` named `name`.
    #[must_use]
    pub fn new(kind: PropertyKind, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            location: String::new(),
            email: email.into(),
            mobile: String::new(),
            uid: None,
        }
    }

    /// Sets the location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Sets the contact mobile number.
    #[must_use]
    pub fn with_mobile(mut self, mobile: impl Into<String>) -> Self {
        self.mobile = mobile.into();
        self
    }

    /// Uses a fixed account uid.
    #[must_use]
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }
}

/// Plans the creation of a property with its default templates.
///
/// Returns the plan and the new property's address.
///
/// # Errors
///
/// Returns [`Error::Validation`] for a missing name, a malformed email or
/// mobile, an email already used by another account, or a uid already
/// taken.
pub fn plan_create<S: DocumentStore + ?Sized>(
    store: &S,
    options: &ProvisionOptions,
    clock: &dyn Clock,
) -> Result<(OperationPlan, PropertyRef)> {
    require("name", &options.name)?;
    validate_email(&options.email)?;
    if !options.mobile.trim().is_empty() && !is_valid_mobile(&options.mobile) {
        return Err(invalid("mobile", "Enter a valid 10-digit mobile number."));
    }
    if find_account(store, &options.email)?.is_some() {
        return Err(invalid("email", "already used by another account"));
    }

    let uid = options
        .uid
        .clone()
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());
    let reference = PropertyRef::new(options.kind.node(), uid.clone());
    if store.get(&store::property(&reference)?)?.is_some() {
        return Err(invalid("uid", &format!("{reference} already exists")));
    }

    let record = Property {
        name: options.name.trim().to_string(),
        location: options.location.trim().to_string(),
        email: options.email.trim().to_string(),
        mobile: options.mobile.trim().to_string(),
        kind: options.kind,
        role: "admin".into(),
        created_at: clock.epoch_millis(),
        uid,
    };

    let mut plan = OperationPlan::new(format!("Create {} '{}'", record.kind, record.name))
        .add_action(PlanAction::CreateProperty(record));
    let defaults = TemplateSet::defaults(options.kind);
    for (key, text) in defaults.iter() {
        plan = plan.add_action(PlanAction::PutTemplate {
            property: reference.clone(),
            key,
            text: text.to_string(),
        });
    }
    if options.kind == PropertyKind::Hotel {
        plan = plan.add_warning("the hotel has no rooms until a capacity is set");
    }
    Ok((plan, reference))
}

/// Field changes for a property. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New location.
    pub location: Option<String>,
    /// New admin email.
    pub email: Option<String>,
    /// New contact mobile.
    pub mobile: Option<String>,
}

/// Plans an update of a property's own fields.
///
/// # Errors
///
/// Returns [`Error::PropertyNotFound`] for an unknown property and
/// [`Error::Validation`] for malformed values, an email used by another
/// account, or an empty update.
pub fn plan_update<S: DocumentStore + ?Sized>(
    store: &S,
    property: &PropertyRef,
    update: &PropertyUpdate,
) -> Result<OperationPlan> {
    store::load_property(store, property)?;
    let mut patch = Map::new();

    if let Some(name) = &update.name {
        require("name", name)?;
        patch.insert("name".into(), json!(name.trim()));
    }
    if let Some(location) = &update.location {
        patch.insert("location".into(), json!(location.trim()));
    }
    if let Some(email) = &update.email {
        validate_email(email)?;
        match find_account(store, email)? {
            Some(owner) if owner.property() != Some(property) => {
                return Err(invalid("email", "already used by another account"));
            }
            _ => {}
        }
        patch.insert("email".into(), json!(email.trim()));
    }
    if let Some(mobile) = &update.mobile {
        if !mobile.trim().is_empty() && !is_valid_mobile(mobile) {
            return Err(invalid("mobile", "Enter a valid 10-digit mobile number."));
        }
        patch.insert("mobile".into(), json!(mobile.trim()));
    }
    if patch.is_empty() {
        return Err(invalid("update", "nothing to change"));
    }

    Ok(OperationPlan::new(format!("Update {property}")).add_action(PlanAction::UpdateProperty {
        property: property.clone(),
        patch,
    }))
}

/// Plans the removal of a property and everything it owns.
///
/// # Errors
///
/// Returns [`Error::PropertyNotFound`] for an unknown property.
pub fn plan_remove<S: DocumentStore + ?Sized>(
    store: &S,
    property: &PropertyRef,
) -> Result<OperationPlan> {
    let record = store::load_property(store, property)?;
    let guests = store::load_guests(store, property)?.len();
    let mut plan = OperationPlan::new(format!("Remove {} '{}'", record.kind, record.name))
        .add_action(PlanAction::DeleteProperty(property.clone()));
    if guests > 0 {
        plan = plan.add_warning(format!("{guests} guest record(s) will be deleted"));
    }
    Ok(plan)
}

/// Plans setting a hotel's room capacity.
///
/// Rooms are always numbered from 101; shrinking the capacity leaves guests
/// in dropped rooms stored but out of the occupancy picture.
///
/// # Errors
///
/// Returns [`Error::WrongPropertyKind`] for restaurants and
/// [`Error::PropertyNotFound`] for an unknown hotel.
pub fn plan_set_rooms<S: DocumentStore + ?Sized>(
    store: &S,
    property: &PropertyRef,
    capacity: u32,
) -> Result<OperationPlan> {
    if property.node != NodeType::Hotels {
        return Err(Error::WrongPropertyKind {
            operation: "setting rooms".into(),
            expected: PropertyKind::Hotel,
        });
    }
    store::load_property(store, property)?;
    let current = store::load_room_range(store, property)?;

    let mut plan = OperationPlan::new(format!("Set rooms of {property}"))
        .add_action(PlanAction::SetRooms {
            property: property.clone(),
            capacity,
        });
    if capacity < current.capacity() {
        plan = plan.add_warning(format!(
            "rooms {} and above are dropped",
            crate::room::RoomNumber::FIRST + capacity
        ));
    }
    Ok(plan)
}

fn require(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field, "is required"));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') && !email.contains(' ') => {
            Ok(())
        }
        _ => Err(invalid("email", &format!("'{email}' is not an email address"))),
    }
}

fn invalid(field: &str, message: &str) -> Error {
    Error::Validation {
        field: field.into(),
        message: message.into(),
    }
}
