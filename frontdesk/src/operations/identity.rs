//! Account records and role resolution.
//!
//! Logins are matched to roles by email alone: the super-admin record at
//! `superAdmin`, then every hotel and restaurant record. Credentials are
//! not handled here.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::property::{NodeType, PropertyRef};
use crate::store::{self, DocumentStore};

use super::plan::{OperationPlan, PlanAction};

/// What an account may administer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "role", content = "property", rename_all = "camelCase")]
pub enum Role {
    /// Provisions properties.
    SuperAdmin,
    /// Runs one hotel.
    HotelAdmin(PropertyRef),
    /// Runs one restaurant.
    RestoAdmin(PropertyRef),
}

impl Role {
    /// The administered property, if any.
    #[must_use]
    pub const fn property(&self) -> Option<&PropertyRef> {
        match self {
            Self::SuperAdmin => None,
            Self::HotelAdmin(property) | Self::RestoAdmin(property) => Some(property),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SuperAdmin => f.write_str("super-admin"),
            Self::HotelAdmin(property) => write!(f, "hotel admin of {property}"),
            Self::RestoAdmin(property) => write!(f, "restaurant admin of {property}"),
        }
    }
}

/// Finds the account registered under `email`, ignoring case and
/// surrounding whitespace.
///
/// # Errors
///
/// Returns an error if the store read fails.
pub fn find_account<S: DocumentStore + ?Sized>(store: &S, email: &str) -> Result<Option<Role>> {
    let wanted = normalize(email);
    if wanted.is_empty() {
        return Ok(None);
    }

    if let Some(admin) = store.get(&store::super_admin())? {
        if email_of(&admin).is_some_and(|e| normalize(e) == wanted) {
            return Ok(Some(Role::SuperAdmin));
        }
    }

    for node in NodeType::ALL {
        let Some(Value::Object(properties)) = store.get(&store::node(node))? else {
            continue;
        };
        let found = properties
            .iter()
            .find(|(_, record)| email_of(record).is_some_and(|e| normalize(e) == wanted));
        if let Some((id, _)) = found {
            let property = PropertyRef::new(node, id.clone());
            return Ok(Some(match node {
                NodeType::Hotels => Role::HotelAdmin(property),
                NodeType::Resto => Role::RestoAdmin(property),
            }));
        }
    }
    Ok(None)
}

/// Resolves the role of the account registered under `email`.
///
/// # Errors
///
/// Returns [`Error::UnknownAccount`] if no record matches.
pub fn resolve_role<S: DocumentStore + ?Sized>(store: &S, email: &str) -> Result<Role> {
    let role = find_account(store, email)?.ok_or_else(|| Error::UnknownAccount {
        email: email.trim().to_string(),
    })?;
    log::debug!("{} resolved to {role}", email.trim());
    Ok(role)
}

/// Plans the registration of the single super-admin account.
///
/// # Errors
///
/// Returns [`Error::SuperAdminExists`] if one is registered, or
/// [`Error::Validation`] for an empty email or one owned by a property.
pub fn plan_register_super_admin<S: DocumentStore + ?Sized>(
    store: &S,
    email: &str,
    uid: Option<&str>,
) -> Result<OperationPlan> {
    if let Some(existing) = store.get(&store::super_admin())? {
        return Err(Error::SuperAdminExists {
            email: email_of(&existing).unwrap_or_default().to_string(),
        });
    }
    let email = email.trim();
    if !email.contains('@') {
        return Err(Error::Validation {
            field: "email".into(),
            message: format!("'{email}' is not an email address"),
        });
    }
    if find_account(store, email)?.is_some() {
        return Err(Error::Validation {
            field: "email".into(),
            message: "already used by a property account".into(),
        });
    }

    let uid = uid.map_or_else(|| uuid::Uuid::new_v4().simple().to_string(), str::to_string);
    Ok(OperationPlan::new("Register super-admin").add_action(PlanAction::RegisterSuperAdmin {
        email: email.to_string(),
        uid,
    }))
}

fn email_of(record: &Value) -> Option<&str> {
    record.get("email").and_then(Value::as_str)
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}
