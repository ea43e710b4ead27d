//! Typed reads of the document layout.

use serde_json::Value;

use crate::error::{Error, Result};
use crate::guest::{Guest, GuestRecord};
use crate::messaging::TemplateSet;
use crate::property::{NodeType, Property, PropertyRef};
use crate::room::RoomRange;

use super::{path, DocumentStore};

/// Loads the property record at `hotels/{id}` or `resto/{id}`.
///
/// # Errors
///
/// Returns [`Error::PropertyNotFound`] if nothing is stored there, or an
/// error if the record cannot be decoded.
pub fn load_property<S: DocumentStore + ?Sized>(
    store: &S,
    property: &PropertyRef,
) -> Result<Property> {
    let value = store
        .get(&path::property(property)?)?
        .ok_or_else(|| Error::PropertyNotFound {
            node: property.node,
            id: property.id.clone(),
        })?;
    decode_property(property, value)
}

/// Loads every property under `node`, newest first.
///
/// Records that cannot be decoded are skipped with a warning.
///
/// # Errors
///
/// Returns an error if the store read fails.
pub fn load_properties<S: DocumentStore + ?Sized>(store: &S, node: NodeType) -> Result<Vec<Property>> {
    let Some(Value::Object(map)) = store.get(&path::node(node))? else {
        return Ok(Vec::new());
    };
    let mut properties: Vec<Property> = map
        .into_iter()
        .filter_map(|(id, value)| {
            let reference = PropertyRef::new(node, id);
            match decode_property(&reference, value) {
                Ok(property) => Some(property),
                Err(e) => {
                    log::warn!("skipping unreadable property {reference}: {e}");
                    None
                }
            }
        })
        .collect();
    properties.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.uid.cmp(&b.uid)));
    Ok(properties)
}

fn decode_property(property: &PropertyRef, mut value: Value) -> Result<Property> {
    let Some(map) = value.as_object_mut() else {
        return Err(Error::Validation {
            field: "property".into(),
            message: format!("{property} is not an object"),
        });
    };
    map.entry("type")
        .or_insert_with(|| Value::String(property.kind().to_string()));
    let mut decoded: Property = serde_json::from_value(value)?;
    if decoded.uid.is_empty() {
        decoded.uid.clone_from(&property.id);
    }
    Ok(decoded)
}

/// Loads every guest of a property, newest first.
///
/// # Errors
///
/// Returns an error if the store read fails.
pub fn load_guests<S: DocumentStore + ?Sized>(store: &S, property: &PropertyRef) -> Result<Vec<Guest>> {
    Ok(store
        .get(&path::customers(property)?)?
        .map(|customers| Guest::collect(property.node, &customers))
        .unwrap_or_default())
}

/// Loads one guest.
///
/// # Errors
///
/// Returns [`Error::GuestNotFound`] if the guest does not exist, or an error
/// if the record cannot be decoded.
pub fn load_guest<S: DocumentStore + ?Sized>(
    store: &S,
    property: &PropertyRef,
    guest_id: &str,
) -> Result<Guest> {
    let value = store
        .get(&path::customer(property, guest_id)?)?
        .ok_or_else(|| Error::GuestNotFound {
            property: property.clone(),
            id: guest_id.to_string(),
        })?;
    Ok(Guest::new(guest_id, GuestRecord::decode(property.node, &value)?))
}

/// Loads the message templates of a property.
///
/// # Errors
///
/// Returns an error if the store read fails.
pub fn load_templates<S: DocumentStore + ?Sized>(store: &S, property: &PropertyRef) -> Result<TemplateSet> {
    Ok(store
        .get(&path::messages(property)?)?
        .map(|messages| TemplateSet::from_value(&messages))
        .unwrap_or_default())
}

/// Loads the room range of a hotel.
///
/// Restaurants and hotels without a stored capacity have no rooms. A
/// capacity stored as numeric text is accepted.
///
/// # Errors
///
/// Returns an error if the store read fails or the stored capacity is not
/// a non-negative integer.
pub fn load_room_range<S: DocumentStore + ?Sized>(store: &S, property: &PropertyRef) -> Result<RoomRange> {
    if property.node != NodeType::Hotels {
        return Ok(RoomRange::new(0));
    }
    let capacity = match store.get(&path::rooms(property)?)? {
        None => 0,
        Some(value) => parse_capacity(&value).ok_or_else(|| Error::Validation {
            field: "rooms".into(),
            message: format!("{property} has an invalid room capacity: {value}"),
        })?,
    };
    Ok(RoomRange::new(capacity))
}

fn parse_capacity(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) if s.trim().is_empty() => Some(0),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
