//! Guest administration: listing, filtering, editing and deleting.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::booking::is_valid_mobile;
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::guest::{derive_age, parse_date, Gender, Guest, GuestRecord};
use crate::property::PropertyRef;
use crate::store::{self, DocumentStore};

use super::plan::{OperationPlan, PlanAction};

/// Criteria for narrowing a guest list. Empty criteria match everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestFilter {
    /// Case-insensitive name substring, or mobile substring.
    pub search: Option<String>,
    /// Exact gender.
    pub gender: Option<Gender>,
    /// Arrival date.
    pub check_in_date: Option<NaiveDate>,
}

impl GuestFilter {
    /// Returns `true` if `guest` meets every criterion.
    ///
    /// # Examples
    ///
    /// ```
    /// use frontdesk::guest::{Guest, GuestProfile, GuestRecord, HotelStay};
    /// use frontdesk::operations::GuestFilter;
    ///
    /// let guest = Guest::new("g1", GuestRecord::Hotel(HotelStay {
    ///     profile: GuestProfile { name: "Asha Rao".into(), mobile: "9876543210".into(), ..Default::default() },
    ///     ..Default::default()
    /// }));
    /// let by_name = GuestFilter { search: Some("rao".into()), ..Default::default() };
    /// let by_mobile = GuestFilter { search: Some("6543".into()), ..Default::default() };
    /// assert!(by_name.matches(&guest));
    /// assert!(by_mobile.matches(&guest));
    /// ```
    #[must_use]
    pub fn matches(&self, guest: &Guest) -> bool {
        let profile = guest.record.profile();

        let search_ok = self.search.as_deref().map(str::trim).map_or(true, |term| {
            term.is_empty()
                || profile.name.to_lowercase().contains(&term.to_lowercase())
                || profile.mobile.contains(term)
        });
        let gender_ok = self.gender.map_or(true, |g| profile.gender == Some(g));
        let date_ok = self.check_in_date.map_or(true, |date| {
            guest.record.check_in_date().and_then(parse_date) == Some(date)
        });

        search_ok && gender_ok && date_ok
    }
}

/// Lists the guests of a property matching `filter`, newest first.
///
/// # Errors
///
/// Returns an error if the store read fails.
pub fn list_guests<S: DocumentStore + ?Sized>(
    store: &S,
    property: &PropertyRef,
    filter: &GuestFilter,
) -> Result<Vec<Guest>> {
    let mut guests = store::load_guests(store, property)?;
    guests.retain(|guest| filter.matches(guest));
    Ok(guests)
}

/// Field changes for an existing guest. `None` leaves a field alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GuestUpdate {
    /// New name.
    pub name: Option<String>,
    /// New mobile number.
    pub mobile: Option<String>,
    /// New gender.
    pub gender: Option<Gender>,
    /// New date of birth; the stored age follows it.
    pub dob: Option<String>,
    /// New address (hotel only).
    pub address: Option<String>,
    /// New room (hotel only).
    pub room_no: Option<String>,
    /// New check-in date (hotel only).
    pub check_in: Option<String>,
    /// New check-in time (hotel only).
    pub check_in_time: Option<String>,
    /// New check-out date (hotel only).
    pub check_out: Option<String>,
    /// New check-out time (hotel only).
    pub check_out_time: Option<String>,
}

impl GuestUpdate {
    /// Returns `true` if nothing would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn stay_fields(&self) -> [(&'static str, Option<&String>); 6] {
        [
            ("address", self.address.as_ref()),
            ("roomNo", self.room_no.as_ref()),
            ("checkIn", self.check_in.as_ref()),
            ("checkInTime", self.check_in_time.as_ref()),
            ("checkOut", self.check_out.as_ref()),
            ("checkOutTime", self.check_out_time.as_ref()),
        ]
    }
}

/// Plans an edit of a guest record.
///
/// Edits are taken as given, including ones that make a room
/// double-booked; only the shapes of the mobile number and dates are
/// checked. A blank value removes the field.
///
/// # Errors
///
/// Returns [`Error::GuestNotFound`] if the guest does not exist,
/// [`Error::WrongPropertyKind`] for stay fields on a restaurant visit, and
/// [`Error::Validation`] for a malformed mobile number or date, or an empty
/// update.
pub fn plan_edit<S: DocumentStore + ?Sized>(
    store: &S,
    property: &PropertyRef,
    guest_id: &str,
    update: &GuestUpdate,
    clock: &dyn Clock,
) -> Result<OperationPlan> {
    let guest = store::load_guest(store, property, guest_id)?;
    if update.is_empty() {
        return Err(Error::Validation {
            field: "update".into(),
            message: "nothing to change".into(),
        });
    }

    let mut patch = Map::new();
    if let Some(name) = &update.name {
        patch.insert("name".into(), text(name));
    }
    if let Some(mobile) = &update.mobile {
        if !is_valid_mobile(mobile) {
            return Err(Error::Validation {
                field: "mobile".into(),
                message: "Enter a valid 10-digit mobile number.".into(),
            });
        }
        patch.insert("mobile".into(), json!(mobile.trim()));
    }
    if let Some(gender) = update.gender {
        patch.insert("gender".into(), json!(gender.to_string()));
    }
    if let Some(dob) = &update.dob {
        let age = if dob.trim().is_empty() {
            Value::Null
        } else {
            let date = parse_date(dob).ok_or_else(|| bad_date("dob", dob))?;
            derive_age(date, clock.today()).map_or(Value::Null, |age| json!(age))
        };
        patch.insert("dob".into(), text(dob));
        patch.insert("age".into(), age);
    }

    let stay_changes: Vec<(&str, &String)> = update
        .stay_fields()
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect();
    if !stay_changes.is_empty() && !matches!(guest.record, GuestRecord::Hotel(_)) {
        return Err(Error::WrongPropertyKind {
            operation: "editing stay fields".into(),
            expected: crate::property::PropertyKind::Hotel,
        });
    }
    for (field, value) in stay_changes {
        if matches!(field, "checkIn" | "checkOut") && !value.trim().is_empty() && parse_date(value).is_none() {
            return Err(bad_date(field, value));
        }
        patch.insert(field.into(), text(value));
    }

    let mut plan = OperationPlan::new(format!(
        "Edit guest {} at {property}",
        guest.record.profile().name
    ));
    if let GuestRecord::Hotel(stay) = &guest.record {
        let completes_checkout = !stay.has_checkout_info()
            && (update.check_out.is_some() || update.check_out_time.is_some());
        if completes_checkout && !stay.message_sent {
            plan = plan.add_warning("messages start once a running session sees the check-out");
        }
    }

    Ok(plan.add_action(PlanAction::UpdateGuest {
        property: property.clone(),
        id: guest_id.to_string(),
        patch,
    }))
}

/// Plans the deletion of a guest record.
///
/// # Errors
///
/// Returns [`Error::GuestNotFound`] if the guest does not exist.
pub fn plan_delete<S: DocumentStore + ?Sized>(
    store: &S,
    property: &PropertyRef,
    guest_id: &str,
) -> Result<OperationPlan> {
    let guest = store::load_guest(store, property, guest_id)?;
    Ok(
        OperationPlan::new(format!("Delete guest {} at {property}", guest.record.profile().name))
            .add_action(PlanAction::DeleteGuest {
                property: property.clone(),
                id: guest_id.to_string(),
            }),
    )
}

/// Dashboard counters of a restaurant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoStats {
    /// Every stored visit.
    pub total_customers: usize,
    /// Visits created in the last 24 hours.
    pub active_customers: usize,
    /// Stored message templates.
    pub total_messages: usize,
}

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Computes the dashboard counters of a restaurant.
///
/// # Errors
///
/// Returns [`Error::WrongPropertyKind`] for hotels, or a store error.
pub fn resto_stats<S: DocumentStore + ?Sized>(
    store: &S,
    property: &PropertyRef,
    clock: &dyn Clock,
) -> Result<RestoStats> {
    if property.kind() != crate::property::PropertyKind::Resto {
        return Err(Error::WrongPropertyKind {
            operation: "restaurant statistics".into(),
            expected: crate::property::PropertyKind::Resto,
        });
    }
    let guests = store::load_guests(store, property)?;
    let since = clock.epoch_millis() - DAY_MILLIS;
    Ok(RestoStats {
        total_customers: guests.len(),
        active_customers: guests
            .iter()
            .filter(|g| g.record.created_at() > since)
            .count(),
        total_messages: store::load_templates(store, property)?.len(),
    })
}

fn text(value: &str) -> Value {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Value::Null
    } else {
        json!(trimmed)
    }
}

fn bad_date(field: &str, value: &str) -> Error {
    Error::Validation {
        field: field.into(),
        message: format!("expected a YYYY-MM-DD date, got '{value}'"),
    }
}
