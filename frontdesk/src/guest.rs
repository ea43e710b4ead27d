//! Guest records.
//!
//! A guest record is one stay (hotel) or one visit (restaurant). Both share a
//! [`GuestProfile`]; the hotel variant adds the room and the stay interval
//! fields, the restaurant variant adds the visit date.
//!
//! Records are written by several clients over time, so decoding is lenient:
//! empty strings read as missing values, numbers are accepted where text is
//! expected, and unknown fields are ignored.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::property::NodeType;
use crate::room::RoomNumber;
use crate::stay::{to_instant, Bound, StayInterval};

/// Date format of every stored date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Guest gender as offered by the registration forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// "Male"
    Male,
    /// "Female"
    Female,
    /// "Other"
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        })
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            "other" => Ok(Self::Other),
            _ => Err(Error::Validation {
                field: "gender".into(),
                message: format!("unknown gender '{s}'"),
            }),
        }
    }
}

/// Lifecycle status persisted on hotel stays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuestStatus {
    /// The stay has not been observed past its checkout instant.
    #[serde(rename = "active")]
    Active,
    /// A sweep observed `now` past the checkout instant.
    #[serde(rename = "checkedout")]
    CheckedOut,
}

impl GuestStatus {
    /// The stored string form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::CheckedOut => "checkedout",
        }
    }
}

impl fmt::Display for GuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GuestStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "active" => Ok(Self::Active),
            "checkedout" => Ok(Self::CheckedOut),
            other => Err(Error::Validation {
                field: "status".into(),
                message: format!("unknown status '{other}'"),
            }),
        }
    }
}

/// Fields shared by hotel and restaurant guests.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GuestProfile {
    /// Full name.
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    /// Ten-digit mobile number.
    #[serde(default, deserialize_with = "lenient::string")]
    pub mobile: String,
    /// Gender, if given.
    #[serde(
        default,
        deserialize_with = "lenient::parsed",
        skip_serializing_if = "Option::is_none"
    )]
    pub gender: Option<Gender>,
    /// Date of birth as `YYYY-MM-DD`.
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub dob: Option<String>,
    /// Age derived from `dob` when the record was written.
    #[serde(
        default,
        deserialize_with = "lenient::parsed",
        skip_serializing_if = "Option::is_none"
    )]
    pub age: Option<u32>,
}

impl GuestProfile {
    /// Parsed date of birth.
    #[must_use]
    pub fn birth_date(&self) -> Option<NaiveDate> {
        self.dob.as_deref().and_then(parse_date)
    }

    /// Age on `today`, derived from the date of birth.
    #[must_use]
    pub fn age_on(&self, today: NaiveDate) -> Option<u32> {
        self.birth_date().and_then(|dob| derive_age(dob, today))
    }
}

/// A hotel stay stored at `hotels/{id}/customers/{guestId}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HotelStay {
    /// Shared guest fields.
    #[serde(flatten)]
    pub profile: GuestProfile,
    /// Postal address (required for desk registrations).
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub address: Option<String>,
    /// Assigned room, as entered.
    #[serde(
        rename = "roomNo",
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub room_no: Option<String>,
    /// Check-in date.
    #[serde(
        rename = "checkIn",
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub check_in: Option<String>,
    /// Check-in time.
    #[serde(
        rename = "checkInTime",
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub check_in_time: Option<String>,
    /// Check-out date.
    #[serde(
        rename = "checkOut",
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub check_out: Option<String>,
    /// Check-out time.
    #[serde(
        rename = "checkOutTime",
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub check_out_time: Option<String>,
    /// Creation time in epoch milliseconds.
    #[serde(rename = "createdAt", default, deserialize_with = "lenient::millis")]
    pub created_at: i64,
    /// Whether the check-in message has been scheduled.
    #[serde(rename = "messageSent", default, deserialize_with = "lenient::flag")]
    pub message_sent: bool,
    /// Persisted lifecycle status.
    #[serde(
        default,
        deserialize_with = "lenient::parsed",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<GuestStatus>,
}

impl HotelStay {
    /// The occupancy window of this stay.
    #[must_use]
    pub fn interval(&self) -> StayInterval {
        StayInterval::from_fields(
            self.check_in.as_deref(),
            self.check_in_time.as_deref(),
            self.check_out.as_deref(),
            self.check_out_time.as_deref(),
        )
    }

    /// The assigned room in canonical form, if it parses.
    #[must_use]
    pub fn room(&self) -> Option<RoomNumber> {
        self.room_no.as_deref().and_then(|r| r.parse().ok())
    }

    /// Returns `true` once both check-out fields are filled in.
    #[must_use]
    pub const fn has_checkout_info(&self) -> bool {
        self.check_out.is_some() && self.check_out_time.is_some()
    }

    /// The check-out instant, when both check-out fields are present and parse.
    #[must_use]
    pub fn checkout_instant(&self) -> Option<NaiveDateTime> {
        if !self.has_checkout_info() {
            return None;
        }
        to_instant(
            self.check_out.as_deref(),
            self.check_out_time.as_deref(),
            Bound::End,
        )
    }

    /// The persisted status, reading a missing status as active.
    #[must_use]
    pub fn status(&self) -> GuestStatus {
        self.status.unwrap_or(GuestStatus::Active)
    }
}

/// A restaurant visit stored at `resto/{id}/customers/{guestId}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RestaurantStay {
    /// Shared guest fields.
    #[serde(flatten)]
    pub profile: GuestProfile,
    /// Visit date.
    #[serde(
        rename = "checkInDate",
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub check_in_date: Option<String>,
    /// Creation time in epoch milliseconds.
    #[serde(rename = "createdAt", default, deserialize_with = "lenient::millis")]
    pub created_at: i64,
    /// The record key, duplicated inside the record.
    #[serde(default, deserialize_with = "lenient::string")]
    pub uid: String,
}

/// A stored guest record of either flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuestRecord {
    /// A hotel stay.
    Hotel(HotelStay),
    /// A restaurant visit.
    Restaurant(RestaurantStay),
}

impl GuestRecord {
    /// Decodes a record stored under `node`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is not an object.
    pub fn decode(node: NodeType, value: &Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::Validation {
                field: "customer".into(),
                message: format!("expected an object, found {value}"),
            });
        }
        Ok(match node {
            NodeType::Hotels => Self::Hotel(HotelStay::deserialize(value)?),
            NodeType::Resto => Self::Restaurant(RestaurantStay::deserialize(value)?),
        })
    }

    /// Encodes the record for storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn encode(&self) -> Result<Value> {
        Ok(match self {
            Self::Hotel(stay) => serde_json::to_value(stay)?,
            Self::Restaurant(visit) => serde_json::to_value(visit)?,
        })
    }

    /// The shared guest fields.
    #[must_use]
    pub const fn profile(&self) -> &GuestProfile {
        match self {
            Self::Hotel(stay) => &stay.profile,
            Self::Restaurant(visit) => &visit.profile,
        }
    }

    /// Mutable access to the shared guest fields.
    pub fn profile_mut(&mut self) -> &mut GuestProfile {
        match self {
            Self::Hotel(stay) => &mut stay.profile,
            Self::Restaurant(visit) => &mut visit.profile,
        }
    }

    /// Creation time in epoch milliseconds.
    #[must_use]
    pub const fn created_at(&self) -> i64 {
        match self {
            Self::Hotel(stay) => stay.created_at,
            Self::Restaurant(visit) => visit.created_at,
        }
    }

    /// The date the guest arrived.
    #[must_use]
    pub fn check_in_date(&self) -> Option<&str> {
        match self {
            Self::Hotel(stay) => stay.check_in.as_deref(),
            Self::Restaurant(visit) => visit.check_in_date.as_deref(),
        }
    }

    /// The hotel stay, if this is one.
    #[must_use]
    pub const fn as_hotel(&self) -> Option<&HotelStay> {
        match self {
            Self::Hotel(stay) => Some(stay),
            Self::Restaurant(_) => None,
        }
    }
}

/// A guest record together with its store key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guest {
    /// The store-assigned identifier.
    pub id: String,
    /// The stored record.
    pub record: GuestRecord,
}

impl Guest {
    /// Pairs a record with its key.
    #[must_use]
    pub fn new(id: impl Into<String>, record: GuestRecord) -> Self {
        Self {
            id: id.into(),
            record,
        }
    }

    /// Decodes every record of a `customers` collection.
    ///
    /// Entries that are not objects are skipped with a warning. The result is
    /// ordered newest first, the order every listing uses.
    #[must_use]
    pub fn collect(node: NodeType, customers: &Value) -> Vec<Self> {
        let Some(map) = customers.as_object() else {
            return Vec::new();
        };
        let mut guests: Vec<Self> = map
            .iter()
            .filter_map(|(id, value)| match GuestRecord::decode(node, value) {
                Ok(record) => Some(Self::new(id.clone(), record)),
                Err(e) => {
                    log::warn!("skipping unreadable guest record {node}/{id}: {e}");
                    None
                }
            })
            .collect();
        guests.sort_by(|a, b| {
            b.record
                .created_at()
                .cmp(&a.record.created_at())
                .then_with(|| a.id.cmp(&b.id))
        });
        guests
    }

    /// The hotel stay, if this guest is a hotel guest.
    #[must_use]
    pub const fn hotel(&self) -> Option<&HotelStay> {
        self.record.as_hotel()
    }
}

/// Parses a stored `YYYY-MM-DD` date.
#[must_use]
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok()
}

/// Whole years between `dob` and `today`.
///
/// The year difference is reduced by one when today's month and day precede
/// the birthday. Negative results (a birth date in the future) yield `None`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use frontdesk::guest::derive_age;
///
/// let dob = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
/// let day_before = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
/// let birthday = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
/// assert_eq!(derive_age(dob, day_before), Some(23));
/// assert_eq!(derive_age(dob, birthday), Some(24));
/// ```
#[must_use]
pub fn derive_age(dob: NaiveDate, today: NaiveDate) -> Option<u32> {
    let mut years = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    u32::try_from(years).ok()
}

/// Deserializers tolerant of the loosely typed values other clients store.
mod lenient {
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn text(value: Option<Value>) -> Option<String> {
        match value? {
            Value::String(s) if s.trim().is_empty() => None,
            Value::String(s) => Some(s),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(text(Option::<Value>::deserialize(deserializer)?))
    }

    pub fn string<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(opt_string(deserializer)?.unwrap_or_default())
    }

    pub fn parsed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: FromStr,
    {
        Ok(opt_string(deserializer)?.and_then(|s| s.trim().parse().ok()))
    }

    pub fn millis<'de, D>(deserializer: D) -> Result<i64, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Number(n)) => n
                .as_i64()
                .or_else(|| n.as_f64().map(|f| f as i64))
                .unwrap_or_default(),
            Some(Value::String(s)) => s.trim().parse().unwrap_or_default(),
            _ => 0,
        })
    }

    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Bool(b)) => b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("true"),
            Some(Value::Number(n)) => n.as_i64().is_some_and(|n| n != 0),
            _ => false,
        })
    }
}
