//! Registration forms and booking validation.
//!
//! A registration goes through two gates. Field validation collects every
//! problem with the form into a [`ValidationErrors`] map keyed by the
//! stored field name. For desk registrations the chosen room is then
//! checked against the current occupancy. Only a form that passes both is
//! turned into a [`GuestRecord`] ready to be written.

use std::fmt;
use std::sync::OnceLock;

use chrono::NaiveDateTime;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::guest::{
    derive_age, parse_date, Gender, GuestProfile, GuestRecord, HotelStay, RestaurantStay,
    DATE_FORMAT,
};
use crate::occupancy::OccupancySnapshot;
use crate::room::RoomNumber;

#[cfg(test)]
mod proptests;

/// Indian mobile numbers: ten digits starting with 6, 7, 8 or 9.
const MOBILE_PATTERN: &str = r"^[6-9][0-9]{9}$";

/// Returns `true` if `mobile` is a valid ten-digit mobile number.
///
/// # Examples
///
/// ```
/// use frontdesk::booking::is_valid_mobile;
///
/// assert!(is_valid_mobile("9876543210"));
/// assert!(!is_valid_mobile("1234567890"));
/// assert!(!is_valid_mobile("987654321"));
/// assert!(!is_valid_mobile("98765432100"));
/// ```
#[must_use]
pub fn is_valid_mobile(mobile: &str) -> bool {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(MOBILE_PATTERN).ok())
        .as_ref()
        .is_some_and(|re| re.is_match(mobile))
}

/// Which registration flow a form belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationMode {
    /// The hotel desk: full stay details and a room.
    #[default]
    AdminEntry,
    /// A guest scanning the hotel's QR code: profile only, no room.
    SelfService,
    /// A restaurant visit.
    Restaurant,
}

/// Raw registration input, as typed into a form.
///
/// Every field is free text; blank means missing.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RegistrationForm {
    /// Full name.
    pub name: String,
    /// Mobile number.
    pub mobile: String,
    /// `Male`, `Female` or `Other`.
    pub gender: String,
    /// Date of birth, `YYYY-MM-DD`.
    pub dob: String,
    /// Postal address.
    pub address: String,
    /// Room number.
    pub room_no: String,
    /// Check-in date.
    pub check_in: String,
    /// Check-in time, `HH:MM`.
    pub check_in_time: String,
    /// Check-out date.
    pub check_out: String,
    /// Check-out time, `HH:MM`.
    pub check_out_time: String,
}

impl RegistrationForm {
    /// A blank form with check-in set to `now`.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use frontdesk::booking::RegistrationForm;
    ///
    /// let now = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap().and_hms_opt(8, 5, 42).unwrap();
    /// let form = RegistrationForm::prefilled(now);
    /// assert_eq!(form.check_in, "2024-03-09");
    /// assert_eq!(form.check_in_time, "08:05");
    /// ```
    #[must_use]
    pub fn prefilled(now: NaiveDateTime) -> Self {
        Self {
            check_in: now.format(DATE_FORMAT).to_string(),
            check_in_time: now.format("%H:%M").to_string(),
            ..Self::default()
        }
    }
}

/// Field-keyed validation messages, in the order the fields were checked.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    entries: Vec<(String, String)>,
}

impl ValidationErrors {
    /// Records `message` for `field`, replacing an earlier message.
    pub fn insert(&mut self, field: &str, message: &str) {
        match self.entries.iter_mut().find(|(f, _)| f == field) {
            Some(entry) => entry.1 = message.to_string(),
            None => self.entries.push((field.to_string(), message.to_string())),
        }
    }

    /// The message for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, m)| m.as_str())
    }

    /// Returns `true` if no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// The failing fields and their messages.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(f, m)| (f.as_str(), m.as_str()))
    }

    /// Converts a non-empty map into [`Error::InvalidForm`].
    ///
    /// # Errors
    ///
    /// Returns the map as an error if any field failed.
    pub fn into_result(self) -> Result<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidForm(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, message)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (field, message) in &self.entries {
            map.serialize_entry(field, message)?;
        }
        map.end()
    }
}

/// Checks the fields of `form` for `mode`.
///
/// Every flow requires a name, a valid mobile number, a gender and a date
/// of birth. Desk registrations also require the address, the room and all
/// four stay fields, with the check-out date no earlier than the check-in
/// date.
#[must_use]
pub fn validate_fields(form: &RegistrationForm, mode: RegistrationMode) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if is_blank(&form.name) {
        errors.insert("name", "Name is required.");
    }
    if is_blank(&form.mobile) {
        errors.insert("mobile", "Mobile number is required.");
    } else if !is_valid_mobile(&form.mobile) {
        errors.insert("mobile", "Enter a valid 10-digit mobile number.");
    }
    if form.gender.parse::<Gender>().is_err() {
        errors.insert("gender", "Select gender.");
    }
    if is_blank(&form.dob) {
        errors.insert("dob", "Select date of birth.");
    }

    if mode == RegistrationMode::AdminEntry {
        if is_blank(&form.address) {
            errors.insert("address", "Address is required.");
        }
        if is_blank(&form.room_no) {
            errors.insert("roomNo", "Room number is required.");
        }
        if is_blank(&form.check_in) {
            errors.insert("checkIn", "Select check-in date.");
        }
        if is_blank(&form.check_in_time) {
            errors.insert("checkInTime", "Select check-in time.");
        }
        if is_blank(&form.check_out) {
            errors.insert("checkOut", "Select check-out date.");
        }
        if is_blank(&form.check_out_time) {
            errors.insert("checkOutTime", "Select check-out time.");
        }
        if let (Some(check_in), Some(check_out)) = (parse_date(&form.check_in), parse_date(&form.check_out)) {
            if check_out < check_in {
                errors.insert("checkOut", "Check-out must be after check-in.");
            }
        }
    }

    errors
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Accepts or rejects registrations of one flow.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use frontdesk::booking::{BookingValidator, RegistrationForm, RegistrationMode};
/// use frontdesk::clock::ManualClock;
/// use frontdesk::occupancy::OccupancySnapshot;
/// use frontdesk::{RoomNumber, RoomRange};
///
/// let now = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// let clock = ManualClock::new(now);
/// let occupancy = OccupancySnapshot {
///     at: now,
///     rooms: RoomRange::new(3),
///     occupied: [RoomNumber::new(101)].into_iter().collect(),
/// };
///
/// let mut form = RegistrationForm::prefilled(now);
/// form.name = "Ravi".into();
/// form.mobile = "9123456780".into();
/// form.gender = "Male".into();
/// form.dob = "1990-05-01".into();
/// form.address = "12 MG Road".into();
/// form.check_out = "2024-01-03".into();
/// form.check_out_time = "11:00".into();
///
/// let validator = BookingValidator::new(RegistrationMode::AdminEntry);
/// form.room_no = "101".into();
/// assert!(validator.accept(&form, Some(&occupancy), &clock).unwrap_err().is_conflict());
/// form.room_no = "102".into();
/// assert!(validator.accept(&form, Some(&occupancy), &clock).is_ok());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct BookingValidator {
    mode: RegistrationMode,
}

impl BookingValidator {
    /// A validator for `mode`.
    #[must_use]
    pub const fn new(mode: RegistrationMode) -> Self {
        Self { mode }
    }

    /// The flow this validator checks.
    #[must_use]
    pub const fn mode(&self) -> RegistrationMode {
        self.mode
    }

    /// Checks the room of a desk registration against `occupancy`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRoom`] if the room does not parse or is not
    /// one of the hotel's rooms, and [`Error::RoomOccupied`] if it is in the
    /// occupied set.
    pub fn check_room(&self, room_no: &str, occupancy: &OccupancySnapshot) -> Result<RoomNumber> {
        let room: RoomNumber = room_no.parse()?;
        if !occupancy.rooms.contains(room) {
            return Err(Error::InvalidRoom {
                value: room_no.to_string(),
                reason: format!("not one of the hotel's rooms ({})", occupancy.rooms),
            });
        }
        if occupancy.is_occupied(room) {
            return Err(Error::RoomOccupied { room });
        }
        Ok(room)
    }

    /// Validates `form` and builds the record to store.
    ///
    /// Desk registrations need `occupancy`; the other flows ignore it. The
    /// record is stamped with the clock's time, `messageSent` is false, and
    /// the age is derived from the date of birth.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidForm`] listing every failing field, or a room
    /// error from [`BookingValidator::check_room`]. A desk registration
    /// without an occupancy snapshot is rejected as a validation error.
    pub fn accept(
        &self,
        form: &RegistrationForm,
        occupancy: Option<&OccupancySnapshot>,
        clock: &dyn Clock,
    ) -> Result<GuestRecord> {
        validate_fields(form, self.mode).into_result()?;

        let created_at = clock.epoch_millis();
        let today = clock.today();
        let profile = GuestProfile {
            name: form.name.trim().to_string(),
            mobile: form.mobile.trim().to_string(),
            gender: form.gender.parse().ok(),
            dob: non_blank(&form.dob),
            age: parse_date(&form.dob).and_then(|dob| derive_age(dob, today)),
        };

        Ok(match self.mode {
            RegistrationMode::AdminEntry => {
                let occupancy = occupancy.ok_or_else(|| Error::Validation {
                    field: "roomNo".into(),
                    message: "room availability is unknown".into(),
                })?;
                let room = self.check_room(&form.room_no, occupancy)?;
                GuestRecord::Hotel(HotelStay {
                    profile,
                    address: non_blank(&form.address),
                    room_no: Some(room.to_string()),
                    check_in: non_blank(&form.check_in),
                    check_in_time: non_blank(&form.check_in_time),
                    check_out: non_blank(&form.check_out),
                    check_out_time: non_blank(&form.check_out_time),
                    created_at,
                    message_sent: false,
                    status: None,
                })
            }
            RegistrationMode::SelfService => GuestRecord::Hotel(HotelStay {
                profile,
                address: non_blank(&form.address),
                check_in: non_blank(&form.check_in),
                check_in_time: non_blank(&form.check_in_time),
                check_out: non_blank(&form.check_out),
                check_out_time: non_blank(&form.check_out_time),
                created_at,
                ..HotelStay::default()
            }),
            RegistrationMode::Restaurant => GuestRecord::Restaurant(RestaurantStay {
                profile,
                check_in_date: Some(today.format(DATE_FORMAT).to_string()),
                created_at,
                uid: created_at.to_string(),
            }),
        })
    }
}
