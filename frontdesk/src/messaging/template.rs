//! Message templates and placeholder substitution.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::guest::{GuestProfile, HotelStay};
use crate::property::PropertyKind;

/// Name used for `{restoName}` when the restaurant has no name on record.
pub const FALLBACK_RESTO_NAME: &str = "our restaurant";

const CUSTOM_PREFIX: &str = "custom_";

/// Key of a template inside a property's `messages` collection.
///
/// Keys order as `checkin`, `checkout`, then custom templates by their
/// numeric suffix.
///
/// # Examples
///
/// ```
/// use frontdesk::messaging::TemplateKey;
///
/// let key: TemplateKey = "custom_1700000000000".parse().unwrap();
/// assert_eq!(key, TemplateKey::Custom(1_700_000_000_000));
/// assert!(TemplateKey::CheckOut < key);
/// assert!("welcome".parse::<TemplateKey>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TemplateKey {
    /// `checkin`
    CheckIn,
    /// `checkout`
    CheckOut,
    /// `custom_<n>`
    Custom(u64),
}

impl TemplateKey {
    /// Returns `true` for `custom_<n>` keys.
    #[must_use]
    pub const fn is_custom(self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Display for TemplateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CheckIn => f.write_str("checkin"),
            Self::CheckOut => f.write_str("checkout"),
            Self::Custom(n) => write!(f, "{CUSTOM_PREFIX}{n}"),
        }
    }
}

impl FromStr for TemplateKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "checkin" => Ok(Self::CheckIn),
            "checkout" => Ok(Self::CheckOut),
            other => other
                .strip_prefix(CUSTOM_PREFIX)
                .filter(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|n| n.parse().ok())
                .map(Self::Custom)
                .ok_or_else(|| Error::InvalidTemplateKey {
                    key: s.to_string(),
                }),
        }
    }
}

/// The templates of one property, keyed and ordered by [`TemplateKey`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TemplateSet {
    templates: BTreeMap<TemplateKey, String>,
}

impl TemplateSet {
    /// An empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The two templates every new property starts with.
    #[must_use]
    pub fn defaults(kind: PropertyKind) -> Self {
        let (checkin, checkout) = match kind {
            PropertyKind::Hotel => (
                "Hi {name}, welcome to {hotelName}! Your room number is {roomNo}. Enjoy your stay! Check-in: {checkInTime}",
                "Hi {name}, your checkout time is in 10 minutes ({checkOutTime}). Please contact reception if needed.",
            ),
            PropertyKind::Resto => (
                "Hi {name}, welcome to {restoName}!",
                "Hi {name}, your checkout is in 10 minutes.",
            ),
        };
        let mut set = Self::new();
        set.insert(TemplateKey::CheckIn, checkin);
        set.insert(TemplateKey::CheckOut, checkout);
        set
    }

    /// The text a new custom template starts with.
    #[must_use]
    pub const fn default_custom(kind: PropertyKind) -> &'static str {
        match kind {
            PropertyKind::Hotel => "Dear {name}, this is a custom message from {hotelName}.",
            PropertyKind::Resto => "Hello {name}, this is a custom message!",
        }
    }

    /// Decodes a stored `messages` collection.
    ///
    /// Unknown keys and non-string values are skipped with a warning.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let mut set = Self::new();
        let Some(map) = value.as_object() else {
            return set;
        };
        for (key, text) in map {
            match (key.parse::<TemplateKey>(), text.as_str()) {
                (Ok(key), Some(text)) => set.insert(key, text),
                _ => log::warn!("ignoring message template '{key}'"),
            }
        }
        set
    }

    /// Encodes the set for storage.
    #[must_use]
    pub fn to_value(&self) -> Value {
        let map: Map<String, Value> = self
            .templates
            .iter()
            .map(|(key, text)| (key.to_string(), Value::String(text.clone())))
            .collect();
        Value::Object(map)
    }

    /// The template stored under `key`.
    #[must_use]
    pub fn get(&self, key: TemplateKey) -> Option<&str> {
        self.templates.get(&key).map(String::as_str)
    }

    /// Returns `true` if a template is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: TemplateKey) -> bool {
        self.templates.contains_key(&key)
    }

    /// Stores `text` under `key`, replacing any previous template.
    pub fn insert(&mut self, key: TemplateKey, text: impl Into<String>) {
        self.templates.insert(key, text.into());
    }

    /// Removes the template under `key`.
    pub fn remove(&mut self, key: TemplateKey) -> Option<String> {
        self.templates.remove(&key)
    }

    /// Custom templates in firing order.
    pub fn customs(&self) -> impl Iterator<Item = (TemplateKey, &str)> {
        self.templates
            .iter()
            .filter(|(key, _)| key.is_custom())
            .map(|(key, text)| (*key, text.as_str()))
    }

    /// Every template in key order.
    pub fn iter(&self) -> impl Iterator<Item = (TemplateKey, &str)> {
        self.templates.iter().map(|(key, text)| (*key, text.as_str()))
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Returns `true` if there are no templates.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

static LAST_CUSTOM: AtomicU64 = AtomicU64::new(0);

/// Allocates the key for a new custom template created at `millis`.
///
/// Keys are strictly increasing within the process and never collide with
/// a key already in `existing`, even when two are created in the same
/// millisecond.
#[must_use]
pub fn next_custom_key(existing: &TemplateSet, millis: i64) -> TemplateKey {
    let mut candidate = u64::try_from(millis).unwrap_or_default();
    loop {
        let last = LAST_CUSTOM.load(Ordering::SeqCst);
        let mut n = candidate.max(last.saturating_add(1));
        while existing.contains(TemplateKey::Custom(n)) {
            n += 1;
        }
        if LAST_CUSTOM
            .compare_exchange(last, n, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            return TemplateKey::Custom(n);
        }
        candidate = n;
    }
}

/// Values substituted into a template.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TemplateContext {
    /// `{name}`
    pub name: Option<String>,
    /// `{hotelName}`
    pub hotel_name: Option<String>,
    /// `{restoName}`
    pub resto_name: Option<String>,
    /// `{roomNo}`
    pub room_no: Option<String>,
    /// `{checkInTime}`
    pub check_in_time: Option<String>,
    /// `{checkOutTime}`
    pub check_out_time: Option<String>,
}

impl TemplateContext {
    /// Context for a hotel stay at the hotel named `hotel_name`.
    #[must_use]
    pub fn for_hotel_stay(stay: &HotelStay, hotel_name: &str) -> Self {
        Self {
            name: Some(stay.profile.name.clone()),
            hotel_name: Some(hotel_name.to_string()),
            room_no: stay.room_no.clone(),
            check_in_time: stay.check_in_time.clone(),
            check_out_time: stay.check_out_time.clone(),
            ..Self::default()
        }
    }

    /// Context for a restaurant visit.
    ///
    /// A blank restaurant name renders as [`FALLBACK_RESTO_NAME`].
    #[must_use]
    pub fn for_restaurant(profile: &GuestProfile, resto_name: &str) -> Self {
        let resto_name = if resto_name.trim().is_empty() {
            FALLBACK_RESTO_NAME
        } else {
            resto_name
        };
        Self {
            name: Some(profile.name.clone()),
            resto_name: Some(resto_name.to_string()),
            ..Self::default()
        }
    }

    /// Sets `{name}`.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets `{roomNo}`.
    #[must_use]
    pub fn with_room_no(mut self, room_no: impl Into<String>) -> Self {
        self.room_no = Some(room_no.into());
        self
    }

    /// Sets `{hotelName}`.
    #[must_use]
    pub fn with_hotel_name(mut self, hotel_name: impl Into<String>) -> Self {
        self.hotel_name = Some(hotel_name.into());
        self
    }

    fn lookup(&self, placeholder: &str) -> Option<&str> {
        let value = match placeholder {
            "name" => &self.name,
            "hotelName" => &self.hotel_name,
            "restoName" => &self.resto_name,
            "roomNo" => &self.room_no,
            "checkInTime" => &self.check_in_time,
            "checkOutTime" => &self.check_out_time,
            _ => return None,
        };
        value.as_deref()
    }
}

/// Substitutes placeholders in one left-to-right pass.
///
/// Only the first occurrence of each known placeholder with a value is
/// replaced; later repeats stay verbatim. Unknown placeholders and
/// placeholders without a value are kept as written, and substituted text
/// is never scanned again.
///
/// # Examples
///
/// ```
/// use frontdesk::messaging::{render, TemplateContext};
///
/// let ctx = TemplateContext::default().with_name("Asha").with_room_no("101");
/// assert_eq!(render("Hi {name}, room {roomNo}", &ctx), "Hi Asha, room 101");
/// assert_eq!(render("Welcome to {hotelName}", &ctx), "Welcome to {hotelName}");
/// assert_eq!(render("Hi {name}, bye {name}", &ctx), "Hi Asha, bye {name}");
/// ```
#[must_use]
pub fn render(template: &str, ctx: &TemplateContext) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut substituted: Vec<&str> = Vec::new();
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(['{', '}']) {
            Some(close) if after.as_bytes()[close] == b'}' => {
                let placeholder = &after[..close];
                let value = ctx
                    .lookup(placeholder)
                    .filter(|_| !substituted.contains(&placeholder));
                match value {
                    Some(value) => {
                        out.push_str(value);
                        substituted.push(placeholder);
                    }
                    None => {
                        out.push('{');
                        out.push_str(placeholder);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
