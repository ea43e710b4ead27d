//! Stay intervals.
//!
//! A guest's occupancy window is derived from four free-text fields: the
//! check-in date and time and the check-out date and time. Any of them may
//! be missing, so each bound is optional and [`StayInterval::overlaps_now`]
//! applies a fixed policy for the missing cases.

use chrono::NaiveDateTime;

#[cfg(test)]
mod proptests;

/// Which end of an interval an instant is being built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The check-in side. A missing time means the start of the day.
    Start,
    /// The check-out side. A missing time means the end of the day.
    End,
}

impl Bound {
    /// The time used when the time field is missing.
    #[must_use]
    pub const fn default_time(self) -> &'static str {
        match self {
            Self::Start => "00:00:00",
            Self::End => "23:59:59",
        }
    }
}

const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Composes a date and an optional time into a local instant.
///
/// Returns `None` when the date is missing or when the composed timestamp
/// does not parse. Minute-precision times (`HH:MM`) are accepted and read
/// as `HH:MM:00`.
///
/// # Examples
///
/// ```
/// use frontdesk::stay::{to_instant, Bound};
///
/// let start = to_instant(Some("2024-01-01"), None, Bound::Start).unwrap();
/// assert_eq!(start.to_string(), "2024-01-01 00:00:00");
///
/// let end = to_instant(Some("2024-01-02"), Some("10:00"), Bound::End).unwrap();
/// assert_eq!(end.to_string(), "2024-01-02 10:00:00");
///
/// assert!(to_instant(None, Some("10:00"), Bound::Start).is_none());
/// assert!(to_instant(Some("2024-02-30"), None, Bound::Start).is_none());
/// ```
#[must_use]
pub fn to_instant(date: Option<&str>, time: Option<&str>, bound: Bound) -> Option<NaiveDateTime> {
    let date = date.map(str::trim).filter(|d| !d.is_empty())?;
    let time = time
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| bound.default_time());

    let composed = if time.len() == 5 {
        format!("{date}T{time}:00")
    } else {
        format!("{date}T{time}")
    };
    NaiveDateTime::parse_from_str(&composed, INSTANT_FORMAT).ok()
}

/// A guest's occupancy window. Either bound may be unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StayInterval {
    /// Check-in instant, if it could be derived.
    pub start: Option<NaiveDateTime>,
    /// Check-out instant, if it could be derived.
    pub end: Option<NaiveDateTime>,
}

impl StayInterval {
    /// Creates an interval from already-derived bounds.
    #[must_use]
    pub const fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }

    /// Derives an interval from the four stored stay fields.
    #[must_use]
    pub fn from_fields(
        check_in: Option<&str>,
        check_in_time: Option<&str>,
        check_out: Option<&str>,
        check_out_time: Option<&str>,
    ) -> Self {
        Self {
            start: to_instant(check_in, check_in_time, Bound::Start),
            end: to_instant(check_out, check_out_time, Bound::End),
        }
    }

    /// Returns `true` if the stay occupies its room at `now`.
    ///
    /// - both bounds: `start <= now <= end`
    /// - end only: `now <= end`
    /// - start only: `now >= start`
    /// - neither: always occupying
    ///
    /// # Examples
    ///
    /// ```
    /// use frontdesk::stay::StayInterval;
    /// use chrono::NaiveDate;
    ///
    /// let stay = StayInterval::from_fields(
    ///     Some("2024-01-01"), Some("10:00"), Some("2024-01-02"), Some("10:00"),
    /// );
    /// let noon = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
    /// assert!(stay.overlaps_now(noon));
    /// ```
    #[must_use]
    pub fn overlaps_now(&self, now: NaiveDateTime) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start <= now && now <= end,
            (None, Some(end)) => now <= end,
            (Some(start), None) => now >= start,
            (None, None) => true,
        }
    }

    /// Returns `true` when neither bound could be derived.
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}
