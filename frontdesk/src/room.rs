//! Room identifiers and the room range of a hotel.
//!
//! Rooms are never stored individually. A hotel stores only its capacity,
//! and the rooms are the contiguous numbers `101 ..= 100 + capacity`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A room number.
///
/// Stored guest records carry the room as free text; parsing normalizes it
/// to the canonical decimal form so that `"0101"`, `" 101"` and `101` all
/// name the same room.
///
/// # Examples
///
/// ```
/// use frontdesk::RoomNumber;
///
/// let room: RoomNumber = " 0102".parse().unwrap();
/// assert_eq!(room.value(), 102);
/// assert_eq!(room.to_string(), "102");
/// assert!("10a".parse::<RoomNumber>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomNumber(u32);

impl RoomNumber {
    /// The number of the first room of every hotel.
    pub const FIRST: u32 = 101;

    /// Wraps a raw room number.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the underlying number.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl FromStr for RoomNumber {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidRoom {
                value: s.to_string(),
                reason: "room number is empty".into(),
            });
        }
        trimmed
            .parse::<u32>()
            .map(Self)
            .map_err(|e| Error::InvalidRoom {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl fmt::Display for RoomNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The rooms of a hotel with the given capacity.
///
/// # Examples
///
/// ```
/// use frontdesk::{RoomNumber, RoomRange};
///
/// let range = RoomRange::new(3);
/// assert_eq!(range.len(), 3);
/// assert!(range.contains(RoomNumber::new(103)));
/// assert!(!range.contains(RoomNumber::new(104)));
/// assert_eq!(range.to_string(), "101-103");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomRange {
    capacity: u32,
}

impl RoomRange {
    /// Creates the range for a hotel with `capacity` rooms.
    #[must_use]
    pub const fn new(capacity: u32) -> Self {
        Self { capacity }
    }

    /// Returns the room capacity.
    #[must_use]
    pub const fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Returns the first room, if any.
    #[must_use]
    pub const fn first(&self) -> Option<RoomNumber> {
        if self.capacity == 0 {
            None
        } else {
            Some(RoomNumber(RoomNumber::FIRST))
        }
    }

    /// Returns the last room, if any.
    #[must_use]
    pub const fn last(&self) -> Option<RoomNumber> {
        if self.capacity == 0 {
            None
        } else {
            Some(RoomNumber(RoomNumber::FIRST.saturating_add(self.capacity - 1)))
        }
    }

    /// Returns `true` if `room` belongs to this hotel.
    #[must_use]
    pub const fn contains(&self, room: RoomNumber) -> bool {
        room.0 >= RoomNumber::FIRST && room.0 - RoomNumber::FIRST < self.capacity
    }

    /// Returns the number of rooms.
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.capacity
    }

    /// Returns `true` for a hotel without rooms.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.capacity == 0
    }

    /// Iterates over every room in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use frontdesk::RoomRange;
    ///
    /// let rooms: Vec<u32> = RoomRange::new(2).iter().map(|r| r.value()).collect();
    /// assert_eq!(rooms, vec![101, 102]);
    /// ```
    #[must_use]
    pub fn iter(self) -> RoomRangeIter {
        RoomRangeIter {
            next: RoomNumber::FIRST,
            end: RoomNumber::FIRST.saturating_add(self.capacity),
        }
    }
}

impl fmt::Display for RoomRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => write!(f, "{first}-{last}"),
            _ => write!(f, "no rooms"),
        }
    }
}

impl IntoIterator for RoomRange {
    type Item = RoomNumber;
    type IntoIter = RoomRangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the rooms of a [`RoomRange`].
#[derive(Debug)]
pub struct RoomRangeIter {
    next: u32,
    end: u32,
}

impl Iterator for RoomRangeIter {
    type Item = RoomNumber;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next < self.end {
            let room = RoomNumber(self.next);
            self.next += 1;
            Some(room)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for RoomRangeIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonicalizes() {
        assert_eq!("101".parse::<RoomNumber>().unwrap(), RoomNumber::new(101));
        assert_eq!("00101".parse::<RoomNumber>().unwrap(), RoomNumber::new(101));
        assert_eq!(" 102 ".parse::<RoomNumber>().unwrap(), RoomNumber::new(102));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("".parse::<RoomNumber>().is_err());
        assert!("   ".parse::<RoomNumber>().is_err());
        assert!("-1".parse::<RoomNumber>().is_err());
        assert!("Suite".parse::<RoomNumber>().is_err());
    }

    #[test]
    fn test_empty_range() {
        let range = RoomRange::new(0);
        assert!(range.is_empty());
        assert_eq!(range.first(), None);
        assert_eq!(range.iter().count(), 0);
        assert!(!range.contains(RoomNumber::new(101)));
        assert_eq!(range.to_string(), "no rooms");
    }

    #[test]
    fn test_range_bounds() {
        let range = RoomRange::new(5);
        assert_eq!(range.first(), Some(RoomNumber::new(101)));
        assert_eq!(range.last(), Some(RoomNumber::new(105)));
        assert!(!range.contains(RoomNumber::new(100)));
        assert!(!range.contains(RoomNumber::new(0)));
        assert!(range.contains(RoomNumber::new(105)));
        assert!(!range.contains(RoomNumber::new(106)));
    }

    #[test]
    fn test_into_iter_matches_iter() {
        let range = RoomRange::new(4);
        let a: Vec<_> = range.into_iter().collect();
        let b: Vec<_> = range.iter().collect();
        assert_eq!(a, b);
        assert_eq!(range.iter().len(), 4);
    }
}
