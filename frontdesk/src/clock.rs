//! Wall-clock abstraction.
//!
//! Stay intervals, ages and checkout sweeps are all functions of "now".
//! Components take a [`Clock`] instead of reading the system time so that
//! tests and the CLI's `--at` option can pin the instant.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, Utc};
use parking_lot::Mutex;

/// Source of the current local time.
pub trait Clock: Send + Sync {
    /// The current local wall-clock time.
    fn now(&self) -> NaiveDateTime;

    /// Milliseconds since the Unix epoch, used for `createdAt` stamps and
    /// `custom_<n>` template keys.
    fn epoch_millis(&self) -> i64;

    /// Today's local date.
    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// The system clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }

    fn epoch_millis(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// A clock that only moves when told to.
///
/// # Examples
///
/// ```
/// use chrono::{Duration, NaiveDate};
/// use frontdesk::clock::{Clock, ManualClock};
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// let clock = ManualClock::new(start);
/// clock.advance(Duration::minutes(5));
/// assert_eq!(clock.now(), start + Duration::minutes(5));
/// ```
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<NaiveDateTime>,
}

impl ManualClock {
    /// Creates a clock pinned at `at`.
    #[must_use]
    pub fn new(at: NaiveDateTime) -> Self {
        Self {
            now: Mutex::new(at),
        }
    }

    /// Moves the clock to `at`.
    pub fn set(&self, at: NaiveDateTime) {
        *self.now.lock() = at;
    }

    /// Moves the clock forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock()
    }

    fn epoch_millis(&self) -> i64 {
        self.now().and_utc().timestamp_millis()
    }
}
