//! Room occupancy.
//!
//! [`resolve_occupied_rooms`] is the pure core: the rooms whose stays cover
//! a given instant. [`OccupancySnapshot`] pairs that set with the hotel's
//! room range, and [`OccupancyTracker`] keeps a snapshot current from store
//! notifications and a periodic recheck.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::error::Result;
use crate::guest::{Guest, GuestRecord, HotelStay};
use crate::property::PropertyRef;
use crate::room::{RoomNumber, RoomRange};
use crate::store::{self, DocumentStore, Subscription};

#[cfg(test)]
mod proptests;

/// Computes the rooms occupied at `now`.
///
/// A stay counts when its room parses, lies inside `rooms`, and its
/// interval overlaps `now`. Several stays in one room collapse into one
/// entry.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use frontdesk::guest::HotelStay;
/// use frontdesk::occupancy::resolve_occupied_rooms;
/// use frontdesk::{RoomNumber, RoomRange};
///
/// let stay = HotelStay {
///     room_no: Some("101".into()),
///     check_in: Some("2024-01-01".into()),
///     check_in_time: Some("10:00".into()),
///     check_out: Some("2024-01-02".into()),
///     check_out_time: Some("10:00".into()),
///     ..HotelStay::default()
/// };
/// let noon = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
/// let occupied = resolve_occupied_rooms([&stay], RoomRange::new(3), noon);
/// assert_eq!(occupied.into_iter().collect::<Vec<_>>(), vec![RoomNumber::new(101)]);
/// ```
#[must_use]
pub fn resolve_occupied_rooms<'a, I>(stays: I, rooms: RoomRange, now: NaiveDateTime) -> BTreeSet<RoomNumber>
where
    I: IntoIterator<Item = &'a HotelStay>,
{
    stays
        .into_iter()
        .filter_map(|stay| {
            let room = stay.room()?;
            (rooms.contains(room) && stay.interval().overlaps_now(now)).then_some(room)
        })
        .collect()
}

/// One room on the room board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RoomState {
    /// The room.
    pub room: RoomNumber,
    /// Whether a stay covers the snapshot instant.
    pub occupied: bool,
}

/// The occupied rooms of a hotel at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancySnapshot {
    /// The instant the set was computed for.
    pub at: NaiveDateTime,
    /// The hotel's rooms.
    pub rooms: RoomRange,
    /// The occupied subset of `rooms`.
    pub occupied: BTreeSet<RoomNumber>,
}

impl OccupancySnapshot {
    /// Resolves occupancy from a property's guests.
    #[must_use]
    pub fn from_guests(guests: &[Guest], rooms: RoomRange, at: NaiveDateTime) -> Self {
        Self {
            at,
            rooms,
            occupied: resolve_occupied_rooms(guests.iter().filter_map(Guest::hotel), rooms, at),
        }
    }

    /// Loads the guests and rooms of `property` and resolves occupancy at `at`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn load<S: DocumentStore + ?Sized>(store: &S, property: &PropertyRef, at: NaiveDateTime) -> Result<Self> {
        let rooms = store::load_room_range(store, property)?;
        let guests = store::load_guests(store, property)?;
        Ok(Self::from_guests(&guests, rooms, at))
    }

    /// Returns `true` if `room` is occupied.
    #[must_use]
    pub fn is_occupied(&self, room: RoomNumber) -> bool {
        self.occupied.contains(&room)
    }

    /// The free rooms in ascending order.
    pub fn free_rooms(&self) -> impl Iterator<Item = RoomNumber> + '_ {
        self.rooms.iter().filter(|room| !self.is_occupied(*room))
    }

    /// Every room with its state, in ascending order.
    #[must_use]
    pub fn board(&self) -> Vec<RoomState> {
        self.rooms
            .iter()
            .map(|room| RoomState {
                room,
                occupied: self.is_occupied(room),
            })
            .collect()
    }
}

/// Keeps an [`OccupancySnapshot`] of one hotel current.
///
/// A background task recomputes the snapshot whenever the hotel's guests or
/// room capacity change, and every `recheck` interval against the last
/// stays it saw so that stays expire without any write.
#[derive(Debug)]
pub struct OccupancyTracker {
    property: PropertyRef,
    snapshots: watch::Receiver<OccupancySnapshot>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl OccupancyTracker {
    /// Starts tracking `property`.
    ///
    /// The first snapshot is computed before this returns.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial read fails.
    pub fn spawn<S>(
        store: S,
        property: PropertyRef,
        clock: Arc<dyn Clock>,
        recheck: Duration,
    ) -> Result<Self>
    where
        S: DocumentStore + Clone + 'static,
    {
        let customers = Subscription::new(store.clone(), store::customers(&property)?);
        let capacity = Subscription::new(store.clone(), store::rooms(&property)?);

        let mut stays: Vec<HotelStay> = store::load_guests(&store, &property)?
            .into_iter()
            .filter_map(|guest| guest.hotel().cloned())
            .collect();
        let mut rooms = store::load_room_range(&store, &property)?;
        let initial = OccupancySnapshot {
            at: clock.now(),
            rooms,
            occupied: resolve_occupied_rooms(&stays, rooms, clock.now()),
        };
        let (tx, snapshots) = watch::channel(initial);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let tracked = property.clone();

        let task = tokio::spawn(async move {
            let mut customers = customers;
            let mut capacity = capacity;
            let mut ticker = interval_at(Instant::now() + recheck, recheck);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    () = token.cancelled() => break,
                    snapshot = customers.next() => match snapshot {
                        Ok(Some(snapshot)) => {
                            stays = snapshot
                                .value
                                .map(|value| hotel_stays(&property, &value))
                                .unwrap_or_default();
                        }
                        Ok(None) => break,
                        Err(e) => {
                            log::warn!("occupancy of {property}: failed to read guests: {e}");
                            continue;
                        }
                    },
                    snapshot = capacity.next() => match snapshot {
                        Ok(Some(_)) => match store::load_room_range(&store, &property) {
                            Ok(range) => rooms = range,
                            Err(e) => log::warn!("occupancy of {property}: {e}"),
                        },
                        Ok(None) => break,
                        Err(e) => {
                            log::warn!("occupancy of {property}: failed to read rooms: {e}");
                            continue;
                        }
                    },
                    _ = ticker.tick() => {
                        log::debug!("occupancy of {property}: periodic recheck");
                    }
                }

                let now = clock.now();
                let next = OccupancySnapshot {
                    at: now,
                    rooms,
                    occupied: resolve_occupied_rooms(&stays, rooms, now),
                };
                tx.send_replace(next);
            }
        });

        Ok(Self {
            property: tracked,
            snapshots,
            cancel,
            task: Some(task),
        })
    }

    /// The hotel being tracked.
    #[must_use]
    pub const fn property(&self) -> &PropertyRef {
        &self.property
    }

    /// The latest snapshot.
    #[must_use]
    pub fn snapshot(&self) -> OccupancySnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver notified on every recomputation.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<OccupancySnapshot> {
        self.snapshots.clone()
    }

    /// Stops the background task and waits for it to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                log::warn!("occupancy tracker task failed: {e}");
            }
        }
    }
}

impl Drop for OccupancyTracker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn hotel_stays(property: &PropertyRef, customers: &Value) -> Vec<HotelStay> {
    Guest::collect(property.node, customers)
        .into_iter()
        .filter_map(|guest| match guest.record {
            GuestRecord::Hotel(stay) => Some(stay),
            GuestRecord::Restaurant(_) => None,
        })
        .collect()
}
