//! Guest lifecycle: when messages go out and when stays end.
//!
//! A hotel stay is `PendingCheckoutInfo` until both check-out fields are
//! known. The first time they are known and `messageSent` is still false,
//! messaging starts: the check-in message goes out at once, custom messages
//! follow at fixed spacing while the guest is still in, and the checkout
//! message fires one lead interval before the checkout instant. Once a
//! sweep sees the checkout instant pass, the stay is marked checked out.
//!
//! Planning is pure ([`plan_dispatch`], [`plan_visit`]); the
//! [`LifecycleSession`] executes plans against a store and a scheduler.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDateTime;
use serde_json::{json, Map};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::clock::Clock;
use crate::config::MessagingConfig;
use crate::error::Result;
use crate::guest::{Guest, GuestRecord, GuestStatus, HotelStay, RestaurantStay};
use crate::messaging::{
    render, MessageScheduler, MessageSender, OutgoingMessage, TemplateContext, TemplateKey,
    TemplateSet, TimedMessage, TimerRole,
};
use crate::property::PropertyRef;
use crate::store::{self, DocumentStore, Subscription};

/// Where a hotel stay is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// Check-out date or time is missing; nothing is scheduled.
    PendingCheckoutInfo,
    /// Check-out is known and the stay has not ended.
    MessagingActive,
    /// The checkout instant has passed.
    CheckedOut,
}

impl LifecycleState {
    /// The state of `stay` at `now`.
    #[must_use]
    pub fn of(stay: &HotelStay, now: NaiveDateTime) -> Self {
        if stay.status() == GuestStatus::CheckedOut
            || stay.checkout_instant().is_some_and(|checkout| now > checkout)
        {
            Self::CheckedOut
        } else if stay.has_checkout_info() {
            Self::MessagingActive
        } else {
            Self::PendingCheckoutInfo
        }
    }
}

/// Delays used when scheduling guest messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessagingTimings {
    /// Gap between consecutive custom messages; the first fires after one gap.
    pub custom_spacing: Duration,
    /// How long before the checkout instant the checkout message fires.
    pub checkout_lead: Duration,
    /// When a restaurant visit's checkout message fires after check-in.
    pub resto_checkout_after: Duration,
}

impl Default for MessagingTimings {
    fn default() -> Self {
        Self {
            custom_spacing: Duration::from_secs(60),
            checkout_lead: Duration::from_secs(60),
            resto_checkout_after: Duration::from_secs(180),
        }
    }
}

impl From<&MessagingConfig> for MessagingTimings {
    fn from(config: &MessagingConfig) -> Self {
        let defaults = Self::default();
        Self {
            custom_spacing: config
                .custom_spacing_seconds
                .map_or(defaults.custom_spacing, Duration::from_secs),
            checkout_lead: config
                .checkout_lead_seconds
                .map_or(defaults.checkout_lead, Duration::from_secs),
            resto_checkout_after: config
                .resto_checkout_after_seconds
                .map_or(defaults.resto_checkout_after, Duration::from_secs),
        }
    }
}

/// Messages to send for one guest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DispatchPlan {
    /// Sent as soon as the plan runs.
    pub immediate: Vec<OutgoingMessage>,
    /// Sent later.
    pub timed: Vec<TimedMessage>,
    /// Whether `messageSent` must be persisted as true.
    pub mark_sent: bool,
}

impl DispatchPlan {
    /// Returns `true` if the plan sends nothing and writes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.immediate.is_empty() && self.timed.is_empty() && !self.mark_sent
    }
}

/// Who a plan is for: the property, its display name and the guest key.
#[derive(Debug, Clone, Copy)]
pub struct Recipient<'a> {
    /// The guest's property.
    pub property: &'a PropertyRef,
    /// The property's display name.
    pub property_name: &'a str,
    /// The guest's store key.
    pub guest_id: &'a str,
}

impl Recipient<'_> {
    fn message(&self, key: TemplateKey, mobile: &str, text: String) -> OutgoingMessage {
        OutgoingMessage {
            property: self.property.clone(),
            guest_id: self.guest_id.to_string(),
            key,
            mobile: mobile.to_string(),
            text,
        }
    }
}

/// Plans messaging for a hotel stay at `now`.
///
/// Returns `None` when nothing may happen yet or ever again: the check-in
/// message was already scheduled (`messageSent`), or the check-out fields
/// are incomplete.
///
/// Custom messages are kept only if they fall before the checkout instant
/// and, when a checkout message is scheduled, no later than it.
#[must_use]
pub fn plan_dispatch(
    recipient: Recipient<'_>,
    stay: &HotelStay,
    templates: &TemplateSet,
    now: NaiveDateTime,
    timings: &MessagingTimings,
) -> Option<DispatchPlan> {
    if stay.message_sent || !stay.has_checkout_info() {
        return None;
    }

    let ctx = TemplateContext::for_hotel_stay(stay, recipient.property_name);
    let mobile = stay.profile.mobile.as_str();
    let mut plan = DispatchPlan {
        mark_sent: true,
        ..DispatchPlan::default()
    };

    if let Some(text) = templates.get(TemplateKey::CheckIn) {
        plan.immediate
            .push(recipient.message(TemplateKey::CheckIn, mobile, render(text, &ctx)));
    }

    // an unparseable checkout leaves only the check-in message
    let Some(checkout) = stay.checkout_instant() else {
        return Some(plan);
    };

    let checkout_delay = chrono::Duration::from_std(timings.checkout_lead)
        .ok()
        .and_then(|lead| (checkout - now - lead).to_std().ok())
        .filter(|delay| !delay.is_zero());
    // customs are only cut off by a checkout timer that actually exists
    let mut cutoff = None;
    if let (Some(after), Some(text)) = (checkout_delay, templates.get(TemplateKey::CheckOut)) {
        cutoff = Some(after);
        plan.timed.push(TimedMessage {
            after,
            role: TimerRole::Checkout,
            message: recipient.message(TemplateKey::CheckOut, mobile, render(text, &ctx)),
        });
    }

    for (index, (key, text)) in templates.customs().enumerate() {
        let after = custom_delay(timings.custom_spacing, index);
        let before_checkout = chrono::Duration::from_std(after)
            .ok()
            .is_some_and(|delay| now + delay < checkout);
        let before_checkout_message = cutoff.map_or(true, |cutoff| after <= cutoff);
        if before_checkout && before_checkout_message {
            plan.timed.push(TimedMessage {
                after,
                role: TimerRole::Custom,
                message: recipient.message(key, mobile, render(text, &ctx)),
            });
        }
    }

    Some(plan)
}

/// Plans messaging for a new restaurant visit.
///
/// The check-in message goes out at once, the checkout message after
/// `resto_checkout_after`, and each custom message at its spacing slot
/// unless the checkout message comes strictly before it.
#[must_use]
pub fn plan_visit(
    recipient: Recipient<'_>,
    visit: &RestaurantStay,
    templates: &TemplateSet,
    timings: &MessagingTimings,
) -> DispatchPlan {
    let ctx = TemplateContext::for_restaurant(&visit.profile, recipient.property_name);
    let mobile = visit.profile.mobile.as_str();
    let mut plan = DispatchPlan::default();

    if let Some(text) = templates.get(TemplateKey::CheckIn) {
        plan.immediate
            .push(recipient.message(TemplateKey::CheckIn, mobile, render(text, &ctx)));
    }
    if let Some(text) = templates.get(TemplateKey::CheckOut) {
        plan.timed.push(TimedMessage {
            after: timings.resto_checkout_after,
            role: TimerRole::Checkout,
            message: recipient.message(TemplateKey::CheckOut, mobile, render(text, &ctx)),
        });
    }
    for (index, (key, text)) in templates.customs().enumerate() {
        let after = custom_delay(timings.custom_spacing, index);
        let cut_off = templates.get(TemplateKey::CheckOut).is_some()
            && after > timings.resto_checkout_after;
        if !cut_off {
            plan.timed.push(TimedMessage {
                after,
                role: TimerRole::Custom,
                message: recipient.message(key, mobile, render(text, &ctx)),
            });
        }
    }
    plan
}

fn custom_delay(spacing: Duration, index: usize) -> Duration {
    let slot = u32::try_from(index).map_or(u32::MAX, |i| i.saturating_add(1));
    spacing.saturating_mul(slot)
}

/// Returns the hotel guests whose checkout has passed but whose stored
/// status does not say so yet.
#[must_use]
pub fn due_for_checkout(guests: &[Guest], now: NaiveDateTime) -> Vec<&Guest> {
    guests
        .iter()
        .filter(|guest| {
            guest.hotel().is_some_and(|stay| {
                stay.status() != GuestStatus::CheckedOut
                    && stay.checkout_instant().is_some_and(|checkout| now > checkout)
            })
        })
        .collect()
}

/// The messaging and checkout duties of one property, for the lifetime of
/// one running session.
///
/// The session remembers which guests it has dispatched and which it has
/// seen, so repeated snapshots never schedule a guest twice. Timers belong
/// to the session's scheduler and die with [`LifecycleSession::shutdown`].
pub struct LifecycleSession<S> {
    store: S,
    property: PropertyRef,
    property_name: String,
    templates: TemplateSet,
    clock: Arc<dyn Clock>,
    scheduler: MessageScheduler,
    timings: MessagingTimings,
    recheck: Duration,
    dispatched: HashSet<String>,
    seen: HashSet<String>,
    checked_out: HashSet<String>,
    primed: bool,
}

impl<S> std::fmt::Debug for LifecycleSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleSession")
            .field("property", &self.property)
            .field("templates", &self.templates.len())
            .field("dispatched", &self.dispatched.len())
            .field("seen", &self.seen.len())
            .finish_non_exhaustive()
    }
}

impl<S> LifecycleSession<S>
where
    S: DocumentStore + Clone + 'static,
{
    /// Opens a session for `property`, loading its name and templates.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::PropertyNotFound`] if the property does not
    /// exist, or a store error.
    pub fn new(
        store: S,
        property: PropertyRef,
        clock: Arc<dyn Clock>,
        sender: Arc<dyn MessageSender>,
    ) -> Result<Self> {
        let record = store::load_property(&store, &property)?;
        let templates = store::load_templates(&store, &property)?;
        Ok(Self {
            store,
            property,
            property_name: record.name,
            templates,
            clock,
            scheduler: MessageScheduler::new(sender),
            timings: MessagingTimings::default(),
            recheck: Duration::from_secs(60),
            dispatched: HashSet::new(),
            seen: HashSet::new(),
            checked_out: HashSet::new(),
            primed: false,
        })
    }

    /// Overrides the message delays.
    #[must_use]
    pub fn with_timings(mut self, timings: MessagingTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Overrides the checkout sweep interval used by [`LifecycleSession::run`].
    #[must_use]
    pub fn with_recheck_interval(mut self, recheck: Duration) -> Self {
        self.recheck = recheck;
        self
    }

    /// The property this session serves.
    #[must_use]
    pub const fn property(&self) -> &PropertyRef {
        &self.property
    }

    /// The templates currently in use.
    #[must_use]
    pub const fn templates(&self) -> &TemplateSet {
        &self.templates
    }

    /// Replaces the templates used for guests dispatched from now on.
    pub fn set_templates(&mut self, templates: TemplateSet) {
        self.templates = templates;
    }

    /// Returns `true` if this session has dispatched `guest_id`.
    #[must_use]
    pub fn is_dispatched(&self, guest_id: &str) -> bool {
        self.dispatched.contains(guest_id)
    }

    /// Handles a freshly written guest record.
    ///
    /// Hotel stays start messaging if their check-out is known; restaurant
    /// visits always do. Returns the state of a hotel stay afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if persisting `messageSent` fails. Messages already
    /// sent stay sent.
    pub fn handle_registered(&mut self, guest: &Guest) -> Result<Option<LifecycleState>> {
        self.seen.insert(guest.id.clone());
        if self.dispatched.contains(&guest.id) {
            return Ok(guest.hotel().map(|stay| LifecycleState::of(stay, self.clock.now())));
        }

        let recipient = Recipient {
            property: &self.property,
            property_name: &self.property_name,
            guest_id: &guest.id,
        };
        match &guest.record {
            GuestRecord::Hotel(stay) => {
                let now = self.clock.now();
                let Some(plan) = plan_dispatch(recipient, stay, &self.templates, now, &self.timings)
                else {
                    if !stay.message_sent {
                        log::info!(
                            "guest {} in {}: waiting for checkout info before messaging",
                            guest.id,
                            self.property
                        );
                    }
                    return Ok(Some(LifecycleState::of(stay, now)));
                };
                self.execute(&guest.id, plan)?;
                Ok(Some(LifecycleState::of(stay, now)))
            }
            GuestRecord::Restaurant(visit) => {
                let plan = plan_visit(recipient, visit, &self.templates, &self.timings);
                self.execute(&guest.id, plan)?;
                Ok(None)
            }
        }
    }

    /// Handles an admin edit of a guest record.
    ///
    /// Messaging starts if the edit completed the check-out fields of a
    /// stay that has not been messaged yet.
    ///
    /// # Errors
    ///
    /// See [`LifecycleSession::handle_registered`].
    pub fn handle_edited(&mut self, guest: &Guest) -> Result<Option<LifecycleState>> {
        match guest.hotel() {
            Some(stay) if stay.has_checkout_info() => self.handle_registered(guest),
            Some(stay) => Ok(Some(LifecycleState::of(stay, self.clock.now()))),
            None => Ok(None),
        }
    }

    /// Forgets a deleted guest and cancels its timers.
    pub fn handle_deleted(&mut self, guest_id: &str) {
        self.scheduler.cancel(guest_id);
        self.dispatched.remove(guest_id);
        self.seen.remove(guest_id);
        self.checked_out.remove(guest_id);
    }

    /// Reconciles the session with a full snapshot of the property's guests.
    ///
    /// Guests that disappeared are treated as deleted. Hotel stays are
    /// dispatched on sight when eligible. Restaurant visits are dispatched
    /// only when they first appear after the initial snapshot, so that
    /// starting a session does not message past visitors. Finally the
    /// checkout sweep runs.
    ///
    /// # Errors
    ///
    /// Returns the first store error; the remaining guests are still
    /// processed.
    pub fn on_snapshot(&mut self, guests: &[Guest]) -> Result<()> {
        let current: HashSet<&str> = guests.iter().map(|g| g.id.as_str()).collect();
        let gone: Vec<String> = self
            .seen
            .iter()
            .filter(|id| !current.contains(id.as_str()))
            .cloned()
            .collect();
        for id in gone {
            self.handle_deleted(&id);
        }

        let mut first_error = None;
        for guest in guests {
            let is_new = !self.seen.contains(&guest.id);
            let result = match guest.record {
                GuestRecord::Hotel(_) => self.handle_registered(guest).map(drop),
                GuestRecord::Restaurant(_) if self.primed && is_new => {
                    self.handle_registered(guest).map(drop)
                }
                GuestRecord::Restaurant(_) => {
                    self.seen.insert(guest.id.clone());
                    Ok(())
                }
            };
            if let Err(e) = result {
                log::warn!("guest {} in {}: {e}", guest.id, self.property);
                first_error.get_or_insert(e);
            }
        }
        self.primed = true;

        if let Err(e) = self.sweep(guests) {
            first_error.get_or_insert(e);
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Marks every stay whose checkout has passed as checked out.
    ///
    /// Returns the number of records written.
    ///
    /// # Errors
    ///
    /// Returns an error if a status write fails.
    pub fn sweep(&mut self, guests: &[Guest]) -> Result<usize> {
        let now = self.clock.now();
        let mut written = 0;
        for guest in due_for_checkout(guests, now) {
            if self.checked_out.contains(&guest.id) {
                continue;
            }
            let mut patch = Map::new();
            patch.insert("status".into(), json!(GuestStatus::CheckedOut.as_str()));
            self.store
                .update(&store::customer(&self.property, &guest.id)?, &patch)?;
            self.checked_out.insert(guest.id.clone());
            log::info!("guest {} in {} checked out", guest.id, self.property);
            written += 1;
        }
        Ok(written)
    }

    /// Runs the session until `cancel` fires.
    ///
    /// Follows the property's guests and templates, and sweeps checkouts
    /// every recheck interval against the last guest snapshot. Store errors
    /// are logged; the session keeps going. All timers are cancelled on
    /// return.
    ///
    /// # Errors
    ///
    /// Returns an error if the subscriptions cannot be set up.
    pub async fn run(&mut self, cancel: CancellationToken) -> Result<()> {
        let mut customers = Subscription::new(self.store.clone(), store::customers(&self.property)?);
        let mut messages = Subscription::new(self.store.clone(), store::messages(&self.property)?);
        let mut ticker = interval_at(Instant::now() + self.recheck, self.recheck);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut last: Vec<Guest> = Vec::new();

        log::info!("lifecycle session for {} started", self.property);
        loop {
            tokio::select! {
                biased;

                () = cancel.cancelled() => break,
                snapshot = messages.next() => match snapshot {
                    Ok(Some(snapshot)) => {
                        self.templates = snapshot
                            .value
                            .map(|value| TemplateSet::from_value(&value))
                            .unwrap_or_default();
                    }
                    Ok(None) => break,
                    Err(e) => log::warn!("{}: failed to read templates: {e}", self.property),
                },
                snapshot = customers.next() => match snapshot {
                    Ok(Some(snapshot)) => {
                        last = snapshot
                            .value
                            .map(|value| Guest::collect(self.property.node, &value))
                            .unwrap_or_default();
                        if let Err(e) = self.on_snapshot(&last) {
                            log::warn!("{}: {e}", self.property);
                        }
                    }
                    Ok(None) => break,
                    Err(e) => log::warn!("{}: failed to read guests: {e}", self.property),
                },
                _ = ticker.tick() => {
                    if let Err(e) = self.sweep(&last) {
                        log::warn!("{}: checkout sweep failed: {e}", self.property);
                    }
                }
            }
        }

        self.shutdown();
        log::info!("lifecycle session for {} stopped", self.property);
        Ok(())
    }

    /// Cancels every pending message timer.
    pub fn shutdown(&mut self) {
        self.scheduler.cancel_all();
    }

    fn execute(&mut self, guest_id: &str, plan: DispatchPlan) -> Result<()> {
        self.dispatched.insert(guest_id.to_string());
        for message in &plan.immediate {
            self.scheduler.send_now(message);
        }
        for timed in plan.timed {
            self.scheduler.schedule(guest_id, timed);
        }
        if plan.mark_sent {
            let mut patch = Map::new();
            patch.insert("messageSent".into(), json!(true));
            self.store
                .update(&store::customer(&self.property, guest_id)?, &patch)?;
        }
        Ok(())
    }
}
