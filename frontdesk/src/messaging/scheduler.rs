//! Per-guest message timers.
//!
//! Each guest gets a timer group: one cancellation token for everything
//! scheduled on the guest's behalf, and a child token for its custom
//! messages. When a checkout timer fires it cancels the custom child, so
//! no custom message goes out after the checkout message. Cancelling a
//! guest, or the whole scheduler, is a single call.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use super::sender::{MessageSender, OutgoingMessage};

/// What a timer does besides sending its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerRole {
    /// A custom message; dropped once the guest's checkout timer fires.
    Custom,
    /// The checkout message; cancels the guest's pending custom timers.
    Checkout,
}

/// A message to send after a delay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimedMessage {
    /// Delay from the moment of scheduling.
    pub after: Duration,
    /// Custom or checkout.
    pub role: TimerRole,
    /// The message.
    pub message: OutgoingMessage,
}

#[derive(Debug)]
struct TimerGroup {
    generation: u64,
    pending: usize,
    all: CancellationToken,
    customs: CancellationToken,
}

#[derive(Debug, Default)]
struct Groups {
    next_generation: u64,
    by_guest: HashMap<String, TimerGroup>,
}

impl Groups {
    /// Drops the group once its last timer has finished.
    fn release(&mut self, guest_id: &str, generation: u64) {
        let done = match self.by_guest.get_mut(guest_id) {
            Some(group) if group.generation == generation => {
                group.pending = group.pending.saturating_sub(1);
                group.pending == 0
            }
            _ => false,
        };
        if done {
            self.by_guest.remove(guest_id);
        }
    }
}

/// Schedules and cancels message timers keyed by guest id.
///
/// Timers are tokio tasks, so scheduling requires a running runtime. A
/// guest's group is forgotten once all its timers have fired or been
/// cancelled.
pub struct MessageScheduler {
    sender: Arc<dyn MessageSender>,
    root: CancellationToken,
    groups: Arc<Mutex<Groups>>,
}

impl std::fmt::Debug for MessageScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessageScheduler")
            .field("groups", &self.groups.lock().by_guest.len())
            .field("cancelled", &self.root.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl MessageScheduler {
    /// Creates a scheduler delivering through `sender`.
    #[must_use]
    pub fn new(sender: Arc<dyn MessageSender>) -> Self {
        Self {
            sender,
            root: CancellationToken::new(),
            groups: Arc::new(Mutex::new(Groups::default())),
        }
    }

    /// Sends a message right away. Delivery failures are logged.
    pub fn send_now(&self, message: &OutgoingMessage) {
        deliver(self.sender.as_ref(), message);
    }

    /// Schedules `timed` for `guest_id`.
    ///
    /// A custom timer due at the same instant as the checkout timer is
    /// still delivered, before the checkout message.
    pub fn schedule(&self, guest_id: &str, timed: TimedMessage) {
        let (generation, all, customs) = {
            let mut groups = self.groups.lock();
            let Groups {
                next_generation,
                by_guest,
            } = &mut *groups;
            let group = by_guest.entry(guest_id.to_string()).or_insert_with(|| {
                *next_generation += 1;
                let all = self.root.child_token();
                let customs = all.child_token();
                TimerGroup {
                    generation: *next_generation,
                    pending: 0,
                    all,
                    customs,
                }
            });
            group.pending += 1;
            (group.generation, group.all.clone(), group.customs.clone())
        };

        let sender = Arc::clone(&self.sender);
        let groups = Arc::clone(&self.groups);
        let guest_id = guest_id.to_string();
        let TimedMessage {
            after,
            role,
            message,
        } = timed;
        let guard = match role {
            TimerRole::Custom => customs.clone(),
            TimerRole::Checkout => all,
        };

        let deadline = tokio::time::Instant::now() + after;
        tokio::spawn(async move {
            match role {
                TimerRole::Custom => {
                    tokio::select! {
                        biased;

                        () = tokio::time::sleep_until(deadline) => {
                            deliver(sender.as_ref(), &message);
                        }
                        () = guard.cancelled() => {
                            log::debug!("{} timer for guest {guest_id} cancelled", message.key);
                        }
                    }
                }
                TimerRole::Checkout => {
                    tokio::select! {
                        biased;

                        () = guard.cancelled() => {
                            log::debug!("{} timer for guest {guest_id} cancelled", message.key);
                        }
                        () = tokio::time::sleep_until(deadline) => {
                            // customs due at this same instant go first
                            tokio::task::yield_now().await;
                            customs.cancel();
                            deliver(sender.as_ref(), &message);
                        }
                    }
                }
            }
            groups.lock().release(&guest_id, generation);
        });
    }

    /// Returns `true` if `guest_id` has timers that have neither fired nor
    /// been cancelled.
    #[must_use]
    pub fn has_group(&self, guest_id: &str) -> bool {
        self.groups
            .lock()
            .by_guest
            .get(guest_id)
            .is_some_and(|group| !group.all.is_cancelled())
    }

    /// Cancels every pending timer of `guest_id`.
    pub fn cancel(&self, guest_id: &str) {
        if let Some(group) = self.groups.lock().by_guest.remove(guest_id) {
            group.all.cancel();
            log::debug!("cancelled timers for guest {guest_id}");
        }
    }

    /// Cancels every pending timer.
    pub fn cancel_all(&self) {
        self.root.cancel();
        self.groups.lock().by_guest.clear();
    }
}

impl Drop for MessageScheduler {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

fn deliver(sender: &dyn MessageSender, message: &OutgoingMessage) {
    if let Err(e) = sender.send(message) {
        log::warn!(
            "failed to send {} message to guest {}: {e}",
            message.key,
            message.guest_id
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::TemplateKey;
    use crate::property::PropertyRef;

    #[derive(Default)]
    struct Recorder(Mutex<Vec<TemplateKey>>);

    impl MessageSender for Recorder {
        fn send(&self, message: &OutgoingMessage) -> crate::Result<()> {
            self.0.lock().push(message.key);
            Ok(())
        }
    }

    fn message(key: TemplateKey) -> OutgoingMessage {
        OutgoingMessage {
            property: PropertyRef::hotel("h1"),
            guest_id: "g1".into(),
            key,
            mobile: "9876543210".into(),
            text: String::new(),
        }
    }

    fn timed(secs: u64, role: TimerRole, key: TemplateKey) -> TimedMessage {
        TimedMessage {
            after: Duration::from_secs(secs),
            role,
            message: message(key),
        }
    }

    async fn settle(secs: u64) {
        tokio::time::sleep(Duration::from_secs(secs)).await;
        tokio::task::yield_now().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_cancels_later_customs() {
        let recorder = Arc::new(Recorder::default());
        let scheduler = MessageScheduler::new(recorder.clone());

        scheduler.schedule("g1", timed(60, TimerRole::Custom, TemplateKey::Custom(1)));
        scheduler.schedule("g1", timed(90, TimerRole::Checkout, TemplateKey::CheckOut));
        scheduler.schedule("g1", timed(120, TimerRole::Custom, TemplateKey::Custom(2)));

        settle(200).await;
        assert_eq!(
            *recorder.0.lock(),
            vec![TemplateKey::Custom(1), TemplateKey::CheckOut]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_guest_drops_everything() {
        let recorder = Arc::new(Recorder::default());
        let scheduler = MessageScheduler::new(recorder.clone());

        scheduler.schedule("g1", timed(60, TimerRole::Custom, TemplateKey::Custom(1)));
        scheduler.schedule("g1", timed(90, TimerRole::Checkout, TemplateKey::CheckOut));
        assert!(scheduler.has_group("g1"));

        scheduler.cancel("g1");
        assert!(!scheduler.has_group("g1"));
        settle(200).await;
        assert!(recorder.0.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_all_and_send_now() {
        let recorder = Arc::new(Recorder::default());
        let scheduler = MessageScheduler::new(recorder.clone());

        scheduler.send_now(&message(TemplateKey::CheckIn));
        scheduler.schedule("g1", timed(10, TimerRole::Checkout, TemplateKey::CheckOut));
        scheduler.schedule("g2", timed(10, TimerRole::Checkout, TemplateKey::CheckOut));
        scheduler.cancel_all();

        settle(60).await;
        assert_eq!(*recorder.0.lock(), vec![TemplateKey::CheckIn]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_due_with_checkout_goes_first() {
        let recorder = Arc::new(Recorder::default());
        let scheduler = MessageScheduler::new(recorder.clone());

        scheduler.schedule("g1", timed(60, TimerRole::Checkout, TemplateKey::CheckOut));
        scheduler.schedule("g1", timed(60, TimerRole::Custom, TemplateKey::Custom(1)));

        settle(120).await;
        assert_eq!(
            *recorder.0.lock(),
            vec![TemplateKey::Custom(1), TemplateKey::CheckOut]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_group_forgotten_after_timers_fire() {
        let recorder = Arc::new(Recorder::default());
        let scheduler = MessageScheduler::new(recorder.clone());

        scheduler.schedule("g1", timed(30, TimerRole::Custom, TemplateKey::Custom(1)));
        scheduler.schedule("g1", timed(60, TimerRole::Checkout, TemplateKey::CheckOut));
        scheduler.schedule("g2", timed(30, TimerRole::Custom, TemplateKey::Custom(1)));
        settle(45).await;
        assert!(scheduler.has_group("g1"));
        assert!(!scheduler.has_group("g2"));

        settle(30).await;
        assert!(!scheduler.has_group("g1"));
        assert_eq!(scheduler.groups.lock().by_guest.len(), 0);
        assert_eq!(recorder.0.lock().len(), 3);
    }
}
