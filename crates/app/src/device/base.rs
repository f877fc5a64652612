//! Base device core: identity and the outbound event path.
//!
//! Every device kind embeds a [`DeviceCore`]. It decides whether a request
//! is addressed to the device, builds event envelopes and forwards them to
//! the [`EventSink`], dropping events that repeat too quickly.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use cloudlink_domain::event::{Cause, EventMessage};
use cloudlink_domain::id::DeviceId;

use crate::ports::EventSink;

/// Minimum delay between two events with the same name from one device.
pub const DEFAULT_EVENT_WAIT_TIME: Duration = Duration::from_secs(60);

/// Outcome of the wait-time check for one event name.
enum Slot {
    TooSoon,
    /// Holds the timestamp to restore if the send fails.
    Reserved { previous: Option<Instant> },
}

/// Identity and event plumbing shared by every device kind.
pub struct DeviceCore<S> {
    id: DeviceId,
    sink: S,
    event_wait_time: Duration,
    last_sent: Mutex<HashMap<String, Instant>>,
}

impl<S: EventSink> DeviceCore<S> {
    /// Create a core for `id` emitting into `sink`, using
    /// [`DEFAULT_EVENT_WAIT_TIME`].
    pub fn new(id: DeviceId, sink: S) -> Self {
        Self {
            id,
            sink,
            event_wait_time: DEFAULT_EVENT_WAIT_TIME,
            last_sent: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the event wait time. `Duration::ZERO` disables the filter.
    #[must_use]
    pub fn with_event_wait_time(mut self, wait: Duration) -> Self {
        self.event_wait_time = wait;
        self
    }

    #[must_use]
    pub fn id(&self) -> &DeviceId {
        &self.id
    }

    #[must_use]
    pub fn event_wait_time(&self) -> Duration {
        self.event_wait_time
    }

    /// Whether a request for `device_id` concerns this device.
    #[must_use]
    pub fn is_addressed_to(&self, device_id: &str) -> bool {
        self.id == device_id
    }

    /// Build an empty event envelope for `action`.
    #[must_use]
    pub fn prepare_event(&self, action: &str, cause: Cause) -> EventMessage {
        EventMessage::new(&self.id, action, cause)
    }

    /// Forward `event` to the sink.
    ///
    /// Returns `false` when an event with the same name was sent less than
    /// the wait time ago, or when the sink rejects it. A rejected event does
    /// not count against the wait time.
    pub fn send_event(&self, event: EventMessage) -> bool {
        let action = event.action().to_owned();
        let Slot::Reserved { previous } = self.reserve(&action) else {
            tracing::debug!(device_id = %self.id, %action, "event dropped by wait-time filter");
            return false;
        };
        match self.sink.send(event) {
            Ok(()) => {
                tracing::trace!(device_id = %self.id, %action, "event sent");
                true
            }
            Err(err) => {
                self.release(&action, previous);
                tracing::warn!(%err, device_id = %self.id, %action, "failed to send event");
                false
            }
        }
    }

    fn reserve(&self, action: &str) -> Slot {
        let now = Instant::now();
        let mut last_sent = self.lock_last_sent();
        let previous = last_sent.get(action).copied();
        if previous.is_some_and(|last| now.duration_since(last) < self.event_wait_time) {
            return Slot::TooSoon;
        }
        last_sent.insert(action.to_owned(), now);
        Slot::Reserved { previous }
    }

    fn release(&self, action: &str, previous: Option<Instant>) {
        let mut last_sent = self.lock_last_sent();
        match previous {
            Some(last) => last_sent.insert(action.to_owned(), last),
            None => last_sent.remove(action),
        };
    }

    fn lock_last_sent(&self) -> MutexGuard<'_, HashMap<String, Instant>> {
        self.last_sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
