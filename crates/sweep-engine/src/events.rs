use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use sweep_types::ItemId;
use tokio::sync::broadcast;

/// Tells sibling components which items a batch changed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEvent {
    /// Event name, e.g. `images.delete_success`.
    pub name: String,
    pub ids: Vec<ItemId>,
}

impl BatchEvent {
    pub fn new(name: impl Into<String>, ids: Vec<ItemId>) -> Self {
        Self {
            name: name.into(),
            ids,
        }
    }
}

/// Fire-and-forget sink for batch events.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &BatchEvent);
}

/// Filter for subscribing to a subset of batch events.
#[derive(Clone, Debug, Default)]
pub struct EventFilter {
    /// If set, only events with one of these names are delivered.
    pub names: Option<Vec<String>>,
}

impl EventFilter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            names: Some(vec![name.into()]),
        }
    }

    /// Returns `true` if the given event matches this filter.
    pub fn matches(&self, event: &BatchEvent) -> bool {
        match &self.names {
            Some(names) => names.iter().any(|n| *n == event.name),
            None => true,
        }
    }
}

/// A broadcast channel receiver for batch events.
pub type EventStream = broadcast::Receiver<BatchEvent>;

/// Internal subscriber: a filter paired with a broadcast sender.
struct Subscriber {
    filter: EventFilter,
    sender: broadcast::Sender<BatchEvent>,
}

/// Fan-out bus that delivers events to matching subscribers.
pub struct EventBus {
    subscribers: RwLock<Vec<Subscriber>>,
    capacity: usize,
}

impl EventBus {
    /// `capacity` bounds how many undelivered events each subscriber keeps.
    pub fn new(capacity: usize) -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
            capacity: capacity.max(1),
        }
    }

    /// Register a new subscriber with the given filter.
    pub fn subscribe(&self, filter: EventFilter) -> EventStream {
        let (tx, rx) = broadcast::channel(self.capacity);
        self.subscribers
            .write()
            .expect("event bus lock poisoned")
            .push(Subscriber { filter, sender: tx });
        rx
    }

    /// Number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .expect("event bus lock poisoned")
            .len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl EventSink for EventBus {
    /// Route an event to all matching subscribers.
    /// Subscribers whose receivers were dropped are pruned.
    fn emit(&self, event: &BatchEvent) {
        let mut subs = self.subscribers.write().expect("event bus lock poisoned");
        subs.retain(|sub| {
            if sub.filter.matches(event) {
                sub.sender.send(event.clone()).is_ok()
            } else {
                sub.sender.receiver_count() > 0
            }
        });
    }
}

/// Records emitted events in memory, in emission order.
#[derive(Default)]
pub struct MemoryEvents {
    emitted: RwLock<Vec<BatchEvent>>,
}

impl MemoryEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<BatchEvent> {
        self.emitted.read().expect("event log lock poisoned").clone()
    }

    /// Names of the emitted events.
    pub fn names(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.name).collect()
    }
}

impl EventSink for MemoryEvents {
    fn emit(&self, event: &BatchEvent) {
        self.emitted
            .write()
            .expect("event log lock poisoned")
            .push(event.clone());
    }
}
