use std::collections::VecDeque;

use serde_json::Value as JsonValue;

/// Default bound on events held while nobody is subscribed.
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Who produced a content unit.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Provenance {
    pub producer: String,
    pub version: String,
}

impl Default for Provenance {
    fn default() -> Self {
        Self {
            producer: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Normalized record carried on the bus.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ContentUnit {
    /// Assigned by the bus on publish (`cu-<n>`).
    pub id: String,
    pub kind: String,
    pub modality: String,
    pub source: String,
    pub context: JsonValue,
    pub payload: JsonValue,
    pub provenance: Provenance,
}

impl ContentUnit {
    pub fn new(kind: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            kind: kind.into(),
            modality: "visual".to_string(),
            source: source.into(),
            context: JsonValue::Null,
            payload: JsonValue::Null,
            provenance: Provenance::default(),
        }
    }

    pub fn with_modality(mut self, modality: impl Into<String>) -> Self {
        self.modality = modality.into();
        self
    }

    pub fn with_context(mut self, context: JsonValue) -> Self {
        self.context = context;
        self
    }

    pub fn with_payload(mut self, payload: JsonValue) -> Self {
        self.payload = payload;
        self
    }
}

pub type Subscriber = Box<dyn FnMut(&ContentUnit)>;

/// Queue-until-subscribed pub/sub for content units.
///
/// While there are no subscribers, published units wait in a bounded queue (oldest
/// dropped first). The first subscriber receives the queued backlog in publish order.
pub struct EventBus {
    capacity: usize,
    pending: VecDeque<ContentUnit>,
    subscribers: Vec<Subscriber>,
    next_id: u64,
    dropped: u64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_QUEUE_CAPACITY)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("capacity", &self.capacity)
            .field("pending", &self.pending.len())
            .field("subscribers", &self.subscribers.len())
            .field("dropped", &self.dropped)
            .finish()
    }
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            pending: VecDeque::with_capacity(capacity.min(1024)),
            subscribers: Vec::new(),
            next_id: 0,
            dropped: 0,
        }
    }

    /// Publish `unit`, returning the id assigned to it.
    pub fn publish(&mut self, mut unit: ContentUnit) -> String {
        self.next_id += 1;
        unit.id = format!("cu-{}", self.next_id);
        let id = unit.id.clone();

        if self.subscribers.is_empty() {
            if self.capacity == 0 {
                self.dropped += 1;
                return id;
            }
            if self.pending.len() >= self.capacity {
                self.pending.pop_front();
                self.dropped += 1;
                tracing::warn!(
                    capacity = self.capacity,
                    "event queue full; dropped oldest unit"
                );
            }
            self.pending.push_back(unit);
        } else {
            for sub in &mut self.subscribers {
                sub(&unit);
            }
        }
        id
    }

    /// Attach a subscriber; any queued units are delivered to it first.
    pub fn subscribe(&mut self, mut subscriber: impl FnMut(&ContentUnit) + 'static) {
        for unit in self.pending.drain(..) {
            subscriber(&unit);
        }
        self.subscribers.push(Box::new(subscriber));
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Units lost to the queue bound since the bus was created.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
#[path = "../tests/unit/events.rs"]
mod tests;
