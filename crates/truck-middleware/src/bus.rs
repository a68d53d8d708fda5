//! Headless, topic-based publish/subscribe event bus.
//!
//! Subscribers register a callback against a named topic.  Every call to
//! [`EventBus::publish`] hands the message to each callback currently
//! registered for that topic, exactly once.  Nothing is buffered: a message
//! published while a topic has no subscribers is dropped, and subscribers
//! that register later never see it.
//!
//! # Concurrency
//!
//! The registry lives behind a single mutex.  `publish` copies the matching
//! callbacks out under the lock and invokes them after releasing it, so a
//! callback may subscribe, unsubscribe or publish without deadlocking.
//! Callbacks run synchronously on the publisher's task.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicI32, Ordering};
//! use truck_middleware::EventBus;
//!
//! let bus = EventBus::new();
//! let last = Arc::new(AtomicI32::new(0));
//! let sink = Arc::clone(&last);
//! bus.subscribe("ir.distance", move |msg| sink.store(msg.body, Ordering::SeqCst));
//!
//! assert_eq!(bus.publish("ir.distance", 15), 1);
//! assert_eq!(last.load(Ordering::SeqCst), 15);
//! ```

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::trace;
use truck_types::Message;

/// Callback invoked with every message published on a subscribed topic.
pub type Callback = Arc<dyn Fn(&Message) + Send + Sync>;

/// Identifies one registration on the bus.  Pass it to
/// [`EventBus::unsubscribe`] to remove the callback again.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    topic: String,
    id: u64,
}

impl SubscriptionHandle {
    /// The topic this registration listens on.
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

#[derive(Default)]
struct Registry {
    topics: HashMap<String, Vec<(u64, Callback)>>,
}

/// Shared event bus.  Clone it cheaply: all clones share the same registry.
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
    next_id: Arc<AtomicU64>,
}

impl EventBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `callback` for every future message on `topic`.
    pub fn subscribe<F>(&self, topic: impl Into<String>, callback: F) -> SubscriptionHandle
    where
        F: Fn(&Message) + Send + Sync + 'static,
    {
        let topic = topic.into();
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.lock()
            .topics
            .entry(topic.clone())
            .or_default()
            .push((id, Arc::new(callback)));
        trace!(topic = %topic, id, "subscriber registered");
        SubscriptionHandle { topic, id }
    }

    /// Remove the registration identified by `handle`.
    ///
    /// Returns `false` when the handle was already removed.
    pub fn unsubscribe(&self, handle: &SubscriptionHandle) -> bool {
        let mut registry = self.lock();
        let Some(subscribers) = registry.topics.get_mut(&handle.topic) else {
            return false;
        };
        let before = subscribers.len();
        subscribers.retain(|(id, _)| *id != handle.id);
        let removed = subscribers.len() != before;
        if subscribers.is_empty() {
            registry.topics.remove(&handle.topic);
        }
        removed
    }

    /// Deliver `body` to every callback currently registered on `topic`.
    ///
    /// Returns the number of callbacks invoked.  Returns `0` when nobody is
    /// listening, which is a normal condition rather than an error.
    pub fn publish(&self, topic: &str, body: i32) -> usize {
        let callbacks: Vec<Callback> = match self.lock().topics.get(topic) {
            Some(subscribers) => subscribers.iter().map(|(_, cb)| Arc::clone(cb)).collect(),
            None => Vec::new(),
        };

        if callbacks.is_empty() {
            trace!(topic, body, "published with no subscribers");
            return 0;
        }

        let message = Message::new(topic, body);
        for callback in &callbacks {
            callback(&message);
        }
        callbacks.len()
    }

    /// Number of callbacks currently registered on `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.lock().topics.get(topic).map_or(0, Vec::len)
    }

    // A panicking callback runs outside the lock, so poisoning can only come
    // from a panic inside the registry bookkeeping itself; the map is still
    // consistent in that case.
    fn lock(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.lock();
        let mut topics: Vec<(&String, usize)> = registry
            .topics
            .iter()
            .map(|(topic, subs)| (topic, subs.len()))
            .collect();
        topics.sort();
        f.debug_struct("EventBus").field("topics", &topics).finish()
    }
}
