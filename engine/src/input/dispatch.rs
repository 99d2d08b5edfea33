//! Input Event Dispatch
//!
//! Explicit publish/subscribe for input edges. Each subscriber gets its own
//! queue; events published while nobody listens are dropped. A consumer
//! drains its queue once per fixed tick, so an edge is seen exactly once.

use std::collections::{HashMap, VecDeque};

use super::InputAction;

/// Handle returned by [`InputDispatcher::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Discrete input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// An edge-triggered action went down
    Pressed(InputAction),
}

/// Per-subscriber event queues.
#[derive(Debug, Default)]
pub struct InputDispatcher {
    next_id: u64,
    queues: HashMap<SubscriptionId, VecDeque<InputEvent>>,
}

impl InputDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber. It only sees events published from now on.
    pub fn subscribe(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.queues.insert(id, VecDeque::new());
        log::debug!("input subscriber {id:?} added");
        id
    }

    /// Remove a subscriber and drop its pending events.
    ///
    /// Returns `false` if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let removed = self.queues.remove(&id).is_some();
        if removed {
            log::debug!("input subscriber {id:?} removed");
        }
        removed
    }

    pub fn is_subscribed(&self, id: SubscriptionId) -> bool {
        self.queues.contains_key(&id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.queues.len()
    }

    /// Queue `event` for every subscriber. Returns how many received it.
    pub fn publish(&mut self, event: InputEvent) -> usize {
        for queue in self.queues.values_mut() {
            queue.push_back(event);
        }
        self.queues.len()
    }

    /// Take all pending events for `id`, oldest first.
    ///
    /// Unknown ids get nothing.
    pub fn drain(&mut self, id: SubscriptionId) -> Vec<InputEvent> {
        self.queues
            .get_mut(&id)
            .map(|queue| queue.drain(..).collect())
            .unwrap_or_default()
    }
}
