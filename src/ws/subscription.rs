//! Per-connection subscription filter.

use std::collections::HashSet;

use crate::domain::EventId;

/// Wildcard token subscribing to every event.
pub const WILDCARD: &str = "*";

/// Tracks which events a WebSocket client follows.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    event_ids: HashSet<EventId>,
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates an empty filter that matches nothing.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds ids to the filter. [`WILDCARD`] turns on match-all.
    ///
    /// Returns the explicit ids that were added.
    pub fn subscribe(&mut self, ids: &[String]) -> Vec<EventId> {
        let mut added = Vec::new();
        for id in ids {
            if id == WILDCARD {
                self.subscribe_all = true;
            } else {
                let id = EventId::from(id.as_str());
                self.event_ids.insert(id.clone());
                added.push(id);
            }
        }
        added
    }

    /// Removes ids from the filter. [`WILDCARD`] turns off match-all.
    pub fn unsubscribe(&mut self, ids: &[String]) {
        for id in ids {
            if id == WILDCARD {
                self.subscribe_all = false;
            } else {
                self.event_ids.remove(&EventId::from(id.as_str()));
            }
        }
    }

    /// Whether changes to `event_id` should be forwarded.
    #[must_use]
    pub fn matches(&self, event_id: &EventId) -> bool {
        self.subscribe_all || self.event_ids.contains(event_id)
    }

    /// Number of explicitly followed events.
    #[must_use]
    pub fn count(&self) -> usize {
        self.event_ids.len()
    }

    /// Whether match-all is on.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}
