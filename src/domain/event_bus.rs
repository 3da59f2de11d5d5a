//! Broadcast channel for catalog notifications.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. The
//! registration service publishes a [`CatalogEvent`] after every
//! successful write, and each WebSocket connection subscribes once.

use tokio::sync::broadcast;

use super::CatalogEvent;

/// Broadcast bus for [`CatalogEvent`]s.
///
/// When the ring buffer is full, the oldest notifications are dropped for
/// lagging receivers.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<CatalogEvent>,
}

impl EventBus {
    /// Creates a new `EventBus` with the given channel capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes a notification to all subscribers.
    ///
    /// Returns the number of receivers that got it; zero when nobody is
    /// listening.
    pub fn publish(&self, event: CatalogEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Creates a new receiver for all future notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CatalogEvent> {
        self.sender.subscribe()
    }

    /// Returns the current number of active receivers.
    #[must_use]
    pub fn receiver_count(&self) -> usize {
        self.sender.receiver_count()
    }
}
