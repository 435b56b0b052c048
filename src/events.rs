// src/events.rs

//! Status change notifications.
//!
//! Every status change made through the canvas is published on a
//! [`StatusBus`]. Observers (the live-region announcer, tests) subscribe
//! instead of inspecting node classes.

use tokio::sync::broadcast;
use tracing::debug;

use crate::services::CanvasServices;
use crate::types::{NodeId, TaskStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChanged {
    pub task: NodeId,
    pub title: String,
    pub from: TaskStatus,
    pub to: TaskStatus,
}

/// Broadcast channel for [`StatusChanged`] events.
#[derive(Debug, Clone)]
pub struct StatusBus {
    tx: broadcast::Sender<StatusChanged>,
}

impl Default for StatusBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl StatusBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self { tx }
    }

    /// Publish an event. Having no subscribers is fine.
    pub fn publish(&self, event: StatusChanged) {
        if self.tx.send(event).is_err() {
            debug!("status change published with no subscribers");
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StatusChanged> {
        self.tx.subscribe()
    }
}

/// Turns status events into live-region announcements.
#[derive(Debug)]
pub struct StatusAnnouncer {
    rx: broadcast::Receiver<StatusChanged>,
}

impl StatusAnnouncer {
    pub fn new(bus: &StatusBus) -> Self {
        Self { rx: bus.subscribe() }
    }

    /// Announce every event received since the last call. Returns how many
    /// were announced.
    pub fn drain(&mut self, services: &dyn CanvasServices) -> usize {
        let mut count = 0;
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    services.announce(&format!("{} is now {}", event.title, event.to));
                    count += 1;
                }
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "status announcer lagged; older events dropped");
                }
                Err(_) => break,
            }
        }
        count
    }
}
