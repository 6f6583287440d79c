//! Document change notification.
//!
//! The feed stands in for a subtree mutation observer on the host page: whoever mutates
//! the page publishes a [`DocumentChange`], and every subscribed sink is notified.

use std::sync::mpsc::Sender;

use overlay_logging::{overlay_debug, overlay_trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentChange {
    /// Monotonic counter, bumped by every publish.
    pub revision: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

pub trait ChangeSink {
    fn notify(&self, change: &DocumentChange);
}

/// Forwards changes into a message channel, mapped to the receiver's message type.
pub struct ChannelChangeSink<M> {
    tx: Sender<M>,
    map: fn(&DocumentChange) -> M,
}

impl<M> ChannelChangeSink<M> {
    pub fn new(tx: Sender<M>, map: fn(&DocumentChange) -> M) -> Self {
        Self { tx, map }
    }
}

impl<M> ChangeSink for ChannelChangeSink<M> {
    fn notify(&self, change: &DocumentChange) {
        // A closed receiver means the session is gone; nothing left to tell.
        if self.tx.send((self.map)(change)).is_err() {
            overlay_trace!("Change receiver dropped at revision {}", change.revision);
        }
    }
}

#[derive(Default)]
pub struct ChangeFeed {
    sinks: Vec<(SubscriptionId, Box<dyn ChangeSink>)>,
    next_id: u64,
    revision: u64,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, sink: Box<dyn ChangeSink>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.sinks.push((id, sink));
        overlay_debug!("Change subscription {:?} added", id);
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.sinks.len();
        self.sinks.retain(|(existing, _)| *existing != id);
        let removed = self.sinks.len() != before;
        if removed {
            overlay_debug!("Change subscription {:?} removed", id);
        }
        removed
    }

    pub fn publish(&mut self) -> DocumentChange {
        self.revision += 1;
        let change = DocumentChange {
            revision: self.revision,
        };
        for (_, sink) in &self.sinks {
            sink.notify(&change);
        }
        change
    }

    pub fn subscriber_count(&self) -> usize {
        self.sinks.len()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }
}
