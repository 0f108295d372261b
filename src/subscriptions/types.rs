//! Subscription types for store change notifications.

use crate::types::{SubscriptionId, Version};
use serde::{Deserialize, Serialize};
use std::rc::Weak;

use super::manager::SubscriptionManager;

/// Configuration for a channel subscription.
#[derive(Clone, Debug)]
pub struct SubscriptionConfig {
    /// Max buffered `Changed` events before dropping subscriber.
    /// Default: 1000
    pub buffer_size: usize,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self { buffer_size: 1000 }
    }
}

/// What a notification pass does after a listener panics.
///
/// Either way, the remaining listeners of the pass still run and the
/// failure is logged.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ListenerPanicPolicy {
    /// Resume the first panic once every listener has run.
    #[default]
    Propagate,
    /// Swallow the panic.
    Continue,
}

/// Events delivered to channel subscribers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreEvent {
    /// A slot was written; `version` is the one that write produced.
    Changed { version: Version },

    /// Subscription was dropped. Always the last event on an overflowed
    /// channel.
    Dropped { reason: DropReason },
}

/// Why a channel subscription was dropped.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Send buffer overflowed (slow consumer).
    BufferOverflow,
    /// Receiver was dropped.
    Disconnected,
}

/// Registration returned by `subscribe`.
///
/// Dropping it leaves the listener registered.
#[must_use = "call unsubscribe() to stop receiving notifications"]
pub struct Subscription {
    pub id: SubscriptionId,
    manager: Weak<SubscriptionManager>,
}

impl Subscription {
    pub(crate) fn new(id: SubscriptionId, manager: Weak<SubscriptionManager>) -> Self {
        Self { id, manager }
    }

    /// Remove exactly this registration.
    ///
    /// Safe to call from inside a listener; the pass in progress still sees
    /// the listener list it started with.
    pub fn unsubscribe(self) {
        if let Some(manager) = self.manager.upgrade() {
            manager.unsubscribe(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

/// Subscription that forwards change events into a bounded channel.
#[must_use = "call unsubscribe() to stop receiving events"]
pub struct ChannelSubscription {
    subscription: Subscription,
    /// Channel to receive events.
    pub receiver: crossbeam_channel::Receiver<StoreEvent>,
}

impl ChannelSubscription {
    pub(crate) fn new(
        subscription: Subscription,
        receiver: crossbeam_channel::Receiver<StoreEvent>,
    ) -> Self {
        Self {
            subscription,
            receiver,
        }
    }

    pub fn id(&self) -> SubscriptionId {
        self.subscription.id
    }

    /// Try to receive an event (non-blocking).
    pub fn try_recv(&self) -> Result<StoreEvent, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Receive with timeout.
    pub fn recv_timeout(
        &self,
        timeout: std::time::Duration,
    ) -> Result<StoreEvent, crossbeam_channel::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }

    /// Drain every event currently buffered.
    pub fn drain(&self) -> Vec<StoreEvent> {
        self.receiver.try_iter().collect()
    }

    pub fn unsubscribe(self) {
        self.subscription.unsubscribe();
    }
}
