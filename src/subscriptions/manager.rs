//! Copy-on-write listener registry.

use crate::types::{SubscriptionId, Version};
use crossbeam_channel::{bounded, TrySendError};
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use tracing::{debug, error};

use super::types::{
    ChannelSubscription, DropReason, ListenerPanicPolicy, StoreEvent, Subscription,
    SubscriptionConfig,
};

/// Receives the version produced by the write being announced.
type Listener = Rc<dyn Fn(Version)>;

#[derive(Clone)]
struct Entry {
    id: SubscriptionId,
    listener: Listener,
}

/// Manages listeners and runs notification passes.
///
/// The active list is an immutable `Rc<Vec<_>>`. Subscribing or
/// unsubscribing installs a rebuilt list, so a pass that is already iterating
/// keeps its own copy and is never disturbed by listeners that add or remove
/// registrations.
pub struct SubscriptionManager {
    listeners: RefCell<Rc<Vec<Entry>>>,
    /// Counter for generating subscription IDs.
    next_id: Cell<u64>,
    panic_policy: ListenerPanicPolicy,
}

impl SubscriptionManager {
    pub fn new(panic_policy: ListenerPanicPolicy) -> Self {
        Self {
            listeners: RefCell::new(Rc::new(Vec::new())),
            next_id: Cell::new(1),
            panic_policy,
        }
    }

    /// Register a listener. Each call is a separate registration, even for
    /// the same closure.
    pub fn subscribe<F>(self: &Rc<Self>, listener: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        self.register(|_| move |_: Version| listener())
    }

    fn register<F, M>(self: &Rc<Self>, make: M) -> Subscription
    where
        F: Fn(Version) + 'static,
        M: FnOnce(SubscriptionId) -> F,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let entry = Entry {
            id,
            listener: Rc::new(make(id)),
        };

        let mut next = Vec::clone(&self.current());
        next.push(entry);
        *self.listeners.borrow_mut() = Rc::new(next);

        debug!(subscription = id.0, "listener subscribed");
        Subscription::new(id, Rc::downgrade(self))
    }

    /// Register a listener that forwards one [`StoreEvent::Changed`] per
    /// write into a bounded channel.
    ///
    /// The channel holds one slot beyond `buffer_size`, kept free for the
    /// final [`StoreEvent::Dropped`]. A full or disconnected channel removes
    /// its own registration.
    pub fn subscribe_channel(self: &Rc<Self>, config: SubscriptionConfig) -> ChannelSubscription {
        let capacity = config.buffer_size.max(1);
        let (sender, receiver) = bounded(capacity + 1);
        let manager = Rc::downgrade(self);

        let subscription = self.register(move |id| {
            move |version: Version| {
                let reason = if sender.len() >= capacity {
                    DropReason::BufferOverflow
                } else {
                    match sender.try_send(StoreEvent::Changed { version }) {
                        Ok(()) => return,
                        Err(TrySendError::Full(_)) => DropReason::BufferOverflow,
                        Err(TrySendError::Disconnected(_)) => DropReason::Disconnected,
                    }
                };

                debug!(subscription = id.0, ?reason, "dropping channel subscriber");
                let _ = sender.try_send(StoreEvent::Dropped { reason });
                if let Some(manager) = manager.upgrade() {
                    manager.unsubscribe(id);
                }
            }
        });

        ChannelSubscription::new(subscription, receiver)
    }

    /// Remove a registration. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let current = self.current();
        if !current.iter().any(|e| e.id == id) {
            return false;
        }

        let next: Vec<Entry> = current.iter().filter(|e| e.id != id).cloned().collect();
        *self.listeners.borrow_mut() = Rc::new(next);

        debug!(subscription = id.0, "listener unsubscribed");
        true
    }

    /// Get subscription count.
    pub fn subscription_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    /// Invoke every registered listener in registration order, announcing
    /// the write that produced `version`.
    ///
    /// A panicking listener does not stop the pass. Returns the number of
    /// listeners invoked.
    pub fn notify(&self, version: Version) -> usize {
        let listeners = self.current();
        let mut first_panic: Option<Box<dyn Any + Send>> = None;

        for entry in listeners.iter() {
            let result = panic::catch_unwind(AssertUnwindSafe(|| (entry.listener)(version)));
            if let Err(payload) = result {
                error!(
                    subscription = entry.id.0,
                    panic = panic_message(payload.as_ref()),
                    "listener panicked during notification"
                );
                first_panic.get_or_insert(payload);
            }
        }

        if let Some(payload) = first_panic {
            if self.panic_policy == ListenerPanicPolicy::Propagate {
                panic::resume_unwind(payload);
            }
        }

        listeners.len()
    }

    fn current(&self) -> Rc<Vec<Entry>> {
        Rc::clone(&self.listeners.borrow())
    }
}

impl Default for SubscriptionManager {
    fn default() -> Self {
        Self::new(ListenerPanicPolicy::default())
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
