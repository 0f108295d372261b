//! Handle protocol handed to the validation engine.

use crate::error::Result;
use crate::store::StoreConfig;
use crate::subscriptions::{
    ChannelSubscription, Subscription, SubscriptionConfig, SubscriptionManager,
};
use crate::types::{Handle, Version};
use crate::value::Value;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::trace;

use super::arena::SlotStore;

struct Shared {
    slots: RefCell<SlotStore>,
    version: Cell<Version>,
    subscriptions: Rc<SubscriptionManager>,
}

/// `create`/`get`/`set` over one private slot store.
///
/// Cloning yields another handle to the same store; engines keep a clone for
/// as long as they need to read or write. Every successful [`set`] bumps the
/// store version, which is what snapshot caches compare against, and runs a
/// full notification pass before returning. No other path notifies
/// subscribers.
///
/// [`set`]: HandleProtocol::set
#[derive(Clone)]
pub struct HandleProtocol {
    shared: Rc<Shared>,
}

impl HandleProtocol {
    pub fn new() -> Self {
        Self::with_config(&StoreConfig::default())
    }

    pub fn with_config(config: &StoreConfig) -> Self {
        Self {
            shared: Rc::new(Shared {
                slots: RefCell::new(SlotStore::with_capacity(config.slot_capacity)),
                version: Cell::new(Version::default()),
                subscriptions: Rc::new(SubscriptionManager::new(config.listener_panics)),
            }),
        }
    }

    /// Allocate a slot holding `Value::Null`.
    pub fn create(&self) -> Handle {
        self.shared.slots.borrow_mut().allocate()
    }

    /// Read a slot. Fails with `OutOfBounds` for handles this store never
    /// issued.
    pub fn get(&self, handle: Handle) -> Result<Value> {
        self.shared.slots.borrow().read(handle).cloned()
    }

    /// Write a slot, bump the version, and notify every subscriber.
    pub fn set(&self, handle: Handle, value: Value) -> Result<()> {
        self.shared.slots.borrow_mut().write(handle, value)?;

        let version = self.shared.version.get().next();
        self.shared.version.set(version);
        trace!(%handle, version = version.0, "slot written");

        // Slot borrow is released: listeners may read or write again
        self.shared.subscriptions.notify(version);
        Ok(())
    }

    /// Number of slots allocated so far.
    pub fn len(&self) -> usize {
        self.shared.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Writes performed so far.
    pub fn version(&self) -> Version {
        self.shared.version.get()
    }

    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        self.shared.subscriptions.subscribe(listener)
    }

    pub fn subscribe_channel(&self, config: SubscriptionConfig) -> ChannelSubscription {
        self.shared.subscriptions.subscribe_channel(config)
    }

    pub fn subscription_count(&self) -> usize {
        self.shared.subscriptions.subscription_count()
    }
}

impl Default for HandleProtocol {
    fn default() -> Self {
        Self::new()
    }
}
