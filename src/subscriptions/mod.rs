//! Change notification for store writes.
//!
//! Listeners are zero-argument callbacks invoked synchronously, in
//! registration order, after every successful slot write. The registry is
//! copy-on-write, so listeners may subscribe or unsubscribe (themselves or
//! others) while a notification pass is running.
//!
//! Subscriptions come in two flavours:
//! - plain callbacks via [`SubscriptionManager::subscribe`]
//! - bounded channel feeds of [`StoreEvent`]s with slow-subscriber dropping
//!
//! # Example
//!
//! ```ignore
//! let manager = Rc::new(SubscriptionManager::default());
//!
//! let sub = manager.subscribe(|| println!("changed"));
//! manager.notify(Version(1));
//! sub.unsubscribe();
//! ```

mod manager;
mod types;

pub use manager::SubscriptionManager;
pub use types::{
    ChannelSubscription, DropReason, ListenerPanicPolicy, StoreEvent, Subscription,
    SubscriptionConfig,
};
