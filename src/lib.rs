//! # Form Store
//!
//! Bridges a handle-based form validation engine to a pull-based renderer
//! that wants referentially stable snapshots and change subscriptions.
//!
//! ## Core Concepts
//!
//! - **Slots**: Append-only arena of values addressed by integer handles
//! - **Handle protocol**: `create`/`get`/`set`, the only way an engine
//!   touches its state; every `set` invalidates and notifies
//! - **Subscriptions**: Copy-on-write listener registry, safe to mutate
//!   from inside a notification
//! - **Snapshots**: Rebuilt lazily after a write, otherwise the same `Rc`
//!
//! ## Example
//!
//! ```ignore
//! use formstore::{FieldSchema, FormStore, Schema, SchemaEngine};
//!
//! let schema = Schema::new()
//!     .field("name", FieldSchema::string().min_length(3, "3!"))
//!     .field("age", FieldSchema::number().min(18.0, "18!"));
//! let store = FormStore::new(&SchemaEngine, schema, None)?;
//!
//! let sub = store.subscribe(|| println!("form changed"));
//!
//! let snapshot = store.get_snapshot();
//! snapshot.assign("name", "test")?;
//! snapshot.validate()?;
//!
//! assert!(!Rc::ptr_eq(&snapshot, &store.get_snapshot()));
//! sub.unsubscribe();
//! ```

pub mod engine;
pub mod error;
pub mod slots;
pub mod snapshot;
pub mod store;
pub mod subscriptions;
pub mod types;
pub mod value;

// Re-exports
pub use engine::{
    FieldKind, FieldSchema, FormContext, FormEngine, FormHandles, Rule, Schema, SchemaEngine,
};
pub use error::{Result, StoreError};
pub use slots::{HandleProtocol, Slot, SlotStore};
pub use snapshot::{Snapshot, SnapshotCache};
pub use store::{FormStore, StoreConfig};
pub use subscriptions::{
    ChannelSubscription, DropReason, ListenerPanicPolicy, StoreEvent, Subscription,
    SubscriptionConfig, SubscriptionManager,
};
pub use types::{Handle, SubscriptionId, Version};
pub use value::Value;
