//! Main FormStore struct tying all components together.

use crate::engine::{FormEngine, FormHandles};
use crate::error::Result;
use crate::slots::HandleProtocol;
use crate::snapshot::{Snapshot, SnapshotCache};
use crate::subscriptions::{
    ChannelSubscription, ListenerPanicPolicy, Subscription, SubscriptionConfig,
};
use crate::types::Version;
use crate::value::Value;
use std::rc::Rc;
use tracing::info;

/// Store configuration.
#[derive(Clone, Debug)]
pub struct StoreConfig {
    /// Slots to reserve up front.
    pub slot_capacity: usize,

    /// What a notification pass does after a listener panics.
    pub listener_panics: ListenerPanicPolicy,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            slot_capacity: 16,
            listener_panics: ListenerPanicPolicy::default(),
        }
    }
}

/// External store over one engine instance.
///
/// Exposes the two operations a pull-based renderer needs:
/// - [`subscribe`](Self::subscribe) to be told when state changed
/// - [`get_snapshot`](Self::get_snapshot) to read state, referentially stable
///   until the next write
///
/// Every store owns its own slots, listeners and cache; nothing is shared
/// between stores.
pub struct FormStore<C> {
    reactive: HandleProtocol,
    cache: SnapshotCache<C>,
}

impl<C: FormHandles> FormStore<C> {
    /// Create a store and initialise `engine` against it.
    pub fn new<E>(engine: &E, schema: E::Schema, initial: Option<Value>) -> Result<Self>
    where
        E: FormEngine<Context = C>,
    {
        Self::with_config(engine, schema, initial, StoreConfig::default())
    }

    pub fn with_config<E>(
        engine: &E,
        schema: E::Schema,
        initial: Option<Value>,
        config: StoreConfig,
    ) -> Result<Self>
    where
        E: FormEngine<Context = C>,
    {
        let reactive = HandleProtocol::with_config(&config);
        let context = engine.init(&reactive, schema, initial)?;

        // Snapshot reads cannot fail once these are known to be in range
        for handle in [
            context.form_handle(),
            context.form_errors_handle(),
            context.valid_handle(),
        ] {
            reactive.get(handle)?;
        }

        info!(slots = reactive.len(), "form store created");
        Ok(Self {
            cache: SnapshotCache::new(reactive.clone(), Rc::new(context)),
            reactive,
        })
    }

    /// Register a change listener, invoked synchronously after every write.
    pub fn subscribe<F>(&self, on_change: F) -> Subscription
    where
        F: Fn() + 'static,
    {
        self.reactive.subscribe(on_change)
    }

    /// Register a bounded channel that receives a [`StoreEvent`] per write.
    ///
    /// [`StoreEvent`]: crate::subscriptions::StoreEvent
    pub fn subscribe_channel(&self, config: SubscriptionConfig) -> ChannelSubscription {
        self.reactive.subscribe_channel(config)
    }

    /// Current snapshot. Returns the same `Rc` until the next write.
    pub fn get_snapshot(&self) -> Rc<Snapshot<C>> {
        self.cache.get()
    }

    pub fn subscription_count(&self) -> usize {
        self.reactive.subscription_count()
    }

    /// Writes performed so far, including engine initialisation.
    pub fn version(&self) -> Version {
        self.reactive.version()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{FieldSchema, Schema, SchemaEngine};
    use crate::error::StoreError;
    use crate::types::Handle;
    use std::cell::Cell;

    fn schema() -> Schema {
        Schema::new()
            .field("name", FieldSchema::string())
            .field("age", FieldSchema::number())
    }

    #[test]
    fn test_first_snapshot_reflects_init() {
        let store = FormStore::new(&SchemaEngine, schema(), None).unwrap();
        let snapshot = store.get_snapshot();

        assert_eq!(snapshot.form.get("name").unwrap().get("value"), Some(&Value::from("")));
        assert!(!snapshot.valid);
        assert_eq!(snapshot.version, store.version());
    }

    #[test]
    fn test_snapshot_stable_without_writes() {
        let store = FormStore::new(&SchemaEngine, schema(), None).unwrap();
        let a = store.get_snapshot();
        let b = store.get_snapshot();
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_engine_ops_through_snapshot() {
        let store = FormStore::new(&SchemaEngine, schema(), None).unwrap();
        let before = store.get_snapshot();

        before.assign("name", "x").unwrap();
        let after = store.get_snapshot();

        assert!(!Rc::ptr_eq(&before, &after));
        assert_eq!(after.value("name").unwrap(), Value::from("x"));
    }

    #[test]
    fn test_stores_are_isolated() {
        let a = FormStore::new(&SchemaEngine, schema(), None).unwrap();
        let b = FormStore::new(&SchemaEngine, schema(), None).unwrap();

        let calls = Rc::new(Cell::new(0));
        let _sub = {
            let calls = Rc::clone(&calls);
            b.subscribe(move || calls.set(calls.get() + 1))
        };

        let b_before = b.get_snapshot();
        a.get_snapshot().assign("name", "only a").unwrap();

        assert_eq!(calls.get(), 0);
        assert!(Rc::ptr_eq(&b_before, &b.get_snapshot()));
        assert_eq!(b.get_snapshot().value("name").unwrap(), Value::from(""));
    }

    struct BrokenEngine;

    struct BrokenHandles;

    impl FormHandles for BrokenHandles {
        fn form_handle(&self) -> Handle {
            Handle(0)
        }
        fn form_errors_handle(&self) -> Handle {
            Handle(1)
        }
        fn valid_handle(&self) -> Handle {
            Handle(99)
        }
    }

    impl FormEngine for BrokenEngine {
        type Schema = ();
        type Context = BrokenHandles;

        fn init(&self, reactive: &HandleProtocol, _: (), _: Option<Value>) -> Result<BrokenHandles> {
            reactive.create();
            reactive.create();
            Ok(BrokenHandles)
        }
    }

    #[test]
    fn test_foreign_handle_rejected_at_construction() {
        let result = FormStore::new(&BrokenEngine, (), None);
        assert!(matches!(
            result,
            Err(StoreError::OutOfBounds { handle: Handle(99), len: 2 })
        ));
    }
}
