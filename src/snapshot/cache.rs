//! Version-checked snapshot cache.

use crate::engine::FormHandles;
use crate::slots::HandleProtocol;
use crate::types::{Handle, Version};
use crate::value::Value;
use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;
use tracing::debug;

/// Read-only view of the form at one point in time.
///
/// The three reactive parts are re-read on each rebuild. Everything else
/// comes from the engine context captured at construction and is reachable
/// through `Deref`, so engine operations can be called on any snapshot.
pub struct Snapshot<C> {
    pub form: Value,
    pub form_errors: Value,
    pub valid: bool,
    /// Store version this snapshot was built at.
    pub version: Version,
    context: Rc<C>,
}

impl<C> Snapshot<C> {
    pub fn context(&self) -> &C {
        &self.context
    }

    /// Form-level error messages.
    pub fn errors(&self) -> impl Iterator<Item = &str> {
        self.form_errors
            .as_list()
            .unwrap_or_default()
            .iter()
            .filter_map(Value::as_str)
    }

    /// JSON rendering of the reactive parts.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "form": self.form.to_json(),
            "formErrors": self.form_errors.to_json(),
            "valid": self.valid,
        })
    }
}

impl<C> Deref for Snapshot<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.context
    }
}

impl<C> fmt::Debug for Snapshot<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Snapshot")
            .field("form", &self.form)
            .field("form_errors", &self.form_errors)
            .field("valid", &self.valid)
            .field("version", &self.version)
            .finish_non_exhaustive()
    }
}

/// Holds the last snapshot and rebuilds it only after the store was written.
///
/// Freshness belongs to the cache: each snapshot records the store version it
/// was built at, and a read rebuilds whenever the store has moved past it.
/// Any number of caches can sit over one protocol without interfering.
pub struct SnapshotCache<C> {
    reactive: HandleProtocol,
    context: Rc<C>,
    last: RefCell<Option<Rc<Snapshot<C>>>>,
}

impl<C: FormHandles> SnapshotCache<C> {
    /// The three form handles of `context` must belong to `reactive`;
    /// `FormStore` checks this once at construction and slots are never
    /// removed afterwards.
    pub fn new(reactive: HandleProtocol, context: Rc<C>) -> Self {
        Self {
            reactive,
            context,
            last: RefCell::new(None),
        }
    }

    pub fn context(&self) -> &Rc<C> {
        &self.context
    }

    /// Return the cached snapshot, rebuilding it first if any slot was
    /// written since it was built. The first call always builds.
    pub fn get(&self) -> Rc<Snapshot<C>> {
        let mut last = self.last.borrow_mut();
        if let Some(snapshot) = last.as_ref() {
            if snapshot.version == self.reactive.version() {
                return Rc::clone(snapshot);
            }
        }

        let snapshot = Rc::new(self.build());
        debug!(version = snapshot.version.0, "snapshot rebuilt");

        *last = Some(Rc::clone(&snapshot));
        snapshot
    }

    fn build(&self) -> Snapshot<C> {
        let read = |handle: Handle| self.reactive.get(handle).unwrap_or_default();

        Snapshot {
            form: read(self.context.form_handle()),
            form_errors: read(self.context.form_errors_handle()),
            valid: read(self.context.valid_handle()) == Value::Bool(true),
            version: self.reactive.version(),
            context: Rc::clone(&self.context),
        }
    }
}
