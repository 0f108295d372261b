//! The seam between the store and a validation engine.
//!
//! An engine is initialised once per [`FormStore`](crate::FormStore) with a
//! [`HandleProtocol`], a schema and optional initial data. From then on it
//! keeps all of its state in slots reached through that protocol. The store
//! only needs to know which three handles hold the form, the form errors and
//! the validity flag.
//!
//! [`SchemaEngine`] is a small reference engine with string and number
//! fields and minimum rules.

mod form;
mod schema;

pub use form::{FormContext, SchemaEngine};
pub use schema::{FieldKind, FieldSchema, Rule, Schema};

use crate::error::Result;
use crate::slots::HandleProtocol;
use crate::types::Handle;
use crate::value::Value;

/// The three well-known handles every engine context exposes.
pub trait FormHandles {
    /// Slot holding the per-field `{value, error}` map.
    fn form_handle(&self) -> Handle;
    /// Slot holding the list of form-level error messages.
    fn form_errors_handle(&self) -> Handle;
    /// Slot holding the validity flag.
    fn valid_handle(&self) -> Handle;
}

/// A validation engine that stores its state behind handles.
pub trait FormEngine {
    type Schema;
    type Context: FormHandles + 'static;

    /// Allocate and populate the engine's slots. Called exactly once per
    /// store.
    fn init(
        &self,
        reactive: &HandleProtocol,
        schema: Self::Schema,
        initial: Option<Value>,
    ) -> Result<Self::Context>;
}
