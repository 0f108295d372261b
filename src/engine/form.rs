//! Reference engine: schema-driven form state kept in slots.

use crate::error::{Result, StoreError};
use crate::slots::HandleProtocol;
use crate::types::Handle;
use crate::value::Value;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::debug;

use super::schema::Schema;
use super::{FormEngine, FormHandles};

/// Engine over a [`Schema`].
///
/// Slot layout: form, form errors, validity, then one value slot per field in
/// schema order.
#[derive(Clone, Copy, Debug, Default)]
pub struct SchemaEngine;

impl FormEngine for SchemaEngine {
    type Schema = Schema;
    type Context = FormContext;

    fn init(
        &self,
        reactive: &HandleProtocol,
        schema: Schema,
        initial: Option<Value>,
    ) -> Result<FormContext> {
        let initial = match initial {
            None | Some(Value::Null) => Value::map(),
            Some(data @ Value::Map(_)) => data,
            Some(other) => {
                return Err(StoreError::InvalidInitialData(format!(
                    "expected a map, got {}",
                    other
                )))
            }
        };

        let form = reactive.create();
        let form_errors = reactive.create();
        let valid = reactive.create();

        let mut fields = BTreeMap::new();
        for (name, field) in schema.fields() {
            let handle = reactive.create();
            let value = initial
                .get(name)
                .cloned()
                .unwrap_or_else(|| field.default_value());
            reactive.set(handle, value)?;
            fields.insert(name.to_string(), handle);
        }

        let context = FormContext {
            reactive: reactive.clone(),
            schema: Rc::new(schema),
            form,
            form_errors,
            valid,
            fields,
        };

        context.write_form(|_| Value::from(""))?;
        reactive.set(form_errors, Value::list())?;
        reactive.set(valid, Value::from(false))?;

        debug!(fields = context.fields.len(), "form engine initialised");
        Ok(context)
    }
}

/// Engine state for one form, plus the operations that change it.
#[derive(Clone)]
pub struct FormContext {
    reactive: HandleProtocol,
    schema: Rc<Schema>,
    form: Handle,
    form_errors: Handle,
    valid: Handle,
    fields: BTreeMap<String, Handle>,
}

impl FormContext {
    /// Set a field's value. Does not validate; the field keeps its current
    /// error until the next [`validate`](Self::validate).
    pub fn assign(&self, field: &str, value: impl Into<Value>) -> Result<()> {
        let handle = self
            .field_handle(field)
            .ok_or_else(|| StoreError::UnknownField(field.to_string()))?;
        let value = value.into();

        self.reactive.set(handle, value.clone())?;

        let form = self.reactive.get(self.form)?;
        let error = form
            .get(field)
            .and_then(|entry| entry.get("error"))
            .cloned()
            .unwrap_or_else(|| Value::from(""));

        let mut entries = form.as_map().cloned().unwrap_or_default();
        entries.insert(field.to_string(), field_entry(value, error));
        self.reactive.set(self.form, Value::from(entries))
    }

    /// Check every field against the schema and publish per-field errors,
    /// the form error list and the validity flag. Returns the validity.
    pub fn validate(&self) -> Result<bool> {
        let mut messages = Vec::new();
        let mut errors = BTreeMap::new();

        for (name, field) in self.schema.fields() {
            let value = self.value(name)?;
            if let Some(message) = field.check(&value) {
                messages.push(Value::from(message.as_str()));
                errors.insert(name.to_string(), message);
            }
        }

        let valid = messages.is_empty();
        self.write_form(|name| Value::from(errors.get(name).cloned().unwrap_or_default()))?;
        self.reactive.set(self.form_errors, Value::from(messages))?;
        self.reactive.set(self.valid, Value::from(valid))?;

        debug!(valid, "form validated");
        Ok(valid)
    }

    /// Current value of a field.
    pub fn value(&self, field: &str) -> Result<Value> {
        let handle = self
            .field_handle(field)
            .ok_or_else(|| StoreError::UnknownField(field.to_string()))?;
        self.reactive.get(handle)
    }

    pub fn field_handle(&self, field: &str) -> Option<Handle> {
        self.fields.get(field).copied()
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Rewrite the form slot from the field slots, taking each field's error
    /// from `error_for`.
    fn write_form(&self, error_for: impl Fn(&str) -> Value) -> Result<()> {
        let mut entries = BTreeMap::new();
        for (name, _) in self.schema.fields() {
            let value = self.value(name)?;
            entries.insert(name.to_string(), field_entry(value, error_for(name)));
        }
        self.reactive.set(self.form, Value::from(entries))
    }
}

impl FormHandles for FormContext {
    fn form_handle(&self) -> Handle {
        self.form
    }

    fn form_errors_handle(&self) -> Handle {
        self.form_errors
    }

    fn valid_handle(&self) -> Handle {
        self.valid
    }
}

fn field_entry(value: Value, error: Value) -> Value {
    let mut entry = BTreeMap::new();
    entry.insert("value".to_string(), value);
    entry.insert("error".to_string(), error);
    Value::from(entry)
}
