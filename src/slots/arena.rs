//! Append-only slot arena.

use crate::error::{Result, StoreError};
use crate::types::Handle;
use crate::value::Value;
use tracing::trace;

/// A single storage cell.
#[derive(Clone, Debug, PartialEq)]
pub struct Slot {
    pub index: usize,
    pub value: Value,
}

/// Indexed sequence of slots. Slots are never removed or reused.
#[derive(Debug, Default)]
pub struct SlotStore {
    slots: Vec<Slot>,
}

impl SlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Append a slot holding `Value::Null` and return its handle.
    pub fn allocate(&mut self) -> Handle {
        let index = self.slots.len();
        self.slots.push(Slot {
            index,
            value: Value::Null,
        });
        trace!(index, "slot allocated");
        Handle(index as i64)
    }

    /// Current value of a slot.
    pub fn read(&self, handle: Handle) -> Result<&Value> {
        let index = self.index_of(handle)?;
        Ok(&self.slots[index].value)
    }

    /// Replace a slot's value.
    ///
    /// Lists and maps are stored as shallow copies so the store never shares
    /// a top-level container with the caller.
    pub fn write(&mut self, handle: Handle, value: Value) -> Result<()> {
        let index = self.index_of(handle)?;
        self.slots[index].value = value.shallow_copy();
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterate slots in handle order.
    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    fn index_of(&self, handle: Handle) -> Result<usize> {
        let len = self.slots.len();
        handle
            .index(len)
            .ok_or(StoreError::OutOfBounds { handle, len })
    }
}
