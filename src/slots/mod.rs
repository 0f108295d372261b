//! Slot storage and the handle protocol engines use to reach it.
//!
//! Slots live in an append-only arena addressed by dense integer handles.
//! The engine never holds references into the arena; it allocates, reads and
//! writes through a [`HandleProtocol`], and every write invalidates the cached
//! snapshot and notifies subscribers before returning.

mod arena;
mod protocol;

pub use arena::{Slot, SlotStore};
pub use protocol::HandleProtocol;
