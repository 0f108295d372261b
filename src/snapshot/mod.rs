//! Cached composite views of form state.
//!
//! A snapshot is rebuilt only after the store version moves past the one it
//! was built at; otherwise the previous `Rc<Snapshot<_>>` is handed out
//! again, so callers can compare snapshots by pointer to detect change.

mod cache;

pub use cache::{Snapshot, SnapshotCache};
