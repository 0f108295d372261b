//! Core identifier types for the form store.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer naming a slot in a [`SlotStore`](crate::slots::SlotStore).
///
/// Handles are issued densely from zero by `create` and stay valid for the
/// lifetime of the store that issued them. The engine may hand back any
/// integer, so the raw value is signed and checked on every access.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Handle(pub i64);

impl Handle {
    /// Slot index for this handle, if it addresses one of `len` slots.
    pub fn index(self, len: usize) -> Option<usize> {
        usize::try_from(self.0).ok().filter(|&i| i < len)
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Handle({})", self.0)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a subscription.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Number of successful writes a store has seen.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub struct Version(pub u64);

impl Version {
    pub fn next(self) -> Self {
        Version(self.0 + 1)
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Version({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_index_bounds() {
        assert_eq!(Handle(0).index(1), Some(0));
        assert_eq!(Handle(2).index(3), Some(2));
        assert_eq!(Handle(3).index(3), None);
        assert_eq!(Handle(-1).index(3), None);
        assert_eq!(Handle(0).index(0), None);
        assert_eq!(Handle(i64::MIN).index(usize::MAX), None);
    }

    #[test]
    fn test_version_next() {
        assert_eq!(Version::default().next(), Version(1));
    }
}
