//! Domain identifiers (strongly-typed IDs).
//!
//! IDs are ULID based and wrapped in a phantom-typed `Id<T>`, so the
//! registry key of a worker can never be confused with another identifier
//! even though both are plain 128-bit values at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use ulid::Ulid;

/// Marker trait for each ID kind.
///
/// Provides the prefix used by `Display` (for example `"worker-"`).
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// Generic ID type.
///
/// `T` only exists at compile time (`PhantomData`), so `Id<T>` has the same
/// size as a bare `Ulid`.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    /// Generate a fresh, time-ordered ID.
    pub fn generate() -> Self {
        Self::from_ulid(Ulid::new())
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

/// Marker for background worker instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Worker {}

impl IdMarker for Worker {
    fn prefix() -> &'static str {
        "worker-"
    }
}

/// Identifier of a worker instance. Also the key of the entry registry.
pub type WorkerId = Id<Worker>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worker_id_display_has_prefix() {
        let ulid = Ulid::new();
        let id = WorkerId::from_ulid(ulid);

        assert_eq!(id.as_ulid(), ulid);
        assert_eq!(id.to_string(), format!("worker-{ulid}"));
    }

    #[test]
    fn generated_ids_are_unique_and_sortable() {
        let id1 = WorkerId::generate();
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = WorkerId::generate();

        assert_ne!(id1, id2);
        assert!(id1 < id2);
    }

    #[test]
    fn worker_id_can_be_serialized() {
        let id = WorkerId::generate();

        let serialized = serde_json::to_string(&id).unwrap();
        let deserialized: WorkerId = serde_json::from_str(&serialized).unwrap();

        assert_eq!(id, deserialized);
    }

    #[test]
    fn phantom_data_does_not_consume_memory() {
        use std::mem::size_of;

        assert_eq!(size_of::<WorkerId>(), size_of::<Ulid>());
    }
}
