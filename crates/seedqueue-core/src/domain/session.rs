//! Storage session and the opaque collaborator handles an entry keeps alive.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// The artifact's storage session, identified by its on-disk directory name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StorageSession {
    directory_name: String,
}

impl StorageSession {
    pub fn new(directory_name: impl Into<String>) -> Self {
        Self {
            directory_name: directory_name.into(),
        }
    }

    pub fn directory_name(&self) -> &str {
        &self.directory_name
    }
}

impl fmt::Display for StorageSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.directory_name)
    }
}

/// Type-erased shared handle to a collaborator the entry does not inspect.
#[derive(Clone)]
pub struct OpaqueHandle(Arc<dyn Any + Send + Sync>);

impl OpaqueHandle {
    pub fn new<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self(value)
    }

    /// Recover the concrete handle, if it is a `T`.
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.0).downcast::<T>().ok()
    }
}

impl fmt::Debug for OpaqueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("OpaqueHandle(..)")
    }
}

/// Authentication/session services created alongside the worker.
///
/// They are optional: they are only created when the queue needs them.
#[derive(Debug, Clone, Default)]
pub struct SessionServices {
    pub authentication: Option<OpaqueHandle>,
    pub session_service: Option<OpaqueHandle>,
    pub profile_repository: Option<OpaqueHandle>,
    pub user_cache: Option<OpaqueHandle>,
}
