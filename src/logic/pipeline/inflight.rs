//! In-flight Deduplication
//!
//! At most one classification in flight per message id. Duplicate
//! suppression is a work-saving measure, not a correctness one:
//! classification is deterministic and idempotent at a given version, so
//! a lost race is harmless.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

/// Shared set of message ids currently being classified
#[derive(Clone, Default)]
pub struct InflightSet {
    inner: Arc<Mutex<HashSet<u64>>>,
}

impl InflightSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a message id. Returns `None` if it is already in flight;
    /// the claim is released when the guard drops.
    pub fn try_begin(&self, id: u64) -> Option<InflightGuard> {
        let mut set = self.inner.lock();
        if set.insert(id) {
            Some(InflightGuard { set: Arc::clone(&self.inner), id })
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

/// RAII claim on one message id
pub struct InflightGuard {
    set: Arc<Mutex<HashSet<u64>>>,
    id: u64,
}

impl Drop for InflightGuard {
    fn drop(&mut self) {
        self.set.lock().remove(&self.id);
    }
}
