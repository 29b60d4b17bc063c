//! Per-product write serialization.
//!
//! Two edits to different products may proceed fully in parallel; two edits
//! to the same product must not interleave their read-diff-write sequence.
//! The registry hands out one lock per product id; it grows with the set of
//! distinct ids, which is bounded by catalog size.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Registry of per-product write locks.
#[derive(Debug, Default)]
pub struct EntityLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl EntityLocks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get (or create) the lock handle for a product id.
    ///
    /// The caller locks the returned handle for the duration of its
    /// read-diff-write sequence.
    pub fn handle(&self, product_id: &str) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        map.entry(product_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
