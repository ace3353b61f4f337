//! Striped locks serializing node upserts that share an identity.
//!
//! Without a uniqueness constraint, two concurrent `MERGE`s of the same
//! label + property tuple can both create a node. Holding the stripe for a
//! tuple across its `MERGE` makes the match-or-create step atomic for every
//! task of this process.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use jgl_core::intent::NodeIntent;
use tokio::sync::{Mutex, MutexGuard};

/// Default number of stripes.
pub const DEFAULT_STRIPES: usize = 64;

pub struct IdentityLocks {
    stripes: Vec<Mutex<()>>,
}

impl IdentityLocks {
    pub fn new(stripes: usize) -> Self {
        Self {
            stripes: (0..stripes.max(1)).map(|_| Mutex::new(())).collect(),
        }
    }

    /// Wait for the stripe owning `node`'s identity.
    pub async fn lock(&self, node: &NodeIntent) -> MutexGuard<'_, ()> {
        self.stripes[self.stripe(node)].lock().await
    }

    fn stripe(&self, node: &NodeIntent) -> usize {
        let mut hasher = DefaultHasher::new();
        node.hash(&mut hasher);
        (hasher.finish() % self.stripes.len() as u64) as usize
    }
}

impl Default for IdentityLocks {
    fn default() -> Self {
        Self::new(DEFAULT_STRIPES)
    }
}
