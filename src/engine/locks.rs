//! Per-object locks
//!
//! Serializes correction and fix list writes for the same file id while
//! letting different files proceed concurrently.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::storage::FileId;

#[derive(Default)]
pub struct ObjectLocks {
    locks: Mutex<HashMap<FileId, Arc<AsyncMutex<()>>>>,
}

/// Held while one engine operation works on a file id
pub struct ObjectGuard<'a> {
    registry: &'a ObjectLocks,
    id: FileId,
    guard: Option<OwnedMutexGuard<()>>,
}

impl ObjectLocks {
    pub async fn acquire(&self, id: FileId) -> ObjectGuard<'_> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(|p| p.into_inner());
            Arc::clone(locks.entry(id).or_default())
        };
        let guard = lock.lock_owned().await;
        ObjectGuard {
            registry: self,
            id,
            guard: Some(guard),
        }
    }

    /// Number of file ids with a live lock entry
    pub fn active(&self) -> usize {
        self.locks.lock().unwrap_or_else(|p| p.into_inner()).len()
    }
}

impl Drop for ObjectGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = self.registry.locks.lock().unwrap_or_else(|p| p.into_inner());
        // Nobody else holds or waits on it
        if locks
            .get(&self.id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.id);
        }
    }
}
