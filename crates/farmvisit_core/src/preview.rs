//! Scoped preview resources for staged photos.
//!
//! # Responsibility
//! - Hand out preview ids the view layer can render from.
//! - Release each preview exactly once, when its handle is dropped.
//!
//! # Invariants
//! - A `PreviewHandle` is not clonable; dropping it is the only release path.
//! - Entries never outlive their handle.

use log::debug;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

pub type PreviewId = Uuid;

type PreviewEntries = Arc<Mutex<HashMap<PreviewId, Arc<[u8]>>>>;

/// Registry of live photo previews.
#[derive(Debug, Clone, Default)]
pub struct PreviewStore {
    entries: PreviewEntries,
}

impl PreviewStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `bytes` and returns the owning handle.
    pub fn acquire(&self, bytes: &[u8]) -> PreviewHandle {
        let id = Uuid::new_v4();
        lock(&self.entries).insert(id, Arc::from(bytes));
        debug!(
            "event=preview_acquire module=preview status=ok size={}",
            bytes.len()
        );
        PreviewHandle {
            id,
            entries: Arc::clone(&self.entries),
        }
    }

    /// Bytes of a live preview.
    pub fn get(&self, id: PreviewId) -> Option<Arc<[u8]>> {
        lock(&self.entries).get(&id).cloned()
    }

    pub fn live_count(&self) -> usize {
        lock(&self.entries).len()
    }
}

/// Owner of one preview entry; releases it on drop.
#[derive(Debug)]
pub struct PreviewHandle {
    id: PreviewId,
    entries: PreviewEntries,
}

impl PreviewHandle {
    pub fn id(&self) -> PreviewId {
        self.id
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        if lock(&self.entries).remove(&self.id).is_some() {
            debug!("event=preview_release module=preview status=ok");
        }
    }
}

fn lock(entries: &PreviewEntries) -> MutexGuard<'_, HashMap<PreviewId, Arc<[u8]>>> {
    entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
