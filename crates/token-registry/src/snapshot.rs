use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::builder::{BuildFailure, BuildReport, RegistryBuilder};
use crate::index::RegistryIndex;
use crate::record::RawTokenRecord;

/// Process-wide handle to the current registry snapshot.
///
/// Readers take a cheap `Arc` clone and keep using it even if a rebuild
/// swaps in a newer snapshot underneath them; a snapshot is never mutated or
/// invalidated, only replaced. The swap itself is a single guarded pointer
/// assignment, so readers never observe a partially built index.
#[derive(Debug)]
pub struct RegistryHandle {
    current: RwLock<Arc<RegistryIndex>>,
}

impl RegistryHandle {
    pub fn new(index: RegistryIndex) -> Self {
        Self {
            current: RwLock::new(Arc::new(index)),
        }
    }

    /// The current snapshot.
    pub fn load(&self) -> Arc<RegistryIndex> {
        self.read_slot().clone()
    }

    /// Atomically replace the snapshot, returning the previous one.
    pub fn swap(&self, next: RegistryIndex) -> Arc<RegistryIndex> {
        let mut slot = self.write_slot();
        std::mem::replace(&mut *slot, Arc::new(next))
    }

    /// Build a new snapshot from `records` and swap it in. On failure the
    /// current snapshot stays in place untouched.
    pub fn rebuild(
        &self,
        builder: &RegistryBuilder,
        records: &[RawTokenRecord],
    ) -> Result<BuildReport, BuildFailure> {
        let built = builder.build(records)?;
        debug!(indexed = built.report.indexed, "swapping in rebuilt snapshot");
        self.swap(built.index);
        Ok(built.report)
    }

    fn read_slot(&self) -> RwLockReadGuard<'_, Arc<RegistryIndex>> {
        self.current.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_slot(&self) -> RwLockWriteGuard<'_, Arc<RegistryIndex>> {
        self.current.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for RegistryHandle {
    fn default() -> Self {
        Self::new(RegistryIndex::default())
    }
}
