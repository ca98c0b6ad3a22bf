//! In-memory document store for tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use flatsheet_core::Sheet;

use crate::error::{StoreError, StoreResult};
use crate::store::SheetStore;

/// In-memory store with write counting and write-failure injection
///
/// The write counter backs the "N drag moves, one persistence write"
/// property; failure injection exercises the degraded mode where the grid
/// stays authoritative after a rejected write.
#[derive(Default)]
pub struct MemorySheetStore {
    document: RwLock<Option<Sheet>>,
    saves: AtomicUsize,
    fail_writes: AtomicBool,
}

impl MemorySheetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an already-persisted document
    pub fn with_document(sheet: Sheet) -> Self {
        Self {
            document: RwLock::new(Some(sheet)),
            ..Self::default()
        }
    }

    /// How many saves have been accepted
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Make every subsequent save fail (or succeed again)
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of what is currently persisted
    pub fn persisted(&self) -> Option<Sheet> {
        self.document.read().clone()
    }
}

#[async_trait]
impl SheetStore for MemorySheetStore {
    async fn load(&self) -> StoreResult<Option<Sheet>> {
        Ok(self.document.read().clone())
    }

    async fn save(&self, sheet: &Sheet) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::write_rejected("injected write failure"));
        }
        *self.document.write() = Some(sheet.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn remove(&self) -> StoreResult<()> {
        *self.document.write() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_counts_saves() {
        let store = MemorySheetStore::new();
        store.save(&Sheet::empty()).await.unwrap();
        store.save(&Sheet::empty()).await.unwrap();
        assert_eq!(store.save_count(), 2);
    }

    #[tokio::test]
    async fn test_injected_failure_leaves_document_untouched() {
        let store = MemorySheetStore::new();
        let mut sheet = Sheet::empty();
        sheet.name = "kept".into();
        store.save(&sheet).await.unwrap();

        store.set_fail_writes(true);
        sheet.name = "lost".into();
        assert!(store.save(&sheet).await.is_err());

        assert_eq!(store.persisted().unwrap().name, "kept");
        assert_eq!(store.save_count(), 1);
    }
}
