//! The storage contract.

use async_trait::async_trait;
use flatsheet_core::Sheet;

use crate::error::StoreResult;

/// Fixed logical key the serialized document lives under
pub const DOCUMENT_KEY: &str = "sheet";

/// Durable key-value persistence of one sheet document
///
/// A key that was never written and a key holding an empty document are
/// both valid paths to the same visible state; callers distinguish them
/// through `load` returning `None` versus `Some` of a blank sheet.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync` so a session can share the store
/// behind an `Arc`.
#[async_trait]
pub trait SheetStore: Send + Sync {
    /// Read the document, `None` if the key was never written
    async fn load(&self) -> StoreResult<Option<Sheet>>;

    /// Write the full document under the fixed key
    async fn save(&self, sheet: &Sheet) -> StoreResult<()>;

    /// Delete the document (reset); idempotent
    async fn remove(&self) -> StoreResult<()>;
}

/// Blanket implementation for Arc<T>
#[async_trait]
impl<T: SheetStore + ?Sized> SheetStore for std::sync::Arc<T> {
    async fn load(&self) -> StoreResult<Option<Sheet>> {
        (**self).load().await
    }

    async fn save(&self, sheet: &Sheet) -> StoreResult<()> {
        (**self).save(sheet).await
    }

    async fn remove(&self) -> StoreResult<()> {
        (**self).remove().await
    }
}
