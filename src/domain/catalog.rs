//! Process-wide snapshot of mandi price records.

use std::sync::Arc;

use tokio::sync::RwLock;

use super::entities::PriceRecord;

/// Shared, read-mostly price catalog.
///
/// Loaded once at startup and replaced wholesale; readers always see either
/// the previous snapshot or the complete new one, never a partial load. An
/// empty catalog means the load failed (or never ran) and is reported to
/// callers as a distinct not-ready condition by the ranking engine.
#[derive(Default)]
pub struct PriceCatalog {
    records: RwLock<Arc<Vec<PriceRecord>>>,
}

impl PriceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a new snapshot, replacing the previous one atomically.
    pub async fn replace(&self, records: Vec<PriceRecord>) {
        *self.records.write().await = Arc::new(records);
    }

    /// Current snapshot, in registry order.
    pub async fn snapshot(&self) -> Arc<Vec<PriceRecord>> {
        Arc::clone(&*self.records.read().await)
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}
