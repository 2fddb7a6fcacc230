//! Shared snapshot of the public menu.
//!
//! The catalog is rebuilt from the database as a whole and swapped in under a write
//! lock, so readers only ever see a complete tree. Each successful refresh broadcasts
//! a readiness event carrying the snapshot generation.

use crate::core::catalog::{MenuCatalog, load_catalog};
use crate::errors::Result;
use sea_orm::DatabaseConnection;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use std::time::Duration;
use tokio::sync::{RwLock, broadcast};
use tracing::{error, info, trace};

/// Holds the current catalog and announces each replacement.
#[derive(Debug)]
pub struct CatalogCache {
    snapshot: RwLock<Option<Arc<MenuCatalog>>>,
    generation: AtomicU64,
    ready: broadcast::Sender<u64>,
}

impl Default for CatalogCache {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogCache {
    #[must_use]
    pub fn new() -> Self {
        let (ready, _) = broadcast::channel(16);
        Self {
            snapshot: RwLock::new(None),
            generation: AtomicU64::new(0),
            ready,
        }
    }

    /// The current catalog, or `None` before the first successful load.
    pub async fn current(&self) -> Option<Arc<MenuCatalog>> {
        self.snapshot.read().await.clone()
    }

    /// Number of snapshots published so far.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Receives one event per published snapshot.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<u64> {
        self.ready.subscribe()
    }

    /// Swaps in `catalog` and signals readiness. Returns the new generation.
    pub async fn publish(&self, catalog: MenuCatalog) -> u64 {
        let mut writer = self.snapshot.write().await;
        *writer = Some(Arc::new(catalog));
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        drop(writer);

        // No subscribers is fine
        let _ = self.ready.send(generation);
        generation
    }

    /// Returns the current catalog, waiting up to `timeout` for the first one.
    pub async fn wait_ready(&self, timeout: Duration) -> Option<Arc<MenuCatalog>> {
        let mut ready = self.subscribe();
        if let Some(catalog) = self.current().await {
            return Some(catalog);
        }

        match tokio::time::timeout(timeout, ready.recv()).await {
            Ok(_) => self.current().await,
            Err(_) => {
                trace!("Catalog not ready after {:?}", timeout);
                None
            }
        }
    }
}

/// Reloads the catalog from the database and publishes it.
///
/// On failure the previous snapshot stays in place.
pub async fn refresh_catalog(
    db: &DatabaseConnection,
    cache: &CatalogCache,
    placeholder_image: &str,
) -> Result<usize> {
    info!("Refreshing menu catalog...");
    let catalog = match load_catalog(db, placeholder_image).await {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("DB error loading menu catalog: {}", e);
            return Err(e);
        }
    };

    let items = catalog.item_count();
    let generation = cache.publish(catalog).await;
    info!(
        "Menu catalog refreshed with {} items (generation {}).",
        items, generation
    );
    Ok(items)
}
