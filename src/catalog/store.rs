//! TTL cache over the current catalog snapshot

use std::sync::{Arc, PoisonError, RwLock};
use std::time::{Duration, Instant};

use serde::Serialize;

use super::source::{DocumentKind, DocumentSource, Fetcher, SourceError};
use super::{Catalog, CatalogOrigin, LoaderError};
use crate::config::FigureConfig;

/// Externally visible state of a [`CatalogStore`].
#[derive(Debug, Clone, Serialize)]
pub struct StoreStatus {
    pub origin: CatalogOrigin,
    pub degraded: bool,
    pub items: usize,
    /// Seconds since the snapshot was published
    pub age_secs: u64,
}

#[derive(Debug, Clone)]
struct Snapshot {
    catalog: Arc<Catalog>,
    origin: CatalogOrigin,
    degraded: bool,
    published_at: Instant,
    expires_at: Instant,
}

/// Holds the published catalog and refreshes it from a [`DocumentSource`].
///
/// Readers get an `Arc` snapshot that stays valid across refreshes. The
/// store is never empty: until a load succeeds it serves the seed catalog.
pub struct CatalogStore {
    fetcher: Fetcher,
    config: FigureConfig,
    snapshot: RwLock<Snapshot>,
    /// Most recent catalog loaded from the source
    last_good: RwLock<Option<Arc<Catalog>>>,
}

impl CatalogStore {
    /// Create a store serving the seed catalog until the first refresh.
    pub fn new(source: Arc<dyn DocumentSource>, config: FigureConfig) -> Self {
        let now = Instant::now();
        let snapshot = Snapshot {
            catalog: Arc::new(Catalog::seed(&config)),
            origin: CatalogOrigin::Seed,
            degraded: true,
            published_at: now,
            expires_at: now,
        };
        Self {
            fetcher: Fetcher::new(source),
            config,
            snapshot: RwLock::new(snapshot),
            last_good: RwLock::new(None),
        }
    }

    /// The published catalog, without checking its age.
    pub fn current(&self) -> Arc<Catalog> {
        Arc::clone(&self.read().catalog)
    }

    /// The published catalog, refreshed first when it has expired.
    ///
    /// Degraded snapshots expire after the retry interval instead of the
    /// full TTL.
    pub fn get(&self) -> Arc<Catalog> {
        if Instant::now() >= self.read().expires_at {
            self.refresh();
        }
        self.current()
    }

    /// Load a new catalog from the source and publish it.
    ///
    /// A load fails when either document cannot be fetched; a classification
    /// document that is not configured at all is not a failure. On failure
    /// the last good catalog is republished as degraded, or the seed catalog
    /// when there is none.
    pub fn refresh(&self) -> StoreStatus {
        match self.load() {
            Ok(catalog) => {
                let catalog = Arc::new(catalog);
                *self.last_good.write().unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&catalog));
                self.publish(catalog, CatalogOrigin::Source, false, self.config.catalog.cache_ttl());
            }
            Err(e) => {
                let last_good = self.last_good.read().unwrap_or_else(PoisonError::into_inner).clone();
                let retry = self.config.catalog.retry_after();
                match last_good {
                    Some(catalog) => {
                        tracing::warn!("Catalog refresh failed, keeping previous catalog: {}", e);
                        self.publish(catalog, CatalogOrigin::Cached, true, retry);
                    }
                    None => {
                        tracing::warn!("Catalog load failed, serving seed catalog: {}", e);
                        let seed = Arc::new(Catalog::seed(&self.config));
                        self.publish(seed, CatalogOrigin::Seed, true, retry);
                    }
                }
            }
        }
        self.status()
    }

    pub fn status(&self) -> StoreStatus {
        let snapshot = self.read();
        StoreStatus {
            origin: snapshot.origin,
            degraded: snapshot.degraded,
            items: snapshot.catalog.len(),
            age_secs: snapshot.published_at.elapsed().as_secs(),
        }
    }

    fn load(&self) -> Result<Catalog, LoaderError> {
        let timeout = self.config.catalog.fetch_timeout();
        let figuredata = self.fetcher.fetch(DocumentKind::Figuredata, timeout)?;
        let furnidata = match self.fetcher.fetch(DocumentKind::Furnidata, timeout) {
            Ok(doc) => Some(doc),
            Err(SourceError::NotConfigured(_)) => {
                tracing::debug!("No classification document configured");
                None
            }
            Err(e) => return Err(e.into()),
        };
        Catalog::load(&figuredata, furnidata.as_deref(), &self.config)
    }

    fn publish(&self, catalog: Arc<Catalog>, origin: CatalogOrigin, degraded: bool, ttl: Duration) {
        let now = Instant::now();
        let snapshot = Snapshot { catalog, origin, degraded, published_at: now, expires_at: now + ttl };
        *self.snapshot.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Snapshot> {
        self.snapshot.read().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticSource;
    use crate::models::RarityTier;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    const DOC: &str = r#"<palette id="3"><color id="61" selectable="1"/></palette>
<set id="1" colorable="1" selectable="1"><part id="1" type="ch" colorindex="1"/></set>"#;

    const CLASSIFICATION: &str = r#"{"clothing_ch_1": {"furniline": "nft2024", "name": "Glow Shirt"}}"#;

    /// Source that can be switched off between refreshes
    struct Toggle {
        up: AtomicBool,
    }

    impl DocumentSource for Toggle {
        fn fetch(&self, kind: DocumentKind) -> Result<String, SourceError> {
            match kind {
                DocumentKind::Figuredata if self.up.load(Ordering::SeqCst) => Ok(DOC.to_string()),
                DocumentKind::Figuredata => {
                    Err(SourceError::Unavailable { kind, message: "down".to_string() })
                }
                DocumentKind::Furnidata => Err(SourceError::NotConfigured(kind)),
            }
        }
    }

    #[test]
    fn test_starts_with_seed() {
        let store = CatalogStore::new(Arc::new(StaticSource::unavailable()), FigureConfig::default());
        let status = store.status();
        assert_eq!(status.origin, CatalogOrigin::Seed);
        assert!(status.degraded);
        assert!(!store.current().is_empty());
    }

    #[test]
    fn test_refresh_publishes_source_catalog() {
        let store = CatalogStore::new(Arc::new(StaticSource::new(DOC)), FigureConfig::default());
        let catalog = store.get();
        assert_eq!(catalog.len(), 1);
        let status = store.status();
        assert_eq!(status.origin, CatalogOrigin::Source);
        assert!(!status.degraded);
    }

    #[test]
    fn test_failed_refresh_keeps_last_good() {
        let source = Arc::new(Toggle { up: AtomicBool::new(true) });
        let store = CatalogStore::new(source.clone(), FigureConfig::default());
        store.refresh();
        let before = store.current();

        source.up.store(false, Ordering::SeqCst);
        let status = store.refresh();
        assert_eq!(status.origin, CatalogOrigin::Cached);
        assert!(status.degraded);
        assert!(Arc::ptr_eq(&before, &store.current()));
    }

    #[test]
    fn test_failed_first_load_serves_seed() {
        let store = CatalogStore::new(Arc::new(StaticSource::unavailable()), FigureConfig::default());
        let status = store.refresh();
        assert_eq!(status.origin, CatalogOrigin::Seed);
        assert!(status.degraded);
        assert!(store.current().item("ch", "3001").is_some());
    }

    #[test]
    fn test_readers_keep_their_snapshot() {
        let source = Arc::new(Toggle { up: AtomicBool::new(false) });
        let store = CatalogStore::new(source.clone(), FigureConfig::default());
        let seed = store.current();

        source.up.store(true, Ordering::SeqCst);
        store.refresh();
        assert_eq!(store.current().len(), 1);
        assert!(seed.item("hd", "190").is_some());
    }

    #[test]
    fn test_unusable_document_is_a_failed_load() {
        let store = CatalogStore::new(Arc::new(StaticSource::new("Service Unavailable")), FigureConfig::default());
        let status = store.refresh();
        assert_eq!(status.origin, CatalogOrigin::Seed);
    }

    /// Source whose classification document can be switched off
    struct ClassificationToggle {
        up: AtomicBool,
    }

    impl DocumentSource for ClassificationToggle {
        fn fetch(&self, kind: DocumentKind) -> Result<String, SourceError> {
            match kind {
                DocumentKind::Figuredata => Ok(DOC.to_string()),
                DocumentKind::Furnidata if self.up.load(Ordering::SeqCst) => Ok(CLASSIFICATION.to_string()),
                DocumentKind::Furnidata => {
                    Err(SourceError::Unavailable { kind, message: "down".to_string() })
                }
            }
        }
    }

    /// Source counting its catalog document fetches
    struct Counting {
        up: bool,
        fetches: AtomicUsize,
    }

    impl Counting {
        fn new(up: bool) -> Self {
            Self { up, fetches: AtomicUsize::new(0) }
        }
    }

    impl DocumentSource for Counting {
        fn fetch(&self, kind: DocumentKind) -> Result<String, SourceError> {
            match kind {
                DocumentKind::Figuredata => {
                    self.fetches.fetch_add(1, Ordering::SeqCst);
                    if self.up {
                        Ok(DOC.to_string())
                    } else {
                        Err(SourceError::Unavailable { kind, message: "down".to_string() })
                    }
                }
                DocumentKind::Furnidata => Err(SourceError::NotConfigured(kind)),
            }
        }
    }

    #[test]
    fn test_classification_outage_keeps_last_good() {
        let source = Arc::new(ClassificationToggle { up: AtomicBool::new(true) });
        let store = CatalogStore::new(source.clone(), FigureConfig::default());
        store.refresh();
        let before = store.current();
        assert_eq!(before.item("ch", "1").map(|i| i.rarity), Some(RarityTier::Nft));

        source.up.store(false, Ordering::SeqCst);
        let status = store.refresh();
        assert_eq!(status.origin, CatalogOrigin::Cached);
        assert!(status.degraded);
        assert!(Arc::ptr_eq(&before, &store.current()));
        assert_eq!(store.current().item("ch", "1").map(|i| i.rarity), Some(RarityTier::Nft));
    }

    #[test]
    fn test_classification_outage_on_first_load_serves_seed() {
        let source = Arc::new(ClassificationToggle { up: AtomicBool::new(false) });
        let store = CatalogStore::new(source, FigureConfig::default());
        let status = store.refresh();
        assert_eq!(status.origin, CatalogOrigin::Seed);
        assert!(status.degraded);
    }

    #[test]
    fn test_fresh_catalog_is_served_from_cache() {
        let source = Arc::new(Counting::new(true));
        let store = CatalogStore::new(source.clone(), FigureConfig::default());

        let first = store.get();
        let second = store.get();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.status().origin, CatalogOrigin::Source);
    }

    #[test]
    fn test_degraded_catalog_retries_after_interval() {
        let mut config = FigureConfig::default();
        config.catalog.retry_after_secs = 0;
        let source = Arc::new(Counting::new(false));
        let store = CatalogStore::new(source.clone(), config);

        store.get();
        assert!(store.status().degraded);
        store.get();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_degraded_catalog_is_cached_until_retry() {
        let source = Arc::new(Counting::new(false));
        let store = CatalogStore::new(source.clone(), FigureConfig::default());

        store.get();
        store.get();
        assert_eq!(source.fetches.load(Ordering::SeqCst), 1);
        assert_eq!(store.status().origin, CatalogOrigin::Seed);
    }
}
