//! Document sources feeding the catalog loader
//!
//! [`DocumentSource`] is the seam where transport lives. The crate ships a
//! file-backed and an in-memory source; network clients implement the same
//! trait.

use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use thiserror::Error;

use crate::config::CatalogConfig;

/// The two documents a catalog is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// Palettes and sets
    Figuredata,
    /// Supplementary classification records
    Furnidata,
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentKind::Figuredata => write!(f, "figuredata"),
            DocumentKind::Furnidata => write!(f, "furnidata"),
        }
    }
}

/// A document could not be obtained.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// No location is configured for the document
    #[error("No {0} source configured")]
    NotConfigured(DocumentKind),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{kind} fetch timed out after {timeout:?}")]
    Timeout { kind: DocumentKind, timeout: Duration },
    #[error("{kind} unavailable: {message}")]
    Unavailable { kind: DocumentKind, message: String },
    /// An earlier fetch of the document has not returned yet
    #[error("Previous {0} fetch is still running")]
    InFlight(DocumentKind),
}

/// Provider of raw catalog documents.
pub trait DocumentSource: Send + Sync {
    fn fetch(&self, kind: DocumentKind) -> Result<String, SourceError>;
}

/// Reads documents from the filesystem.
#[derive(Debug, Clone, Default)]
pub struct FileSource {
    pub figuredata: Option<PathBuf>,
    pub furnidata: Option<PathBuf>,
}

impl FileSource {
    pub fn new(figuredata: impl Into<PathBuf>) -> Self {
        Self { figuredata: Some(figuredata.into()), furnidata: None }
    }

    pub fn with_furnidata(mut self, path: impl Into<PathBuf>) -> Self {
        self.furnidata = Some(path.into());
        self
    }

    /// Source using the document paths of a catalog config.
    pub fn from_config(config: &CatalogConfig) -> Self {
        Self { figuredata: config.figuredata.clone(), furnidata: config.furnidata.clone() }
    }
}

impl DocumentSource for FileSource {
    fn fetch(&self, kind: DocumentKind) -> Result<String, SourceError> {
        let path = match kind {
            DocumentKind::Figuredata => self.figuredata.as_ref(),
            DocumentKind::Furnidata => self.furnidata.as_ref(),
        }
        .ok_or(SourceError::NotConfigured(kind))?;

        std::fs::read_to_string(path).map_err(|source| SourceError::Io { path: path.clone(), source })
    }
}

/// Serves documents held in memory.
///
/// A document that was never given is reported as not configured.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    figuredata: Option<String>,
    furnidata: Option<String>,
    down: bool,
}

impl StaticSource {
    pub fn new(figuredata: impl Into<String>) -> Self {
        Self { figuredata: Some(figuredata.into()), furnidata: None, down: false }
    }

    /// A source whose every fetch fails.
    pub fn unavailable() -> Self {
        Self { down: true, ..Self::default() }
    }

    pub fn with_furnidata(mut self, document: impl Into<String>) -> Self {
        self.furnidata = Some(document.into());
        self
    }
}

impl DocumentSource for StaticSource {
    fn fetch(&self, kind: DocumentKind) -> Result<String, SourceError> {
        if self.down {
            return Err(SourceError::Unavailable { kind, message: "source is down".to_string() });
        }
        match kind {
            DocumentKind::Figuredata => self.figuredata.clone(),
            DocumentKind::Furnidata => self.furnidata.clone(),
        }
        .ok_or(SourceError::NotConfigured(kind))
    }
}

/// Runs fetches against a [`DocumentSource`] on helper threads, each
/// bounded by a deadline.
///
/// A fetch that outlives its deadline keeps its thread until the source
/// returns, and its result is discarded. Until then further fetches of the
/// same document fail with [`SourceError::InFlight`], so a hung source
/// holds at most one thread per document.
pub struct Fetcher {
    source: Arc<dyn DocumentSource>,
    figuredata: Arc<AtomicBool>,
    furnidata: Arc<AtomicBool>,
}

impl Fetcher {
    pub fn new(source: Arc<dyn DocumentSource>) -> Self {
        Self { source, figuredata: Arc::default(), furnidata: Arc::default() }
    }

    fn busy_flag(&self, kind: DocumentKind) -> &Arc<AtomicBool> {
        match kind {
            DocumentKind::Figuredata => &self.figuredata,
            DocumentKind::Furnidata => &self.furnidata,
        }
    }

    /// Fetch a document, giving up after `timeout`.
    pub fn fetch(&self, kind: DocumentKind, timeout: Duration) -> Result<String, SourceError> {
        let busy = self.busy_flag(kind);
        if busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire).is_err() {
            return Err(SourceError::InFlight(kind));
        }

        let (tx, rx) = mpsc::channel();
        let source = Arc::clone(&self.source);
        let done = Arc::clone(busy);

        let spawned = thread::Builder::new().name(format!("{}-fetch", kind)).spawn(move || {
            let result = source.fetch(kind);
            done.store(false, Ordering::Release);
            // The receiver is gone once the caller timed out
            let _ = tx.send(result);
        });
        if let Err(e) = spawned {
            busy.store(false, Ordering::Release);
            return Err(SourceError::Unavailable { kind, message: e.to_string() });
        }

        match rx.recv_timeout(timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(SourceError::Timeout { kind, timeout }),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(SourceError::Unavailable {
                kind,
                message: "fetch thread exited without a result".to_string(),
            }),
        }
    }
}
