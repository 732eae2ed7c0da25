use super::{SignalDataset, SignalLoadError};
use chrono::Local;
use once_cell::sync::OnceCell;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

/// Lazily loaded, read-only handle over the signal dataset.
///
/// The first successful load is shared by every later caller; concurrent
/// first callers block until that single load finishes. Failed loads are not
/// cached.
#[derive(Debug)]
pub struct SignalStore {
    path: PathBuf,
    snapshot: OnceCell<Arc<SignalDataset>>,
}

impl SignalStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            snapshot: OnceCell::new(),
        }
    }

    /// Store that never touches disk.
    pub fn preloaded(dataset: SignalDataset) -> Self {
        Self {
            path: PathBuf::new(),
            snapshot: OnceCell::with_value(Arc::new(dataset)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot.get().is_some()
    }

    pub fn snapshot(&self) -> Result<Arc<SignalDataset>, SignalLoadError> {
        self.snapshot
            .get_or_try_init(|| self.load())
            .map(Arc::clone)
    }

    fn load(&self) -> Result<Arc<SignalDataset>, SignalLoadError> {
        let today = Local::now().date_naive();
        match SignalDataset::from_path(&self.path, today) {
            Ok(dataset) => {
                info!(
                    path = %self.path.display(),
                    rows = dataset.len(),
                    latest_week = ?dataset.latest_week(),
                    "signal dataset loaded"
                );
                Ok(Arc::new(dataset))
            }
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "signal dataset unavailable");
                Err(err)
            }
        }
    }
}
