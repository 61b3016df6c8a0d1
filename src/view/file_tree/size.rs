//! Directory sizes computed off the UI thread
//!
//! Every directory node owns a [`SizeCell`] that starts out pending. The tree
//! hands a clone of the cell to the [`SizeScheduler`], which fills it once the
//! recursive walk succeeds. A walk that fails leaves the cell pending forever.

use crate::services::fs::FsBackend;
use std::fmt;
use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::{Arc, OnceLock};
use tokio::runtime::Handle;

/// Write-once byte count
#[derive(Debug, Default)]
pub struct SizeCell(OnceLock<u64>);

impl SizeCell {
    pub fn pending() -> Self {
        Self(OnceLock::new())
    }

    pub fn ready(size: u64) -> Self {
        Self(OnceLock::from(size))
    }

    pub fn get(&self) -> Option<u64> {
        self.0.get().copied()
    }

    pub fn is_pending(&self) -> bool {
        self.0.get().is_none()
    }

    /// Store the result. Returns false if the cell was already filled.
    pub fn complete(&self, size: u64) -> bool {
        self.0.set(size).is_ok()
    }
}

/// Where directory size walks run
pub enum SizeScheduler {
    /// On the tokio blocking pool; the path is sent on `notify` when done
    Background {
        handle: Handle,
        notify: Option<Sender<PathBuf>>,
    },
    /// Synchronously, before the node is attached
    Inline,
    /// Never; directory sizes stay pending
    Disabled,
}

impl fmt::Debug for SizeScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeScheduler::Background { notify, .. } => f
                .debug_struct("Background")
                .field("notify", &notify.is_some())
                .finish(),
            SizeScheduler::Inline => write!(f, "Inline"),
            SizeScheduler::Disabled => write!(f, "Disabled"),
        }
    }
}

impl SizeScheduler {
    /// Background scheduler on the current tokio runtime
    ///
    /// Returns `None` outside a runtime.
    pub fn current(notify: Option<Sender<PathBuf>>) -> Option<Self> {
        Handle::try_current()
            .ok()
            .map(|handle| SizeScheduler::Background { handle, notify })
    }

    /// Start computing the size of `path` into `cell`
    pub fn schedule(&self, backend: &Arc<dyn FsBackend>, path: PathBuf, cell: Arc<SizeCell>) {
        match self {
            SizeScheduler::Background { handle, notify } => {
                let backend = Arc::clone(backend);
                let notify = notify.clone();
                handle.spawn_blocking(move || {
                    if compute(backend.as_ref(), &path, &cell) {
                        if let Some(tx) = notify {
                            // The UI may already be gone
                            let _ = tx.send(path);
                        }
                    }
                });
            }
            SizeScheduler::Inline => {
                compute(backend.as_ref(), &path, &cell);
            }
            SizeScheduler::Disabled => {}
        }
    }
}

fn compute(backend: &dyn FsBackend, path: &std::path::Path, cell: &SizeCell) -> bool {
    match backend.dir_size(path) {
        Ok(size) => {
            tracing::debug!("dir size: {} | {:?}", size, path);
            cell.complete(size)
        }
        Err(e) => {
            tracing::debug!("dir size failed for {:?}: {}", path, e);
            false
        }
    }
}
