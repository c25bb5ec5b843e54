//! Persistence boundary: collaborators that receive document snapshots.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

/// Receives the full serialized document after every store mutation.
///
/// Handlers run synchronously on the event thread, so an emit completes
/// before the next input event is processed.
pub trait PersistenceSink {
    fn document_changed(&mut self, serialized: &str);
}

/// Keeps the latest snapshot in memory, for tests and ephemeral use.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    last: Rc<RefCell<Option<String>>>,
}

impl MemorySink {
    /// Create a sink whose snapshot can still be inspected after the sink
    /// itself was handed to a document: clones share the same slot.
    pub fn shared() -> Self {
        Self::default()
    }

    /// The most recent snapshot, if any mutation happened yet.
    pub fn last(&self) -> Option<String> {
        self.last.borrow().clone()
    }
}

impl PersistenceSink for MemorySink {
    fn document_changed(&mut self, serialized: &str) {
        *self.last.borrow_mut() = Some(serialized.to_string());
    }
}

/// Rewrites a file with the current snapshot on every change.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl PersistenceSink for FileSink {
    fn document_changed(&mut self, serialized: &str) {
        if let Err(err) = std::fs::write(&self.path, serialized) {
            log::error!("failed to persist document to {}: {err}", self.path.display());
        }
    }
}
