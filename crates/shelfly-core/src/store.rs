// ── Reactive book store ──
//
// The server's list is the single source of truth; the store never
// edits individual entries. Every refresh replaces the snapshot
// wholesale and notifies subscribers via `watch` channels.

use std::sync::Arc;

use tokio::sync::watch;

use crate::model::{Book, BookId};
use crate::stream::BookStream;

/// Reactive snapshot storage for the book list.
///
/// Mutations are whole-list replacements. Every replacement bumps a
/// version counter and broadcasts the new snapshot, preserving the
/// server's ordering exactly.
pub struct BookStore {
    /// Version counter, bumped on every replacement.
    version: watch::Sender<u64>,

    /// Full snapshot in server order.
    snapshot: watch::Sender<Arc<Vec<Arc<Book>>>>,
}

impl BookStore {
    pub fn new() -> Self {
        let (version, _) = watch::channel(0u64);
        let (snapshot, _) = watch::channel(Arc::new(Vec::new()));
        Self { version, snapshot }
    }

    /// Replace the entire list with a fresh server response.
    ///
    /// Last write wins: when two refreshes overlap, whichever response
    /// lands second is the one subscribers see.
    pub fn replace_all(&self, books: Vec<Book>) {
        let snapshot: Vec<Arc<Book>> = books.into_iter().map(Arc::new).collect();
        // `send_modify` updates unconditionally, even with zero receivers.
        self.snapshot.send_modify(|snap| *snap = Arc::new(snapshot));
        self.version.send_modify(|v| *v += 1);
    }

    /// Get the current snapshot (cheap `Arc` clone).
    pub fn snapshot(&self) -> Arc<Vec<Arc<Book>>> {
        self.snapshot.borrow().clone()
    }

    /// Find a book by id in the current snapshot.
    pub fn get(&self, id: &BookId) -> Option<Arc<Book>> {
        self.snapshot
            .borrow()
            .iter()
            .find(|b| b.id == *id)
            .cloned()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> BookStream {
        BookStream::new(self.snapshot.subscribe())
    }

    pub fn len(&self) -> usize {
        self.snapshot.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot.borrow().is_empty()
    }

    /// How many replacements have been applied.
    pub fn version(&self) -> u64 {
        *self.version.borrow()
    }
}

impl Default for BookStore {
    fn default() -> Self {
        Self::new()
    }
}
