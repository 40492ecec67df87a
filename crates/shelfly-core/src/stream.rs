// ── Reactive book stream ──
//
// Subscription type for consuming list changes from the BookStore.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use crate::model::Book;

/// A subscription to the book list.
///
/// Provides both point-in-time snapshot access and reactive change
/// notification via `changed()` or by converting to a `Stream`.
pub struct BookStream {
    current: Arc<Vec<Arc<Book>>>,
    receiver: watch::Receiver<Arc<Vec<Arc<Book>>>>,
}

impl BookStream {
    pub(crate) fn new(receiver: watch::Receiver<Arc<Vec<Arc<Book>>>>) -> Self {
        let current = receiver.borrow().clone();
        Self { current, receiver }
    }

    /// The snapshot as of the last `changed()` (or creation time).
    pub fn current(&self) -> &Arc<Vec<Arc<Book>>> {
        &self.current
    }

    /// The latest snapshot (may be newer than `current()`).
    pub fn latest(&self) -> Arc<Vec<Arc<Book>>> {
        self.receiver.borrow().clone()
    }

    /// Wait for the next replacement, returning the new snapshot.
    /// Returns `None` if the store has been dropped.
    pub async fn changed(&mut self) -> Option<Arc<Vec<Arc<Book>>>> {
        self.receiver.changed().await.ok()?;
        let snap = self.receiver.borrow_and_update().clone();
        self.current = snap.clone();
        Some(snap)
    }

    /// Convert into a `Stream` for use with `StreamExt` combinators.
    pub fn into_stream(self) -> BookWatchStream {
        BookWatchStream {
            inner: WatchStream::new(self.receiver),
        }
    }
}

/// `Stream` adapter backed by a `watch::Receiver`.
///
/// Yields a new snapshot each time the store is replaced.
pub struct BookWatchStream {
    inner: WatchStream<Arc<Vec<Arc<Book>>>>,
}

impl Stream for BookWatchStream {
    type Item = Arc<Vec<Arc<Book>>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.inner).poll_next(cx)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    use crate::model::{BookId, BookStatus};
    use crate::store::BookStore;

    fn book(id: &str) -> Book {
        Book {
            id: BookId::from(id),
            title: format!("Book {id}"),
            author: "Author".into(),
            genre: "Genre".into(),
            published_year: 2000,
            status: BookStatus::Available,
            created_at: "2024-03-15T10:00:00Z".parse().unwrap(),
        }
    }

    #[tokio::test]
    async fn stream_adapter_yields_each_replacement() {
        let store = BookStore::new();
        store.replace_all(vec![book("1")]);

        let mut stream = store.subscribe().into_stream();

        // The adapter starts with the snapshot current at subscription.
        let first = stream.next().await.unwrap();
        assert_eq!(first.len(), 1);

        store.replace_all(vec![book("1"), book("2")]);
        let second = stream.next().await.unwrap();
        assert_eq!(second.len(), 2);
        assert_eq!(second[1].id, BookId::from("2"));
    }
}
