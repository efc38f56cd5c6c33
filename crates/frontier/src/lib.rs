use std::collections::{HashSet, VecDeque};

use tokio::sync::{Mutex, Notify};
use tracing::debug;
use url::Url;

/// One frontier entry: a URL to fetch, the depth it was discovered at, and
/// the page that linked to it (absent for seeds).
#[derive(Debug, Clone)]
pub struct FrontierEntry {
    pub url: Url,
    pub depth: u32,
    pub source: Option<String>,
}

struct Inner {
    queue: VecDeque<FrontierEntry>,
    visited: HashSet<String>,
    enqueued: HashSet<String>,
    unfinished: usize,
}

/// A single-host FIFO frontier. All admission decisions (has this URL been
/// enqueued before?) and all queue mutation happen under one lock, per the
/// invariant that a URL enters the frontier at most once. Exposes
/// `pop`/`task_done` with `asyncio.Queue.join()`-style drain semantics: a
/// worker pool can block on `pop()` until every outstanding entry has been
/// marked done and the queue is empty.
pub struct CrawlFrontier {
    inner: Mutex<Inner>,
    notify: Notify,
}

impl Default for CrawlFrontier {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlFrontier {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                queue: VecDeque::new(),
                visited: HashSet::new(),
                enqueued: HashSet::new(),
                unfinished: 0,
            }),
            notify: Notify::new(),
        }
    }

    /// Add `url` to the frontier unless it has already been enqueued.
    /// Returns `true` if it was actually added.
    pub async fn try_enqueue(&self, url: Url, depth: u32, source: Option<String>) -> bool {
        let key = url.as_str().to_string();
        let mut inner = self.inner.lock().await;
        if !inner.enqueued.insert(key) {
            return false;
        }
        inner.unfinished += 1;
        inner.queue.push_back(FrontierEntry { url, depth, source });
        drop(inner);
        self.notify.notify_waiters();
        true
    }

    /// Mark `url` visited. Returns `true` the first time it is called for a
    /// given URL; `false` on any subsequent call, so callers can skip
    /// reprocessing.
    pub async fn mark_visited(&self, url: &Url) -> bool {
        let mut inner = self.inner.lock().await;
        inner.visited.insert(url.as_str().to_string())
    }

    /// Dequeue the next entry. If the queue is momentarily empty but work
    /// is still outstanding elsewhere, waits for either a new entry or the
    /// last outstanding entry to be marked done. Returns `None` once the
    /// frontier has fully drained.
    pub async fn pop(&self) -> Option<FrontierEntry> {
        loop {
            {
                let mut inner = self.inner.lock().await;
                if let Some(entry) = inner.queue.pop_front() {
                    return Some(entry);
                }
                if inner.unfinished == 0 {
                    return None;
                }
            }
            self.notify.notified().await;
        }
    }

    /// Mark one entry previously returned by `pop` as fully processed.
    pub async fn task_done(&self) {
        let mut inner = self.inner.lock().await;
        inner.unfinished = inner.unfinished.saturating_sub(1);
        let drained = inner.unfinished == 0 && inner.queue.is_empty();
        drop(inner);
        if drained {
            debug!("frontier drained");
        }
        self.notify.notify_waiters();
    }

    /// Block until the frontier has no queued or in-flight entries.
    pub async fn join(&self) {
        loop {
            {
                let inner = self.inner.lock().await;
                if inner.unfinished == 0 && inner.queue.is_empty() {
                    return;
                }
            }
            self.notify.notified().await;
        }
    }

    pub async fn is_empty(&self) -> bool {
        let inner = self.inner.lock().await;
        inner.queue.is_empty() && inner.unfinished == 0
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.queue.len()
    }
}
