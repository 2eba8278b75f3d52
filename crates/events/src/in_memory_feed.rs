//! Process-local feed for dashboards, tests and dev.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, mpsc};

use thiserror::Error;

use crate::feed::{Feed, Subscription};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// The subscriber list lock was poisoned by a panicking publisher.
    #[error("feed lock poisoned")]
    Poisoned,
}

/// Fan-out over std channels.
///
/// Each subscriber owns an unbounded queue, so publishing never waits on a
/// reader. Subscribers whose receiving end is gone are dropped on the next
/// publish.
#[derive(Debug)]
pub struct InMemoryFeed<M> {
    subscribers: Mutex<Vec<mpsc::Sender<M>>>,
    published: AtomicU64,
}

impl<M> InMemoryFeed<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Live subscribers as of the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().map(|subs| subs.len()).unwrap_or(0)
    }

    /// Messages accepted since creation, delivered or not.
    pub fn published(&self) -> u64 {
        self.published.load(Ordering::Relaxed)
    }
}

impl<M> Default for InMemoryFeed<M> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
            published: AtomicU64::new(0),
        }
    }
}

impl<M> Feed<M> for InMemoryFeed<M>
where
    M: Clone + Send + 'static,
{
    type Error = FeedError;

    fn publish(&self, message: M) -> Result<usize, Self::Error> {
        let mut subs = self.subscribers.lock().map_err(|_| FeedError::Poisoned)?;
        self.published.fetch_add(1, Ordering::Relaxed);

        subs.retain(|tx| tx.send(message.clone()).is_ok());
        Ok(subs.len())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::channel();

        // Poisoned: hand back a subscription that never receives anything.
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.push(tx);
        }

        Subscription::new(rx)
    }
}
