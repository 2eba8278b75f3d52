//! Publish/subscribe contract for the live stock feed.
//!
//! The feed only distributes; alert records go through the sink collaborator.
//! Delivery is best-effort and a slow or dropped subscriber never blocks the
//! publisher.

use std::sync::Arc;
use std::sync::mpsc::{IntoIter, Receiver};
use std::time::Duration;

/// One consumer's view of a feed.
///
/// Receives every message published after it was created, in publication
/// order for a single publisher. Every read returns `None` once the feed is
/// gone and the queue is empty.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until a message arrives.
    pub fn next_message(&self) -> Option<M> {
        self.receiver.recv().ok()
    }

    /// The next queued message, if any.
    pub fn poll(&self) -> Option<M> {
        self.receiver.try_recv().ok()
    }

    /// Block for at most `timeout`.
    pub fn wait(&self, timeout: Duration) -> Option<M> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Everything queued right now.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

impl<M> IntoIterator for Subscription<M> {
    type Item = M;
    type IntoIter = IntoIter<M>;

    /// Blocking iterator that ends when the feed is dropped.
    fn into_iter(self) -> Self::IntoIter {
        self.receiver.into_iter()
    }
}

/// Broadcast feed.
///
/// Many dispatch calls may publish at once; implementations own whatever
/// serialization that needs.
pub trait Feed<M>: Send + Sync {
    type Error: core::fmt::Debug + core::fmt::Display + Send + Sync + 'static;

    /// Broadcast `message`; returns how many subscribers it reached.
    fn publish(&self, message: M) -> Result<usize, Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> Feed<M> for Arc<B>
where
    B: Feed<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<usize, Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
