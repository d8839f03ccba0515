//! Port definitions (trait abstractions) for infrastructure the supervisor
//! depends on.
//!
//! Ports contain no implementation details; the runtime crate provides the
//! tokio-backed implementations and tests substitute their own.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// A restart attempt handed to a [`RestartScheduler`].
pub type RestartFuture = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Port for running a delayed auto-restart attempt.
///
/// The supervisor calls [`schedule`](RestartScheduler::schedule) at most once
/// per process exit. Implementations must not block the caller and must run
/// `restart` at most once, after roughly `delay`. There is no retry: whatever
/// `restart` does on failure is the end of it.
pub trait RestartScheduler: Send + Sync {
    fn schedule(&self, delay: Duration, restart: RestartFuture);
}
