//! Shared halves of each worker's double-buffered queues.
//!
//! Each worker owns two [`ExchangeBuffer`]s: one for the input side and
//! one for the output side, each behind its own lock so a `push` and a
//! concurrent `pop` never contend. The worker thread keeps unguarded
//! local copies and merges them with the shared halves only at
//! synchronization boundaries, keeping lock hold times proportional to
//! the batch size rather than to per-item work.

use std::sync::Mutex;

/// One lock-guarded shared half of a worker's double buffer.
pub struct ExchangeBuffer<S> {
  inner: Mutex<S>,
}

impl<S: Default> ExchangeBuffer<S> {
  pub fn new() -> Self {
    Self {
      inner: Mutex::new(S::default()),
    }
  }

  /// Run `f` with the lock held.
  ///
  /// Callers only append or drain batch state here; capability calls
  /// (provider, meshers) never run under this lock. Workers drain with
  /// `mem::take` on the fields they consume, leaving snapshot fields
  /// (the last published stats) in place.
  pub fn with_lock<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
    let mut guard = self.inner.lock().unwrap();
    f(&mut guard)
  }
}

impl<S: Default> Default for ExchangeBuffer<S> {
  fn default() -> Self {
    Self::new()
  }
}

/// Wake messages for a worker's idle wait.
///
/// Replaces a counting semaphore plus a polled exit flag: `Submitted`
/// is sent whenever a push makes the shared input non-empty, and
/// `Shutdown` is the terminal message after which the worker loop
/// exits without starting a new synchronization window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Wake {
  Submitted,
  Shutdown,
}

#[cfg(test)]
#[path = "queue_test.rs"]
mod queue_test;
