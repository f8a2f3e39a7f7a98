//! Per-window timing statistics published by the workers.

/// Health snapshot aggregated over one synchronization window.
///
/// Published under the output lock at every synchronization boundary
/// and returned verbatim by `pop`. Consumer-visible only: the workers
/// never take control decisions from it. A stalled pipeline shows up
/// here as a growing `remaining` count with stagnant min/max timers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CycleStats {
  /// No sample recorded in this window yet.
  pub first: bool,
  /// Cheapest item of the window, in microseconds.
  pub min_time_us: u64,
  /// Most expensive item of the window, in microseconds.
  pub max_time_us: u64,
  /// Items still pending after the boundary's input merge.
  pub remaining: u32,
}

impl Default for CycleStats {
  fn default() -> Self {
    Self {
      first: true,
      min_time_us: 0,
      max_time_us: 0,
      remaining: 0,
    }
  }
}

impl CycleStats {
  /// Fold one item's processing time into the window's running min/max.
  pub fn record(&mut self, elapsed_us: u64) {
    if self.first {
      self.first = false;
      self.min_time_us = elapsed_us;
      self.max_time_us = elapsed_us;
    } else {
      self.min_time_us = self.min_time_us.min(elapsed_us);
      self.max_time_us = self.max_time_us.max(elapsed_us);
    }
  }
}

#[cfg(test)]
#[path = "stats_test.rs"]
mod stats_test;
