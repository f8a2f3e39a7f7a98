//! Background block-data worker.
//!
//! Owns one dedicated thread that resolves block coordinates into
//! filled [`VoxelBuffer`]s through a pluggable [`BlockProvider`]. The
//! foreground thread talks to it through two lock-guarded buffers:
//! [`BlockDataWorker::push`] appends requests on the input side,
//! [`BlockDataWorker::pop`] drains finished blocks and the latest
//! stats snapshot from the output side. Neither call blocks beyond the
//! brief critical section; results are polled, never awaited.
//!
//! The thread cycles through four phases: idle (blocking on the wake
//! channel), draining (absorb shared input, merge with carried-over
//! work, re-sort by distance to the priority point), processing (one
//! item at a time so a closer request can be folded in at the next
//! boundary), and syncing (publish accumulated output and stats, pull
//! new input). A synchronization boundary is forced every
//! [`SYNC_INTERVAL`] or when the local working set empties, whichever
//! comes first, bounding how long new work and finished results stay
//! invisible regardless of per-item cost.

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use glam::IVec3;
use log::{debug, trace};
use web_time::Instant;

use crate::buffer::VoxelBuffer;
use crate::coords::BlockCoord;
use crate::error::PipelineError;
use crate::priority::reorder_by_distance;
use crate::provider::BlockProvider;
use crate::queue::{ExchangeBuffer, Wake};
use crate::stats::CycleStats;

/// Wall-clock bound on one synchronization window.
pub const SYNC_INTERVAL: Duration = Duration::from_millis(100);

/// Largest accepted block size exponent (256 voxels per axis).
pub const MAX_BLOCK_SIZE_POW2: u32 = 8;

/// Requests queued by the foreground thread in one push.
#[derive(Debug, Default)]
pub struct BlockDataInput {
  /// Blocks whose voxel data should be materialized.
  pub blocks_to_emerge: Vec<BlockCoord>,
  /// Blocks whose voxel data should be persisted/unloaded. Accepted
  /// and counted, but the provider step does not act on them yet.
  pub blocks_to_immerge: Vec<BlockCoord>,
  /// Reference point for the distance reorder, in block-grid space.
  pub priority_position: IVec3,
}

impl BlockDataInput {
  pub fn is_empty(&self) -> bool {
    self.blocks_to_emerge.is_empty() && self.blocks_to_immerge.is_empty()
  }
}

/// One materialized block.
#[derive(Debug)]
pub struct EmergeResult {
  pub coord: BlockCoord,
  pub origin_in_voxels: IVec3,
  pub voxels: VoxelBuffer,
}

/// Everything accumulated on the output side since the last drain.
#[derive(Debug, Default)]
pub struct BlockDataOutput {
  pub emerged: Vec<EmergeResult>,
  /// Most recently published window snapshot.
  pub stats: CycleStats,
}

/// Handle to the block-data worker thread.
///
/// Dropping the handle (or calling [`stop`](Self::stop)) shuts the
/// thread down: it finishes at most the item it is currently
/// processing, then exits without starting a new window. In-flight
/// local work is dropped; already published output stays poppable.
///
/// Duplicate emerge coordinates are not deduplicated: pushing the same
/// coordinate twice yields two results.
pub struct BlockDataWorker {
  shared_input: Arc<ExchangeBuffer<BlockDataInput>>,
  shared_output: Arc<ExchangeBuffer<BlockDataOutput>>,
  wake_tx: Sender<Wake>,
  thread: Option<JoinHandle<()>>,
  block_size: u32,
}

impl BlockDataWorker {
  /// Spawn the worker thread. Blocks are `1 << block_size_pow2` voxels
  /// per axis.
  pub fn new(
    provider: Box<dyn BlockProvider>,
    block_size_pow2: u32,
  ) -> Result<Self, PipelineError> {
    if block_size_pow2 == 0 || block_size_pow2 > MAX_BLOCK_SIZE_POW2 {
      return Err(PipelineError::InvalidBlockSize {
        pow2: block_size_pow2,
      });
    }

    let shared_input = Arc::new(ExchangeBuffer::new());
    let shared_output = Arc::new(ExchangeBuffer::new());
    let (wake_tx, wake_rx) = unbounded();
    let block_size = 1u32 << block_size_pow2;

    let thread = {
      let shared_input = Arc::clone(&shared_input);
      let shared_output = Arc::clone(&shared_output);
      thread::Builder::new()
        .name("voxel-block-data".into())
        .spawn(move || {
          ProviderLoop {
            provider,
            block_size,
            shared_input,
            shared_output,
            wake_rx,
            pending: Vec::new(),
            cursor: 0,
            priority_position: IVec3::ZERO,
            finished: Vec::new(),
          }
          .run()
        })?
    };

    Ok(Self {
      shared_input,
      shared_output,
      wake_tx,
      thread: Some(thread),
      block_size,
    })
  }

  /// Voxels per axis of the blocks this worker materializes.
  pub fn block_size(&self) -> u32 {
    self.block_size
  }

  /// Queue requests and update the priority point.
  ///
  /// Appends under the input lock and wakes the thread if the shared
  /// input became non-empty. Never blocks beyond the lock hold time.
  pub fn push(&self, mut input: BlockDataInput) {
    let should_wake = self.shared_input.with_lock(|shared| {
      shared.blocks_to_emerge.append(&mut input.blocks_to_emerge);
      shared.blocks_to_immerge.append(&mut input.blocks_to_immerge);
      shared.priority_position = input.priority_position;
      !shared.is_empty()
    });

    if should_wake {
      let _ = self.wake_tx.send(Wake::Submitted);
    }
  }

  /// Drain everything published since the last drain.
  ///
  /// Non-blocking: returns an empty batch (with the latest stats
  /// snapshot) when nothing is ready yet.
  pub fn pop(&self) -> BlockDataOutput {
    self.shared_output.with_lock(|shared| BlockDataOutput {
      emerged: std::mem::take(&mut shared.emerged),
      stats: shared.stats,
    })
  }

  /// Shut the thread down and join it. Returns within at most one
  /// in-flight item's processing time. Idempotent.
  pub fn stop(&mut self) {
    let _ = self.wake_tx.send(Wake::Shutdown);
    if let Some(handle) = self.thread.take() {
      let _ = handle.join();
    }
  }
}

impl Drop for BlockDataWorker {
  fn drop(&mut self) {
    self.stop();
  }
}

/// Thread-local state of the worker loop.
struct ProviderLoop {
  provider: Box<dyn BlockProvider>,
  block_size: u32,
  shared_input: Arc<ExchangeBuffer<BlockDataInput>>,
  shared_output: Arc<ExchangeBuffer<BlockDataOutput>>,
  wake_rx: Receiver<Wake>,
  /// Local working set, sorted closest-first as of the last boundary.
  pending: Vec<BlockCoord>,
  /// Consumed prefix of `pending`, compacted at the next boundary.
  cursor: usize,
  priority_position: IVec3,
  /// Local output accumulator, published at the next boundary.
  finished: Vec<EmergeResult>,
}

impl ProviderLoop {
  fn run(mut self) {
    debug!("block data worker up (block size {})", self.block_size);
    loop {
      match self.wake_rx.recv() {
        Ok(Wake::Submitted) => {}
        Ok(Wake::Shutdown) | Err(_) => break,
      }
      if !self.work_until_idle() {
        break;
      }
    }
    debug!("block data worker stopped");
  }

  /// Process until the working set stays empty across a boundary.
  /// Returns false if shutdown was requested mid-window.
  fn work_until_idle(&mut self) -> bool {
    let mut stats = CycleStats::default();
    let mut deadline = Instant::now() + SYNC_INTERVAL;
    self.sync(&mut stats);

    while !self.pending.is_empty() {
      if self.shutdown_requested() {
        return false;
      }

      self.process_one(&mut stats);

      if self.cursor >= self.pending.len() || Instant::now() >= deadline {
        self.sync(&mut stats);
        stats = CycleStats::default();
        deadline = Instant::now() + SYNC_INTERVAL;
      }
    }
    true
  }

  /// Pop the closest pending coordinate and run the provider on a
  /// fresh buffer, one item per iteration so a newly pushed closer
  /// block can overtake at the next boundary.
  fn process_one(&mut self, stats: &mut CycleStats) {
    let coord = self.pending[self.cursor];
    self.cursor += 1;

    let mut buffer = VoxelBuffer::new_cubic(self.block_size);
    let origin_in_voxels = coord.to_voxel_origin(self.block_size);

    let started = Instant::now();
    self.provider.fill(&mut buffer, origin_in_voxels);
    stats.record(started.elapsed().as_micros() as u64);

    self.finished.push(EmergeResult {
      coord,
      origin_in_voxels,
      voxels: buffer,
    });
  }

  /// Synchronization boundary: compact the consumed prefix, absorb
  /// newly queued shared input, publish accumulated output plus the
  /// window's stats, and re-sort what remains around the (possibly
  /// moved) priority point.
  fn sync(&mut self, stats: &mut CycleStats) {
    if self.cursor > 0 {
      self.pending.drain(..self.cursor);
      self.cursor = 0;
    }

    let dropped_immerge = self.shared_input.with_lock(|shared| {
      self.pending.append(&mut shared.blocks_to_emerge);
      self.priority_position = shared.priority_position;
      // TODO Block saving: immerge requests are accepted but the
      // persistence step does not exist yet.
      let dropped = shared.blocks_to_immerge.len();
      shared.blocks_to_immerge.clear();
      dropped
    });
    if dropped_immerge > 0 {
      trace!("dropped {dropped_immerge} immerge requests (block saving not implemented)");
    }

    stats.remaining = self.pending.len() as u32;

    self.shared_output.with_lock(|shared| {
      shared.emerged.append(&mut self.finished);
      shared.stats = *stats;
    });

    if !self.pending.is_empty() {
      reorder_by_distance(&mut self.pending, self.priority_position, |c| *c);
    }
  }

  /// Drain queued wake messages without blocking; only `Shutdown`
  /// matters here, since the thread is already awake and absorbs new
  /// input at boundaries anyway.
  fn shutdown_requested(&self) -> bool {
    loop {
      match self.wake_rx.try_recv() {
        Ok(Wake::Submitted) => {}
        Ok(Wake::Shutdown) | Err(TryRecvError::Disconnected) => return true,
        Err(TryRecvError::Empty) => return false,
      }
    }
  }
}

#[cfg(test)]
#[path = "block_worker_test.rs"]
mod block_worker_test;
