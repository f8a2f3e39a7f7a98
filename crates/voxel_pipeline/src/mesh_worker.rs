//! Background mesh-generation worker.
//!
//! Same loop shape as the block-data worker, specialized for meshing:
//! input items carry already-resolved voxel buffers rather than bare
//! coordinates, and each item expands into up to two surfaces, one per
//! configured [`Mesher`] capability (cuboid and/or smooth). A disabled
//! capability leaves its output slot empty.
//!
//! Meshers read a border of neighbouring voxels beyond the block's own
//! volume, so every pushed buffer must be oversized by
//! [`required_padding`](MeshWorker::required_padding) voxels per side.
//! Supplying neighbour data is the caller's contract; the worker does
//! not fetch it.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use glam::IVec3;
use log::debug;
use web_time::Instant;

use crate::block_worker::SYNC_INTERVAL;
use crate::buffer::VoxelBuffer;
use crate::coords::BlockCoord;
use crate::error::PipelineError;
use crate::mesher::{Mesher, Surface};
use crate::priority::reorder_by_distance;
use crate::queue::{ExchangeBuffer, Wake};
use crate::stats::CycleStats;

/// One block ready for meshing. The buffer is read-only for the
/// worker and dropped once both surfaces exist.
#[derive(Debug)]
pub struct MeshInput {
  pub coord: BlockCoord,
  pub voxels: VoxelBuffer,
}

/// Blocks queued by the foreground thread in one push.
#[derive(Debug, Default)]
pub struct MeshWorkerInput {
  pub blocks: Vec<MeshInput>,
  /// Reference point for the distance reorder, in block-grid space.
  pub priority_position: IVec3,
}

/// Surfaces generated for one block, one slot per enabled capability.
#[derive(Debug)]
pub struct MeshOutput {
  pub coord: BlockCoord,
  pub cuboid: Option<Surface>,
  pub smooth: Option<Surface>,
}

/// Everything accumulated on the output side since the last drain.
#[derive(Debug, Default)]
pub struct MeshWorkerOutput {
  pub blocks: Vec<MeshOutput>,
  /// Most recently published window snapshot.
  pub stats: CycleStats,
}

/// Mesher capability selection. At most two concrete meshers, chosen
/// at construction; at least one must be present.
pub struct MeshingConfig {
  block_size_pow2: u32,
  cuboid: Option<Box<dyn Mesher>>,
  smooth: Option<Box<dyn Mesher>>,
}

impl MeshingConfig {
  /// Blocks are `1 << block_size_pow2` voxels per axis, padding
  /// excluded.
  pub fn new(block_size_pow2: u32) -> Self {
    Self {
      block_size_pow2,
      cuboid: None,
      smooth: None,
    }
  }

  pub fn with_cuboid(mut self, mesher: Box<dyn Mesher>) -> Self {
    self.cuboid = Some(mesher);
    self
  }

  pub fn with_smooth(mut self, mesher: Box<dyn Mesher>) -> Self {
    self.smooth = Some(mesher);
    self
  }
}

/// Handle to the mesh worker thread.
///
/// Shutdown semantics match [`BlockDataWorker`]: drop or
/// [`stop`](Self::stop) finishes at most the current item, in-flight
/// local work is dropped, published output stays poppable.
///
/// [`BlockDataWorker`]: crate::block_worker::BlockDataWorker
pub struct MeshWorker {
  shared_input: Arc<ExchangeBuffer<MeshWorkerInput>>,
  shared_output: Arc<ExchangeBuffer<MeshWorkerOutput>>,
  wake_tx: Sender<Wake>,
  thread: Option<JoinHandle<()>>,
  block_size: u32,
  required_padding: u32,
}

impl MeshWorker {
  pub fn new(config: MeshingConfig) -> Result<Self, PipelineError> {
    if config.block_size_pow2 == 0
      || config.block_size_pow2 > crate::block_worker::MAX_BLOCK_SIZE_POW2
    {
      return Err(PipelineError::InvalidBlockSize {
        pow2: config.block_size_pow2,
      });
    }
    if config.cuboid.is_none() && config.smooth.is_none() {
      return Err(PipelineError::NoMesherConfigured);
    }

    let required_padding = config
      .cuboid
      .as_ref()
      .map_or(0, |m| m.required_padding())
      .max(config.smooth.as_ref().map_or(0, |m| m.required_padding()));
    let block_size = 1u32 << config.block_size_pow2;

    let shared_input = Arc::new(ExchangeBuffer::new());
    let shared_output = Arc::new(ExchangeBuffer::new());
    let (wake_tx, wake_rx) = unbounded();

    let thread = {
      let shared_input = Arc::clone(&shared_input);
      let shared_output = Arc::clone(&shared_output);
      thread::Builder::new()
        .name("voxel-mesh-gen".into())
        .spawn(move || {
          MesherLoop {
            cuboid: config.cuboid,
            smooth: config.smooth,
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
      required_padding,
    })
  }

  /// Read border the configured meshers need, per side. Callers size
  /// their buffers to `block_size + 2 * required_padding` per axis.
  pub fn required_padding(&self) -> u32 {
    self.required_padding
  }

  pub fn block_size(&self) -> u32 {
    self.block_size
  }

  /// Queue blocks for meshing and update the priority point.
  ///
  /// # Panics
  ///
  /// Panics if a pushed buffer is smaller than
  /// `block_size + 2 * required_padding` on any axis; an unpadded
  /// buffer is a caller contract violation, not a recoverable state.
  pub fn push(&self, mut input: MeshWorkerInput) {
    let min_size = self.block_size + 2 * self.required_padding;
    for block in &input.blocks {
      let size = block.voxels.size();
      assert!(
        size.x >= min_size && size.y >= min_size && size.z >= min_size,
        "mesh input {:?} is {}x{}x{} voxels, meshers need at least {} per axis \
         ({} block + {} padding per side)",
        block.coord,
        size.x,
        size.y,
        size.z,
        min_size,
        self.block_size,
        self.required_padding,
      );
    }

    let should_wake = self.shared_input.with_lock(|shared| {
      shared.blocks.append(&mut input.blocks);
      shared.priority_position = input.priority_position;
      !shared.blocks.is_empty()
    });

    if should_wake {
      let _ = self.wake_tx.send(Wake::Submitted);
    }
  }

  /// Drain everything published since the last drain. Non-blocking.
  pub fn pop(&self) -> MeshWorkerOutput {
    self.shared_output.with_lock(|shared| MeshWorkerOutput {
      blocks: std::mem::take(&mut shared.blocks),
      stats: shared.stats,
    })
  }

  /// Shut the thread down and join it. Idempotent.
  pub fn stop(&mut self) {
    let _ = self.wake_tx.send(Wake::Shutdown);
    if let Some(handle) = self.thread.take() {
      let _ = handle.join();
    }
  }
}

impl Drop for MeshWorker {
  fn drop(&mut self) {
    self.stop();
  }
}

/// Thread-local state of the mesh worker loop.
struct MesherLoop {
  cuboid: Option<Box<dyn Mesher>>,
  smooth: Option<Box<dyn Mesher>>,
  shared_input: Arc<ExchangeBuffer<MeshWorkerInput>>,
  shared_output: Arc<ExchangeBuffer<MeshWorkerOutput>>,
  wake_rx: Receiver<Wake>,
  pending: Vec<MeshInput>,
  cursor: usize,
  priority_position: IVec3,
  finished: Vec<MeshOutput>,
}

impl MesherLoop {
  fn run(mut self) {
    debug!("mesh worker up");
    loop {
      match self.wake_rx.recv() {
        Ok(Wake::Submitted) => {}
        Ok(Wake::Shutdown) | Err(_) => break,
      }
      if !self.work_until_idle() {
        break;
      }
    }
    debug!("mesh worker stopped");
  }

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

  /// Run every enabled mesher over the next pending block. The buffer
  /// is dropped with the pending entry at the next boundary; only the
  /// surfaces travel on.
  fn process_one(&mut self, stats: &mut CycleStats) {
    let block = &self.pending[self.cursor];
    self.cursor += 1;
    let coord = block.coord;

    let started = Instant::now();
    let cuboid = self.cuboid.as_mut().map(|m| m.build(&block.voxels));
    let smooth = self.smooth.as_mut().map(|m| m.build(&block.voxels));
    stats.record(started.elapsed().as_micros() as u64);

    self.finished.push(MeshOutput {
      coord,
      cuboid,
      smooth,
    });
  }

  fn sync(&mut self, stats: &mut CycleStats) {
    if self.cursor > 0 {
      self.pending.drain(..self.cursor);
      self.cursor = 0;
    }

    self.shared_input.with_lock(|shared| {
      self.pending.append(&mut shared.blocks);
      self.priority_position = shared.priority_position;
    });

    stats.remaining = self.pending.len() as u32;

    self.shared_output.with_lock(|shared| {
      shared.blocks.append(&mut self.finished);
      shared.stats = *stats;
    });

    if !self.pending.is_empty() {
      reorder_by_distance(&mut self.pending, self.priority_position, |b| b.coord);
    }
  }

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
#[path = "mesh_worker_test.rs"]
mod mesh_worker_test;
