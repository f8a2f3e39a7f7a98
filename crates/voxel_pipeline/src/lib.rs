//! voxel_pipeline - asynchronous block streaming and meshing for voxel worlds
//!
//! Keeps a foreground loop (renderer, game tick) free of the expensive
//! parts of voxel streaming by running them on two dedicated background
//! workers:
//!
//! - [`BlockDataWorker`] resolves block coordinates into filled
//!   [`VoxelBuffer`]s through a pluggable [`BlockProvider`] capability.
//! - [`MeshWorker`] turns voxel buffers into renderable [`Surface`]s
//!   through up to two pluggable [`Mesher`] capabilities (cuboid and/or
//!   smooth).
//!
//! Both workers expose the same non-blocking contract: `push` appends
//! requests into a lock-guarded shared input buffer and wakes the
//! thread, `pop` drains whatever finished since the last poll plus a
//! [`CycleStats`] health snapshot. Pending work is re-sorted by squared
//! distance to a moving priority point at every synchronization
//! boundary, so the blocks nearest the camera come out first under
//! load.
//!
//! The [`hermite`] module carries the trilinear value/gradient sampling
//! the smooth mesher builds on.
//!
//! # Example
//!
//! ```ignore
//! use glam::IVec3;
//! use voxel_pipeline::{BlockCoord, BlockDataInput, BlockDataWorker, PlaneProvider};
//!
//! let worker = BlockDataWorker::new(Box::new(PlaneProvider::new(0.0)), 4)?;
//!
//! // Frame N: queue what the streaming logic wants, closest first.
//! worker.push(BlockDataInput {
//!     blocks_to_emerge: vec![BlockCoord::new(0, 0, 0), BlockCoord::new(1, 0, 0)],
//!     blocks_to_immerge: vec![],
//!     priority_position: IVec3::ZERO,
//! });
//!
//! // Frame N+k: collect whatever finished, feed it to the mesh worker.
//! let out = worker.pop();
//! println!("{} blocks ready, {} still pending", out.emerged.len(), out.stats.remaining);
//! ```

pub mod buffer;
pub mod coords;
pub mod error;
pub mod hermite;
pub mod mesher;
pub mod priority;
pub mod provider;
pub mod queue;
pub mod stats;

pub mod block_worker;
pub mod mesh_worker;

// Re-export the consumer-facing surface
pub use buffer::{VoxelBuffer, DEFAULT_ISOLEVEL, DEFAULT_VOXEL_TYPE};
pub use coords::BlockCoord;
pub use error::PipelineError;
pub use hermite::HermiteValue;
pub use mesher::{Mesher, Surface};
pub use provider::{AirProvider, BlockProvider, PlaneProvider};
pub use stats::CycleStats;

pub use block_worker::{
  BlockDataInput, BlockDataOutput, BlockDataWorker, EmergeResult, MAX_BLOCK_SIZE_POW2,
  SYNC_INTERVAL,
};
pub use mesh_worker::{
  MeshInput, MeshOutput, MeshWorker, MeshWorkerInput, MeshWorkerOutput, MeshingConfig,
};
