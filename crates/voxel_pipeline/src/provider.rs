//! Block data provider capability and deterministic built-ins.
//!
//! The concrete terrain generator is an external collaborator; this
//! module only defines the seam the block-data worker calls through,
//! plus two trivial deterministic providers that the tests (and
//! consumers wanting a quick smoke world) can use directly.

use glam::IVec3;

use crate::buffer::VoxelBuffer;

/// Fills a block's voxel channels with data.
///
/// Invoked synchronously by the block-data worker, once per emerge
/// request, from exactly one thread at a time. Implementations must be
/// deterministic for a given origin and must always populate the
/// buffer, even degenerately (leaving it at channel defaults means an
/// all-air block). There is no error channel: retry or fallback policy
/// belongs inside the implementation.
pub trait BlockProvider: Send {
  /// Populate `buffer` for the block whose first voxel sits at
  /// `origin_in_voxels` (voxel-space coordinates, not block-space).
  fn fill(&mut self, buffer: &mut VoxelBuffer, origin_in_voxels: IVec3);
}

/// Provider that produces only air. The degenerate baseline: it leaves
/// every channel at its default.
#[derive(Clone, Copy, Debug, Default)]
pub struct AirProvider;

impl BlockProvider for AirProvider {
  fn fill(&mut self, _buffer: &mut VoxelBuffer, _origin_in_voxels: IVec3) {}
}

/// Flat ground plane at a fixed world height.
///
/// Writes the signed distance to the plane into the isolevel channel
/// and marks voxels below the surface with `ground_type`.
#[derive(Clone, Copy, Debug)]
pub struct PlaneProvider {
  /// World-space height of the surface, in voxels.
  pub height: f32,
  /// Type index written below the surface.
  pub ground_type: u16,
}

impl Default for PlaneProvider {
  fn default() -> Self {
    Self {
      height: 0.0,
      ground_type: 1,
    }
  }
}

impl PlaneProvider {
  pub fn new(height: f32) -> Self {
    Self {
      height,
      ..Self::default()
    }
  }
}

impl BlockProvider for PlaneProvider {
  fn fill(&mut self, buffer: &mut VoxelBuffer, origin_in_voxels: IVec3) {
    let size = buffer.size();
    for x in 0..size.x {
      for y in 0..size.y {
        let world_y = (origin_in_voxels.y + y as i32) as f32;
        let sd = world_y - self.height;
        for z in 0..size.z {
          buffer.set_isolevel(x, y, z, sd);
          if sd < 0.0 {
            buffer.set_voxel_type(x, y, z, self.ground_type);
          }
        }
      }
    }
  }
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod provider_test;
