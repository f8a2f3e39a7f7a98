//! Mesher capability and surface output types.
//!
//! The concrete extraction algorithms (cuboid mesher, smooth/Hermite
//! surface mesher) are external collaborators; this module defines the
//! seam the mesh worker invokes them through and the opaque surface
//! blob they return.

use crate::buffer::VoxelBuffer;

/// Polygonizes one block's voxel buffer into a surface.
///
/// Invoked synchronously by the mesh worker, once per mesh request,
/// from exactly one thread at a time.
pub trait Mesher: Send {
  /// Read border of neighbouring voxels this mesher consumes beyond the
  /// block's own volume, per side. Input buffers must be oversized by
  /// this amount on every axis; the worker does not fetch missing
  /// neighbour data itself.
  fn required_padding(&self) -> u32;

  /// Generate the surface for `voxels`. Must always return a value;
  /// a block with no crossings yields an empty surface.
  fn build(&mut self, voxels: &VoxelBuffer) -> Surface;
}

/// Opaque vertex/index blob produced by one mesher capability.
#[derive(Clone, Debug, Default)]
pub struct Surface {
  /// Vertex positions in block-local voxel coordinates.
  pub positions: Vec<[f32; 3]>,
  /// Per-vertex surface normals.
  pub normals: Vec<[f32; 3]>,
  /// Triangle indices, 3 per face.
  pub indices: Vec<u32>,
  /// Material/atlas index, one per face.
  pub material_indices: Vec<u16>,
}

impl Surface {
  pub fn new() -> Self {
    Self::default()
  }

  /// True if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.positions.is_empty()
  }

  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }
}
