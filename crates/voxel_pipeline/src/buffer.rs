//! Dense per-block voxel storage.
//!
//! A [`VoxelBuffer`] owns the voxel data of one block: a dense 3D grid
//! with two channels, a `f32` isolevel (signed density, positive = air)
//! and a `u16` voxel-type index into the consumer's material table.
//! Channels are allocated lazily; an untouched channel reads as its
//! default everywhere, so an all-air block costs no channel memory.
//!
//! Buffers move through the pipeline by value: the provider fills one,
//! ownership transfers to the meshing stage, then to the consumer. They
//! are never shared mutably between threads.

use glam::UVec3;

/// Default voxel type: 0 is reserved for air in the type table.
pub const DEFAULT_VOXEL_TYPE: u16 = 0;

/// Default isolevel: positive, i.e. outside any surface (air).
pub const DEFAULT_ISOLEVEL: f32 = 1.0;

/// Dense voxel grid for a single block.
#[derive(Clone, Debug)]
pub struct VoxelBuffer {
  size: UVec3,
  types: Option<Box<[u16]>>,
  isolevels: Option<Box<[f32]>>,
}

impl VoxelBuffer {
  /// Create a buffer of the given size with all channels at defaults.
  pub fn new(size: UVec3) -> Self {
    Self {
      size,
      types: None,
      isolevels: None,
    }
  }

  /// Create a cubic buffer of `edge` voxels per axis.
  pub fn new_cubic(edge: u32) -> Self {
    Self::new(UVec3::splat(edge))
  }

  pub fn size(&self) -> UVec3 {
    self.size
  }

  /// Total voxel count.
  pub fn volume(&self) -> usize {
    self.size.x as usize * self.size.y as usize * self.size.z as usize
  }

  /// Linear index. Layout: X is the major axis, Z the minor.
  #[inline]
  fn index(&self, x: u32, y: u32, z: u32) -> usize {
    debug_assert!(x < self.size.x && y < self.size.y && z < self.size.z);
    ((x as usize * self.size.y as usize) + y as usize) * self.size.z as usize + z as usize
  }

  pub fn voxel_type(&self, x: u32, y: u32, z: u32) -> u16 {
    match &self.types {
      Some(data) => data[self.index(x, y, z)],
      None => DEFAULT_VOXEL_TYPE,
    }
  }

  pub fn set_voxel_type(&mut self, x: u32, y: u32, z: u32, value: u16) {
    let idx = self.index(x, y, z);
    let volume = self.volume();
    let data = self
      .types
      .get_or_insert_with(|| vec![DEFAULT_VOXEL_TYPE; volume].into_boxed_slice());
    data[idx] = value;
  }

  /// Fill the type channel. Filling with the default simply drops the
  /// allocation.
  pub fn fill_voxel_type(&mut self, value: u16) {
    if value == DEFAULT_VOXEL_TYPE {
      self.types = None;
    } else {
      self.types = Some(vec![value; self.volume()].into_boxed_slice());
    }
  }

  pub fn isolevel(&self, x: u32, y: u32, z: u32) -> f32 {
    match &self.isolevels {
      Some(data) => data[self.index(x, y, z)],
      None => DEFAULT_ISOLEVEL,
    }
  }

  pub fn set_isolevel(&mut self, x: u32, y: u32, z: u32, value: f32) {
    let idx = self.index(x, y, z);
    let volume = self.volume();
    let data = self
      .isolevels
      .get_or_insert_with(|| vec![DEFAULT_ISOLEVEL; volume].into_boxed_slice());
    data[idx] = value;
  }

  /// Fill the isolevel channel. Filling with the default drops the
  /// allocation.
  pub fn fill_isolevel(&mut self, value: f32) {
    if value == DEFAULT_ISOLEVEL {
      self.isolevels = None;
    } else {
      self.isolevels = Some(vec![value; self.volume()].into_boxed_slice());
    }
  }

  /// True when no channel has been allocated, i.e. every voxel still
  /// reads as air. Conservative: a channel written back to its default
  /// value stays allocated.
  pub fn is_untouched(&self) -> bool {
    self.types.is_none() && self.isolevels.is_none()
  }
}

#[cfg(test)]
#[path = "buffer_test.rs"]
mod buffer_test;
