//! Block-grid coordinates.

use glam::IVec3;

/// Identifies a cubic block in block-grid space (not voxel space).
///
/// Compared and hashed by value; used as the key for pending request
/// queues and for routing results back to the consumer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockCoord(pub IVec3);

impl BlockCoord {
  pub const fn new(x: i32, y: i32, z: i32) -> Self {
    Self(IVec3::new(x, y, z))
  }

  /// Origin of this block in voxel space, for blocks of `block_size`
  /// voxels per axis.
  pub fn to_voxel_origin(self, block_size: u32) -> IVec3 {
    self.0 * block_size as i32
  }

  /// Squared Euclidean distance to `reference`, in block units.
  ///
  /// Each component is widened before the subtraction. A delta can
  /// span the whole i32 range (33 bits signed), so its square needs 65
  /// bits; i128 keeps the value exact for any pair of coordinates.
  pub fn distance_sq(self, reference: IVec3) -> i128 {
    let dx = self.0.x as i128 - reference.x as i128;
    let dy = self.0.y as i128 - reference.y as i128;
    let dz = self.0.z as i128 - reference.z as i128;
    dx * dx + dy * dy + dz * dz
  }
}

impl From<IVec3> for BlockCoord {
  fn from(v: IVec3) -> Self {
    Self(v)
  }
}

#[cfg(test)]
#[path = "coords_test.rs"]
mod coords_test;
