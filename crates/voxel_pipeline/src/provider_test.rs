use glam::IVec3;

use super::*;
use crate::buffer::{DEFAULT_ISOLEVEL, DEFAULT_VOXEL_TYPE};

#[test]
fn test_air_provider_leaves_defaults() {
  let mut provider = AirProvider;
  let mut buffer = VoxelBuffer::new_cubic(8);
  provider.fill(&mut buffer, IVec3::new(16, 0, -8));

  assert!(buffer.is_untouched());
  assert_eq!(buffer.isolevel(4, 4, 4), DEFAULT_ISOLEVEL);
}

#[test]
fn test_plane_provider_signed_distance() {
  let mut provider = PlaneProvider::new(4.0);
  let mut buffer = VoxelBuffer::new_cubic(8);
  provider.fill(&mut buffer, IVec3::ZERO);

  // Below the surface: negative isolevel, solid type.
  assert_eq!(buffer.isolevel(0, 0, 0), -4.0);
  assert_eq!(buffer.voxel_type(0, 0, 0), 1);
  // At the surface.
  assert_eq!(buffer.isolevel(3, 4, 5), 0.0);
  assert_eq!(buffer.voxel_type(3, 4, 5), DEFAULT_VOXEL_TYPE);
  // Above the surface.
  assert_eq!(buffer.isolevel(7, 7, 7), 3.0);
}

#[test]
fn test_plane_provider_uses_voxel_origin() {
  let mut provider = PlaneProvider::new(0.0);
  let mut buffer = VoxelBuffer::new_cubic(4);
  provider.fill(&mut buffer, IVec3::new(0, -16, 0));

  // The whole block sits well below the plane.
  for y in 0..4 {
    assert_eq!(buffer.isolevel(1, y, 2), (y as i32 - 16) as f32);
    assert_eq!(buffer.voxel_type(1, y, 2), 1);
  }
}

#[test]
fn test_plane_provider_deterministic() {
  let mut provider = PlaneProvider::new(2.5);
  let mut a = VoxelBuffer::new_cubic(8);
  let mut b = VoxelBuffer::new_cubic(8);
  provider.fill(&mut a, IVec3::new(8, 8, 8));
  provider.fill(&mut b, IVec3::new(8, 8, 8));

  for x in 0..8 {
    for y in 0..8 {
      for z in 0..8 {
        assert_eq!(a.isolevel(x, y, z), b.isolevel(x, y, z));
        assert_eq!(a.voxel_type(x, y, z), b.voxel_type(x, y, z));
      }
    }
  }
}
