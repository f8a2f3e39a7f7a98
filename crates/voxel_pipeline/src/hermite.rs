//! Hermite value sampling for smooth surface extraction.
//!
//! A Hermite value pairs an isolevel sample with its gradient. The
//! smooth mesher queries these at arbitrary sub-voxel positions, so
//! alongside the integer-grid [`sample`] there is an interpolated
//! variant that evaluates the 8 corners of the enclosing cell and
//! trilinearly blends value and gradient independently.
//!
//! Pure functions, no shared state: safe to call concurrently from any
//! number of mesher instances.

use std::ops::{Add, Mul, Sub};

use glam::Vec3;

use crate::buffer::VoxelBuffer;

/// Isolevel sample paired with its gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HermiteValue {
  /// Signed distance to the surface (positive = air).
  pub value: f32,
  /// Central-difference derivative of the isolevel field.
  pub gradient: Vec3,
}

impl Default for HermiteValue {
  fn default() -> Self {
    Self {
      value: 1.0,
      gradient: Vec3::ZERO,
    }
  }
}

/// Isolevel read with coordinates clamped to the buffer bounds.
///
/// Out-of-range coordinates reuse the boundary value rather than
/// extrapolating, so gradients stay defined at the buffer edges.
pub fn isolevel_clamped(voxels: &VoxelBuffer, x: i32, y: i32, z: i32) -> f32 {
  let size = voxels.size();
  let x = x.clamp(0, size.x as i32 - 1) as u32;
  let y = y.clamp(0, size.y as i32 - 1) as u32;
  let z = z.clamp(0, size.z as i32 - 1) as u32;
  voxels.isolevel(x, y, z)
}

/// Sample the isolevel and its central-difference gradient at an
/// integer grid coordinate.
pub fn sample(voxels: &VoxelBuffer, x: i32, y: i32, z: i32) -> HermiteValue {
  let value = isolevel_clamped(voxels, x, y, z);
  let gradient = Vec3::new(
    isolevel_clamped(voxels, x + 1, y, z) - isolevel_clamped(voxels, x - 1, y, z),
    isolevel_clamped(voxels, x, y + 1, z) - isolevel_clamped(voxels, x, y - 1, z),
    isolevel_clamped(voxels, x, y, z + 1) - isolevel_clamped(voxels, x, y, z - 1),
  );
  HermiteValue { value, gradient }
}

/// Trilinear interpolation over the 8 corners of a unit cell.
///
/// Corner ordering: bottom ring (x0,z0), (x1,z0), (x1,z1), (x0,z1),
/// then the same ring at y1. `r` holds the fractional offsets.
pub fn interpolate<T>(corners: [T; 8], r: Vec3) -> T
where
  T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>,
{
  fn lerp<T>(a: T, b: T, t: f32) -> T
  where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>,
  {
    a + (b - a) * t
  }

  let [v0, v1, v2, v3, v4, v5, v6, v7] = corners;

  let y0_z0 = lerp(v0, v1, r.x);
  let y0_z1 = lerp(v3, v2, r.x);
  let y1_z0 = lerp(v4, v5, r.x);
  let y1_z1 = lerp(v7, v6, r.x);

  let y0 = lerp(y0_z0, y0_z1, r.z);
  let y1 = lerp(y1_z0, y1_z1, r.z);

  lerp(y0, y1, r.y)
}

/// Sample a Hermite value at an arbitrary real-valued position.
///
/// Evaluates [`sample`] at the 8 integer corners of the enclosing cell
/// and trilinearly interpolates value and gradient independently with
/// the same fractional offsets. At an exact integer position this
/// degenerates to [`sample`] (zero fractional offset).
///
/// Corner samples are recomputed per query; adjacent queries touching
/// the same cell repeat the grid reads.
pub fn sample_interpolated(voxels: &VoxelBuffer, pos: Vec3) -> HermiteValue {
  let x0 = pos.x.floor() as i32;
  let y0 = pos.y.floor() as i32;
  let z0 = pos.z.floor() as i32;

  let x1 = pos.x.ceil() as i32;
  let y1 = pos.y.ceil() as i32;
  let z1 = pos.z.ceil() as i32;

  let corners = [
    sample(voxels, x0, y0, z0),
    sample(voxels, x1, y0, z0),
    sample(voxels, x1, y0, z1),
    sample(voxels, x0, y0, z1),
    sample(voxels, x0, y1, z0),
    sample(voxels, x1, y1, z0),
    sample(voxels, x1, y1, z1),
    sample(voxels, x0, y1, z1),
  ];

  let r = pos - Vec3::new(x0 as f32, y0 as f32, z0 as f32);

  HermiteValue {
    value: interpolate(corners.map(|c| c.value), r),
    gradient: interpolate(corners.map(|c| c.gradient), r),
  }
}

#[cfg(test)]
#[path = "hermite_test.rs"]
mod hermite_test;
