//! Benchmarks for the hot helpers of the pipeline: the per-boundary
//! distance reorder and Hermite sampling.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use glam::{IVec3, Vec3};

use voxel_pipeline::coords::BlockCoord;
use voxel_pipeline::hermite;
use voxel_pipeline::priority::reorder_by_distance;
use voxel_pipeline::VoxelBuffer;

/// Deterministic pseudo-random coordinates (LCG, no rand dependency).
fn scattered_coords(count: usize) -> Vec<BlockCoord> {
  let mut state = 0x2545_f491_4f6c_dd1du64;
  (0..count)
    .map(|_| {
      let mut next = || {
        state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((state >> 33) as i32 % 64) - 32
      };
      BlockCoord::new(next(), next(), next())
    })
    .collect()
}

fn bench_reorder(c: &mut Criterion) {
  let coords = scattered_coords(4096);

  c.bench_function("reorder_4096_blocks", |b| {
    b.iter_batched(
      || coords.clone(),
      |mut coords| {
        reorder_by_distance(&mut coords, black_box(IVec3::new(3, -2, 7)), |c| *c);
        coords
      },
      criterion::BatchSize::SmallInput,
    )
  });
}

fn bench_hermite(c: &mut Criterion) {
  let mut buffer = VoxelBuffer::new_cubic(18);
  for x in 0..18 {
    for y in 0..18 {
      for z in 0..18 {
        let d = Vec3::new(x as f32 - 9.0, y as f32 - 9.0, z as f32 - 9.0);
        buffer.set_isolevel(x, y, z, d.length() - 6.0);
      }
    }
  }

  c.bench_function("hermite_sample_interpolated", |b| {
    b.iter(|| hermite::sample_interpolated(&buffer, black_box(Vec3::new(8.3, 9.7, 6.1))))
  });

  c.bench_function("hermite_sample_grid", |b| {
    b.iter(|| hermite::sample(&buffer, black_box(8), black_box(9), black_box(6)))
  });
}

criterion_group!(benches, bench_reorder, bench_hermite);
criterion_main!(benches);
