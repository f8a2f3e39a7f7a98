use std::collections::HashSet;
use std::thread::sleep;
use std::time::Duration;

use glam::IVec3;

use super::*;

/// Mesher producing one quad per build, tagged with a fixed material.
struct FakeMesher {
  padding: u32,
  material: u16,
}

impl Mesher for FakeMesher {
  fn required_padding(&self) -> u32 {
    self.padding
  }

  fn build(&mut self, voxels: &VoxelBuffer) -> Surface {
    // Empty surface for untouched (all-air) buffers.
    if voxels.is_untouched() {
      return Surface::new();
    }
    Surface {
      positions: vec![
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
      ],
      normals: vec![[0.0, 0.0, 1.0]; 4],
      indices: vec![0, 1, 2, 0, 2, 3],
      material_indices: vec![self.material; 2],
    }
  }
}

fn solid_input(coord: BlockCoord, edge: u32) -> MeshInput {
  let mut voxels = VoxelBuffer::new_cubic(edge);
  voxels.fill_isolevel(-1.0);
  MeshInput { coord, voxels }
}

fn drain(worker: &MeshWorker, expected: usize) -> Vec<MeshOutput> {
  let mut blocks = Vec::new();
  for _ in 0..5000 {
    blocks.extend(worker.pop().blocks);
    if blocks.len() >= expected {
      break;
    }
    sleep(Duration::from_millis(1));
  }
  blocks
}

#[test]
fn test_requires_a_mesher() {
  assert!(matches!(
    MeshWorker::new(MeshingConfig::new(4)),
    Err(PipelineError::NoMesherConfigured)
  ));
}

#[test]
fn test_invalid_block_size() {
  let config = MeshingConfig::new(0).with_cuboid(Box::new(FakeMesher {
    padding: 0,
    material: 0,
  }));
  assert!(matches!(
    MeshWorker::new(config),
    Err(PipelineError::InvalidBlockSize { pow2: 0 })
  ));
}

#[test]
fn test_required_padding_is_max_of_capabilities() {
  let config = MeshingConfig::new(4)
    .with_cuboid(Box::new(FakeMesher {
      padding: 1,
      material: 0,
    }))
    .with_smooth(Box::new(FakeMesher {
      padding: 2,
      material: 1,
    }));
  let mut worker = MeshWorker::new(config).unwrap();
  assert_eq!(worker.required_padding(), 2);
  assert_eq!(worker.block_size(), 16);
  worker.stop();
}

#[test]
fn test_both_capabilities_produce_surfaces() {
  let config = MeshingConfig::new(4)
    .with_cuboid(Box::new(FakeMesher {
      padding: 1,
      material: 7,
    }))
    .with_smooth(Box::new(FakeMesher {
      padding: 1,
      material: 9,
    }));
  let mut worker = MeshWorker::new(config).unwrap();

  worker.push(MeshWorkerInput {
    blocks: vec![solid_input(BlockCoord::new(0, 0, 0), 18)],
    priority_position: IVec3::ZERO,
  });

  let blocks = drain(&worker, 1);
  assert_eq!(blocks.len(), 1);
  let out = &blocks[0];

  let cuboid = out.cuboid.as_ref().unwrap();
  assert_eq!(cuboid.triangle_count(), 2);
  assert_eq!(cuboid.material_indices, vec![7, 7]);

  let smooth = out.smooth.as_ref().unwrap();
  assert_eq!(smooth.material_indices, vec![9, 9]);

  worker.stop();
}

#[test]
fn test_disabled_capability_slot_stays_empty() {
  let config = MeshingConfig::new(4).with_smooth(Box::new(FakeMesher {
    padding: 0,
    material: 3,
  }));
  let mut worker = MeshWorker::new(config).unwrap();

  worker.push(MeshWorkerInput {
    blocks: vec![solid_input(BlockCoord::new(1, 2, 3), 16)],
    priority_position: IVec3::ZERO,
  });

  let blocks = drain(&worker, 1);
  assert!(blocks[0].cuboid.is_none());
  assert!(blocks[0].smooth.is_some());

  worker.stop();
}

#[test]
fn test_empty_surface_for_air_block() {
  let config = MeshingConfig::new(4).with_cuboid(Box::new(FakeMesher {
    padding: 0,
    material: 0,
  }));
  let mut worker = MeshWorker::new(config).unwrap();

  worker.push(MeshWorkerInput {
    blocks: vec![MeshInput {
      coord: BlockCoord::new(0, 0, 0),
      voxels: VoxelBuffer::new_cubic(16),
    }],
    priority_position: IVec3::ZERO,
  });

  let blocks = drain(&worker, 1);
  let surface = blocks[0].cuboid.as_ref().unwrap();
  assert!(surface.is_empty());
  assert_eq!(surface.triangle_count(), 0);

  worker.stop();
}

#[test]
#[should_panic(expected = "meshers need at least")]
fn test_unpadded_buffer_is_a_contract_violation() {
  let config = MeshingConfig::new(4).with_cuboid(Box::new(FakeMesher {
    padding: 1,
    material: 0,
  }));
  let worker = MeshWorker::new(config).unwrap();

  // Block-sized buffer, no padding: required is 16 + 2.
  worker.push(MeshWorkerInput {
    blocks: vec![solid_input(BlockCoord::new(0, 0, 0), 16)],
    priority_position: IVec3::ZERO,
  });
}

#[test]
fn test_mesh_conservation() {
  let config = MeshingConfig::new(2).with_cuboid(Box::new(FakeMesher {
    padding: 1,
    material: 0,
  }));
  let mut worker = MeshWorker::new(config).unwrap();

  let coords: Vec<BlockCoord> = (0..16).map(|i| BlockCoord::new(i, -i, 2 * i)).collect();
  worker.push(MeshWorkerInput {
    blocks: coords.iter().map(|&c| solid_input(c, 6)).collect(),
    priority_position: IVec3::new(1, 0, 0),
  });

  let blocks = drain(&worker, 16);
  assert_eq!(blocks.len(), 16);
  let seen: HashSet<BlockCoord> = blocks.iter().map(|b| b.coord).collect();
  assert_eq!(seen, coords.into_iter().collect());

  worker.stop();
}
