use voxel_world::build_terrain_world;
use voxel_world::config::{MeshingMode, VoxelWorldConfig};
use voxel_world::error::{ConfigError, WorldError};
use voxel_world::rendering::ModelGeometry;

fn config(mode: MeshingMode) -> VoxelWorldConfig {
    VoxelWorldConfig {
        chunk_size: 8,
        world_size_x: 2,
        world_size_z: 2,
        max_height: 32,
        mode,
        worker_threads: Some(2),
        ..VoxelWorldConfig::default()
    }
}

#[test]
fn terrain_world_meshes_to_cubes() {
    let (world, model) = build_terrain_world(&config(MeshingMode::InstancedCubes), 7)
        .expect("valid config");
    assert!(world.active_voxels() > 0);
    assert_eq!(model.instance_count(), world.active_voxels());

    let instances = model.instances().expect("cube model");
    let colors = instances.colors.as_ref().expect("palette attached");
    assert_eq!(colors.len(), instances.instance_count);
}

#[test]
fn terrain_world_meshes_to_a_surface() {
    let (world, model) = build_terrain_world(&config(MeshingMode::SurfaceNets), 7)
        .expect("valid config");
    assert!(world.stats().inside_samples > 0);
    assert!(matches!(model.geometry(), ModelGeometry::Surface(_)));
    assert!(model.stats().triangle_count > 0);
    assert_eq!(model.stats().active_cells, model.mesh().vertex_count());
}

#[test]
fn invalid_config_is_rejected_before_population() {
    let config = VoxelWorldConfig {
        chunk_size: 0,
        ..config(MeshingMode::InstancedCubes)
    };
    assert!(matches!(
        build_terrain_world(&config, 7),
        Err(WorldError::Config(ConfigError::NonPositiveDimension { name: "chunk_size", .. }))
    ));
}

#[test]
fn missing_config_file_is_an_io_error() {
    let path = std::env::temp_dir().join("voxel-world-no-such-dir").join("world.json");
    assert!(matches!(VoxelWorldConfig::load(&path), Err(ConfigError::Io(_))));
}
