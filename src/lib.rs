#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! Chunked voxel storage with parallel procedural population and two meshing
//! strategies: one instanced cube per voxel, or a smooth Surface Nets
//! isosurface extracted from a signed distance field.
//!
//! The crate stops at render-ready buffers. Uploading and drawing them is the
//! job of an external renderer.
//!
//! ## Key Modules
//!
//! * `config` - World construction parameters, loadable from JSON
//! * `error` - Configuration and population errors
//! * `task_management` - The fixed-size worker pool population runs on
//! * `voxels` - Storage, population, terrain presets and the world facade
//! * `rendering` - Cube template, meshers and the model handed to a renderer
//!
//! ## Usage
//!
//! ```rust
//! use voxel_world::config::MeshingMode;
//! use voxel_world::rendering::meshing::CubeGeometry;
//! use voxel_world::voxels::world::VoxelWorld;
//!
//! let mut world = VoxelWorld::new(4, 2, 2, 8, 1.0, CubeGeometry::unit(), MeshingMode::InstancedCubes)
//!     .unwrap();
//! world.generate_voxels_parallel(|_, y, _| (1, y == 0)).unwrap();
//! let model = world.create_instanced_model();
//! assert_eq!(model.instance_count(), 64);
//! ```

use log::{error, info};

use config::{MeshingMode, VoxelWorldConfig};
use error::WorldError;
use rendering::meshing::CubeGeometry;
use rendering::InstancedModel;
use voxels::block::MaterialPalette;
use voxels::terrain::TerrainGenerator;
use voxels::world::VoxelWorld;

pub mod config;
pub mod error;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// Seed of the demo terrain.
pub const DEMO_SEED: u32 = 1337;

/// Entry point of the demo binary.
///
/// Builds a world from the JSON configuration named by the first command-line
/// argument (or the default configuration), fills it with terrain and meshes
/// it once, logging statistics along the way.
pub fn run() {
    let mut log_builder = env_logger::Builder::new();
    log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized");

    let config = match std::env::args().nth(1) {
        Some(path) => match VoxelWorldConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                error!("Could not load configuration from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => VoxelWorldConfig::default(),
    };

    match build_terrain_world(&config, DEMO_SEED) {
        Ok((world, model)) => {
            info!("World: {:?}", world.stats());
            info!("Model: {:?}", model.stats());
        }
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}

/// Builds a world, fills it with [`TerrainGenerator`] terrain in the
/// configured mode and meshes it.
///
/// # Errors
/// [`WorldError`] when the configuration is invalid or population fails.
pub fn build_terrain_world(
    config: &VoxelWorldConfig,
    seed: u32,
) -> Result<(VoxelWorld, InstancedModel), WorldError> {
    let mut world = VoxelWorld::from_config(config, CubeGeometry::unit())?
        .with_palette(MaterialPalette::with_block_types());
    let terrain = TerrainGenerator::new(seed, world.dimensions().max_height);

    match config.mode {
        MeshingMode::InstancedCubes => {
            world.generate_voxels_parallel(|x, y, z| terrain.heightmap_voxel(x, y, z))?;
        }
        MeshingMode::SurfaceNets => {
            world.generate_sdf_parallel(|x, y, z| terrain.heightmap_density(x, y, z))?;
        }
    }

    let model = world.create_instanced_model();
    Ok((world, model))
}
