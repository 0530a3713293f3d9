//! # World Configuration
//!
//! Construction parameters for a [`VoxelWorld`](crate::voxels::world::VoxelWorld).
//! Nothing here is runtime-mutable: changing the world shape means building a
//! new world.
//!
//! Configurations can be written in code or loaded from JSON:
//!
//! ```
//! use voxel_world::config::{MeshingMode, VoxelWorldConfig};
//!
//! let config = VoxelWorldConfig::from_json_str(
//!     r#"{ "chunk_size": 8, "world_size_x": 2, "world_size_z": 2,
//!          "max_height": 32, "mode": "SurfaceNets" }"#,
//! )
//! .unwrap();
//! assert_eq!(config.mode, MeshingMode::SurfaceNets);
//! assert_eq!(config.voxel_size, 1.0);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::task_management::WorkerPool;

/// Selects which storage and mesher a world uses. Fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeshingMode {
    /// One cube instance per non-air voxel.
    InstancedCubes,
    /// Smooth isosurface extracted from the density field.
    SurfaceNets,
}

/// Granularity of the population work units handed to worker threads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum WorkUnitKind {
    /// One unit per chunk (all of its columns).
    Chunk,
    /// One unit per voxel column (a single X/Z position, full height).
    #[default]
    Column,
}

/// Construction parameters of a voxel world.
///
/// Sizes are signed so that bad input (e.g. a negative value from a JSON file)
/// survives until [`validate`](Self::validate) can name it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoxelWorldConfig {
    /// Edge length of a chunk along X and Z, in voxels.
    pub chunk_size: i32,
    /// World extent along X, in chunks.
    pub world_size_x: i32,
    /// World extent along Z, in chunks.
    pub world_size_z: i32,
    /// Voxel count along Y. Y is not chunked.
    pub max_height: i32,
    /// World-space edge length of one voxel. Only scales meshes.
    pub voxel_size: f32,
    /// Which mesher (and storage) the world uses.
    pub mode: MeshingMode,
    /// Population worker count. `None` uses the available parallelism.
    pub worker_threads: Option<usize>,
    /// Population work-unit granularity.
    pub work_unit: WorkUnitKind,
}

impl Default for VoxelWorldConfig {
    fn default() -> Self {
        VoxelWorldConfig {
            chunk_size: 16,
            world_size_x: 4,
            world_size_z: 4,
            max_height: 64,
            voxel_size: 1.0,
            mode: MeshingMode::InstancedCubes,
            worker_threads: None,
            work_unit: WorkUnitKind::default(),
        }
    }
}

/// Validated, unsigned world dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldDimensions {
    /// Chunk edge length along X and Z.
    pub chunk_size: usize,
    /// Chunks along X.
    pub world_size_x: usize,
    /// Chunks along Z.
    pub world_size_z: usize,
    /// Voxels along Y.
    pub max_height: usize,
}

impl WorldDimensions {
    /// Voxel extent of the world as `(x, y, z)`.
    pub fn voxel_extent(&self) -> (usize, usize, usize) {
        (
            self.world_size_x * self.chunk_size,
            self.max_height,
            self.world_size_z * self.chunk_size,
        )
    }

    /// Number of chunks in the world.
    pub fn chunk_count(&self) -> usize {
        self.world_size_x * self.world_size_z
    }

    /// Number of voxels in a single chunk.
    pub fn voxels_per_chunk(&self) -> usize {
        self.chunk_size * self.chunk_size * self.max_height
    }
}

impl VoxelWorldConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Checks every parameter and returns the unsigned dimensions.
    ///
    /// # Errors
    /// The first non-positive dimension, a world too large to address with
    /// `i32` coordinates or to allocate, a bad voxel size, or a zero worker count.
    pub fn validate(&self) -> Result<WorldDimensions, ConfigError> {
        let chunk_size = positive("chunk_size", self.chunk_size)?;
        let world_size_x = positive("world_size_x", self.world_size_x)?;
        let world_size_z = positive("world_size_z", self.world_size_z)?;
        let max_height = positive("max_height", self.max_height)?;

        if !(self.voxel_size.is_finite() && self.voxel_size > 0.0) {
            return Err(ConfigError::NonPositiveVoxelSize(self.voxel_size));
        }
        if self.worker_threads == Some(0) {
            return Err(ConfigError::ZeroWorkers);
        }

        let dimensions = WorldDimensions {
            chunk_size,
            world_size_x,
            world_size_z,
            max_height,
        };
        check_addressable(&dimensions)?;
        Ok(dimensions)
    }

    /// The worker count population will use.
    pub fn resolved_worker_threads(&self) -> usize {
        self.worker_threads
            .unwrap_or_else(|| WorkerPool::with_available_parallelism().num_workers())
    }
}

/// Voxel extents must fit `i32` coordinates and the total sample count must fit `usize`.
fn check_addressable(dimensions: &WorldDimensions) -> Result<(), ConfigError> {
    let extent = |name: &'static str, chunks: usize| {
        dimensions
            .chunk_size
            .checked_mul(chunks)
            .filter(|voxels| *voxels <= i32::MAX as usize)
            .ok_or(ConfigError::TooLarge { name })
    };
    let size_x = extent("world_size_x", dimensions.world_size_x)?;
    let size_z = extent("world_size_z", dimensions.world_size_z)?;

    size_x
        .checked_mul(size_z)
        .and_then(|columns| columns.checked_mul(dimensions.max_height))
        .ok_or(ConfigError::TooLarge { name: "max_height" })?;
    Ok(())
}

fn positive(name: &'static str, value: i32) -> Result<usize, ConfigError> {
    if value > 0 {
        Ok(value as usize)
    } else {
        Err(ConfigError::NonPositiveDimension {
            name,
            value: value as i64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let dims = VoxelWorldConfig::default().validate().unwrap();
        assert_eq!(dims.voxel_extent(), (64, 64, 64));
        assert_eq!(dims.chunk_count(), 16);
    }

    #[test]
    fn test_validate_names_the_bad_dimension() {
        let config = VoxelWorldConfig {
            max_height: 0,
            ..Default::default()
        };
        match config.validate() {
            Err(ConfigError::NonPositiveDimension { name, value }) => {
                assert_eq!(name, "max_height");
                assert_eq!(value, 0);
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let config = VoxelWorldConfig {
            world_size_z: -3,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveDimension {
                name: "world_size_z",
                value: -3
            })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_voxel_size_and_zero_workers() {
        let config = VoxelWorldConfig {
            voxel_size: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveVoxelSize(_))
        ));

        let config = VoxelWorldConfig {
            worker_threads: Some(0),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::ZeroWorkers)));
    }

    #[test]
    fn test_validate_rejects_unaddressable_worlds() {
        let config = VoxelWorldConfig {
            chunk_size: 1 << 20,
            world_size_x: 1 << 12,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooLarge { name: "world_size_x" })
        ));

        let config = VoxelWorldConfig {
            chunk_size: 1 << 16,
            world_size_x: 1 << 14,
            world_size_z: 1 << 14,
            max_height: i32::MAX,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TooLarge { name: "max_height" })
        ));
    }

    #[test]
    fn test_default_worker_count_follows_the_machine() {
        let config = VoxelWorldConfig::default();
        assert_eq!(
            config.resolved_worker_threads(),
            WorkerPool::with_available_parallelism().num_workers()
        );
        let config = VoxelWorldConfig {
            worker_threads: Some(3),
            ..Default::default()
        };
        assert_eq!(config.resolved_worker_threads(), 3);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let path = std::env::temp_dir().join("voxel-world-missing-config.json");
        assert!(matches!(VoxelWorldConfig::load(&path), Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_json_round_trip_keeps_mode_and_work_unit() {
        let config = VoxelWorldConfig {
            mode: MeshingMode::SurfaceNets,
            work_unit: WorkUnitKind::Chunk,
            worker_threads: Some(3),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed = VoxelWorldConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        assert!(matches!(
            VoxelWorldConfig::from_json_str("{ chunk_size: }"),
            Err(ConfigError::Parse(_))
        ));
    }
}
