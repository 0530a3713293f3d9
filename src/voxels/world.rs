//! # Voxel World
//!
//! The aggregate root: voxel storage, the optional density field, the
//! population machinery and the mesher selected by the world's
//! [`MeshingMode`].
//!
//! ## Call Order
//!
//! Populate fully, then mesh once. Population
//! ([`generate_voxels_parallel`](VoxelWorld::generate_voxels_parallel),
//! [`generate_sdf_parallel`](VoxelWorld::generate_sdf_parallel)) joins every
//! worker before returning, and
//! [`create_instanced_model`](VoxelWorld::create_instanced_model) only reads
//! storage, so the borrow checker already forbids meshing while a population
//! run is in flight. Meshing a world that was never populated is allowed and
//! meshes whatever the storage holds (air, or unset density).
//!
//! ## Mode Dispatch
//!
//! The mode is fixed at construction:
//! - `InstancedCubes`: the model is the cube template plus one instance per non-air voxel
//! - `SurfaceNets`: the world also owns a [`DensityField`] and the model is a single surface mesh

use log::{debug, info};
use web_time::Instant;

use crate::config::{MeshingMode, VoxelWorldConfig, WorldDimensions};
use crate::error::{ConfigError, PopulateError};
use crate::rendering::meshing::{build_instances, surface_nets, CubeGeometry};
use crate::rendering::model::{InstancedModel, MeshStats, ModelGeometry};
use crate::task_management::WorkerPool;

use super::block::{is_solid, MaterialPalette, VoxelId, AIR};
use super::chunk_store::ChunkStore;
use super::density::{is_inside, DensityField, UNSET_DENSITY};
use super::tasks::{ParallelPopulator, PopulationReport};

/// A snapshot of the world's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorldStats {
    /// Storage and mesher selection.
    pub mode: MeshingMode,
    /// Chunks in the grid.
    pub chunk_count: usize,
    /// Addressable voxels.
    pub capacity: usize,
    /// Non-air voxels.
    pub active_voxels: usize,
    /// Density samples inside the surface. Zero in cube mode.
    pub inside_samples: usize,
}

/// A fixed-size chunked voxel world.
#[derive(Debug, Clone)]
pub struct VoxelWorld {
    dimensions: WorldDimensions,
    voxel_size: f32,
    mode: MeshingMode,
    cube_geometry: CubeGeometry,
    palette: Option<MaterialPalette>,
    store: ChunkStore,
    density: Option<DensityField>,
    populator: ParallelPopulator,
}

impl VoxelWorld {
    /// Allocates a world with the default worker count and work-unit size.
    ///
    /// # Arguments
    /// * `chunk_size` - Chunk edge length along X and Z, in voxels
    /// * `world_size_x` - World extent along X, in chunks
    /// * `world_size_z` - World extent along Z, in chunks
    /// * `max_height` - Voxel count along Y
    /// * `voxel_size` - World-space edge length of a voxel
    /// * `cube_geometry` - Template of the cube path
    /// * `mode` - Storage and mesher selection
    ///
    /// # Errors
    /// [`ConfigError`] when a dimension or the voxel size is not positive.
    pub fn new(
        chunk_size: i32,
        world_size_x: i32,
        world_size_z: i32,
        max_height: i32,
        voxel_size: f32,
        cube_geometry: CubeGeometry,
        mode: MeshingMode,
    ) -> Result<Self, ConfigError> {
        let config = VoxelWorldConfig {
            chunk_size,
            world_size_x,
            world_size_z,
            max_height,
            voxel_size,
            mode,
            ..VoxelWorldConfig::default()
        };
        Self::from_config(&config, cube_geometry)
    }

    /// Allocates a world from a configuration.
    ///
    /// # Errors
    /// Whatever [`VoxelWorldConfig::validate`] rejects.
    pub fn from_config(
        config: &VoxelWorldConfig,
        cube_geometry: CubeGeometry,
    ) -> Result<Self, ConfigError> {
        let dimensions = config.validate()?;
        let pool = WorkerPool::new(config.resolved_worker_threads());
        let density = match config.mode {
            MeshingMode::InstancedCubes => None,
            MeshingMode::SurfaceNets => Some(DensityField::new(dimensions)),
        };
        let (size_x, size_y, size_z) = dimensions.voxel_extent();
        info!(
            "Allocated {:?} world: {}x{}x{} voxels in {} chunks, {} workers",
            config.mode,
            size_x,
            size_y,
            size_z,
            dimensions.chunk_count(),
            pool.num_workers()
        );

        Ok(VoxelWorld {
            dimensions,
            voxel_size: config.voxel_size,
            mode: config.mode,
            cube_geometry,
            palette: None,
            store: ChunkStore::new(dimensions),
            density,
            populator: ParallelPopulator::new(pool, config.work_unit),
        })
    }

    /// Attaches a material palette; cube instances then carry colors.
    pub fn with_palette(mut self, palette: MaterialPalette) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Replaces or removes the material palette.
    pub fn set_palette(&mut self, palette: Option<MaterialPalette>) {
        self.palette = palette;
    }

    /// The attached material palette.
    pub fn palette(&self) -> Option<&MaterialPalette> {
        self.palette.as_ref()
    }

    /// Validated world dimensions.
    pub fn dimensions(&self) -> WorldDimensions {
        self.dimensions
    }

    /// World-space edge length of a voxel.
    pub fn voxel_size(&self) -> f32 {
        self.voxel_size
    }

    /// The mode fixed at construction.
    pub fn mode(&self) -> MeshingMode {
        self.mode
    }

    /// The cube template.
    pub fn cube_geometry(&self) -> &CubeGeometry {
        &self.cube_geometry
    }

    /// The voxel store.
    pub fn store(&self) -> &ChunkStore {
        &self.store
    }

    /// The density field, present only in surface-nets mode.
    pub fn density_field(&self) -> Option<&DensityField> {
        self.density.as_ref()
    }

    /// The populator both generation entry points run on.
    pub fn populator(&self) -> &ParallelPopulator {
        &self.populator
    }

    /// Bounds-checked voxel write. Out-of-range coordinates are ignored.
    pub fn set_voxel(&mut self, x: i32, y: i32, z: i32, id: VoxelId) {
        self.store.set_voxel(x, y, z, id);
    }

    /// Voxel read. Out-of-range coordinates read as air.
    pub fn get_voxel(&self, x: i32, y: i32, z: i32) -> VoxelId {
        self.store.get_voxel(x, y, z)
    }

    /// Number of non-air voxels.
    pub fn active_voxels(&self) -> usize {
        self.store.active_voxels()
    }

    /// Bounds-checked density write. Out-of-range coordinates are ignored.
    ///
    /// # Errors
    /// [`PopulateError::ModeMismatch`] in cube mode, which has no density field.
    pub fn set_density(&mut self, x: i32, y: i32, z: i32, density: f32) -> Result<(), PopulateError> {
        let field = self.density_mut()?;
        field.set(x, y, z, density);
        Ok(())
    }

    /// Density read. Out-of-range coordinates, and every coordinate of a cube
    /// world, read as [`UNSET_DENSITY`].
    pub fn get_density(&self, x: i32, y: i32, z: i32) -> f32 {
        self.density
            .as_ref()
            .map_or(UNSET_DENSITY, |field| field.get(x, y, z))
    }

    /// Fills the voxel store by calling `f` once for every coordinate, on the
    /// worker pool.
    ///
    /// `f` returns a material and a solidity hint; voxels whose hint is false
    /// are stored as air. `f` must be pure: it runs on several threads at
    /// once, in no particular order.
    ///
    /// # Errors
    /// [`PopulateError::Callback`] when `f` panicked, tagged with the
    /// coordinate. The store is cleared to all air before the error is
    /// returned.
    pub fn generate_voxels_parallel<F>(&mut self, f: F) -> Result<PopulationReport, PopulateError>
    where
        F: Fn(i32, i32, i32) -> (VoxelId, bool) + Sync,
    {
        let sample = |x: i32, y: i32, z: i32| {
            let (id, solid) = f(x, y, z);
            if solid {
                id
            } else {
                AIR
            }
        };

        let result = self
            .populator
            .populate(self.store.grid_mut(), &sample, |id: &VoxelId| is_solid(*id));
        match result {
            Ok(report) => {
                self.store.apply_active_delta(report.active_delta);
                debug_assert_eq!(self.store.active_voxels(), self.store.recount_active());
                info!("World holds {} active voxels", self.store.active_voxels());
                Ok(report)
            }
            Err(error) => {
                self.store.clear();
                Err(error)
            }
        }
    }

    /// Fills the density field by calling `f` once for every sample, on the
    /// worker pool. Same contract as
    /// [`generate_voxels_parallel`](Self::generate_voxels_parallel).
    ///
    /// # Errors
    /// [`PopulateError::ModeMismatch`] in cube mode. [`PopulateError::Callback`]
    /// when `f` panicked; the field is reset to unset before returning.
    pub fn generate_sdf_parallel<F>(&mut self, f: F) -> Result<PopulationReport, PopulateError>
    where
        F: Fn(i32, i32, i32) -> f32 + Sync,
    {
        let populator = self.populator;
        let field = self.density_mut()?;
        match populator.populate(field.grid_mut(), &f, |d: &f32| is_inside(*d)) {
            Ok(report) => Ok(report),
            Err(error) => {
                field.reset();
                Err(error)
            }
        }
    }

    /// Meshes the world with the mesher of its mode.
    ///
    /// Call once per population cycle, after population has returned.
    pub fn create_instanced_model(&self) -> InstancedModel {
        let start = Instant::now();
        let (geometry, mut stats) = match &self.density {
            None => {
                let instances = build_instances(
                    &self.store,
                    &self.cube_geometry,
                    self.voxel_size,
                    self.palette.as_ref(),
                );
                let base = self.cube_geometry.mesh.clone();
                let stats = MeshStats {
                    mode: self.mode,
                    instance_count: instances.instance_count,
                    active_cells: 0,
                    vertex_count: base.vertex_count(),
                    triangle_count: base.triangle_count(),
                    elapsed_ms: 0.0,
                };
                (ModelGeometry::Instanced { base, instances }, stats)
            }
            Some(field) => {
                let output = surface_nets(field, self.voxel_size);
                let stats = MeshStats {
                    mode: self.mode,
                    instance_count: 0,
                    active_cells: output.active_cells,
                    vertex_count: output.mesh.vertex_count(),
                    triangle_count: output.mesh.triangle_count(),
                    elapsed_ms: 0.0,
                };
                (ModelGeometry::Surface(output.mesh), stats)
            }
        };
        stats.elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        debug!("Created model: {:?}", stats);

        InstancedModel::new(geometry, stats)
    }

    /// Resets the voxel store to air and the density field to unset.
    pub fn clear(&mut self) {
        self.store.clear();
        if let Some(field) = self.density.as_mut() {
            field.reset();
        }
    }

    /// Current counters.
    pub fn stats(&self) -> WorldStats {
        WorldStats {
            mode: self.mode,
            chunk_count: self.dimensions.chunk_count(),
            capacity: self.store.grid().capacity(),
            active_voxels: self.store.active_voxels(),
            inside_samples: self
                .density
                .as_ref()
                .map_or(0, DensityField::inside_samples),
        }
    }

    fn density_mut(&mut self) -> Result<&mut DensityField, PopulateError> {
        let actual = self.mode;
        self.density.as_mut().ok_or(PopulateError::ModeMismatch {
            expected: MeshingMode::SurfaceNets,
            actual,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::block::block_type::BlockType;

    fn cube_world() -> VoxelWorld {
        VoxelWorld::new(4, 2, 2, 8, 1.0, CubeGeometry::unit(), MeshingMode::InstancedCubes)
            .expect("valid dimensions")
    }

    #[test]
    fn test_construction_rejects_bad_dimensions() {
        let result = VoxelWorld::new(0, 2, 2, 8, 1.0, CubeGeometry::unit(), MeshingMode::InstancedCubes);
        assert!(matches!(
            result,
            Err(ConfigError::NonPositiveDimension { name: "chunk_size", value: 0 })
        ));
        let result = VoxelWorld::new(4, 2, 2, 8, -1.0, CubeGeometry::unit(), MeshingMode::SurfaceNets);
        assert!(matches!(result, Err(ConfigError::NonPositiveVoxelSize(_))));
    }

    #[test]
    fn test_set_and_get_voxel_track_active_count() {
        let mut world = cube_world();
        world.set_voxel(7, 7, 7, BlockType::SAND.id());
        world.set_voxel(7, 7, 7, BlockType::SAND.id());
        world.set_voxel(8, 0, 0, BlockType::SAND.id());
        assert_eq!(world.get_voxel(7, 7, 7), BlockType::SAND.id());
        assert_eq!(world.get_voxel(-1, 0, 0), AIR);
        assert_eq!(world.active_voxels(), 1);
    }

    #[test]
    fn test_cube_world_has_no_density() {
        let mut world = cube_world();
        let mismatch = PopulateError::ModeMismatch {
            expected: MeshingMode::SurfaceNets,
            actual: MeshingMode::InstancedCubes,
        };
        assert_eq!(world.set_density(0, 0, 0, -1.0), Err(mismatch.clone()));
        assert_eq!(world.generate_sdf_parallel(|_, _, _| -1.0).unwrap_err(), mismatch);
        assert_eq!(world.get_density(0, 0, 0), UNSET_DENSITY);
    }

    #[test]
    fn test_solidity_hint_overrides_the_id() {
        let mut world = cube_world();
        world
            .generate_voxels_parallel(|_, y, _| (BlockType::STONE.id(), y < 2))
            .expect("pure callback");
        assert_eq!(world.active_voxels(), 2 * 8 * 8);
        assert_eq!(world.get_voxel(3, 2, 3), AIR);
    }

    #[test]
    fn test_failed_population_clears_the_world() {
        let mut world = cube_world();
        world.set_voxel(0, 0, 0, BlockType::DIRT.id());
        let error = world
            .generate_voxels_parallel(|x, _, _| {
                if x == 5 {
                    panic!("bad column");
                }
                (BlockType::DIRT.id(), true)
            })
            .unwrap_err();
        assert!(matches!(error, PopulateError::Callback { x: 5, .. }));
        assert_eq!(world.active_voxels(), 0);
        assert_eq!(world.store().recount_active(), 0);
    }

    #[test]
    fn test_cube_model_carries_one_instance_per_voxel() {
        let mut world = cube_world().with_palette(MaterialPalette::with_block_types());
        world.set_voxel(1, 1, 1, BlockType::GRASS.id());
        world.set_voxel(2, 1, 1, BlockType::WOOD.id());
        let model = world.create_instanced_model();

        assert_eq!(model.instance_count(), 2);
        assert_eq!(model.stats().instance_count, 2);
        assert_eq!(model.mesh().indices.len(), 36);
        let colors = model.instances().and_then(|i| i.colors.as_ref()).map(Vec::len);
        assert_eq!(colors, Some(2));
    }

    #[test]
    fn test_surface_world_meshes_the_density_field() {
        let mut world = VoxelWorld::new(4, 2, 2, 16, 1.0, CubeGeometry::unit(), MeshingMode::SurfaceNets)
            .expect("valid dimensions");
        world
            .generate_sdf_parallel(|_, y, _| y as f32 - 10.0)
            .expect("pure callback");
        assert_eq!(world.stats().inside_samples, 10 * 8 * 8);

        let model = world.create_instanced_model();
        assert_eq!(model.stats().active_cells, 49);
        assert_eq!(model.stats().triangle_count, 72);
        assert_eq!(model.instance_count(), 1);

        world.clear();
        assert_eq!(world.stats().inside_samples, 0);
    }
}
