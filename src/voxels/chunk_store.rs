//! # Chunk Store
//!
//! A fixed grid of `world_size_x × world_size_z` chunks addressed by absolute
//! voxel coordinate. [`ChunkGrid`] holds the addressing logic for any value
//! type, [`ChunkStore`] specialises it for voxel identifiers and keeps the
//! running count of non-air voxels.
//!
//! Out-of-range coordinates are never an error: reads return air, writes are
//! ignored. Generation code routinely reads neighbours past the world edge.

use cgmath::{Point2, Point3};

use crate::config::WorldDimensions;

use super::block::{is_solid, VoxelId, AIR};
use super::chunk::{chunk_iteration::ChunkVoxelIterator, Chunk};

/// Absolute-coordinate addressing over a fixed grid of dense chunks.
#[derive(Debug, Clone)]
pub struct ChunkGrid<T> {
    dimensions: WorldDimensions,
    /// Chunks ordered by chunk X, then chunk Z: `index = cx + world_size_x * cz`.
    chunks: Vec<Chunk<T>>,
}

/// A resolved in-range coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoxelLocation {
    /// Index into the chunk list.
    pub chunk: usize,
    /// Chunk-local X.
    pub local_x: usize,
    /// Y (not chunked).
    pub y: usize,
    /// Chunk-local Z.
    pub local_z: usize,
}

impl<T: Copy> ChunkGrid<T> {
    /// Allocates every chunk of the grid, filled with `value`.
    pub fn new(dimensions: WorldDimensions, value: T) -> Self {
        let mut chunks = Vec::with_capacity(dimensions.chunk_count());
        for cz in 0..dimensions.world_size_z {
            for cx in 0..dimensions.world_size_x {
                chunks.push(Chunk::filled(
                    Point2::new(cx, cz),
                    dimensions.chunk_size,
                    dimensions.max_height,
                    value,
                ));
            }
        }
        ChunkGrid { dimensions, chunks }
    }

    /// The grid's dimensions.
    pub fn dimensions(&self) -> WorldDimensions {
        self.dimensions
    }

    /// Voxel extent as `(x, y, z)`.
    pub fn extent(&self) -> (usize, usize, usize) {
        self.dimensions.voxel_extent()
    }

    /// Resolves an absolute coordinate, or `None` when it is outside the world.
    #[inline]
    pub fn locate(&self, x: i32, y: i32, z: i32) -> Option<VoxelLocation> {
        let (size_x, size_y, size_z) = self.extent();
        if x < 0 || y < 0 || z < 0 {
            return None;
        }
        let (x, y, z) = (x as usize, y as usize, z as usize);
        if x >= size_x || y >= size_y || z >= size_z {
            return None;
        }
        let chunk_size = self.dimensions.chunk_size;
        Some(VoxelLocation {
            chunk: x / chunk_size + self.dimensions.world_size_x * (z / chunk_size),
            local_x: x % chunk_size,
            y,
            local_z: z % chunk_size,
        })
    }

    /// Reads a value, or `None` when out of range.
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<T> {
        self.locate(x, y, z)
            .map(|loc| self.chunks[loc.chunk].get(loc.local_x, loc.y, loc.local_z))
    }

    /// Writes a value and returns the previous one, or `None` (and no write)
    /// when out of range.
    #[inline]
    pub fn replace(&mut self, x: i32, y: i32, z: i32, value: T) -> Option<T> {
        let loc = self.locate(x, y, z)?;
        Some(self.chunks[loc.chunk].replace(loc.local_x, loc.y, loc.local_z, value))
    }

    /// Overwrites every value of every chunk.
    pub fn fill(&mut self, value: T) {
        for chunk in &mut self.chunks {
            chunk.fill(value);
        }
    }

    /// All chunks in grid order.
    pub fn chunks(&self) -> &[Chunk<T>] {
        &self.chunks
    }

    /// Mutable access to all chunks in grid order.
    pub fn chunks_mut(&mut self) -> &mut [Chunk<T>] {
        &mut self.chunks
    }

    /// Total number of voxel slots.
    pub fn capacity(&self) -> usize {
        self.dimensions.chunk_count() * self.dimensions.voxels_per_chunk()
    }
}

/// Voxel identifier storage with a running count of non-air voxels.
#[derive(Debug, Clone)]
pub struct ChunkStore {
    grid: ChunkGrid<VoxelId>,
    active_voxels: usize,
}

impl ChunkStore {
    /// Allocates an all-air store.
    pub fn new(dimensions: WorldDimensions) -> Self {
        ChunkStore {
            grid: ChunkGrid::new(dimensions, AIR),
            active_voxels: 0,
        }
    }

    /// Bounds-checked write. Out-of-range coordinates are silently ignored.
    ///
    /// Keeps the active count in step: air to solid increments it, solid to air
    /// decrements it, anything else leaves it alone.
    pub fn set_voxel(&mut self, x: i32, y: i32, z: i32, id: VoxelId) {
        if let Some(previous) = self.grid.replace(x, y, z, id) {
            match (is_solid(previous), is_solid(id)) {
                (false, true) => self.active_voxels += 1,
                (true, false) => self.active_voxels -= 1,
                _ => {}
            }
        }
    }

    /// Bounds-checked read. Out-of-range coordinates read as air.
    #[inline]
    pub fn get_voxel(&self, x: i32, y: i32, z: i32) -> VoxelId {
        self.grid.get(x, y, z).unwrap_or(AIR)
    }

    /// Number of non-air voxels.
    pub fn active_voxels(&self) -> usize {
        self.active_voxels
    }

    /// Every non-air voxel as `(world position, id)`, chunk by chunk in layout order.
    pub fn iter_active(&self) -> impl Iterator<Item = (Point3<usize>, VoxelId)> + '_ {
        self.grid.chunks().iter().flat_map(ChunkVoxelIterator::new)
    }

    /// Resets every voxel to air.
    pub fn clear(&mut self) {
        self.grid.fill(AIR);
        self.active_voxels = 0;
    }

    /// The underlying grid.
    pub fn grid(&self) -> &ChunkGrid<VoxelId> {
        &self.grid
    }

    /// Mutable grid access for the populator. Callers must settle the active
    /// count afterwards through [`apply_active_delta`](Self::apply_active_delta).
    pub(crate) fn grid_mut(&mut self) -> &mut ChunkGrid<VoxelId> {
        &mut self.grid
    }

    /// Merges a population run's net change in non-air voxels.
    pub(crate) fn apply_active_delta(&mut self, delta: i64) {
        let merged = self.active_voxels as i64 + delta;
        debug_assert!(merged >= 0, "active voxel count went negative");
        self.active_voxels = merged.max(0) as usize;
    }

    /// Recounts non-air voxels from scratch.
    pub fn recount_active(&self) -> usize {
        self.grid.chunks().iter().map(Chunk::count_active).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dimensions() -> WorldDimensions {
        WorldDimensions {
            chunk_size: 4,
            world_size_x: 2,
            world_size_z: 3,
            max_height: 5,
        }
    }

    #[test]
    fn test_locate_maps_to_chunk_and_local_coordinates() {
        let grid = ChunkGrid::new(dimensions(), 0u8);
        let loc = grid.locate(5, 2, 9).unwrap();
        assert_eq!(
            loc,
            VoxelLocation {
                chunk: 1 + 2 * 2,
                local_x: 1,
                y: 2,
                local_z: 1
            }
        );
        assert_eq!(grid.chunks()[loc.chunk].position, Point2::new(1, 2));
        assert!(grid.locate(8, 0, 0).is_none());
        assert!(grid.locate(0, 5, 0).is_none());
        assert!(grid.locate(0, 0, 12).is_none());
        assert!(grid.locate(-1, 0, 0).is_none());
    }

    #[test]
    fn test_set_and_get_every_in_range_voxel() {
        let mut store = ChunkStore::new(dimensions());
        let (sx, sy, sz) = store.grid().extent();
        for z in 0..sz as i32 {
            for y in 0..sy as i32 {
                for x in 0..sx as i32 {
                    let id = ((x + y + z) % 3) as VoxelId;
                    store.set_voxel(x, y, z, id);
                    assert_eq!(store.get_voxel(x, y, z), id);
                }
            }
        }
        assert_eq!(store.active_voxels(), store.recount_active());
    }

    #[test]
    fn test_out_of_range_access_is_inert() {
        let mut store = ChunkStore::new(dimensions());
        for (x, y, z) in [(-1, 0, 0), (0, -1, 0), (0, 0, -1), (8, 0, 0), (0, 5, 0), (0, 0, 12)] {
            store.set_voxel(x, y, z, 3);
            assert_eq!(store.get_voxel(x, y, z), AIR);
        }
        assert_eq!(store.active_voxels(), 0);
        assert_eq!(store.iter_active().count(), 0);
    }

    #[test]
    fn test_active_count_tracks_transitions_only() {
        let mut store = ChunkStore::new(dimensions());
        store.set_voxel(1, 1, 1, 2);
        assert_eq!(store.active_voxels(), 1);
        store.set_voxel(1, 1, 1, 2);
        store.set_voxel(1, 1, 1, 4);
        assert_eq!(store.active_voxels(), 1);
        store.set_voxel(1, 1, 1, AIR);
        assert_eq!(store.active_voxels(), 0);
        store.set_voxel(1, 1, 1, AIR);
        assert_eq!(store.active_voxels(), 0);
    }

    #[test]
    fn test_iter_active_is_chunk_major() {
        let mut store = ChunkStore::new(dimensions());
        store.set_voxel(4, 0, 0, 1); // chunk 1
        store.set_voxel(0, 4, 0, 2); // chunk 0
        let order: Vec<_> = store.iter_active().map(|(_, id)| id).collect();
        assert_eq!(order, vec![2, 1]);
    }
}
