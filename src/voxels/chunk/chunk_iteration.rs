//! # Chunk Iteration Module
//!
//! This module provides an iterator over the non-air voxels of a chunk, in the
//! chunk's layout order (local Z, then local X, then Y). The instanced cube
//! mesher relies on this order being stable.

use cgmath::Point3;

use crate::voxels::block::{is_solid, VoxelId};

use super::Chunk;

/// An iterator over all non-air voxels in a chunk.
///
/// Yields world-space voxel coordinates together with the voxel identifier.
pub struct ChunkVoxelIterator<'a> {
    /// Reference to the chunk being iterated over
    chunk_ref: &'a Chunk<VoxelId>,
    /// Next flat index to examine
    current_offset: usize,
    /// World-space X/Z of the chunk origin
    origin: (usize, usize),
}

impl<'a> ChunkVoxelIterator<'a> {
    /// Creates a new iterator positioned before the first voxel of the chunk.
    pub fn new(chunk_ref: &'a Chunk<VoxelId>) -> Self {
        ChunkVoxelIterator {
            chunk_ref,
            current_offset: 0,
            origin: chunk_ref.origin(),
        }
    }
}

impl<'a> Iterator for ChunkVoxelIterator<'a> {
    type Item = (Point3<usize>, VoxelId);

    fn next(&mut self) -> Option<Self::Item> {
        let data = self.chunk_ref.data();

        // Skip air
        while self.current_offset < data.len() && !is_solid(data[self.current_offset]) {
            self.current_offset += 1;
        }
        if self.current_offset >= data.len() {
            return None;
        }

        let id = data[self.current_offset];
        let (local_x, y, local_z) = self.chunk_ref.coordinate_of(self.current_offset);
        self.current_offset += 1;

        Some((
            Point3::new(self.origin.0 + local_x, y, self.origin.1 + local_z),
            id,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Point2;

    #[test]
    fn test_iterator_skips_air_and_reports_world_positions() {
        let mut chunk = Chunk::filled(Point2::new(1, 0), 4, 4, 0u8);
        chunk.replace(0, 3, 0, 2);
        chunk.replace(2, 0, 1, 7);

        let voxels: Vec<_> = ChunkVoxelIterator::new(&chunk).collect();
        assert_eq!(
            voxels,
            vec![(Point3::new(4, 3, 0), 2), (Point3::new(6, 0, 1), 7)]
        );
    }

    #[test]
    fn test_empty_chunk_yields_nothing() {
        let chunk = Chunk::filled(Point2::new(0, 0), 4, 4, 0u8);
        assert_eq!(ChunkVoxelIterator::new(&chunk).count(), 0);
    }
}
