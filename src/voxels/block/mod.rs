//! # Block Module
//!
//! This module provides the voxel material vocabulary of the world: the compact
//! [`VoxelId`] stored per voxel, the built-in [`BlockType`] materials, the six
//! [`BlockSide`] faces used to build the instanced cube template, and the
//! [`MaterialPalette`] that maps identifiers to instance colors.

use block_type::BlockType;

pub mod block_side;
pub mod block_type;
pub mod palette;

pub use palette::MaterialPalette;

/// The underlying integer type used to identify a voxel's material.
///
/// `0` is reserved for air and never renders.
pub type VoxelId = u8;

/// The reserved "empty" identifier.
pub const AIR: VoxelId = BlockType::AIR as VoxelId;

/// Returns `true` when the identifier describes a solid, visible voxel.
#[inline]
pub fn is_solid(id: VoxelId) -> bool {
    id != AIR
}

/// Default RGB color for each built-in block type, indexed by `BlockType as usize`.
///
/// Air has an entry so the table can be indexed directly; it is never emitted.
pub static BLOCK_TYPE_TO_COLOR: [[f32; 3]; 7] = [
    [0.0, 0.0, 0.0],    // AIR
    [0.45, 0.31, 0.18], // DIRT
    [0.33, 0.62, 0.22], // GRASS
    [0.50, 0.50, 0.52], // STONE
    [0.55, 0.40, 0.22], // WOOD
    [0.86, 0.80, 0.55], // SAND
    [1.0, 1.0, 1.0],    // WHITE
];
