//! # Block Type Module
//!
//! This module defines the built-in materials used by the terrain presets.
//! Worlds are free to store any [`VoxelId`]; these are simply the identifiers the
//! crate itself knows colors for.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::{VoxelId, BLOCK_TYPE_TO_COLOR};

/// Enumerates the built-in block types.
///
/// The discriminants are the stored [`VoxelId`] values. The `FromPrimitive`
/// derive allows conversion back from the compact identifier.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
pub enum BlockType {
    /// Empty space. Never solid, never rendered.
    AIR = 0,

    /// Sub-surface soil layer.
    DIRT = 1,

    /// The top layer of a terrain column.
    GRASS = 2,

    /// Deep rock below the dirt band.
    STONE = 3,

    /// A wooden block.
    WOOD = 4,

    /// A sand block.
    SAND = 5,

    /// A plain white block, often used for testing.
    WHITE = 6,
}

impl BlockType {
    /// Converts a stored [`VoxelId`] to a `BlockType`.
    ///
    /// # Returns
    /// `None` if the identifier is not one of the built-in types.
    pub fn from_id(id: VoxelId) -> Option<Self> {
        FromPrimitive::from_u8(id)
    }

    /// The compact identifier stored in chunks for this type.
    #[inline]
    pub fn id(self) -> VoxelId {
        self as VoxelId
    }

    /// The default instance color of this block type.
    pub fn default_color(self) -> [f32; 3] {
        BLOCK_TYPE_TO_COLOR[self as usize]
    }

    /// Every non-air built-in type, in identifier order.
    pub fn solid_types() -> [BlockType; 6] {
        [
            BlockType::DIRT,
            BlockType::GRASS,
            BlockType::STONE,
            BlockType::WOOD,
            BlockType::SAND,
            BlockType::WHITE,
        ]
    }

    /// Picks a non-air block type from the given generator.
    ///
    /// Used by the seeded random preset, which derives `rng` from the voxel
    /// coordinate so the choice stays a pure function of position.
    pub fn random_solid(rng: &mut fastrand::Rng) -> Self {
        let types = Self::solid_types();
        types[rng.usize(..types.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_round_trip_through_from_id() {
        for block_type in BlockType::solid_types() {
            assert_eq!(BlockType::from_id(block_type.id()), Some(block_type));
        }
        assert_eq!(BlockType::from_id(0), Some(BlockType::AIR));
        assert_eq!(BlockType::from_id(200), None);
    }

    #[test]
    fn test_random_solid_never_returns_air() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..256 {
            assert_ne!(BlockType::random_solid(&mut rng), BlockType::AIR);
        }
    }
}
