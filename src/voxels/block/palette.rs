//! Material registry mapping voxel identifiers to instance colors.

use std::collections::HashMap;

use super::{block_type::BlockType, VoxelId};

/// Color emitted for identifiers that were never registered.
pub const DEFAULT_INSTANCE_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Maps [`VoxelId`]s to the RGB color the cube mesher attaches to each instance.
#[derive(Debug, Clone, Default)]
pub struct MaterialPalette {
    colors: HashMap<VoxelId, [f32; 3]>,
}

impl MaterialPalette {
    /// Creates an empty palette. Every lookup falls back to white.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a palette pre-filled with the built-in [`BlockType`] colors.
    pub fn with_block_types() -> Self {
        let mut palette = Self::new();
        for block_type in BlockType::solid_types() {
            palette.register(block_type.id(), block_type.default_color());
        }
        palette
    }

    /// Registers (or replaces) the color of a material.
    ///
    /// Registering air is ignored, air never produces an instance.
    pub fn register(&mut self, id: VoxelId, color: [f32; 3]) {
        if id == super::AIR {
            log::warn!("Ignoring color registration for the air identifier");
            return;
        }
        self.colors.insert(id, color);
    }

    /// The registered color of `id`, if any.
    pub fn get(&self, id: VoxelId) -> Option<[f32; 3]> {
        self.colors.get(&id).copied()
    }

    /// The color the mesher emits for `id`.
    pub fn color_of(&self, id: VoxelId) -> [f32; 3] {
        self.get(id).unwrap_or(DEFAULT_INSTANCE_COLOR)
    }

    /// Number of registered materials.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether no material has been registered.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}
