//! # Voxels Module
//!
//! Voxel storage, population and the world facade.
//!
//! ## Key Components
//!
//! * `block` - Material identifiers, block faces and the color palette
//! * `chunk` - A dense, column-major chunk of values
//! * `chunk_store` - Absolute-coordinate addressing over the chunk grid
//! * `density` - Signed distance samples for surface extraction
//! * `tasks` - Parallel population of any chunk grid
//! * `terrain` - Noise-driven sampling functions
//! * `world` - The [`VoxelWorld`](world::VoxelWorld) facade

pub mod block;
pub mod chunk;
pub mod chunk_store;
pub mod density;
pub mod tasks;
pub mod terrain;
pub mod world;
