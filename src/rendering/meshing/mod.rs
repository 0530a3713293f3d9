//! # Meshing Module
//!
//! Turns populated storage into render data. Two strategies exist, selected
//! per world:
//!
//! - [`instanced_cubes`]: one transformed [`CubeGeometry`] per non-air voxel
//! - [`surface_nets`]: a smooth surface through the zero level set of a density field
//!
//! Both are pure functions of the storage they read.

pub mod cube_geometry;
pub mod instanced_cubes;
pub mod mesh;
pub mod surface_nets;

pub use cube_geometry::CubeGeometry;
pub use instanced_cubes::{build_instances, InstanceBuffers};
pub use mesh::Mesh;
pub use surface_nets::{surface_nets, SurfaceNetsOutput};
