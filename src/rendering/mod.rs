//! # Rendering Module
//!
//! Render-facing output of a voxel world. Nothing here talks to a GPU: the
//! world produces an [`InstancedModel`] whose buffers are `Pod` data an
//! external renderer uploads as-is.

pub mod meshing;
pub mod model;
pub mod vertex;

pub use model::{InstancedModel, MeshStats, ModelGeometry, ModelTransform, UniformValue};
pub use vertex::{InstanceRaw, MeshVertex};
