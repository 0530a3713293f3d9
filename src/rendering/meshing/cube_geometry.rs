//! # Cube Geometry
//!
//! The template cube every instance of the cube path renders. The template is
//! a unit cube centred on the origin with one quad per [`BlockSide`], so faces
//! carry flat normals. Its own scale and rotation are folded into each
//! instance transform.

use cgmath::{Matrix4, One, Quaternion, Vector3};

use crate::rendering::meshing::mesh::Mesh;
use crate::rendering::vertex::MeshVertex;
use crate::voxels::block::block_side::BlockSide;

/// Cube template with its own scale and rotation.
#[derive(Debug, Clone, PartialEq)]
pub struct CubeGeometry {
    /// Template mesh: 24 vertices, 36 indices.
    pub mesh: Mesh,
    /// Per-axis template scale, multiplied by the voxel size per instance.
    pub scale: Vector3<f32>,
    /// Template rotation about the cube centre.
    pub rotation: Quaternion<f32>,
}

impl CubeGeometry {
    /// The unit cube `[-0.5, 0.5]³` with identity scale and rotation.
    pub fn unit() -> Self {
        let mut mesh = Mesh::with_capacity(24, 36);
        let center = Vector3::new(0.5, 0.5, 0.5);

        for side in BlockSide::all() {
            let normal = side.normal();
            let vertices = side
                .unit_corners()
                .into_iter()
                .map(|corner| MeshVertex::new(corner - center, normal))
                .collect();
            mesh.add_vertices(vertices, Mesh::generate_quad_indices(0).to_vec());
        }

        CubeGeometry {
            mesh,
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: Quaternion::one(),
        }
    }

    /// Replaces the template scale.
    pub fn with_scale(mut self, scale: Vector3<f32>) -> Self {
        self.scale = scale;
        self
    }

    /// Replaces the template rotation.
    pub fn with_rotation(mut self, rotation: Quaternion<f32>) -> Self {
        self.rotation = rotation;
        self
    }

    /// Transform of one instance: translate to `center`, apply the template
    /// rotation, then the template scale times `voxel_size`.
    pub fn instance_transform(&self, center: Vector3<f32>, voxel_size: f32) -> Matrix4<f32> {
        let scale = self.scale * voxel_size;
        Matrix4::from_translation(center)
            * Matrix4::from(self.rotation)
            * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z)
    }
}

impl Default for CubeGeometry {
    fn default() -> Self {
        CubeGeometry::unit()
    }
}
