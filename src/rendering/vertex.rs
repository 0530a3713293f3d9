//! Vertex and instance data layouts handed to the external renderer.
//!
//! Both types are `Pod`, so a renderer can upload them with
//! `bytemuck::cast_slice` without any conversion step.

use cgmath::{Matrix4, Point3, Vector3};

/// A surface vertex: position and normal.
///
/// # Memory Layout
/// - Position: 3x f32 (12 bytes)
/// - Normal: 3x f32 (12 bytes)
///
/// Total size: 24 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    /// Position in world space
    pub position: [f32; 3],
    /// Unit normal pointing toward the outside
    pub normal: [f32; 3],
}

impl MeshVertex {
    /// Creates a new vertex.
    pub fn new(position: Point3<f32>, normal: Vector3<f32>) -> Self {
        MeshVertex {
            position: position.into(),
            normal: normal.into(),
        }
    }

    /// The position as a point.
    pub fn position(&self) -> Point3<f32> {
        Point3::from(self.position)
    }

    /// The normal as a vector.
    pub fn normal(&self) -> Vector3<f32> {
        Vector3::from(self.normal)
    }
}

/// Per-instance data of the cube path.
///
/// # Memory Layout
/// - Model matrix: 4x4 f32, column-major (64 bytes)
/// - Color: 3x f32 (12 bytes)
///
/// Total size: 76 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    /// Column-major model matrix
    pub model: [[f32; 4]; 4],
    /// Linear RGB color
    pub color: [f32; 3],
}

impl InstanceRaw {
    /// Packs a transform and color.
    pub fn new(model: &Matrix4<f32>, color: Vector3<f32>) -> Self {
        InstanceRaw {
            model: (*model).into(),
            color: color.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layouts_have_no_padding() {
        assert_eq!(std::mem::size_of::<MeshVertex>(), 24);
        assert_eq!(std::mem::size_of::<InstanceRaw>(), 76);
    }

    #[test]
    fn test_instance_raw_keeps_translation_column() {
        let model = Matrix4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let raw = InstanceRaw::new(&model, Vector3::new(0.5, 0.5, 0.5));
        assert_eq!(raw.model[3], [1.0, 2.0, 3.0, 1.0]);
        let bytes: &[u8] = bytemuck::cast_slice(std::slice::from_ref(&raw));
        assert_eq!(bytes.len(), 76);
    }
}
