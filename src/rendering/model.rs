//! # Instanced Model
//!
//! The render model a world hands to its renderer. It carries either the cube
//! template with per-instance buffers or a single surface mesh, a model-level
//! transform with a dirty flag, and named shader uniforms.

use cgmath::{Matrix4, One, Quaternion, Vector3};

use crate::config::MeshingMode;
use crate::rendering::meshing::{InstanceBuffers, Mesh};

/// Geometry of a model, one variant per meshing mode.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelGeometry {
    /// Cube template drawn once per instance.
    Instanced {
        /// The template mesh.
        base: Mesh,
        /// Per-instance transforms and colors.
        instances: InstanceBuffers,
    },
    /// One surface mesh drawn once.
    Surface(Mesh),
}

/// Counters describing the last meshing pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshStats {
    /// Mesher that produced the model.
    pub mode: MeshingMode,
    /// Cube instances emitted. Zero for surfaces.
    pub instance_count: usize,
    /// Cells the surface passes through. Zero for cubes.
    pub active_cells: usize,
    /// Vertices of the drawn mesh (the cube template for cubes).
    pub vertex_count: usize,
    /// Triangles of the drawn mesh.
    pub triangle_count: usize,
    /// Wall-clock meshing time.
    pub elapsed_ms: f64,
}

/// A value bound to a named shader uniform.
#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    /// A single float.
    Float(f32),
    /// A single signed integer.
    Int(i32),
    /// A boolean flag.
    Bool(bool),
    /// A three-component vector.
    Vec3(Vector3<f32>),
    /// A float array.
    FloatArray(Vec<f32>),
}

impl From<f32> for UniformValue {
    fn from(value: f32) -> Self {
        UniformValue::Float(value)
    }
}

impl From<i32> for UniformValue {
    fn from(value: i32) -> Self {
        UniformValue::Int(value)
    }
}

impl From<bool> for UniformValue {
    fn from(value: bool) -> Self {
        UniformValue::Bool(value)
    }
}

impl From<Vector3<f32>> for UniformValue {
    fn from(value: Vector3<f32>) -> Self {
        UniformValue::Vec3(value)
    }
}

impl From<Vec<f32>> for UniformValue {
    fn from(value: Vec<f32>) -> Self {
        UniformValue::FloatArray(value)
    }
}

/// Transform capability shared by renderable models.
///
/// Every setter marks the model dirty so the renderer knows to re-upload its
/// model matrix.
pub trait ModelTransform {
    /// World-space translation.
    fn position(&self) -> Vector3<f32>;
    /// Moves the model.
    fn set_position(&mut self, position: Vector3<f32>);
    /// Per-axis scale.
    fn scale(&self) -> Vector3<f32>;
    /// Rescales the model.
    fn set_scale(&mut self, scale: Vector3<f32>);
    /// Orientation.
    fn rotation(&self) -> Quaternion<f32>;
    /// Reorients the model.
    fn set_rotation(&mut self, rotation: Quaternion<f32>);
    /// Flags the model for re-upload.
    fn mark_dirty(&mut self);
    /// Whether the model needs re-uploading.
    fn is_dirty(&self) -> bool;

    /// Translation, then rotation, then scale.
    fn model_matrix(&self) -> Matrix4<f32> {
        let scale = self.scale();
        Matrix4::from_translation(self.position())
            * Matrix4::from(self.rotation())
            * Matrix4::from_nonuniform_scale(scale.x, scale.y, scale.z)
    }
}

/// Render model produced by a voxel world.
#[derive(Debug, Clone, PartialEq)]
pub struct InstancedModel {
    geometry: ModelGeometry,
    stats: MeshStats,
    position: Vector3<f32>,
    scale: Vector3<f32>,
    rotation: Quaternion<f32>,
    dirty: bool,
    uniforms: Vec<(String, UniformValue)>,
}

impl InstancedModel {
    /// Wraps freshly meshed geometry with an identity transform.
    ///
    /// New models start dirty so the first frame uploads them.
    pub fn new(geometry: ModelGeometry, stats: MeshStats) -> Self {
        InstancedModel {
            geometry,
            stats,
            position: Vector3::new(0.0, 0.0, 0.0),
            scale: Vector3::new(1.0, 1.0, 1.0),
            rotation: Quaternion::one(),
            dirty: true,
            uniforms: Vec::new(),
        }
    }

    /// The meshed geometry.
    pub fn geometry(&self) -> &ModelGeometry {
        &self.geometry
    }

    /// Counters of the meshing pass that built this model.
    pub fn stats(&self) -> &MeshStats {
        &self.stats
    }

    /// Number of instances to draw: the instance count for cubes, one for a
    /// non-empty surface, zero otherwise.
    pub fn instance_count(&self) -> usize {
        match &self.geometry {
            ModelGeometry::Instanced { instances, .. } => instances.instance_count,
            ModelGeometry::Surface(mesh) => usize::from(!mesh.is_empty()),
        }
    }

    /// The per-instance buffers of a cube model.
    pub fn instances(&self) -> Option<&InstanceBuffers> {
        match &self.geometry {
            ModelGeometry::Instanced { instances, .. } => Some(instances),
            ModelGeometry::Surface(_) => None,
        }
    }

    /// The mesh drawn per instance: the cube template or the surface.
    pub fn mesh(&self) -> &Mesh {
        match &self.geometry {
            ModelGeometry::Instanced { base, .. } => base,
            ModelGeometry::Surface(mesh) => mesh,
        }
    }

    /// Binds a value to a named uniform, replacing any previous binding.
    pub fn set_uniform(&mut self, name: &str, value: impl Into<UniformValue>) {
        let value = value.into();
        match self.uniforms.iter_mut().find(|(key, _)| key == name) {
            Some((_, slot)) => *slot = value,
            None => self.uniforms.push((name.to_owned(), value)),
        }
    }

    /// The value bound to `name`, if any.
    pub fn uniform(&self, name: &str) -> Option<&UniformValue> {
        self.uniforms
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// All bound uniforms in binding order.
    pub fn uniforms(&self) -> &[(String, UniformValue)] {
        &self.uniforms
    }

    /// Returns whether the model was dirty and clears the flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::replace(&mut self.dirty, false)
    }
}

impl ModelTransform for InstancedModel {
    fn position(&self) -> Vector3<f32> {
        self.position
    }

    fn set_position(&mut self, position: Vector3<f32>) {
        self.position = position;
        self.mark_dirty();
    }

    fn scale(&self) -> Vector3<f32> {
        self.scale
    }

    fn set_scale(&mut self, scale: Vector3<f32>) {
        self.scale = scale;
        self.mark_dirty();
    }

    fn rotation(&self) -> Quaternion<f32> {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quaternion<f32>) {
        self.rotation = rotation;
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface_model() -> InstancedModel {
        let stats = MeshStats {
            mode: MeshingMode::SurfaceNets,
            instance_count: 0,
            active_cells: 0,
            vertex_count: 0,
            triangle_count: 0,
            elapsed_ms: 0.0,
        };
        InstancedModel::new(ModelGeometry::Surface(Mesh::new()), stats)
    }

    #[test]
    fn test_setters_mark_dirty() {
        let mut model = surface_model();
        assert!(model.take_dirty());
        assert!(!model.is_dirty());

        model.set_position(Vector3::new(1.0, 2.0, 3.0));
        assert!(model.take_dirty());
        model.set_scale(Vector3::new(2.0, 2.0, 2.0));
        assert!(model.is_dirty());
        assert_eq!(model.model_matrix()[3], cgmath::Vector4::new(1.0, 2.0, 3.0, 1.0));
        assert_eq!(model.model_matrix()[0][0], 2.0);
    }

    #[test]
    fn test_uniforms_replace_by_name() {
        let mut model = surface_model();
        model.set_uniform("time", 0.5f32);
        model.set_uniform("wireframe", true);
        model.set_uniform("time", 1.5f32);
        assert_eq!(model.uniforms().len(), 2);
        assert_eq!(model.uniform("time"), Some(&UniformValue::Float(1.5)));
        assert_eq!(model.uniform("missing"), None);
    }

    #[test]
    fn test_empty_surface_draws_nothing() {
        let model = surface_model();
        assert_eq!(model.instance_count(), 0);
        assert!(model.instances().is_none());
    }
}
