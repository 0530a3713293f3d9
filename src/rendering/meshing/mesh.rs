//! Mesh data structures for voxel rendering.
//!
//! A [`Mesh`] is a flat vertex list plus a triangle index list. It backs both
//! the cube template of the instanced path and the surface-nets output.

use cgmath::InnerSpace;

use crate::rendering::vertex::MeshVertex;

/// An indexed triangle mesh.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// The vertex data
    pub vertices: Vec<MeshVertex>,
    /// Triangle indices into `vertices`, three per triangle
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Creates a new, empty mesh.
    pub fn new() -> Self {
        Mesh::default()
    }

    /// Creates an empty mesh with reserved space.
    pub fn with_capacity(vertices: usize, indices: usize) -> Self {
        Mesh {
            vertices: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(indices),
        }
    }

    /// Appends vertices and indices local to them.
    ///
    /// The indices are shifted by the number of vertices already in the mesh.
    pub fn add_vertices(&mut self, mut vertices: Vec<MeshVertex>, indices: Vec<u32>) {
        let current_vertices_len = self.vertices.len() as u32;
        self.vertices.append(&mut vertices);
        self.indices
            .extend(indices.into_iter().map(|e| e + current_vertices_len));
    }

    /// Index data for one quad, offset by the number of quads generated so far.
    ///
    /// Quad vertices are expected in lower-left, lower-right, upper-left,
    /// upper-right order.
    pub fn generate_quad_indices(num_quads_generated: u32) -> [u32; 6] {
        [
            (num_quads_generated * 4),
            1 + num_quads_generated * 4,
            3 + num_quads_generated * 4,
            (num_quads_generated * 4),
            3 + num_quads_generated * 4,
            2 + num_quads_generated * 4,
        ]
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Whether the mesh has no triangles.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterates triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices
            .chunks_exact(3)
            .map(|triangle| [triangle[0], triangle[1], triangle[2]])
    }

    /// Area of a triangle given by its index triple.
    pub fn triangle_area(&self, triangle: [u32; 3]) -> f32 {
        let a = self.vertices[triangle[0] as usize].position();
        let b = self.vertices[triangle[1] as usize].position();
        let c = self.vertices[triangle[2] as usize].position();
        (b - a).cross(c - a).magnitude() * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Point3, Vector3};

    fn vertex(x: f32, y: f32) -> MeshVertex {
        MeshVertex::new(Point3::new(x, y, 0.0), Vector3::unit_z())
    }

    #[test]
    fn test_add_vertices_offsets_indices() {
        let mut mesh = Mesh::new();
        mesh.add_vertices(vec![vertex(0.0, 0.0), vertex(1.0, 0.0), vertex(0.0, 1.0)], vec![0, 1, 2]);
        mesh.add_vertices(vec![vertex(0.0, 0.0), vertex(2.0, 0.0), vertex(0.0, 2.0)], vec![0, 1, 2]);
        assert_eq!(mesh.indices, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.triangle_area([3, 4, 5]), 2.0);
    }

    #[test]
    fn test_quad_indices_follow_the_quad_count() {
        assert_eq!(Mesh::generate_quad_indices(0), [0, 1, 3, 0, 3, 2]);
        assert_eq!(Mesh::generate_quad_indices(2), [8, 9, 11, 8, 11, 10]);
    }
}
