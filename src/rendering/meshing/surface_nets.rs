//! # Surface Nets
//!
//! Extracts a smooth triangle surface from a [`DensityField`].
//!
//! ## Algorithm
//!
//! 1. Every lattice cell (the cube spanned by eight neighbouring samples)
//!    whose corners disagree on inside/outside is *active* and gets exactly
//!    one vertex: the average of the zero crossings along its sign-changing
//!    edges. Its normal is the normalized gradient of the trilinear field.
//! 2. Every sign-changing lattice edge is shared by four active cells; their
//!    vertices are joined into a quad, emitted as two triangles wound so the
//!    face normal points toward positive density.
//!
//! Edges on the minimum boundary of the domain have fewer than four cells
//! around them and emit nothing, so surfaces reaching the world edge stay
//! open there.

use bitvec::prelude::*;
use cgmath::{InnerSpace, Point3, Vector3, Zero};
use log::{info, warn};
use web_time::Instant;

use crate::rendering::meshing::mesh::Mesh;
use crate::rendering::vertex::MeshVertex;
use crate::voxels::density::{is_inside, DenseSamples, DensityField};

/// Marks a cell that has no vertex.
const NO_VERTEX: u32 = u32::MAX;

/// Probe distance, in lattice units, of the central-difference normal.
const NORMAL_EPSILON: f32 = 0.5;

/// Cell corners; bit 0 is the x offset, bit 1 y, bit 2 z.
const CORNERS: [[usize; 3]; 8] = [
    [0, 0, 0],
    [1, 0, 0],
    [0, 1, 0],
    [1, 1, 0],
    [0, 0, 1],
    [1, 0, 1],
    [0, 1, 1],
    [1, 1, 1],
];

/// The twelve cell edges as corner pairs: four along x, four along y, four along z.
const EDGES: [[usize; 2]; 12] = [
    [0, 1],
    [2, 3],
    [4, 5],
    [6, 7],
    [0, 2],
    [1, 3],
    [4, 6],
    [5, 7],
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// Result of a surface-nets pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceNetsOutput {
    /// The extracted surface. One vertex per active cell.
    pub mesh: Mesh,
    /// Number of cells the surface passes through.
    pub active_cells: usize,
}

/// Meshes the zero level set of `field`.
///
/// Vertex positions are in world space: lattice coordinates times
/// `voxel_size`. A field with every sample on one side of the surface yields
/// an empty mesh.
pub fn surface_nets(field: &DensityField, voxel_size: f32) -> SurfaceNetsOutput {
    let start = Instant::now();
    let samples = field.to_dense();
    let (size_x, size_y, size_z) = samples.size;
    if size_x < 2 || size_y < 2 || size_z < 2 {
        return SurfaceNetsOutput::default();
    }
    let cells = (size_x - 1, size_y - 1, size_z - 1);
    let cell_index = |x: usize, y: usize, z: usize| x + cells.0 * (y + cells.1 * z);

    let mut inside: BitVec = BitVec::repeat(false, samples.values.len());
    for (i, density) in samples.values.iter().enumerate() {
        inside.set(i, is_inside(*density));
    }

    let mut cell_vertex = vec![NO_VERTEX; cells.0 * cells.1 * cells.2];
    let mut mesh = Mesh::new();

    for z in 0..cells.2 {
        for y in 0..cells.1 {
            for x in 0..cells.0 {
                let mut corners = [0.0f32; 8];
                let mut mask = 0u8;
                for (i, offset) in CORNERS.iter().enumerate() {
                    let sample = samples.index(x + offset[0], y + offset[1], z + offset[2]);
                    corners[i] = samples.values[sample];
                    if inside[sample] {
                        mask |= 1 << i;
                    }
                }
                if mask == 0 || mask == 0xff {
                    continue;
                }

                let lattice = Point3::new(x as f32, y as f32, z as f32) + cell_offset(&corners);
                let normal = vertex_normal(&samples, lattice, &corners);
                cell_vertex[cell_index(x, y, z)] = mesh.vertices.len() as u32;
                mesh.vertices
                    .push(MeshVertex::new(lattice * voxel_size, normal));
            }
        }
    }
    let active_cells = mesh.vertices.len();

    for z in 0..cells.2 {
        for y in 0..cells.1 {
            for x in 0..cells.0 {
                if cell_vertex[cell_index(x, y, z)] == NO_VERTEX {
                    continue;
                }
                let p = [x, y, z];
                for axis in 0..3 {
                    let (b, c) = ((axis + 1) % 3, (axis + 2) % 3);
                    if p[b] == 0 || p[c] == 0 {
                        continue;
                    }
                    let mut q = p;
                    q[axis] += 1;
                    let from_inside = inside[samples.index(p[0], p[1], p[2])];
                    if from_inside == inside[samples.index(q[0], q[1], q[2])] {
                        continue;
                    }

                    let mut pb = p;
                    pb[b] -= 1;
                    let mut pc = p;
                    pc[c] -= 1;
                    let mut pbc = pb;
                    pbc[c] -= 1;
                    let quad = [p, pb, pc, pbc]
                        .map(|cell| cell_vertex[cell_index(cell[0], cell[1], cell[2])]);
                    if quad.contains(&NO_VERTEX) {
                        debug_assert!(false, "sign-changing edge with an inactive neighbour cell");
                        continue;
                    }

                    let [v0, v1, v2, v3] = quad;
                    if from_inside {
                        mesh.indices.extend_from_slice(&[v0, v1, v2, v1, v3, v2]);
                    } else {
                        mesh.indices.extend_from_slice(&[v0, v2, v1, v1, v2, v3]);
                    }
                }
            }
        }
    }

    info!(
        "Surface nets: {} active cells, {} triangles in {:.2} ms",
        active_cells,
        mesh.triangle_count(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    SurfaceNetsOutput { mesh, active_cells }
}

/// Average position, relative to the cell's minimum corner, of the zero
/// crossings along the cell's sign-changing edges.
fn cell_offset(corners: &[f32; 8]) -> Vector3<f32> {
    let mut sum = Vector3::zero();
    let mut crossings = 0;
    for [a, b] in EDGES {
        let (da, db) = (corners[a], corners[b]);
        if is_inside(da) == is_inside(db) {
            continue;
        }
        let t = da / (da - db);
        let pa = corner_vector(a);
        let pb = corner_vector(b);
        sum += pa + (pb - pa) * t;
        crossings += 1;
    }
    if crossings == 0 {
        return Vector3::new(0.5, 0.5, 0.5);
    }
    sum / crossings as f32
}

fn corner_vector(corner: usize) -> Vector3<f32> {
    let offset = CORNERS[corner];
    Vector3::new(offset[0] as f32, offset[1] as f32, offset[2] as f32)
}

/// Unit normal pointing toward positive density.
///
/// Falls back to the cell's own finite difference, then to +Y, when the
/// smoothed gradient vanishes.
fn vertex_normal(samples: &DenseSamples, lattice: Point3<f32>, corners: &[f32; 8]) -> Vector3<f32> {
    let gradient = samples.gradient(lattice, NORMAL_EPSILON);
    if gradient.magnitude2() > f32::EPSILON * f32::EPSILON {
        return gradient.normalize();
    }

    let mut cell_gradient = Vector3::zero();
    for (axis, edges) in EDGES.chunks_exact(4).enumerate() {
        let delta: f32 = edges.iter().map(|[a, b]| corners[*b] - corners[*a]).sum();
        cell_gradient[axis] = delta * 0.25;
    }
    if cell_gradient.magnitude2() > f32::EPSILON * f32::EPSILON {
        return cell_gradient.normalize();
    }

    warn!("Degenerate density gradient at {:?}, using +Y as normal", lattice);
    Vector3::unit_y()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldDimensions;

    fn field_from(dimensions: WorldDimensions, f: impl Fn(i32, i32, i32) -> f32) -> DensityField {
        let mut field = DensityField::new(dimensions);
        let (size_x, size_y, size_z) = field.extent();
        for z in 0..size_z as i32 {
            for y in 0..size_y as i32 {
                for x in 0..size_x as i32 {
                    field.set(x, y, z, f(x, y, z));
                }
            }
        }
        field
    }

    fn dimensions() -> WorldDimensions {
        WorldDimensions {
            chunk_size: 4,
            world_size_x: 2,
            world_size_z: 2,
            max_height: 16,
        }
    }

    #[test]
    fn test_uniform_fields_produce_nothing() {
        let unset = DensityField::new(dimensions());
        assert_eq!(surface_nets(&unset, 1.0), SurfaceNetsOutput::default());

        let solid = field_from(dimensions(), |_, _, _| -1.0);
        let output = surface_nets(&solid, 1.0);
        assert_eq!(output.active_cells, 0);
        assert!(output.mesh.is_empty());
    }

    #[test]
    fn test_plane_is_flat_and_faces_up() {
        let field = field_from(dimensions(), |_, y, _| y as f32 - 10.0);
        let output = surface_nets(&field, 1.0);

        // One layer of 7x7 cells, quads between neighbouring cell vertices.
        assert_eq!(output.active_cells, 49);
        assert_eq!(output.mesh.triangle_count(), 2 * 6 * 6);
        for vertex in &output.mesh.vertices {
            assert!((vertex.position[1] - 10.0).abs() < 1e-5);
            assert!((vertex.normal() - Vector3::unit_y()).magnitude() < 1e-5);
        }
        for triangle in output.mesh.triangles() {
            let a = output.mesh.vertices[triangle[0] as usize].position();
            let b = output.mesh.vertices[triangle[1] as usize].position();
            let c = output.mesh.vertices[triangle[2] as usize].position();
            assert!((b - a).cross(c - a).y > 0.0);
        }
    }

    #[test]
    fn test_voxel_size_scales_positions() {
        let field = field_from(dimensions(), |_, y, _| y as f32 - 10.0);
        let output = surface_nets(&field, 0.25);
        for vertex in &output.mesh.vertices {
            assert!((vertex.position[1] - 2.5).abs() < 1e-5);
        }
    }

    #[test]
    fn test_meshing_is_repeatable() {
        let field = field_from(dimensions(), |x, y, z| {
            let d = Vector3::new(x as f32 - 4.0, y as f32 - 6.0, z as f32 - 4.0);
            d.magnitude() - 2.6
        });
        let first = surface_nets(&field, 1.0);
        let second = surface_nets(&field, 1.0);
        assert!(first.active_cells > 0);
        assert_eq!(first, second);
    }
}
