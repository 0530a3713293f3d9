//! # Density Field
//!
//! Per-sample signed distance values for the surface-nets path. The field
//! shares the chunk layout and addressable domain of the voxel store.
//!
//! ## Sampling Convention
//!
//! Samples sit on the integer lattice: sample `(x, y, z)` is the density at
//! world position `(x, y, z) * voxel_size`. Negative is inside solid, zero and
//! positive are outside. Population and meshing both use this convention.
//!
//! Samples that were never written hold [`UNSET_DENSITY`], a large positive
//! "outside" value, so a partially populated field meshes as empty space
//! rather than producing garbage.

use cgmath::{Point3, Vector3};

use crate::config::WorldDimensions;

use super::chunk_store::ChunkGrid;

/// Value of every sample before population.
pub const UNSET_DENSITY: f32 = 1.0e6;

/// Returns `true` when the sample lies inside the surface.
#[inline]
pub fn is_inside(density: f32) -> bool {
    density < 0.0
}

/// Signed distance samples on the world lattice.
#[derive(Debug, Clone)]
pub struct DensityField {
    grid: ChunkGrid<f32>,
}

impl DensityField {
    /// Allocates a field with every sample unset.
    pub fn new(dimensions: WorldDimensions) -> Self {
        DensityField {
            grid: ChunkGrid::new(dimensions, UNSET_DENSITY),
        }
    }

    /// Sample extent as `(x, y, z)`.
    pub fn extent(&self) -> (usize, usize, usize) {
        self.grid.extent()
    }

    /// Reads a sample. Out-of-range coordinates read as [`UNSET_DENSITY`].
    #[inline]
    pub fn get(&self, x: i32, y: i32, z: i32) -> f32 {
        self.grid.get(x, y, z).unwrap_or(UNSET_DENSITY)
    }

    /// Bounds-checked write. Out-of-range coordinates are ignored.
    #[inline]
    pub fn set(&mut self, x: i32, y: i32, z: i32, density: f32) {
        self.grid.replace(x, y, z, density);
    }

    /// Number of samples currently inside the surface.
    pub fn inside_samples(&self) -> usize {
        self.grid
            .chunks()
            .iter()
            .map(|chunk| chunk.data().iter().filter(|d| is_inside(**d)).count())
            .sum()
    }

    /// Resets every sample to [`UNSET_DENSITY`].
    pub fn reset(&mut self) {
        self.grid.fill(UNSET_DENSITY);
    }

    /// Copies the field into a flat array indexed `x + size_x * (y + size_y * z)`.
    ///
    /// Meshing walks neighbouring samples across chunk borders constantly, so
    /// it works on this flat copy instead of resolving chunks per lookup.
    pub fn to_dense(&self) -> DenseSamples {
        let (size_x, size_y, size_z) = self.extent();
        let mut values = vec![UNSET_DENSITY; size_x * size_y * size_z];
        for chunk in self.grid.chunks() {
            let (origin_x, origin_z) = chunk.origin();
            for (index, density) in chunk.data().iter().enumerate() {
                let (local_x, y, local_z) = chunk.coordinate_of(index);
                let (x, z) = (origin_x + local_x, origin_z + local_z);
                values[x + size_x * (y + size_y * z)] = *density;
            }
        }
        DenseSamples {
            size: (size_x, size_y, size_z),
            values,
        }
    }

    pub(crate) fn grid_mut(&mut self) -> &mut ChunkGrid<f32> {
        &mut self.grid
    }
}

/// A flat, read-only copy of a density field.
#[derive(Debug, Clone)]
pub struct DenseSamples {
    /// Sample extent as `(x, y, z)`.
    pub size: (usize, usize, usize),
    /// Samples indexed `x + size_x * (y + size_y * z)`.
    pub values: Vec<f32>,
}

impl DenseSamples {
    /// Flat index of a sample.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        x + self.size.0 * (y + self.size.1 * z)
    }

    /// Reads a lattice sample.
    #[inline]
    pub fn at(&self, x: usize, y: usize, z: usize) -> f32 {
        self.values[self.index(x, y, z)]
    }

    /// Trilinear interpolation at a lattice-space point.
    ///
    /// The point is clamped into the sampled domain, so lookups past the edge
    /// read the border value.
    pub fn sample_trilinear(&self, point: Point3<f32>) -> f32 {
        let (x0, tx) = split_axis(point.x, self.size.0);
        let (y0, ty) = split_axis(point.y, self.size.1);
        let (z0, tz) = split_axis(point.z, self.size.2);
        let x1 = (x0 + 1).min(self.size.0 - 1);
        let y1 = (y0 + 1).min(self.size.1 - 1);
        let z1 = (z0 + 1).min(self.size.2 - 1);

        let c00 = lerp(self.at(x0, y0, z0), self.at(x1, y0, z0), tx);
        let c10 = lerp(self.at(x0, y1, z0), self.at(x1, y1, z0), tx);
        let c01 = lerp(self.at(x0, y0, z1), self.at(x1, y0, z1), tx);
        let c11 = lerp(self.at(x0, y1, z1), self.at(x1, y1, z1), tx);

        lerp(lerp(c00, c10, ty), lerp(c01, c11, ty), tz)
    }

    /// Central-difference gradient of the interpolated field at `point`.
    pub fn gradient(&self, point: Point3<f32>, epsilon: f32) -> Vector3<f32> {
        let dx = Vector3::new(epsilon, 0.0, 0.0);
        let dy = Vector3::new(0.0, epsilon, 0.0);
        let dz = Vector3::new(0.0, 0.0, epsilon);
        let scale = 1.0 / (2.0 * epsilon);
        Vector3::new(
            (self.sample_trilinear(point + dx) - self.sample_trilinear(point - dx)) * scale,
            (self.sample_trilinear(point + dy) - self.sample_trilinear(point - dy)) * scale,
            (self.sample_trilinear(point + dz) - self.sample_trilinear(point - dz)) * scale,
        )
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamps a lattice coordinate into `[0, size - 1]` and splits it into the
/// lower sample index and the fractional offset toward the next sample.
#[inline]
fn split_axis(value: f32, size: usize) -> (usize, f32) {
    let max = (size - 1) as f32;
    let clamped = value.clamp(0.0, max);
    let base = (clamped.floor() as usize).min(size.saturating_sub(2));
    (base, clamped - base as f32)
}
