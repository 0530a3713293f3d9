//! # Terrain Presets
//!
//! Ready-made sampling functions for the parallel populator. Every preset is
//! a pure function of the coordinate and is `Sync`, so the same value can be
//! handed to any number of workers.
//!
//! ## Presets
//! - [`TerrainGenerator::heightmap_voxel`]: fBm height map with layered
//!   materials and Perlin caves
//! - [`TerrainGenerator::heightmap_density`]: the same terrain as a signed distance
//! - [`sphere_density`]: a ball, mostly for tests
//! - [`solid_voxels`], [`empty_voxels`], [`checkerboard_voxels`] and [`random_voxels`]

use cgmath::{MetricSpace, Point3};
use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

use super::block::{block_type::BlockType, VoxelId, AIR};

/// Cave noise inside `[-CAVE_THRESHOLD, CAVE_THRESHOLD]` is carved out.
pub const CAVE_THRESHOLD: f64 = 0.2;
/// Scaling factor applied to world coordinates when sampling cave noise.
pub const CAVE_SCALE_FACTOR: f64 = 0.06;
/// Scaling factor applied to world coordinates when sampling the height map.
pub const HEIGHT_SCALE_FACTOR: f64 = 0.02;
/// Converts cave noise into a rough distance for density output.
const CAVE_DENSITY_GAIN: f64 = 8.0;

/// Noise-driven height-map terrain with caves.
#[derive(Debug, Clone)]
pub struct TerrainGenerator {
    heights: Fbm<Perlin>,
    caves: Perlin,
    /// Mean surface height in voxels.
    pub base_height: f64,
    /// Maximum deviation from the mean height.
    pub amplitude: f64,
    /// Dirt layer thickness under the grass.
    pub dirt_depth: f64,
    /// Caves never reach closer than this to the surface.
    pub cave_roof: f64,
}

impl TerrainGenerator {
    /// Creates terrain sized for a world `max_height` voxels tall.
    ///
    /// # Arguments
    /// * `seed` - Seed of both noise sources
    /// * `max_height` - Height of the world the terrain will fill
    pub fn new(seed: u32, max_height: usize) -> Self {
        let heights = Fbm::<Perlin>::new(seed)
            .set_octaves(4)
            .set_frequency(1.0)
            .set_persistence(0.5);
        TerrainGenerator {
            heights,
            caves: Perlin::new(seed.wrapping_add(1)),
            base_height: max_height as f64 * 0.5,
            amplitude: max_height as f64 * 0.25,
            dirt_depth: 3.0,
            cave_roof: 4.0,
        }
    }

    /// Terrain height at a column, in voxels.
    pub fn height_at(&self, x: i32, z: i32) -> f64 {
        let sample = self.heights.get([
            x as f64 * HEIGHT_SCALE_FACTOR,
            z as f64 * HEIGHT_SCALE_FACTOR,
        ]);
        self.base_height + sample.clamp(-1.0, 1.0) * self.amplitude
    }

    fn cave_noise(&self, x: i32, y: i32, z: i32) -> f64 {
        self.caves.get([
            x as f64 * CAVE_SCALE_FACTOR,
            y as f64 * CAVE_SCALE_FACTOR,
            z as f64 * CAVE_SCALE_FACTOR,
        ])
    }

    /// Whether the coordinate lies in a cave: below the cave roof and with
    /// cave noise inside the threshold band.
    pub fn is_cave(&self, x: i32, y: i32, z: i32, height: f64) -> bool {
        y > 0
            && (y as f64) < height - self.cave_roof
            && (-CAVE_THRESHOLD..=CAVE_THRESHOLD).contains(&self.cave_noise(x, y, z))
    }

    /// Voxel sampling function: grass on top, a dirt band, stone below.
    pub fn heightmap_voxel(&self, x: i32, y: i32, z: i32) -> (VoxelId, bool) {
        let height = self.height_at(x, z);
        let y_f = y as f64;
        if y_f > height || self.is_cave(x, y, z, height) {
            return (AIR, false);
        }
        let block_type = if y_f > height - 1.0 {
            BlockType::GRASS
        } else if y_f > height - self.dirt_depth {
            BlockType::DIRT
        } else {
            BlockType::STONE
        };
        (block_type.id(), true)
    }

    /// Density sampling function: `y - height`, with caves subtracted.
    pub fn heightmap_density(&self, x: i32, y: i32, z: i32) -> f32 {
        let height = self.height_at(x, z);
        let ground = y as f64 - height;
        if y <= 0 || (y as f64) >= height - self.cave_roof {
            return ground as f32;
        }
        // Positive inside the band, so caves are outside the surface.
        let cave = (CAVE_THRESHOLD - self.cave_noise(x, y, z).abs()) * CAVE_DENSITY_GAIN;
        ground.max(cave) as f32
    }
}

/// Density of a ball: distance to the centre minus the radius.
pub fn sphere_density(center: Point3<f32>, radius: f32) -> impl Fn(i32, i32, i32) -> f32 + Sync {
    move |x, y, z| Point3::new(x as f32, y as f32, z as f32).distance(center) - radius
}

/// Every voxel solid with the same material.
pub fn solid_voxels(id: VoxelId) -> impl Fn(i32, i32, i32) -> (VoxelId, bool) + Sync {
    move |_, _, _| (id, true)
}

/// Every voxel air.
pub fn empty_voxels() -> impl Fn(i32, i32, i32) -> (VoxelId, bool) + Sync {
    |_, _, _| (AIR, false)
}

/// Alternating solid and air voxels in all three directions.
pub fn checkerboard_voxels(id: VoxelId) -> impl Fn(i32, i32, i32) -> (VoxelId, bool) + Sync {
    move |x, y, z| {
        if (x + y + z).rem_euclid(2) == 0 {
            (id, true)
        } else {
            (AIR, false)
        }
    }
}

/// Random solid voxels of random material.
///
/// Each coordinate seeds its own generator, so the result does not depend on
/// the order or thread the coordinates are sampled in.
///
/// # Arguments
/// * `seed` - World seed
/// * `fill_ratio` - Probability of a voxel being solid
pub fn random_voxels(seed: u64, fill_ratio: f64) -> impl Fn(i32, i32, i32) -> (VoxelId, bool) + Sync {
    move |x, y, z| {
        let mut rng = fastrand::Rng::with_seed(coordinate_seed(seed, x, y, z));
        if rng.f64() < fill_ratio {
            (BlockType::random_solid(&mut rng).id(), true)
        } else {
            (AIR, false)
        }
    }
}

/// Mixes a seed and a coordinate into a well-distributed 64-bit seed.
fn coordinate_seed(seed: u64, x: i32, y: i32, z: i32) -> u64 {
    let mut h = seed ^ 0x9E37_79B9_7F4A_7C15;
    for v in [x, y, z] {
        h ^= v as u32 as u64;
        h = h.wrapping_mul(0xBF58_476D_1CE4_E5B9);
        h ^= h >> 31;
    }
    h
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heightmap_layers() {
        let terrain = TerrainGenerator::new(3, 64);
        for (x, z) in [(0, 0), (17, 5), (-4, 40)] {
            let height = terrain.height_at(x, z);
            assert!((16.0..=48.0).contains(&height));

            let top = height.floor() as i32;
            assert_eq!(terrain.heightmap_voxel(x, top + 1, z), (AIR, false));
            assert_eq!(terrain.heightmap_voxel(x, top, z).0, BlockType::GRASS.id());
            assert!(terrain.heightmap_voxel(x, 0, z).1);
        }
    }

    #[test]
    fn test_caves_follow_the_threshold_band() {
        let terrain = TerrainGenerator::new(5, 64);
        let (mut carved, mut kept) = (0, 0);
        for z in 0..24 {
            for x in 0..24 {
                let height = terrain.height_at(x, z);
                for y in 1..(height - terrain.cave_roof).floor() as i32 {
                    let noise = terrain.cave_noise(x, y, z);
                    let in_band = (-CAVE_THRESHOLD..=CAVE_THRESHOLD).contains(&noise);
                    let voxel = terrain.heightmap_voxel(x, y, z);
                    let density = terrain.heightmap_density(x, y, z);
                    if in_band {
                        assert_eq!(voxel, (AIR, false), "in-band sample at ({}, {}, {})", x, y, z);
                        assert!(density >= 0.0);
                        carved += 1;
                    } else {
                        assert!(voxel.1, "out-of-band sample carved at ({}, {}, {})", x, y, z);
                        assert!(density < 0.0);
                        kept += 1;
                    }
                }
            }
        }
        assert!(carved > 0 && kept > 0);
    }

    #[test]
    fn test_density_sign_matches_surface_away_from_caves() {
        let terrain = TerrainGenerator::new(11, 64);
        let height = terrain.height_at(8, 8);
        let above = height.ceil() as i32 + 1;
        assert!(terrain.heightmap_density(8, above, 8) > 0.0);
        assert!(terrain.heightmap_density(8, 0, 8) < 0.0);
    }

    #[test]
    fn test_presets_are_deterministic() {
        let random = random_voxels(9, 0.5);
        assert_eq!(random(1, 2, 3), random(1, 2, 3));
        let solid_count = (0..512).filter(|i| random(*i, 0, 0).1).count();
        assert!(solid_count > 128 && solid_count < 384);

        let checker = checkerboard_voxels(BlockType::WHITE.id());
        assert!(checker(0, 0, 0).1);
        assert!(!checker(1, 0, 0).1);
        assert!(checker(-1, 1, 0).1);

        let sphere = sphere_density(Point3::new(0.0, 0.0, 0.0), 2.0);
        assert_eq!(sphere(0, 0, 0), -2.0);
        assert_eq!(sphere(2, 0, 0), 0.0);
    }
}
