//! # Instanced Cube Meshing
//!
//! Emits one transformed copy of the cube template per non-air voxel. There
//! is no face culling: a fully buried voxel still gets an instance, so the
//! instance count always equals the store's active voxel count.

use cgmath::{Matrix4, Vector3};
use log::info;
use web_time::Instant;

use crate::rendering::meshing::cube_geometry::CubeGeometry;
use crate::rendering::vertex::InstanceRaw;
use crate::voxels::block::palette::DEFAULT_INSTANCE_COLOR;
use crate::voxels::block::MaterialPalette;
use crate::voxels::chunk_store::ChunkStore;

/// Per-instance buffers of the cube path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstanceBuffers {
    /// One model matrix per active voxel.
    pub transforms: Vec<Matrix4<f32>>,
    /// One color per instance when a palette was supplied.
    pub colors: Option<Vec<Vector3<f32>>>,
    /// Number of instances.
    pub instance_count: usize,
}

impl InstanceBuffers {
    /// Packs transforms and colors for upload. Missing colors are white.
    pub fn to_raw(&self) -> Vec<InstanceRaw> {
        let white = Vector3::from(DEFAULT_INSTANCE_COLOR);
        self.transforms
            .iter()
            .enumerate()
            .map(|(i, transform)| {
                let color = self
                    .colors
                    .as_ref()
                    .and_then(|colors| colors.get(i).copied())
                    .unwrap_or(white);
                InstanceRaw::new(transform, color)
            })
            .collect()
    }
}

/// Builds instance buffers for every non-air voxel of `store`.
///
/// Voxel `(x, y, z)` is centred at `((x, y, z) + 0.5) * voxel_size`. Instances
/// follow the store's iteration order: chunk by chunk, column by column.
///
/// # Arguments
/// * `store` - The populated voxel store
/// * `geometry` - The cube template
/// * `voxel_size` - World-space edge length of a voxel
/// * `palette` - Optional material colors; without one no color buffer is produced
pub fn build_instances(
    store: &ChunkStore,
    geometry: &CubeGeometry,
    voxel_size: f32,
    palette: Option<&MaterialPalette>,
) -> InstanceBuffers {
    let start = Instant::now();
    let instance_count = store.active_voxels();

    let mut transforms = Vec::with_capacity(instance_count);
    let mut colors = palette.map(|_| Vec::with_capacity(instance_count));

    for (position, id) in store.iter_active() {
        let center = Vector3::new(
            (position.x as f32 + 0.5) * voxel_size,
            (position.y as f32 + 0.5) * voxel_size,
            (position.z as f32 + 0.5) * voxel_size,
        );
        transforms.push(geometry.instance_transform(center, voxel_size));
        if let (Some(colors), Some(palette)) = (colors.as_mut(), palette) {
            colors.push(Vector3::from(palette.color_of(id)));
        }
    }
    debug_assert_eq!(transforms.len(), instance_count);

    info!(
        "Built {} cube instances in {:.2} ms",
        transforms.len(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    InstanceBuffers {
        instance_count: transforms.len(),
        transforms,
        colors,
    }
}
