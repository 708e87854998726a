//! Value types exchanged between a volume backend and the draw cache.

use glam::{Mat4, UVec3, Vec3};

/// A lightweight handle to one grid of a volume.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GridRef {
    name: String,
    channels: usize,
}

impl GridRef {
    pub fn new(name: impl Into<String>, channels: usize) -> Self {
        Self {
            name: name.into(),
            channels,
        }
    }

    /// Returns the grid name. Names are unique within a volume.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the channel count recorded when the reference was made.
    ///
    /// The draw cache reads the count from the backend instead, see
    /// [`VolumeBackend::grid_channels`](crate::VolumeBackend::grid_channels).
    #[must_use]
    pub fn channels(&self) -> usize {
        self.channels
    }
}

/// A fully materialized, regularly sampled copy of a grid.
///
/// Voxels are stored x-fastest, with `channels` interleaved floats per voxel.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseFloatGrid {
    pub resolution: UVec3,
    pub channels: usize,
    pub voxels: Vec<f32>,
    /// Maps texture coordinates in `[0, 1]^3` to object space.
    pub texture_to_object: Mat4,
}

impl DenseFloatGrid {
    /// Returns the number of voxels.
    #[must_use]
    pub fn voxel_count(&self) -> usize {
        self.resolution.x as usize * self.resolution.y as usize * self.resolution.z as usize
    }
}

/// Wireframe geometry produced by a tree traversal.
///
/// `edges` is empty for point display.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireframeGeometry {
    pub positions: Vec<Vec3>,
    pub edges: Vec<[u32; 2]>,
}

/// Triangulated surface used for selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceGeometry {
    pub positions: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
}

/// The 12 edges of a box whose corners are ordered as in [`box_corners`].
pub const BOX_EDGES: [[u32; 2]; 12] = [
    // Bottom face
    [0, 1],
    [1, 2],
    [2, 3],
    [3, 0],
    // Top face
    [4, 5],
    [5, 6],
    [6, 7],
    [7, 4],
    // Vertical edges
    [0, 4],
    [1, 5],
    [2, 6],
    [3, 7],
];

/// The 12 outward-facing triangles of a box whose corners are ordered as in [`box_corners`].
pub const BOX_TRIANGLES: [[u32; 3]; 12] = [
    // -z
    [0, 2, 1],
    [0, 3, 2],
    // +z
    [4, 5, 6],
    [4, 6, 7],
    // -y
    [0, 1, 5],
    [0, 5, 4],
    // +y
    [3, 7, 6],
    [3, 6, 2],
    // -x
    [0, 4, 7],
    [0, 7, 3],
    // +x
    [1, 2, 6],
    [1, 6, 5],
];

/// Returns the 8 corners of an axis-aligned box.
#[must_use]
pub fn box_corners(min: Vec3, max: Vec3) -> [Vec3; 8] {
    [
        Vec3::new(min.x, min.y, min.z), // 0
        Vec3::new(max.x, min.y, min.z), // 1
        Vec3::new(max.x, max.y, min.z), // 2
        Vec3::new(min.x, max.y, min.z), // 3
        Vec3::new(min.x, min.y, max.z), // 4
        Vec3::new(max.x, min.y, max.z), // 5
        Vec3::new(max.x, max.y, max.z), // 6
        Vec3::new(min.x, max.y, max.z), // 7
    ]
}

/// Returns the `(orco_add, orco_mul)` texture-space mapping for object bounds.
///
/// Without bounds the mapping is the identity `(0, 1)`.
#[must_use]
pub fn texture_space(bounds: Option<(Vec3, Vec3)>) -> (Vec3, Vec3) {
    match bounds {
        Some((min, max)) => ((min + max) * 0.5, (max - min) * 0.5),
        None => (Vec3::ZERO, Vec3::ONE),
    }
}

impl WireframeGeometry {
    /// Appends a box outline, transforming its corners by `transform`.
    pub fn push_box(&mut self, min: Vec3, max: Vec3, transform: &Mat4) {
        let base = self.positions.len() as u32;
        self.positions.extend(
            box_corners(min, max)
                .iter()
                .map(|&c| transform.transform_point3(c)),
        );
        self.edges
            .extend(BOX_EDGES.iter().map(|e| [base + e[0], base + e[1]]));
    }
}

impl SurfaceGeometry {
    /// Appends a closed box surface, transforming its corners by `transform`.
    pub fn push_box(&mut self, min: Vec3, max: Vec3, transform: &Mat4) {
        let base = self.positions.len() as u32;
        self.positions.extend(
            box_corners(min, max)
                .iter()
                .map(|&c| transform.transform_point3(c)),
        );
        self.triangles.extend(
            BOX_TRIANGLES
                .iter()
                .map(|t| [base + t[0], base + t[1], base + t[2]]),
        );
    }
}
