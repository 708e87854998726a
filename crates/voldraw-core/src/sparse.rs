//! Sparse block grid storage for volumetric data.
//!
//! Voxels live in 8³ leaf blocks keyed by block coordinate. Each leaf keeps
//! its values and an active-voxel bitmask. Leaves are grouped into 16³-voxel
//! nodes for coarse traversal.

use std::collections::HashMap;

use glam::{IVec3, Mat4, UVec3, Vec3};

use crate::display::{WireframeDetail, WireframeType};
use crate::error::{Result, VolumeError};
use crate::geometry::{DenseFloatGrid, GridRef, SurfaceGeometry, WireframeGeometry};

/// log2 of the leaf edge length.
pub const LEAF_LOG2: i32 = 3;
/// Leaf edge length in voxels.
pub const LEAF_DIM: i32 = 1 << LEAF_LOG2;
/// Voxels per leaf.
pub const LEAF_VOXELS: usize = (LEAF_DIM * LEAF_DIM * LEAF_DIM) as usize;
/// log2 of the coarse node edge length.
pub const NODE_LOG2: i32 = 4;
/// Coarse node edge length in voxels.
pub const NODE_DIM: i32 = 1 << NODE_LOG2;

const MASK_WORDS: usize = LEAF_VOXELS / 64;

#[derive(Debug, Clone)]
struct Leaf {
    values: Vec<f32>,
    active: [u64; MASK_WORDS],
}

impl Leaf {
    fn new(channels: usize) -> Self {
        Self {
            values: vec![0.0; LEAF_VOXELS * channels],
            active: [0; MASK_WORDS],
        }
    }

    fn is_active(&self, offset: usize) -> bool {
        self.active[offset / 64] & (1 << (offset % 64)) != 0
    }

    fn set_active(&mut self, offset: usize, on: bool) {
        if on {
            self.active[offset / 64] |= 1 << (offset % 64);
        } else {
            self.active[offset / 64] &= !(1 << (offset % 64));
        }
    }

    fn active_count(&self) -> usize {
        self.active.iter().map(|w| w.count_ones() as usize).sum()
    }

    fn active_offsets(&self) -> impl Iterator<Item = usize> + '_ {
        (0..LEAF_VOXELS).filter(|&o| self.is_active(o))
    }
}

fn leaf_offset(local: IVec3) -> usize {
    (local.x + LEAF_DIM * (local.y + LEAF_DIM * local.z)) as usize
}

fn leaf_local(offset: usize) -> IVec3 {
    let o = offset as i32;
    IVec3::new(o % LEAF_DIM, (o / LEAF_DIM) % LEAF_DIM, o / (LEAF_DIM * LEAF_DIM))
}

/// A named sparse voxel grid.
///
/// Voxel centers sit at integer index coordinates. `index_to_object` maps
/// index space to object space.
#[derive(Debug, Clone)]
pub struct SparseGrid {
    name: String,
    channels: usize,
    index_to_object: Mat4,
    leaves: HashMap<IVec3, Leaf>,
}

impl SparseGrid {
    /// Creates an empty grid with the identity transform.
    pub fn new(name: impl Into<String>, channels: usize) -> Result<Self> {
        let name = name.into();
        if channels == 0 {
            return Err(VolumeError::InvalidChannelCount(name));
        }
        Ok(Self {
            name,
            channels,
            index_to_object: Mat4::IDENTITY,
            leaves: HashMap::new(),
        })
    }

    /// Creates an empty grid with uniform voxel size.
    pub fn with_voxel_size(
        name: impl Into<String>,
        channels: usize,
        voxel_size: f32,
    ) -> Result<Self> {
        let mut grid = Self::new(name, channels)?;
        grid.index_to_object = Mat4::from_scale(Vec3::splat(voxel_size));
        Ok(grid)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Returns a reference usable by the draw cache.
    #[must_use]
    pub fn grid_ref(&self) -> GridRef {
        GridRef::new(self.name.clone(), self.channels)
    }

    #[must_use]
    pub fn index_to_object(&self) -> Mat4 {
        self.index_to_object
    }

    pub fn set_index_to_object(&mut self, transform: Mat4) -> &mut Self {
        self.index_to_object = transform;
        self
    }

    /// Sets a voxel value and marks it active.
    pub fn set_voxel(&mut self, ijk: IVec3, value: &[f32]) -> Result<()> {
        if value.len() != self.channels {
            return Err(VolumeError::SizeMismatch {
                expected: self.channels,
                actual: value.len(),
            });
        }
        let channels = self.channels;
        let leaf = self
            .leaves
            .entry(ijk >> LEAF_LOG2)
            .or_insert_with(|| Leaf::new(channels));
        let offset = leaf_offset(ijk & (LEAF_DIM - 1));
        leaf.values[offset * channels..(offset + 1) * channels].copy_from_slice(value);
        leaf.set_active(offset, true);
        Ok(())
    }

    /// Deactivates a voxel. Empty leaves are pruned.
    pub fn clear_voxel(&mut self, ijk: IVec3) {
        let key = ijk >> LEAF_LOG2;
        if let Some(leaf) = self.leaves.get_mut(&key) {
            leaf.set_active(leaf_offset(ijk & (LEAF_DIM - 1)), false);
            if leaf.active_count() == 0 {
                self.leaves.remove(&key);
            }
        }
    }

    /// Returns the value of an active voxel.
    #[must_use]
    pub fn voxel(&self, ijk: IVec3) -> Option<&[f32]> {
        let leaf = self.leaves.get(&(ijk >> LEAF_LOG2))?;
        let offset = leaf_offset(ijk & (LEAF_DIM - 1));
        leaf.is_active(offset)
            .then(|| &leaf.values[offset * self.channels..(offset + 1) * self.channels])
    }

    #[must_use]
    pub fn active_voxel_count(&self) -> usize {
        self.leaves.values().map(Leaf::active_count).sum()
    }

    #[must_use]
    pub fn leaf_count(&self) -> usize {
        self.leaves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    fn active_voxels(&self) -> impl Iterator<Item = (IVec3, &[f32])> + '_ {
        self.leaves.iter().flat_map(move |(key, leaf)| {
            let origin = *key << LEAF_LOG2;
            leaf.active_offsets().map(move |o| {
                (
                    origin + leaf_local(o),
                    &leaf.values[o * self.channels..(o + 1) * self.channels],
                )
            })
        })
    }

    /// Returns the inclusive index-space bounds of the active voxels.
    #[must_use]
    pub fn active_bounds(&self) -> Option<(IVec3, IVec3)> {
        self.active_voxels().fold(None, |acc, (ijk, _)| match acc {
            None => Some((ijk, ijk)),
            Some((min, max)) => Some((min.min(ijk), max.max(ijk))),
        })
    }

    /// Returns the object-space bounds of the active voxels, including voxel extents.
    #[must_use]
    pub fn object_bounds(&self) -> Option<(Vec3, Vec3)> {
        let (min, max) = self.active_bounds()?;
        let corners = crate::geometry::box_corners(
            min.as_vec3() - Vec3::splat(0.5),
            max.as_vec3() + Vec3::splat(0.5),
        );
        let mut lo = Vec3::splat(f32::MAX);
        let mut hi = Vec3::splat(f32::MIN);
        for corner in corners {
            let p = self.index_to_object.transform_point3(corner);
            lo = lo.min(p);
            hi = hi.max(p);
        }
        Some((lo, hi))
    }

    /// Inclusive index bounds of every node at the given level.
    fn node_boxes(&self, log2: i32) -> Vec<(IVec3, IVec3)> {
        let mut keys: Vec<IVec3> = self
            .leaves
            .keys()
            .map(|key| (*key << LEAF_LOG2) >> log2)
            .collect();
        keys.sort_by_key(|k| (k.z, k.y, k.x));
        keys.dedup();
        let dim = 1 << log2;
        keys.into_iter()
            .map(|k| (k << log2, (k << log2) + IVec3::splat(dim - 1)))
            .collect()
    }

    /// Returns the dense resolution covering the active voxels.
    ///
    /// Returns `None` when the grid is empty or an axis does not fit in `u32`.
    #[must_use]
    pub fn dense_resolution(&self) -> Option<UVec3> {
        let (min, max) = self.active_bounds()?;
        let axis = |lo: i32, hi: i32| u32::try_from(i64::from(hi) - i64::from(lo) + 1).ok();
        Some(UVec3::new(
            axis(min.x, max.x)?,
            axis(min.y, max.y)?,
            axis(min.z, max.z)?,
        ))
    }

    /// Materializes the active bounding box into a dense buffer.
    ///
    /// Returns `None` when the grid has no active voxels, or when the buffer
    /// size overflows or cannot be allocated.
    #[must_use]
    pub fn dense_floats(&self) -> Option<DenseFloatGrid> {
        let (min, _) = self.active_bounds()?;
        let resolution = self.dense_resolution()?;
        let len = (resolution.x as usize)
            .checked_mul(resolution.y as usize)?
            .checked_mul(resolution.z as usize)?
            .checked_mul(self.channels)?;

        let mut voxels = Vec::new();
        if voxels.try_reserve_exact(len).is_err() {
            log::warn!(
                "cannot allocate dense buffer of {len} floats for grid '{}'",
                self.name
            );
            return None;
        }
        voxels.resize(len, 0.0);

        let (rx, ry) = (resolution.x as usize, resolution.y as usize);
        for (ijk, value) in self.active_voxels() {
            let local = |v: i32, lo: i32| (i64::from(v) - i64::from(lo)) as usize;
            let index = local(ijk.x, min.x) + rx * (local(ijk.y, min.y) + ry * local(ijk.z, min.z));
            voxels[index * self.channels..(index + 1) * self.channels].copy_from_slice(value);
        }

        // Voxel centers land on half texels.
        let texture_to_object = self.index_to_object
            * Mat4::from_translation(min.as_vec3() - Vec3::splat(0.5))
            * Mat4::from_scale(resolution.as_vec3());

        Some(DenseFloatGrid {
            resolution,
            channels: self.channels,
            voxels,
            texture_to_object,
        })
    }

    /// Builds wireframe geometry for the given display settings.
    #[must_use]
    pub fn wireframe(&self, ty: WireframeType, detail: WireframeDetail) -> WireframeGeometry {
        let mut wire = WireframeGeometry::default();
        let half = Vec3::splat(0.5);
        match ty {
            WireframeType::None => {}
            WireframeType::Bounds => {
                if let Some((min, max)) = self.active_bounds() {
                    wire.push_box(
                        min.as_vec3() - half,
                        max.as_vec3() + half,
                        &self.index_to_object,
                    );
                }
            }
            WireframeType::Boxes => {
                let log2 = match detail {
                    WireframeDetail::Coarse => NODE_LOG2,
                    WireframeDetail::Fine => LEAF_LOG2,
                };
                for (min, max) in self.node_boxes(log2) {
                    wire.push_box(
                        min.as_vec3() - half,
                        max.as_vec3() + half,
                        &self.index_to_object,
                    );
                }
            }
            WireframeType::Points => match detail {
                WireframeDetail::Coarse => {
                    for (min, max) in self.node_boxes(LEAF_LOG2) {
                        let center = (min.as_vec3() + max.as_vec3()) * 0.5;
                        wire.positions.push(self.index_to_object.transform_point3(center));
                    }
                }
                WireframeDetail::Fine => {
                    let mut points: Vec<IVec3> = self.active_voxels().map(|(ijk, _)| ijk).collect();
                    points.sort_by_key(|p| (p.z, p.y, p.x));
                    wire.positions.extend(
                        points
                            .into_iter()
                            .map(|p| self.index_to_object.transform_point3(p.as_vec3())),
                    );
                }
            },
        }
        wire
    }

    /// Builds a closed surface made of the coarse node boxes.
    #[must_use]
    pub fn selection_surface(&self) -> SurfaceGeometry {
        let mut surface = SurfaceGeometry::default();
        let half = Vec3::splat(0.5);
        for (min, max) in self.node_boxes(NODE_LOG2) {
            surface.push_box(min.as_vec3() - half, max.as_vec3() + half, &self.index_to_object);
        }
        surface
    }
}
