//! A volume object and its draw cache.

use glam::Vec3;
use voldraw_core::{
    texture_space, DrawOptions, GridRef, VolumeBackend, VolumeDisplay, WireframeType,
};
use voldraw_render::{Batch, GpuBackend};

use crate::batch_cache::{BatchCache, DirtyReason, GridEntry};
use crate::builders::{build_grid_entry, build_selection_surface_batch, build_wireframe_batch};

/// A volume object: backend data, display settings and the GPU resources
/// derived from them.
///
/// All resources are built lazily by the accessors and live in a cache that
/// is rebuilt from scratch after [`Volume::mark_dirty`].
pub struct Volume<D: VolumeBackend, B: GpuBackend> {
    name: String,
    data: D,
    display: VolumeDisplay,
    batch_cache: Option<BatchCache<B>>,
}

impl<D: VolumeBackend, B: GpuBackend> Volume<D, B> {
    /// Creates a volume with default display settings and no cache.
    pub fn new(name: impl Into<String>, data: D) -> Self {
        Self {
            name: name.into(),
            data,
            display: VolumeDisplay::default(),
            batch_cache: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Mutable access to the backend.
    ///
    /// Call [`Volume::mark_dirty`] after changing grid data.
    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    #[must_use]
    pub fn display(&self) -> VolumeDisplay {
        self.display
    }

    /// Changes the display settings, invalidating the cache if they differ.
    pub fn set_display(&mut self, display: VolumeDisplay) {
        if display != self.display {
            self.display = display;
            self.mark_dirty(DirtyReason::All);
        }
    }

    /// Creates the cache if needed and rebuilds it if dirty.
    pub fn ensure_valid(&mut self) {
        BatchCache::validate(&mut self.batch_cache);
    }

    /// Returns true when a cache exists and is not dirty.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.batch_cache.as_ref().is_some_and(|c| !c.is_dirty())
    }

    #[must_use]
    pub fn cache(&self) -> Option<&BatchCache<B>> {
        self.batch_cache.as_ref()
    }

    /// Flags the cache for rebuild. Does nothing if no cache exists.
    pub fn mark_dirty(&mut self, reason: DirtyReason) {
        match reason {
            DirtyReason::All => {
                if let Some(cache) = &mut self.batch_cache {
                    cache.is_dirty = true;
                }
            }
        }
    }

    /// Flags the cache for rebuild from a host reason code.
    ///
    /// # Panics
    ///
    /// Panics if `code` is not a known [`DirtyReason`].
    pub fn mark_dirty_code(&mut self, code: u32) {
        match DirtyReason::try_from(code) {
            Ok(reason) => self.mark_dirty(reason),
            Err(code) => panic!("unknown volume dirty reason: {code}"),
        }
    }

    /// Releases the cache and every GPU resource it owns.
    pub fn release_all(&mut self) {
        if let Some(cache) = self.batch_cache.take() {
            log::debug!(
                "releasing batch cache of volume '{}' ({} grids)",
                self.name,
                cache.grids().len()
            );
        }
    }

    /// Returns the cache entry for a grid, building it on first request.
    ///
    /// The entry's texture is `None` when the grid cannot be drawn.
    pub fn get_or_build_grid(&mut self, gpu: &B, grid: &GridRef) -> &GridEntry<B> {
        let Self {
            data, batch_cache, ..
        } = self;
        let cache = BatchCache::validate(batch_cache);

        let index = match cache.grid_index(grid.name()) {
            Some(index) => index,
            None => {
                cache.grids.push(build_grid_entry(data, gpu, grid));
                cache.grids.len() - 1
            }
        };
        &cache.grids[index]
    }

    /// Returns the grid entry only if it has a texture to draw.
    pub fn grid_for_drawing(&mut self, gpu: &B, grid: &GridRef) -> Option<&GridEntry<B>> {
        let entry = self.get_or_build_grid(gpu, grid);
        entry.texture().is_some().then_some(entry)
    }

    /// Returns the wireframe batch of the active grid.
    ///
    /// Returns `None` when the wireframe is hidden or there is no active grid.
    pub fn get_wireframes(&mut self, gpu: &B, options: &DrawOptions) -> Option<&Batch<B>> {
        let VolumeDisplay {
            wireframe_type,
            wireframe_detail,
        } = self.display;
        if wireframe_type == WireframeType::None {
            return None;
        }

        let Self {
            data, batch_cache, ..
        } = self;
        let cache = BatchCache::validate(batch_cache);

        if cache.wireframe.is_none() {
            let grid = data.active_grid()?;
            let geometry = data.wireframe(&grid, wireframe_type, wireframe_detail);
            cache.wireframe = Some(build_wireframe_batch(
                gpu,
                &geometry,
                wireframe_type,
                options,
            ));
        }
        cache.wireframe.as_ref()
    }

    /// Returns the triangle batch used for selection outlines.
    pub fn get_selection_surface(&mut self, gpu: &B) -> Option<&Batch<B>> {
        let Self {
            data, batch_cache, ..
        } = self;
        let cache = BatchCache::validate(batch_cache);

        if cache.selection_surface.is_none() {
            let grid = data.active_grid()?;
            let geometry = data.selection_surface(&grid);
            cache.selection_surface = Some(build_selection_surface_batch(gpu, &geometry));
        }
        cache.selection_surface.as_ref()
    }

    /// Returns `(orco_add, orco_mul)` mapping the volume bounds to `[-1, 1]`.
    #[must_use]
    pub fn texture_space(&self) -> (Vec3, Vec3) {
        texture_space(self.data.bounds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voldraw_core::{IVec3, SparseGrid, VolumeData};
    use voldraw_render::HeadlessBackend;

    fn density_volume() -> Volume<VolumeData, HeadlessBackend> {
        let mut grid = SparseGrid::new("density", 1).unwrap();
        grid.set_voxel(IVec3::ZERO, &[1.0]).unwrap();
        grid.set_voxel(IVec3::new(3, 1, 0), &[0.5]).unwrap();
        let mut data = VolumeData::new();
        data.add_grid(grid).unwrap();
        Volume::new("smoke", data)
    }

    #[test]
    fn test_volume_starts_without_cache() {
        let volume = density_volume();
        assert_eq!(volume.name(), "smoke");
        assert!(volume.cache().is_none());
        assert!(!volume.is_valid());
    }

    #[test]
    fn test_mark_dirty_without_cache_is_noop() {
        let mut volume = density_volume();
        volume.mark_dirty(DirtyReason::All);
        assert!(volume.cache().is_none());

        volume.ensure_valid();
        volume.mark_dirty_code(DirtyReason::ALL_CODE);
        assert!(!volume.is_valid());
        volume.ensure_valid();
        assert!(volume.is_valid());
    }

    #[test]
    #[should_panic(expected = "unknown volume dirty reason")]
    fn test_mark_dirty_unknown_code() {
        let mut volume = density_volume();
        volume.mark_dirty_code(3);
    }

    #[test]
    fn test_set_display_invalidates() {
        let gpu = HeadlessBackend::new();
        let mut volume = density_volume();
        assert!(volume.get_wireframes(&gpu, &DrawOptions::default()).is_some());

        volume.set_display(volume.display());
        assert!(volume.is_valid());

        volume.set_display(VolumeDisplay {
            wireframe_type: WireframeType::Points,
            ..VolumeDisplay::default()
        });
        assert!(!volume.is_valid());
        assert_eq!(gpu.stats().live_buffers(), 3);

        let batch = volume.get_wireframes(&gpu, &DrawOptions::default()).unwrap();
        assert_eq!(batch.primitive(), voldraw_render::PrimitiveType::Points);
        assert_eq!(gpu.stats().live_buffers(), 2);
    }

    #[test]
    fn test_grid_for_drawing() {
        let gpu = HeadlessBackend::new();
        let mut volume = density_volume();
        let density = GridRef::new("density", 1);
        assert!(volume.grid_for_drawing(&gpu, &density).is_some());

        let missing = GridRef::new("temperature", 1);
        assert!(volume.grid_for_drawing(&gpu, &missing).is_none());
        assert_eq!(volume.cache().unwrap().grids().len(), 2);
    }

    #[test]
    fn test_texture_space() {
        let volume = density_volume();
        let (add, mul) = volume.texture_space();
        assert_eq!(add, Vec3::new(1.5, 0.5, 0.0));
        assert_eq!(mul, Vec3::new(2.0, 1.0, 0.5));

        let empty: Volume<VolumeData, HeadlessBackend> = Volume::new("empty", VolumeData::new());
        assert_eq!(empty.texture_space(), (Vec3::ZERO, Vec3::ONE));
    }
}
