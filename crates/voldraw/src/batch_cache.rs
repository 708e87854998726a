//! Per-volume cache of derived GPU resources.

use glam::Mat4;
use voldraw_render::{Batch, GpuBackend, GpuTexture};

/// Reason passed when invalidating a cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirtyReason {
    /// All volume data changed.
    All,
}

impl DirtyReason {
    /// Host code for [`DirtyReason::All`].
    pub const ALL_CODE: u32 = 0;
}

impl TryFrom<u32> for DirtyReason {
    type Error = u32;

    fn try_from(code: u32) -> Result<Self, u32> {
        match code {
            Self::ALL_CODE => Ok(Self::All),
            other => Err(other),
        }
    }
}

/// The GPU-resident form of one named grid.
pub struct GridEntry<B: GpuBackend> {
    pub(crate) name: String,
    pub(crate) texture: Option<GpuTexture<B>>,
    pub(crate) texture_to_object: Mat4,
    pub(crate) object_to_texture: Mat4,
}

impl<B: GpuBackend> GridEntry<B> {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            texture: None,
            texture_to_object: Mat4::IDENTITY,
            object_to_texture: Mat4::IDENTITY,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The 3D texture, or `None` when the grid has nothing the GPU can draw.
    #[must_use]
    pub fn texture(&self) -> Option<&GpuTexture<B>> {
        self.texture.as_ref()
    }

    #[must_use]
    pub fn texture_to_object(&self) -> Mat4 {
        self.texture_to_object
    }

    #[must_use]
    pub fn object_to_texture(&self) -> Mat4 {
        self.object_to_texture
    }
}

/// Derived GPU resources of one volume.
///
/// Dropping the cache releases every resource it holds.
pub struct BatchCache<B: GpuBackend> {
    pub(crate) grids: Vec<GridEntry<B>>,
    pub(crate) wireframe: Option<Batch<B>>,
    pub(crate) selection_surface: Option<Batch<B>>,
    pub(crate) is_dirty: bool,
}

impl<B: GpuBackend> Default for BatchCache<B> {
    fn default() -> Self {
        Self {
            grids: Vec::new(),
            wireframe: None,
            selection_surface: None,
            is_dirty: false,
        }
    }
}

impl<B: GpuBackend> BatchCache<B> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a valid cache in `slot`, creating it or rebuilding a dirty one.
    pub(crate) fn validate(slot: &mut Option<Self>) -> &mut Self {
        let cache = slot.get_or_insert_with(Self::new);
        if cache.is_dirty {
            log::debug!(
                "volume batch cache dirty, releasing {} grids",
                cache.grids.len()
            );
            *cache = Self::new();
        }
        cache
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub(crate) fn grid_index(&self, name: &str) -> Option<usize> {
        self.grids.iter().position(|g| g.name == name)
    }

    /// Grid entries in insertion order.
    #[must_use]
    pub fn grids(&self) -> &[GridEntry<B>] {
        &self.grids
    }

    #[must_use]
    pub fn grid(&self, name: &str) -> Option<&GridEntry<B>> {
        self.grid_index(name).map(|i| &self.grids[i])
    }

    #[must_use]
    pub fn wireframe(&self) -> Option<&Batch<B>> {
        self.wireframe.as_ref()
    }

    #[must_use]
    pub fn selection_surface(&self) -> Option<&Batch<B>> {
        self.selection_surface.as_ref()
    }

    /// Returns true when nothing has been built yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.grids.is_empty() && self.wireframe.is_none() && self.selection_surface.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use voldraw_render::HeadlessBackend;

    #[test]
    fn test_dirty_reason_codes() {
        assert_eq!(DirtyReason::try_from(0u32), Ok(DirtyReason::All));
        assert_eq!(DirtyReason::try_from(7u32), Err(7));
    }

    #[test]
    fn test_validate_creates_cache() {
        let mut slot: Option<BatchCache<HeadlessBackend>> = None;
        let cache = BatchCache::validate(&mut slot);
        assert!(cache.is_empty());
        assert!(!cache.is_dirty());
        assert!(slot.is_some());
    }

    #[test]
    fn test_validate_resets_dirty_cache() {
        let mut slot = Some(BatchCache::<HeadlessBackend>::new());
        if let Some(cache) = slot.as_mut() {
            cache.grids.push(GridEntry::new("density"));
            cache.is_dirty = true;
        }

        let cache = BatchCache::validate(&mut slot);
        assert!(cache.is_empty());
        assert!(!cache.is_dirty());
    }

    #[test]
    fn test_validate_keeps_valid_cache() {
        let mut slot = Some(BatchCache::<HeadlessBackend>::new());
        if let Some(cache) = slot.as_mut() {
            cache.grids.push(GridEntry::new("density"));
        }

        let cache = BatchCache::validate(&mut slot);
        assert_eq!(cache.grids().len(), 1);
        assert!(cache.grid("density").is_some());
        assert!(cache.grid("temperature").is_none());
    }
}
