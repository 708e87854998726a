//! The volume data source consumed by the draw cache.

use glam::{UVec3, Vec3};

use crate::display::{WireframeDetail, WireframeType};
use crate::geometry::{DenseFloatGrid, GridRef, SurfaceGeometry, WireframeGeometry};

/// A source of volumetric grids.
///
/// Traversals return owned geometry instead of invoking callbacks. Loading is
/// an explicit step: the draw cache calls [`VolumeBackend::load_full_volume`]
/// only when it materializes a new grid.
pub trait VolumeBackend {
    /// Loads all grid data. Can be expensive and blocks the caller.
    fn load_full_volume(&mut self);

    /// Returns the grid shown in the viewport, if any.
    fn active_grid(&self) -> Option<GridRef>;

    /// Returns the number of float channels the grid stores.
    ///
    /// Returns `None` if the grid is unknown. The draw cache trusts this
    /// value over the one carried by a [`GridRef`].
    fn grid_channels(&self, grid: &GridRef) -> Option<usize>;

    /// Returns the resolution [`VolumeBackend::dense_floats`] would produce,
    /// without allocating it.
    ///
    /// Returns `None` if the grid is unknown, empty, or too large to index.
    fn dense_resolution(&self, grid: &GridRef) -> Option<UVec3>;

    /// Returns a dense float copy of a grid.
    ///
    /// Returns `None` if the grid is unknown, has no active voxels, or the
    /// buffer cannot be allocated.
    fn dense_floats(&self, grid: &GridRef) -> Option<DenseFloatGrid>;

    /// Builds wireframe geometry for a grid.
    fn wireframe(
        &self,
        grid: &GridRef,
        ty: WireframeType,
        detail: WireframeDetail,
    ) -> WireframeGeometry;

    /// Builds the selection surface of a grid.
    fn selection_surface(&self, grid: &GridRef) -> SurfaceGeometry;

    /// Returns the object-space bounds of the whole volume.
    fn bounds(&self) -> Option<(Vec3, Vec3)>;
}
