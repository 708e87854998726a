//! In-memory volume made of sparse grids.

use glam::{UVec3, Vec3};

use crate::backend::VolumeBackend;
use crate::display::{WireframeDetail, WireframeType};
use crate::error::{Result, VolumeError};
use crate::geometry::{DenseFloatGrid, GridRef, SurfaceGeometry, WireframeGeometry};
use crate::sparse::SparseGrid;

/// An ordered list of named grids with one active grid.
#[derive(Debug, Clone, Default)]
pub struct VolumeData {
    grids: Vec<SparseGrid>,
    active_grid: usize,
    loaded: bool,
    load_count: usize,
}

impl VolumeData {
    /// Creates an empty volume.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a grid. The first grid added becomes active.
    pub fn add_grid(&mut self, grid: SparseGrid) -> Result<()> {
        if self.grid(grid.name()).is_some() {
            return Err(VolumeError::GridExists(grid.name().to_string()));
        }
        self.grids.push(grid);
        self.loaded = false;
        Ok(())
    }

    /// Removes a grid by name.
    pub fn remove_grid(&mut self, name: &str) -> Result<SparseGrid> {
        let index = self
            .grids
            .iter()
            .position(|g| g.name() == name)
            .ok_or_else(|| VolumeError::GridNotFound(name.to_string()))?;
        if index < self.active_grid || self.active_grid + 1 == self.grids.len() {
            self.active_grid = self.active_grid.saturating_sub(1);
        }
        Ok(self.grids.remove(index))
    }

    #[must_use]
    pub fn grid(&self, name: &str) -> Option<&SparseGrid> {
        self.grids.iter().find(|g| g.name() == name)
    }

    pub fn grid_mut(&mut self, name: &str) -> Option<&mut SparseGrid> {
        self.grids.iter_mut().find(|g| g.name() == name)
    }

    pub fn grids(&self) -> impl Iterator<Item = &SparseGrid> {
        self.grids.iter()
    }

    #[must_use]
    pub fn num_grids(&self) -> usize {
        self.grids.len()
    }

    /// Makes the named grid active.
    pub fn set_active_grid(&mut self, name: &str) -> Result<()> {
        self.active_grid = self
            .grids
            .iter()
            .position(|g| g.name() == name)
            .ok_or_else(|| VolumeError::GridNotFound(name.to_string()))?;
        Ok(())
    }

    /// Returns whether the grid data has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Returns how many times a full load was requested.
    #[must_use]
    pub fn load_count(&self) -> usize {
        self.load_count
    }
}

impl VolumeBackend for VolumeData {
    fn load_full_volume(&mut self) {
        self.load_count += 1;
        if !self.loaded {
            log::debug!("loading {} volume grids", self.grids.len());
            self.loaded = true;
        }
    }

    fn active_grid(&self) -> Option<GridRef> {
        self.grids.get(self.active_grid).map(SparseGrid::grid_ref)
    }

    fn grid_channels(&self, grid: &GridRef) -> Option<usize> {
        self.grid(grid.name()).map(SparseGrid::channels)
    }

    fn dense_resolution(&self, grid: &GridRef) -> Option<UVec3> {
        self.grid(grid.name())?.dense_resolution()
    }

    fn dense_floats(&self, grid: &GridRef) -> Option<DenseFloatGrid> {
        self.grid(grid.name())?.dense_floats()
    }

    fn wireframe(
        &self,
        grid: &GridRef,
        ty: WireframeType,
        detail: WireframeDetail,
    ) -> WireframeGeometry {
        self.grid(grid.name())
            .map(|g| g.wireframe(ty, detail))
            .unwrap_or_default()
    }

    fn selection_surface(&self, grid: &GridRef) -> SurfaceGeometry {
        self.grid(grid.name())
            .map(SparseGrid::selection_surface)
            .unwrap_or_default()
    }

    fn bounds(&self) -> Option<(Vec3, Vec3)> {
        self.grids
            .iter()
            .filter_map(SparseGrid::object_bounds)
            .reduce(|(amin, amax), (bmin, bmax)| (amin.min(bmin), amax.max(bmax)))
    }
}
