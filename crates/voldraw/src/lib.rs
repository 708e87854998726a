//! voldraw: per-object GPU batch cache for volumetric grids.
//!
//! A [`Volume`] owns a [`VolumeBackend`] and lazily turns its grids into GPU
//! resources: one 3D texture per grid, a wireframe batch and a selection
//! surface batch. The resources stay cached until the volume is marked dirty.
//!
//! # Quick Start
//!
//! ```
//! use voldraw::*;
//!
//! fn main() -> Result<()> {
//!     voldraw::init_logging();
//!
//!     let mut grid = SparseGrid::new("density", 1)?;
//!     grid.set_voxel(IVec3::new(0, 0, 0), &[1.0])?;
//!     grid.set_voxel(IVec3::new(4, 2, 1), &[0.5])?;
//!
//!     let mut data = VolumeData::new();
//!     data.add_grid(grid)?;
//!
//!     let gpu = HeadlessBackend::new();
//!     let mut volume = Volume::new("smoke", data);
//!
//!     let density = GridRef::new("density", 1);
//!     let entry = volume.get_or_build_grid(&gpu, &density);
//!     assert!(entry.texture().is_some());
//!
//!     let wireframe = volume.get_wireframes(&gpu, &DrawOptions::default());
//!     assert!(wireframe.is_some());
//!
//!     // Grid data changed: everything is rebuilt on next access.
//!     volume.mark_dirty(DirtyReason::All);
//!     Ok(())
//! }
//! ```
//!
//! # Crates
//!
//! - `voldraw-core`: the backend trait, the in-memory sparse backend, options
//! - `voldraw-render`: GPU backends, textures, vertex formats and batches

// Graphics code intentionally uses casts for indices and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

mod batch_cache;
mod builders;
mod volume;

pub use batch_cache::{BatchCache, DirtyReason, GridEntry};
pub use builders::GRID_TEXTURE_LABEL;
pub use volume::Volume;

// Re-export core types
pub use voldraw_core::{
    display::{VolumeDisplay, WireframeDetail, WireframeType},
    error::{Result, VolumeError},
    geometry::{texture_space, DenseFloatGrid, GridRef, SurfaceGeometry, WireframeGeometry},
    options::DrawOptions,
    IVec3, Mat4, SparseGrid, UVec3, Vec3, VolumeBackend, VolumeData,
};

// Re-export render types
pub use voldraw_render::{
    Batch, ExtendMode, GpuBackend, GpuTexture, HeadlessBackend, PrimitiveType, RenderError,
    RenderResult, Swizzle, TextureFormat, VertexFormat, WgpuBackend,
};

/// Installs the `env_logger` logger, configured through `RUST_LOG`.
///
/// Does nothing if a logger is already installed.
pub fn init_logging() {
    let _ = env_logger::try_init();
    log::info!("voldraw {} initialized", env!("CARGO_PKG_VERSION"));
}
