//! Core data model for voldraw.
//!
//! This crate provides the types the draw cache consumes:
//! - [`VolumeBackend`] trait for volumetric data sources
//! - [`SparseGrid`] and [`VolumeData`], an in-memory backend built on 8³ leaf blocks
//! - Value types for dense grids, wireframes and selection surfaces
//! - Display settings and draw options

// Graphics code intentionally uses casts for indices and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod backend;
pub mod display;
pub mod error;
pub mod geometry;
pub mod options;
pub mod sparse;
pub mod volume_data;

pub use backend::VolumeBackend;
pub use display::{VolumeDisplay, WireframeDetail, WireframeType};
pub use error::{Result, VolumeError};
pub use geometry::{texture_space, DenseFloatGrid, GridRef, SurfaceGeometry, WireframeGeometry};
pub use options::DrawOptions;
pub use sparse::SparseGrid;
pub use volume_data::VolumeData;

// Re-export glam types for convenience
pub use glam::{IVec3, Mat4, UVec3, Vec3};
