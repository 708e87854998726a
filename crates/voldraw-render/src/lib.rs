//! GPU abstraction for voldraw.
//!
//! This crate provides the resources the volume draw cache allocates:
//! - [`GpuBackend`] trait with owned texture and buffer handles
//! - 3D texture formats, swizzles and extend modes
//! - Vertex formats, vertex data and normal packing
//! - Index buffer builders and [`Batch`]es
//! - [`HeadlessBackend`] for device-free use, and [`WgpuBackend`]

// Graphics code intentionally uses casts for indices, colors, and coordinates
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_sign_loss)]
// Documentation lints - internal functions don't need exhaustive panic/error docs
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod batch;
pub mod error;
pub mod gpu;
pub mod headless;
pub mod texture;
pub mod vertex;
pub mod wgpu_backend;

pub use batch::{Batch, IndexBuffer, IndexBufferBuilder, PrimitiveType, VertexBuffer};
pub use error::{RenderError, RenderResult};
pub use gpu::GpuBackend;
pub use headless::{
    BufferContents, HeadlessBackend, HeadlessBuffer, HeadlessTexture, ResourceStats,
};
pub use texture::{ExtendMode, GpuTexture, Swizzle, Texture3dDescriptor, TextureFormat};
pub use vertex::{
    pack_normal_i16, PackedNormal, VertexAttrType, VertexAttribute, VertexBufferData,
    VertexFormat,
};
pub use wgpu_backend::{WgpuBackend, WgpuTexture};
