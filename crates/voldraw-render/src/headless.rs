//! A GPU backend without a device.
//!
//! Resources keep their data on the CPU and report creation and release to
//! shared counters, which makes resource lifetimes observable.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use glam::UVec3;

use crate::error::RenderResult;
use crate::gpu::GpuBackend;
use crate::texture::{ExtendMode, Swizzle, Texture3dDescriptor, TextureFormat};
use crate::vertex::{VertexBufferData, VertexFormat};

/// Default maximum 3D texture size, matching common desktop limits.
pub const DEFAULT_MAX_TEXTURE_3D_SIZE: u32 = 2048;

#[derive(Debug, Default)]
struct Tracker {
    next_id: AtomicU64,
    textures_created: AtomicUsize,
    textures_released: AtomicUsize,
    buffers_created: AtomicUsize,
    buffers_released: AtomicUsize,
}

impl Tracker {
    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// A snapshot of resource counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResourceStats {
    pub textures_created: usize,
    pub textures_released: usize,
    pub buffers_created: usize,
    pub buffers_released: usize,
}

impl ResourceStats {
    #[must_use]
    pub fn live_textures(&self) -> usize {
        self.textures_created - self.textures_released
    }

    #[must_use]
    pub fn live_buffers(&self) -> usize {
        self.buffers_created - self.buffers_released
    }
}

/// A texture kept in CPU memory.
#[derive(Debug)]
pub struct HeadlessTexture {
    id: u64,
    label: String,
    extent: UVec3,
    format: TextureFormat,
    texels: Vec<f32>,
    swizzle: Option<Swizzle>,
    extend_mode: ExtendMode,
    tracker: Arc<Tracker>,
}

impl HeadlessTexture {
    /// Unique id of this resource within its backend.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn extent(&self) -> UVec3 {
        self.extent
    }

    #[must_use]
    pub fn format(&self) -> TextureFormat {
        self.format
    }

    #[must_use]
    pub fn texels(&self) -> &[f32] {
        &self.texels
    }

    #[must_use]
    pub fn swizzle(&self) -> Option<Swizzle> {
        self.swizzle
    }

    #[must_use]
    pub fn extend_mode(&self) -> ExtendMode {
        self.extend_mode
    }

    /// Returns the swizzled RGBA value of a texel, or `None` outside the texture.
    #[must_use]
    pub fn sample(&self, ijk: UVec3) -> Option<[f32; 4]> {
        if ijk.cmpge(self.extent).any() {
            return None;
        }
        let channels = self.format.channels();
        let index = ijk.x as usize
            + self.extent.x as usize * (ijk.y as usize + self.extent.y as usize * ijk.z as usize);
        let texel = &self.texels[index * channels..(index + 1) * channels];
        let swizzle = self.swizzle.unwrap_or(self.format.swizzle());
        Some(swizzle.apply(texel))
    }
}

impl Drop for HeadlessTexture {
    fn drop(&mut self) {
        self.tracker.textures_released.fetch_add(1, Ordering::Relaxed);
    }
}

/// Kind of data held by a [`HeadlessBuffer`].
#[derive(Debug, Clone, PartialEq)]
pub enum BufferContents {
    Vertex(VertexBufferData),
    Index(Vec<u32>),
}

/// A buffer kept in CPU memory.
#[derive(Debug)]
pub struct HeadlessBuffer {
    id: u64,
    label: String,
    contents: BufferContents,
    tracker: Arc<Tracker>,
}

impl HeadlessBuffer {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn contents(&self) -> &BufferContents {
        &self.contents
    }

    /// Returns the vertex data, if this is a vertex buffer.
    #[must_use]
    pub fn vertex_data(&self) -> Option<&VertexBufferData> {
        match &self.contents {
            BufferContents::Vertex(data) => Some(data),
            BufferContents::Index(_) => None,
        }
    }

    /// Returns the indices, if this is an index buffer.
    #[must_use]
    pub fn indices(&self) -> Option<&[u32]> {
        match &self.contents {
            BufferContents::Index(indices) => Some(indices),
            BufferContents::Vertex(_) => None,
        }
    }

    /// Returns the vertex layout, if this is a vertex buffer.
    #[must_use]
    pub fn vertex_format(&self) -> Option<&VertexFormat> {
        self.vertex_data().map(VertexBufferData::format)
    }
}

impl Drop for HeadlessBuffer {
    fn drop(&mut self) {
        self.tracker.buffers_released.fetch_add(1, Ordering::Relaxed);
    }
}

/// A [`GpuBackend`] that needs no graphics device.
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    max_texture_3d_size: u32,
    tracker: Arc<Tracker>,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::with_max_texture_3d_size(DEFAULT_MAX_TEXTURE_3D_SIZE)
    }

    /// Creates a backend with a custom 3D texture limit.
    pub fn with_max_texture_3d_size(max_texture_3d_size: u32) -> Self {
        Self {
            max_texture_3d_size,
            tracker: Arc::new(Tracker::default()),
        }
    }

    /// Returns the current resource counters.
    #[must_use]
    pub fn stats(&self) -> ResourceStats {
        ResourceStats {
            textures_created: self.tracker.textures_created.load(Ordering::Relaxed),
            textures_released: self.tracker.textures_released.load(Ordering::Relaxed),
            buffers_created: self.tracker.buffers_created.load(Ordering::Relaxed),
            buffers_released: self.tracker.buffers_released.load(Ordering::Relaxed),
        }
    }
}

impl GpuBackend for HeadlessBackend {
    type Texture = HeadlessTexture;
    type Buffer = HeadlessBuffer;

    fn max_texture_3d_size(&self) -> u32 {
        self.max_texture_3d_size
    }

    fn create_texture_3d(&self, desc: &Texture3dDescriptor<'_>) -> RenderResult<HeadlessTexture> {
        desc.validate(self.max_texture_3d_size)?;
        self.tracker.textures_created.fetch_add(1, Ordering::Relaxed);
        Ok(HeadlessTexture {
            id: self.tracker.next_id(),
            label: desc.label.to_string(),
            extent: desc.extent,
            format: desc.format,
            texels: desc.data.to_vec(),
            swizzle: None,
            extend_mode: ExtendMode::default(),
            tracker: Arc::clone(&self.tracker),
        })
    }

    fn configure_texture(
        &self,
        texture: &mut HeadlessTexture,
        swizzle: Swizzle,
        extend_mode: ExtendMode,
    ) {
        texture.swizzle = Some(swizzle);
        texture.extend_mode = extend_mode;
    }

    fn create_vertex_buffer(&self, label: &str, data: &VertexBufferData) -> HeadlessBuffer {
        self.tracker.buffers_created.fetch_add(1, Ordering::Relaxed);
        HeadlessBuffer {
            id: self.tracker.next_id(),
            label: label.to_string(),
            contents: BufferContents::Vertex(data.clone()),
            tracker: Arc::clone(&self.tracker),
        }
    }

    fn create_index_buffer(&self, label: &str, indices: &[u32]) -> HeadlessBuffer {
        self.tracker.buffers_created.fetch_add(1, Ordering::Relaxed);
        HeadlessBuffer {
            id: self.tracker.next_id(),
            label: label.to_string(),
            contents: BufferContents::Index(indices.to_vec()),
            tracker: Arc::clone(&self.tracker),
        }
    }
}
