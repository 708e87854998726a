//! Drawable batches and the buffers they own.

use crate::gpu::GpuBackend;
use crate::vertex::{VertexBufferData, VertexFormat};

/// Primitive topology of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    Points,
    Lines,
    Triangles,
}

impl PrimitiveType {
    /// Number of vertices per primitive.
    #[must_use]
    pub const fn vertices_per_primitive(self) -> usize {
        match self {
            Self::Points => 1,
            Self::Lines => 2,
            Self::Triangles => 3,
        }
    }
}

/// An uploaded vertex buffer.
pub struct VertexBuffer<B: GpuBackend> {
    raw: B::Buffer,
    format: VertexFormat,
    vertex_count: usize,
}

impl<B: GpuBackend> VertexBuffer<B> {
    /// Uploads vertex data.
    pub fn upload(gpu: &B, label: &str, data: &VertexBufferData) -> Self {
        Self {
            raw: gpu.create_vertex_buffer(label, data),
            format: data.format().clone(),
            vertex_count: data.vertex_count(),
        }
    }

    #[must_use]
    pub fn raw(&self) -> &B::Buffer {
        &self.raw
    }

    #[must_use]
    pub fn format(&self) -> &VertexFormat {
        &self.format
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }
}

/// An uploaded index buffer.
pub struct IndexBuffer<B: GpuBackend> {
    raw: B::Buffer,
    primitive: PrimitiveType,
    index_count: usize,
}

impl<B: GpuBackend> IndexBuffer<B> {
    #[must_use]
    pub fn raw(&self) -> &B::Buffer {
        &self.raw
    }

    #[must_use]
    pub fn primitive(&self) -> PrimitiveType {
        self.primitive
    }

    #[must_use]
    pub fn index_count(&self) -> usize {
        self.index_count
    }

    /// Number of primitives referenced by the indices.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        self.index_count / self.primitive.vertices_per_primitive()
    }
}

/// Collects indices for one primitive type before upload.
#[derive(Debug, Clone)]
pub struct IndexBufferBuilder {
    primitive: PrimitiveType,
    vertex_len: usize,
    indices: Vec<u32>,
}

impl IndexBufferBuilder {
    /// Starts a builder for `primitive_len` primitives over `vertex_len` vertices.
    pub fn new(primitive: PrimitiveType, primitive_len: usize, vertex_len: usize) -> Self {
        Self {
            primitive,
            vertex_len,
            indices: Vec::with_capacity(primitive_len * primitive.vertices_per_primitive()),
        }
    }

    fn push(&mut self, v: u32) {
        debug_assert!(
            (v as usize) < self.vertex_len,
            "index {v} out of range for {} vertices",
            self.vertex_len
        );
        self.indices.push(v);
    }

    pub fn add_line_verts(&mut self, v1: u32, v2: u32) {
        debug_assert_eq!(self.primitive, PrimitiveType::Lines);
        self.push(v1);
        self.push(v2);
    }

    pub fn add_tri_verts(&mut self, v1: u32, v2: u32, v3: u32) {
        debug_assert_eq!(self.primitive, PrimitiveType::Triangles);
        self.push(v1);
        self.push(v2);
        self.push(v3);
    }

    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Uploads the collected indices.
    pub fn build<B: GpuBackend>(self, gpu: &B, label: &str) -> IndexBuffer<B> {
        IndexBuffer {
            raw: gpu.create_index_buffer(label, &self.indices),
            primitive: self.primitive,
            index_count: self.indices.len(),
        }
    }
}

/// A drawable unit: vertex buffers, a topology and an optional index buffer.
///
/// The batch owns every buffer attached to it.
pub struct Batch<B: GpuBackend> {
    primitive: PrimitiveType,
    vertex_buffers: Vec<VertexBuffer<B>>,
    index_buffer: Option<IndexBuffer<B>>,
}

impl<B: GpuBackend> Batch<B> {
    /// Creates a batch from its main vertex buffer and an optional index buffer.
    pub fn new(
        primitive: PrimitiveType,
        vertex_buffer: VertexBuffer<B>,
        index_buffer: Option<IndexBuffer<B>>,
    ) -> Self {
        if let Some(ibo) = &index_buffer {
            debug_assert_eq!(ibo.primitive(), primitive);
        }
        Self {
            primitive,
            vertex_buffers: vec![vertex_buffer],
            index_buffer,
        }
    }

    /// Attaches another per-vertex buffer and returns its slot.
    pub fn add_vertex_buffer(&mut self, vertex_buffer: VertexBuffer<B>) -> usize {
        debug_assert_eq!(vertex_buffer.vertex_count(), self.vertex_count());
        self.vertex_buffers.push(vertex_buffer);
        self.vertex_buffers.len() - 1
    }

    #[must_use]
    pub fn primitive(&self) -> PrimitiveType {
        self.primitive
    }

    #[must_use]
    pub fn vertex_buffers(&self) -> &[VertexBuffer<B>] {
        &self.vertex_buffers
    }

    #[must_use]
    pub fn index_buffer(&self) -> Option<&IndexBuffer<B>> {
        self.index_buffer.as_ref()
    }

    /// Number of vertices in the main vertex buffer.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_buffers[0].vertex_count()
    }

    /// Number of primitives drawn.
    #[must_use]
    pub fn primitive_count(&self) -> usize {
        match &self.index_buffer {
            Some(ibo) => ibo.primitive_count(),
            None => self.vertex_count() / self.primitive.vertices_per_primitive(),
        }
    }
}
