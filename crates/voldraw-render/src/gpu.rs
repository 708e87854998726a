//! The GPU abstraction the draw cache allocates resources from.

use crate::error::RenderResult;
use crate::texture::{ExtendMode, Swizzle, Texture3dDescriptor};
use crate::vertex::VertexBufferData;

/// A device that can create textures and buffers.
///
/// Resources are released when the associated handle types are dropped. All
/// calls must happen on the thread that owns the device.
pub trait GpuBackend {
    /// A 3D texture handle.
    type Texture;
    /// A vertex or index buffer handle.
    type Buffer;

    /// Largest size of any axis of a 3D texture.
    fn max_texture_3d_size(&self) -> u32;

    /// Creates a 3D texture and uploads its texels.
    ///
    /// Fails when the descriptor exceeds device limits.
    fn create_texture_3d(&self, desc: &Texture3dDescriptor<'_>) -> RenderResult<Self::Texture>;

    /// Sets the sampling swizzle and extend mode of a texture.
    fn configure_texture(
        &self,
        texture: &mut Self::Texture,
        swizzle: Swizzle,
        extend_mode: ExtendMode,
    );

    /// Uploads vertex data.
    fn create_vertex_buffer(&self, label: &str, data: &VertexBufferData) -> Self::Buffer;

    /// Uploads 32-bit indices.
    fn create_index_buffer(&self, label: &str, indices: &[u32]) -> Self::Buffer;
}
