//! Rendering error types.

use thiserror::Error;

/// Errors that can occur while creating GPU resources.
#[derive(Error, Debug)]
pub enum RenderError {
    /// Failed to create wgpu adapter.
    #[error("failed to create graphics adapter")]
    AdapterCreationFailed,

    /// Failed to create wgpu device.
    #[error("failed to create graphics device: {0}")]
    DeviceCreationFailed(#[from] wgpu::RequestDeviceError),

    /// A texture axis exceeds the device limit.
    #[error("texture size {width}x{height}x{depth} exceeds the maximum 3D texture size {max}")]
    TextureTooLarge {
        width: u32,
        height: u32,
        depth: u32,
        max: u32,
    },

    /// A texture axis is zero.
    #[error("texture size {width}x{height}x{depth} is empty")]
    EmptyTexture { width: u32, height: u32, depth: u32 },

    /// Texel data does not match the texture extent and format.
    #[error("texture data size mismatch: expected {expected} floats, got {actual}")]
    TextureDataMismatch { expected: usize, actual: usize },
}

/// A specialized Result type for rendering operations.
pub type RenderResult<T> = std::result::Result<T, RenderError>;
