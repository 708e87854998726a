//! 3D texture descriptions and owned texture handles.

use glam::UVec3;

use crate::error::{RenderError, RenderResult};
use crate::gpu::GpuBackend;

/// Storage format of a volume texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    /// One 16-bit float channel.
    R16Float,
    /// Three 16-bit float channels.
    Rgb16Float,
}

impl TextureFormat {
    /// Picks the format for a grid channel count. Only 1 and 3 are supported.
    #[must_use]
    pub fn for_channels(channels: usize) -> Option<Self> {
        match channels {
            1 => Some(Self::R16Float),
            3 => Some(Self::Rgb16Float),
            _ => None,
        }
    }

    #[must_use]
    pub fn channels(self) -> usize {
        match self {
            Self::R16Float => 1,
            Self::Rgb16Float => 3,
        }
    }

    /// Returns the swizzle that expands stored channels to RGBA.
    #[must_use]
    pub fn swizzle(self) -> Swizzle {
        match self {
            Self::R16Float => Swizzle::Rrr1,
            Self::Rgb16Float => Swizzle::Rgb1,
        }
    }
}

/// Channel remap applied when sampling a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Swizzle {
    /// Broadcast red to RGB, alpha one.
    Rrr1,
    /// Keep RGB, alpha one.
    Rgb1,
}

impl Swizzle {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rrr1 => "rrr1",
            Self::Rgb1 => "rgb1",
        }
    }

    /// Expands stored channels to RGBA.
    #[must_use]
    pub fn apply(self, texel: &[f32]) -> [f32; 4] {
        match self {
            Self::Rrr1 => [texel[0], texel[0], texel[0], 1.0],
            Self::Rgb1 => [texel[0], texel[1], texel[2], 1.0],
        }
    }
}

impl std::fmt::Display for Swizzle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sampling behavior outside `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExtendMode {
    /// Clamp to the edge texel.
    #[default]
    Extend,
    /// Return the border color, transparent black.
    ClampToBorder,
}

/// Describes a 3D texture upload.
#[derive(Debug, Clone, Copy)]
pub struct Texture3dDescriptor<'a> {
    pub label: &'a str,
    pub extent: UVec3,
    pub format: TextureFormat,
    /// Interleaved texels, x-fastest.
    pub data: &'a [f32],
}

impl Texture3dDescriptor<'_> {
    /// Checks the extent against the device limit and the data length.
    pub fn validate(&self, max_size: u32) -> RenderResult<()> {
        let UVec3 {
            x: width,
            y: height,
            z: depth,
        } = self.extent;
        if width == 0 || height == 0 || depth == 0 {
            return Err(RenderError::EmptyTexture {
                width,
                height,
                depth,
            });
        }
        if self.extent.max_element() > max_size {
            return Err(RenderError::TextureTooLarge {
                width,
                height,
                depth,
                max: max_size,
            });
        }
        let expected =
            width as usize * height as usize * depth as usize * self.format.channels();
        if self.data.len() != expected {
            return Err(RenderError::TextureDataMismatch {
                expected,
                actual: self.data.len(),
            });
        }
        Ok(())
    }
}

/// A 3D texture owned by the draw cache.
///
/// The backend resource is released when this value is dropped.
pub struct GpuTexture<B: GpuBackend> {
    raw: B::Texture,
    extent: UVec3,
    format: TextureFormat,
    swizzle: Option<Swizzle>,
    extend_mode: ExtendMode,
}

impl<B: GpuBackend> GpuTexture<B> {
    /// Creates and uploads a 3D texture.
    pub fn create_3d(gpu: &B, desc: &Texture3dDescriptor<'_>) -> RenderResult<Self> {
        let raw = gpu.create_texture_3d(desc)?;
        Ok(Self {
            raw,
            extent: desc.extent,
            format: desc.format,
            swizzle: None,
            extend_mode: ExtendMode::default(),
        })
    }

    /// Sets the sampling swizzle and extend mode.
    pub fn configure(&mut self, gpu: &B, swizzle: Swizzle, extend_mode: ExtendMode) {
        gpu.configure_texture(&mut self.raw, swizzle, extend_mode);
        self.swizzle = Some(swizzle);
        self.extend_mode = extend_mode;
    }

    #[must_use]
    pub fn raw(&self) -> &B::Texture {
        &self.raw
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
    pub fn swizzle(&self) -> Option<Swizzle> {
        self.swizzle
    }

    #[must_use]
    pub fn extend_mode(&self) -> ExtendMode {
        self.extend_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_for_channels() {
        assert_eq!(TextureFormat::for_channels(1), Some(TextureFormat::R16Float));
        assert_eq!(TextureFormat::for_channels(3), Some(TextureFormat::Rgb16Float));
        for channels in [0, 2, 4, 5] {
            assert_eq!(TextureFormat::for_channels(channels), None);
        }
    }

    #[test]
    fn test_swizzle() {
        assert_eq!(TextureFormat::R16Float.swizzle().as_str(), "rrr1");
        assert_eq!(TextureFormat::Rgb16Float.swizzle().to_string(), "rgb1");
        assert_eq!(Swizzle::Rrr1.apply(&[0.25]), [0.25, 0.25, 0.25, 1.0]);
        assert_eq!(Swizzle::Rgb1.apply(&[0.1, 0.2, 0.3]), [0.1, 0.2, 0.3, 1.0]);
    }

    #[test]
    fn test_validate() {
        let data = vec![0.0; 2 * 2 * 2 * 3];
        let desc = Texture3dDescriptor {
            label: "test",
            extent: UVec3::splat(2),
            format: TextureFormat::Rgb16Float,
            data: &data,
        };
        assert!(desc.validate(2).is_ok());
        assert!(matches!(
            desc.validate(1),
            Err(RenderError::TextureTooLarge { max: 1, .. })
        ));

        let short = Texture3dDescriptor {
            data: &data[..8],
            ..desc
        };
        assert!(matches!(
            short.validate(16),
            Err(RenderError::TextureDataMismatch {
                expected: 24,
                actual: 8
            })
        ));

        let empty = Texture3dDescriptor {
            extent: UVec3::new(2, 0, 2),
            ..desc
        };
        assert!(matches!(
            empty.validate(16),
            Err(RenderError::EmptyTexture { .. })
        ));
    }
}
