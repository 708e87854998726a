//! A [`GpuBackend`] on top of wgpu.

use wgpu::util::DeviceExt;

use crate::error::{RenderError, RenderResult};
use crate::gpu::GpuBackend;
use crate::texture::{ExtendMode, Swizzle, Texture3dDescriptor, TextureFormat};
use crate::vertex::VertexBufferData;

/// A sampled 3D texture.
///
/// wgpu has no texture swizzle, so the swizzle travels with the texture and is
/// applied by the shader that binds it.
pub struct WgpuTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
    pub swizzle: Option<Swizzle>,
}

/// Creates resources on a wgpu device.
pub struct WgpuBackend {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl WgpuBackend {
    pub fn new(device: wgpu::Device, queue: wgpu::Queue) -> Self {
        Self { device, queue }
    }

    /// Creates a backend on a new device, without a surface.
    ///
    /// Border clamping is requested when the adapter supports it.
    pub async fn new_headless() -> RenderResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|_| RenderError::AdapterCreationFailed)?;

        let required_features =
            adapter.features() & wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("voldraw device (headless)"),
                required_features,
                ..Default::default()
            })
            .await?;

        Ok(Self::new(device, queue))
    }

    #[must_use]
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    #[must_use]
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    fn address_mode(&self, extend_mode: ExtendMode) -> wgpu::AddressMode {
        match extend_mode {
            ExtendMode::Extend => wgpu::AddressMode::ClampToEdge,
            ExtendMode::ClampToBorder => {
                if self
                    .device
                    .features()
                    .contains(wgpu::Features::ADDRESS_MODE_CLAMP_TO_BORDER)
                {
                    wgpu::AddressMode::ClampToBorder
                } else {
                    log::debug!("border clamp unsupported, falling back to edge clamp");
                    wgpu::AddressMode::ClampToEdge
                }
            }
        }
    }

    fn create_sampler(&self, extend_mode: ExtendMode) -> wgpu::Sampler {
        let address_mode = self.address_mode(extend_mode);
        let border_color = (address_mode == wgpu::AddressMode::ClampToBorder)
            .then_some(wgpu::SamplerBorderColor::TransparentBlack);
        self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("volume grid sampler"),
            address_mode_u: address_mode,
            address_mode_v: address_mode,
            address_mode_w: address_mode,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            border_color,
            ..Default::default()
        })
    }
}

/// Converts texels to half floats, padding RGB to RGBA with alpha one.
fn texels_to_f16(format: TextureFormat, data: &[f32]) -> Vec<u16> {
    match format {
        TextureFormat::R16Float => data.iter().map(|&v| half::f16::from_f32(v).to_bits()).collect(),
        TextureFormat::Rgb16Float => data
            .chunks_exact(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 1.0])
            .map(|v| half::f16::from_f32(v).to_bits())
            .collect(),
    }
}

fn wgpu_format(format: TextureFormat) -> wgpu::TextureFormat {
    match format {
        TextureFormat::R16Float => wgpu::TextureFormat::R16Float,
        TextureFormat::Rgb16Float => wgpu::TextureFormat::Rgba16Float,
    }
}

impl GpuBackend for WgpuBackend {
    type Texture = WgpuTexture;
    type Buffer = wgpu::Buffer;

    fn max_texture_3d_size(&self) -> u32 {
        self.device.limits().max_texture_dimension_3d
    }

    fn create_texture_3d(&self, desc: &Texture3dDescriptor<'_>) -> RenderResult<WgpuTexture> {
        desc.validate(self.max_texture_3d_size())?;

        let size = wgpu::Extent3d {
            width: desc.extent.x,
            height: desc.extent.y,
            depth_or_array_layers: desc.extent.z,
        };
        let format = wgpu_format(desc.format);
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some(desc.label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D3,
            format,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let half_data = texels_to_f16(desc.format, desc.data);
        let texel_bytes = format.block_copy_size(None).unwrap_or(2);

        self.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            bytemuck::cast_slice(&half_data),
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(desc.extent.x * texel_bytes),
                rows_per_image: Some(desc.extent.y),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = self.create_sampler(ExtendMode::default());

        Ok(WgpuTexture {
            texture,
            view,
            sampler,
            swizzle: None,
        })
    }

    fn configure_texture(
        &self,
        texture: &mut WgpuTexture,
        swizzle: Swizzle,
        extend_mode: ExtendMode,
    ) {
        texture.swizzle = Some(swizzle);
        texture.sampler = self.create_sampler(extend_mode);
    }

    fn create_vertex_buffer(&self, label: &str, data: &VertexBufferData) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: data.bytes(),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
    }

    fn create_index_buffer(&self, label: &str, indices: &[u32]) -> wgpu::Buffer {
        self.device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
            })
    }
}
