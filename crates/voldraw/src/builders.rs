//! Builders turning backend output into GPU resources.

use glam::Vec3;
use voldraw_core::{
    DrawOptions, GridRef, SurfaceGeometry, VolumeBackend, WireframeGeometry, WireframeType,
};
use voldraw_render::{
    pack_normal_i16, Batch, ExtendMode, GpuBackend, GpuTexture, IndexBufferBuilder, PackedNormal,
    PrimitiveType, Texture3dDescriptor, TextureFormat, VertexBuffer, VertexBufferData,
    VertexFormat,
};

use crate::batch_cache::GridEntry;

/// Label of every grid texture.
pub const GRID_TEXTURE_LABEL: &str = "volume_grid";

/// Volume shading ignores normals, every wireframe vertex gets this one.
const PLACEHOLDER_NORMAL: Vec3 = Vec3::X;

const POS: usize = 0;
const NOR: usize = 1;

/// Materializes a grid into a new cache entry.
///
/// The channel count and extent are read from the backend. Unknown or empty
/// grids, unsupported channel counts, extents over the device limit and failed
/// allocations all yield an entry without texture.
pub(crate) fn build_grid_entry<D, B>(data: &mut D, gpu: &B, grid: &GridRef) -> GridEntry<B>
where
    D: VolumeBackend,
    B: GpuBackend,
{
    let mut entry = GridEntry::new(grid.name());

    // TODO: load on the dependency graph thread instead of during drawing.
    data.load_full_volume();

    let Some(channels) = data.grid_channels(grid) else {
        log::debug!("volume grid '{}' not found, no texture", grid.name());
        return entry;
    };
    let Some(format) = TextureFormat::for_channels(channels) else {
        log::debug!(
            "volume grid '{}' has {channels} channels, no texture",
            grid.name()
        );
        return entry;
    };

    let Some(resolution) = data.dense_resolution(grid) else {
        log::debug!(
            "volume grid '{}' has no dense extent, no texture",
            grid.name()
        );
        return entry;
    };
    let max_size = gpu.max_texture_3d_size();
    if resolution.max_element() > max_size {
        log::error!(
            "volume grid '{}' resolution {}x{}x{} exceeds the maximum 3D texture size {max_size}",
            grid.name(),
            resolution.x,
            resolution.y,
            resolution.z
        );
        return entry;
    }

    let Some(dense) = data.dense_floats(grid) else {
        return entry;
    };
    if dense.channels != format.channels() {
        log::error!(
            "volume grid '{}' densified to {} channels, expected {}",
            grid.name(),
            dense.channels,
            format.channels()
        );
        return entry;
    }

    entry.texture_to_object = dense.texture_to_object;
    entry.object_to_texture = dense.texture_to_object.inverse();

    let desc = Texture3dDescriptor {
        label: GRID_TEXTURE_LABEL,
        extent: dense.resolution,
        format,
        data: &dense.voxels,
    };
    match GpuTexture::create_3d(gpu, &desc) {
        Ok(mut texture) => {
            texture.configure(gpu, format.swizzle(), ExtendMode::ClampToBorder);
            entry.texture = Some(texture);
        }
        Err(e) => {
            log::error!(
                "could not allocate 3D texture for volume grid '{}': {e}",
                grid.name()
            );
        }
    }

    entry
}

/// Builds the wireframe batch: points, or lines over the edge list.
pub(crate) fn build_wireframe_batch<B: GpuBackend>(
    gpu: &B,
    geometry: &WireframeGeometry,
    ty: WireframeType,
    options: &DrawOptions,
) -> Batch<B> {
    let vertex_len = geometry.positions.len();

    let mut pos_nor = VertexBufferData::new(VertexFormat::pos_nor(options.hq_normals), vertex_len);
    pos_nor.fill_attr(POS, &geometry.positions);
    if options.hq_normals {
        pos_nor.fill_attr_constant(NOR, &pack_normal_i16(PLACEHOLDER_NORMAL));
    } else {
        pos_nor.fill_attr_constant(NOR, &PackedNormal::from_vec3(PLACEHOLDER_NORMAL));
    }
    let vbo = VertexBuffer::upload(gpu, "volume wireframe pos_nor", &pos_nor);

    let mut wire_data = VertexBufferData::new(VertexFormat::wire_data(), vertex_len);
    wire_data.fill_attr_constant(0, &options.wire_data_fill);
    let vbo_wire_data = VertexBuffer::upload(gpu, "volume wireframe wd", &wire_data);

    let mut batch = if ty == WireframeType::Points {
        Batch::new(PrimitiveType::Points, vbo, None)
    } else {
        let mut elb =
            IndexBufferBuilder::new(PrimitiveType::Lines, geometry.edges.len(), vertex_len);
        for &[v1, v2] in &geometry.edges {
            elb.add_line_verts(v1, v2);
        }
        let ibo = elb.build(gpu, "volume wireframe edges");
        Batch::new(PrimitiveType::Lines, vbo, Some(ibo))
    };
    batch.add_vertex_buffer(vbo_wire_data);

    log::debug!(
        "built volume wireframe: {} vertices, {} primitives",
        vertex_len,
        batch.primitive_count()
    );
    batch
}

/// Builds the triangle batch used for selection.
pub(crate) fn build_selection_surface_batch<B: GpuBackend>(
    gpu: &B,
    geometry: &SurfaceGeometry,
) -> Batch<B> {
    let vertex_len = geometry.positions.len();

    let mut pos = VertexBufferData::new(VertexFormat::pos(), vertex_len);
    pos.fill_attr(POS, &geometry.positions);
    let vbo = VertexBuffer::upload(gpu, "volume selection pos", &pos);

    let mut elb =
        IndexBufferBuilder::new(PrimitiveType::Triangles, geometry.triangles.len(), vertex_len);
    for &[v1, v2, v3] in &geometry.triangles {
        elb.add_tri_verts(v1, v2, v3);
    }
    let ibo = elb.build(gpu, "volume selection tris");

    Batch::new(PrimitiveType::Triangles, vbo, Some(ibo))
}
