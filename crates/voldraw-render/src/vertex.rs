//! Vertex formats and CPU-side vertex data.

use glam::Vec3;

/// Storage type of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexAttrType {
    F32,
    F32x3,
    /// Three 10-bit signed normalized components and a 2-bit one, packed in a `u32`.
    Snorm10_10_10_2,
    Snorm16x4,
}

impl VertexAttrType {
    /// Size in bytes.
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::F32 | Self::Snorm10_10_10_2 => 4,
            Self::F32x3 => 12,
            Self::Snorm16x4 => 8,
        }
    }
}

/// A named attribute at a byte offset within a vertex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VertexAttribute {
    pub name: &'static str,
    pub ty: VertexAttrType,
    pub offset: usize,
}

/// Interleaved vertex layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VertexFormat {
    attributes: Vec<VertexAttribute>,
    stride: usize,
}

impl VertexFormat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an attribute after the existing ones.
    #[must_use]
    pub fn with_attr(mut self, name: &'static str, ty: VertexAttrType) -> Self {
        self.attributes.push(VertexAttribute {
            name,
            ty,
            offset: self.stride,
        });
        self.stride += ty.size();
        self
    }

    /// Position only.
    pub fn pos() -> Self {
        Self::new().with_attr("pos", VertexAttrType::F32x3)
    }

    /// Position and normal. `hq` selects 16-bit normals over 10-bit ones.
    pub fn pos_nor(hq: bool) -> Self {
        let nor = if hq {
            VertexAttrType::Snorm16x4
        } else {
            VertexAttrType::Snorm10_10_10_2
        };
        Self::pos().with_attr("nor", nor)
    }

    /// Per-vertex wire pattern weight.
    pub fn wire_data() -> Self {
        Self::new().with_attr("wd", VertexAttrType::F32)
    }

    #[must_use]
    pub fn attributes(&self) -> &[VertexAttribute] {
        &self.attributes
    }

    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }
}

/// Vertex data laid out per a [`VertexFormat`], ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexBufferData {
    format: VertexFormat,
    vertex_count: usize,
    bytes: Vec<u8>,
}

impl VertexBufferData {
    /// Allocates zeroed data for `vertex_count` vertices.
    pub fn new(format: VertexFormat, vertex_count: usize) -> Self {
        let bytes = vec![0; format.stride() * vertex_count];
        Self {
            format,
            vertex_count,
            bytes,
        }
    }

    fn checked_attr<T: bytemuck::Pod>(&self, attr: usize) -> &VertexAttribute {
        let attribute = &self.format.attributes[attr];
        assert_eq!(
            std::mem::size_of::<T>(),
            attribute.ty.size(),
            "value type does not match attribute '{}'",
            attribute.name
        );
        attribute
    }

    /// Writes one value per vertex into an attribute.
    pub fn fill_attr<T: bytemuck::Pod>(&mut self, attr: usize, values: &[T]) {
        assert_eq!(values.len(), self.vertex_count, "one value per vertex");
        let offset = self.checked_attr::<T>(attr).offset;
        let stride = self.format.stride();
        for (i, value) in values.iter().enumerate() {
            let start = i * stride + offset;
            self.bytes[start..start + std::mem::size_of::<T>()]
                .copy_from_slice(bytemuck::bytes_of(value));
        }
    }

    /// Writes the same value into an attribute for every vertex.
    pub fn fill_attr_constant<T: bytemuck::Pod>(&mut self, attr: usize, value: &T) {
        let offset = self.checked_attr::<T>(attr).offset;
        let stride = self.format.stride();
        let value = bytemuck::bytes_of(value);
        for i in 0..self.vertex_count {
            let start = i * stride + offset;
            self.bytes[start..start + value.len()].copy_from_slice(value);
        }
    }

    /// Reads an attribute back, one value per vertex.
    #[must_use]
    pub fn attr_values<T: bytemuck::Pod>(&self, attr: usize) -> Vec<T> {
        let offset = self.checked_attr::<T>(attr).offset;
        let stride = self.format.stride();
        (0..self.vertex_count)
            .map(|i| {
                let start = i * stride + offset;
                bytemuck::pod_read_unaligned(&self.bytes[start..start + std::mem::size_of::<T>()])
            })
            .collect()
    }

    #[must_use]
    pub fn format(&self) -> &VertexFormat {
        &self.format
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// A normal packed as three 10-bit snorm components and a 2-bit `w`.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PackedNormal(pub u32);

impl PackedNormal {
    const MAX: f32 = 511.0;

    #[must_use]
    pub fn from_vec3(n: Vec3) -> Self {
        let pack = |v: f32| ((v.clamp(-1.0, 1.0) * Self::MAX).round() as i32 as u32) & 0x3ff;
        Self(pack(n.x) | (pack(n.y) << 10) | (pack(n.z) << 20))
    }

    #[must_use]
    pub fn to_vec3(self) -> Vec3 {
        // Shift each field to the top of an i32 to sign-extend it.
        let unpack = |shift: u32| (((self.0 << (22 - shift)) as i32) >> 22) as f32 / Self::MAX;
        Vec3::new(unpack(0), unpack(10), unpack(20))
    }
}

/// Packs a normal into four 16-bit snorm components with `w = 0`.
#[must_use]
pub fn pack_normal_i16(n: Vec3) -> [i16; 4] {
    let pack = |v: f32| (v.clamp(-1.0, 1.0) * f32::from(i16::MAX)).round() as i16;
    [pack(n.x), pack(n.y), pack(n.z), 0]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_offsets() {
        let format = VertexFormat::pos_nor(false);
        assert_eq!(format.stride(), 16);
        assert_eq!(format.attributes()[1].offset, 12);
        assert_eq!(format.attributes()[1].name, "nor");

        let hq = VertexFormat::pos_nor(true);
        assert_eq!(hq.stride(), 20);
        assert_eq!(hq.attributes()[1].ty, VertexAttrType::Snorm16x4);
    }

    #[test]
    fn test_fill_and_read_back() {
        let mut data = VertexBufferData::new(VertexFormat::pos_nor(false), 3);
        let positions = [[0.0f32, 1.0, 2.0], [3.0, 4.0, 5.0], [6.0, 7.0, 8.0]];
        data.fill_attr(0, &positions);
        data.fill_attr_constant(1, &PackedNormal::from_vec3(Vec3::X));

        assert_eq!(data.bytes().len(), 48);
        assert_eq!(data.attr_values::<[f32; 3]>(0), positions.to_vec());
        assert!(data
            .attr_values::<PackedNormal>(1)
            .iter()
            .all(|n| *n == PackedNormal::from_vec3(Vec3::X)));
    }

    #[test]
    #[should_panic(expected = "does not match attribute")]
    fn test_fill_wrong_type_panics() {
        let mut data = VertexBufferData::new(VertexFormat::wire_data(), 1);
        data.fill_attr_constant(0, &[0.0f32; 3]);
    }

    #[test]
    fn test_packed_normal_axes() {
        assert_eq!(PackedNormal::from_vec3(Vec3::X).0, 511);
        assert_eq!(PackedNormal::from_vec3(Vec3::X).to_vec3(), Vec3::X);
        assert_eq!(PackedNormal::from_vec3(-Vec3::Z).to_vec3(), -Vec3::Z);
        assert_eq!(pack_normal_i16(Vec3::X), [i16::MAX, 0, 0, 0]);
    }

    proptest! {
        #[test]
        fn prop_packed_normal_roundtrip_error(
            x in -1.0f32..1.0,
            y in -1.0f32..1.0,
            z in -1.0f32..1.0,
        ) {
            let n = Vec3::new(x, y, z);
            let unpacked = PackedNormal::from_vec3(n).to_vec3();
            prop_assert!((unpacked - n).abs().max_element() <= 0.5 / 511.0 + 1e-6);
        }
    }
}
