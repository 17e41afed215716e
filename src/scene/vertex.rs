//! GPU vertex format shared by imported and generated meshes.

/// One vertex as uploaded to the GPU.
///
/// Tangent and bitangent are unit length and, together with the normal,
/// form a right-handed per-vertex basis once the mesh builder has run
/// (see [`build_mesh`](crate::scene::mesh::build_mesh)).
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Object-space position.
    pub position: [f32; 3],
    /// Object-space normal.
    pub normal: [f32; 3],
    /// Texture coordinate ((0, 0) when the source provides none).
    pub uv: [f32; 2],
    /// Texture-space tangent.
    pub tangent: [f32; 3],
    /// Texture-space bitangent.
    pub bitangent: [f32; 3],
}

impl Vertex {
    /// Vertex attributes in shader-location order:
    /// position, normal, uv, tangent, bitangent.
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 5] =
        wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Float32x3,
            2 => Float32x2,
            3 => Float32x3,
            4 => Float32x3,
        ];

    /// Vertex buffer layout for pipeline creation.
    #[must_use]
    pub const fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_stride_matches_struct_size() {
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 56);
        assert_eq!(layout.attributes.len(), 5);
        // Attribute offsets are tightly packed.
        assert_eq!(layout.attributes[1].offset, 12);
        assert_eq!(layout.attributes[2].offset, 24);
        assert_eq!(layout.attributes[3].offset, 32);
        assert_eq!(layout.attributes[4].offset, 44);
    }
}
