use bytemuck::{Pod, Zeroable};

/// Slot value marking a vertex as untextured.
pub const UNTEXTURED_SLOT: i32 = -1;

/// Number of vertex attributes a batch shader consumes (locations `0..4`).
pub const VERTEX_ATTRIBUTE_COUNT: u32 = 4;

/// One corner of a batched quad.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Default, Pod, Zeroable)]
pub struct Vertex {
    /// Homogeneous world-space position.
    pub position: [f32; 4],
    /// Straight RGBA, 0..1.
    pub color: [f32; 4],
    pub tex_coords: [f32; 2],
    /// Texture slot, or [`UNTEXTURED_SLOT`].
    pub slot: i32,
}

impl Vertex {
    const ATTRS: [wgpu::VertexAttribute; VERTEX_ATTRIBUTE_COUNT as usize] = wgpu::vertex_attr_array![
        0 => Float32x4, // position
        1 => Float32x4, // color
        2 => Float32x2, // tex_coords
        3 => Sint32     // slot
    ];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
