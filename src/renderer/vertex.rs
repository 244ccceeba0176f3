//! Vertex format shared by the tessellator and the GPU pipeline

use bytemuck::{Pod, Zeroable};

/// 2D vertex in arena space (before projection) with a linear RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Same color, different position
    pub const fn moved_to(self, x: f32, y: f32) -> Self {
        Self::new(x, y, self.color)
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Colors for arena elements (straight sRGB)
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.94, 0.94, 0.96, 1.0];
    /// Used when a body's color string can't be parsed
    pub const FALLBACK_BODY: [f32; 4] = [16.0 / 255.0, 7.0 / 255.0, 32.0 / 255.0, 1.0];
}
