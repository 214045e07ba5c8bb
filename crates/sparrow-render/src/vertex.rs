//! Vertex and quad layouts shared by every batchable drawable.
//!
//! A [`Quad`] is four [`QuadVertex`] values in the order top-left, bottom-left,
//! top-right, bottom-right, which is the order the index pattern
//! `[0, 1, 2, 3, 2, 1]` expects.

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

use crate::Color;

/// Position, packed color and texture coordinate for one corner of a quad.
///
/// 24 bytes, `#[repr(C)]`:
///
/// ```text
/// Offset | Field      | Size
/// -------|------------|------
/// 0      | position   | 12 bytes (3 x f32)
/// 12     | color      | 4 bytes  (RGBA u8)
/// 16     | tex_coords | 8 bytes  (2 x f32)
/// ```
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct QuadVertex {
    pub position: [f32; 3],
    pub color: [u8; 4],
    pub tex_coords: [f32; 2],
}

impl QuadVertex {
    pub fn new(position: Vec3, color: Color, tex_coords: Vec2) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_rgba8(),
            tex_coords: tex_coords.to_array(),
        }
    }

    /// Vertex buffer layout for pipelines consuming batched quads.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRS: &[wgpu::VertexAttribute] = &wgpu::vertex_attr_array![
            0 => Float32x3,
            1 => Unorm8x4,
            2 => Float32x2,
        ];

        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: ATTRS,
        }
    }
}

/// Normalized texture rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvRect {
    pub min: Vec2,
    pub max: Vec2,
}

impl UvRect {
    /// The whole texture.
    pub const FULL: UvRect = UvRect {
        min: Vec2::ZERO,
        max: Vec2::ONE,
    };

    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }
}

impl Default for UvRect {
    fn default() -> Self {
        Self::FULL
    }
}

/// One textured, colored rectangle.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Pod, Zeroable)]
pub struct Quad {
    pub tl: QuadVertex,
    pub bl: QuadVertex,
    pub tr: QuadVertex,
    pub br: QuadVertex,
}

static_assertions::assert_eq_size!(QuadVertex, [u8; 24]);
static_assertions::assert_eq_size!(Quad, [u8; 96]);

impl Quad {
    /// Axis-aligned quad spanning `min..max` at depth `z`.
    ///
    /// `min` is the bottom-left corner (y grows upward), so the top edge samples
    /// `uv.min.y`.
    pub fn from_rect(min: Vec2, max: Vec2, z: f32, uv: UvRect, color: Color) -> Self {
        Self {
            tl: QuadVertex::new(
                Vec3::new(min.x, max.y, z),
                color,
                Vec2::new(uv.min.x, uv.min.y),
            ),
            bl: QuadVertex::new(
                Vec3::new(min.x, min.y, z),
                color,
                Vec2::new(uv.min.x, uv.max.y),
            ),
            tr: QuadVertex::new(
                Vec3::new(max.x, max.y, z),
                color,
                Vec2::new(uv.max.x, uv.min.y),
            ),
            br: QuadVertex::new(
                Vec3::new(max.x, min.y, z),
                color,
                Vec2::new(uv.max.x, uv.max.y),
            ),
        }
    }

    /// Copy of this quad with every vertex position transformed by `matrix`.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let apply = |v: &QuadVertex| QuadVertex {
            position: matrix
                .transform_point3(Vec3::from_array(v.position))
                .to_array(),
            ..*v
        };
        Self {
            tl: apply(&self.tl),
            bl: apply(&self.bl),
            tr: apply(&self.tr),
            br: apply(&self.br),
        }
    }

    pub fn vertices(&self) -> [QuadVertex; 4] {
        [self.tl, self.bl, self.tr, self.br]
    }

    /// Overwrite the color of all four vertices.
    pub fn set_color(&mut self, color: Color) {
        let packed = color.to_rgba8();
        self.tl.color = packed;
        self.bl.color = packed;
        self.tr.color = packed;
        self.br.color = packed;
    }
}
