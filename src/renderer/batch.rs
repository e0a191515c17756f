//! Backend-neutral canvas that tessellates into a triangle list
//!
//! A GPU backend uploads `vertices` as-is (the buffer is `Pod`) and draws
//! `labels` with whatever text renderer it has.

use glam::Vec2;

use super::vertex::{Vertex, colors};
use super::{Canvas, TextAlign, shapes};

const CIRCLE_SEGMENTS: u32 = 24;

/// A text label queued for the backend's text renderer
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub pos: Vec2,
    pub size: f32,
    pub align: TextAlign,
    pub color: [f32; 4],
}

#[derive(Debug, Clone, Default)]
pub struct VertexBatch {
    pub clear_color: [f32; 4],
    pub vertices: Vec<Vertex>,
    pub labels: Vec<TextLabel>,
}

impl VertexBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw bytes of the vertex list, ready for a GPU buffer
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }
}

impl Canvas for VertexBatch {
    fn clear(&mut self, color: [f32; 4]) {
        self.clear_color = color;
        self.vertices.clear();
        self.labels.clear();
    }

    fn fill_rect(&mut self, min: Vec2, size: Vec2, color: [f32; 4]) {
        self.vertices.extend(shapes::rect(min, size, color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: [f32; 4]) {
        self.vertices
            .extend(shapes::circle(center, radius, color, CIRCLE_SEGMENTS));
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
        self.vertices.extend(shapes::thick_line(from, to, width, color));
    }

    fn draw_cursor(&mut self, center: Vec2, size: f32) {
        let outer = size / 2.0;
        self.vertices.extend(shapes::ring(
            center,
            outer * 0.8,
            outer,
            colors::CURSOR,
            CIRCLE_SEGMENTS,
        ));
        // Crosshair
        let h = Vec2::new(outer, 0.0);
        let v = Vec2::new(0.0, outer);
        self.vertices
            .extend(shapes::thick_line(center - h, center + h, 2.0, colors::CURSOR));
        self.vertices
            .extend(shapes::thick_line(center - v, center + v, 2.0, colors::CURSOR));
    }

    fn fill_text(&mut self, text: &str, pos: Vec2, size: f32, align: TextAlign, color: [f32; 4]) {
        self.labels.push(TextLabel {
            text: text.to_string(),
            pos,
            size,
            align,
            color,
        });
    }
}
