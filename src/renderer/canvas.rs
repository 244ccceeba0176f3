//! Render step
//!
//! `paint` clears a surface and draws every body as a filled circle, in
//! collection order (later bodies on top). It only reads the arena.

use glam::Vec2;

use super::color::{parse_css_color, srgb_to_linear};
use super::shapes::{circle_into, circle_segments};
use super::vertex::{Vertex, colors};
use crate::sim::{Arena, BodyColor};

/// A raster surface bodies can be painted onto
pub trait Canvas {
    /// Erase everything drawn so far
    fn clear(&mut self);
    /// Draw a filled circle centered at `center` (arena coordinates)
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &BodyColor);
}

/// Paint the current arena state
pub fn paint<C: Canvas + ?Sized>(arena: &Arena, canvas: &mut C) {
    canvas.clear();
    for body in arena.bodies() {
        canvas.fill_circle(body.pos, body.radius(), &body.color);
    }
}

/// Canvas that tessellates circles into a triangle list for the GPU
#[derive(Debug, Default)]
pub struct VertexCanvas {
    vertices: Vec<Vertex>,
    /// Number of times the surface was cleared (one per painted frame)
    frames: u64,
}

impl VertexCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertices in arena coordinates with linear colors
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Canvas for VertexCanvas {
    fn clear(&mut self) {
        self.vertices.clear();
        self.frames += 1;
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: &BodyColor) {
        let rgba = parse_css_color(color.as_str()).unwrap_or_else(|| {
            log::trace!("Unrecognized color {color:?}, using fallback");
            colors::FALLBACK_BODY
        });
        circle_into(
            &mut self.vertices,
            center,
            radius,
            srgb_to_linear(rgba),
            circle_segments(radius),
        );
    }
}
