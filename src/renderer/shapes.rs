//! Shape generation for 2D primitives

use glam::Vec2;

use super::vertex::{Vertex, colors};
use crate::sim::{Body, Boundary};

/// Generate vertices for a filled axis-aligned rectangle
pub fn rect(min: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    gradient_rect(min, size, color, color)
}

/// Generate vertices for a rectangle shaded from `top` to `bottom`
pub fn gradient_rect(min: Vec2, size: Vec2, top: [f32; 4], bottom: [f32; 4]) -> Vec<Vertex> {
    let max = min + size;

    // Two triangles
    vec![
        Vertex::new(min.x, min.y, top),
        Vertex::new(max.x, min.y, top),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(min.x, max.y, bottom),
        Vertex::new(max.x, min.y, top),
        Vertex::new(max.x, max.y, bottom),
    ]
}

/// Generate vertices for one block, shaded from a light tint down to `color`
pub fn body(body: &Body, color: [f32; 4]) -> Vec<Vertex> {
    gradient_rect(
        body.pos.as_vec2(),
        body.size.as_vec2(),
        colors::BODY_HIGHLIGHT,
        color,
    )
}

/// Generate vertices for the two walls spanning the full arena height
pub fn walls(boundary: &Boundary, arena_height: f64) -> Vec<Vertex> {
    let thickness = boundary.thickness() as f32;
    let height = arena_height as f32;
    let size = Vec2::new(thickness, height);

    let mut vertices = rect(Vec2::ZERO, size, colors::WALL);
    vertices.extend(rect(
        Vec2::new(boundary.inner_right() as f32, 0.0),
        size,
        colors::WALL,
    ));
    vertices
}

/// Triangle list for the whole scene: walls, then block 1, then block 2
pub fn scene_vertices(boundary: &Boundary, arena_height: f64, bodies: &[Body; 2]) -> Vec<Vertex> {
    let mut vertices = walls(boundary, arena_height);
    vertices.extend(body(&bodies[0], colors::BODY_1));
    vertices.extend(body(&bodies[1], colors::BODY_2));
    vertices
}
