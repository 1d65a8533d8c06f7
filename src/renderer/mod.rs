//! Render extraction
//!
//! Turns the simulation into colored triangle lists. Drawing them is left to
//! the host (a canvas, a GPU pipeline, or nothing at all for headless runs).

pub mod shapes;
pub mod vertex;

pub use shapes::scene_vertices;
pub use vertex::{Vertex, colors};
