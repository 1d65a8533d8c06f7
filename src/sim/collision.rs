//! Collision detection and response for two sliding blocks
//!
//! Detection is a set of pure overlap predicates evaluated after every
//! substep. Response is 1-D and perfectly elastic: block-block hits exchange
//! momentum, wall hits mirror the velocity.

use serde::{Deserialize, Serialize};

use super::state::{Body, Boundary, WallSide};
use crate::consts::IMPACT_FORCE_SCALE;

/// How two overlapping blocks are pushed apart after a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Depenetration {
    /// Each block moves half the overlap
    #[default]
    Symmetric,
    /// Each block moves in proportion to the other block's mass, so a very heavy
    /// block keeps its trajectory and the light one absorbs the correction
    MassWeighted,
}

// ============ Detection ============

/// Axis-aligned overlap of the two blocks (touching counts)
pub fn bodies_overlap(a: &Body, b: &Body) -> bool {
    a.right() >= b.x() && a.x() <= b.right() && a.bottom() >= b.pos.y && a.pos.y <= b.bottom()
}

pub fn touches_left_wall(body: &Body, boundary: &Boundary) -> bool {
    body.x() <= boundary.inner_left()
}

pub fn touches_right_wall(body: &Body, boundary: &Boundary) -> bool {
    body.right() >= boundary.inner_right()
}

/// The wall `body` is touching, left wall first
pub fn wall_contact(body: &Body, boundary: &Boundary) -> Option<WallSide> {
    if touches_left_wall(body, boundary) {
        Some(WallSide::Left)
    } else if touches_right_wall(body, boundary) {
        Some(WallSide::Right)
    } else {
        None
    }
}

// ============ Response ============

#[inline]
pub fn reduced_mass(m1: f64, m2: f64) -> f64 {
    (m1 * m2) / (m1 + m2)
}

/// Post-collision velocities of a 1-D perfectly elastic collision.
///
/// Both results are computed from the pre-collision velocities.
#[inline]
pub fn elastic_velocities(m1: f64, v1: f64, m2: f64, v2: f64) -> (f64, f64) {
    let total = m1 + m2;
    let v1_new = ((m1 - m2) * v1 + 2.0 * m2 * v2) / total;
    let v2_new = ((m2 - m1) * v2 + 2.0 * m1 * v1) / total;
    (v1_new, v2_new)
}

/// Impact force of a block-block hit: `round(mu * |v1 - v2| * 10)`
pub fn body_impact_force(m1: f64, v1: f64, m2: f64, v2: f64) -> f64 {
    (reduced_mass(m1, m2) * (v1 - v2).abs() * IMPACT_FORCE_SCALE).round()
}

/// Impact force of a wall hit: `|vx * mass * 10|`
pub fn wall_impact_force(body: &Body) -> f64 {
    (body.vx * body.mass * IMPACT_FORCE_SCALE).abs()
}

/// Resolve a block-block hit in place and return its impact force.
///
/// Velocities are exchanged elastically, the blocks are pushed apart along x
/// according to `split`, and finally each block is pulled back between the
/// walls. With a symmetric split, a block stopped by a wall leaves the rest of
/// the overlap to the other one. The force is measured on the post-collision
/// velocities.
pub fn resolve_body_collision(
    a: &mut Body,
    b: &mut Body,
    boundary: &Boundary,
    split: Depenetration,
) -> f64 {
    let (v1, v2) = elastic_velocities(a.mass, a.vx, b.mass, b.vx);
    a.vx = v1;
    b.vx = v2;

    let (left, right) = if a.x() <= b.x() { (a, b) } else { (b, a) };
    let overlap = left.right() - right.x();
    let (left_shift, right_shift) = match split {
        Depenetration::Symmetric => (overlap / 2.0, overlap / 2.0),
        Depenetration::MassWeighted => {
            let total = left.mass + right.mass;
            (overlap * right.mass / total, overlap * left.mass / total)
        }
    };
    left.pos.x -= left_shift;
    right.pos.x += right_shift;
    let (left_x, right_x) = (left.x(), right.x());

    boundary.keep_inside(left);
    boundary.keep_inside(right);

    // Mass-weighted splits keep the heavy block on its path
    if split == Depenetration::Symmetric && left.right() > right.x() {
        match (left.x() != left_x, right.x() != right_x) {
            (true, false) => right.pos.x = left.right(),
            (false, true) => left.pos.x = right.x() - left.width(),
            _ => {}
        }
    }

    body_impact_force(left.mass, left.vx, right.mass, right.vx)
}

/// Reflect `body` off `side`, snapping it to the wall face. Returns the impact force.
pub fn resolve_wall_collision(body: &mut Body, boundary: &Boundary, side: WallSide) -> f64 {
    match side {
        WallSide::Left => body.pos.x = boundary.inner_left(),
        WallSide::Right => body.pos.x = boundary.inner_right() - body.width(),
    }
    body.vx = -body.vx;
    wall_impact_force(body)
}
