//! Bodies, walls and run bookkeeping
//!
//! Everything the controller owns for a single run lives here.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SimPhase {
    /// Nothing moving, waiting for a start command
    #[default]
    Idle,
    /// Frames are being integrated
    Running,
    /// The run finished on its own; ready for the next start
    Settled,
}

/// A sliding rectangular block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner
    pub pos: DVec2,
    /// Width and height
    pub size: DVec2,
    pub mass: f64,
    /// Horizontal velocity (distance units per frame)
    pub vx: f64,
}

impl Body {
    pub fn new(pos: DVec2, size: DVec2, mass: f64) -> Self {
        Self {
            pos,
            size,
            mass,
            vx: 0.0,
        }
    }

    #[inline]
    pub fn x(&self) -> f64 {
        self.pos.x
    }

    #[inline]
    pub fn width(&self) -> f64 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.size.y
    }

    /// Horizontal position of the right edge
    #[inline]
    pub fn right(&self) -> f64 {
        self.pos.x + self.size.x
    }

    /// Vertical position of the bottom edge
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.pos.y + self.size.y
    }

    pub fn momentum(&self) -> f64 {
        self.mass * self.vx
    }

    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.vx * self.vx
    }

    /// True when the speed is at or below `epsilon`
    pub fn is_resting(&self, epsilon: f64) -> bool {
        self.vx.abs() <= epsilon
    }
}

/// Which of the two walls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallSide {
    Left,
    Right,
}

/// The two fixed walls enclosing the arena
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Boundary {
    arena_width: f64,
    thickness: f64,
}

impl Boundary {
    pub fn new(arena_width: f64, thickness: f64) -> Result<Self> {
        if !thickness.is_finite() || thickness <= 0.0 {
            return Err(Error::InvalidSettings(
                "wall thickness must be finite and > 0".into(),
            ));
        }
        if !arena_width.is_finite() || arena_width <= 2.0 * thickness {
            return Err(Error::InvalidSettings(format!(
                "arena width {arena_width} leaves no room between the walls"
            )));
        }
        Ok(Self {
            arena_width,
            thickness,
        })
    }

    pub fn arena_width(&self) -> f64 {
        self.arena_width
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Inner face of the left wall
    #[inline]
    pub fn inner_left(&self) -> f64 {
        self.thickness
    }

    /// Inner face of the right wall
    #[inline]
    pub fn inner_right(&self) -> f64 {
        self.arena_width - self.thickness
    }

    /// Free space between the walls
    pub fn inner_width(&self) -> f64 {
        self.inner_right() - self.inner_left()
    }

    /// True when `body` lies fully between the walls
    pub fn contains(&self, body: &Body) -> bool {
        body.x() >= self.inner_left() && body.right() <= self.inner_right()
    }

    /// Pull a body back between the walls without touching its velocity.
    ///
    /// A body wider than the arena is pinned to the left wall.
    pub fn keep_inside(&self, body: &mut Body) {
        if body.pos.x < self.inner_left() {
            body.pos.x = self.inner_left();
        }
        if body.right() > self.inner_right() {
            body.pos.x = (self.inner_right() - body.width()).max(self.inner_left());
        }
    }
}

/// What was hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollisionKind {
    /// The two blocks struck each other
    BodyBody,
    /// A block bounced off a wall
    BodyWall(WallSide),
}

/// One resolved collision, handed to reporting and audio as it happens
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollisionEvent {
    pub kind: CollisionKind,
    /// Non-negative impact magnitude
    pub impact_force: f64,
    /// Collision count including this collision (1-based ordinal)
    pub timestamp: u64,
}

/// Counters reset on every (re)start
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RunStats {
    pub collision_count: u64,
    pub last_impact_force: f64,
    /// Frames integrated in this run
    pub frames: u64,
}

impl RunStats {
    /// Count a collision and build its event
    pub fn record(&mut self, kind: CollisionKind, impact_force: f64) -> CollisionEvent {
        self.collision_count += 1;
        self.last_impact_force = impact_force;
        CollisionEvent {
            kind,
            impact_force,
            timestamp: self.collision_count,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(x: f64, width: f64) -> Body {
        Body::new(DVec2::new(x, 20.0), DVec2::new(width, 40.0), 1.0)
    }

    #[test]
    fn boundary_inner_faces() {
        let b = Boundary::new(800.0, 4.0).unwrap();
        assert_eq!(b.inner_left(), 4.0);
        assert_eq!(b.inner_right(), 796.0);
        assert_eq!(b.inner_width(), 792.0);
    }

    #[test]
    fn boundary_rejects_degenerate_arena() {
        assert!(Boundary::new(8.0, 4.0).is_err());
        assert!(Boundary::new(800.0, 0.0).is_err());
        assert!(Boundary::new(f64::NAN, 4.0).is_err());
    }

    #[test]
    fn keep_inside_clamps_both_sides() {
        let boundary = Boundary::new(100.0, 4.0).unwrap();

        let mut left = block(-3.0, 10.0);
        left.vx = -1.0;
        boundary.keep_inside(&mut left);
        assert_eq!(left.x(), 4.0);
        assert_eq!(left.vx, -1.0);

        let mut right = block(92.0, 10.0);
        boundary.keep_inside(&mut right);
        assert_eq!(right.right(), 96.0);
        assert!(boundary.contains(&right));

        let mut huge = block(0.0, 500.0);
        boundary.keep_inside(&mut huge);
        assert_eq!(huge.x(), 4.0);
    }

    #[test]
    fn record_counts_and_timestamps() {
        let mut stats = RunStats::default();
        let first = stats.record(CollisionKind::BodyBody, 12.0);
        let second = stats.record(CollisionKind::BodyWall(WallSide::Right), 5.0);
        assert_eq!(first.timestamp, 1);
        assert_eq!(second.timestamp, 2);
        assert_eq!(stats.collision_count, 2);
        assert_eq!(stats.last_impact_force, 5.0);

        stats.reset();
        assert_eq!(stats, RunStats::default());
    }

    #[test]
    fn resting_uses_inclusive_threshold() {
        let mut b = block(10.0, 10.0);
        b.vx = -0.01;
        assert!(b.is_resting(0.01));
        b.vx = 0.0101;
        assert!(!b.is_resting(0.01));
    }
}
