//! Frame integrator with adaptive substepping
//!
//! A frame is split into equal substeps so that no block moves farther than
//! the configured maximum displacement in one of them. Collision checks run
//! after every substep, which keeps a fast block from skipping over the other
//! block or a wall between two checks. When a collision speeds a block up past
//! the current budget, the rest of the frame is split again.

use super::collision::{
    Depenetration, bodies_overlap, resolve_body_collision, resolve_wall_collision, wall_contact,
};
use super::state::{Body, Boundary, CollisionEvent, CollisionKind, RunStats};
use crate::consts::MAX_SUBSTEPS;

/// How (part of) a frame is divided
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubstepPlan {
    pub steps: u32,
    /// Fraction of the frame covered by each substep
    pub dt: f64,
}

impl SubstepPlan {
    /// `steps = max(1, ceil(max_speed / max_displacement))`, `dt = 1 / steps`
    pub fn for_velocities(v1: f64, v2: f64, max_displacement: f64) -> Self {
        Self::for_span(v1.abs().max(v2.abs()), 1.0, max_displacement)
    }

    /// Split the remaining `span` of a frame for blocks moving at up to `max_speed`.
    ///
    /// Capped at [`MAX_SUBSTEPS`]; beyond that the displacement bound no longer holds.
    pub fn for_span(max_speed: f64, span: f64, max_displacement: f64) -> Self {
        let wanted = (max_speed * span / max_displacement).ceil().max(1.0);
        let steps = if wanted > f64::from(MAX_SUBSTEPS) {
            log::warn!("Substeps capped at {MAX_SUBSTEPS} (speed {max_speed})");
            MAX_SUBSTEPS
        } else {
            wanted as u32
        };
        Self {
            steps,
            dt: span / steps as f64,
        }
    }

    /// Distance a block moving at `speed` covers in one substep
    pub fn step_displacement(&self, speed: f64) -> f64 {
        speed.abs() * self.dt
    }
}

fn max_speed(bodies: &[Body; 2]) -> f64 {
    bodies[0].vx.abs().max(bodies[1].vx.abs())
}

/// Advances both blocks one frame at a time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integrator {
    pub max_displacement: f64,
    pub depenetration: Depenetration,
}

impl Integrator {
    pub fn new(max_displacement: f64, depenetration: Depenetration) -> Self {
        Self {
            max_displacement,
            depenetration,
        }
    }

    /// Integrate one frame, recording every collision into `stats` and `events`.
    ///
    /// Returns the number of substeps taken.
    pub fn advance_frame(
        &self,
        bodies: &mut [Body; 2],
        boundary: &Boundary,
        stats: &mut RunStats,
        events: &mut Vec<CollisionEvent>,
    ) -> u64 {
        let mut plan = SubstepPlan::for_velocities(bodies[0].vx, bodies[1].vx, self.max_displacement);
        let mut done = 0;
        let mut taken = 0u64;
        while done < plan.steps {
            self.substep(bodies, boundary, plan.dt, stats, events);
            done += 1;
            taken += 1;

            // A capped plan is final, re-planning it would never finish the frame
            let speed = max_speed(bodies);
            if done < plan.steps
                && plan.steps < MAX_SUBSTEPS
                && plan.step_displacement(speed) > self.max_displacement
            {
                let remaining = (plan.steps - done) as f64 * plan.dt;
                plan = SubstepPlan::for_span(speed, remaining, self.max_displacement);
                done = 0;
            }
        }
        stats.frames += 1;
        taken
    }

    fn substep(
        &self,
        bodies: &mut [Body; 2],
        boundary: &Boundary,
        dt: f64,
        stats: &mut RunStats,
        events: &mut Vec<CollisionEvent>,
    ) {
        for body in bodies.iter_mut() {
            body.pos.x += body.vx * dt;
        }

        // Walls first, block 1 then block 2
        for body in bodies.iter_mut() {
            if let Some(side) = wall_contact(body, boundary) {
                let force = resolve_wall_collision(body, boundary, side);
                events.push(stats.record(CollisionKind::BodyWall(side), force));
            }
        }

        let [first, second] = bodies;
        if bodies_overlap(first, second) {
            let force = resolve_body_collision(first, second, boundary, self.depenetration);
            let event = stats.record(CollisionKind::BodyBody, force);
            log::trace!(
                "collision #{} v=({:.4}, {:.4}) force={}",
                event.timestamp,
                first.vx,
                second.vx,
                force
            );
            events.push(event);
        }
    }
}
