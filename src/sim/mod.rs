//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Frame-driven only, the host decides the cadence
//! - Fixed evaluation order (walls for block 1, block 2, then block-block)
//! - No rendering or platform dependencies

pub mod collision;
pub mod config;
pub mod controller;
pub mod state;
pub mod tick;

pub use collision::{
    Depenetration, bodies_overlap, elastic_velocities, reduced_mass, resolve_body_collision,
    resolve_wall_collision, touches_left_wall, touches_right_wall, wall_contact,
};
pub use config::{ConfigWarning, PiMode, StartConfig};
pub use controller::{PiReport, SimulationController, Snapshot, StartOutcome, TickOutcome};
pub use state::{Body, Boundary, CollisionEvent, CollisionKind, RunStats, SimPhase, WallSide};
pub use tick::{Integrator, SubstepPlan};
