//! Pi Collide - two sliding blocks and the digits of pi
//!
//! A heavy block slides into a light one that sits in front of a wall. Every
//! collision is perfectly elastic, and for mass ratios of `100^n : 1` the total
//! number of collisions spells out the first `n + 1` digits of pi.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bodies, collisions, integrator, run controller)
//! - `audio`: Impact tones for collision feedback
//! - `explain`: Descriptive text for the current configuration
//! - `renderer`: Vertex extraction for drawing the arena
//! - `settings`: Arena and integrator tunables

pub mod audio;
pub mod error;
pub mod explain;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::Settings;

/// Simulation constants
pub mod consts {
    /// Arena dimensions
    pub const ARENA_WIDTH: f64 = 800.0;
    pub const ARENA_HEIGHT: f64 = 200.0;
    pub const WALL_THICKNESS: f64 = 4.0;

    /// Distance from each outer arena edge to the facing side of a block at start
    pub const START_INSET: f64 = 100.0;
    /// Vertical position of both blocks (they only ever slide horizontally)
    pub const BLOCK_TOP: f64 = 20.0;

    /// Largest distance any block may travel in one substep
    pub const MAX_SUBSTEP_DISPLACEMENT: f64 = 15.0;
    /// Most substeps a single plan may use
    pub const MAX_SUBSTEPS: u32 = 1_000_000;
    /// Speed at or below which a block counts as resting
    pub const SETTLE_EPSILON: f64 = 0.01;

    /// Launch velocities (distance units per frame)
    pub const FREE_LAUNCH: [f64; 2] = [3.0, -2.0];
    pub const PI_LAUNCH: [f64; 2] = [2.0, 0.0];

    /// Impact force multiplier shared by wall and block collisions
    pub const IMPACT_FORCE_SCALE: f64 = 10.0;

    /// Default block geometry and masses
    pub const DEFAULT_MASS_1: f64 = 100.0;
    pub const DEFAULT_MASS_2: f64 = 1.0;
    pub const DEFAULT_SIZE_1: f64 = 80.0;
    pub const DEFAULT_SIZE_2: f64 = 40.0;

    /// Highest supported Pi mode (mass ratio 10000:1, 314 collisions)
    pub const MAX_PI_MODE: u8 = 3;
}
