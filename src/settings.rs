//! Arena and integrator tunables
//!
//! Fixed for the lifetime of a controller. The native binary can load them
//! from a JSON file; anything missing from the file keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Error, Result};
use crate::sim::Depenetration;

/// Simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    /// Outer width of the arena, walls included
    pub arena_width: f64,
    /// Height of the arena (drawing only)
    pub arena_height: f64,
    /// Thickness of each of the two walls
    pub wall_thickness: f64,
    /// Gap between an outer edge and the facing side of the block next to it at start
    pub start_inset: f64,
    /// Vertical position shared by both blocks
    pub block_top: f64,

    // === Integrator ===
    /// Largest distance a block may cover in one substep
    pub max_substep_displacement: f64,
    /// Speed threshold below which a block is considered at rest
    pub settle_epsilon: f64,
    /// How overlapping blocks are pushed apart in free mode
    pub depenetration: Depenetration,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Silence impact tones
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            wall_thickness: WALL_THICKNESS,
            start_inset: START_INSET,
            block_top: BLOCK_TOP,

            max_substep_displacement: MAX_SUBSTEP_DISPLACEMENT,
            settle_epsilon: SETTLE_EPSILON,
            depenetration: Depenetration::Symmetric,

            master_volume: 0.8,
            muted: false,
        }
    }
}

impl Settings {
    /// Check that the tunables describe a usable arena and integrator.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("wall_thickness", self.wall_thickness),
            ("max_substep_displacement", self.max_substep_displacement),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidSettings(format!(
                    "{name} must be finite and > 0 (got {value})"
                )));
            }
        }
        if !self.settle_epsilon.is_finite() || self.settle_epsilon < 0.0 {
            return Err(Error::InvalidSettings(
                "settle_epsilon must be finite and >= 0".into(),
            ));
        }
        if !self.start_inset.is_finite() || !self.block_top.is_finite() {
            return Err(Error::InvalidSettings(
                "start_inset and block_top must be finite".into(),
            ));
        }
        if self.arena_width <= 2.0 * self.wall_thickness {
            return Err(Error::InvalidSettings(format!(
                "arena_width {} leaves no room between two walls of thickness {}",
                self.arena_width, self.wall_thickness
            )));
        }
        Ok(())
    }

    /// Parse settings from JSON and validate them.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Pretty JSON, suitable for writing a starter settings file.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
