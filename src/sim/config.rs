//! Start configuration supplied by the input side
//!
//! Read once per start command; edits made while a run is in progress only
//! take effect on the next start.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::collision::reduced_mass;
use super::state::Boundary;
use crate::consts::*;
use crate::error::{Error, Result};

/// Free mode (0) or one of the forced-ratio Pi modes (1..=3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PiMode(u8);

impl PiMode {
    pub const FREE: PiMode = PiMode(0);

    pub fn new(mode: u8) -> Result<Self> {
        if mode > MAX_PI_MODE {
            return Err(Error::InvalidConfiguration(format!(
                "pi mode must be between 0 and {MAX_PI_MODE} (got {mode})"
            )));
        }
        Ok(Self(mode))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn is_free(self) -> bool {
        self.0 == 0
    }

    /// Forced heavy:light mass ratio, `100^(mode - 1)`
    pub fn mass_ratio(self) -> Option<f64> {
        (!self.is_free()).then(|| 100f64.powi(i32::from(self.0) - 1))
    }

    /// Collision count spelling the first `mode` digits of pi
    pub fn expected_collisions(self) -> Option<u64> {
        match self.0 {
            1 => Some(3),
            2 => Some(31),
            3 => Some(314),
            _ => None,
        }
    }

    /// The digits of pi the mode should reproduce, e.g. "3.14"
    pub fn pi_digits(self) -> Option<&'static str> {
        match self.0 {
            1 => Some("3"),
            2 => Some("3.1"),
            3 => Some("3.14"),
            _ => None,
        }
    }
}

impl TryFrom<u8> for PiMode {
    type Error = Error;

    fn try_from(mode: u8) -> Result<Self> {
        PiMode::new(mode)
    }
}

impl From<PiMode> for u8 {
    fn from(mode: PiMode) -> u8 {
        mode.0
    }
}

impl fmt::Display for PiMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mass_ratio() {
            None => write!(f, "free"),
            Some(ratio) => write!(f, "pi mode {} ({ratio}:1)", self.0),
        }
    }
}

/// Masses, block sizes and mode for one run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartConfig {
    pub mass1: f64,
    pub mass2: f64,
    pub width1: f64,
    pub height1: f64,
    pub width2: f64,
    pub height2: f64,
    pub pi_mode: PiMode,
    /// Override for the launch velocities of the two blocks
    pub launch: Option<[f64; 2]>,
}

impl Default for StartConfig {
    fn default() -> Self {
        Self {
            mass1: DEFAULT_MASS_1,
            mass2: DEFAULT_MASS_2,
            width1: DEFAULT_SIZE_1,
            height1: DEFAULT_SIZE_1,
            width2: DEFAULT_SIZE_2,
            height2: DEFAULT_SIZE_2,
            pi_mode: PiMode::FREE,
            launch: None,
        }
    }
}

/// Non-fatal oddities worth telling the user about
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigWarning {
    /// The start layout places a block outside the walls or on top of the other block
    CrowdedLayout { free_space: f64 },
    /// The masses are so far apart that the reduced mass is no longer meaningful
    ReducedMassUnderflow,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigWarning::CrowdedLayout { free_space } => write!(
                f,
                "blocks do not fit the start layout ({free_space:.1} units of free space)"
            ),
            ConfigWarning::ReducedMassUnderflow => {
                write!(f, "mass ratio too extreme, reduced mass underflows")
            }
        }
    }
}

impl StartConfig {
    /// Default blocks with the masses forced for `mode`
    pub fn pi(mode: u8) -> Result<Self> {
        Self {
            pi_mode: PiMode::new(mode)?,
            ..Self::default()
        }
        .normalized()
    }

    /// Reject anything that would make the physics degenerate.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("mass1", self.mass1),
            ("mass2", self.mass2),
            ("width1", self.width1),
            ("height1", self.height1),
            ("width2", self.width2),
            ("height2", self.height2),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidConfiguration(format!(
                    "{name} must be finite and > 0 (got {value})"
                )));
            }
        }
        if let Some(launch) = self.launch {
            if !launch.iter().all(|v| v.is_finite()) {
                return Err(Error::InvalidConfiguration(
                    "launch velocities must be finite".into(),
                ));
            }
        }
        Ok(())
    }

    /// Copy with the Pi-mode masses applied (heavy `ratio`, light 1).
    pub fn normalized(mut self) -> Result<Self> {
        if let Some(ratio) = self.pi_mode.mass_ratio() {
            self.mass1 = ratio;
            self.mass2 = 1.0;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn mass_ratio(&self) -> f64 {
        self.mass1 / self.mass2
    }

    /// Launch velocities for this run
    pub fn launch_velocities(&self) -> [f64; 2] {
        match self.launch {
            Some(v) => v,
            None if self.pi_mode.is_free() => FREE_LAUNCH,
            None => PI_LAUNCH,
        }
    }

    /// Fastest either block can ever move: all kinetic energy carried by the lighter block.
    pub fn peak_speed(&self) -> f64 {
        let [v1, v2] = self.launch_velocities();
        let energy2 = self.mass1 * v1 * v1 + self.mass2 * v2 * v2;
        (energy2 / self.mass1.min(self.mass2)).sqrt()
    }

    /// Things the host should warn about before running this configuration.
    pub fn warnings(&self, boundary: &Boundary, start_inset: f64) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        let first_x = start_inset;
        let second_x = boundary.arena_width() - start_inset - self.width2;
        let free_space = second_x - (first_x + self.width1);
        let outside = first_x < boundary.inner_left()
            || first_x + self.width1 > boundary.inner_right()
            || second_x < boundary.inner_left();
        if outside || free_space < 0.0 {
            warnings.push(ConfigWarning::CrowdedLayout { free_space });
        }

        let mu = reduced_mass(self.mass1, self.mass2);
        if !mu.is_normal() || mu < f64::EPSILON * self.mass1.max(self.mass2) {
            warnings.push(ConfigWarning::ReducedMassUnderflow);
        }

        warnings
    }
}
