//! Run controller
//!
//! Owns both blocks, the walls and the run bookkeeping, and exposes the
//! message-style `start` / `tick` / `stop` interface the host drives.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::collision::Depenetration;
use super::config::{PiMode, StartConfig};
use super::state::{Body, Boundary, CollisionEvent, RunStats, SimPhase};
use super::tick::Integrator;
use crate::consts::MAX_SUBSTEPS;
use crate::error::{Error, Result};
use crate::settings::Settings;

/// What a start command did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// Blocks launched, the host should start ticking
    Started,
    /// A run is in progress; the command was ignored
    AlreadyRunning,
    /// Neither block is moving, so the run is over before the first tick
    SettledImmediately,
}

/// Result of one frame
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickOutcome {
    /// Collisions resolved during the frame, in order
    pub events: Vec<CollisionEvent>,
    /// Phase after the frame
    pub phase: SimPhase,
}

impl TickOutcome {
    /// True when the host should schedule another tick
    pub fn needs_another_tick(&self) -> bool {
        self.phase == SimPhase::Running
    }
}

/// Outcome of a Pi-mode run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PiReport {
    pub mode: PiMode,
    pub expected: u64,
    pub actual: u64,
}

impl PiReport {
    pub fn matches(&self) -> bool {
        self.expected == self.actual
    }
}

/// Serializable view of the whole simulation, for renderers and `--json` output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: SimPhase,
    pub bodies: [Body; 2],
    pub boundary: Boundary,
    pub collision_count: u64,
    pub last_impact_force: f64,
    pub frames: u64,
    pub mass_ratio: f64,
    pub pi_report: Option<PiReport>,
}

/// Drives a two-block run from start to settle
#[derive(Debug, Clone)]
pub struct SimulationController {
    settings: Settings,
    boundary: Boundary,
    config: StartConfig,
    bodies: [Body; 2],
    phase: SimPhase,
    stats: RunStats,
    integrator: Integrator,
}

impl SimulationController {
    pub fn new(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let boundary = Boundary::new(settings.arena_width, settings.wall_thickness)?;
        let config = StartConfig::default();
        let integrator = Integrator::new(settings.max_substep_displacement, settings.depenetration);
        let mut controller = Self {
            settings: settings.clone(),
            boundary,
            config,
            bodies: [Body::new(DVec2::ZERO, DVec2::ONE, 1.0); 2],
            phase: SimPhase::Idle,
            stats: RunStats::default(),
            integrator,
        };
        controller.bodies = controller.start_layout(&config);
        Ok(controller)
    }

    /// Launch a new run with `config`.
    ///
    /// Ignored while a run is in progress. An invalid configuration is
    /// rejected and leaves the controller untouched.
    pub fn start(&mut self, config: StartConfig) -> Result<StartOutcome> {
        if self.phase == SimPhase::Running {
            log::debug!("Start ignored, run already in progress");
            return Ok(StartOutcome::AlreadyRunning);
        }

        let config = config.normalized()?;
        let peak = config.peak_speed();
        if peak / self.integrator.max_displacement > f64::from(MAX_SUBSTEPS) {
            return Err(Error::InvalidConfiguration(format!(
                "launch energy allows speeds up to {peak:.3e}, more than {MAX_SUBSTEPS} substeps per frame"
            )));
        }
        for warning in config.warnings(&self.boundary, self.settings.start_inset) {
            log::warn!("{warning}");
        }

        self.config = config;
        self.integrator.depenetration = if config.pi_mode.is_free() {
            self.settings.depenetration
        } else {
            Depenetration::MassWeighted
        };
        self.bodies = self.start_layout(&config);
        let [v1, v2] = config.launch_velocities();
        self.bodies[0].vx = v1;
        self.bodies[1].vx = v2;
        self.stats.reset();

        log::info!(
            "Starting {} run: masses {} / {}, launch ({v1}, {v2})",
            config.pi_mode,
            config.mass1,
            config.mass2
        );

        if self.is_at_rest() {
            self.settle();
            return Ok(StartOutcome::SettledImmediately);
        }
        self.phase = SimPhase::Running;
        Ok(StartOutcome::Started)
    }

    /// Integrate one frame. Outside `Running` nothing happens.
    pub fn tick(&mut self) -> TickOutcome {
        if self.phase != SimPhase::Running {
            return TickOutcome {
                events: Vec::new(),
                phase: self.phase,
            };
        }

        let mut events = Vec::new();
        let substeps = self.integrator.advance_frame(
            &mut self.bodies,
            &self.boundary,
            &mut self.stats,
            &mut events,
        );
        if !events.is_empty() {
            log::debug!(
                "Frame {}: {} collision(s) over {} substep(s), total {}",
                self.stats.frames,
                events.len(),
                substeps,
                self.stats.collision_count
            );
        }

        if self.is_at_rest() || self.has_escaped() {
            self.settle();
        }

        TickOutcome {
            events,
            phase: self.phase,
        }
    }

    /// Halt the run and put the blocks back at their start positions.
    pub fn stop(&mut self) {
        if self.phase != SimPhase::Idle {
            log::info!(
                "Stopped after {} frame(s), {} collision(s)",
                self.stats.frames,
                self.stats.collision_count
            );
        }
        self.bodies = self.start_layout(&self.config);
        self.stats.reset();
        self.phase = SimPhase::Idle;
    }

    fn settle(&mut self) {
        self.phase = SimPhase::Settled;
        log::info!(
            "Settled after {} frame(s) with {} collision(s)",
            self.stats.frames,
            self.stats.collision_count
        );
        if let Some(report) = self.pi_report() {
            if report.matches() {
                log::info!(
                    "Pi mode {}: {} collisions, pi = {}...",
                    report.mode.get(),
                    report.actual,
                    report.mode.pi_digits().unwrap_or_default()
                );
            } else {
                log::warn!(
                    "Pi mode {}: expected {} collisions, got {}",
                    report.mode.get(),
                    report.expected,
                    report.actual
                );
            }
        }
    }

    /// Both blocks at or below the settle speed
    fn is_at_rest(&self) -> bool {
        let eps = self.settings.settle_epsilon;
        self.bodies.iter().all(|b| b.is_resting(eps))
    }

    /// Pi mode only: the light block trails the heavy one leftwards and no
    /// further collision is possible.
    fn has_escaped(&self) -> bool {
        if self.config.pi_mode.is_free() {
            return false;
        }
        let [v1, v2] = [self.bodies[0].vx, self.bodies[1].vx];
        v1 <= v2 && v2 <= 0.0
    }

    fn start_layout(&self, config: &StartConfig) -> [Body; 2] {
        let top = self.settings.block_top;
        let inset = self.settings.start_inset;
        [
            Body::new(
                DVec2::new(inset, top),
                DVec2::new(config.width1, config.height1),
                config.mass1,
            ),
            Body::new(
                DVec2::new(self.boundary.arena_width() - inset - config.width2, top),
                DVec2::new(config.width2, config.height2),
                config.mass2,
            ),
        ]
    }

    // ============ Accessors ============

    pub fn phase(&self) -> SimPhase {
        self.phase
    }

    pub fn bodies(&self) -> &[Body; 2] {
        &self.bodies
    }

    pub fn boundary(&self) -> &Boundary {
        &self.boundary
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Configuration of the current or last run
    pub fn config(&self) -> &StartConfig {
        &self.config
    }

    pub fn collision_count(&self) -> u64 {
        self.stats.collision_count
    }

    pub fn last_impact_force(&self) -> f64 {
        self.stats.last_impact_force
    }

    pub fn frames(&self) -> u64 {
        self.stats.frames
    }

    /// Heavy-to-light mass ratio of the current configuration
    pub fn mass_ratio(&self) -> f64 {
        self.config.mass_ratio()
    }

    /// Expected vs. actual collision count, once a Pi-mode run has settled
    pub fn pi_report(&self) -> Option<PiReport> {
        if self.phase != SimPhase::Settled {
            return None;
        }
        let expected = self.config.pi_mode.expected_collisions()?;
        Some(PiReport {
            mode: self.config.pi_mode,
            expected,
            actual: self.stats.collision_count,
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            bodies: self.bodies,
            boundary: self.boundary,
            collision_count: self.stats.collision_count,
            last_impact_force: self.stats.last_impact_force,
            frames: self.stats.frames,
            mass_ratio: self.mass_ratio(),
            pi_report: self.pi_report(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller() -> SimulationController {
        SimulationController::new(&Settings::default()).unwrap()
    }

    fn run_to_end(sim: &mut SimulationController, max_frames: u64) -> Vec<CollisionEvent> {
        let mut events = Vec::new();
        for _ in 0..max_frames {
            let outcome = sim.tick();
            events.extend(outcome.events.iter().copied());
            if !outcome.needs_another_tick() {
                break;
            }
        }
        events
    }

    #[test]
    fn starts_idle_with_default_layout() {
        let sim = controller();
        assert_eq!(sim.phase(), SimPhase::Idle);
        let [a, b] = sim.bodies();
        assert_eq!(a.x(), 100.0);
        assert_eq!(b.right(), 700.0);
        assert_eq!(a.pos.y, 20.0);
        assert_eq!(sim.collision_count(), 0);
    }

    #[test]
    fn tick_outside_running_is_a_no_op() {
        let mut sim = controller();
        let before = sim.snapshot();
        let outcome = sim.tick();
        assert!(outcome.events.is_empty());
        assert!(!outcome.needs_another_tick());
        assert_eq!(sim.snapshot(), before);
    }

    #[test]
    fn start_applies_launch_velocities() {
        let mut sim = controller();
        assert_eq!(sim.start(StartConfig::default()).unwrap(), StartOutcome::Started);
        assert_eq!(sim.phase(), SimPhase::Running);
        assert_eq!(sim.bodies()[0].vx, 3.0);
        assert_eq!(sim.bodies()[1].vx, -2.0);

        let mut sim = controller();
        sim.start(StartConfig::pi(2).unwrap()).unwrap();
        assert_eq!(sim.bodies()[0].vx, 2.0);
        assert_eq!(sim.bodies()[1].vx, 0.0);
        assert_eq!(sim.bodies()[0].mass, 100.0);
        assert_eq!(sim.mass_ratio(), 100.0);
    }

    #[test]
    fn restart_while_running_changes_nothing() {
        let mut sim = controller();
        sim.start(StartConfig::pi(3).unwrap()).unwrap();
        for _ in 0..300 {
            sim.tick();
        }
        let before = sim.snapshot();
        assert!(before.collision_count > 0);

        let outcome = sim.start(StartConfig::default()).unwrap();
        assert_eq!(outcome, StartOutcome::AlreadyRunning);
        assert_eq!(sim.snapshot(), before);
        assert_eq!(sim.config().pi_mode.get(), 3);
    }

    #[test]
    fn stop_resets_positions_and_counters() {
        let mut sim = controller();
        sim.start(StartConfig::pi(2).unwrap()).unwrap();
        for _ in 0..300 {
            sim.tick();
        }
        assert!(sim.collision_count() > 0);

        sim.stop();
        assert_eq!(sim.phase(), SimPhase::Idle);
        assert_eq!(sim.collision_count(), 0);
        assert_eq!(sim.last_impact_force(), 0.0);
        assert_eq!(sim.frames(), 0);
        let [a, b] = sim.bodies();
        assert_eq!((a.x(), a.vx, a.mass), (100.0, 0.0, 100.0));
        assert_eq!((b.x(), b.vx, b.mass), (660.0, 0.0, 1.0));

        // Pending work is dropped
        assert!(sim.tick().events.is_empty());
        assert_eq!(sim.frames(), 0);
    }

    #[test]
    fn invalid_config_leaves_state_unchanged() {
        let mut sim = controller();
        sim.start(StartConfig::pi(1).unwrap()).unwrap();
        run_to_end(&mut sim, 10_000);
        let before = sim.snapshot();

        let bad = StartConfig {
            mass1: -5.0,
            ..Default::default()
        };
        let err = sim.start(bad).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
        assert_eq!(sim.snapshot(), before);
    }

    #[test]
    fn launch_too_fast_to_substep_is_rejected() {
        let mut sim = controller();
        let before = sim.snapshot();
        let config = StartConfig {
            launch: Some([1e12, 0.0]),
            ..Default::default()
        };
        let err = sim.start(config).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
        assert_eq!(sim.snapshot(), before);
        assert_eq!(sim.phase(), SimPhase::Idle);
    }

    /// The light block leaves the first contact far faster than either launch
    /// speed; the rest of that frame has to be split finer to keep the order.
    #[test]
    fn fast_heavy_launch_keeps_block_order() {
        let mut sim = controller();
        let config = StartConfig {
            mass1: 5000.0,
            launch: Some([500.0, -600.0]),
            ..Default::default()
        };
        assert_eq!(sim.start(config).unwrap(), StartOutcome::Started);
        for _ in 0..50 {
            let outcome = sim.tick();
            let boundary = *sim.boundary();
            let [a, b] = sim.bodies();
            assert!(a.x() <= b.x(), "blocks swapped order at frame {}", sim.frames());
            assert!(boundary.contains(a) && boundary.contains(b));
            if !outcome.needs_another_tick() {
                break;
            }
        }
        assert!(sim.collision_count() > 0);
    }

    #[test]
    fn degenerate_launch_settles_immediately() {
        let mut sim = controller();
        let config = StartConfig {
            launch: Some([0.005, -0.01]),
            ..Default::default()
        };
        assert_eq!(sim.start(config).unwrap(), StartOutcome::SettledImmediately);
        assert_eq!(sim.phase(), SimPhase::Settled);
        assert_eq!(sim.frames(), 0);
        assert!(sim.tick().events.is_empty());
    }

    #[test]
    fn pi_mode_one_counts_three() {
        let mut sim = controller();
        sim.start(StartConfig::pi(1).unwrap()).unwrap();
        let events = run_to_end(&mut sim, 10_000);

        assert_eq!(sim.phase(), SimPhase::Settled);
        assert_eq!(sim.collision_count(), 3);
        assert_eq!(events.len(), 3);
        let timestamps: Vec<_> = events.iter().map(|e| e.timestamp).collect();
        assert_eq!(timestamps, vec![1, 2, 3]);
        assert_eq!(
            sim.pi_report(),
            Some(PiReport {
                mode: PiMode::new(1).unwrap(),
                expected: 3,
                actual: 3
            })
        );
    }

    #[test]
    fn free_mode_keeps_running_and_reports_nothing() {
        let mut sim = controller();
        sim.start(StartConfig::default()).unwrap();
        let events = run_to_end(&mut sim, 2_000);
        assert_eq!(sim.phase(), SimPhase::Running);
        assert!(!events.is_empty());
        assert_eq!(sim.pi_report(), None);
        assert_eq!(sim.last_impact_force(), events.last().unwrap().impact_force);
    }

    #[test]
    fn blocks_stay_inside_the_walls() {
        let mut sim = controller();
        sim.start(StartConfig::pi(3).unwrap()).unwrap();
        for _ in 0..1_000 {
            let outcome = sim.tick();
            let boundary = *sim.boundary();
            assert!(sim.bodies().iter().all(|b| boundary.contains(b)));
            assert!(sim.bodies()[0].x() <= sim.bodies()[1].x());
            if !outcome.needs_another_tick() {
                break;
            }
        }
    }

    #[test]
    fn rejects_invalid_settings() {
        let settings = Settings {
            wall_thickness: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            SimulationController::new(&settings),
            Err(Error::InvalidSettings(_))
        ));
    }

    #[test]
    fn snapshot_serializes() {
        let mut sim = controller();
        sim.start(StartConfig::pi(1).unwrap()).unwrap();
        let json = serde_json::to_string(&sim.snapshot()).unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sim.snapshot());
    }
}
