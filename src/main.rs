//! Pi Collide - headless entry point
//!
//! Drives the simulation frame by frame from the command line and prints the
//! explanation, collision count and Pi report.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;
    use std::time::Duration;

    use anyhow::{Context, Result, bail};
    use clap::Parser;

    use pi_collide::Settings;
    use pi_collide::audio::AudioFeedback;
    use pi_collide::explain::explain;
    use pi_collide::sim::{PiMode, SimPhase, SimulationController, StartConfig, StartOutcome};

    #[derive(Parser, Debug)]
    #[command(
        name = "pi-collide",
        version,
        about = "Count elastic collisions between two sliding blocks"
    )]
    pub struct Opts {
        /// Pi mode: 0 = free, 1..=3 force a 100^(n-1):1 mass ratio
        #[arg(long, default_value_t = 0)]
        pi_mode: u8,
        /// Mass of the left (heavy) block; ignored in Pi mode
        #[arg(long)]
        mass1: Option<f64>,
        /// Mass of the right (light) block; ignored in Pi mode
        #[arg(long)]
        mass2: Option<f64>,
        #[arg(long)]
        width1: Option<f64>,
        #[arg(long)]
        height1: Option<f64>,
        #[arg(long)]
        width2: Option<f64>,
        #[arg(long)]
        height2: Option<f64>,
        /// Launch velocities of the two blocks (distance per frame)
        #[arg(long, num_args = 2, value_names = ["V1", "V2"], allow_negative_numbers = true)]
        launch: Option<Vec<f64>>,
        /// Settings JSON file (arena, integrator, audio)
        #[arg(long)]
        settings: Option<PathBuf>,
        /// Give up on a run that has not settled after this many frames
        #[arg(long, default_value_t = 100_000)]
        max_frames: u64,
        /// Delay between frames in milliseconds (0 = as fast as possible)
        #[arg(long, default_value_t = 0)]
        frame_delay_ms: u64,
        /// Silence impact tones
        #[arg(long)]
        mute: bool,
        /// Print the final snapshot as JSON instead of text
        #[arg(long)]
        json: bool,
        /// Print the effective settings as JSON and exit
        #[arg(long)]
        print_settings: bool,
    }

    impl Opts {
        fn start_config(&self) -> Result<StartConfig> {
            let defaults = StartConfig::default();
            let launch = match self.launch.as_deref() {
                None => None,
                Some(&[v1, v2]) => Some([v1, v2]),
                Some(other) => bail!("--launch takes two velocities, got {}", other.len()),
            };
            Ok(StartConfig {
                mass1: self.mass1.unwrap_or(defaults.mass1),
                mass2: self.mass2.unwrap_or(defaults.mass2),
                width1: self.width1.unwrap_or(defaults.width1),
                height1: self.height1.unwrap_or(defaults.height1),
                width2: self.width2.unwrap_or(defaults.width2),
                height2: self.height2.unwrap_or(defaults.height2),
                pi_mode: PiMode::new(self.pi_mode)?,
                launch,
            })
        }
    }

    pub fn run() -> Result<()> {
        let opts = Opts::parse();

        let settings = match &opts.settings {
            Some(path) => Settings::load(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::default(),
        };
        if opts.print_settings {
            println!("{}", settings.to_json()?);
            return Ok(());
        }

        let mut sim = SimulationController::new(&settings)?;
        let mut audio = AudioFeedback::new(&settings);
        audio.set_muted(settings.muted || opts.mute);
        audio.activate();

        let outcome = sim.start(opts.start_config()?)?;
        if !opts.json {
            println!("{}\n", explain(sim.config()));
        }

        let mut tones = 0u64;
        if outcome == StartOutcome::Started {
            let delay = Duration::from_millis(opts.frame_delay_ms);
            while sim.frames() < opts.max_frames {
                let frame = sim.tick();
                tones += frame
                    .events
                    .iter()
                    .filter_map(|e| audio.play_impact(e.impact_force))
                    .count() as u64;
                if !frame.needs_another_tick() {
                    break;
                }
                if !delay.is_zero() {
                    std::thread::sleep(delay);
                }
            }
        }

        let snapshot = sim.snapshot();
        if opts.json {
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        } else {
            println!("Phase:           {:?}", snapshot.phase);
            println!("Frames:          {}", snapshot.frames);
            println!("Collisions:      {}", snapshot.collision_count);
            println!("Last impact:     {}", snapshot.last_impact_force);
            println!("Mass ratio:      {}:1", snapshot.mass_ratio);
            println!("Tones played:    {tones}");
            if let Some(report) = snapshot.pi_report {
                println!(
                    "Pi mode {}:       expected {}, counted {}",
                    report.mode.get(),
                    report.expected,
                    report.actual
                );
            }
        }

        if sim.frames() >= opts.max_frames && sim.phase() == SimPhase::Running {
            log::warn!("Run did not settle within {} frames", opts.max_frames);
        }
        if let Some(report) = snapshot.pi_report {
            if !report.matches() {
                bail!(
                    "pi mode {} counted {} collisions, expected {}",
                    report.mode.get(),
                    report.actual,
                    report.expected
                );
            }
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    env_logger::init();
    log::info!("Pi Collide (native) starting...");

    if let Err(e) = native::run() {
        eprintln!("Error: {e:#}");
        return std::process::ExitCode::from(1);
    }
    std::process::ExitCode::SUCCESS
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // On the web the host page drives `SimulationController` through the library
}
