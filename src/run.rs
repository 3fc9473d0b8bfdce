use std::path::PathBuf;

use clap::{Args, ValueEnum};
use indicatif::{ProgressBar, ProgressIterator, ProgressStyle};
use log::{info, warn};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use wisp_fluids::{ComputeBackend, CpuBackend, PresentationSink, RayonBackend, Simulation, SimulationConfig};
use wisp_io::{FrameEncoder, ImageSink};

use crate::error::RunError;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Output directory.
    #[arg(long, short)]
    out: PathBuf,

    /// Display width in pixels.
    #[arg(long, default_value_t = 1024)]
    width: u32,

    /// Display height in pixels.
    #[arg(long, default_value_t = 768)]
    height: u32,

    #[arg(long, default_value_t = 600)]
    frames: u64,

    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Time step per frame, in seconds.
    #[arg(long, default_value_t = 0.016)]
    dt: f32,

    /// Random splats applied before the first step.
    #[arg(long, default_value_t = 15)]
    splats: usize,

    /// RNG seed. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum, default_value_t = Format::Raw)]
    format: Format,

    /// Worker threads for the parallel backend.
    #[arg(long, conflicts_with = "serial")]
    threads: Option<usize>,

    /// Run every kernel on the main thread.
    #[arg(long)]
    serial: bool,

    #[arg(long)]
    sim_resolution: Option<u32>,

    #[arg(long)]
    dye_resolution: Option<u32>,

    #[arg(long)]
    density_dissipation: Option<f32>,

    #[arg(long)]
    velocity_dissipation: Option<f32>,

    #[arg(long)]
    pressure_dissipation: Option<f32>,

    #[arg(long)]
    pressure_iterations: Option<u32>,

    /// Vorticity confinement strength.
    #[arg(long)]
    curl: Option<f32>,

    #[arg(long)]
    splat_radius: Option<f32>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Raw `f32` frames readable by `wisp inspect`.
    Raw,
    /// One PNG per frame.
    Png,
}

impl RunArgs {
    /// The default configuration with every given flag applied on top.
    pub fn config(&self) -> SimulationConfig {
        let mut config = SimulationConfig::default();

        if let Some(v) = self.sim_resolution {
            config = config.sim_resolution(v);
        }
        if let Some(v) = self.dye_resolution {
            config = config.dye_resolution(v);
        }
        if let Some(v) = self.density_dissipation {
            config = config.density_dissipation(v);
        }
        if let Some(v) = self.velocity_dissipation {
            config = config.velocity_dissipation(v);
        }
        if let Some(v) = self.pressure_dissipation {
            config = config.pressure_dissipation(v);
        }
        if let Some(v) = self.pressure_iterations {
            config = config.pressure_iterations(v);
        }
        if let Some(v) = self.curl {
            config = config.curl(v);
        }
        if let Some(v) = self.splat_radius {
            config = config.splat_radius(v);
        }

        config
    }
}

pub fn run(args: &RunArgs) -> Result<(), RunError> {
    let config = args.config();
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(
        "{}x{} display, {} frames at {} fps, {} splats, seed {seed}",
        args.width, args.height, args.frames, args.fps, args.splats,
    );

    if args.serial {
        drive(CpuBackend, config, args, seed)
    } else {
        let backend = match args.threads {
            Some(threads) => RayonBackend::with_threads(threads)?,
            None => RayonBackend::new(),
        };
        info!("running on {} threads", backend.num_threads());

        drive(backend, config, args, seed)
    }
}

fn drive<B: ComputeBackend>(backend: B, config: SimulationConfig, args: &RunArgs, seed: u64) -> Result<(), RunError> {
    let mut sim = Simulation::new(backend, config, args.width, args.height)?;
    let size = sim.sim_size();
    let dye = sim.dye_size();
    info!("simulation grid {}x{}, dye grid {}x{}", size.x, size.y, dye.x, dye.y);

    sim.seed(args.splats, &mut ChaCha8Rng::seed_from_u64(seed))?;

    match args.format {
        Format::Raw => simulate(&mut sim, FrameEncoder::create(&args.out, args.frames, args.fps)?, args),
        Format::Png => simulate(&mut sim, ImageSink::create(&args.out, args.frames)?, args),
    }
}

fn simulate<B, S>(sim: &mut Simulation<B>, mut sink: S, args: &RunArgs) -> Result<(), RunError>
where
    B: ComputeBackend,
    S: PresentationSink,
    RunError: From<S::Error>,
{
    let bar_template = "Running Simulation {spinner:.green} [{elapsed}] [{bar:50.white/white}] {pos}/{len} ({eta})";
    let style = ProgressStyle::with_template(bar_template)?
        .progress_chars("=> ")
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");
    let progress = ProgressBar::new(args.frames).with_style(style);

    for _ in (0..args.frames).progress_with(progress) {
        sim.step(args.dt)?;
        sim.render(&mut sink)?;
    }

    if !sim.is_finite() {
        warn!("simulation produced non-finite values");
    }

    info!(
        "wrote {} frames to {}, kinetic energy {:.4}",
        args.frames,
        args.out.display(),
        sim.kinetic_energy(),
    );

    Ok(())
}
