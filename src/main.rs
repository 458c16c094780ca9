use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use argh::FromArgs;
use flock::config::SimulationConfig;
use flock::render::{Canvas, frame_path};
use flock::{Flock, FrameStats, UpdateMode};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Run a boids flocking simulation and write every frame out as a PNG.
#[derive(FromArgs)]
struct Args {
    /// JSON config file; command line flags override its values
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// world width in pixels
    #[argh(option)]
    width: Option<u32>,

    /// world height in pixels
    #[argh(option)]
    height: Option<u32>,

    /// number of boids
    #[argh(option, short = 'n')]
    boids: Option<usize>,

    /// number of frames to simulate
    #[argh(option, short = 'f')]
    frames: Option<usize>,

    /// seed for a reproducible run
    #[argh(option, short = 's')]
    seed: Option<u64>,

    /// update mode: sequential or synchronized
    #[argh(option, short = 'm')]
    mode: Option<UpdateMode>,

    /// directory the frames are written to
    #[argh(option, short = 'o')]
    output: Option<PathBuf>,

    /// simulate without writing frames
    #[argh(switch)]
    no_render: bool,

    /// write per-frame statistics to this JSON file
    #[argh(option)]
    stats: Option<PathBuf>,

    /// enable debug logging
    #[argh(switch, short = 'v')]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<(SimulationConfig, Option<PathBuf>)> {
        let mut config = match &self.config {
            Some(path) => SimulationConfig::load(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => SimulationConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(boids) = self.boids {
            config.boids = boids;
        }
        if let Some(frames) = self.frames {
            config.frames = frames;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(output) = self.output {
            config.output = output;
        }
        if self.no_render {
            config.render = false;
        }
        config.validate().context("invalid configuration")?;
        Ok((config, self.stats))
    }
}

fn main() -> Result<()> {
    let args: Args = argh::from_env();

    let level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    let (config, stats_path) = args.into_config()?;
    let seed = config.seed.unwrap_or_else(rand::random);
    info!(
        "{} boids in a {}x{} world for {} frames ({} mode, seed {seed})",
        config.boids, config.width, config.height, config.frames, config.mode
    );

    let mut rng = StdRng::seed_from_u64(seed);
    let (width, height) = (config.width as f32, config.height as f32);
    let mut flock = Flock::spawn(config.boids, width, height, config.params, &mut rng)?
        .with_mode(config.mode);

    let mut canvas = if config.render {
        fs::create_dir_all(&config.output)
            .with_context(|| format!("failed to create {}", config.output.display()))?;
        Some(Canvas::new(config.width, config.height, &config.colour)?)
    } else {
        None
    };

    let mut history: Vec<FrameStats> = Vec::new();
    let pbar = ProgressBar::new(config.frames as u64);
    pbar.set_style(ProgressStyle::with_template(
        "[{elapsed_precise}/{eta_precise}] {bar:40.cyan/blue} {pos:>7}/{len:7} {msg}",
    )?);

    for _ in 0..config.frames {
        flock.advance_frame(width, height)?;

        if let Some(canvas) = canvas.as_mut() {
            canvas.fade(config.trail_fade);
            canvas.draw_flock(&flock);
            let path = frame_path(&config.output, flock.frame());
            canvas
                .save(&path)
                .with_context(|| format!("failed to write {}", path.display()))?;
        }
        if stats_path.is_some() {
            history.push(flock.stats());
        }
        pbar.inc(1);
    }
    pbar.finish();

    let last = flock.stats();
    info!(
        "finished at frame {}: mean speed {:.2}, mean spacing {:.1}",
        last.frame, last.mean_speed, last.mean_pairwise_distance
    );

    if let Some(path) = stats_path {
        if history.is_empty() {
            warn!("no frames were simulated, stats file will be empty");
        }
        let json = serde_json::to_string_pretty(&history)?;
        fs::write(&path, json).with_context(|| format!("failed to write {}", path.display()))?;
        info!("wrote stats for {} frames to {}", history.len(), path.display());
    }

    Ok(())
}
