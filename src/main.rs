//! Bubble Saver entry point
//!
//! Runs the simulation headless: there is no window here, bubbles are
//! "drawn" to the log at trace level. Real hosts embed the library.

use std::path::PathBuf;

use clap::Parser;

use bubble_saver::host::{Circle, Frame, FrameClock, Renderer, Screensaver};
use bubble_saver::sim::{BubbleField, Viewport};
use bubble_saver::{BubbleError, Preset, Settings};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(version, about)]
struct CliArgs {
    /// Preset to start from (overlay or classic)
    #[arg(long, default_value = "overlay", value_parser = parse_preset)]
    preset: Preset,

    /// JSON settings file; overrides the preset
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1920)]
    width: u32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 1080)]
    height: u32,

    /// Seed for bubble placement (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,

    /// Resume from a saved bubble field instead of spawning a new one
    #[arg(long)]
    load_state: Option<PathBuf>,

    /// Number of frames to run
    #[arg(long, default_value_t = 300)]
    frames: u64,

    /// Don't sleep between frames
    #[arg(long)]
    unpaced: bool,

    /// Write the final bubble field to this file
    #[arg(long)]
    save_state: Option<PathBuf>,
}

fn parse_preset(s: &str) -> Result<Preset, String> {
    Preset::from_str(s).ok_or_else(|| format!("unknown preset '{s}' (expected overlay or classic)"))
}

/// Logs every circle at trace level
#[derive(Default)]
struct LogRenderer {
    tick: u64,
}

impl Renderer for LogRenderer {
    fn begin_frame(&mut self, frame: &Frame) {
        self.tick = frame.tick;
    }

    fn draw_bubble(&mut self, circle: Circle) {
        log::trace!(
            "tick {}: bubble at ({:.1}, {:.1}) r={}",
            self.tick,
            circle.x,
            circle.y,
            circle.r
        );
    }
}

fn main() {
    env_logger::init();
    let args = CliArgs::parse();

    if let Err(err) = run(&args) {
        log::error!("{err}");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), BubbleError> {
    let settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::from_preset(args.preset),
    };
    log::info!(
        "Bubble Saver starting ({} preset, {} bubbles)",
        settings.preset.as_str(),
        settings.bubble_count
    );

    let mut saver = match &args.load_state {
        Some(path) => {
            let field = BubbleField::load(path)?;
            log::info!("Resuming {} bubbles at tick {}", field.len(), field.time_ticks);
            Screensaver::from_field(field, &settings)
        }
        None => {
            let seed = args.seed.unwrap_or_else(seed_from_time);
            Screensaver::new(&settings, Viewport::new(args.width, args.height), seed)?
        }
    };
    if args.unpaced {
        saver = saver.with_clock(FrameClock::unpaced());
    }

    let mut renderer = LogRenderer::default();
    let (mut walls, mut collisions) = (0u64, 0u64);
    for _ in 0..args.frames {
        let report = saver.run_frame(&mut renderer);
        walls += u64::from(report.wall_bounces);
        collisions += u64::from(report.collisions);
    }

    log::info!(
        "Ran {} frames: {walls} wall bounces, {collisions} collisions, {} fps",
        args.frames,
        saver.fps()
    );

    if let Some(path) = &args.save_state {
        saver.field().save(path)?;
    }
    Ok(())
}

fn seed_from_time() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
