use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, filter::LevelFilter, fmt};

#[derive(Parser, Debug)]
#[command(name = "pixmorph", version, about = "Rebuild one image out of the pixels of another")]
struct Cli {
    /// Log verbosity (overridden by `RUST_LOG`).
    #[arg(long, value_enum, default_value_t = LogLevel::Warn, global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a morph and write the final frame as a PNG.
    Render(RenderArgs),
    /// Print the default configuration as JSON.
    Config,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Image whose pixels are moved.
    #[arg(long)]
    source: PathBuf,

    /// Image whose layout is rebuilt.
    #[arg(long)]
    target: PathBuf,

    /// Output PNG path for the final frame.
    #[arg(long)]
    out: PathBuf,

    /// Canvas width (defaults to the target image's width).
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height (defaults to the target image's height).
    #[arg(long)]
    height: Option<u32>,

    /// Also write every frame into this directory.
    #[arg(long)]
    frames_dir: Option<PathBuf>,

    /// JSON configuration file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cell edge length in pixels.
    #[arg(long)]
    cell_size: Option<u32>,

    /// Scan progress added per tick.
    #[arg(long)]
    scan_speed: Option<f64>,

    /// Seed for jitter and flight noise.
    #[arg(long)]
    seed: Option<u64>,

    /// Tick rate used with `--realtime`.
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Pace ticks at `--fps` instead of running as fast as possible.
    #[arg(long)]
    realtime: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level);
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Config => cmd_config(),
    }
}

fn init_logging(level: LogLevel) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from(level).into())
        .from_env_lossy();
    fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_config() -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&pixmorph::MorphConfig::default())
        .context("serialize default config")?;
    println!("{json}");
    Ok(())
}

fn read_config(args: &RenderArgs) -> anyhow::Result<pixmorph::MorphConfig> {
    let mut cfg = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("read config '{}'", path.display()))?;
            pixmorph::MorphConfig::from_json(&text)
                .with_context(|| format!("parse config '{}'", path.display()))?
        }
        None => pixmorph::MorphConfig::default(),
    };
    if let Some(cell_size) = args.cell_size {
        cfg.cell_size = cell_size;
    }
    if let Some(scan_speed) = args.scan_speed {
        cfg.scan_speed = scan_speed;
    }
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    cfg.validate()?;
    Ok(cfg)
}

fn load(path: &Path, canvas: pixmorph::Canvas) -> anyhow::Result<pixmorph::Raster> {
    let raster = pixmorph::load_image(path)?;
    Ok(pixmorph::fit_into(&raster, canvas)?)
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let cfg = read_config(&args)?;

    let target = pixmorph::load_image(&args.target)?;
    let canvas = pixmorph::Canvas::new(
        args.width.unwrap_or(target.width()),
        args.height.unwrap_or(target.height()),
    );
    let target = pixmorph::fit_into(&target, canvas)?;
    let source = load(&args.source, canvas)?;
    tracing::info!(width = canvas.width, height = canvas.height, "inputs fitted");

    let pacing = if args.realtime {
        Some(pixmorph::Fps::new(args.fps, 1)?)
    } else {
        None
    };

    let mut session = pixmorph::MorphSession::new(cfg)?;
    session.submit(source, target)?;
    let particles = session.wait_paired()?;
    tracing::info!(particles, "pairing complete");

    let summary = match &args.frames_dir {
        Some(dir) => {
            let mut sink = pixmorph::PngSequenceSink::new(dir, "frame");
            let summary = session.run(&mut sink, pacing)?;
            eprintln!("wrote {} frames to {}", sink.written(), dir.display());
            summary
        }
        None => session.run(&mut pixmorph::NullSink, pacing)?,
    };

    let frame = session
        .snapshot()
        .context("no frame was rendered (empty canvas?)")?;
    pixmorph::save_png(&args.out, &frame)?;

    eprintln!(
        "morphed {} particles in {} ticks, wrote {}",
        summary.particles,
        summary.ticks,
        args.out.display()
    );
    Ok(())
}
