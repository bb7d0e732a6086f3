use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wavescope_core::{
    CaptureSession, RenderScheduler, Settings, VisualizationKind, WavescopeError,
    DEFAULT_FFT_SIZE,
};

/// Pace of the render loop, roughly 60 frames per second.
const TICK_INTERVAL: Duration = Duration::from_millis(16);

fn main() -> wavescope_core::Result<()> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Live(args) => run_live(&args),
        Commands::Settings(args) => run_settings(&args),
    }
}

fn run_live(args: &LiveArgs) -> wavescope_core::Result<()> {
    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(err) => {
            tracing::warn!(%err, "failed to load settings, using defaults");
            Settings::default()
        }
    };

    let mut session = CaptureSession::open(args.fft_size)?;
    session.start()?;

    let scheduler = Arc::new(RenderScheduler::new(
        session.tap(),
        args.fft_size,
        settings.feature_flags(),
    )?);

    if let Some(style) = args.style.as_deref() {
        let kind = VisualizationKind::from_name(style)
            .ok_or_else(|| WavescopeError::msg(format!("unknown style '{style}'")))?;
        if !scheduler.select_visualization(kind)? {
            tracing::warn!(style = %kind, "style disabled by settings, keeping the default");
        }
    }

    if let Some(dir) = args.dump.as_deref() {
        std::fs::create_dir_all(dir)?;
    }

    let style = scheduler.active_visualization()?;
    tracing::info!(
        width = args.width,
        height = args.height,
        fft_size = args.fft_size,
        sample_rate = session.sample_rate(),
        %style,
        "live visualizer running"
    );

    let started = Instant::now();
    let mut last_cycle = Instant::now();
    let mut dumped = 0u64;

    loop {
        if let Some(seconds) = args.duration {
            if started.elapsed() >= Duration::from_secs_f64(seconds) {
                break;
            }
        }
        if session.is_stopped() {
            let message = session
                .last_error()
                .unwrap_or_else(|| String::from("capture stream stopped"));
            session.stop();
            return Err(WavescopeError::msg(message));
        }

        if let Some(seconds) = args.cycle {
            if last_cycle.elapsed() >= Duration::from_secs_f64(seconds) {
                let kind = scheduler.cycle_visualization()?;
                tracing::info!(style = %kind, "switched visualization");
                last_cycle = Instant::now();
            }
        }

        scheduler.tick(args.width, args.height);

        if let Some(dir) = args.dump.as_deref() {
            if let Some(frame) = scheduler.latest_frame() {
                let path = dir.join(format!("frame-{dumped:06}.png"));
                match frame.pixmap.save_png(&path) {
                    Ok(()) => dumped += 1,
                    Err(err) => {
                        tracing::warn!(%err, path = %path.display(), "failed to write frame")
                    }
                }
            }
        }

        thread::sleep(TICK_INTERVAL);
    }

    session.stop();
    tracing::info!(
        seconds = started.elapsed().as_secs_f64(),
        dumped,
        "live visualizer finished"
    );
    Ok(())
}

fn run_settings(args: &SettingsArgs) -> wavescope_core::Result<()> {
    let mut settings = Settings::load()?;
    let mut changed = false;

    if let Some(value) = args.trail {
        settings.enable_trail = value;
        changed = true;
    }
    if let Some(value) = args.glow {
        settings.enable_glow = value;
        changed = true;
    }
    if let Some(value) = args.sinus_wave {
        settings.use_sinus_wave = value;
        changed = true;
    }
    if let Some(value) = args.spectrogram {
        settings.show_spectrogram = value;
        changed = true;
    }
    if let Some(value) = args.auto_start {
        settings.auto_start = value;
        changed = true;
    }

    if changed {
        settings.save()?;
        let path = wavescope_core::config::default_path()?;
        tracing::info!(path = %path.display(), "settings saved");
    }

    println!("{}", settings.to_json()?);
    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .try_init();
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Real-time audio spectrum visualizer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Capture the default input device and render frames on a fixed tick.
    Live(LiveArgs),
    /// Show or update the persisted settings.
    Settings(SettingsArgs),
}

#[derive(Args, Debug)]
struct LiveArgs {
    /// Canvas width in pixels.
    #[arg(long, default_value_t = 940)]
    width: u32,
    /// Canvas height in pixels.
    #[arg(long, default_value_t = 350)]
    height: u32,
    /// FFT size; must be a power of two.
    #[arg(long, default_value_t = DEFAULT_FFT_SIZE)]
    fft_size: usize,
    /// Initial style: bars, circle, waveform, glow, trail, sinus or
    /// spectrogram.
    #[arg(short, long)]
    style: Option<String>,
    /// Cycle through the enabled styles every N seconds.
    #[arg(long, value_name = "SECONDS")]
    cycle: Option<f64>,
    /// Stop after N seconds instead of running until interrupted.
    #[arg(long, value_name = "SECONDS")]
    duration: Option<f64>,
    /// Directory to dump rendered frames into as PNG files.
    #[arg(long, value_name = "DIR")]
    dump: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct SettingsArgs {
    /// Enable or disable the wave trail style.
    #[arg(long, value_name = "BOOL")]
    trail: Option<bool>,
    /// Enable or disable the glow style.
    #[arg(long, value_name = "BOOL")]
    glow: Option<bool>,
    /// Enable or disable the sinus wave style.
    #[arg(long, value_name = "BOOL")]
    sinus_wave: Option<bool>,
    /// Enable or disable the spectrogram style.
    #[arg(long, value_name = "BOOL")]
    spectrogram: Option<bool>,
    /// Launch the visualizer at login; persisted for the platform
    /// integration to pick up.
    #[arg(long, value_name = "BOOL")]
    auto_start: Option<bool>,
}
