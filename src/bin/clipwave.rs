use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use clipwave::{
    AudioMetadata, ClipDuration, EnvelopeOpts, FfmpegProvider, Fps, InMemoryProvider,
    MetadataCache, TIMELINE_LAYER_HEIGHT, Volume, WaveformRequest, compute_envelope, resolve,
};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(name = "clipwave", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the peak bars of a clip window as JSON.
    Bars(BarsArgs),
    /// Print the volume envelope polyline as JSON (`null` for a constant volume).
    Envelope(EnvelopeArgs),
    /// Evaluate a full waveform request JSON (bars, envelope and media length).
    View(ViewArgs),
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct SourceArgs {
    /// Audio/video file to decode (requires the `media-ffmpeg` feature).
    #[arg(long)]
    src: Option<String>,

    /// Pre-decoded metadata JSON (`{"sample_rate": .., "channel_data": [[..], ..]}`).
    #[arg(long)]
    metadata: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct BarsArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Timeline frames per second.
    #[arg(long)]
    fps: u32,

    /// Frame rate denominator, e.g. 1001 for 29.97 fps with `--fps 30000`.
    #[arg(long, default_value_t = 1)]
    fps_den: u32,

    /// First media frame of the window; negative counts back from the end of the media.
    #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
    start_from: i64,

    /// Window length in frames. Omit to run until the end of the media.
    #[arg(long)]
    duration: Option<u64>,

    /// Visualization width in pixels.
    #[arg(long)]
    width: u32,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct VolumeArgs {
    /// Comma-separated gain keyframes, e.g. `0,1,0.5`.
    #[arg(long)]
    keyframes: Option<String>,

    /// A single per-frame volume; has no static envelope.
    #[arg(long)]
    constant: Option<f64>,
}

#[derive(Parser, Debug)]
struct EnvelopeArgs {
    #[command(flatten)]
    volume: VolumeArgs,

    /// Visualization width in pixels.
    #[arg(long)]
    width: u32,

    /// Bar area height in pixels.
    #[arg(long, default_value_t = TIMELINE_LAYER_HEIGHT)]
    layer_height: f64,

    /// Pixels kept free below gain 0.
    #[arg(long, default_value_t = 2.0)]
    bottom_margin: f64,
}

#[derive(Parser, Debug)]
struct ViewArgs {
    /// Input waveform request JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Pre-decoded metadata JSON used for the request's `src` instead of decoding it.
    #[arg(long)]
    metadata: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Bars(args) => cmd_bars(args).await,
        Command::Envelope(args) => cmd_envelope(args),
        Command::View(args) => cmd_view(args).await,
    }
}

fn init_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn read_metadata(path: &Path) -> anyhow::Result<AudioMetadata> {
    let f = std::fs::File::open(path)
        .with_context(|| format!("open metadata JSON '{}'", path.display()))?;
    serde_json::from_reader(std::io::BufReader::new(f))
        .with_context(|| format!("parse metadata JSON '{}'", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("serialize output JSON")?;
    println!("{out}");
    Ok(())
}

async fn cmd_bars(args: BarsArgs) -> anyhow::Result<()> {
    let fps = Fps::new(args.fps, args.fps_den)?;
    let range = resolve(args.start_from, ClipDuration::from(args.duration));

    let metadata = match (&args.source.src, &args.source.metadata) {
        (_, Some(path)) => Arc::new(read_metadata(path)?),
        (Some(src), None) => MetadataCache::new(FfmpegProvider::new("."))
            .get(src)
            .await
            .with_context(|| format!("could not load waveform for '{src}'"))?,
        (None, None) => anyhow::bail!("either --src or --metadata is required"),
    };

    let bars = clipwave::compute_bars(&metadata, range, fps, args.width);
    print_json(&bars)
}

fn cmd_envelope(args: EnvelopeArgs) -> anyhow::Result<()> {
    let volume = match (args.volume.keyframes, args.volume.constant) {
        (Some(spec), _) => Volume::parse_keyframes(&spec),
        (None, Some(v)) => Volume::Constant(v),
        (None, None) => anyhow::bail!("either --keyframes or --constant is required"),
    };
    let opts = EnvelopeOpts {
        layer_height: args.layer_height,
        bottom_margin: args.bottom_margin,
    };
    print_json(&compute_envelope(&volume, args.width, opts))
}

async fn cmd_view(args: ViewArgs) -> anyhow::Result<()> {
    let req = WaveformRequest::from_path(&args.in_path)?;

    let report = match &args.metadata {
        Some(path) => {
            let provider = InMemoryProvider::new().with(req.src.clone(), read_metadata(path)?);
            req.run(&MetadataCache::new(provider)).await
        }
        None => {
            let assets_root = args.in_path.parent().unwrap_or_else(|| Path::new("."));
            req.run(&MetadataCache::new(FfmpegProvider::new(assets_root)))
                .await
        }
    };
    print_json(&report)
}
