use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use clap::Parser;

use passloom::{
    CompositeConfig, FrameRange, SystemRunner, composite,
    passes::{default_passes, parse_pass_list},
};

/// Composite numbered render-pass image sequences from the current
/// directory into one video (requires `ffmpeg` on PATH).
///
/// Frame files follow `<dir-name>.<Pass>.<padded-index>.<ext>`. Passes whose
/// first frame is missing are skipped; gaps inside surviving passes are
/// repaired before encoding.
#[derive(Parser, Debug)]
#[command(name = "passloom", version)]
struct Cli {
    /// Output video path.
    #[arg(long, default_value = "output_composite.mp4")]
    output: PathBuf,

    /// Frame file extension (e.g. png).
    #[arg(long)]
    ext: String,

    /// First frame index of the sequence.
    #[arg(long)]
    start_index: u64,

    /// Last frame index of the sequence (inclusive).
    #[arg(long)]
    last_index: u64,

    /// Output framerate in frames per second.
    #[arg(long, default_value_t = 120)]
    framerate: u32,

    /// x265 constant rate factor; 0 is lossless.
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..=51))]
    crf: u8,

    /// Output pixel format.
    #[arg(long, default_value = "yuv420p10le")]
    pix_fmt: String,

    /// Resolution of synthesized blank frames, as WxH.
    #[arg(long, default_value = "1920x1080")]
    resolution: String,

    /// Comma-separated `Name:BlendMode` pass list, layered in order.
    /// Defaults to the conventional five-pass stack.
    #[arg(long)]
    passes: Option<String>,

    /// Kill the encode if it runs longer than this many seconds.
    #[arg(long)]
    encode_timeout: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = build_config(cli)?;
    composite(&cfg, &SystemRunner)?;
    eprintln!("wrote {}", cfg.output.display());
    Ok(())
}

fn build_config(cli: Cli) -> anyhow::Result<CompositeConfig> {
    let dir = std::env::current_dir().context("resolve working directory")?;
    let root = dir
        .file_name()
        .context("working directory has no name; run from the sequence directory")?
        .to_string_lossy()
        .into_owned();

    let passes = match cli.passes.as_deref() {
        Some(list) => parse_pass_list(list)?,
        None => default_passes(),
    };

    Ok(CompositeConfig {
        dir,
        root,
        ext: cli.ext.trim().trim_start_matches('.').to_ascii_lowercase(),
        range: FrameRange::new(cli.start_index, cli.last_index)?,
        framerate: cli.framerate,
        crf: cli.crf,
        pix_fmt: cli.pix_fmt.parse()?,
        resolution: cli.resolution.parse()?,
        output: cli.output,
        passes,
        encode_timeout: cli.encode_timeout.map(Duration::from_secs),
    })
}
