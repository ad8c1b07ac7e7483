use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use mosaic_logo::clock::FrameClock;
use mosaic_logo::config::{DotColor, LayerArg, ParamPreset, SurfaceMode};
use mosaic_logo::material::ShadeCtx;
use mosaic_logo::params::{ParameterSet, load_params};
use mosaic_logo::surface::FrameRenderer;

const DEFAULT_OUTPUT: &str = "logo.mp4";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "export_video",
    version,
    about = "Offline wordmark export (MP4 via ffmpeg, or a single PNG frame)"
)]
pub(crate) struct Cli {
    #[arg(long, value_name = "MP4", default_value = DEFAULT_OUTPUT)]
    pub(crate) out: PathBuf,

    /// Write one PNG frame at `--time` instead of a video.
    #[arg(long, value_name = "PNG")]
    pub(crate) snapshot: Option<PathBuf>,

    #[arg(long, default_value_t = 640)]
    pub(crate) width: usize,

    #[arg(long, default_value_t = 360)]
    pub(crate) height: usize,

    #[arg(long, default_value_t = 30)]
    pub(crate) fps: u32,

    #[arg(long, value_name = "SECONDS", default_value_t = 10.0)]
    pub(crate) duration: f32,

    /// Clock time of the snapshot frame.
    #[arg(long, value_name = "SECONDS", default_value_t = 0.0)]
    pub(crate) time: f32,

    #[arg(long, value_enum, default_value_t = ParamPreset::Footer)]
    pub(crate) preset: ParamPreset,

    #[arg(long, value_name = "FILE")]
    pub(crate) params: Option<PathBuf>,

    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub(crate) overrides: Vec<String>,

    #[arg(long, value_enum, default_value_t = LayerArg::Capped)]
    pub(crate) layers: LayerArg,

    #[arg(long, value_enum, default_value_t = SurfaceMode::Logo)]
    pub(crate) surface: SurfaceMode,

    #[arg(long, value_enum, default_value_t = DotColor::Black)]
    pub(crate) dot: DotColor,
}

pub(crate) fn compute_frame_count(duration_s: f32, fps: u32) -> usize {
    ((duration_s.max(0.0) * fps as f32).floor() as usize).max(1)
}

pub(crate) fn validate_args(args: &Cli) -> Result<()> {
    if args.width == 0 {
        bail!("--width must be >= 1");
    }
    if args.height == 0 {
        bail!("--height must be >= 1");
    }
    if args.fps == 0 {
        bail!("--fps must be >= 1");
    }
    if !(args.duration > 0.0) {
        bail!("--duration must be > 0 seconds");
    }
    if !(args.time >= 0.0) {
        bail!("--time must be >= 0 seconds");
    }
    if args.snapshot.is_none() && (args.width % 2 != 0 || args.height % 2 != 0) {
        bail!("--width and --height must be even for video output (yuv420p)");
    }
    Ok(())
}

pub(crate) fn resolve_params(args: &Cli) -> Result<ParameterSet> {
    let mut params = args.preset.params();
    if let Some(path) = &args.params {
        params = load_params(path, params)
            .with_context(|| format!("read parameters {}", path.display()))?;
    }
    if !args.overrides.is_empty() {
        params = ParameterSet::from_overrides_text(params, &args.overrides.join("\n"))
            .context("parse --set overrides")?;
    }
    Ok(params)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();
    run(args)
}

fn run(args: Cli) -> Result<()> {
    validate_args(&args)?;
    let params = resolve_params(&args)?;

    let mut surface = FrameRenderer::new(args.surface, args.dot);
    surface.resize(args.width, args.height);
    let policy = args.layers.into();

    if let Some(path) = &args.snapshot {
        let ctx = ShadeCtx {
            time: args.time,
            params,
            policy,
        };
        let pixels = surface.render(&ctx, 1).to_vec();
        ensure_parent_dir(path)?;
        write_png(path, args.width, args.height, pixels)?;
        println!("wrote {}x{} frame at t={:.3}s -> {}", args.width, args.height, args.time, path.display());
        return Ok(());
    }

    ensure_ffmpeg_available()?;
    ensure_parent_dir(&args.out)?;

    let frame_count = compute_frame_count(args.duration, args.fps);
    let mut ffmpeg = spawn_ffmpeg(&args.out, args.width, args.height, args.fps)?;
    let mut ffmpeg_in = ffmpeg
        .stdin
        .take()
        .context("failed to open ffmpeg stdin for rawvideo input")?;

    let started = Instant::now();
    let mut clock = FrameClock::stepped(args.fps);
    for i in 0..frame_count {
        let ctx = ShadeCtx {
            time: clock.tick(),
            params,
            policy,
        };
        let pixels = surface.render(&ctx, 1);
        if let Err(err) = ffmpeg_in.write_all(pixels) {
            drop(ffmpeg_in);
            reap(&mut ffmpeg);
            return Err(err).with_context(|| format!("write frame {i} to ffmpeg"));
        }
        if i % 60 == 0 {
            log::info!("frame {}/{} (t={:.2}s)", i + 1, frame_count, ctx.time);
        }
    }
    drop(ffmpeg_in);

    let status = ffmpeg.wait().context("wait for ffmpeg")?;
    if !status.success() {
        bail!("ffmpeg exited with status {status}");
    }

    println!(
        "exported {} frames @ {} fps in {:.1}s -> {}",
        frame_count,
        args.fps,
        started.elapsed().as_secs_f32(),
        args.out.display()
    );
    Ok(())
}

/// Stop an encoder we can no longer feed and collect its exit status.
pub(crate) fn reap(child: &mut Child) -> Option<ExitStatus> {
    if let Err(err) = child.kill() {
        log::debug!("ffmpeg kill: {err}");
    }
    match child.wait() {
        Ok(status) => Some(status),
        Err(err) => {
            log::warn!("ffmpeg wait failed: {err}");
            None
        }
    }
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    let mut parent = path.parent().unwrap_or_else(|| Path::new(""));
    if parent == Path::new("") {
        parent = Path::new(".");
    }
    fs::create_dir_all(parent)
        .with_context(|| format!("create output directory {}", parent.display()))
}

fn write_png(path: &Path, width: usize, height: usize, rgba: Vec<u8>) -> Result<()> {
    let img = image::RgbaImage::from_raw(width as u32, height as u32, rgba)
        .ok_or_else(|| anyhow!("frame buffer does not match {width}x{height}"))?;
    img.save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png {}", path.display()))
}

fn ensure_ffmpeg_available() -> Result<()> {
    match Command::new("ffmpeg")
        .arg("-version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(_) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            bail!("ffmpeg not found in PATH (install ffmpeg, or use --snapshot for a PNG)")
        }
        Err(err) => Err(anyhow!("failed to run ffmpeg: {err}")),
    }
}

fn spawn_ffmpeg(out_path: &Path, width: usize, height: usize, fps: u32) -> Result<Child> {
    let mut cmd = Command::new("ffmpeg");
    cmd.arg("-hide_banner")
        .arg("-loglevel")
        .arg("error")
        .arg("-y")
        .arg("-f")
        .arg("rawvideo")
        .arg("-pix_fmt")
        .arg("rgba")
        .arg("-video_size")
        .arg(format!("{width}x{height}"))
        .arg("-framerate")
        .arg(fps.to_string())
        .arg("-i")
        .arg("-")
        .arg("-c:v")
        .arg("libx264")
        .arg("-pix_fmt")
        .arg("yuv420p")
        .arg("-movflags")
        .arg("+faststart")
        .arg(out_path)
        .stdin(Stdio::piped())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());

    cmd.spawn()
        .with_context(|| format!("spawn ffmpeg for output {}", out_path.display()))
}
