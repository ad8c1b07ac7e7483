use std::time::Instant;

use anyhow::{Result, bail};
use clap::Parser;
use mosaic_logo::clock::FrameClock;
use mosaic_logo::config::{DotColor, LayerArg, ParamPreset, SurfaceMode};
use mosaic_logo::material::ShadeCtx;
use mosaic_logo::params::{ParamKey, ParameterStore};
use mosaic_logo::pattern::math::Vec2;
use mosaic_logo::pattern::motion::{MovementKind, movement_kind};
use mosaic_logo::pattern::{LayerPolicy, lattice};
use mosaic_logo::surface::FrameRenderer;

#[derive(Parser, Debug, Clone)]
#[command(name = "benchmark", about = "Per-frame shading cost across grid densities")]
struct Args {
    #[arg(long, default_value_t = 160)]
    width: usize,

    #[arg(long, default_value_t = 88)]
    height: usize,

    #[arg(long, default_value_t = 60)]
    frames: usize,

    #[arg(long, default_value_t = 1)]
    scale: usize,

    /// Grid densities to measure (comma separated).
    #[arg(long, value_delimiter = ',', default_values_t = vec![4.0f32, 8.0, 12.0, 16.0, 20.0, 24.0])]
    densities: Vec<f32>,

    #[arg(long, value_enum, default_value_t = ParamPreset::Footer)]
    preset: ParamPreset,

    #[arg(long, value_enum, default_value_t = LayerArg::Capped)]
    layers: LayerArg,

    #[arg(long, value_enum, default_value_t = SurfaceMode::Full)]
    surface: SurfaceMode,

    /// Fail if any density averages above this many ms per frame.
    #[arg(long)]
    max_ms: Option<f64>,
}

const KINDS: [MovementKind; 4] = [
    MovementKind::Circular,
    MovementKind::FigureEight,
    MovementKind::Spiral,
    MovementKind::RandomWalk,
];

/// How the drawn cells split across the four motion kinds, e.g.
/// `circular 41  figure-eight 38  spiral 45  random-walk 44`.
fn motion_mix(cols: u32, rows: u32, layers: u32) -> String {
    let mut counts = [0usize; 4];
    for layer in 0..layers {
        for x in 0..cols {
            for y in 0..rows {
                let kind = movement_kind(Vec2::new(x as f32, y as f32), layer as f32);
                if let Some(i) = KINDS.iter().position(|k| *k == kind) {
                    counts[i] += 1;
                }
            }
        }
    }
    KINDS
        .iter()
        .zip(counts)
        .map(|(k, n)| format!("{} {n}", k.label()))
        .collect::<Vec<_>>()
        .join("  ")
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    if args.width == 0 || args.height == 0 || args.frames == 0 {
        bail!("--width, --height and --frames must be >= 1");
    }

    let mut surface = FrameRenderer::new(args.surface, DotColor::Black);
    surface.resize(args.width, args.height);
    let policy: LayerPolicy = args.layers.into();

    println!(
        "{}x{} px, {} frames, scale {}, layers {:?}",
        args.width, args.height, args.frames, args.scale, args.layers
    );

    let mut over_budget = Vec::new();
    for &density in &args.densities {
        let mut store = ParameterStore::new(args.preset.params());
        let stored = store.set(ParamKey::GridDensity, density);
        let params = store.snapshot();
        let (cols, rows) = lattice(params.grid_density);

        let mut clock = FrameClock::stepped(60);
        let mut checksum = 0u64;
        let start = Instant::now();
        for _ in 0..args.frames {
            let ctx = ShadeCtx {
                time: clock.tick(),
                params,
                policy,
            };
            let px = surface.render(&ctx, args.scale);
            checksum = checksum.wrapping_add(px.iter().step_by(97).map(|&b| b as u64).sum::<u64>());
        }
        let ms = start.elapsed().as_secs_f64() * 1000.0 / args.frames as f64;
        println!(
            "grid {:>5.1} ({:>2}x{:<2}) {:>8.3} ms/frame  checksum {:016x}",
            stored, cols, rows, ms, checksum
        );
        println!("    motion {}", motion_mix(cols, rows, policy.layer_count(params.num_layers)));
        if let Some(max) = args.max_ms {
            if ms > max {
                over_budget.push(format!("grid {stored}: {ms:.3} ms > {max:.3}"));
            }
        }
    }

    if !over_budget.is_empty() {
        for line in &over_budget {
            eprintln!("  over budget: {line}");
        }
        bail!("{} densities over the frame budget", over_budget.len());
    }
    Ok(())
}
