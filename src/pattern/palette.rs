use super::hash::hash3;
use super::math::{Rgb, Vec2};

/// Twelve saturated hues, warm to cool and back around to magenta.
pub const PALETTE: [Rgb; 12] = [
    Rgb::new(0.95, 0.15, 0.25),
    Rgb::new(1.0, 0.35, 0.15),
    Rgb::new(1.0, 0.55, 0.05),
    Rgb::new(1.0, 0.75, 0.0),
    Rgb::new(0.95, 0.85, 0.1),
    Rgb::new(0.7, 0.9, 0.15),
    Rgb::new(0.25, 0.8, 0.3),
    Rgb::new(0.1, 0.75, 0.6),
    Rgb::new(0.15, 0.6, 0.9),
    Rgb::new(0.25, 0.3, 0.95),
    Rgb::new(0.6, 0.2, 0.9),
    Rgb::new(0.85, 0.15, 0.7),
];

const JITTER: f32 = 0.15;
const LAYER_SALT: f32 = 123.456;

pub fn palette_index(r: f32) -> usize {
    // `fract` can land on exactly 1.0 for tiny negative inputs.
    ((r * PALETTE.len() as f32) as usize).min(PALETTE.len() - 1)
}

/// Unscaled colour for the triangle at `cell_pos` on `layer`: a palette entry
/// picked by hash, jittered slightly, then clamped to `[0.1, 1.0]`.
pub fn base_color(cell_pos: Vec2, layer: f32) -> Rgb {
    let rand = hash3(cell_pos + layer * LAYER_SALT);
    let base = PALETTE[palette_index(rand[0])];
    Rgb::new(
        base.r + (rand[0] - 0.5) * JITTER,
        base.g + (rand[1] - 0.5) * JITTER,
        base.b + (rand[2] - 0.5) * JITTER,
    )
    .clamp(0.1, 1.0)
}
