//! The triangle-mosaic generator.
//!
//! A pure function of `(coord, time, params)`: a lattice of small rotating,
//! pulsing, wandering triangles, repeated over a few layers and painted
//! last-write-wins over a dark background. Every per-cell variation is
//! derived from [`hash`] of the cell coordinate, so nothing is stored between
//! frames.
//!
//! Per pixel the work is `O(layers * cells)`. [`MosaicFrame`] hoists
//! everything that does not depend on the pixel out of that loop; the
//! rasterizer prepares one per frame.

pub mod hash;
pub mod math;
pub mod motion;
pub mod palette;
pub mod sdf;

use crate::params::ParameterSet;
use hash::{hash, hash2, hash4};
use math::{Rgb, TAU_APPROX, Vec2};
use motion::{MotionParams, movement};

pub const BACKGROUND: Rgb = Rgb::new(0.08, 0.08, 0.12);

/// Layers actually drawn under [`LayerPolicy::Capped`].
pub const LAYER_CAP: u32 = 3;
/// Hard ceiling for [`LayerPolicy::Unbounded`].
pub const MAX_LAYERS: u32 = 32;
/// Lattice extent ceiling per axis, whatever `grid_density` says.
pub const MAX_CELLS_PER_AXIS: u32 = 64;

const OFFSET_SALT: f32 = 23.0;
const SIZE_SALT: f32 = 31.41;

/// How `num_layers` maps to the number of layers drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayerPolicy {
    /// `min(num_layers, 3)`; anything above three has no visible effect.
    #[default]
    Capped,
    /// Honor `num_layers` up to [`MAX_LAYERS`].
    Unbounded,
}

impl LayerPolicy {
    pub fn layer_count(self, num_layers: u32) -> u32 {
        match self {
            Self::Capped => num_layers.min(LAYER_CAP),
            Self::Unbounded => num_layers.min(MAX_LAYERS),
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Capped => Self::Unbounded,
            Self::Unbounded => Self::Capped,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Capped => "capped",
            Self::Unbounded => "unbounded",
        }
    }
}

/// Lattice size as `(columns, rows)` for a grid density.
pub fn lattice(grid_density: f32) -> (u32, u32) {
    let axis = |v: f32| {
        // NaN and negatives both collapse to an empty axis.
        let n = v.ceil();
        if n >= 1.0 {
            (n as u32).min(MAX_CELLS_PER_AXIS)
        } else {
            0
        }
    };
    (axis(grid_density), axis(grid_density * 0.8))
}

/// Everything about one cell's triangle at one instant that does not depend
/// on the pixel being shaded.
#[derive(Clone, Copy, Debug)]
pub struct CellState {
    pub cell: (u32, u32),
    pub layer: u32,
    /// Resting lattice position in `[-0.5, 0.5)^2`.
    pub base: Vec2,
    /// Animated center.
    pub center: Vec2,
    /// The per-cell motion component of `center`, already scaled.
    pub movement: Vec2,
    pub half_size: f32,
    pub rotation: f32,
    /// Unclamped fill colour (palette * intensity * brightness).
    pub color: Rgb,
    inv_sin: f32,
    inv_cos: f32,
    bound_sq: Option<f32>,
}

impl CellState {
    /// Signed distance from `coord` to this cell's triangle.
    pub fn distance(&self, coord: Vec2) -> f32 {
        let local = (coord - self.center).rotate_sc(self.inv_sin, self.inv_cos);
        sdf::triangle(local, self.half_size)
    }

    /// True when `coord` is inside or on the edge of the triangle.
    #[inline]
    pub fn covers(&self, coord: Vec2) -> bool {
        if let Some(b2) = self.bound_sq {
            if (coord - self.center).length_squared() > b2 {
                return false;
            }
        }
        self.distance(coord) <= 0.0
    }
}

/// Animated state of `cell` on `layer` at clock `time` (seconds; `speed` is
/// applied here).
pub fn cell_state(cell: (u32, u32), layer: u32, time: f32, params: &ParameterSet) -> CellState {
    let t = time * params.speed;
    let (cols, rows) = (params.grid_density, params.grid_density * 0.8);
    cell_state_at(cell, layer, t, params, Vec2::new(cols, rows))
}

fn cell_state_at(
    cell: (u32, u32),
    layer: u32,
    t: f32,
    params: &ParameterSet,
    grid: Vec2,
) -> CellState {
    let lf = layer as f32;
    let id = Vec2::new(cell.0 as f32, cell.1 as f32);
    let base = Vec2::new(id.x / grid.x, id.y / grid.y) - 0.5;

    let offset = (hash2(id + lf * OFFSET_SALT) - 0.5) * 0.08;
    let motion = movement(
        id,
        lf,
        t,
        MotionParams {
            radius_variation: params.radius_variation,
            complexity: params.movement_complexity,
        },
    );
    let drift = layer_drift(lf, t);
    let center = base + offset + motion + drift;

    let sr = hash4(id + lf * SIZE_SALT);
    let multiplier = 0.5 + sr[0] * params.size_variation * 1.5;
    let pulsation = if sr[3] > 0.8 {
        1.0 + (t * 0.5 + sr[2] * TAU_APPROX).sin() * 0.6
    } else {
        1.0 + (t * (1.0 + sr[1] * 2.0) + sr[2] * TAU_APPROX).sin() * 0.2
    };
    let half_size = params.triangle_size * multiplier * pulsation;

    let base_rotation = hash(id.x * 7.0 + id.y * 11.0 + lf * 19.0) * TAU_APPROX;
    let mut rate = 0.2 + hash(id.x + id.y + lf) * 1.5;
    if sr[1] > 0.5 {
        rate = -rate;
    }
    let rotation = base_rotation + t * params.rotation_speed * rate;
    let (inv_sin, inv_cos) = (-rotation).sin_cos();

    let brightness = 1.0 + (t * 2.0 + motion.length() * 10.0).sin() * 0.1;
    let color = palette::base_color(base + id, lf).scale(params.color_intensity * brightness);

    let bound_sq = (half_size > 0.0 && half_size.is_finite()).then(|| {
        let b = half_size * sdf::TRIANGLE_BOUND;
        b * b
    });

    CellState {
        cell,
        layer,
        base,
        center,
        movement: motion,
        half_size,
        rotation,
        color,
        inv_sin,
        inv_cos,
        bound_sq,
    }
}

/// Whole-layer sway shared by every cell on `layer`.
pub fn layer_drift(layer: f32, t: f32) -> Vec2 {
    Vec2::new(
        (t + layer * 2.0).sin() * 0.02,
        (t * 0.9 + layer * 2.0).cos() * 0.015,
    )
}

/// One cell whose triangle covers a queried coordinate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellHit {
    pub cell: (u32, u32),
    pub layer: u32,
    /// Position in paint order; later hits overwrite earlier ones.
    pub order: usize,
    pub color: Rgb,
}

fn scan_cells(time: f32, params: &ParameterSet, policy: LayerPolicy, mut f: impl FnMut(CellState)) {
    let t = time * params.speed;
    let grid = Vec2::new(params.grid_density, params.grid_density * 0.8);
    let (cols, rows) = lattice(params.grid_density);
    for layer in 0..policy.layer_count(params.num_layers) {
        for x in 0..cols {
            for y in 0..rows {
                f(cell_state_at((x, y), layer, t, params, grid));
            }
        }
    }
}

/// Every cell covering `coord`, reported in paint order.
pub fn for_each_hit(
    coord: Vec2,
    time: f32,
    params: &ParameterSet,
    policy: LayerPolicy,
    mut f: impl FnMut(CellHit),
) {
    let mut order = 0usize;
    scan_cells(time, params, policy, |cs| {
        if cs.covers(coord) {
            f(CellHit {
                cell: cs.cell,
                layer: cs.layer,
                order,
                color: cs.color.clamp(0.0, 1.0),
            });
        }
        order += 1;
    });
}

/// Shade one point with the default (capped) layer policy.
///
/// `coord` is in `[-0.5, 0.5]^2`; `time` is the raw clock in seconds.
pub fn evaluate(coord: Vec2, time: f32, params: &ParameterSet) -> Rgb {
    evaluate_with(coord, time, params, LayerPolicy::default())
}

pub fn evaluate_with(coord: Vec2, time: f32, params: &ParameterSet, policy: LayerPolicy) -> Rgb {
    let mut out = BACKGROUND;
    scan_cells(time, params, policy, |cs| {
        if cs.covers(coord) {
            out = cs.color;
        }
    });
    out.clamp(0.0, 1.0)
}

/// All cell states for one frame, in paint order. Shading against a prepared
/// frame gives exactly what [`evaluate_with`] gives for the same inputs.
#[derive(Clone, Debug, Default)]
pub struct MosaicFrame {
    cells: Vec<CellState>,
}

impl MosaicFrame {
    pub fn prepare(time: f32, params: &ParameterSet, policy: LayerPolicy) -> Self {
        let mut frame = Self::default();
        frame.refill(time, params, policy);
        frame
    }

    /// Rebuild in place, reusing the allocation.
    pub fn refill(&mut self, time: f32, params: &ParameterSet, policy: LayerPolicy) {
        self.cells.clear();
        scan_cells(time, params, policy, |cs| self.cells.push(cs));
    }

    pub fn cells(&self) -> &[CellState] {
        &self.cells
    }

    pub fn shade(&self, coord: Vec2) -> Rgb {
        // Last write wins, so the first hit walking backwards is the answer.
        self.cells
            .iter()
            .rev()
            .find(|cs| cs.covers(coord))
            .map_or(BACKGROUND, |cs| cs.color)
            .clamp(0.0, 1.0)
    }
}
