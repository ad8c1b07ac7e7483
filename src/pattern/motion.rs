use super::hash::{hash2, hash4};
use super::math::{TAU_APPROX, Vec2, glsl_mod, smoothstep};

const LAYER_SALT: f32 = 17.83;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovementKind {
    Circular,
    FigureEight,
    Spiral,
    RandomWalk,
}

impl MovementKind {
    pub fn from_unit(v: f32) -> Self {
        if v < 0.25 {
            Self::Circular
        } else if v < 0.5 {
            Self::FigureEight
        } else if v < 0.75 {
            Self::Spiral
        } else {
            Self::RandomWalk
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Circular => "circular",
            Self::FigureEight => "figure-eight",
            Self::Spiral => "spiral",
            Self::RandomWalk => "random-walk",
        }
    }
}

/// Per-cell motion knobs pulled from the parameter set.
#[derive(Clone, Copy, Debug)]
pub struct MotionParams {
    pub radius_variation: f32,
    pub complexity: f32,
}

/// Which motion `cell` on `layer` follows; the same choice [`movement`] makes.
pub fn movement_kind(cell: Vec2, layer: f32) -> MovementKind {
    MovementKind::from_unit(hash4(cell + layer * LAYER_SALT)[0])
}

/// Offset of a cell's triangle from its resting position at animation time `t`.
pub fn movement(cell: Vec2, layer: f32, t: f32, mp: MotionParams) -> Vec2 {
    let r = hash4(cell + layer * LAYER_SALT);
    let phase = r[3] * TAU_APPROX;

    let m = match MovementKind::from_unit(r[0]) {
        MovementKind::Circular => {
            let speed = 0.5 + r[2] * 2.0;
            let pulse = 1.0 + (t * speed * 2.0 + phase).sin() * 0.3;
            let radius = (0.05 + r[1] * mp.radius_variation * 0.1) * pulse;
            let a = t * speed + phase;
            Vec2::new(a.cos() * radius, a.sin() * radius)
        }
        MovementKind::FigureEight => {
            let speed = 0.3 + r[2] * 1.5;
            let scale = 0.03 + r[1] * 0.05;
            Vec2::new(
                (t * speed + phase).sin() * scale,
                (t * speed * 2.0 + phase).sin() * scale * 0.5,
            )
        }
        MovementKind::Spiral => {
            let speed = 0.2 + r[2];
            let radius = glsl_mod(t * 0.01 + r[1] * 0.02, 0.08);
            let a = t * speed + phase;
            Vec2::new(a.cos() * radius, a.sin() * radius)
        }
        MovementKind::RandomWalk => {
            let speed = 0.1 + r[2] * 0.5;
            let step = (t * speed).floor();
            let from = (hash2(cell + step) - 0.5) * 0.08;
            let to = (hash2(cell + step + 1.0) - 0.5) * 0.08;
            let k = smoothstep(0.0, 1.0, t * speed - step);
            from.mix(to, k)
        }
    };

    m * mp.complexity
}
