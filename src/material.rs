use crate::params::ParameterSet;
use crate::pattern::math::{Rgb, Vec2};
use crate::pattern::{LayerPolicy, MosaicFrame};

/// Inputs shared by every material for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShadeCtx {
    pub time: f32,
    pub params: ParameterSet,
    pub policy: LayerPolicy,
}

impl ShadeCtx {
    pub fn new(time: f32, params: ParameterSet) -> Self {
        Self {
            time,
            params,
            policy: LayerPolicy::default(),
        }
    }
}

/// A surface shader: UV in `[0, 1]^2` in, colour out.
pub trait Material {
    fn name(&self) -> &'static str;
    /// Called once per frame before any `shade` call.
    fn begin_frame(&mut self, _ctx: &ShadeCtx) {}
    fn shade(&self, uv: Vec2) -> Rgb;
}

/// The animated triangle mosaic applied to the logo letters.
#[derive(Debug, Default)]
pub struct TriangleMosaic {
    frame: MosaicFrame,
}

impl TriangleMosaic {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Material for TriangleMosaic {
    fn name(&self) -> &'static str {
        "triangle-mosaic"
    }

    fn begin_frame(&mut self, ctx: &ShadeCtx) {
        self.frame.refill(ctx.time, &ctx.params, ctx.policy);
    }

    fn shade(&self, uv: Vec2) -> Rgb {
        self.frame.shade(uv - 0.5)
    }
}

/// Flat colour, used for the accent dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolidColor {
    name: &'static str,
    color: Rgb,
}

impl SolidColor {
    pub const WHITE: Self = Self {
        name: "white-dot",
        color: Rgb::WHITE,
    };
    pub const BLACK: Self = Self {
        name: "black-dot",
        color: Rgb::BLACK,
    };

    pub fn color(&self) -> Rgb {
        self.color
    }
}

impl Material for SolidColor {
    fn name(&self) -> &'static str {
        self.name
    }

    fn shade(&self, _uv: Vec2) -> Rgb {
        self.color
    }
}
