//! Small vector/colour types and the GLSL-flavoured scalar helpers the
//! generator is written against.
//!
//! These follow GLSL semantics rather than Rust's where the two disagree:
//! `fract` is `x - floor(x)` (never negative), `sign(0) == 0`, and `clamp`
//! is `min(max(x, lo), hi)` so inverted bounds never panic.

use std::ops::{Add, Mul, Sub};

/// `2π` to two decimals; every phase in the pattern is scaled by this.
pub const TAU_APPROX: f32 = 6.28;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v }
    }

    pub fn dot(self, o: Self) -> f32 {
        self.x * o.x + self.y * o.y
    }

    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Counter-clockwise rotation by the angle whose sine/cosine are `(s, c)`.
    pub fn rotate_sc(self, s: f32, c: f32) -> Self {
        Self::new(c * self.x - s * self.y, s * self.x + c * self.y)
    }

    pub fn mix(self, o: Self, t: f32) -> Self {
        Self::new(mix(self.x, o.x, t), mix(self.y, o.y, t))
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, o: Self) -> Self {
        Self::new(self.x + o.x, self.y + o.y)
    }
}

impl Add<f32> for Vec2 {
    type Output = Self;
    fn add(self, o: f32) -> Self {
        Self::new(self.x + o, self.y + o)
    }
}

impl Sub for Vec2 {
    type Output = Self;
    fn sub(self, o: Self) -> Self {
        Self::new(self.x - o.x, self.y - o.y)
    }
}

impl Sub<f32> for Vec2 {
    type Output = Self;
    fn sub(self, o: f32) -> Self {
        Self::new(self.x - o, self.y - o)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;
    fn mul(self, o: f32) -> Self {
        Self::new(self.x * o, self.y * o)
    }
}

/// Linear RGB in nominal `[0, 1]` per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn scale(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k)
    }

    pub fn clamp(self, lo: f32, hi: f32) -> Self {
        Self::new(clamp(self.r, lo, hi), clamp(self.g, lo, hi), clamp(self.b, lo, hi))
    }

    pub fn mix(self, o: Self, t: f32) -> Self {
        Self::new(mix(self.r, o.r, t), mix(self.g, o.g, t), mix(self.b, o.b, t))
    }

    /// Quantize to 8-bit sRGB-less bytes (the surface is treated as display-referred).
    pub fn to_u8(self) -> [u8; 3] {
        let q = |v: f32| (clamp(v, 0.0, 1.0) * 255.0 + 0.5) as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

#[inline]
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// GLSL `mod`: result takes the sign of `y`.
#[inline]
pub fn glsl_mod(x: f32, y: f32) -> f32 {
    x - y * (x / y).floor()
}

#[inline]
pub fn sign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

#[inline]
pub fn clamp(x: f32, lo: f32, hi: f32) -> f32 {
    x.max(lo).min(hi)
}

#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a * (1.0 - t) + b * t
}

#[inline]
pub fn smoothstep(e0: f32, e1: f32, x: f32) -> f32 {
    let t = clamp((x - e0) / (e1 - e0), 0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
