use super::math::{Vec2, clamp, sign};

const SQRT_3: f32 = 1.732_050_8;

/// Upper bound on `|p|` for any point inside `triangle(p, size)` with
/// `size > 0`, as a multiple of `size`. The farthest vertices sit at
/// `(±size, -size * (1/sqrt(3) + 0.3))`, i.e. ~1.3304 * size.
pub const TRIANGLE_BOUND: f32 = 1.34;

/// Signed distance to an equilateral triangle of half-width `size`, pointing
/// up, nudged down by `0.3 * size` so its visual weight sits on the origin.
///
/// Negative inside, zero on the edge.
pub fn triangle(p: Vec2, size: f32) -> f32 {
    let mut p = Vec2::new(p.x, p.y + size * 0.3);
    p.x = p.x.abs() - size;
    p.y += size / SQRT_3;
    if p.x + SQRT_3 * p.y > 0.0 {
        p = Vec2::new(p.x - SQRT_3 * p.y, -SQRT_3 * p.x - p.y) * 0.5;
    }
    p.x -= clamp(p.x, -2.0 * size, 0.0);
    -p.length() * sign(p.y)
}
