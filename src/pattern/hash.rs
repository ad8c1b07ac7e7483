//! Sine-fract hashes. Every per-cell "random" value in the mosaic comes from
//! one of these, so there is no seeded state anywhere.

use super::math::{Vec2, fract};

const SCALE: f32 = 43_758.545;

const K0: Vec2 = Vec2::new(127.1, 311.7);
const K1: Vec2 = Vec2::new(269.5, 183.3);
const K2: Vec2 = Vec2::new(419.2, 371.9);
const K3: Vec2 = Vec2::new(491.8, 203.4);

#[inline]
fn h(n: f32) -> f32 {
    fract(n.sin() * SCALE)
}

pub fn hash(n: f32) -> f32 {
    h(n)
}

pub fn hash2(p: Vec2) -> Vec2 {
    Vec2::new(h(p.dot(K0)), h(p.dot(K1)))
}

pub fn hash3(p: Vec2) -> [f32; 3] {
    [h(p.dot(K0)), h(p.dot(K1)), h(p.dot(K2))]
}

pub fn hash4(p: Vec2) -> [f32; 4] {
    [h(p.dot(K0)), h(p.dot(K1)), h(p.dot(K2)), h(p.dot(K3))]
}
