use mosaic_logo::params::ParameterSet;
use mosaic_logo::pattern::hash::{hash, hash2, hash3, hash4};
use mosaic_logo::pattern::math::{Rgb, Vec2};
use mosaic_logo::pattern::motion::{MotionParams, MovementKind, movement, movement_kind};
use mosaic_logo::pattern::palette::{PALETTE, base_color, palette_index};
use mosaic_logo::pattern::{
    BACKGROUND, CellHit, LayerPolicy, MosaicFrame, cell_state, evaluate, evaluate_with,
    for_each_hit, lattice, layer_drift, sdf,
};

fn bits(c: Rgb) -> [u32; 3] {
    [c.r.to_bits(), c.g.to_bits(), c.b.to_bits()]
}

fn in_unit(c: Rgb) -> bool {
    [c.r, c.g, c.b].iter().all(|v| (0.0..=1.0).contains(v))
}

/// `n x n` sample points covering `[-0.5, 0.5]^2` at cell centers.
fn sample_grid(n: usize) -> Vec<Vec2> {
    let mut pts = Vec::with_capacity(n * n);
    for j in 0..n {
        for i in 0..n {
            pts.push(Vec2::new(
                (i as f32 + 0.5) / n as f32 - 0.5,
                (j as f32 + 0.5) / n as f32 - 0.5,
            ));
        }
    }
    pts
}

fn hits_in(frame: &MosaicFrame, p: Vec2) -> Vec<usize> {
    frame
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, cs)| cs.covers(p))
        .map(|(i, _)| i)
        .collect()
}

fn collect_hits(p: Vec2, time: f32, params: &ParameterSet) -> Vec<CellHit> {
    let mut hits = Vec::new();
    for_each_hit(p, time, params, LayerPolicy::Capped, |h| hits.push(h));
    hits
}

// ── hashes, sdf, palette ────────────────────────────────────────────────────

#[test]
fn hashes_stay_in_unit_interval() {
    for i in -200..200 {
        let f = i as f32 * 0.731;
        let p = Vec2::new(f, f * -1.37 + 3.0);
        let h1 = hash(f);
        let h2 = hash2(p);
        let h3 = hash3(p);
        let h4 = hash4(p);
        assert!((0.0..=1.0).contains(&h1), "hash({f}) = {h1}");
        for v in [h2.x, h2.y].into_iter().chain(h3).chain(h4) {
            assert!((0.0..=1.0).contains(&v), "hash out of range at {p:?}: {v}");
        }
    }
}

#[test]
fn hash_variants_share_leading_components() {
    let p = Vec2::new(3.0, 5.0);
    let h2 = hash2(p);
    let h3 = hash3(p);
    let h4 = hash4(p);
    assert_eq!(h2.x.to_bits(), h3[0].to_bits());
    assert_eq!(h2.y.to_bits(), h4[1].to_bits());
    assert_eq!(h3[2].to_bits(), h4[2].to_bits());
}

#[test]
fn triangle_sdf_sign_matches_geometry() {
    let size = 0.1;
    assert!(sdf::triangle(Vec2::ZERO, size) < 0.0, "origin is inside");
    assert!(sdf::triangle(Vec2::new(0.5, 0.5), size) > 0.0, "far point is outside");
    // Apex of the shifted triangle sits at y = size * (2/sqrt(3) - 0.3).
    assert!(sdf::triangle(Vec2::new(0.0, size * 0.80), size) < 0.0);
    assert!(sdf::triangle(Vec2::new(0.0, size * 0.90), size) > 0.0);
}

#[test]
fn nothing_inside_triangle_beyond_bound() {
    for &size in &[0.01f32, 0.06, 0.16, 0.4] {
        let r = size * sdf::TRIANGLE_BOUND;
        for k in 0..128 {
            let a = k as f32 / 128.0 * std::f32::consts::TAU;
            let p = Vec2::new(a.cos() * r, a.sin() * r);
            assert!(sdf::triangle(p, size) > 0.0, "size {size} angle {a}: inside beyond bound");
        }
    }
}

#[test]
fn palette_index_never_overflows() {
    assert_eq!(palette_index(0.0), 0);
    assert_eq!(palette_index(0.999), 11);
    assert_eq!(palette_index(1.0), 11);
    assert_eq!(palette_index(f32::NAN), 0);
}

#[test]
fn base_color_is_jittered_palette_entry() {
    for (x, y) in [(0.0f32, 0.0f32), (3.0, 2.0), (-0.5, -0.5), (17.25, 9.5)] {
        let pos = Vec2::new(x, y);
        let c = base_color(pos, 0.0);
        let entry = PALETTE[palette_index(hash3(pos)[0])].clamp(0.1, 1.0);
        for (got, want) in [(c.r, entry.r), (c.g, entry.g), (c.b, entry.b)] {
            assert!((0.1..=1.0).contains(&got));
            assert!((got - want).abs() <= 0.075 + 1e-5, "{got} vs palette {want}");
        }
    }
}

#[test]
fn movement_kind_thresholds() {
    assert_eq!(MovementKind::from_unit(0.0), MovementKind::Circular);
    assert_eq!(MovementKind::from_unit(0.25), MovementKind::FigureEight);
    assert_eq!(MovementKind::from_unit(0.5), MovementKind::Spiral);
    assert_eq!(MovementKind::from_unit(0.74), MovementKind::Spiral);
    assert_eq!(MovementKind::from_unit(0.75), MovementKind::RandomWalk);
    assert_eq!(MovementKind::from_unit(1.0), MovementKind::RandomWalk);
}

// ── lattice and layer policy ────────────────────────────────────────────────

#[test]
fn lattice_follows_float_loop_bounds() {
    assert_eq!(lattice(8.0), (8, 7));
    assert_eq!(lattice(4.0), (4, 4));
    assert_eq!(lattice(22.0), (22, 18));
    assert_eq!(lattice(0.0), (0, 0));
    assert_eq!(lattice(-3.0), (0, 0));
    assert_eq!(lattice(f32::NAN), (0, 0));
    assert_eq!(lattice(1.0e6), (64, 64));
}

#[test]
fn layer_policy_counts() {
    assert_eq!(LayerPolicy::Capped.layer_count(1), 1);
    assert_eq!(LayerPolicy::Capped.layer_count(3), 3);
    assert_eq!(LayerPolicy::Capped.layer_count(20), 3);
    assert_eq!(LayerPolicy::Unbounded.layer_count(20), 20);
    assert_eq!(LayerPolicy::Unbounded.layer_count(u32::MAX), 32);
    assert_eq!(LayerPolicy::Capped.toggled(), LayerPolicy::Unbounded);
    assert_eq!(LayerPolicy::default(), LayerPolicy::Capped);
}

#[test]
fn layer_count_beyond_cap_has_no_effect() {
    let mut three = ParameterSet::default();
    three.num_layers = 3;
    let mut twenty = three;
    twenty.num_layers = 20;

    for &t in &[0.0f32, 2.5, 40.0] {
        for p in sample_grid(12) {
            assert_eq!(bits(evaluate(p, t, &three)), bits(evaluate(p, t, &twenty)), "t={t} p={p:?}");
        }
    }

    let (cols, rows) = lattice(three.grid_density);
    let per_layer = (cols * rows) as usize;
    let capped = MosaicFrame::prepare(1.0, &twenty, LayerPolicy::Capped);
    let unbounded = MosaicFrame::prepare(1.0, &twenty, LayerPolicy::Unbounded);
    assert_eq!(capped.cells().len(), per_layer * 3);
    assert_eq!(unbounded.cells().len(), per_layer * 20);
}

#[test]
fn fewer_layers_than_cap_draws_fewer() {
    let mut one = ParameterSet::default();
    one.num_layers = 1;
    let frame = MosaicFrame::prepare(0.0, &one, LayerPolicy::Capped);
    assert!(frame.cells().iter().all(|cs| cs.layer == 0));
}

// ── evaluate contract ───────────────────────────────────────────────────────

#[test]
fn channels_stay_in_unit_range() {
    let mut hot = ParameterSet::footer();
    hot.color_intensity = 3.0;
    let mut sparse = ParameterSet::default();
    sparse.grid_density = 4.0;
    let mut dense = ParameterSet::default();
    dense.grid_density = 24.0;
    dense.color_intensity = 3.0;

    for params in [ParameterSet::default(), ParameterSet::footer(), hot, sparse, dense] {
        for &t in &[0.0f32, 1.7, 13.0, 250.0] {
            let frame = MosaicFrame::prepare(t, &params, LayerPolicy::Capped);
            for p in sample_grid(16) {
                let c = frame.shade(p);
                assert!(in_unit(c), "channel out of range: {c:?} params={params:?} t={t}");
            }
        }
    }
}

#[test]
fn intensity_is_clamped_after_scaling() {
    let mut hot = ParameterSet::default();
    hot.color_intensity = 3.0;
    let frame = MosaicFrame::prepare(0.0, &hot, LayerPolicy::Capped);
    // Raw cell colours do exceed 1.0 at this intensity; the output never does.
    assert!(frame.cells().iter().any(|cs| cs.color.r > 1.0 || cs.color.g > 1.0 || cs.color.b > 1.0));
    for p in sample_grid(16) {
        assert!(in_unit(frame.shade(p)));
    }
}

#[test]
fn evaluate_is_deterministic() {
    let params = ParameterSet::footer();
    for p in sample_grid(8) {
        let a = evaluate(p, 3.25, &params);
        let b = evaluate(p, 3.25, &params);
        assert_eq!(bits(a), bits(b));
    }
}

#[test]
fn prepared_frame_matches_evaluate() {
    for params in [ParameterSet::default(), ParameterSet::footer()] {
        for &t in &[0.0f32, 5.5] {
            for policy in [LayerPolicy::Capped, LayerPolicy::Unbounded] {
                let frame = MosaicFrame::prepare(t, &params, policy);
                for p in sample_grid(10) {
                    assert_eq!(
                        bits(frame.shade(p)),
                        bits(evaluate_with(p, t, &params, policy)),
                        "t={t} p={p:?} policy={policy:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn evaluate_is_total_for_garbage_params() {
    let mut nan = ParameterSet::default();
    nan.speed = f32::NAN;
    nan.triangle_size = f32::NAN;
    let mut negative = ParameterSet::default();
    negative.triangle_size = -0.2;
    negative.size_variation = -4.0;
    let mut no_grid = ParameterSet::default();
    no_grid.grid_density = f32::NAN;
    let mut huge = ParameterSet::default();
    huge.color_intensity = f32::INFINITY;

    for params in [nan, negative, no_grid, huge] {
        for p in sample_grid(4) {
            let c = evaluate(p, 1.0, &params);
            assert!(in_unit(c), "{c:?} for {params:?}");
        }
    }
    let c = evaluate(Vec2::ZERO, 1.0, &no_grid);
    assert_eq!(bits(c), bits(BACKGROUND));
}

// ── scenarios ───────────────────────────────────────────────────────────────

#[test]
fn first_cell_covers_its_own_center_with_palette_colour() {
    let params = ParameterSet {
        grid_density: 8.0,
        triangle_size: 0.06,
        color_intensity: 1.0,
        ..ParameterSet::default()
    };
    let cs = cell_state((0, 0), 0, 0.0, &params);
    assert!(cs.half_size > 0.0);
    assert!(cs.distance(cs.center) <= 0.0, "cell (0,0) must contain its own center");
    assert_eq!(cs.base, Vec2::new(-0.5, -0.5));

    let cell_pos = cs.base + Vec2::new(0.0, 0.0);
    let entry = PALETTE[palette_index(hash3(cell_pos)[0])].clamp(0.1, 1.0);
    let brightness = 1.0 + (cs.movement.length() * 10.0).sin() * 0.1;
    let expected = base_color(cell_pos, 0.0).scale(brightness);
    for (got, want, pal) in [
        (cs.color.r, expected.r, entry.r),
        (cs.color.g, expected.g, entry.g),
        (cs.color.b, expected.b, entry.b),
    ] {
        assert!((got - want).abs() < 1e-6, "{got} vs {want}");
        // Jitter (<= 0.075) then brightness (<= 10%).
        assert!((got - pal).abs() <= 0.075 + 0.11, "{got} strays from palette {pal}");
    }

    let hits = collect_hits(cs.center, 0.0, &params);
    assert!(hits.iter().any(|h| h.cell == (0, 0) && h.layer == 0));
    let last = hits.last().expect("center is covered");
    assert_eq!(bits(evaluate(cs.center, 0.0, &params)), bits(last.color));
}

#[test]
fn sparse_grid_leaves_background_gaps() {
    let params = ParameterSet {
        grid_density: 4.0,
        ..ParameterSet::default()
    };
    let frame = MosaicFrame::prepare(0.0, &params, LayerPolicy::Capped);
    let samples = sample_grid(40);
    let covered = samples.iter().filter(|p| !hits_in(&frame, **p).is_empty()).count();
    let fraction = covered as f32 / samples.len() as f32;
    assert!(fraction < 0.75, "sparse grid covers {fraction:.2} of the surface");

    let gap = samples
        .iter()
        .copied()
        .find(|p| hits_in(&frame, *p).is_empty())
        .expect("sparse grid must leave a gap");
    assert!(collect_hits(gap, 0.0, &params).is_empty());
    assert_eq!(bits(evaluate(gap, 0.0, &params)), bits(BACKGROUND));
    assert_eq!(BACKGROUND, Rgb::new(0.08, 0.08, 0.12));
}

#[test]
fn dense_grid_overlap_is_last_write_wins() {
    let params = ParameterSet {
        grid_density: 20.0,
        ..ParameterSet::default()
    };
    let frame = MosaicFrame::prepare(0.0, &params, LayerPolicy::Capped);

    let (p, first, last) = sample_grid(48)
        .into_iter()
        .find_map(|p| {
            let hits = hits_in(&frame, p);
            let (&first, &last) = (hits.first()?, hits.last()?);
            let (a, b) = (&frame.cells()[first], &frame.cells()[last]);
            (hits.len() >= 2 && bits(a.color.clamp(0.0, 1.0)) != bits(b.color.clamp(0.0, 1.0)))
                .then_some((p, first, last))
        })
        .expect("dense grid must produce overlapping triangles");

    let winner = frame.cells()[last].color.clamp(0.0, 1.0);
    let loser = frame.cells()[first].color.clamp(0.0, 1.0);
    let got = evaluate(p, 0.0, &params);
    assert_eq!(bits(got), bits(winner));
    assert_ne!(bits(got), bits(loser));

    let hits = collect_hits(p, 0.0, &params);
    assert!(hits.len() >= 2);
    assert!(hits.windows(2).all(|w| w[0].order < w[1].order));
    assert_eq!(hits.last().map(|h| h.order), Some(last));
    assert_eq!(hits.first().map(|h| h.order), Some(first));
}

#[test]
fn pattern_animates_over_time() {
    let params = ParameterSet::footer();
    let a = MosaicFrame::prepare(0.0, &params, LayerPolicy::Capped);
    let b = MosaicFrame::prepare(2.0, &params, LayerPolicy::Capped);
    let changed = sample_grid(16)
        .into_iter()
        .filter(|p| bits(a.shade(*p)) != bits(b.shade(*p)))
        .count();
    assert!(changed > 0, "two seconds apart should differ somewhere");
}

// ── motion and animation ────────────────────────────────────────────────────

const STILL_RADIUS: MotionParams = MotionParams {
    radius_variation: 0.0,
    complexity: 1.0,
};

fn cells_of(kind: MovementKind) -> Vec<Vec2> {
    let mut out = Vec::new();
    for x in 0..24 {
        for y in 0..24 {
            let c = Vec2::new(x as f32, y as f32);
            if movement_kind(c, 0.0) == kind {
                out.push(c);
            }
        }
    }
    assert!(!out.is_empty(), "no {} cell in the sample", kind.label());
    out
}

fn sample_times() -> impl Iterator<Item = f32> {
    (0..200).map(|i| i as f32 * 0.173)
}

/// Animated state with `t == time`, so formulas can be read off directly.
fn unit_speed() -> ParameterSet {
    ParameterSet {
        speed: 1.0,
        rotation_speed: 1.0,
        ..ParameterSet::default()
    }
}

#[test]
fn movement_kinds_have_distinct_labels() {
    let kinds = [
        MovementKind::Circular,
        MovementKind::FigureEight,
        MovementKind::Spiral,
        MovementKind::RandomWalk,
    ];
    for (i, a) in kinds.iter().enumerate() {
        // Every kind shows up somewhere on a modest lattice.
        cells_of(*a);
        for b in &kinds[i + 1..] {
            assert_ne!(a.label(), b.label());
        }
    }
}

#[test]
fn circular_radius_follows_radius_variation() {
    let cells = cells_of(MovementKind::Circular);
    for &c in &cells {
        for t in sample_times() {
            let r = movement(c, 0.0, t, STILL_RADIUS).length();
            // 0.05 base radius, pulsed by +-30%.
            assert!((0.035 - 1e-5..=0.065 + 1e-5).contains(&r), "cell {c:?} t={t}: {r}");
        }
    }

    let wide = MotionParams {
        radius_variation: 1.0,
        complexity: 1.0,
    };
    let mut widest = 0.0f32;
    for &c in &cells {
        for t in sample_times() {
            let r = movement(c, 0.0, t, wide).length();
            assert!(r <= 0.15 * 1.3 + 1e-5, "cell {c:?} t={t}: {r}");
            widest = widest.max(r);
        }
    }
    assert!(widest > 0.07, "radius_variation had no effect ({widest})");
}

#[test]
fn figure_eight_stays_in_its_box() {
    for c in cells_of(MovementKind::FigureEight) {
        for t in sample_times() {
            let m = movement(c, 0.0, t, STILL_RADIUS);
            assert!(m.x.abs() <= 0.08 + 1e-6, "cell {c:?} t={t}: {m:?}");
            assert!(m.y.abs() <= 0.04 + 1e-6, "cell {c:?} t={t}: {m:?}");
        }
    }
}

#[test]
fn spiral_radius_wraps_below_limit() {
    for c in cells_of(MovementKind::Spiral) {
        for t in sample_times().chain([100.0, 1234.5, 5000.0]) {
            let r = movement(c, 0.0, t, STILL_RADIUS).length();
            assert!(r <= 0.08 + 1e-6, "cell {c:?} t={t}: {r}");
        }
    }
}

#[test]
fn random_walk_is_continuous_across_steps() {
    for c in cells_of(MovementKind::RandomWalk) {
        let speed = 0.1 + hash4(c)[2] * 0.5;
        for t in sample_times() {
            let m = movement(c, 0.0, t, STILL_RADIUS);
            assert!(m.x.abs() <= 0.04 + 1e-6 && m.y.abs() <= 0.04 + 1e-6, "{m:?}");
        }
        for k in 1..6 {
            let edge = k as f32 / speed;
            let before = movement(c, 0.0, edge - 1e-3, STILL_RADIUS);
            let after = movement(c, 0.0, edge + 1e-3, STILL_RADIUS);
            assert!((before - after).length() < 1e-3, "jump at step {k} for {c:?}");
        }
    }
}

#[test]
fn movement_scales_with_complexity() {
    let twice = MotionParams {
        radius_variation: 0.4,
        complexity: 2.0,
    };
    let once = MotionParams {
        complexity: 1.0,
        ..twice
    };
    let none = MotionParams {
        complexity: 0.0,
        ..twice
    };
    for x in 0..12 {
        for y in 0..12 {
            let c = Vec2::new(x as f32, y as f32);
            for t in [0.0f32, 0.7, 9.3] {
                assert_eq!(movement(c, 1.0, t, none), Vec2::ZERO);
                let (a, b) = (movement(c, 1.0, t, once), movement(c, 1.0, t, twice));
                assert!((a * 2.0 - b).length() < 1e-6);
            }
        }
    }
}

#[test]
fn layer_drift_is_a_small_sway() {
    assert_eq!(layer_drift(0.0, 0.0), Vec2::new(0.0, 0.015));
    let d = layer_drift(1.0, 0.5);
    assert!((d.x - 2.5f32.sin() * 0.02).abs() < 1e-7);
    assert!((d.y - 2.45f32.cos() * 0.015).abs() < 1e-7);
    for layer in 0..3 {
        for t in sample_times() {
            let d = layer_drift(layer as f32, t);
            assert!(d.x.abs() <= 0.02 && d.y.abs() <= 0.015, "{d:?}");
        }
    }
}

#[test]
fn pulsation_has_a_dramatic_branch() {
    let params = ParameterSet {
        triangle_size: 0.1,
        size_variation: 0.0,
        ..unit_speed()
    };
    // With no size variation the multiplier is 0.5, so half size is 0.05 * pulsation.
    let (mut dramatic, mut regular) = (0, 0);
    for x in 0..16u32 {
        for y in 0..12u32 {
            let sr = hash4(Vec2::new(x as f32, y as f32));
            let pulses: Vec<f32> = (0..140)
                .map(|i| cell_state((x, y), 0, i as f32 * 0.1, &params).half_size / 0.05)
                .collect();
            let lo = pulses.iter().copied().fold(f32::MAX, f32::min);
            let hi = pulses.iter().copied().fold(f32::MIN, f32::max);
            if sr[3] > 0.8 {
                dramatic += 1;
                assert!(lo >= 0.4 - 1e-4 && hi <= 1.6 + 1e-4, "({x},{y}) {lo}..{hi}");
                assert!(lo < 0.5 && hi > 1.5, "({x},{y}) swing too small: {lo}..{hi}");
            } else {
                regular += 1;
                assert!(lo >= 0.8 - 1e-4 && hi <= 1.2 + 1e-4, "({x},{y}) {lo}..{hi}");
            }
        }
    }
    assert!(dramatic > 0 && regular > 0);
}

#[test]
fn rotation_direction_flips_with_hash() {
    let params = unit_speed();
    let (mut cw, mut ccw) = (0, 0);
    for x in 0..12u32 {
        for y in 0..12u32 {
            let (fx, fy) = (x as f32, y as f32);
            let at0 = cell_state((x, y), 0, 0.0, &params).rotation;
            let at1 = cell_state((x, y), 0, 1.0, &params).rotation;
            assert!((at0 - hash(fx * 7.0 + fy * 11.0) * 6.28).abs() < 1e-5);

            let rate = at1 - at0;
            let magnitude = 0.2 + hash(fx + fy) * 1.5;
            assert!((rate.abs() - magnitude).abs() < 1e-4, "({x},{y}) rate {rate}");
            if hash4(Vec2::new(fx, fy))[1] > 0.5 {
                assert!(rate < 0.0, "({x},{y}) should turn clockwise");
                cw += 1;
            } else {
                assert!(rate > 0.0, "({x},{y}) should turn counter-clockwise");
                ccw += 1;
            }
        }
    }
    assert!(cw > 0 && ccw > 0);
}

#[test]
fn origin_cell_state_has_closed_form() {
    // Every hash of cell (0,0) on layer 0 is exactly zero (sin(0) = 0), so:
    // circular motion with speed 0.5, radius 0.05 * (1 + 0.3 sin t), angle 0.5t;
    // offset -0.04; multiplier 0.5, regular pulsation 1 + 0.2 sin t;
    // rotation 0 + t * 0.2; drift (0.02 sin t, 0.015 cos 0.9t).
    let params = ParameterSet {
        triangle_size: 0.1,
        grid_density: 8.0,
        movement_complexity: 1.0,
        ..unit_speed()
    };
    let cs = cell_state((0, 0), 0, 1.0, &params);
    let close = |a: f32, b: f32| (a - b).abs() < 1e-5;

    assert_eq!(cs.base, Vec2::new(-0.5, -0.5));
    assert!(close(cs.movement.x, 0.054_956_03), "{:?}", cs.movement);
    assert!(close(cs.movement.y, 0.030_022_62), "{:?}", cs.movement);
    assert!(close(cs.center.x, -0.468_214_55), "{:?}", cs.center);
    assert!(close(cs.center.y, -0.500_653_23), "{:?}", cs.center);
    assert!(close(cs.half_size, 0.058_414_71), "{}", cs.half_size);
    assert!(close(cs.rotation, 0.2), "{}", cs.rotation);
}
