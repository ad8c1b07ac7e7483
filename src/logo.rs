//! Glyph layout for the "SO." wordmark.
//!
//! Letters come from a tiny built-in 5x7 bitmap font. The two letters carry
//! the mosaic material with one UV space spanning both (so the pattern flows
//! across the gap like it would over a text mesh); the trailing dot is the
//! accent marker.

use crate::pattern::math::Vec2;
use std::fmt;

const GLYPH_ROWS: usize = 7;

const GLYPH_S: [&str; GLYPH_ROWS] = [
    ".###.", //
    "#...#", //
    "#....", //
    ".###.", //
    "....#", //
    "#...#", //
    ".###.", //
];

const GLYPH_O: [&str; GLYPH_ROWS] = [
    ".###.", //
    "#...#", //
    "#...#", //
    "#...#", //
    "#...#", //
    "#...#", //
    ".###.", //
];

const GLYPH_DOT: [&str; GLYPH_ROWS] = [
    "..", //
    "..", //
    "..", //
    "..", //
    "..", //
    "##", //
    "##", //
];

/// Column span `[start, end)` of each glyph in module units.
const S_COLS: (usize, usize) = (0, 5);
const O_COLS: (usize, usize) = (6, 11);
const DOT_COLS: (usize, usize) = (12, 14);
const TEXT_COLS: usize = 14;
/// Width of the letter block the mosaic UVs span.
const LETTER_COLS: usize = 11;
const MARGIN: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Region {
    /// Inside a letter; UV across the letter block, `v` pointing up.
    Mosaic(Vec2),
    Accent,
    Backdrop,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    TooSmall { w: usize, h: usize, need_w: usize, need_h: usize },
}

impl fmt::Display for LayoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooSmall {
                w,
                h,
                need_w,
                need_h,
            } => write!(f, "surface {w}x{h} too small for logo (need at least {need_w}x{need_h})"),
        }
    }
}

impl std::error::Error for LayoutError {}

/// The wordmark fitted and centered into a `w x h` pixel surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LogoLayout {
    module: f32,
    origin_x: f32,
    origin_y: f32,
}

impl LogoLayout {
    pub const MIN_WIDTH: usize = TEXT_COLS + 2 * MARGIN;
    pub const MIN_HEIGHT: usize = GLYPH_ROWS + 2 * MARGIN;

    pub fn fit(w: usize, h: usize) -> Result<Self, LayoutError> {
        let module = (w as f32 / Self::MIN_WIDTH as f32).min(h as f32 / Self::MIN_HEIGHT as f32);
        if module < 1.0 {
            return Err(LayoutError::TooSmall {
                w,
                h,
                need_w: Self::MIN_WIDTH,
                need_h: Self::MIN_HEIGHT,
            });
        }
        let text_w = TEXT_COLS as f32 * module;
        let text_h = GLYPH_ROWS as f32 * module;
        Ok(Self {
            module,
            origin_x: (w as f32 - text_w) * 0.5,
            origin_y: (h as f32 - text_h) * 0.5,
        })
    }

    /// Pixel size of one font module.
    pub fn module(&self) -> f32 {
        self.module
    }

    /// Classify the pixel at `(x, y)` (top-left origin), sampled at its center.
    pub fn region_at(&self, x: usize, y: usize) -> Region {
        let gx = (x as f32 + 0.5 - self.origin_x) / self.module;
        let gy = (y as f32 + 0.5 - self.origin_y) / self.module;
        if gx < 0.0 || gy < 0.0 {
            return Region::Backdrop;
        }
        let col = gx as usize;
        let row = gy as usize;
        if col >= TEXT_COLS || row >= GLYPH_ROWS {
            return Region::Backdrop;
        }

        let mosaic = || {
            Region::Mosaic(Vec2::new(
                gx / LETTER_COLS as f32,
                1.0 - gy / GLYPH_ROWS as f32,
            ))
        };

        if let Some(c) = local_col(col, S_COLS) {
            if lit(&GLYPH_S, row, c) {
                return mosaic();
            }
        } else if let Some(c) = local_col(col, O_COLS) {
            if lit(&GLYPH_O, row, c) {
                return mosaic();
            }
        } else if let Some(c) = local_col(col, DOT_COLS) {
            if lit(&GLYPH_DOT, row, c) {
                return Region::Accent;
            }
        }
        Region::Backdrop
    }
}

fn local_col(col: usize, span: (usize, usize)) -> Option<usize> {
    (span.0..span.1).contains(&col).then(|| col - span.0)
}

fn lit(glyph: &[&str; GLYPH_ROWS], row: usize, col: usize) -> bool {
    glyph[row].as_bytes().get(col) == Some(&b'#')
}
