use crate::render::{Frame, Renderer, begin, finish, frame_fits};
use std::io::Write;

/// Two pixels per cell: the upper half block takes the top pixel as
/// foreground and the bottom pixel as background.
pub struct HalfBlockRenderer {
    last_fg: Option<[u8; 3]>,
    last_bg: Option<[u8; 3]>,
}

impl HalfBlockRenderer {
    pub fn new() -> Self {
        Self {
            last_fg: None,
            last_bg: None,
        }
    }
}

impl Default for HalfBlockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

const HALF_BLOCK: char = '\u{2580}';

impl Renderer for HalfBlockRenderer {
    fn name(&self) -> &'static str {
        "halfblock"
    }

    fn cell_pixels(&self) -> (usize, usize) {
        (1, 2)
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        if !frame_fits(frame, 1, 2) {
            return Ok(());
        }
        let w = frame.pixel_width;
        let px = frame.pixels_rgba;
        let rgb = |i: usize| [px[i], px[i + 1], px[i + 2]];

        begin(frame, out)?;
        self.last_fg = None;
        self.last_bg = None;

        for row in 0..frame.visual_rows as usize {
            let top = row * 2 * w;
            let bot = top + w;
            for x in 0..w {
                let fg = rgb((top + x) * 4);
                let bg = rgb((bot + x) * 4);
                if self.last_fg != Some(fg) {
                    write!(out, "\x1b[38;2;{};{};{}m", fg[0], fg[1], fg[2])?;
                    self.last_fg = Some(fg);
                }
                if self.last_bg != Some(bg) {
                    write!(out, "\x1b[48;2;{};{};{}m", bg[0], bg[1], bg[2])?;
                    self.last_bg = Some(bg);
                }
                write!(out, "{HALF_BLOCK}")?;
            }
            out.write_all(b"\r\n")?;
        }

        finish(frame, out)
    }
}
