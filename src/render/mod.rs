mod ascii;
mod halfblock;

pub use ascii::AsciiRenderer;
pub use halfblock::HalfBlockRenderer;

use std::io::Write;

pub struct Frame<'a> {
    pub term_cols: u16,
    pub term_rows: u16,
    pub visual_rows: u16,
    pub pixel_width: usize,
    pub pixel_height: usize,
    pub pixels_rgba: &'a [u8],
    pub hud: &'a str,
    pub hud_rows: u16,
    /// Boxed text drawn on top (parameter panel, help).
    pub overlay: Option<&'a str>,
    pub sync_updates: bool,
}

pub trait Renderer {
    fn name(&self) -> &'static str;
    /// Pixels per terminal cell, `(x, y)`.
    fn cell_pixels(&self) -> (usize, usize);
    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()>;
}

/// Checks shared by all renderers. Returns `false` when there is nothing
/// sensible to draw.
fn frame_fits(frame: &Frame<'_>, px_per_col: usize, px_per_row: usize) -> bool {
    let cols = frame.term_cols as usize;
    let rows = frame.visual_rows as usize;
    if cols == 0 || rows == 0 || frame.pixel_width == 0 || frame.pixel_height == 0 {
        return false;
    }
    if frame.pixel_width != cols * px_per_col || frame.pixel_height != rows * px_per_row {
        return false;
    }
    let need = frame.pixel_width * frame.pixel_height * 4;
    frame.pixels_rgba.len() >= need
}

fn begin(frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
    if frame.sync_updates {
        out.write_all(b"\x1b[?2026h")?;
    }
    // Home, reset, autowrap off so full-width rows never wrap.
    out.write_all(b"\x1b[H\x1b[0m\x1b[?7l")?;
    Ok(())
}

fn finish(frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
    let cols = frame.term_cols as usize;
    let mut hud_lines = frame.hud.lines();
    for i in 0..(frame.hud_rows as usize) {
        write!(out, "\x1b[{};1H\x1b[0m\x1b[2K", frame.visual_rows as usize + i + 1)?;
        if let Some(line) = hud_lines.next() {
            let clipped: String = line.chars().take(cols).collect();
            out.write_all(clipped.as_bytes())?;
        }
    }

    if let Some(text) = frame.overlay {
        draw_overlay_popup(out, frame.term_cols, frame.term_rows, text)?;
    }

    out.write_all(b"\x1b[0m\x1b[?7h")?;
    if frame.sync_updates {
        out.write_all(b"\x1b[?2026l")?;
    }
    out.flush()?;
    Ok(())
}

pub(crate) fn luma_u8(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * 54 + g as u32 * 183 + b as u32 * 19) >> 8) as u8
}

/// Draw `text` in a bordered box anchored to the top-left of the visual
/// area. The first line is the title.
pub fn draw_overlay_popup(
    out: &mut dyn Write,
    term_cols: u16,
    term_rows: u16,
    text: &str,
) -> anyhow::Result<()> {
    let cols = term_cols as usize;
    let rows = term_rows as usize;
    if text.trim().is_empty() || cols < 8 || rows < 4 {
        return Ok(());
    }

    let max_inner_w = cols.saturating_sub(4).max(1);
    let lines: Vec<String> = text
        .lines()
        .map(|l| l.chars().take(max_inner_w).collect())
        .collect();
    let body_h = lines.len().min(rows.saturating_sub(2).max(1));
    let inner_w = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(1, max_inner_w);

    let horiz = "-".repeat(inner_w + 2);
    out.write_all(b"\x1b[0m\x1b[38;2;236;242;255m\x1b[48;2;10;14;24m")?;
    write!(out, "\x1b[1;1H+{horiz}+")?;
    for (i, line) in lines.iter().take(body_h).enumerate() {
        let pad = inner_w.saturating_sub(line.chars().count());
        write!(out, "\x1b[{};1H| ", i + 2)?;
        if i == 0 {
            write!(out, "\x1b[1m\x1b[38;2;255;236;160m{line}\x1b[22m\x1b[38;2;236;242;255m")?;
        } else {
            out.write_all(line.as_bytes())?;
        }
        write!(out, "{} |", " ".repeat(pad))?;
    }
    write!(out, "\x1b[{};1H+{horiz}+", body_h + 2)?;
    out.write_all(b"\x1b[0m")?;
    Ok(())
}
