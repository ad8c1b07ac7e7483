use crate::config::{DotColor, SurfaceMode};
use crate::logo::{LogoLayout, Region};
use crate::material::{Material, ShadeCtx, SolidColor, TriangleMosaic};
use crate::pattern::math::{Rgb, Vec2, clamp};

/// Page colour behind the wordmark.
pub const DEFAULT_BACKDROP: Rgb = Rgb::WHITE;

/// Owns the RGBA frame buffer and turns a [`ShadeCtx`] into pixels.
pub struct FrameRenderer {
    mode: SurfaceMode,
    mosaic: TriangleMosaic,
    accent: SolidColor,
    backdrop: Rgb,
    layout: Option<LogoLayout>,
    w: usize,
    h: usize,
    buf: Vec<u8>,
}

impl FrameRenderer {
    pub fn new(mode: SurfaceMode, dot: DotColor) -> Self {
        Self {
            mode,
            mosaic: TriangleMosaic::new(),
            accent: dot.material(),
            backdrop: DEFAULT_BACKDROP,
            layout: None,
            w: 0,
            h: 0,
            buf: Vec::new(),
        }
    }

    pub fn with_backdrop(mut self, backdrop: Rgb) -> Self {
        self.backdrop = backdrop;
        self
    }

    pub fn mode(&self) -> SurfaceMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SurfaceMode) {
        if mode != self.mode {
            self.mode = mode;
            self.relayout();
        }
    }

    pub fn size(&self) -> (usize, usize) {
        (self.w, self.h)
    }

    /// Whether the wordmark could be laid out at the current size.
    pub fn logo_active(&self) -> bool {
        self.layout.is_some()
    }

    pub fn resize(&mut self, w: usize, h: usize) {
        if (w, h) == (self.w, self.h) && !self.buf.is_empty() {
            return;
        }
        self.w = w;
        self.h = h;
        self.buf = vec![0u8; w.saturating_mul(h).saturating_mul(4)];
        self.relayout();
    }

    fn relayout(&mut self) {
        if self.mode != SurfaceMode::Logo {
            self.layout = None;
            return;
        }
        self.layout = match LogoLayout::fit(self.w, self.h) {
            Ok(layout) => {
                log::debug!("logo layout {}x{} module {:.2}px", self.w, self.h, layout.module());
                Some(layout)
            }
            Err(err) => {
                // The wordmark is lost but the host keeps drawing the backdrop.
                log::warn!("logo disabled: {err}");
                None
            }
        };
    }

    /// Render one frame. `scale > 1` shades one sample per `scale x scale` block.
    pub fn render(&mut self, ctx: &ShadeCtx, scale: usize) -> &[u8] {
        let (w, h) = (self.w, self.h);
        if w == 0 || h == 0 {
            return &self.buf;
        }
        let scale = scale.max(1);
        self.mosaic.begin_frame(ctx);
        let opacity = clamp(ctx.params.opacity, 0.0, 1.0);

        for by in (0..h).step_by(scale) {
            for bx in (0..w).step_by(scale) {
                let c = self.sample(bx, by, opacity);
                let px = [c[0], c[1], c[2], 255];
                for y in by..(by + scale).min(h) {
                    let row = y * w;
                    for x in bx..(bx + scale).min(w) {
                        let i = (row + x) * 4;
                        self.buf[i..i + 4].copy_from_slice(&px);
                    }
                }
            }
        }
        &self.buf
    }

    fn sample(&self, x: usize, y: usize, opacity: f32) -> [u8; 3] {
        match self.mode {
            SurfaceMode::Full => {
                let uv = Vec2::new(
                    (x as f32 + 0.5) / self.w as f32,
                    1.0 - (y as f32 + 0.5) / self.h as f32,
                );
                self.mosaic.shade(uv).to_u8()
            }
            SurfaceMode::Logo => {
                let Some(layout) = self.layout else {
                    return self.backdrop.to_u8();
                };
                match layout.region_at(x, y) {
                    Region::Mosaic(uv) => self.backdrop.mix(self.mosaic.shade(uv), opacity).to_u8(),
                    Region::Accent => self.accent.shade(Vec2::ZERO).to_u8(),
                    Region::Backdrop => self.backdrop.to_u8(),
                }
            }
        }
    }
}
