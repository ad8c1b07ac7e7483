use crate::clock::FrameClock;
use crate::config::{Config, RendererMode, SurfaceMode};
use crate::material::ShadeCtx;
use crate::params::{ParamKey, ParameterStore, params_storage_path, save_params};
use crate::pattern::{LayerPolicy, lattice};
use crate::render::{AsciiRenderer, Frame, HalfBlockRenderer, Renderer};
use crate::surface::FrameRenderer;
use crate::terminal::TerminalGuard;
use anyhow::Context;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Everything the keyboard can change.
struct Controls {
    store: ParameterStore,
    policy: LayerPolicy,
    selected: ParamKey,
    show_hud: bool,
    show_panel: bool,
    show_help: bool,
    status: Option<String>,
    save_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Quit,
    ToggleSurface,
    Relayout,
}

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let params = cfg.initial_params().context("load parameters")?;
    log::info!("starting with {params:?}");

    let mut renderer: Box<dyn Renderer> = match cfg.renderer {
        RendererMode::HalfBlock => Box::new(HalfBlockRenderer::new()),
        RendererMode::Ascii => Box::new(AsciiRenderer::new()),
    };
    let (px_w_mul, px_h_mul) = renderer.cell_pixels();

    let mut last_size = crossterm::terminal::size().context("get terminal size")?;
    if last_size.1 < 2 || last_size.0 < 4 {
        return Err(anyhow::anyhow!(
            "terminal too small (need at least 4x2, got {}x{})",
            last_size.0,
            last_size.1
        ));
    }

    let mut term = TerminalGuard::enter(cfg.sync_updates)?;

    let mut controls = Controls {
        store: ParameterStore::new(params),
        policy: cfg.layers.into(),
        selected: ParamKey::GridDensity,
        show_hud: true,
        show_panel: false,
        show_help: false,
        status: None,
        save_path: cfg.params.clone().or_else(params_storage_path),
    };

    let mut surface = FrameRenderer::new(cfg.surface, cfg.dot);
    let mut hud_rows = hud_rows_for_size(last_size, controls.show_hud);
    resize_surface(&mut surface, last_size, px_w_mul, px_h_mul, hud_rows);

    let mut clock = FrameClock::realtime();
    let mut fps = FpsCounter::new();
    let mut tuning = RuntimeTuning::new(cfg.adaptive);
    let mut last_shade_ms = 0.0f32;
    let target_ms = 1000.0 / cfg.fps.max(1) as f32;

    loop {
        let now = Instant::now();

        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind != KeyEventKind::Release => {
                    match handle_key(k.code, k.modifiers, &mut controls) {
                        KeyOutcome::Quit => return Ok(()),
                        KeyOutcome::ToggleSurface => {
                            surface.set_mode(surface.mode().toggled());
                            log::info!("surface -> {}", surface.mode().label());
                        }
                        KeyOutcome::Relayout => {
                            hud_rows = hud_rows_for_size(last_size, controls.show_hud);
                            resize_surface(&mut surface, last_size, px_w_mul, px_h_mul, hud_rows);
                        }
                        KeyOutcome::Continue => {}
                    }
                }
                Event::Resize(c, r) => {
                    last_size = (c, r);
                    hud_rows = hud_rows_for_size(last_size, controls.show_hud);
                    resize_surface(&mut surface, last_size, px_w_mul, px_h_mul, hud_rows);
                }
                _ => {}
            }
        }

        // Resize events can be missed in some terminals.
        let sz = crossterm::terminal::size()?;
        if sz != last_size {
            last_size = sz;
            hud_rows = hud_rows_for_size(last_size, controls.show_hud);
            resize_surface(&mut surface, last_size, px_w_mul, px_h_mul, hud_rows);
        }

        let (term_cols, term_rows) = last_size;
        let visual_rows = term_rows.saturating_sub(hud_rows).max(1);

        let time = clock.tick();
        let ctx = ShadeCtx {
            time,
            params: controls.store.snapshot(),
            policy: controls.policy,
        };

        let hud = if controls.show_hud {
            build_hud(&ctx, fps.fps(), last_shade_ms, tuning.scale, &surface, renderer.name())
        } else {
            String::new()
        };
        let logo_active = surface.logo_active();
        let mode = surface.mode();

        let shade_start = Instant::now();
        let pixels = surface.render(&ctx, tuning.scale);
        last_shade_ms = shade_start.elapsed().as_secs_f32() * 1000.0;
        let (w, h) = (
            (term_cols as usize) * px_w_mul,
            (visual_rows as usize) * px_h_mul,
        );

        let panel = if controls.show_help {
            Some(help_popup_text().to_string())
        } else if controls.show_panel {
            Some(build_panel(&controls, mode, logo_active))
        } else {
            None
        };

        let frame = Frame {
            term_cols,
            term_rows,
            visual_rows,
            pixel_width: w,
            pixel_height: h,
            pixels_rgba: pixels,
            hud: &hud,
            hud_rows,
            overlay: panel.as_deref(),
            sync_updates: cfg.sync_updates,
        };
        renderer.render(&frame, term.out())?;

        let total_ms = now.elapsed().as_secs_f32() * 1000.0;
        fps.tick();
        tuning.update(total_ms, target_ms);

        let target = Duration::from_secs_f32(target_ms / 1000.0);
        let elapsed = now.elapsed();
        if elapsed < target {
            std::thread::sleep(target - elapsed);
        }
    }
}

fn resize_surface(
    surface: &mut FrameRenderer,
    size: (u16, u16),
    px_w_mul: usize,
    px_h_mul: usize,
    hud_rows: u16,
) {
    let (cols, rows) = size;
    let visual_rows = rows.saturating_sub(hud_rows).max(1);
    surface.resize(
        (cols as usize).saturating_mul(px_w_mul),
        (visual_rows as usize).saturating_mul(px_h_mul),
    );
}

fn handle_key(code: KeyCode, mods: KeyModifiers, c: &mut Controls) -> KeyOutcome {
    if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
        return KeyOutcome::Quit;
    }
    let coarse = if mods.contains(KeyModifiers::SHIFT) { 10 } else { 1 };

    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return KeyOutcome::Quit,
        KeyCode::Up => {
            c.selected = c.selected.prev();
            c.show_panel = true;
        }
        KeyCode::Down => {
            c.selected = c.selected.next();
            c.show_panel = true;
        }
        KeyCode::Left => {
            let v = c.store.nudge(c.selected, -coarse);
            log::debug!("{} -> {v}", c.selected.name());
            c.show_panel = true;
        }
        KeyCode::Right => {
            let v = c.store.nudge(c.selected, coarse);
            log::debug!("{} -> {v}", c.selected.name());
            c.show_panel = true;
        }
        KeyCode::Char('r') => c.store.reset(c.selected),
        KeyCode::Char('R') => {
            c.store.reset_all();
            c.status = Some("all parameters reset".to_string());
        }
        KeyCode::Char('w') | KeyCode::Char('W') => {
            c.status = Some(save_current(c));
            c.show_panel = true;
        }
        KeyCode::Char('l') | KeyCode::Char('L') => {
            c.policy = c.policy.toggled();
            log::info!("layer policy -> {}", c.policy.label());
        }
        KeyCode::Char('m') | KeyCode::Char('M') => return KeyOutcome::ToggleSurface,
        KeyCode::Char('i') | KeyCode::Char('I') => {
            c.show_hud = !c.show_hud;
            return KeyOutcome::Relayout;
        }
        KeyCode::Char('p') | KeyCode::Char('P') => {
            c.show_panel = !c.show_panel;
            if c.show_panel {
                c.show_help = false;
            }
        }
        KeyCode::Char('?') | KeyCode::Char('h') | KeyCode::F(1) | KeyCode::Tab => {
            c.show_help = !c.show_help;
        }
        _ => {}
    }
    KeyOutcome::Continue
}

fn save_current(c: &Controls) -> String {
    let Some(path) = c.save_path.as_deref() else {
        return "no config directory; pass --params to save".to_string();
    };
    match save_params(path, &c.store.snapshot()) {
        Ok(()) => format!("saved {}", path.display()),
        Err(err) => {
            log::warn!("saving parameters failed: {err}");
            format!("save failed: {err}")
        }
    }
}

fn hud_rows_for_size(size: (u16, u16), show_hud: bool) -> u16 {
    if show_hud && size.1 >= 4 { 1 } else { 0 }
}

fn build_hud(
    ctx: &ShadeCtx,
    fps: f32,
    shade_ms: f32,
    scale: usize,
    surface: &FrameRenderer,
    renderer: &str,
) -> String {
    let p = &ctx.params;
    let (cols, rows) = lattice(p.grid_density);
    let drawn = ctx.policy.layer_count(p.num_layers);
    let mut s = String::new();
    let _ = write!(
        s,
        "t {:6.1}s | grid {}x{} | layers {} ({} {} drawn) | fps {:4.1} | shade {:5.1}ms x{} | {} {}{} | ? help",
        ctx.time,
        cols,
        rows,
        p.num_layers,
        ctx.policy.label(),
        drawn,
        fps,
        shade_ms,
        scale,
        surface.mode().label(),
        renderer,
        if surface.mode() == SurfaceMode::Logo && !surface.logo_active() {
            " (too small)"
        } else {
            ""
        },
    );
    s
}

fn build_panel(c: &Controls, mode: SurfaceMode, logo_active: bool) -> String {
    let mut s = String::from("Parameters");
    for key in ParamKey::ALL {
        let spec = key.spec();
        let marker = if key == c.selected { '>' } else { ' ' };
        let v = c.store.get(key);
        let value = if spec.integral {
            format!("{}", v as i64)
        } else {
            format!("{v:.3}")
        };
        let _ = write!(
            s,
            "\n{marker} {:<20} {:>7}  [{} .. {}]",
            key.name(),
            value,
            spec.min,
            spec.max
        );
    }
    let _ = write!(
        s,
        "\n  layers {}  surface {}{}",
        c.policy.label(),
        mode.label(),
        if logo_active || mode != SurfaceMode::Logo { "" } else { " (disabled)" }
    );
    if let Some(status) = &c.status {
        let _ = write!(s, "\n  {status}");
    }
    s
}

fn help_popup_text() -> &'static str {
    "Keys\n\
up/down      select parameter\n\
left/right   adjust (shift: x10)\n\
r / R        reset selected / all\n\
w            save parameters\n\
l            toggle layer cap\n\
m            logo / full surface\n\
p            parameter panel\n\
i            HUD\n\
? or h       this help\n\
q or esc     quit"
}

struct FpsCounter {
    last: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last: Instant::now(),
            frames: 0,
            fps: 0.0,
        }
    }

    fn tick(&mut self) {
        self.frames += 1;
        let dt = self.last.elapsed().as_secs_f32();
        if dt >= 0.5 {
            self.fps = self.frames as f32 / dt;
            self.frames = 0;
            self.last = Instant::now();
        }
    }

    fn fps(&self) -> f32 {
        self.fps
    }
}

/// Adaptive block downscale: coarser shading when frames run long, back to
/// full resolution once there is headroom.
struct RuntimeTuning {
    scale: usize,
    adaptive: bool,
    ema_ms: f32,
}

const MAX_SCALE: usize = 4;

impl RuntimeTuning {
    fn new(adaptive: bool) -> Self {
        Self {
            scale: 1,
            adaptive,
            ema_ms: 0.0,
        }
    }

    fn update(&mut self, frame_ms: f32, target_ms: f32) {
        if !self.adaptive {
            return;
        }
        self.ema_ms = if self.ema_ms == 0.0 {
            frame_ms
        } else {
            self.ema_ms * 0.9 + frame_ms * 0.1
        };

        if self.ema_ms > target_ms * 1.22 && self.scale < MAX_SCALE {
            self.scale += 1;
            // Let the average settle at the new scale before judging again.
            self.ema_ms = 0.0;
            log::debug!("shading scale -> {}", self.scale);
        } else if self.ema_ms < target_ms * 0.45 && self.scale > 1 {
            self.scale -= 1;
            self.ema_ms = 0.0;
            log::debug!("shading scale -> {}", self.scale);
        }
    }
}
