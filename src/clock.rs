use std::time::Instant;

/// Elapsed animation time. Only ever moves forward; a fresh clock is the
/// only way back to zero.
#[derive(Debug, Clone)]
pub struct FrameClock {
    source: ClockSource,
    elapsed: f32,
    frame: u64,
}

#[derive(Debug, Clone, Copy)]
enum ClockSource {
    Realtime { start: Instant },
    Stepped { fps: u32 },
}

impl FrameClock {
    /// Wall-clock time since construction.
    pub fn realtime() -> Self {
        Self {
            source: ClockSource::Realtime {
                start: Instant::now(),
            },
            elapsed: 0.0,
            frame: 0,
        }
    }

    /// `frame / fps`, independent of how long frames take to produce. Used by
    /// offline export so output is reproducible.
    pub fn stepped(fps: u32) -> Self {
        Self {
            source: ClockSource::Stepped { fps: fps.max(1) },
            elapsed: 0.0,
            frame: 0,
        }
    }

    /// Advance one frame and return the new elapsed time in seconds.
    pub fn tick(&mut self) -> f32 {
        let next = match self.source {
            ClockSource::Realtime { start } => start.elapsed().as_secs_f32(),
            ClockSource::Stepped { fps } => self.frame as f32 / fps as f32,
        };
        self.frame += 1;
        self.elapsed = self.elapsed.max(next);
        self.elapsed
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Frames ticked so far.
    pub fn frames(&self) -> u64 {
        self.frame
    }
}
