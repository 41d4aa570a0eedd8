/// Rate assumed when a source reports an unusable FPS.
pub const NOMINAL_FPS: f64 = 30.0;

fn usable(fps: f64) -> bool {
    fps.is_finite() && fps > 0.0
}

/// Per-frame wait in milliseconds for `fps` played at `speed`.
///
/// Unusable FPS (zero, negative, NaN, infinite) falls back to
/// [`NOMINAL_FPS`]. The result is never below 1 ms: a zero timeout means
/// "wait forever" to window-system key polls.
pub fn delay_ms(fps: f64, speed: f64) -> u64 {
    let fps = if usable(fps) { fps } else { NOMINAL_FPS };
    let delay = (1000.0 / (fps * speed)).round();
    if delay.is_finite() && delay >= 1.0 {
        delay as u64
    } else {
        1
    }
}

/// Frame pacing for one session. Validates the source FPS once.
#[derive(Clone, Copy, Debug)]
pub struct FrameTimer {
    fps: f64,
    fallback: bool,
}

impl FrameTimer {
    pub fn new(fps: f64) -> Self {
        let fallback = !usable(fps);
        if fallback {
            log::warn!(
                "source reported unusable fps {}; pacing at a nominal {} fps",
                fps,
                NOMINAL_FPS
            );
        }
        Self { fps, fallback }
    }

    pub fn delay_ms(&self, speed: f64) -> u64 {
        delay_ms(self.fps, speed)
    }

    pub fn uses_fallback(&self) -> bool {
        self.fallback
    }
}
