/// Slowest allowed playback multiplier.
pub const MIN_SPEED: f64 = 0.1;
/// Fastest allowed playback multiplier.
pub const MAX_SPEED: f64 = 2.0;
/// Speed at session start.
pub const INITIAL_SPEED: f64 = 0.5;
/// Change applied per key press.
pub const SPEED_STEP: f64 = 0.1;

/// Mutable playback state for one session.
///
/// `speed` always lies in `[MIN_SPEED, MAX_SPEED]`; only [`SpeedController`]
/// changes it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackState {
    pub speed: f64,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            speed: INITIAL_SPEED,
        }
    }
}

/// Owns the playback speed and keeps it inside the allowed range.
#[derive(Clone, Debug, Default)]
pub struct SpeedController {
    state: PlaybackState,
}

impl SpeedController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at `speed`, clamped into range. Non-finite input keeps the
    /// initial speed.
    pub fn with_speed(speed: f64) -> Self {
        let speed = if speed.is_finite() {
            speed.clamp(MIN_SPEED, MAX_SPEED)
        } else {
            INITIAL_SPEED
        };
        Self {
            state: PlaybackState { speed },
        }
    }

    pub fn increase(&mut self) -> f64 {
        self.state.speed = (self.state.speed + SPEED_STEP).min(MAX_SPEED);
        self.state.speed
    }

    pub fn decrease(&mut self) -> f64 {
        self.state.speed = (self.state.speed - SPEED_STEP).max(MIN_SPEED);
        self.state.speed
    }

    pub fn current(&self) -> f64 {
        self.state.speed
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }
}
