//! Interactive playback: speed control, frame pacing, key bindings and the
//! player loop.

mod keys;
mod player;
mod speed;
mod startup;
mod timer;

pub use keys::KeyCommand;
pub use player::{PlaybackSummary, Player, PlayerState, TerminationReason};
pub use speed::{PlaybackState, SpeedController, INITIAL_SPEED, MAX_SPEED, MIN_SPEED, SPEED_STEP};
pub use startup::{prepare_player, FilePlayer};
pub use timer::{delay_ms, FrameTimer, NOMINAL_FPS};
