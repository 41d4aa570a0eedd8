use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{bail, Result};

use crate::annotate::Annotator;
use crate::detect::Detector;
use crate::ingest::FrameSource;
use crate::playback::keys::KeyCommand;
use crate::playback::speed::SpeedController;
use crate::playback::timer::FrameTimer;
use crate::render::Renderer;
use crate::{DEFAULT_WINDOW_NAME, LIVE_CONFIDENCE_THRESHOLD};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerState {
    Running,
    Terminated,
}

/// Why playback stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminationReason {
    EndOfStream,
    Quit,
    Interrupted,
}

impl std::fmt::Display for TerminationReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::EndOfStream => "end of stream",
            Self::Quit => "quit requested",
            Self::Interrupted => "interrupted",
        };
        f.write_str(text)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaybackSummary {
    pub frames_shown: u64,
    pub reason: TerminationReason,
    pub final_speed: f64,
}

/// Releases the frame source and the render surface when dropped, whichever
/// way the loop body exits.
struct ReleaseGuard<'a, S: FrameSource, R: Renderer> {
    source: &'a mut S,
    renderer: &'a mut R,
}

impl<S: FrameSource, R: Renderer> Drop for ReleaseGuard<'_, S, R> {
    fn drop(&mut self) {
        self.source.close();
        self.renderer.close_all();
        log::debug!("player: released frame source and render surface");
    }
}

/// The frame-pacing loop.
///
/// Each tick reads a frame, runs the detector, draws detections and the status
/// overlay, shows the frame and then waits for a key for one frame period at
/// the current speed. The source and renderer are released exactly once when
/// [`Player::run`] returns, including on error or panic.
pub struct Player<S: FrameSource, D: Detector, R: Renderer> {
    source: S,
    detector: D,
    renderer: R,
    annotator: Annotator,
    speed: SpeedController,
    window: String,
    threshold: f32,
    interrupt: Arc<AtomicBool>,
    state: PlayerState,
}

impl<S: FrameSource, D: Detector, R: Renderer> Player<S, D, R> {
    pub fn new(source: S, detector: D, renderer: R) -> Self {
        Self {
            source,
            detector,
            renderer,
            annotator: Annotator::default(),
            speed: SpeedController::new(),
            window: DEFAULT_WINDOW_NAME.to_string(),
            threshold: LIVE_CONFIDENCE_THRESHOLD,
            interrupt: Arc::new(AtomicBool::new(false)),
            state: PlayerState::Running,
        }
    }

    pub fn with_annotator(mut self, annotator: Annotator) -> Self {
        self.annotator = annotator;
        self
    }

    pub fn with_speed(mut self, speed: SpeedController) -> Self {
        self.speed = speed;
        self
    }

    pub fn with_window(mut self, window: impl Into<String>) -> Self {
        self.window = window.into();
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    /// Share an existing stop flag instead of the player's own.
    pub fn with_interrupt(mut self, flag: Arc<AtomicBool>) -> Self {
        self.interrupt = flag;
        self
    }

    /// Flag checked at the top of every tick; setting it stops playback.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    pub fn state(&self) -> PlayerState {
        self.state
    }

    pub fn speed(&self) -> f64 {
        self.speed.current()
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn detector(&self) -> &D {
        &self.detector
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Play until end of stream, quit or interrupt.
    ///
    /// Detector and renderer errors end playback and are returned after the
    /// source and renderer have been released.
    pub fn run(&mut self) -> Result<PlaybackSummary> {
        if self.state == PlayerState::Terminated {
            bail!("player has already terminated");
        }
        let result = self.drive();
        self.state = PlayerState::Terminated;

        if let Ok(summary) = &result {
            log::info!(
                "playback finished ({}): {} frames shown, final speed {:.1}x",
                summary.reason,
                summary.frames_shown,
                summary.final_speed
            );
        }
        result
    }

    fn drive(&mut self) -> Result<PlaybackSummary> {
        let session = self.source.session();
        let timer = FrameTimer::new(session.fps);
        log::info!("video properties: {}", session);
        log::info!(
            "playing with detector '{}' at speed {:.1}x, threshold {:.2}",
            self.detector.name(),
            self.speed.current(),
            self.threshold
        );

        let mut guard = ReleaseGuard {
            source: &mut self.source,
            renderer: &mut self.renderer,
        };
        let mut frames_shown = 0u64;

        let reason = loop {
            if self.interrupt.load(Ordering::SeqCst) {
                log::info!("interrupt received, stopping playback");
                break TerminationReason::Interrupted;
            }

            let Some(mut frame) = guard.source.read()? else {
                break TerminationReason::EndOfStream;
            };

            let detections = self.detector.detect(&frame, self.threshold)?;
            let detector = &self.detector;
            self.annotator.annotate(&mut frame, &detections, self.threshold, |id| {
                detector.class_name(id).to_string()
            });
            self.annotator.draw_status(&mut frame, self.speed.current());

            guard.renderer.show(&self.window, &frame)?;
            frames_shown += 1;

            let wait = timer.delay_ms(self.speed.current());
            let Some(key) = guard.renderer.poll_key(wait)? else {
                continue;
            };
            match KeyCommand::from_key(key) {
                Some(KeyCommand::Quit) => break TerminationReason::Quit,
                Some(KeyCommand::SpeedUp) => {
                    log::info!("speed increased to {:.1}x", self.speed.increase());
                }
                Some(KeyCommand::SpeedDown) => {
                    log::info!("speed decreased to {:.1}x", self.speed.decrease());
                }
                None => {}
            }
        };
        drop(guard);

        Ok(PlaybackSummary {
            frames_shown,
            reason,
            final_speed: self.speed.current(),
        })
    }
}
