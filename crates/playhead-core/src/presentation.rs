//! Presentation state machine
//!
//! UI-facing playback state, driven exclusively by events the media
//! surface itself reports plus the engine's fault channel. The machine
//! never asserts a state the surface has not confirmed, so the transport
//! controls cannot diverge from the engine. All mutation funnels through
//! [`PresentationMachine::apply`].

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, trace, warn};

use crate::types::{PresentationState, PresentationStatus};

/// Events reported by the media surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MediaEvent {
    Play,
    Playing,
    Pause,
    Waiting,
    TimeUpdate { seconds: f64 },
    DurationChange { seconds: f64 },
    VolumeChange { volume: f64, muted: bool },
    RateChange { rate: f64 },
    FullscreenChange { active: bool },
}

/// Presentation state machine with watch-channel broadcast
pub struct PresentationMachine {
    state: PresentationState,
    state_tx: watch::Sender<PresentationState>,
}

impl PresentationMachine {
    pub fn new(is_live: bool) -> Self {
        let state = PresentationState {
            is_live,
            ..PresentationState::default()
        };
        let (state_tx, _) = watch::channel(state.clone());
        Self { state, state_tx }
    }

    pub fn state(&self) -> &PresentationState {
        &self.state
    }

    /// Subscribe to state snapshots (transport-control surface)
    pub fn subscribe(&self) -> watch::Receiver<PresentationState> {
        self.state_tx.subscribe()
    }

    /// Single mutation entry point for media-surface events
    pub fn apply(&mut self, event: MediaEvent) {
        trace!(?event, status = %self.state.status, "Media event");
        match event {
            MediaEvent::Play | MediaEvent::Playing => {
                self.transition(PresentationStatus::Playing);
            }
            MediaEvent::Pause => {
                self.transition(PresentationStatus::Paused);
            }
            MediaEvent::Waiting => {
                self.transition(PresentationStatus::Buffering);
            }
            MediaEvent::TimeUpdate { seconds } => {
                self.state.current_time = seconds;
                self.publish();
            }
            MediaEvent::DurationChange { seconds } => {
                self.state.duration = seconds;
                self.publish();
            }
            MediaEvent::VolumeChange { volume, muted } => {
                self.state.volume = volume;
                self.state.muted = muted;
                self.publish();
            }
            MediaEvent::RateChange { rate } => {
                self.state.playback_rate = rate;
                self.publish();
            }
            MediaEvent::FullscreenChange { active } => {
                self.state.is_fullscreen = active;
                self.publish();
            }
        }
    }

    /// Enter the error state with a user-facing message. The caller must
    /// have requested engine teardown before this is observed.
    pub fn fault(&mut self, message: impl Into<String>) {
        self.state.status = PresentationStatus::Error;
        self.state.error_message = Some(message.into());
        self.publish();
    }

    /// Leave the error state for a user-initiated retry, or reset for a
    /// fresh load
    pub fn begin_loading(&mut self) {
        self.state.status = PresentationStatus::Loading;
        self.state.error_message = None;
        self.publish();
    }

    fn transition(&mut self, target: PresentationStatus) {
        let current = self.state.status;
        if current == target {
            return;
        }
        if !current.can_transition_to(target) {
            // Media surfaces replay events out of order around seeks;
            // ignore rather than corrupt the state.
            warn!(from = %current, to = %target, "Ignoring invalid presentation transition");
            return;
        }
        self.state.status = target;
        debug!(from = %current, to = %target, "Presentation transition");
        self.publish();
    }

    fn publish(&self) {
        let _ = self.state_tx.send(self.state.clone());
    }
}

/// Auto-hide clock for the transport-control overlay.
///
/// Any activity resets a 5-second inactivity window; on expiry the
/// overlay fades but stays mounted. Deadline-based so tests inject
/// synthetic instants and the controller arms a real timer from
/// [`OverlayTimer::deadline`].
#[derive(Debug, Clone, Copy)]
pub struct OverlayTimer {
    last_activity: Instant,
    timeout: Duration,
}

impl OverlayTimer {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn new(now: Instant) -> Self {
        Self {
            last_activity: now,
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Pointer movement, touch start, or control interaction
    pub fn activity(&mut self, now: Instant) {
        self.last_activity = now;
    }

    pub fn visible(&self, now: Instant) -> bool {
        now.duration_since(self.last_activity) < self.timeout
    }

    pub fn deadline(&self) -> Instant {
        self.last_activity + self.timeout
    }
}
