//! Gesture and shortcut dispatch
//!
//! Maps keyboard, pointer and touch input to transport commands. Keyboard
//! shortcuts only fire at desktop widths (mobile browsers emit synthetic
//! key events that would phantom-trigger them). The press-and-hold gesture
//! at mobile widths drives the temporary 2x speed boost.
//!
//! All timing is timestamp-driven: callers pass `Instant`s in and arm
//! real timers from the returned deadlines, so tests can run the whole
//! state machine on a synthetic clock.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::ViewportInfo;

/// Keys the transport surface listens for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Space,
    K,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    F,
    M,
    Escape,
    B,
}

/// Transport actions emitted by the dispatcher
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransportCommand {
    TogglePlayPause,
    /// Relative seek in seconds; the executor clamps to `[0, duration]`
    SeekBy(f64),
    /// Relative volume change; the executor clamps to `[0, 1]`
    AdjustVolume(f64),
    ToggleFullscreen,
    ToggleMute,
    ExitFullscreen,
    NavigateBack,
    SetPlaybackRate(f64),
    /// Show or hide the transient "2X" indicator
    BoostIndicator(bool),
}

/// Gesture timing knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Hold duration that arms the speed boost
    pub hold_threshold: Duration,
    /// Delay before the prior rate is restored on release, so the rate
    /// does not visibly snap mid-gesture
    pub restore_grace: Duration,
    /// Window for double-tap-to-fullscreen detection
    pub double_tap_window: Duration,
    /// Boosted playback rate
    pub boost_rate: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            hold_threshold: Duration::from_millis(2000),
            restore_grace: Duration::from_millis(250),
            double_tap_window: Duration::from_millis(300),
            boost_rate: 2.0,
        }
    }
}

/// What a press release resolved to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReleaseOutcome {
    /// Hold reached the boost threshold; restore this rate after the
    /// configured grace delay
    RestoreRate { rate: f64 },
    /// Short press, no earlier tap in the double-tap window
    Tap,
    /// Second tap inside the window
    DoubleTap,
}

#[derive(Debug, Clone, Copy)]
struct HoldState {
    started_at: Instant,
    prior_rate: f64,
    boosted: bool,
    /// The prior rate was inherited from an earlier boost whose
    /// grace-delayed restore had not yet executed
    inherited: bool,
}

/// Stateful input dispatcher for one mounted player
#[derive(Debug)]
pub struct GestureDispatcher {
    config: GestureConfig,
    viewport: ViewportInfo,
    hold: Option<HoldState>,
    /// Rate to restore once a pending grace-delayed restore executes.
    /// Survives overlapping gestures so a second press started while
    /// boosted inherits the true pre-boost rate instead of 2x.
    pending_restore: Option<f64>,
    last_tap_at: Option<Instant>,
}

impl GestureDispatcher {
    pub fn new(config: GestureConfig, viewport: ViewportInfo) -> Self {
        Self {
            config,
            viewport,
            hold: None,
            pending_restore: None,
            last_tap_at: None,
        }
    }

    pub fn set_viewport(&mut self, viewport: ViewportInfo) {
        self.viewport = viewport;
    }

    /// Map a key press to a transport command.
    ///
    /// Suppressed entirely below the desktop width threshold.
    pub fn key_down(&self, key: Key, fullscreen_active: bool) -> Option<TransportCommand> {
        if !self.viewport.is_desktop() {
            return None;
        }
        let command = match key {
            Key::Space | Key::K => TransportCommand::TogglePlayPause,
            Key::ArrowLeft => TransportCommand::SeekBy(-10.0),
            Key::ArrowRight => TransportCommand::SeekBy(10.0),
            Key::ArrowUp => TransportCommand::AdjustVolume(0.1),
            Key::ArrowDown => TransportCommand::AdjustVolume(-0.1),
            Key::F => TransportCommand::ToggleFullscreen,
            Key::M => TransportCommand::ToggleMute,
            Key::Escape => {
                if !fullscreen_active {
                    return None;
                }
                TransportCommand::ExitFullscreen
            }
            Key::B => TransportCommand::NavigateBack,
        };
        Some(command)
    }

    /// Record a press start. `current_rate` is the surface's rate at this
    /// instant; if a boost restore is still pending, the stored pre-boost
    /// rate is inherited instead so repeated boosts are lossless.
    pub fn press_started(&mut self, now: Instant, current_rate: f64) {
        if !self.boost_enabled() {
            return;
        }
        let inherited = self.pending_restore.take();
        self.hold = Some(HoldState {
            started_at: now,
            prior_rate: inherited.unwrap_or(current_rate),
            boosted: false,
            inherited: inherited.is_some(),
        });
    }

    /// Deadline at which the hold timer should fire, if a press is active
    pub fn hold_deadline(&self) -> Option<Instant> {
        self.hold
            .filter(|h| !h.boosted)
            .map(|h| h.started_at + self.config.hold_threshold)
    }

    /// Hold timer callback. Returns the commands to apply when the press
    /// has been held to the threshold; a guarded no-op after release.
    pub fn hold_timer_fired(&mut self, now: Instant) -> Vec<TransportCommand> {
        let Some(hold) = self.hold.as_mut() else {
            return Vec::new();
        };
        if hold.boosted || now.duration_since(hold.started_at) < self.config.hold_threshold {
            return Vec::new();
        }
        hold.boosted = true;
        debug!(prior_rate = hold.prior_rate, "Speed boost engaged");
        vec![
            TransportCommand::SetPlaybackRate(self.config.boost_rate),
            TransportCommand::BoostIndicator(true),
        ]
    }

    /// Record a press release and resolve the gesture.
    pub fn press_released(&mut self, now: Instant) -> Option<ReleaseOutcome> {
        let hold = self.hold.take()?;
        let held_for = now.duration_since(hold.started_at);

        if held_for >= self.config.hold_threshold {
            // Boost path, whether or not the timer callback got to run
            // before release.
            self.pending_restore = Some(hold.prior_rate);
            debug!(held_ms = held_for.as_millis() as u64, "Boost released");
            return Some(ReleaseOutcome::RestoreRate {
                rate: hold.prior_rate,
            });
        }

        if hold.inherited {
            // The earlier boost's restore still has to run
            self.pending_restore = Some(hold.prior_rate);
        }

        // Short press: tap, possibly the second of a double tap
        let outcome = match self.last_tap_at {
            Some(previous) if now.duration_since(previous) <= self.config.double_tap_window => {
                self.last_tap_at = None;
                ReleaseOutcome::DoubleTap
            }
            _ => {
                self.last_tap_at = Some(now);
                ReleaseOutcome::Tap
            }
        };
        Some(outcome)
    }

    /// Consume the pending grace-delayed restore; the caller applies the
    /// returned rate to the surface. `None` after release-less cancels or
    /// when no boost is outstanding.
    pub fn take_pending_restore(&mut self) -> Option<f64> {
        self.pending_restore.take()
    }

    /// Whether a grace-delayed restore is outstanding
    pub fn has_pending_restore(&self) -> bool {
        self.pending_restore.is_some()
    }

    /// Cancel everything at unmount. Returns the rate that must still be
    /// restored, if a boost is active or its restore is pending.
    pub fn cancel(&mut self) -> Option<f64> {
        let from_hold = self
            .hold
            .take()
            .filter(|h| h.boosted || h.inherited)
            .map(|h| h.prior_rate);
        let from_pending = self.pending_restore.take();
        self.last_tap_at = None;
        from_hold.or(from_pending)
    }

    /// Grace delay for the restore path
    pub fn restore_grace(&self) -> Duration {
        self.config.restore_grace
    }

    fn boost_enabled(&self) -> bool {
        !self.viewport.is_desktop()
    }
}
