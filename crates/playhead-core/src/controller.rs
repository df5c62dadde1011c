//! Player controller
//!
//! Glue between the subsystems: classifies the descriptor, owns the one
//! stream session and media surface for the mount, routes gestures and
//! media events into the presentation machine, and drives user-visible
//! retry after engine faults.
//!
//! Everything runs on the caller's event loop; the controller holds no
//! background tasks. Timer callbacks (`hold_timer_fired`,
//! `restore_timer_fired`) are guarded no-ops when they land after release
//! or unmount.

use std::time::{Duration, Instant};

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

use crate::engine::{EngineFault, MediaSurface, StreamEngine};
use crate::error::Result;
use crate::fullscreen::{FullscreenCoordinator, FullscreenPort, OrientationPort};
use crate::gesture::{GestureConfig, GestureDispatcher, Key, ReleaseOutcome, TransportCommand};
use crate::presentation::{MediaEvent, OverlayTimer, PresentationMachine};
use crate::quality::QualityController;
use crate::session::StreamSession;
use crate::source::{classify, PlaybackStrategy};
use crate::supervisor;
use crate::types::{PresentationState, QualityCatalog, VideoDescriptor, ViewportInfo};

/// Factory producing a fresh engine per session (mount and every retry)
pub type EngineFactory = Box<dyn Fn() -> Box<dyn StreamEngine> + Send + Sync>;

/// Platform capabilities handed to the controller at mount
pub struct PlatformPorts {
    pub surface: Box<dyn MediaSurface>,
    pub fullscreen: Box<dyn FullscreenPort>,
    pub orientation: Box<dyn OrientationPort>,
    pub engine_factory: EngineFactory,
}

/// Requests the controller cannot satisfy itself and hands back to the
/// hosting page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiRequest {
    NavigateBack,
}

/// Controller tuning
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub gesture: GestureConfig,
    /// Delay between teardown and rebuild on user retry
    pub retry_delay: Duration,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            gesture: GestureConfig::default(),
            retry_delay: Duration::from_millis(500),
        }
    }
}

/// One mounted player: exclusive owner of the media surface and of at
/// most one live [`StreamSession`]
pub struct PlayerController {
    strategy: PlaybackStrategy,
    autoplay: bool,
    surface: Box<dyn MediaSurface>,
    fullscreen_port: Box<dyn FullscreenPort>,
    orientation_port: Box<dyn OrientationPort>,
    engine_factory: EngineFactory,
    session: Option<StreamSession>,
    fault_rx: Option<mpsc::UnboundedReceiver<EngineFault>>,
    machine: PresentationMachine,
    gestures: GestureDispatcher,
    coordinator: FullscreenCoordinator,
    overlay: OverlayTimer,
    restore_deadline: Option<Instant>,
    boost_indicator: bool,
    retry_delay: Duration,
    retry_in_flight: bool,
    unmounted: bool,
}

impl PlayerController {
    /// Mount a player for the descriptor.
    ///
    /// Classification failures for embedded-provider URLs are terminal and
    /// returned as an error; adaptive-stream load failures instead leave
    /// the controller mounted in the error state with retry available.
    #[instrument(skip(descriptor, ports, config), fields(kind = ?descriptor.source_kind))]
    pub async fn mount(
        descriptor: &VideoDescriptor,
        autoplay: bool,
        viewport: ViewportInfo,
        ports: PlatformPorts,
        config: ControllerConfig,
    ) -> Result<Self> {
        let strategy = classify(descriptor)?;
        let is_live = matches!(
            strategy,
            PlaybackStrategy::AdaptiveStream { is_live: true, .. }
        );

        let mut controller = Self {
            strategy,
            autoplay,
            surface: ports.surface,
            fullscreen_port: ports.fullscreen,
            orientation_port: ports.orientation,
            engine_factory: ports.engine_factory,
            session: None,
            fault_rx: None,
            machine: PresentationMachine::new(is_live),
            gestures: GestureDispatcher::new(config.gesture, viewport),
            coordinator: FullscreenCoordinator::new(viewport),
            overlay: OverlayTimer::new(Instant::now()),
            restore_deadline: None,
            boost_indicator: false,
            retry_delay: config.retry_delay,
            retry_in_flight: false,
            unmounted: false,
        };

        if matches!(controller.strategy, PlaybackStrategy::AdaptiveStream { .. }) {
            controller.rebuild_session().await;
        }
        Ok(controller)
    }

    /// Embedded-provider video id, when that strategy applies
    pub fn embedded_video_id(&self) -> Option<&str> {
        match &self.strategy {
            PlaybackStrategy::EmbeddedProvider { video_id } => Some(video_id),
            _ => None,
        }
    }

    pub fn state(&self) -> &PresentationState {
        self.machine.state()
    }

    /// Subscribe to presentation snapshots (transport-control surface)
    pub fn subscribe(&self) -> watch::Receiver<PresentationState> {
        self.machine.subscribe()
    }

    pub fn catalog(&self) -> Option<&QualityCatalog> {
        self.session.as_ref().map(|s| s.catalog())
    }

    pub fn has_live_session(&self) -> bool {
        self.session.as_ref().is_some_and(|s| !s.is_destroyed())
    }

    /// "2X" indicator visibility for the overlay
    pub fn boost_indicator(&self) -> bool {
        self.boost_indicator
    }

    // ------------------------------------------------------------------
    // Session lifecycle
    // ------------------------------------------------------------------

    /// Build, configure and load a fresh session. On load failure the
    /// engine is torn down before the error state is published.
    async fn rebuild_session(&mut self) -> bool {
        let engine = (self.engine_factory)();
        let mut session = match StreamSession::new(engine, &self.strategy) {
            Ok(session) => session,
            Err(err) => {
                warn!(code = err.error_code(), "Session configuration failed");
                self.machine.fault(supervisor::error_message(&err));
                return false;
            }
        };

        self.fault_rx = session.take_fault_receiver();
        match session.load().await {
            Ok(()) => {
                self.session = Some(session);
                if self.autoplay {
                    self.attempt_autoplay().await;
                }
                true
            }
            Err(err) => {
                warn!(code = err.error_code(), "Manifest load failed");
                session.teardown().await;
                self.session = None;
                self.machine.fault(supervisor::error_message(&err));
                false
            }
        }
    }

    /// Autoplay rejection degrades to a paused initial state, never an
    /// error
    async fn attempt_autoplay(&mut self) {
        if let Err(rejected) = self.surface.play().await {
            debug!(%rejected, "Autoplay rejected, starting paused");
            self.machine.apply(MediaEvent::Pause);
        }
    }

    /// User-triggered retry after an engine fault: tear down, clear the
    /// error state, rebuild after a brief delay. A retry already in
    /// flight makes this a no-op, so overlapping retries cannot produce
    /// two sessions.
    #[instrument(skip(self))]
    pub async fn retry(&mut self) {
        if self.retry_in_flight || self.unmounted {
            debug!("Retry ignored");
            return;
        }
        if !matches!(self.strategy, PlaybackStrategy::AdaptiveStream { .. }) {
            return;
        }
        self.retry_in_flight = true;

        if let Some(mut session) = self.session.take() {
            session.teardown().await;
        }
        self.machine.begin_loading();
        tokio::time::sleep(self.retry_delay).await;
        let rebuilt = self.rebuild_session().await;
        info!(rebuilt, "Retry finished");

        self.retry_in_flight = false;
    }

    /// Unmount: synchronous teardown request, all pending gesture state
    /// and timers cleared. Idempotent.
    #[instrument(skip(self))]
    pub async fn unmount(&mut self) {
        if self.unmounted {
            return;
        }
        // A boost must never leak past the mount
        if let Some(rate) = self.gestures.cancel() {
            self.surface.set_playback_rate(rate);
        }
        self.restore_deadline = None;
        self.boost_indicator = false;

        if let Some(mut session) = self.session.take() {
            session.teardown().await;
        }
        self.fault_rx = None;
        self.unmounted = true;
        info!("Player unmounted");
    }

    // ------------------------------------------------------------------
    // Engine fault channel
    // ------------------------------------------------------------------

    /// Drain any pending engine faults. The first fatal fault tears the
    /// session down and publishes the error state.
    pub async fn pump_faults(&mut self) {
        loop {
            let Some(rx) = self.fault_rx.as_mut() else {
                return;
            };
            let fault = match rx.try_recv() {
                Ok(fault) => fault,
                Err(_) => return,
            };
            self.handle_fault(fault).await;
        }
    }

    async fn handle_fault(&mut self, fault: EngineFault) {
        let kind = supervisor::classify(&fault);
        warn!(code = fault.code, ?kind, detail = %fault.detail, "Engine fault");

        // Teardown before the error state becomes observable
        if let Some(mut session) = self.session.take() {
            session.teardown().await;
        }
        self.machine.fault(kind.user_message());
    }

    // ------------------------------------------------------------------
    // Media surface events
    // ------------------------------------------------------------------

    /// Feed one media-surface event through the presentation machine.
    /// Fullscreen changes also drive the orientation coordination.
    pub async fn media_event(&mut self, event: MediaEvent) {
        if let MediaEvent::FullscreenChange { active } = event {
            self.coordinator
                .fullscreen_changed(active, self.orientation_port.as_mut())
                .await;
        }
        self.machine.apply(event);
    }

    // ------------------------------------------------------------------
    // Quality selection
    // ------------------------------------------------------------------

    pub fn select_quality_automatic(&mut self) {
        if let Some(session) = self.session.as_mut() {
            QualityController::new(session).select_automatic();
        }
    }

    pub fn select_quality(&mut self, height: u32) {
        if let Some(session) = self.session.as_mut() {
            QualityController::new(session).select_explicit(height);
        }
    }

    // ------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------

    /// Keyboard input (desktop widths only; see the dispatcher)
    pub async fn key_down(&mut self, key: Key) -> Option<UiRequest> {
        self.overlay.activity(Instant::now());
        let command = self
            .gestures
            .key_down(key, self.coordinator.is_fullscreen())?;
        self.execute(command).await
    }

    /// Pointer movement or control interaction; feeds the overlay timer
    pub fn pointer_activity(&mut self, now: Instant) {
        self.overlay.activity(now);
    }

    /// Overlay visibility at the given instant
    pub fn overlay_visible(&self, now: Instant) -> bool {
        self.overlay.visible(now)
    }

    /// Press/touch start (mobile boost gesture)
    pub fn press_started(&mut self, now: Instant) {
        self.overlay.activity(now);
        let rate = self.surface.playback_rate();
        self.gestures.press_started(now, rate);
    }

    /// Deadline for the hold timer, when a press is active
    pub fn hold_deadline(&self) -> Option<Instant> {
        self.gestures.hold_deadline()
    }

    /// Hold-timer callback; no-op after release or unmount
    pub async fn hold_timer_fired(&mut self, now: Instant) {
        if self.unmounted {
            return;
        }
        for command in self.gestures.hold_timer_fired(now) {
            self.execute(command).await;
        }
    }

    /// Press/touch release
    pub async fn press_released(&mut self, now: Instant) {
        match self.gestures.press_released(now) {
            Some(ReleaseOutcome::RestoreRate { .. }) => {
                // Restored after the grace delay so the rate does not snap
                // visibly mid-gesture.
                self.restore_deadline = Some(now + self.gestures.restore_grace());
            }
            Some(ReleaseOutcome::DoubleTap) => {
                self.execute(TransportCommand::ToggleFullscreen).await;
            }
            Some(ReleaseOutcome::Tap) | None => {}
        }
        // A short press inside the grace window carried the inherited
        // restore with it; its original timer may already have fired
        // empty, so schedule it again.
        if self.restore_deadline.is_none() && self.gestures.has_pending_restore() {
            self.restore_deadline = Some(now + self.gestures.restore_grace());
        }
    }

    /// Deadline for the grace-delayed rate restore
    pub fn restore_deadline(&self) -> Option<Instant> {
        self.restore_deadline
    }

    /// Restore-timer callback; no-op when nothing is pending
    pub async fn restore_timer_fired(&mut self) {
        self.restore_deadline = None;
        if let Some(rate) = self.gestures.take_pending_restore() {
            self.surface.set_playback_rate(rate);
            self.boost_indicator = false;
        }
    }

    /// Execute one transport command against the surface and ports
    pub async fn execute(&mut self, command: TransportCommand) -> Option<UiRequest> {
        match command {
            TransportCommand::TogglePlayPause => {
                if self.surface.is_paused() {
                    if let Err(rejected) = self.surface.play().await {
                        debug!(%rejected, "Play rejected, staying paused");
                    }
                } else {
                    self.surface.pause();
                }
            }
            TransportCommand::SeekBy(delta) => {
                let duration = self.surface.duration();
                let target = (self.surface.current_time() + delta).clamp(0.0, duration.max(0.0));
                self.surface.seek_to(target);
            }
            TransportCommand::AdjustVolume(delta) => {
                let volume = (self.surface.volume() + delta).clamp(0.0, 1.0);
                self.surface.set_volume(volume);
            }
            TransportCommand::ToggleMute => {
                let muted = self.surface.muted();
                self.surface.set_muted(!muted);
            }
            TransportCommand::ToggleFullscreen => {
                self.coordinator
                    .toggle(self.fullscreen_port.as_mut())
                    .await;
            }
            TransportCommand::ExitFullscreen => {
                self.coordinator.exit(self.fullscreen_port.as_mut()).await;
            }
            TransportCommand::SetPlaybackRate(rate) => {
                self.surface.set_playback_rate(rate);
            }
            TransportCommand::BoostIndicator(visible) => {
                self.boost_indicator = visible;
            }
            TransportCommand::NavigateBack => {
                return Some(UiRequest::NavigateBack);
            }
        }
        None
    }
}
