//! Integration tests for Playhead Core

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use playhead_core::engine::{EngineFault, FAULT_INVALID_MANIFEST, FAULT_LICENSE_REQUEST_FAILED};
use playhead_core::mock::{
    default_tracks, mock_ports, MockEngine, MockEngineHandle, MockMediaSurface, MockPortsHandle,
    MockSurfaceHandle,
};
use playhead_core::{
    classify, is_live_edge_url, ContainerKind, ControllerConfig, DrmKeys, Error, GestureConfig,
    Key, MediaEvent, PlatformPorts, PlaybackStrategy, PlayerController, PresentationStatus,
    QualitySelection, SourceKind, VariantTrack, VideoDescriptor, ViewportInfo,
};
use url::Url;

const DESKTOP: ViewportInfo = ViewportInfo { width: 1280 };
const MOBILE: ViewportInfo = ViewportInfo { width: 414 };

// =============================================================================
// Test fixtures
// =============================================================================

fn signed_vod_descriptor() -> VideoDescriptor {
    VideoDescriptor {
        source_kind: SourceKind::AdaptiveDrm,
        primary_url: "https://portal.example/videos/42".into(),
        resolved_stream_url: Some(
            Url::parse(
                "https://d2nvs31859zcd8.cloudfront.net/out/master.mpd?Signature=sg&Key-Pair-Id=kp&Policy=pl",
            )
            .unwrap(),
        ),
        container_kind: ContainerKind::Dash,
        drm_keys: Some(DrmKeys {
            key_id: "85ac4bd6a45c11ed9f4ce7f0ece11f13".into(),
            key: "b2354b7a6ccf5e17b18a4e2f9a3f1c2d".into(),
        }),
        cdn_hint: None,
    }
}

fn live_descriptor() -> VideoDescriptor {
    VideoDescriptor {
        source_kind: SourceKind::AdaptiveDrm,
        primary_url: "https://portal.example/live/7".into(),
        resolved_stream_url: Some(
            Url::parse("https://live-cdn.example.net/stream/master.mpd").unwrap(),
        ),
        container_kind: ContainerKind::Dash,
        drm_keys: Some(DrmKeys {
            key_id: "deadbeef".into(),
            key: "cafebabe".into(),
        }),
        cdn_hint: Some("edge".into()),
    }
}

fn embedded_descriptor(url: &str) -> VideoDescriptor {
    VideoDescriptor {
        source_kind: SourceKind::EmbeddedProvider,
        primary_url: url.into(),
        resolved_stream_url: None,
        container_kind: ContainerKind::Unknown,
        drm_keys: None,
        cdn_hint: None,
    }
}

/// Collects the handle of every engine the factory produced, and scripts
/// queued load outcomes onto each new engine in order
struct EngineProbe {
    handles: Arc<Mutex<Vec<MockEngineHandle>>>,
    scripted: Arc<Mutex<VecDeque<Result<Vec<VariantTrack>, EngineFault>>>>,
}

impl EngineProbe {
    fn new() -> Self {
        Self {
            handles: Arc::new(Mutex::new(Vec::new())),
            scripted: Arc::new(Mutex::new(VecDeque::new())),
        }
    }

    /// Queue the load outcome for the next engine the factory builds
    fn script_next_load(&self, result: Result<Vec<VariantTrack>, EngineFault>) {
        self.scripted.lock().unwrap().push_back(result);
    }

    fn factory(&self) -> playhead_core::EngineFactory {
        let handles = self.handles.clone();
        let scripted = self.scripted.clone();
        Box::new(move || {
            let (engine, handle) = MockEngine::new();
            if let Some(result) = scripted.lock().unwrap().pop_front() {
                handle.script_load(result);
            }
            handles.lock().unwrap().push(handle);
            Box::new(engine)
        })
    }

    fn engines_built(&self) -> usize {
        self.handles.lock().unwrap().len()
    }

    fn handle(&self, index: usize) -> MockEngineHandle {
        self.handles.lock().unwrap()[index].clone()
    }

    fn latest(&self) -> MockEngineHandle {
        self.handles.lock().unwrap().last().unwrap().clone()
    }
}

struct Mounted {
    controller: PlayerController,
    probe: EngineProbe,
    surface: MockSurfaceHandle,
    ports: MockPortsHandle,
}

async fn mount(descriptor: VideoDescriptor, viewport: ViewportInfo, autoplay: bool) -> Mounted {
    let probe = EngineProbe::new();
    let (surface, surface_handle) = MockMediaSurface::new();
    let (fullscreen, orientation, ports_handle) = mock_ports();

    let controller = PlayerController::mount(
        &descriptor,
        autoplay,
        viewport,
        PlatformPorts {
            surface: Box::new(surface),
            fullscreen: Box::new(fullscreen),
            orientation: Box::new(orientation),
            engine_factory: probe.factory(),
        },
        ControllerConfig {
            gesture: GestureConfig::default(),
            retry_delay: Duration::ZERO,
        },
    )
    .await
    .expect("mount");

    Mounted {
        controller,
        probe,
        surface: surface_handle,
        ports: ports_handle,
    }
}

// =============================================================================
// Source classification
// =============================================================================

#[test]
fn test_embedded_id_stable_across_url_shapes() {
    let shapes = [
        "https://www.youtube.com/watch?v=jNQXAC9IVRw",
        "https://youtu.be/jNQXAC9IVRw",
        "https://www.youtube.com/embed/jNQXAC9IVRw",
        "jNQXAC9IVRw",
    ];
    for shape in shapes {
        let strategy = classify(&embedded_descriptor(shape)).unwrap();
        assert_eq!(
            strategy,
            PlaybackStrategy::EmbeddedProvider {
                video_id: "jNQXAC9IVRw".into()
            },
            "shape: {shape}"
        );
    }
}

#[test]
fn test_unresolvable_identifier_is_terminal() {
    let err = classify(&embedded_descriptor("https://portal.example/not-a-video")).unwrap_err();
    assert!(matches!(err, Error::UnresolvableIdentifier { .. }));
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_embedded_mount_builds_no_session() {
    let mounted = mount(
        embedded_descriptor("https://youtu.be/jNQXAC9IVRw"),
        DESKTOP,
        false,
    )
    .await;
    assert_eq!(
        mounted.controller.embedded_video_id(),
        Some("jNQXAC9IVRw")
    );
    assert!(!mounted.controller.has_live_session());
    assert_eq!(mounted.probe.engines_built(), 0);
}

// =============================================================================
// Signed VOD scenario
// =============================================================================

#[tokio::test]
async fn test_signed_vod_applies_drm_and_defaults_to_automatic() {
    let descriptor = signed_vod_descriptor();
    assert!(!is_live_edge_url(descriptor.resolved_stream_url.as_ref().unwrap()));

    let mounted = mount(descriptor, DESKTOP, false).await;
    let engine = mounted.probe.handle(0);

    // DRM applied, before tuning and load
    let keys = engine.clear_keys().expect("clear keys configured");
    assert_eq!(
        keys.get("85ac4bd6a45c11ed9f4ce7f0ece11f13").map(String::as_str),
        Some("b2354b7a6ccf5e17b18a4e2f9a3f1c2d")
    );
    let operations = engine.operations();
    assert_eq!(
        operations,
        vec![
            "clear_keys",
            "streaming_tuning",
            "manifest_tuning",
            "request_filter",
            "response_filter",
            "load",
        ]
    );

    // Managed-CDN override took effect
    let tuning = engine.streaming_tuning().unwrap();
    assert_eq!(tuning.buffering_goal_secs, 60.0);
    assert_eq!(tuning.retry.max_attempts, 6);

    // Catalog descending by height, audio-only track filtered, automatic
    let catalog = mounted.controller.catalog().unwrap();
    let heights: Vec<u32> = catalog.levels.iter().map(|l| l.height).collect();
    assert_eq!(heights, vec![1080, 720, 360]);
    assert_eq!(catalog.current_selection, QualitySelection::Automatic);
    assert!(engine.abr_enabled());

    // VOD keeps duration display
    assert!(!mounted.controller.state().is_live);
}

#[tokio::test]
async fn test_request_filter_reattaches_signed_credentials() {
    let mounted = mount(signed_vod_descriptor(), DESKTOP, false).await;
    let engine = mounted.probe.handle(0);

    let mut request = playhead_core::SegmentRequest::new(
        Url::parse("https://d2nvs31859zcd8.cloudfront.net/out/video/seg-3.m4s").unwrap(),
    );
    engine.run_request_filter(&mut request);
    let query = request.url.query().unwrap();
    assert!(query.contains("Signature=sg"));
    assert!(query.contains("Key-Pair-Id=kp"));
    assert!(query.contains("Policy=pl"));

    let mut response = playhead_core::SegmentResponse {
        url: request.url.clone(),
        headers: Default::default(),
    };
    engine.run_response_filter(&mut response);
    assert_eq!(
        response
            .headers
            .get("Access-Control-Allow-Origin")
            .map(String::as_str),
        Some("*")
    );
}

// =============================================================================
// Live CDN scenario
// =============================================================================

#[tokio::test]
async fn test_live_stream_skips_drm_and_suppresses_duration() {
    let descriptor = live_descriptor();
    assert!(is_live_edge_url(descriptor.resolved_stream_url.as_ref().unwrap()));

    let mut mounted = mount(descriptor, DESKTOP, false).await;
    let engine = mounted.probe.handle(0);

    // Keys were present but the live classification wins
    assert_eq!(engine.clear_keys(), None);

    // No managed-CDN override for this host
    let tuning = engine.streaming_tuning().unwrap();
    assert_eq!(tuning.buffering_goal_secs, 30.0);

    // Live state suppresses duration display
    mounted
        .controller
        .media_event(MediaEvent::DurationChange { seconds: 120.0 })
        .await;
    let state = mounted.controller.state();
    assert!(state.is_live);
    assert_eq!(state.display_duration(), None);
}

// =============================================================================
// Quality selection
// =============================================================================

#[tokio::test]
async fn test_explicit_then_automatic_roundtrips_abr_flag() {
    let mut mounted = mount(signed_vod_descriptor(), DESKTOP, false).await;
    let engine = mounted.probe.handle(0);
    let abr_before = engine.abr_enabled();

    mounted.controller.select_quality(720);
    assert!(!engine.abr_enabled());
    assert_eq!(engine.selected_height(), Some(720));
    assert_eq!(
        mounted.controller.catalog().unwrap().current_selection,
        QualitySelection::Explicit(720)
    );

    mounted.controller.select_quality_automatic();
    assert_eq!(engine.abr_enabled(), abr_before);
    assert_eq!(
        mounted.controller.catalog().unwrap().current_selection,
        QualitySelection::Automatic
    );
}

#[tokio::test]
async fn test_unknown_height_selection_is_noop() {
    let mut mounted = mount(signed_vod_descriptor(), DESKTOP, false).await;
    let engine = mounted.probe.handle(0);

    mounted.controller.select_quality(4320);
    assert!(engine.abr_enabled());
    assert_eq!(engine.selected_height(), None);
    assert_eq!(
        mounted.controller.catalog().unwrap().current_selection,
        QualitySelection::Automatic
    );
}

// =============================================================================
// Faults and retry
// =============================================================================

#[tokio::test]
async fn test_license_fault_enters_error_and_retry_rebuilds() {
    let mut mounted = mount(signed_vod_descriptor(), DESKTOP, false).await;
    let first = mounted.probe.handle(0);

    first.inject_fault(EngineFault {
        code: FAULT_LICENSE_REQUEST_FAILED,
        detail: "license server returned 403".into(),
    });
    mounted.controller.pump_faults().await;

    let state = mounted.controller.state().clone();
    assert_eq!(state.status, PresentationStatus::Error);
    assert_eq!(state.error_message.as_deref(), Some("DRM license request failed"));

    // Error implies teardown was attempted; catalog is gone with the session
    assert_eq!(first.destroy_calls(), 1);
    assert!(!mounted.controller.has_live_session());
    assert!(mounted.controller.catalog().is_none());

    mounted.controller.retry().await;

    assert_eq!(mounted.probe.engines_built(), 2);
    assert!(mounted.controller.has_live_session());
    assert_eq!(mounted.controller.state().status, PresentationStatus::Loading);
    // Catalog repopulated from the rebuilt session's load
    let catalog = mounted.controller.catalog().unwrap();
    assert_eq!(catalog.levels.len(), 3);
    assert_eq!(catalog.current_selection, QualitySelection::Automatic);
}

#[tokio::test]
async fn test_failed_reload_keeps_error_until_next_retry() {
    let mut mounted = mount(signed_vod_descriptor(), DESKTOP, false).await;

    mounted.probe.handle(0).inject_fault(EngineFault {
        code: FAULT_INVALID_MANIFEST,
        detail: "empty period".into(),
    });
    mounted.controller.pump_faults().await;

    // The rebuilt engine fails its load too
    mounted.probe.script_next_load(Err(EngineFault {
        code: FAULT_INVALID_MANIFEST,
        detail: "still empty".into(),
    }));
    mounted.controller.retry().await;

    assert_eq!(mounted.controller.state().status, PresentationStatus::Error);
    assert_eq!(
        mounted.controller.state().error_message.as_deref(),
        Some("Stream manifest is invalid")
    );
    assert!(!mounted.controller.has_live_session());
    // The failed engine was torn down before the error was published
    assert_eq!(mounted.probe.handle(1).destroy_calls(), 1);

    // A further retry with a healthy load recovers
    mounted.controller.retry().await;
    assert!(mounted.controller.has_live_session());
    assert_eq!(mounted.probe.engines_built(), 3);
}

#[tokio::test]
async fn test_repeated_retry_yields_exactly_one_session() {
    let mut mounted = mount(signed_vod_descriptor(), DESKTOP, false).await;

    mounted.controller.retry().await;
    mounted.controller.retry().await;

    assert!(mounted.controller.has_live_session());
    // Initial mount plus one engine per retry; every superseded engine
    // was destroyed exactly once
    assert_eq!(mounted.probe.engines_built(), 3);
    assert_eq!(mounted.probe.handle(0).destroy_calls(), 1);
    assert_eq!(mounted.probe.handle(1).destroy_calls(), 1);
    assert_eq!(mounted.probe.latest().destroy_calls(), 0);
}

#[tokio::test]
async fn test_unmount_is_idempotent() {
    let mut mounted = mount(signed_vod_descriptor(), DESKTOP, false).await;
    let engine = mounted.probe.handle(0);

    mounted.controller.unmount().await;
    mounted.controller.unmount().await;

    assert_eq!(engine.destroy_calls(), 1);
    assert!(!mounted.controller.has_live_session());

    // Retry after unmount is a guarded no-op
    mounted.controller.retry().await;
    assert_eq!(mounted.probe.engines_built(), 1);
}

// =============================================================================
// Autoplay
// =============================================================================

#[tokio::test]
async fn test_autoplay_rejection_degrades_to_paused() {
    let probe = EngineProbe::new();
    let (surface, surface_handle) = MockMediaSurface::new();
    surface_handle.reject_play(true);
    let (fullscreen, orientation, _) = mock_ports();

    let controller = PlayerController::mount(
        &signed_vod_descriptor(),
        true,
        DESKTOP,
        PlatformPorts {
            surface: Box::new(surface),
            fullscreen: Box::new(fullscreen),
            orientation: Box::new(orientation),
            engine_factory: probe.factory(),
        },
        ControllerConfig::default(),
    )
    .await
    .unwrap();

    assert_eq!(surface_handle.play_calls(), 1);
    assert!(surface_handle.paused());
    // Degraded, not an error
    assert_eq!(controller.state().status, PresentationStatus::Paused);
}

// =============================================================================
// Keyboard transport
// =============================================================================

#[tokio::test]
async fn test_seek_and_volume_clamping() {
    let mut mounted = mount(signed_vod_descriptor(), DESKTOP, false).await;
    mounted.surface.set_duration(30.0);
    mounted.surface.set_current_time(25.0);

    mounted.controller.key_down(Key::ArrowRight).await;
    assert_eq!(mounted.surface.current_time(), 30.0);

    mounted.surface.set_current_time(4.0);
    mounted.controller.key_down(Key::ArrowLeft).await;
    assert_eq!(mounted.surface.current_time(), 0.0);

    mounted.controller.key_down(Key::ArrowUp).await;
    assert_eq!(mounted.surface.volume(), 1.0);
    mounted.controller.key_down(Key::ArrowDown).await;
    mounted.controller.key_down(Key::ArrowDown).await;
    assert!((mounted.surface.volume() - 0.8).abs() < 1e-9);
}

#[tokio::test]
async fn test_keyboard_suppressed_on_mobile_width() {
    let mut mounted = mount(signed_vod_descriptor(), MOBILE, false).await;
    mounted.surface.set_duration(30.0);
    mounted.surface.set_current_time(10.0);

    mounted.controller.key_down(Key::ArrowRight).await;
    assert_eq!(mounted.surface.current_time(), 10.0);
}

#[tokio::test]
async fn test_mute_toggle_and_back_navigation() {
    let mut mounted = mount(signed_vod_descriptor(), DESKTOP, false).await;

    mounted.controller.key_down(Key::M).await;
    assert!(mounted.surface.muted());
    mounted.controller.key_down(Key::M).await;
    assert!(!mounted.surface.muted());

    let request = mounted.controller.key_down(Key::B).await;
    assert_eq!(request, Some(playhead_core::UiRequest::NavigateBack));
}

// =============================================================================
// Press-and-hold speed boost
// =============================================================================

#[tokio::test]
async fn test_boost_sets_rate_and_restores_after_grace() {
    let mut mounted = mount(signed_vod_descriptor(), MOBILE, false).await;
    mounted.surface.set_current_time(0.0);
    let start = Instant::now();

    mounted.controller.press_started(start);
    let deadline = mounted.controller.hold_deadline().unwrap();
    assert_eq!(deadline, start + Duration::from_millis(2000));

    mounted.controller.hold_timer_fired(deadline).await;
    assert_eq!(mounted.surface.rate(), 2.0);
    assert!(mounted.controller.boost_indicator());

    mounted
        .controller
        .press_released(deadline + Duration::from_millis(500))
        .await;
    assert!(mounted.controller.restore_deadline().is_some());

    mounted.controller.restore_timer_fired().await;
    assert_eq!(mounted.surface.rate(), 1.0);
    assert!(!mounted.controller.boost_indicator());
}

#[tokio::test]
async fn test_boost_restores_custom_prior_rate() {
    let mut mounted = mount(signed_vod_descriptor(), MOBILE, false).await;
    // User had 1.5x selected before the gesture
    mounted.controller.execute(playhead_core::TransportCommand::SetPlaybackRate(1.5)).await;

    let start = Instant::now();
    mounted.controller.press_started(start);
    mounted
        .controller
        .hold_timer_fired(start + Duration::from_millis(2000))
        .await;
    mounted
        .controller
        .press_released(start + Duration::from_millis(2500))
        .await;
    mounted.controller.restore_timer_fired().await;

    assert_eq!(mounted.surface.rate(), 1.5);
}

#[tokio::test]
async fn test_unmount_during_boost_restores_rate() {
    let mut mounted = mount(signed_vod_descriptor(), MOBILE, false).await;
    let start = Instant::now();

    mounted.controller.press_started(start);
    mounted
        .controller
        .hold_timer_fired(start + Duration::from_millis(2000))
        .await;
    assert_eq!(mounted.surface.rate(), 2.0);

    mounted.controller.unmount().await;
    assert_eq!(mounted.surface.rate(), 1.0);

    // Dangling restore timer after unmount is a guarded no-op
    mounted.controller.restore_timer_fired().await;
    assert_eq!(mounted.surface.rate_history(), vec![2.0, 1.0]);
}

#[tokio::test]
async fn test_short_press_never_touches_rate() {
    let mut mounted = mount(signed_vod_descriptor(), MOBILE, false).await;
    let start = Instant::now();

    mounted.controller.press_started(start);
    mounted
        .controller
        .press_released(start + Duration::from_millis(1999))
        .await;

    assert!(mounted.surface.rate_history().is_empty());
    assert!(mounted.controller.restore_deadline().is_none());
}

#[tokio::test]
async fn test_tap_inside_grace_window_still_restores_rate() {
    let mut mounted = mount(signed_vod_descriptor(), MOBILE, false).await;
    let start = Instant::now();

    mounted.controller.press_started(start);
    mounted
        .controller
        .hold_timer_fired(start + Duration::from_millis(2000))
        .await;
    mounted
        .controller
        .press_released(start + Duration::from_millis(2100))
        .await;
    assert_eq!(mounted.surface.rate(), 2.0);

    // A quick tap lands inside the 250 ms restore grace
    let tap = start + Duration::from_millis(2150);
    mounted.controller.press_started(tap);
    mounted
        .controller
        .press_released(tap + Duration::from_millis(40))
        .await;

    mounted.controller.restore_timer_fired().await;
    assert_eq!(mounted.surface.rate(), 1.0);
    assert!(!mounted.controller.boost_indicator());
    assert!(mounted.controller.restore_deadline().is_none());
}

#[tokio::test]
async fn test_restore_timer_firing_mid_press_is_rearmed() {
    let mut mounted = mount(signed_vod_descriptor(), MOBILE, false).await;
    let start = Instant::now();

    mounted.controller.press_started(start);
    mounted
        .controller
        .hold_timer_fired(start + Duration::from_millis(2000))
        .await;
    mounted
        .controller
        .press_released(start + Duration::from_millis(2100))
        .await;

    // Second press starts inside the grace window and is still held when
    // the original restore timer fires
    mounted.controller.press_started(start + Duration::from_millis(2150));
    mounted.controller.restore_timer_fired().await;
    assert_eq!(mounted.surface.rate(), 2.0);

    mounted
        .controller
        .press_released(start + Duration::from_millis(2400))
        .await;
    assert!(mounted.controller.restore_deadline().is_some());

    mounted.controller.restore_timer_fired().await;
    assert_eq!(mounted.surface.rate(), 1.0);
    assert!(!mounted.controller.boost_indicator());
}

// =============================================================================
// Fullscreen and orientation
// =============================================================================

#[tokio::test]
async fn test_double_tap_requests_fullscreen() {
    let mut mounted = mount(signed_vod_descriptor(), MOBILE, false).await;
    let start = Instant::now();

    mounted.controller.press_started(start);
    mounted
        .controller
        .press_released(start + Duration::from_millis(40))
        .await;
    let second = start + Duration::from_millis(200);
    mounted.controller.press_started(second);
    mounted
        .controller
        .press_released(second + Duration::from_millis(40))
        .await;

    assert_eq!(mounted.ports.fullscreen_requests(), 1);
}

#[tokio::test]
async fn test_fullscreen_change_drives_orientation_lock() {
    let mut mounted = mount(signed_vod_descriptor(), MOBILE, false).await;

    mounted
        .controller
        .media_event(MediaEvent::FullscreenChange { active: true })
        .await;
    assert!(mounted.controller.state().is_fullscreen);
    assert_eq!(mounted.ports.lock_attempts(), 1);

    mounted
        .controller
        .media_event(MediaEvent::FullscreenChange { active: false })
        .await;
    assert!(!mounted.controller.state().is_fullscreen);
    assert_eq!(mounted.ports.unlocks(), 1);
}

#[tokio::test]
async fn test_orientation_denial_never_escalates() {
    let mut mounted = mount(signed_vod_descriptor(), MOBILE, false).await;
    mounted.ports.deny_lock(true);

    mounted
        .controller
        .media_event(MediaEvent::FullscreenChange { active: true })
        .await;

    assert!(mounted.controller.state().is_fullscreen);
    assert_ne!(mounted.controller.state().status, PresentationStatus::Error);
}

// =============================================================================
// Presentation flow
// =============================================================================

#[tokio::test]
async fn test_media_events_drive_presentation() {
    let mut mounted = mount(signed_vod_descriptor(), DESKTOP, false).await;

    mounted.controller.media_event(MediaEvent::Playing).await;
    assert_eq!(mounted.controller.state().status, PresentationStatus::Playing);

    mounted.controller.media_event(MediaEvent::Waiting).await;
    assert_eq!(mounted.controller.state().status, PresentationStatus::Buffering);

    mounted.controller.media_event(MediaEvent::Playing).await;
    assert_eq!(mounted.controller.state().status, PresentationStatus::Playing);

    mounted.controller.media_event(MediaEvent::Pause).await;
    assert_eq!(mounted.controller.state().status, PresentationStatus::Paused);
}

#[tokio::test]
async fn test_state_broadcast_reaches_subscribers() {
    let mut mounted = mount(signed_vod_descriptor(), DESKTOP, false).await;
    let rx = mounted.controller.subscribe();

    mounted.controller.media_event(MediaEvent::Playing).await;
    assert_eq!(rx.borrow().status, PresentationStatus::Playing);
}

#[tokio::test]
async fn test_overlay_inactivity_window() {
    let mut mounted = mount(signed_vod_descriptor(), DESKTOP, false).await;
    let now = Instant::now();

    mounted.controller.pointer_activity(now);
    assert!(mounted.controller.overlay_visible(now + Duration::from_secs(4)));
    assert!(!mounted.controller.overlay_visible(now + Duration::from_secs(6)));

    mounted.controller.pointer_activity(now + Duration::from_secs(5));
    assert!(mounted.controller.overlay_visible(now + Duration::from_secs(9)));
}

// =============================================================================
// Default variant ladder sanity
// =============================================================================

#[test]
fn test_default_tracks_cover_ladder_and_audio() {
    let tracks = default_tracks();
    assert_eq!(tracks.len(), 4);
    assert!(tracks.iter().any(|t| t.height.is_none()));
}
