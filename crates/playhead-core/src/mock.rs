//! Scriptable test doubles for the engine and platform capabilities
//!
//! Each mock hands out a cloneable handle over shared state so tests can
//! script behavior (load failures, fault injection, autoplay rejection)
//! and inspect what the controller did after the mock has been moved into
//! a session or controller.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::mpsc;
use url::Url;

use crate::engine::{
    EngineFault, ManifestTuning, MediaSurface, PlaybackRejected, RequestFilter, ResponseFilter,
    SegmentRequest, SegmentResponse, StreamEngine, StreamingTuning, VariantTrack,
};
use crate::error::Result;
use crate::fullscreen::{FullscreenPort, OrientationPort, PlatformDenied};
use crate::supervisor;

/// Default variant ladder reported by a scripted load
pub fn default_tracks() -> Vec<VariantTrack> {
    vec![
        VariantTrack {
            id: 1,
            bandwidth: 800_000,
            height: Some(360),
            frame_rate: Some(30.0),
        },
        VariantTrack {
            id: 2,
            bandwidth: 2_800_000,
            height: Some(720),
            frame_rate: Some(30.0),
        },
        VariantTrack {
            id: 3,
            bandwidth: 5_000_000,
            height: Some(1080),
            frame_rate: Some(30.0),
        },
        // Audio-only variant, filtered out of the catalog
        VariantTrack {
            id: 4,
            bandwidth: 128_000,
            height: None,
            frame_rate: None,
        },
    ]
}

#[derive(Default)]
struct EngineInner {
    clear_keys: Option<HashMap<String, String>>,
    streaming_tuning: Option<StreamingTuning>,
    manifest_tuning: Option<ManifestTuning>,
    request_filter: Option<RequestFilter>,
    response_filter: Option<ResponseFilter>,
    /// Operation order, e.g. ["clear_keys", "streaming_tuning", ..., "load"]
    operations: Vec<&'static str>,
    scripted_loads: VecDeque<std::result::Result<Vec<VariantTrack>, EngineFault>>,
    loaded_tracks: Vec<VariantTrack>,
    load_calls: u32,
    destroy_calls: u32,
    abr_enabled: bool,
    selected_height: Option<u32>,
    loaded_url: Option<Url>,
}

/// Inspection/scripting handle for [`MockEngine`]
#[derive(Clone)]
pub struct MockEngineHandle {
    inner: Arc<Mutex<EngineInner>>,
    fault_tx: mpsc::UnboundedSender<EngineFault>,
}

impl MockEngineHandle {
    /// Queue the next load result; unscripted loads succeed with
    /// [`default_tracks`]
    pub fn script_load(&self, result: std::result::Result<Vec<VariantTrack>, EngineFault>) {
        self.inner.lock().unwrap().scripted_loads.push_back(result);
    }

    /// Push a fault onto the engine's error channel
    pub fn inject_fault(&self, fault: EngineFault) {
        let _ = self.fault_tx.send(fault);
    }

    pub fn operations(&self) -> Vec<&'static str> {
        self.inner.lock().unwrap().operations.clone()
    }

    pub fn clear_keys(&self) -> Option<HashMap<String, String>> {
        self.inner.lock().unwrap().clear_keys.clone()
    }

    pub fn streaming_tuning(&self) -> Option<StreamingTuning> {
        self.inner.lock().unwrap().streaming_tuning
    }

    pub fn manifest_tuning(&self) -> Option<ManifestTuning> {
        self.inner.lock().unwrap().manifest_tuning
    }

    pub fn load_calls(&self) -> u32 {
        self.inner.lock().unwrap().load_calls
    }

    pub fn destroy_calls(&self) -> u32 {
        self.inner.lock().unwrap().destroy_calls
    }

    pub fn abr_enabled(&self) -> bool {
        self.inner.lock().unwrap().abr_enabled
    }

    pub fn selected_height(&self) -> Option<u32> {
        self.inner.lock().unwrap().selected_height
    }

    pub fn loaded_url(&self) -> Option<Url> {
        self.inner.lock().unwrap().loaded_url.clone()
    }

    /// Run the installed request filter over a request, as the engine's
    /// networking layer would
    pub fn run_request_filter(&self, request: &mut SegmentRequest) {
        let inner = self.inner.lock().unwrap();
        if let Some(filter) = inner.request_filter.as_ref() {
            filter(request);
        }
    }

    /// Run the installed response filter over a response
    pub fn run_response_filter(&self, response: &mut SegmentResponse) {
        let inner = self.inner.lock().unwrap();
        if let Some(filter) = inner.response_filter.as_ref() {
            filter(response);
        }
    }
}

/// Scriptable [`StreamEngine`] recording every configuration call
pub struct MockEngine {
    inner: Arc<Mutex<EngineInner>>,
    fault_rx: Option<mpsc::UnboundedReceiver<EngineFault>>,
}

impl MockEngine {
    pub fn new() -> (Self, MockEngineHandle) {
        let (fault_tx, fault_rx) = mpsc::unbounded_channel();
        let inner = Arc::new(Mutex::new(EngineInner {
            abr_enabled: true,
            ..EngineInner::default()
        }));
        let handle = MockEngineHandle {
            inner: inner.clone(),
            fault_tx,
        };
        (
            Self {
                inner,
                fault_rx: Some(fault_rx),
            },
            handle,
        )
    }
}

#[async_trait]
impl StreamEngine for MockEngine {
    fn configure_clear_keys(&mut self, keys: HashMap<String, String>) {
        let mut inner = self.inner.lock().unwrap();
        inner.clear_keys = Some(keys);
        inner.operations.push("clear_keys");
    }

    fn apply_streaming_tuning(&mut self, tuning: &StreamingTuning) {
        let mut inner = self.inner.lock().unwrap();
        inner.streaming_tuning = Some(*tuning);
        inner.operations.push("streaming_tuning");
    }

    fn apply_manifest_tuning(&mut self, tuning: &ManifestTuning) {
        let mut inner = self.inner.lock().unwrap();
        inner.manifest_tuning = Some(*tuning);
        inner.operations.push("manifest_tuning");
    }

    fn set_request_filter(&mut self, filter: RequestFilter) {
        let mut inner = self.inner.lock().unwrap();
        inner.request_filter = Some(filter);
        inner.operations.push("request_filter");
    }

    fn set_response_filter(&mut self, filter: ResponseFilter) {
        let mut inner = self.inner.lock().unwrap();
        inner.response_filter = Some(filter);
        inner.operations.push("response_filter");
    }

    async fn load(&mut self, manifest_url: &Url) -> Result<Vec<VariantTrack>> {
        let mut inner = self.inner.lock().unwrap();
        inner.operations.push("load");
        inner.load_calls += 1;
        inner.loaded_url = Some(manifest_url.clone());
        match inner.scripted_loads.pop_front() {
            Some(Ok(tracks)) => {
                inner.loaded_tracks = tracks.clone();
                Ok(tracks)
            }
            Some(Err(fault)) => Err(supervisor::fault_to_error(&fault)),
            None => {
                let tracks = default_tracks();
                inner.loaded_tracks = tracks.clone();
                Ok(tracks)
            }
        }
    }

    fn set_abr_enabled(&mut self, enabled: bool) {
        self.inner.lock().unwrap().abr_enabled = enabled;
    }

    fn abr_enabled(&self) -> bool {
        self.inner.lock().unwrap().abr_enabled
    }

    fn select_variant(&mut self, height: u32) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let found = inner.loaded_tracks.iter().any(|t| t.height == Some(height));
        if found {
            inner.selected_height = Some(height);
        }
        found
    }

    async fn destroy(&mut self) {
        let mut inner = self.inner.lock().unwrap();
        inner.destroy_calls += 1;
        inner.operations.push("destroy");
    }

    fn take_fault_receiver(&mut self) -> Option<mpsc::UnboundedReceiver<EngineFault>> {
        self.fault_rx.take()
    }
}

#[derive(Debug)]
struct SurfaceInner {
    paused: bool,
    current_time: f64,
    duration: f64,
    volume: f64,
    muted: bool,
    rate: f64,
    reject_play: bool,
    play_calls: u32,
    rate_history: Vec<f64>,
}

impl Default for SurfaceInner {
    fn default() -> Self {
        Self {
            paused: true,
            current_time: 0.0,
            duration: 0.0,
            volume: 1.0,
            muted: false,
            rate: 1.0,
            reject_play: false,
            play_calls: 0,
            rate_history: Vec::new(),
        }
    }
}

/// Inspection/scripting handle for [`MockMediaSurface`]
#[derive(Clone)]
pub struct MockSurfaceHandle {
    inner: Arc<Mutex<SurfaceInner>>,
}

impl MockSurfaceHandle {
    /// Make subsequent `play()` calls fail like a denied autoplay
    pub fn reject_play(&self, reject: bool) {
        self.inner.lock().unwrap().reject_play = reject;
    }

    pub fn set_duration(&self, seconds: f64) {
        self.inner.lock().unwrap().duration = seconds;
    }

    pub fn set_current_time(&self, seconds: f64) {
        self.inner.lock().unwrap().current_time = seconds;
    }

    pub fn paused(&self) -> bool {
        self.inner.lock().unwrap().paused
    }

    pub fn current_time(&self) -> f64 {
        self.inner.lock().unwrap().current_time
    }

    pub fn volume(&self) -> f64 {
        self.inner.lock().unwrap().volume
    }

    pub fn muted(&self) -> bool {
        self.inner.lock().unwrap().muted
    }

    pub fn rate(&self) -> f64 {
        self.inner.lock().unwrap().rate
    }

    pub fn play_calls(&self) -> u32 {
        self.inner.lock().unwrap().play_calls
    }

    /// Every rate the controller set, in order
    pub fn rate_history(&self) -> Vec<f64> {
        self.inner.lock().unwrap().rate_history.clone()
    }
}

/// Scriptable [`MediaSurface`]
pub struct MockMediaSurface {
    inner: Arc<Mutex<SurfaceInner>>,
}

impl MockMediaSurface {
    pub fn new() -> (Self, MockSurfaceHandle) {
        let inner = Arc::new(Mutex::new(SurfaceInner::default()));
        let handle = MockSurfaceHandle {
            inner: inner.clone(),
        };
        (Self { inner }, handle)
    }
}

#[async_trait]
impl MediaSurface for MockMediaSurface {
    async fn play(&mut self) -> std::result::Result<(), PlaybackRejected> {
        let mut inner = self.inner.lock().unwrap();
        inner.play_calls += 1;
        if inner.reject_play {
            return Err(PlaybackRejected("autoplay denied".into()));
        }
        inner.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.inner.lock().unwrap().paused = true;
    }

    fn current_time(&self) -> f64 {
        self.inner.lock().unwrap().current_time
    }

    fn seek_to(&mut self, seconds: f64) {
        self.inner.lock().unwrap().current_time = seconds;
    }

    fn duration(&self) -> f64 {
        self.inner.lock().unwrap().duration
    }

    fn volume(&self) -> f64 {
        self.inner.lock().unwrap().volume
    }

    fn set_volume(&mut self, volume: f64) {
        self.inner.lock().unwrap().volume = volume;
    }

    fn muted(&self) -> bool {
        self.inner.lock().unwrap().muted
    }

    fn set_muted(&mut self, muted: bool) {
        self.inner.lock().unwrap().muted = muted;
    }

    fn playback_rate(&self) -> f64 {
        self.inner.lock().unwrap().rate
    }

    fn set_playback_rate(&mut self, rate: f64) {
        let mut inner = self.inner.lock().unwrap();
        inner.rate = rate;
        inner.rate_history.push(rate);
    }

    fn is_paused(&self) -> bool {
        self.inner.lock().unwrap().paused
    }
}

#[derive(Debug, Default)]
struct PortsInner {
    fullscreen_requests: u32,
    exit_requests: u32,
    lock_attempts: u32,
    unlocks: u32,
    deny_fullscreen: bool,
    deny_lock: bool,
}

/// Inspection/scripting handle for the platform port mocks
#[derive(Clone, Default)]
pub struct MockPortsHandle {
    inner: Arc<Mutex<PortsInner>>,
}

impl MockPortsHandle {
    pub fn deny_fullscreen(&self, deny: bool) {
        self.inner.lock().unwrap().deny_fullscreen = deny;
    }

    pub fn deny_lock(&self, deny: bool) {
        self.inner.lock().unwrap().deny_lock = deny;
    }

    pub fn fullscreen_requests(&self) -> u32 {
        self.inner.lock().unwrap().fullscreen_requests
    }

    pub fn exit_requests(&self) -> u32 {
        self.inner.lock().unwrap().exit_requests
    }

    pub fn lock_attempts(&self) -> u32 {
        self.inner.lock().unwrap().lock_attempts
    }

    pub fn unlocks(&self) -> u32 {
        self.inner.lock().unwrap().unlocks
    }
}

/// Mock [`FullscreenPort`]
pub struct MockFullscreenPort {
    inner: Arc<Mutex<PortsInner>>,
}

/// Mock [`OrientationPort`]
pub struct MockOrientationPort {
    inner: Arc<Mutex<PortsInner>>,
}

/// Build both port mocks over one shared handle
pub fn mock_ports() -> (MockFullscreenPort, MockOrientationPort, MockPortsHandle) {
    let handle = MockPortsHandle::default();
    (
        MockFullscreenPort {
            inner: handle.inner.clone(),
        },
        MockOrientationPort {
            inner: handle.inner.clone(),
        },
        handle,
    )
}

#[async_trait]
impl FullscreenPort for MockFullscreenPort {
    async fn request_fullscreen(&mut self) -> std::result::Result<(), PlatformDenied> {
        let mut inner = self.inner.lock().unwrap();
        inner.fullscreen_requests += 1;
        if inner.deny_fullscreen {
            Err(PlatformDenied("fullscreen denied".into()))
        } else {
            Ok(())
        }
    }

    async fn exit_fullscreen(&mut self) -> std::result::Result<(), PlatformDenied> {
        self.inner.lock().unwrap().exit_requests += 1;
        Ok(())
    }
}

#[async_trait]
impl OrientationPort for MockOrientationPort {
    async fn lock_landscape(&mut self) -> std::result::Result<(), PlatformDenied> {
        let mut inner = self.inner.lock().unwrap();
        inner.lock_attempts += 1;
        if inner.deny_lock {
            Err(PlatformDenied("lock requires user gesture".into()))
        } else {
            Ok(())
        }
    }

    fn unlock(&mut self) {
        self.inner.lock().unwrap().unlocks += 1;
    }
}
