//! Streaming engine capability surface
//!
//! The decode/DRM engine itself is an external collaborator: this module
//! defines the configuration and control surface the controller drives,
//! not the engine internals. The controller configures the engine before
//! manifest load, installs request/response filters on its networking
//! layer, and listens on its fault channel.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::mpsc;
use url::Url;

use crate::error::Result;

// Fault codes reported on the engine's error channel
pub const FAULT_BAD_HTTP_STATUS: u32 = 1001;
pub const FAULT_HTTP_ERROR: u32 = 1002;
pub const FAULT_TIMEOUT: u32 = 1003;
pub const FAULT_INVALID_MANIFEST: u32 = 4001;
pub const FAULT_LICENSE_REQUEST_FAILED: u32 = 6007;
pub const FAULT_LICENSE_RESPONSE_REJECTED: u32 = 6008;

/// Fault reported asynchronously by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineFault {
    pub code: u32,
    pub detail: String,
}

/// One variant track reported by the engine after manifest load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantTrack {
    pub id: u32,
    /// Bandwidth in bits per second
    pub bandwidth: u64,
    /// Vertical resolution; absent for audio-only variants
    pub height: Option<u32>,
    pub frame_rate: Option<f32>,
}

/// Retry/backoff parameters applied to the engine's networking layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RetryTuning {
    pub base_delay_ms: u64,
    pub backoff_factor: f64,
    pub jitter_factor: f64,
    pub max_attempts: u32,
    pub timeout_ms: u64,
}

impl Default for RetryTuning {
    fn default() -> Self {
        Self {
            base_delay_ms: 1000,
            backoff_factor: 2.0,
            jitter_factor: 0.5,
            max_attempts: 3,
            timeout_ms: 30_000,
        }
    }
}

/// Buffering and live-sync parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StreamingTuning {
    /// Seconds of content to keep buffered ahead
    pub buffering_goal_secs: f64,
    /// Seconds buffered before resuming from a stall
    pub rebuffering_goal_secs: f64,
    /// Stall detected after this many seconds without progress
    pub stall_threshold_secs: f64,
    /// Seconds skipped forward to escape a stall
    pub stall_skip_secs: f64,
    /// Target distance behind the live edge
    pub live_sync_target_latency_secs: f64,
    pub live_sync_min_latency_secs: f64,
    pub live_sync_max_latency_secs: f64,
    /// Segment prefetch limit for low-latency streams
    pub low_latency_prefetch_segments: u32,
    pub retry: RetryTuning,
}

impl Default for StreamingTuning {
    fn default() -> Self {
        Self {
            buffering_goal_secs: 30.0,
            rebuffering_goal_secs: 2.0,
            stall_threshold_secs: 1.0,
            stall_skip_secs: 0.1,
            live_sync_target_latency_secs: 6.0,
            live_sync_min_latency_secs: 3.0,
            live_sync_max_latency_secs: 12.0,
            low_latency_prefetch_segments: 2,
            retry: RetryTuning::default(),
        }
    }
}

/// Manifest/media-source parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ManifestTuning {
    /// Presentation delay for live manifests, in seconds
    pub default_presentation_delay_secs: f64,
    /// Force transmuxing of incoming segments
    pub force_transmux: bool,
}

impl Default for ManifestTuning {
    fn default() -> Self {
        Self {
            default_presentation_delay_secs: 10.0,
            force_transmux: true,
        }
    }
}

/// Outgoing segment/manifest request, amendable by the request filter
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentRequest {
    pub url: Url,
    pub headers: HashMap<String, String>,
}

impl SegmentRequest {
    pub fn new(url: Url) -> Self {
        Self {
            url,
            headers: HashMap::new(),
        }
    }
}

/// Incoming segment/manifest response, amendable by the response filter
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentResponse {
    pub url: Url,
    pub headers: HashMap<String, String>,
}

pub type RequestFilter = Box<dyn Fn(&mut SegmentRequest) + Send + Sync>;
pub type ResponseFilter = Box<dyn Fn(&mut SegmentResponse) + Send + Sync>;

/// Control surface of the adaptive streaming engine.
///
/// One engine instance backs one [`crate::session::StreamSession`]; all
/// configuration methods must be called before [`StreamEngine::load`].
#[async_trait]
pub trait StreamEngine: Send {
    /// Supply clear-key DRM material (key id -> key, hex strings)
    fn configure_clear_keys(&mut self, keys: HashMap<String, String>);

    fn apply_streaming_tuning(&mut self, tuning: &StreamingTuning);

    fn apply_manifest_tuning(&mut self, tuning: &ManifestTuning);

    /// Install the hook amending every outgoing segment/manifest request
    fn set_request_filter(&mut self, filter: RequestFilter);

    /// Install the hook amending every incoming segment/manifest response
    fn set_response_filter(&mut self, filter: ResponseFilter);

    /// Load the manifest; on success returns the variant tracks
    async fn load(&mut self, manifest_url: &Url) -> Result<Vec<VariantTrack>>;

    /// Enable or disable engine-driven adaptive bitrate selection
    fn set_abr_enabled(&mut self, enabled: bool);

    fn abr_enabled(&self) -> bool;

    /// Pin the variant whose vertical resolution matches; returns false
    /// when no loaded variant has that height
    fn select_variant(&mut self, height: u32) -> bool;

    /// Tear down the engine. Must be idempotent.
    async fn destroy(&mut self);

    /// Take the engine's fault channel; yields `None` after the first call
    fn take_fault_receiver(&mut self) -> Option<mpsc::UnboundedReceiver<EngineFault>>;
}

/// Error raised when the media surface rejects an operation the platform
/// does not allow right now (e.g. autoplay without a user gesture)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackRejected(pub String);

impl std::fmt::Display for PlaybackRejected {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "playback rejected: {}", self.0)
    }
}

impl std::error::Error for PlaybackRejected {}

/// The single video surface the controller owns while mounted.
///
/// State is read back from the surface rather than asserted, so the
/// presentation machine never diverges from what the surface reports.
#[async_trait]
pub trait MediaSurface: Send {
    /// Begin playback; rejection means autoplay was denied
    async fn play(&mut self) -> std::result::Result<(), PlaybackRejected>;
    fn pause(&mut self);
    fn current_time(&self) -> f64;
    fn seek_to(&mut self, seconds: f64);
    fn duration(&self) -> f64;
    fn volume(&self) -> f64;
    fn set_volume(&mut self, volume: f64);
    fn muted(&self) -> bool;
    fn set_muted(&mut self, muted: bool);
    fn playback_rate(&self) -> f64;
    fn set_playback_rate(&mut self, rate: f64);
    fn is_paused(&self) -> bool;
}
