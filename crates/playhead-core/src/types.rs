//! Core types for the Playhead controller

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Unique identifier for a playback session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which playback path a descriptor requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// DRM-capable adaptive stream driven through the streaming engine
    AdaptiveDrm,
    /// Third-party embedded provider (rendered in an embed frame, no engine)
    EmbeddedProvider,
}

/// Container format hint for the adaptive path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    Dash,
    Hls,
    Unknown,
}

/// Clear-key DRM material, passed through to the engine untouched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrmKeys {
    /// Key id as a hex string
    pub key_id: String,
    /// Raw decryption key as a hex string
    pub key: String,
}

impl DrmKeys {
    /// Both halves must be non-empty for the material to be usable
    pub fn is_usable(&self) -> bool {
        !self.key_id.trim().is_empty() && !self.key.trim().is_empty()
    }
}

/// Immutable input to the controller, created by the caller before mount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoDescriptor {
    /// Playback path selector
    pub source_kind: SourceKind,
    /// Original URL as delivered by the content backend
    pub primary_url: String,
    /// Resolved stream URL (signed manifest URL for the adaptive path)
    pub resolved_stream_url: Option<Url>,
    /// Container format hint
    pub container_kind: ContainerKind,
    /// Clear-key DRM material, if the asset is protected
    pub drm_keys: Option<DrmKeys>,
    /// Optional CDN hint from the backend
    pub cdn_hint: Option<String>,
}

/// UI-facing status of the presentation state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationStatus {
    /// Manifest load or session rebuild in progress
    Loading,
    /// Content is playing
    Playing,
    /// Playback paused
    Paused,
    /// Transient stall, overlay state only
    Buffering,
    /// Fatal engine fault, waiting for user retry
    Error,
}

impl PresentationStatus {
    /// Check if transition to target status is valid
    pub fn can_transition_to(&self, target: PresentationStatus) -> bool {
        use PresentationStatus::*;
        matches!(
            (self, target),
            // From Loading
            (Loading, Playing) | (Loading, Paused) | (Loading, Buffering) | (Loading, Error) |
            // From Playing
            (Playing, Paused) | (Playing, Buffering) | (Playing, Error) |
            // From Paused
            (Paused, Playing) | (Paused, Buffering) | (Paused, Error) |
            // From Buffering (transient, never sticky)
            (Buffering, Playing) | (Buffering, Paused) | (Buffering, Error) |
            // From Error, only via user retry
            (Error, Loading)
        )
    }
}

impl std::fmt::Display for PresentationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PresentationStatus::Loading => write!(f, "loading"),
            PresentationStatus::Playing => write!(f, "playing"),
            PresentationStatus::Paused => write!(f, "paused"),
            PresentationStatus::Buffering => write!(f, "buffering"),
            PresentationStatus::Error => write!(f, "error"),
        }
    }
}

/// Snapshot read by the transport-control surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PresentationState {
    pub status: PresentationStatus,
    pub error_message: Option<String>,
    pub current_time: f64,
    pub duration: f64,
    pub volume: f64,
    pub muted: bool,
    pub playback_rate: f64,
    pub is_fullscreen: bool,
    pub is_live: bool,
}

impl Default for PresentationState {
    fn default() -> Self {
        Self {
            status: PresentationStatus::Loading,
            error_message: None,
            current_time: 0.0,
            duration: 0.0,
            volume: 1.0,
            muted: false,
            playback_rate: 1.0,
            is_fullscreen: false,
            is_live: false,
        }
    }
}

impl PresentationState {
    /// Duration for display; live streams suppress it entirely
    pub fn display_duration(&self) -> Option<f64> {
        if self.is_live {
            None
        } else {
            Some(self.duration)
        }
    }
}

/// One selectable rendition in the quality menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityLevel {
    /// Human-readable label, e.g. "720p"
    pub label: String,
    /// Vertical resolution, the selection key
    pub height: u32,
}

impl QualityLevel {
    pub fn from_height(height: u32) -> Self {
        Self {
            label: format!("{height}p"),
            height,
        }
    }
}

/// Manual selection vs. engine-driven adaptive selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualitySelection {
    /// Engine-driven adaptive bitrate selection (the default)
    Automatic,
    /// Pinned to the rendition with this vertical resolution
    Explicit(u32),
}

/// Quality menu contents, rebuilt on every successful manifest load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityCatalog {
    /// Levels sorted descending by height
    pub levels: Vec<QualityLevel>,
    /// Current selection; `Automatic` is always valid
    pub current_selection: QualitySelection,
}

impl Default for QualityCatalog {
    fn default() -> Self {
        Self {
            levels: Vec::new(),
            current_selection: QualitySelection::Automatic,
        }
    }
}

impl QualityCatalog {
    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Whether a level with the given height exists in the catalog
    pub fn contains_height(&self, height: u32) -> bool {
        self.levels.iter().any(|l| l.height == height)
    }
}

/// Viewport breakpoints shared by the gesture dispatcher and the
/// fullscreen coordinator
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportInfo {
    /// Width in CSS pixels
    pub width: u32,
}

impl ViewportInfo {
    /// Below this width keyboard shortcuts are suppressed and the
    /// press-and-hold gesture is enabled
    pub const DESKTOP_MIN_WIDTH: u32 = 768;

    pub fn is_desktop(&self) -> bool {
        self.width >= Self::DESKTOP_MIN_WIDTH
    }
}
