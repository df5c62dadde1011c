//! Playhead Core - Adaptive Media Playback Controller
//!
//! This crate provides the orchestration layer above an adaptive
//! streaming engine:
//! - Source classification (embedded provider vs. DRM/adaptive stream)
//! - Stream session lifecycle (configure, load, teardown, retry rebuild)
//! - Live-vs-VOD URL heuristics and CDN-specific tuning
//! - Manual quality selection vs. engine-driven ABR
//! - Gesture and shortcut dispatch, including the press-and-hold 2x boost
//! - Presentation state machine driving the transport-control surface
//! - Fullscreen/orientation coordination
//! - Engine fault classification and user-visible retry
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Playhead Core                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐           │
//! │  │    Source    │  │    Stream    │  │   Quality    │           │
//! │  │  Classifier  │  │   Session    │  │  Controller  │           │
//! │  └──────┬───────┘  └──────┬───────┘  └──────┬───────┘           │
//! │         │                 │                 │                   │
//! │         └─────────────────┼─────────────────┘                   │
//! │                           │                                     │
//! │                    ┌──────┴──────┐                              │
//! │                    │   Player    │                              │
//! │                    │ Controller  │                              │
//! │                    └──────┬──────┘                              │
//! │                           │                                     │
//! │  ┌──────────────┐  ┌──────┴──────┐  ┌──────────────┐            │
//! │  │   Gesture    │  │Presentation │  │  Fullscreen  │            │
//! │  │  Dispatcher  │  │   Machine   │  │ Coordinator  │            │
//! │  └──────────────┘  └─────────────┘  └──────────────┘            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The decode/DRM engine itself and the media surface are consumed
//! capabilities ([`StreamEngine`], [`MediaSurface`]), configured and
//! driven here but not implemented.

pub mod controller;
pub mod engine;
pub mod error;
pub mod fullscreen;
pub mod gesture;
pub mod mock;
pub mod presentation;
pub mod quality;
pub mod session;
pub mod source;
pub mod supervisor;
pub mod types;

pub use controller::{ControllerConfig, EngineFactory, PlatformPorts, PlayerController, UiRequest};
pub use engine::{
    EngineFault, ManifestTuning, MediaSurface, RetryTuning, SegmentRequest, SegmentResponse,
    StreamEngine, StreamingTuning, VariantTrack,
};
pub use error::{Error, Result};
pub use fullscreen::{FullscreenCoordinator, FullscreenPort, OrientationPort, PlatformOutcome};
pub use gesture::{GestureConfig, GestureDispatcher, Key, ReleaseOutcome, TransportCommand};
pub use presentation::{MediaEvent, OverlayTimer, PresentationMachine};
pub use quality::QualityController;
pub use session::StreamSession;
pub use source::{classify, extract_embed_id, is_live_edge_url, PlaybackStrategy};
pub use supervisor::FaultKind;
pub use types::*;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the controller library with default configuration
pub fn init() {
    tracing::info!(version = VERSION, "Playhead Core initialized");
}
