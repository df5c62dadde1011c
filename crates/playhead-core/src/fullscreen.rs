//! Fullscreen and orientation coordination
//!
//! Fullscreen state is derived solely from the platform's change
//! notification, never asserted locally, so external exits (OS back
//! gesture, escape handled by the browser) are reflected correctly.
//! Orientation locking is an enhancement: rejections are a named,
//! non-fatal outcome, never an error.

use async_trait::async_trait;
use tracing::debug;

use crate::types::ViewportInfo;

/// Platform rejected an optional capability request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformDenied(pub String);

impl std::fmt::Display for PlatformDenied {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "platform denied: {}", self.0)
    }
}

impl std::error::Error for PlatformDenied {}

/// Result of an optional platform capability request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformOutcome {
    Applied,
    /// Request rejected or unavailable; playback continues unaffected
    Unavailable,
}

/// Fullscreen capability of the hosting platform
#[async_trait]
pub trait FullscreenPort: Send {
    async fn request_fullscreen(&mut self) -> Result<(), PlatformDenied>;
    async fn exit_fullscreen(&mut self) -> Result<(), PlatformDenied>;
}

/// Orientation-lock capability of the hosting platform
#[async_trait]
pub trait OrientationPort: Send {
    async fn lock_landscape(&mut self) -> Result<(), PlatformDenied>;
    fn unlock(&mut self);
}

/// Synchronizes fullscreen toggling with mobile orientation locking
pub struct FullscreenCoordinator {
    viewport: ViewportInfo,
    is_fullscreen: bool,
    orientation_locked: bool,
}

impl FullscreenCoordinator {
    pub fn new(viewport: ViewportInfo) -> Self {
        Self {
            viewport,
            is_fullscreen: false,
            orientation_locked: false,
        }
    }

    pub fn is_fullscreen(&self) -> bool {
        self.is_fullscreen
    }

    pub fn set_viewport(&mut self, viewport: ViewportInfo) {
        self.viewport = viewport;
    }

    /// Toggle fullscreen. The local flag stays untouched here; it only
    /// moves on [`FullscreenCoordinator::fullscreen_changed`].
    pub async fn toggle(&mut self, fullscreen: &mut dyn FullscreenPort) -> PlatformOutcome {
        let result = if self.is_fullscreen {
            fullscreen.exit_fullscreen().await
        } else {
            fullscreen.request_fullscreen().await
        };
        match result {
            Ok(()) => PlatformOutcome::Applied,
            Err(denied) => {
                debug!(%denied, "Fullscreen request rejected, ignoring");
                PlatformOutcome::Unavailable
            }
        }
    }

    /// Explicit exit (escape shortcut)
    pub async fn exit(&mut self, fullscreen: &mut dyn FullscreenPort) -> PlatformOutcome {
        if !self.is_fullscreen {
            return PlatformOutcome::Applied;
        }
        match fullscreen.exit_fullscreen().await {
            Ok(()) => PlatformOutcome::Applied,
            Err(denied) => {
                debug!(%denied, "Fullscreen exit rejected, ignoring");
                PlatformOutcome::Unavailable
            }
        }
    }

    /// Platform fullscreen-change notification. On entry at narrow
    /// viewports a landscape lock is requested; on exit any lock is
    /// released. Lock failures are swallowed.
    pub async fn fullscreen_changed(
        &mut self,
        active: bool,
        orientation: &mut dyn OrientationPort,
    ) -> PlatformOutcome {
        self.is_fullscreen = active;

        if active {
            if self.viewport.is_desktop() {
                return PlatformOutcome::Applied;
            }
            match orientation.lock_landscape().await {
                Ok(()) => {
                    self.orientation_locked = true;
                    debug!("Landscape orientation locked");
                    PlatformOutcome::Applied
                }
                Err(denied) => {
                    debug!(%denied, "Orientation lock rejected, ignoring");
                    PlatformOutcome::Unavailable
                }
            }
        } else {
            if self.orientation_locked {
                orientation.unlock();
                self.orientation_locked = false;
                debug!("Orientation lock released");
            }
            PlatformOutcome::Applied
        }
    }
}
