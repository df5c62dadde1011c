//! Manual quality selection vs. engine-driven ABR
//!
//! Selection state and the engine's ABR flag move together: an explicit
//! selection disables ABR before pinning the variant, an automatic
//! selection re-enables it, with no intermediate state observable by the
//! UI (no await points between the two mutations).

use tracing::{debug, warn};

use crate::session::StreamSession;
use crate::types::QualitySelection;

/// Borrowed controller over one session's quality selection
pub struct QualityController<'a> {
    session: &'a mut StreamSession,
}

impl<'a> QualityController<'a> {
    pub fn new(session: &'a mut StreamSession) -> Self {
        Self { session }
    }

    /// Re-enable engine-driven adaptive bitrate selection
    pub fn select_automatic(&mut self) {
        self.session.engine_mut().set_abr_enabled(true);
        self.session.catalog_mut().current_selection = QualitySelection::Automatic;
        debug!("Quality selection: automatic");
    }

    /// Pin the variant with the given vertical resolution.
    ///
    /// A height not present in the current catalog is a logged
    /// inconsistency and a no-op, never an error.
    pub fn select_explicit(&mut self, height: u32) {
        if !self.session.catalog().contains_height(height) {
            warn!(height, "Explicit quality selection for unknown height, ignoring");
            return;
        }

        let engine = self.session.engine_mut();
        engine.set_abr_enabled(false);
        if !engine.select_variant(height) {
            // Catalog and engine tracks disagree; restore ABR rather than
            // leave the flag pinned to nothing.
            warn!(height, "Engine has no variant for catalog height, restoring ABR");
            engine.set_abr_enabled(true);
            return;
        }
        self.session.catalog_mut().current_selection = QualitySelection::Explicit(height);
        debug!(height, "Quality selection: explicit");
    }

    /// Current selection, for the quality menu
    pub fn current_selection(&self) -> QualitySelection {
        self.session.catalog().current_selection
    }
}
