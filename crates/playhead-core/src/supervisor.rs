//! Engine fault classification
//!
//! Maps the engine's numeric fault codes onto a small taxonomy with short
//! user-facing messages. Retry itself is orchestrated by the controller:
//! it is always user-triggered, never silent, so repeated DRM failures
//! stay visible instead of masking a real access problem.

use serde::{Deserialize, Serialize};

use crate::engine::{
    EngineFault, FAULT_BAD_HTTP_STATUS, FAULT_HTTP_ERROR, FAULT_INVALID_MANIFEST,
    FAULT_LICENSE_REQUEST_FAILED, FAULT_LICENSE_RESPONSE_REJECTED, FAULT_TIMEOUT,
};
use crate::error::Error;

/// Fault taxonomy for user-visible error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FaultKind {
    LicenseRequest,
    LicenseParse,
    Network,
    Manifest,
    Unknown,
}

impl FaultKind {
    /// Short message rendered on the error overlay
    pub fn user_message(&self) -> &'static str {
        match self {
            FaultKind::LicenseRequest => "DRM license request failed",
            FaultKind::LicenseParse => "DRM license could not be read",
            FaultKind::Network => "Network error while streaming",
            FaultKind::Manifest => "Stream manifest is invalid",
            FaultKind::Unknown => "Playback failed",
        }
    }
}

/// Classify an engine fault code
pub fn classify(fault: &EngineFault) -> FaultKind {
    match fault.code {
        FAULT_LICENSE_REQUEST_FAILED => FaultKind::LicenseRequest,
        FAULT_LICENSE_RESPONSE_REJECTED => FaultKind::LicenseParse,
        FAULT_BAD_HTTP_STATUS | FAULT_HTTP_ERROR | FAULT_TIMEOUT => FaultKind::Network,
        FAULT_INVALID_MANIFEST => FaultKind::Manifest,
        _ => FaultKind::Unknown,
    }
}

/// Lift an engine fault into the crate error type
pub fn fault_to_error(fault: &EngineFault) -> Error {
    match classify(fault) {
        FaultKind::LicenseRequest => Error::LicenseRequest(fault.detail.clone()),
        FaultKind::LicenseParse => Error::LicenseParse(fault.detail.clone()),
        FaultKind::Network => Error::Network(fault.detail.clone()),
        FaultKind::Manifest => Error::InvalidManifest(fault.detail.clone()),
        FaultKind::Unknown => Error::EngineInternal {
            code: fault.code,
            detail: fault.detail.clone(),
        },
    }
}

/// User-facing message for a load or playback error
pub fn error_message(error: &Error) -> &'static str {
    match error {
        Error::LicenseRequest(_) => FaultKind::LicenseRequest.user_message(),
        Error::LicenseParse(_) => FaultKind::LicenseParse.user_message(),
        Error::Network(_) => FaultKind::Network.user_message(),
        Error::InvalidManifest(_) => FaultKind::Manifest.user_message(),
        _ => FaultKind::Unknown.user_message(),
    }
}
