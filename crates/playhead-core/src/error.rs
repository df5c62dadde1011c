//! Error types for Playhead Core

use thiserror::Error;

/// Result type alias for controller operations
pub type Result<T> = std::result::Result<T, Error>;

/// Controller error types
#[derive(Error, Debug)]
pub enum Error {
    // Input errors (terminal, never retryable)
    #[error("Could not resolve a video identifier from: {url}")]
    UnresolvableIdentifier { url: String },

    #[error("Unsupported video descriptor: {0}")]
    UnsupportedDescriptor(String),

    // Engine faults (retryable via explicit user action)
    #[error("DRM license request failed: {0}")]
    LicenseRequest(String),

    #[error("DRM license response could not be parsed: {0}")]
    LicenseParse(String),

    #[error("Network error while streaming: {0}")]
    Network(String),

    #[error("Stream manifest is invalid: {0}")]
    InvalidManifest(String),

    #[error("Playback engine fault {code}: {detail}")]
    EngineInternal { code: u32, detail: String },
}

impl Error {
    /// Returns true if the user may recover by retrying playback
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Error::LicenseRequest(_)
                | Error::LicenseParse(_)
                | Error::Network(_)
                | Error::InvalidManifest(_)
                | Error::EngineInternal { .. }
        )
    }

    /// Returns the error code for log correlation
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::UnresolvableIdentifier { .. } => "UNRESOLVABLE_ID",
            Error::UnsupportedDescriptor(_) => "UNSUPPORTED_DESCRIPTOR",
            Error::LicenseRequest(_) => "LICENSE_REQUEST",
            Error::LicenseParse(_) => "LICENSE_PARSE",
            Error::Network(_) => "NETWORK",
            Error::InvalidManifest(_) => "INVALID_MANIFEST",
            Error::EngineInternal { .. } => "ENGINE_INTERNAL",
        }
    }
}
