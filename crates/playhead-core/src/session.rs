//! Stream session management
//!
//! One [`StreamSession`] owns exactly one engine instance for the life of
//! a mount (or until a retry rebuild). It applies configuration in a fixed
//! order before manifest load - DRM material, streaming tuning, manifest
//! tuning, request/response filters - and populates the quality catalog
//! from the variant tracks the load reports.

use std::collections::HashMap;

use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::engine::{
    ManifestTuning, RetryTuning, SegmentRequest, SegmentResponse, StreamEngine, StreamingTuning,
};
use crate::error::Result;
use crate::source::{is_managed_cdn_url, PlaybackStrategy, SIGNED_QUERY_PARAMS};
use crate::types::{QualityCatalog, QualityLevel, QualitySelection, SessionId};

const CORS_HEADER: &str = "Access-Control-Allow-Origin";

/// Streaming parameters for a stream, widened for the managed CDN where
/// edge propagation takes longer
pub fn build_streaming_tuning(managed_cdn: bool) -> StreamingTuning {
    let mut tuning = StreamingTuning::default();
    if managed_cdn {
        tuning.buffering_goal_secs = 60.0;
        tuning.live_sync_target_latency_secs = 12.0;
        tuning.live_sync_max_latency_secs = 24.0;
        tuning.retry = RetryTuning {
            max_attempts: 6,
            ..RetryTuning::default()
        };
    }
    tuning
}

/// Signed-URL credentials carried on the resolved manifest URL.
///
/// Per-segment URIs from the manifest do not always inherit the top-level
/// signed-URL parameters, so these are re-attached by the request filter.
pub fn signed_credentials(url: &Url) -> Vec<(String, String)> {
    url.query_pairs()
        .filter(|(k, _)| SIGNED_QUERY_PARAMS.iter().any(|p| k == *p))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// Append the credentials to a request URL that lacks them
pub fn attach_signed_credentials(credentials: &[(String, String)], request: &mut SegmentRequest) {
    let present: Vec<String> = request
        .url
        .query_pairs()
        .map(|(k, _)| k.into_owned())
        .collect();
    let missing: Vec<&(String, String)> = credentials
        .iter()
        .filter(|(key, _)| !present.iter().any(|p| p == key))
        .collect();
    if missing.is_empty() {
        return;
    }
    let mut pairs = request.url.query_pairs_mut();
    for (key, value) in missing {
        pairs.append_pair(key, value);
    }
    drop(pairs);
}

/// Guarantee a permissive cross-origin header before decode handoff
pub fn ensure_cors_header(response: &mut SegmentResponse) {
    response
        .headers
        .entry(CORS_HEADER.to_string())
        .or_insert_with(|| "*".to_string());
}

/// One live playback session: engine instance, its configuration, and the
/// quality catalog produced by the last successful load
pub struct StreamSession {
    id: SessionId,
    engine: Box<dyn StreamEngine>,
    manifest_url: Url,
    is_live: bool,
    catalog: QualityCatalog,
    destroyed: bool,
}

impl StreamSession {
    /// Build and configure a session for an adaptive-stream strategy.
    ///
    /// Configuration order: (1) clear-key DRM, only when both key halves
    /// are present and the stream is not live-classified (edge streams are
    /// assumed clear); (2) streaming tuning with managed-CDN overrides;
    /// (3) manifest tuning; then the networking filters. All of this runs
    /// before [`StreamSession::load`].
    #[instrument(skip(engine, strategy))]
    pub fn new(mut engine: Box<dyn StreamEngine>, strategy: &PlaybackStrategy) -> Result<Self> {
        let PlaybackStrategy::AdaptiveStream {
            manifest_url,
            drm_keys,
            is_live,
            ..
        } = strategy
        else {
            return Err(crate::error::Error::UnsupportedDescriptor(
                "embedded-provider strategy does not take a stream session".into(),
            ));
        };

        let id = SessionId::new();
        let is_live = *is_live;

        match drm_keys {
            Some(keys) if keys.is_usable() && !is_live => {
                let mut map = HashMap::new();
                map.insert(keys.key_id.clone(), keys.key.clone());
                engine.configure_clear_keys(map);
                debug!(session_id = %id, "Clear-key DRM configured");
            }
            Some(_) if is_live => {
                // Live edge streams are assumed clear; key material is
                // ignored even when present.
                warn!(session_id = %id, "DRM keys present on live-classified stream, skipping DRM");
            }
            _ => {}
        }

        let managed_cdn = is_managed_cdn_url(manifest_url);
        engine.apply_streaming_tuning(&build_streaming_tuning(managed_cdn));
        engine.apply_manifest_tuning(&ManifestTuning::default());

        let credentials = signed_credentials(manifest_url);
        engine.set_request_filter(Box::new(move |request| {
            attach_signed_credentials(&credentials, request);
        }));
        engine.set_response_filter(Box::new(ensure_cors_header));

        info!(
            session_id = %id,
            url = %manifest_url,
            is_live,
            managed_cdn,
            "Stream session configured"
        );

        Ok(Self {
            id,
            engine,
            manifest_url: manifest_url.clone(),
            is_live,
            catalog: QualityCatalog::default(),
            destroyed: false,
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn is_live(&self) -> bool {
        self.is_live
    }

    pub fn catalog(&self) -> &QualityCatalog {
        &self.catalog
    }

    pub(crate) fn catalog_mut(&mut self) -> &mut QualityCatalog {
        &mut self.catalog
    }

    pub(crate) fn engine_mut(&mut self) -> &mut dyn StreamEngine {
        self.engine.as_mut()
    }

    /// Take the engine's fault channel for the supervisor to poll
    pub fn take_fault_receiver(
        &mut self,
    ) -> Option<tokio::sync::mpsc::UnboundedReceiver<crate::engine::EngineFault>> {
        self.engine.take_fault_receiver()
    }

    /// Load the manifest and rebuild the quality catalog.
    ///
    /// Only variants with a usable vertical resolution enter the catalog,
    /// sorted descending; selection resets to automatic and ABR is
    /// re-enabled.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn load(&mut self) -> Result<()> {
        let tracks = self.engine.load(&self.manifest_url).await?;

        let mut heights: Vec<u32> = tracks.iter().filter_map(|t| t.height).collect();
        heights.sort_unstable_by(|a, b| b.cmp(a));
        heights.dedup();

        self.catalog = QualityCatalog {
            levels: heights.into_iter().map(QualityLevel::from_height).collect(),
            current_selection: QualitySelection::Automatic,
        };
        self.engine.set_abr_enabled(true);

        info!(
            levels = self.catalog.levels.len(),
            is_live = self.is_live,
            "Manifest loaded, quality catalog rebuilt"
        );
        Ok(())
    }

    /// Tear the session down. Idempotent: destroying twice is a no-op.
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn teardown(&mut self) {
        if self.destroyed {
            debug!("Teardown requested on already-destroyed session");
            return;
        }
        self.engine.destroy().await;
        self.catalog = QualityCatalog::default();
        self.destroyed = true;
        info!("Stream session destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signed_manifest_url() -> Url {
        Url::parse(
            "https://d1.cloudfront.net/out/master.mpd?Signature=sig&Key-Pair-Id=kp&Policy=pol",
        )
        .unwrap()
    }

    #[test]
    fn test_signed_credentials_extraction() {
        let creds = signed_credentials(&signed_manifest_url());
        assert_eq!(creds.len(), 3);
        assert!(creds.iter().any(|(k, v)| k == "Signature" && v == "sig"));
    }

    #[test]
    fn test_credentials_attached_when_missing() {
        let creds = signed_credentials(&signed_manifest_url());
        let mut request = SegmentRequest::new(
            Url::parse("https://d1.cloudfront.net/out/video/seg-7.m4s").unwrap(),
        );
        attach_signed_credentials(&creds, &mut request);

        let query = request.url.query().unwrap();
        assert!(query.contains("Signature=sig"));
        assert!(query.contains("Key-Pair-Id=kp"));
        assert!(query.contains("Policy=pol"));
    }

    #[test]
    fn test_credentials_not_duplicated() {
        let creds = signed_credentials(&signed_manifest_url());
        let mut request = SegmentRequest::new(
            Url::parse("https://d1.cloudfront.net/seg.m4s?Signature=already-there").unwrap(),
        );
        attach_signed_credentials(&creds, &mut request);

        let query = request.url.query().unwrap();
        assert_eq!(query.matches("Signature=").count(), 1);
        assert!(query.contains("Signature=already-there"));
        // The missing pair is still added
        assert!(query.contains("Policy=pol"));
    }

    #[test]
    fn test_cors_header_forced() {
        let mut response = SegmentResponse {
            url: Url::parse("https://d1.cloudfront.net/seg.m4s").unwrap(),
            headers: HashMap::new(),
        };
        ensure_cors_header(&mut response);
        assert_eq!(response.headers.get(CORS_HEADER).map(String::as_str), Some("*"));

        // An existing value is left alone
        response
            .headers
            .insert(CORS_HEADER.into(), "https://portal.example".into());
        ensure_cors_header(&mut response);
        assert_eq!(
            response.headers.get(CORS_HEADER).map(String::as_str),
            Some("https://portal.example")
        );
    }

    #[test]
    fn test_managed_cdn_tuning_widened() {
        let default = build_streaming_tuning(false);
        let managed = build_streaming_tuning(true);
        assert!(managed.buffering_goal_secs > default.buffering_goal_secs);
        assert!(managed.retry.max_attempts > default.retry.max_attempts);
        assert!(
            managed.live_sync_target_latency_secs > default.live_sync_target_latency_secs
        );
    }
}
