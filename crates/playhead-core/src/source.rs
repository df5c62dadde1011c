//! Source classification
//!
//! Decides which playback strategy applies to a [`VideoDescriptor`]:
//! an embedded third-party provider (rendered without an engine) or an
//! adaptive stream driven through the streaming engine. Also hosts the
//! live-vs-VOD URL heuristic used to gate DRM and live-sync tuning.

use crate::error::{Error, Result};
use crate::types::{ContainerKind, DrmKeys, SourceKind, VideoDescriptor};
use tracing::debug;
use url::Url;

/// Resolved playback strategy for one descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum PlaybackStrategy {
    /// Render through the provider's embed frame; no engine session
    EmbeddedProvider { video_id: String },
    /// Drive the streaming engine against the resolved manifest URL
    AdaptiveStream {
        manifest_url: Url,
        container: ContainerKind,
        drm_keys: Option<DrmKeys>,
        is_live: bool,
    },
}

/// Hostname tokens that mark a stream as edge/live-CDN delivered.
///
/// This is a heuristic over URL shape, not a manifest-level flag; new
/// backend hostnames will not match until added here.
pub const LIVE_HOST_TOKENS: [&str; 3] = ["live-cdn", "livecdn", "edge-stream"];

/// Query parameters that identify a signed on-demand asset
pub const SIGNED_QUERY_PARAMS: [&str; 3] = ["Signature", "Key-Pair-Id", "Policy"];

/// Classify a descriptor into its playback strategy.
///
/// Fails with [`Error::UnresolvableIdentifier`] for embedded-provider
/// descriptors whose URL matches none of the known shapes; that error is
/// terminal and the caller renders it as a static, non-retryable state.
pub fn classify(descriptor: &VideoDescriptor) -> Result<PlaybackStrategy> {
    match descriptor.source_kind {
        SourceKind::EmbeddedProvider => {
            let video_id = extract_embed_id(&descriptor.primary_url).ok_or_else(|| {
                Error::UnresolvableIdentifier {
                    url: descriptor.primary_url.clone(),
                }
            })?;
            debug!(video_id = %video_id, "Classified as embedded provider");
            Ok(PlaybackStrategy::EmbeddedProvider { video_id })
        }
        SourceKind::AdaptiveDrm => {
            let manifest_url = descriptor
                .resolved_stream_url
                .clone()
                .ok_or_else(|| {
                    Error::UnsupportedDescriptor(
                        "adaptive descriptor without a resolved stream URL".into(),
                    )
                })?;
            let is_live = is_live_edge_url(&manifest_url);
            debug!(url = %manifest_url, is_live, "Classified as adaptive stream");
            Ok(PlaybackStrategy::AdaptiveStream {
                manifest_url,
                container: descriptor.container_kind,
                drm_keys: descriptor.drm_keys.clone(),
                is_live,
            })
        }
    }
}

/// Extract a canonical provider video id from an arbitrary URL shape.
///
/// Ordered matchers, first hit wins: watch-page URL, short-link URL,
/// embed URL, shorts URL, then a bare identifier string.
pub fn extract_embed_id(input: &str) -> Option<String> {
    let input = input.trim();

    if let Ok(url) = Url::parse(input) {
        // Watch page: https://provider/watch?v=<id>
        if url.path() == "/watch" {
            if let Some((_, v)) = url.query_pairs().find(|(k, _)| k == "v") {
                return valid_embed_id(&v);
            }
        }

        // Short link: https://youtu.be/<id>
        if url.host_str().is_some_and(|h| h.ends_with("youtu.be")) {
            if let Some(id) = url.path_segments().and_then(|mut s| s.next()) {
                return valid_embed_id(id);
            }
        }

        // Embed and shorts paths: /embed/<id>, /shorts/<id>
        let mut segments = url.path_segments()?;
        if let Some(first) = segments.next() {
            if first == "embed" || first == "shorts" {
                if let Some(id) = segments.next() {
                    return valid_embed_id(id);
                }
            }
        }
        return None;
    }

    // Bare identifier
    valid_embed_id(input)
}

/// Provider video ids are exactly 11 URL-safe characters
fn valid_embed_id(candidate: &str) -> Option<String> {
    let candidate = candidate.trim();
    let ok = candidate.len() == 11
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    ok.then(|| candidate.to_string())
}

/// Classify a resolved stream URL as live edge-delivered or on-demand.
///
/// True only when the hostname carries a known live-CDN token; a signed
/// on-demand URL (Signature / Key-Pair-Id / Policy query credentials) is
/// VOD even when hosted on a similar CDN. Heuristic only - a backend
/// serving live content through a signed-URL path would be misclassified.
pub fn is_live_edge_url(url: &Url) -> bool {
    if is_signed_url(url) {
        return false;
    }
    let Some(host) = url.host_str() else {
        return false;
    };
    LIVE_HOST_TOKENS.iter().any(|token| host.contains(token))
}

/// Whether the URL carries signed-asset query credentials
pub fn is_signed_url(url: &Url) -> bool {
    url.query_pairs()
        .any(|(k, _)| SIGNED_QUERY_PARAMS.iter().any(|p| k == *p))
}

/// Whether the URL is served by the managed CDN that needs relaxed
/// retry and buffering tuning (longer edge propagation)
pub fn is_managed_cdn_url(url: &Url) -> bool {
    url.host_str()
        .is_some_and(|h| h.ends_with(".cloudfront.net"))
}
