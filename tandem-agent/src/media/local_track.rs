use crate::error::EngineError;
use crate::media::{TrackKind, TrackSource};
use bytes::Bytes;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::media::Sample;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

struct TrackInner {
    id: String,
    source: TrackSource,
    enabled: AtomicBool,
    ended: CancellationToken,
    rtp: Arc<TrackLocalStaticSample>,
}

/// A local capture track. Clones share the same enabled flag and lifetime.
#[derive(Clone)]
pub struct LocalTrack {
    inner: Arc<TrackInner>,
}

impl LocalTrack {
    pub fn new(source: TrackSource, id: impl Into<String>, stream_id: impl Into<String>) -> Self {
        let id = id.into();
        let codec = match source.kind() {
            TrackKind::Audio => RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                clock_rate: 48000,
                channels: 2,
                ..Default::default()
            },
            TrackKind::Video => RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                clock_rate: 90000,
                ..Default::default()
            },
        };
        let rtp = Arc::new(TrackLocalStaticSample::new(
            codec,
            id.clone(),
            stream_id.into(),
        ));

        Self {
            inner: Arc::new(TrackInner {
                id,
                source,
                enabled: AtomicBool::new(true),
                ended: CancellationToken::new(),
                rtp,
            }),
        }
    }

    pub fn id(&self) -> &str {
        &self.inner.id
    }

    pub fn kind(&self) -> TrackKind {
        self.inner.source.kind()
    }

    pub fn source(&self) -> TrackSource {
        self.inner.source
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.inner.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Flips the enabled flag and returns the new value.
    pub fn toggle(&self) -> bool {
        !self.inner.enabled.fetch_xor(true, Ordering::SeqCst)
    }

    /// Ends the track for good. Idempotent.
    pub fn stop(&self) {
        self.inner.ended.cancel();
    }

    pub fn is_ended(&self) -> bool {
        self.inner.ended.is_cancelled()
    }

    /// Resolves once the track has ended, either by `stop` or by its source going away.
    pub async fn ended(&self) {
        self.inner.ended.cancelled().await
    }

    /// Engine-side track fed by this capture.
    pub fn rtp(&self) -> Arc<TrackLocalStaticSample> {
        self.inner.rtp.clone()
    }

    /// Pushes one encoded frame. Disabled or ended tracks drop it and return `false`.
    pub async fn write_sample(&self, data: Bytes, duration: Duration) -> Result<bool, EngineError> {
        if self.is_ended() || !self.is_enabled() {
            return Ok(false);
        }

        self.inner
            .rtp
            .write_sample(&Sample {
                data,
                duration,
                ..Default::default()
            })
            .await?;
        Ok(true)
    }
}

impl std::fmt::Debug for LocalTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalTrack")
            .field("id", &self.inner.id)
            .field("source", &self.inner.source)
            .field("enabled", &self.is_enabled())
            .field("ended", &self.is_ended())
            .finish()
    }
}
