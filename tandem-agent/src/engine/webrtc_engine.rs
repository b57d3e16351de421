use crate::engine::{
    EngineEvent, PeerConnection, PeerConnectionFactory, PeerState, SdpKind, SessionDescription,
};
use crate::error::EngineError;
use crate::media::{LocalTrack, TrackKind};
use async_trait::async_trait;
use std::sync::Arc;
use tandem_core::{IceCandidatePayload, IceServerConfig};
use tokio::sync::mpsc;
use tracing::{debug, info};
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::peer_connection_state::RTCPeerConnectionState;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;
use webrtc::rtp_transceiver::RTCRtpTransceiver;
use webrtc::rtp_transceiver::rtp_codec::RTPCodecType;
use webrtc::rtp_transceiver::rtp_receiver::RTCRtpReceiver;
use webrtc::track::track_local::TrackLocal;
use webrtc::track::track_remote::TrackRemote;

/// Builds [`WebRtcPeerConnection`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebRtcFactory;

#[async_trait]
impl PeerConnectionFactory for WebRtcFactory {
    async fn create(
        &self,
        ice_servers: &[IceServerConfig],
        events: mpsc::UnboundedSender<EngineEvent>,
    ) -> Result<Arc<dyn PeerConnection>, EngineError> {
        let pc = WebRtcPeerConnection::new(ice_servers, events).await?;
        Ok(Arc::new(pc))
    }
}

/// [`PeerConnection`] backed by a `webrtc` crate `RTCPeerConnection`.
pub struct WebRtcPeerConnection {
    peer_connection: Arc<RTCPeerConnection>,
}

impl WebRtcPeerConnection {
    pub async fn new(
        ice_servers: &[IceServerConfig],
        events: mpsc::UnboundedSender<EngineEvent>,
    ) -> Result<Self, EngineError> {
        let mut m = MediaEngine::default();
        m.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut m)?;

        let api = APIBuilder::new()
            .with_media_engine(m)
            .with_interceptor_registry(registry)
            .build();

        let rtc_config = RTCConfiguration {
            ice_servers: ice_servers
                .iter()
                .map(|server| RTCIceServer {
                    urls: server.urls.clone(),
                    username: server.username.clone().unwrap_or_default(),
                    credential: server.credential.clone().unwrap_or_default(),
                    ..Default::default()
                })
                .collect(),
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        let state_tx = events.clone();
        peer_connection.on_peer_connection_state_change(Box::new(
            move |s: RTCPeerConnectionState| {
                let tx = state_tx.clone();
                Box::pin(async move {
                    info!("Peer connection state changed: {:?}", s);
                    let state = match s {
                        RTCPeerConnectionState::Unspecified | RTCPeerConnectionState::New => {
                            PeerState::New
                        }
                        RTCPeerConnectionState::Connecting => PeerState::Connecting,
                        RTCPeerConnectionState::Connected => PeerState::Connected,
                        RTCPeerConnectionState::Disconnected => PeerState::Disconnected,
                        RTCPeerConnectionState::Failed => PeerState::Failed,
                        RTCPeerConnectionState::Closed => PeerState::Closed,
                    };
                    let _ = tx.send(EngineEvent::StateChanged(state));
                })
            },
        ));

        let ice_tx = events.clone();
        peer_connection.on_ice_candidate(Box::new(move |c: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            Box::pin(async move {
                let Some(candidate) = c else {
                    let _ = tx.send(EngineEvent::LocalCandidate(None));
                    return;
                };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let _ = tx.send(EngineEvent::LocalCandidate(Some(IceCandidatePayload {
                    candidate: init.candidate,
                    sdp_mid: init.sdp_mid,
                    sdp_m_line_index: init.sdp_mline_index,
                    username_fragment: init.username_fragment,
                })));
            })
        }));

        let track_tx = events;
        peer_connection.on_track(Box::new(
            move |track: Arc<TrackRemote>,
                  _receiver: Arc<RTCRtpReceiver>,
                  _transceiver: Arc<RTCRtpTransceiver>| {
                let tx = track_tx.clone();
                Box::pin(async move {
                    let kind = match track.kind() {
                        RTPCodecType::Audio => TrackKind::Audio,
                        RTPCodecType::Video => TrackKind::Video,
                        RTPCodecType::Unspecified => return,
                    };
                    debug!("Remote {} track arrived: {}", kind, track.id());
                    let _ = tx.send(EngineEvent::RemoteTrack {
                        id: track.id(),
                        kind,
                    });
                })
            },
        ));

        Ok(Self { peer_connection })
    }

    fn to_rtc(desc: SessionDescription) -> Result<RTCSessionDescription, EngineError> {
        let rtc = match desc.kind {
            SdpKind::Offer => RTCSessionDescription::offer(desc.sdp)?,
            SdpKind::Answer => RTCSessionDescription::answer(desc.sdp)?,
        };
        Ok(rtc)
    }
}

#[async_trait]
impl PeerConnection for WebRtcPeerConnection {
    async fn add_track(&self, track: &LocalTrack) -> Result<(), EngineError> {
        let sender = self
            .peer_connection
            .add_track(track.rtp() as Arc<dyn TrackLocal + Send + Sync>)
            .await?;

        // RTCP has to be drained for the interceptors to keep working.
        tokio::spawn(async move {
            let mut rtcp_buf = vec![0u8; 1500];
            while sender.read(&mut rtcp_buf).await.is_ok() {}
        });

        Ok(())
    }

    async fn create_offer(&self) -> Result<SessionDescription, EngineError> {
        let offer = self.peer_connection.create_offer(None).await?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    async fn create_answer(&self) -> Result<SessionDescription, EngineError> {
        let answer = self.peer_connection.create_answer(None).await?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    async fn set_local_description(&self, desc: SessionDescription) -> Result<(), EngineError> {
        self.peer_connection
            .set_local_description(Self::to_rtc(desc)?)
            .await?;
        Ok(())
    }

    async fn set_remote_description(&self, desc: SessionDescription) -> Result<(), EngineError> {
        self.peer_connection
            .set_remote_description(Self::to_rtc(desc)?)
            .await?;
        Ok(())
    }

    async fn add_ice_candidate(&self, candidate: IceCandidatePayload) -> Result<(), EngineError> {
        let init = RTCIceCandidateInit {
            candidate: candidate.candidate,
            sdp_mid: candidate.sdp_mid,
            sdp_mline_index: candidate.sdp_m_line_index,
            username_fragment: candidate.username_fragment,
        };
        self.peer_connection.add_ice_candidate(init).await?;
        Ok(())
    }

    async fn replace_track(&self, track: &LocalTrack) -> Result<(), EngineError> {
        let wanted = match track.kind() {
            TrackKind::Audio => RTPCodecType::Audio,
            TrackKind::Video => RTPCodecType::Video,
        };

        for sender in self.peer_connection.get_senders().await {
            let Some(current) = sender.track().await else {
                continue;
            };
            if current.kind() != wanted {
                continue;
            }

            sender
                .replace_track(Some(track.rtp() as Arc<dyn TrackLocal + Send + Sync>))
                .await?;
            return Ok(());
        }

        Err(EngineError::NoSender(track.kind()))
    }

    async fn close(&self) -> Result<(), EngineError> {
        self.peer_connection.close().await?;
        Ok(())
    }
}
