use crate::media::MediaConstraints;
use tandem_core::utils::{
    DEFAULT_STUN_ADDR, DEFAULT_STUN_ADDR_2, DEFAULT_STUN_ADDR_3, DEFAULT_STUN_ADDR_4,
};
use tandem_core::{IceServerConfig, RoomId};

pub const DEFAULT_SIGNALING_URL: &str = "ws://127.0.0.1:5000/ws";
pub const DEFAULT_SENDER_LABEL: &str = "Peer";

/// Everything one agent needs to know about its session. Several agents with
/// different configs can live in one process.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub room_id: RoomId,
    pub signaling_url: String,
    pub ice_servers: Vec<IceServerConfig>,
    /// Name attached to outgoing chat lines.
    pub sender_label: String,
    pub constraints: MediaConstraints,
}

impl AgentConfig {
    pub fn new(room_id: impl Into<RoomId>) -> Self {
        Self {
            room_id: room_id.into(),
            signaling_url: DEFAULT_SIGNALING_URL.to_owned(),
            ice_servers: default_ice_servers(),
            sender_label: DEFAULT_SENDER_LABEL.to_owned(),
            constraints: MediaConstraints::default(),
        }
    }

    pub fn with_signaling_url(mut self, url: impl Into<String>) -> Self {
        self.signaling_url = url.into();
        self
    }

    pub fn with_sender_label(mut self, label: impl Into<String>) -> Self {
        self.sender_label = label.into();
        self
    }

    pub fn with_ice_servers(mut self, ice_servers: Vec<IceServerConfig>) -> Self {
        self.ice_servers = ice_servers;
        self
    }

    pub fn with_constraints(mut self, constraints: MediaConstraints) -> Self {
        self.constraints = constraints;
        self
    }
}

pub fn default_ice_servers() -> Vec<IceServerConfig> {
    vec![IceServerConfig {
        urls: [
            DEFAULT_STUN_ADDR,
            DEFAULT_STUN_ADDR_2,
            DEFAULT_STUN_ADDR_3,
            DEFAULT_STUN_ADDR_4,
        ]
        .into_iter()
        .map(str::to_owned)
        .collect(),
        username: None,
        credential: None,
    }]
}
