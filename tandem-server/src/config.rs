use std::net::{Ipv4Addr, SocketAddr};

pub const DEFAULT_PORT: u16 = 5000;

/// Settings for the relay process.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    /// Depth of the queue between socket tasks and the room coordinator.
    pub command_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            command_capacity: 256,
        }
    }
}
