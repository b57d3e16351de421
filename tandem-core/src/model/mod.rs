mod connection;
mod role;
mod room;
mod signaling;

pub use connection::{ConnectionId, ParseIdError};
pub use role::Role;
pub use room::RoomId;
pub use signaling::{IceCandidatePayload, IceServerConfig, SignalMessage};
