pub use tandem_core::{ConnectionId, Role, RoomId, SignalMessage};

pub mod model {
    pub use tandem_core::model::*;
}

#[cfg(feature = "server")]
pub mod server {
    pub use tandem_server::*;
}

#[cfg(feature = "agent")]
pub mod agent {
    pub use tandem_agent::*;
}
