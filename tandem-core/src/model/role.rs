use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the session may originate the offer. Fixed once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// First member of the room; told `ready` when the second arrives.
    Initiator,
    /// Second member of the room; answers the initiator's offer.
    Responder,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Initiator => f.write_str("initiator"),
            Role::Responder => f.write_str("responder"),
        }
    }
}
