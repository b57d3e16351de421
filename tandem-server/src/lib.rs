mod app;
mod config;
mod room;
mod signaling;

pub use app::*;
pub use config::*;
pub use room::*;
pub use signaling::*;
