mod agent;
mod config;
mod engine;
mod error;
mod media;
mod relay;

pub use agent::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use media::*;
pub use relay::*;
