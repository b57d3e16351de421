
pub use mock_engine::*;
