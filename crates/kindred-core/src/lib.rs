pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::{CompanionConfig, EngineConfig, GeneralConfig, KindredConfig};
pub use error::{KindredError, Result};
pub use logging::{init_logging, init_logging_from_config};
pub use types::{Message, Sender};
