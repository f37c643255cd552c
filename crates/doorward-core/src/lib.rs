pub mod config;
pub mod constants;
pub mod error;
pub mod time;
pub mod types;

pub use config::{
    ControllerConfig, ForcedEntryPolicy, LogFormat, LoggingConfig, NodeConfig, RampConfig,
    RemoteConfig,
};
pub use error::{Error, Result};
pub use time::{FixedClock, SystemClock, WallClock};
pub use types::*;

/// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
