//! Configuration, paths, and logging for the Mentora auth client.

mod config;
mod error;
mod logging;
mod paths;

pub use config::{Config, DEFAULT_IDENTITY_ORIGIN, DEFAULT_LOG_LEVEL};
pub use error::{ConfigError, ConfigResult};
pub use logging::{init_logging, parse_level};
pub use paths::Paths;
