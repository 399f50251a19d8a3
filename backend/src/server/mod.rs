//! Server configuration and wiring.

pub mod config;
pub mod state_builders;

pub use config::{AppConfig, ConfigError};
pub use state_builders::build_http_state;
