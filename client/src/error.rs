//! Configuration errors
//!
//! Gateway and device failures have their own enums next to the code that
//! raises them (`GatewayError`, `DeviceError`).

use thiserror::Error;

/// Configuration could not be resolved
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Server URL is not an absolute `http(s)` URL
    #[error("Invalid server URL: {0}")]
    InvalidServerUrl(String),
}
