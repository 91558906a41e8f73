//! Device error types
//!
//! Errors from capture, picking and playback collaborators.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while driving a media device
#[derive(Error, Debug)]
pub enum DeviceError {
    /// No command is configured for the requested device
    #[error("No {0} command configured")]
    NotConfigured(&'static str),

    /// Failed to spawn the device process (e.g., command not found)
    #[error("Failed to spawn process: {0}")]
    SpawnFailed(#[from] std::io::Error),

    /// Device process exited with a failure
    #[error("Process execution failed: {0}")]
    ProcessFailed(String),

    /// Device reported success but produced no file
    #[error("Expected output file was not created: {}", .0.display())]
    MissingOutput(PathBuf),
}
