//! Client configuration
//!
//! Centralized configuration with environment variable support and sensible
//! defaults. Resolved once at startup and injected; nothing here is global.

use crate::error::ConfigError;
use std::env;
use std::path::PathBuf;

/// Default inference backend address
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Default playback command
pub const DEFAULT_PLAYER_COMMAND: &str = "ffplay -nodisp -autoexit -loglevel quiet {uri}";

/// Client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Inference backend configuration
    pub server: ServerConfig,
    /// Media device configuration
    pub media: MediaConfig,
}

/// Inference backend configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Base URL of the backend, without trailing slash
    pub base_url: String,
}

/// Media device configuration
///
/// Commands are templates understood by [`crate::device::CommandTemplate`];
/// an unset command disables the device.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaConfig {
    /// Directory for recordings and photos
    pub dir: PathBuf,
    /// Microphone recorder, writes `{output}`
    ///
    /// Stopped with SIGINT, then killed after a grace period. The recorder
    /// must finalize its file on interrupt (`arecord`, `ffmpeg` do).
    pub record_command: Option<String>,
    /// Library chooser, prints the picked path
    pub library_command: Option<String>,
    /// Camera capture, writes `{output}`
    pub camera_command: Option<String>,
    /// Audio player, reads `{uri}`
    pub player_command: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                base_url: DEFAULT_SERVER_URL.to_string(),
            },
            media: MediaConfig {
                dir: env::temp_dir().join("medibot-media"),
                record_command: None,
                library_command: None,
                camera_command: None,
                player_command: Some(DEFAULT_PLAYER_COMMAND.to_string()),
            },
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let config = Self {
            server: ServerConfig {
                base_url: non_empty("MEDIBOT_SERVER_URL")
                    .map(|u| u.trim().trim_end_matches('/').to_string())
                    .unwrap_or(defaults.server.base_url),
            },
            media: MediaConfig {
                dir: non_empty("MEDIBOT_MEDIA_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.media.dir),
                record_command: non_empty("MEDIBOT_RECORD_COMMAND"),
                library_command: non_empty("MEDIBOT_LIBRARY_COMMAND"),
                camera_command: non_empty("MEDIBOT_CAMERA_COMMAND"),
                player_command: non_empty("MEDIBOT_PLAYER_COMMAND")
                    .or(defaults.media.player_command),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = &self.server.base_url;
        let rest = url
            .strip_prefix("http://")
            .or_else(|| url.strip_prefix("https://"));
        match rest {
            Some(host) if !host.is_empty() => Ok(()),
            _ => Err(ConfigError::InvalidServerUrl(url.clone())),
        }
    }
}
