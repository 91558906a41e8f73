//! Command-backed audio playback

use crate::config::MediaConfig;
use crate::device::command::{failure_message, CommandTemplate, URI_VAR};
use crate::device::error::DeviceError;
use crate::device::AudioPlayer;
use async_trait::async_trait;
use tracing::info;

/// Plays audio by running an external player (e.g. `ffplay`)
#[derive(Debug, Clone)]
pub struct CommandAudioPlayer {
    template: Option<CommandTemplate>,
}

impl CommandAudioPlayer {
    /// Create a player; `None` disables playback
    pub fn new(template: Option<CommandTemplate>) -> Self {
        Self { template }
    }

    /// Build from the media configuration
    pub fn from_config(media: &MediaConfig) -> Self {
        Self::new(media.player_command.as_deref().and_then(CommandTemplate::parse))
    }
}

#[async_trait]
impl AudioPlayer for CommandAudioPlayer {
    async fn play(&self, uri: &str) -> Result<(), DeviceError> {
        let template = self
            .template
            .as_ref()
            .ok_or(DeviceError::NotConfigured("player"))?;

        // Templates without a placeholder get the resource as last argument
        let template = if template.uses(URI_VAR) {
            template.clone()
        } else {
            let mut args = template.render_args(&[]);
            args.push(format!("{{{}}}", URI_VAR));
            CommandTemplate::new(template.program(), args)
        };

        info!(uri = %uri, "Playing audio");
        let output = template.output(&[(URI_VAR, uri)]).await?;
        if output.status.success() {
            Ok(())
        } else {
            Err(DeviceError::ProcessFailed(failure_message(&output)))
        }
    }
}
