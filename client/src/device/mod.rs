//! Media device collaborators
//!
//! Traits for the microphone, the image picker and audio playback, plus
//! implementations that drive external commands (`arecord`, `zenity`,
//! `ffplay`, ...) the way the chat screen would drive platform media APIs.

pub mod capture;
pub mod command;
pub mod error;
pub mod picker;
pub mod player;

pub use capture::CommandAudioCapture;
pub use command::CommandTemplate;
pub use error::DeviceError;
pub use picker::CommandMediaPicker;
pub use player::CommandAudioPlayer;

use crate::chat::attachments::ImageSource;
use crate::chat::models::MediaAsset;
use async_trait::async_trait;
use std::sync::Arc;

/// A recording in progress
///
/// Owned by the chat session while recording; finishing it yields the
/// location of the captured clip.
#[async_trait]
pub trait ActiveRecording: Send + Sync {
    /// Stop capturing and return the resource reference of the clip
    async fn finish(&mut self) -> Result<String, DeviceError>;
}

/// Microphone access
#[async_trait]
pub trait AudioCapture: Send + Sync {
    /// Ask for microphone capability; `false` means denied
    async fn request_permission(&self) -> bool;

    /// Begin capturing
    async fn start(&self) -> Result<Box<dyn ActiveRecording>, DeviceError>;
}

/// Image selection from the library or the camera
#[async_trait]
pub trait MediaPicker: Send + Sync {
    /// Ask for camera capability; `false` means denied
    async fn request_camera_permission(&self) -> bool;

    /// Let the user pick or capture an image; `Ok(None)` means cancelled
    async fn pick(&self, source: ImageSource) -> Result<Option<MediaAsset>, DeviceError>;
}

/// Audio playback
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Play the resource at `uri`
    async fn play(&self, uri: &str) -> Result<(), DeviceError>;
}

/// The device collaborators a chat controller needs
#[derive(Clone)]
pub struct Devices {
    /// Microphone
    pub capture: Arc<dyn AudioCapture>,
    /// Library / camera picker
    pub picker: Arc<dyn MediaPicker>,
    /// Playback
    pub player: Arc<dyn AudioPlayer>,
}

impl Devices {
    /// Build the command-backed devices described by a media configuration
    pub fn from_config(media: &crate::config::MediaConfig) -> Self {
        Self {
            capture: Arc::new(CommandAudioCapture::from_config(media)),
            picker: Arc::new(CommandMediaPicker::from_config(media)),
            player: Arc::new(CommandAudioPlayer::from_config(media)),
        }
    }
}
