//! Command-backed image picker
//!
//! Library mode runs a chooser that prints the selected path (e.g.
//! `zenity --file-selection`). Camera mode runs a capture command that writes
//! a photo to `{output}` (e.g. `fswebcam -q {output}`). A non-zero exit in
//! either mode means the user cancelled.

use crate::chat::attachments::ImageSource;
use crate::chat::models::{MediaAsset, DEFAULT_IMAGE_TYPE};
use crate::config::MediaConfig;
use crate::device::command::{CommandTemplate, OUTPUT_VAR};
use crate::device::error::DeviceError;
use crate::device::MediaPicker;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Image picker driven by external chooser and camera commands
#[derive(Debug, Clone)]
pub struct CommandMediaPicker {
    library: Option<CommandTemplate>,
    camera: Option<CommandTemplate>,
    media_dir: PathBuf,
}

impl CommandMediaPicker {
    /// Create a picker; a `None` template disables that mode
    pub fn new(
        library: Option<CommandTemplate>,
        camera: Option<CommandTemplate>,
        media_dir: PathBuf,
    ) -> Self {
        Self {
            library,
            camera,
            media_dir,
        }
    }

    /// Build from the media configuration
    pub fn from_config(media: &MediaConfig) -> Self {
        Self::new(
            media.library_command.as_deref().and_then(CommandTemplate::parse),
            media.camera_command.as_deref().and_then(CommandTemplate::parse),
            media.dir.clone(),
        )
    }

    async fn pick_from_library(&self) -> Result<Option<MediaAsset>, DeviceError> {
        let template = self
            .library
            .as_ref()
            .ok_or(DeviceError::NotConfigured("library"))?;

        let output = template.output(&[]).await?;
        if !output.status.success() {
            debug!(exit_code = ?output.status.code(), "Library picker cancelled");
            return Ok(None);
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let picked = stdout.lines().map(str::trim).find(|l| !l.is_empty());
        Ok(picked.map(|path| {
            info!(path = %path, "Image picked from library");
            MediaAsset::from_path(Path::new(path), DEFAULT_IMAGE_TYPE)
        }))
    }

    async fn capture_photo(&self) -> Result<Option<MediaAsset>, DeviceError> {
        let template = self
            .camera
            .as_ref()
            .ok_or(DeviceError::NotConfigured("camera"))?;

        tokio::fs::create_dir_all(&self.media_dir).await?;
        let path = self.media_dir.join(format!(
            "photo-{}.jpg",
            chrono::Utc::now().timestamp_millis()
        ));
        let path_str = path.to_string_lossy().into_owned();

        let output = template.output(&[(OUTPUT_VAR, &path_str)]).await?;
        if !output.status.success() {
            debug!(exit_code = ?output.status.code(), "Camera capture cancelled");
            return Ok(None);
        }
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(DeviceError::MissingOutput(path));
        }

        info!(path = %path_str, "Photo captured");
        Ok(Some(MediaAsset::from_path(&path, DEFAULT_IMAGE_TYPE)))
    }
}

#[async_trait]
impl MediaPicker for CommandMediaPicker {
    async fn request_camera_permission(&self) -> bool {
        self.camera.is_some()
    }

    async fn pick(&self, source: ImageSource) -> Result<Option<MediaAsset>, DeviceError> {
        match source {
            ImageSource::Library => self.pick_from_library().await,
            ImageSource::Camera => self.capture_photo().await,
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn sh(script: &str) -> Option<CommandTemplate> {
        Some(CommandTemplate::new(
            "sh",
            vec!["-c".to_string(), script.to_string(), "{output}".to_string()],
        ))
    }

    #[tokio::test]
    async fn test_library_pick_reads_first_line() {
        let dir = tempfile::tempdir().unwrap();
        let picker = CommandMediaPicker::new(
            sh("echo; echo /photos/rash.png"),
            None,
            dir.path().to_path_buf(),
        );
        let asset = picker.pick(ImageSource::Library).await.unwrap().unwrap();
        assert_eq!(asset.uri, "/photos/rash.png");
        assert_eq!(asset.name, "rash.png");
        assert_eq!(asset.mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_library_cancel() {
        let dir = tempfile::tempdir().unwrap();
        let picker = CommandMediaPicker::new(sh("exit 1"), None, dir.path().to_path_buf());
        assert!(picker.pick(ImageSource::Library).await.unwrap().is_none());

        let picker = CommandMediaPicker::new(sh("true"), None, dir.path().to_path_buf());
        assert!(picker.pick(ImageSource::Library).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_camera_capture() {
        let dir = tempfile::tempdir().unwrap();
        let picker = CommandMediaPicker::new(
            None,
            sh("echo jpeg > \"$0\""),
            dir.path().to_path_buf(),
        );
        assert!(picker.request_camera_permission().await);
        let asset = picker.pick(ImageSource::Camera).await.unwrap().unwrap();
        assert!(asset.name.starts_with("photo-"));
        assert_eq!(asset.mime_type, "image/jpeg");
        assert!(Path::new(&asset.uri).exists());
    }

    #[tokio::test]
    async fn test_camera_without_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let picker = CommandMediaPicker::new(None, sh("true"), dir.path().to_path_buf());
        assert!(matches!(
            picker.pick(ImageSource::Camera).await,
            Err(DeviceError::MissingOutput(_))
        ));
    }

    #[tokio::test]
    async fn test_unconfigured_modes() {
        let dir = tempfile::tempdir().unwrap();
        let picker = CommandMediaPicker::new(None, None, dir.path().to_path_buf());
        assert!(!picker.request_camera_permission().await);
        assert!(matches!(
            picker.pick(ImageSource::Library).await,
            Err(DeviceError::NotConfigured("library"))
        ));
    }
}
