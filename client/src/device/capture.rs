//! Command-backed microphone
//!
//! Recording runs the configured record command until it is stopped; the
//! clip is whatever the command wrote to `{output}`.
//!
//! Stopping first interrupts the recorder (SIGINT on unix) and gives it
//! [`STOP_GRACE`] to finalize the file, as `arecord` and `ffmpeg` do on
//! interrupt. Only a recorder that is still running after that is killed.

use crate::config::MediaConfig;
use crate::device::command::{CommandTemplate, OUTPUT_VAR};
use crate::device::error::DeviceError;
use crate::device::{ActiveRecording, AudioCapture};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Child;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Time a recorder gets to exit after being interrupted
pub const STOP_GRACE: Duration = Duration::from_secs(2);

/// Microphone driven by an external recorder process
#[derive(Debug, Clone)]
pub struct CommandAudioCapture {
    template: Option<CommandTemplate>,
    media_dir: PathBuf,
}

impl CommandAudioCapture {
    /// Create a capture device; `None` template means the microphone is unavailable
    pub fn new(template: Option<CommandTemplate>, media_dir: PathBuf) -> Self {
        Self {
            template,
            media_dir,
        }
    }

    /// Build from the media configuration
    pub fn from_config(media: &MediaConfig) -> Self {
        Self::new(
            media.record_command.as_deref().and_then(CommandTemplate::parse),
            media.dir.clone(),
        )
    }
}

#[async_trait]
impl AudioCapture for CommandAudioCapture {
    async fn request_permission(&self) -> bool {
        self.template.is_some()
    }

    async fn start(&self) -> Result<Box<dyn ActiveRecording>, DeviceError> {
        let template = self
            .template
            .as_ref()
            .ok_or(DeviceError::NotConfigured("record"))?;

        tokio::fs::create_dir_all(&self.media_dir).await?;
        let output = self.media_dir.join(format!(
            "recording-{}.m4a",
            chrono::Utc::now().timestamp_millis()
        ));
        let output_str = output.to_string_lossy().into_owned();

        let child = template
            .command(&[(OUTPUT_VAR, &output_str)])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()?;

        info!(command = %template.program(), output = %output_str, "Recording started");

        Ok(Box::new(ProcessRecording {
            child: Mutex::new(child),
            output,
        }))
    }
}

/// A recorder process that is still running
struct ProcessRecording {
    child: Mutex<Child>,
    output: PathBuf,
}

#[async_trait]
impl ActiveRecording for ProcessRecording {
    async fn finish(&mut self) -> Result<String, DeviceError> {
        let child = self.child.get_mut();
        if !interrupt_and_wait(child).await {
            if let Err(e) = child.kill().await {
                // The recorder may already have exited on its own
                warn!(error = %e, "Failed to stop recorder process");
            }
        }

        if !tokio::fs::try_exists(&self.output).await.unwrap_or(false) {
            return Err(DeviceError::MissingOutput(self.output.clone()));
        }

        info!(output = %self.output.display(), "Recording finished");
        Ok(self.output.to_string_lossy().into_owned())
    }
}

/// Ask the recorder to stop and wait for it; false if it is still running
#[cfg(unix)]
async fn interrupt_and_wait(child: &mut Child) -> bool {
    let Some(pid) = child.id() else {
        // Already reaped
        return true;
    };

    let sent = tokio::process::Command::new("kill")
        .args(["-INT", &pid.to_string()])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await;
    match sent {
        Ok(status) if status.success() => {}
        Ok(status) => {
            debug!(pid, code = ?status.code(), "Interrupting recorder failed");
            return false;
        }
        Err(e) => {
            debug!(pid, error = %e, "Could not run kill");
            return false;
        }
    }

    match tokio::time::timeout(STOP_GRACE, child.wait()).await {
        Ok(Ok(status)) => {
            debug!(pid, code = ?status.code(), "Recorder exited after interrupt");
            true
        }
        Ok(Err(e)) => {
            warn!(pid, error = %e, "Failed to wait for recorder");
            false
        }
        Err(_) => {
            warn!(pid, "Recorder ignored interrupt, killing it");
            false
        }
    }
}

#[cfg(not(unix))]
async fn interrupt_and_wait(_child: &mut Child) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_permission_follows_configuration() {
        let dir = tempfile::tempdir().unwrap();
        let none = CommandAudioCapture::new(None, dir.path().to_path_buf());
        assert!(!none.request_permission().await);
        assert!(matches!(
            none.start().await,
            Err(DeviceError::NotConfigured("record"))
        ));

        let some = CommandAudioCapture::new(
            CommandTemplate::parse("sleep 5"),
            dir.path().to_path_buf(),
        );
        assert!(some.request_permission().await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_record_then_finish() {
        let dir = tempfile::tempdir().unwrap();
        // Writes the file, then keeps running until killed
        let capture = CommandAudioCapture::new(
            Some(CommandTemplate::new(
                "sh",
                vec![
                    "-c".to_string(),
                    "echo clip > \"$0\"; sleep 30".to_string(),
                    "{output}".to_string(),
                ],
            )),
            dir.path().to_path_buf(),
        );

        let mut recording = capture.start().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
        let uri = recording.finish().await.unwrap();
        assert!(uri.ends_with(".m4a"));
        assert!(std::path::Path::new(&uri).exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_finish_lets_recorder_finalize() {
        let dir = tempfile::tempdir().unwrap();
        // Writes the file only when interrupted, like a muxer writing its trailer
        let capture = CommandAudioCapture::new(
            Some(CommandTemplate::new(
                "sh",
                vec![
                    "-c".to_string(),
                    "trap 'echo finalized > \"$0\"; exit 0' INT; while :; do sleep 0.05; done"
                        .to_string(),
                    "{output}".to_string(),
                ],
            )),
            dir.path().to_path_buf(),
        );

        let mut recording = capture.start().await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(300)).await;
        let uri = recording.finish().await.unwrap();
        assert_eq!(std::fs::read_to_string(&uri).unwrap(), "finalized\n");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_finish_without_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let capture = CommandAudioCapture::new(
            CommandTemplate::parse("sleep 30"),
            dir.path().to_path_buf(),
        );
        let mut recording = capture.start().await.unwrap();
        assert!(matches!(
            recording.finish().await,
            Err(DeviceError::MissingOutput(_))
        ));
    }
}
