//! Chat controller
//!
//! Drives a [`ChatSession`] through its collaborators: the microphone, the
//! image picker, the player, the inference gateway and the notifier.
//!
//! The session sits behind a `RwLock` that is held only for the synchronous
//! transitions, never across an `.await`. A slow gateway call therefore does
//! not block recording or picking; attachments staged meanwhile go out with
//! the next submission. The `Sending` flag is what keeps submissions from
//! overlapping.

use crate::chat::attachments::{AttachmentKind, ImageSource};
use crate::chat::session::{ChatSession, SubmitOutcome};
use crate::device::Devices;
use crate::gateway::{CompositePayload, InferenceGateway};
use crate::notify::{
    Notifier, CAMERA_DENIED, CONNECTION_ALERT_BODY, CONNECTION_ALERT_TITLE, MICROPHONE_DENIED,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

/// Public operations of the chat screen
#[derive(Clone)]
pub struct ChatController {
    session: Arc<RwLock<ChatSession>>,
    gateway: Arc<dyn InferenceGateway>,
    devices: Devices,
    notifier: Arc<dyn Notifier>,
}

impl ChatController {
    /// Create a controller around a session
    pub fn new(
        session: ChatSession,
        gateway: Arc<dyn InferenceGateway>,
        devices: Devices,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            session: Arc::new(RwLock::new(session)),
            gateway,
            devices,
            notifier,
        }
    }

    /// Shared session state, for rendering
    pub fn session(&self) -> Arc<RwLock<ChatSession>> {
        Arc::clone(&self.session)
    }

    /// Replace the input text
    pub async fn set_input(&self, text: impl Into<String>) {
        self.session.write().await.set_input(text);
    }

    /// Toggle the microphone
    ///
    /// Idle: ask for permission (warn and stop if denied), then start
    /// capturing. Recording: finish the clip and stage it as the audio
    /// attachment. Device failures are logged and otherwise ignored.
    pub async fn start_or_stop_recording(&self) {
        let active = self.session.write().await.take_recording();
        match active {
            Some(mut recording) => match recording.finish().await {
                Ok(uri) => {
                    let asset = self.session.write().await.stage_recording(uri);
                    info!(name = %asset.name, "Recording staged");
                }
                Err(e) => error!(error = %e, "Error stopping recording"),
            },
            None => self.start_recording().await,
        }
    }

    async fn start_recording(&self) {
        if !self.devices.capture.request_permission().await {
            self.notifier.warn(MICROPHONE_DENIED);
            return;
        }

        let recording = match self.devices.capture.start().await {
            Ok(recording) => recording,
            Err(e) => {
                error!(error = %e, "Error starting recording");
                return;
            }
        };

        let rejected = self.session.write().await.begin_recording(recording);
        if let Err(mut extra) = rejected {
            // Another toggle started a recording while we were awaiting
            warn!("Recording already active, discarding the new one");
            if let Err(e) = extra.finish().await {
                warn!(error = %e, "Error discarding duplicate recording");
            }
        }
    }

    /// Pick an image from the library and stage it
    pub async fn pick_from_library(&self) {
        self.pick(ImageSource::Library).await;
    }

    /// Capture a photo with the camera and stage it
    ///
    /// Asks for camera permission first; a denial shows a warning.
    pub async fn pick_from_camera(&self) {
        if !self.devices.picker.request_camera_permission().await {
            self.notifier.warn(CAMERA_DENIED);
            return;
        }
        self.pick(ImageSource::Camera).await;
    }

    async fn pick(&self, source: ImageSource) {
        match self.devices.picker.pick(source).await {
            Ok(Some(asset)) => self.session.write().await.stage_image(source, asset),
            Ok(None) => info!(source = ?source, "Image picking cancelled"),
            Err(e) => error!(source = ?source, error = %e, "Error picking image"),
        }
    }

    /// Clear one staged attachment
    pub async fn remove_attachment(&self, kind: AttachmentKind) {
        self.session.write().await.remove_attachment(kind);
    }

    /// Send the current text and attachments
    ///
    /// Does nothing if a submission is in flight or there is nothing to
    /// send. Otherwise the user message is appended, the gateway is called,
    /// and exactly one bot message follows: the reply, or a connectivity
    /// fallback plus an alert.
    pub async fn submit(&self) -> SubmitOutcome {
        let payload = self.session.write().await.begin_submit();
        self.send(payload).await
    }

    /// Send `text` with the staged attachments
    ///
    /// Like [`submit`](Self::submit), but the text is placed and the
    /// submission started under one lock, so two callers never overwrite
    /// each other's text. On `Skipped` the text was not consumed.
    pub async fn submit_text(&self, text: &str) -> SubmitOutcome {
        let payload = self.session.write().await.begin_submit_with(text);
        self.send(payload).await
    }

    async fn send(&self, payload: Option<CompositePayload>) -> SubmitOutcome {
        let payload = match payload {
            Some(payload) => payload,
            None => return SubmitOutcome::Skipped,
        };

        let result = self.gateway.process(&payload).await;
        let outcome = self.session.write().await.complete_submit(result);

        if outcome == SubmitOutcome::Failed {
            self.notifier.alert(CONNECTION_ALERT_TITLE, CONNECTION_ALERT_BODY);
        }
        outcome
    }

    /// Play an audio resource; failures are only logged
    pub async fn play_attachment(&self, uri: &str) {
        if let Err(e) = self.devices.player.play(uri).await {
            error!(uri = %uri, error = %e, "Error playing audio");
        }
    }
}
