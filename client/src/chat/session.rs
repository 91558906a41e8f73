//! Chat session state machine
//!
//! [`ChatSession`] owns the message log, the input text, the staged
//! attachments, the recording handle and the submission flag. Every
//! transition is synchronous; the asynchronous parts (devices, network)
//! live in [`crate::chat::controller::ChatController`], which calls into the
//! session before and after each suspension point.
//!
//! ```text
//! Submission:  Idle --begin_submit--> Sending --complete_submit--> Idle
//! Recording:   Idle --begin_recording--> Recording --take_recording--> Idle
//! ```

use crate::chat::attachments::{AttachmentKind, ImageSource, StagedAttachments};
use crate::chat::models::{MediaAsset, Message, MessageDraft, MessageLog, Sender, GREETING};
use crate::device::ActiveRecording;
use crate::gateway::{CompositePayload, GatewayError, GatewayReply};
use tracing::{debug, info, warn};

/// Bot text used when a reply carries no answer
pub const NO_RESPONSE_TEXT: &str = "No response received.";

/// Bot text used when the submission failed
pub const CONNECTIVITY_FAILURE_TEXT: &str =
    "Sorry, I couldn't reach the server. Please check your connection and try again.";

/// Content type of recorded clips
pub const RECORDING_CONTENT_TYPE: &str = "audio/m4a";

/// Whether a submission is in flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    /// Ready to submit
    #[default]
    Idle,
    /// Waiting for the gateway
    Sending,
}

/// Microphone state, owning the active recording if any
#[derive(Default)]
pub enum RecordingState {
    /// Not recording
    #[default]
    Idle,
    /// Recording; the handle finishes the clip
    Recording(Box<dyn ActiveRecording>),
}

impl std::fmt::Debug for RecordingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordingState::Idle => f.write_str("Idle"),
            RecordingState::Recording(_) => f.write_str("Recording"),
        }
    }
}

/// Result of a submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing was sent: already sending, or nothing to send
    Skipped,
    /// The gateway replied and a bot message was appended
    Replied,
    /// The gateway failed and the fallback message was appended
    Failed,
}

/// Client-side state of one chat screen
#[derive(Debug)]
pub struct ChatSession {
    log: MessageLog,
    input: String,
    staged: StagedAttachments,
    recording: RecordingState,
    submission: SubmissionState,
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatSession {
    /// Create a session whose log starts with the bot greeting
    pub fn new() -> Self {
        let mut session = Self::empty();
        session.log.append(Sender::Bot, MessageDraft::text(GREETING));
        session
    }

    /// Create a session with an empty log
    pub fn empty() -> Self {
        Self {
            log: MessageLog::new(),
            input: String::new(),
            staged: StagedAttachments::default(),
            recording: RecordingState::Idle,
            submission: SubmissionState::Idle,
        }
    }

    /// Messages in display order
    pub fn messages(&self) -> &[Message] {
        self.log.messages()
    }

    /// The message log
    pub fn log(&self) -> &MessageLog {
        &self.log
    }

    /// Current input text
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Replace the input text
    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Attachments staged for the next submission
    pub fn staged(&self) -> &StagedAttachments {
        &self.staged
    }

    /// Submission state
    pub fn submission_state(&self) -> SubmissionState {
        self.submission
    }

    /// True while a submission is in flight
    pub fn is_sending(&self) -> bool {
        self.submission == SubmissionState::Sending
    }

    /// True while the microphone is recording
    pub fn is_recording(&self) -> bool {
        matches!(self.recording, RecordingState::Recording(_))
    }

    /// Enter the recording state with a freshly started recording
    ///
    /// Only one recording may exist; if one is already active the new handle
    /// is handed back so the caller can finish and discard it.
    pub fn begin_recording(
        &mut self,
        handle: Box<dyn ActiveRecording>,
    ) -> Result<(), Box<dyn ActiveRecording>> {
        if self.is_recording() {
            return Err(handle);
        }
        self.recording = RecordingState::Recording(handle);
        Ok(())
    }

    /// Leave the recording state, handing over the active recording
    pub fn take_recording(&mut self) -> Option<Box<dyn ActiveRecording>> {
        match std::mem::take(&mut self.recording) {
            RecordingState::Recording(handle) => Some(handle),
            RecordingState::Idle => None,
        }
    }

    /// Stage a finished recording under a generated name
    pub fn stage_recording(&mut self, uri: impl Into<String>) -> MediaAsset {
        let name = format!("recording-{}.m4a", chrono::Utc::now().timestamp_millis());
        let asset = MediaAsset::new(uri, name, RECORDING_CONTENT_TYPE);
        self.stage_audio(asset.clone());
        asset
    }

    /// Stage an audio clip, replacing any previous one
    pub fn stage_audio(&mut self, asset: MediaAsset) {
        debug!(uri = %asset.uri, "Audio staged");
        self.staged.set_audio(asset);
    }

    /// Stage an image in the slot for its source
    pub fn stage_image(&mut self, source: ImageSource, asset: MediaAsset) {
        debug!(uri = %asset.uri, source = ?source, "Image staged");
        self.staged.set_image(source, asset);
    }

    /// Clear one staged attachment
    pub fn remove_attachment(&mut self, kind: AttachmentKind) -> Option<MediaAsset> {
        self.staged.remove(kind)
    }

    /// Start a submission
    ///
    /// Returns `None` without touching any state if a submission is already
    /// in flight or there is nothing to send. Otherwise appends the user
    /// message, clears the input and attachments, enters `Sending` and
    /// returns the payload for the gateway.
    pub fn begin_submit(&mut self) -> Option<CompositePayload> {
        if self.is_sending() {
            debug!("Submission rejected: already sending");
            return None;
        }

        let text = self.input.trim();
        let payload = CompositePayload {
            text: (!text.is_empty()).then(|| text.to_string()),
            audio: self.staged.audio().cloned(),
            image: self.staged.surviving_image().cloned(),
        };
        if payload.is_empty() {
            return None;
        }

        self.staged.take();
        self.input.clear();

        let id = self.log.append(
            Sender::User,
            MessageDraft {
                text: payload.text.clone(),
                image_uri: payload.image.as_ref().map(|a| a.uri.clone()),
                audio_uri: payload.audio.as_ref().map(|a| a.uri.clone()),
            },
        );
        self.submission = SubmissionState::Sending;

        info!(
            message_id = %id,
            has_text = payload.text.is_some(),
            has_audio = payload.audio.is_some(),
            has_image = payload.image.is_some(),
            "Submission started"
        );

        Some(payload)
    }

    /// Start a submission with `text` as the input
    ///
    /// Replacing the input and starting the submission happen in one step, so
    /// concurrent senders cannot overwrite each other's text. While a
    /// submission is in flight the input is left untouched and `None` is
    /// returned; the caller still owns `text`.
    pub fn begin_submit_with(&mut self, text: &str) -> Option<CompositePayload> {
        if self.is_sending() {
            debug!("Submission rejected: already sending");
            return None;
        }
        self.input = text.to_string();
        self.begin_submit()
    }

    /// Finish a submission with the gateway's result
    ///
    /// Always appends exactly one bot message and returns to `Idle`.
    pub fn complete_submit(&mut self, result: Result<GatewayReply, GatewayError>) -> SubmitOutcome {
        self.submission = SubmissionState::Idle;

        match result {
            Ok(reply) => {
                let id = self.log.append(
                    Sender::Bot,
                    MessageDraft {
                        text: Some(reply.text.unwrap_or_else(|| NO_RESPONSE_TEXT.to_string())),
                        image_uri: None,
                        audio_uri: reply.audio_uri,
                    },
                );
                info!(message_id = %id, "Submission answered");
                SubmitOutcome::Replied
            }
            Err(e) => {
                warn!(error = %e, "Submission failed");
                self.log.append(Sender::Bot, MessageDraft::text(CONNECTIVITY_FAILURE_TEXT));
                SubmitOutcome::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::DeviceError;
    use async_trait::async_trait;

    struct StubRecording;

    #[async_trait]
    impl ActiveRecording for StubRecording {
        async fn finish(&mut self) -> Result<String, DeviceError> {
            Ok("/tmp/clip.m4a".to_string())
        }
    }

    fn image(uri: &str) -> MediaAsset {
        MediaAsset::new(uri, uri, "image/jpeg")
    }

    #[test]
    fn test_new_session_has_greeting() {
        let session = ChatSession::new();
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].sender, Sender::Bot);
        assert_eq!(session.messages()[0].text.as_deref(), Some(GREETING));
        assert!(!session.is_sending());
        assert!(!session.is_recording());
    }

    #[test]
    fn test_empty_submit_is_noop() {
        let mut session = ChatSession::empty();
        session.set_input("   ");
        assert!(session.begin_submit().is_none());
        assert!(session.messages().is_empty());
        assert_eq!(session.submission_state(), SubmissionState::Idle);
        // Whitespace input is left as typed
        assert_eq!(session.input(), "   ");
    }

    #[test]
    fn test_submit_text_builds_payload() {
        let mut session = ChatSession::empty();
        session.set_input("  hello  ");
        let payload = session.begin_submit().unwrap();

        assert_eq!(payload.text.as_deref(), Some("hello"));
        assert!(payload.audio.is_none());
        assert!(payload.image.is_none());
        assert!(session.is_sending());
        assert_eq!(session.input(), "");

        let user = session.log().last().unwrap();
        assert_eq!(user.sender, Sender::User);
        assert_eq!(user.text.as_deref(), Some("hello"));
    }

    #[test]
    fn test_submit_rejected_while_sending() {
        let mut session = ChatSession::empty();
        session.set_input("first");
        session.begin_submit().unwrap();

        session.set_input("second");
        assert!(session.begin_submit().is_none());
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.input(), "second");
    }

    #[test]
    fn test_submit_with_keeps_input_while_sending() {
        let mut session = ChatSession::empty();
        let payload = session.begin_submit_with(" first ").unwrap();
        assert_eq!(payload.text.as_deref(), Some("first"));

        session.set_input("typed meanwhile");
        assert!(session.begin_submit_with("second").is_none());
        assert_eq!(session.input(), "typed meanwhile");
        assert_eq!(session.messages().len(), 1);

        session.complete_submit(Ok(GatewayReply::default()));
        let payload = session.begin_submit_with("second").unwrap();
        assert_eq!(payload.text.as_deref(), Some("second"));
    }

    #[test]
    fn test_submit_with_blank_text_and_nothing_staged() {
        let mut session = ChatSession::empty();
        assert!(session.begin_submit_with("  ").is_none());
        assert!(session.messages().is_empty());
        assert!(!session.is_sending());
    }

    #[test]
    fn test_camera_image_wins_in_payload_and_message() {
        let mut session = ChatSession::empty();
        session.stage_image(ImageSource::Library, image("lib.jpg"));
        session.stage_image(ImageSource::Camera, image("cam.jpg"));

        let payload = session.begin_submit().unwrap();
        assert_eq!(payload.image.unwrap().uri, "cam.jpg");
        assert!(payload.text.is_none());
        assert_eq!(
            session.log().last().unwrap().image_uri.as_deref(),
            Some("cam.jpg")
        );
        assert!(session.staged().is_empty());
    }

    #[test]
    fn test_complete_success_appends_reply() {
        let mut session = ChatSession::empty();
        session.set_input("hello");
        session.begin_submit().unwrap();

        let outcome = session.complete_submit(Ok(GatewayReply {
            text: Some("hi".to_string()),
            audio_uri: Some("http://host/audio/1.mp3".to_string()),
            transcript: None,
        }));

        assert_eq!(outcome, SubmitOutcome::Replied);
        assert!(!session.is_sending());
        let bot = session.log().last().unwrap();
        assert_eq!(bot.sender, Sender::Bot);
        assert_eq!(bot.text.as_deref(), Some("hi"));
        assert_eq!(bot.audio_uri.as_deref(), Some("http://host/audio/1.mp3"));
    }

    #[test]
    fn test_complete_without_text_uses_placeholder() {
        let mut session = ChatSession::empty();
        session.set_input("hello");
        session.begin_submit().unwrap();
        session.complete_submit(Ok(GatewayReply::default()));
        assert_eq!(
            session.log().last().unwrap().text.as_deref(),
            Some(NO_RESPONSE_TEXT)
        );
    }

    #[test]
    fn test_complete_failure_appends_fallback() {
        let mut session = ChatSession::empty();
        session.stage_image(ImageSource::Library, image("lib.jpg"));
        session.begin_submit().unwrap();

        let outcome = session.complete_submit(Err(GatewayError::Status {
            status: 503,
            body: String::new(),
        }));

        assert_eq!(outcome, SubmitOutcome::Failed);
        assert_eq!(session.submission_state(), SubmissionState::Idle);
        assert_eq!(session.messages().len(), 2);
        assert_eq!(
            session.messages()[1].text.as_deref(),
            Some(CONNECTIVITY_FAILURE_TEXT)
        );
        assert!(session.staged().is_empty());
    }

    #[test]
    fn test_staging_while_sending_goes_to_next_submission() {
        let mut session = ChatSession::empty();
        session.set_input("first");
        session.begin_submit().unwrap();

        session.stage_image(ImageSource::Library, image("later.jpg"));
        session.complete_submit(Ok(GatewayReply::default()));
        assert!(session.staged().image(ImageSource::Library).is_some());

        let payload = session.begin_submit().unwrap();
        assert_eq!(payload.image.unwrap().uri, "later.jpg");
    }

    #[test]
    fn test_single_active_recording() {
        let mut session = ChatSession::empty();
        assert!(session.begin_recording(Box::new(StubRecording)).is_ok());
        assert!(session.is_recording());
        assert!(session.begin_recording(Box::new(StubRecording)).is_err());

        assert!(session.take_recording().is_some());
        assert!(!session.is_recording());
        assert!(session.take_recording().is_none());
    }

    #[test]
    fn test_stage_recording_names_clip() {
        let mut session = ChatSession::empty();
        let asset = session.stage_recording("/tmp/clip.m4a");
        assert!(asset.name.starts_with("recording-"));
        assert!(asset.name.ends_with(".m4a"));
        assert_eq!(asset.mime_type, RECORDING_CONTENT_TYPE);
        assert_eq!(session.staged().audio(), Some(&asset));
    }

    #[test]
    fn test_ids_strictly_increase() {
        let mut session = ChatSession::new();
        for i in 0..3 {
            session.set_input(format!("msg {}", i));
            session.begin_submit().unwrap();
            session.complete_submit(Ok(GatewayReply::default()));
        }
        let ids: Vec<_> = session.messages().iter().map(|m| m.id).collect();
        assert_eq!(ids.len(), 7);
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }
}
