// Application state for the MediBot front end
// Holds the active screen, the text draft and a render snapshot of the chat

use medibot_client::chat::{AttachmentKind, ImageSource, MediaAsset, Message, StagedAttachments};
use medibot_client::ChatSession;

/// Top-level screens reachable from the top bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    /// Static welcome page
    #[default]
    Home,
    /// Conversation with the assistant
    Chat,
}

impl Screen {
    /// Label shown in the top bar
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Home => "Home",
            Screen::Chat => "Chat",
        }
    }
}

/// User intents collected while rendering, dispatched after the frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    /// Start or stop the microphone
    ToggleRecording,
    /// Stage an image from the library or the camera
    PickImage(ImageSource),
    /// Drop one staged attachment
    Remove(AttachmentKind),
    /// Submit this text with the staged attachments
    Send(String),
    /// Play an audio resource
    Play(String),
}

/// Copy of the session taken once per frame
///
/// Rendering works from this copy so the session lock is never held while
/// egui lays out widgets.
#[derive(Debug, Clone, Default)]
pub struct ChatView {
    /// Message log in display order
    pub messages: Vec<Message>,
    /// Attachments waiting for the next send
    pub staged: StagedAttachments,
    /// A submission is in flight
    pub sending: bool,
    /// The microphone is recording
    pub recording: bool,
}

impl ChatView {
    /// Copy what the chat screen renders out of the session
    pub fn capture(session: &ChatSession) -> Self {
        Self {
            messages: session.messages().to_vec(),
            staged: session.staged().clone(),
            sending: session.is_sending(),
            recording: session.is_recording(),
        }
    }

    /// Staged attachments in preview order, with the kind used to remove each
    pub fn previews(&self) -> Vec<(AttachmentKind, &MediaAsset)> {
        let mut previews = Vec::new();
        if let Some(audio) = self.staged.audio() {
            previews.push((AttachmentKind::Audio, audio));
        }
        if let Some(image) = self.staged.image(ImageSource::Library) {
            previews.push((AttachmentKind::Image, image));
        }
        if let Some(photo) = self.staged.image(ImageSource::Camera) {
            previews.push((AttachmentKind::Camera, photo));
        }
        previews
    }

    /// Whether anything is running that needs periodic repaints
    pub fn busy(&self) -> bool {
        self.sending || self.recording
    }
}

/// Main application state
#[derive(Debug, Clone, Default)]
pub struct AppState {
    /// Screen currently shown
    pub screen: Screen,
    /// Text typed into the chat input, not yet sent
    pub draft: String,
    /// Latest snapshot of the chat session
    pub view: ChatView,
}

impl AppState {
    /// Create state showing the home screen
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to another screen
    pub fn show(&mut self, screen: Screen) {
        self.screen = screen;
    }

    /// Turn the draft into a send action
    ///
    /// Returns `None` while a submission is in flight so the draft is kept
    /// for the next attempt. The draft is cleared once handed off.
    pub fn take_send(&mut self) -> Option<ChatAction> {
        if self.view.sending {
            return None;
        }
        Some(ChatAction::Send(std::mem::take(&mut self.draft)))
    }

    /// Put back text whose send was not accepted
    ///
    /// Anything typed since goes after the returned text.
    pub fn restore_draft(&mut self, text: String) {
        if text.trim().is_empty() {
            return;
        }
        self.draft = if self.draft.is_empty() {
            text
        } else {
            format!("{} {}", text, self.draft)
        };
    }
}
