//! Chat data models
//!
//! Defines messages, the append-only message log and media resource handles.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Greeting shown as the first bot message of a fresh session
pub const GREETING: &str = "Hello! How can I assist you today?";

/// Content type used when nothing better is known about an image
pub const DEFAULT_IMAGE_TYPE: &str = "image/jpeg";

/// Sender of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Message typed or recorded by the user
    User,
    /// Reply from the inference backend
    Bot,
}

impl Sender {
    /// Convert the sender to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

/// Identifier of a message, assigned by the log in increasing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u64);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single message in the chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Unique identifier for the message
    pub id: MessageId,
    /// Text content, if any
    pub text: Option<String>,
    /// Who sent the message
    pub sender: Sender,
    /// Reference to an attached image
    pub image_uri: Option<String>,
    /// Reference to an attached or synthesized audio clip
    pub audio_uri: Option<String>,
}

/// Contents of a message before the log assigns it an id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageDraft {
    /// Text content
    pub text: Option<String>,
    /// Image reference
    pub image_uri: Option<String>,
    /// Audio reference
    pub audio_uri: Option<String>,
}

impl MessageDraft {
    /// A text-only draft
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

/// Append-only, ordered sequence of messages
///
/// Insertion order is display order. Messages can be read but never
/// edited, removed or reordered.
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
    next_id: u64,
}

impl MessageLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            next_id: 1,
        }
    }

    /// Append a message and return its id
    pub fn append(&mut self, sender: Sender, draft: MessageDraft) -> MessageId {
        let id = MessageId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        self.messages.push(Message {
            id,
            text: draft.text,
            sender,
            image_uri: draft.image_uri,
            audio_uri: draft.audio_uri,
        });
        id
    }

    /// All messages in display order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Most recently appended message
    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True if the log has no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Handle to a playable or uploadable media resource
///
/// `uri` is whatever the producing collaborator returned (a local path for
/// captured media, a URL for server-side audio).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaAsset {
    /// Location of the resource
    pub uri: String,
    /// File name used when uploading
    pub name: String,
    /// Content type used when uploading
    pub mime_type: String,
}

impl MediaAsset {
    /// Create an asset from its parts
    pub fn new(
        uri: impl Into<String>,
        name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Describe a local file, naming it after its last path segment
    ///
    /// The content type is inferred from the extension, falling back to
    /// `default_type`.
    pub fn from_path(path: &Path, default_type: &str) -> Self {
        let uri = path.to_string_lossy().into_owned();
        let name = file_name_of(&uri);
        let mime_type = content_type_for(&name).unwrap_or(default_type).to_string();
        Self {
            uri,
            name,
            mime_type,
        }
    }
}

/// Last `/`-separated segment of a resource reference
pub fn file_name_of(uri: &str) -> String {
    uri.rsplit(['/', '\\'])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(uri)
        .to_string()
}

/// Content type for a file name, judged by its extension
pub fn content_type_for(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "m4a" => "audio/m4a",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => return None,
    };
    Some(mime)
}
