//! Chat module
//!
//! Message models, staged attachments, the chat session state machine and
//! the controller that drives it.

pub mod attachments;
pub mod controller;
pub mod models;
pub mod session;

pub use attachments::{AttachmentKind, ImageSource, StagedAttachments};
pub use controller::ChatController;
pub use models::{MediaAsset, Message, MessageId, MessageLog, Sender};
pub use session::{ChatSession, SubmissionState, SubmitOutcome};
