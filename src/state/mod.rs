// State management module
// Screen selection, chat snapshot and user-visible notices

pub mod app_state;
pub mod notices;

pub use app_state::{AppState, ChatAction, ChatView, Screen};
pub use notices::{Notice, NoticeBoard, NoticeLevel};
