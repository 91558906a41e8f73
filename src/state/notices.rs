// User-visible notices
// Warnings and alerts raised by the chat controller, shown until dismissed

use medibot_client::notify::LogNotifier;
use medibot_client::Notifier;
use std::sync::{Arc, Mutex};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Warning,
    Alert,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: Option<String>,
    pub message: String,
}

/// Shared list of notices
///
/// The controller pushes from runtime threads; the UI reads and dismisses
/// from the render thread. Every notice is also written to the log.
#[derive(Debug, Clone, Default)]
pub struct NoticeBoard {
    notices: Arc<Mutex<Vec<Notice>>>,
    log: LogNotifier,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, notice: Notice) {
        match self.notices.lock() {
            Ok(mut notices) => notices.push(notice),
            Err(_) => warn!(message = %notice.message, "Notice board unavailable"),
        }
    }

    /// Current notices, oldest first
    pub fn snapshot(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .unwrap_or_default()
    }

    pub fn dismiss(&self, index: usize) {
        if let Ok(mut notices) = self.notices.lock() {
            if index < notices.len() {
                notices.remove(index);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.notices
            .lock()
            .map(|notices| notices.is_empty())
            .unwrap_or(true)
    }
}

impl Notifier for NoticeBoard {
    fn warn(&self, message: &str) {
        self.log.warn(message);
        self.push(Notice {
            level: NoticeLevel::Warning,
            title: None,
            message: message.to_string(),
        });
    }

    fn alert(&self, title: &str, message: &str) {
        self.log.alert(title, message);
        self.push(Notice {
            level: NoticeLevel::Alert,
            title: Some(title.to_string()),
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medibot_client::notify::{CONNECTION_ALERT_BODY, CONNECTION_ALERT_TITLE, MICROPHONE_DENIED};

    #[test]
    fn test_notices_in_order() {
        let board = NoticeBoard::new();
        assert!(board.is_empty());

        board.warn(MICROPHONE_DENIED);
        board.alert(CONNECTION_ALERT_TITLE, CONNECTION_ALERT_BODY);

        let notices = board.snapshot();
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert_eq!(notices[0].message, MICROPHONE_DENIED);
        assert_eq!(notices[1].level, NoticeLevel::Alert);
        assert_eq!(notices[1].title.as_deref(), Some(CONNECTION_ALERT_TITLE));
    }

    #[test]
    fn test_dismiss() {
        let board = NoticeBoard::new();
        board.warn("first");
        board.warn("second");

        board.dismiss(0);
        board.dismiss(5);

        let notices = board.snapshot();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].message, "second");
    }

    #[test]
    fn test_clones_share_notices() {
        let board = NoticeBoard::new();
        let handle: Arc<dyn Notifier> = Arc::new(board.clone());
        handle.warn("from the controller");
        assert_eq!(board.snapshot().len(), 1);
    }
}
