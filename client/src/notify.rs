//! User-visible notices
//!
//! [`Notifier`] is the output port for warnings and alerts the user must
//! see. The front end implements it; [`LogNotifier`] only logs.

use tracing::warn;

/// Warning shown when the microphone is unavailable
pub const MICROPHONE_DENIED: &str = "Microphone permission is required!";

/// Warning shown when the camera is unavailable
pub const CAMERA_DENIED: &str = "Camera permission is required!";

/// Alert title for a failed submission
pub const CONNECTION_ALERT_TITLE: &str = "Connection error";

/// Alert body for a failed submission
pub const CONNECTION_ALERT_BODY: &str = "Could not reach the MediBot server.";

/// Sink for messages the user has to see
pub trait Notifier: Send + Sync {
    /// A recoverable problem, e.g. a denied permission
    fn warn(&self, message: &str);

    /// A non-blocking alert with a title
    fn alert(&self, title: &str, message: &str);
}

/// Notifier that writes to the log only
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn warn(&self, message: &str) {
        warn!(notice = %message, "User warning");
    }

    fn alert(&self, title: &str, message: &str) {
        warn!(title = %title, notice = %message, "User alert");
    }
}
