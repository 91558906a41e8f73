//! MediBot Chat Client Library
//!
//! Client-side state and plumbing for the MediBot health-assistant chat:
//! the chat session state machine, the multipart gateway to the inference
//! backend, and the media devices the chat screen drives.

pub mod chat;
pub mod config;
/// Media device collaborators (microphone, picker, player)
pub mod device;
pub mod error;
pub mod gateway;
pub mod notify;

pub use chat::{ChatController, ChatSession};
pub use config::ClientConfig;
pub use error::ConfigError;
pub use gateway::{HttpGateway, InferenceGateway};
pub use notify::Notifier;
