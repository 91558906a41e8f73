//! Inference gateway
//!
//! The boundary to the remote inference backend. [`InferenceGateway`] takes a
//! composite payload (text, audio, image) and returns the backend's reply.
//! [`HttpGateway`] is the multipart-over-HTTP implementation.

pub mod error;
pub mod http;

pub use error::GatewayError;
pub use http::HttpGateway;

use crate::chat::models::MediaAsset;
use async_trait::async_trait;

/// Text, audio and image bundled into one submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompositePayload {
    /// Query text, present only when non-empty
    pub text: Option<String>,
    /// Recorded audio clip
    pub audio: Option<MediaAsset>,
    /// The surviving image attachment
    pub image: Option<MediaAsset>,
}

impl CompositePayload {
    /// True if there is nothing to send
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.audio.is_none() && self.image.is_none()
    }
}

/// Structured reply from the backend
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GatewayReply {
    /// Answer text
    pub text: Option<String>,
    /// Fully resolved reference to a spoken version of the answer
    pub audio_uri: Option<String>,
    /// Transcript of the submitted audio, if the backend produced one
    pub transcript: Option<String>,
}

/// Remote inference service
#[async_trait]
pub trait InferenceGateway: Send + Sync {
    /// Send one composite payload and wait for the reply
    async fn process(&self, payload: &CompositePayload) -> Result<GatewayReply, GatewayError>;
}
