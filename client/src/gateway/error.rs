//! Gateway error types
//!
//! Every way a submission to the inference backend can fail. The chat
//! session treats all of them alike: fallback message plus alert.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while talking to the inference backend
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The request could not be sent or the response could not be read
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-success status
    #[error("Backend returned status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, for logging
        body: String,
    },

    /// The response body was not the expected JSON object
    #[error("Malformed response: {0}")]
    BadResponse(String),

    /// A staged attachment could not be read from disk
    #[error("Failed to read attachment {}: {source}", .path.display())]
    Attachment {
        /// Location of the attachment
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A staged attachment declared an unusable content type
    #[error("Invalid content type for {name}: {mime_type}")]
    InvalidContentType {
        /// Attachment file name
        name: String,
        /// The rejected content type
        mime_type: String,
    },
}
