//! HTTP inference gateway
//!
//! Posts the composite payload as `multipart/form-data` to
//! `{server_base}/process` and parses the JSON reply.

use crate::chat::models::{content_type_for, file_name_of, MediaAsset};
use crate::gateway::error::GatewayError;
use crate::gateway::{CompositePayload, GatewayReply, InferenceGateway};
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::{debug, error, info};

/// Path of the processing endpoint, relative to the server base
pub const PROCESS_PATH: &str = "/process";

/// Multipart field carrying the query text
pub const FIELD_TEXT: &str = "query_text";
/// Multipart field carrying the audio clip
pub const FIELD_AUDIO: &str = "audio";
/// Multipart field carrying the image
pub const FIELD_IMAGE: &str = "image";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Wire format of a successful `/process` reply
#[derive(Debug, Default, Deserialize)]
struct ProcessResponse {
    #[serde(default)]
    doctor_response: Option<String>,
    #[serde(default)]
    voice_of_doctor: Option<String>,
    #[serde(default)]
    speech_to_text: Option<String>,
}

/// Gateway that talks to the backend over HTTP
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: reqwest::Client,
    server_base: String,
}

impl HttpGateway {
    /// Create a gateway for the given server base URL
    pub fn new(server_base: &str) -> Self {
        Self::with_client(reqwest::Client::new(), server_base)
    }

    /// Create a gateway sharing an existing client (connection pooling)
    pub fn with_client(client: reqwest::Client, server_base: &str) -> Self {
        Self {
            client,
            server_base: server_base.trim_end_matches('/').to_string(),
        }
    }

    /// Server base URL without trailing slash
    pub fn server_base(&self) -> &str {
        &self.server_base
    }

    /// Full URL of the processing endpoint
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.server_base, PROCESS_PATH)
    }

    async fn build_form(&self, payload: &CompositePayload) -> Result<Form, GatewayError> {
        let mut form = Form::new();
        if let Some(text) = &payload.text {
            form = form.text(FIELD_TEXT, text.clone());
        }
        if let Some(audio) = &payload.audio {
            form = form.part(FIELD_AUDIO, attachment_part(audio).await?);
        }
        if let Some(image) = &payload.image {
            form = form.part(FIELD_IMAGE, attachment_part(image).await?);
        }
        Ok(form)
    }
}

#[async_trait]
impl InferenceGateway for HttpGateway {
    async fn process(&self, payload: &CompositePayload) -> Result<GatewayReply, GatewayError> {
        let form = self.build_form(payload).await?;
        let url = self.endpoint();

        debug!(
            url = %url,
            has_text = payload.text.is_some(),
            has_audio = payload.audio.is_some(),
            has_image = payload.image.is_some(),
            "Posting composite payload"
        );

        let response = self
            .client
            .post(&url)
            .header(ACCEPT, "application/json")
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error body".to_string());

            error!(
                status_code = status.as_u16(),
                error_body = %body,
                "Inference backend returned error status"
            );

            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.text().await?;
        let reply = parse_reply(&self.server_base, &body)?;

        info!(
            response_len = reply.text.as_deref().map(str::len).unwrap_or(0),
            has_audio = reply.audio_uri.is_some(),
            "Received reply from inference backend"
        );
        if let Some(transcript) = &reply.transcript {
            debug!(transcript = %transcript, "Backend transcript");
        }

        Ok(reply)
    }
}

/// Parse a reply body, resolving the audio reference against `server_base`
pub(crate) fn parse_reply(server_base: &str, body: &str) -> Result<GatewayReply, GatewayError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        GatewayError::BadResponse(format!("{} - Response body: {}", e, body))
    })?;
    if !value.is_object() {
        return Err(GatewayError::BadResponse(format!(
            "expected a JSON object, got: {}",
            body
        )));
    }
    let parsed: ProcessResponse = serde_json::from_value(value)
        .map_err(|e| GatewayError::BadResponse(e.to_string()))?;

    Ok(GatewayReply {
        text: parsed.doctor_response.filter(|t| !t.trim().is_empty()),
        audio_uri: parsed
            .voice_of_doctor
            .as_deref()
            .and_then(|r| resolve_resource(server_base, r)),
        transcript: parsed.speech_to_text.filter(|t| !t.is_empty()),
    })
}

/// Resolve a server-relative resource reference
///
/// Empty references resolve to nothing; absolute `http(s)` URLs are kept.
pub fn resolve_resource(server_base: &str, reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    if reference.starts_with("http://") || reference.starts_with("https://") {
        return Some(reference.to_string());
    }
    Some(format!(
        "{}/{}",
        server_base.trim_end_matches('/'),
        reference.trim_start_matches('/')
    ))
}

fn local_path(uri: &str) -> PathBuf {
    PathBuf::from(uri.strip_prefix("file://").unwrap_or(uri))
}

async fn attachment_part(asset: &MediaAsset) -> Result<Part, GatewayError> {
    let path = local_path(&asset.uri);
    let data = tokio::fs::read(&path)
        .await
        .map_err(|source| GatewayError::Attachment {
            path: path.clone(),
            source,
        })?;

    let name = if asset.name.is_empty() {
        file_name_of(&asset.uri)
    } else {
        asset.name.clone()
    };
    let mime_type = if asset.mime_type.is_empty() {
        content_type_for(&name).unwrap_or(FALLBACK_CONTENT_TYPE)
    } else {
        asset.mime_type.as_str()
    };

    debug!(name = %name, mime_type = %mime_type, size = data.len(), "Attaching file");

    Part::bytes(data)
        .file_name(name.clone())
        .mime_str(mime_type)
        .map_err(|_| GatewayError::InvalidContentType {
            name,
            mime_type: mime_type.to_string(),
        })
}
