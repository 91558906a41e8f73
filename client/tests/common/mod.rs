//! Fake collaborators shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use medibot_client::chat::{ImageSource, MediaAsset};
use medibot_client::device::{
    ActiveRecording, AudioCapture, AudioPlayer, DeviceError, Devices, MediaPicker,
};
use medibot_client::gateway::{CompositePayload, GatewayError, GatewayReply, InferenceGateway};
use medibot_client::Notifier;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Microphone that records to a fixed path
pub struct FakeCapture {
    pub granted: bool,
    pub fail_start: bool,
    pub fail_finish: bool,
    pub starts: AtomicUsize,
}

impl FakeCapture {
    pub fn granted() -> Self {
        Self {
            granted: true,
            fail_start: false,
            fail_finish: false,
            starts: AtomicUsize::new(0),
        }
    }

    pub fn denied() -> Self {
        Self {
            granted: false,
            ..Self::granted()
        }
    }
}

struct FakeRecording {
    uri: String,
    fail: bool,
}

#[async_trait]
impl ActiveRecording for FakeRecording {
    async fn finish(&mut self) -> Result<String, DeviceError> {
        if self.fail {
            return Err(DeviceError::MissingOutput(self.uri.clone().into()));
        }
        Ok(self.uri.clone())
    }
}

#[async_trait]
impl AudioCapture for FakeCapture {
    async fn request_permission(&self) -> bool {
        self.granted
    }

    async fn start(&self) -> Result<Box<dyn ActiveRecording>, DeviceError> {
        if self.fail_start {
            return Err(DeviceError::ProcessFailed("no input device".to_string()));
        }
        let n = self.starts.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeRecording {
            uri: format!("/tmp/fake-recording-{}.m4a", n),
            fail: self.fail_finish,
        }))
    }
}

/// Picker returning preset assets
#[derive(Default)]
pub struct FakePicker {
    pub camera_granted: bool,
    pub fail: bool,
    pub library: Option<MediaAsset>,
    pub camera: Option<MediaAsset>,
    pub picks: AtomicUsize,
}

#[async_trait]
impl MediaPicker for FakePicker {
    async fn request_camera_permission(&self) -> bool {
        self.camera_granted
    }

    async fn pick(&self, source: ImageSource) -> Result<Option<MediaAsset>, DeviceError> {
        self.picks.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(DeviceError::ProcessFailed("chooser crashed".to_string()));
        }
        Ok(match source {
            ImageSource::Library => self.library.clone(),
            ImageSource::Camera => self.camera.clone(),
        })
    }
}

/// Player that records what it was asked to play
#[derive(Default)]
pub struct FakePlayer {
    pub fail: bool,
    pub played: Mutex<Vec<String>>,
}

#[async_trait]
impl AudioPlayer for FakePlayer {
    async fn play(&self, uri: &str) -> Result<(), DeviceError> {
        self.played.lock().unwrap().push(uri.to_string());
        if self.fail {
            Err(DeviceError::ProcessFailed("decoder error".to_string()))
        } else {
            Ok(())
        }
    }
}

/// Notifier that remembers every notice
#[derive(Default)]
pub struct RecordingNotifier {
    pub warnings: Mutex<Vec<String>>,
    pub alerts: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn warning_count(&self) -> usize {
        self.warnings.lock().unwrap().len()
    }

    pub fn alert_count(&self) -> usize {
        self.alerts.lock().unwrap().len()
    }
}

impl Notifier for RecordingNotifier {
    fn warn(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }

    fn alert(&self, title: &str, message: &str) {
        self.alerts
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}

/// Gateway that replays scripted results and records payloads
///
/// With a gate set, every call waits for one `notify_one` before answering.
#[derive(Default)]
pub struct ScriptedGateway {
    pub results: Mutex<VecDeque<Result<GatewayReply, GatewayError>>>,
    pub payloads: Mutex<Vec<CompositePayload>>,
    pub gate: Option<Arc<Notify>>,
}

impl ScriptedGateway {
    pub fn replying(texts: &[&str]) -> Self {
        Self {
            results: Mutex::new(
                texts
                    .iter()
                    .map(|t| {
                        Ok(GatewayReply {
                            text: Some(t.to_string()),
                            ..Default::default()
                        })
                    })
                    .collect(),
            ),
            ..Default::default()
        }
    }

    pub fn push(&self, result: Result<GatewayReply, GatewayError>) {
        self.results.lock().unwrap().push_back(result);
    }

    pub fn payloads(&self) -> Vec<CompositePayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceGateway for ScriptedGateway {
    async fn process(&self, payload: &CompositePayload) -> Result<GatewayReply, GatewayError> {
        self.payloads.lock().unwrap().push(payload.clone());
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::BadResponse("no scripted reply".to_string())))
    }
}

/// Bundle fakes into the controller's device set
pub fn devices(
    capture: Arc<FakeCapture>,
    picker: Arc<FakePicker>,
    player: Arc<FakePlayer>,
) -> Devices {
    Devices {
        capture,
        picker,
        player,
    }
}

pub fn image(uri: &str) -> MediaAsset {
    MediaAsset::new(uri, uri.rsplit('/').next().unwrap_or(uri), "image/jpeg")
}
