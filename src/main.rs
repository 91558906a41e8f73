// MediBot - Main Entry Point
// Native desktop front end for the MediBot health assistant

mod state;
mod ui;

use eframe::egui;
use medibot_client::chat::ImageSource;
use medibot_client::device::Devices;
use medibot_client::chat::SubmitOutcome;
use medibot_client::{ChatController, ChatSession, ClientConfig, HttpGateway};
use state::{AppState, ChatAction, ChatView, NoticeBoard};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use ui::render_app_layout;

/// Repaint interval while a submission or recording is running
const BUSY_REPAINT: Duration = Duration::from_millis(100);
/// Repaint interval otherwise, so notices from background tasks show up
const IDLE_REPAINT: Duration = Duration::from_millis(500);

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ClientConfig::from_env()?;
    info!(server = %config.server.base_url, "Starting MediBot");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    let notices = NoticeBoard::new();
    let controller = ChatController::new(
        ChatSession::new(),
        Arc::new(HttpGateway::new(&config.server.base_url)),
        Devices::from_config(&config.media),
        Arc::new(notices.clone()),
    );
    let app = MediBotApp::new(runtime, controller, notices);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("MediBot")
            .with_inner_size([480.0, 760.0])
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native("MediBot", options, Box::new(|_cc| Box::new(app)))
        .map_err(|e| anyhow::anyhow!("GUI failed: {}", e))
}

/// Main application struct
/// Owns the runtime the chat operations run on
struct MediBotApp {
    state: AppState,
    runtime: Runtime,
    controller: ChatController,
    notices: NoticeBoard,
    /// Text of sends the controller did not accept, back to the draft
    returned_tx: UnboundedSender<String>,
    returned_rx: UnboundedReceiver<String>,
}

impl MediBotApp {
    fn new(runtime: Runtime, controller: ChatController, notices: NoticeBoard) -> Self {
        let (returned_tx, returned_rx) = unbounded_channel();
        let mut app = Self {
            state: AppState::new(),
            runtime,
            controller,
            notices,
            returned_tx,
            returned_rx,
        };
        app.refresh();
        app
    }

    /// Take a fresh snapshot of the session, unless a writer holds it
    fn refresh(&mut self) {
        if let Ok(session) = self.controller.session().try_read() {
            self.state.view = ChatView::capture(&session);
        }
        while let Ok(text) = self.returned_rx.try_recv() {
            self.state.restore_draft(text);
        }
    }

    /// Run an action on the runtime without blocking the frame
    fn dispatch(&self, action: ChatAction) {
        debug!(action = ?action, "Dispatching chat action");
        let controller = self.controller.clone();
        let returned = self.returned_tx.clone();
        self.runtime.spawn(async move {
            match action {
                ChatAction::ToggleRecording => controller.start_or_stop_recording().await,
                ChatAction::PickImage(ImageSource::Library) => controller.pick_from_library().await,
                ChatAction::PickImage(ImageSource::Camera) => controller.pick_from_camera().await,
                ChatAction::Remove(kind) => controller.remove_attachment(kind).await,
                ChatAction::Send(text) => send_text(&controller, text, &returned).await,
                ChatAction::Play(uri) => controller.play_attachment(&uri).await,
            }
        });
    }
}

/// Submit `text`; if it was not accepted, hand it back to the draft
async fn send_text(controller: &ChatController, text: String, returned: &UnboundedSender<String>) {
    if controller.submit_text(&text).await == SubmitOutcome::Skipped {
        debug!("Send not accepted, returning text to the draft");
        // The receiver only goes away with the app
        let _ = returned.send(text);
    }
}

impl eframe::App for MediBotApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.refresh();

        let actions = render_app_layout(ctx, &mut self.state, &self.notices);
        for action in actions {
            self.dispatch(action);
        }

        let interval = if self.state.view.busy() {
            BUSY_REPAINT
        } else {
            IDLE_REPAINT
        };
        ctx.request_repaint_after(interval);
    }
}
