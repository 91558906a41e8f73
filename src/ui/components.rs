// Reusable UI components
// Message bubbles, feature cards, attachment chips and notice banners

use crate::state::{ChatAction, Notice, NoticeLevel};
use eframe::egui;
use medibot_client::chat::{AttachmentKind, MediaAsset, Message, Sender};

/// A feature advertised on the home screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

/// Home screen cards, in display order
pub const FEATURES: [Feature; 5] = [
    Feature {
        title: "Chatbot Assistant",
        description: "Get instant health advice and answers to your queries.",
    },
    Feature {
        title: "Disease Spread Nearby",
        description: "Stay informed about outbreaks in your area with real-time updates.",
    },
    Feature {
        title: "Health Records",
        description: "Upload and manage your medical documents easily.",
    },
    Feature {
        title: "Medication Reminders",
        description: "Set alerts and never miss your medications or appointments.",
    },
    Feature {
        title: "Emergency Contacts",
        description: "Connect to nearby hospitals and healthcare services instantly.",
    },
];

const USER_BUBBLE: egui::Color32 = egui::Color32::from_rgb(0, 122, 255);
const BOT_BUBBLE: egui::Color32 = egui::Color32::from_rgb(229, 229, 234);
const RECORDING_RED: egui::Color32 = egui::Color32::from_rgb(220, 0, 0);

/// Render one feature card
pub fn feature_card(ui: &mut egui::Ui, feature: &Feature) {
    egui::Frame::group(ui.style())
        .rounding(egui::Rounding::same(8.0))
        .inner_margin(egui::Margin::same(12.0))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(feature.title).strong().size(16.0));
            ui.add_space(4.0);
            ui.label(egui::RichText::new(feature.description).size(13.0));
        });
}

/// Render a chat bubble, aligned by sender
///
/// Pushes a `Play` action when the audio button is clicked.
pub fn message_bubble(ui: &mut egui::Ui, message: &Message, actions: &mut Vec<ChatAction>) {
    let (align, fill, text_color) = match message.sender {
        Sender::User => (egui::Align::Max, USER_BUBBLE, egui::Color32::WHITE),
        Sender::Bot => (egui::Align::Min, BOT_BUBBLE, egui::Color32::BLACK),
    };

    ui.with_layout(egui::Layout::top_down(align), |ui| {
        egui::Frame::none()
            .fill(fill)
            .rounding(egui::Rounding::same(10.0))
            .inner_margin(egui::Margin::same(10.0))
            .show(ui, |ui| {
                ui.set_max_width(ui.available_width() * 0.8);
                if let Some(image) = &message.image_uri {
                    ui.label(
                        egui::RichText::new(format!("🖼 {}", file_label(image)))
                            .color(text_color)
                            .italics(),
                    );
                }
                if let Some(text) = &message.text {
                    ui.label(egui::RichText::new(text).color(text_color));
                }
                if let Some(audio) = &message.audio_uri {
                    if ui
                        .button(egui::RichText::new("▶ Play audio").color(text_color))
                        .clicked()
                    {
                        actions.push(ChatAction::Play(audio.clone()));
                    }
                }
            });
    });
    ui.add_space(6.0);
}

/// Render a staged attachment with its remove button
pub fn attachment_chip(
    ui: &mut egui::Ui,
    kind: AttachmentKind,
    asset: &MediaAsset,
    actions: &mut Vec<ChatAction>,
) {
    let icon = match kind {
        AttachmentKind::Audio => "🎤",
        AttachmentKind::Image => "🖼",
        AttachmentKind::Camera => "📷",
    };

    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!("{} {}", icon, asset.name));
            if kind == AttachmentKind::Audio && ui.small_button("▶").clicked() {
                actions.push(ChatAction::Play(asset.uri.clone()));
            }
            if ui.small_button("✕").clicked() {
                actions.push(ChatAction::Remove(kind));
            }
        });
    });
}

/// Render the microphone toggle; red while recording
pub fn record_button(ui: &mut egui::Ui, recording: bool) -> egui::Response {
    if recording {
        ui.button(egui::RichText::new("⏹ Stop").color(RECORDING_RED))
    } else {
        ui.button("🎤 Record")
    }
}

/// Render a notice banner; returns true when dismissed
pub fn notice_banner(ui: &mut egui::Ui, notice: &Notice) -> bool {
    let color = match notice.level {
        NoticeLevel::Warning => egui::Color32::from_rgb(220, 180, 0),
        NoticeLevel::Alert => RECORDING_RED,
    };

    let mut dismissed = false;
    ui.horizontal(|ui| {
        ui.add_space(8.0);
        if let Some(title) = &notice.title {
            ui.colored_label(color, egui::RichText::new(title).strong());
        }
        ui.colored_label(color, &notice.message);
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            ui.add_space(8.0);
            dismissed = ui.small_button("Dismiss").clicked();
        });
    });
    dismissed
}

/// Last path segment of a URI, for compact labels
pub fn file_label(uri: &str) -> &str {
    uri.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or(uri)
}
