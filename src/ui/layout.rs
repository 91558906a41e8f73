// Main application layout
// Top bar, notice area, and the home and chat screens

use crate::state::{AppState, ChatAction, NoticeBoard, Screen};
use crate::ui::components::*;
use eframe::egui;
use medibot_client::chat::ImageSource;

/// Render one frame and collect the actions the user triggered
pub fn render_app_layout(
    ctx: &egui::Context,
    state: &mut AppState,
    notices: &NoticeBoard,
) -> Vec<ChatAction> {
    let mut actions = Vec::new();

    render_top_bar(ctx, state);
    render_notices(ctx, notices);

    egui::CentralPanel::default().show(ctx, |ui| match state.screen {
        Screen::Home => render_home(ui),
        Screen::Chat => render_chat(ui, state, &mut actions),
    });

    actions
}

fn render_top_bar(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.label(egui::RichText::new("MediBot").strong());
            ui.separator();
            for screen in [Screen::Home, Screen::Chat] {
                if ui
                    .selectable_label(state.screen == screen, screen.title())
                    .clicked()
                {
                    state.show(screen);
                }
            }

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let mut dark_mode = ctx.style().visuals.dark_mode;
                if ui.checkbox(&mut dark_mode, "Dark Mode").changed() {
                    let visuals = if dark_mode {
                        egui::Visuals::dark()
                    } else {
                        egui::Visuals::light()
                    };
                    ctx.set_visuals(visuals);
                }
            });
        });
    });
}

fn render_notices(ctx: &egui::Context, notices: &NoticeBoard) {
    let current = notices.snapshot();
    if current.is_empty() {
        return;
    }

    egui::TopBottomPanel::top("notices").show(ctx, |ui| {
        ui.add_space(4.0);
        let mut dismissed = None;
        for (index, notice) in current.iter().enumerate() {
            if notice_banner(ui, notice) {
                dismissed = Some(index);
            }
        }
        ui.add_space(4.0);
        if let Some(index) = dismissed {
            notices.dismiss(index);
        }
    });
}

fn render_home(ui: &mut egui::Ui) {
    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .show(ui, |ui| {
            ui.vertical_centered(|ui| {
                ui.add_space(32.0);
                ui.heading(egui::RichText::new("Welcome to MediBot").size(28.0).strong());
                ui.add_space(8.0);
                ui.label(
                    egui::RichText::new("Your Personal Health Companion")
                        .size(16.0)
                        .weak(),
                );
                ui.add_space(24.0);
            });

            for feature in FEATURES.iter() {
                feature_card(ui, feature);
                ui.add_space(12.0);
            }
        });
}

fn render_chat(ui: &mut egui::Ui, state: &mut AppState, actions: &mut Vec<ChatAction>) {
    // Composer at the bottom, messages fill the rest
    egui::TopBottomPanel::bottom("composer")
        .resizable(false)
        .show_inside(ui, |ui| {
            ui.add_space(6.0);
            render_previews(ui, state, actions);
            render_composer(ui, state, actions);
            ui.add_space(6.0);
        });

    egui::ScrollArea::vertical()
        .auto_shrink([false; 2])
        .stick_to_bottom(true)
        .show(ui, |ui| {
            ui.add_space(8.0);
            for message in &state.view.messages {
                message_bubble(ui, message, actions);
            }
            if state.view.sending {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(egui::RichText::new("MediBot is thinking...").weak());
                });
            }
        });
}

fn render_previews(ui: &mut egui::Ui, state: &AppState, actions: &mut Vec<ChatAction>) {
    let previews = state.view.previews();
    if previews.is_empty() {
        return;
    }
    ui.horizontal_wrapped(|ui| {
        for (kind, asset) in previews {
            attachment_chip(ui, kind, asset, actions);
        }
    });
    ui.add_space(4.0);
}

fn render_composer(ui: &mut egui::Ui, state: &mut AppState, actions: &mut Vec<ChatAction>) {
    ui.horizontal(|ui| {
        if record_button(ui, state.view.recording).clicked() {
            actions.push(ChatAction::ToggleRecording);
        }
        if ui.button("🖼 Library").clicked() {
            actions.push(ChatAction::PickImage(ImageSource::Library));
        }
        if ui.button("📷 Camera").clicked() {
            actions.push(ChatAction::PickImage(ImageSource::Camera));
        }

        let send_clicked = ui
            .with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let send = ui.add_enabled(!state.view.sending, egui::Button::new("Send"));
                let input = ui.add(
                    egui::TextEdit::singleline(&mut state.draft)
                        .hint_text("Type a message...")
                        .desired_width(f32::INFINITY),
                );
                let entered =
                    input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if entered {
                    input.request_focus();
                }
                send.clicked() || entered
            })
            .inner;

        if send_clicked {
            if let Some(action) = state.take_send() {
                actions.push(action);
            }
        }
    });
}
