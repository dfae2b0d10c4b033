use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};
use bevy_hand_gesture::GestureStatus;

use super::colors;
use crate::capture::{CaptureStillFrame, LastStillFrame};
use crate::decorations::{AddPhoto, PhotoRegistry};
use crate::frame::TeardownRequested;
use crate::state::{ModeState, ResetView, SceneMode, SetSceneMode};
use crate::theme::{ActiveTheme, SetTheme, ThemeKey};

/// Text typed into the photo path field.
#[derive(Resource, Default)]
pub struct PhotoPathInput(pub String);

/// Host controls along the top of the window
pub fn draw_toolbar(
    mut contexts: EguiContexts,
    state: Res<ModeState>,
    theme: Res<ActiveTheme>,
    mut photo_path: ResMut<PhotoPathInput>,
    mut set_mode: MessageWriter<SetSceneMode>,
    mut set_theme: MessageWriter<SetTheme>,
    mut add_photo: MessageWriter<AddPhoto>,
    mut reset: MessageWriter<ResetView>,
    mut capture: MessageWriter<CaptureStillFrame>,
    mut teardown: MessageWriter<TeardownRequested>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    egui::TopBottomPanel::top("tree_toolbar")
        .frame(egui::Frame::side_top_panel(&ctx.style()).fill(colors::PANEL_BG))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Layout:");
                for mode in [SceneMode::Tree, SceneMode::Scatter] {
                    if ui.selectable_label(state.mode == mode, mode.label()).clicked() {
                        set_mode.write(SetSceneMode(mode));
                    }
                }
                if state.mode == SceneMode::Focus {
                    ui.label(egui::RichText::new("Focus").color(colors::ACCENT_GOLD));
                }

                ui.separator();

                let mut selected = theme.0;
                egui::ComboBox::from_id_salt("theme_combo")
                    .selected_text(selected.label())
                    .show_ui(ui, |ui| {
                        for key in ThemeKey::ALL {
                            ui.selectable_value(&mut selected, key, key.label());
                        }
                    });
                if selected != theme.0 {
                    set_theme.write(SetTheme::new(selected.key()));
                }

                ui.separator();

                let field = ui.add(
                    egui::TextEdit::singleline(&mut photo_path.0)
                        .hint_text("path/to/photo.jpg")
                        .desired_width(180.0),
                );
                let submitted = field.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if (ui.button("Add Photo").clicked() || submitted) && !photo_path.0.trim().is_empty() {
                    add_photo.write(AddPhoto::file(photo_path.0.trim()));
                    photo_path.0.clear();
                }

                ui.separator();

                if ui.button("Reset View").clicked() {
                    reset.write(ResetView);
                }
                if ui.button("Capture").clicked() {
                    capture.write(CaptureStillFrame);
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .button(egui::RichText::new("Exit").color(colors::STATUS_ERROR))
                        .clicked()
                    {
                        teardown.write(TeardownRequested);
                    }
                });
            });
        });

    Ok(())
}

/// One-line status readout along the bottom
pub fn draw_status_bar(
    mut contexts: EguiContexts,
    state: Res<ModeState>,
    status: Res<GestureStatus>,
    registry: Res<PhotoRegistry>,
    last_frame: Res<LastStillFrame>,
) -> Result {
    let ctx = contexts.ctx_mut()?;

    let status_color = match *status {
        GestureStatus::Ready => colors::STATUS_SUCCESS,
        GestureStatus::NotReady => colors::TEXT_MUTED,
        GestureStatus::Disconnected => colors::STATUS_WARNING,
        GestureStatus::Failed(_) => colors::STATUS_ERROR,
    };

    egui::TopBottomPanel::bottom("tree_status")
        .frame(egui::Frame::side_top_panel(&ctx.style()).fill(colors::PANEL_BG))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(format!("Mode: {}", state.mode.label()))
                        .color(colors::TEXT_PRIMARY),
                );
                ui.separator();
                ui.label(egui::RichText::new(status.label()).color(status_color));
                ui.separator();
                ui.label(format!("Photos: {}", registry.count()));
                if let Some(data_url) = &last_frame.0 {
                    ui.separator();
                    ui.label(
                        egui::RichText::new(format!("Last capture: {} KB", data_url.len() / 1024))
                            .color(colors::TEXT_MUTED),
                    );
                }
            });
        });

    Ok(())
}
