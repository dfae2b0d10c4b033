use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

use super::colors;
use crate::gesture::GestureCursor;

const CURSOR_RADIUS: f32 = 12.0;

/// Ring that follows the tracked fingertip. Gold while over a photo, filled
/// while pinching, hidden when no hand is seen.
pub fn draw_gesture_cursor(mut contexts: EguiContexts, cursor: Res<GestureCursor>) -> Result {
    if !cursor.visible {
        return Ok(());
    }
    let ctx = contexts.ctx_mut()?;

    let screen = ctx.content_rect();
    let center = screen.min + egui::vec2(cursor.position.x, cursor.position.y) * screen.size();
    let color = if cursor.hovering {
        colors::CURSOR_HOVER
    } else {
        colors::CURSOR_IDLE
    };

    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Foreground,
        egui::Id::new("gesture_cursor"),
    ));
    if cursor.pinching {
        painter.circle_filled(center, CURSOR_RADIUS * 0.7, color);
    } else {
        painter.circle_stroke(center, CURSOR_RADIUS, egui::Stroke::new(2.0, color));
    }

    Ok(())
}
