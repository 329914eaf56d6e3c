// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Clickable preview canvas.
//!
//! Shows the 200x200 preview of the last uploaded image, or an invitation
//! to upload one. Clicking anywhere on it opens the file picker.

use crate::models::image::PREVIEW_SIZE;

const CANVAS_FILL: egui::Color32 = egui::Color32::from_rgb(0xED, 0xED, 0xED);
const PLACEHOLDER: &str = "Drag and Drop a file,\nor click to upload";

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    Upload,
}

/// Paint the canvas and report clicks.
pub fn show(
    ui: &mut egui::Ui,
    texture: Option<&egui::TextureHandle>,
    hovering_files: bool,
) -> CanvasAction {
    let size = egui::vec2(PREVIEW_SIZE as f32, PREVIEW_SIZE as f32);
    let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click());
    let painter = ui.painter();

    painter.rect_filled(rect, 0.0, CANVAS_FILL);

    if let Some(texture) = texture {
        painter.image(
            texture.id(),
            rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    } else {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            PLACEHOLDER,
            egui::FontId::proportional(12.0),
            egui::Color32::from_gray(40),
        );
    }

    // Grooved border, highlighted while files are dragged over the window
    let border = if hovering_files {
        egui::Stroke::new(3.0, egui::Color32::from_rgb(0x1E, 0x90, 0xFF))
    } else {
        egui::Stroke::new(2.0, egui::Color32::from_gray(160))
    };
    painter.rect_stroke(rect.expand(2.0), 0.0, border);
    painter.rect_stroke(rect.expand(1.0), 0.0, egui::Stroke::new(1.0, egui::Color32::WHITE));

    let response = response.on_hover_cursor(egui::CursorIcon::PointingHand);
    if response.clicked() {
        CanvasAction::Upload
    } else {
        CanvasAction::None
    }
}
