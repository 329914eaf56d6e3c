// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Heading and upload button.

const BUTTON_FILL: egui::Color32 = egui::Color32::from_rgb(0xFF, 0x00, 0x00);

/// Display the window heading.
pub fn heading(ui: &mut egui::Ui) {
    ui.label(
        egui::RichText::new("Upload Image")
            .size(18.0)
            .strong()
            .color(egui::Color32::BLACK),
    );
}

/// Display the upload button. Returns true when it was clicked.
pub fn upload_button(ui: &mut egui::Ui, busy: bool) -> bool {
    let text = egui::RichText::new("Upload Image")
        .size(12.0)
        .strong()
        .color(egui::Color32::WHITE);

    let response = ui.add(egui::Button::new(text).fill(BUTTON_FILL).min_size(egui::vec2(120.0, 28.0)));
    let response = if busy {
        response.on_hover_text("Uploading a new image replaces the one being classified")
    } else {
        response
    };
    response.clicked()
}
