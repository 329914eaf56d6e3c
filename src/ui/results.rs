// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Result label under the upload button.

use crate::classifier::ClassifyError;
use crate::models::classification::ClassificationResult;

/// Text shown for the most recent upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    /// `"<label> (<pct>%)"` or `"Error: <message>"`.
    pub headline: String,
    /// Runner-up predictions, already formatted.
    pub details: Vec<String>,
    pub is_error: bool,
}

impl ResultView {
    pub fn from_result(result: &ClassificationResult) -> Self {
        Self {
            headline: result.to_string(),
            details: result.runners_up().iter().map(|p| p.to_string()).collect(),
            is_error: false,
        }
    }

    pub fn from_error(error: &ClassifyError) -> Self {
        Self::error(error.to_string())
    }

    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            headline: format!("Error: {}", message),
            details: Vec::new(),
            is_error: true,
        }
    }
}

/// Draw the result area. Nothing is shown before the first result.
pub fn show(ui: &mut egui::Ui, view: Option<&ResultView>, busy: bool) {
    if busy {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label(egui::RichText::new("Classifying...").size(12.0).weak());
        });
        return;
    }

    let Some(view) = view else {
        return;
    };

    let color = if view.is_error {
        egui::Color32::from_rgb(0xB0, 0x00, 0x20)
    } else {
        egui::Color32::from_gray(20)
    };
    ui.label(egui::RichText::new(&view.headline).size(12.0).color(color));

    for line in &view.details {
        ui.label(egui::RichText::new(line).size(11.0).weak());
    }
}
