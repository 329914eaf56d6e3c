// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module wires the [`Session`] to the window: it forwards clicks and
//! dropped files, drains worker results once per frame, and keeps the
//! preview texture in step with the session's preview bitmap.

use crate::classifier::Classifier;
use crate::models::image::UploadSource;
use crate::session::Session;
use crate::ui::{canvas, controls, dialogs::NativeDialogs, results};
use std::path::PathBuf;
use std::sync::Arc;

const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0xF9, 0xF9, 0xF9);

/// Main application state.
pub struct ClassifierApp {
    session: Session,
    dialogs: NativeDialogs,

    /// Texture for the session's current preview
    preview_texture: Option<egui::TextureHandle>,

    /// Preview revision the texture was built from
    texture_revision: u64,
}

impl ClassifierApp {
    /// Create the application around an already loaded classifier.
    pub fn new(cc: &eframe::CreationContext<'_>, classifier: Classifier) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals::light());

        let ctx = cc.egui_ctx.clone();
        let session = Session::new(classifier, Arc::new(move || ctx.request_repaint()));

        Self {
            session,
            dialogs: NativeDialogs,
            preview_texture: None,
            texture_revision: 0,
        }
    }

    /// Rebuild the preview texture if the session's preview changed.
    fn sync_preview_texture(&mut self, ctx: &egui::Context) {
        if self.texture_revision == self.session.preview_revision() {
            return;
        }
        self.texture_revision = self.session.preview_revision();

        // Replacing the handle frees the previous texture
        self.preview_texture = self.session.preview().map(|preview| {
            let image = egui::ColorImage::from_rgba_unmultiplied(preview.size(), &preview.pixels);
            ctx.load_texture("preview", image, egui::TextureOptions::LINEAR)
        });
    }

    fn upload(&mut self, source: UploadSource) {
        self.session.upload_image(&self.dialogs, source);
    }
}

impl eframe::App for ClassifierApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.session.poll();
        self.sync_preview_texture(ctx);

        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            self.session.handle_dropped(&dropped);
        }
        let hovering_files = ctx.input(|i| !i.raw.hovered_files.is_empty());

        let mut upload_from = None;

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(BACKGROUND))
            .show(ctx, |ui| {
                ui.vertical_centered(|ui| {
                    ui.add_space(20.0);
                    controls::heading(ui);
                    ui.add_space(20.0);

                    if let canvas::CanvasAction::Upload =
                        canvas::show(ui, self.preview_texture.as_ref(), hovering_files)
                    {
                        upload_from = Some(UploadSource::Canvas);
                    }

                    ui.add_space(20.0);
                    if controls::upload_button(ui, self.session.is_busy()) {
                        upload_from = Some(UploadSource::Button);
                    }

                    ui.add_space(20.0);
                    results::show(ui, self.session.result(), self.session.is_busy());
                });
            });

        // Dialogs block, so open them after the frame's UI is laid out
        if let Some(source) = upload_from {
            self.upload(source);
            ctx.request_repaint();
        }
    }
}
