// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image Classifier
//!
//! A desktop application that shows the ImageNet class a pretrained
//! ResNet50 model assigns to a user-selected image.

mod app;
mod classifier;
mod io;
mod models;
mod session;
mod ui;
mod worker;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use app::ClassifierApp;
use classifier::Classifier;
use io::config::{AppConfig, CONFIG_FILE};
use std::path::Path;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = AppConfig::load_or_default(Path::new(CONFIG_FILE))?;

    // The model is loaded once and shared by every classification
    let classifier = Classifier::from_config(&config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([500.0, 500.0])
            .with_min_inner_size([320.0, 420.0])
            .with_title(config.window_title.clone()),
        ..Default::default()
    };

    eframe::run_native(
        "image-classifier",
        options,
        Box::new(move |cc| Ok(Box::new(ClassifierApp::new(cc, classifier)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
