// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Native file picker and message boxes.

use crate::models::image::IMAGE_EXTENSIONS;
use std::path::PathBuf;

/// Blocking dialogs used by the upload flow.
pub trait Dialogs {
    /// Ask the user for an image file. `None` means the dialog was cancelled.
    fn pick_image(&self) -> Option<PathBuf>;

    /// Show a warning and wait for the user to dismiss it.
    fn warn(&self, title: &str, message: &str);
}

/// Dialogs provided by the operating system through `rfd`.
#[derive(Debug, Default)]
pub struct NativeDialogs;

impl Dialogs for NativeDialogs {
    fn pick_image(&self) -> Option<PathBuf> {
        rfd::FileDialog::new()
            .set_title("Select an image")
            .add_filter("Image files", IMAGE_EXTENSIONS)
            .pick_file()
    }

    fn warn(&self, title: &str, message: &str) {
        let _ = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title(title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}
