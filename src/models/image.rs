// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Images picked by the user and their display-only previews.

use std::path::{Path, PathBuf};

/// Side length of the square preview shown on the canvas.
pub const PREVIEW_SIZE: u32 = 200;

/// File extensions accepted by the picker and by drag-and-drop.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// How the user handed us an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadSource {
    Button,
    Canvas,
    Drop,
}

/// A file chosen for one upload interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedImage {
    pub path: PathBuf,
    pub source: UploadSource,
}

impl SelectedImage {
    pub fn new(path: PathBuf, source: UploadSource) -> Self {
        Self { path, source }
    }

    /// File name for log lines and window text.
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Check the extension against [`IMAGE_EXTENSIONS`], ignoring case.
pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
        })
        .unwrap_or(false)
}

/// Decoded, resized RGBA pixels for on-screen display only.
///
/// This is never fed to the model; the classifier decodes the file again
/// with its own resize rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewBitmap {
    pub width: u32,
    pub height: u32,
    /// Unmultiplied RGBA, row-major, `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl PreviewBitmap {
    pub fn size(&self) -> [usize; 2] {
        [self.width as usize, self.height as usize]
    }
}
