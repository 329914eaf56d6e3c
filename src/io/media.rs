// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image file loading.
//!
//! This module decodes image files and converts decoded images to the
//! fixed-size preview bitmaps displayed by the canvas.

use crate::models::image::{PreviewBitmap, PREVIEW_SIZE};
use image::{imageops::FilterType, DynamicImage, ImageResult};
use std::path::Path;

/// Decode an image file, guessing the format from its contents.
pub fn open_image(path: &Path) -> ImageResult<DynamicImage> {
    let img = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?;
    log::debug!("Decoded {} ({}x{})", path.display(), img.width(), img.height());
    Ok(img)
}

/// Resize to exactly `PREVIEW_SIZE` x `PREVIEW_SIZE` with Lanczos3.
///
/// The aspect ratio is not preserved; the canvas is square.
pub fn make_preview(img: &DynamicImage) -> PreviewBitmap {
    let resized = img
        .resize_exact(PREVIEW_SIZE, PREVIEW_SIZE, FilterType::Lanczos3)
        .to_rgba8();

    PreviewBitmap {
        width: resized.width(),
        height: resized.height(),
        pixels: resized.into_raw(),
    }
}
