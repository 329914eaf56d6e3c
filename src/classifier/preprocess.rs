// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Conversion from decoded images to ResNet50 input tensors.
//!
//! ResNet50 weights trained in "caffe" mode expect BGR channels with the
//! ImageNet per-channel mean subtracted and no further scaling.

use super::{InputLayout, InputTensor};
use image::{imageops::FilterType, DynamicImage};

/// Side length of the square model input.
pub const MODEL_INPUT_SIZE: u32 = 224;

/// ImageNet channel means in BGR order.
pub const IMAGENET_MEAN_BGR: [f32; 3] = [103.939, 116.779, 123.68];

/// Resize to the model input size and normalize into a batch of one.
///
/// Resizing uses nearest-neighbour sampling and ignores the aspect ratio.
pub fn preprocess(img: &DynamicImage, layout: InputLayout) -> InputTensor {
    let size = MODEL_INPUT_SIZE as usize;
    let rgb = img
        .resize_exact(MODEL_INPUT_SIZE, MODEL_INPUT_SIZE, FilterType::Nearest)
        .to_rgb8();

    let mut data = vec![0.0f32; 3 * size * size];
    for (x, y, pixel) in rgb.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let bgr = [b, g, r];
        for c in 0..3 {
            let offset = layout.offset(size, c, y as usize, x as usize);
            data[offset] = bgr[c] as f32 - IMAGENET_MEAN_BGR[c];
        }
    }

    InputTensor { layout, size, data }
}
