// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Shared fixtures for unit tests.

use crate::classifier::{ImageModel, InputLayout, InputTensor};
use crate::io::labels::LabelTable;
use image::{Rgb, RgbImage};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A path in the temp directory unique to this process and call.
pub fn temp_path(name: &str) -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!("image-classifier-{}-{}-{}", std::process::id(), n, name))
}

pub fn write_solid_image(path: &Path, width: u32, height: u32, rgb: [u8; 3]) {
    RgbImage::from_pixel(width, height, Rgb(rgb)).save(path).unwrap();
}

/// Labels `class_0..class_{n-1}` with wnids `n00000000..`.
pub fn labels_with_classes(n: usize) -> LabelTable {
    let entries: Vec<String> = (0..n)
        .map(|i| format!("\"{i}\": [\"n{i:08}\", \"class_{i}\"]"))
        .collect();
    LabelTable::from_json(&format!("{{{}}}", entries.join(","))).unwrap()
}

/// A model that always returns the same scores and records its input.
pub struct FixedModel {
    scores: Result<Vec<f32>, String>,
    layout: InputLayout,
    last_input: Mutex<Option<InputTensor>>,
}

impl FixedModel {
    pub fn new(scores: Vec<f32>) -> Self {
        Self {
            scores: Ok(scores),
            layout: InputLayout::Nhwc,
            last_input: Mutex::new(None),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            scores: Err(message.to_string()),
            layout: InputLayout::Nhwc,
            last_input: Mutex::new(None),
        }
    }

    pub fn with_layout(mut self, layout: InputLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn last_input(&self) -> Option<InputTensor> {
        self.last_input.lock().unwrap().clone()
    }
}

impl ImageModel for FixedModel {
    fn input_layout(&self) -> InputLayout {
        self.layout
    }

    fn predict(&self, input: &InputTensor) -> anyhow::Result<Vec<f32>> {
        *self.last_input.lock().unwrap() = Some(input.clone());
        match &self.scores {
            Ok(scores) => Ok(scores.clone()),
            Err(message) => Err(anyhow::anyhow!("{}", message)),
        }
    }
}
