// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Image classification with a pretrained ImageNet model.
//!
//! The [`Classifier`] handle is built once at startup and shared with the
//! background worker. It owns the model (behind the [`ImageModel`] trait),
//! the label table, and the decoding options. Classifying an image is a
//! pure function of that handle and the file on disk.

pub mod decode;
pub mod preprocess;
pub mod tract;

use crate::io::{config::AppConfig, labels::LabelTable, media};
use crate::models::classification::ClassificationResult;
use anyhow::Context;
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Memory layout of the model's input tensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputLayout {
    /// `[batch, height, width, channels]`, as exported from Keras.
    Nhwc,
    /// `[batch, channels, height, width]`.
    Nchw,
}

impl InputLayout {
    /// Tensor shape for a batch of one square `size` x `size` image.
    pub fn shape(self, size: usize) -> [usize; 4] {
        match self {
            InputLayout::Nhwc => [1, size, size, 3],
            InputLayout::Nchw => [1, 3, size, size],
        }
    }

    /// Flat offset of channel `c` at pixel (`x`, `y`).
    pub fn offset(self, size: usize, c: usize, y: usize, x: usize) -> usize {
        match self {
            InputLayout::Nhwc => (y * size + x) * 3 + c,
            InputLayout::Nchw => c * size * size + y * size + x,
        }
    }
}

/// A preprocessed batch of one image, ready for the model.
#[derive(Debug, Clone, PartialEq)]
pub struct InputTensor {
    pub layout: InputLayout,
    /// Height and width of the (square) image.
    pub size: usize,
    pub data: Vec<f32>,
}

impl InputTensor {
    pub fn shape(&self) -> [usize; 4] {
        self.layout.shape(self.size)
    }

    /// Value of channel `c` (BGR order) at pixel (`x`, `y`).
    #[cfg(test)]
    pub fn value(&self, c: usize, y: usize, x: usize) -> f32 {
        self.data[self.layout.offset(self.size, c, y, x)]
    }
}

/// A frozen model mapping an input tensor to one score per class.
pub trait ImageModel: Send + Sync {
    fn input_layout(&self) -> InputLayout;

    fn predict(&self, input: &InputTensor) -> anyhow::Result<Vec<f32>>;
}

/// Why an image could not be classified.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    #[error("could not load image {}: {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("model inference failed: {0:#}")]
    Inference(anyhow::Error),

    #[error("model returned no scores")]
    EmptyOutput,

    #[error("model returned {actual} scores but the label table has {expected} classes")]
    OutputSize { expected: usize, actual: usize },

    #[error("model returned a non-finite score for class {class_id}")]
    NonFinite { class_id: usize },

    #[error("classification was cancelled")]
    Cancelled,
}

/// Immutable handle to a loaded model and its label table.
///
/// Cloning is cheap; clones share the model.
#[derive(Clone)]
pub struct Classifier {
    model: Arc<dyn ImageModel>,
    labels: Arc<LabelTable>,
    apply_softmax: bool,
    top_k: usize,
}

impl Classifier {
    /// Wrap a model and label table, reporting only the top-1 class.
    pub fn new(model: Arc<dyn ImageModel>, labels: LabelTable) -> Self {
        Self {
            model,
            labels: Arc::new(labels),
            apply_softmax: false,
            top_k: 1,
        }
    }

    /// Number of ranked predictions to keep (at least one).
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Normalize raw logits with softmax before ranking.
    pub fn with_softmax(mut self, apply_softmax: bool) -> Self {
        self.apply_softmax = apply_softmax;
        self
    }

    /// Load the ONNX model and label table named by the configuration.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let labels = LabelTable::load(&config.labels_path)?;
        let model = tract::TractModel::load(&config.model_path, config.input_layout)
            .with_context(|| format!("Failed to load model {}", config.model_path.display()))?;

        Ok(Self::new(Arc::new(model), labels)
            .with_top_k(config.top_k)
            .with_softmax(config.apply_softmax))
    }

    /// Classify the image stored at `path`.
    ///
    /// The file is decoded once. `on_decoded` sees the decoded image before
    /// inference; returning false skips the model and yields
    /// [`ClassifyError::Cancelled`].
    pub fn classify_image(
        &self,
        path: &Path,
        on_decoded: impl FnOnce(&DynamicImage) -> bool,
    ) -> Result<ClassificationResult, ClassifyError> {
        let img = media::open_image(path).map_err(|source| ClassifyError::ImageLoad {
            path: path.to_path_buf(),
            source,
        })?;
        if !on_decoded(&img) {
            return Err(ClassifyError::Cancelled);
        }
        self.classify(&img)
    }

    /// Classify an already decoded image.
    pub fn classify(&self, img: &DynamicImage) -> Result<ClassificationResult, ClassifyError> {
        let input = preprocess::preprocess(img, self.model.input_layout());
        log::debug!("Model input shape {:?}", input.shape());

        let started = Instant::now();
        let mut scores = self.model.predict(&input).map_err(ClassifyError::Inference)?;
        log::debug!("Inference took {:.1?}", started.elapsed());

        decode::check_scores(&scores, &self.labels)?;
        if self.apply_softmax {
            decode::softmax(&mut scores);
        }
        decode::decode_predictions(&scores, &self.labels, self.top_k)
    }
}
