// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Classification results and their text form.

use std::fmt;

/// One decoded class from the model output.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Index into the model's output vector.
    pub class_id: usize,
    /// WordNet synset id, e.g. `n02123045`.
    pub wnid: String,
    /// Human-readable label, e.g. `tabby`.
    pub label: String,
    /// Probability in `[0, 1]`.
    pub probability: f32,
}

impl Prediction {
    /// Confidence as a percentage clamped to `[0, 100]`.
    pub fn confidence_percent(&self) -> f32 {
        (self.probability * 100.0).clamp(0.0, 100.0)
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}%)", self.label, self.confidence_percent())
    }
}

/// Ranked predictions for one image, best first.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    predictions: Vec<Prediction>,
}

impl ClassificationResult {
    /// Build a result from ranked predictions.
    ///
    /// Returns `None` when `predictions` is empty.
    pub fn new(predictions: Vec<Prediction>) -> Option<Self> {
        if predictions.is_empty() {
            None
        } else {
            Some(Self { predictions })
        }
    }

    /// The top-1 prediction.
    pub fn top(&self) -> &Prediction {
        &self.predictions[0]
    }

    pub fn label(&self) -> &str {
        &self.top().label
    }

    pub fn confidence_percent(&self) -> f32 {
        self.top().confidence_percent()
    }

    /// Predictions ranked after the top one.
    pub fn runners_up(&self) -> &[Prediction] {
        &self.predictions[1..]
    }

    #[cfg(test)]
    pub fn predictions(&self) -> &[Prediction] {
        &self.predictions
    }
}

impl fmt::Display for ClassificationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}%)", self.label(), self.confidence_percent())
    }
}
