// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Turning model scores into ranked, labelled predictions.

use super::ClassifyError;
use crate::io::labels::LabelTable;
use crate::models::classification::{ClassificationResult, Prediction};
use std::cmp::Ordering;

/// Check that the scores line up with the label table and are finite.
pub fn check_scores(scores: &[f32], labels: &LabelTable) -> Result<(), ClassifyError> {
    if scores.is_empty() {
        return Err(ClassifyError::EmptyOutput);
    }
    if scores.len() != labels.len() {
        return Err(ClassifyError::OutputSize {
            expected: labels.len(),
            actual: scores.len(),
        });
    }
    if let Some(class_id) = scores.iter().position(|s| !s.is_finite()) {
        return Err(ClassifyError::NonFinite { class_id });
    }
    Ok(())
}

/// In-place, numerically stable softmax.
pub fn softmax(scores: &mut [f32]) {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let mut sum = 0.0;
    for s in scores.iter_mut() {
        *s = (*s - max).exp();
        sum += *s;
    }
    if sum > 0.0 {
        for s in scores.iter_mut() {
            *s /= sum;
        }
    }
}

/// Indices of the `k` highest scores, best first.
///
/// Equal scores keep the lower class index first.
pub fn top_k(scores: &[f32], k: usize) -> Vec<(usize, f32)> {
    let mut ranked: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    ranked.truncate(k);
    ranked
}

/// Rank the scores and attach labels.
pub fn decode_predictions(
    scores: &[f32],
    labels: &LabelTable,
    k: usize,
) -> Result<ClassificationResult, ClassifyError> {
    let predictions = top_k(scores, k)
        .into_iter()
        .filter_map(|(class_id, probability)| {
            labels.get(class_id).map(|label| Prediction {
                class_id,
                wnid: label.wnid.clone(),
                label: label.name.clone(),
                probability,
            })
        })
        .collect();

    ClassificationResult::new(predictions).ok_or(ClassifyError::EmptyOutput)
}
