// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! ONNX model execution with tract.

use super::preprocess::MODEL_INPUT_SIZE;
use super::{ImageModel, InputLayout, InputTensor};
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;
use tract_onnx::prelude::*;

/// An optimized, runnable ONNX classification model.
pub struct TractModel {
    plan: TypedRunnableModel<TypedModel>,
    layout: InputLayout,
}

impl TractModel {
    /// Load and optimize a model whose single input is a batch of one
    /// `MODEL_INPUT_SIZE` square image in `layout`.
    pub fn load(path: &Path, layout: InputLayout) -> Result<Self> {
        let started = Instant::now();
        let shape = layout.shape(MODEL_INPUT_SIZE as usize);

        let plan = tract_onnx::onnx()
            .model_for_path(path)?
            .with_input_fact(0, f32::fact(shape).into())?
            .into_optimized()?
            .into_runnable()?;

        log::info!(
            "Loaded model {} with input {:?} in {:.1?}",
            path.display(),
            shape,
            started.elapsed()
        );
        Ok(Self { plan, layout })
    }
}

impl ImageModel for TractModel {
    fn input_layout(&self) -> InputLayout {
        self.layout
    }

    fn predict(&self, input: &InputTensor) -> Result<Vec<f32>> {
        let tensor = Tensor::from_shape(&input.shape(), &input.data)?;
        let outputs = self.plan.run(tvec!(tensor.into()))?;
        let scores = outputs
            .first()
            .context("Model produced no outputs")?
            .to_array_view::<f32>()?;
        Ok(scores.iter().copied().collect())
    }
}
