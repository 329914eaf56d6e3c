// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Application configuration.
//!
//! Settings are read from an optional YAML file. Every key has a default,
//! so the file only needs the values that differ.

use crate::classifier::InputLayout;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "classifier.yaml";

/// Upper bound for `top_k`.
pub const MAX_TOP_K: usize = 10;

/// Startup settings for the classifier application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// ONNX model file.
    pub model_path: PathBuf,
    /// Keras-style `imagenet_class_index.json`.
    pub labels_path: PathBuf,
    /// Tensor layout the model expects.
    pub input_layout: InputLayout,
    /// Set when the model emits logits instead of probabilities.
    pub apply_softmax: bool,
    /// Number of predictions shown (the first one is the headline result).
    pub top_k: usize,
    pub window_title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("models/resnet50.onnx"),
            labels_path: PathBuf::from("models/imagenet_class_index.json"),
            input_layout: InputLayout::Nhwc,
            apply_softmax: false,
            top_k: 1,
            window_title: "Image Classifier Using ResNet50".to_string(),
        }
    }
}

impl AppConfig {
    /// Parse YAML, resolving relative paths against `base_dir`.
    pub fn from_yaml(yaml: &str, base_dir: &Path) -> Result<Self> {
        let mut config: AppConfig = serde_yaml::from_str(yaml)?;
        config.model_path = resolve(base_dir, &config.model_path);
        config.labels_path = resolve(base_dir, &config.labels_path);
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        Self::from_yaml(&yaml, base_dir)
            .with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let config = Self::load(path)?;
            log::info!("Loaded configuration from {}", path.display());
            Ok(config)
        } else {
            log::info!("No {} found, using default configuration", path.display());
            Ok(Self::default())
        }
    }

    /// Reject values the application cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 || self.top_k > MAX_TOP_K {
            bail!("top_k must be between 1 and {}, got {}", MAX_TOP_K, self.top_k);
        }
        if self.window_title.trim().is_empty() {
            bail!("window_title must not be empty");
        }
        Ok(())
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
