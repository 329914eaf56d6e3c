// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! ImageNet label table loading.
//!
//! The table uses the Keras class index format: a JSON object mapping each
//! class index (as a string) to a `[wnid, label]` pair.

use anyhow::{bail, Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Label for one output class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassLabel {
    pub wnid: String,
    pub name: String,
}

/// Class labels indexed by model output position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    entries: Vec<ClassLabel>,
}

impl LabelTable {
    /// Parse a class index document.
    ///
    /// Keys must be decimal indices covering `0..n` with no gaps.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, (String, String)> =
            serde_json::from_str(json).context("Invalid class index JSON")?;

        let mut by_index = BTreeMap::new();
        for (key, (wnid, name)) in raw {
            let index: usize = key
                .trim()
                .parse()
                .with_context(|| format!("Class index key {:?} is not a number", key))?;
            if by_index.insert(index, ClassLabel { wnid, name }).is_some() {
                bail!("Class index {} appears more than once", index);
            }
        }

        if by_index.is_empty() {
            bail!("Class index is empty");
        }

        let mut entries = Vec::with_capacity(by_index.len());
        for (expected, (index, label)) in by_index.into_iter().enumerate() {
            if index != expected {
                bail!("Class index is missing entry {}", expected);
            }
            entries.push(label);
        }

        Ok(Self { entries })
    }

    /// Load a class index file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read label table {}", path.display()))?;
        let table = Self::from_json(&json)
            .with_context(|| format!("Failed to parse label table {}", path.display()))?;
        log::info!("Loaded {} class labels from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, class_id: usize) -> Option<&ClassLabel> {
        self.entries.get(class_id)
    }
}
