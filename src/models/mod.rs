// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model shared by the UI shell, the worker and the classifier.

pub mod classification;
pub mod image;
