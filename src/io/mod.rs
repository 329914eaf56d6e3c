// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations for images, label tables and configuration.

pub mod config;
pub mod labels;
pub mod media;
