// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Raster work: the ink bitmap, filters, fonts and caption text.

pub mod bitmap;
pub mod color;
pub mod filters;
pub mod fonts;
pub mod text;
