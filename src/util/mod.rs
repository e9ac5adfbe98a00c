// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Shared helpers: geometry and timer coalescing.

pub mod debounce;
pub mod geometry;
