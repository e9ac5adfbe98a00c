// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editing behaviour that sits between the store and the screen.

pub mod autofit;
pub mod captions;
pub mod strokes;
pub mod surface;
