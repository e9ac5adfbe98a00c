// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data models for the editor.

pub mod composition;
pub mod store;
pub mod template;
