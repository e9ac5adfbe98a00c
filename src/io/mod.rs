// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! I/O operations: image ingestion, composition files and PNG export.

pub mod export;
pub mod media;
pub mod serialization;
