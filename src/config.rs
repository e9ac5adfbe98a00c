// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Editor configuration.
//!
//! Settings are read from a YAML file named by `MEMEFORGE_CONFIG`, or from
//! `memeforge.yaml` in the working directory. Every field has a default, so a
//! partial file (or none at all) is fine.

use crate::editor::autofit::AutoFit;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "MEMEFORGE_CONFIG";

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "memeforge.yaml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// The surface never renders wider than this (logical pixels).
    pub max_surface_width: f32,
    pub default_image: Option<String>,
    pub default_image_label: String,
    pub drag_commit_interval_ms: u64,
    pub layout_settle_delay_ms: u64,
    pub caption_edge_padding: f32,
    pub auto_fit: AutoFit,
    pub blur_sigma: f32,
    pub font_dirs: Vec<PathBuf>,
    pub export_file_name: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_surface_width: 450.0,
            default_image: Some("https://i.imgflip.com/24y43o.jpg".to_string()),
            default_image_label: "Change My Mind".to_string(),
            drag_commit_interval_ms: 50,
            layout_settle_delay_ms: 100,
            caption_edge_padding: 5.0,
            auto_fit: AutoFit::default(),
            blur_sigma: 3.0,
            font_dirs: default_font_dirs(),
            export_file_name: "my-meme.png".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn drag_commit_interval(&self) -> Duration {
        Duration::from_millis(self.drag_commit_interval_ms)
    }

    pub fn layout_settle_delay(&self) -> Duration {
        Duration::from_millis(self.layout_settle_delay_ms)
    }

    /// Parse a config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = serde_yaml::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Load from the usual locations, falling back to defaults on any problem.
    pub fn load() -> Self {
        let path = match std::env::var_os(CONFIG_ENV) {
            Some(p) => PathBuf::from(p),
            None => PathBuf::from(CONFIG_FILE),
        };
        if !path.exists() {
            log::debug!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::from_file(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("{:#}; using defaults", e);
                Self::default()
            }
        }
    }
}

fn default_font_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if cfg!(target_os = "windows") {
        dirs.push(PathBuf::from(r"C:\Windows\Fonts"));
    } else if cfg!(target_os = "macos") {
        dirs.push(PathBuf::from("/Library/Fonts"));
        dirs.push(PathBuf::from("/System/Library/Fonts"));
    } else {
        dirs.push(PathBuf::from("/usr/share/fonts"));
        dirs.push(PathBuf::from("/usr/local/share/fonts"));
    }
    if let Some(home) = std::env::var_os("HOME") {
        dirs.push(PathBuf::from(home).join(".fonts"));
    }
    dirs
}
