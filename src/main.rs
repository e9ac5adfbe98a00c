// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! MemeForge
//!
//! A cross-platform desktop meme editor: put captions on an image, drag them
//! into place, draw on top, apply a filter or two and export a PNG.

mod app;
mod config;
mod editor;
mod io;
mod models;
mod render;
mod ui;
mod util;

use anyhow::Result;
use app::MemeForgeApp;
use config::EditorConfig;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = EditorConfig::load();

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1100.0, 720.0])
            .with_min_inner_size([800.0, 600.0])
            .with_title("MemeForge"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "MemeForge",
        options,
        Box::new(move |cc| Ok(Box::new(MemeForgeApp::new(cc, config)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
