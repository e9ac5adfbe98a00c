// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! PNG export of the finished meme.
//!
//! The scene is flattened at device-pixel resolution: the prepared base image
//! scaled to the surface, the ink bitmap on top, then the captions.

use crate::editor::surface::{CaptionView, SurfaceLayout};
use crate::render::bitmap::DrawingBitmap;
use crate::render::fonts::FontLibrary;
use crate::render::text::{draw_caption, CaptionStyle};
use anyhow::{Context, Result};
use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::path::Path;

/// Compose the visible scene into one raster.
pub fn flatten(
    base: &DynamicImage,
    ink: &DrawingBitmap,
    layout: SurfaceLayout,
    captions: &[CaptionView],
    fonts: &FontLibrary,
) -> RgbaImage {
    let (width, height) = layout.backing_size();
    let mut canvas = if (base.width(), base.height()) == (width, height) {
        base.to_rgba8()
    } else {
        imageops::resize(&base.to_rgba8(), width, height, FilterType::Triangle)
    };

    if (ink.width(), ink.height()) == (width, height) {
        imageops::overlay(&mut canvas, ink.image(), 0, 0);
    } else if ink.width() > 0 && ink.height() > 0 {
        let scaled = imageops::resize(ink.image(), width, height, FilterType::Triangle);
        imageops::overlay(&mut canvas, &scaled, 0, 0);
    }

    let ppp = layout.pixels_per_point;
    for caption in captions {
        let Some(font) = fonts.font_for(&caption.font_family) else {
            log::warn!("No font available for '{}', caption skipped", caption.font_family);
            continue;
        };
        let origin = caption.text_origin();
        let style = CaptionStyle {
            font_size: caption.font_size * ppp,
            bold: caption.bold,
            shadow: caption.shadow,
            scale: ppp,
        };
        draw_caption(&mut canvas, font, &caption.text, origin.x * ppp, origin.y * ppp, &style);
    }
    canvas
}

pub fn write_png(image: &RgbaImage, path: &Path) -> Result<()> {
    image
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("Exported {}x{} meme to {}", image.width(), image.height(), path.display());
    Ok(())
}
