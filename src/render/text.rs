// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Caption rasterization with `ab_glyph`.

use super::bitmap::blend_over;
use super::fonts::FontLibrary;
use crate::editor::autofit::TextMeasure;
use crate::util::geometry::Size;
use ab_glyph::{point, Font, FontArc, GlyphId, ScaleFont};
use image::{Rgba, RgbaImage};

/// Outline offset, in font pixels at 1x, used for the caption shadow.
pub const SHADOW_OFFSET: f32 = 2.0;

const SHADOW_DIRECTIONS: [(f32, f32); 8] = [
    (-1.0, -1.0),
    (0.0, -1.0),
    (1.0, -1.0),
    (-1.0, 0.0),
    (1.0, 0.0),
    (-1.0, 1.0),
    (0.0, 1.0),
    (1.0, 1.0),
];

/// Single-channel coverage of one line of text, origin at the top-left.
pub struct Coverage {
    pub width: u32,
    pub height: u32,
    pub alpha: Vec<f32>,
}

/// Advance width and line height of `text`.
pub fn line_extent(font: &FontArc, text: &str, font_size: f32, bold: bool) -> Size {
    if font_size <= 0.0 {
        return Size::default();
    }
    let scaled = font.as_scaled(font_size);
    let mut width = 0.0;
    let mut prev: Option<GlyphId> = None;
    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(p) = prev {
            width += scaled.kern(p, id);
        }
        width += scaled.h_advance(id);
        prev = Some(id);
    }
    if bold && width > 0.0 {
        width += 1.0;
    }
    Size::new(width, scaled.height())
}

/// Rasterize one line of text into a coverage mask.
pub fn rasterize_line(font: &FontArc, text: &str, font_size: f32, bold: bool) -> Coverage {
    let extent = line_extent(font, text, font_size, bold);
    let width = extent.width.ceil().max(0.0) as u32 + 1;
    let height = extent.height.ceil().max(0.0) as u32 + 1;
    let mut alpha = vec![0.0f32; width as usize * height as usize];
    if font_size <= 0.0 {
        return Coverage { width, height, alpha };
    }

    let scaled = font.as_scaled(font_size);
    let ascent = scaled.ascent();
    let mut caret = 0.0;
    let mut prev: Option<GlyphId> = None;

    for ch in text.chars() {
        let id = font.glyph_id(ch);
        if let Some(p) = prev {
            caret += scaled.kern(p, id);
        }
        let glyph = id.with_scale_and_position(font_size, point(caret, ascent));
        caret += scaled.h_advance(id);
        prev = Some(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, cov| {
            let x = bounds.min.x as i64 + gx as i64;
            let y = bounds.min.y as i64 + gy as i64;
            let mut plot = |x: i64| {
                if x >= 0 && y >= 0 && (x as u32) < width && (y as u32) < height {
                    let idx = y as usize * width as usize + x as usize;
                    alpha[idx] = alpha[idx].max(cov);
                }
            };
            plot(x);
            if bold {
                plot(x + 1);
            }
        });
    }

    Coverage { width, height, alpha }
}

/// Composite `coverage` in `color` at (`left`, `top`) onto `canvas`.
pub fn composite(canvas: &mut RgbaImage, coverage: &Coverage, left: f32, top: f32, color: Rgba<u8>) {
    let (cw, ch) = (canvas.width() as i64, canvas.height() as i64);
    let (ox, oy) = (left.round() as i64, top.round() as i64);

    for y in 0..coverage.height as i64 {
        for x in 0..coverage.width as i64 {
            let a = coverage.alpha[(y * coverage.width as i64 + x) as usize];
            if a <= 0.001 {
                continue;
            }
            let (px, py) = (ox + x, oy + y);
            if px < 0 || py < 0 || px >= cw || py >= ch {
                continue;
            }
            let src = Rgba([color[0], color[1], color[2], (color[3] as f32 * a.min(1.0)).round() as u8]);
            let dst = canvas.get_pixel_mut(px as u32, py as u32);
            *dst = blend_over(*dst, src);
        }
    }
}

/// How a caption line is rasterized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptionStyle {
    /// Font size in device pixels.
    pub font_size: f32,
    pub bold: bool,
    pub shadow: bool,
    /// Device pixel ratio applied to the outline offset.
    pub scale: f32,
}

/// Draw a caption line in white, with a black outline when `shadow` is set.
pub fn draw_caption(canvas: &mut RgbaImage, font: &FontArc, text: &str, left: f32, top: f32, style: &CaptionStyle) {
    if text.is_empty() || style.font_size <= 0.0 {
        return;
    }
    let coverage = rasterize_line(font, text, style.font_size, style.bold);

    if style.shadow {
        let d = SHADOW_OFFSET * style.scale;
        for (dx, dy) in SHADOW_DIRECTIONS {
            composite(canvas, &coverage, left + dx * d, top + dy * d, Rgba([0, 0, 0, 255]));
        }
    }
    composite(canvas, &coverage, left, top, Rgba([255, 255, 255, 255]));
}

/// Text metrics backed by the export fonts.
pub struct GlyphMeasure<'a> {
    pub fonts: &'a FontLibrary,
}

impl TextMeasure for GlyphMeasure<'_> {
    fn measure(&self, text: &str, font_size: f32, family: &str, bold: bool) -> Size {
        match self.fonts.font_for(family) {
            Some(font) => line_extent(font, text, font_size, bold),
            None => Size::default(),
        }
    }
}
