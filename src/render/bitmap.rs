// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The drawing overlay bitmap.
//!
//! Ink is painted in immediate mode onto an RGBA raster the size of the
//! displayed image in device pixels. The raster is a cache: it can always be
//! rebuilt from the stroke list.

use crate::models::composition::Point;
use image::{Rgba, RgbaImage};

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

pub struct DrawingBitmap {
    pixels: RgbaImage,
    /// Bumped on every change so the UI knows when to re-upload.
    generation: u64,
}

impl Default for DrawingBitmap {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

impl DrawingBitmap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            generation: 0,
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Reallocate the backing store. Previous content is discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.pixels = RgbaImage::new(width, height);
        self.generation += 1;
    }

    pub fn clear(&mut self) {
        for px in self.pixels.pixels_mut() {
            *px = TRANSPARENT;
        }
        self.generation += 1;
    }

    /// A zero-length segment: a round dot of diameter `width`.
    pub fn dot(&mut self, at: Point, color: Rgba<u8>, width: f32) {
        self.segment(at, at, color, width);
    }

    /// Paint one segment with round caps.
    pub fn segment(&mut self, from: Point, to: Point, color: Rgba<u8>, width: f32) {
        self.paint_capsule(from, to, color, width, None);
        self.generation += 1;
    }

    /// Paint a polyline with round caps and joins. Each pixel is blended at
    /// most once, so translucent ink does not darken at the joints.
    pub fn polyline(&mut self, points: &[Point], color: Rgba<u8>, width: f32) {
        if points.len() < 2 {
            return;
        }
        let mut covered = vec![false; self.pixels.width() as usize * self.pixels.height() as usize];
        for pair in points.windows(2) {
            self.paint_capsule(pair[0], pair[1], color, width, Some(&mut covered));
        }
        self.generation += 1;
    }

    fn paint_capsule(
        &mut self,
        a: Point,
        b: Point,
        color: Rgba<u8>,
        width: f32,
        mut covered: Option<&mut Vec<bool>>,
    ) {
        let (w, h) = (self.pixels.width() as i64, self.pixels.height() as i64);
        if w == 0 || h == 0 || !(width > 0.0) {
            return;
        }
        if ![a.x, a.y, b.x, b.y].iter().all(|v| v.is_finite()) {
            return;
        }

        let radius = (width / 2.0).max(0.5);
        let x0 = ((a.x.min(b.x) - radius).floor() as i64).max(0);
        let y0 = ((a.y.min(b.y) - radius).floor() as i64).max(0);
        let x1 = ((a.x.max(b.x) + radius).ceil() as i64).min(w - 1);
        let y1 = ((a.y.max(b.y) + radius).ceil() as i64).min(h - 1);
        if x1 < x0 || y1 < y0 {
            return;
        }

        let r2 = radius * radius;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let center = Point::new(x as f32 + 0.5, y as f32 + 0.5);
                if distance_sq_to_segment(center, a, b) > r2 {
                    continue;
                }
                if let Some(mask) = covered.as_deref_mut() {
                    let idx = (y * w + x) as usize;
                    if mask[idx] {
                        continue;
                    }
                    mask[idx] = true;
                }
                let dst = self.pixels.get_pixel_mut(x as u32, y as u32);
                *dst = blend_over(*dst, color);
            }
        }
    }
}

fn distance_sq_to_segment(p: Point, a: Point, b: Point) -> f32 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let (apx, apy) = (p.x - a.x, p.y - a.y);
    let len_sq = abx * abx + aby * aby;
    let t = if len_sq > 0.0 {
        ((apx * abx + apy * aby) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (dx, dy) = (apx - abx * t, apy - aby * t);
    dx * dx + dy * dy
}

/// Source-over compositing on straight (non-premultiplied) alpha.
pub fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    if sa >= 1.0 {
        return src;
    }
    if sa <= 0.0 {
        return dst;
    }
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    let channel = |i: usize| {
        let c = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };
    Rgba([
        channel(0),
        channel(1),
        channel(2),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    fn painted(bitmap: &DrawingBitmap) -> usize {
        bitmap.image().pixels().filter(|p| p[3] > 0).count()
    }

    #[test]
    fn test_dot_paints_round_blob() {
        let mut bitmap = DrawingBitmap::new(20, 20);
        bitmap.dot(Point::new(10.0, 10.0), RED, 6.0);

        assert_eq!(*bitmap.image().get_pixel(10, 10), RED);
        assert_eq!(bitmap.image().get_pixel(0, 0)[3], 0);
        // Roughly pi * 3^2 pixels.
        let n = painted(&bitmap);
        assert!(n > 20 && n < 40, "painted {}", n);
    }

    #[test]
    fn test_segment_clipped_to_bounds() {
        let mut bitmap = DrawingBitmap::new(10, 10);
        bitmap.segment(Point::new(-50.0, 5.0), Point::new(50.0, 5.0), RED, 2.0);
        assert_eq!(*bitmap.image().get_pixel(0, 5), RED);
        assert_eq!(*bitmap.image().get_pixel(9, 5), RED);
        assert_eq!(bitmap.image().get_pixel(5, 0)[3], 0);
    }

    #[test]
    fn test_zero_width_paints_nothing() {
        let mut bitmap = DrawingBitmap::new(10, 10);
        bitmap.segment(Point::new(1.0, 1.0), Point::new(8.0, 8.0), RED, 0.0);
        bitmap.segment(Point::new(1.0, 1.0), Point::new(8.0, 8.0), RED, -3.0);
        bitmap.segment(Point::new(f32::NAN, 1.0), Point::new(8.0, 8.0), RED, 3.0);
        assert_eq!(painted(&bitmap), 0);
    }

    #[test]
    fn test_polyline_blends_translucent_once() {
        let ink = Rgba([0, 0, 255, 128]);
        let mut bitmap = DrawingBitmap::new(30, 30);
        let path = [Point::new(5.0, 15.0), Point::new(15.0, 15.0), Point::new(25.0, 15.0)];
        bitmap.polyline(&path, ink, 4.0);

        // The joint pixel has the same alpha as the middle of a segment.
        let joint = bitmap.image().get_pixel(15, 15);
        let middle = bitmap.image().get_pixel(10, 15);
        assert_eq!(joint, middle);
        assert_eq!(joint[3], 128);
    }

    #[test]
    fn test_resize_and_clear() {
        let mut bitmap = DrawingBitmap::new(4, 4);
        bitmap.dot(Point::new(2.0, 2.0), RED, 4.0);
        let g = bitmap.generation();

        bitmap.clear();
        assert_eq!(painted(&bitmap), 0);
        assert!(bitmap.generation() > g);

        bitmap.resize(8, 3);
        assert_eq!((bitmap.width(), bitmap.height()), (8, 3));
    }

    #[test]
    fn test_blend_over() {
        let white = Rgba([255, 255, 255, 255]);
        let half_black = Rgba([0, 0, 0, 128]);
        let out = blend_over(white, half_black);
        assert_eq!(out[3], 255);
        assert!(out[0] > 120 && out[0] < 135);
        assert_eq!(blend_over(white, Rgba([9, 9, 9, 0])), white);
    }
}
