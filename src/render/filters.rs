// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Base image preparation: rotation and visual filters.

use crate::models::composition::{Filters, Rotation};
use image::DynamicImage;

/// Rotate the decoded image by quarter turns.
pub fn rotate(image: &DynamicImage, rotation: Rotation) -> DynamicImage {
    match rotation {
        Rotation::None => image.clone(),
        Rotation::Quarter => image.rotate90(),
        Rotation::Half => image.rotate180(),
        Rotation::ThreeQuarter => image.rotate270(),
    }
}

/// Apply the enabled filters: grayscale first, then blur.
pub fn apply_filters(image: DynamicImage, filters: Filters, blur_sigma: f32) -> DynamicImage {
    if filters.is_identity() {
        return image;
    }
    let mut out = image;
    if filters.grayscale {
        out = DynamicImage::ImageRgba8(out.grayscale().to_rgba8());
    }
    if filters.blur && blur_sigma > 0.0 {
        out = out.blur(blur_sigma);
    }
    out
}

/// Rotation followed by filters, producing what the surface displays.
pub fn prepare(
    image: &DynamicImage,
    rotation: Rotation,
    filters: Filters,
    blur_sigma: f32,
) -> DynamicImage {
    apply_filters(rotate(image, rotation), filters, blur_sigma)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    fn sample() -> DynamicImage {
        let mut img = RgbaImage::from_pixel(4, 2, Rgba([200, 40, 10, 255]));
        img.put_pixel(0, 0, Rgba([0, 255, 0, 255]));
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_quarter_rotation_swaps_dimensions() {
        let rotated = rotate(&sample(), Rotation::Quarter);
        assert_eq!(rotated.dimensions(), (2, 4));
        assert_eq!(rotate(&sample(), Rotation::Half).dimensions(), (4, 2));
        assert_eq!(rotate(&sample(), Rotation::ThreeQuarter).dimensions(), (2, 4));
    }

    #[test]
    fn test_grayscale_equalises_channels() {
        let filters = Filters {
            grayscale: true,
            blur: false,
        };
        let out = apply_filters(sample(), filters, 3.0).to_rgba8();
        for px in out.pixels() {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
            assert_eq!(px[3], 255);
        }
    }

    #[test]
    fn test_identity_filters_leave_pixels() {
        let original = sample().to_rgba8();
        let out = apply_filters(sample(), Filters::default(), 3.0).to_rgba8();
        assert_eq!(original, out);
    }
}
