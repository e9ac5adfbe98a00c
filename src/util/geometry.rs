// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module converts pointer coordinates into surface coordinates and
//! keeps caption boxes inside the visible surface.

use crate::models::composition::Point;

/// Width and height in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True when both sides are strictly positive.
    pub fn is_positive(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Screen-space bounding box of a rendered element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Offset of a screen point from the top-left corner of the box.
    pub fn local(&self, client_x: f32, client_y: f32) -> Point {
        Point::new(client_x - self.left, client_y - self.top)
    }
}

/// Convert pointer client coordinates to surface backing coordinates.
///
/// The rendered box may differ from the backing store size (CSS-style scaling
/// or device pixel ratio), so the offset is scaled per axis. Returns `None`
/// while the surface has no area yet.
pub fn to_surface_coordinates(
    client_x: f32,
    client_y: f32,
    bounds: &Bounds,
    backing_width: f32,
    backing_height: f32,
) -> Option<Point> {
    if bounds.width <= 0.0 || bounds.height <= 0.0 {
        return None;
    }

    let scale_x = backing_width / bounds.width;
    let scale_y = backing_height / bounds.height;

    Some(Point::new(
        (client_x - bounds.left) * scale_x,
        (client_y - bounds.top) * scale_y,
    ))
}

/// Clamp the origin of a box so the box stays inside `surface`, keeping
/// `padding` clear on every edge.
///
/// A box larger than the available area is pinned to the leading edge.
pub fn clamp_box(origin: Point, size: Size, surface: Size, padding: f32) -> Point {
    let clamp_axis = |value: f32, extent: f32, limit: f32| {
        let lo = padding;
        let hi = (limit - extent - padding).max(lo);
        value.max(lo).min(hi)
    };

    Point::new(
        clamp_axis(origin.x, size.width, surface.width),
        clamp_axis(origin.y, size.height, surface.height),
    )
}

/// Clamp a bare point into `[0, width] x [0, height]`.
pub fn clamp_point(point: Point, surface: Size) -> Point {
    Point::new(
        point.x.max(0.0).min(surface.width.max(0.0)),
        point.y.max(0.0).min(surface.height.max(0.0)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unscaled_surface_returns_raw_offset() {
        let bounds = Bounds::new(100.0, 50.0, 450.0, 300.0);
        let p = to_surface_coordinates(130.0, 75.0, &bounds, 450.0, 300.0).unwrap();

        assert_eq!(p.x, 30.0);
        assert_eq!(p.y, 25.0);
    }

    #[test]
    fn test_double_backing_doubles_offset() {
        let bounds = Bounds::new(10.0, 20.0, 200.0, 100.0);
        let p = to_surface_coordinates(60.0, 45.0, &bounds, 400.0, 200.0).unwrap();

        assert_eq!(p.x, 100.0);
        assert_eq!(p.y, 50.0);
    }

    #[test]
    fn test_zero_bounds_is_noop() {
        let bounds = Bounds::new(0.0, 0.0, 0.0, 120.0);
        assert!(to_surface_coordinates(5.0, 5.0, &bounds, 100.0, 100.0).is_none());
    }

    #[test]
    fn test_clamp_box_keeps_box_inside() {
        let surface = Size::new(450.0, 450.0);
        let size = Size::new(120.0, 40.0);

        let far = clamp_box(Point::new(9000.0, 9000.0), size, surface, 5.0);
        assert_eq!(far.x, 450.0 - 120.0 - 5.0);
        assert_eq!(far.y, 450.0 - 40.0 - 5.0);

        let negative = clamp_box(Point::new(-300.0, -1.0), size, surface, 5.0);
        assert_eq!(negative.x, 5.0);
        assert_eq!(negative.y, 5.0);
    }

    #[test]
    fn test_clamp_box_oversized_pins_to_padding() {
        let p = clamp_box(
            Point::new(40.0, 10.0),
            Size::new(600.0, 20.0),
            Size::new(450.0, 450.0),
            5.0,
        );
        assert_eq!(p.x, 5.0);
        assert_eq!(p.y, 10.0);
    }

    #[test]
    fn test_clamp_point() {
        let p = clamp_point(Point::new(-4.0, 999.0), Size::new(100.0, 80.0));
        assert_eq!(p, Point::new(0.0, 80.0));
    }
}
