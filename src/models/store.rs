// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The composition store.
//!
//! `CompositionStore` owns the single authoritative `Composition` of an
//! editor session. Every mutation is synchronous and leaves the composition
//! valid; there is no rollback. Revision counters let the render surface
//! notice when the image or stroke list changed identity.

use super::composition::{
    truncate_label, CaptionSlot, Captions, Composition, EditMode, Filter, Filters, Point,
    Rotation, Stroke, TextAlign,
};
use crate::util::geometry::{clamp_point, Size};

#[derive(Debug, Default)]
pub struct CompositionStore {
    composition: Composition,
    /// Rendered surface size, once known.
    bounds: Option<Size>,
    image_revision: u64,
    strokes_revision: u64,
}

impl CompositionStore {
    pub fn composition(&self) -> &Composition {
        &self.composition
    }

    /// Swap in a whole composition (e.g. loaded from disk).
    pub fn replace(&mut self, composition: Composition) {
        self.composition = composition;
        self.image_revision += 1;
        self.strokes_revision += 1;
        self.reclamp_captions();
    }

    pub fn image_revision(&self) -> u64 {
        self.image_revision
    }

    pub fn strokes_revision(&self) -> u64 {
        self.strokes_revision
    }

    /// Label as shown in the UI.
    pub fn display_label(&self) -> String {
        truncate_label(&self.composition.image_label)
    }

    /// Replace the base image. Strokes are kept; caption positions go back to
    /// the unset sentinel so they are placed again for the new image.
    pub fn set_image(&mut self, data: Option<String>) {
        self.composition.base_image = data;
        for slot in CaptionSlot::ALL {
            self.composition.captions.get_mut(slot).position = Point::UNSET;
        }
        self.image_revision += 1;
        log::debug!("Base image replaced (revision {})", self.image_revision);
    }

    pub fn set_image_label(&mut self, name: &str) {
        self.composition.image_label = name.to_string();
    }

    pub fn set_caption_text(&mut self, slot: CaptionSlot, text: &str) {
        self.composition.captions.get_mut(slot).text = text.to_string();
    }

    pub fn set_caption_font(&mut self, slot: CaptionSlot, family: &str) {
        self.composition.captions.get_mut(slot).font_family = family.to_string();
    }

    /// Sizes are accepted as-is; a non-positive size simply renders nothing.
    pub fn set_caption_size(&mut self, slot: CaptionSlot, px: i32) {
        self.composition.captions.get_mut(slot).font_size = px;
    }

    pub fn set_caption_align(&mut self, slot: CaptionSlot, align: TextAlign) {
        self.composition.captions.get_mut(slot).text_align = align;
    }

    /// Commit a caption origin, clamped into the surface when its size is known.
    pub fn set_caption_position(&mut self, slot: CaptionSlot, x: f32, y: f32) {
        let mut position = Point::new(x, y);
        if let Some(bounds) = self.bounds {
            position = clamp_point(position, bounds);
        }
        self.composition.captions.get_mut(slot).position = position;
    }

    /// Flip one filter and return its new value.
    pub fn toggle_filter(&mut self, filter: Filter) -> bool {
        let filters = &mut self.composition.filters;
        let value = match filter {
            Filter::Grayscale => {
                filters.grayscale = !filters.grayscale;
                filters.grayscale
            }
            Filter::Blur => {
                filters.blur = !filters.blur;
                filters.blur
            }
        };
        log::debug!("Filter {:?} -> {}", filter, value);
        value
    }

    pub fn append_stroke(&mut self, stroke: Stroke) {
        self.composition.strokes.push(stroke);
        self.strokes_revision += 1;
        log::debug!("Stroke appended, total: {}", self.composition.strokes.len());
    }

    pub fn clear_strokes(&mut self) {
        if self.composition.strokes.is_empty() {
            return;
        }
        self.composition.strokes.clear();
        self.strokes_revision += 1;
        log::info!("Cleared drawing");
    }

    pub fn set_active_mode(&mut self, mode: EditMode) {
        self.composition.active_mode = mode;
    }

    /// Clear both captions and restore their default styling and position.
    pub fn reset_captions(&mut self) {
        self.composition.captions = Captions::default();
    }

    pub fn toggle_bold(&mut self) {
        self.composition.bold = !self.composition.bold;
    }

    pub fn toggle_shadow(&mut self) {
        self.composition.shadow = !self.composition.shadow;
    }

    pub fn toggle_responsive_font(&mut self) {
        self.composition.responsive_font = !self.composition.responsive_font;
    }

    pub fn set_brush_color(&mut self, color: &str) {
        self.composition.brush.color = color.to_string();
    }

    pub fn set_brush_size(&mut self, px: f32) {
        self.composition.brush.size = px;
    }

    pub fn rotate_clockwise(&mut self) {
        self.composition.rotation = self.composition.rotation.clockwise();
    }

    pub fn rotate_counter_clockwise(&mut self) {
        self.composition.rotation = self.composition.rotation.counter_clockwise();
    }

    pub fn reset_rotation(&mut self) {
        self.composition.rotation = Rotation::None;
    }

    /// Start over on the current image: no strokes, captions, filters or rotation.
    pub fn new_composition(&mut self) {
        self.reset_captions();
        self.composition.filters = Filters::default();
        self.composition.rotation = Rotation::None;
        self.composition.strokes.clear();
        self.strokes_revision += 1;
        log::info!("Started a new composition");
    }

    /// Record the rendered surface size and pull committed origins inside it.
    /// Box-aware clamping happens in the render surface.
    pub fn set_surface_bounds(&mut self, bounds: Size) {
        if !bounds.is_positive() || self.bounds == Some(bounds) {
            return;
        }
        self.bounds = Some(bounds);
        self.reclamp_captions();
    }

    fn reclamp_captions(&mut self) {
        let Some(bounds) = self.bounds else {
            return;
        };
        for slot in CaptionSlot::ALL {
            let caption = self.composition.captions.get_mut(slot);
            caption.position = clamp_point(caption.position, bounds);
        }
    }
}
