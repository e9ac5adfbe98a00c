// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Meme canvas.
//!
//! Shows the prepared base image, the ink overlay and the captions, and
//! forwards pointer input to the render surface: strokes in draw mode,
//! caption drags in text mode.

use crate::editor::autofit::TextMeasure;
use crate::editor::surface::{CaptionView, RenderSurface, SurfaceLayout};
use crate::models::composition::{EditMode, Point};
use crate::models::store::CompositionStore;
use crate::render::fonts::FontLibrary;
use crate::render::text::SHADOW_OFFSET;
use crate::util::geometry::{Bounds, Size};
use egui::{Align2, Color32, FontId, Pos2, Rect, Sense, TextureHandle, TextureOptions};
use std::time::Instant;

/// Result of canvas interaction.
pub enum CanvasAction {
    None,
    /// The empty-state upload button was pressed.
    RequestImage,
}

/// Text metrics from egui's font system, matching what the canvas paints.
pub struct EguiMeasure<'a> {
    pub ctx: &'a egui::Context,
    pub fonts: &'a FontLibrary,
}

impl TextMeasure for EguiMeasure<'_> {
    fn measure(&self, text: &str, font_size: f32, family: &str, bold: bool) -> Size {
        if font_size <= 0.0 {
            return Size::default();
        }
        let font = FontId::new(font_size, self.fonts.egui_family(family));
        let galley = self
            .ctx
            .fonts(|f| f.layout_no_wrap(text.to_owned(), font, Color32::WHITE));
        let mut size = galley.size();
        if bold && size.x > 0.0 {
            size.x += 1.0;
        }
        Size::new(size.x, size.y)
    }
}

/// Inputs the canvas reads but does not own.
pub struct CanvasView<'a> {
    /// Prepared (rotated, filtered) base image.
    pub base: Option<&'a TextureHandle>,
    pub fonts: &'a FontLibrary,
    pub max_width: f32,
    pub loading: bool,
}

/// Textures kept between frames.
#[derive(Default)]
pub struct CanvasState {
    overlay: Option<TextureHandle>,
    overlay_generation: Option<u64>,
}

impl CanvasState {
    fn sync_overlay(&mut self, ctx: &egui::Context, surface: &RenderSurface) {
        let bitmap = surface.bitmap();
        if bitmap.width() == 0 || bitmap.height() == 0 {
            self.overlay = None;
            self.overlay_generation = None;
            return;
        }
        if self.overlay_generation == Some(bitmap.generation()) {
            return;
        }

        let image = egui::ColorImage::from_rgba_unmultiplied(
            [bitmap.width() as usize, bitmap.height() as usize],
            bitmap.image().as_raw(),
        );
        match &mut self.overlay {
            Some(handle) => handle.set(image, TextureOptions::LINEAR),
            None => self.overlay = Some(ctx.load_texture("ink-overlay", image, TextureOptions::LINEAR)),
        }
        self.overlay_generation = Some(bitmap.generation());
    }
}

/// Display the canvas and handle pointer interaction.
pub fn show(
    ui: &mut egui::Ui,
    store: &mut CompositionStore,
    surface: &mut RenderSurface,
    state: &mut CanvasState,
    view: CanvasView<'_>,
) -> CanvasAction {
    let mut action = CanvasAction::None;
    ui.style_mut().visuals.extreme_bg_color = Color32::from_gray(40);
    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let Some(texture) = view.base else {
            if empty_state(ui, view.loading) {
                action = CanvasAction::RequestImage;
            }
            return;
        };

        let rect = fit_rect(ui.min_rect(), ui.available_size(), texture.size_vec2(), view.max_width);
        let layout = SurfaceLayout {
            size: Size::new(rect.width(), rect.height()),
            pixels_per_point: ui.ctx().pixels_per_point(),
        };
        let bounds = Bounds::new(rect.min.x, rect.min.y, rect.width(), rect.height());
        let ctx = ui.ctx().clone();
        let measure = EguiMeasure {
            ctx: &ctx,
            fonts: view.fonts,
        };
        let now = Instant::now();

        surface.sync_store(store);
        surface.sync_layout(layout, store, &measure, now);

        match store.composition().active_mode {
            EditMode::Draw => handle_draw(ui, rect, bounds, store, surface),
            EditMode::Text => handle_captions(ui, rect, bounds, store, surface, &measure, now),
            EditMode::Effects | EditMode::Upload => {
                ui.allocate_rect(rect, Sense::hover());
            }
        }

        state.sync_overlay(&ctx, surface);

        let painter = ui.painter_at(rect);
        let full_uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        painter.image(texture.id(), rect, full_uv, Color32::WHITE);
        if let Some(overlay) = &state.overlay {
            painter.image(overlay.id(), rect, full_uv, Color32::WHITE);
        }

        let show_boxes = store.composition().active_mode == EditMode::Text;
        for caption in surface.caption_views(store, &measure) {
            paint_caption(&painter, rect.min, &caption, view.fonts, show_boxes);
        }
    });

    ui.separator();
    ui.horizontal(|ui| {
        let composition = store.composition();
        ui.label(format!("Mode: {}", composition.active_mode.label()));
        ui.separator();
        if composition.base_image.is_some() {
            ui.label(store.display_label());
            ui.separator();
            ui.label(format!("{} strokes", composition.strokes.len()));
        } else {
            ui.label("No image loaded");
        }
    });

    action
}

/// Fit the image into the available area, never wider than `max_width`,
/// centred horizontally.
fn fit_rect(origin: Rect, available: egui::Vec2, image: egui::Vec2, max_width: f32) -> Rect {
    if image.x <= 0.0 || image.y <= 0.0 {
        return Rect::from_min_size(origin.min, egui::Vec2::ZERO);
    }
    let aspect = image.y / image.x;
    let mut width = available.x.min(max_width).max(1.0);
    let mut height = width * aspect;
    if height > available.y && available.y > 0.0 {
        height = available.y;
        width = height / aspect;
    }
    let x_offset = ((available.x - width) / 2.0).max(0.0);
    Rect::from_min_size(origin.min + egui::vec2(x_offset, 0.0), egui::vec2(width, height))
}

fn to_point(pos: Pos2) -> Point {
    Point::new(pos.x, pos.y)
}

fn handle_draw(
    ui: &mut egui::Ui,
    rect: Rect,
    bounds: Bounds,
    store: &mut CompositionStore,
    surface: &mut RenderSurface,
) {
    let response = ui.allocate_rect(rect, Sense::click_and_drag());
    if response.hovered() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Crosshair);
    }

    if response.drag_started() {
        let origin = ui.input(|i| i.pointer.press_origin());
        if let Some(pos) = origin.or(response.interact_pointer_pos()) {
            surface.stroke_begin(store, to_point(pos), &bounds);
        }
    }
    if response.dragged() {
        if let Some(pos) = response.interact_pointer_pos() {
            surface.stroke_extend(store, to_point(pos), &bounds);
        }
    }
    if response.drag_stopped() {
        surface.stroke_end(store);
    }

    // A click without movement stores a one-point stroke. Its dot shows until
    // the next redraw, which skips strokes shorter than two points.
    if response.clicked() && !surface.is_recording() {
        if let Some(pos) = response.interact_pointer_pos() {
            if surface.stroke_begin(store, to_point(pos), &bounds) {
                surface.stroke_end(store);
            }
        }
    }
}

fn handle_captions(
    ui: &mut egui::Ui,
    rect: Rect,
    bounds: Bounds,
    store: &mut CompositionStore,
    surface: &mut RenderSurface,
    measure: &dyn TextMeasure,
    now: Instant,
) {
    ui.allocate_rect(rect, Sense::hover());

    for caption in surface.caption_views(store, measure) {
        let box_rect = Rect::from_min_size(
            rect.min + egui::vec2(caption.position.x, caption.position.y),
            egui::vec2(caption.box_size.width, caption.box_size.height),
        );
        let id = ui.id().with(("caption", caption.slot.index()));
        let response = ui.interact(box_rect, id, Sense::drag());

        if response.hovered() && !caption.dragging {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
        }
        if response.drag_started() {
            let origin = ui.input(|i| i.pointer.press_origin());
            if let Some(pos) = origin.or(response.interact_pointer_pos()) {
                surface.caption_grab(store, caption.slot, to_point(pos), &bounds);
            }
        }
    }

    if surface.dragging_caption().is_some() {
        ui.ctx().set_cursor_icon(egui::CursorIcon::Grabbing);
        if let Some(pos) = ui.input(|i| i.pointer.interact_pos()) {
            surface.caption_move(store, to_point(pos), &bounds, measure, now);
        }
        if ui.input(|i| i.pointer.primary_released() || !i.pointer.primary_down()) {
            surface.caption_release(store);
        }
    }
}

fn paint_caption(
    painter: &egui::Painter,
    origin: Pos2,
    caption: &CaptionView,
    fonts: &FontLibrary,
    show_box: bool,
) {
    let text_origin = caption.text_origin();
    let pos = origin + egui::vec2(text_origin.x, text_origin.y);
    let font = FontId::new(caption.font_size, fonts.egui_family(&caption.font_family));

    if caption.shadow {
        for dx in [-1.0f32, 0.0, 1.0] {
            for dy in [-1.0f32, 0.0, 1.0] {
                if dx == 0.0 && dy == 0.0 {
                    continue;
                }
                let offset = egui::vec2(dx, dy) * SHADOW_OFFSET;
                painter.text(pos + offset, Align2::LEFT_TOP, &caption.text, font.clone(), Color32::BLACK);
            }
        }
    }
    painter.text(pos, Align2::LEFT_TOP, &caption.text, font.clone(), Color32::WHITE);
    if caption.bold {
        painter.text(pos + egui::vec2(1.0, 0.0), Align2::LEFT_TOP, &caption.text, font, Color32::WHITE);
    }

    if show_box {
        let box_rect = Rect::from_min_size(
            origin + egui::vec2(caption.position.x, caption.position.y),
            egui::vec2(caption.box_size.width, caption.box_size.height),
        );
        let alpha = if caption.dragging { 200 } else { 90 };
        painter.rect_stroke(box_rect, 2.0, egui::Stroke::new(1.0, Color32::from_white_alpha(alpha)));
    }
}

/// Placeholder shown before any image is loaded. Returns true when the
/// upload button was pressed.
fn empty_state(ui: &mut egui::Ui, loading: bool) -> bool {
    let mut clicked = false;
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("MemeForge")
                    .size(32.0)
                    .color(Color32::from_gray(200)),
            );
            ui.add_space(20.0);
            if loading {
                ui.spinner();
                ui.label(egui::RichText::new("Loading image...").color(Color32::WHITE));
            } else {
                ui.label(
                    egui::RichText::new("Upload an image to create your meme")
                        .color(Color32::from_gray(180)),
                );
                ui.add_space(10.0);
                clicked = ui.button("Upload image").clicked();
            }
        });
    });
    clicked
}
