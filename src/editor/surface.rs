// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Render surface binding.
//!
//! `RenderSurface` ties the composition store to what is on screen: it keeps
//! the ink bitmap sized to the displayed image, replays strokes when the
//! bitmap or the stroke list changes, routes pointer input to the stroke
//! recorder and the caption controller, and runs caption auto-placement once
//! the layout is known. It holds no egui types so the host can be swapped.

use super::autofit::{AutoFit, TextMeasure};
use super::captions::{PlacementPass, TextLayerController, CAPTION_PADDING};
use super::strokes::{redraw_all, StrokeOutcome, StrokeRecorder};
use crate::config::EditorConfig;
use crate::models::composition::{CaptionSlot, Point, TextAlign};
use crate::models::store::CompositionStore;
use crate::render::bitmap::DrawingBitmap;
use crate::util::geometry::{to_surface_coordinates, Bounds, Size};
use std::time::{Duration, Instant};

/// Displayed size of the surface and the device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceLayout {
    pub size: Size,
    pub pixels_per_point: f32,
}

impl SurfaceLayout {
    /// Size of the ink bitmap in device pixels.
    pub fn backing_size(&self) -> (u32, u32) {
        let px = |v: f32| (v * self.pixels_per_point).round().max(0.0) as u32;
        (px(self.size.width), px(self.size.height))
    }
}

/// Everything needed to draw one caption.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionView {
    pub slot: CaptionSlot,
    /// Upper-cased text.
    pub text: String,
    /// Origin of the caption box in surface coordinates.
    pub position: Point,
    pub box_size: Size,
    /// Font size after auto-fit.
    pub font_size: f32,
    pub font_family: String,
    pub text_align: TextAlign,
    pub bold: bool,
    pub shadow: bool,
    pub dragging: bool,
}

impl CaptionView {
    /// Top-left corner of the text inside the box.
    pub fn text_origin(&self) -> Point {
        Point::new(self.position.x + CAPTION_PADDING, self.position.y + CAPTION_PADDING)
    }
}

pub struct RenderSurface {
    bitmap: DrawingBitmap,
    recorder: StrokeRecorder,
    captions: TextLayerController,
    auto_fit: AutoFit,
    layout: Option<SurfaceLayout>,
    seen_image: u64,
    seen_strokes: u64,
    /// An image finished loading and placement waits for its first layout.
    awaiting_layout: bool,
    settle_at: Option<Instant>,
    settle_delay: Duration,
    last_boxes: [Size; 2],
}

impl RenderSurface {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            bitmap: DrawingBitmap::default(),
            recorder: StrokeRecorder::new(),
            captions: TextLayerController::new(
                config.drag_commit_interval(),
                config.caption_edge_padding,
            ),
            auto_fit: config.auto_fit,
            layout: None,
            seen_image: 0,
            seen_strokes: 0,
            awaiting_layout: false,
            settle_at: None,
            settle_delay: config.layout_settle_delay(),
            last_boxes: [Size::default(); 2],
        }
    }

    pub fn bitmap(&self) -> &DrawingBitmap {
        &self.bitmap
    }

    pub fn layout(&self) -> Option<SurfaceLayout> {
        self.layout
    }

    pub fn is_recording(&self) -> bool {
        self.recorder.is_recording()
    }

    pub fn dragging_caption(&self) -> Option<CaptionSlot> {
        self.captions.dragging_slot()
    }

    /// The host finished decoding a base image.
    pub fn image_loaded(&mut self) {
        self.awaiting_layout = true;
        // Force a resize and full redraw on the next layout.
        self.layout = None;
        log::debug!("Image loaded; waiting for layout");
    }

    /// Pick up store changes made outside the surface.
    pub fn sync_store(&mut self, store: &CompositionStore) {
        if store.image_revision() != self.seen_image {
            self.seen_image = store.image_revision();
            self.captions.on_new_image();
            self.settle_at = None;
        }
        if store.strokes_revision() != self.seen_strokes {
            self.seen_strokes = store.strokes_revision();
            self.redraw(store);
        }
    }

    /// Layout signal: the surface is displayed at `layout` this frame.
    ///
    /// A new size or new caption boxes re-place auto-placed captions and pull
    /// the rest back inside by their box.
    pub fn sync_layout(
        &mut self,
        layout: SurfaceLayout,
        store: &mut CompositionStore,
        measure: &dyn TextMeasure,
        now: Instant,
    ) {
        if !layout.size.is_positive() {
            return;
        }

        let resized = self.layout != Some(layout);
        if resized {
            let (w, h) = layout.backing_size();
            if (w, h) != (self.bitmap.width(), self.bitmap.height()) {
                self.bitmap.resize(w, h);
                log::debug!("Drawing bitmap resized to {}x{}", w, h);
            }
            self.layout = Some(layout);
            store.set_surface_bounds(layout.size);
            self.redraw(store);
        }

        let boxes = self.caption_boxes(store, measure);
        if self.awaiting_layout {
            self.awaiting_layout = false;
            self.captions
                .auto_place(PlacementPass::Initial, store, layout.size, boxes);
            self.settle_at = Some(now + self.settle_delay);
        } else if resized || boxes != self.last_boxes {
            self.captions
                .auto_place(PlacementPass::Settle, store, layout.size, boxes);
            self.captions.reclamp(store, layout.size, boxes);
        }
        self.last_boxes = boxes;
    }

    /// Advance timers: coalesced drag commits and the layout-settle pass.
    pub fn tick(&mut self, now: Instant, store: &mut CompositionStore, measure: &dyn TextMeasure) {
        self.captions.poll(now, store);

        if self.settle_at.is_some_and(|at| at <= now) {
            self.settle_at = None;
            if let Some(layout) = self.layout {
                let boxes = self.caption_boxes(store, measure);
                self.captions
                    .auto_place(PlacementPass::Settle, store, layout.size, boxes);
                self.captions.reclamp(store, layout.size, boxes);
                self.last_boxes = boxes;
            }
        }
    }

    /// When the host should wake up next to service a timer.
    pub fn next_wakeup(&self) -> Option<Instant> {
        match (self.captions.next_deadline(), self.settle_at) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Stop timers and gestures; nothing is written to the store afterwards.
    pub fn teardown(&mut self) {
        self.captions.teardown();
        self.recorder.cancel();
        self.settle_at = None;
        self.awaiting_layout = false;
    }

    /// Pointer pressed on the surface in draw mode.
    pub fn stroke_begin(&mut self, store: &CompositionStore, client: Point, bounds: &Bounds) -> bool {
        let Some(point) = self.to_backing(client, bounds) else {
            return false;
        };
        let ppp = self.layout.map_or(1.0, |l| l.pixels_per_point);
        let composition = store.composition();
        self.recorder.begin_stroke(
            composition.active_mode,
            point,
            &composition.brush.color,
            composition.brush.size * ppp,
            &mut self.bitmap,
        )
    }

    pub fn stroke_extend(&mut self, store: &CompositionStore, client: Point, bounds: &Bounds) -> bool {
        let Some(point) = self.to_backing(client, bounds) else {
            return false;
        };
        self.recorder
            .extend_stroke(store.composition().active_mode, point, &mut self.bitmap)
    }

    pub fn stroke_end(&mut self, store: &mut CompositionStore) -> StrokeOutcome {
        let mode = store.composition().active_mode;
        let outcome = self.recorder.end_stroke(mode, store);
        if outcome == StrokeOutcome::Discarded {
            self.redraw(store);
        }
        outcome
    }

    /// Pointer pressed on a caption in text mode.
    pub fn caption_grab(
        &mut self,
        store: &CompositionStore,
        slot: CaptionSlot,
        client: Point,
        bounds: &Bounds,
    ) -> bool {
        let pointer = bounds.local(client.x, client.y);
        let origin = self.captions.display_position(slot, store);
        self.captions
            .begin_drag(store.composition().active_mode, slot, pointer, origin)
    }

    pub fn caption_move(
        &mut self,
        store: &CompositionStore,
        client: Point,
        bounds: &Bounds,
        measure: &dyn TextMeasure,
        now: Instant,
    ) -> Option<Point> {
        let slot = self.captions.dragging_slot()?;
        let pointer = bounds.local(client.x, client.y);
        let caption = self.caption_box(store, slot, measure);
        self.captions.continue_drag(
            store.composition().active_mode,
            slot,
            pointer,
            bounds.size(),
            caption,
            now,
        )
    }

    pub fn caption_release(&mut self, store: &mut CompositionStore) -> bool {
        match self.captions.dragging_slot() {
            Some(slot) => self.captions.end_drag(slot, store),
            None => false,
        }
    }

    /// Visible captions as they should be drawn this frame, including any
    /// in-flight drag position.
    pub fn caption_views(&self, store: &CompositionStore, measure: &dyn TextMeasure) -> Vec<CaptionView> {
        let composition = store.composition();
        CaptionSlot::ALL
            .into_iter()
            .filter(|slot| composition.captions.get(*slot).is_visible())
            .map(|slot| {
                let caption = composition.captions.get(slot);
                CaptionView {
                    slot,
                    text: caption.display_text(),
                    position: self.captions.display_position(slot, store),
                    box_size: self.caption_box(store, slot, measure),
                    font_size: self.rendered_font_size(store, slot, measure),
                    font_family: caption.font_family.clone(),
                    text_align: caption.text_align,
                    bold: composition.bold,
                    shadow: composition.shadow,
                    dragging: self.captions.is_dragging(slot),
                }
            })
            .collect()
    }

    fn rendered_font_size(&self, store: &CompositionStore, slot: CaptionSlot, measure: &dyn TextMeasure) -> f32 {
        let composition = store.composition();
        let caption = composition.captions.get(slot);
        let configured = caption.font_size as f32;
        match self.layout {
            Some(layout) if composition.responsive_font => self.auto_fit.fit(
                measure,
                &caption.display_text(),
                configured,
                &caption.font_family,
                composition.bold,
                layout.size.width,
            ),
            _ => configured,
        }
    }

    fn caption_box(&self, store: &CompositionStore, slot: CaptionSlot, measure: &dyn TextMeasure) -> Size {
        let composition = store.composition();
        let caption = composition.captions.get(slot);
        let size = self.rendered_font_size(store, slot, measure);
        let text = measure.measure(&caption.display_text(), size, &caption.font_family, composition.bold);
        Size::new(
            text.width + 2.0 * CAPTION_PADDING,
            text.height + 2.0 * CAPTION_PADDING,
        )
    }

    fn caption_boxes(&self, store: &CompositionStore, measure: &dyn TextMeasure) -> [Size; 2] {
        CaptionSlot::ALL.map(|slot| self.caption_box(store, slot, measure))
    }

    fn to_backing(&self, client: Point, bounds: &Bounds) -> Option<Point> {
        if self.bitmap.width() == 0 || self.bitmap.height() == 0 {
            return None;
        }
        to_surface_coordinates(
            client.x,
            client.y,
            bounds,
            self.bitmap.width() as f32,
            self.bitmap.height() as f32,
        )
    }

    fn redraw(&mut self, store: &CompositionStore) {
        redraw_all(&store.composition().strokes, &mut self.bitmap);
        self.recorder.paint_pending(&mut self.bitmap);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::autofit::tests::FixedAdvance;
    use crate::models::composition::EditMode;

    fn layout(w: f32, h: f32, ppp: f32) -> SurfaceLayout {
        SurfaceLayout {
            size: Size::new(w, h),
            pixels_per_point: ppp,
        }
    }

    fn loaded_surface(store: &mut CompositionStore, now: Instant) -> RenderSurface {
        let mut surface = RenderSurface::new(&EditorConfig::default());
        store.set_image(Some("data:image/png;base64,AAAA".into()));
        surface.sync_store(store);
        surface.image_loaded();
        surface.sync_layout(layout(450.0, 450.0, 1.0), store, &FixedAdvance, now);
        surface
    }

    #[test]
    fn test_layout_sizes_bitmap_in_device_pixels() {
        let mut store = CompositionStore::default();
        let mut surface = RenderSurface::new(&EditorConfig::default());
        surface.sync_layout(layout(300.0, 200.0, 2.0), &mut store, &FixedAdvance, Instant::now());

        assert_eq!((surface.bitmap().width(), surface.bitmap().height()), (600, 400));
        assert_eq!(surface.layout().map(|l| l.size), Some(Size::new(300.0, 200.0)));
    }

    #[test]
    fn test_draw_gesture_commits_stroke_in_backing_pixels() {
        let mut store = CompositionStore::default();
        store.set_active_mode(EditMode::Draw);
        let mut surface = RenderSurface::new(&EditorConfig::default());
        surface.sync_layout(layout(100.0, 100.0, 2.0), &mut store, &FixedAdvance, Instant::now());
        let bounds = Bounds::new(50.0, 50.0, 100.0, 100.0);

        assert!(surface.stroke_begin(&store, Point::new(60.0, 60.0), &bounds));
        assert!(surface.stroke_extend(&store, Point::new(70.0, 80.0), &bounds));
        assert_eq!(surface.stroke_end(&mut store), StrokeOutcome::Committed);
        surface.sync_store(&store);

        let stroke = &store.composition().strokes[0];
        assert_eq!(stroke.path, vec![Point::new(20.0, 20.0), Point::new(40.0, 60.0)]);
        assert_eq!(stroke.width, 10.0);
        assert!(surface.bitmap().image().get_pixel(30, 40)[3] > 0);
    }

    #[test]
    fn test_click_stores_point_stroke_erased_on_redraw() {
        let mut store = CompositionStore::default();
        store.set_active_mode(EditMode::Draw);
        let mut surface = RenderSurface::new(&EditorConfig::default());
        surface.sync_layout(layout(100.0, 100.0, 1.0), &mut store, &FixedAdvance, Instant::now());
        let bounds = Bounds::new(0.0, 0.0, 100.0, 100.0);

        assert!(surface.stroke_begin(&store, Point::new(40.0, 40.0), &bounds));
        assert!(surface.bitmap().image().get_pixel(40, 40)[3] > 0);
        assert_eq!(surface.stroke_end(&mut store), StrokeOutcome::Committed);
        assert_eq!(store.composition().strokes[0].path.len(), 1);

        surface.sync_store(&store);
        assert!(surface.bitmap().image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_resize_replays_strokes() {
        let mut store = CompositionStore::default();
        store.append_stroke(crate::models::composition::Stroke {
            path: vec![Point::new(0.0, 5.0), Point::new(99.0, 5.0)],
            color: "#000000".into(),
            width: 4.0,
        });
        let mut surface = RenderSurface::new(&EditorConfig::default());
        surface.sync_store(&store);
        surface.sync_layout(layout(100.0, 100.0, 1.0), &mut store, &FixedAdvance, Instant::now());
        assert!(surface.bitmap().image().get_pixel(50, 5)[3] > 0);

        surface.sync_layout(layout(200.0, 150.0, 1.0), &mut store, &FixedAdvance, Instant::now());
        assert_eq!(surface.bitmap().width(), 200);
        assert!(surface.bitmap().image().get_pixel(50, 5)[3] > 0);
        assert_eq!(surface.bitmap().image().get_pixel(150, 5)[3], 0);
    }

    #[test]
    fn test_image_load_places_captions_then_settles() {
        let t0 = Instant::now();
        let mut store = CompositionStore::default();
        store.set_caption_text(CaptionSlot::Top, "top");
        let mut surface = loaded_surface(&mut store, t0);

        let top = store.composition().captions.top.position;
        let bottom = store.composition().captions.bottom.position;
        assert!(!top.is_unset());
        assert!(!bottom.is_unset());
        assert!(surface.next_wakeup().is_some());

        // Text grows after placement: the untouched caption re-centres.
        store.set_caption_text(CaptionSlot::Top, "a much longer top line");
        surface.tick(t0 + Duration::from_millis(100), &mut store, &FixedAdvance);
        let moved = store.composition().captions.top.position;
        assert!(moved.x < top.x);
        assert!(surface.next_wakeup().is_none());
    }

    fn assert_inside(view: &CaptionView, surface: Size) {
        let (p, b) = (view.position, view.box_size);
        assert!(p.x >= 5.0 && p.y >= 5.0, "{:?} starts outside", view.slot);
        assert!(p.x + b.width <= surface.width - 5.0 + 1e-3, "{:?} overflows right", view.slot);
        assert!(p.y + b.height <= surface.height - 5.0 + 1e-3, "{:?} overflows bottom", view.slot);
    }

    #[test]
    fn test_shrinking_surface_keeps_captions_inside() {
        let t0 = Instant::now();
        let mut store = CompositionStore::default();
        store.set_caption_text(CaptionSlot::Top, "ten chars!");
        store.set_caption_text(CaptionSlot::Bottom, "bottom line");
        let mut surface = loaded_surface(&mut store, t0);
        surface.tick(t0 + Duration::from_millis(100), &mut store, &FixedAdvance);

        let small = Size::new(300.0, 300.0);
        surface.sync_layout(layout(300.0, 300.0, 1.0), &mut store, &FixedAdvance, t0 + Duration::from_millis(200));

        let views = surface.caption_views(&store, &FixedAdvance);
        assert_eq!(views.len(), 2);
        for view in &views {
            assert_inside(view, small);
        }
        // Auto-placed captions are re-placed, not just pushed in.
        let top = &views[0];
        assert!((top.position.x + top.box_size.width / 2.0 - 150.0).abs() < 1e-3);
        let bottom = &views[1];
        assert!((bottom.position.y + bottom.box_size.height - 295.0).abs() < 1e-3);
    }

    #[test]
    fn test_shrinking_surface_reclamps_dragged_caption() {
        let t0 = Instant::now();
        let mut store = CompositionStore::default();
        store.set_caption_text(CaptionSlot::Bottom, "bottom");
        let mut surface = loaded_surface(&mut store, t0);
        let bounds = Bounds::new(0.0, 0.0, 450.0, 450.0);

        // Park the caption in the lower right corner of the large surface.
        let origin = store.composition().captions.bottom.position;
        let grab = Point::new(origin.x + 1.0, origin.y + 1.0);
        assert!(surface.caption_grab(&store, CaptionSlot::Bottom, grab, &bounds));
        surface.caption_move(&store, Point::new(1000.0, 1000.0), &bounds, &FixedAdvance, t0);
        assert!(surface.caption_release(&mut store));

        let small = Size::new(200.0, 160.0);
        surface.sync_layout(layout(200.0, 160.0, 1.0), &mut store, &FixedAdvance, t0);
        let views = surface.caption_views(&store, &FixedAdvance);
        assert_inside(&views[0], small);
        // Still in the corner it was dragged to.
        let p = views[0].position;
        assert!((p.x + views[0].box_size.width - 195.0).abs() < 1e-3);
        assert!((p.y + views[0].box_size.height - 155.0).abs() < 1e-3);
    }

    #[test]
    fn test_caption_drag_through_surface() {
        let t0 = Instant::now();
        let mut store = CompositionStore::default();
        store.set_caption_text(CaptionSlot::Bottom, "bottom");
        let mut surface = loaded_surface(&mut store, t0);
        let bounds = Bounds::new(10.0, 10.0, 450.0, 450.0);

        let origin = store.composition().captions.bottom.position;
        let grab = Point::new(origin.x + 10.0 + 4.0, origin.y + 10.0 + 4.0);
        assert!(surface.caption_grab(&store, CaptionSlot::Bottom, grab, &bounds));

        let moved = surface
            .caption_move(&store, Point::new(grab.x - 30.0, grab.y - 100.0), &bounds, &FixedAdvance, t0)
            .unwrap();
        assert!((moved.x - (origin.x - 30.0)).abs() < 1e-3);
        assert!((moved.y - (origin.y - 100.0)).abs() < 1e-3);

        let views = surface.caption_views(&store, &FixedAdvance);
        assert_eq!(views.len(), 1);
        assert!(views[0].dragging);
        assert_eq!(views[0].position, moved);
        assert_eq!(views[0].text, "BOTTOM");

        assert!(surface.caption_release(&mut store));
        assert_eq!(store.composition().captions.bottom.position, moved);
    }

    #[test]
    fn test_captions_not_grabbed_in_draw_mode() {
        let t0 = Instant::now();
        let mut store = CompositionStore::default();
        store.set_caption_text(CaptionSlot::Top, "top");
        let mut surface = loaded_surface(&mut store, t0);
        store.set_active_mode(EditMode::Draw);

        let bounds = Bounds::new(0.0, 0.0, 450.0, 450.0);
        assert!(!surface.caption_grab(&store, CaptionSlot::Top, Point::new(200.0, 10.0), &bounds));
        assert!(surface
            .caption_move(&store, Point::new(9.0, 9.0), &bounds, &FixedAdvance, t0)
            .is_none());
    }

    #[test]
    fn test_leaving_draw_mode_discards_live_ink() {
        let mut store = CompositionStore::default();
        store.set_active_mode(EditMode::Draw);
        let mut surface = RenderSurface::new(&EditorConfig::default());
        surface.sync_layout(layout(50.0, 50.0, 1.0), &mut store, &FixedAdvance, Instant::now());
        let bounds = Bounds::new(0.0, 0.0, 50.0, 50.0);

        surface.stroke_begin(&store, Point::new(10.0, 10.0), &bounds);
        surface.stroke_extend(&store, Point::new(40.0, 40.0), &bounds);
        store.set_active_mode(EditMode::Text);

        assert_eq!(surface.stroke_end(&mut store), StrokeOutcome::Discarded);
        assert!(store.composition().strokes.is_empty());
        assert!(surface.bitmap().image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_responsive_font_shrinks_long_caption() {
        let t0 = Instant::now();
        let mut store = CompositionStore::default();
        store.set_caption_text(CaptionSlot::Top, &"wide ".repeat(20));
        let surface = loaded_surface(&mut store, t0);

        let views = surface.caption_views(&store, &FixedAdvance);
        assert!(views[0].font_size < 32.0);
        assert_eq!(store.composition().captions.top.font_size, 32);

        store.toggle_responsive_font();
        let views = surface.caption_views(&store, &FixedAdvance);
        assert_eq!(views[0].font_size, 32.0);
    }

    #[test]
    fn test_teardown_cancels_timers() {
        let t0 = Instant::now();
        let mut store = CompositionStore::default();
        let mut surface = loaded_surface(&mut store, t0);
        surface.teardown();
        assert!(surface.next_wakeup().is_none());
    }
}
