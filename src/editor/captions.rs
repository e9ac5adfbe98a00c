// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Caption placement and dragging.
//!
//! Each caption slot is either static or being dragged. While dragging, the
//! position shown on screen is a transient value updated on every pointer
//! move; the store only sees coalesced commits, plus one final flush when the
//! drag ends.

use crate::models::composition::{CaptionSlot, EditMode, Point, TextAlign};
use crate::models::store::CompositionStore;
use crate::util::debounce::Debouncer;
use crate::util::geometry::{clamp_box, Size};
use std::time::{Duration, Instant};

/// Gap between the top caption and the top edge when auto-placed.
pub const TOP_MARGIN: f32 = 5.0;
/// Gap between the bottom caption and the bottom edge when auto-placed.
pub const BOTTOM_MARGIN: f32 = 5.0;
/// Padding inside a caption box around its text.
pub const CAPTION_PADDING: f32 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Static,
    Dragging {
        /// Pointer position relative to the caption origin at grab time.
        offset: Point,
        transient: Point,
    },
}

/// Which auto-placement pass is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementPass {
    /// First layout after an image load: place captions still at the sentinel.
    Initial,
    /// Later passes: re-place captions this controller placed and nobody
    /// moved, plus any caption back at the sentinel.
    Settle,
}

pub struct TextLayerController {
    slots: [DragState; 2],
    commits: [Debouncer<Point>; 2],
    auto_placed: [bool; 2],
    edge_padding: f32,
}

impl TextLayerController {
    pub fn new(commit_interval: Duration, edge_padding: f32) -> Self {
        Self {
            slots: [DragState::Static; 2],
            commits: [Debouncer::new(commit_interval), Debouncer::new(commit_interval)],
            auto_placed: [false; 2],
            edge_padding,
        }
    }

    pub fn is_dragging(&self, slot: CaptionSlot) -> bool {
        matches!(self.slots[slot.index()], DragState::Dragging { .. })
    }

    pub fn dragging_slot(&self) -> Option<CaptionSlot> {
        CaptionSlot::ALL.into_iter().find(|s| self.is_dragging(*s))
    }

    /// Where the caption should be drawn right now.
    pub fn display_position(&self, slot: CaptionSlot, store: &CompositionStore) -> Point {
        match self.slots[slot.index()] {
            DragState::Dragging { transient, .. } => transient,
            DragState::Static => store.composition().captions.get(slot).position,
        }
    }

    /// Grab a caption. `pointer` and `origin` are in surface coordinates.
    pub fn begin_drag(&mut self, mode: EditMode, slot: CaptionSlot, pointer: Point, origin: Point) -> bool {
        if mode != EditMode::Text || self.dragging_slot().is_some() {
            return false;
        }

        self.slots[slot.index()] = DragState::Dragging {
            offset: Point::new(pointer.x - origin.x, pointer.y - origin.y),
            transient: origin,
        };
        self.auto_placed[slot.index()] = false;
        log::debug!("Started dragging {} caption", slot.label());
        true
    }

    /// Move a dragged caption, clamped inside the surface. Returns the new
    /// transient position.
    pub fn continue_drag(
        &mut self,
        mode: EditMode,
        slot: CaptionSlot,
        pointer: Point,
        surface: Size,
        caption: Size,
        now: Instant,
    ) -> Option<Point> {
        if mode != EditMode::Text {
            return None;
        }
        let i = slot.index();
        let DragState::Dragging { offset, transient } = &mut self.slots[i] else {
            return None;
        };

        let candidate = Point::new(pointer.x - offset.x, pointer.y - offset.y);
        let clamped = clamp_box(candidate, caption, surface, self.edge_padding);
        *transient = clamped;
        self.commits[i].push(clamped, now);
        Some(clamped)
    }

    /// Commit any coalesced drag positions whose window has elapsed.
    pub fn poll(&mut self, now: Instant, store: &mut CompositionStore) -> bool {
        let mut committed = false;
        for slot in CaptionSlot::ALL {
            if let Some(p) = self.commits[slot.index()].poll(now) {
                store.set_caption_position(slot, p.x, p.y);
                committed = true;
            }
        }
        committed
    }

    /// Release a caption, committing its last transient position.
    pub fn end_drag(&mut self, slot: CaptionSlot, store: &mut CompositionStore) -> bool {
        let i = slot.index();
        let DragState::Dragging { transient, .. } = self.slots[i] else {
            return false;
        };

        self.commits[i].cancel();
        store.set_caption_position(slot, transient.x, transient.y);
        self.slots[i] = DragState::Static;
        log::info!(
            "Placed {} caption at ({:.1}, {:.1})",
            slot.label(),
            transient.x,
            transient.y
        );
        true
    }

    /// Earliest pending commit deadline, for scheduling a repaint.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.commits.iter().filter_map(|d| d.deadline()).min()
    }

    /// Forget drags and pending commits without touching the store.
    pub fn teardown(&mut self) {
        for d in &mut self.commits {
            d.cancel();
        }
        self.slots = [DragState::Static; 2];
    }

    /// A new image arrived: captions will be placed from scratch.
    pub fn on_new_image(&mut self) {
        self.teardown();
        self.auto_placed = [false; 2];
    }

    /// Assign default positions. `boxes` holds each caption's rendered box.
    pub fn auto_place(
        &mut self,
        pass: PlacementPass,
        store: &mut CompositionStore,
        surface: Size,
        boxes: [Size; 2],
    ) -> usize {
        if !surface.is_positive() {
            return 0;
        }

        let mut placed = 0;
        for slot in CaptionSlot::ALL {
            let i = slot.index();
            if self.is_dragging(slot) {
                continue;
            }
            let caption = store.composition().captions.get(slot);
            let wanted = match pass {
                PlacementPass::Initial => caption.position.is_unset(),
                PlacementPass::Settle => self.auto_placed[i] || caption.position.is_unset(),
            };
            if !wanted {
                continue;
            }

            let p = default_position(slot, caption.text_align, surface, boxes[i], self.edge_padding);
            if caption.position != p {
                store.set_caption_position(slot, p.x, p.y);
                log::debug!("Auto-placed {} caption at ({:.1}, {:.1})", slot.label(), p.x, p.y);
            }
            self.auto_placed[i] = true;
            placed += 1;
        }
        placed
    }

    /// Pull committed captions back inside `surface` by their rendered box.
    /// Captions being dragged or still at the sentinel are left alone.
    pub fn reclamp(&self, store: &mut CompositionStore, surface: Size, boxes: [Size; 2]) -> usize {
        if !surface.is_positive() {
            return 0;
        }

        let mut moved = 0;
        for slot in CaptionSlot::ALL {
            if self.is_dragging(slot) {
                continue;
            }
            let p = store.composition().captions.get(slot).position;
            if p.is_unset() {
                continue;
            }
            let clamped = clamp_box(p, boxes[slot.index()], surface, self.edge_padding);
            if clamped != p {
                store.set_caption_position(slot, clamped.x, clamped.y);
                log::debug!("Re-clamped {} caption to ({:.1}, {:.1})", slot.label(), clamped.x, clamped.y);
                moved += 1;
            }
        }
        moved
    }
}

/// Default origin of a caption box: top or bottom band, anchored by alignment.
pub fn default_position(
    slot: CaptionSlot,
    align: TextAlign,
    surface: Size,
    caption: Size,
    padding: f32,
) -> Point {
    let x = match align {
        TextAlign::Left => padding,
        TextAlign::Center => (surface.width - caption.width) / 2.0,
        TextAlign::Right => surface.width - caption.width - padding,
    };
    let y = match slot {
        CaptionSlot::Top => TOP_MARGIN,
        CaptionSlot::Bottom => surface.height - caption.height - BOTTOM_MARGIN,
    };
    clamp_box(Point::new(x, y), caption, surface, padding)
}
