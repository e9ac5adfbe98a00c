// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Free-hand stroke recording.
//!
//! One stroke is recorded at a time (`Idle -> Recording -> Idle`). Points are
//! painted onto the live bitmap as they arrive for instant feedback; the
//! finished path is appended to the store in one step when recording ends.

use crate::models::composition::{EditMode, Point, Stroke};
use crate::models::store::CompositionStore;
use crate::render::bitmap::DrawingBitmap;
use crate::render::color::parse_color_or_black;

#[derive(Debug, Default)]
enum RecorderState {
    #[default]
    Idle,
    Recording {
        path: Vec<Point>,
        color: String,
        width: f32,
    },
}

/// What happened when recording stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeOutcome {
    /// Nothing was being recorded.
    Idle,
    /// The stroke was appended to the store.
    Committed,
    /// Draw mode was left mid-stroke; live ink must be repainted away.
    Discarded,
}

#[derive(Debug, Default)]
pub struct StrokeRecorder {
    state: RecorderState,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecorderState::Recording { .. })
    }

    /// Start a stroke at `point`. Ignored outside draw mode or while another
    /// stroke is in progress.
    pub fn begin_stroke(
        &mut self,
        mode: EditMode,
        point: Point,
        color: &str,
        width: f32,
        bitmap: &mut DrawingBitmap,
    ) -> bool {
        if mode != EditMode::Draw || self.is_recording() {
            return false;
        }

        bitmap.dot(point, parse_color_or_black(color), width);
        self.state = RecorderState::Recording {
            path: vec![point],
            color: color.to_string(),
            width,
        };
        true
    }

    /// Add `point` to the stroke in progress and paint the new segment.
    pub fn extend_stroke(&mut self, mode: EditMode, point: Point, bitmap: &mut DrawingBitmap) -> bool {
        if mode != EditMode::Draw {
            return false;
        }
        let RecorderState::Recording { path, color, width } = &mut self.state else {
            return false;
        };

        if let Some(&last) = path.last() {
            bitmap.segment(last, point, parse_color_or_black(color.as_str()), *width);
        }
        path.push(point);
        true
    }

    /// Finish recording. In draw mode the collected path is committed to the
    /// store as one stroke; the buffer is dropped either way.
    pub fn end_stroke(&mut self, mode: EditMode, store: &mut CompositionStore) -> StrokeOutcome {
        match std::mem::take(&mut self.state) {
            RecorderState::Idle => StrokeOutcome::Idle,
            RecorderState::Recording { path, color, width } => {
                if mode != EditMode::Draw || path.is_empty() {
                    return StrokeOutcome::Discarded;
                }
                log::debug!("Committing stroke with {} points", path.len());
                store.append_stroke(Stroke { path, color, width });
                StrokeOutcome::Committed
            }
        }
    }

    /// Repaint the stroke in progress, e.g. after the bitmap was rebuilt.
    pub fn paint_pending(&self, bitmap: &mut DrawingBitmap) {
        if let RecorderState::Recording { path, color, width } = &self.state {
            let ink = parse_color_or_black(color);
            match path.as_slice() {
                [only] => bitmap.dot(*only, ink, *width),
                points => bitmap.polyline(points, ink, *width),
            }
        }
    }

    /// Drop any stroke in progress without committing it.
    pub fn cancel(&mut self) {
        self.state = RecorderState::Idle;
    }
}

/// Clear `bitmap` and replay every visible stroke in order.
pub fn redraw_all(strokes: &[Stroke], bitmap: &mut DrawingBitmap) {
    bitmap.clear();
    for stroke in strokes.iter().filter(|s| s.is_visible()) {
        bitmap.polyline(&stroke.path, parse_color_or_black(&stroke.color), stroke.width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f32, y: f32) -> Point {
        Point::new(x, y)
    }

    #[test]
    fn test_round_trip_appends_one_stroke() {
        let mut store = CompositionStore::default();
        let mut bitmap = DrawingBitmap::new(64, 64);
        let mut recorder = StrokeRecorder::new();

        assert!(recorder.begin_stroke(EditMode::Draw, pt(1.0, 1.0), "#ff0000", 5.0, &mut bitmap));
        for i in 2..=6 {
            assert!(recorder.extend_stroke(EditMode::Draw, pt(i as f32 * 5.0, 10.0), &mut bitmap));
        }
        assert_eq!(recorder.end_stroke(EditMode::Draw, &mut store), StrokeOutcome::Committed);
        assert!(!recorder.is_recording());

        let strokes = &store.composition().strokes;
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].path.len(), 6);
        assert_eq!(strokes[0].path[0], pt(1.0, 1.0));
        assert_eq!(strokes[0].path[5], pt(30.0, 10.0));
        assert_eq!(strokes[0].color, "#ff0000");
        assert_eq!(strokes[0].width, 5.0);
    }

    #[test]
    fn test_live_paint_matches_replay() {
        let mut store = CompositionStore::default();
        let mut live = DrawingBitmap::new(48, 48);
        let mut recorder = StrokeRecorder::new();

        recorder.begin_stroke(EditMode::Draw, pt(4.0, 4.0), "#00ff00", 3.0, &mut live);
        recorder.extend_stroke(EditMode::Draw, pt(40.0, 4.0), &mut live);
        recorder.extend_stroke(EditMode::Draw, pt(40.0, 40.0), &mut live);
        recorder.end_stroke(EditMode::Draw, &mut store);

        let mut replay = DrawingBitmap::new(48, 48);
        redraw_all(&store.composition().strokes, &mut replay);
        assert_eq!(live.image(), replay.image());
    }

    #[test]
    fn test_redraw_is_idempotent() {
        let strokes = vec![
            Stroke {
                path: vec![pt(2.0, 2.0), pt(30.0, 20.0), pt(10.0, 31.0)],
                color: "#3366ff80".into(),
                width: 6.0,
            },
            Stroke {
                path: vec![pt(0.0, 31.0), pt(31.0, 0.0)],
                color: "black".into(),
                width: 2.0,
            },
        ];
        let mut bitmap = DrawingBitmap::new(32, 32);
        redraw_all(&strokes, &mut bitmap);
        let first = bitmap.image().clone();
        redraw_all(&strokes, &mut bitmap);
        assert_eq!(&first, bitmap.image());
    }

    #[test]
    fn test_single_point_stroke_stored_but_not_replayed() {
        let mut store = CompositionStore::default();
        let mut bitmap = DrawingBitmap::new(16, 16);
        let mut recorder = StrokeRecorder::new();

        recorder.begin_stroke(EditMode::Draw, pt(8.0, 8.0), "#ff0000", 4.0, &mut bitmap);
        assert_eq!(recorder.end_stroke(EditMode::Draw, &mut store), StrokeOutcome::Committed);
        assert_eq!(store.composition().strokes.len(), 1);

        redraw_all(&store.composition().strokes, &mut bitmap);
        assert!(bitmap.image().pixels().all(|p| p[3] == 0));
    }

    #[test]
    fn test_outside_draw_mode_is_ignored() {
        let mut store = CompositionStore::default();
        let mut bitmap = DrawingBitmap::new(16, 16);
        let mut recorder = StrokeRecorder::new();

        assert!(!recorder.begin_stroke(EditMode::Text, pt(1.0, 1.0), "#ff0000", 4.0, &mut bitmap));
        assert!(!recorder.extend_stroke(EditMode::Draw, pt(2.0, 2.0), &mut bitmap));
        assert_eq!(recorder.end_stroke(EditMode::Draw, &mut store), StrokeOutcome::Idle);

        recorder.begin_stroke(EditMode::Draw, pt(1.0, 1.0), "#ff0000", 4.0, &mut bitmap);
        assert!(!recorder.extend_stroke(EditMode::Effects, pt(9.0, 9.0), &mut bitmap));
        assert_eq!(recorder.end_stroke(EditMode::Effects, &mut store), StrokeOutcome::Discarded);

        assert!(store.composition().strokes.is_empty());
        assert_eq!(store.strokes_revision(), 0);
    }

    #[test]
    fn test_second_begin_while_recording_is_ignored() {
        let mut bitmap = DrawingBitmap::new(16, 16);
        let mut recorder = StrokeRecorder::new();
        assert!(recorder.begin_stroke(EditMode::Draw, pt(1.0, 1.0), "#ff0000", 4.0, &mut bitmap));
        assert!(!recorder.begin_stroke(EditMode::Draw, pt(5.0, 5.0), "#ff0000", 4.0, &mut bitmap));
    }
}
