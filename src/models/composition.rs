// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Composition data structures.
//!
//! This module defines the serializable model of one meme being edited:
//! the base image, the two caption slots, the ink strokes and the filters.

use serde::{Deserialize, Serialize};

/// Maximum number of characters shown for an image label.
pub const MAX_LABEL_CHARS: usize = 20;

/// Default caption font size in pixels.
pub const DEFAULT_FONT_SIZE: i32 = 32;

/// Default caption font family.
pub const DEFAULT_FONT_FAMILY: &str = "Impact";

/// Caption font families offered by the text panel.
pub const FONT_FAMILIES: [&str; 5] = [
    "Arial",
    "Impact",
    "Comic Sans MS",
    "Times New Roman",
    "Courier New",
];

/// A 2D point in surface pixels (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Sentinel meaning "not placed yet".
    pub const UNSET: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn is_unset(&self) -> bool {
        *self == Self::UNSET
    }
}

/// One of the two fixed caption slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CaptionSlot {
    Top,
    Bottom,
}

impl CaptionSlot {
    pub const ALL: [CaptionSlot; 2] = [CaptionSlot::Top, CaptionSlot::Bottom];

    pub fn index(self) -> usize {
        match self {
            CaptionSlot::Top => 0,
            CaptionSlot::Bottom => 1,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CaptionSlot::Top => "Top",
            CaptionSlot::Bottom => "Bottom",
        }
    }
}

/// Horizontal alignment of a caption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    #[default]
    Center,
    Right,
}

impl TextAlign {
    pub const ALL: [TextAlign; 3] = [TextAlign::Left, TextAlign::Center, TextAlign::Right];

    pub fn label(self) -> &'static str {
        match self {
            TextAlign::Left => "Left",
            TextAlign::Center => "Center",
            TextAlign::Right => "Right",
        }
    }
}

/// A single text overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Caption {
    pub text: String,
    pub position: Point,
    pub font_size: i32,
    pub font_family: String,
    pub text_align: TextAlign,
}

impl Default for Caption {
    fn default() -> Self {
        Self {
            text: String::new(),
            position: Point::UNSET,
            font_size: DEFAULT_FONT_SIZE,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            text_align: TextAlign::Center,
        }
    }
}

impl Caption {
    /// Empty captions are not rendered.
    pub fn is_visible(&self) -> bool {
        !self.text.is_empty()
    }

    /// Text as it appears on the surface.
    pub fn display_text(&self) -> String {
        self.text.to_uppercase()
    }
}

/// The top and bottom caption slots.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Captions {
    pub top: Caption,
    pub bottom: Caption,
}

impl Captions {
    pub fn get(&self, slot: CaptionSlot) -> &Caption {
        match slot {
            CaptionSlot::Top => &self.top,
            CaptionSlot::Bottom => &self.bottom,
        }
    }

    pub fn get_mut(&mut self, slot: CaptionSlot) -> &mut Caption {
        match slot {
            CaptionSlot::Top => &mut self.top,
            CaptionSlot::Bottom => &mut self.bottom,
        }
    }
}

/// Visual filter toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    pub grayscale: bool,
    pub blur: bool,
}

/// Name of a single filter toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    Grayscale,
    Blur,
}

impl Filters {
    pub fn get(&self, filter: Filter) -> bool {
        match filter {
            Filter::Grayscale => self.grayscale,
            Filter::Blur => self.blur,
        }
    }

    /// True when no filter is enabled.
    pub fn is_identity(&self) -> bool {
        !self.grayscale && !self.blur
    }
}

/// A committed free-hand ink path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    pub path: Vec<Point>,
    pub color: String,
    pub width: f32,
}

impl Stroke {
    /// Strokes with fewer than two points are stored but never drawn.
    pub fn is_visible(&self) -> bool {
        self.path.len() >= 2
    }
}

/// Colour and width used for new strokes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Brush {
    pub color: String,
    pub size: f32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            color: "#ff0000".to_string(),
            size: 5.0,
        }
    }
}

/// Quarter-turn rotation applied to the base image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    #[serde(rename = "0")]
    None,
    #[serde(rename = "90")]
    Quarter,
    #[serde(rename = "180")]
    Half,
    #[serde(rename = "270")]
    ThreeQuarter,
}

impl Rotation {
    pub fn degrees(self) -> u16 {
        match self {
            Rotation::None => 0,
            Rotation::Quarter => 90,
            Rotation::Half => 180,
            Rotation::ThreeQuarter => 270,
        }
    }

    pub fn clockwise(self) -> Self {
        match self {
            Rotation::None => Rotation::Quarter,
            Rotation::Quarter => Rotation::Half,
            Rotation::Half => Rotation::ThreeQuarter,
            Rotation::ThreeQuarter => Rotation::None,
        }
    }

    pub fn counter_clockwise(self) -> Self {
        match self {
            Rotation::None => Rotation::ThreeQuarter,
            Rotation::Quarter => Rotation::None,
            Rotation::Half => Rotation::Quarter,
            Rotation::ThreeQuarter => Rotation::Half,
        }
    }
}

/// Which editing surface is in the foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditMode {
    #[default]
    Text,
    Effects,
    Draw,
    Upload,
}

impl EditMode {
    pub const ALL: [EditMode; 4] = [
        EditMode::Text,
        EditMode::Effects,
        EditMode::Draw,
        EditMode::Upload,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EditMode::Text => "Text",
            EditMode::Effects => "Effects",
            EditMode::Draw => "Draw",
            EditMode::Upload => "Upload",
        }
    }
}

/// The meme being edited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Composition {
    /// Data URI, remote URL or file path of the base image.
    pub base_image: Option<String>,
    pub image_label: String,
    pub filters: Filters,
    pub captions: Captions,
    pub bold: bool,
    pub shadow: bool,
    pub responsive_font: bool,
    pub strokes: Vec<Stroke>,
    pub brush: Brush,
    pub rotation: Rotation,
    pub active_mode: EditMode,
}

impl Default for Composition {
    fn default() -> Self {
        Self {
            base_image: None,
            image_label: String::new(),
            filters: Filters::default(),
            captions: Captions::default(),
            bold: false,
            shadow: true,
            responsive_font: true,
            strokes: Vec::new(),
            brush: Brush::default(),
            rotation: Rotation::None,
            active_mode: EditMode::Text,
        }
    }
}

/// Shorten a name for display: at most 20 characters, with an ellipsis.
pub fn truncate_label(name: &str) -> String {
    if name.chars().count() > MAX_LABEL_CHARS {
        let head: String = name.chars().take(MAX_LABEL_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_defaults() {
        let caption = Caption::default();
        assert_eq!(caption.font_size, 32);
        assert_eq!(caption.font_family, "Impact");
        assert_eq!(caption.text_align, TextAlign::Center);
        assert!(caption.position.is_unset());
        assert!(!caption.is_visible());
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Change My Mind"), "Change My Mind");
        assert_eq!(truncate_label("exactly-twenty-chars"), "exactly-twenty-chars");
        assert_eq!(
            truncate_label("a_really_long_file_name.png"),
            "a_really_long_fil..."
        );
        assert_eq!(truncate_label("a_really_long_file_name.png").chars().count(), 20);
    }

    #[test]
    fn test_rotation_cycles() {
        let mut r = Rotation::None;
        for _ in 0..4 {
            r = r.clockwise();
        }
        assert_eq!(r, Rotation::None);
        assert_eq!(Rotation::None.counter_clockwise().degrees(), 270);
        assert_eq!(Rotation::Quarter.counter_clockwise(), Rotation::None);
    }

    #[test]
    fn test_degenerate_stroke_is_invisible() {
        let stroke = Stroke {
            path: vec![Point::new(1.0, 1.0)],
            color: "#000".into(),
            width: 3.0,
        };
        assert!(!stroke.is_visible());
    }

    #[test]
    fn test_composition_json_field_names() {
        let json = serde_json::to_value(Composition::default()).unwrap();
        assert_eq!(json["active_mode"], "text");
        assert_eq!(json["rotation"], "0");
        assert_eq!(json["captions"]["top"]["text_align"], "center");
    }
}
