// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Responsive caption sizing.
//!
//! Captions are single-line. When a caption is wider than a fraction of the
//! surface its rendered size shrinks, never below `floor`; with `grow`
//! enabled short captions also grow, never above `ceiling`. The configured
//! size in the composition is never modified.

use crate::util::geometry::Size;
use serde::{Deserialize, Serialize};

/// Anything that can report the extent of a single line of text.
pub trait TextMeasure {
    fn measure(&self, text: &str, font_size: f32, family: &str, bold: bool) -> Size;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoFit {
    pub floor: f32,
    pub ceiling: f32,
    pub width_fraction: f32,
    pub grow: bool,
}

impl Default for AutoFit {
    fn default() -> Self {
        Self {
            floor: 14.0,
            ceiling: 48.0,
            width_fraction: 0.95,
            grow: false,
        }
    }
}

impl AutoFit {
    /// Rendered font size for `text` on a surface `surface_width` wide.
    pub fn fit(
        &self,
        measure: &dyn TextMeasure,
        text: &str,
        configured: f32,
        family: &str,
        bold: bool,
        surface_width: f32,
    ) -> f32 {
        if text.is_empty() || configured <= 0.0 || surface_width <= 0.0 {
            return configured;
        }

        let width = measure.measure(text, configured, family, bold).width;
        if width <= 0.0 {
            return configured;
        }

        let available = surface_width * self.width_fraction;
        let proportional = (configured * available / width).floor();

        if width > available {
            proportional.max(self.floor)
        } else if self.grow && proportional > configured {
            proportional.min(self.ceiling).max(configured)
        } else {
            configured
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Every glyph advances by 0.6 em and lines are 1.2 em tall.
    pub struct FixedAdvance;

    impl TextMeasure for FixedAdvance {
        fn measure(&self, text: &str, font_size: f32, _family: &str, _bold: bool) -> Size {
            Size::new(
                text.chars().count() as f32 * font_size * 0.6,
                font_size * 1.2,
            )
        }
    }

    #[test]
    fn test_short_text_keeps_configured_size() {
        let fit = AutoFit::default();
        assert_eq!(fit.fit(&FixedAdvance, "HELLO", 32.0, "Impact", false, 450.0), 32.0);
    }

    #[test]
    fn test_long_text_shrinks_to_fit() {
        let fit = AutoFit::default();
        let text = "THIS CAPTION IS FAR TOO LONG TO FIT";
        let size = fit.fit(&FixedAdvance, text, 32.0, "Impact", false, 450.0);

        assert!(size < 32.0);
        let width = FixedAdvance.measure(text, size, "Impact", false).width;
        assert!(width <= 450.0 * 0.95);
    }

    #[test]
    fn test_shrink_respects_floor() {
        let fit = AutoFit::default();
        let text = "X".repeat(500);
        assert_eq!(fit.fit(&FixedAdvance, &text, 32.0, "Impact", false, 450.0), 14.0);
    }

    #[test]
    fn test_grow_respects_ceiling() {
        let fit = AutoFit {
            grow: true,
            ..AutoFit::default()
        };
        assert_eq!(fit.fit(&FixedAdvance, "HI", 32.0, "Impact", false, 450.0), 48.0);

        // "ABCDEFGHIJKLMNOPQRST" at 32px is 384 wide; it may grow to 35.
        let size = fit.fit(&FixedAdvance, "ABCDEFGHIJKLMNOPQRST", 32.0, "Impact", false, 450.0);
        assert_eq!(size, 35.0);
    }

    #[test]
    fn test_degenerate_inputs_pass_through() {
        let fit = AutoFit::default();
        assert_eq!(fit.fit(&FixedAdvance, "", 32.0, "Impact", false, 450.0), 32.0);
        assert_eq!(fit.fit(&FixedAdvance, "HELLO", -5.0, "Impact", false, 450.0), -5.0);
        assert_eq!(fit.fit(&FixedAdvance, "HELLO", 32.0, "Impact", false, 0.0), 32.0);
    }
}
