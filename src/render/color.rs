// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! CSS-style colour strings.

use image::Rgba;

/// Parse `#rgb`, `#rrggbb`, `#rrggbbaa` or a handful of colour names.
pub fn parse_color(value: &str) -> Option<Rgba<u8>> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    let named = match value.to_ascii_lowercase().as_str() {
        "black" => [0, 0, 0, 255],
        "white" => [255, 255, 255, 255],
        "red" => [255, 0, 0, 255],
        "green" => [0, 128, 0, 255],
        "blue" => [0, 0, 255, 255],
        "yellow" => [255, 255, 0, 255],
        "transparent" => [0, 0, 0, 0],
        _ => return None,
    };
    Some(Rgba(named))
}

/// Like [`parse_color`], falling back to opaque black.
pub fn parse_color_or_black(value: &str) -> Rgba<u8> {
    parse_color(value).unwrap_or_else(|| {
        log::warn!("Unrecognised colour '{}', using black", value);
        Rgba([0, 0, 0, 255])
    })
}

/// Format an RGB triple as `#rrggbb`.
pub fn to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    if !hex.is_ascii() {
        return None;
    }
    let byte = |s: &str| u8::from_str_radix(s, 16).ok();
    let nibble = |s: &str| byte(s).map(|v| v * 17);

    match hex.len() {
        3 => Some(Rgba([
            nibble(&hex[0..1])?,
            nibble(&hex[1..2])?,
            nibble(&hex[2..3])?,
            255,
        ])),
        6 => Some(Rgba([byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?, 255])),
        8 => Some(Rgba([
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
            byte(&hex[6..8])?,
        ])),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(parse_color("#ff0000"), Some(Rgba([255, 0, 0, 255])));
        assert_eq!(parse_color("#0f0"), Some(Rgba([0, 255, 0, 255])));
        assert_eq!(parse_color("#00000080"), Some(Rgba([0, 0, 0, 128])));
        assert_eq!(parse_color("White"), Some(Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_color("#12"), None);
        assert_eq!(parse_color("#gggggg"), None);
        assert_eq!(parse_color("chartreuse-ish"), None);
        assert_eq!(parse_color_or_black("nope"), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(to_hex([255, 16, 0]), "#ff1000");
        assert_eq!(parse_color(&to_hex([1, 2, 3])), Some(Rgba([1, 2, 3, 255])));
    }
}
