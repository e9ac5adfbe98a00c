// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Caption font discovery.
//!
//! Caption families are looked up by file name in the configured font
//! directories. Each face found is registered with egui under its family name
//! and kept as an `ab_glyph` font for export. Families that cannot be found
//! fall back to egui's built-in proportional font.

use ab_glyph::FontArc;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory depth searched below each font directory.
const MAX_SEARCH_DEPTH: usize = 4;

struct FontFace {
    bytes: Vec<u8>,
    font: FontArc,
}

#[derive(Default)]
pub struct FontLibrary {
    /// Keyed by the family name as written in the composition.
    faces: BTreeMap<String, FontFace>,
    fallback: Option<FontArc>,
}

impl FontLibrary {
    /// A library with only the built-in fallback font.
    pub fn builtin() -> Self {
        Self {
            faces: BTreeMap::new(),
            fallback: default_font_arc(),
        }
    }

    /// Search `dirs` for the given families.
    pub fn discover(dirs: &[PathBuf], families: &[&str]) -> Self {
        let mut library = Self::builtin();
        let mut wanted: BTreeMap<String, &str> = BTreeMap::new();
        for family in families {
            for stem in file_stems(family) {
                wanted.insert(stem, family);
            }
        }

        for dir in dirs.iter().filter(|d| d.is_dir()) {
            for entry in WalkDir::new(dir).max_depth(MAX_SEARCH_DEPTH).into_iter().flatten() {
                if !entry.file_type().is_file() || !is_font_file(entry.path()) {
                    continue;
                }
                let Some(stem) = entry.path().file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                let Some(family) = wanted.get(&normalize(stem)).copied() else {
                    continue;
                };
                if library.faces.contains_key(family) {
                    continue;
                }
                match load_face(entry.path()) {
                    Ok(face) => {
                        log::info!("Font '{}' loaded from {}", family, entry.path().display());
                        library.faces.insert(family.to_string(), face);
                    }
                    Err(e) => log::warn!("Skipping font {}: {}", entry.path().display(), e),
                }
            }
        }

        for family in families {
            if !library.faces.contains_key(*family) {
                log::warn!("Font '{}' not found, captions will use the default font", family);
            }
        }
        library
    }

    pub fn has_family(&self, family: &str) -> bool {
        self.faces.contains_key(family)
    }

    /// Font used to rasterize `family` on export.
    pub fn font_for(&self, family: &str) -> Option<&FontArc> {
        self.faces
            .get(family)
            .map(|f| &f.font)
            .or(self.fallback.as_ref())
    }

    /// The egui family to paint `family` with.
    pub fn egui_family(&self, family: &str) -> egui::FontFamily {
        if self.has_family(family) {
            egui::FontFamily::Name(family.into())
        } else {
            egui::FontFamily::Proportional
        }
    }

    /// Register every discovered face with egui as a named family.
    pub fn install(&self, ctx: &egui::Context) {
        let mut definitions = egui::FontDefinitions::default();
        let proportional = definitions
            .families
            .get(&egui::FontFamily::Proportional)
            .cloned()
            .unwrap_or_default();

        for (family, face) in &self.faces {
            definitions
                .font_data
                .insert(family.clone(), egui::FontData::from_owned(face.bytes.clone()));
            // Missing glyphs fall through to the default fonts.
            let mut chain = vec![family.clone()];
            chain.extend(proportional.iter().cloned());
            definitions
                .families
                .insert(egui::FontFamily::Name(family.as_str().into()), chain);
        }
        ctx.set_fonts(definitions);
    }
}

fn load_face(path: &Path) -> anyhow::Result<FontFace> {
    let bytes = std::fs::read(path)?;
    let font = FontArc::try_from_vec(bytes.clone())?;
    Ok(FontFace { bytes, font })
}

fn is_font_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref(),
        Some("ttf") | Some("otf")
    )
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// File stems a family is commonly shipped under.
fn file_stems(family: &str) -> Vec<String> {
    let mut stems = vec![normalize(family)];
    let aliases: &[&str] = match normalize(family).as_str() {
        "comicsansms" => &["comic", "comicsans"],
        "timesnewroman" => &["times", "timesnewromanpsmt"],
        "couriernew" => &["cour", "courier"],
        "arial" => &["arialmt"],
        "impact" => &["impactregular"],
        _ => &[],
    };
    stems.extend(aliases.iter().map(|s| s.to_string()));
    stems
}

/// egui's built-in proportional face as an `ab_glyph` font.
fn default_font_arc() -> Option<FontArc> {
    let definitions = egui::FontDefinitions::default();
    let name = definitions
        .families
        .get(&egui::FontFamily::Proportional)?
        .first()?;
    let data = definitions.font_data.get(name)?;
    match &data.font {
        Cow::Borrowed(bytes) => ab_glyph::FontRef::try_from_slice_and_index(*bytes, data.index)
            .map(FontArc::from)
            .ok(),
        Cow::Owned(bytes) => ab_glyph::FontVec::try_from_vec_and_index(bytes.clone(), data.index)
            .map(FontArc::from)
            .ok(),
    }
}
