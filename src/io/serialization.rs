// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Composition file serialization.
//!
//! Compositions are written as YAML or JSON; the format follows the file
//! extension.

use crate::models::composition::Composition;
use anyhow::{bail, Context, Result};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Yaml,
    Json,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => bail!("Unsupported composition file: {}", path.display()),
        }
    }
}

/// Export a composition to YAML format.
pub fn export_yaml(data: &Composition, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export a composition to JSON format.
pub fn export_json(data: &Composition, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Import a composition from YAML format.
pub fn import_yaml(path: &Path) -> Result<Composition> {
    let yaml = std::fs::read_to_string(path)?;
    let data = serde_yaml::from_str(&yaml)?;
    Ok(data)
}

/// Import a composition from JSON format.
pub fn import_json(path: &Path) -> Result<Composition> {
    let json = std::fs::read_to_string(path)?;
    let data = serde_json::from_str(&json)?;
    Ok(data)
}

pub fn save_composition(data: &Composition, path: &Path) -> Result<()> {
    match FileFormat::from_path(path)? {
        FileFormat::Yaml => export_yaml(data, path),
        FileFormat::Json => export_json(data, path),
    }
    .with_context(|| format!("Failed to save {}", path.display()))?;
    log::info!("Saved composition to {}", path.display());
    Ok(())
}

pub fn load_composition(path: &Path) -> Result<Composition> {
    let data = match FileFormat::from_path(path)? {
        FileFormat::Yaml => import_yaml(path),
        FileFormat::Json => import_json(path),
    }
    .with_context(|| format!("Failed to load {}", path.display()))?;
    log::info!("Loaded composition from {}", path.display());
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::composition::{CaptionSlot, EditMode, Point, Rotation, Stroke};
    use std::path::PathBuf;

    fn temp(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("memeforge-{}-{}", std::process::id(), name))
    }

    fn sample() -> Composition {
        let mut c = Composition::default();
        c.base_image = Some("data:image/png;base64,AAAA".into());
        c.image_label = "Two Buttons".into();
        c.captions.get_mut(CaptionSlot::Top).text = "when the build".into();
        c.captions.get_mut(CaptionSlot::Top).position = Point::new(40.0, 12.5);
        c.filters.blur = true;
        c.rotation = Rotation::Quarter;
        c.active_mode = EditMode::Draw;
        c.strokes.push(Stroke {
            path: vec![Point::new(1.0, 2.0), Point::new(3.5, 4.0)],
            color: "#00ff00".into(),
            width: 7.0,
        });
        c
    }

    #[test]
    fn test_format_follows_extension() {
        assert_eq!(FileFormat::from_path(Path::new("a.YML")).unwrap(), FileFormat::Yaml);
        assert_eq!(FileFormat::from_path(Path::new("a.json")).unwrap(), FileFormat::Json);
        assert!(FileFormat::from_path(Path::new("a.png")).is_err());
        assert!(FileFormat::from_path(Path::new("noext")).is_err());
    }

    #[test]
    fn test_save_and_load_both_formats() {
        for name in ["comp.yaml", "comp.json"] {
            let path = temp(name);
            save_composition(&sample(), &path).unwrap();
            assert_eq!(load_composition(&path).unwrap(), sample());
            let _ = std::fs::remove_file(&path);
        }
    }

    #[test]
    fn test_load_garbage_is_an_error() {
        let path = temp("garbage.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(load_composition(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }
}
