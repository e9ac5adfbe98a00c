// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Meme template records.
//!
//! Templates come from a hosted gallery in the full product; the editor only
//! needs the record shape and a built-in list of popular picks.

use super::store::CompositionStore;
use serde::{Deserialize, Serialize};

/// A template as published by the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

impl TemplateRecord {
    fn builtin(id: &str, name: &str, url: &str, category: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            url: url.to_string(),
            categories: vec![category.to_string()],
        }
    }

    /// Load this template into the store once its image has been resolved
    /// to a directly assignable source.
    pub fn apply(&self, store: &mut CompositionStore, resolved_image: String) {
        store.set_image(Some(resolved_image));
        store.set_image_label(&self.name);
        log::info!("Applied template '{}'", self.id);
    }
}

/// Templates shipped with the editor.
pub fn builtin_templates() -> Vec<TemplateRecord> {
    vec![
        TemplateRecord::builtin("drake", "Drake Hotline Bling", "https://i.imgflip.com/30b1gx.jpg", "popular"),
        TemplateRecord::builtin("distracted-boyfriend", "Distracted Boyfriend", "https://i.imgflip.com/1ur9b0.jpg", "popular"),
        TemplateRecord::builtin("two-buttons", "Two Buttons", "https://i.imgflip.com/1g8my4.jpg", "popular"),
        TemplateRecord::builtin("change-my-mind", "Change My Mind", "https://i.imgflip.com/24y43o.jpg", "popular"),
        TemplateRecord::builtin("expanding-brain", "Expanding Brain", "https://i.imgflip.com/1jwhww.jpg", "popular"),
        TemplateRecord::builtin("woman-yelling-at-cat", "Woman Yelling at Cat", "https://i.imgflip.com/345v97.jpg", "popular"),
        TemplateRecord::builtin("always-has-been", "Always Has Been", "https://i.imgflip.com/46e43q.png", "reaction"),
        TemplateRecord::builtin("disaster-girl", "Disaster Girl", "https://i.imgflip.com/23ls.jpg", "classic"),
        TemplateRecord::builtin("one-does-not-simply", "One Does Not Simply", "https://i.imgflip.com/1bij.jpg", "classic"),
        TemplateRecord::builtin("success-kid", "Success Kid", "https://i.imgflip.com/1bhk.jpg", "classic"),
        TemplateRecord::builtin("surprised-pikachu", "Surprised Pikachu", "https://i.imgflip.com/2kbn1e.jpg", "reaction"),
        TemplateRecord::builtin("this-is-fine", "This Is Fine", "https://i.imgflip.com/wxica.jpg", "reaction"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::composition::{CaptionSlot, Point};

    #[test]
    fn test_builtin_ids_are_unique() {
        let templates = builtin_templates();
        let mut ids: Vec<&str> = templates.iter().map(|t| t.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), templates.len());
    }

    #[test]
    fn test_apply_sets_image_and_label() {
        let mut store = CompositionStore::default();
        store.set_caption_position(CaptionSlot::Top, 30.0, 30.0);

        let record = builtin_templates().remove(0);
        record.apply(&mut store, "data:image/png;base64,AAAA".to_string());

        let c = store.composition();
        assert_eq!(c.base_image.as_deref(), Some("data:image/png;base64,AAAA"));
        assert_eq!(c.image_label, "Drake Hotline Bling");
        assert_eq!(c.captions.top.position, Point::UNSET);
    }

    #[test]
    fn test_record_deserializes_without_categories() {
        let record: TemplateRecord =
            serde_json::from_str(r#"{"id":"x","name":"X","url":"https://a/b.png"}"#).unwrap();
        assert!(record.categories.is_empty());
    }
}
