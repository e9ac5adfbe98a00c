// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Mode tabs.
//!
//! The active mode decides what the canvas does with the pointer and which
//! controls the properties panel shows.

use crate::models::composition::EditMode;
use crate::models::store::CompositionStore;

/// Display the mode tabs.
pub fn show(ui: &mut egui::Ui, store: &mut CompositionStore) {
    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        ui.label("Mode:");

        ui.separator();

        let current = store.composition().active_mode;
        for mode in EditMode::ALL {
            let text = format!("{} {}", icon(mode), mode.label());
            if ui.selectable_label(current == mode, text).clicked() && current != mode {
                store.set_active_mode(mode);
                log::debug!("Switched to {} mode", mode.label());
            }
        }

        ui.separator();

        let hint = match current {
            EditMode::Text => "Type captions in the panel, drag them on the image to move them",
            EditMode::Effects => "Toggle filters, rotate the image and style the captions",
            EditMode::Draw => "Drag on the image to draw",
            EditMode::Upload => "Open a local image, a URL or a template",
        };

        ui.label(egui::RichText::new(hint).italics().weak());
    });
}

fn icon(mode: EditMode) -> &'static str {
    match mode {
        EditMode::Text => "T",
        EditMode::Effects => "✨",
        EditMode::Draw => "✏",
        EditMode::Upload => "⬆",
    }
}
