// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Properties panel.
//!
//! Shows the controls for the active mode: caption text and styling, filters
//! and rotation, brush settings, and image sources.

use crate::models::composition::{
    CaptionSlot, EditMode, Filter, TextAlign, FONT_FAMILIES,
};
use crate::models::store::CompositionStore;
use crate::models::template::TemplateRecord;
use crate::render::color::{parse_color, to_hex};

/// Font sizes offered for captions.
const FONT_SIZES: std::ops::RangeInclusive<i32> = 10..=80;

/// Brush widths offered in draw mode.
const BRUSH_SIZES: std::ops::RangeInclusive<f32> = 1.0..=20.0;

/// Result of properties panel interaction.
pub enum PropertiesAction {
    None,
    OpenImageFile,
    OpenImageUrl(String),
    ApplyTemplate(usize),
}

/// Panel state that is not part of the composition.
#[derive(Default)]
pub struct PropertiesState {
    url: String,
}

/// Display the properties panel for the active mode.
pub fn show(
    ui: &mut egui::Ui,
    store: &mut CompositionStore,
    state: &mut PropertiesState,
    templates: &[TemplateRecord],
) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    ui.heading(store.composition().active_mode.label());
    ui.separator();

    egui::ScrollArea::vertical().show(ui, |ui| match store.composition().active_mode {
        EditMode::Text => text_panel(ui, store),
        EditMode::Effects => effects_panel(ui, store),
        EditMode::Draw => draw_panel(ui, store),
        EditMode::Upload => action = upload_panel(ui, store, state, templates),
    });

    action
}

fn text_panel(ui: &mut egui::Ui, store: &mut CompositionStore) {
    for slot in CaptionSlot::ALL {
        ui.label(egui::RichText::new(format!("{} text", slot.label())).strong());

        let mut text = store.composition().captions.get(slot).text.clone();
        let hint = format!("{} caption", slot.label());
        if ui
            .add(egui::TextEdit::singleline(&mut text).hint_text(hint))
            .changed()
        {
            store.set_caption_text(slot, &text);
        }

        let caption = store.composition().captions.get(slot).clone();
        ui.horizontal(|ui| {
            egui::ComboBox::from_id_source(("font", slot.index()))
                .selected_text(caption.font_family.as_str())
                .width(130.0)
                .show_ui(ui, |ui| {
                    for family in FONT_FAMILIES {
                        if ui
                            .selectable_label(caption.font_family == family, family)
                            .clicked()
                        {
                            store.set_caption_font(slot, family);
                        }
                    }
                });

            let mut size = caption.font_size;
            if ui
                .add(egui::DragValue::new(&mut size).range(FONT_SIZES).suffix("px"))
                .changed()
            {
                store.set_caption_size(slot, size);
            }
        });

        ui.horizontal(|ui| {
            for align in TextAlign::ALL {
                if ui
                    .selectable_label(caption.text_align == align, align.label())
                    .clicked()
                {
                    store.set_caption_align(slot, align);
                }
            }
        });

        ui.add_space(8.0);
    }

    ui.separator();
    if ui.button("Clear captions").clicked() {
        store.reset_captions();
        log::info!("Captions reset");
    }
}

fn effects_panel(ui: &mut egui::Ui, store: &mut CompositionStore) {
    ui.label(egui::RichText::new("Filters").strong());
    let filters = store.composition().filters;
    for (filter, label) in [(Filter::Grayscale, "Grayscale"), (Filter::Blur, "Blur")] {
        let mut on = filters.get(filter);
        if ui.checkbox(&mut on, label).changed() {
            store.toggle_filter(filter);
        }
    }

    ui.add_space(8.0);
    ui.label(egui::RichText::new("Rotation").strong());
    ui.horizontal(|ui| {
        if ui.button("Rotate left").clicked() {
            store.rotate_counter_clockwise();
        }
        if ui.button("Rotate right").clicked() {
            store.rotate_clockwise();
        }
        ui.label(format!("{}°", store.composition().rotation.degrees()));
        if ui.button("Reset").clicked() {
            store.reset_rotation();
        }
    });

    ui.add_space(8.0);
    ui.label(egui::RichText::new("Caption style").strong());
    let composition = store.composition();
    let (mut bold, mut shadow, mut responsive) =
        (composition.bold, composition.shadow, composition.responsive_font);
    if ui.checkbox(&mut bold, "Bold").changed() {
        store.toggle_bold();
    }
    if ui.checkbox(&mut shadow, "Shadow").changed() {
        store.toggle_shadow();
    }
    if ui
        .checkbox(&mut responsive, "Responsive font")
        .on_hover_text("Shrink captions that do not fit the image width")
        .changed()
    {
        store.toggle_responsive_font();
    }
}

fn draw_panel(ui: &mut egui::Ui, store: &mut CompositionStore) {
    let brush = store.composition().brush.clone();

    ui.horizontal(|ui| {
        ui.label("Color");
        let mut rgb = parse_color(&brush.color)
            .map(|c| [c[0], c[1], c[2]])
            .unwrap_or([0, 0, 0]);
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            store.set_brush_color(&to_hex(rgb));
        }
        ui.monospace(&brush.color);
    });

    let mut size = brush.size;
    if ui
        .add(egui::Slider::new(&mut size, BRUSH_SIZES).text("Size"))
        .changed()
    {
        store.set_brush_size(size);
    }

    ui.add_space(8.0);
    let strokes = store.composition().strokes.len();
    ui.label(format!("{} strokes", strokes));
    if ui
        .add_enabled(strokes > 0, egui::Button::new("Clear drawing"))
        .clicked()
    {
        store.clear_strokes();
    }
}

fn upload_panel(
    ui: &mut egui::Ui,
    store: &CompositionStore,
    state: &mut PropertiesState,
    templates: &[TemplateRecord],
) -> PropertiesAction {
    let mut action = PropertiesAction::None;

    if store.composition().base_image.is_some() {
        ui.label(format!("Current: {}", store.display_label()));
        ui.add_space(4.0);
    }

    if ui.button("Open image file...").clicked() {
        action = PropertiesAction::OpenImageFile;
    }

    ui.add_space(8.0);
    ui.label(egui::RichText::new("From URL").strong());
    ui.horizontal(|ui| {
        ui.add(
            egui::TextEdit::singleline(&mut state.url)
                .hint_text("https://...")
                .desired_width(160.0),
        );
        let url = state.url.trim();
        if ui.add_enabled(!url.is_empty(), egui::Button::new("Load")).clicked() {
            action = PropertiesAction::OpenImageUrl(url.to_string());
        }
    });

    ui.add_space(8.0);
    ui.label(egui::RichText::new("Templates").strong());
    for (idx, template) in templates.iter().enumerate() {
        let selected = store.composition().image_label == template.name;
        if ui
            .selectable_label(selected, &template.name)
            .on_hover_text(template.categories.join(", "))
            .clicked()
        {
            action = PropertiesAction::ApplyTemplate(idx);
        }
    }

    action
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::composition::DEFAULT_FONT_SIZE;

    #[test]
    fn test_size_ranges_cover_defaults() {
        assert!(FONT_SIZES.contains(&DEFAULT_FONT_SIZE));
        assert!(BRUSH_SIZES.contains(&crate::models::composition::Brush::default().size));
    }
}
