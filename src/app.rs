// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! `MemeForgeApp` owns the composition store and the render surface, loads
//! images in the background, and wires the menu, mode tabs, properties panel
//! and canvas together.

use crate::config::EditorConfig;
use crate::editor::surface::RenderSurface;
use crate::io::{export, media, serialization};
use crate::models::composition::{Composition, Filters, Rotation, FONT_FAMILIES};
use crate::models::store::CompositionStore;
use crate::models::template::{builtin_templates, TemplateRecord};
use crate::render::filters::prepare;
use crate::render::fonts::FontLibrary;
use crate::render::text::GlyphMeasure;
use crate::ui::canvas::{self, CanvasAction, CanvasState, CanvasView, EguiMeasure};
use crate::ui::properties::{self, PropertiesAction, PropertiesState};
use crate::ui::toolbar;
use image::DynamicImage;
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, TryRecvError};
use std::time::Instant;

const IMAGE_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff"];

/// Result of background image loading operation.
struct LoadedImageData {
    /// What gets stored as the composition's base image.
    source: Option<String>,
    label: Option<String>,
    image: Option<DynamicImage>,
    template: Option<TemplateRecord>,
    /// Set when a whole composition file was loaded.
    composition: Option<Composition>,
}

/// Apply a finished background load to the store and surface.
///
/// Returns the decoded base image to display. A failed load is handed back
/// untouched and the composition stays as it was.
fn apply_loaded(
    result: Result<LoadedImageData, String>,
    store: &mut CompositionStore,
    surface: &mut RenderSurface,
) -> Result<Option<DynamicImage>, String> {
    let loaded = result?;

    if let Some(composition) = loaded.composition {
        store.replace(composition);
    } else if let (Some(template), Some(source)) = (&loaded.template, loaded.source.clone()) {
        template.apply(store, source);
    } else {
        store.set_image(loaded.source);
        if let Some(label) = &loaded.label {
            store.set_image_label(label);
        }
    }

    if loaded.image.is_some() {
        surface.image_loaded();
    }
    Ok(loaded.image)
}

/// The prepared base image and the settings it was prepared with.
struct BaseTexture {
    handle: egui::TextureHandle,
    prepared: DynamicImage,
    rotation: Rotation,
    filters: Filters,
}

/// Main application state.
pub struct MemeForgeApp {
    config: EditorConfig,
    store: CompositionStore,
    surface: RenderSurface,
    fonts: FontLibrary,
    templates: Vec<TemplateRecord>,

    /// Decoded base image before rotation and filters
    base_image: Option<DynamicImage>,
    base_texture: Option<BaseTexture>,

    canvas_state: CanvasState,
    properties_state: PropertiesState,

    /// Receiver for background image loading
    image_loader: Option<Receiver<Result<LoadedImageData, String>>>,

    /// Loading state message
    loading_message: Option<String>,
}

impl MemeForgeApp {
    /// Create the application, register caption fonts and start loading the
    /// default image if one is configured.
    pub fn new(cc: &eframe::CreationContext<'_>, config: EditorConfig) -> Self {
        let fonts = FontLibrary::discover(&config.font_dirs, &FONT_FAMILIES);
        fonts.install(&cc.egui_ctx);

        let mut app = Self {
            store: CompositionStore::default(),
            surface: RenderSurface::new(&config),
            fonts,
            templates: builtin_templates(),
            base_image: None,
            base_texture: None,
            canvas_state: CanvasState::default(),
            properties_state: PropertiesState::default(),
            image_loader: None,
            loading_message: None,
            config,
        };

        if let Some(url) = app.config.default_image.clone() {
            let label = app.config.default_image_label.clone();
            app.load_image_url(url, Some(label), None);
        }
        app
    }

    /// Run `job` on a background thread and pick up its result in `update`.
    fn spawn_loader<F>(&mut self, message: &str, job: F)
    where
        F: FnOnce() -> Result<LoadedImageData, String> + Send + 'static,
    {
        let (sender, receiver) = channel();
        self.image_loader = Some(receiver);
        self.loading_message = Some(message.to_string());

        std::thread::spawn(move || {
            let _ = sender.send(job());
        });
    }

    /// Load a local image file (asynchronously).
    pub fn load_image_file(&mut self, path: PathBuf) {
        self.spawn_loader("Loading image...", move || {
            let source = media::file_to_data_uri(&path).map_err(|e| format!("{:#}", e))?;
            let image = media::decode_source(&source).map_err(|e| format!("{:#}", e))?;
            log::info!("Loaded image: {} ({}x{})", path.display(), image.width(), image.height());

            Ok(LoadedImageData {
                source: Some(source),
                label: Some(media::file_label(&path)),
                image: Some(image),
                template: None,
                composition: None,
            })
        });
    }

    /// Fetch a remote image (asynchronously).
    pub fn load_image_url(&mut self, url: String, label: Option<String>, template: Option<TemplateRecord>) {
        self.spawn_loader("Fetching image...", move || {
            let source = media::resolve_remote(&url).map_err(|e| format!("{:#}", e))?;
            let image = media::decode_source(&source).map_err(|e| format!("{:#}", e))?;
            log::info!("Loaded image: {} ({}x{})", url, image.width(), image.height());

            Ok(LoadedImageData {
                source: Some(source),
                label,
                image: Some(image),
                template,
                composition: None,
            })
        });
    }

    fn apply_template(&mut self, idx: usize) {
        if let Some(template) = self.templates.get(idx).cloned() {
            self.load_image_url(template.url.clone(), None, Some(template));
        }
    }

    /// Load a saved composition and the image it references (asynchronously).
    fn load_composition_file(&mut self, path: PathBuf) {
        self.spawn_loader("Loading composition...", move || {
            let composition = serialization::load_composition(&path).map_err(|e| format!("{:#}", e))?;
            let image = match &composition.base_image {
                Some(source) => Some(media::decode_source(source).map_err(|e| format!("{:#}", e))?),
                None => None,
            };

            Ok(LoadedImageData {
                source: None,
                label: None,
                image,
                template: None,
                composition: Some(composition),
            })
        });
    }

    fn save_composition_file(&self, path: PathBuf) {
        if let Err(e) = serialization::save_composition(self.store.composition(), &path) {
            log::error!("{:#}", e);
        }
    }

    /// Flatten the meme and write it as a PNG. Failures are only logged.
    fn export_png(&self, path: PathBuf) {
        let (Some(base), Some(layout)) = (&self.base_texture, self.surface.layout()) else {
            log::warn!("Nothing to export yet");
            return;
        };
        // Auto-fit against the faces the export rasterizes with.
        let measure = GlyphMeasure { fonts: &self.fonts };
        let captions = self.surface.caption_views(&self.store, &measure);
        let flat = export::flatten(&base.prepared, self.surface.bitmap(), layout, &captions, &self.fonts);
        if let Err(e) = export::write_png(&flat, &path) {
            log::error!("Export failed: {:#}", e);
        }
    }

    fn receive_loaded(&mut self) {
        let Some(receiver) = &self.image_loader else {
            return;
        };
        let result = match receiver.try_recv() {
            Ok(result) => result,
            Err(TryRecvError::Empty) => return,
            Err(TryRecvError::Disconnected) => Err("Loader stopped without a result".to_string()),
        };
        self.image_loader = None;
        self.loading_message = None;

        match apply_loaded(result, &mut self.store, &mut self.surface) {
            Ok(image) => {
                self.base_image = image;
                self.base_texture = None;
                log::info!("Image ready: {}", self.store.display_label());
            }
            Err(e) => {
                log::error!("Failed to load image: {}", e);
            }
        }
    }

    /// Rebuild the displayed texture when the image, rotation or filters change.
    fn sync_base_texture(&mut self, ctx: &egui::Context) {
        let Some(image) = &self.base_image else {
            self.base_texture = None;
            return;
        };
        let composition = self.store.composition();
        let (rotation, filters) = (composition.rotation, composition.filters);
        if let Some(base) = &self.base_texture {
            if base.rotation == rotation && base.filters == filters {
                return;
            }
        }

        let prepared = prepare(image, rotation, filters, self.config.blur_sigma);
        let rgba = prepared.to_rgba8();
        let color_image = egui::ColorImage::from_rgba_unmultiplied(
            [rgba.width() as usize, rgba.height() as usize],
            rgba.as_raw(),
        );
        let handle = match self.base_texture.take() {
            Some(mut base) => {
                base.handle.set(color_image, egui::TextureOptions::LINEAR);
                base.handle
            }
            None => ctx.load_texture("base_image", color_image, egui::TextureOptions::LINEAR),
        };
        log::debug!("Prepared base image ({}°, {:?})", rotation.degrees(), filters);

        self.base_texture = Some(BaseTexture {
            handle,
            prepared,
            rotation,
            filters,
        });
    }

    fn pick_image_file(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", &IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.load_image_file(path);
        }
    }

    fn menu_bar(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let mut template_choice = None;

        ui.menu_button("File", |ui| {
            if ui.button("Open Image...").clicked() {
                self.pick_image_file();
                ui.close_menu();
            }
            ui.menu_button("Templates", |ui| {
                for (idx, template) in self.templates.iter().enumerate() {
                    if ui.button(&template.name).clicked() {
                        template_choice = Some(idx);
                        ui.close_menu();
                    }
                }
            });
            ui.separator();
            if ui.button("Load Composition...").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Composition", &["yaml", "yml", "json"])
                    .pick_file()
                {
                    self.load_composition_file(path);
                }
                ui.close_menu();
            }
            if ui.button("Save Composition...").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("YAML", &["yaml", "yml"])
                    .add_filter("JSON", &["json"])
                    .set_file_name("meme.yaml")
                    .save_file()
                {
                    self.save_composition_file(path);
                }
                ui.close_menu();
            }
            ui.separator();
            let can_export = self.base_texture.is_some();
            if ui.add_enabled(can_export, egui::Button::new("Export PNG...")).clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("PNG", &["png"])
                    .set_file_name(&self.config.export_file_name)
                    .save_file()
                {
                    self.export_png(path);
                }
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Quit").clicked() {
                ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            }
        });

        ui.menu_button("Edit", |ui| {
            if ui.button("New Composition").clicked() {
                self.store.new_composition();
                ui.close_menu();
            }
            let has_strokes = !self.store.composition().strokes.is_empty();
            if ui.add_enabled(has_strokes, egui::Button::new("Clear Drawing")).clicked() {
                self.store.clear_strokes();
                ui.close_menu();
            }
            if ui.button("Reset Captions").clicked() {
                self.store.reset_captions();
                ui.close_menu();
            }
        });

        if let Some(idx) = template_choice {
            self.apply_template(idx);
        }

        if let Some(message) = &self.loading_message {
            ui.separator();
            ui.spinner();
            ui.label(message);
        }
    }
}

impl eframe::App for MemeForgeApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.receive_loaded();
        self.sync_base_texture(ctx);

        // Request repaint if still loading (to update spinner)
        if self.loading_message.is_some() {
            ctx.request_repaint();
        }

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| self.menu_bar(ctx, ui));
        });

        // Mode tabs
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            toolbar::show(ui, &mut self.store);
        });

        // Properties panel (right side)
        let properties_action = egui::SidePanel::right("properties")
            .default_width(260.0)
            .show(ctx, |ui| {
                properties::show(ui, &mut self.store, &mut self.properties_state, &self.templates)
            })
            .inner;

        match properties_action {
            PropertiesAction::OpenImageFile => self.pick_image_file(),
            PropertiesAction::OpenImageUrl(url) => {
                let label = url.rsplit('/').next().map(str::to_string);
                self.load_image_url(url, label, None);
            }
            PropertiesAction::ApplyTemplate(idx) => self.apply_template(idx),
            PropertiesAction::None => {}
        }

        // Main canvas (center)
        let canvas_action = egui::CentralPanel::default()
            .show(ctx, |ui| {
                let view = CanvasView {
                    base: self.base_texture.as_ref().map(|b| &b.handle),
                    fonts: &self.fonts,
                    max_width: self.config.max_surface_width,
                    loading: self.loading_message.is_some(),
                };
                canvas::show(ui, &mut self.store, &mut self.surface, &mut self.canvas_state, view)
            })
            .inner;

        if let CanvasAction::RequestImage = canvas_action {
            self.pick_image_file();
        }

        // Drag commits and the layout settle pass run on deadlines.
        let now = Instant::now();
        let measure = EguiMeasure {
            ctx,
            fonts: &self.fonts,
        };
        self.surface.tick(now, &mut self.store, &measure);
        if let Some(at) = self.surface.next_wakeup() {
            ctx.request_repaint_after(at.saturating_duration_since(now));
        }
    }
}

impl Drop for MemeForgeApp {
    fn drop(&mut self) {
        self.surface.teardown();
        log::debug!("Editor closed");
    }
}
