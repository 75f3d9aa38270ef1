use crate::app::{AlertKind, App, CharacterMode, CharacterReference, StudioEvent};
use crate::app_ui;
use crate::media;
use eframe::egui;
use genimage::{GenerationRequest, ImageData, ProviderError};
use std::path::PathBuf;
use std::time::Duration;
use storyboard::prompts::character_sheet_prompt;

impl App {
    pub(crate) fn character_section(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let mut pick_upload = false;
        let mut submit_describe = false;
        let mut clear_character = false;

        ui.label(egui::RichText::new("Character Reference").strong());
        ui.add_space(4.0);
        if self.character.is_some() {
            if let Some(tex) = &self.character_tex {
                app_ui::fitted_texture(ui, tex, 240.0);
            } else {
                ui.weak("Preview unavailable.");
            }
            match self
                .character
                .as_ref()
                .and_then(|reference| reference.source_path.as_ref())
            {
                Some(path) => ui.small(path.display().to_string()),
                None => ui.small("Generated from description."),
            };
            let can_clear = !self.storyboard_busy && !self.character_busy;
            if ui
                .add_enabled(can_clear, egui::Button::new("Clear Character"))
                .clicked()
            {
                clear_character = true;
            }
        } else {
            ui.horizontal(|ui| {
                ui.selectable_value(&mut self.character_mode, CharacterMode::Upload, "Upload");
                ui.selectable_value(&mut self.character_mode, CharacterMode::Describe, "Describe");
            });
            ui.add_space(4.0);
            match self.character_mode {
                CharacterMode::Upload => {
                    if ui
                        .add_enabled(!self.character_busy, egui::Button::new("Choose Image…"))
                        .clicked()
                    {
                        pick_upload = true;
                    }
                    ui.weak("Or drop an image anywhere in this window.");
                }
                CharacterMode::Describe => {
                    ui.add(
                        egui::TextEdit::multiline(&mut self.character_description)
                            .desired_rows(3)
                            .hint_text("Describe the character: species, outfit, mood, style…"),
                    );
                    if self.character_busy {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.weak("Generating character sheet…");
                        });
                    } else if ui.button("Generate Character").clicked() {
                        submit_describe = true;
                    }
                }
            }
            if let Some(err) = &self.character_error {
                ui.colored_label(egui::Color32::from_rgb(220, 80, 80), err);
            }
        }

        if pick_upload {
            self.character_pick_upload(ctx);
        }
        if submit_describe {
            self.character_submit_describe();
        }
        if clear_character {
            self.character_clear();
        }
    }

    pub(crate) fn character_pick_upload(&mut self, ctx: &egui::Context) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", media::SUPPORTED_IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.character_set_upload(ctx, path);
        }
    }

    pub(crate) fn character_set_upload(&mut self, ctx: &egui::Context, path: PathBuf) {
        let Some(mime_type) = media::mime_type_for_path(&path) else {
            self.push_alert(
                format!("{} is not a supported image file.", path.display()),
                AlertKind::Warning,
                Duration::from_secs(6),
            );
            return;
        };
        match media::load_uploaded_image(&path, mime_type) {
            Ok(uploaded) => {
                self.character_apply(ctx, uploaded.image, Some(uploaded.path));
            }
            Err(err) => {
                self.push_alert(
                    format!("Could not read {}: {err}", path.display()),
                    AlertKind::Warning,
                    Duration::from_secs(6),
                );
            }
        }
    }

    pub(crate) fn character_submit_describe(&mut self) {
        if self.character_busy {
            return;
        }
        let description = self.character_description.trim().to_string();
        if description.is_empty() {
            self.character_error = Some("Describe the character before generating.".to_string());
            return;
        }
        let service = match self.build_service() {
            Ok(service) => service,
            Err(err) => {
                self.character_error = Some(err.to_string());
                return;
            }
        };
        self.character_error = None;
        self.character_busy = true;

        let tx = self.event_tx.clone();
        std::thread::spawn(move || {
            let request = GenerationRequest::text(character_sheet_prompt(&description));
            let _ = tx.send(StudioEvent::CharacterGenerated(service.generate(&request)));
        });
    }

    pub(crate) fn character_generated(
        &mut self,
        ctx: &egui::Context,
        result: Result<ImageData, ProviderError>,
    ) {
        self.character_busy = false;
        match result {
            Ok(image) => self.character_apply(ctx, image, None),
            Err(err) => self.character_error = Some(err.to_string()),
        }
    }

    /// Install a new active reference. Panels generated against the previous
    /// reference are no longer valid, so the panel list is cleared.
    pub(crate) fn character_apply(
        &mut self,
        ctx: &egui::Context,
        image: ImageData,
        source_path: Option<PathBuf>,
    ) {
        match media::texture_from_image(ctx, "character-reference", &image) {
            Ok(tex) => self.character_tex = Some(tex),
            Err(msg) => {
                self.character_tex = None;
                tracing::warn!(target: "studio", "Character preview unavailable: {msg}");
            }
        }
        self.character = Some(CharacterReference { image, source_path });
        self.character_error = None;
        self.panels.clear();
        self.panel_textures.clear();
        self.storyboard_error = None;
        self.run_total = 0;
    }

    pub(crate) fn character_clear(&mut self) {
        if self.storyboard_busy {
            return;
        }
        self.character = None;
        self.character_tex = None;
        self.character_description.clear();
        self.character_error = None;
        self.panels.clear();
        self.panel_textures.clear();
        self.storyboard_error = None;
        self.run_total = 0;
    }
}
