use crate::app::{AlertKind, App, StudioEvent, ASPECT_RATIO_OPTIONS};
use crate::app_ui;
use crate::media;
use eframe::egui;
use genimage::{GenerationRequest, ImageData, ProviderError};
use std::path::PathBuf;
use std::time::Duration;

impl App {
    pub(crate) fn single_image_workspace(&mut self, ctx: &egui::Context) {
        let mut pick_input = false;
        let mut clear_input = false;
        let mut submit = false;
        let mut save_output = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Single Image");
            ui.separator();
            ui.columns(2, |columns| {
                columns[0].vertical(|ui| {
                    ui.label(egui::RichText::new("Input Image").strong());
                    ui.add_space(4.0);
                    ui.horizontal(|ui| {
                        if ui
                            .add_enabled(!self.single_busy, egui::Button::new("Upload…"))
                            .clicked()
                        {
                            pick_input = true;
                        }
                        let has_input = self.single_input.is_some();
                        if ui
                            .add_enabled(has_input && !self.single_busy, egui::Button::new("Clear"))
                            .clicked()
                        {
                            clear_input = true;
                        }
                    });
                    ui.add_space(4.0);
                    if let Some(tex) = &self.single_input_tex {
                        app_ui::fitted_texture(ui, tex, 320.0);
                    } else {
                        ui.weak("No input image. The prompt alone drives generation.");
                    }
                    if let Some(input) = &self.single_input {
                        ui.small(input.path.display().to_string());
                    }
                    ui.add_space(8.0);
                    ui.label(egui::RichText::new("Aspect Ratio").strong());
                    let selected_label = ASPECT_RATIO_OPTIONS
                        .iter()
                        .find(|(_, value)| *value == self.single_aspect)
                        .map(|(label, _)| *label)
                        .unwrap_or("Model default");
                    egui::ComboBox::from_id_salt("single_image_aspect")
                        .selected_text(selected_label)
                        .show_ui(ui, |combo| {
                            for (label, value) in ASPECT_RATIO_OPTIONS {
                                if combo
                                    .selectable_label(self.single_aspect == *value, *label)
                                    .clicked()
                                {
                                    self.single_aspect = *value;
                                }
                            }
                        });
                });

                columns[1].vertical(|ui| {
                    ui.label(egui::RichText::new("Prompt").strong());
                    ui.add(
                        egui::TextEdit::multiline(&mut self.single_prompt)
                            .desired_rows(4)
                            .hint_text(
                                "Describe the image to generate, or the edit to apply \
                                 to the input image",
                            ),
                    );
                    ui.add_space(6.0);
                    if ui
                        .add_enabled(!self.single_busy, egui::Button::new("Generate"))
                        .clicked()
                    {
                        submit = true;
                    }
                    if let Some(err) = &self.single_error {
                        ui.colored_label(egui::Color32::from_rgb(220, 80, 80), err);
                    }
                    ui.add_space(8.0);
                    ui.label(egui::RichText::new("Result").strong());
                    // Exactly one of pending indicator, output image, or the
                    // empty placeholder is on screen.
                    if self.single_busy {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.weak("Generating image…");
                        });
                    } else if let Some(tex) = &self.single_output_tex {
                        app_ui::fitted_texture(ui, tex, 540.0);
                        if ui.button("Save…").clicked() {
                            save_output = true;
                        }
                    } else if self.single_output.is_some() {
                        ui.weak("Preview unavailable.");
                        if ui.button("Save…").clicked() {
                            save_output = true;
                        }
                    } else {
                        ui.weak("The generated image will appear here.");
                    }
                });
            });
        });

        if pick_input {
            self.single_image_pick_input(ctx);
        }
        if clear_input {
            self.single_image_clear_input();
        }
        if submit {
            self.single_image_submit();
        }
        if save_output {
            self.single_image_save_output();
        }
    }

    pub(crate) fn single_image_pick_input(&mut self, ctx: &egui::Context) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Images", media::SUPPORTED_IMAGE_EXTENSIONS)
            .pick_file()
        {
            self.single_image_set_input(ctx, path);
        }
    }

    pub(crate) fn single_image_set_input(&mut self, ctx: &egui::Context, path: PathBuf) {
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
                match media::texture_from_image(ctx, "single-image-input", &uploaded.image) {
                    Ok(tex) => self.single_input_tex = Some(tex),
                    Err(msg) => {
                        self.single_input_tex = None;
                        tracing::warn!(target: "studio", "Input preview unavailable: {msg}");
                    }
                }
                self.single_input = Some(uploaded);
                // A new input invalidates the previous result, not the prompt.
                self.single_output = None;
                self.single_output_tex = None;
                self.single_error = None;
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

    pub(crate) fn single_image_clear_input(&mut self) {
        self.single_input = None;
        self.single_input_tex = None;
        self.single_output = None;
        self.single_output_tex = None;
        self.single_error = None;
    }

    pub(crate) fn single_image_submit(&mut self) {
        if self.single_busy {
            return;
        }
        if self.single_prompt.trim().is_empty() {
            self.single_error = Some("Prompt cannot be empty.".to_string());
            return;
        }
        let service = match self.build_service() {
            Ok(service) => service,
            Err(err) => {
                self.single_error = Some(err.to_string());
                return;
            }
        };
        self.single_error = None;
        self.single_output = None;
        self.single_output_tex = None;
        self.single_busy = true;

        let mut request = GenerationRequest::text(self.single_prompt.trim());
        if let Some(input) = &self.single_input {
            request.reference = Some(input.image.clone());
        }
        if !self.single_aspect.is_empty() {
            request.aspect_ratio = Some(self.single_aspect.to_string());
        }
        let tx = self.event_tx.clone();
        std::thread::spawn(move || {
            let result = service.generate(&request);
            let _ = tx.send(StudioEvent::SingleImageFinished(result));
        });
    }

    pub(crate) fn single_image_finished(
        &mut self,
        ctx: &egui::Context,
        result: Result<ImageData, ProviderError>,
    ) {
        self.single_busy = false;
        match result {
            Ok(image) => {
                match media::texture_from_image(ctx, "single-image-output", &image) {
                    Ok(tex) => self.single_output_tex = Some(tex),
                    Err(msg) => {
                        self.single_output_tex = None;
                        tracing::warn!(target: "studio", "Output preview unavailable: {msg}");
                    }
                }
                self.single_output = Some(image);
                self.single_error = None;
            }
            Err(err) => {
                self.single_output = None;
                self.single_output_tex = None;
                self.single_error = Some(err.to_string());
            }
        }
    }

    pub(crate) fn single_image_save_output(&mut self) {
        let Some(output) = self.single_output.clone() else {
            return;
        };
        let extension = media::extension_for_mime(&output.mime_type);
        if let Some(path) = rfd::FileDialog::new()
            .set_file_name(format!("generated.{extension}"))
            .save_file()
        {
            match media::save_image_data(&output, &path) {
                Ok(()) => self.push_alert(
                    format!("Saved {}", path.display()),
                    AlertKind::Success,
                    Duration::from_secs(5),
                ),
                Err(err) => self.push_alert(
                    format!("Save failed: {err}"),
                    AlertKind::Warning,
                    Duration::from_secs(6),
                ),
            }
        }
    }
}
