use crate::app::{AlertKind, App};
use crate::app_ui;
use crate::media;
use eframe::egui;
use std::time::Duration;
use storyboard::{parse_script, run_panels, PanelState, RunEvent};

impl App {
    pub(crate) fn storyboard_workspace(&mut self, ctx: &egui::Context) {
        let mut submit = false;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Storyboard");
            ui.separator();

            self.character_section(ctx, ui);

            ui.add_space(8.0);
            ui.separator();
            ui.label(egui::RichText::new("Script").strong());
            ui.add(
                egui::TextEdit::multiline(&mut self.script)
                    .desired_rows(6)
                    .hint_text("One panel per line: SCENE DESCRIPTION | optional caption"),
            );
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(
                        !self.storyboard_busy,
                        egui::Button::new("Generate Storyboard"),
                    )
                    .clicked()
                {
                    submit = true;
                }
                if self.storyboard_busy {
                    ui.spinner();
                    let finished = self
                        .panels
                        .iter()
                        .filter(|panel| !matches!(panel.state, PanelState::Pending))
                        .count();
                    ui.weak(format!(
                        "Generating panel {} of {}…",
                        (finished + 1).min(self.run_total.max(1)),
                        self.run_total
                    ));
                }
            });
            if let Some(err) = &self.storyboard_error {
                ui.colored_label(egui::Color32::from_rgb(220, 80, 80), err);
            }

            ui.add_space(8.0);
            ui.separator();
            egui::ScrollArea::vertical()
                .id_salt("storyboard_panels_scroll")
                .auto_shrink([false; 2])
                .show(ui, |scroll| {
                    if self.panels.is_empty() {
                        if !self.storyboard_busy {
                            scroll.weak("Panels appear here, one per script line.");
                        }
                        return;
                    }
                    scroll.horizontal_wrapped(|row| {
                        for (idx, panel) in self.panels.iter().enumerate() {
                            row.group(|tile| {
                                tile.set_width(230.0);
                                tile.vertical(|tile| {
                                    tile.label(
                                        egui::RichText::new(format!("{:02}", idx + 1)).strong(),
                                    );
                                    match &panel.state {
                                        PanelState::Pending => {
                                            tile.spinner();
                                            tile.weak("Generating…");
                                        }
                                        PanelState::Completed(_) => {
                                            if let Some(tex) = self.panel_textures.get(&panel.id) {
                                                app_ui::fitted_texture(tile, tex, 210.0);
                                            } else {
                                                tile.weak("Preview unavailable.");
                                            }
                                        }
                                        PanelState::Failed(msg) => {
                                            tile.colored_label(
                                                egui::Color32::from_rgb(220, 80, 80),
                                                msg,
                                            );
                                        }
                                    }
                                    tile.small(panel.line.trim());
                                });
                            });
                        }
                    });
                });
        });

        if submit {
            self.storyboard_submit();
        }
    }

    pub(crate) fn storyboard_submit(&mut self) {
        if self.storyboard_busy {
            return;
        }
        let Some(character) = self.character.as_ref() else {
            self.storyboard_error =
                Some("Add a character reference before generating the storyboard.".to_string());
            return;
        };
        if self.script.trim().is_empty() {
            self.storyboard_error = Some("Script is empty. Add one line per panel.".to_string());
            return;
        }
        let service = match self.build_service() {
            Ok(service) => service,
            Err(err) => {
                self.storyboard_error = Some(err.to_string());
                return;
            }
        };

        let lines = parse_script(&self.script);
        let character_image = character.image.clone();
        self.panels.clear();
        self.panel_textures.clear();
        self.storyboard_error = None;
        self.storyboard_busy = true;
        self.run_total = lines.len();
        tracing::info!(
            target: "studio",
            "Starting storyboard run with {} panel(s)",
            lines.len()
        );

        let tx = self.panel_tx.clone();
        std::thread::spawn(move || {
            let provider = service.provider();
            if let Err(err) = run_panels(provider.as_ref(), &character_image, &lines, &tx) {
                tracing::error!(target: "studio", "Storyboard run ended early: {err}");
            }
        });
    }

    pub(crate) fn storyboard_handle_event(&mut self, ctx: &egui::Context, event: RunEvent) {
        match event {
            RunEvent::PanelQueued { index, panel } => {
                if index == self.panels.len() {
                    self.panels.push(panel);
                } else {
                    tracing::warn!(
                        target: "studio",
                        "Out-of-order panel placeholder at index {index} ignored"
                    );
                }
            }
            RunEvent::PanelFinished { index, panel } => {
                if let PanelState::Completed(image) = &panel.state {
                    match media::texture_from_image(ctx, &format!("panel-{}", panel.id), image) {
                        Ok(tex) => {
                            self.panel_textures.insert(panel.id, tex);
                        }
                        Err(msg) => {
                            tracing::warn!(target: "studio", "Panel preview unavailable: {msg}");
                        }
                    }
                }
                if let Some(slot) = self.panels.get_mut(index) {
                    *slot = panel;
                }
            }
            RunEvent::RunCompleted { total } => {
                self.storyboard_busy = false;
                self.push_alert(
                    format!(
                        "Storyboard complete: {} panel{}.",
                        total,
                        if total == 1 { "" } else { "s" }
                    ),
                    AlertKind::Success,
                    Duration::from_secs(5),
                );
            }
            RunEvent::RunFailed { message } => {
                self.storyboard_busy = false;
                self.storyboard_error = Some(message);
            }
        }
    }
}
