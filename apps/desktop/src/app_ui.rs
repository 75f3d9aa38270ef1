use crate::app::{AlertKind, App, WorkspaceView};
use eframe::egui;

pub(crate) fn top_bar(app: &mut App, ctx: &egui::Context) {
    egui::TopBottomPanel::top("studio_top_bar").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.heading("Storyboard Studio");
            ui.separator();
            let mut workspace = app.workspace;
            ui.selectable_value(&mut workspace, WorkspaceView::SingleImage, "Single Image");
            ui.selectable_value(&mut workspace, WorkspaceView::Storyboard, "Storyboard");
            // Switching never resets either workflow's state.
            app.workspace = workspace;
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Settings").clicked() {
                    app.show_settings = !app.show_settings;
                }
            });
        });
        if app.show_settings {
            settings_strip(app, ui);
        }
    });
}

fn settings_strip(app: &mut App, ui: &mut egui::Ui) {
    ui.separator();
    ui.horizontal(|ui| {
        ui.label("API key");
        ui.add(
            egui::TextEdit::singleline(&mut app.api_key)
                .password(true)
                .desired_width(260.0),
        );
        ui.label("Model");
        ui.add(egui::TextEdit::singleline(&mut app.model).desired_width(220.0));
    });
    ui.small("Defaults from the GEMINI_API_KEY environment variable; kept in memory only.");
    ui.add_space(4.0);
}

pub(crate) fn alerts_panel(app: &App, ctx: &egui::Context) {
    if app.alerts.is_empty() {
        return;
    }
    egui::TopBottomPanel::bottom("studio_alerts").show(ctx, |ui| {
        for alert in &app.alerts {
            let color = match alert.kind {
                AlertKind::Info => egui::Color32::from_rgb(80, 160, 240),
                AlertKind::Success => egui::Color32::from_rgb(80, 180, 120),
                AlertKind::Warning => egui::Color32::from_rgb(220, 80, 80),
            };
            ui.colored_label(color, &alert.message);
        }
    });
}

/// Scale a texture down to `max_width`, never up.
pub(crate) fn fitted_texture(ui: &mut egui::Ui, tex: &egui::TextureHandle, max_width: f32) {
    let size = tex.size();
    if size[0] > 0 && size[1] > 0 {
        let scale = (max_width / size[0] as f32).min(1.0);
        let desired = egui::vec2(size[0] as f32 * scale, size[1] as f32 * scale);
        let sized = egui::load::SizedTexture::from_handle(tex);
        ui.add(egui::Image::from_texture(sized).fit_to_exact_size(desired));
    } else {
        ui.weak("Preview unavailable.");
    }
}
