use eframe::egui;
use tracing_subscriber::EnvFilter;

mod app;
mod app_character;
mod app_single_image;
mod app_storyboard;
mod app_ui;
mod media;

use app::App;

fn main() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1180.0, 780.0]),
        ..eframe::NativeOptions::default()
    };
    let _ = eframe::run_native(
        "Storyboard Studio",
        options,
        Box::new(move |_cc| Ok(Box::new(App::new()))),
    );
}
