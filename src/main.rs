mod app;
mod color;
mod state;
mod ui;

use app::RosterApp;
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = physician_roster::config::load_or_default();
    let title = config.title.clone();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&title)
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            // Install image loaders so egui can render the logo from disk.
            egui_extras::install_image_loaders(&cc.egui_ctx);
            Ok(Box::new(RosterApp::new(config)))
        }),
    )
}
