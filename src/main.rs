use eframe::egui;
use enviro_dash::app::ViewerApp;
use enviro_dash::config::{MIN_SIZE, VIEWER_SIZE};

fn main() -> eframe::Result {
    env_logger::init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(VIEWER_SIZE)
            .with_min_inner_size(MIN_SIZE),
        ..Default::default()
    };

    eframe::run_native(
        "Enviro Dash – Environmental Viewer",
        options,
        Box::new(|_cc| Ok(Box::new(ViewerApp::default()))),
    )
}
