use eframe::egui;
use enigh_dashboard::app::DashboardApp;
use enigh_dashboard::config::DashboardConfig;

fn main() -> eframe::Result {
    env_logger::init();

    // Resolved once; every view reads from this base directory.
    let config = DashboardConfig::from_env();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Dashboard ENIGH - IER",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(config)))),
    )
}
