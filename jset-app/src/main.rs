mod app;
mod app_dir;
mod config;
mod engine_loader;
mod presenter;

mod ui {
    pub(crate) mod help;
    pub(crate) mod settings;
    pub(crate) mod toolbar;
}

use eframe::egui;
use tracing::info;

use app::JsetApp;
use config::ViewerConfig;

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting jset");

    let config = ViewerConfig::load(&app_dir::config_path());

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("jset")
            .with_inner_size([config.window_width, config.window_height]),
        ..Default::default()
    };

    eframe::run_native(
        "jset",
        options,
        Box::new(move |cc| {
            egui_material_icons::initialize(&cc.egui_ctx);
            Ok(Box::new(JsetApp::new(&cc.egui_ctx, config)))
        }),
    )
}
