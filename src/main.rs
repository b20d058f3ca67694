mod analysis;
mod api;
mod app;
mod chat;
mod config;
mod controller;
mod error;
mod event;
mod session;
mod theme;
mod ui;
mod view;

use anyhow::{anyhow, Context as _};
use api::{Dispatcher, HttpBackend};
use app::CivicApp;
use config::AppConfig;
use controller::Controller;
use eframe::egui;
use std::sync::{mpsc, Arc};
use tracing::info;
use tracing_subscriber::EnvFilter;

const LOG_FILTER_ENV: &str = "CIVICMATE_LOG_FILTER";

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn main() -> anyhow::Result<()> {
    let config = AppConfig::load_with_dotenv().context("failed to load configuration")?;
    init_tracing(&config.log.level);
    info!(base_url = %config.api.base_url, "starting civicmate");

    let (tx, rx) = mpsc::channel();

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("civicmate-runtime")
        .build()
        .context("failed to start async runtime")?;

    let backend = HttpBackend::from_config(&config).context("failed to build HTTP client")?;
    let backend_url = backend.base_url().to_string();
    let dispatcher = Dispatcher::new(Arc::new(backend), runtime.handle().clone(), tx);
    let controller = Controller::new(config.ui.default_language.clone(), config.ui.languages.clone());
    let _runtime = runtime;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "CivicMate",
        native_options,
        Box::new(move |creation_context| {
            dispatcher.attach_context(&creation_context.egui_ctx);
            let app = CivicApp::new(rx, dispatcher, controller, backend_url);
            app.theme().apply_visuals(&creation_context.egui_ctx);
            Ok(Box::new(app))
        }),
    )
    .map_err(|err| anyhow!("window error: {err}"))?;

    Ok(())
}
