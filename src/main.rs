//! ML Canvas - Main Entry Point
//!
//! Desktop editor for machine-learning pipelines backed by a REST service.

use std::sync::Arc;

use anyhow::Context;
use mlcanvas::{
    config::{FileStore, SessionStore},
    ApiBackend, AppConfig, ComponentLibrary, HttpApi, MlCanvasApp, PipelineApi,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,mlcanvas=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting ML Canvas");

    let config = AppConfig::load_or_default();
    if mlcanvas::config::config_path().is_some_and(|p| !p.exists()) {
        if let Err(e) = config.save_default() {
            tracing::warn!("Could not write default settings: {}", e);
        }
    }
    tracing::info!("Backend at {}", config.api.base_url);

    let api: Arc<dyn PipelineApi> =
        Arc::new(HttpApi::new(&config.api).context("Failed to build HTTP client")?);
    let library = Arc::new(ComponentLibrary::builtin());

    let store: Option<Arc<dyn SessionStore>> = match FileStore::default_location() {
        Ok(store) => Some(Arc::new(store)),
        Err(e) => {
            tracing::warn!("Session recovery disabled: {}", e);
            None
        }
    };

    let (backend, frontend) = ApiBackend::new(config.clone(), api, Arc::clone(&library));
    let backend_handle = std::thread::Builder::new()
        .name("mlcanvas-backend".into())
        .spawn(move || backend.run())
        .context("Failed to spawn backend thread")?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 860.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("ML Canvas"),
        ..Default::default()
    };

    let result = eframe::run_native(
        "ML Canvas",
        native_options,
        Box::new(|cc| {
            let mut style = (*cc.egui_ctx.style()).clone();
            style.visuals.window_shadow.offset = [0, 0];
            cc.egui_ctx.set_style(style);

            Ok(Box::new(MlCanvasApp::new(
                cc, frontend, config, library, store,
            )))
        }),
    );

    tracing::info!("Shutting down...");
    if backend_handle.join().is_err() {
        tracing::warn!("Backend thread panicked");
    }

    result.map_err(|e| anyhow::anyhow!("UI error: {e}"))
}
