#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::sync::Arc;
use std::time::Duration;

use eframe::egui;
use mimalloc::MiMalloc;
use tokio::sync::Mutex;

use prodquery_lib::client::ServiceClient;
use prodquery_lib::config::{self, ConfigState};
use prodquery_lib::events;
use prodquery_lib::i18n::{self, Language};
use prodquery_lib::monitor;
use prodquery_lib::ui::LookupApp;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn get_app_data_dir() -> std::path::PathBuf {
    let base = std::env::var("APPDATA")
        .or_else(|_| std::env::var("XDG_DATA_HOME"))
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            format!("{}/.local/share", home)
        });
    std::path::PathBuf::from(base).join("com.prodquery.app")
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // ── Config ──
    let config_dir = get_app_data_dir();
    std::fs::create_dir_all(&config_dir).ok();
    let config_path = config_dir.join("config.json");
    let config = config::load_config(&config_path);

    let locale = if config.locale == "auto" {
        i18n::detect_system_language()
    } else {
        Language::from_code(&config.locale)
    };
    let engine = config.browser;
    let download_url = config.download_url.clone();
    let client_installed = config.client_installed;
    let poll_interval = Duration::from_secs(config.poll_interval_secs.max(1));
    let endpoint = config.service_endpoint.clone();

    // ── Tokio runtime ──
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to create tokio runtime");

    // ── State ──
    let client = Arc::new(ServiceClient::new(endpoint));
    let config_state = ConfigState {
        config: Arc::new(Mutex::new(config)),
        path: config_path,
    };

    // ── Event channel + health poll ──
    let (event_tx, event_rx) = events::channel();
    let _monitor = monitor::spawn(runtime.handle(), client.clone(), poll_interval, event_tx);

    // ── eframe window ──
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([920.0, 640.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    let rt_handle = runtime.handle().clone();
    let title = i18n::ts(locale, "app_title");

    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            Ok(Box::new(LookupApp::new(
                cc,
                client,
                config_state,
                event_rx,
                rt_handle,
                locale,
                engine,
                download_url,
                client_installed,
            )))
        }),
    )
    .expect("Failed to run eframe application");
}
