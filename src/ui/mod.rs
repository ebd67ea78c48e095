mod download_panel;
mod query_panel;
mod results_table;
mod status_bar;
mod style;

use std::sync::Arc;
use std::time::{Duration, Instant};

use eframe::egui;

use crate::client::{QueryOutcome, ServiceClient};
use crate::commands::{self, BatchReport, CommandError};
use crate::config::ConfigState;
use crate::events::{AppEvent, EventReceiver};
use crate::export;
use crate::i18n::{self, Language};
use crate::monitor::HealthTracker;
use crate::state::{Affordances, BrowserEngine, Busy, ResultRecord};

use self::download_panel::DownloadAction;
use self::query_panel::{QueryAction, QueryMode};
use self::results_table::TableAction;
use self::status_bar::StatusKind;

/// Replies sent from spawned tasks back to the UI loop.
enum AsyncResponse {
    InitDone {
        engine: BrowserEngine,
        result: Result<(), CommandError>,
    },
    SingleDone(Result<QueryOutcome, CommandError>),
    BatchDone(Result<BatchReport, CommandError>),
    ConfigSaved(Result<(), String>),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Query,
    Download,
}

/// How long a completed action's message stays on the status line.
const STATUS_TTL: Duration = Duration::from_secs(3);

pub struct LookupApp {
    // UI state
    active_tab: Tab,
    query_mode: QueryMode,
    single_input: String,
    batch_input: String,
    engine: BrowserEngine,
    results: Vec<ResultRecord>,
    status: String,
    status_kind: StatusKind,
    status_clear_at: Option<Instant>,
    advisory: Option<String>,
    busy: Busy,
    health: HealthTracker,
    client_installed: bool,
    locale: Language,
    download_url: String,

    // Shared with the spawned tasks
    client: Arc<ServiceClient>,
    config_state: ConfigState,

    // Channels
    event_rx: EventReceiver,
    async_tx: std::sync::mpsc::Sender<AsyncResponse>,
    async_rx: std::sync::mpsc::Receiver<AsyncResponse>,

    runtime: tokio::runtime::Handle,
}

impl LookupApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        client: Arc<ServiceClient>,
        config_state: ConfigState,
        event_rx: EventReceiver,
        runtime: tokio::runtime::Handle,
        locale: Language,
        engine: BrowserEngine,
        download_url: String,
        client_installed: bool,
    ) -> Self {
        let (async_tx, async_rx) = std::sync::mpsc::channel();

        Self {
            active_tab: Tab::Query,
            query_mode: QueryMode::Single,
            single_input: String::new(),
            batch_input: String::new(),
            engine,
            results: Vec::new(),
            status: String::new(),
            status_kind: StatusKind::Info,
            status_clear_at: None,
            advisory: None,
            busy: Busy::default(),
            health: HealthTracker::default(),
            client_installed,
            locale,
            download_url,

            client,
            config_state,

            event_rx,
            async_tx,
            async_rx,

            runtime,
        }
    }

    fn advisory_text(&self) -> String {
        let key = if self.client_installed {
            "advisory_reinstall"
        } else {
            "advisory_first_use"
        };
        i18n::ts(self.locale, key)
    }

    fn finish_status(&mut self, status: String, kind: StatusKind) {
        self.status = status;
        self.status_kind = kind;
        self.status_clear_at = Some(Instant::now() + STATUS_TTL);
    }

    /// Status shown while a request is in flight; stays until completion
    /// replaces it.
    fn progress_status(&mut self, status: String) {
        self.status = status;
        self.status_kind = StatusKind::Info;
        self.status_clear_at = None;
    }

    fn validation_status(&self, err: &CommandError) -> Option<(String, StatusKind)> {
        let key = match err {
            CommandError::NotConnected => "err_not_connected",
            CommandError::NotInitialized => "err_not_initialized",
            CommandError::EmptyCode => "err_empty_code",
            CommandError::EmptyBatch => "err_empty_batch",
            CommandError::BatchTooLarge(count) => {
                return Some((
                    i18n::t(
                        self.locale,
                        "err_batch_too_large",
                        &[("count", &count.to_string())],
                    ),
                    StatusKind::Warning,
                ));
            }
            CommandError::Service(_) | CommandError::Transport(_) => return None,
        };
        let kind = match err {
            CommandError::NotConnected => StatusKind::Error,
            _ => StatusKind::Warning,
        };
        Some((i18n::ts(self.locale, key), kind))
    }

    /// Maps a command failure to its status line, wrapping service/transport
    /// messages with the action's own failure wording.
    fn failure_status(&self, err: &CommandError, wrap_key: &str) -> (String, StatusKind) {
        match self.validation_status(err) {
            Some(pair) => pair,
            None => (
                i18n::t(self.locale, wrap_key, &[("error", &err.to_string())]),
                StatusKind::Error,
            ),
        }
    }

    fn poll_events(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.event_rx.try_recv() {
            match event {
                AppEvent::Health { generation, health } => {
                    if self.health.apply(generation, health) {
                        self.advisory = if health.reachable {
                            None
                        } else {
                            Some(self.advisory_text())
                        };
                    }
                }
            }
            ctx.request_repaint();
        }

        while let Ok(resp) = self.async_rx.try_recv() {
            match resp {
                AsyncResponse::InitDone { engine, result } => {
                    // Restore the control on every exit path.
                    self.busy.initializing = false;
                    match result {
                        Ok(()) => {
                            self.health.set_browser_ready(true);
                            let status = i18n::t(
                                self.locale,
                                "status_init_ok",
                                &[("browser", engine.label())],
                            );
                            self.finish_status(status, StatusKind::Success);
                        }
                        Err(e) => {
                            self.health.set_browser_ready(false);
                            let (status, kind) = self.failure_status(&e, "status_init_failed");
                            self.finish_status(status, kind);
                        }
                    }
                }
                AsyncResponse::SingleDone(result) => {
                    self.busy.querying = false;
                    match result {
                        Ok(QueryOutcome::Success(record)) => {
                            self.results = vec![record];
                            // Input is cleared only on success.
                            self.single_input.clear();
                            let status = i18n::ts(self.locale, "status_query_ok");
                            self.finish_status(status, StatusKind::Success);
                        }
                        Ok(QueryOutcome::NeedCaptcha) => {
                            let status = i18n::ts(self.locale, "status_need_captcha");
                            self.finish_status(status, StatusKind::Warning);
                        }
                        Ok(QueryOutcome::NotFound) => {
                            let status = i18n::ts(self.locale, "status_not_found");
                            self.finish_status(status, StatusKind::Warning);
                        }
                        Ok(QueryOutcome::Failure(msg)) => {
                            let status = i18n::t(
                                self.locale,
                                "status_query_failed",
                                &[("error", &msg)],
                            );
                            self.finish_status(status, StatusKind::Error);
                        }
                        Err(e) => {
                            let (status, kind) = self.failure_status(&e, "status_query_failed");
                            self.finish_status(status, kind);
                        }
                    }
                }
                AsyncResponse::BatchDone(result) => {
                    self.busy.querying = false;
                    match result {
                        Ok(report) => {
                            let ok = report.succeeded();
                            let failed = report.failed();
                            if ok > 0 {
                                self.results = report.records();
                                self.batch_input.clear();
                            }
                            let status = i18n::t(
                                self.locale,
                                "status_batch_done",
                                &[("ok", &ok.to_string()), ("failed", &failed.to_string())],
                            );
                            let kind = if ok > 0 {
                                StatusKind::Success
                            } else {
                                StatusKind::Warning
                            };
                            self.finish_status(status, kind);
                        }
                        Err(e) => {
                            let (status, kind) = self.failure_status(&e, "status_batch_failed");
                            self.finish_status(status, kind);
                        }
                    }
                }
                AsyncResponse::ConfigSaved(result) => {
                    if let Err(msg) = result {
                        self.finish_status(msg, StatusKind::Error);
                    }
                }
            }
            ctx.request_repaint();
        }

        if let Some(clear_at) = self.status_clear_at {
            if Instant::now() >= clear_at {
                self.status.clear();
                self.status_clear_at = None;
                ctx.request_repaint();
            }
        }
    }

    fn start_initialize(&mut self) {
        if self.busy.initializing {
            return;
        }
        self.busy.initializing = true;
        self.progress_status(i18n::ts(self.locale, "init_running"));

        let client = self.client.clone();
        let engine = self.engine;
        let health = self.health.current();
        let tx = self.async_tx.clone();
        self.runtime.spawn(async move {
            let result = commands::initialize_browser(&client, engine, health).await;
            let _ = tx.send(AsyncResponse::InitDone { engine, result });
        });
    }

    fn start_single(&mut self) {
        if self.busy.querying {
            return;
        }
        self.busy.querying = true;
        let code = self.single_input.trim().to_string();
        self.progress_status(i18n::t(self.locale, "query_running", &[("code", &code)]));

        let client = self.client.clone();
        let raw = self.single_input.clone();
        let health = self.health.current();
        let tx = self.async_tx.clone();
        self.runtime.spawn(async move {
            let result = commands::query_single(&client, &raw, health).await;
            let _ = tx.send(AsyncResponse::SingleDone(result));
        });
    }

    fn start_batch(&mut self) {
        if self.busy.querying {
            return;
        }
        self.busy.querying = true;
        let count = self
            .batch_input
            .lines()
            .filter(|line| !line.trim().is_empty())
            .count();
        self.progress_status(i18n::t(
            self.locale,
            "batch_running",
            &[("count", &count.to_string())],
        ));

        let client = self.client.clone();
        let raw = self.batch_input.clone();
        let health = self.health.current();
        let tx = self.async_tx.clone();
        self.runtime.spawn(async move {
            let result = commands::query_batch(&client, &raw, health).await;
            let _ = tx.send(AsyncResponse::BatchDone(result));
        });
    }

    fn engine_changed(&mut self) {
        // A different engine invalidates the running session; queries stay
        // disabled until the user reinitializes.
        if self.health.current().browser_ready {
            self.health.set_browser_ready(false);
            let status = i18n::ts(self.locale, "engine_changed");
            self.finish_status(status, StatusKind::Warning);
        }
    }

    fn export_results(&mut self) {
        if self.results.is_empty() {
            let status = i18n::ts(self.locale, "export_no_data");
            self.finish_status(status, StatusKind::Warning);
            return;
        }

        let stem = i18n::ts(self.locale, "export_file_stem");
        let suggested = export::suggested_filename(&stem, chrono::Local::now());
        let picked = rfd::FileDialog::new()
            .set_title(i18n::ts(self.locale, "export_dialog_title"))
            .set_file_name(&suggested)
            .add_filter("Excel", &["xlsx"])
            .save_file();

        if let Some(path) = picked {
            let sheet = i18n::ts(self.locale, "export_sheet");
            match export::write_records(&self.results, &sheet, &path) {
                Ok(()) => {
                    let status = i18n::t(
                        self.locale,
                        "export_done",
                        &[("path", &path.display().to_string())],
                    );
                    self.finish_status(status, StatusKind::Success);
                }
                Err(e) => {
                    let status = i18n::t(
                        self.locale,
                        "export_failed",
                        &[("error", &e.to_string())],
                    );
                    self.finish_status(status, StatusKind::Error);
                }
            }
        }
    }

    fn download_client(&mut self) {
        if let Err(e) = open::that(&self.download_url) {
            self.finish_status(e.to_string(), StatusKind::Error);
            return;
        }

        self.client_installed = true;
        if self.advisory.is_some() {
            self.advisory = Some(self.advisory_text());
        }
        let status = i18n::ts(self.locale, "download_started");
        self.finish_status(status, StatusKind::Info);

        let config_state = ConfigState {
            config: self.config_state.config.clone(),
            path: self.config_state.path.clone(),
        };
        let tx = self.async_tx.clone();
        self.runtime.spawn(async move {
            let _ = tx.send(AsyncResponse::ConfigSaved(
                config_state.mark_client_installed().await,
            ));
        });
    }

    fn cycle_locale(&mut self) {
        self.locale = self.locale.cycle();
        if self.advisory.is_some() {
            self.advisory = Some(self.advisory_text());
        }
        let config = self.config_state.config.clone();
        let path = self.config_state.path.clone();
        let code = self.locale.code().to_string();
        self.runtime.spawn(async move {
            let mut c = config.lock().await;
            c.locale = code;
            drop(c);
            let cs = ConfigState { config, path };
            let _ = cs.save().await;
        });
    }
}

impl eframe::App for LookupApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_events(ctx);
        style::apply(ctx);

        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new(i18n::ts(self.locale, "app_title"))
                        .size(15.0)
                        .color(style::ACCENT)
                        .strong(),
                );
                ui.separator();
                ui.selectable_value(
                    &mut self.active_tab,
                    Tab::Query,
                    i18n::ts(self.locale, "tab_query"),
                );
                ui.selectable_value(
                    &mut self.active_tab,
                    Tab::Download,
                    i18n::ts(self.locale, "tab_download"),
                );

                let mut locale_clicked = false;
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    locale_clicked = ui.small_button(self.locale.cycle().label()).clicked();
                    status_bar::badge(ui, self.health.current(), self.locale);
                });
                if locale_clicked {
                    self.cycle_locale();
                }
            });
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("status_line").show(ctx, |ui| {
            status_bar::show(
                ui,
                &self.status,
                self.status_kind,
                self.busy.initializing || self.busy.querying,
            );
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let advisory = self.advisory.clone();
            if let Some(text) = advisory {
                status_bar::advisory(ui, &text);
            }

            match self.active_tab {
                Tab::Query => {
                    let affordances = Affordances::derive(self.health.current(), self.busy);
                    let action = query_panel::show(
                        ui,
                        &mut self.query_mode,
                        &mut self.single_input,
                        &mut self.batch_input,
                        &mut self.engine,
                        affordances,
                        self.busy,
                        self.locale,
                    );
                    match action {
                        QueryAction::None => {}
                        QueryAction::Initialize => self.start_initialize(),
                        QueryAction::RunSingle => self.start_single(),
                        QueryAction::RunBatch => self.start_batch(),
                        QueryAction::EngineChanged => self.engine_changed(),
                    }

                    ui.add_space(4.0);
                    if let TableAction::Export = results_table::show(ui, &self.results, self.locale)
                    {
                        self.export_results();
                    }
                }
                Tab::Download => {
                    if let DownloadAction::Download =
                        download_panel::show(ui, &self.download_url, self.locale)
                    {
                        self.download_client();
                    }
                }
            }
        });

        // Keep polling the channels even without input events.
        ctx.request_repaint_after(Duration::from_millis(200));
    }
}
