use eframe::egui;

use crate::i18n::{self, Language};
use crate::state::{Affordances, BrowserEngine, Busy, InitLabel};

use super::style;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    Single,
    Batch,
}

pub enum QueryAction {
    None,
    Initialize,
    RunSingle,
    RunBatch,
    EngineChanged,
}

fn init_button_text(affordances: Affordances, busy: Busy, locale: Language) -> String {
    if busy.initializing {
        return i18n::ts(locale, "init_running");
    }
    let key = match affordances.init_label {
        InitLabel::NotConnected => "init_not_connected",
        InitLabel::Initialize => "init_start",
        InitLabel::Reinitialize => "init_again",
    };
    i18n::ts(locale, key)
}

pub fn show(
    ui: &mut egui::Ui,
    mode: &mut QueryMode,
    single_input: &mut String,
    batch_input: &mut String,
    engine: &mut BrowserEngine,
    affordances: Affordances,
    busy: Busy,
    locale: Language,
) -> QueryAction {
    let mut action = QueryAction::None;

    // ── Engine selection + initialize ──
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(i18n::ts(locale, "engine_label"))
                .size(12.0)
                .color(style::TEXT_SECONDARY),
        );

        let previous = *engine;
        ui.add_enabled_ui(affordances.engine_select_enabled, |ui| {
            egui::ComboBox::from_id_salt("engine_select")
                .selected_text(engine.label())
                .show_ui(ui, |ui| {
                    for candidate in BrowserEngine::ALL {
                        ui.selectable_value(engine, candidate, candidate.label());
                    }
                });
        });
        if *engine != previous {
            action = QueryAction::EngineChanged;
        }

        let init_clicked = ui
            .add_enabled(
                affordances.init_enabled,
                egui::Button::new(init_button_text(affordances, busy, locale)),
            )
            .clicked();
        if init_clicked {
            action = QueryAction::Initialize;
        }
    });

    ui.add_space(8.0);

    // ── Mode toggle ──
    ui.horizontal(|ui| {
        ui.radio_value(mode, QueryMode::Single, i18n::ts(locale, "mode_single"));
        ui.radio_value(mode, QueryMode::Batch, i18n::ts(locale, "mode_batch"));
    });

    ui.add_space(4.0);

    match mode {
        QueryMode::Single => {
            ui.horizontal(|ui| {
                let response = ui.add_enabled(
                    affordances.query_enabled,
                    egui::TextEdit::singleline(single_input)
                        .hint_text(
                            egui::RichText::new(i18n::ts(locale, "single_placeholder"))
                                .color(style::TEXT_DISABLED),
                        )
                        .desired_width(320.0),
                );

                let submitted = response.lost_focus()
                    && ui.input(|i| i.key_pressed(egui::Key::Enter));

                let clicked = ui
                    .add_enabled(
                        affordances.query_enabled,
                        egui::Button::new(i18n::ts(locale, "query_button")),
                    )
                    .clicked();

                if (submitted || clicked) && affordances.query_enabled {
                    action = QueryAction::RunSingle;
                }
            });
        }
        QueryMode::Batch => {
            ui.add_enabled(
                affordances.query_enabled,
                egui::TextEdit::multiline(batch_input)
                    .hint_text(
                        egui::RichText::new(i18n::ts(locale, "batch_placeholder"))
                            .color(style::TEXT_DISABLED),
                    )
                    .desired_rows(8)
                    .desired_width(f32::INFINITY),
            );

            let clicked = ui
                .add_enabled(
                    affordances.query_enabled,
                    egui::Button::new(i18n::ts(locale, "batch_button")),
                )
                .clicked();
            if clicked {
                action = QueryAction::RunBatch;
            }
        }
    }

    action
}
