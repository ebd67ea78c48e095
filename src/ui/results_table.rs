use eframe::egui;

use crate::i18n::{self, Language};
use crate::state::{display_value, ResultRecord};

use super::style;

pub enum TableAction {
    None,
    Export,
}

/// Renders the current result set as a striped grid. The column set is the
/// first record's field set in wire order; later records missing a field get
/// an empty cell, extra fields are not shown.
pub fn show(ui: &mut egui::Ui, records: &[ResultRecord], locale: Language) -> TableAction {
    let mut action = TableAction::None;

    if records.is_empty() {
        return action;
    }

    ui.add_space(8.0);
    ui.horizontal(|ui| {
        ui.label(
            egui::RichText::new(i18n::ts(locale, "results_title"))
                .size(13.0)
                .color(style::ACCENT)
                .strong(),
        );
        ui.label(
            egui::RichText::new(i18n::t(
                locale,
                "results_count",
                &[("count", &records.len().to_string())],
            ))
            .size(11.0)
            .color(style::TEXT_TERTIARY),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if ui.button(i18n::ts(locale, "export_button")).clicked() {
                action = TableAction::Export;
            }
        });
    });
    ui.add_space(4.0);

    let fields: Vec<&str> = records[0].keys().map(String::as_str).collect();

    egui::ScrollArea::both()
        .auto_shrink([false, true])
        .show(ui, |ui| {
            egui::Grid::new("results_grid")
                .striped(true)
                .min_col_width(90.0)
                .spacing(egui::vec2(16.0, 4.0))
                .show(ui, |ui| {
                    for field in &fields {
                        ui.label(
                            egui::RichText::new(*field)
                                .size(12.0)
                                .color(style::TEXT_SECONDARY)
                                .strong(),
                        );
                    }
                    ui.end_row();

                    for record in records {
                        for field in &fields {
                            let value = display_value(record.get(*field));
                            ui.label(
                                egui::RichText::new(value)
                                    .size(12.0)
                                    .color(style::TEXT_PRIMARY),
                            )
                            .on_hover_text(display_value(record.get(*field)));
                        }
                        ui.end_row();
                    }
                });
        });

    action
}
