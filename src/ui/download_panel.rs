use eframe::egui;

use crate::i18n::{self, Language};

use super::style;

pub enum DownloadAction {
    None,
    Download,
}

/// Client download and contact tab. Static copy apart from the download
/// button, which also flips the durable "installed before" flag.
pub fn show(ui: &mut egui::Ui, download_url: &str, locale: Language) -> DownloadAction {
    let mut action = DownloadAction::None;

    ui.add_space(8.0);
    ui.label(
        egui::RichText::new(i18n::ts(locale, "download_title"))
            .size(14.0)
            .color(style::ACCENT)
            .strong(),
    );
    ui.add_space(4.0);
    ui.label(
        egui::RichText::new(i18n::ts(locale, "download_blurb"))
            .size(12.0)
            .color(style::TEXT_SECONDARY),
    );
    ui.add_space(8.0);

    ui.horizontal(|ui| {
        if ui.button(i18n::ts(locale, "download_button")).clicked() {
            action = DownloadAction::Download;
        }
        ui.label(
            egui::RichText::new(download_url)
                .size(10.0)
                .color(style::TEXT_DISABLED)
                .monospace(),
        );
    });

    ui.add_space(20.0);
    ui.separator();
    ui.add_space(8.0);

    ui.label(
        egui::RichText::new(i18n::ts(locale, "contact_title"))
            .size(14.0)
            .color(style::ACCENT)
            .strong(),
    );
    ui.add_space(4.0);
    ui.label(
        egui::RichText::new(i18n::ts(locale, "contact_blurb"))
            .size(12.0)
            .color(style::TEXT_SECONDARY),
    );

    action
}
