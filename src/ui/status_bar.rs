use eframe::egui;

use crate::i18n::{self, Language};
use crate::state::ServiceHealth;

use super::style;

/// Severity of the transient status line; decides its color, nothing else.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}

impl StatusKind {
    fn color(self) -> egui::Color32 {
        match self {
            StatusKind::Info => style::TEXT_SECONDARY,
            StatusKind::Success => style::SUCCESS,
            StatusKind::Warning => style::WARNING,
            StatusKind::Error => style::DANGER,
        }
    }
}

/// Connection badge shown in the top bar, mirroring the health flags.
pub fn badge(ui: &mut egui::Ui, health: ServiceHealth, locale: Language) {
    let (text, color) = if health.reachable {
        (i18n::ts(locale, "badge_connected"), style::SUCCESS)
    } else {
        (i18n::ts(locale, "badge_disconnected"), style::DANGER)
    };
    ui.label(egui::RichText::new("\u{25CF}").size(11.0).color(color));
    ui.label(egui::RichText::new(text).size(11.0).color(style::TEXT_SECONDARY));
}

/// Bottom status line: transient message plus an activity spinner while a
/// request is in flight.
pub fn show(ui: &mut egui::Ui, status: &str, kind: StatusKind, busy: bool) {
    let frame = egui::Frame::new()
        .fill(egui::Color32::from_rgba_premultiplied(15, 15, 15, 150))
        .inner_margin(egui::Margin { left: 12, right: 12, top: 4, bottom: 4 });

    frame.show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.allocate_ui_with_layout(
            egui::vec2(ui.available_width(), 20.0),
            egui::Layout::left_to_right(egui::Align::Center),
            |ui| {
                if busy {
                    ui.add(egui::Spinner::new().size(12.0));
                }
                if !status.is_empty() {
                    ui.label(egui::RichText::new(status).size(11.0).color(kind.color()));
                }
            },
        );
    });
}

/// Persistent advisory banner shown while the service is unreachable.
pub fn advisory(ui: &mut egui::Ui, text: &str) {
    let frame = egui::Frame::new()
        .fill(egui::Color32::from_rgba_premultiplied(60, 50, 10, 200))
        .corner_radius(egui::CornerRadius::same(6u8))
        .stroke(egui::Stroke::new(1.0, style::WARNING))
        .inner_margin(egui::Margin::same(10i8));

    frame.show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(egui::RichText::new(text).size(12.0).color(style::TEXT_PRIMARY));
    });
    ui.add_space(6.0);
}
