//! Custom widgets: toolbar buttons, status bar, dialog windows, file rows.
//!
//! Colors come from the active `egui::Visuals`, so these follow whatever
//! palette `PadTheme::apply` installed.

use egui::{Align2, Response, RichText, Sense, Stroke, Ui, Widget};

/// Square, frameless icon button for the toolbar.
pub fn toolbar_button(ui: &mut Ui, icon: &str, tooltip: &str, enabled: bool) -> Response {
    let button = egui::Button::new(RichText::new(icon).size(16.0))
        .frame(false)
        .min_size(egui::vec2(28.0, 24.0));
    ui.add_enabled(enabled, button).on_hover_text(tooltip)
}

/// Toolbar separator (vertical 1px line)
pub fn toolbar_separator(ui: &mut Ui) {
    let height = ui.spacing().interact_size.y;
    let (rect, _) = ui.allocate_exact_size(egui::vec2(8.0, height), Sense::hover());

    if ui.is_rect_visible(rect) {
        let stroke = ui.visuals().widgets.noninteractive.bg_stroke;
        ui.painter().vline(rect.center().x, rect.y_range(), stroke);
    }
}

/// Status bar with a left- and a right-aligned label.
pub fn status_bar(ui: &mut Ui, left: &str, right: &str) {
    egui::Frame::none()
        .fill(ui.visuals().panel_fill)
        .inner_margin(egui::Margin::symmetric(8.0, 2.0))
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(left);
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(right);
                });
            });
        });
}

/// A fixed, centered dialog window.
pub fn dialog_window(title: &str) -> egui::Window<'static> {
    egui::Window::new(title)
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .default_width(320.0)
}

/// Dim everything below the dialog windows. Pointer input is not blocked
/// here; callers disable their panels while a dialog is up.
pub fn modal_backdrop(ctx: &egui::Context) {
    let layer = egui::LayerId::new(egui::Order::PanelResizeLine, egui::Id::new("modal_backdrop"));
    ctx.layer_painter(layer)
        .rect_filled(ctx.screen_rect(), 0.0, egui::Color32::from_black_alpha(96));
}

/// One row of a shortcut listing.
pub fn shortcut_row(ui: &mut Ui, shortcut: &str, description: &str) {
    ui.horizontal(|ui| {
        ui.add_sized([110.0, 18.0], egui::Label::new(RichText::new(shortcut).monospace().strong()));
        ui.label(description);
    });
}

/// File list item for open/save dialogs.
pub struct FileListItem<'a> {
    name: &'a str,
    is_directory: bool,
    selected: bool,
}

impl<'a> FileListItem<'a> {
    pub fn new(name: &'a str, is_directory: bool) -> Self {
        Self { name, is_directory, selected: false }
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = selected;
        self
    }
}

impl<'a> Widget for FileListItem<'a> {
    fn ui(self, ui: &mut Ui) -> Response {
        let height = 20.0;
        let (rect, response) = ui.allocate_exact_size(egui::vec2(ui.available_width(), height), Sense::click());

        if ui.is_rect_visible(rect) {
            let visuals = ui.visuals();
            let painter = ui.painter();

            if self.selected {
                painter.rect_filled(rect, 0.0, visuals.selection.bg_fill);
            } else if response.hovered() {
                painter.rect_filled(rect, 0.0, visuals.widgets.hovered.bg_fill);
            }
            let text_color = visuals.text_color();

            let icon = if self.is_directory { "📁" } else { "📄" };
            painter.text(
                egui::pos2(rect.min.x + 12.0, rect.center().y),
                Align2::CENTER_CENTER,
                icon,
                egui::FontId::proportional(12.0),
                text_color,
            );
            painter.text(
                egui::pos2(rect.min.x + 24.0, rect.center().y),
                Align2::LEFT_CENTER,
                self.name,
                egui::FontId::proportional(12.0),
                text_color,
            );
            if self.selected {
                painter.rect_stroke(rect, 0.0, Stroke::new(1.0, visuals.selection.stroke.color));
            }
        }

        response
    }
}
