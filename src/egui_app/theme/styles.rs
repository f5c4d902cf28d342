//! Theme Styling Functions
//!
//! Helpers that apply a [`Palette`] to egui's global style and build the
//! frames shared by the views.

use super::colors::Palette;
use eframe::egui::{self, CornerRadius, Stroke};

/// Apply `palette` to the egui context
pub fn apply_global_theme(ctx: &egui::Context, palette: &Palette) {
    let mut style = (*ctx.style()).clone();

    style.visuals.dark_mode = *palette == Palette::DARK;
    style.visuals.window_fill = palette.card;
    style.visuals.window_stroke = Stroke::new(1.0, palette.card_border);
    style.visuals.panel_fill = palette.background;
    style.visuals.extreme_bg_color = palette.input_bg;
    style.visuals.override_text_color = Some(palette.text);

    style.visuals.widgets.noninteractive.bg_fill = palette.card;
    style.visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text);

    style.visuals.widgets.inactive.bg_fill = palette.input_bg;
    style.visuals.widgets.inactive.weak_bg_fill = palette.input_bg;
    style.visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, palette.text);

    style.visuals.widgets.hovered.bg_fill = palette.card_border;
    style.visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, palette.text);

    style.visuals.widgets.active.bg_fill = palette.accent;
    style.visuals.widgets.active.fg_stroke = Stroke::new(1.0, palette.text_on_accent);

    style.visuals.selection.bg_fill = palette.accent;
    style.visuals.selection.stroke = Stroke::new(1.0, palette.text_on_accent);

    ctx.set_style(style);
}

/// Frame for the top bar
pub fn top_bar_frame(palette: &Palette) -> egui::Frame {
    egui::Frame::new()
        .fill(palette.top_bar)
        .inner_margin(egui::Margin::symmetric(12, 8))
}

/// Frame for the central panel
pub fn main_frame(palette: &Palette) -> egui::Frame {
    egui::Frame::new()
        .fill(palette.background)
        .inner_margin(egui::Margin::same(16))
}

/// Frame for a todo row or a form card
pub fn card_frame(palette: &Palette) -> egui::Frame {
    egui::Frame::new()
        .fill(palette.card)
        .stroke(Stroke::new(1.0, palette.card_border))
        .corner_radius(CornerRadius::same(8))
        .inner_margin(egui::Margin::symmetric(12, 8))
}

/// Accent-filled button
pub fn primary_button(text: &str, palette: &Palette) -> egui::Button<'static> {
    egui::Button::new(egui::RichText::new(text.to_string()).color(palette.text_on_accent))
        .fill(palette.accent)
        .corner_radius(CornerRadius::same(6))
}
