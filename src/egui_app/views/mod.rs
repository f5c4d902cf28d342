use eframe::egui;

use crate::egui_app::state::AppState;
use crate::egui_app::theme::{colors, styles, Palette};
use crate::egui_app::todos::ListState;
use crate::egui_app::AppView;

pub mod auth_view;
pub mod profile_view;
pub mod todo_view;

pub fn render_top_bar(ctx: &egui::Context, state: &mut AppState) {
    let palette = Palette::for_mode(state.dark_mode);

    egui::TopBottomPanel::top("top_panel")
        .frame(styles::top_bar_frame(&palette))
        .show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.colored_label(
                    palette.text_on_accent,
                    egui::RichText::new("✅ TaskSync").size(18.0).strong(),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.add_space(16.0);

                    if !state.auth_state.authenticated {
                        return;
                    }

                    if ui.button("Logout").clicked() {
                        state.request_logout();
                    }

                    let (target, label) = match state.current_view {
                        AppView::Profile => (AppView::Todos, "Todos"),
                        _ => (AppView::Profile, "Profile"),
                    };
                    if ui.button(label).clicked() {
                        state.current_view = target;
                    }

                    if let Some(session) = state.session() {
                        ui.colored_label(palette.text_on_accent, format!("@{}", session.username));
                    }

                    ui.add_space(16.0);
                    match &state.todo_snapshot.state {
                        ListState::Synced => {
                            ui.colored_label(colors::SUCCESS, "🟢 Synced");
                        }
                        pending => {
                            let kind = pending.kind().map(|k| k.to_string()).unwrap_or_default();
                            ui.colored_label(colors::WARNING, format!("🔄 Saving {}", kind));
                        }
                    }
                });
            });
        });
}

pub fn render_main_panel(ctx: &egui::Context, state: &mut AppState) {
    let palette = Palette::for_mode(state.dark_mode);

    egui::CentralPanel::default()
        .frame(styles::main_frame(&palette))
        .show(ctx, |ui| match state.current_view {
            AppView::Auth => auth_view::render(ui, state),
            AppView::Todos => todo_view::render(ui, state),
            AppView::Profile => profile_view::render(ui, state),
        });
}

/// Modal alert for failed actions
pub fn render_alert(ctx: &egui::Context, state: &mut AppState) {
    let Some(message) = state.alert.clone() else {
        return;
    };

    egui::Window::new("Error")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(message).color(colors::ERROR));
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                state.dismiss_alert();
            }
        });
}

/// Confirmation shown before logging out
pub fn render_logout_confirm(ctx: &egui::Context, state: &mut AppState) {
    if !state.confirm_logout {
        return;
    }

    egui::Window::new("Logout")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            ui.label("Are you sure you want to logout?");
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    state.cancel_logout();
                }
                if ui.button("Logout").clicked() {
                    state.logout();
                }
            });
        });
}
