use eframe::egui;

use crate::egui_app::state::AppState;
use crate::egui_app::theme::{colors, styles, Palette};

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let palette = Palette::for_mode(state.dark_mode);
    let available_rect = ui.available_rect_before_wrap();

    ui.scope_builder(egui::UiBuilder::new().max_rect(available_rect), |ui| {
        ui.vertical_centered(|ui| {
            let total_height = if state.is_signup_mode { 350.0 } else { 280.0 };
            let top_space = (available_rect.height() - total_height).max(0.0) / 2.0;
            ui.add_space(top_space);

            ui.label(egui::RichText::new("✅ TaskSync").size(32.0).strong().color(palette.text));
            ui.add_space(20.0);

            ui.label(
                egui::RichText::new(if state.is_signup_mode { "Create Account" } else { "Welcome Back" })
                    .size(24.0)
                    .color(palette.text),
            );
            ui.add_space(20.0);

            if let Some(ref error) = state.auth_state.error {
                ui.label(egui::RichText::new(error).color(colors::ERROR));
                ui.add_space(10.0);
            }

            let input_width = 280.0;
            let label_width = 80.0;
            let indent = (available_rect.width() - input_width - label_width - 20.0).max(0.0) / 2.0;

            let field = |ui: &mut egui::Ui, label: &str, value: &mut String, password: bool| {
                ui.horizontal(|ui| {
                    ui.add_space(indent);
                    ui.add_sized(
                        [label_width, 24.0],
                        egui::Label::new(egui::RichText::new(label).color(palette.text_secondary)),
                    );
                    ui.add_sized(
                        [input_width, 28.0],
                        egui::TextEdit::singleline(value).password(password),
                    );
                });
                ui.add_space(8.0);
            };

            field(ui, "Username:", &mut state.username_input, false);
            if state.is_signup_mode {
                field(ui, "Email:", &mut state.email_input, false);
            }
            field(ui, "Password:", &mut state.password_input, true);
            if state.is_signup_mode {
                field(ui, "Confirm:", &mut state.confirm_password_input, true);
            }

            ui.add_space(20.0);

            ui.horizontal(|ui| {
                let button_width = 120.0;
                let total_buttons_width = button_width * 2.0 + 10.0;
                ui.add_space((available_rect.width() - total_buttons_width).max(0.0) / 2.0);

                let submit = if state.is_signup_mode { "Sign Up" } else { "Login" };
                let submit_enabled = !state.auth_state.loading;
                if ui
                    .add_enabled(
                        submit_enabled,
                        styles::primary_button(submit, &palette).min_size(egui::vec2(button_width, 32.0)),
                    )
                    .clicked()
                {
                    state.auth_state.clear_error();
                    if state.is_signup_mode {
                        state.handle_signup();
                    } else {
                        state.handle_login();
                    }
                }

                ui.add_space(10.0);

                let switch = if state.is_signup_mode { "Back to Login" } else { "Create Account" };
                if ui
                    .add_sized([button_width, 32.0], egui::Button::new(switch))
                    .clicked()
                {
                    state.toggle_auth_mode();
                }
            });

            if state.auth_state.loading {
                ui.add_space(15.0);
                ui.horizontal(|ui| {
                    ui.add_space((available_rect.width() - 100.0).max(0.0) / 2.0);
                    ui.label(egui::RichText::new("Loading...").color(palette.text));
                    ui.spinner();
                });
            }
        });
    });
}
