use eframe::egui;

use crate::egui_app::state::AppState;
use crate::egui_app::theme::{styles, Palette};

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let palette = Palette::for_mode(state.dark_mode);

    ui.vertical_centered(|ui| {
        ui.add_space(40.0);
        ui.label(egui::RichText::new("👤 Profile").size(28.0).strong().color(palette.text));
        ui.add_space(20.0);

        if let Some(session) = state.session().cloned() {
            styles::card_frame(&palette).show(ui, |ui| {
                ui.set_max_width(360.0);
                egui::Grid::new("profile_grid")
                    .num_columns(2)
                    .spacing([16.0, 8.0])
                    .show(ui, |ui| {
                        ui.colored_label(palette.text_secondary, "Username");
                        ui.label(session.username.as_str());
                        ui.end_row();

                        ui.colored_label(palette.text_secondary, "User ID");
                        ui.label(session.user_id.as_str());
                        ui.end_row();

                        ui.colored_label(palette.text_secondary, "Email");
                        ui.label(session.email.as_deref().unwrap_or("-"));
                        ui.end_row();
                    });
            });
        }

        ui.add_space(16.0);
        styles::card_frame(&palette).show(ui, |ui| {
            ui.set_max_width(360.0);
            let mut dark_mode = state.dark_mode;
            if ui.checkbox(&mut dark_mode, "Dark mode").changed() {
                state.toggle_dark_mode();
            }

            ui.add_space(8.0);
            ui.colored_label(palette.text_secondary, "Profile image");
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut state.profile_image_input)
                        .hint_text("file:///path/to/image.png")
                        .desired_width(240.0),
                );
                if ui.button("Save").clicked() {
                    state.save_profile_image();
                }
            });
        });

        ui.add_space(20.0);
        if ui.add(styles::primary_button("Logout", &palette)).clicked() {
            state.request_logout();
        }
    });
}
