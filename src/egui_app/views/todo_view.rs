use eframe::egui;

use crate::egui_app::state::AppState;
use crate::egui_app::theme::{colors, styles, Palette};
use crate::shared::{Priority, TodoId, TodoItem};

enum RowAction {
    Toggle(TodoId),
    Delete(TodoId),
}

pub fn render(ui: &mut egui::Ui, state: &mut AppState) {
    let palette = Palette::for_mode(state.dark_mode);

    render_form(ui, state, &palette);
    ui.add_space(12.0);

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("🔍").color(palette.text_secondary));
        ui.add(
            egui::TextEdit::singleline(&mut state.search_query)
                .hint_text("Search todos")
                .desired_width(240.0),
        );
        ui.add_space(12.0);
        ui.colored_label(
            palette.text_secondary,
            format!(
                "{} active, {} done",
                state.todo_snapshot.active_count(),
                state.todo_snapshot.completed_count()
            ),
        );
        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if state.loading_todos {
                ui.spinner();
            } else if ui.button("⟳ Refresh").clicked() {
                state.refresh_todos();
            }
        });
    });
    ui.add_space(8.0);

    let mut action = None;
    egui::ScrollArea::vertical().show(ui, |ui| {
        let visible = state.todo_snapshot.filtered(&state.search_query);
        if visible.is_empty() {
            ui.add_space(20.0);
            ui.vertical_centered(|ui| {
                let text = if state.todo_snapshot.items.is_empty() {
                    "No todos yet"
                } else {
                    "No todos match your search"
                };
                ui.colored_label(palette.text_secondary, text);
            });
        }
        for item in visible {
            if let Some(row_action) = render_row(ui, item, &palette) {
                action = Some(row_action);
            }
            ui.add_space(6.0);
        }
    });

    match action {
        Some(RowAction::Toggle(id)) => state.toggle_todo(id),
        Some(RowAction::Delete(id)) => state.delete_todo(id),
        None => {}
    }
}

fn render_form(ui: &mut egui::Ui, state: &mut AppState, palette: &Palette) {
    styles::card_frame(palette).show(ui, |ui| {
        ui.horizontal(|ui| {
            let submitted = ui
                .add(
                    egui::TextEdit::singleline(&mut state.title_input)
                        .hint_text("What needs to be done?")
                        .desired_width(260.0),
                )
                .lost_focus()
                && ui.input(|i| i.key_pressed(egui::Key::Enter));

            ui.add(
                egui::TextEdit::singleline(&mut state.description_input)
                    .hint_text("Description (optional)")
                    .desired_width(220.0),
            );

            egui::ComboBox::from_id_salt("priority")
                .selected_text(state.priority_input.as_str())
                .show_ui(ui, |ui| {
                    for priority in Priority::ALL {
                        ui.selectable_value(&mut state.priority_input, priority, priority.as_str());
                    }
                });

            if ui.add(styles::primary_button("Add", palette)).clicked() || submitted {
                state.add_todo();
            }
        });
    });
}

fn render_row(ui: &mut egui::Ui, item: &TodoItem, palette: &Palette) -> Option<RowAction> {
    let mut action = None;
    let pending = item.id.is_temporary();

    styles::card_frame(palette).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            let mut completed = item.completed;
            if ui
                .add_enabled(!pending, egui::Checkbox::without_text(&mut completed))
                .changed()
            {
                action = Some(RowAction::Toggle(item.id.clone()));
            }

            ui.vertical(|ui| {
                let mut title = egui::RichText::new(item.text()).size(16.0).color(palette.text);
                if item.completed {
                    title = title.strikethrough().color(palette.text_secondary);
                }
                ui.label(title);
                if let Some(description) = &item.description {
                    ui.colored_label(palette.text_secondary, description.as_str());
                }
            });

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if pending {
                    ui.spinner();
                } else if ui.button("🗑").on_hover_text("Delete").clicked() {
                    action = Some(RowAction::Delete(item.id.clone()));
                }
                ui.colored_label(
                    colors::priority_color(item.priority),
                    egui::RichText::new(item.priority.as_str()).small().strong(),
                );
            });
        });
    });

    action
}
