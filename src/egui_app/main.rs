/**
 * TaskSync egui App - Main Entry Point
 *
 * Loads `.env`, sets up tracing and runs the eframe window.
 */
use eframe::egui;
use tasksync::egui_app::theme::{styles, Palette};
use tasksync::egui_app::{views, AppState};

fn main() -> Result<(), eframe::Error> {
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();
    tracing::info!("[STARTUP] TaskSync starting");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([900.0, 700.0])
            .with_min_inner_size([480.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "TaskSync",
        options,
        Box::new(|_cc| {
            let state = AppState::new()?;
            Ok(Box::new(TaskSyncApp { state }))
        }),
    )
}

/// Main application state
struct TaskSyncApp {
    state: AppState,
}

impl eframe::App for TaskSyncApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.poll();

        styles::apply_global_theme(ctx, &Palette::for_mode(self.state.dark_mode));
        views::render_top_bar(ctx, &mut self.state);
        views::render_main_panel(ctx, &mut self.state);
        views::render_alert(ctx, &mut self.state);
        views::render_logout_confirm(ctx, &mut self.state);

        ctx.request_repaint_after(std::time::Duration::from_millis(100));
    }
}
