//! Theme Module
//!
//! Color palettes and frame helpers for the todo UI. Two palettes exist, a
//! warm brown dark theme and a cream light theme; the user picks one on the
//! profile screen and the choice is persisted by `Preferences`.
//!
//! # Usage
//!
//! ```rust,no_run
//! use tasksync::egui_app::theme::{styles, Palette};
//!
//! # fn show(ctx: &eframe::egui::Context) {
//! let palette = Palette::for_mode(true);
//! styles::apply_global_theme(ctx, &palette);
//! # }
//! ```

pub mod colors;
pub mod styles;

pub use colors::Palette;
