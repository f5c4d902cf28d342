//! Color Palettes
//!
//! Both palettes share the same slots so views never branch on the mode.

use crate::shared::Priority;
use eframe::egui::Color32;

/// Colors used by every view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Main area background
    pub background: Color32,
    /// Top bar background
    pub top_bar: Color32,
    /// Todo row and form card background
    pub card: Color32,
    pub card_border: Color32,
    /// Text on `background` and `card`
    pub text: Color32,
    /// Muted text (descriptions, counts)
    pub text_secondary: Color32,
    /// Text on `top_bar` and `accent`
    pub text_on_accent: Color32,
    pub accent: Color32,
    pub input_bg: Color32,
}

impl Palette {
    pub const DARK: Palette = Palette {
        background: Color32::from_rgb(0x2F, 0x1E, 0x1A),
        top_bar: Color32::from_rgb(0x3E, 0x2A, 0x24),
        card: Color32::from_rgb(0x3A, 0x27, 0x21),
        card_border: Color32::from_rgb(0x5C, 0x3A, 0x2C),
        text: Color32::from_rgb(0xF0, 0xE0, 0xD6),
        text_secondary: Color32::from_rgb(0xC6, 0xB2, 0x9E),
        text_on_accent: Color32::from_rgb(0xF0, 0xE0, 0xD6),
        accent: Color32::from_rgb(0x5C, 0x3A, 0x2C),
        input_bg: Color32::from_rgb(0x4A, 0x2E, 0x22),
    };

    pub const LIGHT: Palette = Palette {
        background: Color32::from_rgb(0xF7, 0xF2, 0xEC),
        top_bar: Color32::from_rgb(0x3E, 0x2A, 0x24),
        card: Color32::from_rgb(0xEA, 0xDB, 0xC8),
        card_border: Color32::from_rgb(0xC7, 0xB2, 0x9A),
        text: Color32::from_rgb(0x2F, 0x1E, 0x1A),
        text_secondary: Color32::from_rgb(0x8B, 0x7B, 0x6B),
        text_on_accent: Color32::from_rgb(0xF0, 0xE0, 0xD6),
        accent: Color32::from_rgb(0x5C, 0x3A, 0x2C),
        input_bg: Color32::from_rgb(0xE6, 0xD7, 0xC7),
    };

    pub fn for_mode(dark_mode: bool) -> Palette {
        if dark_mode {
            Self::DARK
        } else {
            Self::LIGHT
        }
    }
}

/// Error text and alert border
pub const ERROR: Color32 = Color32::from_rgb(0xE5, 0x73, 0x73);

/// Pending indicator
pub const WARNING: Color32 = Color32::from_rgb(0xFF, 0xA7, 0x26);

pub const SUCCESS: Color32 = Color32::from_rgb(0x4C, 0xAF, 0x50);

/// Badge color for a priority
pub fn priority_color(priority: Priority) -> Color32 {
    match priority {
        Priority::High => ERROR,
        Priority::Medium => WARNING,
        Priority::Low => SUCCESS,
    }
}
