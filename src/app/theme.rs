//! Theme definitions for the piano UI
//!
//! Provides color constants, styling utilities, and theme configuration
//! for a dark, audio-software aesthetic.

use eframe::egui::{self, Color32, Rounding, Stroke, Vec2};

/// Background colors
pub mod background {
    use super::Color32;

    /// Main window background - deep dark blue
    pub const MAIN: Color32 = Color32::from_rgb(26, 26, 46);

    /// Panel background - slightly lighter than main
    pub const PANEL: Color32 = Color32::from_rgb(35, 35, 55);

    /// Widget background (buttons, inputs)
    pub const WIDGET: Color32 = Color32::from_rgb(45, 45, 70);

    /// Widget background when hovered
    pub const WIDGET_HOVERED: Color32 = Color32::from_rgb(55, 55, 85);

    /// Widget background when active/pressed
    pub const WIDGET_ACTIVE: Color32 = Color32::from_rgb(65, 65, 100);
}

/// Piano key colors
pub mod keys {
    use super::Color32;

    /// White key at rest - off-white
    pub const NATURAL: Color32 = Color32::from_rgb(240, 240, 235);

    /// Black key at rest - near-black
    pub const ACCIDENTAL: Color32 = Color32::from_rgb(30, 30, 35);

    /// White key held - blue tint
    pub const NATURAL_PRESSED: Color32 = Color32::from_rgb(100, 180, 255);

    /// Black key held - darker blue
    pub const ACCIDENTAL_PRESSED: Color32 = Color32::from_rgb(80, 140, 200);

    /// Key outline
    pub const BORDER: Color32 = Color32::from_gray(120);

    /// Label on white keys
    pub const NATURAL_LABEL: Color32 = Color32::from_gray(90);

    /// Label on black keys
    pub const ACCIDENTAL_LABEL: Color32 = Color32::from_gray(200);
}

/// Text colors
pub mod text {
    use super::Color32;

    /// Primary text - bright white
    pub const PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);

    /// Secondary text - dimmed
    pub const SECONDARY: Color32 = Color32::from_rgb(160, 160, 175);

    /// Disabled text
    pub const DISABLED: Color32 = Color32::from_rgb(100, 100, 115);

    /// Accent/highlight text
    pub const ACCENT: Color32 = Color32::from_rgb(130, 180, 255);
}

/// UI accent colors
pub mod accent {
    use super::Color32;

    /// Primary accent - blue
    pub const PRIMARY: Color32 = Color32::from_rgb(66, 165, 245);

    /// Success/active - green
    pub const SUCCESS: Color32 = Color32::from_rgb(129, 199, 132);

    /// Warning - orange
    pub const WARNING: Color32 = Color32::from_rgb(255, 183, 77);

    /// Error - red
    pub const ERROR: Color32 = Color32::from_rgb(239, 83, 80);
}

/// Octave accent colors, red through purple for octaves 1-7.
const OCTAVE_COLORS: [Color32; 7] = [
    Color32::from_rgb(239, 83, 80),   // red
    Color32::from_rgb(255, 167, 38),  // orange
    Color32::from_rgb(255, 238, 88),  // yellow
    Color32::from_rgb(102, 187, 106), // green
    Color32::from_rgb(38, 198, 218),  // cyan
    Color32::from_rgb(66, 165, 245),  // blue
    Color32::from_rgb(171, 71, 188),  // purple
];

/// Accent color for an octave's navigation button and key marker.
/// Octaves outside 1-7 wrap around the palette.
pub fn octave_color(octave: i32) -> Color32 {
    let index = (octave - 1).rem_euclid(OCTAVE_COLORS.len() as i32) as usize;
    OCTAVE_COLORS[index]
}

/// Standard rounding for UI elements
pub const ROUNDING: Rounding = Rounding {
    nw: 6.0,
    ne: 6.0,
    sw: 6.0,
    se: 6.0,
};

/// Smaller rounding for compact elements
pub const ROUNDING_SMALL: Rounding = Rounding {
    nw: 4.0,
    ne: 4.0,
    sw: 4.0,
    se: 4.0,
};

/// Apply the dark theme to an egui context
pub fn apply_theme(ctx: &egui::Context) {
    let mut style = (*ctx.style()).clone();

    let visuals = &mut style.visuals;
    visuals.dark_mode = true;

    visuals.window_fill = background::PANEL;
    visuals.window_stroke = Stroke::new(1.0, Color32::from_rgb(60, 60, 80));
    visuals.window_rounding = ROUNDING;
    visuals.panel_fill = background::MAIN;

    visuals.widgets.noninteractive.bg_fill = background::WIDGET;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, text::SECONDARY);
    visuals.widgets.noninteractive.rounding = ROUNDING_SMALL;

    visuals.widgets.inactive.bg_fill = background::WIDGET;
    visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, text::PRIMARY);
    visuals.widgets.inactive.rounding = ROUNDING_SMALL;

    visuals.widgets.hovered.bg_fill = background::WIDGET_HOVERED;
    visuals.widgets.hovered.fg_stroke = Stroke::new(1.0, text::PRIMARY);
    visuals.widgets.hovered.rounding = ROUNDING_SMALL;

    visuals.widgets.active.bg_fill = background::WIDGET_ACTIVE;
    visuals.widgets.active.fg_stroke = Stroke::new(1.5, accent::PRIMARY);
    visuals.widgets.active.rounding = ROUNDING_SMALL;

    visuals.selection.bg_fill = accent::PRIMARY.gamma_multiply(0.3);
    visuals.selection.stroke = Stroke::new(1.0, accent::PRIMARY);
    visuals.hyperlink_color = text::ACCENT;
    visuals.extreme_bg_color = Color32::from_rgb(20, 20, 35);

    style.spacing.item_spacing = Vec2::new(8.0, 6.0);
    style.spacing.button_padding = Vec2::new(10.0, 6.0);

    ctx.set_style(style);
}
