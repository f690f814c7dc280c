//! Piano keyboard widget.
//!
//! Draws the session's full key range as a row of white keys with black keys
//! overlaid on the right edge of their white neighbour, and turns pointer
//! gestures into press/release calls on the session.

use eframe::egui::{self, Color32, Pos2, Rect, Response, Sense, Ui, Vec2};

use crate::app::theme;
use crate::engine::NoteSink;
use crate::keyboard::KeyboardSession;
use crate::keys::{Key, KeySet, Note};

/// Allowed white key widths in points.
pub const KEY_WIDTH_RANGE: (f32, f32) = (30.0, 80.0);

/// Configuration for the piano keyboard widget.
#[derive(Clone, Debug)]
pub struct PianoConfig {
    /// Width of one white key.
    pub key_width: f32,
    /// Height of the white keys.
    pub height: f32,
    /// Gap between white keys.
    pub spacing: f32,
    /// Black key width as a fraction of the white key width.
    pub accidental_width: f32,
    /// Black key height as a fraction of the white key height.
    pub accidental_height: f32,
    /// Color of white keys when inactive.
    pub natural_color: Color32,
    /// Color of black keys when inactive.
    pub accidental_color: Color32,
    /// Color of white keys when pressed.
    pub natural_active: Color32,
    /// Color of black keys when pressed.
    pub accidental_active: Color32,
    /// Whether to draw note names on the keys.
    pub show_names: bool,
    /// Only label the C of each octave.
    pub first_name_only: bool,
}

impl Default for PianoConfig {
    fn default() -> Self {
        Self {
            key_width: 50.0,
            height: 200.0,
            spacing: 1.0,
            accidental_width: 0.6,
            accidental_height: 0.6,
            natural_color: theme::keys::NATURAL,
            accidental_color: theme::keys::ACCIDENTAL,
            natural_active: theme::keys::NATURAL_PRESSED,
            accidental_active: theme::keys::ACCIDENTAL_PRESSED,
            show_names: true,
            first_name_only: false,
        }
    }
}

impl PianoConfig {
    /// Set the white key width, limited to [`KEY_WIDTH_RANGE`].
    pub fn with_key_width(mut self, width: f32) -> Self {
        self.key_width = width.clamp(KEY_WIDTH_RANGE.0, KEY_WIDTH_RANGE.1);
        self
    }

    /// Set the keyboard height.
    pub fn with_height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Set which key names are drawn.
    pub fn with_names(mut self, show: bool, first_only: bool) -> Self {
        self.show_names = show;
        self.first_name_only = first_only;
        self
    }

    fn stride(&self) -> f32 {
        self.key_width + self.spacing
    }
}

/// Key rectangles for a key set, relative to the keyboard's top-left corner.
#[derive(Clone, Debug)]
pub struct KeyboardLayout {
    naturals: Vec<(Key, Rect)>,
    accidentals: Vec<(Key, Rect)>,
    size: Vec2,
    stride: f32,
}

impl KeyboardLayout {
    pub fn new(keys: &KeySet, config: &PianoConfig) -> Self {
        let naturals: Vec<(Key, Rect)> = keys
            .natural_keys()
            .into_iter()
            .enumerate()
            .map(|(i, key)| {
                let min = Pos2::new(i as f32 * config.stride(), 0.0);
                (key, Rect::from_min_size(min, Vec2::new(config.key_width, config.height)))
            })
            .collect();

        let accidental_size = Vec2::new(
            config.key_width * config.accidental_width,
            config.height * config.accidental_height,
        );
        let accidentals = naturals
            .iter()
            .filter_map(|(natural, rect)| {
                let accidental = keys.next_accidental(natural).ok().flatten()?;
                // Centered on the gap to the right of its white key
                let center_x = rect.right() + config.spacing / 2.0;
                let min = Pos2::new(center_x - accidental_size.x / 2.0, 0.0);
                Some((accidental, Rect::from_min_size(min, accidental_size)))
            })
            .collect();

        let count = naturals.len() as f32;
        let width = (count * config.stride() - config.spacing).max(0.0);

        Self {
            naturals,
            accidentals,
            size: Vec2::new(width, config.height),
            stride: config.stride(),
        }
    }

    /// Total keyboard size.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    pub fn naturals(&self) -> &[(Key, Rect)] {
        &self.naturals
    }

    pub fn accidentals(&self) -> &[(Key, Rect)] {
        &self.accidentals
    }

    /// Key under a point. Black keys win where they overlap white keys.
    pub fn key_at(&self, pos: Pos2) -> Option<Key> {
        self.accidentals
            .iter()
            .chain(self.naturals.iter())
            .find(|(_, rect)| rect.contains(pos))
            .map(|(key, _)| *key)
    }

    /// White key covering horizontal offset `x`, clamped to the ends.
    pub fn natural_at_x(&self, x: f32) -> Option<Key> {
        if self.naturals.is_empty() {
            return None;
        }
        let index = (x / self.stride).floor().max(0.0) as usize;
        self.naturals
            .get(index.min(self.naturals.len() - 1))
            .map(|(key, _)| *key)
    }

    /// Horizontal center of a white key.
    pub fn natural_center_x(&self, key: &Key) -> Option<f32> {
        self.naturals
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, rect)| rect.center().x)
    }
}

/// Pointer state carried between frames.
#[derive(Clone, Debug, Default)]
pub struct PianoGesture {
    /// Key held by the pointer, if any.
    pub held: Option<Key>,
}

/// A piano keyboard bound to a session.
///
/// Pressing and dragging across keys plays a glissando: each key change
/// releases the previous key before pressing the next.
pub fn piano<S: NoteSink>(
    ui: &mut Ui,
    session: &mut KeyboardSession<S>,
    layout: &KeyboardLayout,
    config: &PianoConfig,
    gesture: &mut PianoGesture,
) -> Response {
    let (rect, response) = ui.allocate_exact_size(layout.size(), Sense::click_and_drag());
    let origin = rect.min.to_vec2();

    let target = if response.is_pointer_button_down_on() {
        response
            .interact_pointer_pos()
            .and_then(|pos| layout.key_at(pos - origin))
    } else {
        None
    };

    if target != gesture.held {
        if let Some(previous) = gesture.held.take() {
            if let Err(e) = session.on_release(&previous) {
                log::debug!("Release ignored: {}", e);
            }
        }
        if let Some(next) = target {
            match session.on_press(&next) {
                Ok(_) => gesture.held = Some(next),
                Err(e) => log::debug!("Press ignored: {}", e),
            }
        }
    }

    if ui.is_rect_visible(rect) {
        let painter = ui.painter();

        for (key, key_rect) in layout.naturals() {
            let key_rect = key_rect.translate(origin);
            let pressed = session.is_pressed(key);
            let color = if pressed {
                config.natural_active
            } else {
                config.natural_color
            };
            painter.rect_filled(key_rect, 4.0, color);
            painter.rect_stroke(key_rect, 4.0, egui::Stroke::new(0.5, theme::keys::BORDER));

            // Octave marker on each C
            if key.note == Note::C {
                let marker = Rect::from_min_size(
                    Pos2::new(key_rect.left() + 2.0, key_rect.bottom() - 5.0),
                    Vec2::new(key_rect.width() - 4.0, 3.0),
                );
                painter.rect_filled(marker, 1.0, theme::octave_color(key.octave));
            }

            if show_label(key, config) {
                painter.text(
                    Pos2::new(key_rect.center().x, key_rect.bottom() - 16.0),
                    egui::Align2::CENTER_CENTER,
                    key.display_name(),
                    egui::FontId::proportional(11.0),
                    theme::keys::NATURAL_LABEL,
                );
            }
        }

        for (key, key_rect) in layout.accidentals() {
            let key_rect = key_rect.translate(origin);
            let pressed = session.is_pressed(key);
            let color = if pressed {
                config.accidental_active
            } else {
                config.accidental_color
            };
            painter.rect_filled(key_rect, 3.0, color);

            if !pressed {
                let highlight = Rect::from_min_size(
                    key_rect.min + Vec2::new(1.0, 1.0),
                    Vec2::new(key_rect.width() - 2.0, 3.0),
                );
                painter.rect_filled(highlight, 1.0, Color32::from_rgba_unmultiplied(255, 255, 255, 20));
            }

            if show_label(key, config) {
                painter.text(
                    Pos2::new(key_rect.center().x, key_rect.bottom() - 10.0),
                    egui::Align2::CENTER_CENTER,
                    key.note.name(),
                    egui::FontId::proportional(9.0),
                    theme::keys::ACCIDENTAL_LABEL,
                );
            }
        }
    }

    response
}

fn show_label(key: &Key, config: &PianoConfig) -> bool {
    config.show_names && (!config.first_name_only || key.note == Note::C)
}
