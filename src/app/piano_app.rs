//! Main application struct for the Virtual Piano
//!
//! Contains the PianoApp which implements eframe::App. It owns the keyboard
//! session and maps toolbar, pointer and computer-keyboard input onto it.

use eframe::egui::{self, Align, Layout, RichText};

use super::theme;
use crate::engine::{AudioStatus, Backend};
use crate::keyboard::{input_key, KeyboardSession};
use crate::keys::Key;
use crate::widgets::piano::{piano, KeyboardLayout, PianoConfig, PianoGesture, KEY_WIDTH_RANGE};

/// Main application state for the Virtual Piano
pub struct PianoApp {
    /// Keyboard state and sound backend
    session: KeyboardSession<Backend>,

    /// Widget appearance
    piano_config: PianoConfig,

    /// Key rectangles for the current config
    layout: KeyboardLayout,

    /// Pointer gesture carried between frames
    gesture: PianoGesture,

    /// Computer keys currently held and the piano key each one pressed
    held_inputs: Vec<(egui::Key, Key)>,

    /// Scroll position last written to or read from the scroll area
    synced_position: Option<f64>,

    /// Horizontal offset of the scroll area last frame
    last_offset: f32,

    /// Whether theme has been applied
    theme_applied: bool,
}

impl PianoApp {
    pub fn new(session: KeyboardSession<Backend>) -> Self {
        let piano_config = PianoConfig::default();
        let layout = KeyboardLayout::new(session.key_set(), &piano_config);

        Self {
            session,
            piano_config,
            layout,
            gesture: PianoGesture::default(),
            held_inputs: Vec::new(),
            synced_position: None,
            last_offset: 0.0,
            theme_applied: false,
        }
    }

    /// Draw the top toolbar with octave navigation and playing controls
    fn draw_toolbar(&mut self, ui: &mut egui::Ui) -> ToolbarActions {
        let mut actions = ToolbarActions::default();

        ui.horizontal(|ui| {
            ui.add_space(8.0);

            ui.label(
                RichText::new("VIRTUAL PIANO")
                    .size(18.0)
                    .color(theme::text::PRIMARY)
                    .strong(),
            );

            ui.add_space(20.0);
            ui.separator();
            ui.add_space(20.0);

            // Octave navigation
            ui.label(RichText::new("Octave").color(theme::text::SECONDARY));
            if ui.button("-").clicked() {
                actions.octave_down = true;
            }

            let current = self.session.current_octave();
            for octave in self.session.octaves() {
                let label = RichText::new(format!("C{}", octave))
                    .color(theme::octave_color(octave))
                    .strong();
                if ui.selectable_label(octave == current, label).clicked() {
                    actions.jump_to_octave = Some(octave);
                }
            }

            if ui.button("+").clicked() {
                actions.octave_up = true;
            }

            ui.add_space(20.0);
            ui.separator();
            ui.add_space(20.0);

            // Scroll position
            let mut position = self.session.scroll_position();
            let slider = egui::Slider::new(&mut position, 0.0..=1.0)
                .show_value(false)
                .text("Scroll");
            if ui.add(slider).changed() {
                actions.scroll_to = Some(position);
            }

            let mut width = self.piano_config.key_width;
            let slider = egui::Slider::new(&mut width, KEY_WIDTH_RANGE.0..=KEY_WIDTH_RANGE.1)
                .show_value(false)
                .text("Key size");
            if ui.add(slider).changed() {
                actions.key_width = Some(width);
            }

            ui.add_space(20.0);
            ui.separator();
            ui.add_space(20.0);

            let mut sustain = self.session.sustain();
            let sustain_text = RichText::new("Sustain").color(if sustain {
                theme::accent::SUCCESS
            } else {
                theme::text::SECONDARY
            });
            if ui.toggle_value(&mut sustain, sustain_text).changed() {
                actions.sustain = Some(sustain);
            }

            if ui
                .button(RichText::new("All Notes Off").color(theme::accent::WARNING))
                .clicked()
            {
                actions.all_notes_off = true;
            }
        });

        actions
    }

    /// Draw the scrollable keyboard, keeping the scroll area and the
    /// session's scroll position in step
    fn draw_keyboard(&mut self, ui: &mut egui::Ui) {
        let viewport = ui.available_width();
        let target = self.session.scroll_position();

        let mut area = egui::ScrollArea::horizontal()
            .drag_to_scroll(false)
            .auto_shrink([false, true]);

        // Programmatic scroll: the position moved since we last synced
        let programmatic = self.synced_position != Some(target);
        if programmatic {
            if let Some(key) = self.session.key_at_scroll_position() {
                area = area.horizontal_scroll_offset(offset_for_key(&self.layout, &key, viewport));
            }
        }

        let output = area.show(ui, |ui| {
            piano(
                ui,
                &mut self.session,
                &self.layout,
                &self.piano_config,
                &mut self.gesture,
            )
        });

        let offset = output.state.offset.x;
        if !programmatic && (offset - self.last_offset).abs() > 0.5 {
            // The user scrolled; follow the key now in the middle of the view
            let center = offset + output.inner_rect.width() / 2.0;
            if let Some(key) = self.layout.natural_at_x(center) {
                match self.session.position_for_key(&key) {
                    Ok(position) => self.session.set_scroll_position(position),
                    Err(e) => log::debug!("Scroll sync skipped: {}", e),
                }
            }
        }

        self.synced_position = Some(self.session.scroll_position());
        self.last_offset = offset;
    }

    /// Draw the bottom status bar
    fn draw_status_bar(&mut self, ui: &mut egui::Ui) -> bool {
        let mut retry = false;
        let backend = self.session.sink().name();
        let pressed = self.session.pressed_count();
        let octave = self.session.current_octave();

        ui.horizontal(|ui| {
            ui.add_space(8.0);

            match self.session.audio_status() {
                AudioStatus::Loading => {
                    ui.spinner();
                    ui.label(
                        RichText::new("Loading sound...")
                            .color(theme::text::SECONDARY)
                            .small(),
                    );
                }
                AudioStatus::Ready => {
                    ui.label(
                        RichText::new(format!("● {}", backend))
                            .color(theme::accent::SUCCESS)
                            .small(),
                    );
                }
                AudioStatus::Unavailable(reason) => {
                    ui.label(
                        RichText::new(format!("⚠ {}: {}", backend, reason))
                            .color(theme::accent::ERROR)
                            .small(),
                    );
                    if ui.small_button("Retry").clicked() {
                        retry = true;
                    }
                }
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(
                    RichText::new(format!("Octave {}", octave))
                        .color(theme::octave_color(octave))
                        .small(),
                );
                ui.label(
                    RichText::new(format!("{} pressed", pressed))
                        .color(theme::text::SECONDARY)
                        .small(),
                );
            });
        });

        retry
    }

    /// Play the keyboard from the computer keyboard
    fn handle_key_input(&mut self, ctx: &egui::Context) {
        if ctx.wants_keyboard_input() {
            return;
        }

        let events = ctx.input(|i| i.events.clone());
        for event in events {
            let egui::Event::Key {
                key,
                pressed,
                repeat,
                ..
            } = event
            else {
                continue;
            };
            if repeat {
                continue;
            }

            match (key, pressed) {
                (egui::Key::Space, on) => self.session.set_sustain(on),
                (egui::Key::ArrowLeft, true) => {
                    self.session.step_octave(-1);
                }
                (egui::Key::ArrowRight, true) => {
                    self.session.step_octave(1);
                }
                (_, true) => {
                    let octave = self.session.current_octave();
                    if let Some(piano_key) = input_key(key, octave, self.session.key_set()) {
                        match self.session.on_press(&piano_key) {
                            Ok(_) => self.held_inputs.push((key, piano_key)),
                            Err(e) => log::debug!("Key input ignored: {}", e),
                        }
                    }
                }
                (_, false) => {
                    if let Some(index) = self.held_inputs.iter().position(|(k, _)| *k == key) {
                        let (_, piano_key) = self.held_inputs.remove(index);
                        if let Err(e) = self.session.on_release(&piano_key) {
                            log::debug!("Key release ignored: {}", e);
                        }
                    }
                }
            }
        }
    }
}

/// Scroll offset that puts `key` in the middle of a viewport `viewport` wide.
fn offset_for_key(layout: &KeyboardLayout, key: &Key, viewport: f32) -> f32 {
    let max_offset = (layout.size().x - viewport).max(0.0);
    layout
        .natural_center_x(key)
        .map(|x| (x - viewport / 2.0).clamp(0.0, max_offset))
        .unwrap_or(0.0)
}

/// Actions collected from the toolbar for deferred execution
#[derive(Default)]
struct ToolbarActions {
    octave_down: bool,
    octave_up: bool,
    jump_to_octave: Option<i32>,
    scroll_to: Option<f64>,
    key_width: Option<f32>,
    sustain: Option<bool>,
    all_notes_off: bool,
}

impl eframe::App for PianoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply theme on first frame
        if !self.theme_applied {
            theme::apply_theme(ctx);
            self.theme_applied = true;
        }

        self.handle_key_input(ctx);

        // Top toolbar panel
        let toolbar_actions = egui::TopBottomPanel::top("toolbar")
            .frame(
                egui::Frame::none()
                    .fill(theme::background::PANEL)
                    .inner_margin(egui::Margin::symmetric(0.0, 8.0)),
            )
            .show(ctx, |ui| self.draw_toolbar(ui))
            .inner;

        // Bottom status bar
        let retry = egui::TopBottomPanel::bottom("status_bar")
            .frame(
                egui::Frame::none()
                    .fill(theme::background::PANEL)
                    .inner_margin(egui::Margin::symmetric(0.0, 4.0)),
            )
            .show(ctx, |ui| self.draw_status_bar(ui))
            .inner;

        // Main content area
        egui::CentralPanel::default()
            .frame(egui::Frame::none().inner_margin(egui::Margin::same(12.0)))
            .show(ctx, |ui| {
                self.draw_keyboard(ui);
            });

        // Handle deferred actions (to avoid borrow checker issues)
        if toolbar_actions.octave_down {
            self.session.step_octave(-1);
        }
        if toolbar_actions.octave_up {
            self.session.step_octave(1);
        }
        if let Some(octave) = toolbar_actions.jump_to_octave {
            self.session.scroll_to_octave(octave);
        }
        if let Some(position) = toolbar_actions.scroll_to {
            self.session.set_scroll_position(position);
        }
        if let Some(width) = toolbar_actions.key_width {
            self.piano_config = self.piano_config.clone().with_key_width(width);
            self.layout = KeyboardLayout::new(self.session.key_set(), &self.piano_config);
            self.synced_position = None;
        }
        if let Some(on) = toolbar_actions.sustain {
            self.session.set_sustain(on);
        }
        if toolbar_actions.all_notes_off {
            self.session.all_notes_off();
            self.held_inputs.clear();
        }
        if retry {
            self.session.retry_audio();
        }

        if self.synced_position != Some(self.session.scroll_position()) {
            ctx.request_repaint();
        }

        // Keep polling until the backend settles
        if *self.session.audio_status() == AudioStatus::Loading {
            ctx.request_repaint_after(std::time::Duration::from_millis(200));
        }
    }
}
