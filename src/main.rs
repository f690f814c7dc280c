//! Virtual Piano - A scrollable multi-octave on-screen piano keyboard
//!
//! Entry point for the application.
//!
//! Usage: `virtual_piano [--midi] [CONFIG.json]`

use std::path::Path;

use eframe::egui;
use virtual_piano::app::PianoApp;
use virtual_piano::config::{self, KeyboardConfig};
use virtual_piano::engine::Backend;
use virtual_piano::keyboard::KeyboardSession;

fn main() -> eframe::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let use_midi = args.iter().any(|a| a == "--midi");
    let config = match args.iter().find(|a| !a.starts_with("--")) {
        Some(path) => load_config(Path::new(path)),
        None => KeyboardConfig::default(),
    };

    let backend = if use_midi {
        Backend::midi(config.midi_channel)
    } else {
        Backend::synth()
    };
    log::info!("Using {} backend", backend.name());

    let session = match KeyboardSession::new(config, backend) {
        Ok(session) => session,
        Err(e) => {
            log::error!("Cannot build keyboard: {}", e);
            std::process::exit(1);
        }
    };

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 420.0])
            .with_title("Virtual Piano"),
        ..Default::default()
    };

    eframe::run_native(
        "Virtual Piano",
        options,
        Box::new(|_cc| Ok(Box::new(PianoApp::new(session)))),
    )
}

fn load_config(path: &Path) -> KeyboardConfig {
    match config::load_from_file(path) {
        Ok(config) => {
            log::info!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            log::warn!("Using default config, {} unreadable: {}", path.display(), e);
            KeyboardConfig::default()
        }
    }
}
