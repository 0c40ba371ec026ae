//! plainpad - a small plain-text editor
//!
//! Line numbers, search, a word count and nothing else.

mod actions;
mod app;
mod buffer;
mod clipboard;
mod document;
mod editor;
mod settings;
mod status;

use app::PlainpadApp;
use eframe::NativeOptions;
use padcore::storage::StorageError;
use padcore::{Palette, PadTheme};
use settings::Settings;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StartupError {
    #[error("could not load theme: {0}")]
    Theme(#[from] StorageError),
    #[error("could not open window: {0}")]
    Window(String),
}

fn main() -> Result<(), StartupError> {
    padcore::logging::init();

    let settings = Settings::load_or_default(&Settings::path());
    let palette = match &settings.palette_path {
        Some(path) => Palette::load(path)?,
        None => Palette::bundled()?,
    };
    tracing::info!("theme {}", palette.name);
    let theme = PadTheme::new(palette).with_editor_font_size(settings.font_size);

    let options = NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height])
            .with_min_inner_size([320.0, 200.0])
            .with_title("Untitled 1 - plainpad")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    eframe::run_native(
        "plainpad",
        options,
        Box::new(move |cc| {
            theme.apply(&cc.egui_ctx);
            Box::new(PlainpadApp::new(cc, theme, &settings))
        }),
    )
    .map_err(|e| StartupError::Window(e.to_string()))
}
