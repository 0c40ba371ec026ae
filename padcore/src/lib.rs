//! padcore: shared library for plainpad
//!
//! Theme, storage, widgets and the line-number gutter. Nothing in here knows
//! about the editor's actions or document; the app crate wires them together.

pub mod gutter;
pub mod logging;
pub mod picker;
pub mod storage;
pub mod text;
pub mod theme;
pub mod widgets;

pub use gutter::{Gutter, GutterTheme};
pub use theme::{Palette, PadTheme};
