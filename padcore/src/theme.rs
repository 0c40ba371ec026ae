//! plainpad theme, palette driven
//!
//! The look is defined by a small JSON palette rather than a stylesheet. The
//! bundled dark palette is compiled in; a palette file on disk can replace it.
//! Every color the app paints with comes out of [`Palette`], including the two
//! gutter colors.

use crate::gutter::GutterTheme;
use crate::storage::{self, Result};
use egui::{Color32, FontFamily, FontId, Rounding, Stroke, Style, TextStyle, Visuals};
use serde::{Deserialize, Serialize};
use std::path::Path;

const BUNDLED_DARK: &str = include_str!("../themes/dark.json");

/// Named colors of a theme. Stored as `#rrggbb` (or `#rrggbbaa`) strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    #[serde(default)]
    pub name: String,
    /// Text area fill.
    #[serde(with = "hex_color")]
    pub background: Color32,
    /// Body text.
    #[serde(with = "hex_color")]
    pub foreground: Color32,
    /// Menu bar, toolbar, status bar and dialog fill.
    #[serde(with = "hex_color")]
    pub panel: Color32,
    #[serde(with = "hex_color")]
    pub border: Color32,
    #[serde(with = "hex_color")]
    pub accent: Color32,
    #[serde(with = "hex_color")]
    pub selection: Color32,
    #[serde(with = "hex_color")]
    pub gutter_background: Color32,
    #[serde(with = "hex_color")]
    pub gutter_foreground: Color32,
}

impl Palette {
    /// The palette shipped inside the binary.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_DARK)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a palette file from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let json = storage::read_text(path)?;
        Self::from_json(&json)
    }
}

/// Parse `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex(s: &str) -> Option<Color32> {
    let hex = s.trim().strip_prefix('#')?;
    if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let (r, g, b) = (byte(0)?, byte(2)?, byte(4)?);
    if hex.len() == 8 {
        Some(Color32::from_rgba_unmultiplied(r, g, b, byte(6)?))
    } else {
        Some(Color32::from_rgb(r, g, b))
    }
}

pub fn to_hex(color: Color32) -> String {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    if a == 255 {
        format!("#{r:02x}{g:02x}{b:02x}")
    } else {
        format!("#{r:02x}{g:02x}{b:02x}{a:02x}")
    }
}

mod hex_color {
    use egui::Color32;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(color: &Color32, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::to_hex(*color))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Color32, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_hex(&raw).ok_or_else(|| D::Error::custom(format!("invalid color {raw:?}")))
    }
}

/// Theme configuration for plainpad
pub struct PadTheme {
    pub palette: Palette,
    pub font_size_body: f32,
    pub font_size_editor: f32,
    pub font_size_small: f32,
    pub window_padding: f32,
    pub item_spacing: f32,
}

impl PadTheme {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            font_size_body: 14.0,
            font_size_editor: 14.0,
            font_size_small: 11.0,
            window_padding: 8.0,
            item_spacing: 4.0,
        }
    }

    pub fn with_editor_font_size(mut self, size: f32) -> Self {
        self.font_size_editor = size.clamp(8.0, 48.0);
        self
    }

    /// Font used by the text area and the gutter.
    pub fn editor_font(&self) -> FontId {
        FontId::monospace(self.font_size_editor)
    }

    pub fn gutter_theme(&self) -> GutterTheme {
        GutterTheme {
            background: self.palette.gutter_background,
            foreground: self.palette.gutter_foreground,
        }
    }

    /// Apply the theme to an egui context. Process-wide, called once at startup.
    pub fn apply(&self, ctx: &egui::Context) {
        let p = &self.palette;
        let mut style = Style::default();

        style.text_styles = [
            (TextStyle::Small, FontId::new(self.font_size_small, FontFamily::Proportional)),
            (TextStyle::Body, FontId::new(self.font_size_body, FontFamily::Proportional)),
            (TextStyle::Button, FontId::new(self.font_size_body, FontFamily::Proportional)),
            (TextStyle::Heading, FontId::new(self.font_size_body + 6.0, FontFamily::Proportional)),
            (TextStyle::Monospace, FontId::new(self.font_size_editor, FontFamily::Monospace)),
        ]
        .into();

        let mut visuals = Visuals::dark();

        visuals.window_fill = p.panel;
        visuals.panel_fill = p.panel;
        visuals.faint_bg_color = p.panel;
        visuals.extreme_bg_color = p.background;
        visuals.code_bg_color = p.background;
        visuals.override_text_color = Some(p.foreground);
        visuals.hyperlink_color = p.accent;

        visuals.window_rounding = Rounding::same(2.0);
        visuals.menu_rounding = Rounding::same(2.0);
        visuals.window_stroke = Stroke::new(1.0, p.border);

        let tint = |ws: &mut egui::style::WidgetVisuals, fill: Color32| {
            ws.bg_fill = fill;
            ws.weak_bg_fill = fill;
            ws.bg_stroke = Stroke::new(1.0, p.border);
            ws.fg_stroke = Stroke::new(1.0, p.foreground);
            ws.rounding = Rounding::same(2.0);
        };
        tint(&mut visuals.widgets.noninteractive, p.panel);
        tint(&mut visuals.widgets.inactive, p.panel);
        tint(&mut visuals.widgets.hovered, p.border);
        tint(&mut visuals.widgets.active, p.accent);
        tint(&mut visuals.widgets.open, p.border);

        visuals.selection.bg_fill = p.selection;
        visuals.selection.stroke = Stroke::new(1.0, p.foreground);

        style.visuals = visuals;

        style.spacing.window_margin = egui::Margin::same(self.window_padding);
        style.spacing.item_spacing = egui::vec2(self.item_spacing, self.item_spacing);
        style.spacing.button_padding = egui::vec2(8.0, 4.0);

        ctx.set_style(style);
    }

    /// Title bar: panel fill, 1px border
    pub fn title_bar_frame(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.palette.panel)
            .stroke(Stroke::new(1.0, self.palette.border))
            .inner_margin(egui::Margin::symmetric(8.0, 4.0))
    }
}

/// Menu bar styling helper
pub fn menu_bar<R>(ui: &mut egui::Ui, add_contents: impl FnOnce(&mut egui::Ui) -> R) -> egui::InnerResponse<R> {
    let fill = ui.visuals().panel_fill;
    let stroke = ui.visuals().window_stroke;
    let frame_resp = egui::Frame::none()
        .fill(fill)
        .stroke(stroke)
        .inner_margin(egui::Margin::symmetric(4.0, 2.0))
        .show(ui, |ui| egui::menu::bar(ui, add_contents).inner);
    egui::InnerResponse {
        inner: frame_resp.inner,
        response: frame_resp.response,
    }
}
