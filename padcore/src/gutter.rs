//! Line-number gutter
//!
//! A narrow strip to the left of the text view. Its width follows the number
//! of digits in the highest line number; its labels follow the text view's
//! scroll position and layout.
//!
//! egui repaints the whole frame, but the gutter still keeps its own label
//! cache and only recomputes what a frame actually invalidated:
//!
//! 1. **Full**: content, size or gutter width changed, or the view jumped by
//!    a whole viewport. Labels are rebuilt from the visible rows.
//! 2. **Scroll**: only the scroll offset moved. Cached labels are shifted by
//!    `dy` and only the newly exposed band is filled in.
//! 3. **Idle**: nothing changed. The cache is painted as is.

use egui::{Align2, Color32, FontId, Painter, Pos2, Rect};
use tracing::debug;

/// Space around the digits, split evenly left and right.
pub const GUTTER_PADDING: f32 = 12.0;

/// The two colors the gutter paints with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GutterTheme {
    pub background: Color32,
    pub foreground: Color32,
}

/// Number of decimal digits in `max(1, n)`.
pub fn digit_count(n: usize) -> usize {
    let mut n = n.max(1);
    let mut digits = 0;
    while n > 0 {
        digits += 1;
        n /= 10;
    }
    digits
}

/// Width needed to show line numbers up to `line_count`.
pub fn gutter_width(line_count: usize, digit_width: f32) -> f32 {
    digit_count(line_count) as f32 * digit_width + GUTTER_PADDING
}

/// Widest of the ten digit glyphs in `font`.
pub fn max_digit_width(ctx: &egui::Context, font: &FontId) -> f32 {
    ctx.fonts(|f| ('0'..='9').map(|c| f.glyph_width(font, c)).fold(0.0, f32::max))
}

/// One laid-out row of the text view, in content coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextRow {
    pub top: f32,
    pub bottom: f32,
    pub ends_with_newline: bool,
}

/// A line number and the vertical extent of its block.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineLabel {
    pub number: usize,
    pub top: f32,
    pub height: f32,
}

/// Blocks overlapping `[from, to)`, in content coordinates.
///
/// A block starts at the first row and after every row ending in a newline,
/// so a wrapped line spans several rows but gets one number.
pub fn blocks_in(rows: &[TextRow], from: f32, to: f32) -> Vec<LineLabel> {
    let mut labels = Vec::new();
    let mut number = 1;
    let mut block_top: Option<f32> = None;
    let last = rows.len().saturating_sub(1);

    for (i, row) in rows.iter().enumerate() {
        let top = *block_top.get_or_insert(row.top);
        if !row.ends_with_newline && i != last {
            continue;
        }
        block_top = None;
        if top >= to {
            break;
        }
        if row.bottom > from {
            labels.push(LineLabel {
                number,
                top,
                height: row.bottom - top,
            });
        }
        number += 1;
    }
    labels
}

/// State of the text view for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scroll_y: f32,
    pub width: f32,
    pub height: f32,
    /// Bumped by the owner whenever the text changes.
    pub revision: u64,
}

/// What a [`Gutter::sync`] call had to do.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GutterRepaint {
    Idle,
    Scroll(f32),
    Full,
}

pub struct Gutter {
    theme: GutterTheme,
    digit_width: f32,
    line_count: usize,
    width: f32,
    viewport: Option<Viewport>,
    /// Cached labels, tops in viewport coordinates.
    labels: Vec<LineLabel>,
    layout_dirty: bool,
}

impl Gutter {
    pub fn new(theme: GutterTheme) -> Self {
        let digit_width = 8.0;
        Self {
            theme,
            digit_width,
            line_count: 1,
            width: gutter_width(1, digit_width),
            viewport: None,
            labels: Vec::new(),
            layout_dirty: true,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn labels(&self) -> &[LineLabel] {
        &self.labels
    }

    /// Returns true if the gutter width changed.
    pub fn set_digit_width(&mut self, digit_width: f32) -> bool {
        if (digit_width - self.digit_width).abs() < f32::EPSILON {
            return false;
        }
        self.digit_width = digit_width;
        self.relayout()
    }

    /// Returns true if the gutter width changed, i.e. the text view's left
    /// margin has to move.
    pub fn set_line_count(&mut self, line_count: usize) -> bool {
        let line_count = line_count.max(1);
        if line_count == self.line_count {
            return false;
        }
        self.line_count = line_count;
        self.relayout()
    }

    fn relayout(&mut self) -> bool {
        let width = gutter_width(self.line_count, self.digit_width);
        let changed = width != self.width;
        if changed {
            debug!(lines = self.line_count, from = self.width, to = width, "gutter width changed");
        }
        self.width = width;
        self.layout_dirty = true;
        changed
    }

    /// Bring the label cache in line with this frame's viewport.
    pub fn sync(&mut self, viewport: Viewport, rows: &[TextRow]) -> GutterRepaint {
        let repaint = self.classify(&viewport);
        match repaint {
            GutterRepaint::Full => self.rebuild(&viewport, rows),
            GutterRepaint::Scroll(dy) => self.scroll(dy, &viewport, rows),
            GutterRepaint::Idle => {}
        }
        self.viewport = Some(viewport);
        self.layout_dirty = false;
        repaint
    }

    fn classify(&self, viewport: &Viewport) -> GutterRepaint {
        let Some(prev) = self.viewport else {
            return GutterRepaint::Full;
        };
        if self.layout_dirty
            || prev.revision != viewport.revision
            || prev.width != viewport.width
            || prev.height != viewport.height
        {
            return GutterRepaint::Full;
        }
        let dy = viewport.scroll_y - prev.scroll_y;
        if dy == 0.0 {
            GutterRepaint::Idle
        } else if dy.abs() >= viewport.height {
            GutterRepaint::Full
        } else {
            GutterRepaint::Scroll(dy)
        }
    }

    fn rebuild(&mut self, viewport: &Viewport, rows: &[TextRow]) {
        let scroll = viewport.scroll_y;
        self.labels = blocks_in(rows, scroll, scroll + viewport.height)
            .into_iter()
            .map(|l| LineLabel { top: l.top - scroll, ..l })
            .collect();
    }

    fn scroll(&mut self, dy: f32, viewport: &Viewport, rows: &[TextRow]) {
        let height = viewport.height;
        for label in &mut self.labels {
            label.top -= dy;
        }
        self.labels.retain(|l| l.top + l.height > 0.0 && l.top < height);

        // scrolling down exposes the bottom edge, scrolling up the top
        let (band_top, band_bottom) = if dy > 0.0 { (height - dy, height) } else { (0.0, -dy) };
        let scroll = viewport.scroll_y;
        for fresh in blocks_in(rows, scroll + band_top, scroll + band_bottom) {
            if !self.labels.iter().any(|l| l.number == fresh.number) {
                self.labels.push(LineLabel { top: fresh.top - scroll, ..fresh });
            }
        }
        self.labels.sort_by_key(|l| l.number);
    }

    /// Paint the strip. `rect` is the gutter's screen rect; its top lines up
    /// with the top of the text viewport.
    pub fn paint(&self, painter: &Painter, rect: Rect, font: &FontId) {
        painter.rect_filled(rect, 0.0, self.theme.background);
        let x = rect.max.x - GUTTER_PADDING / 2.0;
        for label in &self.labels {
            painter.text(
                Pos2::new(x, rect.min.y + label.top),
                Align2::RIGHT_TOP,
                label.number.to_string(),
                font.clone(),
                self.theme.foreground,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme() -> GutterTheme {
        GutterTheme {
            background: Color32::BLACK,
            foreground: Color32::WHITE,
        }
    }

    /// `n` single-row lines, 20px each.
    fn rows(n: usize) -> Vec<TextRow> {
        (0..n)
            .map(|i| TextRow {
                top: i as f32 * 20.0,
                bottom: (i + 1) as f32 * 20.0,
                ends_with_newline: i + 1 < n,
            })
            .collect()
    }

    fn viewport(scroll_y: f32) -> Viewport {
        Viewport { scroll_y, width: 400.0, height: 50.0, revision: 1 }
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(1), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(99), 2);
        assert_eq!(digit_count(100), 3);
        assert_eq!(digit_count(123_456), 6);
    }

    #[test]
    fn test_width_grows_only_at_powers_of_ten() {
        let w = |n| gutter_width(n, 7.0);
        assert_eq!(w(1), w(9));
        assert!(w(10) > w(9));
        assert_eq!(w(10), w(99));
        assert!(w(100) > w(99));
        assert_eq!(w(0), w(1));
        assert_eq!(w(9), 7.0 + GUTTER_PADDING);
    }

    #[test]
    fn test_set_line_count_reports_width_change() {
        let mut gutter = Gutter::new(theme());
        assert!(!gutter.set_line_count(5));
        assert!(!gutter.set_line_count(9));
        let before = gutter.width();
        assert!(gutter.set_line_count(10));
        assert!(gutter.width() > before);
        assert!(!gutter.set_line_count(10));
        assert!(!gutter.set_line_count(42));
        assert!(gutter.set_line_count(3));
        assert_eq!(gutter.width(), before);
    }

    #[test]
    fn test_blocks_in_visible_range() {
        let labels = blocks_in(&rows(10), 0.0, 50.0);
        let numbers: Vec<usize> = labels.iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(labels[2].top, 40.0);
    }

    #[test]
    fn test_wrapped_line_gets_one_number() {
        let rows = vec![
            TextRow { top: 0.0, bottom: 20.0, ends_with_newline: false },
            TextRow { top: 20.0, bottom: 40.0, ends_with_newline: true },
            TextRow { top: 40.0, bottom: 60.0, ends_with_newline: false },
        ];
        let labels = blocks_in(&rows, 0.0, 100.0);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0], LineLabel { number: 1, top: 0.0, height: 40.0 });
        assert_eq!(labels[1], LineLabel { number: 2, top: 40.0, height: 20.0 });
    }

    #[test]
    fn test_first_sync_is_full() {
        let mut gutter = Gutter::new(theme());
        assert_eq!(gutter.sync(viewport(0.0), &rows(10)), GutterRepaint::Full);
        assert_eq!(gutter.labels().len(), 3);
        assert_eq!(gutter.sync(viewport(0.0), &rows(10)), GutterRepaint::Idle);
    }

    #[test]
    fn test_scroll_shift_matches_full_rebuild() {
        let rows = rows(40);
        let mut shifted = Gutter::new(theme());
        shifted.sync(viewport(0.0), &rows);
        assert_eq!(shifted.sync(viewport(30.0), &rows), GutterRepaint::Scroll(30.0));
        assert_eq!(shifted.sync(viewport(10.0), &rows), GutterRepaint::Scroll(-20.0));
        assert_eq!(shifted.sync(viewport(40.0), &rows), GutterRepaint::Scroll(30.0));

        let mut fresh = Gutter::new(theme());
        fresh.sync(viewport(40.0), &rows);
        assert_eq!(shifted.labels(), fresh.labels());
        let numbers: Vec<usize> = fresh.labels().iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![3, 4, 5]);
        assert_eq!(fresh.labels()[0].top, 0.0);
    }

    #[test]
    fn test_large_jump_is_full() {
        let rows = rows(40);
        let mut gutter = Gutter::new(theme());
        gutter.sync(viewport(0.0), &rows);
        assert_eq!(gutter.sync(viewport(500.0), &rows), GutterRepaint::Full);
        assert_eq!(gutter.labels()[0].number, 26);
    }

    #[test]
    fn test_content_and_resize_force_full() {
        let rows = rows(10);
        let mut gutter = Gutter::new(theme());
        gutter.sync(viewport(0.0), &rows);

        let edited = Viewport { revision: 2, ..viewport(0.0) };
        assert_eq!(gutter.sync(edited, &rows), GutterRepaint::Full);

        let taller = Viewport { height: 120.0, ..edited };
        assert_eq!(gutter.sync(taller, &rows), GutterRepaint::Full);
        assert_eq!(gutter.labels().len(), 6);

        gutter.set_line_count(10);
        assert_eq!(gutter.sync(taller, &rows), GutterRepaint::Full);
    }
}
