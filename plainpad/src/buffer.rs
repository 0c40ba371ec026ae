//! Text buffer: the document text, the selection and the undo history.
//!
//! The history is egui's `Undoer`, the same engine `TextEdit` uses
//! internally. Typing in the widget is fed in every frame and grouped by
//! the undoer's stable-time rule; programmatic edits (paste, cut) are
//! bracketed by explicit checkpoints so each one is a single undo step.
//!
//! Every mutation queues `BufferSignal`s. The owner drains them right after
//! the mutation and routes them to whoever cares.

use egui::util::undoer::Undoer;
use padcore::text;

/// Selection in char indices. `anchor == cursor` is a plain caret.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub cursor: usize,
}

impl Selection {
    pub fn caret(pos: usize) -> Self {
        Self { anchor: pos, cursor: pos }
    }

    pub fn new(anchor: usize, cursor: usize) -> Self {
        Self { anchor, cursor }
    }

    /// Ordered `(start, end)`.
    pub fn range(&self) -> (usize, usize) {
        (self.anchor.min(self.cursor), self.anchor.max(self.cursor))
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.cursor
    }

    fn clamp(self, len: usize) -> Self {
        Self::new(self.anchor.min(len), self.cursor.min(len))
    }
}

/// What the undoer stores. Equality ignores the selection so that moving
/// the caret never creates an undo step.
#[derive(Debug, Clone, Default)]
struct Snapshot {
    text: String,
    selection: Selection,
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferSignal {
    TextChanged,
    CursorMoved,
    /// Whether the selection is now non-empty.
    SelectionChanged(bool),
    UndoAvailable(bool),
    RedoAvailable(bool),
}

pub struct TextBuffer {
    text: String,
    selection: Selection,
    history: Undoer<Snapshot>,
    /// Seconds, as last seen from the UI clock.
    clock: f64,
    signals: Vec<BufferSignal>,
    undo_available: bool,
    redo_available: bool,
    has_selection: bool,
    /// The selection was changed from code and the widget must pick it up.
    cursor_sync: bool,
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuffer {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            selection: Selection::default(),
            history: Undoer::default(),
            clock: 0.0,
            signals: Vec::new(),
            undo_available: false,
            redo_available: false,
            has_selection: false,
            cursor_sync: false,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    pub fn selected_text(&self) -> &str {
        let (start, end) = self.selection.range();
        text::char_slice(&self.text, start, end)
    }

    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty()
    }

    /// Replace the whole text and start a fresh history.
    pub fn set_text(&mut self, text: String) {
        self.text = text;
        self.history = Undoer::default();
        self.set_selection(Selection::caret(0));
        self.signals.push(BufferSignal::TextChanged);
        self.refresh_history_flags();
    }

    pub fn clear(&mut self) {
        self.set_text(String::new());
    }

    /// Move the selection from code. Out-of-range indices are clamped.
    pub fn select(&mut self, selection: Selection) {
        let len = self.len_chars();
        self.set_selection(selection.clamp(len));
    }

    /// Replace the selection with `insert`, leaving a caret after it. One
    /// undo step.
    pub fn replace_selection(&mut self, insert: &str) {
        let (start, end) = self.selection.range();
        if start == end && insert.is_empty() {
            return;
        }
        self.history.add_undo(&self.snapshot());

        let start_b = text::char_to_byte(&self.text, start);
        let end_b = text::char_to_byte(&self.text, end);
        self.text.replace_range(start_b..end_b, insert);
        self.set_selection(Selection::caret(start + insert.chars().count()));

        let after = self.snapshot();
        // feed_state drops the redo stack, add_undo closes the step
        self.history.feed_state(self.clock, &after);
        self.history.add_undo(&after);

        self.signals.push(BufferSignal::TextChanged);
        self.refresh_history_flags();
    }

    pub fn delete_selection(&mut self) {
        self.replace_selection("");
    }

    pub fn can_undo(&self) -> bool {
        self.history.has_undo(&self.snapshot())
    }

    pub fn can_redo(&self) -> bool {
        self.history.has_redo(&self.snapshot())
    }

    /// Returns false when there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let current = self.snapshot();
        let restored = self.history.undo(&current).cloned();
        self.restore(restored)
    }

    pub fn redo(&mut self) -> bool {
        let current = self.snapshot();
        let restored = self.history.redo(&current).cloned();
        self.restore(restored)
    }

    fn restore(&mut self, snapshot: Option<Snapshot>) -> bool {
        let Some(snapshot) = snapshot else {
            self.refresh_history_flags();
            return false;
        };
        let changed = snapshot.text != self.text;
        self.text = snapshot.text;
        let len = self.len_chars();
        self.set_selection(snapshot.selection.clamp(len));
        if changed {
            self.signals.push(BufferSignal::TextChanged);
        }
        self.refresh_history_flags();
        true
    }

    /// Next match of `query` at or after the selection end. Literal text,
    /// no wrap-around.
    pub fn find_forward(&self, query: &str, case_sensitive: bool) -> Option<Selection> {
        let needle: Vec<char> = query.chars().collect();
        if needle.is_empty() {
            return None;
        }
        let hay: Vec<char> = self.text.chars().collect();
        let from = self.selection.range().1;
        if needle.len() > hay.len() {
            return None;
        }

        let same = |a: char, b: char| {
            if case_sensitive {
                a == b
            } else {
                a == b || a.to_lowercase().eq(b.to_lowercase())
            }
        };
        (from..=hay.len() - needle.len())
            .find(|&start| needle.iter().zip(&hay[start..]).all(|(n, h)| same(*n, *h)))
            .map(|start| Selection::new(start, start + needle.len()))
    }

    // Widget side. The app hands `text_mut` to a `TextEdit`, then reports
    // back what the widget did.

    /// Let the history see the current state. Call once per frame so the
    /// stable-time grouping of typed text advances even when idle.
    pub fn feed_history(&mut self, time: f64) {
        self.clock = time;
        self.history.feed_state(time, &self.snapshot());
        self.refresh_history_flags();
    }

    pub fn text_mut(&mut self) -> &mut String {
        &mut self.text
    }

    /// The widget changed the text.
    pub fn widget_edited(&mut self, time: f64) {
        self.signals.push(BufferSignal::TextChanged);
        self.feed_history(time);
    }

    /// The widget reports where its cursor is.
    pub fn widget_cursor(&mut self, selection: Selection) {
        if self.cursor_sync {
            // our own selection has not reached the widget yet
            return;
        }
        let len = self.len_chars();
        self.set_selection(selection.clamp(len));
        self.cursor_sync = false;
    }

    /// A selection set from code that the widget still has to adopt.
    pub fn take_cursor_sync(&mut self) -> Option<Selection> {
        if std::mem::take(&mut self.cursor_sync) {
            Some(self.selection)
        } else {
            None
        }
    }

    pub fn drain_signals(&mut self) -> Vec<BufferSignal> {
        std::mem::take(&mut self.signals)
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            text: self.text.clone(),
            selection: self.selection,
        }
    }

    fn set_selection(&mut self, selection: Selection) {
        if selection != self.selection {
            self.selection = selection;
            self.signals.push(BufferSignal::CursorMoved);
            self.cursor_sync = true;
        }
        let has_selection = !selection.is_empty();
        if has_selection != self.has_selection {
            self.has_selection = has_selection;
            self.signals.push(BufferSignal::SelectionChanged(has_selection));
        }
    }

    fn refresh_history_flags(&mut self) {
        let undo = self.can_undo();
        if undo != self.undo_available {
            self.undo_available = undo;
            self.signals.push(BufferSignal::UndoAvailable(undo));
        }
        let redo = self.can_redo();
        if redo != self.redo_available {
            self.redo_available = redo;
            self.signals.push(BufferSignal::RedoAvailable(redo));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with(text: &str) -> TextBuffer {
        let mut buffer = TextBuffer::new();
        buffer.set_text(text.to_string());
        buffer.drain_signals();
        buffer
    }

    #[test]
    fn test_replace_selection() {
        let mut buffer = buffer_with("hello world");
        buffer.select(Selection::new(6, 11));
        assert_eq!(buffer.selected_text(), "world");
        buffer.replace_selection("there");
        assert_eq!(buffer.text(), "hello there");
        assert_eq!(buffer.selection(), Selection::caret(11));
    }

    #[test]
    fn test_replace_multibyte() {
        let mut buffer = buffer_with("héllo");
        buffer.select(Selection::new(1, 2));
        buffer.replace_selection("e");
        assert_eq!(buffer.text(), "hello");
    }

    #[test]
    fn test_fresh_text_has_no_history() {
        let buffer = buffer_with("loaded from disk");
        assert!(!buffer.can_undo());
        assert!(!buffer.can_redo());
    }

    #[test]
    fn test_undo_redo_cycle() {
        let mut buffer = buffer_with("abc");
        buffer.select(Selection::caret(3));
        buffer.replace_selection("d");
        assert!(buffer.can_undo());
        assert!(!buffer.can_redo());

        assert!(buffer.undo());
        assert_eq!(buffer.text(), "abc");
        assert!(!buffer.can_undo());
        assert!(buffer.can_redo());

        assert!(buffer.redo());
        assert_eq!(buffer.text(), "abcd");
        assert!(buffer.can_undo());
        assert!(!buffer.can_redo());
    }

    #[test]
    fn test_two_steps_undo_in_order() {
        let mut buffer = buffer_with("");
        buffer.replace_selection("one");
        buffer.replace_selection(" two");
        assert!(buffer.undo());
        assert_eq!(buffer.text(), "one");
        assert!(buffer.undo());
        assert_eq!(buffer.text(), "");
        assert!(!buffer.undo());
    }

    #[test]
    fn test_edit_after_undo_drops_redo() {
        let mut buffer = buffer_with("");
        buffer.replace_selection("a");
        buffer.replace_selection("b");
        buffer.undo();
        buffer.replace_selection("c");
        assert_eq!(buffer.text(), "ac");
        assert!(!buffer.can_redo());
        assert!(!buffer.redo());
        assert_eq!(buffer.text(), "ac");
    }

    #[test]
    fn test_signals_for_selection_and_history() {
        let mut buffer = buffer_with("some text");
        buffer.select(Selection::new(0, 4));
        let signals = buffer.drain_signals();
        assert!(signals.contains(&BufferSignal::CursorMoved));
        assert!(signals.contains(&BufferSignal::SelectionChanged(true)));

        buffer.delete_selection();
        let signals = buffer.drain_signals();
        assert!(signals.contains(&BufferSignal::TextChanged));
        assert!(signals.contains(&BufferSignal::SelectionChanged(false)));
        assert!(signals.contains(&BufferSignal::UndoAvailable(true)));

        buffer.undo();
        let signals = buffer.drain_signals();
        assert!(signals.contains(&BufferSignal::RedoAvailable(true)));
        assert!(signals.contains(&BufferSignal::UndoAvailable(false)));
    }

    #[test]
    fn test_caret_move_is_not_an_edit() {
        let mut buffer = buffer_with("abc");
        buffer.select(Selection::caret(2));
        assert!(!buffer.can_undo());
        assert!(!buffer.drain_signals().contains(&BufferSignal::TextChanged));
    }

    #[test]
    fn test_widget_typing_is_undoable() {
        let mut buffer = buffer_with("abc");
        buffer.feed_history(0.0);
        buffer.text_mut().push('d');
        buffer.widget_edited(0.1);
        assert!(buffer.can_undo());
        assert!(buffer.undo());
        assert_eq!(buffer.text(), "abc");
    }

    #[test]
    fn test_cursor_sync_round_trip() {
        let mut buffer = buffer_with("abcdef");
        buffer.select(Selection::new(1, 3));
        // widget still reports its stale caret until it has been told
        buffer.widget_cursor(Selection::caret(0));
        assert_eq!(buffer.selection(), Selection::new(1, 3));
        assert_eq!(buffer.take_cursor_sync(), Some(Selection::new(1, 3)));
        assert_eq!(buffer.take_cursor_sync(), None);
        buffer.widget_cursor(Selection::caret(5));
        assert_eq!(buffer.selection(), Selection::caret(5));
    }

    #[test]
    fn test_find_forward() {
        let mut buffer = buffer_with("Foo bar foo BAR");
        assert_eq!(buffer.find_forward("bar", false), Some(Selection::new(4, 7)));
        assert_eq!(buffer.find_forward("BAR", true), Some(Selection::new(12, 15)));

        buffer.select(Selection::new(4, 7));
        assert_eq!(buffer.find_forward("bar", false), Some(Selection::new(12, 15)));
        buffer.select(Selection::new(12, 15));
        assert_eq!(buffer.find_forward("bar", false), None);
        assert_eq!(buffer.find_forward("", false), None);
    }

    #[test]
    fn test_find_longer_than_text() {
        let buffer = buffer_with("ab");
        assert_eq!(buffer.find_forward("abc", false), None);
    }
}
