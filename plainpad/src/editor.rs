//! Editor controller
//!
//! Owns the one document, its buffer and the action registry, and runs
//! every action. Nothing in here draws: operations that need user input
//! return a [`Prompt`] for the app to show, and failures are queued as
//! [`Notice`]s for the app to present.

use crate::actions::{ActionId, ActionRegistry, EditCommand};
use crate::buffer::{BufferSignal, TextBuffer};
use crate::clipboard::Clipboard;
use crate::document::Document;
use crate::status::StatusLine;
use padcore::storage::{self, RecentFiles};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A blocking message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Error { title: String, message: String },
    Info { title: String, message: String },
}

impl Notice {
    pub fn title(&self) -> &str {
        match self {
            Notice::Error { title, .. } | Notice::Info { title, .. } => title,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Notice::Error { message, .. } | Notice::Info { message, .. } => message,
        }
    }
}

/// Input an action needs before it can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
    OpenPath,
    SavePath,
    SearchQuery,
}

pub struct Editor {
    pub buffer: TextBuffer,
    pub document: Document,
    pub actions: ActionRegistry,
    pub status: StatusLine,
    pub recent: RecentFiles,
    pub case_sensitive_search: bool,
    /// Last clipboard or history command, for Repeat.
    last_edit: Option<EditCommand>,
    notices: VecDeque<Notice>,
    clipboard: Box<dyn Clipboard>,
    recent_dirty: bool,
    /// Bumped on every text change.
    revision: u64,
}

impl Editor {
    pub fn new(clipboard: Box<dyn Clipboard>, recent: RecentFiles) -> Self {
        Self {
            buffer: TextBuffer::new(),
            document: Document::new(),
            actions: ActionRegistry::new(),
            status: StatusLine::default(),
            recent,
            case_sensitive_search: false,
            last_edit: None,
            notices: VecDeque::new(),
            clipboard,
            recent_dirty: false,
            revision: 0,
        }
    }

    /// Run an action. Disabled actions are filtered out by the caller.
    pub fn trigger(&mut self, id: ActionId) -> Option<Prompt> {
        debug!("action {:?}", id);
        match id {
            ActionId::New => self.new_document(),
            ActionId::Close => self.close(),
            ActionId::Open => return Some(Prompt::OpenPath),
            ActionId::Save => {
                if self.document.path.is_none() {
                    return Some(Prompt::SavePath);
                }
                self.save();
            }
            ActionId::SaveAs => return Some(Prompt::SavePath),
            ActionId::Repeat => self.repeat(),
            ActionId::Search => return Some(Prompt::SearchQuery),
            ActionId::Copy | ActionId::Paste | ActionId::Cut | ActionId::Undo | ActionId::Redo => {
                if let Some(cmd) = id.edit_command() {
                    self.edit(cmd);
                }
            }
        }
        None
    }

    pub fn last_edit(&self) -> Option<EditCommand> {
        self.last_edit
    }

    /// Run an edit command and remember it for Repeat.
    pub fn edit(&mut self, cmd: EditCommand) {
        self.last_edit = Some(cmd);
        self.run_edit(cmd);
    }

    /// Re-run the last edit command. A no-op until one has run.
    pub fn repeat(&mut self) {
        if let Some(cmd) = self.last_edit {
            self.run_edit(cmd);
        }
    }

    fn run_edit(&mut self, cmd: EditCommand) {
        match cmd {
            EditCommand::Copy => self.copy_selection(),
            EditCommand::Cut => {
                if self.buffer.has_selection() {
                    self.copy_selection();
                    self.buffer.delete_selection();
                }
            }
            EditCommand::Paste => {
                if let Some(text) = self.clipboard.get_text().filter(|t| !t.is_empty()) {
                    self.buffer.replace_selection(&text);
                }
            }
            EditCommand::Undo => {
                self.buffer.undo();
            }
            EditCommand::Redo => {
                self.buffer.redo();
            }
        }
        self.pump_signals();
    }

    fn copy_selection(&mut self) {
        if self.buffer.has_selection() {
            let text = self.buffer.selected_text().to_string();
            self.clipboard.set_text(&text);
        }
    }

    pub fn new_document(&mut self) {
        self.buffer.clear();
        self.document.reset_untitled();
        self.settle_clean();
    }

    pub fn close(&mut self) {
        info!("closed {}", self.document.title());
        self.new_document();
    }

    /// Load `path` into the buffer. On failure nothing changes and an error
    /// notice is queued.
    pub fn open_path(&mut self, path: PathBuf) -> bool {
        match storage::read_text(&path) {
            Ok(text) => {
                info!("opened {}", path.display());
                self.buffer.set_text(text);
                self.document.set_path(path.clone());
                self.settle_clean();
                self.recent.add(path);
                self.recent_dirty = true;
                true
            }
            Err(e) => {
                warn!("open {} failed: {}", path.display(), e);
                self.notices.push_back(Notice::Error {
                    title: "Open failed".to_string(),
                    message: format!("Could not open {}:\n{}", path.display(), e),
                });
                false
            }
        }
    }

    /// Write the buffer to the document's path. Untitled documents need
    /// `save_as_path` instead.
    pub fn save(&mut self) -> bool {
        let Some(path) = self.document.path.clone() else {
            return false;
        };
        match storage::write_text(&path, self.buffer.text()) {
            Ok(()) => {
                info!("saved {}", path.display());
                self.document.modified = false;
                true
            }
            Err(e) => {
                warn!("save {} failed: {}", path.display(), e);
                self.notices.push_back(Notice::Error {
                    title: "Save failed".to_string(),
                    message: format!("Could not save {}:\n{}", path.display(), e),
                });
                false
            }
        }
    }

    /// The path is taken even if the write then fails.
    pub fn save_as_path(&mut self, path: PathBuf) -> bool {
        self.document.set_path(path);
        self.save()
    }

    /// Select the next match after the selection. A miss queues one
    /// informational notice and leaves the selection alone.
    pub fn search(&mut self, query: &str) -> bool {
        if query.is_empty() {
            return false;
        }
        match self.buffer.find_forward(query, self.case_sensitive_search) {
            Some(found) => {
                self.buffer.select(found);
                self.pump_signals();
                true
            }
            None => {
                self.notices.push_back(Notice::Info {
                    title: "Search".to_string(),
                    message: format!("\"{}\" was not found.", query),
                });
                false
            }
        }
    }

    /// Route buffer signals to the registry, the status line and the
    /// modified flag. Call after every buffer mutation.
    pub fn pump_signals(&mut self) {
        for signal in self.buffer.drain_signals() {
            match signal {
                BufferSignal::TextChanged => {
                    self.revision += 1;
                    self.document.modified = true;
                    self.status.update_words(self.buffer.text());
                    self.status.update_position(self.buffer.text(), self.buffer.selection().cursor);
                }
                BufferSignal::CursorMoved => {
                    self.status.update_position(self.buffer.text(), self.buffer.selection().cursor);
                }
                BufferSignal::SelectionChanged(any) => {
                    self.actions.set_enabled(ActionId::Copy, any);
                    self.actions.set_enabled(ActionId::Cut, any);
                }
                BufferSignal::UndoAvailable(available) => {
                    self.actions.set_enabled(ActionId::Undo, available);
                }
                BufferSignal::RedoAvailable(available) => {
                    self.actions.set_enabled(ActionId::Redo, available);
                }
            }
        }
    }

    fn settle_clean(&mut self) {
        self.pump_signals();
        self.document.modified = false;
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn window_title(&self) -> String {
        format!("{} - plainpad", self.document.display_title())
    }

    pub fn current_notice(&self) -> Option<&Notice> {
        self.notices.front()
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    pub fn notice_count(&self) -> usize {
        self.notices.len()
    }

    /// True once after the recent list changed.
    pub fn take_recent_dirty(&mut self) -> bool {
        std::mem::take(&mut self.recent_dirty)
    }

    pub fn forget_recent(&mut self, path: &Path) {
        self.recent.remove(path);
        self.recent_dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Selection;
    use crate::clipboard::MemoryClipboard;

    fn editor() -> Editor {
        Editor::new(Box::new(MemoryClipboard::default()), RecentFiles::new(10))
    }

    fn type_text(editor: &mut Editor, text: &str) {
        editor.buffer.replace_selection(text);
        editor.pump_signals();
    }

    fn select(editor: &mut Editor, anchor: usize, cursor: usize) {
        editor.buffer.select(Selection::new(anchor, cursor));
        editor.pump_signals();
    }

    #[test]
    fn test_save_then_open_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("round.txt");
        let text = "line one\n\tline two ünï\n\n";

        let mut ed = editor();
        type_text(&mut ed, text);
        assert!(ed.save_as_path(path.clone()));
        assert!(!ed.document.modified);

        let mut other = editor();
        assert!(other.open_path(path.clone()));
        assert_eq!(other.buffer.text(), text);
        assert_eq!(other.document.path(), Some(path.as_path()));
        assert!(!other.document.modified);
        assert!(!other.actions.is_enabled(ActionId::Undo));
        assert_eq!(other.recent.files, vec![path]);
    }

    #[test]
    fn test_new_and_close_reset_document() {
        let mut ed = editor();
        assert_eq!(ed.window_title(), "Untitled 1 - plainpad");
        type_text(&mut ed, "scratch");
        assert_eq!(ed.window_title(), "Untitled 1* - plainpad");

        ed.trigger(ActionId::New);
        assert_eq!(ed.buffer.text(), "");
        assert!(ed.document.path.is_none());
        assert_eq!(ed.window_title(), "Untitled 2 - plainpad");

        type_text(&mut ed, "more");
        ed.trigger(ActionId::Close);
        assert_eq!(ed.buffer.text(), "");
        assert_eq!(ed.document.title(), "Untitled 3");
        assert!(!ed.actions.is_enabled(ActionId::Undo));
    }

    #[test]
    fn test_copy_cut_follow_selection() {
        let mut ed = editor();
        type_text(&mut ed, "hello world");
        assert!(!ed.actions.is_enabled(ActionId::Copy));
        select(&mut ed, 0, 5);
        assert!(ed.actions.is_enabled(ActionId::Copy));
        assert!(ed.actions.is_enabled(ActionId::Cut));
        select(&mut ed, 3, 3);
        assert!(!ed.actions.is_enabled(ActionId::Copy));
        assert!(!ed.actions.is_enabled(ActionId::Cut));
    }

    #[test]
    fn test_undo_redo_follow_history() {
        let mut ed = editor();
        assert!(!ed.actions.is_enabled(ActionId::Undo));
        type_text(&mut ed, "abc");
        assert!(ed.actions.is_enabled(ActionId::Undo));
        assert!(!ed.actions.is_enabled(ActionId::Redo));

        ed.trigger(ActionId::Undo);
        assert_eq!(ed.buffer.text(), "");
        assert!(!ed.actions.is_enabled(ActionId::Undo));
        assert!(ed.actions.is_enabled(ActionId::Redo));

        ed.trigger(ActionId::Redo);
        assert_eq!(ed.buffer.text(), "abc");
        assert!(!ed.actions.is_enabled(ActionId::Redo));
    }

    #[test]
    fn test_cut_paste_through_clipboard() {
        let mut ed = editor();
        type_text(&mut ed, "cut me");
        select(&mut ed, 0, 4);
        ed.trigger(ActionId::Cut);
        assert_eq!(ed.buffer.text(), "me");
        select(&mut ed, 2, 2);
        ed.trigger(ActionId::Paste);
        assert_eq!(ed.buffer.text(), "mecut ");
    }

    #[test]
    fn test_repeat_without_edit_is_noop() {
        let mut ed = editor();
        type_text(&mut ed, "abc");
        ed.trigger(ActionId::Repeat);
        assert_eq!(ed.buffer.text(), "abc");
        assert_eq!(ed.last_edit(), None);
    }

    #[test]
    fn test_repeat_after_undo_undoes_again() {
        let mut ed = editor();
        type_text(&mut ed, "one");
        type_text(&mut ed, " two");
        ed.trigger(ActionId::Undo);
        assert_eq!(ed.buffer.text(), "one");
        ed.trigger(ActionId::Repeat);
        assert_eq!(ed.buffer.text(), "");
        assert_eq!(ed.last_edit(), Some(EditCommand::Undo));
    }

    #[test]
    fn test_repeat_paste_and_marker_survives_search() {
        let mut ed = editor();
        type_text(&mut ed, "ab");
        select(&mut ed, 0, 2);
        ed.trigger(ActionId::Copy);
        select(&mut ed, 2, 2);
        ed.trigger(ActionId::Paste);
        assert_eq!(ed.buffer.text(), "abab");

        ed.search("zzz");
        ed.dismiss_notice();
        select(&mut ed, 4, 4);
        ed.trigger(ActionId::Repeat);
        assert_eq!(ed.buffer.text(), "ababab");
        assert_eq!(ed.last_edit(), Some(EditCommand::Paste));
    }

    #[test]
    fn test_search_hit_selects_match() {
        let mut ed = editor();
        type_text(&mut ed, "alpha Beta gamma beta");
        select(&mut ed, 0, 0);
        assert!(ed.search("beta"));
        assert_eq!(ed.buffer.selection(), Selection::new(6, 10));
        assert!(ed.actions.is_enabled(ActionId::Copy));
        assert!(ed.search("beta"));
        assert_eq!(ed.buffer.selection(), Selection::new(17, 21));
        assert_eq!(ed.notice_count(), 0);
    }

    #[test]
    fn test_search_miss_one_notice_cursor_kept() {
        let mut ed = editor();
        type_text(&mut ed, "nothing here");
        select(&mut ed, 2, 4);
        assert!(!ed.search("absent"));
        assert_eq!(ed.notice_count(), 1);
        assert!(matches!(ed.current_notice(), Some(Notice::Info { .. })));
        assert_eq!(ed.buffer.selection(), Selection::new(2, 4));

        assert!(!ed.search("absent"));
        assert_eq!(ed.notice_count(), 2);
    }

    #[test]
    fn test_empty_search_does_nothing() {
        let mut ed = editor();
        type_text(&mut ed, "text");
        assert!(!ed.search(""));
        assert_eq!(ed.notice_count(), 0);
    }

    #[test]
    fn test_failed_open_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = editor();
        type_text(&mut ed, "keep me");
        assert!(!ed.open_path(dir.path().join("missing.txt")));
        assert_eq!(ed.buffer.text(), "keep me");
        assert!(ed.document.path.is_none());
        assert!(ed.actions.is_enabled(ActionId::Undo));
        assert_eq!(ed.notice_count(), 1);
        assert!(matches!(ed.current_notice(), Some(Notice::Error { .. })));
        assert!(ed.recent.files.is_empty());
    }

    #[test]
    fn test_save_untitled_prompts() {
        let mut ed = editor();
        assert_eq!(ed.trigger(ActionId::Save), Some(Prompt::SavePath));
        assert_eq!(ed.trigger(ActionId::SaveAs), Some(Prompt::SavePath));
        assert_eq!(ed.trigger(ActionId::Open), Some(Prompt::OpenPath));
        assert_eq!(ed.trigger(ActionId::Search), Some(Prompt::SearchQuery));
    }

    #[test]
    fn test_save_failure_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut ed = editor();
        type_text(&mut ed, "unsaved");
        // a directory cannot be written as a file
        assert!(!ed.save_as_path(dir.path().to_path_buf()));
        assert_eq!(ed.notice_count(), 1);
        assert!(ed.document.modified);
        assert_eq!(ed.current_notice().map(|n| n.title()), Some("Save failed"));
    }

    #[test]
    fn test_status_tracks_text_and_caret() {
        let mut ed = editor();
        type_text(&mut ed, "one two\nthree");
        assert_eq!(ed.status.words_label(), "Words: 3");
        assert_eq!(ed.status.position_label(), "Ln 2, Col 6");
        select(&mut ed, 4, 4);
        assert_eq!(ed.status.position_label(), "Ln 1, Col 5");
    }
}
