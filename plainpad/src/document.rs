//! Document metadata for plainpad
//!
//! The text itself lives in the buffer; this is the file it belongs to.

use padcore::storage;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug)]
pub struct Document {
    /// File path if saved
    pub path: Option<PathBuf>,
    /// Ordinal used in "Untitled N" while there is no path
    pub untitled_index: usize,
    /// Whether the document has unsaved changes
    pub modified: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            path: None,
            untitled_index: 1,
            modified: false,
        }
    }

    /// Back to a fresh untitled document with the next ordinal.
    pub fn reset_untitled(&mut self) {
        self.path = None;
        self.untitled_index += 1;
        self.modified = false;
    }

    pub fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn title(&self) -> String {
        match &self.path {
            Some(path) => storage::display_name(path),
            None => format!("Untitled {}", self.untitled_index),
        }
    }

    /// Title with the unsaved marker.
    pub fn display_title(&self) -> String {
        if self.modified {
            format!("{}*", self.title())
        } else {
            self.title()
        }
    }
}
