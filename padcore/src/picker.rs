//! In-app open/save file picker.
//!
//! Lists one directory at a time, folders first. The picker owns no
//! document state: `show` reports what the user chose and the caller acts.

use crate::storage;
use crate::widgets::{self, FileListItem};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickerMode {
    Open,
    Save,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    Pending,
    Cancelled,
    Chosen(PathBuf),
}

#[derive(Debug, Clone)]
pub struct PickerEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_directory: bool,
}

pub struct FilePicker {
    pub mode: PickerMode,
    pub current_dir: PathBuf,
    pub entries: Vec<PickerEntry>,
    pub selected_index: Option<usize>,
    pub filename: String,
    /// Lowercase extensions shown when `show_all` is off. Empty means no filter.
    pub filter_extensions: Vec<String>,
    pub show_all: bool,
}

impl FilePicker {
    pub fn new(mode: PickerMode, start_dir: PathBuf) -> Self {
        let mut picker = Self {
            mode,
            current_dir: start_dir,
            entries: Vec::new(),
            selected_index: None,
            filename: String::new(),
            filter_extensions: Vec::new(),
            show_all: false,
        };
        picker.refresh();
        picker
    }

    pub fn with_filter(mut self, extensions: &[&str]) -> Self {
        self.filter_extensions = extensions.iter().map(|e| e.to_lowercase()).collect();
        self.refresh();
        self
    }

    /// Prefill the save name, e.g. with the current document's name.
    pub fn with_filename(mut self, name: impl Into<String>) -> Self {
        self.filename = name.into();
        self
    }

    pub fn refresh(&mut self) {
        self.entries.clear();
        self.selected_index = None;

        if let Some(parent) = self.current_dir.parent() {
            self.entries.push(PickerEntry {
                name: "..".to_string(),
                path: parent.to_path_buf(),
                is_directory: true,
            });
        }

        let read_dir = match std::fs::read_dir(&self.current_dir) {
            Ok(rd) => rd,
            Err(e) => {
                tracing::warn!("cannot list {}: {}", self.current_dir.display(), e);
                return;
            }
        };

        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for entry in read_dir.flatten() {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            let is_directory = path.is_dir();
            if !is_directory && !self.accepts(&path) {
                continue;
            }
            let entry = PickerEntry { name, path, is_directory };
            if is_directory {
                dirs.push(entry);
            } else {
                files.push(entry);
            }
        }

        dirs.sort_by_key(|e| e.name.to_lowercase());
        files.sort_by_key(|e| e.name.to_lowercase());
        self.entries.extend(dirs);
        self.entries.extend(files);
    }

    fn accepts(&self, path: &Path) -> bool {
        if self.show_all || self.filter_extensions.is_empty() {
            return true;
        }
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        self.filter_extensions.iter().any(|f| *f == ext)
    }

    pub fn navigate_to(&mut self, dir: PathBuf) {
        if dir.is_dir() {
            self.current_dir = dir;
            self.refresh();
        }
    }

    pub fn selected_entry(&self) -> Option<&PickerEntry> {
        self.selected_index.and_then(|i| self.entries.get(i))
    }

    /// Click on a row. Selecting a file in save mode copies its name into
    /// the filename field.
    pub fn select(&mut self, index: usize) {
        self.selected_index = Some(index);
        if self.mode == PickerMode::Save {
            if let Some(entry) = self.entries.get(index) {
                if !entry.is_directory {
                    self.filename = entry.name.clone();
                }
            }
        }
    }

    /// Double-click on a row: enter folders, choose files in open mode.
    pub fn activate(&mut self, index: usize) -> Option<PathBuf> {
        let entry = self.entries.get(index)?.clone();
        if entry.is_directory {
            self.navigate_to(entry.path);
            None
        } else {
            self.select(index);
            self.confirm()
        }
    }

    /// The path the confirm button would produce, if any.
    pub fn confirm(&self) -> Option<PathBuf> {
        match self.mode {
            PickerMode::Open => self
                .selected_entry()
                .filter(|e| !e.is_directory)
                .map(|e| e.path.clone()),
            PickerMode::Save => {
                let name = self.filename.trim();
                if name.is_empty() {
                    None
                } else {
                    Some(self.current_dir.join(name))
                }
            }
        }
    }

    pub fn show(&mut self, ctx: &egui::Context) -> PickerOutcome {
        let title = match self.mode {
            PickerMode::Open => "Open",
            PickerMode::Save => "Save As",
        };
        let mut outcome = PickerOutcome::Pending;

        widgets::dialog_window(title).default_width(380.0).show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Location:");
                ui.label(self.current_dir.to_string_lossy().to_string());
            });
            ui.separator();

            let mut clicked = None;
            let mut activated = None;
            egui::ScrollArea::vertical().max_height(240.0).show(ui, |ui| {
                for (idx, entry) in self.entries.iter().enumerate() {
                    let selected = self.selected_index == Some(idx);
                    let response = ui.add(FileListItem::new(&entry.name, entry.is_directory).selected(selected));
                    if response.double_clicked() {
                        activated = Some(idx);
                    } else if response.clicked() {
                        clicked = Some(idx);
                    }
                }
            });
            if let Some(idx) = clicked {
                self.select(idx);
            }
            if let Some(idx) = activated {
                if let Some(path) = self.activate(idx) {
                    outcome = PickerOutcome::Chosen(path);
                }
            }

            ui.separator();
            if self.mode == PickerMode::Save {
                ui.horizontal(|ui| {
                    ui.label("File name:");
                    ui.text_edit_singleline(&mut self.filename);
                });
            }
            if !self.filter_extensions.is_empty() && ui.checkbox(&mut self.show_all, "Show all files").changed() {
                self.refresh();
            }

            ui.separator();
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    outcome = PickerOutcome::Cancelled;
                }
                let label = match self.mode {
                    PickerMode::Open => "Open",
                    PickerMode::Save => "Save",
                };
                let target = self.confirm();
                if ui.add_enabled(target.is_some(), egui::Button::new(label)).clicked() {
                    if let Some(path) = target {
                        outcome = PickerOutcome::Chosen(path);
                    }
                }
            });
        });

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            outcome = PickerOutcome::Cancelled;
        }
        if let PickerOutcome::Chosen(path) = &outcome {
            tracing::debug!("picker chose {}", storage::display_name(path));
        }
        outcome
    }
}
