//! plainpad application
//!
//! One window, one document. The menu bar, toolbar and key bindings all
//! fire actions from the registry; the editor controller runs them and
//! this module only draws and collects input.

use crate::actions::{route_events, ActionId, EDIT_MENU, FILE_MENU, TOOLBAR};
use crate::buffer::Selection;
use crate::clipboard::SystemClipboard;
use crate::editor::{Editor, Notice, Prompt};
use crate::settings::Settings;
use egui::text::{CCursor, CCursorRange};
use egui::{Context, Id, Key, Modifiers};
use padcore::gutter::{max_digit_width, TextRow, Viewport};
use padcore::picker::{FilePicker, PickerMode, PickerOutcome};
use padcore::storage::{config_dir, documents_dir, RecentFiles};
use padcore::theme::menu_bar;
use padcore::widgets::{self, status_bar, toolbar_button, toolbar_separator};
use padcore::{text, Gutter, PadTheme};
use std::path::PathBuf;
use tracing::warn;

const EDITOR_ID: &str = "plainpad_text";

struct SearchPrompt {
    query: String,
    focus: bool,
}

/// Application state
pub struct PlainpadApp {
    editor: Editor,
    theme: PadTheme,
    gutter: Gutter,
    picker: Option<FilePicker>,
    search_prompt: Option<SearchPrompt>,
    last_query: String,
    show_shortcuts: bool,
    show_about: bool,
    /// Give the text view keyboard focus on the next frame.
    refocus: bool,
    window_title: String,
    recent_path: PathBuf,
}

impl PlainpadApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, theme: PadTheme, settings: &Settings) -> Self {
        let recent_path = config_dir("plainpad").join("recent.json");
        let mut recent = match RecentFiles::load(&recent_path) {
            Ok(recent) => recent,
            Err(e) => {
                if recent_path.exists() {
                    warn!("ignoring {}: {}", recent_path.display(), e);
                }
                RecentFiles::new(settings.max_recent)
            }
        };
        recent.max_entries = settings.max_recent;

        let mut editor = Editor::new(Box::new(SystemClipboard::default()), recent);
        editor.case_sensitive_search = settings.case_sensitive_search;
        let gutter = Gutter::new(theme.gutter_theme());

        Self {
            editor,
            theme,
            gutter,
            picker: None,
            search_prompt: None,
            last_query: String::new(),
            show_shortcuts: false,
            show_about: false,
            refocus: true,
            window_title: String::new(),
            recent_path,
        }
    }

    fn modal_open(&self) -> bool {
        self.picker.is_some()
            || self.search_prompt.is_some()
            || self.editor.current_notice().is_some()
            || self.show_shortcuts
            || self.show_about
    }

    fn run_action(&mut self, id: ActionId) {
        if let Some(prompt) = self.editor.trigger(id) {
            self.open_prompt(prompt);
        }
    }

    fn open_prompt(&mut self, prompt: Prompt) {
        match prompt {
            Prompt::OpenPath => {
                self.picker = Some(FilePicker::new(PickerMode::Open, self.start_dir()).with_filter(&["txt"]));
            }
            Prompt::SavePath => {
                let name = match self.editor.document.path() {
                    Some(_) => self.editor.document.title(),
                    None => format!("{}.txt", self.editor.document.title()),
                };
                self.picker = Some(
                    FilePicker::new(PickerMode::Save, self.start_dir())
                        .with_filter(&["txt"])
                        .with_filename(name),
                );
            }
            Prompt::SearchQuery => {
                self.search_prompt = Some(SearchPrompt {
                    query: self.last_query.clone(),
                    focus: true,
                });
            }
        }
    }

    /// Folder of the current document, else the documents folder.
    fn start_dir(&self) -> PathBuf {
        self.editor
            .document
            .path()
            .and_then(|p| p.parent())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(documents_dir)
    }

    fn open_recent(&mut self, path: PathBuf) {
        if !self.editor.open_path(path.clone()) {
            self.editor.forget_recent(&path);
        }
    }

    fn handle_keyboard(&mut self, ctx: &Context) {
        if self.modal_open() {
            return;
        }

        let actions = &self.editor.actions;
        let fired = ctx.input_mut(|i| {
            let (fired, remaining) = route_events(std::mem::take(&mut i.events), actions);
            i.events = remaining;
            fired
        });

        for id in fired {
            self.run_action(id);
        }
    }

    fn handle_dropped_files(&mut self, ctx: &Context) {
        if self.modal_open() {
            return;
        }
        let dropped: Vec<PathBuf> = ctx.input(|i| i.raw.dropped_files.iter().filter_map(|f| f.path.clone()).collect());
        if let Some(path) = dropped.into_iter().next() {
            let ext = path.extension().map(|e| e.to_string_lossy().to_lowercase()).unwrap_or_default();
            if ext == "txt" {
                self.editor.open_path(path);
            }
        }
    }

    fn action_button(&mut self, ui: &mut egui::Ui, id: ActionId) {
        let shortcut = ui.ctx().format_shortcut(&id.shortcut());
        let label = match (id, self.editor.last_edit()) {
            (ActionId::Repeat, Some(cmd)) => format!("Repeat {:?}", cmd),
            _ => id.label().to_string(),
        };
        let button = egui::Button::new(label).shortcut_text(shortcut);
        if ui.add_enabled(self.editor.actions.is_enabled(id), button).clicked() {
            ui.close_menu();
            self.run_action(id);
        }
    }

    fn render_menu_bar(&mut self, ui: &mut egui::Ui) {
        menu_bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                for id in FILE_MENU {
                    self.action_button(ui, id);
                    if id == ActionId::Open {
                        self.render_recent_menu(ui);
                    }
                }
            });
            ui.menu_button("Edit", |ui| {
                for id in EDIT_MENU {
                    if id == ActionId::Undo {
                        ui.separator();
                    }
                    self.action_button(ui, id);
                }
            });
            ui.menu_button("Help", |ui| {
                if ui.button("Keyboard Shortcuts").clicked() {
                    self.show_shortcuts = true;
                    ui.close_menu();
                }
                if ui.button("About plainpad").clicked() {
                    self.show_about = true;
                    ui.close_menu();
                }
            });
        });
    }

    fn render_recent_menu(&mut self, ui: &mut egui::Ui) {
        ui.menu_button("Open Recent", |ui| {
            if self.editor.recent.files.is_empty() {
                ui.label("No recent files");
                return;
            }
            let mut chosen = None;
            for path in &self.editor.recent.files {
                let name = padcore::storage::display_name(path);
                if ui.button(name).on_hover_text(path.to_string_lossy()).clicked() {
                    chosen = Some(path.clone());
                    ui.close_menu();
                }
            }
            if let Some(path) = chosen {
                self.open_recent(path);
            }
        });
    }

    fn render_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for id in TOOLBAR {
                if matches!(id, ActionId::Close | ActionId::Search) {
                    toolbar_separator(ui);
                }
                let Some(icon) = id.icon() else { continue };
                let shortcut = ui.ctx().format_shortcut(&id.shortcut());
                let tooltip = format!("{} ({})", id.label().trim_end_matches("..."), shortcut);
                if toolbar_button(ui, icon, &tooltip, self.editor.actions.is_enabled(id)).clicked() {
                    self.run_action(id);
                }
            }
        });
    }

    fn render_editor(&mut self, ui: &mut egui::Ui, modal: bool) {
        let ctx = ui.ctx().clone();
        let font = self.theme.editor_font();
        let edit_id = Id::new(EDITOR_ID);

        if self.gutter.set_digit_width(max_digit_width(&ctx, &font)) {
            ctx.request_repaint();
        }
        self.gutter.set_line_count(text::line_count(self.editor.buffer.text()));

        let full = ui.available_rect_before_wrap();
        let gutter_rect = egui::Rect::from_min_size(full.min, egui::vec2(self.gutter.width(), full.height()));
        let text_rect = egui::Rect::from_min_max(egui::pos2(gutter_rect.max.x, full.min.y), full.max);

        // selection set from code (search, undo) goes to the widget first
        if let Some(sel) = self.editor.buffer.take_cursor_sync() {
            let mut state = egui::TextEdit::load_state(&ctx, edit_id).unwrap_or_default();
            let range = CCursorRange::two(CCursor::new(sel.anchor), CCursor::new(sel.cursor));
            state.cursor.set_char_range(Some(range));
            state.store(&ctx, edit_id);
        }
        if std::mem::take(&mut self.refocus) {
            ctx.memory_mut(|m| m.request_focus(edit_id));
        }

        let time = ctx.input(|i| i.time);
        self.editor.buffer.feed_history(time);

        let row_height = ctx.fonts(|f| f.row_height(&font));
        let rows_wanted = (text_rect.height() / row_height).floor().max(1.0) as usize;

        let scroll = ui
            .allocate_ui_at_rect(text_rect, |ui| {
                egui::ScrollArea::vertical()
                    .id_source("text_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        egui::TextEdit::multiline(self.editor.buffer.text_mut())
                            .id(edit_id)
                            .font(font.clone())
                            .frame(false)
                            .lock_focus(true)
                            .desired_width(f32::INFINITY)
                            .desired_rows(rows_wanted)
                            .interactive(!modal)
                            .show(ui)
                    })
            })
            .inner;
        let output = scroll.inner;

        if let Some(range) = output.cursor_range {
            self.editor
                .buffer
                .widget_cursor(Selection::new(range.secondary.ccursor.index, range.primary.ccursor.index));
        }
        if output.response.changed() {
            self.editor.buffer.widget_edited(time);
        }
        self.editor.pump_signals();

        if self.gutter.set_line_count(text::line_count(self.editor.buffer.text())) {
            ctx.request_repaint();
        }

        let galley_top = output.galley_pos.y - scroll.inner_rect.min.y + scroll.state.offset.y;
        let rows: Vec<TextRow> = output
            .galley
            .rows
            .iter()
            .map(|row| TextRow {
                top: galley_top + row.rect.min.y,
                bottom: galley_top + row.rect.max.y,
                ends_with_newline: row.ends_with_newline,
            })
            .collect();
        let viewport = Viewport {
            scroll_y: scroll.state.offset.y,
            width: scroll.inner_rect.width(),
            height: scroll.inner_rect.height(),
            revision: self.editor.revision(),
        };
        let repaint = self.gutter.sync(viewport, &rows);
        tracing::trace!(?repaint, "gutter");

        let strip = egui::Rect::from_min_max(
            egui::pos2(gutter_rect.min.x, scroll.inner_rect.min.y),
            egui::pos2(gutter_rect.max.x, scroll.inner_rect.max.y),
        );
        self.gutter.paint(&ui.painter_at(strip), strip, &font);
    }

    fn render_picker(&mut self, ctx: &Context) {
        let Some(picker) = self.picker.as_mut() else { return };
        let mode = picker.mode;
        match picker.show(ctx) {
            PickerOutcome::Pending => {}
            PickerOutcome::Cancelled => {
                self.picker = None;
                self.refocus = true;
            }
            PickerOutcome::Chosen(path) => {
                self.picker = None;
                self.refocus = true;
                match mode {
                    PickerMode::Open => {
                        self.editor.open_path(path);
                    }
                    PickerMode::Save => {
                        self.editor.save_as_path(path);
                    }
                }
                ctx.request_repaint();
            }
        }
    }

    fn render_search_prompt(&mut self, ctx: &Context) {
        let Some(prompt) = self.search_prompt.as_mut() else { return };
        let mut submit = false;
        let mut cancel = false;

        widgets::dialog_window("Search").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Find:");
                let response = ui.text_edit_singleline(&mut prompt.query);
                if std::mem::take(&mut prompt.focus) {
                    response.request_focus();
                }
            });
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                if ui.button("Cancel").clicked() {
                    cancel = true;
                }
                if ui.button("Find").clicked() {
                    submit = true;
                }
            });
        });

        ctx.input_mut(|i| {
            if i.consume_key(Modifiers::NONE, Key::Enter) {
                submit = true;
            }
            if i.consume_key(Modifiers::NONE, Key::Escape) {
                cancel = true;
            }
        });

        if submit {
            let query = prompt.query.clone();
            self.search_prompt = None;
            self.refocus = true;
            self.last_query = query.clone();
            self.editor.search(&query);
            ctx.request_repaint();
        } else if cancel {
            self.search_prompt = None;
            self.refocus = true;
        }
    }

    fn render_notice(&mut self, ctx: &Context) {
        let Some(notice) = self.editor.current_notice().cloned() else { return };
        let queued = self.editor.notice_count();
        let mut dismissed = false;

        widgets::dialog_window(notice.title()).show(ctx, |ui| {
            let icon = match notice {
                Notice::Error { .. } => "⚠",
                Notice::Info { .. } => "ℹ",
            };
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(icon).size(20.0));
                ui.label(notice.message());
            });
            if queued > 1 {
                ui.weak(format!("{} more after this", queued - 1));
            }
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        });

        if ctx.input_mut(|i| i.consume_key(Modifiers::NONE, Key::Enter) || i.consume_key(Modifiers::NONE, Key::Escape)) {
            dismissed = true;
        }
        if dismissed {
            self.editor.dismiss_notice();
            self.refocus = true;
        }
    }

    fn render_shortcuts(&mut self, ctx: &Context) {
        widgets::dialog_window("Keyboard Shortcuts").show(ctx, |ui| {
            ui.label(egui::RichText::new("File").strong());
            ui.separator();
            for id in FILE_MENU {
                widgets::shortcut_row(ui, &ctx.format_shortcut(&id.shortcut()), id.label());
            }
            ui.add_space(8.0);
            ui.label(egui::RichText::new("Edit").strong());
            ui.separator();
            for id in EDIT_MENU.into_iter().chain([ActionId::Search]) {
                widgets::shortcut_row(ui, &ctx.format_shortcut(&id.shortcut()), id.label());
            }
            ui.add_space(8.0);
            ui.vertical_centered(|ui| {
                if ui.button("OK").clicked() {
                    self.show_shortcuts = false;
                    self.refocus = true;
                }
            });
        });
    }

    fn render_about(&mut self, ctx: &Context) {
        widgets::dialog_window("About plainpad").show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.heading("plainpad");
                ui.label(format!("version {}", env!("CARGO_PKG_VERSION")));
                ui.add_space(8.0);
                ui.label("A small plain-text editor with line numbers,");
                ui.label("search and a status bar.");
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    self.show_about = false;
                    self.refocus = true;
                }
            });
        });
    }

    fn sync_window_title(&mut self, ctx: &Context) {
        let title = self.editor.window_title();
        if title != self.window_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.window_title = title;
        }
    }

    fn save_recent_if_changed(&mut self) {
        if self.editor.take_recent_dirty() {
            if let Err(e) = self.editor.recent.save(&self.recent_path) {
                warn!("could not save recent files: {}", e);
            }
        }
    }
}

impl eframe::App for PlainpadApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_keyboard(ctx);
        self.handle_dropped_files(ctx);

        let modal = self.modal_open();

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.add_enabled_ui(!modal, |ui| self.render_menu_bar(ui));
        });
        egui::TopBottomPanel::top("title_bar").show(ctx, |ui| {
            let title = self.editor.document.display_title();
            self.theme.title_bar_frame().show(ui, |ui| {
                ui.centered_and_justified(|ui| {
                    ui.label(title);
                });
            });
        });
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_enabled_ui(!modal, |ui| self.render_toolbar(ui));
        });
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            let status = &self.editor.status;
            status_bar(ui, &status.position_label(), &status.words_label());
        });
        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(self.theme.palette.background).inner_margin(egui::Margin::same(0.0)))
            .show(ctx, |ui| {
                self.render_editor(ui, modal);
            });

        if self.modal_open() {
            widgets::modal_backdrop(ctx);
        }
        self.render_picker(ctx);
        self.render_search_prompt(ctx);
        if self.show_shortcuts {
            self.render_shortcuts(ctx);
        }
        if self.show_about {
            self.render_about(ctx);
        }
        self.render_notice(ctx);

        self.sync_window_title(ctx);
        self.save_recent_if_changed();
    }
}
