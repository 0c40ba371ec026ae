//! Action registry
//!
//! Every user command the editor knows, with its label, key binding,
//! toolbar icon and enabled flag. Menus, the toolbar and the keyboard all
//! read from here, so a disabled action is disabled everywhere at once.

use egui::{Event, Key, KeyboardShortcut, Modifiers};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionId {
    New,
    Open,
    Save,
    SaveAs,
    Close,
    Copy,
    Paste,
    Cut,
    Undo,
    Redo,
    Repeat,
    Search,
}

/// Buffer operations that Repeat can re-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    Copy,
    Paste,
    Cut,
    Undo,
    Redo,
}

const SHIFT_COMMAND: Modifiers = Modifiers {
    shift: true,
    ..Modifiers::COMMAND
};

impl ActionId {
    pub const ALL: [ActionId; 12] = [
        ActionId::New,
        ActionId::Open,
        ActionId::Save,
        ActionId::SaveAs,
        ActionId::Close,
        ActionId::Copy,
        ActionId::Paste,
        ActionId::Cut,
        ActionId::Undo,
        ActionId::Redo,
        ActionId::Repeat,
        ActionId::Search,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ActionId::New => "New",
            ActionId::Open => "Open...",
            ActionId::Save => "Save",
            ActionId::SaveAs => "Save As...",
            ActionId::Close => "Close",
            ActionId::Copy => "Copy",
            ActionId::Paste => "Paste",
            ActionId::Cut => "Cut",
            ActionId::Undo => "Undo",
            ActionId::Redo => "Redo",
            ActionId::Repeat => "Repeat",
            ActionId::Search => "Search...",
        }
    }

    pub fn shortcut(self) -> KeyboardShortcut {
        let (modifiers, key) = match self {
            ActionId::New => (Modifiers::COMMAND, Key::N),
            ActionId::Open => (Modifiers::COMMAND, Key::O),
            ActionId::Save => (Modifiers::COMMAND, Key::S),
            ActionId::SaveAs => (SHIFT_COMMAND, Key::S),
            ActionId::Close => (Modifiers::COMMAND, Key::W),
            ActionId::Copy => (Modifiers::COMMAND, Key::C),
            ActionId::Paste => (Modifiers::COMMAND, Key::V),
            ActionId::Cut => (Modifiers::COMMAND, Key::X),
            ActionId::Undo => (Modifiers::COMMAND, Key::Z),
            ActionId::Redo => (Modifiers::COMMAND, Key::Y),
            ActionId::Repeat => (SHIFT_COMMAND, Key::Y),
            ActionId::Search => (Modifiers::COMMAND, Key::F),
        };
        KeyboardShortcut::new(modifiers, key)
    }

    /// Toolbar glyph, for the actions that sit on the toolbar.
    pub fn icon(self) -> Option<&'static str> {
        match self {
            ActionId::New => Some("🗋"),
            ActionId::Open => Some("📂"),
            ActionId::Save => Some("💾"),
            ActionId::Close => Some("✖"),
            ActionId::Search => Some("🔍"),
            _ => None,
        }
    }

    pub fn edit_command(self) -> Option<EditCommand> {
        match self {
            ActionId::Copy => Some(EditCommand::Copy),
            ActionId::Paste => Some(EditCommand::Paste),
            ActionId::Cut => Some(EditCommand::Cut),
            ActionId::Undo => Some(EditCommand::Undo),
            ActionId::Redo => Some(EditCommand::Redo),
            _ => None,
        }
    }
}

pub const FILE_MENU: [ActionId; 5] = [
    ActionId::New,
    ActionId::Open,
    ActionId::Save,
    ActionId::SaveAs,
    ActionId::Close,
];

pub const EDIT_MENU: [ActionId; 6] = [
    ActionId::Copy,
    ActionId::Paste,
    ActionId::Cut,
    ActionId::Undo,
    ActionId::Redo,
    ActionId::Repeat,
];

pub const TOOLBAR: [ActionId; 5] = [
    ActionId::New,
    ActionId::Open,
    ActionId::Save,
    ActionId::Close,
    ActionId::Search,
];

#[derive(Debug, Clone)]
pub struct Action {
    pub id: ActionId,
    pub enabled: bool,
}

pub struct ActionRegistry {
    actions: Vec<Action>,
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionRegistry {
    /// Copy, Cut, Undo and Redo start disabled: an empty buffer has no
    /// selection and no history.
    pub fn new() -> Self {
        let actions = ActionId::ALL
            .iter()
            .map(|&id| Action {
                id,
                enabled: !matches!(id, ActionId::Copy | ActionId::Cut | ActionId::Undo | ActionId::Redo),
            })
            .collect();
        Self { actions }
    }

    pub fn is_enabled(&self, id: ActionId) -> bool {
        self.actions.iter().any(|a| a.id == id && a.enabled)
    }

    /// Returns true if the flag actually changed.
    pub fn set_enabled(&mut self, id: ActionId, enabled: bool) -> bool {
        match self.actions.iter_mut().find(|a| a.id == id) {
            Some(action) if action.enabled != enabled => {
                action.enabled = enabled;
                tracing::trace!("{:?} enabled={}", id, enabled);
                true
            }
            _ => false,
        }
    }

    /// The action bound to a key press. Shift must match exactly so Cmd+S
    /// and Cmd+Shift+S stay distinct; Alt never matches.
    pub fn action_for_key(&self, key: Key, modifiers: Modifiers) -> Option<ActionId> {
        if modifiers.alt || !modifiers.command {
            return None;
        }
        ActionId::ALL.into_iter().find(|id| {
            let shortcut = id.shortcut();
            shortcut.logical_key == key && shortcut.modifiers.shift == modifiers.shift
        })
    }
}

/// Split a frame's input events into the enabled actions they fire, in
/// order, and the events left for the widgets. Every press fires, so two
/// presses in one frame run the action twice. All Cmd+Z presses are taken
/// out so the text widget never runs its own undo.
pub fn route_events(events: Vec<Event>, registry: &ActionRegistry) -> (Vec<ActionId>, Vec<Event>) {
    let mut fired = Vec::new();
    let mut remaining = Vec::new();

    for event in events {
        let id = match &event {
            // The platform layer turns Cmd+C/X/V into these
            Event::Copy => Some(ActionId::Copy),
            Event::Cut => Some(ActionId::Cut),
            Event::Paste(_) => Some(ActionId::Paste),
            Event::Key { key, pressed, modifiers, .. } => {
                if *key == Key::Z && modifiers.command {
                    if *pressed && !modifiers.shift && registry.is_enabled(ActionId::Undo) {
                        fired.push(ActionId::Undo);
                    }
                    continue;
                }
                if *pressed {
                    registry.action_for_key(*key, *modifiers)
                } else {
                    None
                }
            }
            _ => None,
        };
        match id {
            Some(id) => {
                if registry.is_enabled(id) {
                    fired.push(id);
                }
            }
            None => remaining.push(event),
        }
    }
    (fired, remaining)
}
