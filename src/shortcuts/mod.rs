//! Global keyboard shortcuts, resolved from plain key data so the mapping
//! can be tested without a DOM.

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct KeyInput {
    pub key: String,
    /// Ctrl on Windows/Linux, Cmd on macOS.
    pub primary: bool,
    pub shift: bool,
    pub alt: bool,
}

impl KeyInput {
    pub fn from_event(ev: &web_sys::KeyboardEvent) -> Self {
        Self {
            key: ev.key(),
            primary: ev.ctrl_key() || ev.meta_key(),
            shift: ev.shift_key(),
            alt: ev.alt_key(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct ShortcutContext {
    /// Focus is in an input, textarea or contenteditable element.
    pub typing: bool,
    pub modal_open: bool,
    pub has_selection: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ShortcutAction {
    ToggleSearch,
    Export,
    Import,
    ToggleSidebar,
    ToggleViewMode,
    FocusCreator,
    CloseModal,
    ClearSelection,
}

pub(crate) fn resolve(input: &KeyInput, ctx: ShortcutContext) -> Option<ShortcutAction> {
    if input.key == "Escape" {
        return if ctx.modal_open {
            Some(ShortcutAction::CloseModal)
        } else if ctx.has_selection {
            Some(ShortcutAction::ClearSelection)
        } else {
            None
        };
    }

    if !input.primary || input.alt {
        return None;
    }
    let key = input.key.to_lowercase();

    // Quick search also toggles closed from inside its own modal.
    if key == "k" && !ctx.typing {
        return Some(ShortcutAction::ToggleSearch);
    }
    if ctx.typing || ctx.modal_open || input.shift {
        return None;
    }
    match key.as_str() {
        "s" => Some(ShortcutAction::Export),
        "o" => Some(ShortcutAction::Import),
        "e" => Some(ShortcutAction::ToggleSidebar),
        "j" => Some(ShortcutAction::ToggleViewMode),
        "b" => Some(ShortcutAction::FocusCreator),
        _ => None,
    }
}

/// Labels for the shortcuts help list.
pub(crate) const SHORTCUT_HELP: [(&str, &str); 7] = [
    ("Ctrl/Cmd + K", "Quick search"),
    ("Ctrl/Cmd + S", "Export backup"),
    ("Ctrl/Cmd + O", "Import backup"),
    ("Ctrl/Cmd + E", "Toggle sidebar"),
    ("Ctrl/Cmd + J", "Toggle grid/list view"),
    ("Ctrl/Cmd + B", "New note"),
    ("Esc", "Clear selection / close dialog"),
];
