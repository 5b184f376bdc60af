use crate::components::backup::{export_backup, IMPORT_INPUT_ID};
use crate::shortcuts::{resolve, KeyInput, ShortcutAction, ShortcutContext};
use crate::state::AppState;
use crate::util::browser::{click_element, is_typing_target};
use leptos::ev;
use leptos::prelude::*;
use leptos_dom::helpers::window_event_listener;

/// Installs the global keyboard shortcuts for the lifetime of the caller.
pub fn use_shortcuts(state: AppState) {
    let handle = window_event_listener(ev::keydown, move |ev: web_sys::KeyboardEvent| {
        let ctx = ShortcutContext {
            typing: is_typing_target(ev.target()),
            modal_open: state.any_modal_open(),
            has_selection: state.selection.with_untracked(|s| s.is_active()),
        };
        let Some(action) = resolve(&KeyInput::from_event(&ev), ctx) else {
            return;
        };
        ev.prevent_default();

        match action {
            ShortcutAction::ToggleSearch => state.quick_search_open.update(|open| *open = !*open),
            ShortcutAction::Export => export_backup(&state),
            ShortcutAction::Import => click_element(IMPORT_INPUT_ID),
            ShortcutAction::ToggleSidebar => state.sidebar_open.update(|open| *open = !*open),
            ShortcutAction::ToggleViewMode => state.view_mode.update(|mode| *mode = mode.toggled()),
            ShortcutAction::FocusCreator => state.focus_creator.update(|n| *n += 1),
            ShortcutAction::CloseModal => {
                state.close_top_modal();
            }
            ShortcutAction::ClearSelection => state.clear_selection(),
        }
    });
    on_cleanup(move || handle.remove());
}
