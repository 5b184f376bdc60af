use crate::components::ui::{Button, ButtonSize, ButtonVariant, Glyph, GlyphKind};
use crate::state::{use_app_state, AppState, ConfirmAction};
use crate::util::browser::{download_text, picked_files, read_file, ReadAs};
use crate::util::{now_iso, today_local};
use crate::workspace::transfer::{export_file_name, parse_import, ExportBundle};
use leptos::logging::{error, warn};
use leptos::prelude::*;

pub(crate) const IMPORT_INPUT_ID: &str = "copynote-import-input";

pub(crate) fn export_backup(state: &AppState) {
    let bundle = state
        .workspace
        .with_untracked(|ws| ExportBundle::new(ws, now_iso()));
    let json = match serde_json::to_string_pretty(&bundle) {
        Ok(json) => json,
        Err(e) => {
            error!("[backup] serialize failed: {e}");
            state.toaster.show("Export failed.");
            return;
        }
    };
    match download_text(&export_file_name(&today_local()), "application/json", &json) {
        Ok(()) => state.toaster.show("Backup exported."),
        Err(e) => {
            error!("[backup] download failed: {e:?}");
            state.toaster.show("Export failed.");
        }
    }
}

fn import_from_event(state: AppState, ev: web_sys::Event) {
    let Some(file) = picked_files(&ev).into_iter().next() else {
        return;
    };
    read_file(&file, ReadAs::Text, move |text| {
        let Some(text) = text else {
            state.toaster.show("Could not read the file.");
            return;
        };
        match parse_import(&text) {
            Ok(ws) => state.request_confirm(ConfirmAction::Import(ws)),
            Err(e) => {
                warn!("[backup] import rejected: {e}");
                state.toaster.show(e.to_string());
            }
        }
    });
}

/// Export button, import button and the hidden file input behind it.
#[component]
pub fn BackupControls() -> impl IntoView {
    let state = use_app_state();
    let export_state = state.clone();

    view! {
        <div class="flex items-center gap-1">
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Sm
                class="flex-1 justify-start"
                attr:title="Export backup (Ctrl/Cmd+S)"
                on:click=move |_| export_backup(&export_state)
            >
                <Glyph kind=GlyphKind::Download />
                "Export"
            </Button>
            <label
                for=IMPORT_INPUT_ID
                title="Import backup (Ctrl/Cmd+O)"
                class="inline-flex h-8 flex-1 cursor-pointer items-center gap-1.5 rounded-md px-2.5 text-sm font-medium hover:bg-accent"
            >
                <Glyph kind=GlyphKind::Upload />
                "Import"
            </label>
            <input
                id=IMPORT_INPUT_ID
                type="file"
                accept="application/json,.json"
                class="hidden"
                on:change=move |ev| import_from_event(state.clone(), ev)
            />
        </div>
    }
}
