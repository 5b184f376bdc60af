use crate::components::ui::{Button, ButtonSize, ButtonVariant, Glyph, GlyphKind};
use crate::selection::BulkAction;
use crate::state::use_app_state;
use icons::X;
use leptos::prelude::*;

/// Floating bar shown while notes are selected.
#[component]
pub fn SelectionToolbar() -> impl IntoView {
    let state = use_app_state();
    let selection = state.selection;
    let move_open = state.move_open;
    let active = move || selection.with(|s| s.is_active()) && !move_open.get();
    let count = move || selection.with(|s| s.len());
    let is_loading = state.is_loading;
    let busy = move || is_loading.get();

    let s = state.clone();
    let archive = move |_| s.bulk(BulkAction::Archive);
    let s = state.clone();
    let trash = move |_| s.bulk(BulkAction::Trash);
    let open_move = move |_| move_open.set(true);
    let s = state.clone();
    let clear = move |_| s.clear_selection();

    view! {
        <Show when=active>
            <div
                data-name="SelectionToolbar"
                class="fixed bottom-6 left-1/2 z-50 flex -translate-x-1/2 items-center gap-1 rounded-full border bg-background px-3 py-1.5 shadow-lg"
            >
                <Button variant=ButtonVariant::Ghost size=ButtonSize::IconSm attr:aria-label="Clear selection" on:click=clear.clone()>
                    <X />
                </Button>
                <span class="px-2 text-sm font-medium">{move || format!("{} selected", count())}</span>
                <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm attr:disabled=busy on:click=archive.clone()>
                    <Glyph kind=GlyphKind::Archive />
                    "Archive"
                </Button>
                <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm attr:disabled=busy on:click=open_move>
                    <Glyph kind=GlyphKind::Move />
                    "Move"
                </Button>
                <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm class="text-destructive" attr:disabled=busy on:click=trash.clone()>
                    <Glyph kind=GlyphKind::Trash />
                    "Trash"
                </Button>
            </div>
        </Show>
    }
}
