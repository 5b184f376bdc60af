use crate::components::ui::{Glyph, GlyphKind, Input, Modal};
use crate::content::snippet;
use crate::filter::quick_search;
use crate::models::NoteId;
use crate::state::use_app_state;
use leptos::html;
use leptos::prelude::*;
use leptos_dom::helpers::request_animation_frame;

const MAX_RESULTS: usize = 20;

/// Ctrl/Cmd+K search over active notes. Picking a result opens the editor.
#[component]
pub fn QuickSearch() -> impl IntoView {
    let state = use_app_state();
    let quick_search_open = state.quick_search_open;
    let workspace = state.workspace;
    let term = RwSignal::new(String::new());
    let input_ref: NodeRef<html::Input> = NodeRef::new();

    let open = Signal::derive(move || quick_search_open.get());
    let on_close = Callback::new(move |_| quick_search_open.set(false));

    Effect::new(move |_| {
        if quick_search_open.get() {
            term.set(String::new());
            request_animation_frame(move || {
                if let Some(input) = input_ref.get_untracked() {
                    let _ = input.focus();
                }
            });
        }
    });

    let results = Memo::new(move |_| {
        let term = term.get();
        if term.trim().is_empty() {
            return Vec::new();
        }
        workspace.with(|ws| {
            quick_search(&ws.notes, &term)
                .into_iter()
                .take(MAX_RESULTS)
                .map(|n| (n.id, n.title.clone(), snippet(&n)))
                .collect::<Vec<_>>()
        })
    });

    let pick = Callback::new(move |id: NoteId| {
        quick_search_open.set(false);
        state.open_editor(id);
    });

    view! {
        <Modal open=open on_close=on_close label="Quick search" class="max-w-xl" hide_close_button=true>
            <div class="flex items-center gap-2 border-b pb-3">
                <Glyph kind=GlyphKind::Search class="text-muted-foreground" />
                <Input bind_value=term node_ref=input_ref placeholder="Search notes…" class="border-none shadow-none" />
            </div>
            <ul class="flex max-h-96 flex-col gap-1 overflow-y-auto">
                {
                    move || {
                        let found = results.get();
                        if found.is_empty() && !term.with(|t| t.trim().is_empty()) {
                            return view! { <li class="py-6 text-center text-sm text-muted-foreground">"No matching notes."</li> }.into_any();
                        }
                        found
                            .into_iter()
                            .map(|(id, title, preview)| {
                                let title = if title.trim().is_empty() { "Untitled".to_string() } else { title };
                                view! {
                                    <li>
                                        <button
                                            type="button"
                                            class="flex w-full flex-col items-start rounded-md px-3 py-2 text-left hover:bg-accent"
                                            on:click=move |_| pick.run(id)
                                        >
                                            <span class="text-sm font-medium">{title}</span>
                                            <span class="line-clamp-1 text-xs text-muted-foreground">{preview}</span>
                                        </button>
                                    </li>
                                }
                            })
                            .collect_view()
                            .into_any()
                    }
                }
            </ul>
        </Modal>
    }
}
