use crate::components::ui::{Button, ButtonSize, ButtonVariant, Glyph, GlyphKind, Input, Spinner};
use crate::models::{SortOption, THEMES};
use crate::state::{use_app_state, ViewMode};
use leptos::prelude::*;
use strum::IntoEnumIterator;

const SELECT_CLASS: &str =
    "h-8 rounded-md border bg-background px-2 text-sm outline-none focus-visible:ring-2 focus-visible:ring-ring";

#[component]
pub fn Header() -> impl IntoView {
    let state = use_app_state();
    let (workspace, view, search, sort) = (state.workspace, state.view, state.search, state.sort);
    let (view_mode, sidebar_open, is_loading) = (state.view_mode, state.sidebar_open, state.is_loading);
    let theme_id = state.theme_id;

    let title = move || {
        let view = view.get();
        workspace.with(|ws| view.title(&ws.folders))
    };

    let on_sort = move |ev: web_sys::Event| {
        if let Ok(option) = event_target_value(&ev).parse::<SortOption>() {
            sort.set(option);
        }
    };
    let s = state.clone();
    let on_theme = move |ev: web_sys::Event| s.set_theme(&event_target_value(&ev));

    let quick_search_open = state.quick_search_open;
    let shortcuts_open = state.shortcuts_open;

    view! {
        <header
            data-name="Header"
            class="sticky top-0 z-40 flex flex-wrap items-center gap-2 border-b bg-background/90 px-4 py-2 backdrop-blur"
        >
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                attr:title="Toggle sidebar (Ctrl/Cmd+E)"
                on:click=move |_| sidebar_open.update(|open| *open = !*open)
            >
                <Glyph kind=GlyphKind::Menu />
            </Button>
            <h1 class="mr-2 truncate text-lg font-semibold">{title}</h1>
            <Show when=move || is_loading.get()>
                <Spinner class="text-muted-foreground" />
            </Show>

            <div class="relative ml-auto flex min-w-48 max-w-md flex-1 items-center">
                <Glyph kind=GlyphKind::Search class="pointer-events-none absolute left-2.5 text-muted-foreground" />
                <Input bind_value=search placeholder="Search notes" class="pl-8" />
            </div>

            <select class=SELECT_CLASS aria-label="Sort notes" on:change=on_sort>
                {SortOption::iter()
                    .map(|option| view! {
                        <option value=option.as_ref().to_string() prop:selected=move || sort.get() == option>
                            {option.label()}
                        </option>
                    })
                    .collect_view()}
            </select>

            <select class=SELECT_CLASS aria-label="Theme" on:change=on_theme>
                {THEMES
                    .iter()
                    .map(|(id, name)| {
                        let id = *id;
                        view! { <option value=id prop:selected=move || theme_id.with(|t| t == id)>{*name}</option> }
                    })
                    .collect_view()}
            </select>

            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                attr:title="Quick search (Ctrl/Cmd+K)"
                on:click=move |_| quick_search_open.set(true)
            >
                <Glyph kind=GlyphKind::Search />
            </Button>
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                attr:title=move || match view_mode.get() {
                    ViewMode::Grid => "List view (Ctrl/Cmd+J)",
                    ViewMode::List => "Grid view (Ctrl/Cmd+J)",
                }
                on:click=move |_| view_mode.update(|mode| *mode = mode.toggled())
            >
                {move || match view_mode.get() {
                    ViewMode::Grid => view! { <Glyph kind=GlyphKind::List /> },
                    ViewMode::List => view! { <Glyph kind=GlyphKind::Grid /> },
                }}
            </Button>
            <Button
                variant=ButtonVariant::Ghost
                size=ButtonSize::Icon
                attr:title="Keyboard shortcuts"
                on:click=move |_| shortcuts_open.set(true)
            >
                <Glyph kind=GlyphKind::Keyboard />
            </Button>
        </header>
    }
}
