use crate::components::color_picker::ColorSwatches;
use crate::components::ui::{Button, ButtonSize, ButtonVariant, Glyph, GlyphKind};
use crate::content::{body_markdown, snippet, Clip};
use crate::lifecycle::StatusEvent;
use crate::markdown;
use crate::models::{Note, NoteStatus};
use crate::state::{use_app_state, ConfirmAction, ViewMode};
use crate::util::{format_date, local_hour};
use leptos::prelude::*;

#[component]
fn CardAction(
    kind: GlyphKind,
    #[prop(into)] title: String,
    on_press: Callback<()>,
) -> impl IntoView {
    view! {
        <Button
            variant=ButtonVariant::Ghost
            size=ButtonSize::IconSm
            attr:title=title.clone()
            attr:aria-label=title
            on:click=move |ev: web_sys::MouseEvent| {
                ev.stop_propagation();
                on_press.run(());
            }
        >
            <Glyph kind=kind />
        </Button>
    }
}

#[component]
pub fn NoteCard(note: Note) -> impl IntoView {
    let state = use_app_state();
    let id = note.id;
    let status = note.status;
    let pinned = note.pinned;
    let list_mode = {
        let view_mode = state.view_mode;
        move || view_mode.get() == ViewMode::List
    };
    let selection = state.selection;
    let is_selected = move || selection.with(|s| s.contains(id));
    let selecting = move || selection.with(|s| s.is_active());
    let palette_open = RwSignal::new(false);

    let color = note.color_or_default().to_string();
    let title = note.title.clone();
    let date = format_date(note.created_at);
    let body_html = markdown::render(&body_markdown(&note.body));
    let preview = snippet(&note);
    let cover = note.cover.clone();
    let cover_src = cover.as_ref().map(|c| c.src.clone());
    let images: Vec<_> = note
        .images
        .iter()
        .filter(|img| Some(&img.src) != cover_src.as_ref())
        .cloned()
        .collect();
    let tags: Vec<(String, String)> = state.workspace.with_untracked(|ws| {
        note.tags
            .iter()
            .map(|t| (t.clone(), ws.tag_color(t).unwrap_or("#9AA0A6").to_string()))
            .collect()
    });

    // In selection mode a click selects instead of opening the editor.
    let on_card_click = {
        let state = state.clone();
        move |_| {
            if selecting() {
                state.toggle_selected(id);
            } else {
                state.open_editor(id);
            }
        }
    };

    let s = state.clone();
    let on_select = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        s.toggle_selected(id);
    };

    let s = state.clone();
    let status_action = move |event: StatusEvent| {
        let s = s.clone();
        Callback::new(move |_| s.change_status(id, event))
    };
    let s = state.clone();
    let on_pin = Callback::new(move |_| s.toggle_pin(id));
    let s = state.clone();
    let copy_source = note.clone();
    let on_copy = Callback::new(move |_| s.copy_rich(Clip::of_note(&copy_source, local_hour())));
    let s = state.clone();
    let chat_source = note.clone();
    let on_copy_chat =
        Callback::new(move |_| s.copy_for_chat(Clip::of_note(&chat_source, local_hour())));
    let s = state.clone();
    let on_move = Callback::new(move |_| s.open_move_for(id));
    let s = state.clone();
    let on_delete = Callback::new(move |_| s.request_confirm(ConfirmAction::DeleteForever(id)));
    let on_palette = Callback::new(move |_| palette_open.update(|open| *open = !*open));
    let s = state.clone();
    let on_color = Callback::new(move |c: String| {
        s.set_color(id, &c);
        palette_open.set(false);
    });
    let current_color = Signal::derive({
        let color = color.clone();
        move || color.clone()
    });

    let actions = match status {
        NoteStatus::Active => view! {
            <CardAction kind=GlyphKind::Palette title="Colour" on_press=on_palette />
            <CardAction kind=GlyphKind::Chat title="Copy for chat" on_press=on_copy_chat />
            <CardAction kind=GlyphKind::Copy title="Copy" on_press=on_copy />
            <CardAction kind=GlyphKind::Move title="Move" on_press=on_move />
            <CardAction kind=GlyphKind::Archive title="Archive" on_press=status_action(StatusEvent::Archive) />
            <CardAction kind=GlyphKind::Trash title="Move to trash" on_press=status_action(StatusEvent::Trash) />
        }
        .into_any(),
        NoteStatus::Archived => view! {
            <CardAction kind=GlyphKind::Chat title="Copy for chat" on_press=on_copy_chat />
            <CardAction kind=GlyphKind::Copy title="Copy" on_press=on_copy />
            <CardAction kind=GlyphKind::Restore title="Unarchive" on_press=status_action(StatusEvent::Unarchive) />
            <CardAction kind=GlyphKind::Trash title="Move to trash" on_press=status_action(StatusEvent::Trash) />
        }
        .into_any(),
        NoteStatus::Trashed => view! {
            <CardAction kind=GlyphKind::Restore title="Restore" on_press=status_action(StatusEvent::Restore) />
            <CardAction kind=GlyphKind::Trash title="Delete forever" on_press=on_delete />
        }
        .into_any(),
    };

    view! {
        <article
            data-name="NoteCard"
            class="note-card group relative flex cursor-pointer flex-col gap-2 overflow-hidden rounded-xl border border-white/10 p-4 text-white shadow-sm transition-shadow hover:shadow-[0_0_18px_rgba(var(--glow-color-rgb,255,255,255),0.35)]"
            class:ring-2=is_selected
            class:ring-primary=is_selected
            style=format!("background-color: {color}")
            on:click=on_card_click
        >
            <button
                type="button"
                class="absolute top-2 left-2 size-5 rounded-full border border-white/40 bg-black/30 opacity-0 group-hover:opacity-100"
                class:opacity-100=move || selecting()
                aria-label="Select note"
                on:click=on_select
            >
                {move || if is_selected() { "✓" } else { "" }}
            </button>

            {cover.map(|c| {
                view! { <img src=c.src.clone() style=c.css() class="-mx-4 -mt-4 mb-1 h-40 w-[calc(100%+2rem)] max-w-none" alt="" /> }
            })}

            <header class="flex items-start gap-2">
                <h3 class="min-w-0 flex-1 break-words font-semibold">{title}</h3>
                <Show when=move || status == NoteStatus::Active>
                    <CardAction
                        kind=GlyphKind::Pin
                        title=if pinned { "Unpin" } else { "Pin" }
                        on_press=on_pin
                    />
                </Show>
            </header>

            <Show
                when=list_mode
                fallback=move || view! { <div class="note-body text-sm" inner_html=body_html.clone() /> }
            >
                <p class="line-clamp-2 text-sm text-white/80">{preview.clone()}</p>
            </Show>

            <Show when={
                let empty = images.is_empty();
                move || !empty && !list_mode()
            }>
                <div class="flex flex-wrap gap-1">
                    {images
                        .iter()
                        .map(|img| view! { <img src=img.src.clone() class=format!("{} rounded-md", img.size.width_class()) alt="" /> })
                        .collect_view()}
                </div>
            </Show>

            <div class="flex flex-wrap gap-1">
                {tags
                    .iter()
                    .map(|(name, tag_color)| view! {
                        <span class="rounded-full px-2 py-0.5 text-[11px]" style=format!("background-color: {tag_color}")>
                            {name.clone()}
                        </span>
                    })
                    .collect_view()}
            </div>

            <footer class="mt-auto flex items-center justify-between gap-1 text-xs text-white/60">
                <span>{date}</span>
                <div class="flex items-center opacity-0 transition-opacity group-hover:opacity-100" class:hidden=selecting>
                    {actions}
                </div>
            </footer>

            <Show when=move || palette_open.get()>
                <div class="rounded-lg bg-black/40 p-2">
                    <ColorSwatches selected=current_color on_pick=on_color />
                </div>
            </Show>
        </article>
    }
}
