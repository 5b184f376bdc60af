use crate::components::note_card::NoteCard;
use crate::components::ui::{Button, ButtonSize, ButtonVariant, Panel};
use crate::filter::{displayed_notes, ActiveView, DisplayedNotes, SpecialView};
use crate::models::{Note, NoteStatus};
use crate::state::{use_app_state, ConfirmAction, ViewMode};
use leptos::prelude::*;

fn empty_message(view: &ActiveView, searching: bool) -> &'static str {
    if searching {
        return "No notes match your search.";
    }
    match view {
        ActiveView::Special(SpecialView::Archive) => "Archived notes appear here.",
        ActiveView::Special(SpecialView::Trash) => "No notes in the trash.",
        ActiveView::Tag(_) => "No notes with this tag.",
        _ => "Notes you add appear here.",
    }
}

#[component]
fn NoteSection(
    label: Signal<Option<&'static str>>,
    notes: Signal<Vec<Note>>,
) -> impl IntoView {
    let state = use_app_state();
    let view_mode = state.view_mode;
    let layout = move || match view_mode.get() {
        ViewMode::Grid => "grid grid-cols-1 gap-3 sm:grid-cols-2 lg:grid-cols-3 xl:grid-cols-4 items-start",
        ViewMode::List => "mx-auto flex max-w-2xl flex-col gap-3",
    };

    view! {
        <section class="flex flex-col gap-2">
            {move || label.get().map(|l| view! { <h2 class="px-1 text-[11px] font-semibold uppercase tracking-wide text-muted-foreground">{l}</h2> })}
            <div class=layout>
                {move || notes.get().into_iter().map(|note| view! { <NoteCard note=note /> }).collect_view()}
            </div>
        </section>
    }
}

/// Trash banner: retention notice and the empty-trash action.
#[component]
fn TrashNotice() -> impl IntoView {
    let state = use_app_state();
    let retention = state.config.trash_retention_days;
    let workspace = state.workspace;
    let has_trash = move || workspace.with(|ws| ws.count_in(NoteStatus::Trashed) > 0);

    view! {
        <Panel class="flex-row items-center justify-between px-4 py-2 text-sm text-muted-foreground">
            <span>{format!("Notes in the trash are kept for {retention} days.")}</span>
            <Show when=has_trash>
                <Button
                    variant=ButtonVariant::Destructive
                    size=ButtonSize::Sm
                    on:click={
                        let state = state.clone();
                        move |_| state.request_confirm(ConfirmAction::EmptyTrash)
                    }
                >
                    "Empty trash"
                </Button>
            </Show>
        </Panel>
    }
}

#[component]
pub fn NoteGrid() -> impl IntoView {
    let state = use_app_state();
    let (workspace, view, search, sort) = (state.workspace, state.view, state.search, state.sort);

    let displayed = Memo::new(move |_| {
        let view = view.get();
        let search = search.get();
        let sort = sort.get();
        workspace.with(|ws| displayed_notes(&ws.notes, &ws.folders, &view, &search, sort))
    });

    let pinned = Signal::derive(move || displayed.with(|d| d.pinned.clone()));
    let others = Signal::derive(move || displayed.with(|d| d.others.clone()));
    let has_pinned = move || displayed.with(|d| !d.pinned.is_empty());
    let is_empty = move || displayed.with(DisplayedNotes::is_empty);
    let is_trash = move || view.with(ActiveView::is_trash);

    view! {
        <div class="flex flex-col gap-6">
            <Show when=is_trash>
                <TrashNotice />
            </Show>
            <Show
                when=move || !is_empty()
                fallback=move || view! {
                    <p class="py-16 text-center text-sm text-muted-foreground">
                        {move || empty_message(&view.get(), !search.get().trim().is_empty())}
                    </p>
                }
            >
                <Show when=has_pinned>
                    <NoteSection label=Signal::derive(|| Some("Pinned")) notes=pinned />
                </Show>
                <NoteSection
                    label=Signal::derive(move || has_pinned().then_some("Others"))
                    notes=others
                />
            </Show>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_messages() {
        let trash = ActiveView::Special(SpecialView::Trash);
        assert_eq!(empty_message(&trash, false), "No notes in the trash.");
        assert_eq!(empty_message(&trash, true), "No notes match your search.");
        assert_eq!(empty_message(&ActiveView::default(), false), "Notes you add appear here.");
    }
}
