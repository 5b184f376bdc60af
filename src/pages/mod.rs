use crate::components::dialogs::{
    ConfirmDialog, ImageCopyDialog, MoveDialog, ShortcutsDialog, WelcomeDialog,
};
use crate::components::header::Header;
use crate::components::hooks::use_shortcuts;
use crate::components::note_creator::NoteCreator;
use crate::components::note_editor::NoteEditor;
use crate::components::note_grid::NoteGrid;
use crate::components::quick_search::QuickSearch;
use crate::components::selection_toolbar::SelectionToolbar;
use crate::components::sidebar::Sidebar;
use crate::components::toast_view::ToastView;
use crate::filter::ActiveView;
use crate::state::use_app_state;
use crate::util::browser::{apply_glow, apply_theme};
use leptos::logging::log;
use leptos::prelude::*;
use leptos_router::hooks::{use_location, use_navigate};

/// The single notes screen. Every route renders it; the path decides the view.
#[component]
pub fn NotesPage() -> impl IntoView {
    let state = use_app_state();
    let navigate = StoredValue::new(use_navigate());
    let location = use_location();

    let view = state.view;
    Effect::new(move |_| {
        let next = ActiveView::from_path(&location.pathname.get());
        if view.with_untracked(|v| *v != next) {
            view.set(next);
        }
    });

    let redirect = state.redirect;
    Effect::new(move |_| {
        let Some(target) = redirect.get() else {
            return;
        };
        redirect.set(None);
        let path = target.to_path();
        log!("[page] redirect to {path}");
        navigate.with_value(|nav| nav(&path, Default::default()));
    });

    let theme_id = state.theme_id;
    Effect::new(move |_| theme_id.with(|id| apply_theme(id)));
    let glow_color = state.glow_color;
    Effect::new(move |_| glow_color.with(|c| apply_glow(c.as_deref())));

    use_shortcuts(state.clone());

    view! {
        <div class="flex h-screen flex-col bg-background text-foreground">
            <Header />
            <div class="flex min-h-0 flex-1">
                <Sidebar />
                <main class="flex min-w-0 flex-1 flex-col gap-6 overflow-y-auto px-4 py-6">
                    <NoteCreator />
                    <NoteGrid />
                </main>
            </div>
            <SelectionToolbar />
            <NoteEditor />
            <MoveDialog />
            <ImageCopyDialog />
            <QuickSearch />
            <ShortcutsDialog />
            <WelcomeDialog />
            <ConfirmDialog />
            <ToastView />
        </div>
    }
}
