use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, DialogBody, DialogDescription, DialogFooter, DialogHeader,
    DialogTitle, Glyph, GlyphKind, Modal,
};
use crate::models::{CategoryId, FolderId};
use crate::shortcuts::SHORTCUT_HELP;
use crate::state::use_app_state;
use leptos::prelude::*;

#[component]
pub fn ConfirmDialog() -> impl IntoView {
    let state = use_app_state();
    let confirm = state.confirm;
    let open = Signal::derive(move || confirm.with(Option::is_some));
    let on_close = Callback::new(move |_| confirm.set(None));
    let prompt = move || confirm.with(|c| c.as_ref().map(|a| a.prompt()).unwrap_or_default());
    let on_confirm = Callback::new(move |_| state.confirm_pending());

    view! {
        <Modal open=open on_close=on_close label="Confirm" hide_close_button=true class="max-w-md">
            <DialogBody>
                <DialogHeader>
                    <DialogTitle>{move || prompt().0}</DialogTitle>
                    <DialogDescription>{move || prompt().1}</DialogDescription>
                </DialogHeader>
                <DialogFooter>
                    <Button variant=ButtonVariant::Outline on:click=move |_| on_close.run(())>"Cancel"</Button>
                    <Button variant=ButtonVariant::Destructive on:click=move |_| on_confirm.run(())>"Confirm"</Button>
                </DialogFooter>
            </DialogBody>
        </Modal>
    }
}

/// Folder and category picker for the selected notes.
#[component]
pub fn MoveDialog() -> impl IntoView {
    let state = use_app_state();
    let workspace = state.workspace;
    let selection = state.selection;
    let open = Signal::derive({
        let move_open = state.move_open;
        move || move_open.get()
    });
    let on_close = {
        let state = state.clone();
        Callback::new(move |_| state.close_move_dialog())
    };
    let expanded: RwSignal<Option<FolderId>> = RwSignal::new(None);
    let count = move || selection.with(|s| s.len());

    let folders = move || workspace.with(|ws| ws.folders.clone());
    let move_to = Callback::new(move |(folder_id, category_id): (FolderId, CategoryId)| {
        state.move_selected(folder_id, category_id)
    });

    view! {
        <Modal open=open on_close=on_close label="Move notes" class="max-w-md">
            <DialogBody>
                <DialogHeader>
                    <DialogTitle>"Move to…"</DialogTitle>
                    <DialogDescription>{move || format!("{} note(s) selected", count())}</DialogDescription>
                </DialogHeader>
                <ul class="flex flex-col gap-1">
                    {
                        move || {
                            folders()
                                .into_iter()
                                .map(|folder| {
                                    let folder_id = folder.id;
                                    let is_open = move || expanded.get() == Some(folder_id);
                                    let categories = folder
                                        .categories
                                        .into_iter()
                                        .map(|category| {
                                            let category_id = category.id;
                                            view! {
                                                <li>
                                                    <button
                                                        type="button"
                                                        class="w-full rounded-md px-3 py-1.5 text-left text-sm hover:bg-accent"
                                                        on:click=move |_| move_to.run((folder_id, category_id))
                                                    >
                                                        {category.name}
                                                    </button>
                                                </li>
                                            }
                                        })
                                        .collect_view();
                                    view! {
                                        <li>
                                            <button
                                                type="button"
                                                class="flex w-full items-center gap-2 rounded-md px-2 py-1.5 text-left text-sm font-medium hover:bg-accent"
                                                on:click=move |_| {
                                                    expanded.update(|e| {
                                                        *e = if *e == Some(folder_id) { None } else { Some(folder_id) };
                                                    })
                                                }
                                            >
                                                <Glyph kind=GlyphKind::Folder />
                                                {folder.name}
                                            </button>
                                            <ul class="ml-6" class:hidden=move || !is_open()>
                                                {categories}
                                            </ul>
                                        </li>
                                    }
                                })
                                .collect_view()
                        }
                    }
                </ul>
            </DialogBody>
        </Modal>
    }
}

/// Per-image copy helper, shown after a chat copy of a note with images.
#[component]
pub fn ImageCopyDialog() -> impl IntoView {
    let state = use_app_state();
    let image_copy = state.image_copy;
    let open = Signal::derive(move || image_copy.with(Option::is_some));
    let on_close = Callback::new(move |_| image_copy.set(None));
    let copy = Callback::new(move |src: String| state.copy_image(&src));
    let images = move || image_copy.get().unwrap_or_default();

    view! {
        <Modal open=open on_close=on_close label="Copy images" class="max-w-lg">
            <DialogBody>
                <DialogHeader>
                    <DialogTitle>"Copy images"</DialogTitle>
                    <DialogDescription>
                        "The note text is already on the clipboard. Click each image to copy it."
                    </DialogDescription>
                </DialogHeader>
                <div class="grid max-h-[60vh] grid-cols-2 gap-4 overflow-y-auto sm:grid-cols-3">
                    {move || {
                        images()
                            .into_iter()
                            .enumerate()
                            .map(|(index, src)| {
                                let target = src.clone();
                                view! {
                                    <div class="group relative aspect-square">
                                        <img src=src class="size-full rounded-md object-cover" alt=format!("Image {}", index + 1) />
                                        <button
                                            type="button"
                                            class="absolute inset-0 flex flex-col items-center justify-center gap-1 rounded-md bg-black/60 text-xs text-white opacity-0 transition-opacity group-hover:opacity-100 focus:opacity-100"
                                            aria-label=format!("Copy image {}", index + 1)
                                            on:click=move |_| copy.run(target.clone())
                                        >
                                            <Glyph kind=GlyphKind::Copy class="size-8" />
                                            "Copy"
                                        </button>
                                    </div>
                                }
                            })
                            .collect_view()
                    }}
                </div>
                <DialogFooter>
                    <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=move |_| on_close.run(())>
                        "Close"
                    </Button>
                </DialogFooter>
            </DialogBody>
        </Modal>
    }
}

/// One-time greeting on first launch.
#[component]
pub fn WelcomeDialog() -> impl IntoView {
    let state = use_app_state();
    let welcome_open = state.welcome_open;
    let open = Signal::derive(move || welcome_open.get());
    let on_close = Callback::new(move |_| state.dismiss_welcome());

    view! {
        <Modal open=open on_close=on_close label="Welcome" class="max-w-md">
            <DialogBody>
                <DialogHeader>
                    <DialogTitle>"Welcome to CopyNote"</DialogTitle>
                    <DialogDescription>
                        "Write notes in markdown, turn them into checklists, and copy them anywhere with one click. "
                        "Everything stays in this browser. Export a backup from the sidebar now and then."
                    </DialogDescription>
                </DialogHeader>
                <DialogFooter>
                    <Button on:click=move |_| on_close.run(())>"Get started"</Button>
                </DialogFooter>
            </DialogBody>
        </Modal>
    }
}

#[component]
pub fn ShortcutsDialog() -> impl IntoView {
    let state = use_app_state();
    let shortcuts_open = state.shortcuts_open;
    let open = Signal::derive(move || shortcuts_open.get());
    let on_close = Callback::new(move |_| shortcuts_open.set(false));

    view! {
        <Modal open=open on_close=on_close label="Keyboard shortcuts" class="max-w-md">
            <DialogBody>
                <DialogHeader>
                    <DialogTitle>"Keyboard shortcuts"</DialogTitle>
                </DialogHeader>
                <dl class="grid grid-cols-[auto_1fr] gap-x-4 gap-y-2 text-sm">
                    {SHORTCUT_HELP
                        .iter()
                        .map(|(keys, label)| view! {
                            <dt><kbd class="rounded border bg-muted px-1.5 py-0.5 font-mono text-xs">{*keys}</kbd></dt>
                            <dd class="text-muted-foreground">{*label}</dd>
                        })
                        .collect_view()}
                </dl>
                <DialogFooter>
                    <Button variant=ButtonVariant::Outline size=ButtonSize::Sm on:click=move |_| on_close.run(())>
                        "Close"
                    </Button>
                </DialogFooter>
            </DialogBody>
        </Modal>
    }
}
