use crate::components::hooks::use_random_id_for;
use crate::components::ui::{Button, ButtonSize, ButtonVariant, Glyph, GlyphKind, Input, TextArea};
use crate::drafts::{CreatorDraft, DraftAutosave};
use crate::filter::{ActiveView, SpecialView};
use crate::models::ImageAttachment;
use crate::schedule::BrowserScheduler;
use crate::state::use_app_state;
use crate::storage::BrowserStorage;
use crate::util::browser::{picked_files, read_file, ReadAs};
use icons::X;
use leptos::html;
use leptos::prelude::*;

/// Reads every picked image as a data URL.
pub(crate) fn attach_images(
    ev: &web_sys::Event,
    on_image: impl Fn(ImageAttachment) + Clone + 'static,
    on_error: impl Fn() + Clone + 'static,
) {
    for file in picked_files(ev) {
        let on_image = on_image.clone();
        let on_error = on_error.clone();
        read_file(&file, ReadAs::DataUrl, move |data_url| match data_url {
            Some(src) => on_image(ImageAttachment::new(src)),
            None => on_error(),
        });
    }
}

#[component]
pub fn NoteCreator() -> impl IntoView {
    let state = use_app_state();
    let autosave = DraftAutosave::new(
        BrowserScheduler,
        BrowserStorage,
        state.config.draft_debounce_ms,
    );

    let expanded = RwSignal::new(false);
    let title = RwSignal::new(String::new());
    let content = RwSignal::new(String::new());
    let images: RwSignal<Vec<ImageAttachment>> = RwSignal::new(Vec::new());
    let title_ref: NodeRef<html::Input> = NodeRef::new();
    let image_input_id = use_random_id_for("creator_images");

    if let Some(draft) = autosave.restore() {
        title.set(draft.title);
        content.set(draft.content);
        images.set(draft.images);
        expanded.set(true);
    }

    {
        let autosave = autosave.clone();
        Effect::new(move |prev: Option<()>| {
            let draft = CreatorDraft {
                title: title.get(),
                content: content.get(),
                images: images.get(),
                ..CreatorDraft::default()
            };
            // The first run only registers dependencies.
            if prev.is_some() {
                autosave.touch(draft);
            }
        });
    }

    let focus_creator = state.focus_creator;
    Effect::new(move |prev: Option<u64>| {
        let n = focus_creator.get();
        if prev.is_some_and(|p| p != n) {
            expanded.set(true);
            if let Some(input) = title_ref.get() {
                let _ = input.focus();
            }
        }
        n
    });

    let reset = move || {
        title.set(String::new());
        content.set(String::new());
        images.set(Vec::new());
        expanded.set(false);
    };

    let on_close = {
        let state = state.clone();
        let autosave = autosave.clone();
        move |_| {
            state.add_note(title.get_untracked(), content.get_untracked(), images.get_untracked());
            autosave.commit();
            reset();
        }
    };

    let insert_checklist = move |_| {
        content.update(|text| {
            if !text.is_empty() && !text.ends_with('\n') {
                text.push('\n');
            }
            text.push_str("- [ ] ");
        });
    };

    let toaster = state.toaster.clone();
    let on_images = move |ev: web_sys::Event| {
        let toaster = toaster.clone();
        attach_images(
            &ev,
            move |img| images.update(|list| list.push(img)),
            move || toaster.show("Could not read the image."),
        );
    };

    let is_loading = state.is_loading;
    let view = state.view;
    let visible = move || {
        !matches!(
            view.get(),
            ActiveView::Special(SpecialView::Archive | SpecialView::Trash)
        )
    };

    on_cleanup({
        let autosave = autosave.clone();
        move || autosave.teardown()
    });

    view! {
        <div class="mx-auto w-full max-w-xl rounded-xl border bg-card p-3 shadow-sm" class:hidden=move || !visible()>
            <Show
                when=move || expanded.get()
                fallback=move || view! {
                    <button
                        type="button"
                        class="w-full px-2 py-1 text-left text-sm text-muted-foreground"
                        on:click=move |_| expanded.set(true)
                    >
                        "Take a note…"
                    </button>
                }
            >
                <div class="flex flex-col gap-2">
                    <Input bind_value=title placeholder="Title" node_ref=title_ref class="border-none font-semibold shadow-none" />
                    <TextArea
                        bind_value=content
                        placeholder="Write in markdown. Start a line with - [ ] for a checklist."
                        class="border-none shadow-none"
                    />
                    <div class="flex flex-wrap gap-2">
                        {move || {
                            images
                                .get()
                                .into_iter()
                                .map(|img| {
                                    let src = img.src.clone();
                                    view! {
                                        <div class="relative">
                                            <img src=img.src class="h-16 w-16 rounded-md object-cover" alt="" />
                                            <button
                                                type="button"
                                                class="absolute -top-1 -right-1 rounded-full bg-black/60 p-0.5 text-white [&_svg]:size-3"
                                                aria-label="Remove image"
                                                on:click=move |_| images.update(|list| list.retain(|i| i.src != src))
                                            >
                                                <X />
                                            </button>
                                        </div>
                                    }
                                })
                                .collect_view()
                        }}
                    </div>
                    <div class="flex items-center gap-1">
                        <Button variant=ButtonVariant::Ghost size=ButtonSize::Icon attr:title="Checklist item" on:click=insert_checklist>
                            <Glyph kind=GlyphKind::Checklist />
                        </Button>
                        <label
                            for=image_input_id.clone()
                            title="Add image"
                            class="inline-flex size-9 cursor-pointer items-center justify-center rounded-md hover:bg-accent"
                        >
                            <Glyph kind=GlyphKind::Image />
                        </label>
                        <input
                            id=image_input_id.clone()
                            type="file"
                            accept="image/*"
                            multiple=true
                            class="hidden"
                            on:change=on_images.clone()
                        />
                        <span class="flex-1" />
                        <Button
                            variant=ButtonVariant::Ghost
                            size=ButtonSize::Sm
                            attr:disabled=move || is_loading.get()
                            on:click=on_close.clone()
                        >
                            "Close"
                        </Button>
                    </div>
                </div>
            </Show>
        </div>
    }
}
