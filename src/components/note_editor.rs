use crate::components::color_picker::ColorSwatches;
use crate::components::hooks::use_random_id_for;
use crate::components::note_creator::attach_images;
use crate::components::ui::{
    Button, ButtonSize, ButtonVariant, Glyph, GlyphKind, Modal,
};
use crate::content::body_markdown;
use crate::content::editor::{EditSession, EditorBody};
use crate::content::{ChecklistItem, Clip};
use crate::models::{ImageSize, NoteBody, NoteVersion, ObjectFit, ObjectPosition};
use crate::state::use_app_state;
use crate::util::browser::focus_element;
use crate::util::{format_date, local_hour, now_ms};
use icons::X;
use leptos::prelude::*;
use leptos_dom::helpers::request_animation_frame;
use wasm_bindgen::JsCast;

type Editor = RwSignal<Option<EditSession>>;

fn edit<T>(editor: Editor, f: impl FnOnce(&mut EditSession) -> T) -> Option<T> {
    editor.try_update(|s| s.as_mut().map(f)).flatten()
}

fn read<T>(editor: Editor, f: impl FnOnce(&EditSession) -> T) -> Option<T> {
    editor.with(|s| s.as_ref().map(f))
}

fn item_of<T>(editor: Editor, id: &str, f: impl FnOnce(&ChecklistItem) -> T) -> Option<T> {
    read(editor, |s| match &s.body {
        EditorBody::Checklist(items) => items.iter().find(|i| i.id == id).map(f),
        EditorBody::Markdown(_) => None,
    })
    .flatten()
}

fn input_value(ev: &web_sys::Event) -> Option<String> {
    let target = ev.target()?;
    if let Some(input) = target.dyn_ref::<web_sys::HtmlInputElement>() {
        return Some(input.value());
    }
    target
        .dyn_ref::<web_sys::HtmlTextAreaElement>()
        .map(|area| area.value())
}

fn focus_item_later(id: String) {
    request_animation_frame(move || focus_element(&format!("item-{id}")));
}

#[component]
fn ChecklistRow(editor: Editor, id: String) -> impl IntoView {
    let checked = {
        let id = id.clone();
        Memo::new(move |_| item_of(editor, &id, |i| i.checked).unwrap_or(false))
    };
    let text = {
        let id = id.clone();
        move || item_of(editor, &id, |i| i.text.clone()).unwrap_or_default()
    };
    let toggle = {
        let id = id.clone();
        move |_| {
            edit(editor, |s| s.toggle_item(&id));
        }
    };
    let on_input = {
        let id = id.clone();
        move |ev: web_sys::Event| {
            if let Some(value) = input_value(&ev) {
                edit(editor, |s| s.edit_item(&id, value));
            }
        }
    };
    let on_keydown = {
        let id = id.clone();
        move |ev: web_sys::KeyboardEvent| match ev.key().as_str() {
            "Enter" => {
                ev.prevent_default();
                if let Some(new_id) = edit(editor, |s| s.add_item_after(Some(&id))).flatten() {
                    focus_item_later(new_id);
                }
            }
            "Backspace" if item_of(editor, &id, |i| i.text.is_empty()).unwrap_or(false) => {
                ev.prevent_default();
                if let Some(prev) = edit(editor, |s| s.remove_item(&id)).flatten() {
                    focus_item_later(prev);
                }
            }
            _ => {}
        }
    };
    let remove = {
        let id = id.clone();
        move |_| {
            edit(editor, |s| s.remove_item(&id));
        }
    };

    view! {
        <li class="group flex items-center gap-2">
            <input type="checkbox" class="size-4" prop:checked=checked on:change=toggle />
            <input
                id=format!("item-{id}")
                class="min-w-0 flex-1 bg-transparent text-sm outline-none"
                class:line-through=checked
                class:opacity-60=checked
                prop:value=text
                on:input=on_input
                on:keydown=on_keydown
            />
            <button
                type="button"
                class="opacity-0 group-hover:opacity-100 [&_svg]:size-3.5"
                aria-label="Remove item"
                on:click=remove
            >
                <X />
            </button>
        </li>
    }
}

#[component]
fn BodyEditor(editor: Editor) -> impl IntoView {
    let is_checklist = move || read(editor, EditSession::is_checklist).unwrap_or(false);
    let item_ids = move || {
        read(editor, |s| match &s.body {
            EditorBody::Checklist(items) => items.iter().map(|i| i.id.clone()).collect(),
            EditorBody::Markdown(_) => Vec::new(),
        })
        .unwrap_or_default()
    };
    let text = move || {
        read(editor, |s| match &s.body {
            EditorBody::Markdown(text) => text.clone(),
            EditorBody::Checklist(_) => String::new(),
        })
        .unwrap_or_default()
    };
    let on_text = move |ev: web_sys::Event| {
        if let Some(value) = input_value(&ev) {
            edit(editor, |s| s.set_text(value));
        }
    };
    let add_item = move |_| {
        if let Some(id) = edit(editor, |s| s.add_item_after(None)).flatten() {
            focus_item_later(id);
        }
    };

    view! {
        <Show
            when=is_checklist
            fallback=move || view! {
                <textarea
                    class="min-h-40 w-full resize-none bg-transparent text-sm outline-none field-sizing-content"
                    placeholder="Note"
                    prop:value=text
                    on:input=on_text
                />
            }
        >
            <ul class="flex flex-col gap-1">
                <For each=item_ids key=|id| id.clone() let:id>
                    <ChecklistRow editor=editor id=id />
                </For>
            </ul>
            <Button variant=ButtonVariant::Ghost size=ButtonSize::Sm class="self-start" on:click=add_item>
                <Glyph kind=GlyphKind::Plus />
                "Add item"
            </Button>
        </Show>
    }
}

#[component]
fn ImageEditor(editor: Editor) -> impl IntoView {
    let images = move || read(editor, |s| s.images.clone()).unwrap_or_default();
    let cover = move || read(editor, |s| s.cover.clone()).flatten();

    let size_button = move |src: String, size: ImageSize| {
        let current = {
            let src = src.clone();
            move || {
                read(editor, |s| s.images.iter().any(|i| i.src == src && i.size == size))
                    .unwrap_or(false)
            }
        };
        view! {
            <button
                type="button"
                class="rounded px-1.5 py-0.5 text-[11px]" title=size.to_string()
                class:bg-accent=current
                on:click=move |_| {
                    edit(editor, |s| s.set_image_size(&src, size));
                }
            >
                {match size {
                    ImageSize::Small => "S",
                    ImageSize::Medium => "M",
                    ImageSize::Large => "L",
                }}
            </button>
        }
    };

    view! {
        <div class="flex flex-col gap-3">
            {move || {
                let cover_src = cover().map(|c| c.src);
                images()
                    .into_iter()
                    .map(|img| {
                        let is_cover = cover_src.as_deref() == Some(img.src.as_str());
                        let src_cover = img.src.clone();
                        let src_remove = img.src.clone();
                        view! {
                            <figure class="flex flex-col gap-1">
                                <img src=img.src.clone() class=format!("{} rounded-md", img.size.width_class()) alt="" />
                                <div class="flex items-center gap-1 text-xs">
                                    {[ImageSize::Small, ImageSize::Medium, ImageSize::Large]
                                        .into_iter()
                                        .map(|size| size_button(img.src.clone(), size))
                                        .collect_view()}
                                    <button
                                        type="button"
                                        class="rounded px-1.5 py-0.5"
                                        class:bg-accent=is_cover
                                        on:click=move |_| {
                                            edit(editor, |s| s.toggle_cover(&src_cover));
                                        }
                                    >
                                        {if is_cover { "Cover ✓" } else { "Set as cover" }}
                                    </button>
                                    <button
                                        type="button"
                                        class="ml-auto rounded px-1.5 py-0.5 text-destructive"
                                        on:click=move |_| {
                                            edit(editor, |s| s.remove_image(&src_remove));
                                        }
                                    >
                                        "Remove"
                                    </button>
                                </div>
                            </figure>
                        }
                    })
                    .collect_view()
            }}
            <Show when=move || cover().is_some()>
                <div class="flex flex-wrap items-center gap-1 text-xs">
                    <span class="text-muted-foreground">"Cover:"</span>
                    {[(ObjectFit::Cover, "Fill"), (ObjectFit::Contain, "Fit")]
                        .into_iter()
                        .map(|(fit, label)| view! {
                            <button
                                type="button"
                                class="rounded px-1.5 py-0.5"
                                class:bg-accent=move || cover().is_some_and(|c| c.object_fit == fit)
                                on:click=move |_| {
                                    edit(editor, |s| s.set_cover_fit(fit));
                                }
                            >
                                {label}
                            </button>
                        })
                        .collect_view()}
                    {[(ObjectPosition::Top, "Top"), (ObjectPosition::Center, "Center"), (ObjectPosition::Bottom, "Bottom")]
                        .into_iter()
                        .map(|(position, label)| view! {
                            <button
                                type="button"
                                class="rounded px-1.5 py-0.5"
                                class:bg-accent=move || cover().is_some_and(|c| c.object_position == position)
                                on:click=move |_| {
                                    edit(editor, |s| s.set_cover_position(position));
                                }
                            >
                                {label}
                            </button>
                        })
                        .collect_view()}
                </div>
            </Show>
        </div>
    }
}

#[component]
fn HistoryList(editor: Editor) -> impl IntoView {
    let versions = move || read(editor, |s| s.original().history.clone()).unwrap_or_default();
    let restore = move |version: NoteVersion| {
        edit(editor, |s| s.restore_version(&version, now_ms()));
    };

    view! {
        <Show when=move || !versions().is_empty()>
            <details class="text-sm">
                <summary class="flex cursor-pointer items-center gap-1 text-muted-foreground">
                    <Glyph kind=GlyphKind::History />
                    "Version history"
                </summary>
                <ul class="mt-2 flex flex-col gap-1">
                    {move || {
                        versions()
                            .into_iter()
                            .map(|version| {
                                let label = if version.title.trim().is_empty() {
                                    "Untitled".to_string()
                                } else {
                                    version.title.clone()
                                };
                                let preview: String = body_markdown(&version.body).chars().take(80).collect();
                                let date = format_date(version.timestamp);
                                view! {
                                    <li class="flex items-center gap-2 rounded-md border px-2 py-1">
                                        <div class="min-w-0 flex-1">
                                            <div class="truncate font-medium">{label}</div>
                                            <div class="truncate text-xs text-muted-foreground">{date}" · "{preview}</div>
                                        </div>
                                        <Button
                                            variant=ButtonVariant::Outline
                                            size=ButtonSize::Sm
                                            on:click=move |_| restore(version.clone())
                                        >
                                            "Restore"
                                        </Button>
                                    </li>
                                }
                            })
                            .collect_view()
                    }}
                </ul>
            </details>
        </Show>
    }
}

/// Full note editor. Edits stay in the session until the dialog closes.
#[component]
pub fn NoteEditor() -> impl IntoView {
    let state = use_app_state();
    let editor = state.editor;
    let workspace = state.workspace;
    let image_input_id = use_random_id_for("editor_images");

    let open = Signal::derive(move || editor.with(Option::is_some));
    let on_close = {
        let state = state.clone();
        Callback::new(move |_| state.close_editor())
    };

    let title = move || read(editor, |s| s.title.clone()).unwrap_or_default();
    let on_title = move |ev: web_sys::Event| {
        if let Some(value) = input_value(&ev) {
            edit(editor, |s| s.title = value);
        }
    };
    let is_checklist = move || read(editor, EditSession::is_checklist).unwrap_or(false);
    let toggle_mode = move |_| {
        edit(editor, |s| {
            if s.is_checklist() {
                s.to_markdown_mode();
            } else {
                s.start_checklist(now_ms());
            }
        });
    };
    // Copies what is in the editor now, saved or not.
    let session_clip = move || {
        editor.with_untracked(|s| {
            s.as_ref()
                .map(|s| Clip::new(&NoteBody::Markdown(s.final_content()), &s.images, local_hour()))
        })
    };
    let s = state.clone();
    let on_copy = Callback::new(move |_| {
        if let Some(clip) = session_clip() {
            s.copy_rich(clip);
        }
    });
    let s = state.clone();
    let on_copy_chat = Callback::new(move |_| {
        if let Some(clip) = session_clip() {
            s.copy_for_chat(clip);
        }
    });
    let color = Signal::derive(move || read(editor, |s| s.color.clone()).unwrap_or_default());
    let on_color = Callback::new(move |c: String| {
        edit(editor, |s| s.color = c);
    });
    let tag_chips = move || {
        let chosen = read(editor, |s| s.tags.clone()).unwrap_or_default();
        workspace.with(|ws| {
            ws.tags
                .iter()
                .map(|t| (t.name.clone(), t.color.clone(), chosen.contains(&t.name)))
                .collect::<Vec<_>>()
        })
    };
    let toaster = state.toaster.clone();
    let on_images = move |ev: web_sys::Event| {
        let toaster = toaster.clone();
        attach_images(
            &ev,
            move |img| {
                edit(editor, |s| s.images.push(img));
            },
            move || toaster.show("Could not read the image."),
        );
    };

    view! {
        <Modal open=open on_close=on_close label="Edit note" class="max-w-2xl">
            <div
                class="flex flex-col gap-4"
                style=move || format!("--note-color: {}", color.get())
            >
                {move || read(editor, |s| s.cover.clone()).flatten().map(|c| view! {
                    <img src=c.src.clone() style=c.css() class="h-48 w-full rounded-lg" alt="" />
                })}
                <input
                    class="bg-transparent pr-8 text-lg font-semibold outline-none"
                    placeholder="Title"
                    prop:value=title
                    on:input=on_title
                />
                <BodyEditor editor=editor />
                <ImageEditor editor=editor />

                <div class="flex flex-wrap gap-1">
                    {move || {
                        tag_chips()
                            .into_iter()
                            .map(|(name, tag_color, chosen)| {
                                let toggle = name.clone();
                                view! {
                                    <button
                                        type="button"
                                        class="rounded-full border px-2 py-0.5 text-xs"
                                        class:opacity-50=!chosen
                                        style=if chosen { format!("background-color: {tag_color}") } else { String::new() }
                                        on:click=move |_| {
                                            edit(editor, |s| s.toggle_tag(&toggle));
                                        }
                                    >
                                        {format!("#{name}")}
                                    </button>
                                }
                            })
                            .collect_view()
                    }}
                </div>

                <ColorSwatches selected=color on_pick=on_color />
                <HistoryList editor=editor />

                <div class="flex items-center gap-1 border-t pt-3">
                    <Button
                        variant=ButtonVariant::Ghost
                        size=ButtonSize::Icon
                        attr:title=move || if is_checklist() { "Switch to text" } else { "Switch to checklist" }
                        on:click=toggle_mode
                    >
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
                    <Button variant=ButtonVariant::Ghost size=ButtonSize::Icon attr:title="Copy for chat" on:click=move |_| on_copy_chat.run(())>
                        <Glyph kind=GlyphKind::Chat />
                    </Button>
                    <Button variant=ButtonVariant::Ghost size=ButtonSize::Icon attr:title="Copy" on:click=move |_| on_copy.run(())>
                        <Glyph kind=GlyphKind::Copy />
                    </Button>
                    <span class="flex-1" />
                    <Button variant=ButtonVariant::Default size=ButtonSize::Sm on:click=move |_| on_close.run(())>
                        "Done"
                    </Button>
                </div>
            </div>
        </Modal>
    }
}
