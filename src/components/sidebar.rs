use crate::components::backup::BackupControls;
use crate::components::color_picker::ColorSwatches;
use crate::components::ui::{
    Button, ButtonSize, Glyph, GlyphKind, Input, PanelHeader, PanelItem, PanelList,
    PanelTitle,
};
use crate::filter::{ActiveView, SpecialView};
use crate::models::{CategoryId, Folder, FolderId, NoteStatus};
use crate::state::{use_app_state, ConfirmAction};
use crate::util::random_palette_color;
use crate::workspace::GroupPatch;
use icons::{ChevronDown, ChevronRight, ChevronUp, X};
use leptos::prelude::*;

/// Which sidebar row is being renamed or recoloured.
#[derive(Clone, Debug, PartialEq, Eq)]
enum Editing {
    Folder(FolderId),
    Category(FolderId, CategoryId),
    Tag(String),
}

#[component]
fn NavLink(
    target: ActiveView,
    #[prop(into)] label: String,
    #[prop(optional)] glyph: Option<GlyphKind>,
    #[prop(into, optional)] color: Option<String>,
    #[prop(into, optional)] count: Option<Signal<usize>>,
) -> impl IntoView {
    let state = use_app_state();
    let view = state.view;
    let href = target.to_path();
    let active = Memo::new(move |_| view.with(|v| *v == target));

    view! {
        <a
            href=href
            class="flex min-w-0 flex-1 items-center gap-2 rounded-md px-2 py-1.5 text-sm hover:bg-accent"
            class:bg-accent=active
            class:font-semibold=active
        >
            {glyph.map(|kind| view! { <Glyph kind=kind /> })}
            {color.map(|c| view! { <span class="size-2.5 shrink-0 rounded-full" style=format!("background-color: {c}") /> })}
            <span class="truncate">{label}</span>
            {count.map(|n| view! { <span class="ml-auto text-xs text-muted-foreground">{move || n.get()}</span> })}
        </a>
    }
}

/// Name and colour form used for folders, categories and tags.
#[component]
fn InlineEditor(
    #[prop(into)] name: String,
    #[prop(into)] color: String,
    on_save: Callback<(String, String)>,
    on_cancel: Callback<()>,
) -> impl IntoView {
    let name = RwSignal::new(name);
    let color = RwSignal::new(color);
    let save = move || {
        let trimmed = name.get_untracked().trim().to_string();
        if !trimmed.is_empty() {
            on_save.run((trimmed, color.get_untracked()));
        }
    };

    view! {
        <form
            class="flex flex-col gap-2 rounded-md border p-2"
            on:submit=move |ev| {
                ev.prevent_default();
                save();
            }
        >
            <Input bind_value=name autofocus=true class="h-8" />
            <ColorSwatches selected=Signal::derive(move || color.get()) on_pick=Callback::new(move |c| color.set(c)) />
            <div class="flex justify-end gap-1">
                <button
                    type="button"
                    class="h-8 rounded-md px-3 text-sm font-medium hover:bg-accent hover:text-accent-foreground"
                    on:click=move |_| on_cancel.run(())
                >
                    "Cancel"
                </button>
                // the form's default button
                <Button size=ButtonSize::Sm>"Save"</Button>
            </div>
        </form>
    }
}

/// Single-field "add" form at the end of a list.
#[component]
fn AddForm(#[prop(into)] placeholder: String, on_add: Callback<String>) -> impl IntoView {
    let value = RwSignal::new(String::new());
    view! {
        <form
            class="flex items-center gap-1 px-2"
            on:submit=move |ev| {
                ev.prevent_default();
                let name = value.get_untracked().trim().to_string();
                if !name.is_empty() {
                    on_add.run(name);
                    value.set(String::new());
                }
            }
        >
            <Glyph kind=GlyphKind::Plus class="text-muted-foreground" />
            <Input bind_value=value placeholder=placeholder class="h-7 border-none px-1 text-sm shadow-none" />
        </form>
    }
}

#[component]
fn RowActions(
    on_edit: Callback<()>,
    on_delete: Callback<()>,
    #[prop(default = None)] on_up: Option<Callback<()>>,
    #[prop(default = None)] on_down: Option<Callback<()>>,
) -> impl IntoView {
    let button = "rounded p-0.5 text-muted-foreground hover:text-foreground [&_svg]:size-3.5";
    view! {
        <div class="flex shrink-0 items-center opacity-0 group-hover:opacity-100">
            {on_up.map(|f| view! {
                <button type="button" class=button title="Move up" on:click=move |_| f.run(())><ChevronUp /></button>
            })}
            {on_down.map(|f| view! {
                <button type="button" class=button title="Move down" on:click=move |_| f.run(())><ChevronDown /></button>
            })}
            <button type="button" class=button title="Edit" on:click=move |_| on_edit.run(())>
                <Glyph kind=GlyphKind::Pencil class="size-3.5" />
            </button>
            <button type="button" class=button title="Delete" on:click=move |_| on_delete.run(())>
                <X />
            </button>
        </div>
    }
}

#[component]
fn FolderRow(
    folder: Folder,
    index: usize,
    total: usize,
    editing: RwSignal<Option<Editing>>,
    dragging: RwSignal<Option<usize>>,
) -> impl IntoView {
    let state = use_app_state();
    let folder_id = folder.id;
    let expanded = RwSignal::new(true);

    let s = state.clone();
    let on_save = Callback::new(move |(name, color): (String, String)| {
        s.update_folder(folder_id, GroupPatch { name: Some(name), color: Some(color) });
        editing.set(None);
    });
    let on_cancel = Callback::new(move |_| editing.set(None));
    let on_edit = Callback::new(move |_| editing.set(Some(Editing::Folder(folder_id))));
    let s = state.clone();
    let on_delete = Callback::new(move |_| s.request_confirm(ConfirmAction::DeleteFolder(folder_id)));
    let s = state.clone();
    let on_up = (index > 0).then(|| Callback::new(move |_| s.move_folder(index, index - 1)));
    let s = state.clone();
    let on_down = (index + 1 < total).then(|| Callback::new(move |_| s.move_folder(index, index + 1)));
    let s = state.clone();
    let on_add_category = Callback::new(move |name: String| {
        s.create_category(folder_id, name, random_palette_color().to_string());
    });
    let s = state.clone();
    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        if let Some(from) = dragging.try_update(Option::take).flatten() {
            if from != index {
                s.move_folder(from, index);
            }
        }
    };

    let folder_color = folder.color.clone().unwrap_or_else(|| "#9AA0A6".to_string());
    let categories = folder
        .categories
        .iter()
        .map(|category| {
            let category_id = category.id;
            let target = Editing::Category(folder_id, category_id);
            let s = state.clone();
            let on_save = Callback::new(move |(name, color): (String, String)| {
                s.update_category(folder_id, category_id, GroupPatch { name: Some(name), color: Some(color) });
                editing.set(None);
            });
            let on_edit = {
                let target = target.clone();
                Callback::new(move |_| editing.set(Some(target.clone())))
            };
            let s = state.clone();
            let on_delete = Callback::new(move |_| {
                s.request_confirm(ConfirmAction::DeleteCategory(folder_id, category_id))
            });
            let name = category.name.clone();
            let color = category.color.clone().unwrap_or_else(|| "#9AA0A6".to_string());
            view! {
                <PanelItem>
                    {move || if is_editing(editing, &target) {
                        view! { <InlineEditor name=name.clone() color=color.clone() on_save=on_save on_cancel=on_cancel /> }.into_any()
                    } else {
                        view! {
                            <NavLink target=ActiveView::Category(category_id) label=name.clone() color=color.clone() />
                            <RowActions on_edit=on_edit on_delete=on_delete />
                        }
                        .into_any()
                    }}
                </PanelItem>
            }
        })
        .collect_view();

    let folder_target = Editing::Folder(folder_id);
    let name = folder.name.clone();

    view! {
        <li
            class="flex flex-col gap-0.5"
            draggable="true"
            on:dragstart=move |_| dragging.set(Some(index))
            on:dragover=|ev: web_sys::DragEvent| ev.prevent_default()
            on:drop=on_drop
        >
            <div class="group flex items-center gap-1">
                <button
                    type="button"
                    class="rounded p-0.5 text-muted-foreground [&_svg]:size-3.5"
                    aria-label="Toggle categories"
                    on:click=move |_| expanded.update(|e| *e = !*e)
                >
                    {move || if expanded.get() { view! { <ChevronDown /> }.into_any() } else { view! { <ChevronRight /> }.into_any() }}
                </button>
                {move || if is_editing(editing, &folder_target) {
                    view! { <InlineEditor name=name.clone() color=folder_color.clone() on_save=on_save on_cancel=on_cancel /> }.into_any()
                } else {
                    view! {
                        <NavLink target=ActiveView::Folder(folder_id) label=name.clone() glyph=GlyphKind::Folder color=folder_color.clone() />
                        <RowActions on_edit=on_edit on_delete=on_delete on_up=on_up on_down=on_down />
                    }
                    .into_any()
                }}
            </div>
            <ul class="ml-5 flex flex-col gap-0.5" class:hidden=move || !expanded.get()>
                {categories}
                <li>
                    <AddForm placeholder="New category" on_add=on_add_category />
                </li>
            </ul>
        </li>
    }
}

#[component]
fn TagList(editing: RwSignal<Option<Editing>>) -> impl IntoView {
    let state = use_app_state();
    let workspace = state.workspace;
    let tags = move || workspace.with(|ws| ws.tags.clone());
    let on_cancel = Callback::new(move |_| editing.set(None));
    let s = state.clone();
    let on_add = Callback::new(move |name: String| s.create_tag(name, random_palette_color().to_string()));

    view! {
        <PanelList>
            {move || {
                tags()
                    .into_iter()
                    .map(|tag| {
                        let target = Editing::Tag(tag.name.clone());
                        let old = tag.name.clone();
                        let s = state.clone();
                        let on_save = Callback::new(move |(name, color): (String, String)| {
                            let rename = (name != old).then_some(name);
                            s.update_tag(old.clone(), rename, Some(color));
                            editing.set(None);
                        });
                        let on_edit = {
                            let target = target.clone();
                            Callback::new(move |_| editing.set(Some(target.clone())))
                        };
                        let s = state.clone();
                        let name = tag.name.clone();
                        let on_delete = {
                            let name = name.clone();
                            Callback::new(move |_| s.request_confirm(ConfirmAction::DeleteTag(name.clone())))
                        };
                        let color = tag.color.clone();
                        view! {
                            <PanelItem>
                                {move || if is_editing(editing, &target) {
                                    view! { <InlineEditor name=name.clone() color=color.clone() on_save=on_save on_cancel=on_cancel /> }.into_any()
                                } else {
                                    view! {
                                        <NavLink target=ActiveView::Tag(name.clone()) label=format!("#{name}") color=color.clone() />
                                        <RowActions on_edit=on_edit on_delete=on_delete />
                                    }
                                    .into_any()
                                }}
                            </PanelItem>
                        }
                    })
                    .collect_view()
            }}
            <li>
                <AddForm placeholder="New tag" on_add=on_add />
            </li>
        </PanelList>
    }
}

fn is_editing(editing: RwSignal<Option<Editing>>, target: &Editing) -> bool {
    editing.with(|e| e.as_ref() == Some(target))
}

/// Glow colour for card hover shadows; cleared to use the default white glow.
#[component]
fn GlowSetting() -> impl IntoView {
    let state = use_app_state();
    let glow = state.glow_color;
    let selected = Signal::derive(move || glow.get().unwrap_or_default());
    let on_pick = Callback::new(move |c: String| glow.set(Some(c)));

    view! {
        <div class="flex flex-col gap-2 px-2">
            <PanelHeader>
                <PanelTitle>"Glow"</PanelTitle>
                <button
                    type="button"
                    class="text-xs text-muted-foreground hover:underline"
                    class:hidden=move || glow.with(Option::is_none)
                    on:click=move |_| glow.set(None)
                >
                    "Reset"
                </button>
            </PanelHeader>
            <ColorSwatches selected=selected on_pick=on_pick />
        </div>
    }
}

#[component]
pub fn Sidebar() -> impl IntoView {
    let state = use_app_state();
    let workspace = state.workspace;
    let sidebar_open = state.sidebar_open;
    let editing: RwSignal<Option<Editing>> = RwSignal::new(None);
    let dragging: RwSignal<Option<usize>> = RwSignal::new(None);

    let count = move |status: NoteStatus| Signal::derive(move || workspace.with(|ws| ws.count_in(status)));
    let folders = move || workspace.with(|ws| ws.folders.clone());
    let s = state.clone();
    let on_add_folder = Callback::new(move |name: String| s.create_folder(name, random_palette_color().to_string()));

    view! {
        <aside
            data-name="Sidebar"
            class="flex w-64 shrink-0 flex-col gap-4 overflow-y-auto border-r bg-card p-3"
            class:hidden=move || !sidebar_open.get()
        >
            <nav class="flex flex-col gap-0.5">
                <NavLink target=ActiveView::Special(SpecialView::AllNotes) label="Notes" glyph=GlyphKind::Pencil count=count(NoteStatus::Active) />
                <NavLink target=ActiveView::Special(SpecialView::Archive) label="Archive" glyph=GlyphKind::Archive count=count(NoteStatus::Archived) />
                <NavLink target=ActiveView::Special(SpecialView::Trash) label="Trash" glyph=GlyphKind::Trash count=count(NoteStatus::Trashed) />
            </nav>

            <section class="flex flex-col gap-1">
                <PanelTitle class="px-2">"Folders"</PanelTitle>
                <ul class="flex flex-col gap-1">
                    {move || {
                        let all = folders();
                        let total = all.len();
                        all.into_iter()
                            .enumerate()
                            .map(|(index, folder)| view! {
                                <FolderRow folder=folder index=index total=total editing=editing dragging=dragging />
                            })
                            .collect_view()
                    }}
                    <li>
                        <AddForm placeholder="New folder" on_add=on_add_folder />
                    </li>
                </ul>
            </section>

            <section class="flex flex-col gap-1">
                <PanelTitle class="flex items-center gap-1 px-2">
                    <Glyph kind=GlyphKind::Tag class="size-3.5" />
                    "Tags"
                </PanelTitle>
                <TagList editing=editing />
            </section>

            <GlowSetting />

            <section class="mt-auto border-t pt-3">
                <BackupControls />
            </section>
        </aside>
    }
}
