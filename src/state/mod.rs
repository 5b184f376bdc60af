use crate::config::AppConfig;
use crate::content::editor::EditSession;
use crate::content::Clip;
use crate::filter::ActiveView;
use crate::lifecycle::{
    self, apply_event, create_note, empty_trash, permanently_delete, NewNote, NotePatch,
    NotesSnapshot, StatusEvent,
};
use crate::models::{
    is_known_theme, CategoryId, FolderId, ImageAttachment, NoteId, NoteStatus, SortOption, Tag,
    DEFAULT_THEME,
};
use crate::save::SaveOrchestrator;
use crate::schedule::BrowserScheduler;
use crate::selection::{apply_bulk, BulkAction, Selection};
use crate::storage::{
    self, load_collection, save_folders, save_notes, save_tags, BrowserStorage, Preferences,
    FOLDERS_KEY, NOTES_KEY, TAGS_KEY,
};
use crate::toast::{quote_for, QuoteTicker, Toast, Toaster, UndoFn};
use crate::util::browser::{
    write_clipboard, write_clipboard_rich, write_image_png, ClipboardError,
};
use crate::util::{now_ms, random_unit};
use crate::workspace::{
    seed_folders, seed_notes, seed_tags, GroupPatch, Workspace, WorkspaceError,
};
use leptos::logging::{error, log, warn};
use leptos::prelude::*;
use std::sync::Arc;

pub(crate) type Saver = SaveOrchestrator<BrowserScheduler, RwSignal<bool>>;
pub(crate) type AppToaster = Toaster<BrowserScheduler, RwSignal<Option<Toast>>>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum ViewMode {
    #[default]
    Grid,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Grid => Self::List,
            Self::List => Self::Grid,
        }
    }
}

/// Destructive operations that wait for the confirm dialog.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum ConfirmAction {
    DeleteForever(NoteId),
    EmptyTrash,
    DeleteFolder(FolderId),
    DeleteCategory(FolderId, CategoryId),
    DeleteTag(String),
    Import(Workspace),
}

impl ConfirmAction {
    pub fn prompt(&self) -> (&'static str, String) {
        match self {
            Self::DeleteForever(_) => (
                "Delete note forever?",
                "This note will be removed permanently. This cannot be undone.".to_string(),
            ),
            Self::EmptyTrash => (
                "Empty trash?",
                "All notes in the trash will be removed permanently.".to_string(),
            ),
            Self::DeleteFolder(_) => (
                "Delete folder?",
                "Its notes will move to another folder.".to_string(),
            ),
            Self::DeleteCategory(..) => (
                "Delete category?",
                "Its notes will move to another category in the same folder.".to_string(),
            ),
            Self::DeleteTag(name) => (
                "Delete tag?",
                format!("\"{name}\" will be removed from every note."),
            ),
            Self::Import(ws) => (
                "Replace all data?",
                format!(
                    "Import {} notes, {} folders and {} tags. Current data will be replaced.",
                    ws.notes.len(),
                    ws.folders.len(),
                    ws.tags.len()
                ),
            ),
        }
    }
}

/// Top-level state. Owns the workspace; every mutation goes through the
/// action methods below, wrapped in the save envelope.
#[derive(Clone)]
pub(crate) struct AppState {
    pub config: AppConfig,

    pub workspace: RwSignal<Workspace>,
    /// Mirrors the route. Written by the notes page.
    pub view: RwSignal<ActiveView>,
    /// Set by actions that invalidate the current view; the page navigates.
    pub redirect: RwSignal<Option<ActiveView>>,

    pub search: RwSignal<String>,
    pub sort: RwSignal<SortOption>,
    pub selection: RwSignal<Selection>,
    pub view_mode: RwSignal<ViewMode>,
    pub sidebar_open: RwSignal<bool>,

    pub theme_id: RwSignal<String>,
    pub glow_color: RwSignal<Option<String>>,
    pub custom_colors: RwSignal<Vec<String>>,

    /// Modal surface.
    /// Open note editor. Closing applies its patch.
    pub editor: RwSignal<Option<EditSession>>,
    pub move_open: RwSignal<bool>,
    pub quick_search_open: RwSignal<bool>,
    pub shortcuts_open: RwSignal<bool>,
    pub welcome_open: RwSignal<bool>,
    pub confirm: RwSignal<Option<ConfirmAction>>,
    /// Image sources offered one by one after a chat copy.
    pub image_copy: RwSignal<Option<Vec<String>>>,
    /// Bumped to ask the creator to take focus.
    pub focus_creator: RwSignal<u64>,

    pub is_loading: RwSignal<bool>,
    pub toast: RwSignal<Option<Toast>>,
    pub save: Saver,
    pub toaster: AppToaster,
    pub quotes: QuoteTicker<BrowserScheduler>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let now = now_ms();
        let store = BrowserStorage;

        let notes = load_collection(&store, NOTES_KEY, now, || seed_notes(now));
        let folders = load_collection(&store, FOLDERS_KEY, now, seed_folders);
        let tags = load_collection(&store, TAGS_KEY, now, seed_tags);
        let prefs = Preferences::load(&store);

        let mut recovered = Vec::new();
        for backup in [&notes.backup_key, &folders.backup_key, &tags.backup_key]
            .into_iter()
            .flatten()
        {
            warn!("[state] recovered from corrupt data, backup at {backup}");
            recovered.push(backup.clone());
        }

        let mut workspace = Workspace {
            notes: notes.items,
            folders: folders.items,
            tags: tags.items,
        };
        if workspace.folders.is_empty() {
            workspace.folders = seed_folders();
        }

        let is_loading = RwSignal::new(false);
        let toast = RwSignal::new(None);
        let state = Self {
            config,
            workspace: RwSignal::new(workspace),
            view: RwSignal::new(ActiveView::default()),
            redirect: RwSignal::new(None),
            search: RwSignal::new(String::new()),
            sort: RwSignal::new(prefs.sort),
            selection: RwSignal::new(Selection::default()),
            view_mode: RwSignal::new(ViewMode::default()),
            sidebar_open: RwSignal::new(true),
            theme_id: RwSignal::new(prefs.theme_id),
            glow_color: RwSignal::new(prefs.glow_color),
            custom_colors: RwSignal::new(prefs.custom_colors),
            editor: RwSignal::new(None),
            move_open: RwSignal::new(false),
            quick_search_open: RwSignal::new(false),
            shortcuts_open: RwSignal::new(false),
            welcome_open: RwSignal::new(!prefs.welcome_shown),
            confirm: RwSignal::new(None),
            image_copy: RwSignal::new(None),
            focus_creator: RwSignal::new(0),
            is_loading,
            toast,
            save: SaveOrchestrator::new(
                BrowserScheduler,
                is_loading,
                config.save_delay_ms,
                config.loading_clear_ms,
            ),
            toaster: Toaster::new(BrowserScheduler, toast, config.toast_ms),
            quotes: QuoteTicker::new(
                BrowserScheduler,
                config.quote_min_ms,
                config.quote_max_ms,
                random_unit,
            ),
        };

        if !recovered.is_empty() {
            state
                .toaster
                .show("Stored data was damaged. A backup was kept and defaults were restored.");
        }
        state
    }

    /// Write-through persistence and preference effects. Call once, inside
    /// the reactive owner that provides the context.
    pub fn install_effects(&self) {
        let workspace = self.workspace;
        let notes = Memo::new(move |_| workspace.with(|ws| ws.notes.clone()));
        let folders = Memo::new(move |_| workspace.with(|ws| ws.folders.clone()));
        let tags = Memo::new(move |_| workspace.with(|ws| ws.tags.clone()));

        let toaster = self.toaster.clone();
        let report = move |what: &str, result: Result<(), storage::StorageError>| {
            if let Err(e) = result {
                error!("[state] saving {what} failed: {e}");
                toaster.show(e.to_string());
            }
        };

        let r = report.clone();
        Effect::new(move |_| notes.with(|n| r("notes", save_notes(&BrowserStorage, n))));
        let r = report.clone();
        Effect::new(move |_| folders.with(|f| r("folders", save_folders(&BrowserStorage, f))));
        let r = report;
        Effect::new(move |_| tags.with(|t: &Vec<Tag>| r("tags", save_tags(&BrowserStorage, t))));

        let sort = self.sort;
        Effect::new(move |_| {
            keep_preference("sort", storage::save_sort(&BrowserStorage, sort.get()));
        });
        let theme_id = self.theme_id;
        Effect::new(move |_| {
            keep_preference("theme", storage::save_theme(&BrowserStorage, &theme_id.get()));
        });
        let glow = self.glow_color;
        Effect::new(move |_| {
            keep_preference("glow colour", storage::save_glow(&BrowserStorage, glow.get().as_deref()));
        });
        let custom = self.custom_colors;
        Effect::new(move |_| {
            let result = custom.with(|c| storage::save_custom_colors(&BrowserStorage, c));
            keep_preference("custom colours", result);
        });

        let toaster = self.toaster.clone();
        self.quotes
            .start(move || toaster.show(quote_for(random_unit())));

        let this = self.clone();
        on_cleanup(move || this.teardown());
    }

    pub fn teardown(&self) {
        self.toaster.teardown();
        self.quotes.teardown();
    }

    pub fn any_modal_open(&self) -> bool {
        self.editor.with_untracked(Option::is_some)
            || self.move_open.get_untracked()
            || self.quick_search_open.get_untracked()
            || self.shortcuts_open.get_untracked()
            || self.welcome_open.get_untracked()
            || self.confirm.get_untracked().is_some()
            || self.image_copy.with_untracked(Option::is_some)
    }

    /// Closes the topmost modal, if any.
    pub fn close_top_modal(&self) -> bool {
        if self.confirm.get_untracked().is_some() {
            self.confirm.set(None);
        } else if self.image_copy.with_untracked(Option::is_some) {
            self.image_copy.set(None);
        } else if self.move_open.get_untracked() {
            self.close_move_dialog();
        } else if self.editor.with_untracked(Option::is_some) {
            self.close_editor();
        } else if self.quick_search_open.get_untracked() {
            self.quick_search_open.set(false);
        } else if self.shortcuts_open.get_untracked() {
            self.shortcuts_open.set(false);
        } else if self.welcome_open.get_untracked() {
            self.dismiss_welcome();
        } else {
            return false;
        }
        true
    }

    pub fn dismiss_welcome(&self) {
        self.welcome_open.set(false);
        if let Err(e) = storage::mark_welcome_shown(&BrowserStorage) {
            warn!("[state] could not record welcome flag: {e}");
        }
    }

    fn fail(&self, err: WorkspaceError) {
        warn!("[state] {err}");
        self.toaster.show(err.to_string());
    }

    fn offer_undo(&self, message: &str, snapshot: NotesSnapshot) {
        let workspace = self.workspace;
        let save = self.save.clone();
        let undo: UndoFn = Arc::new(move || {
            let snapshot = snapshot.clone();
            save.perform(move || workspace.update(|ws| snapshot.restore(&mut ws.notes)));
        });
        self.toaster.show_with_undo(message, undo);
    }

    // Clipboard

    /// Copies text and images as one rich item. Text-only notes go out as
    /// plain text; a refused rich write falls back to plain text.
    pub fn copy_rich(&self, clip: Clip) {
        let toaster = self.toaster.clone();
        if !clip.has_images() {
            write_clipboard(&clip.text, move |result| {
                report_copy(&toaster, result, "Copied to clipboard.")
            });
            return;
        }
        let html = clip.html();
        let text = clip.text;
        let fallback = text.clone();
        write_clipboard_rich(&html, &text, move |result| match result {
            Ok(()) => toaster.show("Note copied with its images."),
            Err(e) => {
                warn!("[state] rich copy failed, trying plain text: {e:?}");
                write_clipboard(&fallback, move |result| {
                    report_copy(&toaster, result, "Copied the text only; rich copy is not supported here.")
                });
            }
        });
    }

    /// Copies the text for pasting into a chat, then offers each image.
    pub fn copy_for_chat(&self, clip: Clip) {
        let toaster = self.toaster.clone();
        let image_copy = self.image_copy;
        let text = clip.text.clone();
        write_clipboard(&text, move |result| match result {
            Ok(()) if clip.has_images() => {
                toaster.show("Text copied. Now copy the images.");
                image_copy.set(Some(clip.images));
            }
            result => report_copy(&toaster, result, "Copied to clipboard."),
        });
    }

    pub fn copy_image(&self, src: &str) {
        let toaster = self.toaster.clone();
        write_image_png(src, move |result| {
            report_copy(&toaster, result, "Image copied to clipboard.")
        });
    }

    // Notes

    /// Creates a note in the place the current view points at. Returns
    /// `false` when there was nothing to create.
    pub fn add_note(&self, title: String, content: String, images: Vec<ImageAttachment>) -> bool {
        let Some((folder_id, category_id)) = self
            .workspace
            .with_untracked(|ws| ws.placement(&self.view.get_untracked()))
        else {
            return false;
        };
        let new = NewNote {
            title,
            content,
            images,
            folder_id,
            category_id,
        };
        if new.is_blank() {
            return false;
        }
        let workspace = self.workspace;
        self.save.perform(move || {
            workspace.update(|ws| {
                create_note(&mut ws.notes, new, now_ms());
            });
        });
        true
    }

    pub fn open_editor(&self, id: NoteId) {
        let session = self.workspace.with_untracked(|ws| {
            ws.notes
                .iter()
                .find(|n| n.id == id && n.status != NoteStatus::Trashed)
                .map(|n| EditSession::open(n, now_ms()))
        });
        if session.is_some() {
            self.editor.set(session);
        }
    }

    /// Closes the editor, saving any change.
    pub fn close_editor(&self) {
        let Some(session) = self.editor.try_update(Option::take).flatten() else {
            return;
        };
        let id = session.note_id;
        if let Some(patch) = session.into_patch() {
            self.update_note(id, patch);
        }
    }

    pub fn update_note(&self, id: NoteId, patch: NotePatch) {
        let workspace = self.workspace;
        self.save.perform(move || {
            workspace.update(|ws| {
                lifecycle::update_note(&mut ws.notes, id, patch, now_ms());
            });
        });
    }

    pub fn change_status(&self, id: NoteId, event: StatusEvent) {
        let this = self.clone();
        self.save.perform(move || {
            let mut change = None;
            this.workspace
                .update(|ws| change = apply_event(&mut ws.notes, id, event));
            if let Some(change) = change {
                this.offer_undo(change.message(), change.undo);
            }
        });
    }

    pub fn toggle_pin(&self, id: NoteId) {
        let workspace = self.workspace;
        self.save.perform(move || {
            workspace.update(|ws| {
                lifecycle::toggle_pin(&mut ws.notes, id);
            });
        });
    }

    pub fn set_color(&self, id: NoteId, color: &str) {
        self.update_note(
            id,
            NotePatch {
                color: Some(color.to_string()),
                ..NotePatch::default()
            },
        );
    }

    fn delete_forever(&self, id: NoteId) {
        let this = self.clone();
        self.save.perform(move || {
            let mut removed = None;
            this.workspace
                .update(|ws| removed = permanently_delete(&mut ws.notes, id));
            if removed.is_some() {
                this.toaster.show("Note deleted forever.");
            }
        });
    }

    fn empty_trash(&self) {
        let this = self.clone();
        self.save.perform(move || {
            let mut count = 0;
            this.workspace.update(|ws| count = empty_trash(&mut ws.notes));
            log!("[state] emptied trash: {count} notes");
            this.toaster.show("Trash emptied.");
        });
    }

    // Selection

    pub fn toggle_selected(&self, id: NoteId) {
        self.selection.update(|s| s.toggle(id));
    }

    pub fn clear_selection(&self) {
        self.selection.update(Selection::clear);
    }

    pub fn bulk(&self, action: BulkAction) {
        let ids = self.selection.try_update(Selection::take).unwrap_or_default();
        if ids.is_empty() {
            return;
        }
        let this = self.clone();
        self.save.perform(move || {
            let mut count = 0;
            this.workspace
                .update(|ws| count = apply_bulk(&mut ws.notes, &ids, action));
            if count > 0 {
                this.toaster.show(action.message(count));
            }
        });
    }

    pub fn open_move_for(&self, id: NoteId) {
        self.selection.update(|s| s.begin_single_move(id));
        self.move_open.set(true);
    }

    pub fn close_move_dialog(&self) {
        self.move_open.set(false);
        self.selection.update(Selection::finish_move_dialog);
    }

    pub fn move_selected(&self, folder_id: FolderId, category_id: CategoryId) {
        self.move_open.set(false);
        self.bulk(BulkAction::Move {
            folder_id,
            category_id,
        });
        self.selection.update(Selection::finish_move_dialog);
    }

    // Folders, categories, tags

    pub fn create_folder(&self, name: String, color: String) {
        let this = self.clone();
        self.save.perform(move || {
            let mut created = None;
            this.workspace
                .update(|ws| created = Some(ws.create_folder(&name, now_ms(), &color)));
            if let Some(id) = created {
                this.redirect.set(Some(ActiveView::Folder(id)));
            }
        });
    }

    pub fn create_category(&self, folder_id: FolderId, name: String, color: String) {
        let this = self.clone();
        self.save.perform(move || {
            let mut result = Ok(CategoryId::from(0));
            this.workspace.update(|ws| {
                result = ws.create_category(folder_id, &name, now_ms(), &color);
            });
            match result {
                Ok(id) => this.redirect.set(Some(ActiveView::Category(id))),
                Err(e) => this.fail(e),
            }
        });
    }

    pub fn update_folder(&self, id: FolderId, patch: GroupPatch) {
        let this = self.clone();
        self.save.perform(move || {
            let mut result = Ok(());
            this.workspace.update(|ws| result = ws.update_folder(id, patch));
            if let Err(e) = result {
                this.fail(e);
            }
        });
    }

    pub fn update_category(&self, folder_id: FolderId, id: CategoryId, patch: GroupPatch) {
        let this = self.clone();
        self.save.perform(move || {
            let mut result = Ok(());
            this.workspace
                .update(|ws| result = ws.update_category(folder_id, id, patch));
            if let Err(e) = result {
                this.fail(e);
            }
        });
    }

    fn delete_folder(&self, id: FolderId) {
        let this = self.clone();
        self.save.perform(move || {
            let Some(removed) = this.workspace.with_untracked(|ws| ws.folder(id).cloned()) else {
                return this.fail(WorkspaceError::FolderNotFound);
            };
            let mut result = Err(WorkspaceError::FolderNotFound);
            this.workspace.update(|ws| result = ws.delete_folder(id));
            match result {
                Ok(removal) => {
                    log!(
                        "[state] deleted folder {}: {} notes re-pointed",
                        removal.name,
                        removal.repointed
                    );
                    this.redirect_if_changed(|view| view.after_folder_removed(id, &removed));
                    this.toaster
                        .show(format!("Folder \"{}\" deleted.", removal.name));
                }
                Err(e) => this.fail(e),
            }
        });
    }

    fn delete_category(&self, folder_id: FolderId, id: CategoryId) {
        let this = self.clone();
        self.save.perform(move || {
            let mut result = Err(WorkspaceError::CategoryNotFound);
            this.workspace
                .update(|ws| result = ws.delete_category(folder_id, id));
            match result {
                Ok(removal) => {
                    log!(
                        "[state] deleted category {}: {} notes re-pointed",
                        removal.name,
                        removal.repointed
                    );
                    this.redirect_if_changed(|view| view.after_category_removed(folder_id, id));
                    this.toaster
                        .show(format!("Category \"{}\" deleted.", removal.name));
                }
                Err(e) => this.fail(e),
            }
        });
    }

    pub fn move_folder(&self, from: usize, to: usize) {
        let workspace = self.workspace;
        self.save.perform(move || {
            workspace.update(|ws| {
                ws.move_folder(from, to);
            });
        });
    }

    pub fn create_tag(&self, name: String, color: String) {
        let this = self.clone();
        self.save.perform(move || {
            let mut result = Ok(String::new());
            this.workspace.update(|ws| result = ws.create_tag(&name, &color));
            if let Err(e) = result {
                this.fail(e);
            }
        });
    }

    pub fn update_tag(&self, old: String, name: Option<String>, color: Option<String>) {
        let this = self.clone();
        self.save.perform(move || {
            let mut result = Ok(String::new());
            this.workspace.update(|ws| {
                result = ws.update_tag(&old, name.as_deref(), color.as_deref());
            });
            match result {
                Ok(new) => this.redirect_if_changed(|view| view.after_tag_renamed(&old, &new)),
                Err(e) => this.fail(e),
            }
        });
    }

    fn delete_tag(&self, name: String) {
        let this = self.clone();
        self.save.perform(move || {
            let mut result = Ok(0);
            this.workspace.update(|ws| result = ws.delete_tag(&name));
            match result {
                Ok(_) => this.redirect_if_changed(|view| view.after_tag_removed(&name)),
                Err(e) => this.fail(e),
            }
        });
    }

    fn redirect_if_changed(&self, next: impl FnOnce(ActiveView) -> ActiveView) {
        let current = self.view.get_untracked();
        let updated = next(current.clone());
        if updated != current {
            self.redirect.set(Some(updated));
        }
    }

    fn import(&self, imported: Workspace) {
        let this = self.clone();
        let accepted = self.save.perform_exclusive(move || {
            this.workspace.update(|ws| ws.replace_all(imported));
            this.selection.update(Selection::clear);
            this.redirect.set(Some(ActiveView::default()));
            this.toaster.show("Data imported.");
        });
        if !accepted {
            self.toaster.show("A save is in progress. Try the import again.");
        }
    }

    // Confirmation

    pub fn request_confirm(&self, action: ConfirmAction) {
        self.confirm.set(Some(action));
    }

    pub fn confirm_pending(&self) {
        let Some(action) = self.confirm.try_update(Option::take).flatten() else {
            return;
        };
        match action {
            ConfirmAction::DeleteForever(id) => self.delete_forever(id),
            ConfirmAction::EmptyTrash => self.empty_trash(),
            ConfirmAction::DeleteFolder(id) => self.delete_folder(id),
            ConfirmAction::DeleteCategory(folder_id, id) => self.delete_category(folder_id, id),
            ConfirmAction::DeleteTag(name) => self.delete_tag(name),
            ConfirmAction::Import(ws) => self.import(ws),
        }
    }

    // Preferences

    pub fn set_theme(&self, id: &str) {
        if is_known_theme(id) {
            self.theme_id.set(id.to_string());
        } else {
            self.theme_id.set(DEFAULT_THEME.to_string());
        }
    }

    pub fn remember_custom_color(&self, color: &str) {
        let color = color.to_lowercase();
        self.custom_colors.update(|colors| {
            if !colors.contains(&color) {
                colors.insert(0, color);
                colors.truncate(12);
            }
        });
    }
}

#[derive(Clone)]
pub(crate) struct AppContext(pub AppState);

fn report_copy(toaster: &AppToaster, result: Result<(), ClipboardError>, copied: &str) {
    match result {
        Ok(()) => toaster.show(copied),
        Err(e) => {
            error!("[state] clipboard write failed: {e:?}");
            toaster.show(e.to_string());
        }
    }
}

/// Preference writes are best effort. Failures are logged, not toasted.
fn keep_preference(what: &str, result: Result<(), storage::StorageError>) -> bool {
    match result {
        Ok(()) => true,
        Err(e) => {
            warn!("[state] could not save {what}: {e}");
            false
        }
    }
}

pub(crate) fn use_app_state() -> AppState {
    expect_context::<AppContext>().0
}
