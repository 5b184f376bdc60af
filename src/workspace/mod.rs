//! The notes, folders and tags owned by the application, and every command
//! that edits folders, categories or tags.
//!
//! Folder and category deletion re-point the affected notes before the
//! owner is removed, so a note never references a missing category.

pub(crate) mod transfer;

use crate::filter::{ActiveView, SpecialView};
use crate::models::{
    Category, CategoryId, Folder, FolderId, GroupId, ImageAttachment, ListItem, Note, NoteBody, NoteStatus,
    Tag,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum WorkspaceError {
    #[error("The last folder cannot be deleted.")]
    LastFolder,
    #[error("The last category of a folder cannot be deleted.")]
    LastCategory,
    #[error("Folder not found.")]
    FolderNotFound,
    #[error("Category not found.")]
    CategoryNotFound,
    #[error("Tag \"{0}\" already exists.")]
    DuplicateTag(String),
    #[error("Tag name cannot be empty.")]
    EmptyTagName,
    #[error("Tag \"{0}\" not found.")]
    TagNotFound(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct Workspace {
    pub notes: Vec<Note>,
    pub folders: Vec<Folder>,
    pub tags: Vec<Tag>,
}

/// Partial update for a folder or category.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct GroupPatch {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Outcome of a folder or category deletion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Removal {
    pub name: String,
    pub repointed: usize,
}

impl Workspace {
    pub fn seed(now: i64) -> Self {
        Self {
            notes: seed_notes(now),
            folders: seed_folders(),
            tags: seed_tags(),
        }
    }

    pub fn folder(&self, id: FolderId) -> Option<&Folder> {
        self.folders.iter().find(|f| f.id == id)
    }

    pub fn folder_of_category(&self, id: CategoryId) -> Option<&Folder> {
        self.folders.iter().find(|f| f.owns_category(id))
    }

    /// True when `category_id` exists inside `folder_id`.
    pub fn resolves(&self, folder_id: FolderId, category_id: CategoryId) -> bool {
        self.folder(folder_id)
            .is_some_and(|f| f.owns_category(category_id))
    }

    /// Where a note created from `view` is filed.
    pub fn placement(&self, view: &ActiveView) -> Option<(FolderId, CategoryId)> {
        let first_of = |f: &Folder| f.categories.first().map(|c| (f.id, c.id));
        match view {
            ActiveView::Category(id) => match self.folder_of_category(*id) {
                Some(folder) => Some((folder.id, *id)),
                None => self.folders.first().and_then(first_of),
            },
            ActiveView::Folder(id) => self
                .folder(*id)
                .and_then(first_of)
                .or_else(|| self.folders.first().and_then(first_of)),
            _ => self.folders.first().and_then(first_of),
        }
    }

    /// Next id not used by any folder or category.
    fn next_group_id(&self, start: GroupId) -> GroupId {
        let taken = |id: GroupId| {
            self.folders
                .iter()
                .any(|f| f.id == id || f.owns_category(id))
        };
        let mut id = start;
        while taken(id) {
            id = id.next();
        }
        id
    }

    /// Appends a folder holding one "General" category.
    pub fn create_folder(&mut self, name: &str, now: i64, color: &str) -> FolderId {
        let folder_id = self.next_group_id(now.into());
        let category_id = self.next_group_id(folder_id.next());
        self.folders.push(Folder {
            id: folder_id,
            name: name.trim().to_string(),
            color: Some(color.to_string()),
            categories: vec![Category {
                id: category_id,
                name: "General".to_string(),
                color: Some(color.to_string()),
            }],
        });
        folder_id
    }

    pub fn create_category(
        &mut self,
        folder_id: FolderId,
        name: &str,
        now: i64,
        color: &str,
    ) -> Result<CategoryId, WorkspaceError> {
        let id = self.next_group_id(now.into());
        let folder = self
            .folders
            .iter_mut()
            .find(|f| f.id == folder_id)
            .ok_or(WorkspaceError::FolderNotFound)?;
        folder.categories.push(Category {
            id,
            name: name.trim().to_string(),
            color: Some(color.to_string()),
        });
        Ok(id)
    }

    pub fn update_folder(&mut self, id: FolderId, patch: GroupPatch) -> Result<(), WorkspaceError> {
        let folder = self
            .folders
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or(WorkspaceError::FolderNotFound)?;
        if let Some(name) = patch.name {
            folder.name = name;
        }
        if let Some(color) = patch.color {
            folder.color = Some(color);
        }
        Ok(())
    }

    pub fn update_category(
        &mut self,
        folder_id: FolderId,
        category_id: CategoryId,
        patch: GroupPatch,
    ) -> Result<(), WorkspaceError> {
        let category = self
            .folders
            .iter_mut()
            .find(|f| f.id == folder_id)
            .ok_or(WorkspaceError::FolderNotFound)?
            .categories
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or(WorkspaceError::CategoryNotFound)?;
        if let Some(name) = patch.name {
            category.name = name;
        }
        if let Some(color) = patch.color {
            category.color = Some(color);
        }
        Ok(())
    }

    /// Deletes a folder. Its notes move to the first remaining folder's
    /// first category.
    pub fn delete_folder(&mut self, id: FolderId) -> Result<Removal, WorkspaceError> {
        if self.folders.len() <= 1 {
            return Err(WorkspaceError::LastFolder);
        }
        let index = self
            .folders
            .iter()
            .position(|f| f.id == id)
            .ok_or(WorkspaceError::FolderNotFound)?;
        let (fallback_folder, fallback_category) = self
            .folders
            .iter()
            .filter(|f| f.id != id)
            .find_map(|f| f.categories.first().map(|c| (f.id, c.id)))
            .ok_or(WorkspaceError::CategoryNotFound)?;

        let removed = self.folders.remove(index);
        let mut repointed = 0;
        for note in &mut self.notes {
            if note.folder_id == id || removed.owns_category(note.category_id) {
                note.folder_id = fallback_folder;
                note.category_id = fallback_category;
                repointed += 1;
            }
        }
        Ok(Removal {
            name: removed.name,
            repointed,
        })
    }

    /// Deletes a category. Its notes move to another category of the same folder.
    pub fn delete_category(
        &mut self,
        folder_id: FolderId,
        category_id: CategoryId,
    ) -> Result<Removal, WorkspaceError> {
        let folder = self
            .folders
            .iter_mut()
            .find(|f| f.id == folder_id)
            .ok_or(WorkspaceError::FolderNotFound)?;
        if folder.categories.len() <= 1 {
            return Err(WorkspaceError::LastCategory);
        }
        let index = folder
            .categories
            .iter()
            .position(|c| c.id == category_id)
            .ok_or(WorkspaceError::CategoryNotFound)?;
        let removed = folder.categories.remove(index);
        let fallback = folder.categories[0].id;

        let mut repointed = 0;
        for note in &mut self.notes {
            if note.category_id == category_id {
                note.folder_id = folder_id;
                note.category_id = fallback;
                repointed += 1;
            }
        }
        Ok(Removal {
            name: removed.name,
            repointed,
        })
    }

    /// Moves the folder at `from` to position `to`.
    pub fn move_folder(&mut self, from: usize, to: usize) -> bool {
        if from >= self.folders.len() || to >= self.folders.len() || from == to {
            return false;
        }
        let folder = self.folders.remove(from);
        self.folders.insert(to, folder);
        true
    }

    fn tag_exists(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.tags.iter().any(|t| t.name.to_lowercase() == lower)
    }

    /// Adds a tag at the front. Names are trimmed and unique ignoring case.
    pub fn create_tag(&mut self, name: &str, color: &str) -> Result<String, WorkspaceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WorkspaceError::EmptyTagName);
        }
        if self.tag_exists(name) {
            return Err(WorkspaceError::DuplicateTag(name.to_string()));
        }
        self.tags.insert(
            0,
            Tag {
                name: name.to_string(),
                color: color.to_string(),
            },
        );
        Ok(name.to_string())
    }

    /// Renames and/or recolours a tag. A rename is rewritten into every note.
    /// Returns the tag's name after the update.
    pub fn update_tag(
        &mut self,
        old_name: &str,
        new_name: Option<&str>,
        color: Option<&str>,
    ) -> Result<String, WorkspaceError> {
        let new_name = new_name.map(str::trim).filter(|n| !n.is_empty() && *n != old_name);
        if let Some(n) = new_name {
            let clashes = self
                .tags
                .iter()
                .any(|t| t.name != old_name && t.name.to_lowercase() == n.to_lowercase());
            if clashes {
                return Err(WorkspaceError::DuplicateTag(n.to_string()));
            }
        }

        let tag = self
            .tags
            .iter_mut()
            .find(|t| t.name == old_name)
            .ok_or_else(|| WorkspaceError::TagNotFound(old_name.to_string()))?;
        if let Some(c) = color {
            tag.color = c.to_string();
        }
        let Some(n) = new_name else {
            return Ok(tag.name.clone());
        };
        tag.name = n.to_string();

        for note in &mut self.notes {
            for t in note.tags.iter_mut().filter(|t| *t == old_name) {
                *t = n.to_string();
            }
        }
        Ok(n.to_string())
    }

    /// Removes a tag and strips it from every note. Returns how many notes
    /// carried it.
    pub fn delete_tag(&mut self, name: &str) -> Result<usize, WorkspaceError> {
        let before = self.tags.len();
        self.tags.retain(|t| t.name != name);
        if self.tags.len() == before {
            return Err(WorkspaceError::TagNotFound(name.to_string()));
        }
        let mut stripped = 0;
        for note in &mut self.notes {
            let len = note.tags.len();
            note.tags.retain(|t| t != name);
            if note.tags.len() != len {
                stripped += 1;
            }
        }
        Ok(stripped)
    }

    pub fn tag_color(&self, name: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.name == name)
            .map(|t| t.color.as_str())
    }

    pub fn count_in(&self, status: NoteStatus) -> usize {
        self.notes.iter().filter(|n| n.status == status).count()
    }
}

impl ActiveView {
    /// The view to show after folder `id` was deleted.
    pub fn after_folder_removed(self, id: FolderId, removed: &Folder) -> Self {
        match self {
            ActiveView::Folder(f) if f == id => ActiveView::Special(SpecialView::AllNotes),
            ActiveView::Category(c) if removed.owns_category(c) => {
                ActiveView::Special(SpecialView::AllNotes)
            }
            other => other,
        }
    }

    /// The view to show after category `id` of `folder_id` was deleted.
    pub fn after_category_removed(self, folder_id: FolderId, id: CategoryId) -> Self {
        match self {
            ActiveView::Category(c) if c == id => ActiveView::Folder(folder_id),
            other => other,
        }
    }

    pub fn after_tag_renamed(self, old: &str, new: &str) -> Self {
        match self {
            ActiveView::Tag(t) if t == old => ActiveView::Tag(new.to_string()),
            other => other,
        }
    }

    pub fn after_tag_removed(self, name: &str) -> Self {
        match self {
            ActiveView::Tag(t) if t == name => ActiveView::Special(SpecialView::AllNotes),
            other => other,
        }
    }
}

const SEED_FOLDER: FolderId = GroupId(1.0);
const SEED_CATEGORY: CategoryId = GroupId(101.0);

const SEED_IMAGE: &str = "data:image/svg+xml;base64,PHN2ZyB3aWR0aD0iNDAwIiBoZWlnaHQ9IjQwMCIgeG1sbnM9Imh0dHA6Ly93d3cudzMub3JnLzIwMDAvc3ZnIj48cmVjdCB3aWR0aD0iNDAwIiBoZWlnaHQ9IjQwMCIgZmlsbD0iIzE2NTA0QiIvPjxjaXJjbGUgY3g9IjIwMCIgY3k9IjIwMCIgcj0iMTUwIiBmaWxsPSIjNDI3NTVFIi8+PHRleHQgeD0iNTAlIiB5PSI1MCUiIGRvbWluYW50LWJhc2VsaW5lPSJtaWRkbGUiIHRleHQtYW5jaG9yPSJtaWRkbGUiIGZvbnQtc2l6ZT0iNDgiIGZpbGw9IndoaXRlIj5Db3B5Tm90ZTwvdGV4dD48L3N2Zz4=";

pub(crate) fn seed_folders() -> Vec<Folder> {
    vec![Folder {
        id: SEED_FOLDER,
        name: "General".to_string(),
        color: Some("#4285F4".to_string()),
        categories: vec![Category {
            id: SEED_CATEGORY,
            name: "Notes".to_string(),
            color: Some("#FBBC05".to_string()),
        }],
    }]
}

pub(crate) fn seed_tags() -> Vec<Tag> {
    [
        ("Important", "#E53935"),
        ("Work", "#1E88E5"),
        ("Personal", "#43A047"),
        ("Idea", "#FB8C00"),
    ]
    .into_iter()
    .map(|(name, color)| Tag {
        name: name.to_string(),
        color: color.to_string(),
    })
    .collect()
}

pub(crate) fn seed_notes(now: i64) -> Vec<Note> {
    let base = |offset: i64, title: &str, body: NoteBody, color: &str, tags: &[&str]| Note {
        id: now - offset,
        created_at: now - offset,
        title: title.to_string(),
        body,
        pinned: false,
        status: NoteStatus::Active,
        color: Some(color.to_string()),
        images: Vec::new(),
        cover: None,
        folder_id: SEED_FOLDER,
        category_id: SEED_CATEGORY,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        history: Vec::new(),
    };

    let todo = [
        ("Explore what CopyNote can do", true),
        ("Write my first personal note", false),
        ("Organise my projects into folders", false),
        ("Pick a theme in the settings (top right)", false),
    ]
    .into_iter()
    .zip(1..)
    .map(|((text, checked), id)| ListItem {
        id,
        text: text.to_string(),
        checked,
        sub_items: None,
    })
    .collect();

    let mut checklist = base(
        10_000,
        "To-do list 📝",
        NoteBody::Checklist(todo),
        "#635D19",
        &["Personal", "Idea"],
    );
    checklist.pinned = true;

    let welcome = base(
        20_000,
        "Welcome to CopyNote! ✨",
        NoteBody::Markdown(
            "Thanks for trying CopyNote. A few tips to get started:\n\n\
             - Create text notes, checklists or image notes from the box at the top.\n\
             - Organise your ideas with folders, categories and coloured tags.\n\
             - Change the look with the themes in the palette menu.\n\
             - Use quick search with Ctrl+K.\n\n\
             Enjoy organising your ideas!"
                .to_string(),
        ),
        "#1E3A5F",
        &["Important"],
    );

    let mut visual = base(
        30_000,
        "Visual inspiration",
        NoteBody::Markdown(
            "An image to inspire my next project. Notes can hold images as well as text."
                .to_string(),
        ),
        "#42275E",
        &["Idea", "Work"],
    );
    visual.images = vec![ImageAttachment::new(SEED_IMAGE)];

    vec![checklist, welcome, visual]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note_in(id: i64, folder_id: FolderId, category_id: CategoryId) -> Note {
        Note {
            id,
            created_at: id,
            title: String::new(),
            body: NoteBody::default(),
            pinned: false,
            status: NoteStatus::Active,
            color: None,
            images: vec![],
            cover: None,
            folder_id,
            category_id,
            tags: vec![],
            history: vec![],
        }
    }

    fn two_folders() -> Workspace {
        let mut ws = Workspace {
            notes: vec![],
            folders: seed_folders(),
            tags: seed_tags(),
        };
        let work = ws.create_folder("Work", 500, "#1E3A5F");
        ws.create_category(work, "Later", 500, "#345920")
            .expect("folder exists");
        ws
    }

    #[test]
    fn test_seed_is_consistent() {
        let ws = Workspace::seed(1_000_000);
        assert!(ws.notes.iter().all(|n| ws.resolves(n.folder_id, n.category_id)));
        assert!(ws.notes.iter().all(|n| !n.pinned || n.is_active()));
        assert_eq!(ws.tags.len(), 4);
    }

    #[test]
    fn test_new_folder_gets_general_category() {
        let ws = two_folders();
        let work = &ws.folders[1];
        assert_eq!(work.name, "Work");
        assert_eq!(work.categories[0].name, "General");
        assert_eq!(work.categories.len(), 2);
        // ids never collide across folders and categories
        assert_ne!(work.categories[1].id, work.categories[0].id);
        assert_ne!(work.categories[1].id, work.id);
    }

    #[test]
    fn test_new_ids_step_past_fractional_ones() {
        let mut ws = Workspace {
            notes: vec![],
            folders: vec![Folder {
                id: GroupId(500.0),
                name: "Old".to_string(),
                color: None,
                categories: vec![Category {
                    id: GroupId(501.25),
                    name: "General".to_string(),
                    color: None,
                }],
            }],
            tags: vec![],
        };
        let folder = ws.create_folder("New", 500, "#1E3A5F");
        assert_eq!(folder, GroupId(501.0));
        let category = ws.folders[1].categories[0].id;
        assert_eq!(category, GroupId(502.0));
        assert!(ws.resolves(folder, category));
    }

    #[test]
    fn test_delete_folder_repoints_notes() {
        let mut ws = two_folders();
        let work = ws.folders[1].clone();
        ws.notes = vec![
            note_in(1, work.id, work.categories[0].id),
            note_in(2, work.id, work.categories[1].id),
            note_in(3, SEED_FOLDER, SEED_CATEGORY),
        ];

        let removal = ws.delete_folder(work.id).expect("two folders exist");
        assert_eq!(removal.repointed, 2);
        assert!(ws
            .notes
            .iter()
            .all(|n| !work.owns_category(n.category_id)));
        assert!(ws
            .notes
            .iter()
            .all(|n| n.folder_id == SEED_FOLDER && n.category_id == SEED_CATEGORY));
    }

    #[test]
    fn test_last_folder_and_category_are_protected() {
        let mut ws = Workspace::seed(1_000_000);
        let before = ws.clone();
        assert_eq!(ws.delete_folder(SEED_FOLDER), Err(WorkspaceError::LastFolder));
        assert_eq!(
            ws.delete_category(SEED_FOLDER, SEED_CATEGORY),
            Err(WorkspaceError::LastCategory)
        );
        assert_eq!(ws, before);
    }

    #[test]
    fn test_delete_category_repoints_within_folder() {
        let mut ws = two_folders();
        let work = ws.folders[1].clone();
        let doomed = work.categories[1].id;
        ws.notes = vec![note_in(1, work.id, doomed)];

        let removal = ws.delete_category(work.id, doomed).expect("folder has two categories");
        assert_eq!(removal.repointed, 1);
        assert_eq!(ws.notes[0].category_id, work.categories[0].id);
        assert_eq!(ws.notes[0].folder_id, work.id);
    }

    #[test]
    fn test_placement_follows_view() {
        let ws = two_folders();
        let work = ws.folders[1].clone();
        let later = work.categories[1].id;

        assert_eq!(ws.placement(&ActiveView::Category(later)), Some((work.id, later)));
        assert_eq!(
            ws.placement(&ActiveView::Folder(work.id)),
            Some((work.id, work.categories[0].id))
        );
        assert_eq!(
            ws.placement(&ActiveView::Tag("Idea".to_string())),
            Some((SEED_FOLDER, SEED_CATEGORY))
        );
    }

    #[test]
    fn test_move_folder_reorders() {
        let mut ws = two_folders();
        assert!(ws.move_folder(1, 0));
        assert_eq!(ws.folders[0].name, "Work");
        assert!(!ws.move_folder(0, 5));
    }

    #[test]
    fn test_tag_names_are_unique_ignoring_case() {
        let mut ws = Workspace::seed(1);
        assert_eq!(
            ws.create_tag("  work ", "#000000"),
            Err(WorkspaceError::DuplicateTag("work".to_string()))
        );
        assert_eq!(ws.create_tag("   ", "#000000"), Err(WorkspaceError::EmptyTagName));
        assert_eq!(ws.create_tag(" Travel ", "#000000"), Ok("Travel".to_string()));
        assert_eq!(ws.tags[0].name, "Travel");
    }

    #[test]
    fn test_tag_rename_cascades() {
        let mut ws = Workspace::seed(1_000_000);
        let renamed = ws.update_tag("Idea", Some("Ideas"), None).expect("rename applies");
        assert_eq!(renamed, "Ideas");
        assert!(ws.notes.iter().all(|n| !n.has_tag("Idea")));
        assert_eq!(ws.notes.iter().filter(|n| n.has_tag("Ideas")).count(), 2);
        assert_eq!(
            ws.update_tag("Ideas", Some("work"), None),
            Err(WorkspaceError::DuplicateTag("work".to_string()))
        );
    }

    #[test]
    fn test_tag_recolour_only() {
        let mut ws = Workspace::seed(1);
        assert_eq!(ws.update_tag("Work", None, Some("#111111")), Ok("Work".to_string()));
        assert_eq!(ws.tag_color("Work"), Some("#111111"));
    }

    #[test]
    fn test_tag_delete_cascades() {
        let mut ws = Workspace::seed(1_000_000);
        assert_eq!(ws.delete_tag("Idea"), Ok(2));
        assert!(ws.notes.iter().all(|n| !n.has_tag("Idea")));
        assert!(ws.delete_tag("Idea").is_err());
    }

    #[test]
    fn test_view_fallbacks() {
        let ws = two_folders();
        let work = ws.folders[1].clone();
        let cat = work.categories[1].id;
        assert_eq!(
            ActiveView::Category(cat).after_folder_removed(work.id, &work),
            ActiveView::default()
        );
        assert_eq!(
            ActiveView::Category(cat).after_category_removed(work.id, cat),
            ActiveView::Folder(work.id)
        );
        assert_eq!(
            ActiveView::Tag("a".to_string()).after_tag_renamed("a", "b"),
            ActiveView::Tag("b".to_string())
        );
        assert_eq!(ActiveView::Tag("a".to_string()).after_tag_removed("a"), ActiveView::default());
    }
}
