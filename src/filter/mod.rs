//! Derivation of the visible note list from the collection, the active
//! view, the search term and the sort option. Nothing here mutates notes.

use crate::content::flatten_item_texts;
use crate::models::{CategoryId, Folder, FolderId, GroupId, Note, NoteBody, NoteStatus, SortOption, NOTE_COLORS};
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) enum SpecialView {
    #[default]
    AllNotes,
    Archive,
    Trash,
}

impl SpecialView {
    pub fn label(self) -> &'static str {
        match self {
            SpecialView::AllNotes => "Notes",
            SpecialView::Archive => "Archive",
            SpecialView::Trash => "Trash",
        }
    }
}

/// What the sidebar has selected. Mirrors the route.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum ActiveView {
    Special(SpecialView),
    Folder(FolderId),
    Category(CategoryId),
    Tag(String),
}

impl Default for ActiveView {
    fn default() -> Self {
        ActiveView::Special(SpecialView::AllNotes)
    }
}

impl ActiveView {
    /// Parses a router path. Unknown paths fall back to all notes.
    pub fn from_path(path: &str) -> Self {
        let path = path.trim_matches('/');
        let mut parts = path.splitn(2, '/');
        let head = parts.next().unwrap_or_default();
        let tail = parts.next();

        match (head, tail) {
            ("archive", None) => ActiveView::Special(SpecialView::Archive),
            ("trash", None) => ActiveView::Special(SpecialView::Trash),
            ("folder", Some(id)) => GroupId::parse(id)
                .map(ActiveView::Folder)
                .unwrap_or_default(),
            ("category", Some(id)) => GroupId::parse(id)
                .map(ActiveView::Category)
                .unwrap_or_default(),
            ("tag", Some(name)) => urlencoding::decode(name)
                .map(|n| ActiveView::Tag(n.into_owned()))
                .unwrap_or_default(),
            _ => ActiveView::default(),
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            ActiveView::Special(SpecialView::AllNotes) => "/".to_string(),
            ActiveView::Special(SpecialView::Archive) => "/archive".to_string(),
            ActiveView::Special(SpecialView::Trash) => "/trash".to_string(),
            ActiveView::Folder(id) => format!("/folder/{id}"),
            ActiveView::Category(id) => format!("/category/{id}"),
            ActiveView::Tag(name) => format!("/tag/{}", urlencoding::encode(name)),
        }
    }

    /// Pinned notes only float to the top in folder, category and all-notes views.
    pub fn partitions_pins(&self) -> bool {
        matches!(
            self,
            ActiveView::Folder(_)
                | ActiveView::Category(_)
                | ActiveView::Special(SpecialView::AllNotes)
        )
    }

    pub fn is_trash(&self) -> bool {
        matches!(self, ActiveView::Special(SpecialView::Trash))
    }

    /// Heading shown above the grid.
    pub fn title(&self, folders: &[Folder]) -> String {
        match self {
            ActiveView::Special(special) => special.label().to_string(),
            ActiveView::Folder(id) => folders
                .iter()
                .find(|f| f.id == *id)
                .map_or_else(|| "Folder".to_string(), |f| f.name.clone()),
            ActiveView::Category(id) => folders
                .iter()
                .find_map(|f| f.category(*id))
                .map_or_else(|| "Category".to_string(), |c| c.name.clone()),
            ActiveView::Tag(name) => format!("#{name}"),
        }
    }

    fn scope(&self, note: &Note, folders: &[Folder]) -> bool {
        match self {
            ActiveView::Special(SpecialView::Trash) => note.status == NoteStatus::Trashed,
            ActiveView::Special(SpecialView::Archive) => note.status == NoteStatus::Archived,
            ActiveView::Special(SpecialView::AllNotes) => note.is_active(),
            ActiveView::Category(id) => note.is_active() && note.category_id == *id,
            ActiveView::Folder(id) => {
                note.is_active()
                    && folders
                        .iter()
                        .find(|f| f.id == *id)
                        .is_some_and(|f| f.owns_category(note.category_id))
            }
            ActiveView::Tag(name) => note.is_active() && note.has_tag(name),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct DisplayedNotes {
    pub pinned: Vec<Note>,
    pub others: Vec<Note>,
}

impl DisplayedNotes {
    pub fn len(&self) -> usize {
        self.pinned.len() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pinned first, then the rest.
    pub fn iter(&self) -> impl Iterator<Item = &Note> {
        self.pinned.iter().chain(self.others.iter())
    }
}

/// Case-insensitive substring match on title, body, checklist items and tags.
/// A blank term matches everything; otherwise the term is used as typed,
/// surrounding spaces included.
pub(crate) fn matches_search(note: &Note, term: &str) -> bool {
    if term.trim().is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    let hit = |s: &str| s.to_lowercase().contains(&term);

    hit(&note.title)
        || match &note.body {
            NoteBody::Markdown(text) => hit(text),
            NoteBody::Checklist(items) => flatten_item_texts(items).into_iter().any(hit),
        }
        || note.tags.iter().any(|t| hit(t))
}

/// Position in the fixed palette; unknown or missing colours sort last.
fn palette_index(color: Option<&str>) -> usize {
    color
        .and_then(|c| NOTE_COLORS.iter().position(|p| p.eq_ignore_ascii_case(c)))
        .unwrap_or(usize::MAX)
}

fn fold_char(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        other => other,
    }
}

/// Approximates a locale collation: case and common Latin accents are
/// ignored first, the raw strings break ties.
pub(crate) fn compare_titles(a: &str, b: &str) -> Ordering {
    let folded = |s: &str| -> String { s.chars().flat_map(char::to_lowercase).map(fold_char).collect() };
    folded(a).cmp(&folded(b)).then_with(|| a.cmp(b))
}

pub(crate) fn sort_notes(notes: &mut [Note], sort: SortOption) {
    match sort {
        SortOption::DateDesc => notes.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortOption::DateAsc => notes.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
        SortOption::TitleAsc => notes.sort_by(|a, b| compare_titles(&a.title, &b.title)),
        SortOption::TitleDesc => notes.sort_by(|a, b| compare_titles(&b.title, &a.title)),
        SortOption::Color => notes.sort_by_key(|n| palette_index(n.color.as_deref())),
    }
}

/// Scope, search, sort, then split pinned notes out where the view allows it.
/// The trash view skips search and sort and keeps collection order.
pub(crate) fn displayed_notes(
    notes: &[Note],
    folders: &[Folder],
    view: &ActiveView,
    search: &str,
    sort: SortOption,
) -> DisplayedNotes {
    let scoped = notes.iter().filter(|n| view.scope(n, folders));

    if view.is_trash() {
        return DisplayedNotes {
            pinned: Vec::new(),
            others: scoped.cloned().collect(),
        };
    }

    let mut matched: Vec<Note> = scoped.filter(|n| matches_search(n, search)).cloned().collect();
    sort_notes(&mut matched, sort);

    if !view.partitions_pins() {
        return DisplayedNotes {
            pinned: Vec::new(),
            others: matched,
        };
    }

    let (pinned, others): (Vec<Note>, Vec<Note>) = matched.into_iter().partition(|n| n.pinned);
    DisplayedNotes { pinned, others }
}

/// Active notes for the quick search modal, newest first.
pub(crate) fn quick_search(notes: &[Note], term: &str) -> Vec<Note> {
    let mut found: Vec<Note> = notes
        .iter()
        .filter(|n| n.is_active() && matches_search(n, term))
        .cloned()
        .collect();
    sort_notes(&mut found, SortOption::DateDesc);
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, ListItem};

    fn note(id: i64, title: &str, content: &str) -> Note {
        Note {
            id,
            created_at: id,
            title: title.to_string(),
            body: NoteBody::Markdown(content.to_string()),
            pinned: false,
            status: NoteStatus::Active,
            color: None,
            images: vec![],
            cover: None,
            folder_id: GroupId(1.0),
            category_id: GroupId(101.0),
            tags: vec![],
            history: vec![],
        }
    }

    fn folders() -> Vec<Folder> {
        vec![
            Folder {
                id: GroupId(1.0),
                name: "General".to_string(),
                color: None,
                categories: vec![
                    Category { id: GroupId(101.0), name: "Notes".to_string(), color: None },
                    Category { id: GroupId(102.0), name: "Ideas".to_string(), color: None },
                ],
            },
            Folder {
                id: GroupId(2.0),
                name: "Work".to_string(),
                color: None,
                categories: vec![Category { id: GroupId(201.0), name: "Tasks".to_string(), color: None }],
            },
        ]
    }

    fn ids(notes: &[Note]) -> Vec<i64> {
        notes.iter().map(|n| n.id).collect()
    }

    fn all_notes() -> ActiveView {
        ActiveView::Special(SpecialView::AllNotes)
    }

    #[test]
    fn test_sort_by_title_and_date() {
        let notes = vec![note(100, "B", ""), note(300, "A", ""), note(200, "C", "")];
        let by_title = displayed_notes(&notes, &folders(), &all_notes(), "", SortOption::TitleAsc);
        let titles: Vec<_> = by_title.others.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);

        let by_date = displayed_notes(&notes, &folders(), &all_notes(), "", SortOption::DateDesc);
        assert_eq!(ids(&by_date.others), vec![300, 200, 100]);

        let oldest = displayed_notes(&notes, &folders(), &all_notes(), "", SortOption::DateAsc);
        assert_eq!(ids(&oldest.others), vec![100, 200, 300]);
    }

    #[test]
    fn test_search_matches_body() {
        let notes = vec![note(1, "Groceries", "buy milk"), note(2, "Work", "finish report")];
        let found = displayed_notes(&notes, &folders(), &all_notes(), "milk", SortOption::DateDesc);
        assert_eq!(ids(&found.others), vec![1]);

        let everything = displayed_notes(&notes, &folders(), &all_notes(), "", SortOption::DateDesc);
        assert_eq!(everything.len(), 2);
    }

    #[test]
    fn test_search_covers_tags_and_legacy_items() {
        let mut tagged = note(1, "a", "");
        tagged.tags = vec!["Urgent".to_string()];
        let mut legacy = note(2, "b", "");
        legacy.body = NoteBody::Checklist(vec![ListItem {
            id: 1,
            text: "top".to_string(),
            checked: false,
            sub_items: Some(vec![ListItem {
                id: 2,
                text: "Nested Milk".to_string(),
                checked: false,
                sub_items: None,
            }]),
        }]);
        assert!(matches_search(&tagged, "urg"));
        assert!(matches_search(&legacy, "MILK"));
        assert!(!matches_search(&legacy, "bread"));
    }

    #[test]
    fn test_search_term_keeps_surrounding_spaces() {
        let notes = vec![note(1, "Groceries", "buy milk"), note(2, "Shop", "milk and eggs")];
        let found = displayed_notes(&notes, &folders(), &all_notes(), "milk ", SortOption::DateAsc);
        assert_eq!(ids(&found.others), vec![2]);

        let blank = displayed_notes(&notes, &folders(), &all_notes(), "   ", SortOption::DateAsc);
        assert_eq!(blank.len(), 2);
    }

    #[test]
    fn test_trash_keeps_natural_order_and_ignores_search() {
        let mut notes = vec![note(1, "x", ""), note(3, "y", ""), note(2, "z", "")];
        for n in &mut notes {
            n.status = NoteStatus::Trashed;
        }
        let trash = ActiveView::Special(SpecialView::Trash);
        let shown = displayed_notes(&notes, &folders(), &trash, "nomatch", SortOption::TitleDesc);
        assert_eq!(ids(&shown.others), vec![1, 3, 2]);
    }

    #[test]
    fn test_pins_partition_only_in_structural_views() {
        let mut notes = vec![note(1, "a", ""), note(2, "b", ""), note(3, "c", "")];
        notes[0].pinned = true;
        for n in &mut notes {
            n.tags = vec!["t".to_string()];
        }

        let shown = displayed_notes(&notes, &folders(), &all_notes(), "", SortOption::DateDesc);
        assert_eq!(ids(&shown.pinned), vec![1]);
        assert_eq!(ids(&shown.others), vec![3, 2]);
        assert_eq!(shown.iter().map(|n| n.id).collect::<Vec<_>>(), vec![1, 3, 2]);

        let tag = ActiveView::Tag("t".to_string());
        let shown = displayed_notes(&notes, &folders(), &tag, "", SortOption::DateDesc);
        assert!(shown.pinned.is_empty());
        assert_eq!(ids(&shown.others), vec![3, 2, 1]);
    }

    #[test]
    fn test_folder_and_category_scope() {
        let mut notes = vec![note(1, "a", ""), note(2, "b", ""), note(3, "c", "")];
        notes[1].category_id = GroupId(102.0);
        notes[2].folder_id = GroupId(2.0);
        notes[2].category_id = GroupId(201.0);

        let folder =
            displayed_notes(&notes, &folders(), &ActiveView::Folder(GroupId(1.0)), "", SortOption::DateAsc);
        assert_eq!(ids(&folder.others), vec![1, 2]);

        let category =
            displayed_notes(&notes, &folders(), &ActiveView::Category(GroupId(201.0)), "", SortOption::DateAsc);
        assert_eq!(ids(&category.others), vec![3]);
    }

    #[test]
    fn test_archive_view_only_shows_archived() {
        let mut notes = vec![note(1, "a", ""), note(2, "b", "")];
        notes[1].status = NoteStatus::Archived;
        let archive = ActiveView::Special(SpecialView::Archive);
        let shown = displayed_notes(&notes, &folders(), &archive, "", SortOption::DateDesc);
        assert_eq!(ids(&shown.others), vec![2]);
    }

    #[test]
    fn test_color_sort_puts_unknown_last() {
        let mut notes = vec![note(1, "a", ""), note(2, "b", ""), note(3, "c", ""), note(4, "d", "")];
        notes[0].color = Some("#ffffff".to_string());
        notes[1].color = Some("#5c2b29".to_string());
        notes[2].color = Some("#202124".to_string());
        let shown = displayed_notes(&notes, &folders(), &all_notes(), "", SortOption::Color);
        assert_eq!(ids(&shown.others), vec![3, 2, 1, 4]);
    }

    #[test]
    fn test_title_compare_folds_case_and_accents() {
        assert_eq!(compare_titles("éclair", "Eclipse"), Ordering::Less);
        assert_eq!(compare_titles("apple", "Banana"), Ordering::Less);
    }

    #[test]
    fn test_pipeline_does_not_mutate_input() {
        let notes = vec![note(2, "b", ""), note(1, "a", "")];
        let before = notes.clone();
        let _ = displayed_notes(&notes, &folders(), &all_notes(), "a", SortOption::TitleAsc);
        assert_eq!(notes, before);
    }

    #[test]
    fn test_view_route_mapping() {
        assert_eq!(ActiveView::from_path("/"), ActiveView::default());
        assert_eq!(ActiveView::from_path("/trash"), ActiveView::Special(SpecialView::Trash));
        assert_eq!(ActiveView::from_path("/folder/7"), ActiveView::Folder(GroupId(7.0)));
        assert_eq!(ActiveView::from_path("/category/x"), ActiveView::default());
        assert_eq!(
            ActiveView::from_path("/tag/To%20do"),
            ActiveView::Tag("To do".to_string())
        );
        assert_eq!(ActiveView::Tag("To do".to_string()).to_path(), "/tag/To%20do");
        assert_eq!(ActiveView::Category(GroupId(5.0)).to_path(), "/category/5");
    }

    #[test]
    fn test_fractional_group_id_routes() {
        let view = ActiveView::Category(GroupId(1712345678901.5));
        assert_eq!(view.to_path(), "/category/1712345678901.5");
        assert_eq!(ActiveView::from_path(&view.to_path()), view);
        assert_eq!(ActiveView::from_path("/folder/inf"), ActiveView::default());
    }
}
