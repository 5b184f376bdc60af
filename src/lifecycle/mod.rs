//! Per-note lifecycle: status transitions, pinning, edits with version
//! history, creation and permanent deletion.
//!
//! Every function here mutates the collection fully or not at all; a call
//! that does not apply (unknown id, transition not in the table) is a no-op
//! and reports so through its return value.

use crate::models::{
    CategoryId, CoverImageSettings, FolderId, ImageAttachment, Note, NoteBody, NoteId,
    NoteStatus, NoteVersion, DEFAULT_NOTE_COLOR,
};

/// Maximum number of versions kept per note.
pub(crate) const HISTORY_LIMIT: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum StatusEvent {
    Archive,
    Unarchive,
    Trash,
    Restore,
}

impl StatusEvent {
    /// The event that moves a note from `from` to `to`, if the table has one.
    pub fn between(from: NoteStatus, to: NoteStatus) -> Option<Self> {
        use NoteStatus::*;
        match (from, to) {
            (Active, Archived) => Some(StatusEvent::Archive),
            (Active | Archived, Trashed) => Some(StatusEvent::Trash),
            (Archived, Active) => Some(StatusEvent::Unarchive),
            (Trashed, Active) => Some(StatusEvent::Restore),
            _ => None,
        }
    }
}

pub(crate) fn next_status(from: NoteStatus, event: StatusEvent) -> Option<NoteStatus> {
    use NoteStatus::*;
    match (from, event) {
        (Active, StatusEvent::Archive) => Some(Archived),
        (Active | Archived, StatusEvent::Trash) => Some(Trashed),
        (Archived, StatusEvent::Unarchive) => Some(Active),
        (Trashed, StatusEvent::Restore) => Some(Active),
        _ => None,
    }
}

/// Verbatim copy of the note collection, used to undo a transition.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct NotesSnapshot(Vec<Note>);

impl NotesSnapshot {
    pub fn capture(notes: &[Note]) -> Self {
        Self(notes.to_vec())
    }

    pub fn restore(self, notes: &mut Vec<Note>) {
        *notes = self.0;
    }
}

#[derive(Clone, Debug)]
pub(crate) struct StatusChange {
    pub from: NoteStatus,
    pub to: NoteStatus,
    pub undo: NotesSnapshot,
}

impl StatusChange {
    pub fn message(&self) -> &'static str {
        match (self.from, self.to) {
            (_, NoteStatus::Trashed) => "Note moved to trash.",
            (_, NoteStatus::Archived) => "Note archived.",
            (NoteStatus::Archived, NoteStatus::Active) => "Note unarchived.",
            _ => "Note restored.",
        }
    }
}

/// Writes the new status onto one note. Leaving `active` always unpins.
fn set_status(note: &mut Note, to: NoteStatus) {
    note.status = to;
    if to != NoteStatus::Active {
        note.pinned = false;
    }
}

/// Applies `event` to note `id`. The returned change carries the snapshot
/// of the collection taken before the mutation.
pub(crate) fn apply_event(notes: &mut [Note], id: NoteId, event: StatusEvent) -> Option<StatusChange> {
    let from = notes.iter().find(|n| n.id == id)?.status;
    let to = next_status(from, event)?;
    let undo = NotesSnapshot::capture(notes);

    let note = notes.iter_mut().find(|n| n.id == id)?;
    set_status(note, to);
    Some(StatusChange { from, to, undo })
}

/// Applies `event` to one note without snapshotting. Used by bulk actions.
pub(crate) fn apply_event_in_place(note: &mut Note, event: StatusEvent) -> bool {
    match next_status(note.status, event) {
        Some(to) => {
            set_status(note, to);
            true
        }
        None => false,
    }
}

/// Flips `pinned` on an active note. Returns the new value.
pub(crate) fn toggle_pin(notes: &mut [Note], id: NoteId) -> Option<bool> {
    let note = notes.iter_mut().find(|n| n.id == id && n.is_active())?;
    note.pinned = !note.pinned;
    Some(note.pinned)
}

/// Removes a trashed note for good.
pub(crate) fn permanently_delete(notes: &mut Vec<Note>, id: NoteId) -> Option<Note> {
    let index = notes
        .iter()
        .position(|n| n.id == id && n.status == NoteStatus::Trashed)?;
    Some(notes.remove(index))
}

/// Removes every trashed note. Returns how many were removed.
pub(crate) fn empty_trash(notes: &mut Vec<Note>) -> usize {
    let before = notes.len();
    notes.retain(|n| n.status != NoteStatus::Trashed);
    before - notes.len()
}

/// Partial field set merged by [`update_note`].
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct NotePatch {
    pub title: Option<String>,
    /// Setting content always stores markdown and drops a legacy checklist.
    pub content: Option<String>,
    pub color: Option<String>,
    pub images: Option<Vec<ImageAttachment>>,
    pub cover: Option<Option<CoverImageSettings>>,
    pub tags: Option<Vec<String>>,
}

/// Merges `patch` into note `id`. A change of title or content pushes the
/// pre-merge text onto the history (newest first, capped). Returns false if
/// the id is unknown.
pub(crate) fn update_note(notes: &mut [Note], id: NoteId, patch: NotePatch, now: i64) -> bool {
    let Some(note) = notes.iter_mut().find(|n| n.id == id) else {
        return false;
    };

    let title_changed = patch.title.as_ref().is_some_and(|t| *t != note.title);
    let content_changed = patch.content.as_ref().is_some_and(|c| match &note.body {
        NoteBody::Markdown(current) => current != c,
        NoteBody::Checklist(_) => true,
    });

    if title_changed || content_changed {
        note.history.insert(
            0,
            NoteVersion {
                title: note.title.clone(),
                body: note.body.clone(),
                images: note.images.clone(),
                timestamp: now,
            },
        );
        note.history.truncate(HISTORY_LIMIT);
    }

    if let Some(title) = patch.title {
        note.title = title;
    }
    if let Some(content) = patch.content {
        note.body = NoteBody::Markdown(content);
    }
    if let Some(color) = patch.color {
        note.color = Some(color);
    }
    if let Some(images) = patch.images {
        note.images = images;
    }
    if let Some(cover) = patch.cover {
        note.cover = cover;
    }
    if let Some(tags) = patch.tags {
        note.tags = tags;
    }
    true
}

/// Re-files a note under another category.
pub(crate) fn move_note(note: &mut Note, folder_id: FolderId, category_id: CategoryId) {
    note.folder_id = folder_id;
    note.category_id = category_id;
}

/// Fields supplied by the note creator.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct NewNote {
    pub title: String,
    pub content: String,
    pub images: Vec<ImageAttachment>,
    pub folder_id: FolderId,
    pub category_id: CategoryId,
}

impl NewNote {
    pub fn is_blank(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty() && self.images.is_empty()
    }
}

/// Prepends a new active, unpinned note. The id is the creation time,
/// bumped past any id already in use.
pub(crate) fn create_note(notes: &mut Vec<Note>, new: NewNote, now: i64) -> NoteId {
    let mut id = now;
    while notes.iter().any(|n| n.id == id) {
        id += 1;
    }

    notes.insert(
        0,
        Note {
            id,
            created_at: now,
            title: new.title.trim().to_string(),
            body: NoteBody::Markdown(new.content.trim().to_string()),
            pinned: false,
            status: NoteStatus::Active,
            color: Some(DEFAULT_NOTE_COLOR.to_string()),
            images: new.images,
            cover: None,
            folder_id: new.folder_id,
            category_id: new.category_id,
            tags: Vec::new(),
            history: Vec::new(),
        },
    );
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroupId, ListItem};

    fn note(id: NoteId, status: NoteStatus, pinned: bool) -> Note {
        Note {
            id,
            created_at: id,
            title: format!("note {id}"),
            body: NoteBody::Markdown(format!("body {id}")),
            pinned,
            status,
            color: None,
            images: vec![],
            cover: None,
            folder_id: GroupId(1.0),
            category_id: GroupId(101.0),
            tags: vec![],
            history: vec![],
        }
    }

    #[test]
    fn test_transition_table() {
        use NoteStatus::*;
        assert_eq!(next_status(Active, StatusEvent::Archive), Some(Archived));
        assert_eq!(next_status(Active, StatusEvent::Trash), Some(Trashed));
        assert_eq!(next_status(Archived, StatusEvent::Unarchive), Some(Active));
        assert_eq!(next_status(Archived, StatusEvent::Trash), Some(Trashed));
        assert_eq!(next_status(Trashed, StatusEvent::Restore), Some(Active));

        assert_eq!(next_status(Trashed, StatusEvent::Archive), None);
        assert_eq!(next_status(Active, StatusEvent::Restore), None);
        assert_eq!(next_status(Archived, StatusEvent::Archive), None);
    }

    #[test]
    fn test_leaving_active_unpins() {
        let mut notes = vec![note(1, NoteStatus::Active, true), note(2, NoteStatus::Active, true)];
        apply_event(&mut notes, 1, StatusEvent::Archive).expect("archive applies");
        apply_event(&mut notes, 2, StatusEvent::Trash).expect("trash applies");
        assert!(notes.iter().all(|n| !n.pinned));
    }

    #[test]
    fn test_pin_invariant_over_event_sequences() {
        let events = [
            StatusEvent::Archive,
            StatusEvent::Trash,
            StatusEvent::Restore,
            StatusEvent::Unarchive,
            StatusEvent::Archive,
            StatusEvent::Unarchive,
            StatusEvent::Trash,
        ];
        let mut notes = vec![note(1, NoteStatus::Active, false)];
        for event in events {
            let _ = toggle_pin(&mut notes, 1);
            let _ = apply_event(&mut notes, 1, event);
            let n = &notes[0];
            if n.status != NoteStatus::Active {
                assert!(!n.pinned, "pinned while {:?}", n.status);
            }
        }
    }

    #[test]
    fn test_undo_restores_exact_snapshot() {
        let mut notes = vec![
            note(1, NoteStatus::Active, true),
            note(2, NoteStatus::Archived, false),
        ];
        notes[1].tags = vec!["Work".to_string()];
        let before = notes.clone();

        let change = apply_event(&mut notes, 1, StatusEvent::Trash).expect("trash applies");
        assert_eq!(change.message(), "Note moved to trash.");
        assert_ne!(notes, before);

        change.undo.restore(&mut notes);
        assert_eq!(notes, before);
        assert_eq!(
            serde_json::to_string(&notes).expect("serialize"),
            serde_json::to_string(&before).expect("serialize")
        );
    }

    #[test]
    fn test_invalid_transition_is_noop() {
        let mut notes = vec![note(1, NoteStatus::Trashed, false)];
        assert!(apply_event(&mut notes, 1, StatusEvent::Archive).is_none());
        assert!(apply_event(&mut notes, 99, StatusEvent::Restore).is_none());
        assert_eq!(notes[0].status, NoteStatus::Trashed);
    }

    #[test]
    fn test_pin_only_on_active_notes() {
        let mut notes = vec![note(1, NoteStatus::Archived, false), note(2, NoteStatus::Active, false)];
        assert_eq!(toggle_pin(&mut notes, 1), None);
        assert_eq!(toggle_pin(&mut notes, 2), Some(true));
        assert_eq!(toggle_pin(&mut notes, 2), Some(false));
    }

    #[test]
    fn test_history_is_capped_newest_first() {
        let mut notes = vec![note(1, NoteStatus::Active, false)];
        for i in 0..8 {
            let patch = NotePatch {
                content: Some(format!("v{i}")),
                ..NotePatch::default()
            };
            assert!(update_note(&mut notes, 1, patch, 100 + i));
        }
        let history = &notes[0].history;
        assert_eq!(history.len(), HISTORY_LIMIT);
        let contents: Vec<_> = history.iter().map(|v| v.body.content().to_string()).collect();
        assert_eq!(contents, vec!["v6", "v5", "v4", "v3", "v2"]);
        assert_eq!(history[0].timestamp, 107);
    }

    #[test]
    fn test_update_without_text_change_keeps_history() {
        let mut notes = vec![note(1, NoteStatus::Active, false)];
        let patch = NotePatch {
            title: Some("note 1".to_string()),
            color: Some("#5C2B29".to_string()),
            ..NotePatch::default()
        };
        assert!(update_note(&mut notes, 1, patch, 5));
        assert!(notes[0].history.is_empty());
        assert_eq!(notes[0].color.as_deref(), Some("#5C2B29"));
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut notes = vec![note(1, NoteStatus::Active, false)];
        let before = notes.clone();
        assert!(!update_note(&mut notes, 42, NotePatch::default(), 1));
        assert_eq!(notes, before);
    }

    #[test]
    fn test_setting_content_clears_legacy_items() {
        let mut notes = vec![note(1, NoteStatus::Active, false)];
        notes[0].body = NoteBody::Checklist(vec![ListItem {
            id: 1,
            text: "a".to_string(),
            checked: false,
            sub_items: None,
        }]);
        let patch = NotePatch {
            content: Some("- [ ] a".to_string()),
            ..NotePatch::default()
        };
        update_note(&mut notes, 1, patch, 9);
        assert_eq!(notes[0].body, NoteBody::Markdown("- [ ] a".to_string()));
        assert!(notes[0].history[0].body.is_legacy_checklist());
    }

    #[test]
    fn test_permanent_delete_requires_trash() {
        let mut notes = vec![note(1, NoteStatus::Active, false), note(2, NoteStatus::Trashed, false)];
        assert!(permanently_delete(&mut notes, 1).is_none());
        assert_eq!(permanently_delete(&mut notes, 2).map(|n| n.id), Some(2));
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn test_empty_trash_counts_removed() {
        let mut notes = vec![
            note(1, NoteStatus::Trashed, false),
            note(2, NoteStatus::Active, false),
            note(3, NoteStatus::Trashed, false),
        ];
        assert_eq!(empty_trash(&mut notes), 2);
        assert_eq!(notes.len(), 1);
    }

    #[test]
    fn test_create_note_prepends_with_unique_id() {
        let mut notes = vec![note(1000, NoteStatus::Active, false)];
        let new = NewNote {
            title: "  Hi ".to_string(),
            content: "text".to_string(),
            folder_id: GroupId(1.0),
            category_id: GroupId(101.0),
            ..NewNote::default()
        };
        let id = create_note(&mut notes, new, 1000);
        assert_eq!(id, 1001);
        assert_eq!(notes[0].id, 1001);
        assert_eq!(notes[0].title, "Hi");
        assert_eq!(notes[0].created_at, 1000);
        assert!(notes[0].is_active() && !notes[0].pinned);
    }

    #[test]
    fn test_status_change_messages() {
        let mut notes = vec![note(1, NoteStatus::Archived, false)];
        let change = apply_event(&mut notes, 1, StatusEvent::Unarchive).expect("applies");
        assert_eq!(change.message(), "Note unarchived.");
        assert_eq!(
            StatusEvent::between(NoteStatus::Trashed, NoteStatus::Active),
            Some(StatusEvent::Restore)
        );
    }
}
