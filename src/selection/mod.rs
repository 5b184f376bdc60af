//! Multi-select of notes and the bulk actions applied to a selection.

use crate::lifecycle::{apply_event_in_place, move_note, StatusEvent};
use crate::models::{CategoryId, FolderId, Note, NoteId};
use std::collections::BTreeSet;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Selection {
    ids: BTreeSet<NoteId>,
    /// Set while the move dialog was opened from a single card.
    single_move: Option<NoteId>,
}

impl Selection {
    pub fn toggle(&mut self, id: NoteId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    pub fn contains(&self, id: NoteId) -> bool {
        self.ids.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Cards switch to checkbox mode while anything is selected.
    pub fn is_active(&self) -> bool {
        !self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.single_move = None;
    }

    /// Empties the selection and hands back what was selected.
    pub fn take(&mut self) -> BTreeSet<NoteId> {
        self.single_move = None;
        std::mem::take(&mut self.ids)
    }

    /// Seeds the selection with one note for the move dialog.
    pub fn begin_single_move(&mut self, id: NoteId) {
        self.ids = BTreeSet::from([id]);
        self.single_move = Some(id);
    }

    /// Called when the move dialog closes, confirmed or not. Drops the
    /// seeded note if it is still the only one selected.
    pub fn finish_move_dialog(&mut self) {
        if let Some(id) = self.single_move.take() {
            if self.ids.len() == 1 && self.ids.contains(&id) {
                self.ids.clear();
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum BulkAction {
    Archive,
    Trash,
    Move {
        folder_id: FolderId,
        category_id: CategoryId,
    },
}

impl BulkAction {
    pub fn message(self, count: usize) -> String {
        match self {
            BulkAction::Archive => format!("{count} note(s) archived."),
            BulkAction::Trash => format!("{count} note(s) moved to trash."),
            BulkAction::Move { .. } => format!("{count} note(s) moved."),
        }
    }
}

/// Applies `action` to every note in `ids` in one pass. Notes for which the
/// transition does not apply are skipped. Returns the number changed.
pub(crate) fn apply_bulk(notes: &mut [Note], ids: &BTreeSet<NoteId>, action: BulkAction) -> usize {
    let mut changed = 0;
    for note in notes.iter_mut().filter(|n| ids.contains(&n.id)) {
        let applied = match action {
            BulkAction::Archive => apply_event_in_place(note, StatusEvent::Archive),
            BulkAction::Trash => apply_event_in_place(note, StatusEvent::Trash),
            BulkAction::Move {
                folder_id,
                category_id,
            } => {
                move_note(note, folder_id, category_id);
                true
            }
        };
        if applied {
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GroupId, NoteBody, NoteStatus};

    fn note(id: NoteId, status: NoteStatus) -> Note {
        Note {
            id,
            created_at: id,
            title: String::new(),
            body: NoteBody::default(),
            pinned: status == NoteStatus::Active,
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
    fn test_toggle_adds_and_removes() {
        let mut sel = Selection::default();
        sel.toggle(1);
        sel.toggle(2);
        sel.toggle(1);
        assert!(!sel.contains(1));
        assert!(sel.contains(2));
        assert!(sel.is_active());
        sel.clear();
        assert!(!sel.is_active());
    }

    #[test]
    fn test_bulk_trash_clears_selection_and_counts() {
        let mut notes = vec![
            note(1, NoteStatus::Active),
            note(2, NoteStatus::Archived),
            note(3, NoteStatus::Active),
        ];
        let mut sel = Selection::default();
        sel.toggle(1);
        sel.toggle(2);

        let ids = sel.take();
        let count = apply_bulk(&mut notes, &ids, BulkAction::Trash);
        assert_eq!(count, 2);
        assert!(!sel.is_active());
        assert_eq!(notes[0].status, NoteStatus::Trashed);
        assert!(!notes[0].pinned);
        assert_eq!(notes[2].status, NoteStatus::Active);
        assert_eq!(BulkAction::Trash.message(count), "2 note(s) moved to trash.");
    }

    #[test]
    fn test_bulk_archive_skips_trashed_notes() {
        let mut notes = vec![note(1, NoteStatus::Trashed), note(2, NoteStatus::Active)];
        let ids = BTreeSet::from([1, 2]);
        assert_eq!(apply_bulk(&mut notes, &ids, BulkAction::Archive), 1);
        assert_eq!(notes[0].status, NoteStatus::Trashed);
        assert_eq!(notes[1].status, NoteStatus::Archived);
    }

    #[test]
    fn test_bulk_move() {
        let mut notes = vec![note(1, NoteStatus::Active), note(2, NoteStatus::Active)];
        let action = BulkAction::Move {
            folder_id: GroupId(2.0),
            category_id: GroupId(201.0),
        };
        assert_eq!(apply_bulk(&mut notes, &BTreeSet::from([2]), action), 1);
        assert_eq!((notes[1].folder_id, notes[1].category_id), (GroupId(2.0), GroupId(201.0)));
        assert_eq!(notes[0].folder_id, GroupId(1.0));
    }

    #[test]
    fn test_single_move_is_cleared_on_close() {
        let mut sel = Selection::default();
        sel.begin_single_move(7);
        assert!(sel.contains(7));
        sel.finish_move_dialog();
        assert!(!sel.is_active());
    }

    #[test]
    fn test_single_move_keeps_grown_selection() {
        let mut sel = Selection::default();
        sel.begin_single_move(7);
        sel.toggle(8);
        sel.finish_move_dialog();
        assert_eq!(sel.len(), 2);
    }
}
