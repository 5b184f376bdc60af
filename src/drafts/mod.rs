//! Unsaved note-creator content, kept in storage so a reload does not lose it.

use crate::models::ImageAttachment;
use crate::schedule::{Scheduler, TimerId};
use crate::storage::{save_json, KeyValueStore};
use leptos::logging::warn;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};

pub(crate) const DRAFT_KEY: &str = "note_creator_draft_markdown";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct CreatorDraft {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub images: Vec<ImageAttachment>,
}

impl Default for CreatorDraft {
    fn default() -> Self {
        Self {
            id: "new".to_string(),
            title: String::new(),
            content: String::new(),
            images: Vec::new(),
        }
    }
}

impl CreatorDraft {
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.content.trim().is_empty() && self.images.is_empty()
    }
}

/// Reads the stored draft. An unreadable draft is discarded.
pub(crate) fn load_draft(store: &impl KeyValueStore) -> Option<CreatorDraft> {
    let raw = store.get_item(DRAFT_KEY).ok().flatten()?;
    match serde_json::from_str::<CreatorDraft>(&raw) {
        Ok(draft) if !draft.is_empty() => Some(draft),
        Ok(_) => None,
        Err(e) => {
            warn!("[drafts] discarding unreadable draft: {e}");
            let _ = store.remove_item(DRAFT_KEY);
            None
        }
    }
}

/// Writes the draft, or removes it when there is nothing to keep.
pub(crate) fn write_draft(store: &impl KeyValueStore, draft: &CreatorDraft) {
    let result = if draft.is_empty() {
        store.remove_item(DRAFT_KEY)
    } else {
        save_json(store, DRAFT_KEY, draft)
    };
    if let Err(e) = result {
        warn!("[drafts] write failed: {e}");
    }
}

pub(crate) fn clear_draft(store: &impl KeyValueStore) {
    let _ = store.remove_item(DRAFT_KEY);
}

/// Debounced draft writer: only the last draft handed in within the delay
/// is written.
#[derive(Clone)]
pub(crate) struct DraftAutosave<S, K> {
    scheduler: S,
    store: K,
    timer: Arc<Mutex<Option<TimerId>>>,
    delay_ms: u32,
}

impl<S, K> DraftAutosave<S, K>
where
    S: Scheduler,
    K: KeyValueStore + Clone + 'static,
{
    pub fn new(scheduler: S, store: K, delay_ms: u32) -> Self {
        Self {
            scheduler,
            store,
            timer: Arc::new(Mutex::new(None)),
            delay_ms,
        }
    }

    fn cancel_pending(&self) {
        if let Ok(mut timer) = self.timer.lock() {
            if let Some(id) = timer.take() {
                self.scheduler.cancel(id);
            }
        }
    }

    pub fn touch(&self, draft: CreatorDraft) {
        self.cancel_pending();
        let store = self.store.clone();
        let id = self
            .scheduler
            .schedule(self.delay_ms, Box::new(move || write_draft(&store, &draft)));
        if let Ok(mut timer) = self.timer.lock() {
            *timer = Some(id);
        }
    }

    pub fn restore(&self) -> Option<CreatorDraft> {
        load_draft(&self.store)
    }

    /// The note was created: forget the draft.
    pub fn commit(&self) {
        self.cancel_pending();
        clear_draft(&self.store);
    }

    pub fn teardown(&self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::ManualScheduler;
    use crate::storage::MemoryStorage;
    use std::rc::Rc;

    fn draft(title: &str) -> CreatorDraft {
        CreatorDraft {
            title: title.to_string(),
            ..CreatorDraft::default()
        }
    }

    fn autosave() -> (DraftAutosave<ManualScheduler, Rc<MemoryStorage>>, Rc<MemoryStorage>, ManualScheduler) {
        let sched = ManualScheduler::default();
        let store = Rc::new(MemoryStorage::default());
        (DraftAutosave::new(sched.clone(), store.clone(), 3000), store, sched)
    }

    #[test]
    fn test_debounce_writes_last_draft_only() {
        let (autosave, store, sched) = autosave();
        autosave.touch(draft("a"));
        sched.advance(2000);
        autosave.touch(draft("ab"));
        sched.advance(2000);
        assert!(load_draft(&store).is_none());
        sched.advance(1000);
        assert_eq!(autosave.restore().map(|d| d.title).as_deref(), Some("ab"));
    }

    #[test]
    fn test_empty_draft_removes_key() {
        let (autosave, store, sched) = autosave();
        write_draft(&store, &draft("x"));
        autosave.touch(draft("   "));
        sched.advance(3000);
        assert!(store.get_item(DRAFT_KEY).expect("memory read").is_none());
    }

    #[test]
    fn test_commit_cancels_pending_and_clears() {
        let (autosave, store, sched) = autosave();
        write_draft(&store, &draft("old"));
        autosave.touch(draft("new"));
        autosave.commit();
        sched.advance(5000);
        assert!(autosave.restore().is_none());
        assert_eq!(sched.pending(), 0);
    }

    #[test]
    fn test_unreadable_draft_is_discarded() {
        let store = MemoryStorage::default();
        store.set_item(DRAFT_KEY, "{oops").expect("memory write");
        assert!(load_draft(&store).is_none());
        assert!(store.get_item(DRAFT_KEY).expect("memory read").is_none());
    }

    #[test]
    fn test_draft_shape() {
        let json = serde_json::to_value(draft("t")).expect("should serialize");
        assert_eq!(json["id"], "new");
        assert_eq!(json["title"], "t");
    }
}
