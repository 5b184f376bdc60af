use super::{body_markdown, checklist_to_markdown, is_checklist, parse_checklist, ChecklistItem};
use crate::lifecycle::NotePatch;
use crate::models::{
    CoverImageSettings, ImageAttachment, ImageSize, Note, NoteBody, NoteId, NoteVersion,
    ObjectFit, ObjectPosition,
};

/// How the body is being edited. Decided when the session opens or the
/// text is replaced wholesale, never re-detected while typing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum EditorBody {
    Checklist(Vec<ChecklistItem>),
    Markdown(String),
}

impl EditorBody {
    fn detect(text: String, id_seed: i64) -> Self {
        if is_checklist(&text) {
            EditorBody::Checklist(parse_checklist(&text, id_seed))
        } else {
            EditorBody::Markdown(text)
        }
    }
}

/// In-progress edit of one note. Nothing touches the collection until
/// [`EditSession::into_patch`] is applied through `lifecycle::update_note`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct EditSession {
    pub note_id: NoteId,
    pub title: String,
    pub body: EditorBody,
    pub images: Vec<ImageAttachment>,
    pub cover: Option<CoverImageSettings>,
    pub tags: Vec<String>,
    pub color: String,
    original: Note,
    next_item: u64,
}

impl EditSession {
    pub fn open(note: &Note, id_seed: i64) -> Self {
        let text = body_markdown(&note.body).into_owned();
        Self {
            note_id: note.id,
            title: note.title.clone(),
            body: EditorBody::detect(text, id_seed),
            images: note.images.clone(),
            cover: note.cover.clone(),
            tags: note.tags.clone(),
            color: note.color_or_default().to_string(),
            original: note.clone(),
            next_item: 0,
        }
    }

    pub fn original(&self) -> &Note {
        &self.original
    }

    pub fn is_checklist(&self) -> bool {
        matches!(self.body, EditorBody::Checklist(_))
    }

    /// Replaces the whole text (free-text typing in markdown mode).
    pub fn set_text(&mut self, text: String) {
        if let EditorBody::Markdown(current) = &mut self.body {
            *current = text;
        }
    }

    /// Switches to checklist mode; each non-blank line becomes an item.
    pub fn start_checklist(&mut self, id_seed: i64) {
        let EditorBody::Markdown(text) = &self.body else {
            return;
        };
        let text = if text.trim().is_empty() {
            "- [ ] ".to_string()
        } else {
            text.lines()
                .filter(|l| !l.trim().is_empty())
                .map(|l| format!("- [ ] {}", l.trim()))
                .collect::<Vec<_>>()
                .join("\n")
        };
        self.body = EditorBody::Checklist(parse_checklist(&text, id_seed));
    }

    /// Converts the checklist back to free markdown text.
    pub fn to_markdown_mode(&mut self) {
        if let EditorBody::Checklist(items) = &self.body {
            self.body = EditorBody::Markdown(checklist_to_markdown(items));
        }
    }

    fn items_mut(&mut self) -> Option<&mut Vec<ChecklistItem>> {
        match &mut self.body {
            EditorBody::Checklist(items) => Some(items),
            EditorBody::Markdown(_) => None,
        }
    }

    pub fn toggle_item(&mut self, id: &str) {
        if let Some(item) = self
            .items_mut()
            .and_then(|items| items.iter_mut().find(|i| i.id == id))
        {
            item.checked = !item.checked;
        }
    }

    pub fn edit_item(&mut self, id: &str, text: String) {
        if let Some(item) = self
            .items_mut()
            .and_then(|items| items.iter_mut().find(|i| i.id == id))
        {
            item.text = text;
        }
    }

    /// Inserts an empty item after `after` (or at the end) and returns its id.
    pub fn add_item_after(&mut self, after: Option<&str>) -> Option<String> {
        self.next_item += 1;
        let id = format!("new-{}", self.next_item);
        let items = self.items_mut()?;
        let pos = after
            .and_then(|a| items.iter().position(|i| i.id == a))
            .map_or(items.len(), |p| p + 1);
        items.insert(
            pos,
            ChecklistItem {
                id: id.clone(),
                text: String::new(),
                checked: false,
            },
        );
        Some(id)
    }

    /// Removes an item; returns the id of the item before it, for focus.
    pub fn remove_item(&mut self, id: &str) -> Option<String> {
        let items = self.items_mut()?;
        let index = items.iter().position(|i| i.id == id)?;
        items.remove(index);
        index
            .checked_sub(1)
            .and_then(|prev| items.get(prev))
            .map(|i| i.id.clone())
    }

    pub fn remove_image(&mut self, src: &str) {
        self.images.retain(|img| img.src != src);
        if self.cover.as_ref().is_some_and(|c| c.src == src) {
            self.cover = None;
        }
    }

    pub fn set_image_size(&mut self, src: &str, size: ImageSize) {
        if let Some(img) = self.images.iter_mut().find(|img| img.src == src) {
            img.size = size;
        }
    }

    /// Makes `src` the cover, or clears the cover if it already is.
    pub fn toggle_cover(&mut self, src: &str) {
        self.cover = match &self.cover {
            Some(c) if c.src == src => None,
            _ => Some(CoverImageSettings::from_src(src)),
        };
    }

    pub fn set_cover_fit(&mut self, fit: ObjectFit) {
        if let Some(c) = &mut self.cover {
            c.object_fit = fit;
        }
    }

    pub fn set_cover_position(&mut self, position: ObjectPosition) {
        if let Some(c) = &mut self.cover {
            c.object_position = position;
        }
    }

    pub fn toggle_tag(&mut self, name: &str) {
        if let Some(pos) = self.tags.iter().position(|t| t == name) {
            self.tags.remove(pos);
        } else {
            self.tags.push(name.to_string());
        }
    }

    /// Loads a history entry into the session.
    pub fn restore_version(&mut self, version: &NoteVersion, id_seed: i64) {
        self.title = version.title.clone();
        self.body = EditorBody::detect(body_markdown(&version.body).into_owned(), id_seed);
        self.images = version.images.clone();
    }

    /// Body text as it will be stored.
    pub fn final_content(&self) -> String {
        match &self.body {
            EditorBody::Checklist(items) => checklist_to_markdown(items),
            EditorBody::Markdown(text) => text.trim().to_string(),
        }
    }

    /// Patch to apply on close, or `None` when nothing changed.
    ///
    /// Saving always stores markdown, so a legacy checklist body is migrated
    /// the first time the note is saved with any change.
    pub fn into_patch(self) -> Option<NotePatch> {
        let content = self.final_content();
        let title = self.title.trim().to_string();
        let original = &self.original;
        let original_content = match &original.body {
            NoteBody::Checklist(_) => body_markdown(&original.body).into_owned(),
            NoteBody::Markdown(text) => text.trim().to_string(),
        };

        let changed = title != original.title
            || content != original_content
            || self.images != original.images
            || self.cover != original.cover
            || self.tags != original.tags
            || self.color != original.color_or_default();
        if !changed {
            return None;
        }

        Some(NotePatch {
            title: Some(title),
            content: Some(content),
            images: Some(self.images),
            cover: Some(self.cover),
            tags: Some(self.tags),
            color: Some(self.color),
            ..NotePatch::default()
        })
    }
}
