use super::{CategoryId, FolderId, NoteId};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum NoteStatus {
    #[default]
    Active,
    Archived,
    Trashed,
}

/// Legacy structured checklist entry (pre-markdown notes).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListItem {
    pub id: i64,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub checked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_items: Option<Vec<ListItem>>,
}

/// The live body of a note.
///
/// Legacy notes carry a structured checklist; everything edited since the
/// markdown migration carries markdown text. Exactly one is live at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum NoteBody {
    Checklist(Vec<ListItem>),
    Markdown(String),
}

impl Default for NoteBody {
    fn default() -> Self {
        NoteBody::Markdown(String::new())
    }
}

impl NoteBody {
    /// Builds a body from the persisted pair. Non-empty `listItems` win.
    pub fn from_parts(content: String, list_items: Option<Vec<ListItem>>) -> Self {
        match list_items {
            Some(items) if !items.is_empty() => NoteBody::Checklist(items),
            _ => NoteBody::Markdown(content),
        }
    }

    pub fn is_legacy_checklist(&self) -> bool {
        matches!(self, NoteBody::Checklist(_))
    }

    pub fn list_items(&self) -> Option<&[ListItem]> {
        match self {
            NoteBody::Checklist(items) => Some(items),
            NoteBody::Markdown(_) => None,
        }
    }

    /// Stored `content` value; empty for legacy checklist bodies.
    pub fn content(&self) -> &str {
        match self {
            NoteBody::Checklist(_) => "",
            NoteBody::Markdown(text) => text,
        }
    }
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub(crate) enum ImageSize {
    Small,
    #[default]
    Medium,
    Large,
}

impl ImageSize {
    pub fn width_class(self) -> &'static str {
        match self {
            ImageSize::Small => "w-1/3",
            ImageSize::Medium => "w-2/3",
            ImageSize::Large => "w-full",
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ImageAttachment {
    pub src: String,
    #[serde(default)]
    pub size: ImageSize,
}

impl ImageAttachment {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            size: ImageSize::default(),
        }
    }
}

/// Attachments were once stored as bare data-URL strings.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(untagged)]
enum StoredImage {
    Legacy(String),
    Structured(ImageAttachment),
}

impl From<StoredImage> for ImageAttachment {
    fn from(img: StoredImage) -> Self {
        match img {
            StoredImage::Legacy(src) => ImageAttachment::new(src),
            StoredImage::Structured(att) => att,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ObjectFit {
    #[default]
    Cover,
    Contain,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub(crate) enum ObjectPosition {
    Top,
    #[default]
    Center,
    Bottom,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CoverImageSettings {
    pub src: String,
    #[serde(default)]
    pub object_fit: ObjectFit,
    #[serde(default)]
    pub object_position: ObjectPosition,
}

impl CoverImageSettings {
    pub fn from_src(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            object_fit: ObjectFit::Cover,
            object_position: ObjectPosition::Center,
        }
    }

    pub fn css(&self) -> String {
        let fit = match self.object_fit {
            ObjectFit::Cover => "cover",
            ObjectFit::Contain => "contain",
        };
        let pos = match self.object_position {
            ObjectPosition::Top => "top",
            ObjectPosition::Center => "center",
            ObjectPosition::Bottom => "bottom",
        };
        format!("object-fit: {fit}; object-position: {pos};")
    }
}

/// Snapshot of a note's text captured before an edit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct NoteVersion {
    pub title: String,
    pub body: NoteBody,
    pub images: Vec<ImageAttachment>,
    pub timestamp: i64,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
struct StoredVersion {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    list_items: Option<Vec<ListItem>>,
    timestamp: i64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    images: Vec<StoredImage>,
}

impl From<StoredVersion> for NoteVersion {
    fn from(v: StoredVersion) -> Self {
        Self {
            title: v.title,
            body: NoteBody::from_parts(v.content, v.list_items),
            images: v.images.into_iter().map(Into::into).collect(),
            timestamp: v.timestamp,
        }
    }
}

impl From<NoteVersion> for StoredVersion {
    fn from(v: NoteVersion) -> Self {
        let (content, list_items) = split_body(v.body);
        Self {
            title: v.title,
            content,
            list_items,
            timestamp: v.timestamp,
            images: v.images.into_iter().map(StoredImage::Structured).collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(from = "StoredNote", into = "StoredNote")]
pub(crate) struct Note {
    pub id: NoteId,
    pub created_at: i64,
    pub title: String,
    pub body: NoteBody,
    pub pinned: bool,
    pub status: NoteStatus,
    pub color: Option<String>,
    pub images: Vec<ImageAttachment>,
    pub cover: Option<CoverImageSettings>,
    pub folder_id: FolderId,
    pub category_id: CategoryId,
    pub tags: Vec<String>,
    /// Most recent first.
    pub history: Vec<NoteVersion>,
}

impl Note {
    pub fn is_active(&self) -> bool {
        self.status == NoteStatus::Active
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }

    pub fn color_or_default(&self) -> &str {
        self.color.as_deref().unwrap_or(super::DEFAULT_NOTE_COLOR)
    }
}

/// On-disk shape of a note: `content` + optional legacy `listItems`, and the
/// legacy bare `coverImage` string next to `coverImageSettings`.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
struct StoredNote {
    id: NoteId,
    #[serde(default)]
    created_at: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    list_items: Option<Vec<ListItem>>,
    #[serde(default)]
    pinned: bool,
    #[serde(default)]
    status: NoteStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    images: Vec<StoredImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cover_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cover_image_settings: Option<CoverImageSettings>,
    folder_id: FolderId,
    category_id: CategoryId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    history: Vec<StoredVersion>,
}

fn split_body(body: NoteBody) -> (String, Option<Vec<ListItem>>) {
    match body {
        NoteBody::Checklist(items) => (String::new(), Some(items)),
        NoteBody::Markdown(text) => (text, None),
    }
}

impl From<StoredNote> for Note {
    fn from(s: StoredNote) -> Self {
        let cover = s
            .cover_image_settings
            .or_else(|| s.cover_image.map(CoverImageSettings::from_src));
        let pinned = s.pinned && s.status == NoteStatus::Active;

        Self {
            id: s.id,
            created_at: s.created_at,
            title: s.title,
            body: NoteBody::from_parts(s.content, s.list_items),
            pinned,
            status: s.status,
            color: s.color,
            images: s.images.into_iter().map(Into::into).collect(),
            cover,
            folder_id: s.folder_id,
            category_id: s.category_id,
            tags: s.tags,
            history: s.history.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Note> for StoredNote {
    fn from(n: Note) -> Self {
        let (content, list_items) = split_body(n.body);
        Self {
            id: n.id,
            created_at: n.created_at,
            title: n.title,
            content,
            list_items,
            pinned: n.pinned,
            status: n.status,
            color: n.color,
            images: n.images.into_iter().map(StoredImage::Structured).collect(),
            cover_image: None,
            cover_image_settings: n.cover,
            folder_id: n.folder_id,
            category_id: n.category_id,
            tags: n.tags,
            history: n.history.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroupId;

    #[test]
    fn test_legacy_note_normalizes_on_load() {
        let json = r##"{
            "id": 10, "createdAt": 10, "title": "Old", "content": "",
            "listItems": [{"id": 1, "text": "milk", "checked": true}],
            "pinned": true, "status": "archived",
            "images": ["data:a", {"src": "data:b", "size": "large"}],
            "coverImage": "data:a",
            "folderId": 1, "categoryId": 101
        }"##;
        let note: Note = serde_json::from_str(json).expect("legacy note should parse");

        assert!(note.body.is_legacy_checklist());
        assert_eq!(note.images[0], ImageAttachment::new("data:a"));
        assert_eq!(note.images[1].size, ImageSize::Large);
        assert_eq!(note.cover, Some(CoverImageSettings::from_src("data:a")));
        // pinned is meaningless outside the active state
        assert!(!note.pinned);
    }

    #[test]
    fn test_note_serializes_to_stored_shape() {
        let note = Note {
            id: 1,
            created_at: 1,
            title: "t".to_string(),
            body: NoteBody::Markdown("- [ ] a".to_string()),
            pinned: false,
            status: NoteStatus::Trashed,
            color: None,
            images: vec![],
            cover: None,
            folder_id: GroupId(1.0),
            category_id: GroupId(2.0),
            tags: vec!["x".to_string()],
            history: vec![],
        };
        let v = serde_json::to_value(&note).expect("should serialize");
        assert_eq!(v["content"], "- [ ] a");
        assert_eq!(v["status"], "trashed");
        assert_eq!(v["categoryId"], 2);
        assert!(v.get("listItems").is_none());
        assert!(v.get("history").is_none());
        assert!(v.get("coverImage").is_none());
    }

    #[test]
    fn test_empty_list_items_fall_back_to_content() {
        let body = NoteBody::from_parts("hello".to_string(), Some(vec![]));
        assert_eq!(body, NoteBody::Markdown("hello".to_string()));
    }

    #[test]
    fn test_status_parses_from_str() {
        assert_eq!("archived".parse::<NoteStatus>().ok(), Some(NoteStatus::Archived));
        assert_eq!(NoteStatus::Trashed.to_string(), "trashed");
    }
}
