mod note;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use strum::{AsRefStr, Display, EnumIter, EnumString};

pub(crate) use note::{
    CoverImageSettings, ImageAttachment, ImageSize, ListItem, Note, NoteBody, NoteStatus,
    NoteVersion, ObjectFit, ObjectPosition,
};

pub(crate) type NoteId = i64;
pub(crate) type FolderId = GroupId;
pub(crate) type CategoryId = GroupId;

/// Id of a folder or category.
///
/// Stored data carries these as arbitrary JSON numbers, fractional
/// timestamps included, so the value is kept as an `f64` and compared
/// bit for bit.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct GroupId(pub(crate) f64);

impl GroupId {
    /// The next whole id above this one.
    pub fn next(self) -> Self {
        Self(self.0.floor() + 1.0)
    }

    /// Parses a path segment. Non-finite values are rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.parse::<f64>().ok().filter(|v| v.is_finite()).map(Self)
    }
}

impl From<i64> for GroupId {
    fn from(value: i64) -> Self {
        Self(value as f64)
    }
}

impl PartialEq for GroupId {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for GroupId {}

impl Hash for GroupId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl Serialize for GroupId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let whole = self.0.fract() == 0.0 && self.0.abs() < i64::MAX as f64;
        if whole {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl<'de> Deserialize<'de> for GroupId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Self)
    }
}

pub(crate) const DEFAULT_NOTE_COLOR: &str = "#202124";

/// Fixed note palette. Also the ordering used by the colour sort.
pub(crate) const NOTE_COLORS: [&str; 12] = [
    "#202124", // default
    "#5C2B29", // red
    "#614A19", // orange
    "#635D19", // yellow
    "#345920", // green
    "#16504B", // teal
    "#2D555E", // blue
    "#1E3A5F", // dark blue
    "#42275E", // purple
    "#5B2245", // pink
    "#442F19", // brown
    "#3C3F43", // gray
];

/// Theme ids (CSS classes on the root element) and their display names.
pub(crate) const THEMES: [(&str, &str); 10] = [
    ("theme-paper", "Paper"),
    ("theme-sakura", "Sakura"),
    ("theme-mint", "Mint"),
    ("theme-canary", "Canary"),
    ("theme-aqua", "Aqua"),
    ("theme-graphite", "Graphite"),
    ("theme-onyx", "Onyx"),
    ("theme-midnight", "Midnight"),
    ("theme-sunset", "Sunset"),
    ("theme-plum", "Plum"),
];

pub(crate) const DEFAULT_THEME: &str = "theme-graphite";

pub(crate) fn is_known_theme(id: &str) -> bool {
    THEMES.iter().any(|(theme, _)| *theme == id)
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Category {
    pub id: CategoryId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Folder {
    pub id: FolderId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub categories: Vec<Category>,
}

impl Folder {
    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn owns_category(&self, id: CategoryId) -> bool {
        self.category(id).is_some()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Tag {
    pub name: String,
    pub color: String,
}

#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub(crate) enum SortOption {
    #[default]
    DateDesc,
    DateAsc,
    TitleAsc,
    TitleDesc,
    Color,
}

impl SortOption {
    pub fn label(self) -> &'static str {
        match self {
            SortOption::DateDesc => "Newest first",
            SortOption::DateAsc => "Oldest first",
            SortOption::TitleAsc => "Title (A-Z)",
            SortOption::TitleDesc => "Title (Z-A)",
            SortOption::Color => "Colour",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_option_string_contract() {
        assert_eq!(SortOption::DateDesc.to_string(), "date-desc");
        assert_eq!("title-asc".parse::<SortOption>().ok(), Some(SortOption::TitleAsc));
        assert_eq!(
            serde_json::to_value(SortOption::Color).expect("should serialize"),
            "color"
        );
    }

    #[test]
    fn test_default_theme_is_known() {
        assert!(is_known_theme(DEFAULT_THEME));
        assert!(!is_known_theme("theme-neon"));
    }

    #[test]
    fn test_folder_without_color_deserializes() {
        let json = r#"{"id": 1, "name": "General", "categories": [{"id": 101, "name": "Notes"}]}"#;
        let folder: Folder = serde_json::from_str(json).expect("folder should parse");
        assert!(folder.owns_category(GroupId(101.0)));
        assert!(folder.color.is_none());
    }

    #[test]
    fn test_fractional_group_ids_survive_a_round_trip() {
        let json = r#"{"id": 1712345678901.5, "name": "Work", "categories": [{"id": 1712345678902.25, "name": "General"}]}"#;
        let folder: Folder = serde_json::from_str(json).expect("fractional ids should parse");
        assert_eq!(folder.id, GroupId(1712345678901.5));
        assert!(folder.owns_category(GroupId(1712345678902.25)));

        let value = serde_json::to_value(&folder).expect("should serialize");
        assert_eq!(value["id"].as_f64(), Some(1712345678901.5));
        // whole ids stay integers on disk
        assert_eq!(serde_json::to_string(&GroupId(101.0)).expect("should serialize"), "101");
    }

    #[test]
    fn test_group_id_path_text() {
        let id = GroupId(1712345678901.4321);
        assert_eq!(GroupId::parse(&id.to_string()), Some(id));
        assert_eq!(GroupId(7.0).to_string(), "7");
        assert_eq!(GroupId::parse("NaN"), None);
        assert_eq!(GroupId::parse("abc"), None);
        assert_eq!(GroupId(3.5).next(), GroupId(4.0));
    }
}
