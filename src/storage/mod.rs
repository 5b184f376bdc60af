use crate::models::{is_known_theme, Folder, Note, SortOption, Tag, DEFAULT_THEME};
use leptos::logging::{error, warn};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use wasm_bindgen::JsCast;

pub(crate) const NOTES_KEY: &str = "notes";
pub(crate) const FOLDERS_KEY: &str = "folders";
pub(crate) const TAGS_KEY: &str = "tags";

pub(crate) const THEME_KEY: &str = "copyNoteThemeId";
pub(crate) const SORT_KEY: &str = "copyNoteSortOption";
pub(crate) const GLOW_KEY: &str = "copyNoteGlowColor";
pub(crate) const CUSTOM_COLORS_KEY: &str = "copyNoteSavedColors";
pub(crate) const WELCOME_KEY: &str = "copyNoteWelcomeShown_v1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum StorageError {
    #[error("Browser storage is not available.")]
    Unavailable,
    #[error("Error: storage limit exceeded. Try deleting some notes with large images.")]
    QuotaExceeded,
    #[error("Could not encode data for storage: {0}")]
    Serialize(String),
    #[error("Storage error: {0}")]
    Backend(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Serialize(e.to_string())
    }
}

/// String key-value persistence (localStorage in the browser).
pub(crate) trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// `window.localStorage`, looked up on every call.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BrowserStorage;

impl BrowserStorage {
    fn open() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)
    }
}

fn map_js_error(err: wasm_bindgen::JsValue) -> StorageError {
    if let Some(dom) = err.dyn_ref::<web_sys::DomException>() {
        if dom.name() == "QuotaExceededError" || dom.message().to_lowercase().contains("quota") {
            return StorageError::QuotaExceeded;
        }
        return StorageError::Backend(dom.message());
    }
    StorageError::Backend(format!("{err:?}"))
}

impl KeyValueStore for BrowserStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::open()?.get_item(key).map_err(map_js_error)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::open()?.set_item(key, value).map_err(map_js_error)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        Self::open()?.remove_item(key).map_err(map_js_error)
    }
}

/// A loaded collection. `backup_key` is set when the stored value was
/// corrupt and the seed was used instead.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Loaded<T> {
    pub items: Vec<T>,
    pub backup_key: Option<String>,
}

pub(crate) fn backup_key(key: &str, now: i64) -> String {
    format!("{key}_corrupted_backup_{now}")
}

fn parse_array<T: DeserializeOwned>(raw: &str) -> Option<Vec<T>> {
    let value: Value = serde_json::from_str(raw).ok()?;
    if !value.is_array() {
        return None;
    }
    serde_json::from_value(value).ok()
}

/// Reads a JSON array. A missing key yields the seed; an unreadable value
/// is copied to a timestamped backup key first. `[]` is a valid value.
pub(crate) fn load_collection<T: DeserializeOwned>(
    store: &impl KeyValueStore,
    key: &str,
    now: i64,
    seed: impl FnOnce() -> Vec<T>,
) -> Loaded<T> {
    let raw = match store.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            return Loaded {
                items: seed(),
                backup_key: None,
            }
        }
        Err(e) => {
            warn!("[storage] reading {key} failed: {e}");
            return Loaded {
                items: seed(),
                backup_key: None,
            };
        }
    };

    if let Some(items) = parse_array(&raw) {
        return Loaded {
            items,
            backup_key: None,
        };
    }

    let backup = backup_key(key, now);
    warn!("[storage] {key} is corrupt, backing it up under {backup}");
    if let Err(e) = store.set_item(&backup, &raw) {
        error!("[storage] backup of {key} failed: {e}");
    }
    Loaded {
        items: seed(),
        backup_key: Some(backup),
    }
}

pub(crate) fn save_json<T: Serialize + ?Sized>(
    store: &impl KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let json = serde_json::to_string(value)?;
    store.set_item(key, &json)
}

/// Notes are written without their version history.
pub(crate) fn save_notes(store: &impl KeyValueStore, notes: &[Note]) -> Result<(), StorageError> {
    let stripped: Vec<Note> = notes
        .iter()
        .cloned()
        .map(|mut n| {
            n.history.clear();
            n
        })
        .collect();
    save_json(store, NOTES_KEY, &stripped)
}

pub(crate) fn save_folders(store: &impl KeyValueStore, folders: &[Folder]) -> Result<(), StorageError> {
    save_json(store, FOLDERS_KEY, folders)
}

pub(crate) fn save_tags(store: &impl KeyValueStore, tags: &[Tag]) -> Result<(), StorageError> {
    save_json(store, TAGS_KEY, tags)
}

/// Scalar user preferences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Preferences {
    pub theme_id: String,
    pub sort: SortOption,
    pub glow_color: Option<String>,
    pub custom_colors: Vec<String>,
    pub welcome_shown: bool,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme_id: DEFAULT_THEME.to_string(),
            sort: SortOption::default(),
            glow_color: None,
            custom_colors: Vec::new(),
            welcome_shown: false,
        }
    }
}

impl Preferences {
    /// Unknown or unreadable values fall back to defaults.
    pub fn load(store: &impl KeyValueStore) -> Self {
        let get = |key: &str| store.get_item(key).ok().flatten();
        let defaults = Self::default();

        Self {
            theme_id: get(THEME_KEY)
                .filter(|t| is_known_theme(t))
                .unwrap_or(defaults.theme_id),
            sort: get(SORT_KEY)
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.sort),
            glow_color: get(GLOW_KEY).filter(|c| !c.trim().is_empty()),
            custom_colors: get(CUSTOM_COLORS_KEY)
                .and_then(|raw| serde_json::from_str(&raw).ok())
                .unwrap_or_default(),
            welcome_shown: get(WELCOME_KEY).is_some_and(|v| v == "true"),
        }
    }
}

pub(crate) fn save_theme(store: &impl KeyValueStore, theme_id: &str) -> Result<(), StorageError> {
    store.set_item(THEME_KEY, theme_id)
}

pub(crate) fn save_sort(store: &impl KeyValueStore, sort: SortOption) -> Result<(), StorageError> {
    store.set_item(SORT_KEY, sort.as_ref())
}

/// `None` removes the stored glow colour.
pub(crate) fn save_glow(store: &impl KeyValueStore, color: Option<&str>) -> Result<(), StorageError> {
    match color {
        Some(c) => store.set_item(GLOW_KEY, c),
        None => store.remove_item(GLOW_KEY),
    }
}

pub(crate) fn save_custom_colors(
    store: &impl KeyValueStore,
    colors: &[String],
) -> Result<(), StorageError> {
    save_json(store, CUSTOM_COLORS_KEY, colors)
}

pub(crate) fn mark_welcome_shown(store: &impl KeyValueStore) -> Result<(), StorageError> {
    store.set_item(WELCOME_KEY, "true")
}

#[cfg(test)]
pub(crate) use memory::MemoryStorage;

#[cfg(test)]
mod memory {
    use super::{KeyValueStore, StorageError};
    use std::cell::RefCell;
    use std::collections::BTreeMap;
    use std::rc::Rc;

    /// In-memory store with an optional byte quota over all values.
    #[derive(Default)]
    pub(crate) struct MemoryStorage {
        pub items: RefCell<BTreeMap<String, String>>,
        pub quota: Option<usize>,
    }

    impl KeyValueStore for MemoryStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            Ok(self.items.borrow().get(key).cloned())
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            let mut items = self.items.borrow_mut();
            if let Some(quota) = self.quota {
                let used: usize = items
                    .iter()
                    .filter(|(k, _)| k.as_str() != key)
                    .map(|(_, v)| v.len())
                    .sum();
                if used + value.len() > quota {
                    return Err(StorageError::QuotaExceeded);
                }
            }
            items.insert(key.to_string(), value.to_string());
            Ok(())
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.items.borrow_mut().remove(key);
            Ok(())
        }
    }

    impl<T: KeyValueStore> KeyValueStore for Rc<T> {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            (**self).get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            (**self).set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            (**self).remove_item(key)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NoteVersion;
    use crate::workspace::{seed_folders, seed_notes, seed_tags};

    #[test]
    fn test_missing_key_uses_seed() {
        let store = MemoryStorage::default();
        let loaded = load_collection(&store, FOLDERS_KEY, 1, seed_folders);
        assert_eq!(loaded.items, seed_folders());
        assert!(loaded.backup_key.is_none());
    }

    #[test]
    fn test_empty_array_is_valid() {
        let store = MemoryStorage::default();
        store.set_item(NOTES_KEY, "[]").expect("memory write");
        let loaded = load_collection(&store, NOTES_KEY, 1, || seed_notes(1_000_000));
        assert!(loaded.items.is_empty());
    }

    #[test]
    fn test_corrupt_value_is_backed_up() {
        let store = MemoryStorage::default();
        store.set_item(TAGS_KEY, "{not json").expect("memory write");
        let loaded = load_collection(&store, TAGS_KEY, 42, seed_tags);

        assert_eq!(loaded.items, seed_tags());
        assert_eq!(loaded.backup_key.as_deref(), Some("tags_corrupted_backup_42"));
        assert_eq!(
            store.get_item("tags_corrupted_backup_42").expect("memory read").as_deref(),
            Some("{not json")
        );
    }

    #[test]
    fn test_non_array_is_corrupt() {
        let store = MemoryStorage::default();
        store.set_item(FOLDERS_KEY, r#"{"id": 1}"#).expect("memory write");
        let loaded = load_collection(&store, FOLDERS_KEY, 7, seed_folders);
        assert!(loaded.backup_key.is_some());
    }

    #[test]
    fn test_fractional_folder_ids_load_as_is() {
        let store = MemoryStorage::default();
        let raw = r#"[{"id":1712345678901.4321,"name":"Work","categories":[{"id":1712345678902.1233,"name":"General"}]}]"#;
        store.set_item(FOLDERS_KEY, raw).expect("memory write");

        let loaded: Loaded<Folder> = load_collection(&store, FOLDERS_KEY, 9, seed_folders);
        assert!(loaded.backup_key.is_none());
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].name, "Work");
        assert_eq!(store.get_item("folders_corrupted_backup_9").expect("memory read"), None);
    }

    #[test]
    fn test_notes_are_saved_without_history() {
        let store = MemoryStorage::default();
        let mut notes = seed_notes(1_000_000);
        let body = notes[1].body.clone();
        notes[1].history.push(NoteVersion {
            title: "old".to_string(),
            body,
            images: vec![],
            timestamp: 5,
        });
        save_notes(&store, &notes).expect("memory write");

        let raw = store.get_item(NOTES_KEY).expect("memory read").unwrap_or_default();
        assert!(!raw.contains("\"history\""));
        let loaded: Loaded<Note> = load_collection(&store, NOTES_KEY, 1, Vec::new);
        assert_eq!(loaded.items.len(), 3);
        assert!(loaded.items.iter().all(|n| n.history.is_empty()));
    }

    #[test]
    fn test_quota_error_surfaces() {
        let store = MemoryStorage {
            quota: Some(16),
            ..MemoryStorage::default()
        };
        let err = save_notes(&store, &seed_notes(1)).expect_err("should exceed quota");
        assert_eq!(err, StorageError::QuotaExceeded);
        assert!(err.to_string().contains("storage limit"));
    }

    #[test]
    fn test_preferences_defaults_and_round_trip() {
        let store = MemoryStorage::default();
        assert_eq!(Preferences::load(&store), Preferences::default());

        save_theme(&store, "theme-plum").expect("memory write");
        save_sort(&store, SortOption::TitleDesc).expect("memory write");
        save_glow(&store, Some("#ff0000")).expect("memory write");
        save_custom_colors(&store, &["#123456".to_string()]).expect("memory write");
        mark_welcome_shown(&store).expect("memory write");

        let prefs = Preferences::load(&store);
        assert_eq!(prefs.theme_id, "theme-plum");
        assert_eq!(prefs.sort, SortOption::TitleDesc);
        assert_eq!(prefs.glow_color.as_deref(), Some("#ff0000"));
        assert_eq!(prefs.custom_colors, vec!["#123456".to_string()]);
        assert!(prefs.welcome_shown);

        save_glow(&store, None).expect("memory write");
        assert!(Preferences::load(&store).glow_color.is_none());
    }

    #[test]
    fn test_unknown_preferences_fall_back() {
        let store = MemoryStorage::default();
        store.set_item(THEME_KEY, "theme-neon").expect("memory write");
        store.set_item(SORT_KEY, "random").expect("memory write");
        let prefs = Preferences::load(&store);
        assert_eq!(prefs.theme_id, DEFAULT_THEME);
        assert_eq!(prefs.sort, SortOption::DateDesc);
    }
}
