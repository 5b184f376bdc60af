//! JSON backup export and import.

use super::Workspace;
use crate::models::{Folder, Note, Tag};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub(crate) const EXPORT_VERSION: &str = "CopyNote_v1.0";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum ImportError {
    #[error("Import failed: the file is not valid JSON.")]
    Parse,
    #[error("Import failed: the file has no \"{0}\" list.")]
    MissingArray(&'static str),
    #[error("Import failed: {0}")]
    Shape(String),
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExportBundle {
    pub notes: Vec<Note>,
    pub folders: Vec<Folder>,
    pub tags: Vec<Tag>,
    pub exported_at: String,
    pub version: String,
}

impl ExportBundle {
    pub fn new(ws: &Workspace, exported_at: String) -> Self {
        Self {
            notes: ws.notes.clone(),
            folders: ws.folders.clone(),
            tags: ws.tags.clone(),
            exported_at,
            version: EXPORT_VERSION.to_string(),
        }
    }
}

pub(crate) fn export_file_name(date: &str) -> String {
    format!("CopyNote_backup_{date}.json")
}

/// Validates a backup file. Nothing is replaced until the caller applies the
/// returned workspace.
pub(crate) fn parse_import(text: &str) -> Result<Workspace, ImportError> {
    let value: Value = serde_json::from_str(text).map_err(|_| ImportError::Parse)?;

    for key in ["notes", "folders", "tags"] {
        if !value.get(key).is_some_and(Value::is_array) {
            return Err(ImportError::MissingArray(key));
        }
    }

    let field = |key: &str| value.get(key).cloned().unwrap_or(Value::Null);
    let notes: Vec<Note> =
        serde_json::from_value(field("notes")).map_err(|e| ImportError::Shape(e.to_string()))?;
    let folders: Vec<Folder> =
        serde_json::from_value(field("folders")).map_err(|e| ImportError::Shape(e.to_string()))?;
    let tags: Vec<Tag> =
        serde_json::from_value(field("tags")).map_err(|e| ImportError::Shape(e.to_string()))?;

    if folders.is_empty() || folders.iter().any(|f| f.categories.is_empty()) {
        return Err(ImportError::Shape(
            "every backup needs at least one folder with a category.".to_string(),
        ));
    }

    Ok(Workspace {
        notes,
        folders,
        tags,
    })
}

impl Workspace {
    /// Replaces everything with an imported workspace.
    pub fn replace_all(&mut self, imported: Workspace) {
        *self = imported;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_round_trips_through_import() {
        let ws = Workspace::seed(1_000_000);
        let bundle = ExportBundle::new(&ws, "2026-01-02T03:04:05.000Z".to_string());
        let json = serde_json::to_string(&bundle).expect("should serialize");
        assert!(json.contains("\"exportedAt\""));
        assert!(json.contains(EXPORT_VERSION));

        let imported = parse_import(&json).expect("export should import");
        assert_eq!(imported, ws);
    }

    #[test]
    fn test_backup_with_fractional_group_ids_imports() {
        let json = r#"{
            "notes": [{"id": 3, "createdAt": 3, "title": "Plan", "content": "",
                       "folderId": 1712345678901.5, "categoryId": 1712345678902.5}],
            "folders": [{"id": 1712345678901.5, "name": "Work",
                         "categories": [{"id": 1712345678902.5, "name": "General"}]}],
            "tags": []
        }"#;
        let imported = parse_import(json).expect("fractional ids should import");
        let note = &imported.notes[0];
        assert!(imported.resolves(note.folder_id, note.category_id));
    }

    #[test]
    fn test_missing_folders_is_rejected() {
        let json = r#"{"notes": [], "tags": []}"#;
        assert_eq!(parse_import(json), Err(ImportError::MissingArray("folders")));

        let json = r#"{"notes": [], "folders": {}, "tags": []}"#;
        assert_eq!(parse_import(json), Err(ImportError::MissingArray("folders")));
    }

    #[test]
    fn test_rejected_import_leaves_workspace_alone() {
        let mut ws = Workspace::seed(1);
        let before = ws.clone();
        if let Ok(imported) = parse_import(r#"{"notes": []}"#) {
            ws.replace_all(imported);
        }
        assert_eq!(ws, before);
    }

    #[test]
    fn test_invalid_json_and_shapes() {
        assert_eq!(parse_import("not json"), Err(ImportError::Parse));
        let bad_note = r#"{"notes": [{"title": "no id"}], "folders": [], "tags": []}"#;
        assert!(matches!(parse_import(bad_note), Err(ImportError::Shape(_))));
        let no_folders = r#"{"notes": [], "folders": [], "tags": []}"#;
        assert!(matches!(parse_import(no_folders), Err(ImportError::Shape(_))));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(export_file_name("2026-10-16"), "CopyNote_backup_2026-10-16.json");
    }
}
