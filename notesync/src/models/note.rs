//! Note document

use crate::config::{NOTES_DIR, NOTE_FILE_SUFFIX};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Classification tag of a note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteType {
    #[default]
    General,
    Task,
    Todo,
    Meeting,
    Journal,
    Code,
    Database,
}

impl NoteType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoteType::General => "general",
            NoteType::Task => "task",
            NoteType::Todo => "todo",
            NoteType::Meeting => "meeting",
            NoteType::Journal => "journal",
            NoteType::Code => "code",
            NoteType::Database => "database",
        }
    }
}

impl fmt::Display for NoteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for NoteType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "general" => Ok(NoteType::General),
            "task" => Ok(NoteType::Task),
            "todo" => Ok(NoteType::Todo),
            "meeting" => Ok(NoteType::Meeting),
            "journal" => Ok(NoteType::Journal),
            "code" => Ok(NoteType::Code),
            "database" => Ok(NoteType::Database),
            other => Err(format!(
                "Invalid note type '{}'. Use general, task, todo, meeting, journal, code or database",
                other
            )),
        }
    }
}

/// Identity and classification of a note
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteMetadata {
    pub id: String,
    #[serde(default)]
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(rename = "type", default)]
    pub note_type: NoteType,
    /// Order carries no meaning
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Parent in the note hierarchy; roots have none. Cycles are not detected.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Database-style typed values keyed by property name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Value>>,
    /// View/sort/filter preferences, never interpreted here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_config: Option<Value>,
    /// Custom remote file stem overriding the id-based path
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// The unit of persistence: metadata plus an opaque body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub metadata: NoteMetadata,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Remote path the document was found at when that differs from
    /// [`Note::canonical_path`]. Kept in the local cache only; the remote
    /// document never carries it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored_path: Option<String>,
}

impl Note {
    /// Create an empty note with a fresh id
    pub fn new(title: impl Into<String>, note_type: NoteType) -> Self {
        let now = Utc::now();
        Self {
            metadata: NoteMetadata {
                id: Uuid::new_v4().to_string(),
                title: title.into(),
                created_at: now,
                updated_at: now,
                note_type,
                tags: BTreeSet::new(),
                parent_id: None,
                properties: None,
                database_config: None,
                file_name: None,
            },
            content: String::new(),
            data: None,
            stored_path: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.metadata.id
    }

    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    pub fn is_root(&self) -> bool {
        self.metadata.parent_id.is_none()
    }

    /// Mark the note as modified now
    pub fn touch(&mut self) {
        self.metadata.updated_at = Utc::now();
    }

    /// Path this note's document should live at.
    ///
    /// `notes/<fileName>.json` when a usable custom filename is set,
    /// otherwise `notes/<id>.json`.
    pub fn canonical_path(&self) -> String {
        let stem = self
            .metadata
            .file_name
            .as_deref()
            .and_then(sanitize_file_stem)
            .unwrap_or_else(|| self.metadata.id.clone());
        format!("{}/{}{}", NOTES_DIR, stem, NOTE_FILE_SUFFIX)
    }

    /// Path the remote document currently lives at
    pub fn remote_path(&self) -> String {
        match &self.stored_path {
            Some(path) => path.clone(),
            None => self.canonical_path(),
        }
    }

    /// Record where the remote document lives
    pub fn located_at(&mut self, path: impl Into<String>) {
        let path = path.into();
        self.stored_path = if path == self.canonical_path() {
            None
        } else {
            Some(path)
        };
    }

    /// A previous location that a write to [`Note::canonical_path`] leaves behind
    pub fn stale_path(&self) -> Option<&str> {
        let canonical = self.canonical_path();
        self.stored_path
            .as_deref()
            .filter(|path| *path != canonical)
    }
}

/// Turn a user-supplied filename into a URL-safe file stem.
///
/// Percent escapes are decoded first, a trailing `.json` is dropped, and
/// anything outside `[A-Za-z0-9._-]` becomes `-`. Returns `None` when nothing
/// usable is left.
pub fn sanitize_file_stem(raw: &str) -> Option<String> {
    let decoded = urlencoding::decode_binary(raw.trim().as_bytes());
    let decoded = String::from_utf8_lossy(&decoded);
    let base = decoded
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .to_string();
    let base = match base.strip_suffix(NOTE_FILE_SUFFIX) {
        Some(stripped) => stripped.to_string(),
        None => base,
    };

    let mut stem = String::with_capacity(base.len());
    for c in base.chars() {
        if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
            stem.push(c);
        } else if !stem.ends_with('-') {
            stem.push('-');
        }
    }

    let stem = stem.trim_matches(|c| c == '-' || c == '.').to_string();
    if stem.is_empty() {
        None
    } else {
        Some(stem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_note_has_fresh_id_and_equal_timestamps() {
        let a = Note::new("A", NoteType::General);
        let b = Note::new("B", NoteType::Task);

        assert_ne!(a.id(), b.id());
        assert_eq!(a.metadata.created_at, a.metadata.updated_at);
        assert!(a.is_root());
    }

    #[test]
    fn test_default_remote_path_uses_id() {
        let note = Note::new("Hello", NoteType::General);
        assert_eq!(note.remote_path(), format!("notes/{}.json", note.id()));
    }

    #[test]
    fn test_custom_filename_overrides_path() {
        let mut note = Note::new("Hello", NoteType::General);
        note.metadata.file_name = Some("Weekly%20Review.json".to_string());
        assert_eq!(note.remote_path(), "notes/Weekly-Review.json");
    }

    #[test]
    fn test_unusable_custom_filename_falls_back_to_id() {
        let mut note = Note::new("Hello", NoteType::General);
        note.metadata.file_name = Some("%%%".to_string());
        assert_eq!(note.remote_path(), format!("notes/{}.json", note.id()));
    }

    #[test]
    fn test_located_at_remembers_only_non_canonical_paths() {
        let mut note = Note::new("Hello", NoteType::General);

        note.located_at(note.canonical_path());
        assert!(note.stored_path.is_none());
        assert!(note.stale_path().is_none());

        note.located_at("notes/meeting.json");
        assert_eq!(note.remote_path(), "notes/meeting.json");
        assert_eq!(note.stale_path(), Some("notes/meeting.json"));
        assert_eq!(note.canonical_path(), format!("notes/{}.json", note.id()));
    }

    #[test]
    fn test_renamed_note_reports_old_path_as_stale() {
        let mut note = Note::new("Hello", NoteType::General);
        let old_path = note.remote_path();

        note.metadata.file_name = Some("renamed".to_string());
        note.located_at(old_path.clone());

        assert_eq!(note.remote_path(), old_path);
        assert_eq!(note.canonical_path(), "notes/renamed.json");
        assert_eq!(note.stale_path(), Some(old_path.as_str()));
    }

    #[test]
    fn test_stored_path_survives_cache_serialization() {
        let mut note = Note::new("Hello", NoteType::General);
        note.located_at("notes/legacy.json");

        let json = serde_json::to_string(&note).unwrap();
        let parsed: Note = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.stored_path.as_deref(), Some("notes/legacy.json"));
    }

    #[test]
    fn test_sanitize_file_stem() {
        assert_eq!(sanitize_file_stem("plan"), Some("plan".to_string()));
        assert_eq!(
            sanitize_file_stem("my notes/2024 plan.json"),
            Some("2024-plan".to_string())
        );
        assert_eq!(
            sanitize_file_stem("caf%C3%A9 list"),
            Some("caf-list".to_string())
        );
        assert_eq!(sanitize_file_stem("   "), None);
        assert_eq!(sanitize_file_stem("..."), None);
    }

    #[test]
    fn test_sanitize_file_stem_keeps_malformed_escapes() {
        assert_eq!(sanitize_file_stem("100%"), Some("100".to_string()));
        assert_eq!(sanitize_file_stem("a%zzb"), Some("a-zzb".to_string()));
        assert_eq!(sanitize_file_stem("Q3%20plan"), Some("Q3-plan".to_string()));
    }

    #[test]
    fn test_wire_format_uses_camel_case_keys() {
        let mut note = Note::new("Standup", NoteType::Meeting);
        note.metadata.parent_id = Some("root".to_string());

        let value = serde_json::to_value(&note).unwrap();
        let metadata = &value["metadata"];

        assert_eq!(metadata["type"], json!("meeting"));
        assert_eq!(metadata["parentId"], json!("root"));
        assert!(metadata.get("createdAt").is_some());
        assert!(metadata.get("updatedAt").is_some());
        assert!(metadata.get("databaseConfig").is_none());
    }

    #[test]
    fn test_document_from_other_client_parses() {
        let doc = json!({
            "metadata": {
                "id": "note-1",
                "title": "Groceries",
                "createdAt": "2024-03-01T09:30:00.000Z",
                "updatedAt": "2024-03-02T10:00:00.000Z",
                "type": "todo",
                "tags": ["home", "errands"]
            },
            "content": "- milk"
        });

        let note: Note = serde_json::from_value(doc).unwrap();

        assert_eq!(note.id(), "note-1");
        assert_eq!(note.metadata.note_type, NoteType::Todo);
        assert!(note.metadata.tags.contains("errands"));
        assert!(note.data.is_none());
    }

    #[test]
    fn test_note_type_from_str() {
        assert_eq!("Journal".parse::<NoteType>().unwrap(), NoteType::Journal);
        assert!("diary".parse::<NoteType>().is_err());
    }
}
