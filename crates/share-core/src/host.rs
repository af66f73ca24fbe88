//! Host editor seam: note storage and dialogs.
//!
//! Implementations:
//! - `InMemoryStore` / `ScriptedPrompter` - for testing
//! - `FileStore` / `TerminalPrompter` (in share-cli) - markdown files on disk
//!   and stdin prompts

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, RwLock};
use thiserror::Error;

use crate::note::{Note, NotePatch, Tag};

#[derive(Debug, Error)]
pub enum HostError {
    #[error("no note is selected")]
    NoSelection,

    #[error("note not found: {0}")]
    NoteNotFound(String),

    #[error("dialog failed: {0}")]
    Dialog(String),

    #[error("host error: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, HostError>;

/// One button offered by a blocking choice dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogButton {
    pub id: String,
    pub title: String,
}

/// Note storage surface of the host editor.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// The note the user currently has focused, if any.
    async fn selected_note(&self) -> Result<Option<Note>>;

    /// Tags attached to a note, in the host's order.
    async fn tags(&self, note_id: &str) -> Result<Vec<Tag>>;

    /// Apply a partial update; `None` fields are left untouched.
    async fn update_note(&self, note_id: &str, patch: NotePatch) -> Result<()>;
}

/// Dialog surface of the host editor. Stateless request/response: the host
/// owns dialog handles, we only see the selected button id.
#[async_trait]
pub trait Prompter: Send + Sync {
    /// Present a blocking choice and return the id of the selected button.
    async fn choose(&self, message: &str, buttons: &[DialogButton]) -> Result<String>;

    /// Blocking notification for user-facing failures.
    async fn notify(&self, message: &str) -> Result<()>;
}

/// In-memory note store for testing.
pub struct InMemoryStore {
    notes: RwLock<HashMap<String, Note>>,
    tags: RwLock<HashMap<String, Vec<Tag>>>,
    selected: RwLock<Option<String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            notes: RwLock::new(HashMap::new()),
            tags: RwLock::new(HashMap::new()),
            selected: RwLock::new(None),
        }
    }

    /// Insert a note with its tags and make it the selection.
    pub fn insert(&self, note: Note, tags: Vec<Tag>) {
        let id = note.id.clone();
        self.notes.write().unwrap().insert(id.clone(), note);
        self.tags.write().unwrap().insert(id.clone(), tags);
        *self.selected.write().unwrap() = Some(id);
    }

    pub fn clear_selection(&self) {
        *self.selected.write().unwrap() = None;
    }

    /// Current state of a note, for assertions.
    pub fn note(&self, note_id: &str) -> Option<Note> {
        self.notes.read().unwrap().get(note_id).cloned()
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NoteStore for InMemoryStore {
    async fn selected_note(&self) -> Result<Option<Note>> {
        let selected = self.selected.read().unwrap();
        let notes = self.notes.read().unwrap();
        Ok(selected.as_ref().and_then(|id| notes.get(id).cloned()))
    }

    async fn tags(&self, note_id: &str) -> Result<Vec<Tag>> {
        Ok(self
            .tags
            .read()
            .unwrap()
            .get(note_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_note(&self, note_id: &str, patch: NotePatch) -> Result<()> {
        let mut notes = self.notes.write().unwrap();
        let note = notes
            .get_mut(note_id)
            .ok_or_else(|| HostError::NoteNotFound(note_id.to_string()))?;
        if let Some(body) = patch.body {
            note.body = body;
        }
        if let Some(link) = patch.source_link {
            note.source_link = Some(link);
        }
        Ok(())
    }
}

/// Prompter that replays scripted answers and records what it was asked.
pub struct ScriptedPrompter {
    answers: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<String>>,
    notices: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: Mutex::new(answers.into_iter().map(Into::into).collect()),
            prompts: Mutex::new(Vec::new()),
            notices: Mutex::new(Vec::new()),
        }
    }

    /// Messages shown so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn choose(&self, message: &str, _buttons: &[DialogButton]) -> Result<String> {
        self.prompts.lock().unwrap().push(message.to_string());
        self.answers
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| HostError::Dialog("no scripted answer left".to_string()))
    }

    async fn notify(&self, message: &str) -> Result<()> {
        self.notices.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_note() -> Note {
        Note {
            id: "n1".to_string(),
            title: "Sample".to_string(),
            body: "body".to_string(),
            source_link: None,
        }
    }

    #[tokio::test]
    async fn selection_roundtrip() {
        let store = InMemoryStore::new();
        assert_eq!(store.selected_note().await.unwrap(), None);

        store.insert(sample_note(), vec![]);
        let selected = store.selected_note().await.unwrap().unwrap();
        assert_eq!(selected.id, "n1");

        store.clear_selection();
        assert_eq!(store.selected_note().await.unwrap(), None);
    }

    #[tokio::test]
    async fn patch_updates_only_given_fields() {
        let store = InMemoryStore::new();
        store.insert(sample_note(), vec![]);

        store
            .update_note(
                "n1",
                NotePatch {
                    body: None,
                    source_link: Some("https://hackmd.io/x?noteId=x&teamPath=user".to_string()),
                },
            )
            .await
            .unwrap();

        let note = store.note("n1").unwrap();
        assert_eq!(note.body, "body");
        assert!(note.source_link.is_some());
    }

    #[tokio::test]
    async fn patching_unknown_note_fails() {
        let store = InMemoryStore::new();
        let err = store
            .update_note("missing", NotePatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, HostError::NoteNotFound(_)));
    }

    #[tokio::test]
    async fn scripted_prompter_replays_in_order() {
        let prompter = ScriptedPrompter::new(["user", "create"]);
        assert_eq!(prompter.choose("first?", &[]).await.unwrap(), "user");
        assert_eq!(prompter.choose("second?", &[]).await.unwrap(), "create");
        assert!(prompter.choose("third?", &[]).await.is_err());
        assert_eq!(prompter.prompts(), vec!["first?", "second?", "third?"]);
    }
}
