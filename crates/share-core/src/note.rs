//! Host-side note data model.
//!
//! The host editor owns these records; this crate only reads fields and
//! requests partial updates through [`crate::host::NoteStore`].

use serde::{Deserialize, Serialize};

/// A note as the host editor hands it to us.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub body: String,
    /// Free-text link field the editor persists alongside the body. Carries
    /// the canonical remote annotation once the note has been shared; older
    /// notes may hold a bare publish URL here (the id then lives in a body
    /// footer).
    #[serde(default)]
    pub source_link: Option<String>,
}

impl Note {
    /// The link field, trimmed, or `None` when empty/whitespace.
    pub fn link(&self) -> Option<&str> {
        self.source_link
            .as_deref()
            .map(str::trim)
            .filter(|link| !link.is_empty())
    }
}

/// A tag attached to a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub title: String,
}

/// Partial update pushed back to the host. `None` fields are left untouched;
/// `Some(String::new())` blanks a field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub body: Option<String>,
    pub source_link: Option<String>,
}
