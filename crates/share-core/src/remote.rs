//! Remote service seam.
//!
//! The collaborative-markdown service is an opaque collaborator behind the
//! `RemoteNotes` trait. The hackmd-api crate provides the HTTP
//! implementation; engine tests use recording fakes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("service rejected credentials: {0}")]
    Unauthorized(String),

    #[error("remote note not found: {0}")]
    NotFound(String),

    #[error("service error ({status}): {message}")]
    Service { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    InvalidResponse(String),
}

pub type Result<T> = std::result::Result<T, RemoteError>;

/// A shared workspace on the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// Display name shown in dialogs.
    pub name: String,
    /// Routing slug used in API paths.
    pub path: String,
}

/// Outbound document for create calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotePayload {
    pub title: String,
    pub content: String,
}

/// Result of a successful create call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedNote {
    pub id: String,
    #[serde(rename = "publishLink")]
    pub publish_link: String,
}

/// Client surface of the remote service. One instance is constructed per
/// action and passed by parameter; nothing here is cached across actions.
#[async_trait]
pub trait RemoteNotes: Send + Sync {
    /// Create a note in the personal space.
    async fn create_note(&self, payload: &NotePayload) -> Result<CreatedNote>;

    /// Create a note owned by a team.
    async fn create_team_note(&self, team_path: &str, payload: &NotePayload)
    -> Result<CreatedNote>;

    /// Replace the content of a personal note.
    async fn update_note_content(&self, note_id: &str, content: &str) -> Result<()>;

    /// Replace the content of a team note.
    async fn update_team_note_content(
        &self,
        team_path: &str,
        note_id: &str,
        content: &str,
    ) -> Result<()>;

    /// Delete a personal note.
    async fn delete_note(&self, note_id: &str) -> Result<()>;

    /// Delete a team note.
    async fn delete_team_note(&self, team_path: &str, note_id: &str) -> Result<()>;

    /// The teams the authenticated user belongs to.
    async fn teams(&self) -> Result<Vec<Team>>;
}
