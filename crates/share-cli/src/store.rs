//! File-backed note store.
//!
//! One markdown file is one note. Frontmatter keys:
//! - `title`: note title (falls back to the file stem)
//! - `tags`: list of tag names
//! - `hackmd`: the dedicated link field carrying the remote annotation
//!
//! Frontmatter must be delimited by `---` at the start of the file; a file
//! without frontmatter is a plain untagged, unshared note.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use share_core::host::{HostError, NoteStore, Result};
use share_core::note::{Note, NotePatch, Tag};

/// Frontmatter schema of a local note file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct FrontMatter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hackmd: Option<String>,
}

impl FrontMatter {
    fn is_empty(&self) -> bool {
        self.title.is_none() && self.tags.is_empty() && self.hackmd.is_none()
    }
}

/// `NoteStore` over a single markdown file on disk.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn note_id(&self) -> String {
        self.path.display().to_string()
    }

    fn fallback_title(&self) -> String {
        self.path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("note")
            .to_string()
    }

    async fn load(&self) -> Result<(FrontMatter, String)> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| HostError::Other(format!("read {}: {err}", self.path.display())))?;
        Ok(parse(&content))
    }

    async fn save(&self, front: &FrontMatter, body: &str) -> Result<()> {
        let content = serialize(front, body)?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|err| HostError::Other(format!("write {}: {err}", self.path.display())))
    }
}

#[async_trait]
impl NoteStore for FileStore {
    async fn selected_note(&self) -> Result<Option<Note>> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|err| HostError::Other(format!("stat {}: {err}", self.path.display())))?;
        if !exists {
            return Ok(None);
        }

        let (front, body) = self.load().await?;
        Ok(Some(Note {
            id: self.note_id(),
            title: front.title.unwrap_or_else(|| self.fallback_title()),
            body,
            source_link: front.hackmd,
        }))
    }

    async fn tags(&self, _note_id: &str) -> Result<Vec<Tag>> {
        let (front, _) = self.load().await?;
        Ok(front.tags.into_iter().map(|title| Tag { title }).collect())
    }

    async fn update_note(&self, _note_id: &str, patch: NotePatch) -> Result<()> {
        let (mut front, mut body) = self.load().await?;
        if let Some(new_body) = patch.body {
            body = new_body;
        }
        if let Some(link) = patch.source_link {
            // A blanked link field clears the frontmatter key entirely.
            front.hackmd = if link.is_empty() { None } else { Some(link) };
        }
        self.save(&front, &body).await
    }
}

/// Split a file into frontmatter and body. Invalid or missing frontmatter
/// degrades to an empty one; the whole file becomes the body.
fn parse(content: &str) -> (FrontMatter, String) {
    if !content.starts_with("---") {
        return (FrontMatter::default(), content.to_string());
    }

    let rest = &content[3..];
    match rest.find("\n---") {
        Some(pos) => {
            let yaml = &rest[..pos];
            let body = rest[pos + 4..].trim_start_matches('\n').to_string();
            let front = serde_yaml::from_str(yaml).unwrap_or_default();
            (front, body)
        }
        None => (FrontMatter::default(), content.to_string()),
    }
}

fn serialize(front: &FrontMatter, body: &str) -> Result<String> {
    if front.is_empty() {
        return Ok(body.to_string());
    }
    let yaml = serde_yaml::to_string(front)
        .map_err(|err| HostError::Other(format!("serialize frontmatter: {err}")))?;
    Ok(format!("---\n{yaml}---\n\n{body}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn store_with(content: &str) -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("design.md");
        tokio::fs::write(&path, content).await.unwrap();
        (dir, FileStore::new(path))
    }

    #[test]
    fn parse_without_frontmatter() {
        let (front, body) = parse("# Just a note\n\nHello");
        assert_eq!(front, FrontMatter::default());
        assert_eq!(body, "# Just a note\n\nHello");
    }

    #[test]
    fn parse_and_serialize_roundtrip() {
        let front = FrontMatter {
            title: Some("Design".to_string()),
            tags: vec!["draft".to_string(), "rust".to_string()],
            hackmd: Some("https://hackmd.io/x?noteId=x&teamPath=user".to_string()),
        };
        let serialized = serialize(&front, "Hello").unwrap();
        let (parsed, body) = parse(&serialized);
        assert_eq!(parsed, front);
        assert_eq!(body, "Hello");
    }

    #[test]
    fn invalid_frontmatter_degrades_to_plain_body() {
        let (front, _body) = parse("---\n:::not yaml:::\n---\n\nHello");
        assert_eq!(front, FrontMatter::default());
    }

    #[tokio::test]
    async fn missing_file_means_no_selection() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("nope.md"));
        assert!(store.selected_note().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn title_falls_back_to_file_stem() {
        let (_dir, store) = store_with("Hello").await;
        let note = store.selected_note().await.unwrap().unwrap();
        assert_eq!(note.title, "design");
        assert_eq!(note.body, "Hello");
        assert_eq!(note.source_link, None);
    }

    #[tokio::test]
    async fn frontmatter_feeds_note_and_tags() {
        let content = "---\ntitle: Design\ntags:\n- draft\n---\n\nHello";
        let (_dir, store) = store_with(content).await;

        let note = store.selected_note().await.unwrap().unwrap();
        assert_eq!(note.title, "Design");
        assert_eq!(note.body, "Hello");

        let tags = store.tags(&note.id).await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].title, "draft");
    }

    #[tokio::test]
    async fn link_patch_persists_and_blanking_clears() {
        let (_dir, store) = store_with("---\ntitle: Design\n---\n\nHello").await;
        let note = store.selected_note().await.unwrap().unwrap();

        store
            .update_note(
                &note.id,
                NotePatch {
                    body: None,
                    source_link: Some("https://hackmd.io/x?noteId=x&teamPath=user".to_string()),
                },
            )
            .await
            .unwrap();
        let note = store.selected_note().await.unwrap().unwrap();
        assert_eq!(
            note.source_link.as_deref(),
            Some("https://hackmd.io/x?noteId=x&teamPath=user")
        );
        assert_eq!(note.body, "Hello");

        store
            .update_note(
                &note.id,
                NotePatch {
                    body: None,
                    source_link: Some(String::new()),
                },
            )
            .await
            .unwrap();
        let note = store.selected_note().await.unwrap().unwrap();
        assert_eq!(note.source_link, None);
    }
}
