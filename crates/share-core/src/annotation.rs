//! Remote-link annotation codec.
//!
//! A note that has been shared carries an annotation recording its remote
//! note id and owning space. Three encodings exist across the feature's
//! history:
//! - a bare id after the marker label in a two-line body footer (oldest)
//! - the publish URL after the marker label in the same footer
//! - the publish URL with `noteId`/`teamPath`/`teamName` query parameters on
//!   the dedicated link field (canonical)
//!
//! All three decode; only the canonical form is ever written for new shares.
//! Malformed values decode as absent so the note falls back into the create
//! path instead of crashing an action.

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::Url;

use crate::note::Note;
use crate::target::SyncTarget;

/// Label introducing the remote note id in legacy body footers.
pub const MARKER_LABEL: &str = "HackMD Note ID";

/// Team path reserved for the user's personal space.
pub const PERSONAL_PATH: &str = "user";

/// Separator line of the legacy two-line footer.
const MARKER_SEPARATOR: &str = "-----";

/// Canonical annotation value: which remote note a local note maps to, and
/// which space owns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteAnnotation {
    Personal {
        note_id: String,
    },
    Team {
        note_id: String,
        team_path: String,
        team_name: String,
    },
}

impl RemoteAnnotation {
    /// Annotation for a note just created at `target`.
    pub fn for_target(note_id: impl Into<String>, target: &SyncTarget) -> Self {
        let note_id = note_id.into();
        if target.is_personal() {
            RemoteAnnotation::Personal { note_id }
        } else {
            RemoteAnnotation::Team {
                note_id,
                team_path: target.path.clone(),
                team_name: target.title.clone(),
            }
        }
    }

    pub fn note_id(&self) -> &str {
        match self {
            RemoteAnnotation::Personal { note_id } => note_id,
            RemoteAnnotation::Team { note_id, .. } => note_id,
        }
    }

    /// Routing path of the owning space; `"user"` for personal notes.
    pub fn team_path(&self) -> &str {
        match self {
            RemoteAnnotation::Personal { .. } => PERSONAL_PATH,
            RemoteAnnotation::Team { team_path, .. } => team_path,
        }
    }

    /// Display name of the owning space, for ownership-mismatch messages.
    pub fn owner_display(&self) -> &str {
        match self {
            RemoteAnnotation::Personal { .. } => PERSONAL_PATH,
            RemoteAnnotation::Team { team_name, .. } => team_name,
        }
    }

    pub fn is_personal(&self) -> bool {
        matches!(self, RemoteAnnotation::Personal { .. })
    }
}

/// Which persisted encoding an annotation was read from. The engine needs
/// this to know how to clear the annotation on delete and whether the body
/// still carries a legacy footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationFormat {
    /// Query parameters on the dedicated link field (canonical).
    LinkField,
    /// Two-line footer at the end of the body (legacy).
    BodyMarker,
}

/// A decoded annotation together with the encoding it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub annotation: RemoteAnnotation,
    pub format: AnnotationFormat,
}

/// True if the note shows any sign of having been shared: the marker label
/// in the body or a non-empty link field. Cheap presence check; use
/// [`decode`] for the actual value.
pub fn has_annotation(note: &Note) -> bool {
    note.body.contains(MARKER_LABEL) || note.link().is_some()
}

/// Extract the remote annotation from a note, trying the canonical link
/// field first and the legacy body footer second. Returns `None` for notes
/// that were never shared and for unparsable values (fail open).
pub fn decode(note: &Note) -> Option<Decoded> {
    if let Some(link) = note.link() {
        if let Some(annotation) = decode_link(link) {
            return Some(Decoded {
                annotation,
                format: AnnotationFormat::LinkField,
            });
        }
    }

    if let Some(annotation) = decode_marker(&note.body) {
        return Some(Decoded {
            annotation,
            format: AnnotationFormat::BodyMarker,
        });
    }

    if has_annotation(note) {
        warn!(
            note = %note.id,
            "remote annotation present but unparsable; treating note as unshared"
        );
    }
    None
}

/// Canonical encoding: the publish URL with the annotation carried as query
/// parameters. Any query already on the link is replaced.
pub fn encode_link(annotation: &RemoteAnnotation, publish_link: &str) -> String {
    match Url::parse(publish_link) {
        Ok(mut url) => {
            url.set_query(None);
            {
                let mut pairs = url.query_pairs_mut();
                pairs.append_pair("noteId", annotation.note_id());
                pairs.append_pair("teamPath", annotation.team_path());
                if let RemoteAnnotation::Team { team_name, .. } = annotation {
                    pairs.append_pair("teamName", team_name);
                }
            }
            url.to_string()
        }
        // The service should always hand back a URL; if it didn't, fall back
        // to the canonical pad location so the id is still recoverable.
        Err(_) => {
            let mut query = url::form_urlencoded::Serializer::new(String::new());
            query.append_pair("noteId", annotation.note_id());
            query.append_pair("teamPath", annotation.team_path());
            if let RemoteAnnotation::Team { team_name, .. } = annotation {
                query.append_pair("teamName", team_name);
            }
            format!("https://hackmd.io/{}?{}", annotation.note_id(), query.finish())
        }
    }
}

/// Append the legacy two-line footer to a body. Kept for compatibility and
/// round-trip tests; new shares persist through [`encode_link`] instead.
pub fn encode_marker(body: &str, value: &str) -> String {
    format!("{body}\n{MARKER_SEPARATOR}\n{MARKER_LABEL}: {value}")
}

/// Remove exactly the last two lines of a body (the separator line and the
/// marker line). Operates purely on line count; the caller must guarantee
/// the footer is actually there.
pub fn strip_marker(body: &str) -> String {
    let mut lines: Vec<&str> = body.split('\n').collect();
    if lines.len() >= 2 {
        lines.pop();
        lines.pop();
    }
    lines.join("\n")
}

fn decode_link(link: &str) -> Option<RemoteAnnotation> {
    let url = Url::parse(link).ok()?;

    let mut note_id = None;
    let mut team_path = None;
    let mut team_name = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "noteId" => note_id = Some(value.into_owned()),
            "teamPath" => team_path = Some(value.into_owned()),
            "teamName" => team_name = Some(value.into_owned()),
            _ => {}
        }
    }

    let note_id = note_id.filter(|id| !id.is_empty())?;
    match team_path {
        Some(path) if path != PERSONAL_PATH => {
            // A team annotation without a display name is malformed.
            let team_name = team_name.filter(|name| !name.is_empty())?;
            Some(RemoteAnnotation::Team {
                note_id,
                team_path: path,
                team_name,
            })
        }
        _ => Some(RemoteAnnotation::Personal { note_id }),
    }
}

fn decode_marker(body: &str) -> Option<RemoteAnnotation> {
    for line in body.lines() {
        let Some(pos) = line.find(MARKER_LABEL) else {
            continue;
        };
        let rest = &line[pos + MARKER_LABEL.len()..];
        let Some(value) = rest.strip_prefix(':') else {
            continue;
        };
        let note_id = marker_note_id(value.trim())?;
        // Legacy footers never carried team metadata.
        return Some(RemoteAnnotation::Personal { note_id });
    }
    None
}

/// A marker value is either the bare note id or, in the later footer
/// revision, the full publish URL; URLs reduce to their last path segment.
fn marker_note_id(value: &str) -> Option<String> {
    if value.is_empty() {
        return None;
    }
    if value.starts_with("http://") || value.starts_with("https://") {
        let url = Url::parse(value).ok()?;
        let segment = url
            .path_segments()?
            .filter(|segment| !segment.is_empty())
            .next_back()?;
        return Some(segment.to_string());
    }
    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(body: &str, source_link: Option<&str>) -> Note {
        Note {
            id: "local-1".to_string(),
            title: "Title".to_string(),
            body: body.to_string(),
            source_link: source_link.map(String::from),
        }
    }

    fn team_annotation() -> RemoteAnnotation {
        RemoteAnnotation::Team {
            note_id: "n1".to_string(),
            team_path: "teamA".to_string(),
            team_name: "Team A".to_string(),
        }
    }

    #[test]
    fn unshared_note_has_no_annotation() {
        let note = note("# Plain note\n\nNothing here.", None);
        assert!(!has_annotation(&note));
        assert_eq!(decode(&note), None);
    }

    #[test]
    fn decodes_bare_id_marker() {
        let body = "Hello\n-----\nHackMD Note ID: adtcqgVWzsghjdfkRw";
        let note = note(body, None);
        assert!(has_annotation(&note));

        let decoded = decode(&note).unwrap();
        assert_eq!(decoded.format, AnnotationFormat::BodyMarker);
        assert_eq!(
            decoded.annotation,
            RemoteAnnotation::Personal {
                note_id: "adtcqgVWzsghjdfkRw".to_string()
            }
        );
    }

    #[test]
    fn decodes_url_marker_to_last_path_segment() {
        let body = "Hello\n-----\nHackMD Note ID: https://hackmd.io/abc123";
        let decoded = decode(&note(body, None)).unwrap();
        assert_eq!(decoded.format, AnnotationFormat::BodyMarker);
        assert_eq!(decoded.annotation.note_id(), "abc123");
        assert!(decoded.annotation.is_personal());
    }

    #[test]
    fn marker_wins_over_plain_publish_link_in_field() {
        // Early revisions stored the publish URL in the link field while the
        // id lived in the footer. The footer holds the authoritative id.
        let body = "Hello\n-----\nHackMD Note ID: xyz789";
        let note = note(body, Some("https://hackmd.io/xyz789"));
        let decoded = decode(&note).unwrap();
        assert_eq!(decoded.format, AnnotationFormat::BodyMarker);
        assert_eq!(decoded.annotation.note_id(), "xyz789");
    }

    #[test]
    fn decodes_personal_link_field() {
        let link = "https://hackmd.io/abc?noteId=abc&teamPath=user";
        let decoded = decode(&note("body", Some(link))).unwrap();
        assert_eq!(decoded.format, AnnotationFormat::LinkField);
        assert_eq!(
            decoded.annotation,
            RemoteAnnotation::Personal {
                note_id: "abc".to_string()
            }
        );
    }

    #[test]
    fn decodes_team_link_field() {
        let link = "https://hackmd.io/@teamA/n1?noteId=n1&teamPath=teamA&teamName=Team%20A";
        let decoded = decode(&note("body", Some(link))).unwrap();
        assert_eq!(decoded.format, AnnotationFormat::LinkField);
        assert_eq!(decoded.annotation, team_annotation());
    }

    #[test]
    fn team_link_without_name_is_malformed() {
        let link = "https://hackmd.io/n1?noteId=n1&teamPath=teamA";
        assert_eq!(decode(&note("body", Some(link))), None);
    }

    #[test]
    fn malformed_link_decodes_as_absent() {
        let note = note("body", Some("not a url at all"));
        assert!(has_annotation(&note));
        assert_eq!(decode(&note), None);
    }

    #[test]
    fn empty_marker_value_decodes_as_absent() {
        assert_eq!(decode(&note("Hello\n-----\nHackMD Note ID:", None)), None);
    }

    #[test]
    fn link_roundtrip_personal() {
        let annotation = RemoteAnnotation::Personal {
            note_id: "abc123".to_string(),
        };
        let link = encode_link(&annotation, "https://hackmd.io/abc123");
        let decoded = decode(&note("body", Some(&link))).unwrap();
        assert_eq!(decoded.annotation, annotation);
        assert_eq!(decoded.format, AnnotationFormat::LinkField);
    }

    #[test]
    fn link_roundtrip_team() {
        let annotation = team_annotation();
        let link = encode_link(&annotation, "https://hackmd.io/@teamA/n1");
        assert_eq!(
            decode(&note("body", Some(&link))).unwrap().annotation,
            annotation
        );
    }

    #[test]
    fn encode_link_replaces_existing_query() {
        let annotation = RemoteAnnotation::Personal {
            note_id: "new".to_string(),
        };
        let link = encode_link(&annotation, "https://hackmd.io/old?noteId=old&teamPath=user");
        let decoded = decode_link(&link).unwrap();
        assert_eq!(decoded.note_id(), "new");
    }

    #[test]
    fn encode_link_survives_unparsable_publish_link() {
        let annotation = team_annotation();
        let link = encode_link(&annotation, "not a url");
        assert_eq!(decode_link(&link), Some(team_annotation()));
    }

    #[test]
    fn marker_roundtrip() {
        let body = "# Title\n\nSome text";
        let encoded = encode_marker(body, "abc123");
        let decoded = decode(&note(&encoded, None)).unwrap();
        assert_eq!(decoded.annotation.note_id(), "abc123");
        assert_eq!(decoded.format, AnnotationFormat::BodyMarker);
    }

    #[test]
    fn strip_marker_restores_body_byte_for_byte() {
        let body = "# Title\n\nSome text\nwith lines";
        assert_eq!(strip_marker(&encode_marker(body, "abc123")), body);
    }

    #[test]
    fn strip_marker_is_pure_line_count() {
        assert_eq!(strip_marker("a\nb\nc"), "a");
        assert_eq!(strip_marker("a"), "a");
    }
}
