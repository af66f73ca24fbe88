//! Sync decision engine.
//!
//! One user trigger runs one action: fetch the note, fetch the team list,
//! ask for a destination, ask for an action, decide which remote operation
//! applies, call the service, persist the resulting annotation. The sharing
//! state is never stored; it is derived fresh from the note's persisted
//! annotation at the start of every action.
//!
//! Ownership is checked before any remote call: a note's remote copy is
//! scoped to one space, and updating or deleting it through a different
//! team would operate on the wrong remote resource.

use thiserror::Error;
use tracing::{debug, info};

use crate::annotation::{self, AnnotationFormat, Decoded, RemoteAnnotation};
use crate::compose;
use crate::host::{DialogButton, HostError, NoteStore, Prompter};
use crate::note::{Note, NotePatch};
use crate::remote::{NotePayload, RemoteError, RemoteNotes, Team};
use crate::target::{self, Resolution, SyncTarget};

#[derive(Debug, Error)]
pub enum ShareError {
    /// Credentials or endpoint are not configured; nothing was attempted.
    #[error("HackMD token or endpoint is not configured")]
    ConfigurationMissing,

    /// The chosen destination does not match the space the note's remote
    /// copy belongs to. Raised before any remote call.
    #[error("note is already shared under \"{team}\"; pick that space or delete the remote copy first")]
    OwnershipMismatch { team: String },

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error(transparent)]
    Host(#[from] HostError),

    /// The dialog returned an id that was never offered.
    #[error("dialog returned unknown choice: {0}")]
    UnknownSelection(String),
}

pub type Result<T> = std::result::Result<T, ShareError>;

/// Sharing state derived from the note's persisted annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncState {
    Unshared,
    Shared(Decoded),
}

/// Derive the current state. Malformed annotations fail open into
/// `Unshared` (see [`annotation::decode`]).
pub fn sync_state(note: &Note) -> SyncState {
    match annotation::decode(note) {
        Some(decoded) => SyncState::Shared(decoded),
        None => SyncState::Unshared,
    }
}

/// Action requested through the dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Update,
    Delete,
    Cancel,
}

impl Action {
    pub fn id(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Cancel => "cancel",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "create" => Some(Action::Create),
            "update" => Some(Action::Update),
            "delete" => Some(Action::Delete),
            "cancel" => Some(Action::Cancel),
            _ => None,
        }
    }
}

/// Buttons for the action dialog: create for unshared notes, update/delete
/// for shared ones, cancel always.
pub fn action_buttons(state: &SyncState) -> Vec<DialogButton> {
    let mut actions = match state {
        SyncState::Unshared => vec![Action::Create],
        SyncState::Shared(_) => vec![Action::Update, Action::Delete],
    };
    actions.push(Action::Cancel);
    actions
        .into_iter()
        .map(|action| DialogButton {
            id: action.id().to_string(),
            title: match action {
                Action::Cancel => String::new(),
                _ => action.id().to_string(),
            },
        })
        .collect()
}

/// Remote operation chosen by the transition table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Create,
    Update { note_id: String },
    Delete { note_id: String },
    /// No remote call and no local mutation.
    Nothing,
}

/// The transition table. Pure: no remote calls, no mutation.
pub fn decide(state: &SyncState, action: Action, target: &SyncTarget) -> Result<Operation> {
    match (state, action) {
        (_, Action::Cancel) => Ok(Operation::Nothing),

        (SyncState::Unshared, Action::Create) => Ok(Operation::Create),
        // Re-create is only valid when no annotation exists; a shared note
        // answering create is a guarded no-op.
        (SyncState::Shared(_), Action::Create) => Ok(Operation::Nothing),

        // Update/delete on an unshared note has nothing to act on.
        (SyncState::Unshared, Action::Update | Action::Delete) => Ok(Operation::Nothing),

        (SyncState::Shared(decoded), Action::Update) => {
            check_ownership(&decoded.annotation, target)?;
            Ok(Operation::Update {
                note_id: decoded.annotation.note_id().to_string(),
            })
        }
        (SyncState::Shared(decoded), Action::Delete) => {
            check_ownership(&decoded.annotation, target)?;
            Ok(Operation::Delete {
                note_id: decoded.annotation.note_id().to_string(),
            })
        }
    }
}

fn check_ownership(annotation: &RemoteAnnotation, target: &SyncTarget) -> Result<()> {
    if annotation.team_path() == target.path {
        Ok(())
    } else {
        Err(ShareError::OwnershipMismatch {
            team: annotation.owner_display().to_string(),
        })
    }
}

/// What one completed action did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created { publish_link: String },
    Updated,
    Deleted,
    Cancelled,
    /// Guarded no-op: the requested action had nothing to do.
    Unchanged,
}

/// Runs one user-triggered sync action end to end.
///
/// Borrows its collaborators for the duration of the action; the remote
/// client is expected to be constructed per action by the caller so a
/// settings change cannot leak stale credentials into a later action.
pub struct ShareFlow<'a, R, S, P> {
    remote: &'a R,
    store: &'a S,
    prompter: &'a P,
}

impl<'a, R, S, P> ShareFlow<'a, R, S, P>
where
    R: RemoteNotes,
    S: NoteStore,
    P: Prompter,
{
    pub fn new(remote: &'a R, store: &'a S, prompter: &'a P) -> Self {
        Self {
            remote,
            store,
            prompter,
        }
    }

    /// Run the full flow: fetch note -> fetch teams -> destination dialog ->
    /// action dialog -> decide -> remote call -> persist.
    pub async fn run(&self) -> Result<Outcome> {
        let note = self
            .store
            .selected_note()
            .await?
            .ok_or(HostError::NoSelection)?;
        debug!(note = %note.id, title = %note.title, "starting share action");

        let teams = self.remote.teams().await?;
        let target = match self.choose_target(&teams).await? {
            Resolution::Cancelled => {
                debug!("destination dialog cancelled");
                return Ok(Outcome::Cancelled);
            }
            Resolution::Target(target) => target,
        };

        let state = sync_state(&note);
        let action = self.choose_action(&state).await?;
        if action == Action::Cancel {
            debug!("action dialog cancelled");
            return Ok(Outcome::Cancelled);
        }

        match decide(&state, action, &target)? {
            Operation::Create => self.create(&note, &target).await,
            Operation::Update { note_id } => self.update(&note, &state, &target, &note_id).await,
            Operation::Delete { note_id } => self.delete(&note, &state, &target, &note_id).await,
            Operation::Nothing => {
                debug!(action = action.id(), "nothing to do");
                Ok(Outcome::Unchanged)
            }
        }
    }

    async fn choose_target(&self, teams: &[Team]) -> Result<Resolution> {
        let buttons = target::target_buttons(teams);
        let selection = self
            .prompter
            .choose("Where should this note live on HackMD?", &buttons)
            .await?;
        match target::resolve_choice(&selection, teams) {
            Some(resolution) => Ok(resolution),
            None => Err(ShareError::UnknownSelection(selection)),
        }
    }

    async fn choose_action(&self, state: &SyncState) -> Result<Action> {
        let message = match state {
            SyncState::Unshared => "This note has no copy on HackMD yet.",
            SyncState::Shared(_) => {
                "This note already has a copy on HackMD; its link is stored on the note."
            }
        };
        let buttons = action_buttons(state);
        let selection = self.prompter.choose(message, &buttons).await?;
        Action::from_id(&selection).ok_or(ShareError::UnknownSelection(selection))
    }

    async fn compose_content(&self, note: &Note, body: &str) -> Result<String> {
        // Tags are re-read at action time: updates always push the full
        // current local state.
        let tags = self.store.tags(&note.id).await?;
        Ok(compose::compose(&note.title, body, &tags))
    }

    async fn create(&self, note: &Note, target: &SyncTarget) -> Result<Outcome> {
        let content = self.compose_content(note, &note.body).await?;
        let payload = NotePayload {
            title: note.title.clone(),
            content,
        };
        let created = if target.is_personal() {
            self.remote.create_note(&payload).await?
        } else {
            self.remote.create_team_note(&target.path, &payload).await?
        };
        info!(note = %note.id, remote = %created.id, space = %target.path, "created remote note");

        let annotation = RemoteAnnotation::for_target(created.id.clone(), target);
        let link = annotation::encode_link(&annotation, &created.publish_link);
        self.store
            .update_note(
                &note.id,
                NotePatch {
                    body: None,
                    source_link: Some(link),
                },
            )
            .await?;
        Ok(Outcome::Created {
            publish_link: created.publish_link,
        })
    }

    async fn update(
        &self,
        note: &Note,
        state: &SyncState,
        target: &SyncTarget,
        note_id: &str,
    ) -> Result<Outcome> {
        // A legacy footer lives in the body itself and must not leak into
        // the remote copy.
        let body = match state {
            SyncState::Shared(decoded) if decoded.format == AnnotationFormat::BodyMarker => {
                annotation::strip_marker(&note.body)
            }
            _ => note.body.clone(),
        };
        let content = self.compose_content(note, &body).await?;

        if target.is_personal() {
            self.remote.update_note_content(note_id, &content).await?;
        } else {
            self.remote
                .update_team_note_content(&target.path, note_id, &content)
                .await?;
        }
        info!(note = %note.id, remote = %note_id, "updated remote note");
        Ok(Outcome::Updated)
    }

    async fn delete(
        &self,
        note: &Note,
        state: &SyncState,
        target: &SyncTarget,
        note_id: &str,
    ) -> Result<Outcome> {
        if target.is_personal() {
            self.remote.delete_note(note_id).await?;
        } else {
            self.remote.delete_team_note(&target.path, note_id).await?;
        }

        let patch = match state {
            SyncState::Shared(decoded) if decoded.format == AnnotationFormat::BodyMarker => {
                NotePatch {
                    body: Some(annotation::strip_marker(&note.body)),
                    source_link: Some(String::new()),
                }
            }
            _ => NotePatch {
                body: None,
                source_link: Some(String::new()),
            },
        };
        self.store.update_note(&note.id, patch).await?;
        info!(note = %note.id, remote = %note_id, "deleted remote note and cleared annotation");
        Ok(Outcome::Deleted)
    }
}
