//! share-core: host-agnostic core for syncing editor notes to HackMD.
//!
//! This crate provides:
//! - The remote-link annotation codec (all historical encodings decode, only
//!   the canonical one is written)
//! - Markdown body composition for outbound payloads
//! - Destination (personal space vs team) resolution
//! - The sync decision state machine and the per-action flow
//! - `NoteStore`/`Prompter`/`RemoteNotes` trait seams for the host editor
//!   and the remote service

pub mod annotation;
pub mod compose;
pub mod engine;
pub mod host;
pub mod note;
pub mod remote;
pub mod target;

pub use annotation::{AnnotationFormat, Decoded, RemoteAnnotation};
pub use engine::{Action, Operation, Outcome, ShareError, ShareFlow, SyncState};
pub use host::{DialogButton, HostError, InMemoryStore, NoteStore, Prompter, ScriptedPrompter};
pub use note::{Note, NotePatch, Tag};
pub use remote::{CreatedNote, NotePayload, RemoteError, RemoteNotes, Team};
pub use target::{Resolution, SyncTarget};
