//! Data models for the case-note management API.
//!
//! - `Client`, `ClientSearchPage`: client search results
//! - `CaseNote`, `CaseNoteCreateRequest`, `CaseNoteCreated`: case notes
//! - `InteractionType`: the server's interaction choice list
//! - `UserIdentity`: the authenticated caseworker

pub mod client;
pub mod note;
pub mod user;

pub use client::{Client, ClientSearchPage};
pub use note::{
    CaseNote, CaseNoteCreateRequest, CaseNoteCreated, CaseNotesListResponse, InteractionType,
    NoteAuthor,
};
pub use user::UserIdentity;
