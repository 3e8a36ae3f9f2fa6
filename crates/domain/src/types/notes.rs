//! Note resource types
//!
//! Notes are owned by the server; these are the DTO shapes exchanged with
//! the `/notes` endpoints.

use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// A note as returned by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Payload for `POST /notes`
///
/// `content` is always serialized; an absent value goes out as `null` so the
/// payload shape never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteCreate {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl NoteCreate {
    pub fn new(title: impl Into<String>, content: Option<String>) -> Self {
        Self { title: title.into(), content }
    }
}

/// Payload for `PUT /notes/:id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteUpdate {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

impl NoteUpdate {
    pub fn new(title: impl Into<String>, content: Option<String>) -> Self {
        Self { title: title.into(), content }
    }
}

/// Sort column accepted by `GET /notes`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteSort {
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "updatedAt")]
    UpdatedAt,
    #[serde(rename = "title")]
    Title,
}

impl_domain_status_conversions!(NoteSort {
    CreatedAt => "createdAt",
    UpdatedAt => "updatedAt",
    Title => "title",
});

/// Search, sort and pagination options for listing notes
///
/// Unset fields are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListNotesOptions {
    pub search: Option<String>,
    pub sort: Option<NoteSort>,
    pub desc: Option<bool>,
    pub skip: Option<u32>,
    pub take: Option<u32>,
}

impl ListNotesOptions {
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: NoteSort, desc: bool) -> Self {
        self.sort = Some(sort);
        self.desc = Some(desc);
        self
    }

    #[must_use]
    pub fn page(mut self, skip: u32, take: u32) -> Self {
        self.skip = Some(skip);
        self.take = Some(take);
        self
    }
}
