//! Notes resource

use noteapp_domain::constants::NOTES_PATH;
use noteapp_domain::{ListNotesOptions, Note, NoteCreate, NoteUpdate};
use serde::de::IgnoredAny;
use tracing::instrument;

use super::client::{ApiClient, RequestConfig};
use super::errors::ApiError;

/// CRUD over `/notes`
#[derive(Debug, Clone, Copy)]
pub struct NotesApi<'a> {
    client: &'a ApiClient,
}

impl<'a> NotesApi<'a> {
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /notes` with search, sort and paging; unset options are omitted
    #[instrument(skip(self))]
    pub async fn list(&self, options: &ListNotesOptions) -> Result<Vec<Note>, ApiError> {
        let config = RequestConfig::get()
            .query("q", options.search.as_deref())
            .query("sort", options.sort)
            .query("desc", options.desc)
            .query("skip", options.skip)
            .query("take", options.take);

        self.client.request(NOTES_PATH, config).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> Result<Note, ApiError> {
        self.client.request(&note_path(id), RequestConfig::get()).await
    }

    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: &NoteCreate) -> Result<Note, ApiError> {
        self.client.request(NOTES_PATH, RequestConfig::post().json(payload)?).await
    }

    /// Replace a note's title and content; any response body is ignored
    #[instrument(skip(self, payload))]
    pub async fn update(&self, id: i64, payload: &NoteUpdate) -> Result<(), ApiError> {
        let _: IgnoredAny =
            self.client.request(&note_path(id), RequestConfig::put().json(payload)?).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let _: IgnoredAny = self.client.request(&note_path(id), RequestConfig::delete()).await?;
        Ok(())
    }
}

fn note_path(id: i64) -> String {
    format!("{NOTES_PATH}/{id}")
}
