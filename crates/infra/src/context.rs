//! Client context
//!
//! Owns everything a client session shares: configuration, durable storage,
//! the token store, the debug log and the HTTP transport. Create one per
//! application and pass it by reference.

use std::sync::Arc;

use noteapp_common::{FileStorage, KeyValueStore, SharedMemoryStorage, StorageResult};
use noteapp_domain::{ClientConfig, NoteAppError, Result};
use tracing::info;
use url::Url;

use crate::api::{ApiClient, AuthApi, HealthApi, NotesApi};
use crate::debug::DebugLog;
use crate::http::HttpClient;
use crate::session::TokenStore;

/// Entry point of the client library
#[derive(Debug)]
pub struct ClientContext {
    config: ClientConfig,
    storage: Arc<dyn KeyValueStore>,
    file_storage: Option<Arc<FileStorage>>,
    api: ApiClient,
}

impl ClientContext {
    /// Build a context from `config`
    ///
    /// Tokens persist to `config.storage_path` when set, otherwise to
    /// process memory.
    ///
    /// # Errors
    /// Returns `NoteAppError::Config` if the base URL is invalid, the
    /// transport cannot be built, or the storage file cannot be opened.
    pub fn new(config: ClientConfig) -> Result<Self> {
        match config.storage_path.clone() {
            Some(path) => {
                let file = FileStorage::open(&path).map_err(|e| {
                    NoteAppError::Config(format!(
                        "Failed to open token storage {}: {e}",
                        path.display()
                    ))
                })?;
                let file = Arc::new(file);
                let storage: Arc<dyn KeyValueStore> = file.clone();
                let mut context = Self::with_storage(config, storage)?;
                context.file_storage = Some(file);
                Ok(context)
            }
            None => Self::with_storage(config, Arc::new(SharedMemoryStorage::new())),
        }
    }

    /// Build a context over caller-provided storage
    ///
    /// # Errors
    /// Returns `NoteAppError::Config` if the base URL is invalid or the
    /// transport cannot be built.
    pub fn with_storage(config: ClientConfig, storage: Arc<dyn KeyValueStore>) -> Result<Self> {
        let base_url = Url::parse(&config.base_url).map_err(|e| {
            NoteAppError::Config(format!("Invalid API URL '{}': {e}", config.base_url))
        })?;

        let mut http = HttpClient::builder();
        if let Some(timeout) = config.request_timeout() {
            http = http.timeout(timeout);
        }
        let http = http.build()?;

        let debug_log = Arc::new(DebugLog::from_config(&config));
        let tokens = Arc::new(TokenStore::new(Arc::clone(&storage), Arc::clone(&debug_log)));

        info!(
            base_url = %base_url,
            environment = %config.environment,
            has_token = tokens.token().is_some(),
            "Client context ready"
        );

        Ok(Self {
            config,
            storage,
            file_storage: None,
            api: ApiClient::new(http, base_url, tokens, debug_log),
        })
    }

    /// Build a context from `.env`, environment variables or a config file
    ///
    /// # Errors
    /// As [`crate::config::load`] and [`ClientContext::new`].
    pub fn from_env() -> Result<Self> {
        Self::new(crate::config::load()?)
    }

    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<dyn KeyValueStore> {
        &self.storage
    }

    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn tokens(&self) -> &Arc<TokenStore> {
        self.api.tokens()
    }

    pub fn debug_log(&self) -> &Arc<DebugLog> {
        self.api.debug_log()
    }

    pub const fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(&self.api)
    }

    pub const fn notes(&self) -> NotesApi<'_> {
        NotesApi::new(&self.api)
    }

    pub const fn health(&self) -> HealthApi<'_> {
        HealthApi::new(&self.api)
    }

    /// Pick up changes another process made to file-backed storage
    ///
    /// Returns the number of changed keys; always 0 for in-memory storage.
    ///
    /// # Errors
    /// Returns the storage error if the file cannot be read.
    pub fn refresh_storage(&self) -> StorageResult<usize> {
        self.file_storage.as_ref().map_or(Ok(0), |file| file.rescan())
    }
}
