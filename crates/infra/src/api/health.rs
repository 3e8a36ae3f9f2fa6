//! Health endpoints

use noteapp_domain::constants::HEALTH_DB_PATH;
use noteapp_domain::HealthStatus;
use tracing::instrument;

use super::client::{ApiClient, RequestConfig};
use super::errors::ApiError;

#[derive(Debug, Clone, Copy)]
pub struct HealthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> HealthApi<'a> {
    pub const fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `GET /health/db`, sent without credentials
    #[instrument(skip(self))]
    pub async fn check_database(&self) -> Result<HealthStatus, ApiError> {
        self.client.request(HEALTH_DB_PATH, RequestConfig::get().auth(false)).await
    }
}
