//! Health check types

use serde::{Deserialize, Serialize};

/// Result of `GET /health/db`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub ok: bool,
}
