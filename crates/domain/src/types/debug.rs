//! Debug event records
//!
//! Entries captured by the in-app debug log. They are kept in memory only and
//! never persisted.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::impl_domain_status_conversions;

/// Structured detail attached to a debug entry
pub type DebugDetails = Map<String, Value>;

/// Lifecycle phase a debug entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebugPhase {
    Request,
    Response,
    Error,
    Token,
}

impl_domain_status_conversions!(DebugPhase {
    Request => "request",
    Response => "response",
    Error => "error",
    Token => "token",
});

/// One recorded event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebugEntry {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub phase: DebugPhase,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<DebugDetails>,
}
