//! Response bodies of the web API

use serde::{Deserialize, Serialize};

use crate::constants::HealthStatus;

/// Body of `GET /api/v1/health`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub service: String,
    pub version: String,
    /// RFC 3339 UTC time the response was produced
    pub timestamp: String,
}
